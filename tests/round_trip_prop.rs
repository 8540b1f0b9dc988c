//! Property test: any plain claims object survives the sign/verify round
//! trip and decodes back to a superset of itself.

use proptest::prelude::*;
use serde_json::{json, Value};
use webtoken::{decode, sign, verify, Key, Options, Verified};

fn claim_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 _-]{0,24}".prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ]
}

fn claims() -> impl Strategy<Value = Value> {
    // Application claim names, disjoint from the reserved set.
    proptest::collection::btree_map("[a-z]{1,8}_c", claim_value(), 0..6)
        .prop_map(|m| json!(m))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn round_trip_verifies_and_preserves_claims(claims in claims(), secret in "[ -~]{1,32}") {
        let key = Key::from(secret.as_str());
        let token = sign(&claims, &key, &Options::new()).unwrap();

        let outcome = verify(&token, &key, &Options::new()).unwrap();
        prop_assert!(matches!(outcome, Verified::Valid));

        let payload = decode(&token, false).unwrap().payload;
        for (name, value) in claims.as_object().unwrap() {
            prop_assert_eq!(payload.get(name), Some(value));
        }
        prop_assert!(payload["iat"].is_i64());
    }

    #[test]
    fn other_keys_never_verify(claims in claims(), secret in "[a-z]{4,16}") {
        let key = Key::from(secret.as_str());
        let token = sign(&claims, &key, &Options::new()).unwrap();
        let other = Key::from(format!("{secret}-x"));
        prop_assert!(verify(&token, &other, &Options::new()).is_err());
    }
}
