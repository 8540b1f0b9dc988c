//! Token issuing.

use crate::codec;
use crate::error::{JwtResult, TokenError};
use crate::schema::{self, OptValue, Options, SIGN_DEFAULTS, SIGN_SCHEMA};
use crate::signer::Algorithm;
use crate::types::Key;
use chrono::Utc;
use serde_json::Value;

const HEADER_OPTIONS: [&str; 2] = ["alg", "typ"];
const PAYLOAD_OPTIONS: [&str; 7] = ["iat", "exp", "nbf", "iss", "aud", "sub", "jti"];

/// Sign a claims object and return the token string.
///
/// `claims` must be a plain JSON object. Options are validated against the
/// sign schema merged over its defaults (`alg: HS256`, `typ: JWT`,
/// `iat: true`). Reserved-claim options are only inserted into the payload
/// when truthy, so `false`/null suppress the claim; an option value wins
/// over a claims key of the same name.
pub fn sign(claims: &Value, key: &Key, options: &Options) -> JwtResult<String> {
    let data = claims.as_object().ok_or_else(TokenError::claims_type)?;

    let mut opts = schema::validate(&SIGN_SCHEMA, options, &SIGN_DEFAULTS)?;
    resolve_iat(&mut opts);

    let alg = match opts.get("alg") {
        Some(OptValue::Str(alg)) => alg.clone(),
        _ => return Err(TokenError::unsupported_algorithm("")),
    };
    let algorithm = Algorithm::resolve(&alg)?;

    let mut header = serde_json::Map::new();
    merge_truthy(&mut header, &opts, &HEADER_OPTIONS);
    if let Some(OptValue::Map(extra)) = opts.get("header") {
        for (k, v) in extra {
            if let Some(json) = v.as_json() {
                header.insert(k.clone(), json);
            }
        }
    }

    let mut payload = data.clone();
    merge_truthy(&mut payload, &opts, &PAYLOAD_OPTIONS);

    let header_b64 = codec::encode(&Value::Object(header))?;
    let payload_b64 = codec::encode(&Value::Object(payload))?;
    let message = format!("{header_b64}.{payload_b64}");
    let signature = algorithm.sign(key, &message)?;

    tracing::debug!(alg = %alg, "token issued");
    Ok(format!("{message}.{}", codec::encode_bytes(&signature)))
}

// iat: true stamps the current time, an explicit timestamp is kept verbatim,
// anything falsy drops the claim.
fn resolve_iat(opts: &mut Options) {
    match opts.get("iat") {
        Some(OptValue::Bool(true)) => {
            opts.insert("iat", OptValue::Int(Utc::now().timestamp_millis()));
        }
        Some(OptValue::Int(_)) => {}
        _ => opts.remove("iat"),
    }
}

fn merge_truthy(target: &mut serde_json::Map<String, Value>, opts: &Options, props: &[&str]) {
    for prop in props {
        if let Some(value) = opts.get(prop) {
            if value.is_truthy() {
                if let Some(json) = value.as_json() {
                    target.insert((*prop).to_string(), json);
                }
            }
        }
    }
}
