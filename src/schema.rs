//! Declarative option schemas.
//!
//! Options travel as an ordered map of [`OptValue`]s so a single engine can
//! enforce both schemas: sign-time options hold concrete values, verify-time
//! options may hold range expectations (a value, a compiled pattern, or a
//! list of either). The two schemas are built once at startup and shared
//! read-only for the process lifetime.
//!
//! A field rule carries a `required` flag, a predicate, and the message used
//! when the predicate fails. Non-required fields with falsy values (null,
//! false, zero, empty string) are treated as "not provided" and skip their
//! predicate; that falsy skip is what makes `exp: false` an explicit opt-out
//! at verify time.

use crate::error::{JwtResult, TokenError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Algorithms accepted by the sign schema.
pub(crate) const ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

/// An option value: JSON plus compiled patterns.
#[derive(Debug, Clone)]
pub enum OptValue {
    /// Explicit null (field present but unset).
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer, used for epoch-millisecond timestamps.
    Int(i64),
    /// Floating-point number, for pass-through JSON content.
    Float(f64),
    /// String value.
    Str(String),
    /// Compiled pattern expectation.
    Pattern(Regex),
    /// List of values (range semantics at verify time).
    List(Vec<OptValue>),
    /// Nested map (extra header fields, generic expectations).
    Map(BTreeMap<String, OptValue>),
}

impl OptValue {
    /// Absent-equivalent values: null, false, zero, empty string.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            OptValue::Null => true,
            OptValue::Bool(b) => !b,
            OptValue::Int(i) => *i == 0,
            OptValue::Float(f) => *f == 0.0,
            OptValue::Str(s) => s.is_empty(),
            OptValue::Pattern(_) | OptValue::List(_) | OptValue::Map(_) => false,
        }
    }

    /// Opposite of [`OptValue::is_falsy`].
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !self.is_falsy()
    }

    /// Render as plain JSON; `None` when the value holds a pattern.
    #[must_use]
    pub fn as_json(&self) -> Option<Value> {
        match self {
            OptValue::Null => Some(Value::Null),
            OptValue::Bool(b) => Some(Value::Bool(*b)),
            OptValue::Int(i) => Some(json!(*i)),
            OptValue::Float(f) => Some(json!(*f)),
            OptValue::Str(s) => Some(Value::String(s.clone())),
            OptValue::Pattern(_) => None,
            OptValue::List(items) => items
                .iter()
                .map(OptValue::as_json)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            OptValue::Map(entries) => entries
                .iter()
                .map(|(k, v)| v.as_json().map(|j| (k.clone(), j)))
                .collect::<Option<serde_json::Map<_, _>>>()
                .map(Value::Object),
        }
    }
}

impl From<bool> for OptValue {
    fn from(b: bool) -> Self {
        OptValue::Bool(b)
    }
}

impl From<i64> for OptValue {
    fn from(i: i64) -> Self {
        OptValue::Int(i)
    }
}

impl From<&str> for OptValue {
    fn from(s: &str) -> Self {
        OptValue::Str(s.to_string())
    }
}

impl From<String> for OptValue {
    fn from(s: String) -> Self {
        OptValue::Str(s)
    }
}

impl From<Regex> for OptValue {
    fn from(re: Regex) -> Self {
        OptValue::Pattern(re)
    }
}

impl From<Vec<OptValue>> for OptValue {
    fn from(items: Vec<OptValue>) -> Self {
        OptValue::List(items)
    }
}

impl From<Value> for OptValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => OptValue::Null,
            Value::Bool(b) => OptValue::Bool(b),
            Value::Number(n) => n
                .as_i64()
                .map(OptValue::Int)
                .or_else(|| n.as_f64().map(OptValue::Float))
                .unwrap_or(OptValue::Null),
            Value::String(s) => OptValue::Str(s),
            Value::Array(items) => OptValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(entries) => OptValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, OptValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Caller-supplied options for `sign` and `verify`.
#[derive(Debug, Clone, Default)]
pub struct Options(BTreeMap<String, OptValue>);

impl Options {
    /// Empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<OptValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub(crate) fn insert(&mut self, key: &str, value: OptValue) {
        self.0.insert(key.to_string(), value);
    }

    pub(crate) fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }

    /// Look up an option by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptValue> {
        self.0.get(key)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &OptValue)> {
        self.0.iter()
    }
}

/// A per-field validation rule.
pub(crate) struct Rule {
    pub(crate) required: bool,
    pub(crate) check: fn(&OptValue) -> bool,
    pub(crate) message: &'static str,
}

impl Rule {
    const fn new(check: fn(&OptValue) -> bool, message: &'static str) -> Self {
        Self {
            required: false,
            check,
            message,
        }
    }

    const fn required(check: fn(&OptValue) -> bool, message: &'static str) -> Self {
        Self {
            required: true,
            check,
            message,
        }
    }
}

/// A compiled schema: field name to rule.
pub(crate) type Schema = BTreeMap<&'static str, Rule>;

fn is_string(v: &OptValue) -> bool {
    matches!(v, OptValue::Str(_))
}

fn is_complete_string(v: &OptValue) -> bool {
    matches!(v, OptValue::Str(s) if !s.trim().is_empty())
}

fn is_valid_algorithm(v: &OptValue) -> bool {
    matches!(v, OptValue::Str(s) if ALGORITHMS.contains(&s.as_str()) || s == "NONE")
}

fn is_valid_timestamp(v: &OptValue) -> bool {
    matches!(v, OptValue::Int(i) if *i > 0)
}

fn is_valid_timestamp_or_true(v: &OptValue) -> bool {
    matches!(v, OptValue::Bool(true)) || is_valid_timestamp(v)
}

fn is_bool(v: &OptValue) -> bool {
    matches!(v, OptValue::Bool(_))
}

// Extra header fields must be plain JSON and must not redeclare the two
// reserved header options.
fn is_clear_header(v: &OptValue) -> bool {
    match v {
        OptValue::Map(entries) => {
            !entries.contains_key("alg")
                && !entries.contains_key("typ")
                && entries.values().all(|e| e.as_json().is_some())
        }
        _ => false,
    }
}

// Range expectation: one value, one pattern, or a non-empty list of either.
fn is_range(v: &OptValue) -> bool {
    match v {
        OptValue::Str(_) | OptValue::Pattern(_) => true,
        OptValue::List(items) => {
            !items.is_empty()
                && items
                    .iter()
                    .all(|i| matches!(i, OptValue::Str(_) | OptValue::Pattern(_)))
        }
        _ => false,
    }
}

fn is_range_map(v: &OptValue) -> bool {
    matches!(v, OptValue::Map(entries) if entries.values().all(is_range))
}

const MSG_ALG: &str = "must match with implemented algorithms.";
const MSG_STR: &str = "must be type string.";
const MSG_STR_COMPLETE: &str = "must be a string that is not empty.";
const MSG_TIMESTAMP: &str = "must be a timestamp number.";
const MSG_TIMESTAMP_TRUE: &str = "must be a timestamp number or true.";
const MSG_CLEAR_HEADER: &str = "must be an object that does not contain any option property.";
const MSG_RANGE: &str = "must be a string, a pattern, or an array of either.";
const MSG_RANGE_MAP: &str = "must be an object of expected values.";
const MSG_BOOL: &str = "must be a boolean.";

/// Sign-time option schema: concrete values only.
pub(crate) static SIGN_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    BTreeMap::from([
        ("alg", Rule::required(is_valid_algorithm, MSG_ALG)),
        ("typ", Rule::required(is_string, MSG_STR)),
        ("iat", Rule::new(is_valid_timestamp_or_true, MSG_TIMESTAMP_TRUE)),
        ("exp", Rule::new(is_valid_timestamp, MSG_TIMESTAMP)),
        ("nbf", Rule::new(is_valid_timestamp, MSG_TIMESTAMP)),
        ("iss", Rule::new(is_complete_string, MSG_STR_COMPLETE)),
        ("aud", Rule::new(is_complete_string, MSG_STR_COMPLETE)),
        ("sub", Rule::new(is_complete_string, MSG_STR_COMPLETE)),
        ("jti", Rule::new(is_complete_string, MSG_STR_COMPLETE)),
        ("header", Rule::new(is_clear_header, MSG_CLEAR_HEADER)),
    ])
});

/// Sign-time defaults, merged under the caller's options.
pub(crate) static SIGN_DEFAULTS: Lazy<Options> = Lazy::new(|| {
    Options::new()
        .set("alg", "HS256")
        .set("typ", "JWT")
        .set("iat", true)
        .set("exp", OptValue::Null)
        .set("nbf", OptValue::Null)
        .set("iss", OptValue::Null)
        .set("aud", OptValue::Null)
        .set("sub", OptValue::Null)
        .set("jti", OptValue::Null)
        .set("header", OptValue::Null)
});

/// Verify-time option schema: range expectations and check toggles.
pub(crate) static VERIFY_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    BTreeMap::from([
        ("alg", Rule::new(is_range, MSG_RANGE)),
        ("typ", Rule::new(is_range, MSG_RANGE)),
        ("iat", Rule::new(is_valid_timestamp, MSG_TIMESTAMP)),
        ("exp", Rule::new(is_bool, MSG_BOOL)),
        ("nbf", Rule::new(is_bool, MSG_BOOL)),
        ("iss", Rule::new(is_range, MSG_RANGE)),
        ("aud", Rule::new(is_range, MSG_RANGE)),
        ("sub", Rule::new(is_range, MSG_RANGE)),
        ("jti", Rule::new(is_range, MSG_RANGE)),
        ("header", Rule::new(is_range_map, MSG_RANGE_MAP)),
        ("payload", Rule::new(is_range_map, MSG_RANGE_MAP)),
        ("decode", Rule::new(is_bool, MSG_BOOL)),
    ])
});

/// Verify-time defaults: the issuing algorithm and type are expected back
/// unless the caller widens or disables them.
pub(crate) static VERIFY_DEFAULTS: Lazy<Options> = Lazy::new(|| {
    Options::new()
        .set("alg", "HS256")
        .set("typ", "JWT")
        .set("iat", OptValue::Null)
        .set("exp", OptValue::Null)
        .set("nbf", OptValue::Null)
        .set("iss", OptValue::Null)
        .set("aud", OptValue::Null)
        .set("sub", OptValue::Null)
        .set("jti", OptValue::Null)
        .set("header", OptValue::Null)
        .set("payload", OptValue::Null)
        .set("decode", false)
});

/// Merge `defaults` then `data` (later wins) and validate every field.
///
/// Unknown keys fail with an unknown-option error; present fields run their
/// rule unless they are non-required and falsy.
pub(crate) fn validate(schema: &Schema, data: &Options, defaults: &Options) -> JwtResult<Options> {
    let mut merged = defaults.clone();
    for (key, value) in data.iter() {
        merged.insert(key, value.clone());
    }

    for (key, value) in merged.iter() {
        let rule = schema
            .get(key.as_str())
            .ok_or_else(|| TokenError::unknown_option(key))?;

        if !rule.required && value.is_falsy() {
            continue;
        }
        if !(rule.check)(value) {
            return Err(TokenError::invalid_option(key, rule.message));
        }
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn unknown_keys_are_rejected() {
        let opts = Options::new().set("lifetime", 60_i64);
        let err = validate(&SIGN_SCHEMA, &opts, &SIGN_DEFAULTS).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownOption);
        assert_eq!(err.prop.as_deref(), Some("lifetime"));
    }

    #[test]
    fn falsy_optional_fields_skip_their_predicate() {
        // exp is not a valid timestamp when false, but falsy means "unset".
        let opts = Options::new().set("exp", false);
        assert!(validate(&VERIFY_SCHEMA, &opts, &VERIFY_DEFAULTS).is_ok());
    }

    #[test]
    fn required_fields_never_skip() {
        let opts = Options::new().set("alg", OptValue::Null);
        let err = validate(&SIGN_SCHEMA, &opts, &SIGN_DEFAULTS).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidOption);
        assert_eq!(err.prop.as_deref(), Some("alg"));
    }

    #[test]
    fn sign_schema_checks_concrete_values() {
        let bad_exp = Options::new().set("exp", "tomorrow");
        let err = validate(&SIGN_SCHEMA, &bad_exp, &SIGN_DEFAULTS).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidOption);
        assert!(err.message.contains("timestamp"));

        let header_redeclares = Options::new().set(
            "header",
            OptValue::Map(BTreeMap::from([("alg".to_string(), OptValue::from("HS512"))])),
        );
        let err = validate(&SIGN_SCHEMA, &header_redeclares, &SIGN_DEFAULTS).unwrap_err();
        assert_eq!(err.prop.as_deref(), Some("header"));
    }

    #[test]
    fn verify_schema_accepts_ranges() {
        let opts = Options::new()
            .set("iss", vec![OptValue::from("a"), OptValue::from("b")])
            .set(
                "aud",
                Regex::new("^team-").expect("test pattern compiles"),
            );
        assert!(validate(&VERIFY_SCHEMA, &opts, &VERIFY_DEFAULTS).is_ok());

        let empty_list = Options::new().set("iss", Vec::<OptValue>::new());
        let err = validate(&VERIFY_SCHEMA, &empty_list, &VERIFY_DEFAULTS).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidOption);
    }

    #[test]
    fn merged_output_prefers_caller_values() {
        let opts = Options::new().set("alg", "HS384");
        let merged = validate(&SIGN_SCHEMA, &opts, &SIGN_DEFAULTS).unwrap();
        assert!(matches!(merged.get("alg"), Some(OptValue::Str(s)) if s == "HS384"));
        assert!(matches!(merged.get("typ"), Some(OptValue::Str(s)) if s == "JWT"));
    }

    #[test]
    fn none_passes_the_sign_schema() {
        // Accepted structurally; the signer is the one to refuse it.
        let opts = Options::new().set("alg", "NONE");
        assert!(validate(&SIGN_SCHEMA, &opts, &SIGN_DEFAULTS).is_ok());
    }
}
