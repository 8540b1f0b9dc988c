//! Range expectations for verify-time claim matching.
//!
//! A claim expectation is one literal value, one pattern, or a list of
//! either; a list is satisfied when any element matches.

use crate::schema::OptValue;
use regex::Regex;
use serde_json::Value;

/// A verify-time claim expectation.
#[derive(Debug, Clone)]
pub enum Expectation {
    /// Exact equality against a JSON value.
    Literal(Value),
    /// The claim must be a string matching the pattern.
    Pattern(Regex),
    /// Logical OR over the contained expectations.
    AnyOf(Vec<Expectation>),
}

impl Expectation {
    /// Build an expectation from an option value.
    ///
    /// Returns `None` for values that cannot express an expectation (null,
    /// nested maps).
    pub(crate) fn from_opt(value: &OptValue) -> Option<Self> {
        match value {
            OptValue::Str(s) => Some(Expectation::Literal(Value::String(s.clone()))),
            OptValue::Int(i) => Some(Expectation::Literal(Value::from(*i))),
            OptValue::Float(f) => Some(Expectation::Literal(Value::from(*f))),
            OptValue::Bool(b) => Some(Expectation::Literal(Value::Bool(*b))),
            OptValue::Pattern(re) => Some(Expectation::Pattern(re.clone())),
            OptValue::List(items) => {
                let inner: Vec<Expectation> =
                    items.iter().filter_map(Expectation::from_opt).collect();
                if inner.is_empty() {
                    None
                } else {
                    Some(Expectation::AnyOf(inner))
                }
            }
            OptValue::Null | OptValue::Map(_) => None,
        }
    }

    /// Test a claim value against this expectation.
    #[must_use]
    pub fn matches(&self, claim: &Value) -> bool {
        match self {
            Expectation::Literal(expected) => claim == expected,
            Expectation::Pattern(re) => claim.as_str().is_some_and(|s| re.is_match(s)),
            Expectation::AnyOf(inner) => inner.iter().any(|e| e.matches(claim)),
        }
    }

    /// Render the expectation for error payloads.
    #[must_use]
    pub fn describe(&self) -> Value {
        match self {
            Expectation::Literal(v) => v.clone(),
            Expectation::Pattern(re) => Value::String(format!("/{}/", re.as_str())),
            Expectation::AnyOf(inner) => {
                Value::Array(inner.iter().map(Expectation::describe).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opt_pattern(re: &str) -> OptValue {
        OptValue::Pattern(Regex::new(re).expect("test pattern compiles"))
    }

    #[test]
    fn literal_requires_exact_equality() {
        let exp = Expectation::from_opt(&OptValue::from("issuer-a")).unwrap();
        assert!(exp.matches(&json!("issuer-a")));
        assert!(!exp.matches(&json!("issuer-b")));
        assert!(!exp.matches(&json!(42)));
    }

    #[test]
    fn pattern_matches_strings_only() {
        let exp = Expectation::from_opt(&opt_pattern("^team-")).unwrap();
        assert!(exp.matches(&json!("team-x")));
        assert!(!exp.matches(&json!("other")));
        assert!(!exp.matches(&json!(7)));
    }

    #[test]
    fn any_of_is_a_logical_or() {
        let exp = Expectation::from_opt(&OptValue::List(vec![
            OptValue::from("A"),
            opt_pattern("^B-"),
        ]))
        .unwrap();
        assert!(exp.matches(&json!("A")));
        assert!(exp.matches(&json!("B-7")));
        assert!(!exp.matches(&json!("C")));
    }

    #[test]
    fn null_yields_no_expectation() {
        assert!(Expectation::from_opt(&OptValue::Null).is_none());
    }

    #[test]
    fn describe_renders_patterns_and_lists() {
        let exp = Expectation::from_opt(&OptValue::List(vec![
            OptValue::from("A"),
            opt_pattern("^B-"),
        ]))
        .unwrap();
        assert_eq!(exp.describe(), json!(["A", "/^B-/"]));
    }
}
