//! Token error type.
//!
//! Every failure is a [`TokenError`] value carrying a closed [`ErrorKind`],
//! the offending property name, the value that was observed, and the
//! constraint it was checked against. Errors are built at the point of
//! failure and propagated as-is; callers can dispatch on `kind` to tell
//! "expired" apart from "tampered" apart from "malformed".

use serde_json::Value;

/// Result alias used across the crate.
pub type JwtResult<T> = Result<T, TokenError>;

/// Which claim or structural property failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The `claims` argument was not a plain JSON object.
    Type,
    /// The key was not a string or raw bytes.
    InvalidKeyType,
    /// Unknown algorithm family or digest width.
    UnsupportedAlgorithm,
    /// Option key not present in the schema.
    UnknownOption,
    /// Option value failed its schema predicate.
    InvalidOption,
    /// Token does not match the three-segment grammar, or a segment is not
    /// valid base64/JSON.
    InvalidToken,
    /// A header property failed its expectation.
    InvalidHeader,
    /// A payload property failed its expectation.
    InvalidPayload,
    /// The `typ` header claim failed its expectation.
    InvalidType,
    /// The token was issued before the caller's reference timestamp.
    InvalidIssuedAt,
    /// The token's not-before date has not been reached.
    ImmatureSignature,
    /// The token's expiration date is in the past.
    ExpiredSignature,
    /// The `iss` claim failed its expectation.
    InvalidIssuer,
    /// The `aud` claim failed its expectation.
    InvalidAudience,
    /// The `sub` claim failed its expectation.
    InvalidSubject,
    /// The `jti` claim failed its expectation.
    InvalidTokenId,
    /// Recomputed signature does not match the token's signature segment.
    InvalidSignature,
    /// A background task failed before delivering a result.
    Task,
}

/// A single token failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TokenError {
    /// The failing claim or property class.
    pub kind: ErrorKind,
    /// Human-readable diagnostic.
    pub message: String,
    /// The property that failed, when one is identifiable.
    pub prop: Option<String>,
    /// The value that was observed.
    pub current: Option<Value>,
    /// The constraint the value was checked against.
    pub expected: Option<Value>,
}

impl TokenError {
    fn bare(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            prop: None,
            current: None,
            expected: None,
        }
    }

    fn claim(
        kind: ErrorKind,
        message: impl Into<String>,
        prop: &str,
        current: Option<Value>,
        expected: Option<Value>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            prop: Some(prop.to_string()),
            current,
            expected,
        }
    }

    /// The `claims` argument was not a plain object.
    #[must_use]
    pub fn claims_type() -> Self {
        Self::bare(
            ErrorKind::Type,
            "The \"claims\" argument must be a plain object.",
        )
    }

    /// Key is not a string or raw bytes.
    #[must_use]
    pub fn invalid_key_type() -> Self {
        Self::bare(
            ErrorKind::InvalidKeyType,
            "The \"key\" argument must be a string or raw bytes.",
        )
    }

    /// Unknown algorithm name.
    #[must_use]
    pub fn unsupported_algorithm(alg: &str) -> Self {
        Self::claim(
            ErrorKind::UnsupportedAlgorithm,
            format!("The \"{alg}\" algorithm is not supported."),
            "alg",
            Some(Value::String(alg.to_string())),
            None,
        )
    }

    /// Option key not covered by the schema.
    #[must_use]
    pub fn unknown_option(key: &str) -> Self {
        Self::claim(
            ErrorKind::UnknownOption,
            format!("The \"{key}\" argument is not an allowed option property."),
            key,
            None,
            None,
        )
    }

    /// Option value failed its predicate; `message` comes from the rule.
    #[must_use]
    pub fn invalid_option(key: &str, message: &str) -> Self {
        Self::claim(
            ErrorKind::InvalidOption,
            format!("The \"{key}\" argument {message}"),
            key,
            None,
            None,
        )
    }

    /// Malformed token string or undecodable segment.
    #[must_use]
    pub fn invalid_token() -> Self {
        Self::bare(ErrorKind::InvalidToken, "The provided JWT is not valid.")
    }

    /// Generic header property mismatch.
    #[must_use]
    pub fn header(prop: &str, current: Option<Value>, expected: Option<Value>) -> Self {
        Self::claim(
            ErrorKind::InvalidHeader,
            format!("The JWT header supplied property \"{prop}\" is not valid."),
            prop,
            current,
            expected,
        )
    }

    /// Generic payload property mismatch.
    #[must_use]
    pub fn payload(prop: &str, current: Option<Value>, expected: Option<Value>) -> Self {
        Self::claim(
            ErrorKind::InvalidPayload,
            format!("The JWT payload supplied property \"{prop}\" is not valid."),
            prop,
            current,
            expected,
        )
    }

    /// The `typ` header claim mismatch.
    #[must_use]
    pub fn invalid_type(current: Option<Value>, expected: Option<Value>) -> Self {
        Self::claim(
            ErrorKind::InvalidType,
            "The JWT type (typ) is not valid.",
            "typ",
            current,
            expected,
        )
    }

    /// Token issued before the caller's reference timestamp.
    #[must_use]
    pub fn issued_at(current: Option<Value>, expected: Option<Value>) -> Self {
        Self::claim(
            ErrorKind::InvalidIssuedAt,
            "The JWT issuedAt (iat) is not valid.",
            "iat",
            current,
            expected,
        )
    }

    /// Token used before its not-before date.
    #[must_use]
    pub fn immature(current: Option<Value>, expected: Option<Value>) -> Self {
        Self::claim(
            ErrorKind::ImmatureSignature,
            "The JWT is not yet mature. The JWT notBefore (nbf) is not reached.",
            "nbf",
            current,
            expected,
        )
    }

    /// Token used past its expiration date.
    #[must_use]
    pub fn expired(current: Option<Value>, expected: Option<Value>) -> Self {
        Self::claim(
            ErrorKind::ExpiredSignature,
            "The JWT is no longer valid. The expiration (exp) date is outdated.",
            "exp",
            current,
            expected,
        )
    }

    /// The `iss` claim mismatch.
    #[must_use]
    pub fn issuer(current: Option<Value>, expected: Option<Value>) -> Self {
        Self::claim(
            ErrorKind::InvalidIssuer,
            "The JWT issuer (iss) is not valid.",
            "iss",
            current,
            expected,
        )
    }

    /// The `aud` claim mismatch.
    #[must_use]
    pub fn audience(current: Option<Value>, expected: Option<Value>) -> Self {
        Self::claim(
            ErrorKind::InvalidAudience,
            "The JWT audience (aud) is not valid.",
            "aud",
            current,
            expected,
        )
    }

    /// The `sub` claim mismatch.
    #[must_use]
    pub fn subject(current: Option<Value>, expected: Option<Value>) -> Self {
        Self::claim(
            ErrorKind::InvalidSubject,
            "The JWT subject (sub) is not valid.",
            "sub",
            current,
            expected,
        )
    }

    /// The `jti` claim mismatch.
    #[must_use]
    pub fn token_id(current: Option<Value>, expected: Option<Value>) -> Self {
        Self::claim(
            ErrorKind::InvalidTokenId,
            "The JWT id (jti) is not valid.",
            "jti",
            current,
            expected,
        )
    }

    /// Recomputed signature does not match the received one.
    #[must_use]
    pub fn signature(current: &str, expected: &str) -> Self {
        Self::claim(
            ErrorKind::InvalidSignature,
            "The JWT signature is not valid, it does not match with provided token.",
            "signature",
            Some(Value::String(current.to_string())),
            Some(Value::String(expected.to_string())),
        )
    }

    /// A spawned task dropped its result channel.
    #[must_use]
    pub fn task() -> Self {
        Self::bare(ErrorKind::Task, "The background task failed to respond.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_errors_carry_context() {
        let err = TokenError::issuer(
            Some(Value::String("rogue".into())),
            Some(Value::String("trusted".into())),
        );
        assert_eq!(err.kind, ErrorKind::InvalidIssuer);
        assert_eq!(err.prop.as_deref(), Some("iss"));
        assert_eq!(err.current, Some(Value::String("rogue".into())));
        assert_eq!(err.expected, Some(Value::String("trusted".into())));
    }

    #[test]
    fn display_uses_message() {
        let err = TokenError::invalid_token();
        assert_eq!(err.to_string(), "The provided JWT is not valid.");
    }

    #[test]
    fn option_errors_name_the_key() {
        let err = TokenError::unknown_option("lifetime");
        assert!(err.message.contains("\"lifetime\""));
        assert_eq!(err.kind, ErrorKind::UnknownOption);
    }
}
