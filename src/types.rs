//! Shared value types: signing keys and decoded token views.

use crate::error::{JwtResult, TokenError};
use serde::Serialize;
use serde_json::Value;

/// A symmetric signing key: UTF-8 secret or raw bytes.
#[derive(Debug, Clone)]
pub enum Key {
    /// A UTF-8 secret string.
    Secret(String),
    /// Raw key bytes.
    Bytes(Vec<u8>),
}

impl Key {
    /// Key material as bytes, whichever variant holds it.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Key::Secret(s) => s.as_bytes(),
            Key::Bytes(b) => b,
        }
    }

    /// Build a key from a dynamic JSON value.
    ///
    /// Callers wiring keys in from configuration get the same type policy the
    /// wire API enforces: only strings are accepted, anything else fails with
    /// an invalid-key-type error.
    pub fn from_json(value: &Value) -> JwtResult<Self> {
        match value {
            Value::String(s) => Ok(Key::Secret(s.clone())),
            _ => Err(TokenError::invalid_key_type()),
        }
    }
}

impl From<&str> for Key {
    fn from(secret: &str) -> Self {
        Key::Secret(secret.to_string())
    }
}

impl From<String> for Key {
    fn from(secret: String) -> Self {
        Key::Secret(secret)
    }
}

impl From<&[u8]> for Key {
    fn from(bytes: &[u8]) -> Self {
        Key::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Key {
    fn from(bytes: Vec<u8>) -> Self {
        Key::Bytes(bytes)
    }
}

/// The three raw base64url segments of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawSegments {
    /// Encoded header segment.
    pub header: String,
    /// Encoded payload segment.
    pub payload: String,
    /// Encoded signature segment.
    pub signature: String,
}

/// A decoded token: parsed header and payload, raw segments on request.
#[derive(Debug, Clone, Serialize)]
pub struct Decoded {
    /// Parsed header object.
    pub header: Value,
    /// Parsed payload object.
    pub payload: Value,
    /// Raw base64url segments, present when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<RawSegments>,
}

/// Successful verification outcome.
#[derive(Debug, Clone)]
pub enum Verified {
    /// The token is valid; the caller did not ask for the decoded claims.
    Valid,
    /// The token is valid and the caller asked for the decoded claims.
    Decoded(Decoded),
}

impl Verified {
    /// The decoded claims, when they were requested.
    #[must_use]
    pub fn decoded(&self) -> Option<&Decoded> {
        match self {
            Verified::Valid => None,
            Verified::Decoded(d) => Some(d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn key_exposes_bytes_for_both_variants() {
        assert_eq!(Key::from("secret").as_bytes(), b"secret");
        assert_eq!(Key::from(vec![1u8, 2, 3]).as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn key_from_json_rejects_non_strings() {
        let err = Key::from_json(&json!(42)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidKeyType);
        assert!(Key::from_json(&json!("secret")).is_ok());
    }
}
