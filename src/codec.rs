//! Base64url codec for JSON token segments (RFC 7515: URL-safe alphabet, no
//! padding).

use crate::error::{JwtResult, TokenError};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::Value;

/// Serialize a JSON value and encode it as a base64url segment.
pub(crate) fn encode(value: &Value) -> JwtResult<String> {
    let json = serde_json::to_vec(value).map_err(|_| TokenError::invalid_token())?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Encode raw bytes as a base64url segment.
pub(crate) fn encode_bytes(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode a base64url segment back into a JSON value.
///
/// Fails with an invalid-token error when the segment is not valid base64 or
/// the decoded bytes are not valid UTF-8 JSON; key order in the original
/// object does not matter.
pub(crate) fn decode(segment: &str) -> JwtResult<Value> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::invalid_token())?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::invalid_token())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn segments_are_url_safe_and_unpadded() {
        // The serialized form contains bytes that force '+', '/' and '=' in
        // plain base64.
        let value = json!({ "data": "<<???>>~~" });
        let segment = encode(&value).unwrap();
        assert!(segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn round_trips_regardless_of_key_order() {
        let value = json!({ "b": 2, "a": 1 });
        let decoded = decode(&encode(&value).unwrap()).unwrap();
        assert_eq!(decoded["a"], 1);
        assert_eq!(decoded["b"], 2);
    }

    #[test]
    fn rejects_bad_base64_and_bad_json() {
        let err = decode("not base64 at all!").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);

        let not_json = encode_bytes(b"\xff\xfe plainly not json");
        let err = decode(&not_json).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }
}
