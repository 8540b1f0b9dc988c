//! Token splitting and parsing.

use crate::codec;
use crate::error::{JwtResult, TokenError};
use crate::types::{Decoded, RawSegments};
use once_cell::sync::Lazy;
use regex::Regex;

// Exactly three dot-separated base64url segments, no padding.
static TOKEN_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9_-]+)\.([A-Za-z0-9_-]+)\.([A-Za-z0-9_-]+)$")
        .expect("token pattern compiles")
});

/// Decode a token without verifying it: split the three segments and parse
/// header and payload JSON.
///
/// Any other shape, or a segment that is not valid base64/JSON, fails with
/// an invalid-token error; there is never a partial result. Set
/// `include_raw` to also get the raw base64url segments back.
pub fn decode(token: &str, include_raw: bool) -> JwtResult<Decoded> {
    let caps = TOKEN_SHAPE
        .captures(token)
        .ok_or_else(TokenError::invalid_token)?;

    let header = codec::decode(&caps[1])?;
    let payload = codec::decode(&caps[2])?;

    Ok(Decoded {
        header,
        payload,
        raw: include_raw.then(|| RawSegments {
            header: caps[1].to_string(),
            payload: caps[2].to_string(),
            signature: caps[3].to_string(),
        }),
    })
}
