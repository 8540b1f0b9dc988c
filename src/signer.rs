//! Algorithm resolution and HMAC signing.
//!
//! Algorithm names follow the `^[A-Z]{2}\d{3}$` shape: a two-letter family
//! plus a digest width. Only the `HS` (HMAC) family is implemented; the
//! [`Family`] enum is the seam where asymmetric families would slot in.

use crate::error::{JwtResult, TokenError};
use crate::types::Key;
use hmac::{Hmac, Mac};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

static ALG_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]{2})(\d{3})$").expect("algorithm pattern compiles"));

/// Signing algorithm family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Family {
    /// Keyed-hash (HMAC) constructions.
    Hs,
}

/// Digest width selected by the three-digit suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Width {
    W256,
    W384,
    W512,
}

/// A resolved signing algorithm: family plus digest width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Algorithm {
    family: Family,
    width: Width,
}

impl Algorithm {
    /// Resolve an algorithm name like `HS256` into a construction.
    ///
    /// Unrecognized families and digest widths fail with an
    /// unsupported-algorithm error; so does `NONE`.
    pub(crate) fn resolve(name: &str) -> JwtResult<Self> {
        let caps = ALG_SHAPE
            .captures(name)
            .ok_or_else(|| TokenError::unsupported_algorithm(name))?;

        let family = match &caps[1] {
            "HS" => Family::Hs,
            _ => return Err(TokenError::unsupported_algorithm(name)),
        };
        let width = match &caps[2] {
            "256" => Width::W256,
            "384" => Width::W384,
            "512" => Width::W512,
            _ => return Err(TokenError::unsupported_algorithm(name)),
        };

        Ok(Self { family, width })
    }

    /// Produce the signature bytes over `message` with `key`.
    ///
    /// HMAC is a pure function of `(algorithm, key, message)`; verification
    /// relies on re-signing reproducing the received signature exactly.
    pub(crate) fn sign(&self, key: &Key, message: &str) -> JwtResult<Vec<u8>> {
        let secret = key.as_bytes();
        match (self.family, self.width) {
            (Family::Hs, Width::W256) => hmac_digest::<HmacSha256>(secret, message),
            (Family::Hs, Width::W384) => hmac_digest::<HmacSha384>(secret, message),
            (Family::Hs, Width::W512) => hmac_digest::<HmacSha512>(secret, message),
        }
    }
}

fn hmac_digest<M: Mac + hmac::digest::KeyInit>(secret: &[u8], message: &str) -> JwtResult<Vec<u8>> {
    let mut mac =
        <M as Mac>::new_from_slice(secret).map_err(|_| TokenError::invalid_key_type())?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Constant-time equality over two encoded signature segments.
pub(crate) fn signature_matches(current: &str, expected: &str) -> bool {
    current.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn resolves_hmac_widths() {
        for name in ["HS256", "HS384", "HS512"] {
            assert!(Algorithm::resolve(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_unknown_families_and_widths() {
        for name in ["RS256", "ES256", "HS128", "NONE", "hs256", ""] {
            let err = Algorithm::resolve(name).unwrap_err();
            assert_eq!(err.kind, ErrorKind::UnsupportedAlgorithm, "{name}");
        }
    }

    #[test]
    fn signing_is_deterministic_and_key_sensitive() {
        let alg = Algorithm::resolve("HS256").unwrap();
        let key = Key::from("secret");
        let a = alg.sign(&key, "header.payload").unwrap();
        let b = alg.sign(&key, "header.payload").unwrap();
        assert_eq!(a, b);

        let other = alg.sign(&Key::from("other"), "header.payload").unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn widths_produce_distinct_digest_lengths() {
        let key = Key::from("secret");
        let s256 = Algorithm::resolve("HS256").unwrap().sign(&key, "m").unwrap();
        let s384 = Algorithm::resolve("HS384").unwrap().sign(&key, "m").unwrap();
        let s512 = Algorithm::resolve("HS512").unwrap().sign(&key, "m").unwrap();
        assert_eq!(s256.len(), 32);
        assert_eq!(s384.len(), 48);
        assert_eq!(s512.len(), 64);
    }

    #[test]
    fn comparison_requires_exact_equality() {
        assert!(signature_matches("abc", "abc"));
        assert!(!signature_matches("abc", "abd"));
        assert!(!signature_matches("abc", "abcd"));
    }
}
