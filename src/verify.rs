//! Token verification: four sequential gates, short-circuiting on the first
//! failure.
//!
//! Cheap structural and temporal checks run before the signature is
//! recomputed so malformed or expired tokens fail without paying hashing
//! cost, but the signature stays the final authority: it is always checked
//! last and a mismatch invalidates the token no matter what the claim gates
//! said.

use crate::codec;
use crate::decode::decode;
use crate::error::{JwtResult, TokenError};
use crate::expect::Expectation;
use crate::schema::{self, OptValue, Options, VERIFY_DEFAULTS, VERIFY_SCHEMA};
use crate::signer::{self, Algorithm};
use crate::types::{Decoded, Key, RawSegments, Verified};
use chrono::Utc;
use serde_json::Value;

const HEADER_ARGS: [&str; 2] = ["alg", "typ"];
const PAYLOAD_ARGS: [&str; 4] = ["iss", "aud", "sub", "jti"];

/// Verify a token string against a key and caller expectations.
///
/// Returns [`Verified::Valid`] on success, or [`Verified::Decoded`] when the
/// caller set `decode: true`. Every failure is terminal and carries the
/// claim that failed.
pub fn verify(token: &str, key: &Key, options: &Options) -> JwtResult<Verified> {
    let opts = schema::validate(&VERIFY_SCHEMA, options, &VERIFY_DEFAULTS)?;

    let decoded = decode(token, true)?;
    let raw = match decoded.raw.as_ref() {
        Some(raw) => raw,
        None => return Err(TokenError::invalid_token()),
    };

    verify_header(&decoded.header, &opts)?;
    verify_payload(&decoded.payload, &opts)?;
    verify_signature(&decoded.header, raw, key)?;

    tracing::debug!("token verified");
    if matches!(opts.get("decode"), Some(v) if v.is_truthy()) {
        Ok(Verified::Decoded(Decoded {
            header: decoded.header,
            payload: decoded.payload,
            raw: None,
        }))
    } else {
        Ok(Verified::Valid)
    }
}

// Gate 1: structural header expectations. The defaults pin alg to HS256 and
// typ to JWT, so a missing or foreign header fails here unless the caller
// widened the range.
fn verify_header(header: &Value, opts: &Options) -> JwtResult<()> {
    for prop in HEADER_ARGS {
        check_expectation(header, prop, opts.get(prop), header_error)?;
    }
    if let Some(OptValue::Map(extra)) = opts.get("header") {
        for (prop, value) in extra {
            check_expectation(header, prop, Some(value), header_error)?;
        }
    }
    Ok(())
}

// Gates 2 and 3: temporal checks in fixed iat -> nbf -> exp order, then
// identity claims.
fn verify_payload(payload: &Value, opts: &Options) -> JwtResult<()> {
    let now = Utc::now().timestamp_millis();

    if let Some(OptValue::Int(reference)) = opts.get("iat") {
        if let Some(iat) = payload.get("iat").and_then(Value::as_i64) {
            if *reference > iat {
                return Err(TokenError::issued_at(
                    Some(Value::from(now)),
                    Some(Value::from(iat)),
                ));
            }
        }
    }

    if time_check_enabled(opts.get("nbf")) {
        if let Some(nbf) = payload.get("nbf").and_then(Value::as_i64) {
            if nbf > now {
                return Err(TokenError::immature(
                    Some(Value::from(now)),
                    Some(Value::from(nbf)),
                ));
            }
        }
    }

    if time_check_enabled(opts.get("exp")) {
        if let Some(exp) = payload.get("exp").and_then(Value::as_i64) {
            if exp < now {
                return Err(TokenError::expired(
                    Some(Value::from(now)),
                    Some(Value::from(exp)),
                ));
            }
        }
    }

    for prop in PAYLOAD_ARGS {
        check_expectation(payload, prop, opts.get(prop), payload_error)?;
    }
    if let Some(OptValue::Map(extra)) = opts.get("payload") {
        for (prop, value) in extra {
            check_expectation(payload, prop, Some(value), payload_error)?;
        }
    }
    Ok(())
}

// Tri-state toggle: unset/null checks when the claim is present, explicit
// true checks as well, explicit false skips even when the claim is present.
fn time_check_enabled(opt: Option<&OptValue>) -> bool {
    !matches!(opt, Some(OptValue::Bool(false)))
}

// Gate 4: recompute the signature over the exact received segments with the
// algorithm the token's own header declares, and compare in constant time.
fn verify_signature(header: &Value, raw: &RawSegments, key: &Key) -> JwtResult<()> {
    let alg = header.get("alg").and_then(Value::as_str).unwrap_or("");
    let algorithm = Algorithm::resolve(alg)?;

    let message = format!("{}.{}", raw.header, raw.payload);
    let recomputed = codec::encode_bytes(&algorithm.sign(key, &message)?);

    if !signer::signature_matches(&recomputed, &raw.signature) {
        return Err(TokenError::signature(&recomputed, &raw.signature));
    }
    Ok(())
}

fn check_expectation(
    segment: &Value,
    prop: &str,
    opt: Option<&OptValue>,
    error: fn(&str, Option<Value>, Option<Value>) -> TokenError,
) -> JwtResult<()> {
    let expectation = match opt.filter(|v| v.is_truthy()).and_then(Expectation::from_opt) {
        Some(expectation) => expectation,
        None => return Ok(()),
    };

    let current = segment.get(prop);
    if current.is_some_and(|claim| expectation.matches(claim)) {
        return Ok(());
    }
    Err(error(
        prop,
        current.cloned(),
        Some(expectation.describe()),
    ))
}

fn header_error(prop: &str, current: Option<Value>, expected: Option<Value>) -> TokenError {
    match prop {
        "typ" => TokenError::invalid_type(current, expected),
        _ => TokenError::header(prop, current, expected),
    }
}

fn payload_error(prop: &str, current: Option<Value>, expected: Option<Value>) -> TokenError {
    match prop {
        "iss" => TokenError::issuer(current, expected),
        "aud" => TokenError::audience(current, expected),
        "sub" => TokenError::subject(current, expected),
        "jti" => TokenError::token_id(current, expected),
        _ => TokenError::payload(prop, current, expected),
    }
}
