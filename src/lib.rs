//! Compact, signed authentication tokens (JSON Web Tokens).
//!
//! This crate serializes a claim set into a self-contained, tamper-evident
//! three-segment string and later verifies that string's structural
//! integrity, cryptographic authenticity, and temporal/identity claims.
//!
//! - [`sign`] issues a token from a JSON claims object, a key, and options.
//! - [`verify`] runs the claim gates and the signature check.
//! - [`decode`] parses without verifying.
//!
//! Only the HMAC (`HS256`/`HS384`/`HS512`) family is implemented; signature
//! comparison is constant-time. Timestamps are epoch milliseconds.
//!
//! ```no_run
//! use serde_json::json;
//! use webtoken::{sign, verify, Key, Options};
//!
//! # fn main() -> Result<(), webtoken::TokenError> {
//! let key = Key::from("secret");
//! let token = sign(&json!({ "user": "42" }), &key, &Options::new())?;
//! verify(&token, &key, &Options::new())?;
//! # Ok(())
//! # }
//! ```

pub(crate) mod codec;
mod decode;
mod error;
mod expect;
mod futures;
mod schema;
pub(crate) mod signer;
mod sign;
mod types;
mod verify;

pub use decode::decode;
pub use error::{ErrorKind, JwtResult, TokenError};
pub use expect::Expectation;
pub use futures::{sign_async, verify_async, SignFuture, VerifyFuture};
pub use schema::{OptValue, Options};
pub use sign::sign;
pub use types::{Decoded, Key, RawSegments, Verified};
pub use verify::verify;
