//! Concrete Future types for token operations.
//!
//! The core is synchronous and stateless; these wrappers exist for callers
//! already living inside a Tokio runtime. Each operation runs on a spawned
//! task and delivers its result over a oneshot channel.

use crate::error::{JwtResult, TokenError};
use crate::schema::Options;
use crate::types::{Key, Verified};
use serde_json::Value;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::oneshot;

/// Future for token issuing.
pub struct SignFuture {
    rx: oneshot::Receiver<JwtResult<String>>,
}

impl Future for SignFuture {
    type Output = JwtResult<String>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(TokenError::task())),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Future for token verification.
pub struct VerifyFuture {
    rx: oneshot::Receiver<JwtResult<Verified>>,
}

impl Future for VerifyFuture {
    type Output = JwtResult<Verified>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(TokenError::task())),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Sign on a spawned task. Must be called inside a Tokio runtime.
#[must_use]
pub fn sign_async(claims: Value, key: Key, options: Options) -> SignFuture {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = tx.send(crate::sign::sign(&claims, &key, &options));
    });
    SignFuture { rx }
}

/// Verify on a spawned task. Must be called inside a Tokio runtime.
#[must_use]
pub fn verify_async(token: String, key: Key, options: Options) -> VerifyFuture {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = tx.send(crate::verify::verify(&token, &key, &options));
    });
    VerifyFuture { rx }
}
