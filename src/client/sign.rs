// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! SwitchBot API request signing.
//!
//! Every request carries four headers: the long-lived token as
//! `Authorization`, plus `sign`, `t` and `nonce`. The signature is the
//! base64-encoded HMAC-SHA256 digest of `{token}{t}{nonce}` keyed with the
//! account secret, as documented in the vendor's v1.1 API.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Signed header set sent with every SwitchBot API request.
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    /// API token, sent as `Authorization`.
    pub authorization: String,
    /// base64 HMAC-SHA256 digest, sent as `sign`.
    pub sign: String,
    /// Wall-clock milliseconds since the Unix epoch, sent as `t`.
    pub timestamp: String,
    /// Per-request unique identifier, sent as `nonce`.
    pub nonce: String,
}

/// Create a fresh header set for a single request.
///
/// The digest is always computed over the exact timestamp and nonce that end
/// up in the headers: a recorded signature cannot be replayed with different
/// values.
pub fn sign(token: &str, secret: &str) -> AuthHeaders {
    let timestamp = now_millis().to_string();
    let nonce = Uuid::new_v4().to_string();
    let sign = signature(token, secret, &timestamp, &nonce);

    AuthHeaders {
        authorization: token.to_string(),
        sign,
        timestamp,
        nonce,
    }
}

/// Compute `base64(HMAC-SHA256(secret, token + t + nonce))`.
///
/// Pure and deterministic: identical inputs always produce an identical
/// digest.
pub fn signature(token: &str, secret: &str, timestamp: &str, nonce: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("hmac key");
    mac.update(token.as_bytes());
    mac.update(timestamp.as_bytes());
    mac.update(nonce.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
