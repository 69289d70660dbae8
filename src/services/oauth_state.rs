// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed OAuth `state` parameter.
//!
//! Format before encoding: `nonce|issued_at_ms_hex|hmac_sha256_hex`, then
//! base64url without padding. The nonce is also kept in a browser cookie
//! so a returning redirect can be tied to the browser that started it.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// How long a started sign-in may take before the state is rejected.
pub const STATE_TTL: Duration = Duration::from_secs(10 * 60);
const CLOCK_SKEW: Duration = Duration::from_secs(60);
const NONCE_BYTES: usize = 16;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StateError {
    #[error("malformed state")]
    Malformed,
    #[error("state signature mismatch")]
    BadSignature,
    #[error("state expired")]
    Expired,
    #[error("invalid HMAC key: {0}")]
    Key(String),
    #[error("random number generator failure")]
    Rng,
    #[error("system time error: {0}")]
    Clock(String),
}

/// Fresh random nonce, base64url encoded.
pub fn new_nonce() -> Result<String, StateError> {
    let mut bytes = [0u8; NONCE_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| StateError::Rng)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> Result<u128, StateError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| StateError::Clock(e.to_string()))?
        .as_millis())
}

/// Sign `nonce` issued at `issued_at_ms` into an opaque state string.
pub fn sign_state(nonce: &str, issued_at_ms: u128, key: &[u8]) -> Result<String, StateError> {
    if nonce.contains('|') {
        return Err(StateError::Malformed);
    }

    let payload = format!("{}|{:x}", nonce, issued_at_ms);
    let signature = hex::encode(mac(key, &payload)?);
    let signed = format!("{}|{}", payload, signature);

    Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Verify a state string and return the nonce it carries.
pub fn verify_state(state: &str, key: &[u8], now_ms: u128) -> Result<String, StateError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(state)
        .map_err(|_| StateError::Malformed)?;
    let state_str = String::from_utf8(bytes).map_err(|_| StateError::Malformed)?;

    let mut parts = state_str.splitn(3, '|');
    let (Some(nonce), Some(timestamp_hex), Some(signature_hex)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(StateError::Malformed);
    };

    let payload = format!("{}|{}", nonce, timestamp_hex);
    let expected = mac(key, &payload)?;
    let provided = hex::decode(signature_hex).map_err(|_| StateError::BadSignature)?;

    if !bool::from(expected.as_slice().ct_eq(provided.as_slice())) {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return Err(StateError::BadSignature);
    }

    let issued_at = u128::from_str_radix(timestamp_hex, 16).map_err(|_| StateError::Malformed)?;
    if issued_at > now_ms + CLOCK_SKEW.as_millis() {
        return Err(StateError::Expired);
    }
    if now_ms.saturating_sub(issued_at) > STATE_TTL.as_millis() {
        return Err(StateError::Expired);
    }

    Ok(nonce.to_string())
}

/// Constant-time comparison of two nonces.
pub fn nonces_match(a: &str, b: &str) -> bool {
    bool::from(a.as_bytes().ct_eq(b.as_bytes()))
}

fn mac(key: &[u8], payload: &str) -> Result<Vec<u8>, StateError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| StateError::Key(e.to_string()))?;
    mac.update(payload.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}
