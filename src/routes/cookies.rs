// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cookies used by the sign-in pages.
//!
//! Removal cookies must repeat the path of the cookie they clear.

use crate::middleware::auth::SESSION_TTL_SECS;
use crate::signin::Toast;
use axum_extra::extract::cookie::{Cookie, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

pub const SESSION_COOKIE: &str = "signin_session";
pub const NONCE_COOKIE: &str = "signin_oauth_nonce";
pub const FLASH_COOKIE: &str = "signin_flash";

const NONCE_PATH: &str = "/login";
const NONCE_TTL_SECS: i64 = 10 * 60;
const FLASH_TTL_SECS: i64 = 60;

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64))
        .build()
}

pub fn session_removal(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Binds a started redirect to this browser. Lax so it is sent on the
/// top-level navigation back from the provider.
pub fn nonce_cookie(nonce: String, secure: bool) -> Cookie<'static> {
    Cookie::build((NONCE_COOKIE, nonce))
        .path(NONCE_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(NONCE_TTL_SECS))
        .build()
}

pub fn nonce_removal(secure: bool) -> Cookie<'static> {
    Cookie::build((NONCE_COOKIE, ""))
        .path(NONCE_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Carries toasts across a redirect.
pub fn flash_cookie(toasts: &[Toast], secure: bool) -> Option<Cookie<'static>> {
    if toasts.is_empty() {
        return None;
    }

    let json = match serde_json::to_vec(toasts) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode flash toasts");
            return None;
        }
    };

    Some(
        Cookie::build((FLASH_COOKIE, URL_SAFE_NO_PAD.encode(json)))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure)
            .max_age(time::Duration::seconds(FLASH_TTL_SECS))
            .build(),
    )
}

pub fn flash_removal(secure: bool) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Decode flashed toasts; anything unreadable is dropped.
pub fn decode_flash(value: &str) -> Vec<Toast> {
    URL_SAFE_NO_PAD
        .decode(value)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_else(|| {
            tracing::debug!("Discarding unreadable flash cookie");
            Vec::new()
        })
}
