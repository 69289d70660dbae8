// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication service contract for the redirect sign-in flow.

use crate::models::Identity;
use serde::Deserialize;
use std::fmt;
use std::future::Future;
use validator::Validate;

/// Shown when the provider gives no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Google sign-in failed. Please try again.";

/// Where to send the browser to start the provider's sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    /// Provider authorization URL
    pub url: String,
    /// Per-attempt value that must be presented again on return; the
    /// caller stores it in the browser (cookie) alongside the redirect.
    pub nonce: String,
}

/// Parameters present on the sign-in page when the provider redirects back.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RedirectParams {
    #[validate(length(min = 1, max = 2048))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 4096))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub error: Option<String>,
    #[validate(length(max = 1024))]
    pub error_description: Option<String>,
    /// Nonce stored in the browser when the redirect was started.
    #[serde(skip)]
    pub browser_nonce: Option<String>,
}

impl RedirectParams {
    /// Whether a redirect round-trip has completed on this page load.
    pub fn is_pending(&self) -> bool {
        self.code.is_some() || self.error.is_some()
    }
}

/// Machine-readable classification of an authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    /// The user backed out of the provider's consent screen.
    Cancelled,
    /// Sign-in is not configured (missing client credentials).
    Configuration,
    /// Redirect parameters were malformed.
    InvalidRequest,
    /// The `state` parameter was missing, forged, expired or not bound
    /// to this browser.
    InvalidState,
    /// The provider rejected the request or the code exchange.
    Provider,
    /// The ID token returned by the provider failed verification.
    InvalidToken,
    /// The provider could not be reached.
    Network,
    /// Local failure (randomness, signing).
    Internal,
}

impl AuthErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthErrorCode::Cancelled => "cancelled",
            AuthErrorCode::Configuration => "configuration",
            AuthErrorCode::InvalidRequest => "invalid_request",
            AuthErrorCode::InvalidState => "invalid_state",
            AuthErrorCode::Provider => "provider",
            AuthErrorCode::InvalidToken => "invalid_token",
            AuthErrorCode::Network => "network",
            AuthErrorCode::Internal => "internal",
        }
    }
}

/// Authentication failure with an optional provider message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub code: AuthErrorCode,
    pub message: Option<String>,
}

impl AuthError {
    pub fn new(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }

    /// Error without a user-presentable message.
    pub fn bare(code: AuthErrorCode) -> Self {
        Self {
            code,
            message: None,
        }
    }

    /// Classify an `error` parameter returned on the redirect.
    pub fn from_redirect_error(error: &str, description: Option<&str>) -> Self {
        let code = match error {
            "access_denied" => AuthErrorCode::Cancelled,
            "invalid_request" | "invalid_scope" | "unauthorized_client" => {
                AuthErrorCode::Configuration
            }
            _ => AuthErrorCode::Provider,
        };

        Self {
            code,
            message: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.code == AuthErrorCode::Cancelled
    }

    /// Message to show the user.
    pub fn user_message(&self) -> &str {
        self.message.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.code.as_str(), message),
            None => f.write_str(self.code.as_str()),
        }
    }
}

impl std::error::Error for AuthError {}

/// External authentication service driving the redirect handshake.
pub trait AuthService: Send + Sync {
    /// Build the provider request for `scopes` and return where to send
    /// the browser. The caller is expected to navigate away immediately.
    fn begin_redirect_sign_in(
        &self,
        scopes: &[&str],
    ) -> impl Future<Output = Result<RedirectTarget, AuthError>> + Send;

    /// Resolve a completed redirect, if any.
    ///
    /// `Ok(None)` means no redirect is pending on this page load.
    fn pending_redirect_outcome(
        &self,
        params: &RedirectParams,
    ) -> impl Future<Output = Result<Option<Identity>, AuthError>> + Send;
}
