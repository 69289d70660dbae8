// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth 2.0 authorization-code client implementing the redirect
//! sign-in contract.

use crate::config::Config;
use crate::models::Identity;
use crate::services::google_oidc::{GoogleIdTokenVerifier, OidcError, DEFAULT_HTTP_TIMEOUT};
use crate::services::oauth_state::{self, StateError};
use crate::signin::{AuthError, AuthErrorCode, AuthService, RedirectParams, RedirectTarget};
use anyhow::Context;
use serde::Deserialize;
use validator::Validate;

/// Scope Google needs to return an ID token; always added to the request.
const OPENID_SCOPE: &str = "openid";

/// Google sign-in via the authorization-code redirect flow.
pub struct GoogleAuthService {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    auth_url: String,
    token_url: String,
    redirect_uri: String,
    state_key: Vec<u8>,
    verifier: GoogleIdTokenVerifier,
}

/// Token endpoint success response. Only the ID token is used.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: Option<String>,
}

/// Token endpoint error response.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl GoogleAuthService {
    pub fn new(config: &Config, verifier: GoogleIdTokenVerifier) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .context("failed building Google OAuth HTTP client")?;

        Ok(Self {
            http,
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            auth_url: config.google_auth_url.clone(),
            token_url: config.google_token_url.clone(),
            redirect_uri: config.redirect_uri(),
            state_key: config.oauth_state_key.clone(),
            verifier,
        })
    }

    /// Build the provider authorization URL.
    fn authorization_url(&self, scopes: &[&str], state: &str) -> String {
        let mut all_scopes = vec![OPENID_SCOPE];
        all_scopes.extend(scopes.iter().copied().filter(|s| *s != OPENID_SCOPE));

        format!(
            "{}?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope={}&\
             state={}&\
             prompt=select_account",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&all_scopes.join(" ")),
            state
        )
    }

    /// Exchange an authorization code for an ID token.
    async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        tracing::info!("Exchanging authorization code for tokens");

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Token request failed");
                AuthError::bare(AuthErrorCode::Network)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(token_error(status, &body));
        }

        let tokens: TokenResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Invalid token response");
            AuthError::bare(AuthErrorCode::Provider)
        })?;

        tokens
            .id_token
            .ok_or_else(|| AuthError::new(AuthErrorCode::Provider, "Google did not return an ID token"))
    }

    /// Check the returned state against the key and the browser nonce.
    fn check_state(&self, params: &RedirectParams) -> Result<(), AuthError> {
        let invalid = || {
            AuthError::new(
                AuthErrorCode::InvalidState,
                "Your sign-in session expired. Please try again.",
            )
        };

        let state = params.state.as_deref().ok_or_else(|| {
            tracing::warn!("Redirect result without state parameter");
            invalid()
        })?;

        let now = oauth_state::now_millis().map_err(state_error)?;
        let nonce = oauth_state::verify_state(state, &self.state_key, now).map_err(|e| {
            tracing::warn!(error = %e, "Rejected OAuth state");
            invalid()
        })?;

        match params.browser_nonce.as_deref() {
            Some(browser_nonce) if oauth_state::nonces_match(browser_nonce, &nonce) => Ok(()),
            _ => {
                tracing::warn!("OAuth state not bound to this browser");
                Err(invalid())
            }
        }
    }
}

impl AuthService for GoogleAuthService {
    async fn begin_redirect_sign_in(&self, scopes: &[&str]) -> Result<RedirectTarget, AuthError> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(AuthError::new(
                AuthErrorCode::Configuration,
                "Google sign-in is not configured.",
            ));
        }

        let nonce = oauth_state::new_nonce().map_err(state_error)?;
        let issued_at = oauth_state::now_millis().map_err(state_error)?;
        let state =
            oauth_state::sign_state(&nonce, issued_at, &self.state_key).map_err(state_error)?;

        tracing::info!(
            client_id = %self.client_id,
            redirect_uri = %self.redirect_uri,
            "Redirecting to Google"
        );

        Ok(RedirectTarget {
            url: self.authorization_url(scopes, &state),
            nonce,
        })
    }

    async fn pending_redirect_outcome(
        &self,
        params: &RedirectParams,
    ) -> Result<Option<Identity>, AuthError> {
        if !params.is_pending() {
            return Ok(None);
        }

        params.validate().map_err(|e| {
            tracing::warn!(error = %e, "Malformed redirect parameters");
            AuthError::bare(AuthErrorCode::InvalidRequest)
        })?;

        if let Some(error) = params.error.as_deref() {
            tracing::warn!(error, "OAuth error from Google");
            let err = AuthError::from_redirect_error(error, params.error_description.as_deref());
            if err.is_cancelled() {
                return Err(err);
            }
            // Only a redirect this browser started may show provider text.
            self.check_state(params)?;
            return Err(err);
        }

        self.check_state(params)?;

        let code = params
            .code
            .as_deref()
            .ok_or_else(|| AuthError::bare(AuthErrorCode::InvalidRequest))?;

        let id_token = self.exchange_code(code).await?;

        let identity = self
            .verifier
            .verify_id_token(&id_token)
            .await
            .map_err(|e| match e {
                OidcError::Forbidden(msg) => {
                    tracing::error!(error = %msg, "ID token rejected");
                    AuthError::bare(AuthErrorCode::InvalidToken)
                }
                OidcError::Transient(msg) => {
                    tracing::error!(error = %msg, "ID token keys unavailable");
                    AuthError::bare(AuthErrorCode::Network)
                }
            })?;

        Ok(Some(identity))
    }
}

/// Map a rejected token exchange to an error; logs only the error code.
fn token_error(status: reqwest::StatusCode, body: &str) -> AuthError {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(err) => {
            tracing::warn!(status = %status, error = %err.error, "Token exchange rejected");
            AuthError {
                code: AuthErrorCode::Provider,
                message: err.error_description.or(Some(err.error)),
            }
        }
        Err(_) => {
            tracing::warn!(status = %status, "Token exchange rejected with unreadable body");
            AuthError::bare(AuthErrorCode::Provider)
        }
    }
}

fn state_error(e: StateError) -> AuthError {
    tracing::error!(error = %e, "OAuth state failure");
    AuthError::bare(AuthErrorCode::Internal)
}
