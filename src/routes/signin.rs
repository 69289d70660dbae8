// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google sign-in routes.
//!
//! `/login` is both the sign-in page and the OAuth redirect URI: every
//! load of it resolves whatever redirect result Google sent back.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use super::cookies;
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, verify_jwt};
use crate::signin::{
    AuthError, AuthErrorCode, PageEffects, RedirectParams, SignInFlow, SignInOutcome,
};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/login", get(login_page))
        .route("/auth/google", get(begin_sign_in))
        .route("/auth/logout", get(logout))
}

/// Sign-in page; resolves a pending redirect result first.
async fn login_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    query: std::result::Result<Query<RedirectParams>, QueryRejection>,
) -> Result<Response> {
    let secure = state.config.secure_cookies();
    let flow = SignInFlow::new(&state.auth, &state.db);
    let effects = PageEffects::new();

    let (outcome, pending) = match query {
        Ok(Query(mut params)) => {
            params.browser_nonce = jar
                .get(cookies::NONCE_COOKIE)
                .map(|c| c.value().to_string());
            let outcome = flow
                .handle_redirect_result(&params, &effects, &effects)
                .await;
            (outcome, params.is_pending())
        }
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Unreadable redirect parameters");
            let err = AuthError::bare(AuthErrorCode::InvalidRequest);
            (flow.reject_redirect(err, &effects), true)
        }
    };
    let (toasts, destination) = effects.into_parts();

    // The nonce is single use; drop it once a result came back.
    let jar = if pending {
        jar.remove(cookies::nonce_removal(secure))
    } else {
        jar
    };

    if let (SignInOutcome::SignedIn { identity, .. }, Some(destination)) = (&outcome, destination)
    {
        let token = create_jwt(&identity.uid, &state.config.jwt_signing_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

        let mut jar = jar.add(cookies::session_cookie(token, secure));
        if let Some(flash) = cookies::flash_cookie(&toasts, secure) {
            jar = jar.add(flash);
        }

        return Ok((jar, Redirect::to(&destination)).into_response());
    }

    let page = state.pages.login(&toasts)?;
    Ok((jar, page).into_response())
}

/// Start Google sign-in: full-page redirect to the provider.
async fn begin_sign_in(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<Response> {
    let effects = PageEffects::new();

    match SignInFlow::new(&state.auth, &state.db).begin(&effects).await {
        Some(target) => {
            let jar = jar.add(cookies::nonce_cookie(
                target.nonce,
                state.config.secure_cookies(),
            ));
            Ok((jar, Redirect::to(&target.url)).into_response())
        }
        None => Ok(state.pages.login(&effects.toasts())?.into_response()),
    }
}

/// Home view; shows toasts flashed by the sign-in redirect.
async fn home(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<Response> {
    let secure = state.config.secure_cookies();

    let toasts = jar
        .get(cookies::FLASH_COOKIE)
        .map(|c| cookies::decode_flash(c.value()))
        .unwrap_or_default();
    let jar = if jar.get(cookies::FLASH_COOKIE).is_some() {
        jar.remove(cookies::flash_removal(secure))
    } else {
        jar
    };

    let signed_in = jar
        .get(cookies::SESSION_COOKIE)
        .and_then(|c| verify_jwt(c.value(), &state.config.jwt_signing_key))
        .is_some();

    let page = state.pages.home(&toasts, signed_in)?;
    Ok((jar, page).into_response())
}

/// Clear the session and go back to the sign-in page.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.remove(cookies::session_removal(state.config.secure_cookies()));
    (jar, Redirect::to("/login"))
}
