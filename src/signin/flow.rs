// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Redirect sign-in orchestration.
//!
//! `begin` starts the provider redirect; `handle_redirect_result` runs
//! once per sign-in page load and resolves whatever the provider sent
//! back. Failures never escape: they become toasts (or nothing, when the
//! user cancelled).

use super::auth::{AuthError, AuthService, RedirectParams, RedirectTarget};
use super::notify::{Navigator, Notifier, Toast};
use super::provision::{provision_profile, Provisioned};
use crate::db::ProfileStore;
use crate::models::Identity;
use chrono::Utc;

/// Scopes requested from the provider.
pub const SIGN_IN_SCOPES: &[&str] = &["email", "profile"];
/// Where a successful sign-in lands.
pub const HOME_PATH: &str = "/";
pub const SUCCESS_MESSAGE: &str = "Successfully signed in with Google!";

/// Result of one redirect round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    NoPendingRedirect,
    SignedIn {
        identity: Identity,
        /// `None` when provisioning failed.
        provisioned: Option<Provisioned>,
    },
    Failed(AuthError),
}

/// Sign-in flow over injected collaborators.
pub struct SignInFlow<'a, A, S> {
    auth: &'a A,
    store: &'a S,
}

impl<'a, A: AuthService, S: ProfileStore> SignInFlow<'a, A, S> {
    pub fn new(auth: &'a A, store: &'a S) -> Self {
        Self { auth, store }
    }

    /// Start the redirect. Returns `None` if it could not be started.
    pub async fn begin<N: Notifier>(&self, notifier: &N) -> Option<RedirectTarget> {
        match self.auth.begin_redirect_sign_in(SIGN_IN_SCOPES).await {
            Ok(target) => Some(target),
            Err(err) => {
                report_failure(&err, notifier);
                None
            }
        }
    }

    /// Resolve a pending redirect outcome, provision the profile, then
    /// notify and navigate home.
    pub async fn handle_redirect_result<N: Notifier, V: Navigator>(
        &self,
        params: &RedirectParams,
        notifier: &N,
        navigator: &V,
    ) -> SignInOutcome {
        let identity = match self.auth.pending_redirect_outcome(params).await {
            Ok(Some(identity)) => identity,
            Ok(None) => return SignInOutcome::NoPendingRedirect,
            Err(err) => {
                report_failure(&err, notifier);
                return SignInOutcome::Failed(err);
            }
        };

        let provisioned = match provision_profile(self.store, &identity, Utc::now()).await {
            Ok(provisioned) => Some(provisioned),
            Err(e) => {
                tracing::warn!(
                    uid = %identity.uid,
                    error = %e,
                    "Could not save profile, continuing with sign-in"
                );
                None
            }
        };

        tracing::info!(uid = %identity.uid, ?provisioned, "Redirect sign-in succeeded");

        notifier.notify(Toast::success(SUCCESS_MESSAGE));
        navigator.go_to(HOME_PATH);

        SignInOutcome::SignedIn {
            identity,
            provisioned,
        }
    }

    /// Fail a redirect result that could not even be read.
    pub fn reject_redirect<N: Notifier>(&self, err: AuthError, notifier: &N) -> SignInOutcome {
        report_failure(&err, notifier);
        SignInOutcome::Failed(err)
    }
}

fn report_failure<N: Notifier>(err: &AuthError, notifier: &N) {
    if err.is_cancelled() {
        tracing::info!("Sign-in cancelled by user");
        return;
    }

    tracing::error!(code = err.code.as_str(), error = %err, "Google sign-in error");
    notifier.notify(Toast::error(err.user_message()));
}
