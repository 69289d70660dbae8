// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Redirect sign-in: contracts, provisioning and the flow tying them together.

pub mod auth;
pub mod flow;
pub mod notify;
pub mod provision;

pub use auth::{
    AuthError, AuthErrorCode, AuthService, RedirectParams, RedirectTarget,
    GENERIC_FAILURE_MESSAGE,
};
pub use flow::{SignInFlow, SignInOutcome, HOME_PATH, SIGN_IN_SCOPES, SUCCESS_MESSAGE};
pub use notify::{Navigator, Notifier, PageEffects, Toast, ToastLevel, ToastPosition};
pub use provision::{provision_profile, Provisioned};
