// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - provider integrations.

pub mod google_auth;
pub mod google_oidc;
pub mod oauth_state;

pub use google_auth::GoogleAuthService;
pub use google_oidc::{GoogleIdTokenVerifier, OidcError};
