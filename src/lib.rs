// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Redirect sign-in: Google sign-in for a small web app
//!
//! This crate serves the sign-in page, drives Google's redirect-based
//! OAuth flow and provisions a profile record in Firestore on first
//! sign-in.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pages;
pub mod routes;
pub mod services;
pub mod signin;
pub mod time_utils;

#[cfg(test)]
mod test_utils;

use config::Config;
use db::FirestoreDb;
use pages::Pages;
use services::GoogleAuthService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub auth: GoogleAuthService,
    pub pages: Pages,
}
