// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Redirect sign-in server
//!
//! Serves the Google sign-in page and provisions user profiles in Firestore.

use redirect_signin::{
    config::Config,
    db::FirestoreDb,
    pages::Pages,
    services::{GoogleAuthService, GoogleIdTokenVerifier},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        public_url = %config.public_url,
        "Starting redirect sign-in server"
    );

    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    let verifier = GoogleIdTokenVerifier::new(&config.google_client_id)?;
    let auth = GoogleAuthService::new(&config, verifier)?;
    let pages = Pages::new()?;

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        auth,
        pages,
    });

    let app = redirect_signin::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("redirect_signin=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();

    Ok(())
}
