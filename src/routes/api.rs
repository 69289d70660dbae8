// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated JSON API.

use crate::db::ProfileStore;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::ProfileResponse;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(get_me))
}

/// Profile of the signed-in user.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .db
        .get(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile".to_string()))?;

    Ok(Json(ProfileResponse::new(user.uid, profile)))
}
