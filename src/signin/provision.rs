// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Create-once profile provisioning.

use crate::db::ProfileStore;
use crate::error::AppError;
use crate::models::{Identity, ProfileRecord};
use chrono::{DateTime, Utc};

/// What provisioning did for an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    Created,
    AlreadyExists,
}

/// Ensure a profile record exists for `identity`.
///
/// Existing records are never written.
pub async fn provision_profile<S: ProfileStore>(
    store: &S,
    identity: &Identity,
    now: DateTime<Utc>,
) -> Result<Provisioned, AppError> {
    if store.exists(&identity.uid).await? {
        tracing::debug!(uid = %identity.uid, "Profile already exists");
        return Ok(Provisioned::AlreadyExists);
    }

    let record = ProfileRecord::from_identity(identity, now);
    store.create(&identity.uid, &record).await?;

    tracing::info!(uid = %identity.uid, "Created profile");
    Ok(Provisioned::Created)
}
