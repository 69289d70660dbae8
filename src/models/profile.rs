// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity and profile models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated user as reported by the identity provider.
///
/// Read-only for this application; built from verified ID token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Provider-issued unique identifier (`sub` claim)
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Profile document stored in the `Users` collection, keyed by `Identity::uid`.
///
/// Created once on first sign-in and never rewritten by the sign-in flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub photo: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    /// Build the initial profile for an identity.
    pub fn from_identity(identity: &Identity, now: DateTime<Utc>) -> Self {
        let (first_name, last_name) = split_display_name(identity.display_name.as_deref());

        Self {
            email: identity.email.clone(),
            first_name,
            last_name,
            photo: identity.photo_url.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Split a display name into `(first_name, last_name)`.
///
/// The first whitespace-delimited token is the first name; the remaining
/// tokens joined by single spaces are the last name.
pub fn split_display_name(display_name: Option<&str>) -> (String, String) {
    let mut tokens = display_name.unwrap_or_default().split_whitespace();
    let first = tokens.next().unwrap_or_default().to_string();
    let rest = tokens.collect::<Vec<_>>().join(" ");
    (first, rest)
}

/// Profile as returned by `GET /api/me`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub uid: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub photo: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ProfileResponse {
    pub fn new(uid: impl Into<String>, record: ProfileRecord) -> Self {
        Self {
            uid: uid.into(),
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            photo: record.photo,
            created_at: crate::time_utils::format_utc_rfc3339(record.created_at),
            updated_at: crate::time_utils::format_utc_rfc3339(record.updated_at),
        }
    }
}
