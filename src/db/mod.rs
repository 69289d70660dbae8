// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore, plus an in-memory store for tests).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryProfileStore;

use crate::error::AppError;
use crate::models::ProfileRecord;
use std::future::Future;

/// Collection names as constants.
pub mod collections {
    /// Profile records keyed by identity uid
    pub const USERS: &str = "Users";
}

/// Document storage for profile records.
pub trait ProfileStore: Send + Sync {
    /// Whether a profile document exists for `uid`.
    fn exists(&self, uid: &str) -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Create the profile document for `uid`.
    ///
    /// Never overwrites: if a document appeared since the caller's
    /// existence check, the stored document is left untouched and this
    /// still returns `Ok`.
    fn create(
        &self,
        uid: &str,
        profile: &ProfileRecord,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Fetch the profile document for `uid`.
    fn get(&self, uid: &str) -> impl Future<Output = Result<Option<ProfileRecord>, AppError>> + Send;
}
