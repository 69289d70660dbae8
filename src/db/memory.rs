// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory profile store for tests and local runs without Firestore.

use crate::db::ProfileStore;
use crate::error::AppError;
use crate::models::ProfileRecord;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Profile store backed by a `DashMap`, with switchable failure injection.
#[derive(Clone, Default)]
pub struct MemoryProfileStore {
    profiles: Arc<DashMap<String, ProfileRecord>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile directly, bypassing the write counter.
    pub fn insert(&self, uid: impl Into<String>, profile: ProfileRecord) {
        self.profiles.insert(uid.into(), profile);
    }

    /// Make every read fail as if permission were denied.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail as if permission were denied.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of documents written through `create`.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    fn check_reads(&self) -> Result<(), AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Database(
                "Missing or insufficient permissions".to_string(),
            ));
        }
        Ok(())
    }
}

impl ProfileStore for MemoryProfileStore {
    async fn exists(&self, uid: &str) -> Result<bool, AppError> {
        self.check_reads()?;
        Ok(self.profiles.contains_key(uid))
    }

    async fn create(&self, uid: &str, profile: &ProfileRecord) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database(
                "Missing or insufficient permissions".to_string(),
            ));
        }

        if let Entry::Vacant(entry) = self.profiles.entry(uid.to_string()) {
            entry.insert(profile.clone());
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn get(&self, uid: &str) -> Result<Option<ProfileRecord>, AppError> {
        self.check_reads()?;
        Ok(self.profiles.get(uid).map(|p| p.value().clone()))
    }
}
