// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod profile;

pub use profile::{split_display_name, Identity, ProfileRecord, ProfileResponse};
