// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Generated and stored FIT file records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Reference to a freshly generated and stored FIT file.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFitFile {
    /// Storage key (`workout_<id>_<millis>.fit`)
    pub file_name: String,
    /// Location on disk
    #[serde(skip)]
    pub path: PathBuf,
    /// Download URL relative to the API root
    pub url: String,
}

/// A file found in the managed FIT directory.
#[derive(Debug, Clone)]
pub struct StoredFileEntry {
    pub name: String,
    pub size: u64,
    /// Last modification time, set when the file was written
    pub modified_at: DateTime<Utc>,
}
