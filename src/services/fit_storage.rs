// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Directory-backed storage for generated FIT files.
//!
//! Files are write-once. A sweep racing with a download can make the download
//! see `NotFound`; files are regenerated on demand, so that is acceptable.

use crate::models::StoredFileEntry;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;

/// Names handed out for download: `workout_<hex id>_<millis>.fit`.
static FILE_NAME_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^workout_[a-f0-9]+_[0-9]+\.fit$").ok());

/// Check a requested file name against the download pattern.
///
/// This is the path-traversal guard: anything that could name a file outside
/// the managed directory fails the pattern.
pub fn is_valid_file_name(name: &str) -> bool {
    FILE_NAME_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(name))
}

/// A single path component that stays inside the managed directory.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Retention age as a duration; absurdly large values mean "keep forever".
pub fn max_age_from_hours(hours: u64) -> Duration {
    i64::try_from(hours)
        .ok()
        .and_then(Duration::try_hours)
        .unwrap_or(Duration::MAX)
}

/// Errors from FIT file storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid FIT file name: {0}")]
    InvalidName(String),

    #[error("FIT file not found: {0}")]
    NotFound(String),

    #[error("Failed to write FIT file {name}: {source}")]
    Write {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Outcome of a retention sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SweepReport {
    pub removed: usize,
    pub kept: usize,
    /// Entries whose age could not be determined or that could not be deleted
    pub skipped: usize,
}

/// Storage adapter rooted at an explicit directory.
#[derive(Debug, Clone)]
pub struct FitStorage {
    dir: PathBuf,
}

impl FitStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a file with this name would be stored at.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Create the managed directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Write `data` under `name`. Failures are returned once, never retried.
    pub async fn store(&self, name: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        if !is_plain_file_name(name) {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        let write_err = |source| StorageError::Write {
            name: name.to_string(),
            source,
        };
        self.ensure_dir().await.map_err(write_err)?;

        let path = self.path_for(name);
        tokio::fs::write(&path, data).await.map_err(write_err)?;

        tracing::debug!(file = %name, bytes = data.len(), "Stored FIT file");
        Ok(path)
    }

    /// Read a stored file. The name is validated before any I/O.
    pub async fn retrieve(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        if !is_valid_file_name(name) {
            tracing::warn!(file = %name, "Rejected invalid FIT file name");
            return Err(StorageError::InvalidName(name.to_string()));
        }

        tokio::fs::read(self.path_for(name)).await.map_err(|e| {
            tracing::warn!(file = %name, error = %e, "Failed to read FIT file");
            StorageError::NotFound(name.to_string())
        })
    }

    /// Delete a stored file. Failures are logged and swallowed.
    pub async fn remove(&self, name: &str) {
        self.try_remove(name).await;
    }

    async fn try_remove(&self, name: &str) -> bool {
        if !is_plain_file_name(name) {
            tracing::warn!(file = %name, "Refusing to delete file outside storage directory");
            return false;
        }

        match tokio::fs::remove_file(self.path_for(name)).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "Failed to delete FIT file");
                false
            }
        }
    }

    /// Enumerate stored files with their modification times.
    ///
    /// Entries that are not regular files, or whose metadata cannot be read,
    /// are logged and left out.
    pub async fn list(&self) -> io::Result<Vec<StoredFileEntry>> {
        let mut entries = Vec::new();
        for entry in self.scan().await? {
            match entry.modified {
                Ok(modified) => entries.push(StoredFileEntry {
                    name: entry.name,
                    size: entry.size,
                    modified_at: DateTime::<Utc>::from(modified),
                }),
                Err(e) => tracing::debug!(file = %entry.name, error = %e, "Not listing entry"),
            }
        }
        Ok(entries)
    }

    async fn scan(&self) -> io::Result<Vec<ScannedEntry>> {
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let metadata = entry.metadata().await;
            let size = metadata.as_ref().map_or(0, |m| m.len());
            entries.push(ScannedEntry {
                name,
                size,
                modified: regular_file_mtime(metadata),
            });
        }
        Ok(entries)
    }

    /// Remove files older than `max_age_hours`.
    pub async fn sweep(&self, max_age_hours: u64) -> SweepReport {
        self.sweep_at(Utc::now(), max_age_from_hours(max_age_hours))
            .await
    }

    /// Remove files whose age relative to `now` exceeds `max_age`.
    ///
    /// Never fails: an unreadable directory or entry is logged and skipped.
    pub async fn sweep_at(&self, now: DateTime<Utc>, max_age: Duration) -> SweepReport {
        let mut report = SweepReport::default();

        let entries = match self.scan().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(
                    dir = %self.dir.display(),
                    error = %e,
                    "Failed to list FIT files for cleanup"
                );
                return report;
            }
        };

        for entry in entries {
            if let Err(e) = &entry.modified {
                tracing::warn!(file = %entry.name, error = %e, "Skipping FIT storage entry");
            }
            match sweep_action(entry.modified, now, max_age) {
                SweepAction::Keep => report.kept += 1,
                SweepAction::Skip => report.skipped += 1,
                SweepAction::Remove => {
                    if self.try_remove(&entry.name).await {
                        tracing::info!(file = %entry.name, "Cleaned up old FIT file");
                        report.removed += 1;
                    } else {
                        report.skipped += 1;
                    }
                }
            }
        }

        tracing::info!(
            removed = report.removed,
            kept = report.kept,
            skipped = report.skipped,
            "FIT file cleanup finished"
        );
        report
    }
}

struct ScannedEntry {
    name: String,
    size: u64,
    modified: io::Result<SystemTime>,
}

/// Modification time of a regular file. Symlinks, directories and other
/// non-regular entries have no usable age.
fn regular_file_mtime(metadata: io::Result<Metadata>) -> io::Result<SystemTime> {
    let metadata = metadata?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }
    metadata.modified()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepAction {
    Keep,
    Remove,
    Skip,
}

/// Decide what the sweep does with one entry given its modification time.
fn sweep_action(
    modified: io::Result<SystemTime>,
    now: DateTime<Utc>,
    max_age: Duration,
) -> SweepAction {
    match modified {
        Ok(modified) if now.signed_duration_since(DateTime::<Utc>::from(modified)) > max_age => {
            SweepAction::Remove
        }
        Ok(_) => SweepAction::Keep,
        Err(_) => SweepAction::Skip,
    }
}
