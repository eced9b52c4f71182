// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FIT file generation for planned workouts.

use crate::fit;
use crate::models::{GeneratedFitFile, WorkoutDescriptor};
use crate::services::fit_storage::{max_age_from_hours, FitStorage, StorageError, SweepReport};
use crate::time_utils::{Clock, SystemClock};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Route prefix for stored file downloads.
pub const DOWNLOAD_URL_PREFIX: &str = "/api/fit/download/";

/// Storage key for a workout's file generated at `created_at`.
pub fn file_name_for(workout_id: &str, created_at: DateTime<Utc>) -> String {
    format!("workout_{}_{}.fit", workout_id, created_at.timestamp_millis())
}

/// Attachment name for a download: the title with anything outside
/// `[A-Za-z0-9]` replaced by `_`.
pub fn download_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}.fit")
}

/// Errors surfaced to the workout routes.
#[derive(Debug, thiserror::Error)]
pub enum FitServiceError {
    #[error("Failed to generate FIT file")]
    Generate(#[source] StorageError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Encodes workouts and keeps the resulting files in [`FitStorage`].
#[derive(Clone)]
pub struct FitFileService {
    storage: FitStorage,
    clock: Arc<dyn Clock>,
}

impl FitFileService {
    pub fn new(storage: FitStorage) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: FitStorage, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    pub fn storage(&self) -> &FitStorage {
        &self.storage
    }

    /// Encode a workout, store it under a fresh name and return where it lives.
    pub async fn generate(
        &self,
        workout: &WorkoutDescriptor,
    ) -> Result<GeneratedFitFile, FitServiceError> {
        let data = fit::encode_with_clock(workout, self.clock.as_ref());
        let file_name = file_name_for(&workout.id, self.clock.now());

        let path = self
            .storage
            .store(&file_name, &data)
            .await
            .map_err(|e| {
                tracing::error!(workout_id = %workout.id, error = %e, "FIT file generation error");
                FitServiceError::Generate(e)
            })?;

        tracing::info!(
            workout_id = %workout.id,
            file = %file_name,
            bytes = data.len(),
            "Generated FIT file"
        );

        Ok(GeneratedFitFile {
            url: format!("{DOWNLOAD_URL_PREFIX}{file_name}"),
            file_name,
            path,
        })
    }

    /// Read a previously generated file by name.
    pub async fn read(&self, file_name: &str) -> Result<Vec<u8>, FitServiceError> {
        Ok(self.storage.retrieve(file_name).await?)
    }

    /// Delete a generated file; failures are only logged.
    pub async fn delete(&self, file_name: &str) {
        self.storage.remove(file_name).await;
    }

    /// Remove generated files older than `max_age_hours`.
    pub async fn cleanup(&self, max_age_hours: u64) -> SweepReport {
        self.storage
            .sweep_at(self.clock.now(), max_age_from_hours(max_age_hours))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_utils::FixedClock;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn workout() -> WorkoutDescriptor {
        WorkoutDescriptor {
            id: "64a1f0c2".to_string(),
            title: "Long Run: 90'".to_string(),
            duration_minutes: 90,
            distance_km: Some(16.0),
            scheduled_date: None,
            workout_type: "long".to_string(),
            intensity: "low".to_string(),
        }
    }

    fn fixed_service(dir: &std::path::Path) -> FitFileService {
        let now = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
        FitFileService::with_clock(FitStorage::new(dir), Arc::new(FixedClock(now)))
    }

    #[test]
    fn test_file_name_for() {
        let created = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let name = file_name_for("64a1f0c2", created);
        assert_eq!(name, "workout_64a1f0c2_1700000000123.fit");
        assert!(crate::services::fit_storage::is_valid_file_name(&name));
    }

    #[test]
    fn test_download_name() {
        assert_eq!(download_name("Long Run: 90'"), "Long_Run__90_.fit");
        assert_eq!(download_name("Fartlek"), "Fartlek.fit");
        assert_eq!(download_name("../x"), "___x.fit");
    }

    #[tokio::test]
    async fn test_generate_stores_file() {
        let temp = TempDir::new().unwrap();
        let service = fixed_service(temp.path());

        let generated = service.generate(&workout()).await.unwrap();

        assert_eq!(generated.file_name, "workout_64a1f0c2_1700000000000.fit");
        assert_eq!(
            generated.url,
            "/api/fit/download/workout_64a1f0c2_1700000000000.fit"
        );
        assert!(generated.path.exists());

        let data = service.read(&generated.file_name).await.unwrap();
        assert_eq!(data, fit::encode_with_clock(&workout(), service.clock.as_ref()));
        assert!(fit::decode_header(&data).is_ok());
    }

    #[tokio::test]
    async fn test_generate_write_failure() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let service = fixed_service(&blocker);

        let err = service.generate(&workout()).await.unwrap_err();
        assert!(matches!(err, FitServiceError::Generate(_)));
        assert_eq!(err.to_string(), "Failed to generate FIT file");
    }

    #[tokio::test]
    async fn test_delete_then_read_not_found() {
        let temp = TempDir::new().unwrap();
        let service = fixed_service(temp.path());
        let generated = service.generate(&workout()).await.unwrap();

        service.delete(&generated.file_name).await;

        let err = service.read(&generated.file_name).await.unwrap_err();
        assert!(matches!(
            err,
            FitServiceError::Storage(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cleanup_uses_service_clock() {
        let temp = TempDir::new().unwrap();
        // Files written today are years old to a clock set in 2030.
        let later = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let service =
            FitFileService::with_clock(FitStorage::new(temp.path()), Arc::new(FixedClock(later)));
        service.storage().store("workout_ab_1.fit", b"x").await.unwrap();

        let report = service.cleanup(24).await;
        assert_eq!(report.removed, 1);
    }
}
