// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FIT file routes: generate, download and cleanup.

use crate::error::{AppError, Result};
use crate::fit;
use crate::middleware::auth::AuthUser;
use crate::models::WorkoutDescriptor;
use crate::services::fit_files::download_name;
use crate::services::fit_storage::is_valid_file_name;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderName},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Response header carrying the stored file's download URL.
pub const FIT_FILE_URL_HEADER: HeaderName = HeaderName::from_static("x-fit-file-url");

const MAX_WORKOUT_ID_LEN: usize = 64;
const MAX_TITLE_CHARS: usize = 200;
const MAX_DURATION_MINUTES: u32 = 24 * 60;
const MAX_DISTANCE_KM: f64 = 1000.0;

/// FIT routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/fit/workouts", post(generate_fit_file))
        .route("/api/fit/download/{file_name}", get(download_fit_file))
        .route("/api/fit/cleanup", post(cleanup_fit_files))
}

fn validate_workout(workout: &WorkoutDescriptor) -> Result<()> {
    let bad = |msg: &str| Err(AppError::BadRequest(msg.to_string()));

    if workout.id.is_empty()
        || workout.id.len() > MAX_WORKOUT_ID_LEN
        || !workout
            .id
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    {
        return bad("Workout id must be 1-64 lowercase hex characters");
    }
    if workout.title.chars().count() > MAX_TITLE_CHARS {
        return bad("Title must be at most 200 characters");
    }
    if workout.duration_minutes == 0 || workout.duration_minutes > MAX_DURATION_MINUTES {
        return bad("Duration must be between 1 and 1440 minutes");
    }
    if let Some(km) = workout.distance_km {
        if !km.is_finite() || !(0.0..=MAX_DISTANCE_KM).contains(&km) {
            return bad("Distance must be between 0 and 1000 km");
        }
    }
    Ok(())
}

fn attachment(file_name: &str) -> String {
    format!("attachment; filename=\"{file_name}\"")
}

/// Generate a FIT file for a workout and send it back as a download.
async fn generate_fit_file(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(workout): Json<WorkoutDescriptor>,
) -> Result<impl IntoResponse> {
    validate_workout(&workout)?;

    tracing::info!(
        user_id = %user.user_id,
        workout_id = %workout.id,
        workout_type = %workout.workout_type,
        intensity = %workout.intensity,
        "Generating FIT file"
    );

    let generated = state.fit_service.generate(&workout).await?;
    let data = state.fit_service.read(&generated.file_name).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                attachment(&download_name(&workout.title)),
            ),
            (FIT_FILE_URL_HEADER, generated.url),
        ],
        data,
    ))
}

/// Download a previously generated FIT file by name.
async fn download_fit_file(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(file_name): Path<String>,
) -> Result<impl IntoResponse> {
    // Validate filename to prevent directory traversal
    if !is_valid_file_name(&file_name) {
        tracing::warn!(user_id = %user.user_id, file = %file_name, "Invalid FIT file name requested");
        return Err(AppError::BadRequest("Invalid filename".to_string()));
    }

    let data = state.fit_service.read(&file_name).await?;
    if let Err(e) = fit::decode_header(&data) {
        tracing::warn!(file = %file_name, error = %e, "Serving FIT file that fails validation");
    }

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, attachment(&file_name)),
        ],
        data,
    ))
}

/// Cleanup response.
#[derive(Serialize)]
pub struct CleanupResponse {
    pub message: String,
    pub removed: usize,
    pub kept: usize,
    pub skipped: usize,
}

/// Remove generated files older than the configured retention age.
async fn cleanup_fit_files(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<CleanupResponse> {
    tracing::info!(user_id = %user.user_id, "FIT file cleanup requested");

    let report = state
        .fit_service
        .cleanup(state.config.fit_max_age_hours)
        .await;

    Json(CleanupResponse {
        message: "FIT files cleanup completed".to_string(),
        removed: report.removed,
        kept: report.kept,
        skipped: report.skipped,
    })
}
