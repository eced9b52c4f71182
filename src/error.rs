// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::services::{FitServiceError, StorageError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<FitServiceError> for AppError {
    fn from(err: FitServiceError) -> Self {
        match err {
            FitServiceError::Generate(e) => {
                tracing::error!(error = %e, "FIT file generation failed");
                AppError::Storage("Failed to generate FIT file".to_string())
            }
            FitServiceError::Storage(StorageError::InvalidName(_)) => {
                AppError::BadRequest("Invalid filename".to_string())
            }
            FitServiceError::Storage(StorageError::NotFound(_)) => {
                AppError::NotFound("FIT file not found".to_string())
            }
            FitServiceError::Storage(e @ StorageError::Write { .. }) => {
                tracing::error!(error = %e, "FIT file write failed");
                AppError::Storage("Failed to store FIT file".to_string())
            }
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    Some(msg.clone()),
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
