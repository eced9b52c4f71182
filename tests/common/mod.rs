// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request},
};
use chrono::{TimeZone, Utc};
use runcoach_fit::config::Config;
use runcoach_fit::middleware::auth::create_jwt;
use runcoach_fit::routes::create_router;
use runcoach_fit::services::{FitFileService, FitStorage};
use runcoach_fit::time_utils::FixedClock;
use runcoach_fit::AppState;
use std::sync::Arc;
use tempfile::TempDir;

/// Instant the test clock is frozen at (1700000000000 ms since Unix epoch).
#[allow(dead_code)]
pub fn test_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()
}

/// Create a test app whose FIT files live in a fresh temporary directory.
/// Keep the returned `TempDir` alive for the duration of the test.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, TempDir) {
    let temp = TempDir::new().expect("Failed to create temp dir");

    let mut config = Config::test_default();
    config.fit_files_dir = temp.path().join("fit-files");

    let storage = FitStorage::new(&config.fit_files_dir);
    let fit_service = FitFileService::with_clock(storage, Arc::new(FixedClock(test_now())));

    let state = Arc::new(AppState {
        config,
        fit_service,
    });

    (create_router(state.clone()), state, temp)
}

/// Create a session token for `user_id`.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, signing_key).expect("Failed to create JWT")
}

/// Authenticated request builder.
#[allow(dead_code)]
pub fn authed_request(method: &str, uri: &str, state: &AppState, body: Body) -> Request<Body> {
    let token = create_test_jwt("64b2c0ffee", &state.config.jwt_signing_key);
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap()
}
