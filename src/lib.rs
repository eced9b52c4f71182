// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Runcoach FIT: workout file export for AI-generated running plans
//!
//! This crate encodes planned workouts as compact `.FIT` summary files,
//! keeps them in a managed directory, and serves them over an HTTP API.

pub mod config;
pub mod error;
pub mod fit;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::FitFileService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub fit_service: FitFileService,
}
