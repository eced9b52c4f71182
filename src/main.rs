// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Runcoach FIT API Server
//!
//! Generates downloadable `.FIT` workout files for training plans and keeps
//! the generated files on local disk for a limited time.

use runcoach_fit::{
    config::Config,
    services::{FitFileService, FitStorage},
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Runcoach FIT API");

    // FIT file storage; a missing directory is created again on first write
    let storage = FitStorage::new(&config.fit_files_dir);
    if let Err(e) = storage.ensure_dir().await {
        tracing::error!(
            dir = %storage.dir().display(),
            error = %e,
            "Failed to create fit-files directory"
        );
    }
    tracing::info!(
        dir = %storage.dir().display(),
        max_age_hours = config.fit_max_age_hours,
        "FIT file storage initialized"
    );
    let fit_service = FitFileService::new(storage);

    if config.fit_sweep_interval_minutes > 0 {
        spawn_sweeper(
            fit_service.clone(),
            Duration::from_secs(config.fit_sweep_interval_minutes * 60),
            config.fit_max_age_hours,
        );
    }

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        fit_service,
    });

    // Build router
    let app = runcoach_fit::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically remove generated files older than `max_age_hours`.
fn spawn_sweeper(service: FitFileService, period: Duration, max_age_hours: u64) {
    tracing::info!(
        period_secs = period.as_secs(),
        max_age_hours,
        "Starting background FIT file cleanup"
    );
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            service.cleanup(max_age_hours).await;
        }
    });
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("runcoach_fit=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
