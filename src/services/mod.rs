// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod fit_files;
pub mod fit_storage;

pub use fit_files::{FitFileService, FitServiceError};
pub use fit_storage::{FitStorage, StorageError, SweepReport};
