// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod fit_file;
pub mod workout;

pub use fit_file::{GeneratedFitFile, StoredFileEntry};
pub use workout::WorkoutDescriptor;
