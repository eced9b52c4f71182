// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout descriptor handed to the FIT encoder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single planned workout, as supplied by the training plan.
///
/// Field names on the wire follow the mobile client (`duration`, `distance`,
/// `scheduledDate`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDescriptor {
    /// Workout ID (hex object id); only used to name the stored file
    pub id: String,
    /// Human-readable title; the encoder keeps the first 15 characters
    pub title: String,
    /// Planned duration in minutes
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    /// Planned distance in kilometers
    #[serde(rename = "distance", default)]
    pub distance_km: Option<f64>,
    /// When the workout is scheduled; "now" at encode time if absent
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
    /// Workout type label (easy, tempo, interval, ...)
    #[serde(rename = "type", default)]
    pub workout_type: String,
    /// Intensity label (low, moderate, high, ...)
    #[serde(default)]
    pub intensity: String,
}

impl WorkoutDescriptor {
    /// Duration in milliseconds, saturating at `u32::MAX`.
    pub fn duration_millis(&self) -> u32 {
        self.duration_minutes.saturating_mul(60 * 1000)
    }

    /// Distance in centimeters, if a usable distance was given.
    ///
    /// Negative or non-finite distances are treated as absent.
    pub fn distance_centimeters(&self) -> Option<u32> {
        self.distance_km
            .filter(|km| km.is_finite() && *km >= 0.0)
            .map(|km| (km * 1000.0 * 100.0).round().min(f64::from(u32::MAX)) as u32)
    }
}
