// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Date/time helpers: the injectable clock and FIT epoch conversion.

use chrono::{DateTime, Duration, Utc};

/// Seconds between the Unix epoch and the FIT epoch (1989-12-31T00:00:00Z).
pub const FIT_EPOCH_UNIX_SECONDS: i64 = 631_065_600;

/// Source of "now" for record construction and file naming.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant (tests, reproducible output).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The FIT epoch as a UTC timestamp.
pub fn fit_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(FIT_EPOCH_UNIX_SECONDS)
}

/// Whole seconds since the FIT epoch, rounded down.
///
/// Saturates instead of wrapping: instants before the epoch map to 0 and
/// instants after 2126-02-06 map to `u32::MAX`.
pub fn to_fit_timestamp(date: DateTime<Utc>) -> u32 {
    // `timestamp()` already floors sub-second precision toward the past.
    let seconds = date.timestamp() - FIT_EPOCH_UNIX_SECONDS;
    seconds.clamp(0, i64::from(u32::MAX)) as u32
}

/// Inverse of [`to_fit_timestamp`] for values it can produce.
pub fn from_fit_timestamp(timestamp: u32) -> DateTime<Utc> {
    fit_epoch() + Duration::seconds(i64::from(timestamp))
}
