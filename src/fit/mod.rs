// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Minimal FIT workout file format: encoder, checksums and header checks.
//!
//! This covers a fixed four-record summary layout only, not the full FIT
//! message catalog.

pub mod crc;
pub mod encoder;
pub mod header;
pub mod record;

pub use crc::{crc16, Crc16};
pub use encoder::{encode, encode_with_clock};
pub use header::{decode_header, FitFormatError, FitHeader};
