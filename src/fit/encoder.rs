// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout summary FIT file encoder.
//!
//! Layout: 14-byte header, four fixed-size records, 2-byte trailing CRC.
//! Every multi-byte field is little-endian.

use super::crc::crc16;
use super::record::{MessageType, RecordBuilder};
use crate::models::WorkoutDescriptor;
use crate::time_utils::{to_fit_timestamp, Clock, SystemClock};
use chrono::{DateTime, Utc};

pub const HEADER_SIZE: usize = 14;
pub const PROTOCOL_VERSION: u8 = 0x10;
pub const PROFILE_VERSION: u16 = 2067;
pub const DATA_TYPE_TAG: [u8; 4] = *b".FIT";
pub const CRC_SIZE: usize = 2;

pub const FILE_ID_RECORD_SIZE: usize = 20;
pub const WORKOUT_RECORD_SIZE: usize = 30;
pub const SESSION_RECORD_SIZE: usize = 50;
pub const ACTIVITY_RECORD_SIZE: usize = 20;
pub const RECORDS_SIZE: usize =
    FILE_ID_RECORD_SIZE + WORKOUT_RECORD_SIZE + SESSION_RECORD_SIZE + ACTIVITY_RECORD_SIZE;

pub const FILE_TYPE_ACTIVITY: u8 = 4;
pub const MANUFACTURER_DEVELOPMENT: u16 = 255;
pub const PRODUCT_UNKNOWN: u16 = 0;
pub const SERIAL_NUMBER: u32 = 12345;
pub const SPORT_RUNNING: u8 = 1;
pub const EVENT_TRIGGER_MANUAL: u8 = 0;
pub const ACTIVITY_TYPE_MANUAL: u8 = 0;

/// Longest title stored in the workout record (the 16th byte stays NUL).
pub const MAX_TITLE_LEN: usize = 15;

/// Byte offset of the creation timestamp inside the file-id record.
pub const FILE_ID_TIME_CREATED_OFFSET: usize = 11;

/// Encode a workout using the wall clock for "now".
pub fn encode(workout: &WorkoutDescriptor) -> Vec<u8> {
    encode_with_clock(workout, &SystemClock)
}

/// Encode a workout into a complete FIT file.
///
/// The clock is read once; that instant is the file creation time and stands
/// in for a missing `scheduled_date`.
pub fn encode_with_clock<C: Clock + ?Sized>(workout: &WorkoutDescriptor, clock: &C) -> Vec<u8> {
    let now = clock.now();
    let records = encode_records(workout, now);
    let header = build_header(records.len() as u32);

    let mut file = Vec::with_capacity(HEADER_SIZE + records.len() + CRC_SIZE);
    file.extend_from_slice(&header);
    file.extend_from_slice(&records);
    let file_crc = crc16(&file);
    file.extend_from_slice(&file_crc.to_le_bytes());

    tracing::debug!(
        workout_id = %workout.id,
        bytes = file.len(),
        crc = file_crc,
        "Encoded FIT file"
    );
    file
}

/// Build the 14-byte file header for a record section of `data_size` bytes.
pub fn build_header(data_size: u32) -> [u8; HEADER_SIZE] {
    let mut header = [0u8; HEADER_SIZE];
    header[0] = HEADER_SIZE as u8;
    header[1] = PROTOCOL_VERSION;
    header[2..4].copy_from_slice(&PROFILE_VERSION.to_le_bytes());
    header[4..8].copy_from_slice(&data_size.to_le_bytes());
    header[8..12].copy_from_slice(&DATA_TYPE_TAG);
    let header_crc = crc16(&header[..12]);
    header[12..14].copy_from_slice(&header_crc.to_le_bytes());
    header
}

fn encode_records(workout: &WorkoutDescriptor, now: DateTime<Utc>) -> Vec<u8> {
    let start = to_fit_timestamp(workout.scheduled_date.unwrap_or(now));

    let mut records = Vec::with_capacity(RECORDS_SIZE);
    records.extend_from_slice(&file_id_record(now));
    records.extend_from_slice(&workout_record(&workout.title));
    records.extend_from_slice(&session_record(workout, start));
    records.extend_from_slice(&activity_record(workout, start));
    debug_assert_eq!(records.len(), RECORDS_SIZE);
    records
}

fn file_id_record(created: DateTime<Utc>) -> [u8; FILE_ID_RECORD_SIZE] {
    RecordBuilder::new(MessageType::FileId)
        .u8(2, FILE_TYPE_ACTIVITY)
        .u16_le(3, MANUFACTURER_DEVELOPMENT)
        .u16_le(5, PRODUCT_UNKNOWN)
        .u32_le(7, SERIAL_NUMBER)
        .u32_le(FILE_ID_TIME_CREATED_OFFSET, to_fit_timestamp(created))
        .finish()
}

fn workout_record(title: &str) -> [u8; WORKOUT_RECORD_SIZE] {
    RecordBuilder::new(MessageType::Workout)
        .bytes(2, truncate_title(title).as_bytes())
        .u8(18, SPORT_RUNNING)
        .finish()
}

fn session_record(workout: &WorkoutDescriptor, start: u32) -> [u8; SESSION_RECORD_SIZE] {
    let mut record = RecordBuilder::<SESSION_RECORD_SIZE>::new(MessageType::Session)
        .u32_le(2, start)
        .u32_le(6, workout.duration_millis());
    if let Some(centimeters) = workout.distance_centimeters() {
        record = record.u32_le(10, centimeters);
    }
    record
        .u8(14, SPORT_RUNNING)
        .u8(15, EVENT_TRIGGER_MANUAL)
        .finish()
}

fn activity_record(workout: &WorkoutDescriptor, timestamp: u32) -> [u8; ACTIVITY_RECORD_SIZE] {
    RecordBuilder::new(MessageType::Activity)
        .u32_le(2, timestamp)
        .u32_le(6, workout.duration_millis())
        .u8(10, ACTIVITY_TYPE_MANUAL)
        .finish()
}

/// First 15 characters of the title, further cut to 15 bytes on a character
/// boundary so multi-byte text never spills into the sport field.
pub fn truncate_title(title: &str) -> &str {
    let mut end = 0;
    for (count, (idx, ch)) in title.char_indices().enumerate() {
        if count == MAX_TITLE_LEN || idx + ch.len_utf8() > MAX_TITLE_LEN {
            break;
        }
        end = idx + ch.len_utf8();
    }
    &title[..end]
}
