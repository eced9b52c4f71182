// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Structural validation of encoded files.

use super::crc::crc16;
use super::encoder::{CRC_SIZE, DATA_TYPE_TAG, HEADER_SIZE};

/// Parsed file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitHeader {
    pub header_size: u8,
    pub protocol_version: u8,
    pub profile_version: u16,
    /// Byte length of the record section
    pub data_size: u32,
    pub header_crc: u16,
}

/// Ways an encoded file can fail structural checks.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FitFormatError {
    #[error("File too short: {0} bytes")]
    TooShort(usize),

    #[error("Unexpected header size {0}")]
    HeaderSize(u8),

    #[error("Missing .FIT data type tag")]
    MissingTag,

    #[error("Header CRC mismatch: stored {stored:#06x}, computed {computed:#06x}")]
    HeaderCrc { stored: u16, computed: u16 },

    #[error("Data size {declared} does not match record section of {actual} bytes")]
    DataSize { declared: u32, actual: usize },

    #[error("File CRC mismatch: stored {stored:#06x}, computed {computed:#06x}")]
    FileCrc { stored: u16, computed: u16 },
}

/// Parse the header and check both checksums and the declared data size.
pub fn decode_header(bytes: &[u8]) -> Result<FitHeader, FitFormatError> {
    if bytes.len() < HEADER_SIZE + CRC_SIZE {
        return Err(FitFormatError::TooShort(bytes.len()));
    }

    let header_size = bytes[0];
    if usize::from(header_size) != HEADER_SIZE {
        return Err(FitFormatError::HeaderSize(header_size));
    }
    if bytes[8..12] != DATA_TYPE_TAG {
        return Err(FitFormatError::MissingTag);
    }

    let header_crc = u16::from_le_bytes([bytes[12], bytes[13]]);
    let computed = crc16(&bytes[..12]);
    if header_crc != computed {
        return Err(FitFormatError::HeaderCrc {
            stored: header_crc,
            computed,
        });
    }

    let data_size = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let actual = bytes.len() - HEADER_SIZE - CRC_SIZE;
    if usize::try_from(data_size).ok() != Some(actual) {
        return Err(FitFormatError::DataSize {
            declared: data_size,
            actual,
        });
    }

    let (body, trailer) = bytes.split_at(bytes.len() - CRC_SIZE);
    let stored = u16::from_le_bytes([trailer[0], trailer[1]]);
    let computed = crc16(body);
    if stored != computed {
        return Err(FitFormatError::FileCrc { stored, computed });
    }

    Ok(FitHeader {
        header_size,
        protocol_version: bytes[1],
        profile_version: u16::from_le_bytes([bytes[2], bytes[3]]),
        data_size,
        header_crc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::encoder::{encode_with_clock, PROFILE_VERSION, PROTOCOL_VERSION, RECORDS_SIZE};
    use crate::models::WorkoutDescriptor;
    use crate::time_utils::FixedClock;
    use chrono::{TimeZone, Utc};

    fn sample() -> Vec<u8> {
        let workout = WorkoutDescriptor {
            id: "ab12".to_string(),
            title: "Hill Repeats".to_string(),
            duration_minutes: 50,
            distance_km: None,
            scheduled_date: None,
            workout_type: "interval".to_string(),
            intensity: "high".to_string(),
        };
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 2, 29, 18, 0, 0).unwrap());
        encode_with_clock(&workout, &clock)
    }

    #[test]
    fn test_decode_encoded_file() {
        let header = decode_header(&sample()).expect("encoded file should validate");
        assert_eq!(header.header_size, 14);
        assert_eq!(header.protocol_version, PROTOCOL_VERSION);
        assert_eq!(header.profile_version, PROFILE_VERSION);
        assert_eq!(header.data_size as usize, RECORDS_SIZE);
    }

    #[test]
    fn test_too_short() {
        assert_eq!(decode_header(&[14, 0x10]), Err(FitFormatError::TooShort(2)));
    }

    #[test]
    fn test_bad_tag() {
        let mut bytes = sample();
        bytes[9] = b'X';
        assert_eq!(decode_header(&bytes), Err(FitFormatError::MissingTag));
    }

    #[test]
    fn test_corrupt_header_crc() {
        let mut bytes = sample();
        bytes[2] ^= 0xFF;
        assert!(matches!(
            decode_header(&bytes),
            Err(FitFormatError::HeaderCrc { .. })
        ));
    }

    #[test]
    fn test_truncated_records() {
        let mut bytes = sample();
        bytes.remove(40);
        assert!(matches!(
            decode_header(&bytes),
            Err(FitFormatError::DataSize { .. })
        ));
    }

    #[test]
    fn test_corrupt_payload() {
        let mut bytes = sample();
        bytes[40] ^= 0x01;
        assert!(matches!(
            decode_header(&bytes),
            Err(FitFormatError::FileCrc { .. })
        ));
    }
}
