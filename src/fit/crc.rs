// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CRC-16 used for both the header checksum and the trailing file checksum.
//!
//! The update step is a byte-at-a-time shift/xor recipe seeded at zero. It
//! must stay bit-for-bit as written: a table-driven CRC-16 with a "matching"
//! polynomial is not guaranteed to reproduce the files already in the wild.

/// Incremental CRC-16 state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Crc16 {
    state: u16,
}

impl Crc16 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a single byte.
    pub fn update_byte(&mut self, byte: u8) {
        let mut crc = self.state;
        crc = (crc >> 8) | (crc << 8);
        crc ^= u16::from(byte);
        crc ^= (crc & 0xFF) >> 4;
        // u16 shifts drop the high bits, which is the 16-bit truncation we need.
        crc ^= (crc << 8) << 4;
        crc ^= ((crc & 0xFF) << 4) << 1;
        self.state = crc;
    }

    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.update_byte(byte);
        }
    }

    pub fn finish(&self) -> u16 {
        self.state
    }
}

/// CRC-16 of a complete buffer.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update(data);
    crc.finish()
}
