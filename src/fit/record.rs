// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fixed-size record construction.

/// First byte of every record (normal header, definition style).
pub const RECORD_HEADER: u8 = 0x40;

/// Message type codes carried in the second record byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    FileId = 0x00,
    Workout = 0x1A,
    Session = 0x12,
    Activity = 0x22,
}

impl MessageType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Zero-filled record of exactly `N` bytes with little-endian field writers.
///
/// The size is part of the type, so a record can never come out longer or
/// shorter than its documented layout. Writes past the end are a layout bug
/// and panic.
#[derive(Debug, Clone)]
pub struct RecordBuilder<const N: usize> {
    buf: [u8; N],
}

impl<const N: usize> RecordBuilder<N> {
    /// Start a record with its two-byte record header already written.
    pub fn new(message: MessageType) -> Self {
        debug_assert!(N >= 2, "record must fit its own header");
        let mut buf = [0u8; N];
        buf[0] = RECORD_HEADER;
        buf[1] = message.code();
        Self { buf }
    }

    pub fn u8(mut self, offset: usize, value: u8) -> Self {
        self.put(offset, &[value]);
        self
    }

    pub fn u16_le(mut self, offset: usize, value: u16) -> Self {
        self.put(offset, &value.to_le_bytes());
        self
    }

    pub fn u32_le(mut self, offset: usize, value: u32) -> Self {
        self.put(offset, &value.to_le_bytes());
        self
    }

    pub fn bytes(mut self, offset: usize, value: &[u8]) -> Self {
        self.put(offset, value);
        self
    }

    pub fn finish(self) -> [u8; N] {
        self.buf
    }

    fn put(&mut self, offset: usize, value: &[u8]) {
        debug_assert!(offset >= 2, "offset {offset} overwrites the record header");
        debug_assert!(
            offset + value.len() <= N,
            "field at {offset}..{} overruns {N}-byte record",
            offset + value.len()
        );
        self.buf[offset..offset + value.len()].copy_from_slice(value);
    }
}
