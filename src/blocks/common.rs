// blocks/common.rs
//! Byte parsing helpers shared by the block and header parsers.
//!
//! All multi-byte fields in the continuous format are big-endian, so the
//! helpers here decode network byte order into native values.

use crate::{Error, Result};

/// Read an i64 from a byte slice at the given offset (big-endian).
///
/// # Panics
/// Panics if `offset + 8 > bytes.len()`; callers validate sizes first.
#[inline]
pub fn read_i64_be(bytes: &[u8], offset: usize) -> i64 {
    i64::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
        bytes[offset + 4],
        bytes[offset + 5],
        bytes[offset + 6],
        bytes[offset + 7],
    ])
}

/// Read a u16 from a byte slice at the given offset (big-endian).
#[inline]
pub fn read_u16_be(bytes: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([bytes[offset], bytes[offset + 1]])
}

/// Read an i16 from a byte slice at the given offset (big-endian).
#[inline]
pub fn read_i16_be(bytes: &[u8], offset: usize) -> i16 {
    i16::from_be_bytes([bytes[offset], bytes[offset + 1]])
}

/// Validate that a buffer has at least `expected` bytes.
///
/// Returns `Err(TooShortBuffer)` if the buffer is too small.
#[inline]
pub fn validate_buffer_size(bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() < expected {
        return Err(Error::TooShortBuffer {
            actual: bytes.len(),
            expected,
            file: file!(),
            line: line!(),
        });
    }
    Ok(())
}
