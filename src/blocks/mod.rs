// src/blocks/mod.rs

// ============================================================================
// Format Constants
// ============================================================================
// Fixed sizes for the Open Ephys continuous layout, version 0.4. Every data
// block occupies the same number of bytes on disk; only the count of valid
// samples inside the final block may vary.

/// Text header size (1024 bytes) - `key = value;` fields at offset 0.
pub const HEADER_N_BYTES: usize = 1024;

/// Number of sample slots in every data block.
pub const SAMPLES_PER_BLOCK: usize = 1024;

/// Data block header size (12 bytes): i64 timestamp, u16 count, u16 recording number.
pub(crate) const BLOCK_HEADER_N_BYTES: usize = 12;

/// Data block payload size: `SAMPLES_PER_BLOCK` big-endian i16 ADC codes.
pub(crate) const BLOCK_BODY_N_BYTES: usize = SAMPLES_PER_BLOCK * 2;

/// Trailing marker closing every data block.
pub const END_MARKER: [u8; 10] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 255];

/// Total data block size (2070 bytes): header + payload + trailing marker.
pub const BLOCK_N_BYTES: usize = BLOCK_HEADER_N_BYTES + BLOCK_BODY_N_BYTES + END_MARKER.len();

// ============================================================================
// Submodules
// ============================================================================

mod common;
mod data_block;
mod header;

pub use data_block::{BlockHeader, DecodedBlock};
pub use header::{ContinuousHeader, FORMAT_MAGIC, SUPPORTED_VERSION};
