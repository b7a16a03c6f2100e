// blocks/data_block.rs
//! Parser for the fixed-size data blocks that follow the text header.
//!
//! Every block on disk is [`BLOCK_N_BYTES`](super::BLOCK_N_BYTES) long: a
//! 12-byte header, 1024 big-endian i16 ADC codes, and a 10-byte trailing
//! marker. A block may hold fewer than 1024 *valid* samples (the header's
//! count field says how many); the format only produces such a short block
//! at the end of a file.

use super::{
    BLOCK_BODY_N_BYTES, BLOCK_HEADER_N_BYTES, BLOCK_N_BYTES, END_MARKER, SAMPLES_PER_BLOCK,
};
use crate::{
    Error, Result,
    blocks::common::{read_i16_be, read_i64_be, read_u16_be, validate_buffer_size},
};
use alloc::format;
use alloc::vec::Vec;

/// Leading fields of a data block.
///
/// Read fresh for every block visited; never cached beyond the block that
/// is currently decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockHeader {
    /// Sample index of the block's first sample within the recording.
    pub timestamp: i64,
    /// Number of valid samples in this block, at most [`SAMPLES_PER_BLOCK`].
    pub n_samples: u16,
    /// Recording segment this block belongs to.
    pub recording_number: u16,
}

impl BlockHeader {
    /// Parse the 12 leading bytes of a data block.
    ///
    /// With `check = true` a sample count above [`SAMPLES_PER_BLOCK`] fails
    /// with [`Error::CorruptedFormat`]; with `check = false` the count is
    /// clamped to capacity so offset arithmetic stays defined.
    pub fn from_bytes(bytes: &[u8], check: bool) -> Result<Self> {
        validate_buffer_size(bytes, BLOCK_HEADER_N_BYTES)?;

        let timestamp = read_i64_be(bytes, 0);
        let n_samples = read_u16_be(bytes, 8);
        let recording_number = read_u16_be(bytes, 10);

        if n_samples as usize > SAMPLES_PER_BLOCK {
            if check {
                return Err(Error::CorruptedFormat(format!(
                    "block sample count {n_samples} exceeds capacity {SAMPLES_PER_BLOCK}"
                )));
            }
            return Ok(Self {
                timestamp,
                n_samples: SAMPLES_PER_BLOCK as u16,
                recording_number,
            });
        }

        Ok(Self {
            timestamp,
            n_samples,
            recording_number,
        })
    }
}

/// One data block decoded into native-endian buffers.
///
/// The buffers are allocated once at capacity and overwritten in place on
/// every refill, so repeated random access does not allocate.
#[derive(Debug, Clone)]
pub struct DecodedBlock {
    header: BlockHeader,
    samples: Vec<i16>,
    timestamps: Vec<i64>,
}

impl DecodedBlock {
    /// Create an empty block buffer with full capacity reserved.
    pub fn new() -> Self {
        Self {
            header: BlockHeader {
                timestamp: 0,
                n_samples: 0,
                recording_number: 0,
            },
            samples: Vec::with_capacity(SAMPLES_PER_BLOCK),
            timestamps: Vec::with_capacity(SAMPLES_PER_BLOCK),
        }
    }

    /// Decode one on-disk block image into this buffer, replacing its
    /// previous contents.
    ///
    /// `bytes` must hold a full [`BLOCK_N_BYTES`] image. The big-endian
    /// payload is byte-swapped into native i16 codes and one absolute
    /// timestamp per valid sample is derived from the block's starting
    /// timestamp. With `check = true` a trailing marker that deviates from
    /// [`END_MARKER`] fails with [`Error::CorruptedFormat`].
    pub fn decode_from(&mut self, bytes: &[u8], check: bool) -> Result<()> {
        validate_buffer_size(bytes, BLOCK_N_BYTES)?;

        let header = BlockHeader::from_bytes(bytes, check)?;

        if check {
            let tail = &bytes[BLOCK_HEADER_N_BYTES + BLOCK_BODY_N_BYTES..BLOCK_N_BYTES];
            if tail != END_MARKER {
                return Err(Error::CorruptedFormat(format!(
                    "block trailing marker {tail:?} does not match {END_MARKER:?}"
                )));
            }
        }

        self.header = header;
        self.samples.clear();
        self.timestamps.clear();
        for i in 0..header.n_samples as usize {
            self.samples
                .push(read_i16_be(bytes, BLOCK_HEADER_N_BYTES + 2 * i));
            self.timestamps.push(header.timestamp + i as i64);
        }

        Ok(())
    }

    /// Header of the currently decoded block.
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    /// Native-endian ADC codes of the valid samples.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Absolute sample index of each valid sample.
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// Recording segment number, broadcast to every sample in the block.
    pub fn recording_number(&self) -> u16 {
        self.header.recording_number
    }
}

impl Default for DecodedBlock {
    fn default() -> Self {
        Self::new()
    }
}
