//! Block geometry derived from the header and the total file size.

use crate::blocks::BLOCK_N_BYTES;
use crate::{Error, Result};
use alloc::format;

/// Placement of the data blocks within a continuous file.
///
/// Computed once when a file is opened and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileGeometry {
    header_bytes: u64,
    n_blocks: u64,
}

impl FileGeometry {
    /// Derive the geometry from the declared header length and the file size.
    ///
    /// With `check = true` the bytes after the header must divide evenly
    /// into whole data blocks, and the file must be at least as large as the
    /// header; any remainder fails with [`Error::CorruptedFormat`]. With
    /// `check = false` the block count floors instead, which lets callers
    /// read the intact prefix of a truncated file.
    pub fn new(header_bytes: u64, file_size: u64, check: bool) -> Result<Self> {
        if file_size < header_bytes {
            if check {
                return Err(Error::CorruptedFormat(format!(
                    "file size {file_size} is smaller than the {header_bytes}-byte header"
                )));
            }
            return Ok(Self {
                header_bytes,
                n_blocks: 0,
            });
        }

        let data_bytes = file_size - header_bytes;
        if check && data_bytes % BLOCK_N_BYTES as u64 != 0 {
            return Err(Error::CorruptedFormat(format!(
                "{data_bytes} data bytes are not a whole number of {BLOCK_N_BYTES}-byte blocks"
            )));
        }

        Ok(Self {
            header_bytes,
            n_blocks: data_bytes / BLOCK_N_BYTES as u64,
        })
    }

    /// Number of whole data blocks in the file.
    pub fn n_blocks(&self) -> u64 {
        self.n_blocks
    }

    /// Length of the text header in bytes.
    pub fn header_bytes(&self) -> u64 {
        self.header_bytes
    }

    /// Absolute byte offset of the given block.
    pub fn block_offset(&self, block: u64) -> u64 {
        self.header_bytes + block * BLOCK_N_BYTES as u64
    }
}
