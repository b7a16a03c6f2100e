//! Lazy decoding engine for one open continuous file.
//!
//! [`ContinuousFile`] parses the header and geometry once at open time and
//! afterwards serves random access out of a single-slot block cache. The
//! format is overwhelmingly read sequentially or in small local windows, so
//! one cached block is enough; there is no LRU or multi-slot eviction.

use crate::blocks::{
    BLOCK_HEADER_N_BYTES, BLOCK_N_BYTES, BlockHeader, ContinuousHeader, DecodedBlock,
    HEADER_N_BYTES, SAMPLES_PER_BLOCK,
};
use crate::geometry::FileGeometry;
use crate::source::ByteSource;
use crate::{Error, Result};
use log::{debug, trace};

/// Single-slot cache holding the most recently decoded block.
///
/// `ensure_block` on [`ContinuousFile`] is the only mutation path and the
/// only place I/O happens after construction. The decoded buffers and the
/// raw read scratch are allocated once and overwritten in place on every
/// refill.
struct BlockCache {
    block: DecodedBlock,
    cached: Option<u64>,
    raw: Vec<u8>,
}

impl BlockCache {
    fn new() -> Self {
        Self {
            block: DecodedBlock::new(),
            cached: None,
            raw: vec![0u8; BLOCK_N_BYTES],
        }
    }
}

/// An open continuous file: parsed header, block geometry, and the cache.
///
/// One `ContinuousFile` serves one logical reader; every accessor takes
/// `&mut self` because an out-of-cache access refills the shared cache
/// slot. Independent instances over independent sources of the same file
/// are safe to use in parallel.
pub struct ContinuousFile<S> {
    source: S,
    header: ContinuousHeader,
    geometry: FileGeometry,
    n_samples: u64,
    cache: BlockCache,
    check: bool,
}

impl<S: ByteSource> ContinuousFile<S> {
    /// Open a continuous file over a byte source positioned at file start.
    ///
    /// Runs the header and geometry validation once. With `check = true`
    /// any deviation from the format fails here with
    /// [`Error::CorruptedFormat`]; with `check = false` content assertions
    /// are skipped so the intact prefix of a truncated or marker-corrupted
    /// file stays readable. Bounds and offset arithmetic are never skipped.
    pub fn open(mut source: S, check: bool) -> Result<Self> {
        let file_size = source.byte_len()?;

        // A file shorter than the header is handled by the geometry check,
        // so read what is there and zero-pad the rest of the header buffer.
        let mut header_buf = [0u8; HEADER_N_BYTES];
        let header_avail = (file_size as usize).min(HEADER_N_BYTES);
        source.read_exact_at(0, &mut header_buf[..header_avail])?;

        let header = ContinuousHeader::from_bytes(&header_buf, check)?;
        let geometry = FileGeometry::new(header.header_bytes, file_size, check)?;

        // The final block may hold fewer valid samples than its nominal
        // capacity; its header decides the total sample count.
        let n_samples = match geometry.n_blocks() {
            0 => 0,
            n_blocks => {
                let mut head_buf = [0u8; BLOCK_HEADER_N_BYTES];
                source.read_exact_at(geometry.block_offset(n_blocks - 1), &mut head_buf)?;
                let final_head = BlockHeader::from_bytes(&head_buf, check)?;
                (n_blocks - 1) * SAMPLES_PER_BLOCK as u64 + final_head.n_samples as u64
            }
        };

        debug!(
            "opened continuous file: channel {:?}, {} blocks, {} samples",
            header.channel,
            geometry.n_blocks(),
            n_samples
        );

        Ok(Self {
            source,
            header,
            geometry,
            n_samples,
            cache: BlockCache::new(),
            check,
        })
    }

    /// Parsed text header of the file.
    pub fn header(&self) -> &ContinuousHeader {
        &self.header
    }

    /// Block placement of the file.
    pub fn geometry(&self) -> &FileGeometry {
        &self.geometry
    }

    /// Number of data blocks.
    pub fn n_blocks(&self) -> u64 {
        self.geometry.n_blocks()
    }

    /// Total number of samples, adjusted for a short final block.
    pub fn n_samples(&self) -> u64 {
        self.n_samples
    }

    /// Whether content validation is enabled for block reads.
    pub fn is_checked(&self) -> bool {
        self.check
    }

    /// Release the byte source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Raw ADC code of the sample at `index`.
    pub fn sample_code(&mut self, index: u64) -> Result<i16> {
        let len = self.n_samples;
        let (block, offset) = self.locate(index)?;
        let decoded = self.ensure_block(block)?;
        match decoded.samples().get(offset) {
            Some(&code) => Ok(code),
            None => Err(Error::IndexOutOfRange { index, len }),
        }
    }

    /// Absolute sample index (block timestamp + intra-block offset) of the
    /// sample at `index`.
    pub fn sample_timestamp(&mut self, index: u64) -> Result<i64> {
        let len = self.n_samples;
        let (block, offset) = self.locate(index)?;
        let decoded = self.ensure_block(block)?;
        match decoded.timestamps().get(offset) {
            Some(&ts) => Ok(ts),
            None => Err(Error::IndexOutOfRange { index, len }),
        }
    }

    /// Recording segment number of the block holding the sample at `index`.
    pub fn recording_number(&mut self, index: u64) -> Result<u16> {
        let len = self.n_samples;
        let (block, offset) = self.locate(index)?;
        let decoded = self.ensure_block(block)?;
        if offset >= decoded.samples().len() {
            return Err(Error::IndexOutOfRange { index, len });
        }
        Ok(decoded.recording_number())
    }

    /// Raw (code, timestamp, recording number) of the sample at `index`,
    /// decoded from a single cache fill.
    pub fn joint_raw(&mut self, index: u64) -> Result<(i16, i64, u16)> {
        let len = self.n_samples;
        let (block, offset) = self.locate(index)?;
        let decoded = self.ensure_block(block)?;
        match (
            decoded.samples().get(offset),
            decoded.timestamps().get(offset),
        ) {
            (Some(&code), Some(&ts)) => Ok((code, ts, decoded.recording_number())),
            _ => Err(Error::IndexOutOfRange { index, len }),
        }
    }

    /// Map a global sample index to (block index, intra-block offset).
    fn locate(&self, index: u64) -> Result<(u64, usize)> {
        if index >= self.n_samples {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.n_samples,
            });
        }
        Ok((
            index / SAMPLES_PER_BLOCK as u64,
            (index % SAMPLES_PER_BLOCK as u64) as usize,
        ))
    }

    /// Make `block` the cached block, reading and decoding it if it is not
    /// already.
    fn ensure_block(&mut self, block: u64) -> Result<&DecodedBlock> {
        if self.cache.cached != Some(block) {
            trace!("cache miss, loading block {block}");
            self.source
                .read_exact_at(self.geometry.block_offset(block), &mut self.cache.raw)?;
            // Invalidate first: a decode failure must not leave stale
            // contents labeled with the new index.
            self.cache.cached = None;
            self.cache.block.decode_from(&self.cache.raw, self.check)?;

            if self.check
                && block + 1 != self.geometry.n_blocks()
                && (self.cache.block.header().n_samples as usize) < SAMPLES_PER_BLOCK
            {
                return Err(Error::CorruptedFormat(format!(
                    "block {block} is short but not the final block"
                )));
            }

            self.cache.cached = Some(block);
        }
        Ok(&self.cache.block)
    }
}
