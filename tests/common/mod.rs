//! Synthetic `.continuous` file builder shared by the integration tests.

#![allow(dead_code)]

use oe_continuous::blocks::{END_MARKER, HEADER_N_BYTES, SAMPLES_PER_BLOCK};

pub const BIT_VOLTS: f64 = 0.195;
pub const SAMPLE_RATE: f64 = 30_000.0;

/// One data block to be written: starting timestamp, valid codes, segment.
pub struct BlockSpec {
    pub timestamp: i64,
    pub codes: Vec<i16>,
    pub recno: u16,
}

/// Deterministic, sign-varying ADC code for a global sample index.
pub fn code_at(global: u64) -> i16 {
    ((global as i64).wrapping_mul(31) % 30_001 - 15_000) as i16
}

/// A full 1024-sample block whose codes follow [`code_at`].
pub fn full_block(block_index: u64, recno: u16) -> BlockSpec {
    let start = block_index * SAMPLES_PER_BLOCK as u64;
    BlockSpec {
        timestamp: start as i64,
        codes: (0..SAMPLES_PER_BLOCK as u64)
            .map(|j| code_at(start + j))
            .collect(),
        recno,
    }
}

pub fn header_text() -> String {
    format!(
        "header.format = 'Open Ephys'; header.version = 0.4; \
         header.header_bytes = 1024; \
         header.description = 'each record contains one 64-bit timestamp'; \
         header.date_created = '1-Jan-2024 000000'; header.channel = 'CH1'; \
         header.channelType = 'Continuous'; header.sampleRate = {SAMPLE_RATE}; \
         header.blockLength = 1024; header.bufferSize = 1024; \
         header.bitVolts = {BIT_VOLTS}; "
    )
}

/// Serialize a header plus the given blocks into one file image.
pub fn file_bytes(blocks: &[BlockSpec]) -> Vec<u8> {
    let mut bytes = header_text().into_bytes();
    assert!(bytes.len() <= HEADER_N_BYTES);
    bytes.resize(HEADER_N_BYTES, 0);

    for block in blocks {
        assert!(block.codes.len() <= SAMPLES_PER_BLOCK);
        bytes.extend_from_slice(&block.timestamp.to_be_bytes());
        bytes.extend_from_slice(&(block.codes.len() as u16).to_be_bytes());
        bytes.extend_from_slice(&block.recno.to_be_bytes());
        let body_start = bytes.len();
        for code in &block.codes {
            bytes.extend_from_slice(&code.to_be_bytes());
        }
        bytes.resize(body_start + 2 * SAMPLES_PER_BLOCK, 0);
        bytes.extend_from_slice(&END_MARKER);
    }
    bytes
}

/// A four-block file: three full blocks and a short 100-sample final one.
pub fn standard_file() -> Vec<u8> {
    let mut blocks: Vec<BlockSpec> = (0..3).map(|i| full_block(i, 0)).collect();
    let start = 3 * SAMPLES_PER_BLOCK as u64;
    blocks.push(BlockSpec {
        timestamp: start as i64,
        codes: (0..100).map(|j| code_at(start + j)).collect(),
        recno: 1,
    });
    file_bytes(&blocks)
}
