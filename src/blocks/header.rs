// blocks/header.rs
//! Parser for the text header at the start of every continuous file.

use super::HEADER_N_BYTES;
use crate::{Error, Result, blocks::common::validate_buffer_size};
use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};

/// Format tag every continuous file must carry in its `format` field.
pub const FORMAT_MAGIC: &str = "Open Ephys";

/// The one continuous format version this crate decodes.
pub const SUPPORTED_VERSION: &str = "0.4";

// Nominal values written by the acquisition GUI, used to fill fields that
// fail to parse when validation is disabled.
const DEFAULT_SAMPLE_RATE: f64 = 30_000.0;
const DEFAULT_BLOCK_LENGTH: u32 = 1024;
const DEFAULT_BUFFER_SIZE: u32 = 1024;
const DEFAULT_BIT_VOLTS: f64 = 0.195;

/// Parsed text header of a continuous file.
///
/// The header is a fixed-size region of `key = value;` pairs at file offset
/// 0, with keys prefixed `header.` and string values in single quotes. It is
/// immutable after parsing; the file handle that parsed it owns it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContinuousHeader {
    /// Format tag, `"Open Ephys"` for valid files.
    pub format: String,
    /// Format version string, `"0.4"` for supported files.
    pub version: String,
    /// Self-declared header length in bytes; data blocks start here.
    pub header_bytes: u64,
    /// Free-text description of the block layout.
    pub description: String,
    /// Creation timestamp as written by the GUI.
    pub date_created: String,
    /// Name of the recorded channel (e.g. `"CH1"`).
    pub channel: String,
    /// Channel type (e.g. `"Continuous"`).
    pub channel_type: String,
    /// Sampling rate in Hz.
    pub sample_rate: f64,
    /// Number of samples per data block.
    pub block_length: u32,
    /// Acquisition buffer size.
    pub buffer_size: u32,
    /// Scale factor from raw ADC code to microvolts.
    pub bit_volts: f64,
}

impl ContinuousHeader {
    /// Parse a continuous header from the first [`HEADER_N_BYTES`] of a file.
    ///
    /// # Arguments
    /// * `bytes` - At least [`HEADER_N_BYTES`] bytes starting at file offset 0.
    /// * `check` - When `true`, the format tag, version, and every required
    ///   field are validated and any deviation fails with
    ///   [`Error::CorruptedFormat`]. When `false`, malformed fields fall back
    ///   to the nominal values the GUI writes; `header_bytes` is still taken
    ///   from the file when parsable so the data-block offset stays a
    ///   faithful function of the header text.
    pub fn from_bytes(bytes: &[u8], check: bool) -> Result<Self> {
        validate_buffer_size(bytes, HEADER_N_BYTES)?;
        let text: Cow<'_, str> = String::from_utf8_lossy(&bytes[..HEADER_N_BYTES]);

        let mut fields = HeaderFields::default();
        for entry in text.split(';') {
            let entry = entry.trim_matches(|c: char| c.is_whitespace() || c == '\0');
            let Some(entry) = entry.strip_prefix("header.") else {
                continue;
            };
            let Some((key, value)) = entry.split_once('=') else {
                continue;
            };
            fields.set(key.trim(), value.trim().trim_matches('\''));
        }

        let header = fields.finish(check)?;

        if check {
            if header.format != FORMAT_MAGIC {
                return Err(Error::CorruptedFormat(format!(
                    "format tag {:?} is not {FORMAT_MAGIC:?}",
                    header.format
                )));
            }
            if header.version != SUPPORTED_VERSION {
                return Err(Error::CorruptedFormat(format!(
                    "version {:?} is not the supported {SUPPORTED_VERSION:?}",
                    header.version
                )));
            }
            if header.header_bytes == 0 || header.header_bytes > HEADER_N_BYTES as u64 {
                return Err(Error::CorruptedFormat(format!(
                    "declared header length {} outside (0, {HEADER_N_BYTES}]",
                    header.header_bytes
                )));
            }
        }

        Ok(header)
    }
}

/// Raw `key = value` pairs collected from the header text, before the
/// required-field and magic checks are applied.
#[derive(Debug, Default)]
struct HeaderFields {
    format: Option<String>,
    version: Option<String>,
    header_bytes: Option<u64>,
    description: Option<String>,
    date_created: Option<String>,
    channel: Option<String>,
    channel_type: Option<String>,
    sample_rate: Option<f64>,
    block_length: Option<u32>,
    buffer_size: Option<u32>,
    bit_volts: Option<f64>,
}

impl HeaderFields {
    fn set(&mut self, key: &str, value: &str) {
        match key {
            "format" => self.format = Some(value.to_string()),
            "version" => self.version = Some(value.to_string()),
            "header_bytes" => self.header_bytes = value.parse().ok(),
            "description" => self.description = Some(value.to_string()),
            "date_created" => self.date_created = Some(value.to_string()),
            "channel" => self.channel = Some(value.to_string()),
            "channelType" => self.channel_type = Some(value.to_string()),
            "sampleRate" => self.sample_rate = value.parse().ok(),
            "blockLength" => self.block_length = value.parse().ok(),
            "bufferSize" => self.buffer_size = value.parse().ok(),
            "bitVolts" => self.bit_volts = value.parse().ok(),
            // Unknown keys are ignored; newer GUI builds add fields.
            _ => {}
        }
    }

    fn finish(self, check: bool) -> Result<ContinuousHeader> {
        fn required<T>(field: Option<T>, name: &str, check: bool, default: T) -> Result<T> {
            match field {
                Some(value) => Ok(value),
                None if check => Err(Error::CorruptedFormat(format!(
                    "missing or malformed header field `{name}`"
                ))),
                None => Ok(default),
            }
        }

        Ok(ContinuousHeader {
            format: required(self.format, "format", check, FORMAT_MAGIC.to_string())?,
            version: required(self.version, "version", check, SUPPORTED_VERSION.to_string())?,
            header_bytes: required(
                self.header_bytes,
                "header_bytes",
                check,
                HEADER_N_BYTES as u64,
            )?,
            description: required(self.description, "description", check, String::new())?,
            date_created: required(self.date_created, "date_created", check, String::new())?,
            channel: required(self.channel, "channel", check, String::new())?,
            channel_type: required(self.channel_type, "channelType", check, String::new())?,
            sample_rate: required(self.sample_rate, "sampleRate", check, DEFAULT_SAMPLE_RATE)?,
            block_length: required(self.block_length, "blockLength", check, DEFAULT_BLOCK_LENGTH)?,
            buffer_size: required(self.buffer_size, "bufferSize", check, DEFAULT_BUFFER_SIZE)?,
            bit_volts: required(self.bit_volts, "bitVolts", check, DEFAULT_BIT_VOLTS)?,
        })
    }
}
