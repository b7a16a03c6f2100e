//! Error types for `.continuous` file operations.
//!
//! This module defines the [`Error`] enum which represents all possible
//! failures that can occur when opening or reading an Open Ephys
//! continuous recording.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "std")]
//! use oe_continuous::{ContinuousFile, Error, IoSource, Result};
//!
//! # #[cfg(feature = "std")]
//! fn open_recording(path: &str) -> Result<()> {
//!     let io = IoSource::new(std::fs::File::open(path)?);
//!     match ContinuousFile::open(io, true) {
//!         Ok(file) => {
//!             println!("{} samples in {} blocks", file.n_samples(), file.n_blocks());
//!             Ok(())
//!         }
//!         Err(Error::CorruptedFormat(reason)) => {
//!             eprintln!("Not a readable .continuous file: {reason}");
//!             Err(Error::CorruptedFormat(reason))
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use core::fmt;

use alloc::string::String;

/// Errors that can occur while decoding a continuous file.
///
/// This enum covers all failure modes: I/O errors from the byte source,
/// structural corruption of the file, and out-of-range accesses.
#[derive(Debug)]
pub enum Error {
    /// Buffer provided for parsing was too small.
    ///
    /// This typically indicates an incomplete read from the byte source.
    TooShortBuffer {
        /// Actual number of bytes available
        actual: usize,
        /// Minimum number of bytes required
        expected: usize,
        /// Source file where the error was detected
        file: &'static str,
        /// Line number where the error was detected
        line: u32,
    },

    /// The file deviates from the Open Ephys continuous layout.
    ///
    /// Raised for a wrong format tag or version, a malformed header field,
    /// a file size that is not header plus a whole number of data blocks,
    /// or a data block whose trailing marker does not match. The payload
    /// describes the specific deviation.
    CorruptedFormat(String),

    /// A sample index outside `[0, len)` was requested.
    IndexOutOfRange {
        /// The index that was requested
        index: u64,
        /// Number of samples in the file
        len: u64,
    },

    /// An I/O error occurred while reading from the byte source.
    ///
    /// Only available with the `std` feature. Errors from the underlying
    /// source are propagated unchanged, never retried.
    #[cfg(feature = "std")]
    IOError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TooShortBuffer {
                actual,
                expected,
                file,
                line,
            } => write!(
                f,
                "Buffer too small at {file}:{line}: need at least {expected} bytes, got {actual}"
            ),
            Error::CorruptedFormat(reason) => {
                write!(f, "Corrupted continuous file: {reason}")
            }
            Error::IndexOutOfRange { index, len } => {
                write!(f, "Sample index {index} out of range for length {len}")
            }
            #[cfg(feature = "std")]
            Error::IOError(e) => write!(f, "I/O error: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IOError(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IOError(err)
    }
}

/// A specialized Result type for continuous file operations.
///
/// This is defined as `core::result::Result<T, Error>` for convenience.
pub type Result<T> = core::result::Result<T, Error>;
