#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

//! # oe-continuous
//!
//! A Rust library for reading Open Ephys `.continuous` recording files.
//!
//! `.continuous` is the binary single-channel format written by the Open
//! Ephys acquisition GUI: a 1024-byte text header followed by fixed-size
//! data blocks, each holding up to 1024 big-endian ADC codes, a starting
//! timestamp, a recording segment number, and a trailing marker. This crate
//! decodes that layout lazily — accessing a sample loads only the one block
//! that contains it, so arbitrarily large recordings can be read without
//! loading them into RAM.
//!
//! ## Features
//!
//! - **Typed views**: sample values, time stamps, and recording numbers as
//!   random-access sequences, raw or converted to microvolts/seconds
//! - **Lazy block loading**: a single-slot cache backs sequential and
//!   windowed access without re-reading the file
//! - **Corruption detection**: header magic/version, file geometry, and
//!   per-block trailing markers are validated deterministically, with an
//!   explicit opt-out for salvaging truncated files
//!
//! ## Quick Start
//!
//! ### Reading sample voltages
//!
//! ```no_run
//! use oe_continuous::{IoSource, Physical, Result, SampleView};
//!
//! fn main() -> Result<()> {
//!     let io = std::fs::File::open("100_CH1.continuous")?;
//!     let mut samples: SampleView<_, Physical> = SampleView::new(IoSource::new(io))?;
//!
//!     println!("{} samples", samples.len());
//!     for i in 0..3 {
//!         println!("sample {i}: {:.3} uV", samples.at(i)?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Reading all three aspects at once
//!
//! ```no_run
//! use oe_continuous::{IoSource, JointView, Physical, Result};
//!
//! fn main() -> Result<()> {
//!     let io = std::fs::File::open("100_CH1.continuous")?;
//!     let mut joint: JointView<_, Physical> = JointView::new(IoSource::new(io))?;
//!
//!     for i in 0..joint.len() {
//!         let (voltage, seconds, recno) = joint.at(i)?;
//!         println!("{seconds:.6}s  {voltage:.3}uV  segment {recno}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Salvaging a truncated file
//!
//! The GUI regularly leaves files missing bytes at the end. Opening with
//! validation disabled reads the intact prefix instead of failing:
//!
//! ```no_run
//! use oe_continuous::{IoSource, Raw, Result, SampleView};
//!
//! fn main() -> Result<()> {
//!     let io = std::fs::File::open("100_CH1.continuous")?;
//!     let mut codes: SampleView<_, Raw> = SampleView::with_options(IoSource::new(io), false)?;
//!     let intact = codes.materialize()?;
//!     println!("salvaged {} raw codes", intact.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`blocks`] | Slice-level header and data block parsers (for advanced use) |
//! | [`geometry`] | Block count and placement derived from the file size |
//! | [`source`] | [`ByteSource`] seam over files, cursors, or custom readers |
//! | [`continuous`] | [`ContinuousFile`]: the lazy decoding engine and its cache |
//! | [`views`] | Typed projections: [`SampleView`], [`TimeView`], [`RecNoView`], [`JointView`] |
//! | [`error`] | Error types and [`Result`] alias |
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`]. [`Error::CorruptedFormat`]
//! signals a deviation from the format, [`Error::IndexOutOfRange`] an access
//! outside `[0, len)`; I/O errors from the byte source are propagated
//! unchanged. The engine never repairs or retries anything.

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
pub mod blocks;
#[cfg(feature = "alloc")]
pub mod error;
#[cfg(feature = "alloc")]
pub mod geometry;

#[cfg(feature = "std")]
pub mod continuous;
#[cfg(feature = "std")]
pub mod source;
#[cfg(feature = "std")]
pub mod views;

// Re-export commonly used types at the crate root
#[cfg(feature = "alloc")]
pub use blocks::{BlockHeader, ContinuousHeader, DecodedBlock};
#[cfg(feature = "alloc")]
pub use error::{Error, Result};
#[cfg(feature = "alloc")]
pub use geometry::FileGeometry;

#[cfg(feature = "std")]
pub use continuous::ContinuousFile;
#[cfg(feature = "std")]
pub use source::{BufferedByteSource, ByteSource, IoSource};
#[cfg(feature = "std")]
pub use views::{JointView, OutputKind, Physical, Raw, RecNoView, SampleView, TimeView};
