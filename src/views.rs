//! Typed random-access views over an open continuous file.
//!
//! Each view projects one aspect of the recording — sample values, time
//! stamps, recording numbers, or all three jointly — and applies the output
//! representation chosen at construction through an [`OutputKind`] marker:
//!
//! - [`Raw`]: ADC codes (`i16`) and absolute sample indices (`i64`);
//! - [`Physical`]: microvolts and seconds (`f64`).
//!
//! The marker is a type parameter, not a trait object, so the hot indexing
//! path monomorphizes with no dispatch.
//!
//! ```no_run
//! use oe_continuous::{IoSource, Physical, Result, SampleView};
//!
//! fn mean_voltage(path: &str) -> Result<f64> {
//!     let io = std::fs::File::open(path)?;
//!     let mut view: SampleView<_, Physical> = SampleView::new(IoSource::new(io))?;
//!     let mut sum = 0.0;
//!     for i in 0..view.len() {
//!         sum += view.at(i)?;
//!     }
//!     Ok(sum / view.len() as f64)
//! }
//! ```

use crate::Result;
use crate::continuous::ContinuousFile;
use crate::source::ByteSource;
use core::marker::PhantomData;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Raw {}
    impl Sealed for super::Physical {}
}

/// Output kind yielding raw integer values: ADC codes and sample indices.
#[derive(Debug, Clone, Copy)]
pub struct Raw;

/// Output kind yielding physical-unit values: microvolts and seconds.
#[derive(Debug, Clone, Copy)]
pub struct Physical;

/// Closed set of output representations a view can be constructed with.
///
/// Sealed: the only implementors are [`Raw`] and [`Physical`].
pub trait OutputKind: sealed::Sealed {
    /// What a sample decodes to under this kind.
    type Sample;
    /// What a time stamp decodes to under this kind.
    type Time;

    /// Convert a raw ADC code using the header's bits-to-volts scale.
    fn convert_sample(code: i16, bit_volts: f64) -> Self::Sample;
    /// Convert an absolute sample index using the header's sample rate.
    fn convert_time(timestamp: i64, sample_rate: f64) -> Self::Time;
}

impl OutputKind for Raw {
    type Sample = i16;
    type Time = i64;

    fn convert_sample(code: i16, _bit_volts: f64) -> i16 {
        code
    }

    fn convert_time(timestamp: i64, _sample_rate: f64) -> i64 {
        timestamp
    }
}

impl OutputKind for Physical {
    type Sample = f64;
    type Time = f64;

    fn convert_sample(code: i16, bit_volts: f64) -> f64 {
        code as f64 * bit_volts
    }

    fn convert_time(timestamp: i64, sample_rate: f64) -> f64 {
        timestamp as f64 / sample_rate
    }
}

macro_rules! view_common {
    () => {
        /// Open a view over a byte source positioned at file start, with
        /// full validation.
        pub fn new(source: S) -> Result<Self> {
            Self::with_options(source, true)
        }

        /// Open a view, choosing whether content validation is enabled.
        ///
        /// `check = false` trades corruption detection for the ability to
        /// read the intact prefix of a truncated or marker-corrupted file.
        pub fn with_options(source: S, check: bool) -> Result<Self> {
            Ok(Self::from_file(ContinuousFile::open(source, check)?))
        }

        /// Wrap an already-opened file, keeping its warm cache.
        pub fn from_file(file: ContinuousFile<S>) -> Self {
            Self {
                file,
                _kind: PhantomData,
            }
        }

        /// Unwrap into the underlying file, e.g. to rewrap it as another
        /// projection without re-reading the header.
        pub fn into_file(self) -> ContinuousFile<S> {
            self.file
        }

        /// Shared access to the underlying file handle.
        pub fn file(&self) -> &ContinuousFile<S> {
            &self.file
        }

        /// Number of samples in the file.
        pub fn len(&self) -> u64 {
            self.file.n_samples()
        }

        /// Whether the file holds no samples.
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    };
}

/// Random-access view of the sample values of a continuous file.
pub struct SampleView<S, K: OutputKind = Physical> {
    file: ContinuousFile<S>,
    _kind: PhantomData<K>,
}

impl<S: ByteSource, K: OutputKind> SampleView<S, K> {
    view_common!();

    /// Value of the sample at `index`, in the view's output kind.
    pub fn at(&mut self, index: u64) -> Result<K::Sample> {
        let code = self.file.sample_code(index)?;
        Ok(K::convert_sample(code, self.file.header().bit_volts))
    }

    /// Eagerly decode the whole file into memory.
    pub fn materialize(&mut self) -> Result<Vec<K::Sample>> {
        let mut out = Vec::with_capacity(self.len() as usize);
        for i in 0..self.len() {
            out.push(self.at(i)?);
        }
        Ok(out)
    }
}

/// Random-access view of the time stamps of a continuous file.
pub struct TimeView<S, K: OutputKind = Physical> {
    file: ContinuousFile<S>,
    _kind: PhantomData<K>,
}

impl<S: ByteSource, K: OutputKind> TimeView<S, K> {
    view_common!();

    /// Time of the sample at `index`, in the view's output kind.
    pub fn at(&mut self, index: u64) -> Result<K::Time> {
        let timestamp = self.file.sample_timestamp(index)?;
        Ok(K::convert_time(timestamp, self.file.header().sample_rate))
    }

    /// Eagerly decode the whole file into memory.
    pub fn materialize(&mut self) -> Result<Vec<K::Time>> {
        let mut out = Vec::with_capacity(self.len() as usize);
        for i in 0..self.len() {
            out.push(self.at(i)?);
        }
        Ok(out)
    }
}

/// Random-access view of the recording segment numbers of a continuous
/// file. Has no output kind: a segment number is an integer tag either way.
pub struct RecNoView<S> {
    file: ContinuousFile<S>,
    _kind: PhantomData<Raw>,
}

impl<S: ByteSource> RecNoView<S> {
    view_common!();

    /// Recording segment number of the sample at `index`.
    pub fn at(&mut self, index: u64) -> Result<u16> {
        self.file.recording_number(index)
    }

    /// Eagerly decode the whole file into memory.
    pub fn materialize(&mut self) -> Result<Vec<u16>> {
        let mut out = Vec::with_capacity(self.len() as usize);
        for i in 0..self.len() {
            out.push(self.at(i)?);
        }
        Ok(out)
    }
}

/// Joint view yielding `(sample, time, recording number)` per index.
///
/// All three values come out of a single cache fill, so interleaved access
/// to multiple aspects costs no duplicate I/O or decoding — use this
/// instead of stepping a [`SampleView`] and a [`TimeView`] in lockstep
/// over two sources.
pub struct JointView<S, K: OutputKind = Physical> {
    file: ContinuousFile<S>,
    _kind: PhantomData<K>,
}

impl<S: ByteSource, K: OutputKind> JointView<S, K> {
    view_common!();

    /// The three aspects of the sample at `index`, decoded together.
    pub fn at(&mut self, index: u64) -> Result<(K::Sample, K::Time, u16)> {
        let (code, timestamp, recno) = self.file.joint_raw(index)?;
        let header = self.file.header();
        Ok((
            K::convert_sample(code, header.bit_volts),
            K::convert_time(timestamp, header.sample_rate),
            recno,
        ))
    }

    /// Eagerly decode the whole file into memory.
    pub fn materialize(&mut self) -> Result<Vec<(K::Sample, K::Time, u16)>> {
        let mut out = Vec::with_capacity(self.len() as usize);
        for i in 0..self.len() {
            out.push(self.at(i)?);
        }
        Ok(out)
    }
}
