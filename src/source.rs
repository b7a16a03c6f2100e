//! The byte-source seam between the decoder and whatever holds the bytes.
//!
//! The engine only needs two primitives: an exact positioned read and the
//! total byte length. [`IoSource`] provides them for anything that is
//! `Read + Seek`; a custom source (an HTTP range client, a memory map, ...)
//! implements [`ByteSource`] directly.

use crate::{Error, Result};
use std::io::{Read, Seek, SeekFrom};

/// A seekable, readable run of bytes containing one continuous file.
///
/// The engine does not open or close the source; its file-level lifecycle
/// is the caller's. Offsets are absolute: offset 0 must be the first byte
/// of the continuous file's header. Handing in a source whose offset 0 is
/// anything else is a caller error the decoder cannot detect.
pub trait ByteSource {
    /// Fill `buf` with the bytes at `offset`, failing if fewer are available.
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()>;

    /// Total number of bytes in the source.
    fn byte_len(&mut self) -> Result<u64>;
}

/// [`ByteSource`] over any `Read + Seek` value, e.g. a [`std::fs::File`]
/// or an in-memory [`std::io::Cursor`].
#[derive(Debug)]
pub struct IoSource<T> {
    io: T,
}

impl<T: Read + Seek> IoSource<T> {
    /// Wrap an open stream. The stream's offset 0 must be the file start.
    pub fn new(io: T) -> Self {
        Self { io }
    }

    /// Unwrap, returning the inner stream.
    pub fn into_inner(self) -> T {
        self.io
    }
}

impl<T: Read + Seek> ByteSource for IoSource<T> {
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.io
            .seek(SeekFrom::Start(offset))
            .map_err(Error::IOError)?;
        self.io.read_exact(buf).map_err(Error::IOError)?;
        Ok(())
    }

    fn byte_len(&mut self) -> Result<u64> {
        let len = self.io.seek(SeekFrom::End(0)).map_err(Error::IOError)?;
        Ok(len)
    }
}

/// Read-ahead wrapper for sources where many small reads are expensive.
///
/// Keeps a window of recently read bytes and serves requests that fall
/// inside it without touching the inner source. Useful when the inner
/// source is remote or unbuffered; a local file behind [`IoSource`]
/// usually does not need it.
pub struct BufferedByteSource<S> {
    inner: S,
    buffer: Vec<u8>,
    buffer_start: u64,
    buffer_capacity: usize,
}

impl<S: ByteSource> BufferedByteSource<S> {
    /// Wrap a source with the default 64 KB window.
    pub fn new(inner: S) -> Self {
        Self::with_capacity(inner, 64 * 1024)
    }

    /// Wrap a source with a custom window size.
    pub fn with_capacity(inner: S, capacity: usize) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            buffer_start: 0,
            buffer_capacity: capacity,
        }
    }

    /// Unwrap, returning the inner source.
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn buffer_end(&self) -> u64 {
        self.buffer_start + self.buffer.len() as u64
    }

    /// Slide the window so it starts at `offset`, reading as much as fits.
    fn fill_window(&mut self, offset: u64) -> Result<()> {
        let remaining = self.inner.byte_len()?.saturating_sub(offset);
        let want = (self.buffer_capacity as u64).min(remaining) as usize;

        self.buffer.resize(want, 0);
        self.inner.read_exact_at(offset, &mut self.buffer)?;
        self.buffer_start = offset;
        Ok(())
    }
}

impl<S: ByteSource> ByteSource for BufferedByteSource<S> {
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let end = offset + buf.len() as u64;

        // Requests larger than the window bypass it.
        if buf.len() > self.buffer_capacity {
            return self.inner.read_exact_at(offset, buf);
        }

        if offset < self.buffer_start || end > self.buffer_end() {
            self.fill_window(offset)?;
        }

        if end > self.buffer_end() {
            return Err(Error::TooShortBuffer {
                actual: (self.buffer_end() - offset) as usize,
                expected: buf.len(),
                file: file!(),
                line: line!(),
            });
        }

        let start = (offset - self.buffer_start) as usize;
        buf.copy_from_slice(&self.buffer[start..start + buf.len()]);
        Ok(())
    }

    fn byte_len(&mut self) -> Result<u64> {
        self.inner.byte_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn io_source_reads_at_offset() {
        let mut src = IoSource::new(Cursor::new((0u8..100).collect::<Vec<_>>()));
        let mut buf = [0u8; 4];
        src.read_exact_at(10, &mut buf).unwrap();
        assert_eq!(buf, [10, 11, 12, 13]);
        assert_eq!(src.byte_len().unwrap(), 100);
    }

    #[test]
    fn read_past_end_is_io_error() {
        let mut src = IoSource::new(Cursor::new(vec![0u8; 8]));
        let mut buf = [0u8; 4];
        assert!(matches!(
            src.read_exact_at(6, &mut buf),
            Err(Error::IOError(_))
        ));
    }

    #[test]
    fn buffered_window_serves_repeated_reads() {
        let data: Vec<u8> = (0u8..=255).collect();
        let mut src = BufferedByteSource::with_capacity(IoSource::new(Cursor::new(data)), 32);

        let mut buf = [0u8; 8];
        src.read_exact_at(0, &mut buf).unwrap();
        assert_eq!(buf, [0, 1, 2, 3, 4, 5, 6, 7]);

        // Inside the window, then past it to force a slide.
        src.read_exact_at(24, &mut buf).unwrap();
        assert_eq!(buf[0], 24);
        src.read_exact_at(100, &mut buf).unwrap();
        assert_eq!(buf[0], 100);

        assert_eq!(src.byte_len().unwrap(), 256);
    }

    #[test]
    fn buffered_read_past_end_fails() {
        let mut src = BufferedByteSource::with_capacity(IoSource::new(Cursor::new(vec![0u8; 16])), 32);
        let mut buf = [0u8; 8];
        assert!(src.read_exact_at(12, &mut buf).is_err());
    }
}
