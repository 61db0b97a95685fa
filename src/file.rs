//! `std::io` adapters over the sessions.
//!
//! # Public API
//! - [`LzipWriter`]: streaming compressor implementing [`std::io::Write`]
//! - [`FileEncoder`]: `LzipWriter` over a buffered file created at a path
//! - [`LzipReader`]: streaming decompressor implementing [`std::io::Read`]

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::io::{DecodeOptions, DecompressIter, EncodeOptions};
use crate::session::EncoderSession;
use crate::source::Source;

// ─────────────────────────────────────────────────────────────────────────────
// LzipWriter<W>
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming lzip compressor backed by any `W: Write`.
///
/// # Usage
/// ```no_run
/// use lzip::file::LzipWriter;
/// use lzip::io::EncodeOptions;
/// use std::io::Write;
///
/// let mut writer = LzipWriter::new(Vec::new(), &EncodeOptions::default()).unwrap();
/// writer.write_all(b"hello").unwrap();
/// let compressed = writer.finish().unwrap();
/// ```
pub struct LzipWriter<W: Write> {
    session: Option<EncoderSession>,
    /// Wrapped in `Option` so `finish()` can hand it back.
    inner: Option<W>,
    /// Sticky error flag: once set, `Drop` does not try to finalize.
    errored: bool,
}

impl<W: Write> LzipWriter<W> {
    /// Open an encoder session writing into `writer`.
    pub fn new(writer: W, options: &EncodeOptions) -> Result<Self> {
        Ok(LzipWriter {
            session: Some(EncoderSession::from_options(options)?),
            inner: Some(writer),
            errored: false,
        })
    }

    /// Close the last member, flush, and return the underlying writer.
    ///
    /// Prefer this over dropping the writer: errors during a drop-time
    /// finalization are discarded.
    pub fn finish(mut self) -> Result<W> {
        self.finalize()?;
        self.inner.take().ok_or(Error::SessionClosed)
    }

    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    fn finalize(&mut self) -> Result<()> {
        let session = self.session.take().ok_or(Error::SessionClosed)?;
        let writer = self.inner.as_mut().ok_or(Error::SessionClosed)?;
        let tail = session.finish()?;
        writer.write_all(&tail)?;
        writer.flush()?;
        Ok(())
    }
}

impl<W: Write> Write for LzipWriter<W> {
    /// Compress `buf` and write whatever compressed bytes are ready.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let (Some(session), Some(writer)) = (self.session.as_mut(), self.inner.as_mut()) else {
            return Err(Error::SessionClosed.into());
        };
        let compressed = session.compress(buf).inspect_err(|_| self.errored = true)?;
        writer
            .write_all(&compressed)
            .inspect_err(|_| self.errored = true)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.inner.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for LzipWriter<W> {
    /// Best-effort finalization when `finish()` was not called.
    fn drop(&mut self) {
        if self.session.is_none() || self.errored {
            return;
        }
        if let Err(error) = self.finalize() {
            tracing::warn!(%error, "finalizing lzip writer on drop failed");
        }
    }
}

/// Compressor writing to a file through a `BufWriter`.
pub type FileEncoder = LzipWriter<BufWriter<File>>;

impl LzipWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and open an encoder session for it.
    pub fn create(path: impl AsRef<Path>, options: &EncodeOptions) -> Result<Self> {
        let file = File::create(path)?;
        LzipWriter::new(BufWriter::new(file), options)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LzipReader
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming lzip decompressor implementing [`std::io::Read`].
///
/// A word-size leftover at the end of the stream is returned as an
/// `InvalidData` error wrapping [`Error::RemainingBytes`], after every
/// aligned byte has been read.
pub struct LzipReader<'a> {
    chunks: DecompressIter<'a>,
    buf: Vec<u8>,
    pos: usize,
}

impl<'a> LzipReader<'a> {
    pub fn new(source: Source<'a>, options: &DecodeOptions) -> Result<Self> {
        Ok(LzipReader {
            chunks: DecompressIter::new(source, options)?,
            buf: Vec::new(),
            pos: 0,
        })
    }

    /// Decode from an already-open reader.
    pub fn from_reader(reader: impl Read + 'a, options: &DecodeOptions) -> Result<Self> {
        Self::new(Source::reader(reader), options)
    }
}

impl Read for LzipReader<'_> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        while self.pos == self.buf.len() {
            match self.chunks.next() {
                Some(Ok(chunk)) => {
                    self.buf = chunk;
                    self.pos = 0;
                }
                Some(Err(error)) => return Err(error.into()),
                None => return Ok(0),
            }
        }
        let n = out.len().min(self.buf.len() - self.pos);
        out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_back() {
        let original: Vec<u8> = b"streaming test data"
            .iter()
            .cycle()
            .take(4096)
            .cloned()
            .collect();

        let mut writer = LzipWriter::new(Vec::new(), &EncodeOptions::default()).unwrap();
        for chunk in original.chunks(256) {
            writer.write_all(chunk).unwrap();
        }
        let compressed = writer.finish().unwrap();

        let mut reader =
            LzipReader::from_reader(&compressed[..], &DecodeOptions::default()).unwrap();
        let mut recovered = Vec::new();
        let mut tmp = [0u8; 300];
        loop {
            let n = reader.read(&mut tmp).unwrap();
            if n == 0 {
                break;
            }
            recovered.extend_from_slice(&tmp[..n]);
        }
        assert_eq!(recovered, original);
    }

    #[test]
    fn drop_without_finish_still_produces_valid_stream() {
        let mut sink = Vec::new();
        {
            let mut writer = LzipWriter::new(&mut sink, &EncodeOptions::new().level(1)).unwrap();
            writer.write_all(b"finalized on drop").unwrap();
        }
        let mut reader = LzipReader::from_reader(&sink[..], &DecodeOptions::default()).unwrap();
        let mut recovered = Vec::new();
        reader.read_to_end(&mut recovered).unwrap();
        assert_eq!(recovered, b"finalized on drop");
    }

    #[test]
    fn reader_surfaces_leftover_after_aligned_data() {
        let mut writer = LzipWriter::new(Vec::new(), &EncodeOptions::default()).unwrap();
        writer.write_all(&[5u8; 10]).unwrap();
        let compressed = writer.finish().unwrap();

        let options = DecodeOptions::new().word_size(4);
        let mut reader = LzipReader::from_reader(&compressed[..], &options).unwrap();
        let mut aligned = [0u8; 8];
        reader.read_exact(&mut aligned).unwrap();
        let err = reader.read(&mut [0u8; 8]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("not a multiple of 4"));
    }
}
