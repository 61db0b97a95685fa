//! Decompression facades.
//!
//! Two ways to consume one decode: [`DecompressIter`], a lazy sequence of
//! decoded chunks, and the buffered `decompress_*` functions that collect
//! that sequence into one `Vec<u8>`.
//!
//! A word-alignment leftover is reported by the iterator as its final item,
//! after the last decoded chunk. The buffered functions return only that
//! error: the bytes decoded before it are dropped with the partial buffer.
//! Callers that need both should drive the iterator.

use std::io::Read;
use std::path::Path;

use crate::error::{Error, RemainingBytes, Result};
use crate::io::options::DecodeOptions;
use crate::session::DecoderSession;
use crate::source::{ChunkedReader, Source, UrlOptions};

// ─────────────────────────────────────────────────────────────────────────────
// DecompressIter
// ─────────────────────────────────────────────────────────────────────────────

/// Lazy decode of one source.
///
/// Yields non-empty decoded chunks in input order. When the source is
/// exhausted it is dropped right away, the decoder is finished, its tail is
/// yielded, and a non-empty leftover follows as
/// `Err(Error::RemainingBytes(..))`. Any error ends the sequence. Dropping the
/// iterator early releases the source.
pub struct DecompressIter<'a> {
    chunks: Option<ChunkedReader<Box<dyn Read + 'a>>>,
    session: Option<DecoderSession>,
    word_size: usize,
    pending: Option<Error>,
}

impl<'a> DecompressIter<'a> {
    /// Open `source` and a decoder session configured by `options`.
    pub fn new(source: Source<'a>, options: &DecodeOptions) -> Result<Self> {
        let chunk_size = options
            .chunk_size
            .unwrap_or_else(|| source.default_chunk_size());
        if chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be greater than 0"));
        }
        let session = DecoderSession::from_options(options)?;
        let chunks = ChunkedReader::new(source.open()?, chunk_size)?;
        Ok(DecompressIter {
            chunks: Some(chunks),
            session: Some(session),
            word_size: options.word_size,
            pending: None,
        })
    }

    /// `true` while the source is still held open.
    pub fn is_source_open(&self) -> bool {
        self.chunks.is_some()
    }

    fn close(&mut self) {
        self.chunks = None;
        self.session = None;
    }

    fn finish(&mut self) -> Option<Result<Vec<u8>>> {
        let session = self.session.take()?;
        let tail = match session.finish() {
            Ok(tail) => tail,
            Err(error) => return Some(Err(error)),
        };
        let leftover = (!tail.leftover.is_empty())
            .then(|| Error::RemainingBytes(RemainingBytes::new(self.word_size, tail.leftover)));
        if tail.data.is_empty() {
            leftover.map(Err)
        } else {
            self.pending = leftover;
            Some(Ok(tail.data))
        }
    }
}

impl Iterator for DecompressIter<'_> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.pending.take() {
            return Some(Err(error));
        }
        while let Some(chunks) = self.chunks.as_mut() {
            let chunk = match chunks.next() {
                Some(Ok(chunk)) => chunk,
                Some(Err(error)) => {
                    self.close();
                    return Some(Err(error.into()));
                }
                None => {
                    self.chunks = None;
                    break;
                }
            };
            let session = self.session.as_mut()?;
            match session.decompress(&chunk) {
                Ok(decoded) if decoded.is_empty() => continue,
                Ok(decoded) => return Some(Ok(decoded)),
                Err(error) => {
                    self.close();
                    return Some(Err(error));
                }
            }
        }
        self.finish()
    }
}

impl std::iter::FusedIterator for DecompressIter<'_> {}

// ─────────────────────────────────────────────────────────────────────────────
// Entry points
// ─────────────────────────────────────────────────────────────────────────────

/// Lazy decode of any [`Source`].
pub fn decompress_source_iter<'a>(
    source: Source<'a>,
    options: &DecodeOptions,
) -> Result<DecompressIter<'a>> {
    DecompressIter::new(source, options)
}

/// Buffered decode of any [`Source`].
pub fn decompress_source(source: Source<'_>, options: &DecodeOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for chunk in decompress_source_iter(source, options)? {
        out.extend_from_slice(&chunk?);
    }
    Ok(out)
}

/// Lazy decode of an already-open reader.
pub fn decompress_reader_iter<'a, R: Read + 'a>(
    reader: R,
    options: &DecodeOptions,
) -> Result<DecompressIter<'a>> {
    decompress_source_iter(Source::reader(reader), options)
}

/// Buffered decode of an already-open reader.
pub fn decompress_reader<R: Read>(reader: R, options: &DecodeOptions) -> Result<Vec<u8>> {
    decompress_source(Source::reader(reader), options)
}

/// Lazy decode of a file; the file is closed when the iterator ends or drops.
pub fn decompress_file_iter(
    path: impl AsRef<Path>,
    options: &DecodeOptions,
) -> Result<DecompressIter<'static>> {
    decompress_source_iter(Source::path(path), options)
}

/// Buffered decode of a file.
pub fn decompress_file(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Vec<u8>> {
    decompress_source(Source::path(path), options)
}

/// Lazy decode of an in-memory buffer.
pub fn decompress_buffer_iter<'a>(
    buffer: &'a [u8],
    options: &DecodeOptions,
) -> Result<DecompressIter<'a>> {
    decompress_source_iter(Source::buffer(buffer), options)
}

/// Buffered decode of an in-memory buffer.
pub fn decompress_buffer(buffer: &[u8], options: &DecodeOptions) -> Result<Vec<u8>> {
    decompress_source(Source::buffer(buffer), options)
}

/// Lazy decode of a URL; the response is closed when the iterator ends or drops.
pub fn decompress_url_iter(
    url: &str,
    url_options: &UrlOptions,
    options: &DecodeOptions,
) -> Result<DecompressIter<'static>> {
    decompress_source_iter(Source::url(url, url_options.clone()), options)
}

/// Buffered decode of a URL.
pub fn decompress_url(
    url: &str,
    url_options: &UrlOptions,
    options: &DecodeOptions,
) -> Result<Vec<u8>> {
    decompress_source(Source::url(url, url_options.clone()), options)
}
