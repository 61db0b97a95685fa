//! Compression entry points built on [`EncoderSession`].

use std::io::{Read, Write};
use std::path::Path;

use crate::config::CHUNK_SIZE_DEFAULT;
use crate::error::Result;
use crate::file::FileEncoder;
use crate::io::options::EncodeOptions;
use crate::session::EncoderSession;
use crate::source::ChunkedReader;

/// Compress `buffer` into a complete in-memory stream.
pub fn compress_to_buffer(buffer: &[u8], options: &EncodeOptions) -> Result<Vec<u8>> {
    let mut session = EncoderSession::from_options(options)?;
    let mut out = session.compress(buffer)?;
    out.extend(session.finish()?);
    Ok(out)
}

/// Compress `buffer` into a new file at `path`, replacing any existing file.
pub fn compress_to_file(
    path: impl AsRef<Path>,
    buffer: &[u8],
    options: &EncodeOptions,
) -> Result<()> {
    let mut encoder = FileEncoder::create(path, options)?;
    encoder.write_all(buffer)?;
    encoder.finish()?;
    Ok(())
}

/// Stream everything from `reader` into `writer` as one compressed stream,
/// reading `chunk_size` bytes at a time. Returns `(bytes_in, bytes_out)`.
pub fn compress_stream<R: Read, W: Write>(
    reader: R,
    mut writer: W,
    options: &EncodeOptions,
    chunk_size: Option<usize>,
) -> Result<(u64, u64)> {
    let mut session = EncoderSession::from_options(options)?;
    let chunks = ChunkedReader::new(reader, chunk_size.unwrap_or(CHUNK_SIZE_DEFAULT))?;
    let mut bytes_out = 0u64;
    for chunk in chunks {
        let compressed = session.compress(&chunk?)?;
        writer.write_all(&compressed)?;
        bytes_out += compressed.len() as u64;
    }
    let bytes_in = session.bytes_in();
    let tail = session.finish()?;
    writer.write_all(&tail)?;
    writer.flush()?;
    Ok((bytes_in, bytes_out + tail.len() as u64))
}
