// lzip: streaming lzip sessions over readers, files, buffers and URLs

pub mod config;
pub mod error;
pub mod preset;
pub mod codec;
pub mod session;
pub mod source;
pub mod io;
pub mod file;
pub mod cli;

// ── Version constants ─────────────────────────────────────────────────────────
pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version string.
pub fn version_string() -> &'static str {
    VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use error::{Error, RemainingBytes, Result};
pub use preset::{resolve, Level, Preset, PresetError, LEVEL_TABLE};
pub use session::{DecodeTail, DecoderSession, EncoderSession};
pub use source::{ChunkedReader, Source, UrlOptions};
pub use file::{FileEncoder, LzipReader, LzipWriter};
pub use io::{
    compress_stream, compress_to_buffer, compress_to_file, decompress_buffer,
    decompress_buffer_iter, decompress_file, decompress_file_iter, decompress_reader,
    decompress_reader_iter, decompress_source, decompress_source_iter, decompress_url,
    decompress_url_iter, DecodeOptions, DecompressIter, EncodeOptions,
};
