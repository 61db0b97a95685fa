//! Public compress/decompress surface.
//!
//! This module assembles the facade sub-modules and re-exports the symbols
//! consumed by the CLI and library users.

pub mod compress;
pub mod decompress;
pub mod options;

// ── Configuration ─────────────────────────────────────────────────────────────
pub use options::{DecodeOptions, EncodeOptions};

// ── Decompression: lazy ───────────────────────────────────────────────────────
pub use decompress::{
    decompress_buffer_iter, decompress_file_iter, decompress_reader_iter,
    decompress_source_iter, decompress_url_iter, DecompressIter,
};

// ── Decompression: buffered ───────────────────────────────────────────────────
pub use decompress::{
    decompress_buffer, decompress_file, decompress_reader, decompress_source, decompress_url,
};

// ── Compression ───────────────────────────────────────────────────────────────
pub use compress::{compress_stream, compress_to_buffer, compress_to_file};
