//! lzip member format constants and the codec error type.
//!
//! A member is laid out as
//!
//! ```text
//! +------+----+----+================+--------+-----------+-------------+
//! | LZIP | VN | DS | LZMA stream    | CRC32  | data size | member size |
//! +------+----+----+================+--------+-----------+-------------+
//!   4 B   1 B  1 B                     4 B LE    8 B LE       8 B LE
//! ```
//!
//! where `VN` is the format version and `DS` the coded dictionary size.

use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Header / trailer layout
// ─────────────────────────────────────────────────────────────────────────────

/// Magic bytes opening every member.
pub const MAGIC: [u8; 4] = *b"LZIP";

/// The only member format version this crate reads and writes.
pub const VERSION: u8 = 1;

/// Header size: magic + version + coded dictionary size.
pub const HEADER_SIZE: usize = 6;

/// Trailer size: CRC32 + data size + member size.
pub const TRAILER_SIZE: usize = 20;

/// Smallest dictionary a header can describe (4 KiB).
pub const MIN_DICTIONARY_SIZE: u32 = 1 << 12;

/// Largest dictionary a header can describe (512 MiB).
pub const MAX_DICTIONARY_SIZE: u32 = 1 << 29;

// ─────────────────────────────────────────────────────────────────────────────
// LZMA literal/position parameters fixed by the format
// ─────────────────────────────────────────────────────────────────────────────

/// Literal context bits.
pub const LITERAL_CONTEXT_BITS: u32 = 3;
/// Literal position bits.
pub const LITERAL_POSITION_BITS: u32 = 0;
/// Position bits.
pub const POSITION_BITS: u32 = 2;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Failure raised by the lzip engine.
///
/// After any of these the engine is in an undefined state; the owning session
/// closes itself and refuses further calls.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("bad magic number (not an lzip member)")]
    BadMagic,
    #[error("unsupported lzip version {0}")]
    UnsupportedVersion(u8),
    #[error("invalid dictionary size in member header")]
    InvalidDictionarySize,
    #[error("CRC mismatch: stored {stored:08x}, computed {computed:08x}")]
    CrcMismatch { stored: u32, computed: u32 },
    #[error("data size mismatch: stored {stored}, decoded {actual}")]
    DataSizeMismatch { stored: u64, actual: u64 },
    #[error("member size mismatch: stored {stored}, read {actual}")]
    MemberSizeMismatch { stored: u64, actual: u64 },
    #[error("unexpected end of compressed stream")]
    Truncated,
    #[error("lzma engine requested a memory limit increase")]
    MemoryLimit,
    #[error("lzma engine made no progress on pending input")]
    Stalled,
    #[error("lzma stream error: {0}")]
    Lzma(#[from] liblzma::stream::Error),
}
