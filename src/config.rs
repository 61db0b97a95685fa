// config.rs: Defaults and hard bounds shared by the sessions, the facades
// and the command-line tool.
//
// Every tunable that callers can override through `EncodeOptions`,
// `DecodeOptions` or a CLI flag has its default here; the bounds are the
// ones the lzip member format can represent.

// Default compression level (index into the preset table).
// Level 6 resolves to an 8 MiB dictionary with a 36-byte match length limit.
pub const LEVEL_DEFAULT: i32 = 6;

// Highest valid preset level. Levels run 0..=LEVEL_MAX.
pub const LEVEL_MAX: i32 = 9;

// Decoded output is validated against this alignment unless the caller asks
// for another one. A word size of 1 never produces leftover bytes.
pub const WORD_SIZE_DEFAULT: usize = 1;

// Size of each read issued against a reader, file or URL source (64 KiB).
// Buffer sources default to a single chunk spanning the whole buffer.
pub const CHUNK_SIZE_DEFAULT: usize = 1 << 16;

// Uncompressed bytes per member before the encoder starts a new one.
// 2 PiB is effectively unbounded: every stream is a single member.
pub const MEMBER_SIZE_DEFAULT: u64 = 1 << 51;

// Smallest member size accepted by the encoder (4 KiB).
pub const MEMBER_SIZE_MIN: u64 = 1 << 12;

// Largest member size accepted by the encoder (2 PiB).
pub const MEMBER_SIZE_MAX: u64 = 1 << 51;

// Explicit dictionary sizes must lie in [DICTIONARY_SIZE_MIN, DICTIONARY_SIZE_LIMIT).
pub const DICTIONARY_SIZE_MIN: u32 = 1 << 12;
pub const DICTIONARY_SIZE_LIMIT: u32 = 1 << 29;

// Explicit match length limits must lie in [MATCH_LEN_LIMIT_MIN, MATCH_LEN_LIMIT_MAX].
pub const MATCH_LEN_LIMIT_MIN: u32 = 5;
pub const MATCH_LEN_LIMIT_MAX: u32 = 273;

// Output space reserved before each liblzma process call.
pub const ENGINE_BUFFER_SIZE: usize = 1 << 16;
