// options.rs: Caller-facing configuration for the compress/decompress
// facades. Setters do not validate; values are checked when a session or
// iterator is opened (or up front through `EncodeOptions::validate`), so an
// invalid option surfaces as `Error::InvalidConfig` or `Error::InvalidPreset`.

use crate::config::{MEMBER_SIZE_DEFAULT, MEMBER_SIZE_MAX, MEMBER_SIZE_MIN, WORD_SIZE_DEFAULT};
use crate::error::{Error, Result};
use crate::preset::{resolve, Level, Preset};

/// Settings for every `decompress_*` entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Decoded output length must be a multiple of this (>= 1).
    pub word_size: usize,
    /// Bytes requested from the source per read. `None` picks the source's
    /// default: the whole buffer for buffers, 64 KiB otherwise.
    pub chunk_size: Option<usize>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            word_size: WORD_SIZE_DEFAULT,
            chunk_size: None,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn word_size(mut self, word_size: usize) -> Self {
        self.word_size = word_size;
        self
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }
}

/// Settings for every compression entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Preset level (0..=9) or explicit `(dictionary_size, match_len_limit)`.
    pub level: Level,
    /// Uncompressed bytes per member.
    pub member_size: u64,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            level: Level::default(),
            member_size: MEMBER_SIZE_DEFAULT,
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: impl Into<Level>) -> Self {
        self.level = level.into();
        self
    }

    pub fn member_size(mut self, member_size: u64) -> Self {
        self.member_size = member_size;
        self
    }

    /// Resolve the level and check `member_size` without opening an encoder.
    pub fn validate(&self) -> Result<Preset> {
        let preset = resolve(self.level)?;
        if !(MEMBER_SIZE_MIN..=MEMBER_SIZE_MAX).contains(&self.member_size) {
            return Err(Error::InvalidConfig("member_size must lie in [4 KiB, 2 PiB]"));
        }
        Ok(preset)
    }
}
