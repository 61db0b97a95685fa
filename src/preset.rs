//! Compression presets.
//!
//! A preset is the pair of parameters the lzip encoder is opened with: the
//! dictionary (sliding window) size and the match length limit. Callers pick
//! one either by level, an index into a fixed table, or by giving the pair
//! explicitly. Explicit pairs are checked against the bounds the member format
//! can carry; table entries are trusted as-is (level 0 uses a 65535-byte
//! dictionary, which the encoder rounds up to 64 KiB when writing the header).

use thiserror::Error;

use crate::config::{
    DICTIONARY_SIZE_LIMIT, DICTIONARY_SIZE_MIN, LEVEL_DEFAULT, LEVEL_MAX, MATCH_LEN_LIMIT_MAX,
    MATCH_LEN_LIMIT_MIN,
};

/// `(dictionary_size, match_len_limit)` for levels 0 through 9.
pub const LEVEL_TABLE: [Preset; 10] = [
    Preset::from_table(65_535, 16),
    Preset::from_table(1 << 20, 5),
    Preset::from_table(3 << 19, 6),
    Preset::from_table(1 << 21, 8),
    Preset::from_table(3 << 20, 12),
    Preset::from_table(1 << 22, 20),
    Preset::from_table(1 << 23, 36),
    Preset::from_table(1 << 24, 68),
    Preset::from_table(3 << 23, 132),
    Preset::from_table(1 << 25, 273),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresetError {
    #[error("level {0} is outside 0..={LEVEL_MAX}")]
    LevelOutOfRange(i32),
    #[error(
        "dictionary size {0} is outside [{DICTIONARY_SIZE_MIN}, {DICTIONARY_SIZE_LIMIT})"
    )]
    DictionarySize(u32),
    #[error(
        "match length limit {0} is outside [{MATCH_LEN_LIMIT_MIN}, {MATCH_LEN_LIMIT_MAX}]"
    )]
    MatchLenLimit(u32),
}

/// Resolved encoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Preset {
    dictionary_size: u32,
    match_len_limit: u32,
}

impl Preset {
    const fn from_table(dictionary_size: u32, match_len_limit: u32) -> Self {
        Preset {
            dictionary_size,
            match_len_limit,
        }
    }

    /// Build a preset from an explicit pair, enforcing the format bounds.
    pub fn new(dictionary_size: u32, match_len_limit: u32) -> Result<Self, PresetError> {
        if !(DICTIONARY_SIZE_MIN..DICTIONARY_SIZE_LIMIT).contains(&dictionary_size) {
            return Err(PresetError::DictionarySize(dictionary_size));
        }
        if !(MATCH_LEN_LIMIT_MIN..=MATCH_LEN_LIMIT_MAX).contains(&match_len_limit) {
            return Err(PresetError::MatchLenLimit(match_len_limit));
        }
        Ok(Preset::from_table(dictionary_size, match_len_limit))
    }

    pub fn dictionary_size(&self) -> u32 {
        self.dictionary_size
    }

    pub fn match_len_limit(&self) -> u32 {
        self.match_len_limit
    }
}

impl Default for Preset {
    fn default() -> Self {
        LEVEL_TABLE[LEVEL_DEFAULT as usize]
    }
}

/// How a caller asks for a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Table lookup; valid values are `0..=9`.
    Index(i32),
    /// Explicit parameters, validated on resolution.
    Custom {
        dictionary_size: u32,
        match_len_limit: u32,
    },
}

impl Default for Level {
    fn default() -> Self {
        Level::Index(LEVEL_DEFAULT)
    }
}

impl From<i32> for Level {
    fn from(level: i32) -> Self {
        Level::Index(level)
    }
}

impl From<u8> for Level {
    fn from(level: u8) -> Self {
        Level::Index(i32::from(level))
    }
}

impl From<(u32, u32)> for Level {
    fn from((dictionary_size, match_len_limit): (u32, u32)) -> Self {
        Level::Custom {
            dictionary_size,
            match_len_limit,
        }
    }
}

impl From<Preset> for Level {
    fn from(preset: Preset) -> Self {
        Level::Custom {
            dictionary_size: preset.dictionary_size,
            match_len_limit: preset.match_len_limit,
        }
    }
}

/// Turn a level or an explicit pair into encoder parameters.
pub fn resolve(level: impl Into<Level>) -> Result<Preset, PresetError> {
    match level.into() {
        Level::Index(index) => usize::try_from(index)
            .ok()
            .and_then(|i| LEVEL_TABLE.get(i))
            .copied()
            .ok_or(PresetError::LevelOutOfRange(index)),
        Level::Custom {
            dictionary_size,
            match_len_limit,
        } => Preset::new(dictionary_size, match_len_limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_level_six() {
        let preset = Preset::default();
        assert_eq!(preset.dictionary_size(), 1 << 23);
        assert_eq!(preset.match_len_limit(), 36);
        assert_eq!(resolve(Level::default()).unwrap(), preset);
    }

    #[test]
    fn table_entries_resolve_by_index() {
        for (i, expected) in LEVEL_TABLE.iter().enumerate() {
            assert_eq!(resolve(i as i32).unwrap(), *expected);
        }
    }

    #[test]
    fn level_zero_uses_odd_dictionary_size() {
        let preset = resolve(0).unwrap();
        assert_eq!(preset.dictionary_size(), 65_535);
        assert_eq!(preset.match_len_limit(), 16);
    }

    #[test]
    fn out_of_range_levels_fail() {
        assert_eq!(resolve(-1), Err(PresetError::LevelOutOfRange(-1)));
        assert_eq!(resolve(10), Err(PresetError::LevelOutOfRange(10)));
        assert_eq!(resolve(i32::MIN), Err(PresetError::LevelOutOfRange(i32::MIN)));
    }

    #[test]
    fn explicit_pair_bounds() {
        assert!(resolve((4096, 5)).is_ok());
        assert!(resolve(((1 << 29) - 1, 273)).is_ok());
        assert_eq!(resolve((4095, 5)), Err(PresetError::DictionarySize(4095)));
        assert_eq!(resolve((1 << 29, 5)), Err(PresetError::DictionarySize(1 << 29)));
        assert_eq!(resolve((4096, 4)), Err(PresetError::MatchLenLimit(4)));
        assert_eq!(resolve((4096, 274)), Err(PresetError::MatchLenLimit(274)));
    }

    #[test]
    fn preset_round_trips_through_level() {
        let preset = resolve(3).unwrap();
        assert_eq!(resolve(Level::from(preset)).unwrap(), preset);
    }
}
