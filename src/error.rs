//! Crate-wide error type.
//!
//! Everything the sessions, sources and facades can fail with funnels into
//! [`Error`]. The one variant callers are expected to branch on in normal
//! operation is [`Error::RemainingBytes`]: decoded output whose length is not
//! a multiple of the requested word size. It carries the withheld bytes so
//! they can be appended, discarded or carried over to the next window.

use std::io;

use thiserror::Error;

use crate::codec::CodecError;
use crate::preset::PresetError;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Decoded bytes withheld because the total length was not word-aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemainingBytes {
    /// Alignment that was requested when the decoder was opened.
    pub word_size: usize,
    /// The trailing `total % word_size` decoded bytes.
    pub bytes: Vec<u8>,
}

impl RemainingBytes {
    pub fn new(word_size: usize, bytes: Vec<u8>) -> Self {
        RemainingBytes { word_size, bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid preset: {0}")]
    InvalidPreset(#[from] PresetError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("the session is closed")]
    SessionClosed,

    #[error(
        "the total number of bytes is not a multiple of {} ({} remaining)",
        .0.word_size,
        .0.bytes.len()
    )]
    RemainingBytes(RemainingBytes),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("unsupported url scheme '{0}'")]
    UnsupportedScheme(String),
}

impl Error {
    /// `true` for the word-alignment condition, which is a data-shape signal
    /// rather than a failure of the stream itself.
    pub fn is_remaining_bytes(&self) -> bool {
        matches!(self, Error::RemainingBytes(_))
    }

    pub fn remaining_bytes(&self) -> Option<&RemainingBytes> {
        match self {
            Error::RemainingBytes(remaining) => Some(remaining),
            _ => None,
        }
    }

    pub fn into_remaining_bytes(self) -> std::result::Result<RemainingBytes, Error> {
        match self {
            Error::RemainingBytes(remaining) => Ok(remaining),
            other => Err(other),
        }
    }
}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::Io(inner) => inner,
            Error::InvalidPreset(_) | Error::InvalidConfig(_) => {
                io::Error::new(io::ErrorKind::InvalidInput, error)
            }
            Error::SessionClosed => io::Error::other(error),
            _ => io::Error::new(io::ErrorKind::InvalidData, error),
        }
    }
}
