//! Encoder and decoder sessions.
//!
//! A session owns exactly one codec engine and walks it through
//! `open → feed* → finish`. `finish` consumes the session, so finishing twice
//! or feeding after finishing does not compile. The remaining way into the
//! closed state is an engine failure: the engine is dropped on the spot and
//! every later call reports [`Error::SessionClosed`].

use crate::codec::{CodecError, CompressEngine, DecompressEngine, LzipDecoder, LzipEncoder};
use crate::config::{MEMBER_SIZE_MAX, MEMBER_SIZE_MIN};
use crate::error::{Error, RemainingBytes, Result};
use crate::io::{DecodeOptions, EncodeOptions};
use crate::preset::Preset;

// ─────────────────────────────────────────────────────────────────────────────
// Shared open/closed state
// ─────────────────────────────────────────────────────────────────────────────

enum State<E> {
    Open(E),
    Closed,
}

impl<E> State<E> {
    /// Run `op` against the engine; close the session if it fails.
    fn with_engine<T>(
        &mut self,
        op: impl FnOnce(&mut E) -> std::result::Result<T, CodecError>,
    ) -> Result<T> {
        let State::Open(engine) = self else {
            return Err(Error::SessionClosed);
        };
        match op(engine) {
            Ok(value) => Ok(value),
            Err(error) => {
                *self = State::Closed;
                Err(error.into())
            }
        }
    }

    fn take(self) -> Result<E> {
        match self {
            State::Open(engine) => Ok(engine),
            State::Closed => Err(Error::SessionClosed),
        }
    }

    fn is_open(&self) -> bool {
        matches!(self, State::Open(_))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EncoderSession
// ─────────────────────────────────────────────────────────────────────────────

/// Incremental compressor.
///
/// Concatenating every fragment returned by [`compress`](Self::compress) with
/// the bytes returned by [`finish`](Self::finish) gives the complete stream;
/// fragments do not line up with input chunk boundaries.
pub struct EncoderSession<E = LzipEncoder> {
    state: State<E>,
    bytes_in: u64,
    bytes_out: u64,
}

impl EncoderSession<LzipEncoder> {
    /// Open an lzip encoder for `preset`, starting a new member every
    /// `member_size` uncompressed bytes.
    pub fn open(preset: Preset, member_size: u64) -> Result<Self> {
        if !(MEMBER_SIZE_MIN..=MEMBER_SIZE_MAX).contains(&member_size) {
            return Err(Error::InvalidConfig("member_size must lie in [4 KiB, 2 PiB]"));
        }
        let engine = LzipEncoder::new(
            preset.dictionary_size(),
            preset.match_len_limit(),
            member_size,
        )?;
        tracing::debug!(
            dictionary_size = engine.dictionary_size(),
            match_len_limit = preset.match_len_limit(),
            member_size,
            "encoder session opened"
        );
        Ok(Self::with_engine(engine))
    }

    /// Resolve the level in `options` and open an encoder for it.
    pub fn from_options(options: &EncodeOptions) -> Result<Self> {
        let preset = options.validate()?;
        Self::open(preset, options.member_size)
    }
}

impl<E: CompressEngine> EncoderSession<E> {
    /// Wrap an already-constructed engine.
    pub fn with_engine(engine: E) -> Self {
        EncoderSession {
            state: State::Open(engine),
            bytes_in: 0,
            bytes_out: 0,
        }
    }

    /// Feed `chunk` and return the compressed bytes that became available.
    pub fn compress(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        let out = self.state.with_engine(|engine| engine.compress(chunk))?;
        self.bytes_in += chunk.len() as u64;
        self.bytes_out += out.len() as u64;
        Ok(out)
    }

    /// Close the last member and return the final bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let out = self.state.take()?.finish()?;
        tracing::debug!(
            bytes_in = self.bytes_in,
            bytes_out = self.bytes_out + out.len() as u64,
            "encoder session finished"
        );
        Ok(out)
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Uncompressed bytes accepted so far.
    pub fn bytes_in(&self) -> u64 {
        self.bytes_in
    }

    /// Compressed bytes returned so far (excluding the `finish` result).
    pub fn bytes_out(&self) -> u64 {
        self.bytes_out
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DecoderSession
// ─────────────────────────────────────────────────────────────────────────────

/// Result of [`DecoderSession::finish`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeTail {
    /// Final decoded bytes, a multiple of the word size.
    pub data: Vec<u8>,
    /// Trailing bytes that did not complete a word.
    pub leftover: Vec<u8>,
}

impl DecodeTail {
    /// Turn a non-empty leftover into [`Error::RemainingBytes`].
    pub fn into_result(self, word_size: usize) -> Result<Vec<u8>> {
        if self.leftover.is_empty() {
            Ok(self.data)
        } else {
            Err(Error::RemainingBytes(RemainingBytes::new(word_size, self.leftover)))
        }
    }
}

/// Incremental decompressor enforcing a word-size alignment on its output.
pub struct DecoderSession<D = LzipDecoder> {
    state: State<D>,
    word_size: usize,
    bytes_out: u64,
}

impl DecoderSession<LzipDecoder> {
    /// Open an lzip decoder. `word_size` must be at least 1.
    pub fn open(word_size: usize) -> Result<Self> {
        if word_size == 0 {
            return Err(Error::InvalidConfig("word_size must be at least 1"));
        }
        tracing::debug!(word_size, "decoder session opened");
        Ok(Self::with_engine(LzipDecoder::new(word_size), word_size))
    }

    pub fn from_options(options: &DecodeOptions) -> Result<Self> {
        Self::open(options.word_size)
    }
}

impl<D: DecompressEngine> DecoderSession<D> {
    /// Wrap an engine already configured for `word_size`.
    pub fn with_engine(engine: D, word_size: usize) -> Self {
        DecoderSession {
            state: State::Open(engine),
            word_size: word_size.max(1),
            bytes_out: 0,
        }
    }

    /// Feed compressed bytes and return newly decoded, word-aligned bytes.
    pub fn decompress(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        let out = self.state.with_engine(|engine| engine.decompress(chunk))?;
        self.bytes_out += out.len() as u64;
        Ok(out)
    }

    /// Finish decoding. A length that is not a multiple of the word size is
    /// reported through [`DecodeTail::leftover`], not as an error.
    pub fn finish(self) -> Result<DecodeTail> {
        let (data, leftover) = self.state.take()?.finish()?;
        tracing::debug!(
            bytes_out = self.bytes_out + data.len() as u64,
            leftover = leftover.len(),
            "decoder session finished"
        );
        Ok(DecodeTail { data, leftover })
    }

    pub fn word_size(&self) -> usize {
        self.word_size
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Decoded bytes returned so far (excluding the `finish` result).
    pub fn bytes_out(&self) -> u64 {
        self.bytes_out
    }
}
