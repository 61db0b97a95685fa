//! lzip decoder engine.
//!
//! Input is consumed through a three-stage machine (header, LZMA body,
//! trailer) that can stop and resume at any byte, so callers may feed chunks
//! of any size. Decoded output is handed back in whole words only: bytes that
//! do not yet complete a `word_size` unit stay buffered until more data
//! arrives or the stream finishes.

use crc32fast::Hasher;
use liblzma::stream::{Filters, LzmaOptions, Stream};

use crate::codec::header::{parse_header, Trailer};
use crate::codec::types::{
    CodecError, HEADER_SIZE, LITERAL_CONTEXT_BITS, LITERAL_POSITION_BITS, POSITION_BITS,
    TRAILER_SIZE,
};
use crate::codec::{pump, DecompressEngine};
use crate::config::ENGINE_BUFFER_SIZE;

struct MemberDecoder {
    stream: Stream,
    crc: Hasher,
    data_size: u64,
}

impl MemberDecoder {
    fn open(dictionary_size: u32) -> Result<Self, CodecError> {
        let mut options = LzmaOptions::new_preset(0)?;
        options
            .dict_size(dictionary_size)
            .literal_context_bits(LITERAL_CONTEXT_BITS)
            .literal_position_bits(LITERAL_POSITION_BITS)
            .position_bits(POSITION_BITS);
        let mut filters = Filters::new();
        filters.lzma1(&options);
        Ok(MemberDecoder {
            stream: Stream::new_raw_decoder(&filters)?,
            crc: Hasher::new(),
            data_size: 0,
        })
    }

    /// Decode as much of `input` as belongs to this member into `out`.
    fn feed(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(usize, bool), CodecError> {
        let start = out.len();
        let pumped = pump(&mut self.stream, input, out, false, ENGINE_BUFFER_SIZE)?;
        self.crc.update(&out[start..]);
        self.data_size += (out.len() - start) as u64;
        if pumped.consumed == 0 && !pumped.ended && !input.is_empty() {
            return Err(CodecError::Stalled);
        }
        Ok((pumped.consumed, pumped.ended))
    }

    /// What the trailer of this member must contain.
    fn expected_trailer(&self) -> Trailer {
        Trailer {
            crc: self.crc.clone().finalize(),
            data_size: self.data_size,
            member_size: (HEADER_SIZE + TRAILER_SIZE) as u64 + self.stream.total_in(),
        }
    }
}

enum Stage {
    Header {
        buf: [u8; HEADER_SIZE],
        filled: usize,
    },
    Body(Box<MemberDecoder>),
    Trailer {
        buf: [u8; TRAILER_SIZE],
        filled: usize,
        expected: Trailer,
    },
}

impl Stage {
    fn header() -> Self {
        Stage::Header {
            buf: [0; HEADER_SIZE],
            filled: 0,
        }
    }
}

/// Copy as much of `input` as fits into the unfilled part of `buf`.
fn fill<const N: usize>(buf: &mut [u8; N], filled: &mut usize, input: &[u8]) -> usize {
    let n = (N - *filled).min(input.len());
    buf[*filled..*filled + n].copy_from_slice(&input[..n]);
    *filled += n;
    n
}

/// Streaming lzip decompressor with word-aligned output.
pub struct LzipDecoder {
    word_size: usize,
    stage: Stage,
    /// Decoded bytes not yet returned (always shorter than one word between calls).
    decoded: Vec<u8>,
    members: u64,
}

impl LzipDecoder {
    /// Open a decoder whose output is released in multiples of `word_size`.
    /// A zero word size is treated as 1; sessions reject it before reaching here.
    pub fn new(word_size: usize) -> Self {
        LzipDecoder {
            word_size: word_size.max(1),
            stage: Stage::header(),
            decoded: Vec::new(),
            members: 0,
        }
    }

    pub fn word_size(&self) -> usize {
        self.word_size
    }

    /// Number of members fully decoded and verified.
    pub fn members(&self) -> u64 {
        self.members
    }

    /// Split off every complete word from the front of the decoded buffer.
    fn take_aligned(&mut self) -> Vec<u8> {
        let aligned = self.decoded.len() - self.decoded.len() % self.word_size;
        let partial = self.decoded.split_off(aligned);
        std::mem::replace(&mut self.decoded, partial)
    }
}

impl DecompressEngine for LzipDecoder {
    fn decompress(&mut self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut rest = input;
        while !rest.is_empty() {
            match &mut self.stage {
                Stage::Header { buf, filled } => {
                    let n = fill(buf, filled, rest);
                    rest = &rest[n..];
                    if *filled == HEADER_SIZE {
                        let dictionary_size = parse_header(buf)?;
                        self.stage = Stage::Body(Box::new(MemberDecoder::open(dictionary_size)?));
                    }
                }
                Stage::Body(member) => {
                    let (consumed, ended) = member.feed(rest, &mut self.decoded)?;
                    rest = &rest[consumed..];
                    if ended {
                        let expected = member.expected_trailer();
                        self.stage = Stage::Trailer {
                            buf: [0; TRAILER_SIZE],
                            filled: 0,
                            expected,
                        };
                    }
                }
                Stage::Trailer {
                    buf,
                    filled,
                    expected,
                } => {
                    let n = fill(buf, filled, rest);
                    rest = &rest[n..];
                    if *filled == TRAILER_SIZE {
                        Trailer::from_bytes(buf).verify(expected)?;
                        self.members += 1;
                        tracing::trace!(
                            member = self.members,
                            data_size = expected.data_size,
                            "lzip member verified"
                        );
                        self.stage = Stage::header();
                    }
                }
            }
        }
        Ok(self.take_aligned())
    }

    fn finish(mut self) -> Result<(Vec<u8>, Vec<u8>), CodecError> {
        match self.stage {
            Stage::Header { filled: 0, .. } => {}
            _ => return Err(CodecError::Truncated),
        }
        let tail = self.take_aligned();
        Ok((tail, self.decoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encoder::LzipEncoder;
    use crate::codec::CompressEngine;

    fn compress(data: &[u8], member_size: u64) -> Vec<u8> {
        let mut encoder = LzipEncoder::new(1 << 16, 16, member_size).unwrap();
        let mut out = encoder.compress(data).unwrap();
        out.extend(encoder.finish().unwrap());
        out
    }

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 % 256) as u8).collect()
    }

    #[test]
    fn decodes_byte_at_a_time() {
        let data = sample(3000);
        let compressed = compress(&data, u64::MAX);
        let mut decoder = LzipDecoder::new(1);
        let mut out = Vec::new();
        for byte in &compressed {
            out.extend(decoder.decompress(std::slice::from_ref(byte)).unwrap());
        }
        let (tail, leftover) = decoder.finish().unwrap();
        out.extend(tail);
        assert!(leftover.is_empty());
        assert_eq!(out, data);
    }

    #[test]
    fn output_is_word_aligned_and_leftover_reported() {
        let data = sample(254);
        let compressed = compress(&data, u64::MAX);
        let mut decoder = LzipDecoder::new(100);
        let body = decoder.decompress(&compressed).unwrap();
        assert_eq!(body.len() % 100, 0);
        let (tail, leftover) = decoder.finish().unwrap();
        assert_eq!(body.len() + tail.len(), 200);
        assert_eq!(leftover, &data[200..]);
    }

    #[test]
    fn multi_member_stream_counts_members() {
        let data = sample(9000);
        let compressed = compress(&data, 4096);
        let mut decoder = LzipDecoder::new(1);
        let out = decoder.decompress(&compressed).unwrap();
        assert_eq!(decoder.members(), 3);
        let (tail, _) = decoder.finish().unwrap();
        assert_eq!([out, tail].concat(), data);
    }

    #[test]
    fn empty_input_finishes_cleanly() {
        let decoder = LzipDecoder::new(1);
        let (tail, leftover) = decoder.finish().unwrap();
        assert!(tail.is_empty() && leftover.is_empty());
    }

    #[test]
    fn truncated_stream_fails_on_finish() {
        let compressed = compress(&sample(500), u64::MAX);
        let mut decoder = LzipDecoder::new(1);
        decoder.decompress(&compressed[..compressed.len() - 5]).unwrap();
        assert!(matches!(decoder.finish(), Err(CodecError::Truncated)));
    }

    #[test]
    fn corrupted_crc_is_detected() {
        let mut compressed = compress(&sample(500), u64::MAX);
        let crc_at = compressed.len() - TRAILER_SIZE;
        compressed[crc_at] ^= 0xFF;
        let mut decoder = LzipDecoder::new(1);
        assert!(matches!(
            decoder.decompress(&compressed),
            Err(CodecError::CrcMismatch { .. })
        ));
    }

    #[test]
    fn garbage_is_rejected_as_bad_magic() {
        let mut decoder = LzipDecoder::new(1);
        assert!(matches!(
            decoder.decompress(b"not an lzip file"),
            Err(CodecError::BadMagic)
        ));
    }
}
