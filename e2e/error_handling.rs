//! E2E Test Suite 04: Error Handling & Edge Cases
//!
//! Every failure must come back as a typed `lzip::Error` without panicking,
//! and a session that saw an engine failure must refuse further work.
//!
//! Coverage:
//! - Configuration errors (level, explicit pair, word size, chunk size, member size)
//! - Corrupt streams (magic, version, dictionary byte, CRC, sizes, truncation)
//! - Session poisoning after an engine failure
//! - Random garbage never panics the decoder
//! - Error messages and `std::io::Error` conversion

use std::io;

use lzip::codec::CodecError;
use lzip::io::{
    compress_to_buffer, decompress_buffer, decompress_buffer_iter, DecodeOptions, EncodeOptions,
};
use lzip::{resolve, DecoderSession, EncoderSession, Error, PresetError};
use proptest::prelude::*;

fn stream(data: &[u8]) -> Vec<u8> {
    compress_to_buffer(data, &EncodeOptions::new().level(0)).unwrap()
}

fn decode(compressed: &[u8]) -> Result<Vec<u8>, Error> {
    decompress_buffer(compressed, &DecodeOptions::default())
}

// ═════════════════════════════════════════════════════════════════════════════
// Configuration
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_invalid_levels() {
    assert!(matches!(resolve(-1), Err(PresetError::LevelOutOfRange(-1))));
    assert!(matches!(resolve(10), Err(PresetError::LevelOutOfRange(10))));
    let err = compress_to_buffer(b"x", &EncodeOptions::new().level(10)).unwrap_err();
    assert!(matches!(err, Error::InvalidPreset(PresetError::LevelOutOfRange(10))));
}

#[test]
fn test_invalid_explicit_pairs() {
    for (d, m) in [(0u32, 5u32), (4095, 5), (1 << 29, 5), (4096, 0), (4096, 274)] {
        let err = compress_to_buffer(b"x", &EncodeOptions::new().level((d, m))).unwrap_err();
        assert!(matches!(err, Error::InvalidPreset(_)), "({d}, {m})");
    }
}

#[test]
fn test_zero_word_size_and_chunk_size() {
    assert!(matches!(DecoderSession::open(0), Err(Error::InvalidConfig(_))));
    let compressed = stream(b"abc");
    assert!(matches!(
        decompress_buffer_iter(&compressed, &DecodeOptions::new().chunk_size(0)),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn test_member_size_bounds() {
    let preset = resolve(0).unwrap();
    assert!(EncoderSession::open(preset, 4096).is_ok());
    assert!(EncoderSession::open(preset, 1 << 51).is_ok());
    assert!(matches!(EncoderSession::open(preset, 4095), Err(Error::InvalidConfig(_))));
    assert!(matches!(
        EncoderSession::open(preset, (1 << 51) + 1),
        Err(Error::InvalidConfig(_))
    ));
}

// ═════════════════════════════════════════════════════════════════════════════
// Corrupt streams
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_bad_magic() {
    let mut compressed = stream(b"payload");
    compressed[0] = b'X';
    assert!(matches!(decode(&compressed), Err(Error::Codec(CodecError::BadMagic))));
}

#[test]
fn test_unsupported_version() {
    let mut compressed = stream(b"payload");
    compressed[4] = 0;
    assert!(matches!(
        decode(&compressed),
        Err(Error::Codec(CodecError::UnsupportedVersion(0)))
    ));
}

#[test]
fn test_invalid_dictionary_byte() {
    let mut compressed = stream(b"payload");
    compressed[5] = 30;
    assert!(matches!(
        decode(&compressed),
        Err(Error::Codec(CodecError::InvalidDictionarySize))
    ));
}

#[test]
fn test_crc_mismatch() {
    let mut compressed = stream(&[0x42; 5000]);
    let at = compressed.len() - 20;
    compressed[at + 1] ^= 0x10;
    assert!(matches!(
        decode(&compressed),
        Err(Error::Codec(CodecError::CrcMismatch { .. }))
    ));
}

#[test]
fn test_truncation_at_every_stage() {
    let compressed = stream(&[7u8; 3000]);
    for cut in [1, 5, 6, 10, compressed.len() - 20, compressed.len() - 1] {
        let err = decode(&compressed[..cut]).unwrap_err();
        assert!(
            matches!(err, Error::Codec(CodecError::Truncated)),
            "cut at {cut}: {err}"
        );
    }
}

#[test]
fn test_corrupt_body_is_error() {
    let data: Vec<u8> = (0..20_000u32)
        .map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8)
        .collect();
    let mut compressed = stream(&data);
    for byte in &mut compressed[40..60] {
        *byte = !*byte;
    }
    assert!(decode(&compressed).is_err());
}

// ═════════════════════════════════════════════════════════════════════════════
// Session poisoning
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_decoder_session_closed_after_failure() {
    let mut session = DecoderSession::open(1).unwrap();
    let mut compressed = stream(b"some data");
    compressed[4] = 9;
    assert!(session.decompress(&compressed).is_err());
    assert!(!session.is_open());
    assert!(matches!(session.decompress(&stream(b"ok")), Err(Error::SessionClosed)));
    assert!(matches!(session.finish(), Err(Error::SessionClosed)));
}

#[test]
fn test_iterator_stops_after_error() {
    let mut compressed = stream(&[1u8; 4000]);
    compressed.extend_from_slice(b"JUNKJUNK");
    let items: Vec<_> = decompress_buffer_iter(&compressed, &DecodeOptions::new().chunk_size(64))
        .unwrap()
        .collect();
    let errors = items.iter().filter(|item| item.is_err()).count();
    assert_eq!(errors, 1);
    assert!(items.last().unwrap().is_err());
}

// ═════════════════════════════════════════════════════════════════════════════
// Messages and conversions
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_remaining_bytes_message_and_io_kind() {
    let compressed = stream(&[0u8; 254]);
    let err = decompress_buffer(&compressed, &DecodeOptions::new().word_size(100)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "the total number of bytes is not a multiple of 100 (54 remaining)"
    );
    let io_err: io::Error = err.into();
    assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_garbage_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let _ = decode(&bytes);
    }

    #[test]
    fn test_lzip_header_with_garbage_body_never_panics(
        body in proptest::collection::vec(any::<u8>(), 0..2048),
    ) {
        let mut input = b"LZIP\x01\x0c".to_vec();
        input.extend(body);
        let _ = decode(&input);
    }
}
