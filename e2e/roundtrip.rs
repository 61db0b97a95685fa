//! E2E Test Suite 01: Round trips
//!
//! Compress then decompress through the public API for every preset level,
//! the explicit boundary presets, member splitting, and arbitrary chunkings.
//! Chunking invariance is checked with `proptest`.

use lzip::io::{
    compress_to_buffer, decompress_buffer, decompress_buffer_iter, DecodeOptions, EncodeOptions,
};
use lzip::{resolve, DecoderSession, EncoderSession, LEVEL_TABLE};
use proptest::prelude::*;

fn corpus(len: usize) -> Vec<u8> {
    // Text with some structure plus a pseudo-random tail so both matches and
    // literals are exercised.
    let mut out: Vec<u8> = b"It was the best of times, it was the worst of times; "
        .iter()
        .cycle()
        .take(len / 2)
        .cloned()
        .collect();
    let mut state = 0x2545_F491u32;
    while out.len() < len {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        out.push(state as u8);
    }
    out
}

fn encode_chunked(data: &[u8], options: &EncodeOptions, chunk: usize) -> Vec<u8> {
    let mut session = EncoderSession::from_options(options).unwrap();
    let mut out = Vec::new();
    for piece in data.chunks(chunk.max(1)) {
        out.extend(session.compress(piece).unwrap());
    }
    out.extend(session.finish().unwrap());
    out
}

fn decode_chunked(compressed: &[u8], chunk: usize) -> Vec<u8> {
    let mut session = DecoderSession::open(1).unwrap();
    let mut out = Vec::new();
    for piece in compressed.chunks(chunk.max(1)) {
        out.extend(session.decompress(piece).unwrap());
    }
    let tail = session.finish().unwrap();
    assert!(tail.leftover.is_empty());
    out.extend(tail.data);
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Presets
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn every_level_round_trips() {
    let data = corpus(64 * 1024);
    for level in 0..LEVEL_TABLE.len() as i32 {
        let compressed = compress_to_buffer(&data, &EncodeOptions::new().level(level)).unwrap();
        let decoded = decompress_buffer(&compressed, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded, data, "level {level}");
    }
}

#[test]
fn smallest_explicit_preset_round_trips() {
    let data = corpus(50_000);
    let options = EncodeOptions::new().level((4096, 5));
    let compressed = compress_to_buffer(&data, &options).unwrap();
    assert_eq!(compressed[5], 12, "4 KiB dictionary is coded as 2^12");
    assert_eq!(decompress_buffer(&compressed, &DecodeOptions::default()).unwrap(), data);
}

#[test]
fn largest_explicit_preset_resolves() {
    let preset = resolve(((1 << 29) - 1, 273)).unwrap();
    assert_eq!(preset.dictionary_size(), (1 << 29) - 1);
    assert_eq!(preset.match_len_limit(), 273);
}

/// A 512 MiB window needs several GiB for the match finder.
#[test]
#[ignore = "allocates several GiB"]
fn largest_explicit_preset_round_trips() {
    let data = corpus(100_000);
    let options = EncodeOptions::new().level(((1 << 29) - 1, 273));
    let compressed = compress_to_buffer(&data, &options).unwrap();
    assert_eq!(decompress_buffer(&compressed, &DecodeOptions::default()).unwrap(), data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Members
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn member_size_splits_stream() {
    let data = corpus(10_000);
    let options = EncodeOptions::new().level(0).member_size(4096);
    let compressed = compress_to_buffer(&data, &options).unwrap();

    // Walk the members through their trailers, back to front.
    let mut end = compressed.len();
    let mut sizes = Vec::new();
    while end > 0 {
        let trailer = &compressed[end - 20..end];
        let data_size = u64::from_le_bytes(trailer[4..12].try_into().unwrap());
        let member_size = u64::from_le_bytes(trailer[12..20].try_into().unwrap()) as usize;
        assert_eq!(&compressed[end - member_size..end - member_size + 4], b"LZIP");
        sizes.push(data_size);
        end -= member_size;
    }
    sizes.reverse();
    assert_eq!(sizes, vec![4096, 4096, 1808]);
    assert_eq!(decompress_buffer(&compressed, &DecodeOptions::default()).unwrap(), data);
}

#[test]
fn empty_input_round_trips() {
    let compressed = compress_to_buffer(&[], &EncodeOptions::default()).unwrap();
    assert!(compressed.starts_with(b"LZIP"));
    assert!(decompress_buffer(&compressed, &DecodeOptions::default()).unwrap().is_empty());
    let items: Vec<_> = decompress_buffer_iter(&compressed, &DecodeOptions::default())
        .unwrap()
        .collect();
    assert!(items.is_empty());
}

#[test]
fn iterator_alignment_254_by_100() {
    let data: Vec<u8> = (0..254u32).map(|i| (i * 97 % 256) as u8).collect();
    let compressed = compress_to_buffer(&data, &EncodeOptions::default()).unwrap();

    let mut decoded = Vec::new();
    let mut leftover = None;
    let options = DecodeOptions::new().word_size(100).chunk_size(10);
    for item in decompress_buffer_iter(&compressed, &options).unwrap() {
        match item {
            Ok(chunk) => decoded.extend(chunk),
            Err(err) => leftover = Some(err.into_remaining_bytes().unwrap()),
        }
    }
    let leftover = leftover.unwrap();
    assert_eq!(decoded.len(), 200);
    assert_eq!(leftover.len(), 54);
    assert_eq!([decoded, leftover.into_bytes()].concat(), data);

    let err = decompress_buffer(&compressed, &DecodeOptions::new().word_size(100)).unwrap_err();
    assert_eq!(err.remaining_bytes().unwrap().len(), 54);
}

// ─────────────────────────────────────────────────────────────────────────────
// Chunking invariance
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn encode_chunking_does_not_change_output(
        len in 0usize..20_000,
        chunk in 1usize..5_000,
    ) {
        let data = corpus(len);
        let options = EncodeOptions::new().level(1);
        let whole = compress_to_buffer(&data, &options).unwrap();
        prop_assert_eq!(encode_chunked(&data, &options, chunk), whole);
    }

    #[test]
    fn decode_chunking_does_not_change_output(
        len in 0usize..20_000,
        chunk in 1usize..3_000,
        member_size in 4096u64..16_384,
    ) {
        let data = corpus(len);
        let compressed = compress_to_buffer(
            &data,
            &EncodeOptions::new().level(0).member_size(member_size),
        ).unwrap();
        prop_assert_eq!(decode_chunked(&compressed, chunk), data);
    }
}
