// Integration tests for src/io/decompress.rs: lazy and buffered decoding.
//
// Coverage:
//   - every entry point agrees on the decoded bytes
//   - word_size = 1 never produces a leftover
//   - exact multiples of word_size produce no leftover
//   - leftover only (decoded length < word_size)
//   - the iterator closes its source once exhausted
//   - corrupt and truncated streams surface as codec errors

use std::io::Cursor;

use lzip::codec::CodecError;
use lzip::io::{
    compress_to_buffer, decompress_buffer, decompress_buffer_iter, decompress_file,
    decompress_file_iter, decompress_reader, decompress_reader_iter, DecodeOptions,
    EncodeOptions,
};
use lzip::Error;
use tempfile::TempDir;

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 13) ^ (i >> 3)) as u8).collect()
}

fn packed(len: usize) -> (Vec<u8>, Vec<u8>) {
    let data = pattern(len);
    let compressed = compress_to_buffer(&data, &EncodeOptions::new().level(1)).unwrap();
    (data, compressed)
}

fn lazy(iter: lzip::DecompressIter<'_>) -> Vec<u8> {
    iter.map(Result::unwrap).collect::<Vec<_>>().concat()
}

#[test]
fn entry_points_agree() {
    let (data, compressed) = packed(70_000);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("in.lz");
    std::fs::write(&path, &compressed).unwrap();
    let options = DecodeOptions::new().chunk_size(4096);

    assert_eq!(decompress_buffer(&compressed, &options).unwrap(), data);
    assert_eq!(decompress_reader(Cursor::new(&compressed), &options).unwrap(), data);
    assert_eq!(decompress_file(&path, &options).unwrap(), data);

    assert_eq!(lazy(decompress_buffer_iter(&compressed, &options).unwrap()), data);
    assert_eq!(lazy(decompress_reader_iter(&compressed[..], &options).unwrap()), data);
    assert_eq!(lazy(decompress_file_iter(&path, &options).unwrap()), data);
}

#[test]
fn word_size_one_never_leaves_bytes() {
    for len in [0, 1, 7, 4097] {
        let (data, compressed) = packed(len);
        let items: Vec<_> = decompress_buffer_iter(&compressed, &DecodeOptions::new().chunk_size(100))
            .unwrap()
            .collect();
        assert!(items.iter().all(Result::is_ok), "len {len}");
        let decoded: Vec<u8> = items.into_iter().map(Result::unwrap).collect::<Vec<_>>().concat();
        assert_eq!(decoded, data);
    }
}

#[test]
fn exact_multiple_has_no_leftover() {
    let (data, compressed) = packed(4096);
    let decoded = decompress_buffer(&compressed, &DecodeOptions::new().word_size(512)).unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn leftover_only() {
    let (data, compressed) = packed(3);
    let mut iter = decompress_buffer_iter(&compressed, &DecodeOptions::new().word_size(4)).unwrap();
    let err = iter.next().unwrap().unwrap_err();
    assert_eq!(err.into_remaining_bytes().unwrap().bytes, data);
    assert!(iter.next().is_none());
}

#[test]
fn source_closed_after_exhaustion() {
    let (_, compressed) = packed(10_000);
    let mut iter = decompress_buffer_iter(&compressed, &DecodeOptions::new().chunk_size(1000)).unwrap();
    assert!(iter.is_source_open());
    while iter.next().is_some() {}
    assert!(!iter.is_source_open());
}

#[test]
fn truncated_stream_is_an_error() {
    let (_, compressed) = packed(10_000);
    let cut = &compressed[..compressed.len() - 5];
    let err = decompress_buffer(cut, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Codec(CodecError::Truncated)));
}

#[test]
fn corrupted_crc_is_an_error() {
    let (_, mut compressed) = packed(10_000);
    let crc_at = compressed.len() - 20;
    compressed[crc_at] ^= 0xFF;
    let err = decompress_buffer(&compressed, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Codec(CodecError::CrcMismatch { .. })));
}

#[test]
fn zero_word_size_rejected() {
    let err = decompress_buffer(b"", &DecodeOptions::new().word_size(0)).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}
