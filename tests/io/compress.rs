// Integration tests for src/io/compress.rs: compression entry points.
//
// Coverage:
//   - compress_to_file writes a stream that decompress_file reads back
//   - compress_to_file replaces an existing file
//   - compress_stream reports byte counts and honours member_size
//   - invalid member_size / level are rejected

use lzip::io::{
    compress_stream, compress_to_buffer, compress_to_file, decompress_buffer, decompress_file,
    DecodeOptions, EncodeOptions,
};
use lzip::Error;
use tempfile::TempDir;

fn text(len: usize) -> Vec<u8> {
    b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. "
        .iter()
        .cycle()
        .take(len)
        .cloned()
        .collect()
}

#[test]
fn compress_to_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.lz");
    let data = text(30_000);
    compress_to_file(&path, &data, &EncodeOptions::new().level(3)).unwrap();
    assert_eq!(decompress_file(&path, &DecodeOptions::default()).unwrap(), data);
}

#[test]
fn compress_to_file_replaces_existing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.lz");
    std::fs::write(&path, vec![0xAA; 100_000]).unwrap();
    compress_to_file(&path, b"short", &EncodeOptions::default()).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() < 100);
    assert_eq!(decompress_file(&path, &DecodeOptions::default()).unwrap(), b"short");
}

#[test]
fn compress_stream_with_small_members() {
    let data = text(20_000);
    let options = EncodeOptions::new().level((4096, 5)).member_size(4096);
    let mut out = Vec::new();
    let (bytes_in, bytes_out) = compress_stream(&data[..], &mut out, &options, Some(1500)).unwrap();
    assert_eq!(bytes_in, 20_000);
    assert_eq!(bytes_out, out.len() as u64);
    assert_eq!(out, compress_to_buffer(&data, &options).unwrap());
    assert_eq!(decompress_buffer(&out, &DecodeOptions::default()).unwrap(), data);
}

#[test]
fn invalid_member_size_rejected() {
    for member_size in [0u64, 4095, (1 << 51) + 1, u64::MAX] {
        let err = compress_to_buffer(b"x", &EncodeOptions::new().member_size(member_size))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "{member_size}");
    }
}

#[test]
fn invalid_level_rejected_for_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("never.lz");
    let err = compress_to_file(&path, b"x", &EncodeOptions::new().level(-1)).unwrap_err();
    assert!(matches!(err, Error::InvalidPreset(_)));
}
