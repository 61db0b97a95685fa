// Integration tests for src/file.rs: LzipWriter, FileEncoder, LzipReader.
//
// Coverage:
//   - LzipWriter over a Cursor, many small writes, finish returns the writer
//   - FileEncoder::create writes a file readable by LzipReader over a path
//   - LzipReader over a URL source (file://)
//   - io::copy through both adapters
//   - LzipReader error kinds for corrupt data and leftovers
//   - writer with invalid options fails at construction

use std::io::{self, Cursor, Read, Write};

use lzip::io::{DecodeOptions, EncodeOptions};
use lzip::{Error, FileEncoder, LzipReader, LzipWriter, Source, UrlOptions};
use tempfile::TempDir;

fn lorem(len: usize) -> Vec<u8> {
    b"Sed ut perspiciatis unde omnis iste natus error sit voluptatem. "
        .iter()
        .cycle()
        .take(len)
        .cloned()
        .collect()
}

#[test]
fn writer_over_cursor() {
    let data = lorem(12_345);
    let mut writer = LzipWriter::new(Cursor::new(Vec::new()), &EncodeOptions::default()).unwrap();
    for piece in data.chunks(100) {
        writer.write_all(piece).unwrap();
    }
    writer.flush().unwrap();
    let compressed = writer.finish().unwrap().into_inner();

    let mut reader = LzipReader::from_reader(&compressed[..], &DecodeOptions::default()).unwrap();
    let mut recovered = Vec::new();
    reader.read_to_end(&mut recovered).unwrap();
    assert_eq!(recovered, data);
}

#[test]
fn file_encoder_and_path_reader() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.lz");
    let data = lorem(40_000);

    let mut encoder = FileEncoder::create(&path, &EncodeOptions::new().level(4)).unwrap();
    encoder.write_all(&data).unwrap();
    encoder.finish().unwrap();

    let mut reader = LzipReader::new(Source::path(&path), &DecodeOptions::new().chunk_size(777)).unwrap();
    let mut recovered = Vec::new();
    reader.read_to_end(&mut recovered).unwrap();
    assert_eq!(recovered, data);
}

#[test]
fn reader_over_file_url() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("remote.lz");
    let data = lorem(5_000);
    lzip::compress_to_file(&path, &data, &EncodeOptions::default()).unwrap();

    let url = url::Url::from_file_path(&path).unwrap().to_string();
    let mut reader = LzipReader::new(Source::url(url, UrlOptions::default()), &DecodeOptions::default()).unwrap();
    let mut recovered = Vec::new();
    reader.read_to_end(&mut recovered).unwrap();
    assert_eq!(recovered, data);
}

#[test]
fn io_copy_through_both_adapters() {
    let data = lorem(100_000);
    let mut writer = LzipWriter::new(Vec::new(), &EncodeOptions::new().level(0)).unwrap();
    io::copy(&mut &data[..], &mut writer).unwrap();
    let compressed = writer.finish().unwrap();

    let mut reader = LzipReader::from_reader(Cursor::new(compressed), &DecodeOptions::default()).unwrap();
    let mut out = Vec::new();
    io::copy(&mut reader, &mut out).unwrap();
    assert_eq!(out, data);
}

#[test]
fn reader_corrupt_data_is_invalid_data() {
    let mut reader = LzipReader::from_reader(&b"definitely not lzip"[..], &DecodeOptions::default()).unwrap();
    let err = reader.read_to_end(&mut Vec::new()).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn reader_leftover_carries_remaining_bytes() {
    let data = lorem(10);
    let compressed = lzip::compress_to_buffer(&data, &EncodeOptions::default()).unwrap();
    let mut reader =
        LzipReader::from_reader(&compressed[..], &DecodeOptions::new().word_size(3)).unwrap();
    let mut aligned = [0u8; 9];
    reader.read_exact(&mut aligned).unwrap();
    assert_eq!(&aligned[..], &data[..9]);

    let err = reader.read(&mut [0u8; 4]).unwrap_err();
    let inner = err.into_inner().unwrap().downcast::<Error>().unwrap();
    assert_eq!(inner.remaining_bytes().unwrap().bytes, &data[9..]);
}

#[test]
fn writer_rejects_invalid_options() {
    let result = LzipWriter::new(Vec::new(), &EncodeOptions::new().level(42));
    assert!(matches!(result, Err(Error::InvalidPreset(_))));
}
