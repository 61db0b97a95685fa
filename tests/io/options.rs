// Integration tests for src/io/options.rs: option defaults as seen by callers.

use lzip::config::{CHUNK_SIZE_DEFAULT, MEMBER_SIZE_DEFAULT, WORD_SIZE_DEFAULT};
use lzip::io::{DecodeOptions, EncodeOptions};
use lzip::{resolve, Level, Source};

#[test]
fn decode_defaults_match_config() {
    let options = DecodeOptions::default();
    assert_eq!(options.word_size, WORD_SIZE_DEFAULT);
    assert_eq!(options.chunk_size, None);
}

#[test]
fn encode_defaults_match_config() {
    let options = EncodeOptions::default();
    assert_eq!(options.member_size, MEMBER_SIZE_DEFAULT);
    assert_eq!(resolve(options.level).unwrap(), resolve(6).unwrap());
}

#[test]
fn unset_chunk_size_follows_source() {
    let data = [0u8; 300];
    assert_eq!(Source::buffer(&data).default_chunk_size(), 300);
    assert_eq!(Source::reader(&data[..]).default_chunk_size(), CHUNK_SIZE_DEFAULT);
    assert_eq!(Source::path("x.lz").default_chunk_size(), CHUNK_SIZE_DEFAULT);
}

#[test]
fn level_accepts_every_form() {
    assert_eq!(EncodeOptions::new().level(2).level, Level::Index(2));
    assert_eq!(EncodeOptions::new().level(2u8).level, Level::Index(2));
    assert_eq!(
        EncodeOptions::new().level(resolve(2).unwrap()).level,
        Level::from((3 << 19, 6))
    );
}
