#![no_main]
use libfuzzer_sys::fuzz_target;
use lzip::io::{compress_to_buffer, decompress_buffer, DecodeOptions, EncodeOptions};

fuzz_target!(|data: &[u8]| {
    // First byte picks the level, the rest is the payload.
    let (level, payload) = match data.split_first() {
        Some((first, rest)) => (i32::from(*first % 10), rest),
        None => (6, data),
    };

    let compressed = compress_to_buffer(payload, &EncodeOptions::new().level(level))
        .expect("compression of in-memory data must not fail");
    let recovered = decompress_buffer(&compressed, &DecodeOptions::default())
        .unwrap_or_else(|err| {
            panic!(
                "round-trip: decoding self-compressed data failed at level {level} \
                 (input {} bytes, compressed {} bytes): {err}",
                payload.len(),
                compressed.len()
            )
        });

    assert_eq!(recovered, payload, "round-trip mismatch at level {level}");
});
