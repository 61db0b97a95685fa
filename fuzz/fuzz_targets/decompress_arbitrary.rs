#![no_main]
use libfuzzer_sys::fuzz_target;
use lzip::io::{decompress_buffer_iter, DecodeOptions};

fuzz_target!(|data: &[u8]| {
    // Arbitrary input must yield chunks or a typed error, never a panic.
    let options = DecodeOptions::new().chunk_size(257);
    if let Ok(chunks) = decompress_buffer_iter(data, &options) {
        for chunk in chunks {
            if chunk.is_err() {
                break;
            }
        }
    }
});
