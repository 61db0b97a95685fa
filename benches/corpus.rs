/// Returns synthetic benchmark data of exactly `size` bytes.
///
/// Three quarters is repeated lorem-ipsum text, the rest xorshift noise, so
/// the match finder sees both long repeats and incompressible stretches.
pub fn synthetic_data(size: usize) -> Vec<u8> {
    const LOREM: &[u8] = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit, \
        sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. \
        Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris nisi \
        ut aliquip ex ea commodo consequat. ";

    let text_len = size - size / 4;
    let mut out: Vec<u8> = LOREM.iter().cycle().take(text_len).cloned().collect();
    let mut state = 0x9E37_79B9u32;
    while out.len() < size {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        out.push(state as u8);
    }
    out
}

/// Returns the benchmark input: the first `size` bytes of
/// `$LZIP_BENCH_FILE` when that variable names a readable file, otherwise
/// [`synthetic_data`].
#[allow(dead_code)]
pub fn corpus(size: usize) -> Vec<u8> {
    if let Ok(path) = std::env::var("LZIP_BENCH_FILE") {
        if let Ok(mut data) = std::fs::read(&path) {
            if !data.is_empty() {
                // Repeat short files to reach the requested size.
                while data.len() < size {
                    let take = (size - data.len()).min(data.len());
                    data.extend_from_within(..take);
                }
                data.truncate(size);
                return data;
            }
        }
    }
    synthetic_data(size)
}
