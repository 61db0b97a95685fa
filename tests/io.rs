#[path = "io/compress.rs"]
mod compress;
#[path = "io/decompress.rs"]
mod decompress;
#[path = "io/options.rs"]
mod options;
