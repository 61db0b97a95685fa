//! Codec engine: the seam between the session layer and the compressor.
//!
//! Sessions only ever talk to a [`CompressEngine`] or a [`DecompressEngine`];
//! the lzip implementations in this module frame members (header, trailer,
//! CRC32, member splitting) around raw LZMA1 streams driven by `liblzma`.

pub mod decoder;
pub mod encoder;
pub mod header;
pub mod types;

use liblzma::stream::{Action, Status, Stream};

pub use decoder::LzipDecoder;
pub use encoder::LzipEncoder;
pub use types::CodecError;

/// Stateful compressor fed with arbitrary chunks.
pub trait CompressEngine {
    /// Consume `input`, returning whatever compressed bytes became available.
    fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Close the open member and return the remaining compressed bytes.
    fn finish(self) -> Result<Vec<u8>, CodecError>;
}

/// Stateful decompressor fed with arbitrary chunks.
pub trait DecompressEngine {
    /// Consume `input`, returning newly decoded bytes.
    fn decompress(&mut self, input: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Validate that the stream ended cleanly and return `(tail, leftover)`.
    fn finish(self) -> Result<(Vec<u8>, Vec<u8>), CodecError>;
}

/// Outcome of one [`pump`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pumped {
    /// Input bytes the stream accepted.
    pub consumed: usize,
    /// The stream reported its end (end-of-payload marker written or read).
    pub ended: bool,
}

/// Drive `stream` over `input`, appending everything it produces to `output`.
///
/// Without `finish` the loop stops once all input is accepted and the stream
/// stops filling the output window, or when a call makes no progress at all.
/// With `finish` it runs until the stream reports its end.
pub(crate) fn pump(
    stream: &mut Stream,
    input: &[u8],
    output: &mut Vec<u8>,
    finish: bool,
    window: usize,
) -> Result<Pumped, CodecError> {
    let mut consumed = 0usize;
    loop {
        output.reserve(window);
        let in_before = stream.total_in();
        let out_before = output.len();
        let action = if finish { Action::Finish } else { Action::Run };

        let status = stream.process_vec(&input[consumed..], output, action)?;
        let accepted = (stream.total_in() - in_before) as usize;
        consumed += accepted;

        match status {
            Status::StreamEnd => return Ok(Pumped { consumed, ended: true }),
            Status::MemNeeded => return Err(CodecError::MemoryLimit),
            Status::Ok | Status::GetCheck => {}
        }

        if finish {
            continue;
        }
        let progressed = accepted > 0 || output.len() > out_before;
        let drained = output.len() < output.capacity();
        if !progressed || (consumed == input.len() && drained) {
            return Ok(Pumped { consumed, ended: false });
        }
    }
}
