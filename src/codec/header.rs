//! Member header and trailer encoding.
//!
//! The dictionary size is stored in one byte: bits 4..0 hold `log2(base)` and
//! bits 7..5 a fraction `f`, giving `base - f * (base / 16)`. Any size that is
//! not exactly representable is rounded up to the next representable value.

use crate::codec::types::{
    CodecError, HEADER_SIZE, MAGIC, MAX_DICTIONARY_SIZE, MIN_DICTIONARY_SIZE, TRAILER_SIZE,
    VERSION,
};

// ─────────────────────────────────────────────────────────────────────────────
// Dictionary size coding
// ─────────────────────────────────────────────────────────────────────────────

/// Code `size` into the header byte, rounding up to a representable size.
///
/// Sizes outside `[4 KiB, 512 MiB]` are clamped first.
pub fn encode_dictionary_size(size: u32) -> u8 {
    let size = size.clamp(MIN_DICTIONARY_SIZE, MAX_DICTIONARY_SIZE);
    // ceil(log2(size)); size >= 4096 so size - 1 is non-zero.
    let bits = u32::BITS - (size - 1).leading_zeros();
    let mut coded = bits as u8;
    if size > MIN_DICTIONARY_SIZE {
        let base = 1u32 << bits;
        let fraction = base / 16;
        for i in (1..=7u32).rev() {
            if base - i * fraction >= size {
                coded |= (i as u8) << 5;
                break;
            }
        }
    }
    coded
}

/// Decode a header byte back into a dictionary size, rejecting values outside
/// the format range.
pub fn decode_dictionary_size(coded: u8) -> Result<u32, CodecError> {
    let bits = u32::from(coded & 0x1F);
    if !(12..=29).contains(&bits) {
        return Err(CodecError::InvalidDictionarySize);
    }
    let base = 1u32 << bits;
    let size = base - (base / 16) * u32::from(coded >> 5);
    if !(MIN_DICTIONARY_SIZE..=MAX_DICTIONARY_SIZE).contains(&size) {
        return Err(CodecError::InvalidDictionarySize);
    }
    Ok(size)
}

/// Dictionary size the encoder actually uses for a requested size: the value
/// the header will advertise.
pub fn effective_dictionary_size(requested: u32) -> u32 {
    // encode_dictionary_size only yields in-range codes.
    decode_dictionary_size(encode_dictionary_size(requested)).unwrap_or(MIN_DICTIONARY_SIZE)
}

// ─────────────────────────────────────────────────────────────────────────────
// Header
// ─────────────────────────────────────────────────────────────────────────────

pub fn write_header(dictionary_size: u32) -> [u8; HEADER_SIZE] {
    let mut header = [0u8; HEADER_SIZE];
    header[..4].copy_from_slice(&MAGIC);
    header[4] = VERSION;
    header[5] = encode_dictionary_size(dictionary_size);
    header
}

/// Validate a complete header and return the dictionary size it declares.
pub fn parse_header(header: &[u8; HEADER_SIZE]) -> Result<u32, CodecError> {
    if header[..4] != MAGIC {
        return Err(CodecError::BadMagic);
    }
    if header[4] != VERSION {
        return Err(CodecError::UnsupportedVersion(header[4]));
    }
    decode_dictionary_size(header[5])
}

// ─────────────────────────────────────────────────────────────────────────────
// Trailer
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    /// CRC32 of the member's uncompressed data.
    pub crc: u32,
    /// Uncompressed size of the member.
    pub data_size: u64,
    /// Total member size, header and trailer included.
    pub member_size: u64,
}

impl Trailer {
    pub fn to_bytes(&self) -> [u8; TRAILER_SIZE] {
        let mut out = [0u8; TRAILER_SIZE];
        out[0..4].copy_from_slice(&self.crc.to_le_bytes());
        out[4..12].copy_from_slice(&self.data_size.to_le_bytes());
        out[12..20].copy_from_slice(&self.member_size.to_le_bytes());
        out
    }

    pub fn from_bytes(raw: &[u8; TRAILER_SIZE]) -> Self {
        let mut crc = [0u8; 4];
        let mut data_size = [0u8; 8];
        let mut member_size = [0u8; 8];
        crc.copy_from_slice(&raw[0..4]);
        data_size.copy_from_slice(&raw[4..12]);
        member_size.copy_from_slice(&raw[12..20]);
        Trailer {
            crc: u32::from_le_bytes(crc),
            data_size: u64::from_le_bytes(data_size),
            member_size: u64::from_le_bytes(member_size),
        }
    }

    /// Compare the stored fields against what was actually decoded.
    pub fn verify(&self, computed: &Trailer) -> Result<(), CodecError> {
        if self.crc != computed.crc {
            return Err(CodecError::CrcMismatch {
                stored: self.crc,
                computed: computed.crc,
            });
        }
        if self.data_size != computed.data_size {
            return Err(CodecError::DataSizeMismatch {
                stored: self.data_size,
                actual: computed.data_size,
            });
        }
        if self.member_size != computed.member_size {
            return Err(CodecError::MemberSizeMismatch {
                stored: self.member_size,
                actual: computed.member_size,
            });
        }
        Ok(())
    }
}
