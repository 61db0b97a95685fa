//! lzip encoder engine.
//!
//! Each member is a raw LZMA1 stream (with end-of-payload marker) between a
//! header and a trailer. The encoder closes the running member as soon as the
//! uncompressed bytes fed into it reach the member size limit, and opens the
//! next one lazily when more data arrives, so a stream whose length is an
//! exact multiple of the limit does not end with an empty member.

use crc32fast::Hasher;
use liblzma::stream::{Filters, LzmaOptions, Stream};

use crate::codec::header::{effective_dictionary_size, write_header, Trailer};
use crate::codec::types::{
    CodecError, HEADER_SIZE, LITERAL_CONTEXT_BITS, LITERAL_POSITION_BITS, POSITION_BITS,
    TRAILER_SIZE,
};
use crate::codec::{pump, CompressEngine};
use crate::config::ENGINE_BUFFER_SIZE;

// liblzma preset used as the base for every member before the lzip-specific
// parameters are applied on top (normal mode, bt4 match finder).
const BASE_PRESET: u32 = 6;

/// One open member.
struct Member {
    stream: Stream,
    crc: Hasher,
    data_size: u64,
}

impl Member {
    /// Start a member, writing its header to `out`.
    fn open(
        dictionary_size: u32,
        match_len_limit: u32,
        out: &mut Vec<u8>,
    ) -> Result<Self, CodecError> {
        let mut options = LzmaOptions::new_preset(BASE_PRESET)?;
        options
            .dict_size(dictionary_size)
            .literal_context_bits(LITERAL_CONTEXT_BITS)
            .literal_position_bits(LITERAL_POSITION_BITS)
            .position_bits(POSITION_BITS)
            .nice_len(match_len_limit);
        let mut filters = Filters::new();
        filters.lzma1(&options);
        let stream = Stream::new_raw_encoder(&filters)?;

        out.extend_from_slice(&write_header(dictionary_size));
        Ok(Member {
            stream,
            crc: Hasher::new(),
            data_size: 0,
        })
    }

    fn feed(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CodecError> {
        self.crc.update(input);
        self.data_size += input.len() as u64;
        let mut rest = input;
        while !rest.is_empty() {
            let pumped = pump(&mut self.stream, rest, out, false, ENGINE_BUFFER_SIZE)?;
            if pumped.consumed == 0 {
                return Err(CodecError::Stalled);
            }
            rest = &rest[pumped.consumed..];
        }
        Ok(())
    }

    /// Write the end-of-payload marker and the trailer.
    fn close(mut self, out: &mut Vec<u8>) -> Result<Trailer, CodecError> {
        pump(&mut self.stream, &[], out, true, ENGINE_BUFFER_SIZE)?;
        let trailer = Trailer {
            crc: self.crc.finalize(),
            data_size: self.data_size,
            member_size: (HEADER_SIZE + TRAILER_SIZE) as u64 + self.stream.total_out(),
        };
        out.extend_from_slice(&trailer.to_bytes());
        Ok(trailer)
    }
}

/// Streaming lzip compressor.
pub struct LzipEncoder {
    dictionary_size: u32,
    match_len_limit: u32,
    member_size: u64,
    member: Option<Member>,
    /// Bytes produced outside of a `compress` call (the first header).
    pending: Vec<u8>,
    members_closed: u64,
}

impl LzipEncoder {
    /// Open an encoder. The first member is started immediately so that
    /// finishing without any input still yields a valid (empty) member.
    ///
    /// `dictionary_size` is rounded up to the nearest size the member header
    /// can describe; that rounded size is what the LZMA window uses.
    pub fn new(
        dictionary_size: u32,
        match_len_limit: u32,
        member_size: u64,
    ) -> Result<Self, CodecError> {
        let dictionary_size = effective_dictionary_size(dictionary_size);
        let mut pending = Vec::with_capacity(HEADER_SIZE);
        let member = Member::open(dictionary_size, match_len_limit, &mut pending)?;
        Ok(LzipEncoder {
            dictionary_size,
            match_len_limit,
            member_size: member_size.max(1),
            member: Some(member),
            pending,
            members_closed: 0,
        })
    }

    /// Dictionary size advertised in every member header.
    pub fn dictionary_size(&self) -> u32 {
        self.dictionary_size
    }

    /// Number of members closed so far.
    pub fn members_closed(&self) -> u64 {
        self.members_closed
    }

    fn close_member(&mut self, member: Member, out: &mut Vec<u8>) -> Result<(), CodecError> {
        let trailer = member.close(out)?;
        self.members_closed += 1;
        tracing::trace!(
            member = self.members_closed,
            data_size = trailer.data_size,
            member_size = trailer.member_size,
            "lzip member closed"
        );
        Ok(())
    }
}

impl CompressEngine for LzipEncoder {
    fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = std::mem::take(&mut self.pending);
        let mut rest = input;
        while !rest.is_empty() {
            let member = match &mut self.member {
                Some(member) => member,
                slot => slot.insert(Member::open(
                    self.dictionary_size,
                    self.match_len_limit,
                    &mut out,
                )?),
            };
            let budget = self.member_size - member.data_size;
            let take = usize::try_from(budget).unwrap_or(usize::MAX).min(rest.len());
            let (now, later) = rest.split_at(take);
            member.feed(now, &mut out)?;
            rest = later;

            if member.data_size >= self.member_size {
                if let Some(full) = self.member.take() {
                    self.close_member(full, &mut out)?;
                }
            }
        }
        Ok(out)
    }

    fn finish(mut self) -> Result<Vec<u8>, CodecError> {
        let mut out = std::mem::take(&mut self.pending);
        if let Some(member) = self.member.take() {
            self.close_member(member, &mut out)?;
        }
        Ok(out)
    }
}
