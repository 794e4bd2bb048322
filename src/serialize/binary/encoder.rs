// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Growable buffer used to emit the wire format

use std::collections::HashMap;

use crate::error::{ProtoErrorKind, ProtoResult};

/// Controls whether [`crate::rr::Name`] is allowed to emit RFC 1035 pointer
/// compression, or must always be written uncompressed and lowercased.
///
/// Canonical form is required whenever the emitted bytes feed a digest or
/// signature (DS digests, RRSIG/TSIG to-be-signed data): compression makes
/// the byte representation depend on message layout, which would make the
/// hash non-deterministic across re-encodings of logically identical data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameEncoding {
    /// Names may use pointer compression against previously emitted names
    Compressed,
    /// Names are always written uncompressed with labels lowercased
    UncompressedLowercase,
}

/// Encodes DNS messages and resource records into the wire format.
///
/// The name-compression dictionary is local to one `BinEncoder`/message: it
/// is a plain field here, not shared global state, so its lifetime is
/// exactly the emit call that owns this encoder.
pub struct BinEncoder<'a> {
    buffer: &'a mut Vec<u8>,
    offset: usize,
    name_pointers: HashMap<Vec<Vec<u8>>, u16>,
    name_encoding: NameEncoding,
}

impl<'a> BinEncoder<'a> {
    /// Create a new encoder that appends to `buffer`, compressing names
    pub fn new(buffer: &'a mut Vec<u8>) -> Self {
        Self::with_offset(buffer, 0, NameEncoding::Compressed)
    }

    /// Create a new encoder that never compresses names and always
    /// lowercases them: the canonical form used for DS digests and RRSIG
    /// signing input.
    pub fn with_canonical_encoding(buffer: &'a mut Vec<u8>) -> Self {
        Self::with_offset(buffer, 0, NameEncoding::UncompressedLowercase)
    }

    /// Create a new encoder starting at `offset`, used when this buffer
    /// continues a message that already has bytes in it so that stored
    /// name-pointer offsets line up with the final message.
    pub fn with_offset(buffer: &'a mut Vec<u8>, offset: usize, name_encoding: NameEncoding) -> Self {
        Self {
            buffer,
            offset,
            name_pointers: HashMap::new(),
            name_encoding,
        }
    }

    /// Set the name-encoding mode
    pub fn set_name_encoding(&mut self, mode: NameEncoding) {
        self.name_encoding = mode;
    }

    /// Current name-encoding mode
    pub fn name_encoding(&self) -> NameEncoding {
        self.name_encoding
    }

    /// `true` if names are being written in canonical (uncompressed,
    /// lowercased) form
    pub fn is_canonical_names(&self) -> bool {
        self.name_encoding == NameEncoding::UncompressedLowercase
    }

    /// Current write offset, accounting for any starting `offset`
    pub fn offset(&self) -> usize {
        self.offset + self.buffer.len()
    }

    /// Record that the label sequence `labels` (lowercased, most-specific
    /// first) was just written at the current offset, so a later occurrence
    /// of the same suffix can point back to it.
    pub fn store_label_pointer(&mut self, labels: Vec<Vec<u8>>) {
        let offset = self.offset();
        if offset <= 0x3FFF {
            self.name_pointers.entry(labels).or_insert(offset as u16);
        }
    }

    /// Look up a previously stored label-pointer offset
    pub fn get_label_pointer(&self, labels: &[Vec<u8>]) -> Option<u16> {
        self.name_pointers.get(labels).copied()
    }

    /// Append a single byte
    pub fn emit(&mut self, b: u8) -> ProtoResult<()> {
        self.buffer.push(b);
        Ok(())
    }

    /// Append a single byte
    pub fn emit_u8(&mut self, b: u8) -> ProtoResult<()> {
        self.emit(b)
    }

    /// Append a big-endian `u16`
    pub fn emit_u16(&mut self, v: u16) -> ProtoResult<()> {
        self.buffer.extend_from_slice(&v.to_be_bytes());
        Ok(())
    }

    /// Append a big-endian `u32`
    pub fn emit_u32(&mut self, v: u32) -> ProtoResult<()> {
        self.buffer.extend_from_slice(&v.to_be_bytes());
        Ok(())
    }

    /// Append raw bytes
    pub fn emit_vec(&mut self, data: &[u8]) -> ProtoResult<()> {
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    /// Overwrite the big-endian `u16` at `index` (as returned earlier by
    /// [`Self::len`]) with `v`. Used to backfill an rdlength field that is
    /// only known after its rdata has been emitted.
    pub fn backfill_u16(&mut self, index: usize, v: u16) -> ProtoResult<()> {
        let bytes = v.to_be_bytes();
        self.buffer
            .get_mut(index..index + 2)
            .ok_or(ProtoErrorKind::Message("backfill index out of range"))?
            .copy_from_slice(&bytes);
        Ok(())
    }

    /// Append an RFC 1035 character-string: a length octet followed by the
    /// bytes themselves. Fails if `data` exceeds 255 octets.
    pub fn emit_character_data(&mut self, data: &[u8]) -> ProtoResult<()> {
        if data.len() > 255 {
            return Err(ProtoErrorKind::Msg(format!(
                "character-string of {} octets exceeds 255",
                data.len()
            ))
            .into());
        }
        self.emit_u8(data.len() as u8)?;
        self.emit_vec(data)
    }

    /// Number of bytes written into `buffer` by this encoder (not counting
    /// the starting `offset`)
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// `true` if nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Implemented by types that know how to write themselves into the wire
/// format via a [`BinEncoder`].
pub trait BinEncodable {
    /// Write `self` into `encoder`
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()>;

    /// Convenience: emit into a fresh buffer and return it
    fn to_bytes(&self) -> ProtoResult<Vec<u8>> {
        let mut bytes = Vec::new();
        let mut encoder = BinEncoder::new(&mut bytes);
        self.emit(&mut encoder)?;
        Ok(bytes)
    }

    /// Convenience: emit in canonical (uncompressed, lowercased-name) form
    fn to_bytes_canonical(&self) -> ProtoResult<Vec<u8>> {
        let mut bytes = Vec::new();
        let mut encoder = BinEncoder::with_canonical_encoding(&mut bytes);
        self.emit(&mut encoder)?;
        Ok(bytes)
    }
}

/// Implemented by types decodable from a fixed-length rdata slice
pub trait BinDecodable<'r>: Sized {
    /// Parse `Self` from `decoder`, consuming exactly what the format
    /// requires (framing enforces the rdlength bound)
    fn read(decoder: &mut super::BinDecoder<'r>) -> ProtoResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_are_big_endian() {
        let mut buf = Vec::new();
        let mut encoder = BinEncoder::new(&mut buf);
        encoder.emit_u8(0x01).unwrap();
        encoder.emit_u16(0x0203).unwrap();
        encoder.emit_u32(0x0405_0607).unwrap();
        assert_eq!(buf, vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);
    }

    #[test]
    fn backfill_overwrites_in_place() {
        let mut buf = Vec::new();
        let mut encoder = BinEncoder::new(&mut buf);
        let rdlength_index = encoder.len();
        encoder.emit_u16(0).unwrap();
        encoder.emit_vec(b"hello").unwrap();
        let written = encoder.len() - rdlength_index - 2;
        encoder.backfill_u16(rdlength_index, written as u16).unwrap();
        assert_eq!(buf, [0x00, 0x05, b'h', b'e', b'l', b'l', b'o']);
    }

    #[test]
    fn character_data_over_255_octets_fails() {
        let mut buf = Vec::new();
        let mut encoder = BinEncoder::new(&mut buf);
        let data = vec![0u8; 256];
        assert!(encoder.emit_character_data(&data).is_err());
    }

    #[test]
    fn label_pointer_round_trips_through_the_dictionary() {
        let mut buf = Vec::new();
        let mut encoder = BinEncoder::new(&mut buf);
        let labels = vec![b"example".to_vec(), b"com".to_vec()];
        assert!(encoder.get_label_pointer(&labels).is_none());
        encoder.store_label_pointer(labels.clone());
        assert_eq!(encoder.get_label_pointer(&labels), Some(0));
    }

    #[test]
    fn pointer_offsets_above_0x3fff_are_not_stored() {
        let mut buf = vec![0u8; 0x4000];
        let mut encoder = BinEncoder::new(&mut buf);
        let labels = vec![b"example".to_vec()];
        encoder.store_label_pointer(labels.clone());
        assert!(encoder.get_label_pointer(&labels).is_none());
    }

    #[test]
    fn canonical_encoding_is_flagged() {
        let mut buf = Vec::new();
        let encoder = BinEncoder::with_canonical_encoding(&mut buf);
        assert!(encoder.is_canonical_names());
        assert_eq!(encoder.name_encoding(), NameEncoding::UncompressedLowercase);
    }
}
