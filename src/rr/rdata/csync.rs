// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Child-to-parent synchronization record ([RFC 7477](https://tools.ietf.org/html/rfc7477)).

use std::fmt;

use crate::error::ProtoResult;
use crate::rr::record_data::RData;
use crate::rr::record_type::RecordType;
use crate::rr::type_bitmap::{decode_type_bitmaps, encode_type_bitmaps, max_type_bitmaps_length};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// The parent-side flags understood by CSYNC: bit 0 immediate, bit 1
/// soa-minimum.
pub const FLAG_IMMEDIATE: u16 = 0x0001;
/// soa-minimum flag bit
pub const FLAG_SOA_MINIMUM: u16 = 0x0002;

/// `CSYNC` rdata: the child's SOA serial, a flags word, and the set of
/// record types the parent should synchronize from the child.
///
/// The type list is kept sorted and deduplicated at construction time, per
/// the windowed bitmap's own invariant.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct CSYNC {
    serial: u32,
    flags: u16,
    type_bit_maps: Vec<RecordType>,
}

impl CSYNC {
    /// Construct from a serial, flags word, and an arbitrary (not
    /// necessarily sorted) list of record types.
    pub fn new(serial: u32, flags: u16, mut type_bit_maps: Vec<RecordType>) -> Self {
        type_bit_maps.sort_unstable();
        type_bit_maps.dedup();
        Self {
            serial,
            flags,
            type_bit_maps,
        }
    }

    /// The child's SOA serial at generation time
    pub fn serial(&self) -> u32 {
        self.serial
    }

    /// The raw flags word
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// `true` if the immediate bit is set
    pub fn immediate(&self) -> bool {
        self.flags & FLAG_IMMEDIATE != 0
    }

    /// `true` if the soa-minimum bit is set
    pub fn soa_minimum(&self) -> bool {
        self.flags & FLAG_SOA_MINIMUM != 0
    }

    /// The sorted, deduplicated set of record types to synchronize
    pub fn type_bit_maps(&self) -> &[RecordType] {
        &self.type_bit_maps
    }

    /// Upper bound on the emitted rdata length, for pre-sizing buffers
    pub fn max_rdata_length(&self) -> usize {
        4 + 2 + max_type_bitmaps_length(&self.type_bit_maps)
    }

    /// Parse from presentation-format tokens: a serial, a flags word, then
    /// zero or more record type mnemonics.
    pub fn from_tokens(tokens: &[String]) -> ProtoResult<Self> {
        let [serial, flags, types @ ..] = tokens else {
            return Err(crate::error::ProtoErrorKind::MalformedPresentation {
                token_index: 0,
                message: "CSYNC expects at least a serial and a flags word".to_string(),
            }
            .into());
        };

        let serial: u32 = serial.parse().map_err(|_| {
            crate::error::ProtoErrorKind::MalformedPresentation {
                token_index: 0,
                message: format!("invalid serial number {serial:?}"),
            }
        })?;
        let flags: u16 = flags.parse().map_err(|_| {
            crate::error::ProtoErrorKind::MalformedPresentation {
                token_index: 1,
                message: format!("invalid flags word {flags:?}"),
            }
        })?;

        let mut parsed_types = Vec::with_capacity(types.len());
        for (index, ty) in types.iter().enumerate() {
            let ty: RecordType = ty.parse().map_err(|_| {
                crate::error::ProtoErrorKind::MalformedPresentation {
                    token_index: index + 2,
                    message: format!("invalid record type mnemonic {ty:?}"),
                }
            })?;
            parsed_types.push(ty);
        }

        Ok(Self::new(serial, flags, parsed_types))
    }
}

impl From<CSYNC> for RData {
    fn from(value: CSYNC) -> Self {
        Self::CSYNC(value)
    }
}

impl BinEncodable for CSYNC {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u32(self.serial)?;
        encoder.emit_u16(self.flags)?;
        encode_type_bitmaps(encoder, &self.type_bit_maps)
    }
}

impl<'r> BinDecodable<'r> for CSYNC {
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        let serial = decoder.read_u32()?.unverified(/* opaque serial number */);
        let flags = decoder.read_u16()?.unverified(/* used as a bitfield */);
        let remaining = decoder.remaining();
        let codes = decode_type_bitmaps(decoder, remaining)?;
        let type_bit_maps = codes.into_iter().map(RecordType::from).collect();
        Ok(Self::new(serial, flags, type_bit_maps))
    }
}

impl<'r> crate::rr::record_data::RecordDataDecodable<'r> for CSYNC {
    fn read_data(
        decoder: &mut BinDecoder<'r>,
        length: crate::serialize::binary::Restrict<u16>,
    ) -> ProtoResult<Self> {
        use crate::serialize::binary::RestrictedMath;
        let serial = decoder.read_u32()?.unverified(/* opaque serial number */);
        let flags = decoder.read_u16()?.unverified(/* used as a bitfield */);
        let bitmap_len = length
            .map(|u| u as usize)
            .checked_sub(6)?
            .unverified(/* used only as a byte count below */);
        let codes = decode_type_bitmaps(decoder, bitmap_len)?;
        let type_bit_maps = codes.into_iter().map(RecordType::from).collect();
        Ok(Self::new(serial, flags, type_bit_maps))
    }
}

impl super::RecordData for CSYNC {
    fn try_borrow(data: &RData) -> Option<&Self> {
        match data {
            RData::CSYNC(csync) => Some(csync),
            _ => None,
        }
    }

    fn record_type(&self) -> RecordType {
        RecordType::CSYNC
    }

    fn into_rdata(self) -> RData {
        self.into()
    }
}

impl fmt::Display for CSYNC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.serial, self.flags)?;
        for ty in &self.type_bit_maps {
            write!(f, " {ty}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s3_csync_scenario_bytes() {
        let csync = CSYNC::new(1, 3, vec![RecordType::A, RecordType::from(2), RecordType::AAAA]);
        let bytes = csync.to_bytes().unwrap();
        assert_eq!(
            bytes,
            hex_literal::hex!("00 00 00 01 00 03 00 04 60 00 00 08")
        );
    }

    #[test]
    fn round_trip() {
        let csync = CSYNC::new(42, FLAG_IMMEDIATE, vec![RecordType::A, RecordType::from(55)]);
        let bytes = csync.to_bytes().unwrap();
        let mut decoder = BinDecoder::new(&bytes);
        let decoded = CSYNC::read(&mut decoder).unwrap();
        assert_eq!(csync, decoded);
    }

    #[test]
    fn constructor_sorts_and_dedups_types() {
        let csync = CSYNC::new(1, 0, vec![RecordType::AAAA, RecordType::A, RecordType::A]);
        assert_eq!(csync.type_bit_maps(), &[RecordType::A, RecordType::AAAA]);
    }

    #[test]
    fn presentation_round_trip() {
        let csync = CSYNC::new(42, FLAG_IMMEDIATE, vec![RecordType::A, RecordType::AAAA]);
        let text = csync.to_string();
        let tokens = crate::serialize::txt::tokenize(&text).unwrap();
        let decoded = CSYNC::from_tokens(&tokens).unwrap();
        assert_eq!(csync, decoded);
    }

    #[test]
    fn presentation_allows_no_types() {
        let decoded = CSYNC::from_tokens(&["1".to_string(), "0".to_string()]).unwrap();
        assert_eq!(decoded, CSYNC::new(1, 0, vec![]));
    }

    #[test]
    fn presentation_rejects_unrecognized_type_mnemonic() {
        assert!(CSYNC::from_tokens(&["1".to_string(), "0".to_string(), "NOTATYPE".to_string()]).is_err());
    }

    #[test]
    fn presentation_rejects_too_few_tokens() {
        assert!(CSYNC::from_tokens(&["1".to_string()]).is_err());
    }
}
