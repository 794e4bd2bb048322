// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The EDNS0 pseudo-record rdata ([RFC 6891 §6.1](https://tools.ietf.org/html/rfc6891#section-6.1)):
//! a flat sequence of `(code, length, data)` option TLVs.
//!
//! RFC 6891 also repurposes the enclosing record's generic `CLASS` and
//! `TTL` fields (requestor's UDP payload size, and extended-rcode /
//! version / a DO-bit flags word, respectively) rather than adding them to
//! the rdata. Since those reinterpretations belong to this pseudo-record
//! kind and not to the generic header, [`OPT`] carries them as its own
//! typed fields; [`OPT::class_field`] and [`OPT::ttl_field`] are how a
//! caller framing a full record recovers the values to place in those
//! generic header fields.

use std::fmt;

use crate::error::ProtoErrorKind;
use crate::error::ProtoResult;
use crate::rr::rdata::edns::EdnsOption;
use crate::rr::rdata::RecordData;
use crate::rr::record_data::{RData, RecordDataDecodable};
use crate::rr::record_type::RecordType;
use crate::serialize::binary::{BinDecoder, BinEncodable, BinEncoder, Restrict};

const DNSSEC_OK_FLAG: u16 = 0x8000;

/// The EDNS0 pseudo-record: a requestor's advertised UDP payload size, an
/// extended-rcode/version/flags word, and the list of options it carries.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Default)]
pub struct OPT {
    udp_payload_size: u16,
    extended_rcode: u8,
    version: u8,
    flags: u16,
    options: Vec<EdnsOption>,
}

impl OPT {
    /// Construct with default (zeroed) header fields, carrying `options`
    pub fn new(options: Vec<EdnsOption>) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Construct from the generic record's own `CLASS`/`TTL` fields, as
    /// RFC 6891 §6.1.3 overloads them for an OPT record.
    pub fn from_wire_fields(class: u16, ttl: u32, options: Vec<EdnsOption>) -> Self {
        Self {
            udp_payload_size: class,
            extended_rcode: (ttl >> 24) as u8,
            version: (ttl >> 16) as u8,
            flags: ttl as u16,
            options,
        }
    }

    /// The requestor's advertised UDP payload size
    pub fn udp_payload_size(&self) -> u16 {
        self.udp_payload_size
    }

    /// Set the advertised UDP payload size
    pub fn set_udp_payload_size(&mut self, size: u16) {
        self.udp_payload_size = size;
    }

    /// The high octet of the extended 12-bit response code
    pub fn extended_rcode(&self) -> u8 {
        self.extended_rcode
    }

    /// Set the high octet of the extended response code
    pub fn set_extended_rcode(&mut self, extended_rcode: u8) {
        self.extended_rcode = extended_rcode;
    }

    /// The EDNS version this record advertises (0, currently)
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Set the EDNS version
    pub fn set_version(&mut self, version: u8) {
        self.version = version;
    }

    /// The raw flags word
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// `true` if the DO (DNSSEC OK) bit is set
    pub fn dnssec_ok(&self) -> bool {
        self.flags & DNSSEC_OK_FLAG != 0
    }

    /// Set or clear the DO bit
    pub fn set_dnssec_ok(&mut self, on: bool) {
        if on {
            self.flags |= DNSSEC_OK_FLAG;
        } else {
            self.flags &= !DNSSEC_OK_FLAG;
        }
    }

    /// The options this record carries
    pub fn options(&self) -> &[EdnsOption] {
        &self.options
    }

    /// The value a caller framing a full record should place in the
    /// generic header's `CLASS` field
    pub fn class_field(&self) -> u16 {
        self.udp_payload_size
    }

    /// The value a caller framing a full record should place in the
    /// generic header's `TTL` field
    pub fn ttl_field(&self) -> u32 {
        (u32::from(self.extended_rcode) << 24) | (u32::from(self.version) << 16) | u32::from(self.flags)
    }

    /// Upper bound on the emitted rdata length: each option's 4-octet
    /// `(code, length)` header plus its data.
    pub fn max_rdata_length(&self) -> usize {
        self.options
            .iter()
            .map(|option| 4 + option.option_bytes().len())
            .sum()
    }
}

impl From<OPT> for RData {
    fn from(opt: OPT) -> Self {
        Self::OPT(opt)
    }
}

impl BinEncodable for OPT {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        for option in &self.options {
            option.emit(encoder)?;
        }
        Ok(())
    }
}

impl<'r> RecordDataDecodable<'r> for OPT {
    fn read_data(decoder: &mut BinDecoder<'r>, length: Restrict<u16>) -> ProtoResult<Self> {
        let mut remaining = length.map(|u| u as usize).unverified(/* checked against each TLV below */);
        let mut options = Vec::new();

        while remaining > 0 {
            remaining = remaining
                .checked_sub(4)
                .ok_or(ProtoErrorKind::Truncated { needed: 4 })?;

            let code = decoder.read_u16()?.unverified(/* dispatched or carried opaque below */);
            let option_len = decoder.read_u16()?.unverified(/* checked against remaining below */) as usize;

            remaining = remaining
                .checked_sub(option_len)
                .ok_or(ProtoErrorKind::Truncated { needed: option_len })?;

            let data = decoder.read_vec(option_len)?.unverified(/* dispatched or carried opaque */);
            options.push(EdnsOption::from_wire(code, data)?);
        }

        Ok(Self {
            options,
            ..Default::default()
        })
    }
}

impl RecordData for OPT {
    fn try_borrow(data: &RData) -> Option<&Self> {
        match data {
            RData::OPT(opt) => Some(opt),
            _ => None,
        }
    }

    fn record_type(&self) -> RecordType {
        RecordType::OPT
    }

    fn into_rdata(self) -> RData {
        self.into()
    }
}

impl fmt::Display for OPT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OPT")?;
        for option in &self.options {
            write!(f, " {option}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rr::rdata::edns::{EdnsOwnerOption, Nsec3HashUnderstoodOption};

    #[test]
    fn round_trips_no_options() {
        let opt = OPT::new(vec![]);
        let bytes = opt.to_bytes().unwrap();
        assert!(bytes.is_empty());
        let decoded = OPT::read_data(&mut BinDecoder::new(&bytes), Restrict::new(0)).unwrap();
        assert_eq!(opt, decoded);
    }

    #[test]
    fn round_trips_mixed_options() {
        let opt = OPT::new(vec![
            EdnsOption::Nsec3HashUnderstood(Nsec3HashUnderstoodOption::new(vec![1])),
            EdnsOption::Owner(EdnsOwnerOption::new(0, 1, [1, 2, 3, 4, 5, 6], None, None)),
            EdnsOption::Unknown {
                code: 65001,
                data: vec![0xAA, 0xBB],
            },
        ]);
        let bytes = opt.to_bytes().unwrap();
        let decoded = OPT::read_data(&mut BinDecoder::new(&bytes), Restrict::new(bytes.len() as u16)).unwrap();
        assert_eq!(opt, decoded);
    }

    #[test]
    fn wire_fields_round_trip_through_class_and_ttl_accessors() {
        let mut opt = OPT::from_wire_fields(4096, 0x8000_0000, vec![]);
        assert_eq!(opt.udp_payload_size(), 4096);
        assert_eq!(opt.extended_rcode(), 0x80);
        assert_eq!(opt.version(), 0);
        assert!(opt.dnssec_ok());

        opt.set_dnssec_ok(false);
        assert!(!opt.dnssec_ok());
        assert_eq!(opt.class_field(), 4096);
        assert_eq!(opt.ttl_field() >> 24, 0x80);
    }

    #[test]
    fn rejects_option_length_exceeding_rdlength() {
        let bytes = hex_literal::hex!("00 04 00 05 AA AA AA AA");
        let err = OPT::read_data(&mut BinDecoder::new(&bytes), Restrict::new(bytes.len() as u16));
        assert!(err.is_err());
    }
}
