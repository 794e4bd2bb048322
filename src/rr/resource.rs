// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The generic resource-record header and the framing that drives
//! per-type rdata codecs from it.

use std::fmt;

use crate::error::ProtoResult;
use crate::rr::dns_class::DNSClass;
use crate::rr::domain::Name;
use crate::rr::rdata::OPT;
use crate::rr::record_data::RData;
use crate::rr::record_type::RecordType;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder, Restrict};

/// A complete resource record: the generic header plus its typed rdata.
///
/// [RFC 1035 §4.1.3](https://tools.ietf.org/html/rfc1035#section-4.1.3):
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                                               |
/// /                                               /
/// /                      NAME                     /
/// |                                               |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      TYPE                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     CLASS                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      TTL                      |
/// |                                               |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                   RDLENGTH                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     RDATA                     /
/// /                                               /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Record {
    name: Name,
    dns_class: DNSClass,
    ttl: u32,
    rdata: RData,
}

impl Record {
    /// Construct a record from its parts
    pub fn new(name: Name, dns_class: DNSClass, ttl: u32, rdata: RData) -> Self {
        Self {
            name,
            dns_class,
            ttl,
            rdata,
        }
    }

    /// The owner name
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The record class
    pub fn dns_class(&self) -> DNSClass {
        self.dns_class
    }

    /// Time to live, in seconds
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// The record's rdata
    pub fn data(&self) -> &RData {
        &self.rdata
    }

    /// The record's wire type, taken from its rdata
    pub fn record_type(&self) -> RecordType {
        self.rdata.record_type()
    }
}

impl BinEncodable for Record {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        self.name.emit(encoder)?;
        self.record_type().emit(encoder)?;

        // OPT repurposes the generic CLASS/TTL fields to carry the UDP
        // payload size and the extended-rcode/version/flags word; recover
        // those from the rdata itself rather than from `self.dns_class`/
        // `self.ttl`, which for an OPT record are not meaningful as a
        // class or a lifetime.
        if let RData::OPT(opt) = &self.rdata {
            encoder.emit_u16(opt.class_field())?;
            encoder.emit_u32(opt.ttl_field())?;
        } else {
            self.dns_class.emit(encoder)?;
            encoder.emit_u32(self.ttl)?;
        }

        // rdlength is unknown until the rdata is emitted; reserve two bytes,
        // emit the rdata, then backfill. The compression table already
        // built up while emitting the name above stays valid, since rdata
        // emission only ever appends past this point.
        let rdlength_index = encoder.len();
        encoder.emit_u16(0)?;
        let rdata_start = encoder.len();
        self.rdata.emit(encoder)?;
        let rdata_len = encoder.len() - rdata_start;
        encoder.backfill_u16(rdlength_index, rdata_len as u16)
    }
}

impl<'r> BinDecodable<'r> for Record {
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        let name = Name::read(decoder)?;
        let record_type = RecordType::read(decoder)?;
        let dns_class = DNSClass::read(decoder)?;
        let ttl = decoder.read_u32()?.unverified(/* opaque seconds count */);
        let rdata_length: Restrict<u16> = decoder.read_u16()?;
        let rdata = RData::read(decoder, record_type, rdata_length)?;

        // OPT's generic CLASS/TTL fields are actually the UDP payload size
        // and the extended-rcode/version/flags word; thread the raw values
        // read above back into the typed rdata, per RFC 6891 §6.1.3.
        let rdata = if let RData::OPT(opt) = rdata {
            RData::OPT(OPT::from_wire_fields(u16::from(dns_class), ttl, opt.options().to_vec()))
        } else {
            rdata
        };

        Ok(Self {
            name,
            dns_class,
            ttl,
            rdata,
        })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{name} {ttl} {class} {ty} {rdata}",
            name = self.name,
            ttl = self.ttl,
            class = self.dns_class,
            ty = self.record_type(),
            rdata = self.rdata
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rr::rdata::CNAME;

    #[test]
    fn round_trips_header_and_backfills_rdlength() {
        let record = Record::new(
            Name::from_ascii("example.com.").unwrap(),
            DNSClass::IN,
            3600,
            RData::CNAME(CNAME(Name::from_ascii("alias.example.net.").unwrap())),
        );

        let bytes = record.to_bytes().unwrap();
        let mut decoder = BinDecoder::new(&bytes);
        let decoded = Record::read(&mut decoder).unwrap();
        assert_eq!(record, decoded);
        assert_eq!(decoder.index(), bytes.len());
    }

    #[test]
    fn opt_record_round_trips_class_and_ttl_as_payload_size_and_flags() {
        let opt = OPT::from_wire_fields(4096, 0x8000_0000, vec![]);
        let record = Record::new(Name::root(), DNSClass::Unknown(4096), 0x8000_0000, RData::OPT(opt));

        let bytes = record.to_bytes().unwrap();
        let mut decoder = BinDecoder::new(&bytes);
        let decoded = Record::read(&mut decoder).unwrap();

        let RData::OPT(decoded_opt) = decoded.data() else {
            panic!("expected OPT rdata");
        };
        assert_eq!(decoded_opt.udp_payload_size(), 4096);
        assert!(decoded_opt.dnssec_ok());
    }
}
