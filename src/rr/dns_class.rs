// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The `CLASS` field of a resource record

use std::fmt;

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// RFC 1035 resource record class
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
#[non_exhaustive]
pub enum DNSClass {
    /// Internet
    IN,
    /// Chaos
    CH,
    /// Hesiod
    HS,
    /// Used in dynamic update messages and QU-bit EDNS meanings; also the
    /// class carried in an OPT pseudo-record, where it holds the UDP
    /// payload size instead.
    NONE,
    /// Query class for any class
    ANY,
    /// Any other registered or private-use class
    Unknown(u16),
}

impl From<u16> for DNSClass {
    fn from(value: u16) -> Self {
        match value {
            1 => Self::IN,
            3 => Self::CH,
            4 => Self::HS,
            254 => Self::NONE,
            255 => Self::ANY,
            v => Self::Unknown(v),
        }
    }
}

impl From<DNSClass> for u16 {
    fn from(value: DNSClass) -> Self {
        match value {
            DNSClass::IN => 1,
            DNSClass::CH => 3,
            DNSClass::HS => 4,
            DNSClass::NONE => 254,
            DNSClass::ANY => 255,
            DNSClass::Unknown(v) => v,
        }
    }
}

impl<'r> BinDecodable<'r> for DNSClass {
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        let value = decoder.read_u16()?.unverified(/* every u16 is a valid class */);
        Ok(Self::from(value))
    }
}

impl BinEncodable for DNSClass {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16(u16::from(*self))
    }
}

impl fmt::Display for DNSClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IN => write!(f, "IN"),
            Self::CH => write!(f, "CH"),
            Self::HS => write!(f, "HS"),
            Self::NONE => write!(f, "NONE"),
            Self::ANY => write!(f, "ANY"),
            Self::Unknown(v) => write!(f, "CLASS{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::binary::{BinDecoder, BinEncoder};

    #[test]
    fn wire_value_round_trips() {
        for class in [DNSClass::IN, DNSClass::CH, DNSClass::HS, DNSClass::NONE, DNSClass::ANY] {
            assert_eq!(DNSClass::from(u16::from(class)), class);
        }
        assert_eq!(DNSClass::from(9999), DNSClass::Unknown(9999));
    }

    #[test]
    fn wire_round_trip() {
        let mut bytes = Vec::new();
        let mut encoder = BinEncoder::new(&mut bytes);
        DNSClass::IN.emit(&mut encoder).unwrap();
        let mut decoder = BinDecoder::new(&bytes);
        assert_eq!(DNSClass::read(&mut decoder).unwrap(), DNSClass::IN);
    }

    #[test]
    fn display_matches_mnemonic() {
        assert_eq!(DNSClass::IN.to_string(), "IN");
        assert_eq!(DNSClass::Unknown(7).to_string(), "CLASS7");
    }
}
