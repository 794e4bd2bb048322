// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The `TYPE` field of a resource record: a 16-bit wire code identifying
//! the rdata schema that follows.

use std::fmt;

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// A DNS resource record type.
///
/// This is a closed set for the record families this crate implements rdata
/// codecs for; [`RecordType::Unknown`] carries forward any other wire code
/// so messages containing it can still be framed (owner/class/ttl/rdlength)
/// even though its rdata is treated as opaque.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
#[non_exhaustive]
pub enum RecordType {
    /// RFC 1035, address record, not specified by this crate's rdata codecs
    A,
    /// RFC 3596, IPv6 address record, not specified by this crate's rdata codecs
    AAAA,
    /// RFC 1035, canonical name record
    CNAME,
    /// RFC 1035, host information
    HINFO,
    /// RFC 1035, well known services
    WKS,
    /// RFC 7477, child-to-parent synchronization
    CSYNC,
    /// RFC 4034, DNSSEC public key
    DNSKEY,
    /// RFC 4034, delegation signer
    DS,
    /// RFC 6891, EDNS0 pseudo-record carrying protocol-extension options
    OPT,
    /// Any other registered or private-use type
    Unknown(u16),
}

impl RecordType {
    /// The IANA-registered wire value for this type
    pub fn wire_value(self) -> u16 {
        match self {
            Self::A => 1,
            Self::AAAA => 28,
            Self::CNAME => 5,
            Self::HINFO => 13,
            Self::WKS => 11,
            Self::CSYNC => 62,
            Self::DNSKEY => 48,
            Self::DS => 43,
            Self::OPT => 41,
            Self::Unknown(v) => v,
        }
    }
}

impl From<u16> for RecordType {
    fn from(value: u16) -> Self {
        match value {
            1 => Self::A,
            28 => Self::AAAA,
            5 => Self::CNAME,
            13 => Self::HINFO,
            11 => Self::WKS,
            62 => Self::CSYNC,
            48 => Self::DNSKEY,
            43 => Self::DS,
            41 => Self::OPT,
            v => Self::Unknown(v),
        }
    }
}

impl std::str::FromStr for RecordType {
    type Err = crate::error::ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "A" => Self::A,
            "AAAA" => Self::AAAA,
            "CNAME" => Self::CNAME,
            "HINFO" => Self::HINFO,
            "WKS" => Self::WKS,
            "CSYNC" => Self::CSYNC,
            "DNSKEY" => Self::DNSKEY,
            "DS" => Self::DS,
            "OPT" => Self::OPT,
            _ => {
                if let Some(digits) = s.strip_prefix("TYPE") {
                    let v: u16 = digits
                        .parse()
                        .map_err(|_| crate::error::ProtoErrorKind::MalformedPresentation {
                            token_index: 0,
                            message: format!("unrecognized record type mnemonic: {s}"),
                        })?;
                    Self::from(v)
                } else {
                    return Err(crate::error::ProtoErrorKind::MalformedPresentation {
                        token_index: 0,
                        message: format!("unrecognized record type mnemonic: {s}"),
                    }
                    .into());
                }
            }
        })
    }
}

impl From<RecordType> for u16 {
    fn from(value: RecordType) -> Self {
        value.wire_value()
    }
}

impl PartialOrd for RecordType {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecordType {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.wire_value().cmp(&other.wire_value())
    }
}

impl<'r> BinDecodable<'r> for RecordType {
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        let value = decoder.read_u16()?.unverified(/* every u16 is a valid record type */);
        Ok(Self::from(value))
    }
}

impl BinEncodable for RecordType {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16(self.wire_value())
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::AAAA => write!(f, "AAAA"),
            Self::CNAME => write!(f, "CNAME"),
            Self::HINFO => write!(f, "HINFO"),
            Self::WKS => write!(f, "WKS"),
            Self::CSYNC => write!(f, "CSYNC"),
            Self::DNSKEY => write!(f, "DNSKEY"),
            Self::DS => write!(f, "DS"),
            Self::OPT => write!(f, "OPT"),
            Self::Unknown(v) => write!(f, "TYPE{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn wire_value_round_trips_through_from_u16() {
        for rt in [
            RecordType::A,
            RecordType::AAAA,
            RecordType::CNAME,
            RecordType::HINFO,
            RecordType::WKS,
            RecordType::CSYNC,
            RecordType::DNSKEY,
            RecordType::DS,
            RecordType::OPT,
        ] {
            assert_eq!(RecordType::from(rt.wire_value()), rt);
        }
        assert_eq!(RecordType::from(300), RecordType::Unknown(300));
    }

    #[test]
    fn mnemonic_parse_is_case_insensitive() {
        assert_eq!(RecordType::from_str("cname").unwrap(), RecordType::CNAME);
        assert_eq!(RecordType::from_str("Dnskey").unwrap(), RecordType::DNSKEY);
    }

    #[test]
    fn generic_type_mnemonic_parses_numeric_suffix() {
        assert_eq!(RecordType::from_str("TYPE300").unwrap(), RecordType::Unknown(300));
        assert!(RecordType::from_str("TYPEnope").is_err());
        assert!(RecordType::from_str("BOGUS").is_err());
    }

    #[test]
    fn ordering_follows_wire_value() {
        assert!(RecordType::CNAME < RecordType::WKS);
        assert!(RecordType::A < RecordType::DS);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for rt in [RecordType::A, RecordType::CSYNC, RecordType::Unknown(9999)] {
            let s = rt.to_string();
            assert_eq!(RecordType::from_str(&s).unwrap(), rt);
        }
    }
}
