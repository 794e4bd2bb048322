// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `RData`: the tagged sum of every rdata schema this crate knows how to
//! parse and emit, dispatched on [`RecordType`] rather than on the Rust
//! type of the payload — see the design note in §9 of the governing spec
//! on avoiding a deep-inheritance record hierarchy.

use std::fmt;

use crate::dnssec::rdata::DNSSECRData;
use crate::error::{ProtoErrorKind, ProtoResult};
use crate::rr::domain::Name;
use crate::rr::rdata::{CNAME, CSYNC, HINFO, RecordData, OPT, WKS};
use crate::rr::record_type::RecordType;
use crate::serialize::binary::{BinDecoder, BinEncodable, BinEncoder, Restrict};

/// The rdata of a resource record
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
#[non_exhaustive]
pub enum RData {
    /// `CNAME` rdata
    CNAME(CNAME),
    /// `HINFO` rdata
    HINFO(HINFO),
    /// `WKS` rdata
    WKS(WKS),
    /// `CSYNC` rdata
    CSYNC(CSYNC),
    /// The DNSSEC record families (`DNSKEY`, `DS`)
    DNSSEC(DNSSECRData),
    /// `OPT` pseudo-record rdata: the EDNS0 option list
    OPT(OPT),
    /// Any record type this crate does not specify rdata semantics for; the
    /// bytes are carried opaque, as framing only requires an exact
    /// rdlength round trip, not an understanding of the payload.
    Unknown {
        /// the wire record type the opaque bytes belong to
        rdata_type: RecordType,
        /// the raw rdata bytes, exactly `rdlength` long
        data: Vec<u8>,
    },
}

impl RData {
    /// Parse the rdata body for `record_type`, reading exactly the
    /// `rdata_length` octets framing has sliced off for it.
    pub fn read(
        decoder: &mut BinDecoder<'_>,
        record_type: RecordType,
        rdata_length: Restrict<u16>,
    ) -> ProtoResult<Self> {
        let start = decoder.index();
        let rdata = match record_type {
            RecordType::CNAME => Self::CNAME(CNAME::read_data(decoder, rdata_length)?),
            RecordType::HINFO => Self::HINFO(HINFO::read_data(decoder, rdata_length)?),
            RecordType::WKS => Self::WKS(WKS::read_data(decoder, rdata_length)?),
            RecordType::CSYNC => Self::CSYNC(CSYNC::read_data(decoder, rdata_length)?),
            RecordType::DNSKEY | RecordType::DS => {
                Self::DNSSEC(DNSSECRData::read_data(decoder, record_type, rdata_length)?)
            }
            RecordType::OPT => Self::OPT(OPT::read_data(decoder, rdata_length)?),
            other => {
                let len = rdata_length.unverified(/* used only as a slice length below */) as usize;
                let data = decoder.read_vec(len)?.unverified(/* opaque, any bytes valid */);
                Self::Unknown {
                    rdata_type: other,
                    data,
                }
            }
        };

        let read = decoder.index() - start;
        let expected = rdata_length.unverified(/* compared, not used as a length here */) as usize;
        match read.cmp(&expected) {
            std::cmp::Ordering::Greater => {
                return Err(ProtoErrorKind::TrailingRdata {
                    remaining: read - expected,
                }
                .into());
            }
            std::cmp::Ordering::Less => {
                return Err(ProtoErrorKind::ShortRdata { read, expected }.into());
            }
            std::cmp::Ordering::Equal => {}
        }

        Ok(rdata)
    }

    /// Parse the presentation-format (master-file) tokens for `record_type`.
    /// `origin` resolves any trailing-dot-free names the rdata embeds, as
    /// with a zone file's `$ORIGIN`.
    ///
    /// `OPT` and unknown record types have no generic presentation form:
    /// `OPT` is a pseudo-record synthesized for the wire only, and opaque
    /// rdata has no schema to parse tokens against.
    pub fn from_tokens(
        record_type: RecordType,
        tokens: &[String],
        origin: Option<&Name>,
    ) -> ProtoResult<Self> {
        match record_type {
            RecordType::CNAME => Ok(Self::CNAME(CNAME::from_tokens(tokens, origin)?)),
            RecordType::HINFO => Ok(Self::HINFO(HINFO::from_tokens(tokens)?)),
            RecordType::WKS => Ok(Self::WKS(WKS::from_tokens(tokens)?)),
            RecordType::CSYNC => Ok(Self::CSYNC(CSYNC::from_tokens(tokens)?)),
            RecordType::DNSKEY | RecordType::DS => {
                Ok(Self::DNSSEC(DNSSECRData::from_tokens(record_type, tokens)?))
            }
            RecordType::OPT => Err(ProtoErrorKind::MalformedPresentation {
                token_index: 0,
                message: "OPT has no presentation-format rdata".to_string(),
            }
            .into()),
            other => Err(ProtoErrorKind::MalformedPresentation {
                token_index: 0,
                message: format!("{other} has no presentation-format rdata"),
            }
            .into()),
        }
    }

    /// The wire record type of this rdata value
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::CNAME(r) => r.record_type(),
            Self::HINFO(r) => r.record_type(),
            Self::WKS(r) => r.record_type(),
            Self::CSYNC(r) => r.record_type(),
            Self::DNSSEC(r) => r.record_type(),
            Self::OPT(r) => r.record_type(),
            Self::Unknown { rdata_type, .. } => *rdata_type,
        }
    }

    /// Upper bound on the emitted length of this rdata, sufficient to
    /// pre-size an emit buffer (need not be tight)
    pub fn max_rdata_length(&self) -> usize {
        match self {
            Self::CNAME(_) => 255,
            Self::HINFO(r) => 1 + r.cpu().len() + 1 + r.os().len(),
            Self::WKS(r) => 4 + 1 + r.ports().iter().copied().max().map_or(0, |p| p as usize / 8 + 1),
            Self::CSYNC(r) => r.max_rdata_length(),
            Self::DNSSEC(r) => r.max_rdata_length(),
            Self::OPT(r) => r.max_rdata_length(),
            Self::Unknown { data, .. } => data.len(),
        }
    }
}

impl BinEncodable for RData {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        match self {
            Self::CNAME(r) => r.emit(encoder),
            Self::HINFO(r) => r.emit(encoder),
            Self::WKS(r) => r.emit(encoder),
            Self::CSYNC(r) => r.emit(encoder),
            Self::DNSSEC(r) => r.emit(encoder),
            Self::OPT(r) => r.emit(encoder),
            Self::Unknown { data, .. } => encoder.emit_vec(data),
        }
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CNAME(r) => write!(f, "{r}"),
            Self::HINFO(r) => write!(f, "{r}"),
            Self::WKS(r) => write!(f, "{r}"),
            Self::CSYNC(r) => write!(f, "{r}"),
            Self::DNSSEC(r) => write!(f, "{r}"),
            Self::OPT(r) => write!(f, "{r}"),
            Self::Unknown { data, .. } => write!(f, "\\# {} {}", data.len(), hex_encode(data)),
        }
    }
}

fn hex_encode(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}

/// Implemented by rdata types decodable from a fixed-length rdata slice.
/// Distinct from [`crate::serialize::binary::BinDecodable`] because most
/// rdata schemas need to know how many bytes remain in their slice (an
/// opaque public-key or digest blob, a bitmap that runs to the end of
/// rdata) rather than self-delimiting on the wire.
pub trait RecordDataDecodable<'r>: Sized {
    /// Parse `Self` from exactly `length` octets of `decoder`
    fn read_data(decoder: &mut BinDecoder<'r>, length: Restrict<u16>) -> ProtoResult<Self>;
}

macro_rules! self_delimiting_rdata {
    ($ty:ty) => {
        impl<'r> RecordDataDecodable<'r> for $ty {
            fn read_data(decoder: &mut BinDecoder<'r>, _length: Restrict<u16>) -> ProtoResult<Self> {
                <$ty as crate::serialize::binary::BinDecodable>::read(decoder)
            }
        }
    };
}

self_delimiting_rdata!(CNAME);
self_delimiting_rdata!(HINFO);

// WKS and CSYNC carry a field that runs to the end of rdata (a port bitmap,
// a windowed type bitmap) and so need the rdata length threaded through
// explicitly; see their own `RecordDataDecodable` impls.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_tokens_dispatches_cname_with_origin() {
        let origin = Name::parse("example.com.", None).unwrap();
        let tokens = vec!["alias".to_string()];
        let rdata = RData::from_tokens(RecordType::CNAME, &tokens, Some(&origin)).unwrap();
        assert_eq!(rdata.record_type(), RecordType::CNAME);
    }

    #[test]
    fn from_tokens_dispatches_hinfo() {
        let tokens = vec!["INTEL-386".to_string(), "LINUX".to_string()];
        let rdata = RData::from_tokens(RecordType::HINFO, &tokens, None).unwrap();
        assert_eq!(rdata.record_type(), RecordType::HINFO);
    }

    #[test]
    fn from_tokens_dispatches_ds_through_the_dnssec_family() {
        let tokens: Vec<String> = ["12345", "8", "2", "abab", "cdcd"]
            .into_iter()
            .map(String::from)
            .collect();
        let rdata = RData::from_tokens(RecordType::DS, &tokens, None).unwrap();
        assert_eq!(rdata.record_type(), RecordType::DS);
    }

    #[test]
    fn from_tokens_rejects_opt() {
        assert!(RData::from_tokens(RecordType::OPT, &[], None).is_err());
    }
}
