// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! DNSSEC rdata: DNSKEY and DS.

mod dnskey;
mod ds;

pub use self::dnskey::DNSKEY;
pub use self::ds::DS;

use std::fmt;

use crate::error::ProtoResult;
use crate::rr::record_data::RData;
use crate::rr::record_type::RecordType;
use crate::serialize::binary::{BinDecoder, BinEncodable, BinEncoder, Restrict};

/// The DNSSEC record families this crate understands, nested under
/// [`RData::DNSSEC`] so non-DNSSEC callers never have to match on them.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
#[non_exhaustive]
pub enum DNSSECRData {
    /// `DNSKEY` rdata
    DNSKEY(DNSKEY),
    /// `DS` rdata
    DS(DS),
}

impl DNSSECRData {
    /// Parse the rdata body for `record_type`, one of `DNSKEY` or `DS`.
    pub fn read_data(
        decoder: &mut BinDecoder<'_>,
        record_type: RecordType,
        rdata_length: Restrict<u16>,
    ) -> ProtoResult<Self> {
        use crate::rr::record_data::RecordDataDecodable;

        match record_type {
            RecordType::DNSKEY => Ok(Self::DNSKEY(DNSKEY::read_data(decoder, rdata_length)?)),
            RecordType::DS => Ok(Self::DS(DS::read_data(decoder, rdata_length)?)),
            other => Err(format!("{other} is not a DNSSEC record type").into()),
        }
    }

    /// The wire record type of this rdata value
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::DNSKEY(_) => RecordType::DNSKEY,
            Self::DS(_) => RecordType::DS,
        }
    }

    /// Upper bound on the emitted rdata length
    pub fn max_rdata_length(&self) -> usize {
        match self {
            Self::DNSKEY(r) => 4 + r.public_key().public_bytes().len(),
            Self::DS(r) => 4 + r.digest().as_bytes().len(),
        }
    }

    /// Parse the presentation-format tokens for `record_type`, one of
    /// `DNSKEY` or `DS`.
    pub fn from_tokens(record_type: RecordType, tokens: &[String]) -> ProtoResult<Self> {
        match record_type {
            RecordType::DNSKEY => Ok(Self::DNSKEY(DNSKEY::from_tokens(tokens)?)),
            RecordType::DS => Ok(Self::DS(DS::from_tokens(tokens)?)),
            other => Err(format!("{other} is not a DNSSEC record type").into()),
        }
    }
}

impl BinEncodable for DNSSECRData {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        match self {
            Self::DNSKEY(r) => r.emit(encoder),
            Self::DS(r) => r.emit(encoder),
        }
    }
}

impl fmt::Display for DNSSECRData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DNSKEY(r) => write!(f, "{r}"),
            Self::DS(r) => write!(f, "{r}"),
        }
    }
}

impl From<DNSSECRData> for RData {
    fn from(value: DNSSECRData) -> Self {
        Self::DNSSEC(value)
    }
}
