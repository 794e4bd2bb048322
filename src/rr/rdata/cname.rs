// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Canonical name record: an alias pointing at another owner name.

use std::fmt;

use crate::error::ProtoResult;
use crate::rr::domain::Name;
use crate::rr::record_data::RData;
use crate::rr::record_type::RecordType;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// [RFC 1035 §3.3.1](https://tools.ietf.org/html/rfc1035#section-3.3.1): a single
/// compressible [`Name`] pointing at the canonical owner for an alias.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct CNAME(pub Name);

impl CNAME {
    /// The aliased target name
    pub fn name(&self) -> &Name {
        &self.0
    }

    /// Parse from presentation-format tokens: a single name, resolved
    /// against `origin` if it isn't fully qualified.
    pub fn from_tokens(tokens: &[String], origin: Option<&Name>) -> ProtoResult<Self> {
        let [target] = tokens else {
            return Err(crate::error::ProtoErrorKind::MalformedPresentation {
                token_index: 0,
                message: format!("CNAME expects exactly 1 token, got {}", tokens.len()),
            }
            .into());
        };
        Ok(Self(Name::parse(target, origin)?))
    }
}

impl From<CNAME> for RData {
    fn from(value: CNAME) -> Self {
        Self::CNAME(value)
    }
}

impl BinEncodable for CNAME {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        self.0.emit(encoder)
    }
}

impl<'r> BinDecodable<'r> for CNAME {
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        Ok(Self(Name::read(decoder)?))
    }
}

impl super::RecordData for CNAME {
    fn try_borrow(data: &RData) -> Option<&Self> {
        match data {
            RData::CNAME(cname) => Some(cname),
            _ => None,
        }
    }

    fn record_type(&self) -> RecordType {
        RecordType::CNAME
    }

    fn into_rdata(self) -> RData {
        self.into()
    }
}

impl fmt::Display for CNAME {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_cname_canonical_bytes() {
        let name = Name::from_ascii("alias.example.net.").unwrap();
        let bytes = name.to_bytes_canonical().unwrap();
        assert_eq!(
            bytes,
            hex_literal::hex!("05 61 6c 69 61 73 07 65 78 61 6d 70 6c 65 03 6e 65 74 00")
        );
    }

    #[test]
    fn round_trip() {
        let cname = CNAME(Name::from_ascii("alias.example.net.").unwrap());
        let bytes = cname.to_bytes().unwrap();
        let mut decoder = BinDecoder::new(&bytes);
        let decoded = CNAME::read(&mut decoder).unwrap();
        assert_eq!(cname, decoded);
    }

    #[test]
    fn presentation_round_trip() {
        let cname = CNAME(Name::from_ascii("alias.example.net.").unwrap());
        let text = cname.to_string();
        let tokens = crate::serialize::txt::tokenize(&text).unwrap();
        let decoded = CNAME::from_tokens(&tokens, None).unwrap();
        assert_eq!(cname, decoded);
    }

    #[test]
    fn presentation_resolves_relative_name_against_origin() {
        let origin = Name::from_ascii("example.net.").unwrap();
        let decoded = CNAME::from_tokens(&["alias".to_string()], Some(&origin)).unwrap();
        assert_eq!(decoded, CNAME(Name::from_ascii("alias.example.net.").unwrap()));
    }

    #[test]
    fn presentation_rejects_wrong_token_count() {
        assert!(CNAME::from_tokens(&[], None).is_err());
        assert!(CNAME::from_tokens(&["a".to_string(), "b".to_string()], None).is_err());
    }
}
