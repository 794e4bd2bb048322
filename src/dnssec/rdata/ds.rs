// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! DS (delegation signer) rdata ([RFC 4034 §5](https://tools.ietf.org/html/rfc4034#section-5)):
//! a digest binding a parent-zone record to a child-zone DNSKEY, used to
//! chain trust across a delegation.

use std::fmt;

use crate::dnssec::algorithm::Algorithm;
use crate::dnssec::digest::{digest_eq, Digest, DigestType};
use crate::dnssec::rdata::DNSKEY;
use crate::error::ProtoResult;
use crate::rr::domain::Name;
use crate::rr::record_data::{RData, RecordDataDecodable};
use crate::rr::rdata::RecordData;
use crate::rr::record_type::RecordType;
use crate::serialize::binary::{BinDecoder, BinEncodable, BinEncoder, Restrict, RestrictedMath};

/// A delegation signer record: the key tag and algorithm of the DNSKEY it
/// covers, plus a digest of that key's canonical rdata.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct DS {
    key_tag: u16,
    algorithm: Algorithm,
    digest_type: DigestType,
    digest: Digest,
}

impl DS {
    /// Construct from already-computed fields
    pub fn new(key_tag: u16, algorithm: Algorithm, digest_type: DigestType, digest: Digest) -> Self {
        Self {
            key_tag,
            algorithm,
            digest_type,
            digest,
        }
    }

    /// Compute a DS record covering `key`, owned by `name`, hashed with
    /// `digest_type`.
    pub fn cover(name: &Name, key: &DNSKEY, digest_type: DigestType) -> ProtoResult<Self> {
        Ok(Self::new(
            key.calculate_key_tag()?,
            key.public_key().algorithm(),
            digest_type,
            key.to_digest(name, digest_type)?,
        ))
    }

    /// The covered key's key tag
    pub fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// The covered key's algorithm
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The digest algorithm used to produce [`Self::digest`]
    pub fn digest_type(&self) -> DigestType {
        self.digest_type
    }

    /// The digest of the covered key's canonical rdata
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Parse from presentation-format tokens: key tag, algorithm number,
    /// digest type, then a base16 digest split across the remaining
    /// tokens.
    pub fn from_tokens(tokens: &[String]) -> ProtoResult<Self> {
        let [key_tag, algorithm, digest_type, digest_tokens @ ..] = tokens else {
            return Err(crate::error::ProtoErrorKind::MalformedPresentation {
                token_index: 0,
                message: "DS expects at least a key tag, algorithm, and digest type".to_string(),
            }
            .into());
        };

        let key_tag: u16 = key_tag.parse().map_err(|_| {
            crate::error::ProtoErrorKind::MalformedPresentation {
                token_index: 0,
                message: format!("invalid key tag {key_tag:?}"),
            }
        })?;
        let algorithm: u8 = algorithm.parse().map_err(|_| {
            crate::error::ProtoErrorKind::MalformedPresentation {
                token_index: 1,
                message: format!("invalid algorithm number {algorithm:?}"),
            }
        })?;
        let algorithm = Algorithm::from(algorithm);
        let digest_type: u8 = digest_type.parse().map_err(|_| {
            crate::error::ProtoErrorKind::MalformedPresentation {
                token_index: 2,
                message: format!("invalid digest type {digest_type:?}"),
            }
        })?;
        let digest_type = DigestType::from(digest_type);

        if digest_tokens.is_empty() {
            return Err(crate::error::ProtoErrorKind::MalformedPresentation {
                token_index: 3,
                message: "DS is missing its base16 digest".to_string(),
            }
            .into());
        }
        let encoded: String = digest_tokens.concat();
        let digest = data_encoding::HEXUPPER
            .decode(encoded.to_ascii_uppercase().as_bytes())
            .map_err(|e| crate::error::ProtoErrorKind::MalformedPresentation {
                token_index: 3,
                message: format!("invalid base16 digest: {e}"),
            })?;

        Ok(Self::new(key_tag, algorithm, digest_type, Digest::from_raw(digest)))
    }

    /// `true` if this DS record's digest matches `key` as owned by `name`:
    /// the binding check a resolver performs to validate a delegation.
    ///
    /// Checks algorithm and key tag before hashing anything, so a key that
    /// plainly isn't the one this DS names is rejected without spending a
    /// digest computation on it. An unsupported digest type is a soft
    /// `false`, not an error: an unknown digest type can never be verified
    /// as covering, but it isn't a parse failure either.
    pub fn is_covering(&self, name: &Name, key: &DNSKEY) -> ProtoResult<bool> {
        if key.public_key().algorithm() != self.algorithm {
            return Ok(false);
        }
        if key.calculate_key_tag()? != self.key_tag {
            return Ok(false);
        }
        match key.to_digest(name, self.digest_type) {
            Ok(candidate) => Ok(digest_eq(self.digest.as_bytes(), candidate.as_bytes())),
            Err(e) if matches!(e.kind(), crate::error::ProtoErrorKind::UnsupportedDigest(_)) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

impl From<DS> for RData {
    fn from(ds: DS) -> Self {
        Self::DNSSEC(super::DNSSECRData::DS(ds))
    }
}

impl BinEncodable for DS {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16(self.key_tag)?;
        self.algorithm.emit(encoder)?;
        encoder.emit_u8(self.digest_type.wire_value())?;
        encoder.emit_vec(self.digest.as_bytes())
    }
}

impl<'r> RecordDataDecodable<'r> for DS {
    fn read_data(decoder: &mut BinDecoder<'r>, length: Restrict<u16>) -> ProtoResult<Self> {
        let key_tag = decoder.read_u16()?.unverified(/* opaque identifier */);
        let algorithm = Algorithm::read(decoder)?;
        let digest_type = DigestType::from(decoder.read_u8()?.unverified(/* widened below */));

        let digest_len = length
            .map(|u| u as usize)
            .checked_sub(4)?
            .unverified(/* used only as a byte count below */);
        let digest = decoder.read_vec(digest_len)?.unverified(/* opaque digest bytes */);

        Ok(Self::new(key_tag, algorithm, digest_type, Digest::from_raw(digest)))
    }
}

impl RecordData for DS {
    fn try_borrow(data: &RData) -> Option<&Self> {
        match data {
            RData::DNSSEC(super::DNSSECRData::DS(ds)) => Some(ds),
            _ => None,
        }
    }

    fn record_type(&self) -> RecordType {
        RecordType::DS
    }

    fn into_rdata(self) -> RData {
        self.into()
    }
}

impl fmt::Display for DS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.key_tag,
            u8::from(self.algorithm),
            self.digest_type.wire_value(),
            data_encoding::HEXUPPER.encode(self.digest.as_bytes())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dnssec::public_key::PublicKeyBuf;

    fn sample_key() -> DNSKEY {
        DNSKEY::new(
            true,
            true,
            false,
            PublicKeyBuf::new(vec![1, 2, 3, 4, 5, 6, 7, 8], Algorithm::RSASHA256),
        )
    }

    #[test]
    fn emit_then_read_data_round_trips() {
        let ds = DS::new(
            12345,
            Algorithm::RSASHA256,
            DigestType::SHA256,
            Digest::from_raw(vec![0u8; 32]),
        );
        let bytes = ds.to_bytes().unwrap();
        let mut decoder = BinDecoder::new(&bytes);
        let read = DS::read_data(&mut decoder, Restrict::new(bytes.len() as u16)).unwrap();
        assert_eq!(ds, read);
    }

    #[test]
    fn is_covering_accepts_the_key_it_was_computed_from() {
        let name = Name::parse("example.com.", None).unwrap();
        let key = sample_key();
        let ds = DS::cover(&name, &key, DigestType::SHA256).unwrap();
        assert!(ds.is_covering(&name, &key).unwrap());
    }

    #[test]
    fn is_covering_rejects_a_different_key() {
        let name = Name::parse("example.com.", None).unwrap();
        let key = sample_key();
        let ds = DS::cover(&name, &key, DigestType::SHA256).unwrap();

        let other = DNSKEY::new(
            true,
            true,
            false,
            PublicKeyBuf::new(vec![9, 9, 9, 9], Algorithm::RSASHA256),
        );
        assert!(!ds.is_covering(&name, &other).unwrap());
    }

    #[test]
    fn is_covering_rejects_a_different_owner_name() {
        let key = sample_key();
        let ds = DS::cover(&Name::parse("example.com.", None).unwrap(), &key, DigestType::SHA256).unwrap();
        assert!(!ds
            .is_covering(&Name::parse("example.org.", None).unwrap(), &key)
            .unwrap());
    }

    #[test]
    fn is_covering_rejects_algorithm_mismatch_before_hashing() {
        let name = Name::parse("example.com.", None).unwrap();
        let key = sample_key();
        let ds = DS::new(
            key.calculate_key_tag().unwrap(),
            Algorithm::ECDSAP256SHA256,
            DigestType::SHA256,
            Digest::from_raw(vec![0u8; 32]),
        );
        assert!(!ds.is_covering(&name, &key).unwrap());
    }

    #[test]
    fn is_covering_with_unsupported_digest_type_is_false_not_an_error() {
        let name = Name::parse("example.com.", None).unwrap();
        let key = sample_key();
        let ds = DS::new(
            key.calculate_key_tag().unwrap(),
            key.public_key().algorithm(),
            DigestType::Unknown(200),
            Digest::from_raw(vec![0u8; 20]),
        );
        assert!(!ds.is_covering(&name, &key).unwrap());
    }

    #[test]
    fn presentation_round_trip() {
        let ds = DS::new(
            12345,
            Algorithm::RSASHA256,
            DigestType::SHA256,
            Digest::from_raw(vec![0xAB; 32]),
        );
        let text = ds.to_string();
        let tokens = crate::serialize::txt::tokenize(&text).unwrap();
        let decoded = DS::from_tokens(&tokens).unwrap();
        assert_eq!(ds, decoded);
    }

    #[test]
    fn presentation_accepts_digest_split_across_tokens_and_lowercase_hex() {
        let tokens: Vec<String> = ["12345", "8", "2", "abab", "cdcd"]
            .into_iter()
            .map(String::from)
            .collect();
        let decoded = DS::from_tokens(&tokens).unwrap();
        assert_eq!(
            decoded,
            DS::new(
                12345,
                Algorithm::RSASHA256,
                DigestType::SHA256,
                Digest::from_raw(hex_literal::hex!("ab ab cd cd").to_vec()),
            )
        );
    }

    #[test]
    fn presentation_rejects_missing_digest() {
        assert!(DS::from_tokens(&["12345".to_string(), "8".to_string(), "2".to_string()]).is_err());
    }

    #[test]
    fn presentation_rejects_too_few_tokens() {
        assert!(DS::from_tokens(&["12345".to_string()]).is_err());
    }
}
