// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! DNSKEY rdata ([RFC 4034 §2](https://tools.ietf.org/html/rfc4034#section-2)): a zone's
//! public key, plus the flags advertising how it's meant to be used.

use std::fmt;
use std::sync::Arc;

use crate::dnssec::algorithm::Algorithm;
use crate::dnssec::digest::{Digest, DigestType};
use crate::dnssec::public_key::{decode_public_key, PublicKey, PublicKeyBuf, Verifier};
use crate::error::{ProtoError, ProtoErrorKind, ProtoResult};
use crate::rr::domain::Name;
use crate::rr::record_data::{RData, RecordDataDecodable};
use crate::rr::rdata::RecordData;
use crate::rr::record_type::RecordType;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder, Restrict, RestrictedMath};

const ZONE_KEY_FLAG: u16 = 0b0000_0001_0000_0000;
const SECURE_ENTRY_POINT_FLAG: u16 = 0b0000_0000_0000_0001;
const REVOKE_FLAG: u16 = 0b0000_0000_1000_0000;

/// A DNSSEC public key: a flags word (zone key / secure entry point /
/// revoked), a protocol octet fixed at 3, and an algorithm-tagged public
/// key blob.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct DNSKEY {
    flags: u16,
    public_key: PublicKeyBuf,
}

impl DNSKEY {
    /// Construct from a key's zone-key, secure-entry-point and revoke bits.
    pub fn new(zone_key: bool, secure_entry_point: bool, revoke: bool, public_key: PublicKeyBuf) -> Self {
        let mut flags = 0u16;
        if zone_key {
            flags |= ZONE_KEY_FLAG;
        }
        if secure_entry_point {
            flags |= SECURE_ENTRY_POINT_FLAG;
        }
        if revoke {
            flags |= REVOKE_FLAG;
        }
        Self::with_flags(flags, public_key)
    }

    /// Construct a zone-signing key (zone key set, not a secure entry
    /// point, not revoked) wrapping `public_key`'s own algorithm.
    pub fn from_key(public_key: &dyn PublicKey) -> Self {
        Self::new(
            true,
            false,
            false,
            PublicKeyBuf::new(public_key.public_bytes().to_vec(), public_key.algorithm()),
        )
    }

    /// Construct from a raw flags word, bypassing the named constructors
    pub fn with_flags(flags: u16, public_key: PublicKeyBuf) -> Self {
        Self { flags, public_key }
    }

    /// The raw flags word
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// `true` if this key signs zone RRsets
    pub fn zone_key(&self) -> bool {
        self.flags & ZONE_KEY_FLAG != 0
    }

    /// `true` if this key is a secure entry point ([RFC 3757](https://tools.ietf.org/html/rfc3757))
    pub fn secure_entry_point(&self) -> bool {
        self.flags & SECURE_ENTRY_POINT_FLAG != 0
    }

    /// `true` if this key has been revoked ([RFC 5011](https://tools.ietf.org/html/rfc5011))
    pub fn revoke(&self) -> bool {
        self.flags & REVOKE_FLAG != 0
    }

    /// A key-signing key has flags value 257: zone key and secure entry
    /// point set, not revoked.
    pub fn is_key_signing_key(&self) -> bool {
        self.zone_key() && self.secure_entry_point() && !self.revoke()
    }

    /// The algorithm-tagged public key
    pub fn public_key(&self) -> &PublicKeyBuf {
        &self.public_key
    }

    /// Digest this key for a DS record: `digest(canonical owner name ||
    /// DNSKEY RDATA)`, per [RFC 4034 §5.1.4](https://tools.ietf.org/html/rfc4034#section-5.1.4).
    pub fn to_digest(&self, name: &Name, digest_type: DigestType) -> ProtoResult<Digest> {
        let mut buf = Vec::new();
        {
            let mut encoder = BinEncoder::with_canonical_encoding(&mut buf);
            name.emit_canonical(&mut encoder)
                .and_then(|_| self.emit(&mut encoder))
                .map_err(|e| {
                    tracing::warn!("error serializing dnskey for digest: {e}");
                    format!("error serializing dnskey for digest: {e}")
                })?;
        }
        Digest::new(&buf, digest_type)
    }

    /// The key tag: a checksum over this key's own rdata, used to
    /// shortlist candidate keys before a full signature check
    /// ([RFC 4034 Appendix B](https://tools.ietf.org/html/rfc4034#appendix-b)).
    ///
    /// Preserves the legacy RSA/MD5 quirk verbatim: `pub[len-4] & (pub[len-3]
    /// << 8)`, a bitwise-AND rather than the arithmetic sum RFC 4034
    /// Appendix B.1 suggests. The two operands occupy disjoint bit ranges
    /// (`pub[len-4]` in bits 0-7, `pub[len-3] << 8` in bits 8-15), so this
    /// always ANDs to zero; tracked as an open question in DESIGN.md rather
    /// than silently "corrected" to the sane formula.
    pub fn calculate_key_tag(&self) -> ProtoResult<u16> {
        if self.public_key.algorithm() == Algorithm::RSAMD5 {
            let key = self.public_key.public_bytes();
            let len = key.len();
            if len < 4 {
                return Ok(0);
            }
            let low = u16::from(key[len - 4]);
            let high = u16::from(key[len - 3]) << 8;
            return Ok(low & high);
        }
        let mut bytes = Vec::new();
        {
            let mut encoder = BinEncoder::new(&mut bytes);
            self.emit(&mut encoder)?;
        }
        Ok(Self::calculate_key_tag_internal(&bytes))
    }

    /// Parse from presentation-format tokens: flags, protocol (must be 3),
    /// algorithm number, then a base64 public key split across the
    /// remaining tokens (zone-file convention wraps long keys onto
    /// multiple lines, which by the time tokens reach here are just more
    /// whitespace-separated tokens to concatenate).
    pub fn from_tokens(tokens: &[String]) -> ProtoResult<Self> {
        let [flags, protocol, algorithm, key_tokens @ ..] = tokens else {
            return Err(ProtoErrorKind::MalformedPresentation {
                token_index: 0,
                message: "DNSKEY expects at least flags, protocol, and algorithm".to_string(),
            }
            .into());
        };

        let flags: u16 = flags.parse().map_err(|_| ProtoErrorKind::MalformedPresentation {
            token_index: 0,
            message: format!("invalid flags word {flags:?}"),
        })?;
        let protocol: u8 = protocol.parse().map_err(|_| ProtoErrorKind::MalformedPresentation {
            token_index: 1,
            message: format!("invalid protocol octet {protocol:?}"),
        })?;
        if protocol != 3 {
            return Err(ProtoErrorKind::DnsKeyProtocolNot3(protocol).into());
        }
        let algorithm: u8 = algorithm.parse().map_err(|_| ProtoErrorKind::MalformedPresentation {
            token_index: 2,
            message: format!("invalid algorithm number {algorithm:?}"),
        })?;
        let algorithm = Algorithm::from(algorithm);

        if key_tokens.is_empty() {
            return Err(ProtoErrorKind::MalformedPresentation {
                token_index: 3,
                message: "DNSKEY is missing its base64 public key".to_string(),
            }
            .into());
        }
        let encoded: String = key_tokens.concat();
        let public_key = data_encoding::BASE64
            .decode(encoded.as_bytes())
            .map_err(|e| ProtoErrorKind::MalformedPresentation {
                token_index: 3,
                message: format!("invalid base64 public key: {e}"),
            })?;

        Ok(Self::with_flags(flags, PublicKeyBuf::new(public_key, algorithm)))
    }

    /// The RFC 4034 Appendix B checksum, applied to the raw rdata bytes.
    /// Not valid for RSA/MD5; see [`Self::calculate_key_tag`].
    pub fn calculate_key_tag_internal(bytes: &[u8]) -> u16 {
        let mut ac: u32 = 0;
        for (i, k) in bytes.iter().enumerate() {
            ac += u32::from(*k) << if i & 0x01 != 0 { 0 } else { 8 };
        }
        ac += ac >> 16;
        (ac & 0xFFFF) as u16
    }
}

impl From<DNSKEY> for RData {
    fn from(key: DNSKEY) -> Self {
        Self::DNSSEC(super::DNSSECRData::DNSKEY(key))
    }
}

impl BinEncodable for DNSKEY {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16(self.flags)?;
        encoder.emit_u8(3)?; // protocol, fixed at 3
        self.public_key.algorithm().emit(encoder)?;
        encoder.emit_vec(self.public_key.public_bytes())
    }
}

impl<'r> RecordDataDecodable<'r> for DNSKEY {
    fn read_data(decoder: &mut BinDecoder<'r>, length: Restrict<u16>) -> ProtoResult<Self> {
        let flags = decoder.read_u16()?.unverified(/* used as a bitfield */);

        let _protocol = decoder
            .read_u8()?
            .verify_unwrap(|protocol| *protocol == 3)
            .map_err(|protocol| ProtoError::from(ProtoErrorKind::DnsKeyProtocolNot3(protocol)))?;

        let algorithm = Algorithm::read(decoder)?;

        let key_len = length
            .map(|u| u as usize)
            .checked_sub(4)?
            .unverified(/* used only as a byte count below */);
        let public_key = decoder.read_vec(key_len)?.unverified(/* opaque key material */);

        Ok(Self::with_flags(flags, PublicKeyBuf::new(public_key, algorithm)))
    }
}

impl RecordData for DNSKEY {
    fn try_borrow(data: &RData) -> Option<&Self> {
        match data {
            RData::DNSSEC(super::DNSSECRData::DNSKEY(key)) => Some(key),
            _ => None,
        }
    }

    fn record_type(&self) -> RecordType {
        RecordType::DNSKEY
    }

    fn into_rdata(self) -> RData {
        self.into()
    }
}

impl Verifier for DNSKEY {
    fn algorithm(&self) -> Algorithm {
        self.public_key.algorithm()
    }

    fn key(&self) -> ProtoResult<Arc<dyn PublicKey + '_>> {
        decode_public_key(self.public_key.public_bytes(), self.public_key.algorithm())
    }
}

impl fmt::Display for DNSKEY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{flags} 3 {alg} {key}",
            flags = self.flags,
            alg = u8::from(self.public_key.algorithm()),
            key = data_encoding::BASE64.encode(self.public_key.public_bytes())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DNSKEY {
        DNSKEY::new(
            true,
            true,
            false,
            PublicKeyBuf::new(vec![1, 2, 3, 4, 5, 6, 7, 8], Algorithm::RSASHA256),
        )
    }

    #[test]
    fn flags_round_trip_through_constructors() {
        let key = sample();
        assert!(key.zone_key());
        assert!(key.secure_entry_point());
        assert!(!key.revoke());
        assert!(key.is_key_signing_key());
        assert_eq!(key.flags(), 257);
    }

    #[test]
    fn emit_then_read_data_round_trips() {
        let key = sample();
        let bytes = key.to_bytes().unwrap();
        let mut decoder = BinDecoder::new(&bytes);
        let read = DNSKEY::read_data(&mut decoder, Restrict::new(bytes.len() as u16)).unwrap();
        assert_eq!(key, read);
    }

    #[test]
    fn rejects_non_three_protocol_field() {
        let bytes = hex_literal::hex!("01 01 04 08 01 02 03 04 05 06 07 08");
        let mut decoder = BinDecoder::new(&bytes);
        let err = DNSKEY::read_data(&mut decoder, Restrict::new(bytes.len() as u16));
        assert!(matches!(
            err.unwrap_err().kind(),
            ProtoErrorKind::DnsKeyProtocolNot3(4)
        ));
    }

    #[test]
    fn calculate_key_tag_checksum_matches_reference_vectors() {
        let vectors: Vec<(Vec<u8>, u16)> = vec![
            (vec![], 0),
            (vec![0, 0, 0, 0], 0),
            (vec![0xff, 0xff, 0xff, 0xff], 0xffff),
            (vec![1, 0, 0, 0], 0x0100),
            (vec![0, 1, 0, 0], 0x0001),
            (vec![0, 0, 1, 0], 0x0100),
        ];
        for (input, expected) in vectors {
            assert_eq!(DNSKEY::calculate_key_tag_internal(&input), expected);
        }
    }

    #[test]
    fn rsamd5_key_tag_mirrors_the_legacy_bitwise_and_quirk() {
        // pub[len-4] & (pub[len-3] << 8): the two operands occupy disjoint
        // bit ranges, so this is always zero regardless of key content.
        let key = DNSKEY::with_flags(
            256,
            PublicKeyBuf::new(vec![0x03, 0x01, 0x00, 0x01, 0xAB, 0xCD], Algorithm::RSAMD5),
        );
        assert_eq!(key.calculate_key_tag().unwrap(), 0);
    }

    #[test]
    fn rsamd5_key_tag_short_key_is_zero() {
        let key = DNSKEY::with_flags(256, PublicKeyBuf::new(vec![1, 2], Algorithm::RSAMD5));
        assert_eq!(key.calculate_key_tag().unwrap(), 0);
    }

    #[test]
    fn to_digest_is_stable_for_the_same_key_and_name() {
        let key = sample();
        let name = Name::parse("example.com.", None).unwrap();
        let a = key.to_digest(&name, DigestType::SHA256).unwrap();
        let b = key.to_digest(&name, DigestType::SHA256).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn presentation_round_trip() {
        let key = sample();
        let text = key.to_string();
        let tokens = crate::serialize::txt::tokenize(&text).unwrap();
        let decoded = DNSKEY::from_tokens(&tokens).unwrap();
        assert_eq!(key, decoded);
    }

    #[test]
    fn presentation_accepts_key_wrapped_across_multiple_tokens() {
        let key = sample();
        let encoded = data_encoding::BASE64.encode(key.public_key().public_bytes());
        let mid = encoded.len() / 2;
        let mut tokens = vec!["257".to_string(), "3".to_string(), "8".to_string()];
        tokens.push(encoded[..mid].to_string());
        tokens.push(encoded[mid..].to_string());
        let decoded = DNSKEY::from_tokens(&tokens).unwrap();
        assert_eq!(key, decoded);
    }

    #[test]
    fn presentation_rejects_non_three_protocol() {
        let err = DNSKEY::from_tokens(&[
            "257".to_string(),
            "4".to_string(),
            "8".to_string(),
            "AQ==".to_string(),
        ]);
        assert!(matches!(
            err.unwrap_err().kind(),
            ProtoErrorKind::DnsKeyProtocolNot3(4)
        ));
    }

    #[test]
    fn presentation_rejects_missing_key_material() {
        assert!(DNSKEY::from_tokens(&["257".to_string(), "3".to_string(), "8".to_string()]).is_err());
    }
}
