// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! [RFC 4034 Appendix A.1](https://tools.ietf.org/html/rfc4034#appendix-A.1)
//! DNSSEC algorithm numbers.

use std::fmt;

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// A DNSSEC signing algorithm, keyed by its IANA-registered wire octet.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
#[non_exhaustive]
pub enum Algorithm {
    /// RSA/MD5, deprecated, kept only for its legacy key-tag quirk
    RSAMD5,
    /// RSA/SHA-1
    RSASHA1,
    /// RSA/SHA-1, NSEC3 variant (same signature scheme as RSASHA1)
    RSASHA1NSEC3SHA1,
    /// RSA/SHA-256
    RSASHA256,
    /// RSA/SHA-512
    RSASHA512,
    /// ECDSA curve P-256 with SHA-256
    ECDSAP256SHA256,
    /// ECDSA curve P-384 with SHA-384
    ECDSAP384SHA384,
    /// Ed25519
    ED25519,
    /// Ed448
    ED448,
    /// GOST R 34.10-2001, verification only; see the crypto module's
    /// handling of this algorithm
    GOST,
    /// Any other registered or private-use algorithm
    Unknown(u8),
}

impl Algorithm {
    /// The IANA-registered wire octet for this algorithm
    pub fn wire_value(self) -> u8 {
        match self {
            Self::RSAMD5 => 1,
            Self::RSASHA1 => 5,
            Self::RSASHA1NSEC3SHA1 => 7,
            Self::RSASHA256 => 8,
            Self::RSASHA512 => 10,
            Self::ECDSAP256SHA256 => 13,
            Self::ECDSAP384SHA384 => 14,
            Self::ED25519 => 15,
            Self::ED448 => 16,
            Self::GOST => 12,
            Self::Unknown(v) => v,
        }
    }
}

impl From<u8> for Algorithm {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::RSAMD5,
            5 => Self::RSASHA1,
            7 => Self::RSASHA1NSEC3SHA1,
            8 => Self::RSASHA256,
            10 => Self::RSASHA512,
            12 => Self::GOST,
            13 => Self::ECDSAP256SHA256,
            14 => Self::ECDSAP384SHA384,
            15 => Self::ED25519,
            16 => Self::ED448,
            v => Self::Unknown(v),
        }
    }
}

impl From<Algorithm> for u8 {
    fn from(value: Algorithm) -> Self {
        value.wire_value()
    }
}

impl<'r> BinDecodable<'r> for Algorithm {
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        let value = decoder.read_u8()?.unverified(/* every octet is a valid algorithm number */);
        Ok(Self::from(value))
    }
}

impl BinEncodable for Algorithm {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u8(self.wire_value())
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = match self {
            Self::RSAMD5 => "RSAMD5",
            Self::RSASHA1 => "RSASHA1",
            Self::RSASHA1NSEC3SHA1 => "RSASHA1-NSEC3-SHA1",
            Self::RSASHA256 => "RSASHA256",
            Self::RSASHA512 => "RSASHA512",
            Self::ECDSAP256SHA256 => "ECDSAP256SHA256",
            Self::ECDSAP384SHA384 => "ECDSAP384SHA384",
            Self::ED25519 => "ED25519",
            Self::ED448 => "ED448",
            Self::GOST => "ECC-GOST",
            Self::Unknown(v) => return write!(f, "ALG{v}"),
        };
        write!(f, "{mnemonic}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::binary::{BinDecoder, BinEncoder};

    #[test]
    fn wire_value_round_trips() {
        for alg in [
            Algorithm::RSAMD5,
            Algorithm::RSASHA1,
            Algorithm::RSASHA1NSEC3SHA1,
            Algorithm::RSASHA256,
            Algorithm::RSASHA512,
            Algorithm::ECDSAP256SHA256,
            Algorithm::ECDSAP384SHA384,
            Algorithm::ED25519,
            Algorithm::ED448,
            Algorithm::GOST,
        ] {
            assert_eq!(Algorithm::from(alg.wire_value()), alg);
        }
        assert_eq!(Algorithm::from(200), Algorithm::Unknown(200));
    }

    #[test]
    fn wire_round_trip() {
        let mut bytes = Vec::new();
        let mut encoder = BinEncoder::new(&mut bytes);
        Algorithm::ECDSAP256SHA256.emit(&mut encoder).unwrap();
        let mut decoder = BinDecoder::new(&bytes);
        assert_eq!(
            Algorithm::read(&mut decoder).unwrap(),
            Algorithm::ECDSAP256SHA256
        );
    }

    #[test]
    fn unknown_algorithm_displays_with_numeric_code() {
        assert_eq!(Algorithm::Unknown(250).to_string(), "ALG250");
    }
}
