// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Digest algorithms used to bind a DS record to the DNSKEY it covers.

use std::fmt;

use digest::Digest as _;
use gost94::Gost94CryptoPro;
use sha1::Sha1;
use sha2::{Sha256, Sha384};
use subtle::ConstantTimeEq;

use crate::error::{ProtoErrorKind, ProtoResult};

/// [RFC 4034 Appendix A.2](https://tools.ietf.org/html/rfc4034#appendix-A.2) /
/// [RFC 3658](https://tools.ietf.org/html/rfc3658) / [RFC 4509](https://tools.ietf.org/html/rfc4509) /
/// [RFC 5933](https://tools.ietf.org/html/rfc5933): the hash selecting how a DS digest is computed.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
#[non_exhaustive]
pub enum DigestType {
    /// SHA-1
    SHA1,
    /// SHA-256
    SHA256,
    /// GOST R 34.11-94
    GOST,
    /// SHA-384
    SHA384,
    /// Any other registered or private-use digest type
    Unknown(u8),
}

impl DigestType {
    /// The IANA-registered wire octet for this digest type
    pub fn wire_value(self) -> u8 {
        match self {
            Self::SHA1 => 1,
            Self::SHA256 => 2,
            Self::GOST => 3,
            Self::SHA384 => 4,
            Self::Unknown(v) => v,
        }
    }
}

impl From<u8> for DigestType {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::SHA1,
            2 => Self::SHA256,
            3 => Self::GOST,
            4 => Self::SHA384,
            v => Self::Unknown(v),
        }
    }
}

impl From<DigestType> for u8 {
    fn from(value: DigestType) -> Self {
        value.wire_value()
    }
}

impl fmt::Display for DigestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SHA1 => write!(f, "SHA1"),
            Self::SHA256 => write!(f, "SHA256"),
            Self::GOST => write!(f, "GOST"),
            Self::SHA384 => write!(f, "SHA384"),
            Self::Unknown(v) => write!(f, "DIGEST{v}"),
        }
    }
}

/// An owned digest value, produced by hashing a DS digest-input buffer with
/// the hash selected by a [`DigestType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest(Vec<u8>);

impl Digest {
    /// Hash `data` with the function selected by `digest_type`.
    ///
    /// Returns [`crate::error::ProtoErrorKind::UnsupportedDigest`] for a
    /// digest type this crate has no implementation registered for, rather
    /// than silently falling back to a default hash.
    pub fn new(data: &[u8], digest_type: DigestType) -> ProtoResult<Self> {
        let bytes = match digest_type {
            DigestType::SHA1 => Sha1::digest(data).to_vec(),
            DigestType::SHA256 => Sha256::digest(data).to_vec(),
            DigestType::SHA384 => Sha384::digest(data).to_vec(),
            DigestType::GOST => Gost94CryptoPro::digest(data).to_vec(),
            DigestType::Unknown(v) => {
                tracing::debug!(digest_type = v, "unsupported DS digest type");
                return Err(ProtoErrorKind::UnsupportedDigest(v).into());
            }
        };
        Ok(Self(bytes))
    }

    /// Wrap an already-computed digest, e.g. one just read off the wire
    pub fn from_raw(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The raw digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Compare two digests for equality in constant time, so a DS coverage check
/// never leaks timing information about how many leading bytes matched.
pub fn digest_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        let digest = Digest::new(b"abc", DigestType::SHA256).unwrap();
        let expected =
            hex_literal::hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert_eq!(digest.as_bytes(), &expected);
    }

    #[test]
    fn unsupported_digest_type_is_an_error() {
        let err = Digest::new(b"abc", DigestType::Unknown(200));
        assert!(matches!(
            err.unwrap_err().kind(),
            ProtoErrorKind::UnsupportedDigest(200)
        ));
    }

    #[test]
    fn digest_eq_rejects_different_lengths() {
        assert!(!digest_eq(b"abc", b"ab"));
    }
}
