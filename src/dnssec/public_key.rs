// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Decoding a DNSKEY public-key blob into something that can verify a
//! signature, per algorithm.

use std::sync::Arc;

use ed25519_dalek::Signature as Ed25519Signature;
use ed25519_dalek::VerifyingKey as Ed25519VerifyingKey;
use p256::ecdsa::{Signature as P256Signature, VerifyingKey as P256VerifyingKey};
use p384::ecdsa::{Signature as P384Signature, VerifyingKey as P384VerifyingKey};
use rsa::{Pkcs1v15Sign, RsaPublicKey as RsaKey};
use signature::Verifier as _;

use crate::dnssec::algorithm::Algorithm;
use crate::dnssec::gost;
use crate::dnssec::rsa_public_key::RsaPublicKey;
use crate::error::{ProtoErrorKind, ProtoResult};

/// A DNSKEY public-key blob together with the algorithm that defines its
/// internal layout.
///
/// Kept as opaque bytes plus a tag rather than eagerly decoded: most callers
/// only need to carry the key around (emit it, hash it for a DS digest) and
/// never touch the cryptographic internals at all.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct PublicKeyBuf {
    key: Vec<u8>,
    algorithm: Algorithm,
}

impl PublicKeyBuf {
    /// Wrap an already-encoded public-key blob
    pub fn new(key: Vec<u8>, algorithm: Algorithm) -> Self {
        Self { key, algorithm }
    }

    /// The raw on-wire public-key bytes
    pub fn public_bytes(&self) -> &[u8] {
        &self.key
    }

    /// The algorithm this key's blob is laid out for
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

/// A public key that can verify a signature over an arbitrary message.
///
/// Implemented once per algorithm family; [`decode_public_key`] picks the
/// right implementation from a [`PublicKeyBuf`]'s algorithm tag.
pub trait PublicKey {
    /// The raw on-wire public-key bytes this key was decoded from
    fn public_bytes(&self) -> &[u8];

    /// The algorithm this key verifies signatures for
    fn algorithm(&self) -> Algorithm;

    /// Verify `signature` over `message`.
    ///
    /// Returns `Ok(())` on a valid signature, `Err(VerifyFailed)` on an
    /// invalid one. Never returns `Unsupported` here — unsupported
    /// algorithms are rejected earlier, in [`decode_public_key`].
    fn verify(&self, message: &[u8], signature: &[u8]) -> ProtoResult<()>;
}

/// Implemented by record types that carry a verifiable public key (i.e.
/// [`crate::dnssec::rdata::dnskey::DNSKEY`]), so callers can go straight
/// from a record to a [`PublicKey`] without reaching into rdata internals.
pub trait Verifier {
    /// The algorithm this key is registered under
    fn algorithm(&self) -> Algorithm;

    /// Decode this value's public-key blob into a verifier
    fn key(&self) -> ProtoResult<Arc<dyn PublicKey + '_>>;
}

struct RsaVerifyingKey {
    bytes: Vec<u8>,
    algorithm: Algorithm,
    key: RsaKey,
}

impl PublicKey for RsaVerifyingKey {
    fn public_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> ProtoResult<()> {
        use digest::Digest as _;

        let (scheme, hashed): (Pkcs1v15Sign, Vec<u8>) = match self.algorithm {
            Algorithm::RSASHA1 | Algorithm::RSASHA1NSEC3SHA1 => (
                Pkcs1v15Sign::new::<sha1::Sha1>(),
                sha1::Sha1::digest(message).to_vec(),
            ),
            Algorithm::RSASHA256 => (
                Pkcs1v15Sign::new::<sha2::Sha256>(),
                sha2::Sha256::digest(message).to_vec(),
            ),
            Algorithm::RSASHA512 => (
                Pkcs1v15Sign::new::<sha2::Sha512>(),
                sha2::Sha512::digest(message).to_vec(),
            ),
            _ => unreachable!("RsaVerifyingKey only constructed for RSA algorithms"),
        };

        self.key
            .verify(scheme, &hashed, signature)
            .map_err(|_| ProtoErrorKind::VerifyFailed.into())
    }
}

struct P256VerifyingKeyWrapper {
    bytes: Vec<u8>,
    key: P256VerifyingKey,
}

impl PublicKey for P256VerifyingKeyWrapper {
    fn public_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::ECDSAP256SHA256
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> ProtoResult<()> {
        if signature.len() != 64 {
            return Err(ProtoErrorKind::VerifyFailed.into());
        }
        let sig = P256Signature::from_scalars(
            <[u8; 32]>::try_from(&signature[..32]).unwrap(),
            <[u8; 32]>::try_from(&signature[32..]).unwrap(),
        )
        .map_err(|_| ProtoErrorKind::VerifyFailed)?;
        self.key
            .verify(message, &sig)
            .map_err(|_| ProtoErrorKind::VerifyFailed.into())
    }
}

struct P384VerifyingKeyWrapper {
    bytes: Vec<u8>,
    key: P384VerifyingKey,
}

impl PublicKey for P384VerifyingKeyWrapper {
    fn public_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::ECDSAP384SHA384
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> ProtoResult<()> {
        if signature.len() != 96 {
            return Err(ProtoErrorKind::VerifyFailed.into());
        }
        let sig = P384Signature::from_scalars(
            <[u8; 48]>::try_from(&signature[..48]).unwrap(),
            <[u8; 48]>::try_from(&signature[48..]).unwrap(),
        )
        .map_err(|_| ProtoErrorKind::VerifyFailed)?;
        self.key
            .verify(message, &sig)
            .map_err(|_| ProtoErrorKind::VerifyFailed.into())
    }
}

struct Ed25519VerifyingKeyWrapper {
    bytes: Vec<u8>,
    key: Ed25519VerifyingKey,
}

impl PublicKey for Ed25519VerifyingKeyWrapper {
    fn public_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::ED25519
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> ProtoResult<()> {
        let sig = Ed25519Signature::from_slice(signature).map_err(|_| ProtoErrorKind::VerifyFailed)?;
        self.key
            .verify(message, &sig)
            .map_err(|_| ProtoErrorKind::VerifyFailed.into())
    }
}

struct Ed448VerifyingKeyWrapper {
    bytes: Vec<u8>,
    key: ed448_goldilocks::VerifyingKey,
}

impl PublicKey for Ed448VerifyingKeyWrapper {
    fn public_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::ED448
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> ProtoResult<()> {
        let sig =
            ed448_goldilocks::Signature::try_from(signature).map_err(|_| ProtoErrorKind::VerifyFailed)?;
        self.key
            .verify(message, &sig)
            .map_err(|_| ProtoErrorKind::VerifyFailed.into())
    }
}

/// GOST R 34.10-2001 point-verification is not implemented: no registry
/// crate for the curve arithmetic is available in this crate's dependency
/// stack. The byte-order conversion required to get there ([`gost`]) is
/// implemented and tested on its own; wiring it up to an actual curve
/// multiply is an open question, tracked in `DESIGN.md`.
struct UnsupportedGostKey {
    bytes: Vec<u8>,
}

impl PublicKey for UnsupportedGostKey {
    fn public_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::GOST
    }

    fn verify(&self, _message: &[u8], _signature: &[u8]) -> ProtoResult<()> {
        Err(ProtoErrorKind::UnsupportedAlgorithm(Algorithm::GOST.wire_value()).into())
    }
}

/// Decode a DNSKEY public-key blob into a [`PublicKey`] capable of
/// verifying signatures for it.
///
/// Returns [`crate::error::ProtoErrorKind::UnsupportedAlgorithm`] for an
/// algorithm this crate recognizes but has no verifier for (GOST), or for
/// any unregistered algorithm number.
pub fn decode_public_key(key_bytes: &[u8], algorithm: Algorithm) -> ProtoResult<Arc<dyn PublicKey>> {
    match algorithm {
        Algorithm::RSASHA1
        | Algorithm::RSASHA1NSEC3SHA1
        | Algorithm::RSASHA256
        | Algorithm::RSASHA512 => {
            let parsed = RsaPublicKey::try_from(key_bytes)?;
            let n = rsa::BigUint::from_bytes_be(parsed.n);
            let e = rsa::BigUint::from_bytes_be(parsed.e);
            let key =
                RsaKey::new(n, e).map_err(|e| format!("invalid RSA public key: {e}"))?;
            Ok(Arc::new(RsaVerifyingKey {
                bytes: key_bytes.to_vec(),
                algorithm,
                key,
            }))
        }
        Algorithm::ECDSAP256SHA256 => {
            let mut sec1 = Vec::with_capacity(1 + key_bytes.len());
            sec1.push(0x04);
            sec1.extend_from_slice(key_bytes);
            let key = P256VerifyingKey::from_sec1_bytes(&sec1)
                .map_err(|e| format!("invalid P-256 public key: {e}"))?;
            Ok(Arc::new(P256VerifyingKeyWrapper {
                bytes: key_bytes.to_vec(),
                key,
            }))
        }
        Algorithm::ECDSAP384SHA384 => {
            let mut sec1 = Vec::with_capacity(1 + key_bytes.len());
            sec1.push(0x04);
            sec1.extend_from_slice(key_bytes);
            let key = P384VerifyingKey::from_sec1_bytes(&sec1)
                .map_err(|e| format!("invalid P-384 public key: {e}"))?;
            Ok(Arc::new(P384VerifyingKeyWrapper {
                bytes: key_bytes.to_vec(),
                key,
            }))
        }
        Algorithm::ED25519 => {
            let array: [u8; 32] = key_bytes
                .try_into()
                .map_err(|_| "Ed25519 public key must be 32 octets")?;
            let key = Ed25519VerifyingKey::from_bytes(&array)
                .map_err(|e| format!("invalid Ed25519 public key: {e}"))?;
            Ok(Arc::new(Ed25519VerifyingKeyWrapper {
                bytes: key_bytes.to_vec(),
                key,
            }))
        }
        Algorithm::ED448 => {
            let key = ed448_goldilocks::VerifyingKey::try_from(key_bytes)
                .map_err(|_| "invalid Ed448 public key")?;
            Ok(Arc::new(Ed448VerifyingKeyWrapper {
                bytes: key_bytes.to_vec(),
                key,
            }))
        }
        Algorithm::GOST => {
            // validate the blob is at least shaped correctly before
            // reporting it as unsupported, so a truncated key still fails
            // with a useful error.
            let _ = gost::gost_key_to_xy(key_bytes)?;
            tracing::debug!("GOST R 34.10-2001 verification is not implemented");
            Ok(Arc::new(UnsupportedGostKey {
                bytes: key_bytes.to_vec(),
            }))
        }
        Algorithm::RSAMD5 => Err(ProtoErrorKind::UnsupportedAlgorithm(Algorithm::RSAMD5.wire_value()).into()),
        Algorithm::Unknown(v) => {
            tracing::debug!(algorithm = v, "unrecognized DNSSEC algorithm");
            Err(ProtoErrorKind::UnsupportedAlgorithm(v).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_algorithm_is_unsupported() {
        let err = decode_public_key(&[1, 2, 3], Algorithm::Unknown(200));
        assert!(matches!(
            err.unwrap_err().kind(),
            ProtoErrorKind::UnsupportedAlgorithm(200)
        ));
    }

    #[test]
    fn rsamd5_is_unsupported_for_verification() {
        let err = decode_public_key(&[1, 1, 0], Algorithm::RSAMD5);
        assert!(matches!(
            err.unwrap_err().kind(),
            ProtoErrorKind::UnsupportedAlgorithm(1)
        ));
    }

    #[test]
    fn gost_key_parses_but_verify_is_unsupported() {
        let blob = vec![0u8; 64];
        let key = decode_public_key(&blob, Algorithm::GOST).unwrap();
        let err = key.verify(b"msg", &[0u8; 64]);
        assert!(matches!(
            err.unwrap_err().kind(),
            ProtoErrorKind::UnsupportedAlgorithm(12)
        ));
    }
}
