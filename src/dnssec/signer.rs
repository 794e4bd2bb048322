// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Key generation and signing, the inverse of [`crate::dnssec::public_key`].
//!
//! Every generator here takes its randomness as an explicit
//! `&mut (impl RngCore + CryptoRng)` parameter rather than reaching for a
//! hidden global, so a caller can swap in a deterministic RNG in tests or
//! a hardware-backed one in production without this module knowing either
//! way.

use rand::{CryptoRng, RngCore};
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use signature::Signer as _;

use crate::dnssec::algorithm::Algorithm;
use crate::dnssec::public_key::{decode_public_key, PublicKeyBuf};
use crate::error::ProtoResult;

/// A key pair capable of signing a message, producing the raw wire-format
/// signature (never ASN.1 DER) an [`crate::dnssec::public_key::PublicKey`]
/// of the same algorithm can verify.
pub trait SigningKey {
    /// This key's algorithm
    fn algorithm(&self) -> Algorithm;

    /// This key's public half, in DNSKEY wire layout
    fn public_key(&self) -> PublicKeyBuf;

    /// Sign `message`, returning the raw wire-format signature
    fn sign(&self, message: &[u8]) -> ProtoResult<Vec<u8>>;
}

/// Verify `signature` over `message` under `algorithm`, given the signer's
/// DNSKEY-layout public key blob.
///
/// A thin convenience wrapper around
/// [`decode_public_key`](crate::dnssec::public_key::decode_public_key) for
/// callers that only need a one-shot verification and don't want to hold
/// onto the decoded key.
pub fn verify(
    algorithm: Algorithm,
    public_key_bytes: &[u8],
    message: &[u8],
    signature: &[u8],
) -> ProtoResult<()> {
    decode_public_key(public_key_bytes, algorithm)?.verify(message, signature)
}

/// RSA key size, bits, selected by the DNSKEY flags this key will be
/// published under: a key-signing key gets a larger modulus than a
/// zone-signing key.
pub fn rsa_key_size(is_key_signing_key: bool) -> usize {
    if is_key_signing_key {
        2048
    } else {
        1024
    }
}

struct RsaKeyPair {
    algorithm: Algorithm,
    private: RsaPrivateKey,
    public_bytes: Vec<u8>,
}

impl SigningKey for RsaKeyPair {
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn public_key(&self) -> PublicKeyBuf {
        PublicKeyBuf::new(self.public_bytes.clone(), self.algorithm)
    }

    fn sign(&self, message: &[u8]) -> ProtoResult<Vec<u8>> {
        use digest::Digest as _;

        let (scheme, hashed) = match self.algorithm {
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
            other => return Err(format!("{other} is not an RSA algorithm").into()),
        };
        self.private
            .sign(scheme, &hashed)
            .map_err(|e| format!("RSA signing failed: {e}").into())
    }
}

/// Generate an RSA key pair for `algorithm` (one of the `RSA*` algorithms)
/// with the given modulus size.
pub fn generate_rsa(
    algorithm: Algorithm,
    bits: usize,
    rng: &mut (impl RngCore + CryptoRng),
) -> ProtoResult<Box<dyn SigningKey>> {
    if !matches!(
        algorithm,
        Algorithm::RSASHA1
            | Algorithm::RSASHA1NSEC3SHA1
            | Algorithm::RSASHA256
            | Algorithm::RSASHA512
    ) {
        return Err(format!("{algorithm} is not an RSA algorithm").into());
    }
    let private =
        RsaPrivateKey::new(rng, bits).map_err(|e| format!("RSA key generation failed: {e}"))?;
    let public_bytes = encode_rsa_public_key(&private);
    Ok(Box::new(RsaKeyPair {
        algorithm,
        private,
        public_bytes,
    }))
}

fn encode_rsa_public_key(private: &RsaPrivateKey) -> Vec<u8> {
    use rsa::traits::PublicKeyParts;

    let e = private.e().to_bytes_be();
    let n = private.n().to_bytes_be();
    let mut out = Vec::with_capacity(3 + e.len() + n.len());
    if e.len() <= 255 {
        out.push(e.len() as u8);
    } else {
        out.push(0);
        out.push((e.len() >> 8) as u8);
        out.push((e.len() & 0xFF) as u8);
    }
    out.extend_from_slice(&e);
    out.extend_from_slice(&n);
    out
}

struct P256KeyPair {
    signing: p256::ecdsa::SigningKey,
    public_bytes: Vec<u8>,
}

impl SigningKey for P256KeyPair {
    fn algorithm(&self) -> Algorithm {
        Algorithm::ECDSAP256SHA256
    }

    fn public_key(&self) -> PublicKeyBuf {
        PublicKeyBuf::new(self.public_bytes.clone(), Algorithm::ECDSAP256SHA256)
    }

    fn sign(&self, message: &[u8]) -> ProtoResult<Vec<u8>> {
        let sig: p256::ecdsa::Signature = self.signing.sign(message);
        Ok(sig.to_bytes().to_vec())
    }
}

/// Generate an ECDSA P-256 key pair.
pub fn generate_ecdsa_p256(rng: &mut (impl RngCore + CryptoRng)) -> Box<dyn SigningKey> {
    let signing = p256::ecdsa::SigningKey::random(rng);
    let encoded = signing.verifying_key().to_encoded_point(false);
    Box::new(P256KeyPair {
        signing,
        public_bytes: encoded.as_bytes()[1..].to_vec(),
    })
}

struct P384KeyPair {
    signing: p384::ecdsa::SigningKey,
    public_bytes: Vec<u8>,
}

impl SigningKey for P384KeyPair {
    fn algorithm(&self) -> Algorithm {
        Algorithm::ECDSAP384SHA384
    }

    fn public_key(&self) -> PublicKeyBuf {
        PublicKeyBuf::new(self.public_bytes.clone(), Algorithm::ECDSAP384SHA384)
    }

    fn sign(&self, message: &[u8]) -> ProtoResult<Vec<u8>> {
        let sig: p384::ecdsa::Signature = self.signing.sign(message);
        Ok(sig.to_bytes().to_vec())
    }
}

/// Generate an ECDSA P-384 key pair.
pub fn generate_ecdsa_p384(rng: &mut (impl RngCore + CryptoRng)) -> Box<dyn SigningKey> {
    let signing = p384::ecdsa::SigningKey::random(rng);
    let encoded = signing.verifying_key().to_encoded_point(false);
    Box::new(P384KeyPair {
        signing,
        public_bytes: encoded.as_bytes()[1..].to_vec(),
    })
}

struct Ed25519KeyPair {
    signing: ed25519_dalek::SigningKey,
}

impl SigningKey for Ed25519KeyPair {
    fn algorithm(&self) -> Algorithm {
        Algorithm::ED25519
    }

    fn public_key(&self) -> PublicKeyBuf {
        PublicKeyBuf::new(
            self.signing.verifying_key().to_bytes().to_vec(),
            Algorithm::ED25519,
        )
    }

    fn sign(&self, message: &[u8]) -> ProtoResult<Vec<u8>> {
        Ok(self.signing.sign(message).to_bytes().to_vec())
    }
}

/// Generate an Ed25519 key pair.
pub fn generate_ed25519(rng: &mut (impl RngCore + CryptoRng)) -> Box<dyn SigningKey> {
    Box::new(Ed25519KeyPair {
        signing: ed25519_dalek::SigningKey::generate(rng),
    })
}

struct Ed448KeyPair {
    signing: ed448_goldilocks::SigningKey,
    public_bytes: Vec<u8>,
}

impl SigningKey for Ed448KeyPair {
    fn algorithm(&self) -> Algorithm {
        Algorithm::ED448
    }

    fn public_key(&self) -> PublicKeyBuf {
        PublicKeyBuf::new(self.public_bytes.clone(), Algorithm::ED448)
    }

    fn sign(&self, message: &[u8]) -> ProtoResult<Vec<u8>> {
        Ok(self.signing.sign(message).to_bytes().to_vec())
    }
}

/// Generate an Ed448 key pair.
pub fn generate_ed448(rng: &mut (impl RngCore + CryptoRng)) -> Box<dyn SigningKey> {
    let signing = ed448_goldilocks::SigningKey::generate(rng);
    let public_bytes = signing.verifying_key().to_bytes().to_vec();
    Box::new(Ed448KeyPair {
        signing,
        public_bytes,
    })
}

#[cfg(feature = "dnssec-ring")]
pub mod ring_rng {
    //! A [`rand::RngCore`] adapter over `ring`'s CSPRNG, for callers that
    //! want key generation backed by the same randomness source `ring`
    //! uses elsewhere, instead of pulling in `rand`'s OS-backed generator
    //! directly.

    use rand::{CryptoRng, RngCore};
    use ring::rand::{SecureRandom, SystemRandom};

    /// Wraps [`ring::rand::SystemRandom`] to implement [`RngCore`].
    pub struct RingRng(SystemRandom);

    impl RingRng {
        /// Create a new adapter over a fresh [`SystemRandom`]
        pub fn new() -> Self {
            Self(SystemRandom::new())
        }
    }

    impl Default for RingRng {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RngCore for RingRng {
        fn next_u32(&mut self) -> u32 {
            let mut buf = [0u8; 4];
            self.fill_bytes(&mut buf);
            u32::from_ne_bytes(buf)
        }

        fn next_u64(&mut self) -> u64 {
            let mut buf = [0u8; 8];
            self.fill_bytes(&mut buf);
            u64::from_ne_bytes(buf)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.0
                .fill(dest)
                .expect("system randomness source failed");
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.0
                .fill(dest)
                .map_err(|_| rand::Error::new("ring SystemRandom failed"))
        }
    }

    impl CryptoRng for RingRng {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(42)
    }

    #[test]
    fn ecdsa_p256_round_trips_sign_and_verify() {
        let key = generate_ecdsa_p256(&mut rng());
        let public = key.public_key();
        let signature = key.sign(b"hello world").unwrap();
        verify(
            Algorithm::ECDSAP256SHA256,
            public.public_bytes(),
            b"hello world",
            &signature,
        )
        .unwrap();
    }

    #[test]
    fn ecdsa_p256_rejects_tampered_message() {
        let key = generate_ecdsa_p256(&mut rng());
        let public = key.public_key();
        let signature = key.sign(b"hello world").unwrap();
        assert!(verify(
            Algorithm::ECDSAP256SHA256,
            public.public_bytes(),
            b"goodbye world",
            &signature,
        )
        .is_err());
    }

    #[test]
    fn ed25519_round_trips_sign_and_verify() {
        let key = generate_ed25519(&mut rng());
        let public = key.public_key();
        let signature = key.sign(b"hello world").unwrap();
        verify(
            Algorithm::ED25519,
            public.public_bytes(),
            b"hello world",
            &signature,
        )
        .unwrap();
    }

    #[test]
    fn rsa_sha256_round_trips_sign_and_verify() {
        let key = generate_rsa(Algorithm::RSASHA256, 1024, &mut rng()).unwrap();
        let public = key.public_key();
        let signature = key.sign(b"hello world").unwrap();
        verify(
            Algorithm::RSASHA256,
            public.public_bytes(),
            b"hello world",
            &signature,
        )
        .unwrap();
    }
}
