// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! DNSSEC key material: algorithm numbers, digest types, public-key
//! decoding and signature verification, key generation and signing, and
//! the DNSSEC-carrying record types (DNSKEY, DS).

/// Algorithm numbers for DNSSEC signing and verification
pub mod algorithm;
mod digest;
mod gost;
/// Public-key decoding and signature verification
pub mod public_key;
/// The DNSSEC-carrying record types: `DNSKEY`, `DS`
pub mod rdata;
mod rsa_public_key;
/// Key generation and signing
pub mod signer;

pub use algorithm::Algorithm;
pub use digest::{digest_eq, Digest, DigestType};
pub use public_key::{decode_public_key, PublicKey, PublicKeyBuf, Verifier};
pub use signer::{verify, SigningKey};
