// Copyright 2017 Brian Smith <brian@briansmith.org>
// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! [RFC 3110](https://tools.ietf.org/html/rfc3110) RSA public key layout: a
//! variable-length exponent-length prefix, the exponent, then the modulus.

use crate::error::ProtoResult;

/// Borrowed view of an RSA public key in its DNSKEY wire layout.
#[derive(Debug)]
pub struct RsaPublicKey<'a> {
    /// The modulus, big-endian
    pub n: &'a [u8],
    /// The public exponent, big-endian
    pub e: &'a [u8],
}

impl<'a> RsaPublicKey<'a> {
    /// Split `encoded` into its exponent and modulus per the DNSKEY RSA
    /// layout: a one-octet exponent length, or (if that octet is zero) a
    /// two-octet big-endian length, followed by the exponent and then the
    /// modulus occupying the rest of the blob.
    pub fn try_from(encoded: &'a [u8]) -> ProtoResult<Self> {
        let (e_len_len, e_len) = match encoded.first() {
            Some(&0) if encoded.len() >= 3 => {
                (3, (usize::from(encoded[1]) << 8) | usize::from(encoded[2]))
            }
            Some(e_len) if *e_len != 0 => (1, usize::from(*e_len)),
            _ => return Err("bad RSA public key: empty or zero-length exponent prefix".into()),
        };

        if encoded.len() < e_len_len + e_len {
            return Err("bad RSA public key: exponent length exceeds blob".into());
        }

        let (e, n) = encoded[e_len_len..].split_at(e_len);
        Ok(Self { n, e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_exponent_form() {
        let blob = [3u8, 1, 0, 1, 0xAB, 0xCD];
        let key = RsaPublicKey::try_from(&blob).unwrap();
        assert_eq!(key.e, [1, 0, 1]);
        assert_eq!(key.n, [0xAB, 0xCD]);
    }

    #[test]
    fn long_exponent_form() {
        let mut blob = vec![0u8, 0, 1]; // exponent length = 1
        blob.push(3); // the exponent itself
        blob.extend_from_slice(&[0xAB, 0xCD]); // modulus
        let key = RsaPublicKey::try_from(&blob).unwrap();
        assert_eq!(key.e, [3]);
        assert_eq!(key.n, [0xAB, 0xCD]);
    }

    #[test]
    fn truncated_blob_is_an_error() {
        let blob = [5u8, 1, 2];
        assert!(RsaPublicKey::try_from(&blob).is_err());
    }
}
