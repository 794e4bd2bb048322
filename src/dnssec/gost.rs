// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! GOST R 34.10-2001 byte-order conversion, kept isolated from the generic
//! ECDSA conversion path so its inverted byte and pair order never leaks
//! into it.
//!
//! Unlike the NIST-curve DNSKEY layout (`X || Y`, each big-endian), the GOST
//! public-key blob is `Y || X`, each little-endian, and GOST signatures are
//! `S || R`, each little-endian, rather than `R || S` big-endian. Both
//! inversions (byte order *and* pair order) live in this module so neither
//! can leak into the ECDSA conversion routines.

use crate::error::ProtoResult;

/// Coordinate width, in octets, of the curve GOST DNSKEYs use.
pub const GOST_COORDINATE_LEN: usize = 32;

/// Split a GOST DNSKEY public-key blob (`Y || X`, little-endian) into
/// big-endian `(X, Y)`, matching the convention the generic ECDSA verifier
/// expects.
pub fn gost_key_to_xy(blob: &[u8]) -> ProtoResult<([u8; GOST_COORDINATE_LEN], [u8; GOST_COORDINATE_LEN])> {
    if blob.len() != 2 * GOST_COORDINATE_LEN {
        return Err(format!(
            "GOST public key must be {} octets, got {}",
            2 * GOST_COORDINATE_LEN,
            blob.len()
        )
        .into());
    }
    let (y_le, x_le) = blob.split_at(GOST_COORDINATE_LEN);
    Ok((reverse(x_le), reverse(y_le)))
}

/// Split a GOST signature (`S || R`, little-endian) into big-endian `(R, S)`.
pub fn gost_signature_to_rs(
    sig: &[u8],
) -> ProtoResult<([u8; GOST_COORDINATE_LEN], [u8; GOST_COORDINATE_LEN])> {
    if sig.len() != 2 * GOST_COORDINATE_LEN {
        return Err(format!(
            "GOST signature must be {} octets, got {}",
            2 * GOST_COORDINATE_LEN,
            sig.len()
        )
        .into());
    }
    let (s_le, r_le) = sig.split_at(GOST_COORDINATE_LEN);
    Ok((reverse(r_le), reverse(s_le)))
}

fn reverse(octets: &[u8]) -> [u8; GOST_COORDINATE_LEN] {
    let mut out = [0u8; GOST_COORDINATE_LEN];
    for (dst, src) in out.iter_mut().zip(octets.iter().rev()) {
        *dst = *src;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_key_coordinates() {
        let mut blob = vec![0u8; 64];
        blob[0] = 0x01; // least-significant byte of Y (little-endian)
        blob[63] = 0x02; // most-significant byte of X (little-endian)
        let (x, y) = gost_key_to_xy(&blob).unwrap();
        assert_eq!(x[0], 0x02);
        assert_eq!(y[31], 0x01);
    }

    #[test]
    fn wrong_length_is_an_error() {
        assert!(gost_key_to_xy(&[0u8; 10]).is_err());
        assert!(gost_signature_to_rs(&[0u8; 63]).is_err());
    }
}
