// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The windowed record-type bitmap shared by the NSEC/NSEC3/CSYNC record
//! families ([RFC 4034 §4.1.2](https://tools.ietf.org/html/rfc4034#section-4.1.2)).
//!
//! ```text
//!      0                   1                   2                   3
//!      0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//!     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!     |       Window Block # |     Bitmap Length     |       Bitmap /
//!     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use crate::error::{ProtoErrorKind, ProtoResult};
use crate::rr::RecordType;
use crate::serialize::binary::{BinDecoder, BinEncoder};

/// Decode a sequence of bitmap windows spanning exactly `remaining` octets
/// of `decoder`, returning the sorted, deduplicated set of record-type wire
/// codes named by the bitmap.
///
/// `remaining` is threaded explicitly rather than read off
/// [`BinDecoder::remaining`] because the windows are embedded in a larger
/// rdata slice (e.g. after CSYNC's serial and flags), not the whole message.
pub fn decode_type_bitmaps(decoder: &mut BinDecoder<'_>, mut remaining: usize) -> ProtoResult<Vec<u16>> {
    let mut types = Vec::new();
    let mut last_window: Option<u8> = None;

    while remaining > 0 {
        if remaining < 2 {
            return Err(ProtoErrorKind::MalformedBitmapWindow(
                "window header truncated".to_string(),
            )
            .into());
        }

        let window = decoder.read_u8()?.unverified(/* window number, any value valid */);
        if let Some(last) = last_window {
            if window <= last {
                return Err(ProtoErrorKind::MalformedBitmapWindow(format!(
                    "window {window} out of order after {last}"
                ))
                .into());
            }
        }
        last_window = Some(window);

        let bitmap_len = decoder.read_u8()?.unverified(/* length, range checked below */) as usize;
        if bitmap_len == 0 || bitmap_len > 32 {
            return Err(ProtoErrorKind::MalformedBitmapWindow(format!(
                "bitmap length {bitmap_len} out of range 1..=32"
            ))
            .into());
        }
        remaining -= 2;
        if bitmap_len > remaining {
            return Err(ProtoErrorKind::MalformedBitmapWindow(
                "bitmap body truncated".to_string(),
            )
            .into());
        }

        let bytes = decoder.read_slice(bitmap_len)?.unverified(/* length already range checked */);
        for (octet_index, &octet) in bytes.iter().enumerate() {
            for bit in 0..8 {
                if octet & (0x80 >> bit) != 0 {
                    let ty = (window as u16) * 256 + (octet_index as u16) * 8 + bit as u16;
                    types.push(ty);
                }
            }
        }
        remaining -= bitmap_len;
    }

    Ok(types)
}

/// Emit `types` (need not be pre-sorted) as the minimal sequence of bitmap
/// windows: grouped by `type / 256`, each window trimmed to its highest
/// populated octet.
pub fn encode_type_bitmaps(encoder: &mut BinEncoder<'_>, types: &[RecordType]) -> ProtoResult<()> {
    let mut codes: Vec<u16> = types.iter().map(|t| t.wire_value()).collect();
    codes.sort_unstable();
    codes.dedup();

    let mut window = 0usize;
    while window <= 255 {
        let in_window: Vec<u16> = codes
            .iter()
            .copied()
            .filter(|&c| (c / 256) as usize == window)
            .collect();
        if !in_window.is_empty() {
            let max_octet = in_window.iter().map(|&c| ((c % 256) / 8) as usize).max().unwrap();
            let mut bitmap = vec![0u8; max_octet + 1];
            for &c in &in_window {
                let local = c % 256;
                let octet = (local / 8) as usize;
                let bit = local % 8;
                bitmap[octet] |= 0x80 >> bit;
            }
            encoder.emit_u8(window as u8)?;
            encoder.emit_u8(bitmap.len() as u8)?;
            encoder.emit_vec(&bitmap)?;
        }
        window += 1;
    }

    Ok(())
}

/// An upper bound on the number of octets [`encode_type_bitmaps`] will
/// write for `types`, sufficient to pre-size an emit buffer.
pub fn max_type_bitmaps_length(types: &[RecordType]) -> usize {
    let mut codes: Vec<u16> = types.iter().map(|t| t.wire_value()).collect();
    codes.sort_unstable();
    codes.dedup();

    let mut total = 0usize;
    let mut window = 0usize;
    while window <= 255 {
        if let Some(max_in_window) = codes
            .iter()
            .copied()
            .filter(|&c| (c / 256) as usize == window)
            .map(|c| c % 256)
            .max()
        {
            total += 2 + (max_in_window as usize / 8) + 1;
        }
        window += 1;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csync_scenario_bitmap() {
        // S3: types {A(1), NS(2), AAAA(28)} -> window 0, length 4, bitmap 60 00 00 08
        let types = [RecordType::A, RecordType::from(2), RecordType::AAAA];
        let mut buf = Vec::new();
        let mut encoder = BinEncoder::new(&mut buf);
        encode_type_bitmaps(&mut encoder, &types).unwrap();
        assert_eq!(buf, vec![0x00, 0x04, 0x60, 0x00, 0x00, 0x08]);
    }

    #[test]
    fn multi_window_round_trip() {
        let types = [RecordType::A, RecordType::from(55), RecordType::from(300)];
        let mut buf = Vec::new();
        let mut encoder = BinEncoder::new(&mut buf);
        encode_type_bitmaps(&mut encoder, &types).unwrap();

        let mut decoder = BinDecoder::new(&buf);
        let len = buf.len();
        let mut decoded = decode_type_bitmaps(&mut decoder, len).unwrap();
        decoded.sort_unstable();
        assert_eq!(decoded, vec![1, 55, 300]);
    }

    #[test]
    fn out_of_order_window_rejected() {
        let bytes = [1u8, 1, 0x80, 0u8, 1, 0x80];
        let mut decoder = BinDecoder::new(&bytes);
        assert!(decode_type_bitmaps(&mut decoder, bytes.len()).is_err());
    }

    #[test]
    fn zero_length_window_rejected() {
        let bytes = [0u8, 0];
        let mut decoder = BinDecoder::new(&bytes);
        assert!(decode_type_bitmaps(&mut decoder, bytes.len()).is_err());
    }
}
