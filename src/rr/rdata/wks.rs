// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Well known services: an address, an IP protocol number, and the set of
//! ports open on it, packed as a bitmap.

use std::fmt;
use std::net::Ipv4Addr;

use crate::error::ProtoResult;
use crate::rr::record_data::RData;
use crate::rr::record_type::RecordType;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// [RFC 1035 §3.4.2](https://tools.ietf.org/html/rfc1035#section-3.4.2).
///
/// The port bitmap is MSB-first over 8-bit octets: bit `n` of octet `k`
/// names port `8k + (7 - n)`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct WKS {
    address: Ipv4Addr,
    protocol: u8,
    ports: Vec<u16>,
}

impl WKS {
    /// Construct from an address, protocol number, and an arbitrary (not
    /// necessarily sorted) list of open ports.
    pub fn new(address: Ipv4Addr, protocol: u8, mut ports: Vec<u16>) -> Self {
        ports.sort_unstable();
        ports.dedup();
        Self {
            address,
            protocol,
            ports,
        }
    }

    /// The host's address
    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// The IP protocol number (e.g. 6 for TCP)
    pub fn protocol(&self) -> u8 {
        self.protocol
    }

    /// The sorted, deduplicated set of open ports
    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    /// Parse from presentation-format tokens: an address, a protocol
    /// number, then zero or more port numbers.
    pub fn from_tokens(tokens: &[String]) -> ProtoResult<Self> {
        let [address, protocol, ports @ ..] = tokens else {
            return Err(crate::error::ProtoErrorKind::MalformedPresentation {
                token_index: 0,
                message: "WKS expects at least an address and a protocol".to_string(),
            }
            .into());
        };

        let address: Ipv4Addr = address.parse().map_err(|_| {
            crate::error::ProtoErrorKind::MalformedPresentation {
                token_index: 0,
                message: format!("invalid IPv4 address {address:?}"),
            }
        })?;
        let protocol: u8 = protocol.parse().map_err(|_| {
            crate::error::ProtoErrorKind::MalformedPresentation {
                token_index: 1,
                message: format!("invalid protocol number {protocol:?}"),
            }
        })?;

        let mut parsed_ports = Vec::with_capacity(ports.len());
        for (index, port) in ports.iter().enumerate() {
            let port: u16 = port.parse().map_err(|_| {
                crate::error::ProtoErrorKind::MalformedPresentation {
                    token_index: index + 2,
                    message: format!("invalid port number {port:?}"),
                }
            })?;
            parsed_ports.push(port);
        }

        Ok(Self::new(address, protocol, parsed_ports))
    }
}

impl From<WKS> for RData {
    fn from(value: WKS) -> Self {
        Self::WKS(value)
    }
}

impl BinEncodable for WKS {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_vec(&self.address.octets())?;
        encoder.emit_u8(self.protocol)?;

        let Some(&max_port) = self.ports.iter().max() else {
            return Ok(());
        };
        let len = (max_port as usize / 8) + 1;
        let mut bitmap = vec![0u8; len];
        for &port in &self.ports {
            let octet = port as usize / 8;
            let bit = 7 - (port as usize % 8);
            bitmap[octet] |= 1 << bit;
        }
        encoder.emit_vec(&bitmap)
    }
}

fn read_fixed(decoder: &mut BinDecoder<'_>, bitmap_len: usize) -> ProtoResult<WKS> {
    let octets = decoder.read_slice(4)?.unverified(/* fixed 4 byte address */);
    let address = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
    let protocol = decoder.read_u8()?.unverified(/* any protocol number valid */);

    let bitmap = decoder.read_slice(bitmap_len)?.unverified(/* length already range checked by caller */);

    let mut ports = Vec::new();
    for (octet_index, &octet) in bitmap.iter().enumerate() {
        for bit in 0..8u16 {
            if octet & (0x80 >> bit) != 0 {
                ports.push((octet_index as u16) * 8 + (7 - bit));
            }
        }
    }

    Ok(WKS {
        address,
        protocol,
        ports,
    })
}

impl<'r> BinDecodable<'r> for WKS {
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        read_fixed(decoder, decoder.remaining().saturating_sub(5))
    }
}

impl<'r> crate::rr::record_data::RecordDataDecodable<'r> for WKS {
    fn read_data(
        decoder: &mut BinDecoder<'r>,
        length: crate::serialize::binary::Restrict<u16>,
    ) -> ProtoResult<Self> {
        use crate::serialize::binary::RestrictedMath;
        let bitmap_len = length
            .map(|u| u as usize)
            .checked_sub(5)?
            .unverified(/* used only as a slice length below */);
        read_fixed(decoder, bitmap_len)
    }
}

impl super::RecordData for WKS {
    fn try_borrow(data: &RData) -> Option<&Self> {
        match data {
            RData::WKS(wks) => Some(wks),
            _ => None,
        }
    }

    fn record_type(&self) -> RecordType {
        RecordType::WKS
    }

    fn into_rdata(self) -> RData {
        self.into()
    }
}

impl fmt::Display for WKS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.address, self.protocol)?;
        for port in &self.ports {
            write!(f, " {port}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s2_wks_scenario_bytes() {
        let wks = WKS::new(Ipv4Addr::new(10, 0, 0, 1), 6, vec![25, 80]);
        let bytes = wks.to_bytes().unwrap();
        assert_eq!(
            bytes,
            hex_literal::hex!("0A 00 00 01 06 00 00 00 40 00 00 00 00 00 00 00 00 80")
        );
    }

    #[test]
    fn round_trip() {
        let wks = WKS::new(Ipv4Addr::new(192, 168, 0, 1), 17, vec![53, 123, 520]);
        let bytes = wks.to_bytes().unwrap();
        let mut decoder = BinDecoder::new(&bytes);
        let decoded = WKS::read(&mut decoder).unwrap();
        assert_eq!(wks, decoded);
    }

    #[test]
    fn presentation_round_trip() {
        let wks = WKS::new(Ipv4Addr::new(10, 0, 0, 1), 6, vec![25, 80]);
        let text = wks.to_string();
        let tokens = crate::serialize::txt::tokenize(&text).unwrap();
        let decoded = WKS::from_tokens(&tokens).unwrap();
        assert_eq!(wks, decoded);
    }

    #[test]
    fn presentation_allows_no_ports() {
        let decoded = WKS::from_tokens(&["10.0.0.1".to_string(), "6".to_string()]).unwrap();
        assert_eq!(decoded, WKS::new(Ipv4Addr::new(10, 0, 0, 1), 6, vec![]));
    }

    #[test]
    fn presentation_rejects_malformed_address() {
        assert!(WKS::from_tokens(&["not-an-ip".to_string(), "6".to_string()]).is_err());
    }

    #[test]
    fn presentation_rejects_too_few_tokens() {
        assert!(WKS::from_tokens(&["10.0.0.1".to_string()]).is_err());
        assert!(WKS::from_tokens(&[]).is_err());
    }
}
