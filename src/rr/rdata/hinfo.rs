// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Host information: a pair of free-text character-strings.

use std::fmt;

use crate::error::ProtoResult;
use crate::rr::record_data::RData;
use crate::rr::record_type::RecordType;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// [RFC 1035 §3.3.2](https://tools.ietf.org/html/rfc1035#section-3.3.2): CPU and
/// operating-system identification, each a length-prefixed character-string
/// of 0..=255 octets.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct HINFO {
    cpu: Vec<u8>,
    os: Vec<u8>,
}

impl HINFO {
    /// Construct from raw character-string bodies
    pub fn new(cpu: Vec<u8>, os: Vec<u8>) -> Self {
        Self { cpu, os }
    }

    /// The CPU character-string
    pub fn cpu(&self) -> &[u8] {
        &self.cpu
    }

    /// The OS character-string
    pub fn os(&self) -> &[u8] {
        &self.os
    }

    /// Parse from presentation-format tokens: exactly two, the CPU and OS
    /// character-strings (quoted in the tokenizer if they contained
    /// whitespace, but that's already resolved by the time tokens reach
    /// here).
    pub fn from_tokens(tokens: &[String]) -> ProtoResult<Self> {
        let [cpu, os] = tokens else {
            return Err(crate::error::ProtoErrorKind::MalformedPresentation {
                token_index: 0,
                message: format!("HINFO expects exactly 2 tokens, got {}", tokens.len()),
            }
            .into());
        };
        Ok(Self::new(cpu.as_bytes().to_vec(), os.as_bytes().to_vec()))
    }
}

impl From<HINFO> for RData {
    fn from(value: HINFO) -> Self {
        Self::HINFO(value)
    }
}

impl BinEncodable for HINFO {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_character_data(&self.cpu)?;
        encoder.emit_character_data(&self.os)
    }
}

impl<'r> BinDecodable<'r> for HINFO {
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        let cpu = decoder.read_character_data()?.unverified(/* opaque text, any bytes valid */).to_vec();
        let os = decoder.read_character_data()?.unverified(/* opaque text, any bytes valid */).to_vec();
        Ok(Self { cpu, os })
    }
}

impl super::RecordData for HINFO {
    fn try_borrow(data: &RData) -> Option<&Self> {
        match data {
            RData::HINFO(hinfo) => Some(hinfo),
            _ => None,
        }
    }

    fn record_type(&self) -> RecordType {
        RecordType::HINFO
    }

    fn into_rdata(self) -> RData {
        self.into()
    }
}

/// Escape `"` and `\` the way master-file presentation format requires
/// inside a quoted character-string.
fn escape_quoted(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'"' | b'\\' => {
                out.push('\\');
                out.push(b as char);
            }
            _ => out.push(b as char),
        }
    }
    out
}

impl fmt::Display for HINFO {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" \"{}\"", escape_quoted(&self.cpu), escape_quoted(&self.os))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let hinfo = HINFO::new(b"INTEL-386".to_vec(), b"LINUX".to_vec());
        let bytes = hinfo.to_bytes().unwrap();
        let mut decoder = BinDecoder::new(&bytes);
        let decoded = HINFO::read(&mut decoder).unwrap();
        assert_eq!(hinfo, decoded);
    }

    #[test]
    fn presentation_escapes_quotes_and_backslashes() {
        let hinfo = HINFO::new(br#"a"b"#.to_vec(), br"c\d".to_vec());
        assert_eq!(hinfo.to_string(), r#""a\"b" "c\\d""#);
    }

    #[test]
    fn presentation_round_trip() {
        let hinfo = HINFO::new(b"INTEL-386".to_vec(), b"some OS".to_vec());
        let text = hinfo.to_string();
        let tokens = crate::serialize::txt::tokenize(&text).unwrap();
        let decoded = HINFO::from_tokens(&tokens).unwrap();
        assert_eq!(hinfo, decoded);
    }

    #[test]
    fn presentation_rejects_wrong_token_count() {
        assert!(HINFO::from_tokens(&["only-one".to_string()]).is_err());
    }
}
