// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Fully-qualified domain names: RFC 1035 pointer-compressed wire codec plus
//! the RFC 4034 §6 canonical form used for hashing and signing.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::label::{Label, MAX_LABEL_LENGTH};
use crate::error::{ProtoErrorKind, ProtoResult};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder, NameEncoding};

/// The maximum length, in octets, of an encoded name (including the
/// terminating root label).
pub const MAX_NAME_LENGTH: usize = 255;

/// A two-bit tag identifying a compression pointer in the length-octet slot
const POINTER_MASK: u8 = 0xC0;
/// A ceiling on jumps followed while decompressing a single name; real
/// messages never need more than a handful, this only guards against an
/// adversarial buffer.
const MAX_POINTER_JUMPS: usize = 128;

/// A domain name: an ordered sequence of labels read most-specific first.
#[derive(Debug, Clone, Eq)]
pub struct Name {
    labels: Vec<Label>,
    is_fqdn: bool,
}

impl Name {
    /// The root name, `.`
    pub fn root() -> Self {
        Self {
            labels: Vec::new(),
            is_fqdn: true,
        }
    }

    /// Parse a name from presentation format (`www.example.com.`), resolving
    /// a trailing partial name against `origin` when `origin` is given and
    /// the input does not end in `.`.
    pub fn parse(input: &str, origin: Option<&Name>) -> ProtoResult<Self> {
        if input == "." {
            return Ok(Self::root());
        }

        let is_fqdn = input.ends_with('.');
        let trimmed = input.strip_suffix('.').unwrap_or(input);

        let mut labels = Vec::new();
        if !trimmed.is_empty() {
            for part in split_unescaped(trimmed) {
                labels.push(Label::from_ascii(&part)?);
            }
        }

        let mut name = Self { labels, is_fqdn };
        if !is_fqdn {
            if let Some(origin) = origin {
                name.labels.extend(origin.labels.iter().cloned());
                name.is_fqdn = origin.is_fqdn;
            }
        }

        name.validate_len()?;
        Ok(name)
    }

    /// Parse a name made only of ASCII labels, with no origin resolution;
    /// equivalent to `Name::parse(s, None)` but named for the common case of
    /// constructing a fully-qualified name in code or tests.
    pub fn from_ascii(s: &str) -> ProtoResult<Self> {
        Self::parse(s, None)
    }

    fn validate_len(&self) -> ProtoResult<()> {
        let wire_len: usize = self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1;
        if wire_len > MAX_NAME_LENGTH {
            return Err(ProtoErrorKind::MalformedName(format!(
                "encoded name length {wire_len} exceeds {MAX_NAME_LENGTH}"
            ))
            .into());
        }
        Ok(())
    }

    /// Labels, most-specific (leftmost) first. Does not include the
    /// implicit terminating root label.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// `true` if this name ends at the root (was written with a trailing `.`
    /// or resolved against a fully-qualified origin)
    pub fn is_fqdn(&self) -> bool {
        self.is_fqdn
    }

    /// Mark this name as fully-qualified or not
    pub fn set_fqdn(&mut self, is_fqdn: bool) {
        self.is_fqdn = is_fqdn;
    }

    /// Number of labels, not counting the root label
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// The encoded length of this name on the wire, uncompressed
    pub fn len(&self) -> usize {
        self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    /// `true` for the root name
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Return a copy of this name with every label lowercased: the
    /// canonical form used in DS digests and RRSIG to-be-signed data.
    pub fn to_lowercase(&self) -> Self {
        Self {
            labels: self.labels.iter().map(Label::to_lowercase).collect(),
            is_fqdn: self.is_fqdn,
        }
    }

    /// Emit this name in canonical form: uncompressed, every label
    /// lowercased. Equivalent to calling [`Self::emit`] on an encoder
    /// configured with [`NameEncoding::UncompressedLowercase`].
    pub fn emit_canonical(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        let prior = encoder.name_encoding();
        encoder.set_name_encoding(NameEncoding::UncompressedLowercase);
        let result = self.emit(encoder);
        encoder.set_name_encoding(prior);
        result
    }

    fn label_suffixes_lowercase(&self) -> Vec<Vec<Vec<u8>>> {
        let lower: Vec<Vec<u8>> = self
            .labels
            .iter()
            .map(|l| l.to_lowercase().as_bytes().to_vec())
            .collect();
        (0..lower.len()).map(|i| lower[i..].to_vec()).collect()
    }
}

impl BinEncodable for Name {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        if encoder.is_canonical_names() {
            for label in &self.labels {
                encoder.emit_character_data(label.to_lowercase().as_bytes())?;
            }
            return encoder.emit(0);
        }

        let suffixes = self.label_suffixes_lowercase();
        for (i, label) in self.labels.iter().enumerate() {
            if let Some(ptr) = encoder.get_label_pointer(&suffixes[i]) {
                encoder.emit_u16(0xC000 | ptr)?;
                return Ok(());
            }
            encoder.store_label_pointer(suffixes[i].clone());
            encoder.emit_character_data(label.as_bytes())?;
        }
        encoder.emit(0)
    }
}

impl<'r> BinDecodable<'r> for Name {
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        let mut labels: Vec<Label> = Vec::new();
        let mut encoded_len = 0usize;
        let mut cursor = *decoder;
        let mut outer_advanced = false;
        let mut jumps = 0usize;

        loop {
            let len_byte = cursor.peek_u8()?.unverified();

            if len_byte == 0 {
                cursor.read_u8()?;
                if !outer_advanced {
                    *decoder = cursor;
                }
                break;
            }

            if len_byte & POINTER_MASK == POINTER_MASK {
                let pointer_pos = cursor.index();
                let b0 = cursor.read_u8()?.unverified();
                let b1 = cursor.read_u8()?.unverified();
                if !outer_advanced {
                    *decoder = cursor;
                    outer_advanced = true;
                }

                let offset = (((b0 & !POINTER_MASK) as usize) << 8) | b1 as usize;
                if offset >= pointer_pos {
                    return Err(ProtoErrorKind::BadPointer { offset }.into());
                }

                jumps += 1;
                if jumps > MAX_POINTER_JUMPS {
                    return Err(ProtoErrorKind::BadPointer { offset }.into());
                }

                cursor = cursor.clone(offset);
                continue;
            }

            if len_byte & POINTER_MASK != 0 {
                return Err(ProtoErrorKind::MalformedName(
                    "reserved bits set in label length".to_string(),
                )
                .into());
            }

            let len = len_byte as usize;
            debug_assert!(len <= MAX_LABEL_LENGTH);
            cursor.read_u8()?;
            let bytes = cursor.read_slice(len)?.unverified();
            encoded_len += len + 1;
            if encoded_len > MAX_NAME_LENGTH {
                return Err(ProtoErrorKind::MalformedName(format!(
                    "decoded name exceeds {MAX_NAME_LENGTH} octets"
                ))
                .into());
            }
            labels.push(Label::from_raw_bytes(bytes)?);
        }

        Ok(Self {
            labels,
            is_fqdn: true,
        })
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels
    }
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for label in &self.labels {
            label.hash(state);
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return write!(f, ".");
        }
        for label in &self.labels {
            write!(f, "{label}.")?;
        }
        Ok(())
    }
}

/// Split `s` on unescaped `.` characters, the way presentation-format names
/// separate labels while still allowing an escaped literal dot within one.
fn split_unescaped(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '.' => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_uncompressed() {
        let name = Name::from_ascii("example.com.").unwrap();
        let bytes = name.to_bytes().unwrap();
        let mut decoder = BinDecoder::new(&bytes);
        let decoded = Name::read(&mut decoder).unwrap();
        assert_eq!(name, decoded);
        assert_eq!(decoder.index(), bytes.len());
    }

    #[test]
    fn compression_reuses_pointer() {
        let mut buf = Vec::new();
        let mut encoder = BinEncoder::new(&mut buf);
        let name = Name::from_ascii("www.example.com.").unwrap();
        name.emit(&mut encoder).unwrap();
        let first_len = encoder.len();
        name.emit(&mut encoder).unwrap();
        let second_len = encoder.len() - first_len;
        assert_eq!(second_len, 2, "second occurrence must be a 2 byte pointer");
    }

    #[test]
    fn canonical_never_compresses_and_lowercases() {
        let mut buf = Vec::new();
        let mut encoder = BinEncoder::with_canonical_encoding(&mut buf);
        let name = Name::from_ascii("WWW.Example.COM.").unwrap();
        name.emit(&mut encoder).unwrap();
        name.emit(&mut encoder).unwrap();
        assert_eq!(buf.len(), 2 * "www.example.com.".len() + 2 - 2);
        assert!(buf.iter().all(|&b| b & 0xC0 != 0xC0));
    }

    #[test]
    fn forward_pointer_rejected() {
        // label "a" then a pointer forward to offset 10 (>= pointer's own position)
        let bytes = [1u8, b'a', 0xC0, 0x0A];
        let mut decoder = BinDecoder::new(&bytes);
        assert!(Name::read(&mut decoder).is_err());
    }

    #[test]
    fn case_insensitive_eq() {
        let a = Name::from_ascii("Example.COM.").unwrap();
        let b = Name::from_ascii("example.com.").unwrap();
        assert_eq!(a, b);
    }
}
