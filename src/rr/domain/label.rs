// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A single label within a domain name

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{ProtoError, ProtoErrorKind, ProtoResult};

/// The maximum length, in octets, of a single label
pub const MAX_LABEL_LENGTH: usize = 63;

/// One label of a domain name, e.g. `www` in `www.example.com.`.
///
/// Labels compare, hash, and order themselves ASCII-case-insensitively, so a
/// `Label` can be used directly as a key in the name-compression dictionary
/// or a bitmap-free set of owner names without callers re-lowercasing first.
#[derive(Debug, Clone, Eq)]
pub struct Label(Vec<u8>);

impl Label {
    /// Construct a label from bytes already known to have come off the wire
    /// (length already checked by the caller against the 63-octet limit).
    pub fn from_raw_bytes(bytes: &[u8]) -> ProtoResult<Self> {
        if bytes.len() > MAX_LABEL_LENGTH {
            return Err(ProtoErrorKind::MalformedName(format!(
                "label of {} octets exceeds {MAX_LABEL_LENGTH}",
                bytes.len()
            ))
            .into());
        }
        Ok(Self(bytes.to_vec()))
    }

    /// Construct a label from a presentation-format (UTF-8/ASCII) string
    /// fragment, e.g. one `.`-separated component of a name.
    pub fn from_ascii(s: &str) -> ProtoResult<Self> {
        if !s.is_ascii() {
            return Err(ProtoErrorKind::MalformedName(format!(
                "label {s:?} contains non-ASCII octets"
            ))
            .into());
        }
        Self::from_raw_bytes(s.as_bytes())
    }

    /// The raw octets of this label, in their original case
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in octets, not counting the wire length-prefix byte
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` for the empty (root) label
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A copy of this label with ASCII letters lowercased, per the
    /// canonical form used for DS digests and RRSIG signing input.
    pub fn to_lowercase(&self) -> Self {
        let mut lower = self.0.clone();
        lower.make_ascii_lowercase();
        Self(lower)
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .iter()
            .map(u8::to_ascii_lowercase)
            .cmp(other.0.iter().map(u8::to_ascii_lowercase))
    }
}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.0.len());
        for b in &self.0 {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            match b {
                b'.' | b'\\' => write!(f, "\\{}", b as char)?,
                0x21..=0x7e => write!(f, "{}", b as char)?,
                _ => write!(f, "\\{b:03}")?,
            }
        }
        Ok(())
    }
}

impl TryFrom<&str> for Label {
    type Error = ProtoError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::from_ascii(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_over_63_octets_is_rejected() {
        let bytes = vec![b'a'; 64];
        assert!(Label::from_raw_bytes(&bytes).is_err());
        let ok = vec![b'a'; 63];
        assert!(Label::from_raw_bytes(&ok).is_ok());
    }

    #[test]
    fn non_ascii_presentation_label_is_rejected() {
        assert!(Label::from_ascii("café").is_err());
    }

    #[test]
    fn comparison_is_ascii_case_insensitive() {
        let a = Label::from_ascii("Example").unwrap();
        let b = Label::from_ascii("EXAMPLE").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn hash_matches_for_differently_cased_equal_labels() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(l: &Label) -> u64 {
            let mut h = DefaultHasher::new();
            l.hash(&mut h);
            h.finish()
        }

        let a = Label::from_ascii("Example").unwrap();
        let b = Label::from_ascii("EXAMPLE").unwrap();
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn to_lowercase_preserves_bytes_other_than_case() {
        let label = Label::from_ascii("ExAmple").unwrap();
        assert_eq!(label.to_lowercase().as_bytes(), b"example");
    }

    #[test]
    fn display_escapes_dot_and_backslash() {
        let label = Label::from_raw_bytes(b"a.b\\c").unwrap();
        assert_eq!(label.to_string(), "a\\.b\\\\c");
    }
}
