// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The NSEC3 hash algorithms understood option ([RFC 6975](https://tools.ietf.org/html/rfc6975), `N3U`).

use std::fmt;

/// A list of DNSSEC hash algorithm octets the sender understands for
/// NSEC3. The option carries no explicit count; its length (taken from
/// the enclosing TLV) *is* the count.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Nsec3HashUnderstoodOption {
    algorithms: Vec<u8>,
}

impl Nsec3HashUnderstoodOption {
    /// Construct from a list of understood hash algorithm octets
    pub fn new(algorithms: Vec<u8>) -> Self {
        Self { algorithms }
    }

    /// The understood hash algorithm octets
    pub fn algorithms(&self) -> &[u8] {
        &self.algorithms
    }

    pub(crate) fn from_bytes(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        self.algorithms.clone()
    }
}

impl fmt::Display for Nsec3HashUnderstoodOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.algorithms.iter().map(u8::to_string).collect();
        write!(f, "{}", rendered.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_an_empty_list() {
        let option = Nsec3HashUnderstoodOption::new(vec![]);
        assert_eq!(Nsec3HashUnderstoodOption::from_bytes(&option.to_bytes()), option);
    }

    #[test]
    fn round_trips_several_algorithms() {
        let option = Nsec3HashUnderstoodOption::new(vec![1, 2]);
        let bytes = option.to_bytes();
        assert_eq!(bytes, vec![1, 2]);
        assert_eq!(Nsec3HashUnderstoodOption::from_bytes(&bytes), option);
    }
}
