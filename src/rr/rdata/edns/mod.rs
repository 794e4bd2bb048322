// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! EDNS0 options (RFC 6891 §6.1.2): the TLV family carried inside an
//! [`super::opt::OPT`] pseudo-record's rdata.

mod nsec3_hash_understood;
mod owner;

pub use self::nsec3_hash_understood::Nsec3HashUnderstoodOption;
pub use self::owner::EdnsOwnerOption;

use std::fmt;

use crate::error::ProtoResult;
use crate::serialize::binary::BinEncoder;

/// The Owner option's registered code ([draft-cheshire-edns0-owner-option](https://tools.ietf.org/html/draft-cheshire-edns0-owner-option)).
pub const OPTION_CODE_OWNER: u16 = 4;
/// The NSEC3 hash algorithms understood option's registered code
/// ([RFC 6975](https://tools.ietf.org/html/rfc6975), `N3U`).
pub const OPTION_CODE_NSEC3_HASH_UNDERSTOOD: u16 = 7;

/// One EDNS0 option. Recognized codes decode into a typed payload;
/// anything else is carried as opaque bytes so an unrecognized option
/// still round-trips exactly.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
#[non_exhaustive]
pub enum EdnsOption {
    /// The wake-on-LAN owner option
    Owner(EdnsOwnerOption),
    /// The NSEC3 hash algorithms a resolver understands
    Nsec3HashUnderstood(Nsec3HashUnderstoodOption),
    /// Any other registered or private-use option code
    Unknown {
        /// the option's wire code
        code: u16,
        /// the raw option data
        data: Vec<u8>,
    },
}

impl EdnsOption {
    /// The wire option code this value was (or would be) carried under
    pub fn code(&self) -> u16 {
        match self {
            Self::Owner(_) => OPTION_CODE_OWNER,
            Self::Nsec3HashUnderstood(_) => OPTION_CODE_NSEC3_HASH_UNDERSTOOD,
            Self::Unknown { code, .. } => *code,
        }
    }

    /// Dispatch `code`/`data` (already sliced to the option's own length)
    /// to its typed payload, or carry it opaque if unrecognized.
    pub(crate) fn from_wire(code: u16, data: Vec<u8>) -> ProtoResult<Self> {
        Ok(match code {
            OPTION_CODE_OWNER => Self::Owner(EdnsOwnerOption::from_bytes(&data)?),
            OPTION_CODE_NSEC3_HASH_UNDERSTOOD => {
                Self::Nsec3HashUnderstood(Nsec3HashUnderstoodOption::from_bytes(&data))
            }
            _ => Self::Unknown { code, data },
        })
    }

    pub(crate) fn option_bytes(&self) -> Vec<u8> {
        match self {
            Self::Owner(owner) => owner.to_bytes(),
            Self::Nsec3HashUnderstood(n3u) => n3u.to_bytes(),
            Self::Unknown { data, .. } => data.clone(),
        }
    }

    pub(crate) fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        let data = self.option_bytes();
        encoder.emit_u16(self.code())?;
        encoder.emit_u16(data.len() as u16)?;
        encoder.emit_vec(&data)
    }
}

impl fmt::Display for EdnsOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner(owner) => write!(f, "OWNER {owner}"),
            Self::Nsec3HashUnderstood(n3u) => write!(f, "N3U {n3u}"),
            Self::Unknown { code, data } => {
                write!(f, "OPT{code} ({} bytes)", data.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_code_round_trips_opaque() {
        let option = EdnsOption::Unknown {
            code: 65001,
            data: vec![1, 2, 3],
        };
        let mut buf = Vec::new();
        let mut encoder = BinEncoder::new(&mut buf);
        option.emit(&mut encoder).unwrap();
        assert_eq!(buf, vec![0xFD, 0xE9, 0, 3, 1, 2, 3]);
    }
}
