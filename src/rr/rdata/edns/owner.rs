// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The wake-on-LAN owner option ([draft-cheshire-edns0-owner-option](https://tools.ietf.org/html/draft-cheshire-edns0-owner-option)).

use std::fmt;

use crate::error::{ProtoErrorKind, ProtoResult};

/// `version u8, sequence u8, primary_mac[6]`, optionally followed by a
/// `wakeup_mac[6]` and a password of up to `length - 14` octets.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct EdnsOwnerOption {
    version: u8,
    sequence: u8,
    primary_mac: [u8; 6],
    wakeup_mac: Option<[u8; 6]>,
    password: Option<Vec<u8>>,
}

impl EdnsOwnerOption {
    /// Construct from parts. `wakeup_mac` and `password` may be set
    /// independently; the emit-side backfill quirk (re-emitting
    /// `primary_mac` into the wakeup slot when only a password is given)
    /// is applied automatically by [`Self::to_bytes`].
    pub fn new(
        version: u8,
        sequence: u8,
        primary_mac: [u8; 6],
        wakeup_mac: Option<[u8; 6]>,
        password: Option<Vec<u8>>,
    ) -> Self {
        Self {
            version,
            sequence,
            primary_mac,
            wakeup_mac,
            password,
        }
    }

    /// The protocol version octet
    pub fn version(&self) -> u8 {
        self.version
    }

    /// The sequence number octet
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// The primary interface's MAC address
    pub fn primary_mac(&self) -> [u8; 6] {
        self.primary_mac
    }

    /// The wakeup interface's MAC address, if this option carries one
    pub fn wakeup_mac(&self) -> Option<[u8; 6]> {
        self.wakeup_mac
    }

    /// The wakeup password, if this option carries one
    pub fn password(&self) -> Option<&[u8]> {
        self.password.as_deref()
    }

    pub(crate) fn from_bytes(data: &[u8]) -> ProtoResult<Self> {
        if data.len() < 8 {
            return Err(ProtoErrorKind::Msg(format!(
                "owner option needs at least 8 octets, got {}",
                data.len()
            ))
            .into());
        }

        let version = data[0];
        let sequence = data[1];
        let primary_mac: [u8; 6] = data[2..8].try_into().expect("slice is exactly 6 octets");
        let rest = &data[8..];

        let (wakeup_mac, password) = match rest.len() {
            0 => (None, None),
            6 => (Some(rest.try_into().expect("slice is exactly 6 octets")), None),
            n if n > 6 => {
                let wakeup_mac = rest[..6].try_into().expect("slice is exactly 6 octets");
                (Some(wakeup_mac), Some(rest[6..].to_vec()))
            }
            n => {
                return Err(ProtoErrorKind::Msg(format!(
                    "owner option has {n} trailing octet(s), not enough for a wakeup MAC"
                ))
                .into())
            }
        };

        Ok(Self {
            version,
            sequence,
            primary_mac,
            wakeup_mac,
            password,
        })
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8);
        out.push(self.version);
        out.push(self.sequence);
        out.extend_from_slice(&self.primary_mac);

        match (&self.wakeup_mac, &self.password) {
            (Some(wakeup_mac), password) => {
                out.extend_from_slice(wakeup_mac);
                if let Some(password) = password {
                    out.extend_from_slice(password);
                }
            }
            // Quirk preserved for on-wire compatibility: a password with no
            // wakeup MAC still needs the slot filled to keep the password
            // bytes aligned, so the primary MAC is duplicated into it.
            (None, Some(password)) => {
                out.extend_from_slice(&self.primary_mac);
                out.extend_from_slice(password);
            }
            (None, None) => {}
        }

        out
    }
}

impl fmt::Display for EdnsOwnerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "version={} sequence={} primary_mac={}",
            self.version,
            self.sequence,
            format_mac(&self.primary_mac)
        )?;
        if let Some(wakeup_mac) = self.wakeup_mac {
            write!(f, " wakeup_mac={}", format_mac(&wakeup_mac))?;
        }
        if self.password.is_some() {
            write!(f, " password=<redacted>")?;
        }
        Ok(())
    }
}

fn format_mac(mac: &[u8; 6]) -> String {
    mac.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_wakeup_mac_and_password() {
        let option = EdnsOwnerOption::new(
            0,
            1,
            [0x01, 0x02, 0x03, 0x04, 0x05, 0x06],
            Some([0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F]),
            Some(b"hunter2".to_vec()),
        );
        let bytes = option.to_bytes();
        let decoded = EdnsOwnerOption::from_bytes(&bytes).unwrap();
        assert_eq!(option, decoded);
    }

    #[test]
    fn round_trips_with_neither_wakeup_mac_nor_password() {
        let option = EdnsOwnerOption::new(0, 1, [1, 2, 3, 4, 5, 6], None, None);
        let bytes = option.to_bytes();
        assert_eq!(bytes.len(), 8);
        let decoded = EdnsOwnerOption::from_bytes(&bytes).unwrap();
        assert_eq!(option, decoded);
    }

    #[test]
    fn emit_backfills_primary_mac_into_wakeup_slot_when_password_present_without_one() {
        let primary_mac = [1, 2, 3, 4, 5, 6];
        let option = EdnsOwnerOption::new(0, 1, primary_mac, None, Some(b"pw".to_vec()));
        let bytes = option.to_bytes();
        assert_eq!(&bytes[8..14], &primary_mac);
        assert_eq!(&bytes[14..], b"pw");
    }

    #[test]
    fn parse_tolerates_the_backfilled_encoding_as_a_real_wakeup_mac() {
        let primary_mac = [1, 2, 3, 4, 5, 6];
        let option = EdnsOwnerOption::new(0, 1, primary_mac, None, Some(b"pw".to_vec()));
        let bytes = option.to_bytes();
        let decoded = EdnsOwnerOption::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.wakeup_mac(), Some(primary_mac));
        assert_eq!(decoded.password(), Some(&b"pw"[..]));
    }

    #[test]
    fn rejects_too_short_fixed_part() {
        assert!(EdnsOwnerOption::from_bytes(&[0, 1, 2, 3]).is_err());
    }

    #[test]
    fn rejects_dangling_bytes_shorter_than_a_wakeup_mac() {
        let mut bytes = vec![0u8, 1, 1, 2, 3, 4, 5, 6];
        bytes.extend_from_slice(&[0xAA, 0xBB]);
        assert!(EdnsOwnerOption::from_bytes(&bytes).is_err());
    }
}
