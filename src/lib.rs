// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A resource-record wire codec and DNSSEC key/signature toolkit.
//!
//! This crate reads and writes DNS resource records in both wire
//! ([RFC 1035](https://tools.ietf.org/html/rfc1035)) and presentation
//! (master-file) format, with support for:
//!
//! - Name compression and decompression, including the pointer cycle-guard
//!   RFC 1035 leaves to implementations.
//! - `CNAME`, `HINFO`, `WKS` and the windowed-type-bitmap record family
//!   (`CSYNC`).
//! - `DNSKEY`/`DS` rdata and the RFC 4034 Appendix B key-tag checksum,
//!   including DS-over-DNSKEY digest coverage checks.
//! - Signature verification across the RSA, ECDSA, and EdDSA algorithm
//!   families DNSSEC names, plus a `dnssec-ring`-gated CSPRNG for key
//!   generation.
//! - EDNS0's OPT pseudo-record and the Owner/NSEC3-Hash-Understood options.
//!
//! Every wire-sourced value is threaded through [`serialize::binary::Restrict`]
//! so call sites at the edge of this crate must explicitly acknowledge which
//! numbers come from an adversarial peer before using them; dispatch across
//! record kinds and algorithms is always on the wire discriminant
//! ([`rr::RecordType`], [`dnssec::Algorithm`]) rather than on the concrete
//! Rust type of a payload, so a caller matching exhaustively never has to
//! chase a type hierarchy to find a handler.

#![warn(missing_docs)]
#![deny(unsafe_code)]

/// DNSSEC algorithms, keys, signing, and the `DNSKEY`/`DS` record types
pub mod dnssec;
/// The error taxonomy returned by this crate's fallible operations
pub mod error;
/// Resource records: domain names, the generic rr header, and rdata codecs
pub mod rr;
/// Wire and presentation-format codecs
pub mod serialize;

pub use crate::error::{ProtoError, ProtoErrorKind, ProtoResult};
pub use crate::rr::{DNSClass, Name, RData, Record, RecordType};
