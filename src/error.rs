// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Error types produced by this crate's wire codecs and DNSSEC machinery

use std::fmt;

use thiserror::Error;

#[cfg(feature = "backtrace")]
use std::backtrace::Backtrace;

/// An alias for results returned by functions of this crate
pub type ProtoResult<T> = ::std::result::Result<T, ProtoError>;

/// The kind of error that occurred while parsing, emitting, or validating
/// DNS wire data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtoErrorKind {
    /// A read or write ran past the end of the available buffer
    #[error("truncated data: needed {needed} more byte(s)")]
    Truncated {
        /// additional bytes that would have been required
        needed: usize,
    },

    /// A codec reported fewer bytes consumed than the rdlength promised
    #[error("rdata shorter than rdlength: read {read}, expected {expected}")]
    ShortRdata {
        /// bytes actually read by the codec
        read: usize,
        /// bytes promised by rdlength
        expected: usize,
    },

    /// A codec consumed bytes beyond its rdlength
    #[error("trailing rdata: {remaining} byte(s) left unread")]
    TrailingRdata {
        /// bytes left over after the codec finished
        remaining: usize,
    },

    /// A name compression pointer violated the backward-only invariant
    #[error("bad compression pointer at offset {offset}")]
    BadPointer {
        /// offset of the label that held the bad pointer
        offset: usize,
    },

    /// A domain name violated RFC 1035 structural limits
    #[error("malformed name: {0}")]
    MalformedName(String),

    /// A presentation-format record could not be parsed
    #[error("malformed presentation format at token {token_index}: {message}")]
    MalformedPresentation {
        /// index of the offending token, when known
        token_index: usize,
        /// human readable explanation
        message: String,
    },

    /// The DNSKEY protocol octet was not 3
    #[error("dnskey protocol field was {0}, expected 3")]
    DnsKeyProtocolNot3(u8),

    /// A recognized but unimplemented signing/verification algorithm
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(u8),

    /// A recognized but unimplemented DS digest type
    #[error("unsupported digest type: {0}")]
    UnsupportedDigest(u8),

    /// Signature or digest comparison failed
    #[error("verification failed")]
    VerifyFailed,

    /// A type bitmap window was malformed
    #[error("malformed type bitmap window: {0}")]
    MalformedBitmapWindow(String),

    /// An arbitrary message, stored by value
    #[error("{0}")]
    Message(&'static str),

    /// An arbitrary message, stored as an owned `String`
    #[error("{0}")]
    Msg(String),
}

/// The error type produced by this crate
#[derive(Debug)]
pub struct ProtoError {
    kind: Box<ProtoErrorKind>,
    #[cfg(feature = "backtrace")]
    backtrace: Option<Backtrace>,
}

impl ProtoError {
    /// The specific kind of this error
    pub fn kind(&self) -> &ProtoErrorKind {
        &self.kind
    }
}

impl fmt::Display for ProtoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl std::error::Error for ProtoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.kind)
    }
}

impl From<ProtoErrorKind> for ProtoError {
    fn from(kind: ProtoErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
            #[cfg(feature = "backtrace")]
            backtrace: Some(Backtrace::capture()),
        }
    }
}

impl From<&'static str> for ProtoError {
    fn from(msg: &'static str) -> Self {
        ProtoErrorKind::Message(msg).into()
    }
}

impl From<String> for ProtoError {
    fn from(msg: String) -> Self {
        ProtoErrorKind::Msg(msg).into()
    }
}
