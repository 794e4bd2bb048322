// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Serialization formats supported by this crate

/// The wire (binary) codec: encoder, decoder, and the [`binary::Restrict`]
/// wrapper forcing acknowledgment of unvalidated wire values
pub mod binary;
/// The presentation (master-file) codec: tokenizing and per-rdata parsing
pub mod txt;
