// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Resource records: domain names, the generic rr header, and per-type
//! rdata codecs.

/// The CLASS field (`IN`, `CH`, `HS`, ...)
pub mod dns_class;
/// Domain names and labels
pub mod domain;
/// Per-record-kind rdata codecs
pub mod rdata;
/// The [`RData`] tagged-union rdata type
pub mod record_data;
/// The TYPE field
pub mod record_type;
/// The generic resource-record header plus rdata
pub mod resource;
/// The windowed type-bitmap shared by the `NSEC`/`NSEC3`/`CSYNC` family
pub mod type_bitmap;

pub use self::dns_class::DNSClass;
pub use self::domain::{Label, Name};
pub use self::rdata::RecordData;
pub use self::record_data::{RData, RecordDataDecodable};
pub use self::record_type::RecordType;
pub use self::resource::Record;
