// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Per-record-kind rdata codecs

mod cname;
mod csync;
/// EDNS0 options carried in an `OPT` pseudo-record
pub mod edns;
mod hinfo;
mod opt;
mod wks;

pub use self::cname::CNAME;
pub use self::csync::CSYNC;
pub use self::hinfo::HINFO;
pub use self::opt::OPT;
pub use self::wks::WKS;

use crate::rr::record_data::RData;
use crate::rr::record_type::RecordType;

/// Capability shared by every rdata variant: map to/from the enclosing
/// [`RData`] sum type and report the wire record type it corresponds to.
///
/// Dispatch is always on [`RecordType`], never on the concrete Rust type of
/// the variant, matching the tagged-union design used throughout this
/// crate.
pub trait RecordData: Sized {
    /// Borrow `self` out of `data` if it holds this variant
    fn try_borrow(data: &RData) -> Option<&Self>;

    /// The wire type this rdata value belongs to
    fn record_type(&self) -> RecordType;

    /// Wrap `self` back into the enclosing sum type
    fn into_rdata(self) -> RData;
}
