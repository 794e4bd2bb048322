// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Binary (wire-format) encoding and decoding primitives

mod decoder;
mod encoder;
mod restrict;

pub use self::decoder::{BinDecoder, MAX_PAYLOAD_LEN};
pub use self::encoder::{BinDecodable, BinEncodable, BinEncoder, NameEncoding};
pub use self::restrict::{Restrict, RestrictedMath};
