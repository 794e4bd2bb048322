// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Wrapper that forces callers to explicitly acknowledge that a value came
//! straight off the wire and has not been range-checked for its intended use.

use crate::error::{ProtoError, ProtoErrorKind, ProtoResult};

/// A value read from the wire that has not yet been validated for the
/// context it will be used in (e.g. a rdlength used to size a slice).
///
/// Most integers read off the wire are safe to use as-is (they're bit
/// patterns, not indices), in which case call [`Restrict::unverified`] with a
/// comment explaining why. Values that will be used for arithmetic or
/// indexing should go through [`Restrict::verify_unwrap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restrict<T>(T);

impl<T> Restrict<T> {
    /// Wrap a raw value read from the wire
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Extract the inner value without verification.
    ///
    /// Every call site should carry a comment justifying why the lack of
    /// verification is safe in that context.
    pub fn unverified(self) -> T {
        self.0
    }

    /// Extract the inner value, or an error, after checking a predicate
    pub fn verify_unwrap<F: FnOnce(&T) -> bool>(self, f: F) -> Result<T, T> {
        if f(&self.0) {
            Ok(self.0)
        } else {
            Err(self.0)
        }
    }

    /// Apply a transformation while remaining in the unverified wrapper
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Restrict<U> {
        Restrict(f(self.0))
    }
}

/// Arithmetic over [`Restrict`]ed values that may legitimately fail, e.g. due
/// to an adversarial rdlength
pub trait RestrictedMath {
    /// The wrapped numeric type
    type Output;

    /// Subtract `rhs`, failing with [`ProtoErrorKind::Truncated`] on underflow
    fn checked_sub(self, rhs: Self::Output) -> ProtoResult<Restrict<Self::Output>>;
}

impl RestrictedMath for Restrict<usize> {
    type Output = usize;

    fn checked_sub(self, rhs: usize) -> ProtoResult<Restrict<usize>> {
        self.0
            .checked_sub(rhs)
            .map(Restrict)
            .ok_or_else(|| ProtoError::from(ProtoErrorKind::Truncated { needed: rhs }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_unwrap_accepts_or_rejects() {
        let ok = Restrict::new(42u8).verify_unwrap(|v| *v < 100);
        assert_eq!(ok, Ok(42));
        let err = Restrict::new(200u8).verify_unwrap(|v| *v < 100);
        assert_eq!(err, Err(200));
    }

    #[test]
    fn map_transforms_while_staying_wrapped() {
        let r = Restrict::new(4u16).map(|v| v as u32 * 2);
        assert_eq!(r.unverified(), 8u32);
    }

    #[test]
    fn checked_sub_fails_on_underflow_instead_of_panicking() {
        let r = Restrict::new(3usize);
        assert!(r.checked_sub(10).is_err());
        let r = Restrict::new(10usize);
        assert_eq!(r.checked_sub(3).unwrap().unverified(), 7);
    }
}
