//! The four value kinds of the numeric tower.
//!
//! - [`Integer`] - immutable arbitrary-precision integer with a cached hash
//! - [`MutInteger`] - the mutable, single-owner integer variant
//! - [`Rational`] - exact ratio in lowest terms with positive denominator
//! - [`Real`] - arbitrary-precision binary float carrying its rounding ternary
//! - [`Complex`] - pair of floats with independent per-part precision
//!
//! All four wrap the corresponding native multi-precision value; the tower
//! relationship Integer < Rational < Real < Complex is realized by the
//! promotion functions in [`crate::convert`] and exercised by
//! [`crate::dispatch`].

pub mod complex;
pub mod integer;
pub mod rational;
pub mod real;

use bitflags::bitflags;

pub use complex::Complex;
pub use integer::{Integer, MutInteger};
pub use rational::{Rational, RationalOrSpecial, SpecialRational};
pub use real::Real;

bitflags! {
    /// Formatting options for rendering values to text.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct FormatOptions: u32 {
        /// Wrap the digits in type-tag syntax, e.g. `integer(26)`.
        const TAG = 1 << 0;
        /// Emit an explicit `+` on non-negative values.
        const FORCE_SIGN = 1 << 1;
        /// Emit the radix prefix `0b`/`0o`/`0x` for bases 2, 8 and 16.
        const PREFIX = 1 << 2;
    }
}

/// Digit alphabet for bases 37..=62, in the order used by the underlying
/// integer library: decimal digits, then uppercase, then lowercase.
pub(crate) const DIGITS_62: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Validates a rendering base: 2..=62, or -36..=-2 for uppercase digits.
pub(crate) fn check_render_base(base: i32) -> crate::Result<()> {
    match base {
        2..=62 | -36..=-2 => Ok(()),
        _ => Err(crate::Error::InvalidBase { base }),
    }
}

/// Validates a parsing base: 0 (prefix auto-detection) or 2..=62.
pub(crate) fn check_parse_base(base: i32) -> crate::Result<()> {
    match base {
        0 | 2..=62 => Ok(()),
        _ => Err(crate::Error::InvalidBase { base }),
    }
}

/// Rejects numeric text the tower never accepts: embedded NUL bytes and
/// non-ASCII characters, each with its own error.
pub(crate) fn check_text(src: &str) -> crate::Result<()> {
    if src.bytes().any(|b| b == 0) {
        return Err(crate::Error::EmbeddedNul);
    }
    if !src.is_ascii() {
        return Err(crate::Error::NonAscii);
    }
    Ok(())
}

/// The radix prefix for `FormatOptions::PREFIX`, if the base has one.
pub(crate) fn radix_prefix(base: i32) -> Option<&'static str> {
    match base.abs() {
        2 => Some("0b"),
        8 => Some("0o"),
        16 => Some("0x"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_validation() {
        assert!(check_parse_base(0).is_ok());
        assert!(check_parse_base(2).is_ok());
        assert!(check_parse_base(62).is_ok());
        assert!(matches!(
            check_parse_base(1),
            Err(crate::Error::InvalidBase { base: 1 })
        ));
        assert!(matches!(
            check_parse_base(63),
            Err(crate::Error::InvalidBase { base: 63 })
        ));
        assert!(matches!(
            check_parse_base(-16),
            Err(crate::Error::InvalidBase { base: -16 })
        ));

        assert!(check_render_base(-2).is_ok());
        assert!(check_render_base(-36).is_ok());
        assert!(matches!(
            check_render_base(-37),
            Err(crate::Error::InvalidBase { base: -37 })
        ));
        assert!(matches!(
            check_render_base(0),
            Err(crate::Error::InvalidBase { base: 0 })
        ));
    }

    #[test]
    fn test_text_validation() {
        assert!(check_text("123").is_ok());
        assert!(matches!(
            check_text("12\03"),
            Err(crate::Error::EmbeddedNul)
        ));
        assert!(matches!(check_text("１２３"), Err(crate::Error::NonAscii)));
    }
}
