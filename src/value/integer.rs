//! Arbitrary-precision integers: the immutable [`Integer`] and the
//! single-owner [`MutInteger`] variant.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use crate::value::{check_parse_base, check_render_base, check_text, radix_prefix, DIGITS_62};
use crate::value::FormatOptions;
use crate::{Error, Result};

/// Immutable arbitrary-precision signed integer.
///
/// Safe to alias and share: the value never changes after construction, and
/// its hash is computed once on first use and cached for the lifetime of the
/// value. Use [`MutInteger`] for in-place limb or bit manipulation.
///
/// # Examples
///
/// ```
/// use mpnum::prelude::*;
///
/// let x = Integer::from_str_radix("0x1A", 0)?;
/// assert_eq!(x, Integer::from(26));
/// assert_eq!(x.to_string_radix(16, FormatOptions::PREFIX)?, "0x1a");
/// # Ok::<(), mpnum::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Integer {
    inner: rug::Integer,
    hash: OnceLock<u64>,
}

impl Integer {
    /// The integer zero.
    #[must_use]
    pub fn new() -> Self {
        Integer::from_rug(rug::Integer::new())
    }

    pub(crate) fn from_rug(inner: rug::Integer) -> Self {
        Integer {
            inner,
            hash: OnceLock::new(),
        }
    }

    /// Borrows the underlying native integer.
    #[must_use]
    pub fn as_rug(&self) -> &rug::Integer {
        &self.inner
    }

    /// Consumes `self`, returning the underlying native integer.
    #[must_use]
    pub fn into_rug(self) -> rug::Integer {
        self.inner
    }

    /// Converts a native float, truncating toward zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] for NaN or infinite input; there is no integer
    /// to truncate to.
    pub fn from_f64(f: f64) -> Result<Self> {
        rug::Integer::from_f64(f)
            .map(Integer::from_rug)
            .ok_or_else(|| {
                Error::value_error(if f.is_nan() {
                    "cannot convert NaN to an integer"
                } else {
                    "cannot convert infinity to an integer"
                })
            })
    }

    /// Parses text in the given base.
    ///
    /// `base` is 0 for prefix auto-detection (`0b`/`0o`/`0x`, otherwise
    /// decimal) or an explicit 2..=62. Bases above 36 use the extended digit
    /// alphabet: decimal digits, then uppercase, then lowercase.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBase`] for a base outside the accepted set
    /// - [`Error::EmbeddedNul`] / [`Error::NonAscii`] for ill-formed text
    /// - [`Error::ParseNumber`] if the digits do not parse in the base
    pub fn from_str_radix(src: &str, base: i32) -> Result<Self> {
        check_parse_base(base)?;
        check_text(src)?;
        let trimmed = src.trim();
        let (negative, digits) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (base, digits) = if base == 0 {
            match digits.get(..2) {
                Some("0b") | Some("0B") => (2, &digits[2..]),
                Some("0o") | Some("0O") => (8, &digits[2..]),
                Some("0x") | Some("0X") => (16, &digits[2..]),
                _ => (10, digits),
            }
        } else {
            (base, digits)
        };

        let magnitude = if base <= 36 {
            rug::Integer::from_str_radix(digits, base).map_err(|_| Error::ParseNumber {
                input: src.to_string(),
                kind: "integer",
            })?
        } else {
            parse_extended_radix(src, digits, base)?
        };

        Ok(Integer::from_rug(if negative {
            -magnitude
        } else {
            magnitude
        }))
    }

    /// Renders the value in the given base with the given formatting options.
    ///
    /// `base` is 2..=62, or -36..=-2 to get uppercase digits for bases 11..=36.
    /// Bases above 36 use the extended digit alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBase`] for a base outside the accepted set.
    pub fn to_string_radix(&self, base: i32, opts: FormatOptions) -> Result<String> {
        check_render_base(base)?;
        let digits = if base.abs() <= 36 {
            let lower = self.inner.to_string_radix(base.abs());
            if base < 0 {
                lower.to_uppercase()
            } else {
                lower
            }
        } else {
            render_extended_radix(&self.inner, base)
        };

        let (sign, magnitude) = match digits.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => {
                if opts.contains(FormatOptions::FORCE_SIGN) {
                    ("+", digits.as_str())
                } else {
                    ("", digits.as_str())
                }
            }
        };

        let prefix = if opts.contains(FormatOptions::PREFIX) {
            radix_prefix(base).unwrap_or("")
        } else {
            ""
        };

        let body = format!("{sign}{prefix}{magnitude}");
        Ok(if opts.contains(FormatOptions::TAG) {
            format!("integer({body})")
        } else {
            body
        })
    }

    /// Number of significant bits in the absolute value; zero has bit
    /// length 0.
    #[must_use]
    pub fn bit_length(&self) -> u32 {
        self.inner.significant_bits()
    }

    /// Whether the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.inner.cmp0() == Ordering::Equal
    }

    /// Sign of the value as an [`Ordering`] against zero.
    #[must_use]
    pub fn sign(&self) -> Ordering {
        self.inner.cmp0()
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Integer {
        Integer::from_rug(rug::Integer::from(self.inner.abs_ref()))
    }

    /// Greatest common divisor with `other`; always non-negative.
    #[must_use]
    pub fn gcd(&self, other: &Integer) -> Integer {
        Integer::from_rug(rug::Integer::from(self.inner.gcd_ref(&other.inner)))
    }

    /// The value as an `i64`, if it fits.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    /// The value as an `f64`, rounding toward zero on excess precision;
    /// magnitudes beyond the `f64` range become infinities.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.inner.to_f64()
    }

    fn cached_hash(&self) -> u64 {
        *self.hash.get_or_init(|| {
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            self.inner.hash(&mut hasher);
            hasher.finish()
        })
    }
}

fn parse_extended_radix(src: &str, digits: &str, base: i32) -> Result<rug::Integer> {
    if digits.is_empty() {
        return Err(Error::ParseNumber {
            input: src.to_string(),
            kind: "integer",
        });
    }
    let mut acc = rug::Integer::new();
    for byte in digits.bytes() {
        let value = DIGITS_62
            .iter()
            .position(|&d| d == byte)
            .filter(|&v| (v as i32) < base)
            .ok_or_else(|| Error::ParseNumber {
                input: src.to_string(),
                kind: "integer",
            })?;
        acc *= base;
        acc += value as u32;
    }
    Ok(acc)
}

fn render_extended_radix(value: &rug::Integer, base: i32) -> String {
    if value.cmp0() == Ordering::Equal {
        return "0".to_string();
    }
    let mut magnitude = rug::Integer::from(value.abs_ref());
    let divisor = rug::Integer::from(base);
    let mut out = Vec::new();
    while magnitude.cmp0() != Ordering::Equal {
        let (quotient, remainder) = magnitude.div_rem(divisor.clone());
        // 0 <= remainder < base <= 62, so the digit index always fits
        out.push(DIGITS_62[remainder.to_usize().unwrap_or(0)]);
        magnitude = quotient;
    }
    if value.cmp0() == Ordering::Less {
        out.push(b'-');
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

impl Default for Integer {
    fn default() -> Self {
        Integer::new()
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl PartialEq for Integer {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Integer {}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl Hash for Integer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.cached_hash());
    }
}

macro_rules! integer_from_primitive {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Integer {
                fn from(value: $ty) -> Self {
                    Integer::from_rug(rug::Integer::from(value))
                }
            }
        )*
    };
}

integer_from_primitive!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

impl std::ops::Add<&Integer> for &Integer {
    type Output = Integer;
    fn add(self, rhs: &Integer) -> Integer {
        Integer::from_rug(rug::Integer::from(&self.inner + &rhs.inner))
    }
}

impl std::ops::Sub<&Integer> for &Integer {
    type Output = Integer;
    fn sub(self, rhs: &Integer) -> Integer {
        Integer::from_rug(rug::Integer::from(&self.inner - &rhs.inner))
    }
}

impl std::ops::Mul<&Integer> for &Integer {
    type Output = Integer;
    fn mul(self, rhs: &Integer) -> Integer {
        Integer::from_rug(rug::Integer::from(&self.inner * &rhs.inner))
    }
}

impl std::ops::Neg for &Integer {
    type Output = Integer;
    fn neg(self) -> Integer {
        Integer::from_rug(rug::Integer::from(-&self.inner))
    }
}

/// Mutable arbitrary-precision integer supporting in-place mutation.
///
/// `MutInteger` is single-owner and move-only: it does not implement `Clone`
/// or `Hash`, so a value can never be aliased across operations that might
/// mutate it. All in-place operations are destructive regardless of outcome.
/// Convert to the shareable variant with [`MutInteger::freeze`] or copy out
/// with [`MutInteger::to_integer`].
#[derive(Debug, Default)]
pub struct MutInteger {
    inner: rug::Integer,
}

impl MutInteger {
    /// The mutable integer zero.
    #[must_use]
    pub fn new() -> Self {
        MutInteger {
            inner: rug::Integer::new(),
        }
    }

    /// Copies an immutable integer into a fresh mutable one.
    #[must_use]
    pub fn from_integer(value: &Integer) -> Self {
        MutInteger {
            inner: value.inner.clone(),
        }
    }

    /// In-place addition. Destructive.
    pub fn add_assign(&mut self, rhs: &Integer) {
        self.inner += &rhs.inner;
    }

    /// In-place subtraction. Destructive.
    pub fn sub_assign(&mut self, rhs: &Integer) {
        self.inner -= &rhs.inner;
    }

    /// In-place multiplication. Destructive.
    pub fn mul_assign(&mut self, rhs: &Integer) {
        self.inner *= &rhs.inner;
    }

    /// In-place negation. Destructive.
    pub fn neg_assign(&mut self) {
        let taken = std::mem::take(&mut self.inner);
        self.inner = -taken;
    }

    /// Sets or clears the bit at `index`. Destructive.
    pub fn set_bit(&mut self, index: u32, value: bool) {
        self.inner.set_bit(index, value);
    }

    /// Flips the bit at `index`. Destructive.
    pub fn toggle_bit(&mut self, index: u32) {
        self.inner.toggle_bit(index);
    }

    /// Whether the bit at `index` is set.
    #[must_use]
    pub fn get_bit(&self, index: u32) -> bool {
        self.inner.get_bit(index)
    }

    /// Number of significant bits in the absolute value.
    #[must_use]
    pub fn bit_length(&self) -> u32 {
        self.inner.significant_bits()
    }

    /// Copies the current value out as an immutable [`Integer`].
    #[must_use]
    pub fn to_integer(&self) -> Integer {
        Integer::from_rug(self.inner.clone())
    }

    /// Consumes the mutable value, freezing it into an immutable [`Integer`]
    /// without copying.
    #[must_use]
    pub fn freeze(self) -> Integer {
        Integer::from_rug(self.inner)
    }
}

impl From<Integer> for MutInteger {
    fn from(value: Integer) -> Self {
        MutInteger {
            inner: value.inner,
        }
    }
}

impl fmt::Display for MutInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}
