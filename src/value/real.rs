//! Arbitrary-precision binary floating-point values.

use std::cmp::Ordering;
use std::ffi::CStr;
use std::fmt;

use gmp_mpfr_sys::mpfr;

use crate::cleanup;
use crate::context::{Context, Flags};
use crate::convert::Prec;
use crate::value::{
    check_parse_base, check_render_base, check_text, radix_prefix, FormatOptions, Integer,
    Rational, RationalOrSpecial, SpecialRational,
};
use crate::{Error, Result};

/// Arbitrary-precision binary float with an explicit bit precision, IEEE-style
/// signed zero, infinities and NaN.
///
/// Alongside the value, a `Real` carries the rounding-direction ternary of its
/// most recent defining operation ([`Real::rc`]): `Equal` for an exact result,
/// `Greater` when the stored value was rounded up from the exact one, `Less`
/// when rounded down. The cleanup protocol consumes this code when applying
/// the context's exponent bounds.
///
/// Precision is fixed at construction for the value's lifetime; operations
/// producing new values choose the result precision from the active context.
///
/// # Examples
///
/// ```
/// use mpnum::prelude::*;
///
/// let ctx = Context::new();
/// let x = Real::from_f64(&ctx, Prec::Natural, 0.5)?;
/// assert_eq!(x.prec(), 53);
/// assert_eq!(x.rc(), std::cmp::Ordering::Equal);
/// # Ok::<(), mpnum::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Real {
    inner: rug::Float,
    rc: Ordering,
}

impl Real {
    pub(crate) fn from_parts(inner: rug::Float, rc: Ordering) -> Self {
        Real { inner, rc }
    }

    /// Borrows the underlying native float.
    #[must_use]
    pub fn as_rug(&self) -> &rug::Float {
        &self.inner
    }

    /// Consumes `self`, returning the underlying native float.
    #[must_use]
    pub fn into_rug(self) -> rug::Float {
        self.inner
    }

    /// Converts an integer at the resolved precision.
    ///
    /// With [`Prec::Natural`] the result preserves the integer exactly: the
    /// precision is the integer's bit length (at least the 2-bit minimum).
    ///
    /// # Errors
    ///
    /// Propagates precision validation errors and any trapped condition from
    /// the cleanup protocol.
    pub fn from_integer(ctx: &Context, prec: Prec, value: &Integer) -> Result<Self> {
        let p = prec.resolve(ctx, value.bit_length().max(crate::context::PREC_MIN))?;
        let rm = ctx.round().to_rug();
        cleanup::real_op(ctx, "real conversion", || {
            rug::Float::with_val_round(p, value.as_rug(), rm)
        })
    }

    /// Converts a rational at the resolved precision.
    ///
    /// A rational has no finite natural precision, so [`Prec::Natural`] falls
    /// back to the context precision here.
    ///
    /// # Errors
    ///
    /// Propagates precision validation errors and trapped conditions.
    pub fn from_rational(ctx: &Context, prec: Prec, value: &Rational) -> Result<Self> {
        let p = prec.resolve(ctx, ctx.precision())?;
        let rm = ctx.round().to_rug();
        cleanup::real_op(ctx, "real conversion", || {
            rug::Float::with_val_round(p, value.as_rug(), rm)
        })
    }

    /// Converts a native float at the resolved precision.
    ///
    /// With [`Prec::Natural`] the result carries the full 53-bit binary64
    /// significand and reproduces the source bit for bit.
    ///
    /// # Errors
    ///
    /// Propagates precision validation errors and trapped conditions.
    pub fn from_f64(ctx: &Context, prec: Prec, value: f64) -> Result<Self> {
        let p = prec.resolve(ctx, 53)?;
        let rm = ctx.round().to_rug();
        cleanup::real_op(ctx, "real conversion", || {
            rug::Float::with_val_round(p, value, rm)
        })
    }

    /// Parses text in the given base at the resolved precision.
    ///
    /// `base` is 0 for prefix auto-detection (`0b`/`0o`/`0x`, otherwise
    /// decimal) or an explicit 2..=36; the special strings `inf`, `-inf` and
    /// `nan` are accepted. Parsing rounds once, per the context rounding mode.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBase`] for a base outside 0 or 2..=36
    /// - [`Error::EmbeddedNul`] / [`Error::NonAscii`] for ill-formed text
    /// - [`Error::ParseNumber`] if the text does not parse
    /// - trapped conditions from the cleanup protocol
    pub fn from_str_radix(ctx: &Context, prec: Prec, src: &str, base: i32) -> Result<Self> {
        check_parse_base(base)?;
        if base > 36 {
            return Err(Error::InvalidBase { base });
        }
        check_text(src)?;
        let trimmed = src.trim();
        // the sign is stripped only to see past it for prefix detection; the
        // digits handed to the parser keep it, so directed rounding modes
        // round the signed value once
        let (sign, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => ("-", &trimmed[1..]),
            Some(b'+') => ("", &trimmed[1..]),
            _ => ("", trimmed),
        };
        let (base, unsigned) = if base == 0 {
            match unsigned.get(..2) {
                Some("0b") | Some("0B") => (2, &unsigned[2..]),
                Some("0o") | Some("0O") => (8, &unsigned[2..]),
                Some("0x") | Some("0X") => (16, &unsigned[2..]),
                _ => (10, unsigned),
            }
        } else {
            (base, unsigned)
        };
        let signed = format!("{sign}{unsigned}");

        let incomplete = rug::Float::parse_radix(&signed, base).map_err(|_| Error::ParseNumber {
            input: src.to_string(),
            kind: "real",
        })?;
        let p = prec.resolve(ctx, ctx.precision())?;
        let rm = ctx.round().to_rug();
        cleanup::real_op(ctx, "real conversion", || {
            rug::Float::with_val_round(p, incomplete, rm)
        })
    }

    /// Precision in bits, fixed at construction.
    #[must_use]
    pub fn prec(&self) -> u32 {
        self.inner.prec()
    }

    /// Rounding-direction ternary of the defining operation: `Equal` if the
    /// stored value is exact, `Greater` if rounded up, `Less` if rounded down.
    #[must_use]
    pub fn rc(&self) -> Ordering {
        self.rc
    }

    /// Whether the value is NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.inner.is_nan()
    }

    /// Whether the value is an infinity of either sign.
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        self.inner.is_infinite()
    }

    /// Whether the value is a zero of either sign.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }

    /// Whether the sign bit is set (true for `-0.0`).
    #[must_use]
    pub fn is_sign_negative(&self) -> bool {
        self.inner.is_sign_negative()
    }

    /// The value as an `f64`, rounded per the context.
    ///
    /// A finite value whose magnitude exceeds the `f64` range converts to the
    /// appropriately signed infinity and reports overflow through the
    /// context's flag/trap mechanism rather than a generic error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] only when the overflow trap is enabled.
    pub fn to_f64(&self, ctx: &Context) -> Result<f64> {
        let rounded = self.inner.to_f64_round(ctx.round().to_rug());
        if rounded.is_infinite() && self.inner.is_finite() {
            cleanup::apply_traps(ctx, Flags::OVERFLOW, "f64 conversion")?;
        }
        Ok(rounded)
    }

    /// The value as an `f64`, requiring exactness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lossy`] if the value does not convert bit for bit
    /// (NaN converts to NaN and is considered exact).
    pub fn to_f64_exact(&self) -> Result<f64> {
        let rounded = self.inner.to_f64();
        if self.inner.is_nan() && rounded.is_nan() {
            return Ok(rounded);
        }
        if self.inner == rounded {
            Ok(rounded)
        } else {
            Err(Error::Lossy { target: "f64" })
        }
    }

    /// Truncates toward zero into an integer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] for NaN or infinite values.
    pub fn to_integer(&self) -> Result<Integer> {
        self.inner
            .to_integer_round(rug::float::Round::Zero)
            .map(|(value, _)| Integer::from_rug(value))
            .ok_or_else(|| {
                Error::value_error(if self.inner.is_nan() {
                    "cannot convert NaN to an integer"
                } else {
                    "cannot convert infinity to an integer"
                })
            })
    }

    /// Converts exactly into the rational domain. Every finite binary float
    /// is an exact ratio, so this conversion never rounds; a non-finite value
    /// yields the [`SpecialRational`] sentinel.
    #[must_use]
    pub fn to_rational(&self) -> RationalOrSpecial {
        match self.inner.to_rational() {
            Some(r) => RationalOrSpecial::Rational(Rational::from_rug(r)),
            None => RationalOrSpecial::Special(if self.inner.is_nan() {
                SpecialRational::NaN
            } else if self.inner.is_sign_negative() {
                SpecialRational::MinusInfinity
            } else {
                SpecialRational::Infinity
            }),
        }
    }

    /// Extracts the significand digits and exponent in the given base,
    /// `2..=62`: the value is `0.<digits> * base^exp`, with the sign attached
    /// to the digit string. Requests enough digits to re-read the value
    /// exactly. Special values render as `"nan"`, `"inf"` or `"-inf"` with
    /// exponent 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBase`] for a base outside 2..=62.
    pub fn digits(&self, base: i32) -> Result<(String, i64)> {
        if !(2..=62).contains(&base) {
            return Err(Error::InvalidBase { base });
        }
        if self.inner.is_nan() {
            return Ok(("nan".to_string(), 0));
        }
        if self.inner.is_infinite() {
            let text = if self.inner.is_sign_negative() {
                "-inf"
            } else {
                "inf"
            };
            return Ok((text.to_string(), 0));
        }

        let mut exp: mpfr::exp_t = 0;
        // n = 0 asks the library for the minimal digit count that re-reads
        // exactly; the returned buffer must be released through the library
        let digits = unsafe {
            let ptr = mpfr::get_str(
                std::ptr::null_mut(),
                &mut exp,
                base,
                0,
                self.inner.as_raw(),
                mpfr::rnd_t::RNDN,
            );
            if ptr.is_null() {
                return Err(Error::value_error("digit extraction failed"));
            }
            let text = CStr::from_ptr(ptr).to_string_lossy().into_owned();
            mpfr::free_str(ptr);
            text
        };
        Ok((digits, exp as i64))
    }

    /// Renders the value in the given base with the given formatting options.
    ///
    /// `base` is 2..=36, or -36..=-2 for uppercase digits; `num_digits` limits
    /// the significand length (`None` picks enough digits to re-read the
    /// value exactly). Bases up to 62 are available through [`Real::digits`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBase`] for a base outside the accepted set.
    pub fn to_string_radix(
        &self,
        base: i32,
        num_digits: Option<usize>,
        opts: FormatOptions,
    ) -> Result<String> {
        check_render_base(base)?;
        if base.abs() > 36 {
            return Err(Error::InvalidBase { base });
        }
        let rendered = self.inner.to_string_radix(base.abs(), num_digits);
        let rendered = if base < 0 {
            rendered.to_uppercase()
        } else {
            rendered
        };

        let (sign, magnitude) = match rendered.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => {
                if opts.contains(FormatOptions::FORCE_SIGN) && !self.inner.is_nan() {
                    ("+", rendered.as_str())
                } else {
                    ("", rendered.as_str())
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
            format!("real({body})")
        } else {
            body
        })
    }
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl PartialEq for Real {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl PartialOrd for Real {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.inner.partial_cmp(&other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context {
        Context::new()
    }

    #[test]
    fn test_natural_precision_integer() {
        let ctx = ctx();
        // 2^100 + 1 needs 101 bits to represent exactly
        let big = Integer::from_str_radix("1267650600228229401496703205377", 10).unwrap();
        assert_eq!(big.bit_length(), 101);
        let x = Real::from_integer(&ctx, Prec::Natural, &big).unwrap();
        assert_eq!(x.prec(), 101);
        assert_eq!(x.rc(), Ordering::Equal);
        assert_eq!(x.to_integer().unwrap(), big);
    }

    #[test]
    fn test_context_precision_rounds() {
        let ctx = ctx();
        let big = Integer::from_str_radix("1267650600228229401496703205377", 10).unwrap();
        let x = Real::from_integer(&ctx, Prec::Context, &big).unwrap();
        assert_eq!(x.prec(), 53);
        // 2^100 + 1 cannot be held in 53 bits
        assert_ne!(x.rc(), Ordering::Equal);
        assert!(ctx.test(Flags::INEXACT));
    }

    #[test]
    fn test_natural_precision_f64_round_trip() {
        let ctx = ctx();
        let cases = vec![0.5, -0.1, 1.0 / 3.0, f64::MAX, f64::MIN_POSITIVE, -0.0];
        for f in cases {
            let x = Real::from_f64(&ctx, Prec::Natural, f).unwrap();
            assert_eq!(x.prec(), 53);
            assert_eq!(x.rc(), Ordering::Equal);
            let back = x.to_f64_exact().unwrap();
            assert_eq!(back.to_bits(), f.to_bits(), "input {f}");
        }
    }

    #[test]
    fn test_explicit_precision() {
        let ctx = ctx();
        let x = Real::from_f64(&ctx, Prec::Bits(24), 1.0 / 3.0).unwrap();
        assert_eq!(x.prec(), 24);
        assert_ne!(x.rc(), Ordering::Equal);
        assert!(matches!(
            Real::from_f64(&ctx, Prec::Bits(1), 1.0),
            Err(Error::InvalidPrecision { prec: 1 })
        ));
    }

    #[test]
    fn test_parse_bases_and_specials() {
        let ctx = ctx();
        let x = Real::from_str_radix(&ctx, Prec::Context, "0x1.8", 0).unwrap();
        assert_eq!(x.to_f64_exact().unwrap(), 1.5);
        let x = Real::from_str_radix(&ctx, Prec::Context, "-0b0.1", 0).unwrap();
        assert_eq!(x.to_f64_exact().unwrap(), -0.5);
        let x = Real::from_str_radix(&ctx, Prec::Context, "1.5e2", 10).unwrap();
        assert_eq!(x.to_f64_exact().unwrap(), 150.0);
        let x = Real::from_str_radix(&ctx, Prec::Context, "inf", 10).unwrap();
        assert!(x.is_infinite() && !x.is_sign_negative());
        let x = Real::from_str_radix(&ctx, Prec::Context, "-inf", 10).unwrap();
        assert!(x.is_infinite() && x.is_sign_negative());
        let x = Real::from_str_radix(&ctx, Prec::Context, "nan", 10).unwrap();
        assert!(x.is_nan());

        assert!(matches!(
            Real::from_str_radix(&ctx, Prec::Context, "zz", 10),
            Err(Error::ParseNumber { .. })
        ));
        assert!(matches!(
            Real::from_str_radix(&ctx, Prec::Context, "1", 62),
            Err(Error::InvalidBase { base: 62 })
        ));
    }

    #[test]
    fn test_parse_negative_text_under_directed_rounding() {
        // 7 needs three bits; its two-bit neighbors are 6 and 8. Rounding
        // toward +infinity must take -7 to -6, not to -8.
        let mut ctx = Context::new();
        ctx.set_precision(2).unwrap();
        ctx.set_round(crate::context::RoundMode::Up);
        let x = Real::from_str_radix(&ctx, Prec::Context, "-7", 10).unwrap();
        assert_eq!(x.to_f64_exact().unwrap(), -6.0);
        assert_eq!(x.rc(), Ordering::Greater);
        let x = Real::from_str_radix(&ctx, Prec::Context, "7", 10).unwrap();
        assert_eq!(x.to_f64_exact().unwrap(), 8.0);

        ctx.set_round(crate::context::RoundMode::Down);
        let x = Real::from_str_radix(&ctx, Prec::Context, "-7", 10).unwrap();
        assert_eq!(x.to_f64_exact().unwrap(), -8.0);
        assert_eq!(x.rc(), Ordering::Less);
        // prefixed text keeps its sign through auto-detection
        let x = Real::from_str_radix(&ctx, Prec::Context, "-0b111", 0).unwrap();
        assert_eq!(x.to_f64_exact().unwrap(), -8.0);
    }

    #[test]
    fn test_to_f64_exact_lossy() {
        let ctx = ctx();
        let mut wide = Context::new();
        wide.set_precision(100).unwrap();
        let third = Real::from_rational(
            &wide,
            Prec::Context,
            &Rational::from_pair(Integer::from(1), Integer::from(3)).unwrap(),
        )
        .unwrap();
        assert!(matches!(
            third.to_f64_exact(),
            Err(Error::Lossy { target: "f64" })
        ));
        // rounding conversion succeeds
        let approx = third.to_f64(&ctx).unwrap();
        assert!((approx - 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_to_rational_exact() {
        let ctx = ctx();
        let x = Real::from_f64(&ctx, Prec::Natural, 0.1).unwrap();
        let r = x.to_rational().into_rational().unwrap();
        assert_eq!(r, Rational::from_f64(0.1).into_rational().unwrap());

        let inf = Real::from_str_radix(&ctx, Prec::Context, "-inf", 10).unwrap();
        assert!(matches!(
            inf.to_rational(),
            RationalOrSpecial::Special(SpecialRational::MinusInfinity)
        ));
    }

    #[test]
    fn test_digits_extended_bases() {
        let ctx = ctx();
        let x = Real::from_f64(&ctx, Prec::Natural, 0.5).unwrap();
        let (digits, exp) = x.digits(2).unwrap();
        assert!(digits.starts_with('1'));
        assert_eq!(exp, 0);

        // base 62 digit extraction is available even though formatted
        // rendering stops at 36
        let (digits, _) = x.digits(62).unwrap();
        assert!(!digits.is_empty());
        assert!(matches!(x.digits(63), Err(Error::InvalidBase { base: 63 })));

        let nan = Real::from_str_radix(&ctx, Prec::Context, "nan", 10).unwrap();
        assert_eq!(nan.digits(10).unwrap(), ("nan".to_string(), 0));
    }

    #[test]
    fn test_render_round_trip_at_same_precision() {
        let ctx = ctx();
        let big = Integer::from_str_radix("1267650600228229401496703205377", 10).unwrap();
        let x = Real::from_integer(&ctx, Prec::Context, &big).unwrap();
        let rendered = x
            .to_string_radix(10, None, FormatOptions::empty())
            .unwrap();
        let reparsed = Real::from_str_radix(&ctx, Prec::Context, &rendered, 10).unwrap();
        assert_eq!(reparsed, x);
    }

    #[test]
    fn test_render_options() {
        let ctx = ctx();
        let x = Real::from_f64(&ctx, Prec::Natural, 1.5).unwrap();
        let tagged = x.to_string_radix(10, None, FormatOptions::TAG).unwrap();
        assert!(tagged.starts_with("real("));
        assert!(tagged.ends_with(')'));
        let signed = x
            .to_string_radix(10, None, FormatOptions::FORCE_SIGN)
            .unwrap();
        assert!(signed.starts_with('+'));
    }

    #[test]
    fn test_signed_zero() {
        let ctx = ctx();
        let neg_zero = Real::from_f64(&ctx, Prec::Natural, -0.0).unwrap();
        assert!(neg_zero.is_zero());
        assert!(neg_zero.is_sign_negative());
    }
}
