//! Exact rational values in lowest terms.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::value::{check_text, FormatOptions, Integer};
use crate::{Error, Result};

/// Exact ratio of two arbitrary-precision integers.
///
/// Always stored in lowest terms with a positive denominator; zero is `0/1`.
/// The canonical form is maintained by the underlying library on every
/// construction and operation, so `gcd(numerator, denominator) == 1` and
/// `denominator > 0` hold at all times.
///
/// # Examples
///
/// ```
/// use mpnum::prelude::*;
///
/// let half = Rational::from_f64(0.5).into_rational()?;
/// assert_eq!(half.numer(), Integer::from(1));
/// assert_eq!(half.denom(), Integer::from(2));
/// # Ok::<(), mpnum::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rational {
    inner: rug::Rational,
}

/// The *invalid rational* sentinel produced when a non-finite float is
/// converted to the rational domain.
///
/// Reported, per the wire encoding of the conversion subsystem, as a
/// numerator in {-1, 0, 1} over denominator 0 for minus infinity, NaN and
/// plus infinity respectively. It is deliberately a separate type rather than
/// a degenerate [`Rational`]: the genuine rational kind never violates its
/// positive-denominator invariant, and callers are forced to check before
/// using the conversion result as a ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialRational {
    /// Source was negative infinity (`-1/0`).
    MinusInfinity,
    /// Source was NaN (`0/0`).
    NaN,
    /// Source was positive infinity (`1/0`).
    Infinity,
}

impl SpecialRational {
    /// The sentinel numerator: -1, 0 or 1.
    #[must_use]
    pub fn numer(self) -> i32 {
        match self {
            SpecialRational::MinusInfinity => -1,
            SpecialRational::NaN => 0,
            SpecialRational::Infinity => 1,
        }
    }

    /// The sentinel denominator: always 0.
    #[must_use]
    pub fn denom(self) -> i32 {
        0
    }
}

/// Result of a conversion into the rational domain that may hit the
/// *invalid rational* sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RationalOrSpecial {
    /// A genuine ratio.
    Rational(Rational),
    /// The sentinel for a non-finite source.
    Special(SpecialRational),
}

impl RationalOrSpecial {
    /// Whether the conversion produced the sentinel.
    #[must_use]
    pub fn is_special(&self) -> bool {
        matches!(self, RationalOrSpecial::Special(_))
    }

    /// The genuine ratio, if there is one.
    #[must_use]
    pub fn as_rational(&self) -> Option<&Rational> {
        match self {
            RationalOrSpecial::Rational(r) => Some(r),
            RationalOrSpecial::Special(_) => None,
        }
    }

    /// Unwraps the genuine ratio.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] naming the sentinel if the source was
    /// non-finite.
    pub fn into_rational(self) -> Result<Rational> {
        match self {
            RationalOrSpecial::Rational(r) => Ok(r),
            RationalOrSpecial::Special(s) => Err(Error::value_error(format!(
                "invalid rational {}/{} (non-finite source)",
                s.numer(),
                s.denom()
            ))),
        }
    }
}

impl Rational {
    /// The rational zero, `0/1`.
    #[must_use]
    pub fn new() -> Self {
        Rational {
            inner: rug::Rational::new(),
        }
    }

    pub(crate) fn from_rug(inner: rug::Rational) -> Self {
        Rational { inner }
    }

    /// Borrows the underlying native rational.
    #[must_use]
    pub fn as_rug(&self) -> &rug::Rational {
        &self.inner
    }

    /// Consumes `self`, returning the underlying native rational.
    #[must_use]
    pub fn into_rug(self) -> rug::Rational {
        self.inner
    }

    /// Builds a ratio from a numerator/denominator pair, reducing to lowest
    /// terms and normalizing the sign into the numerator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DivisionByZero`] for a zero denominator; the exact
    /// domain has no infinities to fall back to.
    pub fn from_pair(numer: Integer, denom: Integer) -> Result<Self> {
        if denom.is_zero() {
            return Err(Error::DivisionByZero("rational construction"));
        }
        Ok(Rational {
            inner: rug::Rational::from((numer.into_rug(), denom.into_rug())),
        })
    }

    /// Converts a native float exactly, using the float's binary value rather
    /// than any decimal approximation. `0.1f64` therefore converts to
    /// `3602879701896397/36028797018963968`, not `1/10`.
    ///
    /// A non-finite source yields the [`SpecialRational`] sentinel; check
    /// before using the result as a ratio.
    #[must_use]
    pub fn from_f64(f: f64) -> RationalOrSpecial {
        match rug::Rational::from_f64(f) {
            Some(inner) => RationalOrSpecial::Rational(Rational { inner }),
            None => RationalOrSpecial::Special(if f.is_nan() {
                SpecialRational::NaN
            } else if f > 0.0 {
                SpecialRational::Infinity
            } else {
                SpecialRational::MinusInfinity
            }),
        }
    }

    /// Parses rational text: either `"n/d"` (decimal numerator and
    /// denominator) or exact decimal notation (`"3.14"`, `"-2.5e3"`).
    ///
    /// Decimal text converts exactly: `"0.1"` becomes `1/10`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmbeddedNul`] / [`Error::NonAscii`] for ill-formed text
    /// - [`Error::DivisionByZero`] for a zero denominator
    /// - [`Error::ParseNumber`] if the text does not parse
    pub fn from_str(src: &str) -> Result<Self> {
        check_text(src)?;
        let trimmed = src.trim();
        if let Some((numer, denom)) = trimmed.split_once('/') {
            let numer = Integer::from_str_radix(numer.trim(), 10).map_err(|_| parse_err(src))?;
            let denom = Integer::from_str_radix(denom.trim(), 10).map_err(|_| parse_err(src))?;
            return Rational::from_pair(numer, denom);
        }
        Rational::from_decimal_str(trimmed)
    }

    /// Parses exact decimal notation: optional sign, digits with an optional
    /// fractional part, optional decimal exponent. The conversion is exact;
    /// this is the entry point for host decimal types rendered to text.
    ///
    /// # Errors
    ///
    /// Same as [`Rational::from_str`], minus the `"n/d"` cases.
    pub fn from_decimal_str(src: &str) -> Result<Self> {
        check_text(src)?;
        let trimmed = src.trim();
        let (mantissa_text, exponent) = match trimmed.split_once(['e', 'E']) {
            Some((mantissa, exp)) => (
                mantissa,
                exp.parse::<i64>().map_err(|_| parse_err(src))?,
            ),
            None => (trimmed, 0),
        };

        let (int_part, frac_part) = match mantissa_text.split_once('.') {
            Some((int, frac)) => (int, frac),
            None => (mantissa_text, ""),
        };
        let digits: String = format!("{int_part}{frac_part}");
        let body = digits.trim_start_matches(['+', '-']);
        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
            return Err(parse_err(src));
        }

        let mantissa = rug::Integer::from_str_radix(&digits, 10).map_err(|_| parse_err(src))?;
        let scale = exponent - frac_part.len() as i64;
        if scale.unsigned_abs() > u64::from(u32::MAX) {
            return Err(parse_err(src));
        }
        let inner = if scale >= 0 {
            let factor = pow10(scale.unsigned_abs());
            rug::Rational::from(mantissa * factor)
        } else {
            rug::Rational::from((mantissa, pow10(scale.unsigned_abs())))
        };
        Ok(Rational { inner })
    }

    /// The numerator; carries the sign. Coprime with the denominator.
    #[must_use]
    pub fn numer(&self) -> Integer {
        Integer::from_rug(self.inner.numer().clone())
    }

    /// The denominator; always positive.
    #[must_use]
    pub fn denom(&self) -> Integer {
        Integer::from_rug(self.inner.denom().clone())
    }

    /// Whether the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.inner.cmp0() == Ordering::Equal
    }

    /// Whether the denominator is 1.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        *self.inner.denom() == 1
    }

    /// Sign of the value as an [`Ordering`] against zero.
    #[must_use]
    pub fn sign(&self) -> Ordering {
        self.inner.cmp0()
    }

    /// Renders as `numerator/denominator` in the given base (the `/d` part is
    /// omitted for integral values), honoring the same options as the integer
    /// renderer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBase`] for a base outside the accepted set.
    pub fn to_string_radix(&self, base: i32, opts: FormatOptions) -> Result<String> {
        let digit_opts = opts & (FormatOptions::FORCE_SIGN | FormatOptions::PREFIX);
        let numer = self.numer().to_string_radix(base, digit_opts)?;
        let body = if self.is_integer() {
            numer
        } else {
            let denom = self
                .denom()
                .to_string_radix(base, digit_opts & FormatOptions::PREFIX)?;
            format!("{numer}/{denom}")
        };
        Ok(if opts.contains(FormatOptions::TAG) {
            format!("rational({body})")
        } else {
            body
        })
    }

    /// The value as an `f64`, correctly rounded to nearest.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.inner.to_f64()
    }
}

fn parse_err(src: &str) -> Error {
    Error::ParseNumber {
        input: src.to_string(),
        kind: "rational",
    }
}

fn pow10(exp: u64) -> rug::Integer {
    rug::Integer::from(rug::Integer::u_pow_u(10, exp as u32))
}

impl Default for Rational {
    fn default() -> Self {
        Rational::new()
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl Hash for Rational {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl From<Integer> for Rational {
    fn from(value: Integer) -> Self {
        Rational {
            inner: rug::Rational::from(value.into_rug()),
        }
    }
}

impl From<&Integer> for Rational {
    fn from(value: &Integer) -> Self {
        Rational {
            inner: rug::Rational::from(value.as_rug().clone()),
        }
    }
}

macro_rules! rational_from_primitive {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Rational {
                fn from(value: $ty) -> Self {
                    Rational { inner: rug::Rational::from(value) }
                }
            }
        )*
    };
}

rational_from_primitive!(i8, i16, i32, i64, u8, u16, u32, u64);

impl std::ops::Add<&Rational> for &Rational {
    type Output = Rational;
    fn add(self, rhs: &Rational) -> Rational {
        Rational::from_rug(rug::Rational::from(&self.inner + &rhs.inner))
    }
}

impl std::ops::Sub<&Rational> for &Rational {
    type Output = Rational;
    fn sub(self, rhs: &Rational) -> Rational {
        Rational::from_rug(rug::Rational::from(&self.inner - &rhs.inner))
    }
}

impl std::ops::Mul<&Rational> for &Rational {
    type Output = Rational;
    fn mul(self, rhs: &Rational) -> Rational {
        Rational::from_rug(rug::Rational::from(&self.inner * &rhs.inner))
    }
}

impl std::ops::Neg for &Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational::from_rug(rug::Rational::from(-&self.inner))
    }
}
