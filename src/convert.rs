//! Conversions between host-native representations and the four value kinds,
//! and the promotion lattice Integer < Rational < Real < Complex.
//!
//! Promotions up the tower are exact wherever the target kind can hold the
//! source exactly (Integer to Rational always is); entering the float domain
//! rounds once at the context-specified precision and reports the rounding
//! through the normal flag machinery. Host types that speak an exact-ratio or
//! decimal protocol plug in through the [`ExactOperand`] and
//! [`DecimalOperand`] adapter traits instead of any name-based duck typing.

use std::fmt;

use crate::context::{prec_max, Context, PREC_MIN};
use crate::value::{Complex, Integer, Rational, Real};
use crate::{Error, Result};

/// Target precision for a conversion into the float domain.
///
/// [`Prec::Natural`] is the sentinel meaning "preserve the source's exact
/// information": the bit length of an integer, the full 53-bit significand of
/// a native float. Sources without a finite natural precision (rationals)
/// fall back to the context precision.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Prec {
    /// Use the working precision of the governing context.
    #[default]
    Context,
    /// Choose the precision that preserves the source exactly.
    Natural,
    /// Use exactly this many bits.
    Bits(u32),
}

impl Prec {
    /// Resolves to a concrete bit count, given the source's natural precision.
    pub(crate) fn resolve(self, ctx: &Context, natural: u32) -> Result<u32> {
        match self {
            Prec::Context => Ok(ctx.precision()),
            Prec::Natural => Ok(natural.clamp(PREC_MIN, prec_max())),
            Prec::Bits(bits) => {
                if bits < PREC_MIN || bits > prec_max() {
                    Err(Error::InvalidPrecision {
                        prec: i64::from(bits),
                    })
                } else {
                    Ok(bits)
                }
            }
        }
    }
}

/// A value of any of the four tower kinds.
///
/// This is the operand and result type of [`crate::dispatch`]; host natives
/// convert in via `From`, exactly in every case (native floats enter at their
/// natural 53-bit precision).
#[derive(Debug, Clone)]
pub enum Value {
    /// Arbitrary-precision integer.
    Integer(Integer),
    /// Exact rational.
    Rational(Rational),
    /// Arbitrary-precision binary float.
    Real(Real),
    /// Arbitrary-precision binary complex.
    Complex(Complex),
}

impl Value {
    /// The value's kind in the tower.
    #[must_use]
    pub fn kind(&self) -> crate::dispatch::NumericKind {
        crate::dispatch::classify(self)
    }

    /// The integer inside, if this is the integer kind.
    #[must_use]
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Value::Integer(x) => Some(x),
            _ => None,
        }
    }

    /// The rational inside, if this is the rational kind.
    #[must_use]
    pub fn as_rational(&self) -> Option<&Rational> {
        match self {
            Value::Rational(x) => Some(x),
            _ => None,
        }
    }

    /// The real inside, if this is the real kind.
    #[must_use]
    pub fn as_real(&self) -> Option<&Real> {
        match self {
            Value::Real(x) => Some(x),
            _ => None,
        }
    }

    /// The complex inside, if this is the complex kind.
    #[must_use]
    pub fn as_complex(&self) -> Option<&Complex> {
        match self {
            Value::Complex(x) => Some(x),
            _ => None,
        }
    }

    /// Normalizes a host exact-ratio operand into the tower.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DivisionByZero`] if the adapter reports a zero
    /// denominator.
    pub fn from_exact(source: &dyn ExactOperand) -> Result<Value> {
        let rational = Rational::from_pair(source.numerator(), source.denominator())?;
        Ok(if rational.is_integer() {
            Value::Integer(rational.numer())
        } else {
            Value::Rational(rational)
        })
    }

    /// Normalizes a host decimal operand into the tower, exactly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseNumber`] if the adapter renders text that is not
    /// exact decimal notation.
    pub fn from_decimal(source: &dyn DecimalOperand) -> Result<Value> {
        let rational = Rational::from_decimal_str(&source.to_decimal())?;
        Ok(Value::Rational(rational))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(x) => fmt::Display::fmt(x, f),
            Value::Rational(x) => fmt::Display::fmt(x, f),
            Value::Real(x) => fmt::Display::fmt(x, f),
            Value::Complex(x) => fmt::Display::fmt(x, f),
        }
    }
}

impl From<Integer> for Value {
    fn from(value: Integer) -> Self {
        Value::Integer(value)
    }
}

impl From<Rational> for Value {
    fn from(value: Rational) -> Self {
        Value::Rational(value)
    }
}

impl From<Real> for Value {
    fn from(value: Real) -> Self {
        Value::Real(value)
    }
}

impl From<Complex> for Value {
    fn from(value: Complex) -> Self {
        Value::Complex(value)
    }
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Integer(Integer::from(value))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        // a native float is exact at its own 53-bit significand; no context,
        // no rounding, no conditions
        Value::Real(Real::from_parts(
            rug::Float::with_val(53, value),
            std::cmp::Ordering::Equal,
        ))
    }
}

impl From<(f64, f64)> for Value {
    fn from(value: (f64, f64)) -> Self {
        Value::Complex(Complex::from_parts(
            rug::Complex::with_val((53, 53), value),
            (std::cmp::Ordering::Equal, std::cmp::Ordering::Equal),
        ))
    }
}

/// Adapter for host types that expose an exact numerator/denominator pair
/// (host "Fraction"-protocol types).
///
/// Implementing this trait is the supported way to feed external exact types
/// into the tower; classification sees them as
/// [`NumericKind::ExternalExact`](crate::dispatch::NumericKind::ExternalExact)
/// and they normalize into the rational (or integer) kind before dispatch.
pub trait ExactOperand {
    /// The exact numerator.
    fn numerator(&self) -> Integer;
    /// The exact denominator; must not be zero for a well-formed source.
    fn denominator(&self) -> Integer;
}

/// Adapter for host types that expose an exact decimal rendering (host
/// "Decimal"-protocol types).
pub trait DecimalOperand {
    /// Exact decimal text for the value, e.g. `"3.14"` or `"-2.5e3"`.
    fn to_decimal(&self) -> String;
}

/// Promotes a tower value to the rational kind, exactly.
///
/// # Errors
///
/// Returns [`Error::Type`] for float-domain values; lowering out of the float
/// domain is a conversion, not a promotion.
pub(crate) fn promote_rational(value: &Value) -> Result<Rational> {
    match value {
        Value::Integer(x) => Ok(Rational::from(x)),
        Value::Rational(x) => Ok(x.clone()),
        Value::Real(_) | Value::Complex(_) => Err(Error::type_error(
            "cannot demote a float-domain value to rational",
        )),
    }
}

/// Promotes a tower value to the real kind at the context working precision.
///
/// A value already of the real kind passes through unchanged; its own
/// precision is respected by the kernels.
///
/// # Errors
///
/// Returns [`Error::Type`] for complex values and propagates trapped
/// conditions raised by the conversion itself.
pub(crate) fn promote_real(ctx: &Context, value: &Value) -> Result<Real> {
    match value {
        Value::Integer(x) => Real::from_integer(ctx, Prec::Context, x),
        Value::Rational(x) => Real::from_rational(ctx, Prec::Context, x),
        Value::Real(x) => Ok(x.clone()),
        Value::Complex(_) => Err(Error::type_error(
            "cannot demote a complex value to real",
        )),
    }
}

/// Promotes a tower value to the complex kind at the context per-part
/// precisions.
///
/// # Errors
///
/// Propagates trapped conditions raised by the conversion itself.
pub(crate) fn promote_complex(ctx: &Context, value: &Value) -> Result<Complex> {
    match value {
        Value::Complex(x) => Ok(x.clone()),
        other => {
            let real = promote_real(ctx, other)?;
            Complex::from_real(ctx, Prec::Context, &real)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Flags;

    struct HostFraction {
        numer: i64,
        denom: i64,
    }

    impl ExactOperand for HostFraction {
        fn numerator(&self) -> Integer {
            Integer::from(self.numer)
        }
        fn denominator(&self) -> Integer {
            Integer::from(self.denom)
        }
    }

    struct HostDecimal(&'static str);

    impl DecimalOperand for HostDecimal {
        fn to_decimal(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_prec_resolution() {
        let mut ctx = Context::new();
        ctx.set_precision(100).unwrap();
        assert_eq!(Prec::Context.resolve(&ctx, 7).unwrap(), 100);
        assert_eq!(Prec::Natural.resolve(&ctx, 7).unwrap(), 7);
        // natural precision is clamped up to the library minimum
        assert_eq!(Prec::Natural.resolve(&ctx, 0).unwrap(), PREC_MIN);
        assert_eq!(Prec::Bits(64).resolve(&ctx, 7).unwrap(), 64);
        assert!(matches!(
            Prec::Bits(0).resolve(&ctx, 7),
            Err(Error::InvalidPrecision { prec: 0 })
        ));
    }

    #[test]
    fn test_native_float_enters_exactly() {
        let v = Value::from(0.1);
        let real = v.as_real().unwrap();
        assert_eq!(real.prec(), 53);
        assert_eq!(real.rc(), std::cmp::Ordering::Equal);
        assert_eq!(real.to_f64_exact().unwrap(), 0.1);
    }

    #[test]
    fn test_exact_adapter() {
        let half = HostFraction { numer: 3, denom: 6 };
        let v = Value::from_exact(&half).unwrap();
        assert_eq!(v.as_rational().unwrap(), &Rational::from_pair(
            Integer::from(1),
            Integer::from(2)
        ).unwrap());

        // integral ratios normalize down to the integer kind
        let three = HostFraction { numer: 6, denom: 2 };
        let v = Value::from_exact(&three).unwrap();
        assert_eq!(v.as_integer().unwrap(), &Integer::from(3));

        let broken = HostFraction { numer: 1, denom: 0 };
        assert!(matches!(
            Value::from_exact(&broken),
            Err(Error::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_decimal_adapter() {
        let v = Value::from_decimal(&HostDecimal("3.14")).unwrap();
        assert_eq!(
            v.as_rational().unwrap(),
            &Rational::from_pair(Integer::from(157), Integer::from(50)).unwrap()
        );
    }

    #[test]
    fn test_promotion_exactness() {
        let ctx = Context::new();
        let int_val = Value::from(7);
        let r = promote_rational(&int_val).unwrap();
        assert_eq!(r.numer(), Integer::from(7));
        assert_eq!(r.denom(), Integer::from(1));

        let x = promote_real(&ctx, &int_val).unwrap();
        assert_eq!(x.rc(), std::cmp::Ordering::Equal);

        let z = promote_complex(&ctx, &int_val).unwrap();
        assert!(z.imag().is_zero());
        assert!(!ctx.test(Flags::INEXACT));
    }

    #[test]
    fn test_promotion_rounds_at_context_precision() {
        let ctx = Context::new();
        let third = Value::from(Rational::from_pair(Integer::from(1), Integer::from(3)).unwrap());
        let x = promote_real(&ctx, &third).unwrap();
        assert_eq!(x.prec(), 53);
        assert_ne!(x.rc(), std::cmp::Ordering::Equal);
        assert!(ctx.test(Flags::INEXACT));
    }

    #[test]
    fn test_demotion_is_a_type_error() {
        let v = Value::from(1.5);
        assert!(matches!(
            promote_rational(&v),
            Err(Error::Type { .. })
        ));
    }
}
