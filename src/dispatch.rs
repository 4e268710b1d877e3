//! Type classification and operation dispatch across the numeric tower.
//!
//! Operands of unknown kind are classified by a fixed precedence test into
//! [`NumericKind`]; a binary operation runs in the higher of its operands'
//! kinds (Integer < Rational < Real < Complex), after coercing both operands
//! to that kind through [`crate::convert`]. Mixed integer/rational arithmetic
//! never leaves the exact domain; the float domain is entered only when an
//! operand already lives there, or when a real-undefined result (square root
//! of a negative, logarithm of a negative) promotes to complex under the
//! context's `allow_complex` setting.
//!
//! The free functions ([`add`], [`div`], ...) resolve the thread-local active
//! context; the [`Context`] methods take it explicitly.

use std::cmp::Ordering;

use rug::ops::Pow as _;

use crate::cleanup;
use crate::context::{with_active, Context, Flags};
use crate::convert::{
    promote_complex, promote_rational, promote_real, DecimalOperand, ExactOperand, Prec, Value,
};
use crate::value::{Complex, Integer, Rational, Real};
use crate::{Error, Result};

/// Kind of a numeric operand, produced by the classification functions.
///
/// The four tower kinds are totally ordered for promotion; the two external
/// kinds cover host types speaking the exact-ratio or decimal adapter
/// protocols and normalize into the tower before dispatch; anything else is
/// `Unsupported` and produces a type error before any kernel runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    /// Arbitrary-precision integer.
    Integer,
    /// Exact rational.
    Rational,
    /// Arbitrary-precision binary float.
    Real,
    /// Arbitrary-precision binary complex.
    Complex,
    /// Host type implementing [`ExactOperand`].
    ExternalExact,
    /// Host type implementing [`DecimalOperand`].
    ExternalDecimal,
    /// Anything else; never dispatched.
    Unsupported,
}

impl NumericKind {
    fn rank(self) -> Option<u8> {
        match self {
            NumericKind::Integer => Some(0),
            NumericKind::Rational => Some(1),
            NumericKind::Real => Some(2),
            NumericKind::Complex => Some(3),
            _ => None,
        }
    }
}

/// Classifies a tower value by the fixed precedence test: integer-like first,
/// then rational-only, then real-only, then complex-only.
#[must_use]
pub fn classify(value: &Value) -> NumericKind {
    match value {
        Value::Integer(_) => NumericKind::Integer,
        Value::Rational(_) => NumericKind::Rational,
        Value::Real(_) => NumericKind::Real,
        Value::Complex(_) => NumericKind::Complex,
    }
}

/// A host-side operand before normalization into the tower.
pub enum HostOperand<'a> {
    /// Native signed machine integer.
    Int(i64),
    /// Native unsigned machine integer.
    UInt(u64),
    /// Native binary64 float.
    Float(f64),
    /// Native two-component complex pair.
    ComplexPair(f64, f64),
    /// A tower value.
    Value(&'a Value),
    /// External exact-ratio protocol type.
    Exact(&'a dyn ExactOperand),
    /// External decimal protocol type.
    Decimal(&'a dyn DecimalOperand),
    /// Anything else, carrying the host type name for the error message.
    Other(&'a str),
}

/// Classifies a host operand without converting it.
#[must_use]
pub fn classify_host(operand: &HostOperand<'_>) -> NumericKind {
    match operand {
        HostOperand::Int(_) | HostOperand::UInt(_) => NumericKind::Integer,
        HostOperand::Float(_) => NumericKind::Real,
        HostOperand::ComplexPair(..) => NumericKind::Complex,
        HostOperand::Value(v) => classify(v),
        HostOperand::Exact(_) => NumericKind::ExternalExact,
        HostOperand::Decimal(_) => NumericKind::ExternalDecimal,
        HostOperand::Other(_) => NumericKind::Unsupported,
    }
}

/// Normalizes a host operand into a tower value.
///
/// # Errors
///
/// Returns [`Error::Type`] for unsupported operands; no kernel is invoked.
pub fn normalize(operand: HostOperand<'_>) -> Result<Value> {
    match operand {
        HostOperand::Int(x) => Ok(Value::from(x)),
        HostOperand::UInt(x) => Ok(Value::from(x)),
        HostOperand::Float(x) => Ok(Value::from(x)),
        HostOperand::ComplexPair(re, im) => Ok(Value::from((re, im))),
        HostOperand::Value(v) => Ok(v.clone()),
        HostOperand::Exact(x) => Value::from_exact(x),
        HostOperand::Decimal(x) => Value::from_decimal(x),
        HostOperand::Other(name) => Err(Error::type_error(format!(
            "unsupported operand type: {name}"
        ))),
    }
}

/// A binary operation of the tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// True division.
    Div,
    /// Exponentiation.
    Pow,
}

impl BinaryOp {
    fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "addition",
            BinaryOp::Sub => "subtraction",
            BinaryOp::Mul => "multiplication",
            BinaryOp::Div => "division",
            BinaryOp::Pow => "exponentiation",
        }
    }
}

/// A unary operation of the tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation.
    Neg,
    /// Absolute value (complex modulus for the complex kind).
    Abs,
    /// Square root.
    Sqrt,
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Ln,
}

impl UnaryOp {
    fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "negation",
            UnaryOp::Abs => "absolute value",
            UnaryOp::Sqrt => "square root",
            UnaryOp::Exp => "exponential",
            UnaryOp::Ln => "logarithm",
        }
    }
}

/// Dispatches a binary operation under an explicit context.
///
/// # Errors
///
/// Type errors for mismatched operands, division-by-zero in the exact
/// domain, and any trapped arithmetic condition.
pub fn binary(ctx: &Context, op: BinaryOp, a: &Value, b: &Value) -> Result<Value> {
    let kind_a = classify(a);
    let kind_b = classify(b);
    // ranks are total for tower values; classify never returns the
    // external or unsupported kinds here
    let common = if kind_a.rank() >= kind_b.rank() {
        kind_a
    } else {
        kind_b
    };

    match common {
        NumericKind::Integer => integer_binary(ctx, op, a, b),
        NumericKind::Rational => rational_binary(ctx, op, a, b),
        NumericKind::Real => {
            let a = promote_real(ctx, a)?;
            let b = promote_real(ctx, b)?;
            real_binary(ctx, op, &a, &b)
        }
        NumericKind::Complex => {
            let a = promote_complex(ctx, a)?;
            let b = promote_complex(ctx, b)?;
            complex_binary(ctx, op, &a, &b).map(Value::Complex)
        }
        _ => unreachable!("tower values always classify into the tower"),
    }
}

/// Dispatches a unary operation under an explicit context.
///
/// # Errors
///
/// Same family as [`binary`].
pub fn unary(ctx: &Context, op: UnaryOp, a: &Value) -> Result<Value> {
    match classify(a) {
        NumericKind::Integer | NumericKind::Rational => exact_unary(ctx, op, a),
        NumericKind::Real => {
            let a = promote_real(ctx, a)?;
            real_unary(ctx, op, &a)
        }
        NumericKind::Complex => {
            let a = promote_complex(ctx, a)?;
            complex_unary(ctx, op, &a)
        }
        _ => unreachable!("tower values always classify into the tower"),
    }
}

fn integer_binary(ctx: &Context, op: BinaryOp, a: &Value, b: &Value) -> Result<Value> {
    let a_int = a.as_integer().ok_or_else(|| bad_operand(op.name()))?;
    let b_int = b.as_integer().ok_or_else(|| bad_operand(op.name()))?;
    match op {
        BinaryOp::Add => Ok(Value::Integer(a_int + b_int)),
        BinaryOp::Sub => Ok(Value::Integer(a_int - b_int)),
        BinaryOp::Mul => Ok(Value::Integer(a_int * b_int)),
        BinaryOp::Div => exact_div(ctx, op, a, b),
        BinaryOp::Pow => {
            // small non-negative exponents stay exact; everything else goes
            // through the float kernel
            match b_int.to_i64() {
                Some(exp) if (0..=i64::from(u32::MAX)).contains(&exp) => {
                    let result = rug::Integer::from(a_int.as_rug().pow(exp as u32));
                    Ok(Value::Integer(Integer::from_rug(result)))
                }
                _ => {
                    let a = promote_real(ctx, a)?;
                    let b = promote_real(ctx, b)?;
                    real_binary(ctx, op, &a, &b)
                }
            }
        }
    }
}

fn rational_binary(ctx: &Context, op: BinaryOp, a: &Value, b: &Value) -> Result<Value> {
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul => {
            let a = promote_rational(a)?;
            let b = promote_rational(b)?;
            Ok(Value::Rational(match op {
                BinaryOp::Add => &a + &b,
                BinaryOp::Sub => &a - &b,
                _ => &a * &b,
            }))
        }
        BinaryOp::Div => exact_div(ctx, op, a, b),
        BinaryOp::Pow => {
            // an integral exponent in machine range keeps the ratio exact,
            // matching the integer kernel; a negative exponent inverts the
            // ratio, so a zero base is a division by zero
            if let Some(exp) = integral_exponent(b).and_then(|e| i32::try_from(e).ok()) {
                let base = promote_rational(a)?;
                if exp < 0 && base.is_zero() {
                    ctx.raise(Flags::DIVIDE_BY_ZERO);
                    return Err(Error::DivisionByZero(op.name()));
                }
                let result = rug::Rational::from(base.as_rug().pow(exp));
                return Ok(Value::Rational(Rational::from_rug(result)));
            }
            let a = promote_real(ctx, a)?;
            let b = promote_real(ctx, b)?;
            real_binary(ctx, op, &a, &b)
        }
    }
}

/// The exponent as a machine integer when it is integral-valued, whichever
/// exact kind carries it.
fn integral_exponent(b: &Value) -> Option<i64> {
    match b {
        Value::Integer(x) => x.to_i64(),
        Value::Rational(q) if q.is_integer() => q.numer().to_i64(),
        _ => None,
    }
}

/// True division in the exact domain.
///
/// With `rational_division` enabled the quotient is an exact `Rational`; a
/// zero divisor is a division-by-zero condition with no representable result,
/// so it errors regardless of the trap setting (after committing the flag).
/// Otherwise division promotes to the float kernel, where a zero divisor
/// produces a correctly-signed infinity under the usual flag/trap rules.
fn exact_div(ctx: &Context, op: BinaryOp, a: &Value, b: &Value) -> Result<Value> {
    if ctx.rational_division() {
        let a = promote_rational(a)?;
        let b = promote_rational(b)?;
        if b.is_zero() {
            ctx.raise(Flags::DIVIDE_BY_ZERO);
            return Err(Error::DivisionByZero(op.name()));
        }
        let quotient = rug::Rational::from(a.as_rug() / b.as_rug());
        return Ok(Value::Rational(Rational::from_rug(quotient)));
    }
    let a = promote_real(ctx, a)?;
    let b = promote_real(ctx, b)?;
    real_binary(ctx, op, &a, &b)
}

fn real_binary(ctx: &Context, op: BinaryOp, a: &Real, b: &Real) -> Result<Value> {
    let p = ctx.precision();
    let rm = ctx.round().to_rug();
    let result = match op {
        BinaryOp::Add => cleanup::real_op(ctx, op.name(), || {
            rug::Float::with_val_round(p, a.as_rug() + b.as_rug(), rm)
        }),
        BinaryOp::Sub => cleanup::real_op(ctx, op.name(), || {
            rug::Float::with_val_round(p, a.as_rug() - b.as_rug(), rm)
        }),
        BinaryOp::Mul => cleanup::real_op(ctx, op.name(), || {
            rug::Float::with_val_round(p, a.as_rug() * b.as_rug(), rm)
        }),
        BinaryOp::Div => cleanup::real_op(ctx, op.name(), || {
            rug::Float::with_val_round(p, a.as_rug() / b.as_rug(), rm)
        }),
        BinaryOp::Pow => {
            // a negative base with a non-integer exponent is undefined on the
            // real line; retry through the complex kernel when permitted
            if ctx.allow_complex()
                && a.as_rug().cmp0() == Some(Ordering::Less)
                && !b.as_rug().is_integer()
            {
                let za = Complex::from_real(ctx, Prec::Context, a)?;
                let zb = Complex::from_real(ctx, Prec::Context, b)?;
                return complex_binary(ctx, op, &za, &zb).map(Value::Complex);
            }
            cleanup::real_op(ctx, op.name(), || {
                rug::Float::with_val_round(p, a.as_rug().pow(b.as_rug()), rm)
            })
        }
    }?;
    Ok(Value::Real(result))
}

fn exact_unary(ctx: &Context, op: UnaryOp, a: &Value) -> Result<Value> {
    match (op, a) {
        (UnaryOp::Neg, Value::Integer(x)) => Ok(Value::Integer(-x)),
        (UnaryOp::Neg, Value::Rational(x)) => Ok(Value::Rational(-x)),
        (UnaryOp::Abs, Value::Integer(x)) => Ok(Value::Integer(x.abs())),
        (UnaryOp::Abs, Value::Rational(x)) => Ok(Value::Rational(if x.sign() == Ordering::Less {
            -x
        } else {
            x.clone()
        })),
        _ => {
            let a = promote_real(ctx, a)?;
            real_unary(ctx, op, &a)
        }
    }
}

fn real_unary(ctx: &Context, op: UnaryOp, a: &Real) -> Result<Value> {
    let p = ctx.precision();
    let rm = ctx.round().to_rug();

    // real-undefined inputs promote to the complex kernel when permitted;
    // the imaginary part of the result carries the branch information
    let negative = a.as_rug().cmp0() == Some(Ordering::Less);
    if ctx.allow_complex() && negative && matches!(op, UnaryOp::Sqrt | UnaryOp::Ln) {
        let z = Complex::from_real(ctx, Prec::Context, a)?;
        return complex_unary(ctx, op, &z);
    }

    let result = match op {
        UnaryOp::Neg => cleanup::real_op(ctx, op.name(), || {
            rug::Float::with_val_round(p, -a.as_rug(), rm)
        }),
        UnaryOp::Abs => cleanup::real_op(ctx, op.name(), || {
            rug::Float::with_val_round(p, a.as_rug().abs_ref(), rm)
        }),
        UnaryOp::Sqrt => cleanup::real_op(ctx, op.name(), || {
            rug::Float::with_val_round(p, a.as_rug().sqrt_ref(), rm)
        }),
        UnaryOp::Exp => cleanup::real_op(ctx, op.name(), || {
            rug::Float::with_val_round(p, a.as_rug().exp_ref(), rm)
        }),
        UnaryOp::Ln => cleanup::real_op(ctx, op.name(), || {
            rug::Float::with_val_round(p, a.as_rug().ln_ref(), rm)
        }),
    }?;
    Ok(Value::Real(result))
}

fn complex_binary(ctx: &Context, op: BinaryOp, a: &Complex, b: &Complex) -> Result<Complex> {
    let prec = ctx.complex_prec();
    let rm = ctx.complex_round();
    match op {
        BinaryOp::Add => cleanup::complex_op(ctx, op.name(), || {
            rug::Complex::with_val_round(prec, a.as_rug() + b.as_rug(), rm)
        }),
        BinaryOp::Sub => cleanup::complex_op(ctx, op.name(), || {
            rug::Complex::with_val_round(prec, a.as_rug() - b.as_rug(), rm)
        }),
        BinaryOp::Mul => cleanup::complex_op(ctx, op.name(), || {
            rug::Complex::with_val_round(prec, a.as_rug() * b.as_rug(), rm)
        }),
        BinaryOp::Div => cleanup::complex_op(ctx, op.name(), || {
            rug::Complex::with_val_round(prec, a.as_rug() / b.as_rug(), rm)
        }),
        BinaryOp::Pow => cleanup::complex_op(ctx, op.name(), || {
            rug::Complex::with_val_round(prec, a.as_rug().pow(b.as_rug()), rm)
        }),
    }
}

fn complex_unary(ctx: &Context, op: UnaryOp, a: &Complex) -> Result<Value> {
    let prec = ctx.complex_prec();
    let rm = ctx.complex_round();
    match op {
        UnaryOp::Neg => cleanup::complex_op(ctx, op.name(), || {
            rug::Complex::with_val_round(prec, -a.as_rug(), rm)
        })
        .map(Value::Complex),
        UnaryOp::Sqrt => cleanup::complex_op(ctx, op.name(), || {
            rug::Complex::with_val_round(prec, a.as_rug().sqrt_ref(), rm)
        })
        .map(Value::Complex),
        UnaryOp::Exp => cleanup::complex_op(ctx, op.name(), || {
            rug::Complex::with_val_round(prec, a.as_rug().exp_ref(), rm)
        })
        .map(Value::Complex),
        UnaryOp::Ln => cleanup::complex_op(ctx, op.name(), || {
            rug::Complex::with_val_round(prec, a.as_rug().ln_ref(), rm)
        })
        .map(Value::Complex),
        // the modulus of a complex value is a real
        UnaryOp::Abs => cleanup::real_op(ctx, op.name(), || {
            rug::Float::with_val_round(ctx.precision(), a.as_rug().abs_ref(), ctx.round().to_rug())
        })
        .map(Value::Real),
    }
}

fn bad_operand(op: &'static str) -> Error {
    Error::type_error(format!("mismatched operand kinds for {op}"))
}

impl Context {
    /// Adds two values under this context.
    ///
    /// # Errors
    ///
    /// See [`binary`].
    pub fn add(&self, a: impl Into<Value>, b: impl Into<Value>) -> Result<Value> {
        binary(self, BinaryOp::Add, &a.into(), &b.into())
    }

    /// Subtracts `b` from `a` under this context.
    ///
    /// # Errors
    ///
    /// See [`binary`].
    pub fn sub(&self, a: impl Into<Value>, b: impl Into<Value>) -> Result<Value> {
        binary(self, BinaryOp::Sub, &a.into(), &b.into())
    }

    /// Multiplies two values under this context.
    ///
    /// # Errors
    ///
    /// See [`binary`].
    pub fn mul(&self, a: impl Into<Value>, b: impl Into<Value>) -> Result<Value> {
        binary(self, BinaryOp::Mul, &a.into(), &b.into())
    }

    /// Divides `a` by `b` under this context.
    ///
    /// # Errors
    ///
    /// See [`binary`] and [`exact_div`].
    pub fn div(&self, a: impl Into<Value>, b: impl Into<Value>) -> Result<Value> {
        binary(self, BinaryOp::Div, &a.into(), &b.into())
    }

    /// Raises `a` to the power `b` under this context.
    ///
    /// # Errors
    ///
    /// See [`binary`].
    pub fn pow(&self, a: impl Into<Value>, b: impl Into<Value>) -> Result<Value> {
        binary(self, BinaryOp::Pow, &a.into(), &b.into())
    }

    /// Negates a value under this context.
    ///
    /// # Errors
    ///
    /// See [`unary`].
    pub fn neg(&self, a: impl Into<Value>) -> Result<Value> {
        unary(self, UnaryOp::Neg, &a.into())
    }

    /// Absolute value (complex modulus) under this context.
    ///
    /// # Errors
    ///
    /// See [`unary`].
    pub fn abs(&self, a: impl Into<Value>) -> Result<Value> {
        unary(self, UnaryOp::Abs, &a.into())
    }

    /// Square root under this context.
    ///
    /// # Errors
    ///
    /// See [`unary`].
    pub fn sqrt(&self, a: impl Into<Value>) -> Result<Value> {
        unary(self, UnaryOp::Sqrt, &a.into())
    }

    /// Natural exponential under this context.
    ///
    /// # Errors
    ///
    /// See [`unary`].
    pub fn exp(&self, a: impl Into<Value>) -> Result<Value> {
        unary(self, UnaryOp::Exp, &a.into())
    }

    /// Natural logarithm under this context.
    ///
    /// # Errors
    ///
    /// See [`unary`].
    pub fn ln(&self, a: impl Into<Value>) -> Result<Value> {
        unary(self, UnaryOp::Ln, &a.into())
    }
}

macro_rules! active_binary {
    ($(#[$doc:meta])* $name:ident, $op:expr) => {
        $(#[$doc])*
        ///
        /// Uses the thread-local active context.
        ///
        /// # Errors
        ///
        /// See [`binary`].
        pub fn $name(a: impl Into<Value>, b: impl Into<Value>) -> Result<Value> {
            let (a, b) = (a.into(), b.into());
            with_active(|ctx| binary(ctx, $op, &a, &b))
        }
    };
}

macro_rules! active_unary {
    ($(#[$doc:meta])* $name:ident, $op:expr) => {
        $(#[$doc])*
        ///
        /// Uses the thread-local active context.
        ///
        /// # Errors
        ///
        /// See [`unary`].
        pub fn $name(a: impl Into<Value>) -> Result<Value> {
            let a = a.into();
            with_active(|ctx| unary(ctx, $op, &a))
        }
    };
}

active_binary!(
    /// Adds two values.
    add,
    BinaryOp::Add
);
active_binary!(
    /// Subtracts the second value from the first.
    sub,
    BinaryOp::Sub
);
active_binary!(
    /// Multiplies two values.
    mul,
    BinaryOp::Mul
);
active_binary!(
    /// Divides the first value by the second.
    div,
    BinaryOp::Div
);
active_binary!(
    /// Raises the first value to the power of the second.
    pow,
    BinaryOp::Pow
);
active_unary!(
    /// Negates a value.
    neg,
    UnaryOp::Neg
);
active_unary!(
    /// Absolute value (complex modulus).
    abs,
    UnaryOp::Abs
);
active_unary!(
    /// Square root.
    sqrt,
    UnaryOp::Sqrt
);
active_unary!(
    /// Natural exponential.
    exp,
    UnaryOp::Exp
);
active_unary!(
    /// Natural logarithm.
    ln,
    UnaryOp::Ln
);
