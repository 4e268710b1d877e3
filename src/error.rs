use thiserror::Error;

use crate::context::Flags;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The taxonomy has three families:
///
/// ## Arithmetic conditions
/// - [`Error::Underflow`] - Result too small for the exponent range
/// - [`Error::Overflow`] - Result too large for the exponent range
/// - [`Error::Inexact`] - Result required rounding
/// - [`Error::InvalidOperation`] - Operation produced NaN
/// - [`Error::DivisionByZero`] - Exact division by zero, or a pole with the trap enabled
/// - [`Error::RangeError`] - Comparison or conversion left the representable range
///
/// These are raised only when the corresponding trap is enabled in the active
/// [`Context`](crate::context::Context); otherwise the condition is recorded as a sticky
/// flag and the operation returns its result (infinity, NaN, ...).
///
/// ## Type errors
/// - [`Error::Type`] - Operand kind unsupported or wrong argument shape
///
/// ## Value errors
/// - [`Error::Value`] - Malformed numeric input of any other sort
/// - [`Error::InvalidBase`] - Base outside 2..=62 (or the negative uppercase range)
/// - [`Error::EmbeddedNul`] - Numeric text contained a NUL byte
/// - [`Error::NonAscii`] - Numeric text contained non-ASCII bytes
/// - [`Error::InvalidPrecision`] - Precision outside the representable range
/// - [`Error::ExponentRange`] - Exponent bound outside the library's representable range
/// - [`Error::Lossy`] - Exact conversion was requested but rounding would occur
/// - [`Error::ParseNumber`] - Text did not parse as a number in the given base
#[derive(Error, Debug)]
pub enum Error {
    /// Result underflowed the active exponent range with the underflow trap enabled.
    #[error("underflow in {0}")]
    Underflow(&'static str),

    /// Result overflowed the active exponent range with the overflow trap enabled.
    #[error("overflow in {0}")]
    Overflow(&'static str),

    /// Result was rounded with the inexact trap enabled.
    #[error("inexact result in {0}")]
    Inexact(&'static str),

    /// Operation produced NaN with the invalid-operation trap enabled.
    #[error("invalid operation in {0}")]
    InvalidOperation(&'static str),

    /// Division by zero: either an exact (integer/rational) division whose divisor is zero,
    /// or a floating-point pole with the divide-by-zero trap enabled.
    #[error("division by zero in {0}")]
    DivisionByZero(&'static str),

    /// A comparison or conversion left the representable range with the range trap enabled.
    #[error("range error in {0}")]
    RangeError(&'static str),

    /// Operand kind is not supported by the numeric tower, or the argument shape is wrong.
    #[error("type error: {message}")]
    Type {
        /// What was wrong with the operand
        message: String,
    },

    /// Malformed input that is not covered by a more specific variant.
    #[error("value error: {message}")]
    Value {
        /// What was wrong with the value
        message: String,
    },

    /// Requested base is outside the supported range.
    ///
    /// Bases 2..=62 are accepted for parsing and rendering; rendering additionally
    /// accepts -36..=-2 for uppercase digits, and parsing accepts 0 for prefix
    /// auto-detection.
    #[error("base must be in 2..=62, got {base}")]
    InvalidBase {
        /// The rejected base
        base: i32,
    },

    /// Numeric text contained an embedded NUL byte.
    #[error("numeric text contains an embedded NUL byte")]
    EmbeddedNul,

    /// Numeric text contained non-ASCII characters.
    #[error("numeric text contains non-ASCII characters")]
    NonAscii,

    /// Precision outside the range accepted by the underlying float library.
    #[error("precision must be at least 2 bits, got {prec}")]
    InvalidPrecision {
        /// The rejected precision
        prec: i64,
    },

    /// Exponent bound outside the range representable by the underlying float library.
    #[error("exponent bound {value} outside representable range {min}..={max}")]
    ExponentRange {
        /// The rejected bound
        value: i64,
        /// Smallest accepted value for this bound
        min: i64,
        /// Largest accepted value for this bound
        max: i64,
    },

    /// Exact conversion was requested but the value does not convert without rounding.
    #[error("conversion to {target} would be lossy")]
    Lossy {
        /// Name of the conversion target
        target: &'static str,
    },

    /// Text did not parse as a number of the requested kind.
    #[error("invalid {kind} literal: {input:?}")]
    ParseNumber {
        /// The offending input text
        input: String,
        /// Kind of number that was expected ("integer", "rational", ...)
        kind: &'static str,
    },
}

impl Error {
    /// Returns the sticky-flag bit corresponding to this error, if it is an
    /// arithmetic condition; `None` for type and value errors.
    #[must_use]
    pub fn condition(&self) -> Option<Flags> {
        match self {
            Error::Underflow(_) => Some(Flags::UNDERFLOW),
            Error::Overflow(_) => Some(Flags::OVERFLOW),
            Error::Inexact(_) => Some(Flags::INEXACT),
            Error::InvalidOperation(_) => Some(Flags::INVALID),
            Error::DivisionByZero(_) => Some(Flags::DIVIDE_BY_ZERO),
            Error::RangeError(_) => Some(Flags::RANGE),
            _ => None,
        }
    }

    /// Convenience constructor for [`Error::Type`].
    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        Error::Type {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Value`].
    pub(crate) fn value_error(message: impl Into<String>) -> Self {
        Error::Value {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_mapping() {
        assert_eq!(Error::Underflow("add").condition(), Some(Flags::UNDERFLOW));
        assert_eq!(Error::Overflow("mul").condition(), Some(Flags::OVERFLOW));
        assert_eq!(Error::Inexact("div").condition(), Some(Flags::INEXACT));
        assert_eq!(
            Error::InvalidOperation("sqrt").condition(),
            Some(Flags::INVALID)
        );
        assert_eq!(
            Error::DivisionByZero("div").condition(),
            Some(Flags::DIVIDE_BY_ZERO)
        );
        assert_eq!(Error::EmbeddedNul.condition(), None);
        assert_eq!(
            Error::Type {
                message: "bad".to_string()
            }
            .condition(),
            None
        );
    }

    #[test]
    fn test_display_messages() {
        let err = Error::InvalidBase { base: 63 };
        assert_eq!(err.to_string(), "base must be in 2..=62, got 63");

        let err = Error::DivisionByZero("division");
        assert_eq!(err.to_string(), "division by zero in division");

        let err = Error::ParseNumber {
            input: "12z".to_string(),
            kind: "integer",
        };
        assert!(err.to_string().contains("integer"));
        assert!(err.to_string().contains("12z"));
    }
}
