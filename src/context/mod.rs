//! Numeric context: precision, rounding, exponent range and exception state.
//!
//! Every floating-point and complex operation in this crate reads its working
//! precision, rounding mode(s), exponent bounds and trap configuration from a
//! [`Context`]. A context is either passed explicitly (the `Context` methods in
//! [`crate::dispatch`]) or resolved from the thread-local active context (the
//! free functions there). The active context can be replaced for a scope with
//! [`Context::activate`], which returns a guard restoring the previous one on
//! drop - including on early return and unwinding.
//!
//! Contexts carry two bit sets of [`Flags`]:
//!
//! - *flags* are sticky: once an operation underflows, the [`Flags::UNDERFLOW`]
//!   bit stays set until [`Context::clear_flags`] is called, so a batch
//!   computation can run to completion and be checked afterwards;
//! - *traps* are configuration: a condition whose trap bit is enabled raises
//!   the corresponding [`Error`](crate::Error) immediately instead of
//!   returning a result.

mod guard;

use std::cell::Cell;
use std::cmp::Ordering;

use bitflags::bitflags;
use gmp_mpfr_sys::mpfr;
use strum::{Display, EnumIter, EnumString};

use crate::{Error, Result};

pub use guard::{active, set_active, with_active, ContextGuard};

/// Smallest precision accepted by this crate, in bits.
pub const PREC_MIN: u32 = 2;

/// Largest precision accepted by the underlying float library, in bits.
#[must_use]
pub fn prec_max() -> u32 {
    rug::float::prec_max()
}

/// Smallest value accepted for [`Context::emin`].
#[must_use]
pub fn emin_min() -> i64 {
    unsafe { mpfr::get_emin_min() as i64 }
}

/// Largest value accepted for [`Context::emax`].
#[must_use]
pub fn emax_max() -> i64 {
    unsafe { mpfr::get_emax_max() as i64 }
}

/// IEEE-754-style rounding mode for floating-point and complex operations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum RoundMode {
    /// Round to the nearest representable value, ties to even (the default).
    #[default]
    Nearest,
    /// Round toward zero (truncate).
    Zero,
    /// Round toward positive infinity.
    Up,
    /// Round toward negative infinity.
    Down,
    /// Round away from zero.
    AwayZero,
}

impl RoundMode {
    /// The corresponding `rug` rounding mode.
    #[must_use]
    pub fn to_rug(self) -> rug::float::Round {
        match self {
            RoundMode::Nearest => rug::float::Round::Nearest,
            RoundMode::Zero => rug::float::Round::Zero,
            RoundMode::Up => rug::float::Round::Up,
            RoundMode::Down => rug::float::Round::Down,
            RoundMode::AwayZero => rug::float::Round::AwayZero,
        }
    }

    /// The corresponding raw MPFR rounding mode, for the range-check and
    /// subnormalization primitives.
    pub(crate) fn to_raw(self) -> mpfr::rnd_t {
        match self {
            RoundMode::Nearest => mpfr::rnd_t::RNDN,
            RoundMode::Zero => mpfr::rnd_t::RNDZ,
            RoundMode::Up => mpfr::rnd_t::RNDU,
            RoundMode::Down => mpfr::rnd_t::RNDD,
            RoundMode::AwayZero => mpfr::rnd_t::RNDA,
        }
    }
}

bitflags! {
    /// Arithmetic condition bits, used both for the sticky flag set and for the
    /// trap configuration of a [`Context`].
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u32 {
        /// A result was smaller in magnitude than the exponent range permits.
        const UNDERFLOW = 1 << 0;
        /// A result was larger in magnitude than the exponent range permits.
        const OVERFLOW = 1 << 1;
        /// A result had to be rounded.
        const INEXACT = 1 << 2;
        /// An operation produced NaN.
        const INVALID = 1 << 3;
        /// A finite value was divided by zero.
        const DIVIDE_BY_ZERO = 1 << 4;
        /// A comparison or conversion left the representable range.
        const RANGE = 1 << 5;
    }
}

/// Configuration record governing precision, rounding, exponent range,
/// subnormalization and exception behavior.
///
/// One context per thread is active at all times (see [`active`]); operations
/// may alternatively receive an explicit context. Mutating a field takes
/// effect for all subsequent operations that read this context; completed
/// operations are unaffected.
///
/// The sticky flag set uses interior mutability so that operations can record
/// conditions through a shared `&Context`. A `Context` is consequently not
/// `Sync`; sharing one across threads is a design error (see the crate-level
/// concurrency notes).
///
/// # Examples
///
/// ```
/// use mpnum::prelude::*;
///
/// let mut ctx = Context::new();
/// ctx.set_precision(113)?;
/// ctx.set_round(RoundMode::Zero);
/// ctx.set_traps(Flags::OVERFLOW | Flags::DIVIDE_BY_ZERO);
/// # Ok::<(), mpnum::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    precision: u32,
    real_prec: Option<u32>,
    imag_prec: Option<u32>,
    round: RoundMode,
    real_round: Option<RoundMode>,
    imag_round: Option<RoundMode>,
    emin: i64,
    emax: i64,
    subnormalize: bool,
    allow_complex: bool,
    rational_division: bool,
    traps: Flags,
    flags: Cell<Flags>,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            precision: 53,
            real_prec: None,
            imag_prec: None,
            round: RoundMode::Nearest,
            real_round: None,
            imag_round: None,
            emin: emin_min(),
            emax: emax_max(),
            subnormalize: false,
            allow_complex: true,
            rational_division: false,
            traps: Flags::empty(),
            flags: Cell::new(Flags::empty()),
        }
    }
}

impl Context {
    /// Creates a context with the default configuration: 53-bit precision,
    /// round to nearest, the widest exponent range the library supports, no
    /// subnormalization, complex promotion allowed, no traps, no flags set.
    #[must_use]
    pub fn new() -> Self {
        Context::default()
    }

    /// Creates a context mirroring IEEE-754 binary64 arithmetic: 53-bit
    /// precision, exponent range [-1073, 1024], subnormalization enabled.
    ///
    /// # Errors
    ///
    /// Never fails on a standard build of the underlying library; propagates
    /// [`Error::ExponentRange`] if the library was built with a narrower
    /// exponent type.
    pub fn ieee_binary64() -> Result<Self> {
        let mut ctx = Context::new();
        ctx.set_precision(53)?;
        // emin counts the exponent of the most significant bit: the smallest
        // binary64 subnormal 2^-1074 has emin = -1073 in MPFR terms.
        ctx.set_emin(-1073)?;
        ctx.set_emax(1024)?;
        ctx.set_subnormalize(true);
        Ok(ctx)
    }

    /// Working precision in bits for `Real` results.
    #[must_use]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Sets the working precision in bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrecision`] unless `2 <= prec <= prec_max()`.
    pub fn set_precision(&mut self, prec: u32) -> Result<()> {
        if prec < PREC_MIN || prec > prec_max() {
            return Err(Error::InvalidPrecision {
                prec: i64::from(prec),
            });
        }
        self.precision = prec;
        Ok(())
    }

    /// Working precision for the real part of `Complex` results; follows
    /// [`Context::precision`] unless overridden.
    #[must_use]
    pub fn real_prec(&self) -> u32 {
        self.real_prec.unwrap_or(self.precision)
    }

    /// Overrides the real-part precision for `Complex` results, or restores
    /// the follow-`precision` default with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrecision`] for an out-of-range override.
    pub fn set_real_prec(&mut self, prec: Option<u32>) -> Result<()> {
        if let Some(p) = prec {
            if p < PREC_MIN || p > prec_max() {
                return Err(Error::InvalidPrecision { prec: i64::from(p) });
            }
        }
        self.real_prec = prec;
        Ok(())
    }

    /// Working precision for the imaginary part of `Complex` results; follows
    /// [`Context::real_prec`] unless overridden.
    #[must_use]
    pub fn imag_prec(&self) -> u32 {
        self.imag_prec.unwrap_or_else(|| self.real_prec())
    }

    /// Overrides the imaginary-part precision for `Complex` results.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrecision`] for an out-of-range override.
    pub fn set_imag_prec(&mut self, prec: Option<u32>) -> Result<()> {
        if let Some(p) = prec {
            if p < PREC_MIN || p > prec_max() {
                return Err(Error::InvalidPrecision { prec: i64::from(p) });
            }
        }
        self.imag_prec = prec;
        Ok(())
    }

    /// Rounding mode for `Real` results.
    #[must_use]
    pub fn round(&self) -> RoundMode {
        self.round
    }

    /// Sets the rounding mode for `Real` results.
    pub fn set_round(&mut self, round: RoundMode) {
        self.round = round;
    }

    /// Rounding mode for the real part of `Complex` results; follows
    /// [`Context::round`] unless overridden.
    #[must_use]
    pub fn real_round(&self) -> RoundMode {
        self.real_round.unwrap_or(self.round)
    }

    /// Overrides the real-part rounding mode for `Complex` results.
    pub fn set_real_round(&mut self, round: Option<RoundMode>) {
        self.real_round = round;
    }

    /// Rounding mode for the imaginary part of `Complex` results; follows
    /// [`Context::real_round`] unless overridden.
    #[must_use]
    pub fn imag_round(&self) -> RoundMode {
        self.imag_round.unwrap_or_else(|| self.real_round())
    }

    /// Overrides the imaginary-part rounding mode for `Complex` results.
    pub fn set_imag_round(&mut self, round: Option<RoundMode>) {
        self.imag_round = round;
    }

    /// Minimum exponent for `Real`/`Complex` results.
    #[must_use]
    pub fn emin(&self) -> i64 {
        self.emin
    }

    /// Sets the minimum exponent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExponentRange`] if `emin` lies outside the range the
    /// underlying library can install, or above the current `emax`.
    pub fn set_emin(&mut self, emin: i64) -> Result<()> {
        let min = emin_min();
        if emin < min || emin > self.emax {
            return Err(Error::ExponentRange {
                value: emin,
                min,
                max: self.emax,
            });
        }
        self.emin = emin;
        Ok(())
    }

    /// Maximum exponent for `Real`/`Complex` results.
    #[must_use]
    pub fn emax(&self) -> i64 {
        self.emax
    }

    /// Sets the maximum exponent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExponentRange`] if `emax` lies outside the range the
    /// underlying library can install, or below the current `emin`.
    pub fn set_emax(&mut self, emax: i64) -> Result<()> {
        let max = emax_max();
        if emax > max || emax < self.emin {
            return Err(Error::ExponentRange {
                value: emax,
                min: self.emin,
                max,
            });
        }
        self.emax = emax;
        Ok(())
    }

    /// Whether results in the subnormal band are re-rounded at the reduced
    /// effective precision, emulating gradual underflow.
    #[must_use]
    pub fn subnormalize(&self) -> bool {
        self.subnormalize
    }

    /// Enables or disables subnormalization.
    pub fn set_subnormalize(&mut self, enable: bool) {
        self.subnormalize = enable;
    }

    /// Whether real operations that are undefined on the real line for a given
    /// input (for example the square root of a negative value) may promote to
    /// the complex domain instead of producing NaN.
    #[must_use]
    pub fn allow_complex(&self) -> bool {
        self.allow_complex
    }

    /// Enables or disables complex promotion of real-undefined results.
    pub fn set_allow_complex(&mut self, enable: bool) {
        self.allow_complex = enable;
    }

    /// Whether integer/rational true division yields an exact `Rational`
    /// instead of promoting to `Real`.
    #[must_use]
    pub fn rational_division(&self) -> bool {
        self.rational_division
    }

    /// Enables or disables exact rational division.
    pub fn set_rational_division(&mut self, enable: bool) {
        self.rational_division = enable;
    }

    /// The trap configuration: conditions whose bit is set raise an error
    /// instead of returning a result.
    #[must_use]
    pub fn traps(&self) -> Flags {
        self.traps
    }

    /// Replaces the trap configuration.
    pub fn set_traps(&mut self, traps: Flags) {
        self.traps = traps;
    }

    /// Whether the trap for `condition` is enabled.
    #[must_use]
    pub fn trap_enabled(&self, condition: Flags) -> bool {
        self.traps.intersects(condition)
    }

    /// The sticky flag set.
    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags.get()
    }

    /// ORs `conditions` into the sticky flag set.
    pub fn raise(&self, conditions: Flags) {
        self.flags.set(self.flags.get() | conditions);
    }

    /// Clears the sticky flag set.
    pub fn clear_flags(&self) {
        self.flags.set(Flags::empty());
    }

    /// Whether any of `conditions` has occurred since the flags were last
    /// cleared.
    #[must_use]
    pub fn test(&self, conditions: Flags) -> bool {
        self.flags.get().intersects(conditions)
    }

    /// Resolved precision pair for a `Complex` result.
    pub(crate) fn complex_prec(&self) -> (u32, u32) {
        (self.real_prec(), self.imag_prec())
    }

    /// Resolved rounding pair for a `Complex` result.
    pub(crate) fn complex_round(&self) -> (rug::float::Round, rug::float::Round) {
        (self.real_round().to_rug(), self.imag_round().to_rug())
    }
}

/// Converts a rounding-direction ternary from the underlying library into the
/// raw `c_int` form consumed by the range-check primitive.
pub(crate) fn ternary_to_raw(t: Ordering) -> i32 {
    match t {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Converts a raw ternary back into an [`Ordering`].
pub(crate) fn ternary_from_raw(t: i32) -> Ordering {
    t.cmp(&0)
}
