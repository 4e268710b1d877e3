//! Post-operation cleanup protocol for `Real` and `Complex` results.
//!
//! Every operation that produces a floating-point or complex value runs the
//! same four-step sequence after the native kernel call:
//!
//! 1. range-check the result against the context's exponent bounds
//!    (temporarily installing them as the library's global bounds),
//! 2. subnormalize it if the context asks for gradual underflow,
//! 3. merge the kernel's sticky condition bits into the context flags,
//! 4. raise the first enabled trap, in a fixed condition order, discarding
//!    the result.
//!
//! The protocol is implemented once and shared by both kinds; a `Complex`
//! result runs steps 1-2 independently per component and a trap fires if
//! either component triggers it.
//!
//! The library's exponent-bound registers and sticky flags are process-global
//! state and the save/restore around the range check is not reentrant, so the
//! kernel-plus-cleanup sequence runs under a process-wide mutex.

use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard};

use gmp_mpfr_sys::mpfr;

use crate::context::{ternary_from_raw, ternary_to_raw, Context, Flags};
use crate::value::{Complex, Real};
use crate::{Error, Result};

/// Serializes access to the library's global exponent bounds and sticky
/// flags.
static LIB_STATE: Mutex<()> = Mutex::new(());

fn lock_lib() -> MutexGuard<'static, ()> {
    // a poisoned lock only means another thread panicked mid-operation; the
    // guarded registers are restored by BoundsGuard regardless
    LIB_STATE.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Saves the library's global exponent bounds, installs the context's, and
/// restores the saved bounds on drop. Caller must hold [`LIB_STATE`].
struct BoundsGuard {
    saved_emin: mpfr::exp_t,
    saved_emax: mpfr::exp_t,
}

impl BoundsGuard {
    fn install(ctx: &Context) -> Self {
        unsafe {
            let saved_emin = mpfr::get_emin();
            let saved_emax = mpfr::get_emax();
            // bounds were validated by the context setters
            let _ = mpfr::set_emin(ctx.emin() as mpfr::exp_t);
            let _ = mpfr::set_emax(ctx.emax() as mpfr::exp_t);
            BoundsGuard {
                saved_emin,
                saved_emax,
            }
        }
    }
}

impl Drop for BoundsGuard {
    fn drop(&mut self) {
        unsafe {
            let _ = mpfr::set_emin(self.saved_emin);
            let _ = mpfr::set_emax(self.saved_emax);
        }
    }
}

/// Steps 1-2 for one float component. Caller must hold [`LIB_STATE`].
fn range_check(ctx: &Context, value: &mut rug::Float, rc: Ordering, rnd: mpfr::rnd_t) -> Ordering {
    let _bounds = BoundsGuard::install(ctx);
    unsafe {
        let mut t = ternary_to_raw(rc);
        t = mpfr::check_range(value.as_raw_mut(), t, rnd);
        if ctx.subnormalize() {
            t = mpfr::subnormalize(value.as_raw_mut(), t, rnd);
        }
        ternary_from_raw(t)
    }
}

/// Reads the library's sticky condition bits. Caller must hold [`LIB_STATE`].
fn sticky_conditions() -> Flags {
    let mut flags = Flags::empty();
    unsafe {
        if mpfr::underflow_p() != 0 {
            flags |= Flags::UNDERFLOW;
        }
        if mpfr::overflow_p() != 0 {
            flags |= Flags::OVERFLOW;
        }
        if mpfr::inexflag_p() != 0 {
            flags |= Flags::INEXACT;
        }
        if mpfr::nanflag_p() != 0 {
            flags |= Flags::INVALID;
        }
        if mpfr::divby0_p() != 0 {
            flags |= Flags::DIVIDE_BY_ZERO;
        }
        if mpfr::erangeflag_p() != 0 {
            flags |= Flags::RANGE;
        }
    }
    flags
}

/// Steps 3-4: commits `conditions` into the context's sticky flags, then
/// checks traps in the fixed order underflow, overflow, inexact, invalid,
/// divide-by-zero, range. The first enabled-and-set trap wins.
///
/// Flags are committed before a trap raises, matching the reference library:
/// after a trapped operation the condition is both raised and recorded.
pub(crate) fn apply_traps(ctx: &Context, conditions: Flags, op: &'static str) -> Result<()> {
    ctx.raise(conditions);
    let order: [(Flags, fn(&'static str) -> Error); 6] = [
        (Flags::UNDERFLOW, Error::Underflow),
        (Flags::OVERFLOW, Error::Overflow),
        (Flags::INEXACT, Error::Inexact),
        (Flags::INVALID, Error::InvalidOperation),
        (Flags::DIVIDE_BY_ZERO, Error::DivisionByZero),
        (Flags::RANGE, Error::RangeError),
    ];
    for (condition, make_error) in order {
        if conditions.contains(condition) && ctx.trap_enabled(condition) {
            return Err(make_error(op));
        }
    }
    Ok(())
}

/// Runs a `Real`-producing kernel and the full cleanup protocol.
///
/// The kernel returns the raw float and the rounding-direction ternary of the
/// defining operation. On a firing trap the result is dropped and the
/// condition's error is returned instead.
pub(crate) fn real_op(
    ctx: &Context,
    op: &'static str,
    kernel: impl FnOnce() -> (rug::Float, Ordering),
) -> Result<Real> {
    let (value, rc, conditions) = {
        let _lock = lock_lib();
        unsafe { mpfr::clear_flags() };
        let (mut value, rc) = kernel();
        let rc = range_check(ctx, &mut value, rc, ctx.round().to_raw());
        let mut conditions = sticky_conditions();
        if rc != Ordering::Equal {
            conditions |= Flags::INEXACT;
        }
        (value, rc, conditions)
    };
    apply_traps(ctx, conditions, op)?;
    Ok(Real::from_parts(value, rc))
}

/// Runs a `Complex`-producing kernel and the full cleanup protocol, applying
/// the range-check and subnormalization steps independently to the real and
/// imaginary components.
pub(crate) fn complex_op(
    ctx: &Context,
    op: &'static str,
    kernel: impl FnOnce() -> (rug::Complex, (Ordering, Ordering)),
) -> Result<Complex> {
    let (value, rc, conditions) = {
        let _lock = lock_lib();
        unsafe { mpfr::clear_flags() };
        let (value, (rc_re, rc_im)) = kernel();
        let (mut re, mut im) = value.into_real_imag();
        let rc_re = range_check(ctx, &mut re, rc_re, ctx.real_round().to_raw());
        let rc_im = range_check(ctx, &mut im, rc_im, ctx.imag_round().to_raw());

        // the complex kernels route through the float library, but NaN
        // components are the authoritative invalid signal for this kind
        let mut conditions = sticky_conditions();
        if rc_re != Ordering::Equal || rc_im != Ordering::Equal {
            conditions |= Flags::INEXACT;
        }
        if re.is_nan() || im.is_nan() {
            conditions |= Flags::INVALID;
        }
        (rug::Complex::from((re, im)), (rc_re, rc_im), conditions)
    };
    apply_traps(ctx, conditions, op)?;
    Ok(Complex::from_parts(value, rc))
}
