//! Arbitrary-precision complex values: pairs of floats with independent
//! per-part precision.

use std::cmp::Ordering;
use std::fmt;

use crate::cleanup;
use crate::context::Context;
use crate::convert::Prec;
use crate::value::{check_render_base, FormatOptions, Real};
use crate::{Error, Result};

/// Arbitrary-precision binary complex value.
///
/// The real and imaginary components are independent floats and may carry
/// different precisions; the composite return code ([`Complex::rc`]) holds
/// one rounding-direction ternary per component.
///
/// # Examples
///
/// ```
/// use mpnum::prelude::*;
///
/// let ctx = Context::new();
/// let z = Complex::from_f64_pair(&ctx, Prec::Context, (1.5, -3.5))?;
/// assert_eq!(z.prec(), (53, 53));
/// # Ok::<(), mpnum::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Complex {
    inner: rug::Complex,
    rc: (Ordering, Ordering),
}

impl Complex {
    pub(crate) fn from_parts(inner: rug::Complex, rc: (Ordering, Ordering)) -> Self {
        Complex { inner, rc }
    }

    /// Borrows the underlying native complex value.
    #[must_use]
    pub fn as_rug(&self) -> &rug::Complex {
        &self.inner
    }

    /// Consumes `self`, returning the underlying native complex value.
    #[must_use]
    pub fn into_rug(self) -> rug::Complex {
        self.inner
    }

    /// Promotes a real value; the imaginary part is exact zero.
    ///
    /// With [`Prec::Natural`] both parts take the source's precision, so the
    /// promotion is exact; [`Prec::Context`] resolves the per-part precisions
    /// from the context and rounds the real part if needed.
    ///
    /// # Errors
    ///
    /// Propagates precision validation errors and trapped conditions.
    pub fn from_real(ctx: &Context, prec: Prec, value: &Real) -> Result<Self> {
        let (pre, pim) = resolve_prec_pair(ctx, prec, value.prec())?;
        let rm = ctx.complex_round();
        cleanup::complex_op(ctx, "complex conversion", || {
            rug::Complex::with_val_round((pre, pim), value.as_rug(), rm)
        })
    }

    /// Converts a native two-component complex pair.
    ///
    /// # Errors
    ///
    /// Propagates precision validation errors and trapped conditions.
    pub fn from_f64_pair(ctx: &Context, prec: Prec, value: (f64, f64)) -> Result<Self> {
        let (pre, pim) = resolve_prec_pair(ctx, prec, 53)?;
        let rm = ctx.complex_round();
        cleanup::complex_op(ctx, "complex conversion", || {
            rug::Complex::with_val_round((pre, pim), value, rm)
        })
    }

    /// Pairs two real values without rounding; each component keeps its own
    /// precision and return code.
    #[must_use]
    pub fn from_reals(re: Real, im: Real) -> Self {
        let rc = (re.rc(), im.rc());
        Complex {
            inner: rug::Complex::from((re.into_rug(), im.into_rug())),
            rc,
        }
    }

    /// The real component, carrying its ternary.
    #[must_use]
    pub fn real(&self) -> Real {
        Real::from_parts(self.inner.real().clone(), self.rc.0)
    }

    /// The imaginary component, carrying its ternary.
    #[must_use]
    pub fn imag(&self) -> Real {
        Real::from_parts(self.inner.imag().clone(), self.rc.1)
    }

    /// Splits into the two components.
    #[must_use]
    pub fn into_parts(self) -> (Real, Real) {
        let (rc_re, rc_im) = self.rc;
        let (re, im) = self.inner.into_real_imag();
        (Real::from_parts(re, rc_re), Real::from_parts(im, rc_im))
    }

    /// Per-part precisions in bits.
    #[must_use]
    pub fn prec(&self) -> (u32, u32) {
        self.inner.prec()
    }

    /// Composite return code: one rounding-direction ternary per component.
    #[must_use]
    pub fn rc(&self) -> (Ordering, Ordering) {
        self.rc
    }

    /// Whether either component is NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.inner.real().is_nan() || self.inner.imag().is_nan()
    }

    /// Whether both components are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.inner.real().is_zero() && self.inner.imag().is_zero()
    }

    /// Renders as `(real imaginary)` in the given base.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBase`] for a base outside 2..=36 (or the
    /// negative uppercase range).
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
        let body = if base < 0 {
            rendered.to_uppercase()
        } else {
            rendered
        };
        Ok(if opts.contains(FormatOptions::TAG) {
            format!("complex({body})")
        } else {
            body
        })
    }
}

fn resolve_prec_pair(ctx: &Context, prec: Prec, natural: u32) -> Result<(u32, u32)> {
    match prec {
        Prec::Context => Ok(ctx.complex_prec()),
        Prec::Natural => Ok((natural, natural)),
        Prec::Bits(_) => {
            let p = prec.resolve(ctx, natural)?;
            Ok((p, p))
        }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl PartialEq for Complex {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}
