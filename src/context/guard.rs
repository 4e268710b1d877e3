//! Thread-local active context and scoped activation.

use std::cell::RefCell;

use super::Context;

thread_local! {
    static ACTIVE: RefCell<Context> = RefCell::new(Context::new());
}

/// Runs `f` with a shared borrow of the thread's active context.
///
/// This is the default-resolution step used at API boundaries: operations
/// without an explicit context argument read their configuration here.
///
/// # Panics
///
/// Panics if `f` replaces the active context (via [`set_active`] or
/// [`Context::activate`]) while the borrow is live.
pub fn with_active<R>(f: impl FnOnce(&Context) -> R) -> R {
    ACTIVE.with(|ctx| f(&ctx.borrow()))
}

/// Returns a snapshot of the thread's active context.
#[must_use]
pub fn active() -> Context {
    ACTIVE.with(|ctx| ctx.borrow().clone())
}

/// Replaces the thread's active context.
///
/// Prefer [`Context::activate`] for temporary replacement with automatic
/// restore.
pub fn set_active(ctx: Context) {
    ACTIVE.with(|slot| *slot.borrow_mut() = ctx);
}

/// Guard returned by [`Context::activate`]; restores the previously active
/// context when dropped.
///
/// The restore is unconditional: early returns, `?` propagation and unwinding
/// all run the destructor, so the prior context (precision, rounding, bounds
/// and flag state alike) is reinstated exactly as it was.
///
/// # Examples
///
/// ```
/// use mpnum::prelude::*;
///
/// let mut quad = Context::new();
/// quad.set_precision(113)?;
/// {
///     let _scope = quad.activate();
///     // operations in this scope default to 113-bit precision
/// }
/// // previous context restored here
/// # Ok::<(), mpnum::Error>(())
/// ```
#[must_use = "dropping the guard immediately restores the previous context"]
pub struct ContextGuard {
    saved: Option<Context>,
}

impl Context {
    /// Installs a clone of this context as the thread's active context and
    /// returns a guard that restores the previous one on drop.
    pub fn activate(&self) -> ContextGuard {
        let saved = active();
        set_active(self.clone());
        ContextGuard { saved: Some(saved) }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            set_active(saved);
        }
    }
}

impl std::fmt::Debug for ContextGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextGuard").finish_non_exhaustive()
    }
}
