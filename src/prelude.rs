//! # mpnum Prelude
//!
//! This module provides a convenient prelude for the most commonly used types
//! from the mpnum library. Import this module to get quick access to the
//! numeric tower, the context machinery, and the dispatch entry points.
//!
//! # Example
//!
//! ```rust
//! use mpnum::prelude::*;
//!
//! let mut ctx = Context::new();
//! ctx.set_precision(64)?;
//! let _guard = ctx.activate();
//! let r = mpnum::sqrt(2)?;
//! assert_eq!(r.as_real().unwrap().prec(), 64);
//! # Ok::<(), mpnum::Error>(())
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all mpnum operations
pub use crate::Error;

/// The result type used throughout mpnum
pub use crate::Result;

// ================================================================================================
// Context Machinery
// ================================================================================================

/// The numeric control block
pub use crate::context::Context;

/// RAII restoration of the previous active context
pub use crate::context::ContextGuard;

/// The five rounding modes
pub use crate::context::RoundMode;

/// Sticky condition bits, also used as the trap mask
pub use crate::context::Flags;

/// Thread-local active-context access
pub use crate::context::{active, set_active, with_active};

// ================================================================================================
// The Numeric Tower
// ================================================================================================

/// Exact integers, frozen and in-place variants
pub use crate::value::{Integer, MutInteger};

/// Exact rationals, including the non-finite sentinel forms
pub use crate::value::{Rational, RationalOrSpecial, SpecialRational};

/// Correctly-rounded binary floats
pub use crate::value::Real;

/// Complex values with per-component precision
pub use crate::value::Complex;

/// Text-rendering options shared by all kinds
pub use crate::value::FormatOptions;

// ================================================================================================
// Conversion and Dispatch
// ================================================================================================

/// One value of any tower kind
pub use crate::convert::Value;

/// Precision request: context default, natural, or explicit bits
pub use crate::convert::Prec;

/// Adapter traits for external exact and decimal host types
pub use crate::convert::{DecimalOperand, ExactOperand};

/// Result of operand classification
pub use crate::dispatch::NumericKind;

/// Host-side operand awaiting normalization
pub use crate::dispatch::HostOperand;

/// Operation selectors
pub use crate::dispatch::{BinaryOp, UnaryOp};

/// Classification and normalization entry points
pub use crate::dispatch::{classify, classify_host, normalize};

/// Explicit-context dispatch entry points
pub use crate::dispatch::{binary, unary};
