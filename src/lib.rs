// Copyright 2025 The mpnum project developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'cleanup.rs' drives the float library's global exponent-bound and
//   sticky-flag registers through the raw bindings
// - 'value/real.rs' renders digit strings through the raw bindings for
//   bases the high-level API does not cover

//! # mpnum
//!
//! Arbitrary-precision arithmetic with a controllable numeric context,
//! built on GMP and MPFR through the [`rug`] crate.
//!
//! `mpnum` provides a four-kind numeric tower - exact integers, exact
//! rationals, correctly-rounded binary floats, and complex values with
//! independently-rounded components - together with a [`Context`] that
//! governs precision, rounding, exponent range, gradual underflow, sticky
//! condition flags, and traps for every inexact operation.
//!
//! ## Features
//!
//! - **Exact integer and rational arithmetic** - Results never leave the
//!   exact domain until an operation requires rounding
//! - **Correctly-rounded floats** - Any precision from 2 bits up, five
//!   rounding modes, per-operation rounding-direction ternaries
//! - **Complex values** - Independent precision and rounding mode per
//!   component
//! - **Context discipline** - Thread-local active context with scoped
//!   override, IEEE-style sticky flags, and per-condition traps
//! - **Radix conversion** - Integer parsing and rendering in any base from
//!   2 to 62, with prefix auto-detection
//!
//! ## Quick Start
//!
//! Add `mpnum` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! mpnum = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the
//! prelude:
//!
//! ```rust
//! use mpnum::prelude::*;
//!
//! let ctx = Context::new();
//! let sum = ctx.add(Integer::from(1), Rational::from_pair(1.into(), 2.into())?)?;
//! assert_eq!(sum.kind(), NumericKind::Rational);
//! # Ok::<(), mpnum::Error>(())
//! ```
//!
//! ### Scoped Contexts
//!
//! A context can be activated for the current thread; the previous active
//! context is restored when the guard drops, even on panic:
//!
//! ```rust
//! use mpnum::prelude::*;
//!
//! let mut ctx = Context::new();
//! ctx.set_precision(113)?;
//! {
//!     let _guard = ctx.activate();
//!     let third = mpnum::div(1, 3)?;
//!     assert_eq!(third.as_real().unwrap().prec(), 113);
//! }
//! // back to the 53-bit default here
//! # Ok::<(), mpnum::Error>(())
//! ```
//!
//! ### Flags and Traps
//!
//! Conditions raised by an operation accumulate in the context's sticky
//! flags; enabling a trap turns the condition into an error instead of a
//! substituted result:
//!
//! ```rust
//! use mpnum::prelude::*;
//!
//! let ctx = Context::new();
//! let inf = ctx.div(1, 0)?;
//! assert!(inf.as_real().unwrap().is_infinite());
//! assert!(ctx.test(Flags::DIVIDE_BY_ZERO));
//!
//! let mut trapping = Context::new();
//! trapping.set_traps(Flags::DIVIDE_BY_ZERO);
//! assert!(trapping.div(1, 0).is_err());
//! # Ok::<(), mpnum::Error>(())
//! ```
//!
//! ## Architecture
//!
//! The crate is organized in layers. [`value`] holds the four numeric kinds
//! and their conversions to and from text and native types. [`context`]
//! holds the [`Context`] itself plus the thread-local activation machinery.
//! [`convert`] defines the dynamically-typed [`Value`] wrapper, the
//! precision-request sentinel [`Prec`], and the adapter traits for external
//! exact and decimal host types. [`dispatch`] classifies operands and routes
//! every operation to the kernel of the highest operand kind. The
//! post-operation protocol shared by all float and complex kernels (range
//! check, subnormalization, flag merge, trap check) lives in one private
//! module and is never bypassed.

pub(crate) mod cleanup;
pub mod prelude;

/// Numeric context: precision, rounding, exponent bounds, flags, and traps.
///
/// The [`Context`] is the control block for every inexact operation. It can
/// be passed explicitly to the operation methods, or installed as the
/// thread-local active context with [`Context::activate`] and picked up by
/// the free functions ([`add`], [`div`], ...).
///
/// # Key Types
///
/// - [`Context`] - The control block itself
/// - [`context::ContextGuard`] - RAII restoration of the previous active
///   context
/// - [`context::RoundMode`] - The five rounding modes
/// - [`context::Flags`] - Sticky condition bits, also used as the trap mask
pub mod context;

/// Dynamically-typed values, precision requests, and host-type adapters.
///
/// # Key Types
///
/// - [`Value`] - One value of any tower kind
/// - [`convert::Prec`] - Precision request: context default, natural, or
///   explicit bits
/// - [`convert::ExactOperand`] / [`convert::DecimalOperand`] - Adapter
///   traits for external host types that normalize into the tower
pub mod convert;

/// Operand classification and operation dispatch.
///
/// Every operation classifies its operands into [`dispatch::NumericKind`],
/// promotes to the higher kind, and runs that kind's kernel. Free-function
/// forms use the thread-local active context; the [`Context`] methods take
/// it explicitly.
///
/// # Key Types
///
/// - [`dispatch::NumericKind`] - Result of classification
/// - [`dispatch::BinaryOp`] / [`dispatch::UnaryOp`] - Operation selectors
/// - [`dispatch::HostOperand`] - Host-side operand awaiting normalization
pub mod dispatch;

/// The numeric tower: integers, rationals, reals, and complex values.
///
/// # Key Types
///
/// - [`value::Integer`] / [`value::MutInteger`] - Exact integers, frozen
///   and in-place variants
/// - [`value::Rational`] - Exact rationals in canonical form
/// - [`value::Real`] - Correctly-rounded binary floats carrying their
///   rounding-direction ternary
/// - [`value::Complex`] - Complex values with per-component precision
pub mod value;

mod error;

/// `mpnum` Result type
///
/// Standard result alias used throughout the crate.
///
/// # Examples
///
/// ```rust
/// use mpnum::{Result, Integer};
///
/// fn parse_hex(src: &str) -> Result<Integer> {
///     Integer::from_str_radix(src, 16)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `mpnum` Error type
///
/// The main error type for all operations in this crate: arithmetic
/// conditions promoted to errors by an enabled trap, conversion and parse
/// failures, and invalid configuration.
///
/// # Examples
///
/// ```rust
/// use mpnum::{Error, Integer};
///
/// match Integer::from_str_radix("12z", 10) {
///     Ok(n) => println!("parsed {}", n),
///     Err(Error::ParseNumber { input, .. }) => println!("bad input: {}", input),
///     Err(e) => println!("error: {}", e),
/// }
/// ```
pub use error::Error;

/// The numeric control block.
///
/// See [`context::Context`] for precision, rounding, exponent bounds,
/// flags, and traps.
pub use context::Context;

/// One value of any tower kind.
///
/// See [`convert::Value`] for classification and extraction.
pub use convert::Value;

/// The four concrete numeric kinds.
pub use value::{Complex, Integer, MutInteger, Rational, Real};

/// Arithmetic through the thread-local active context.
pub use dispatch::{abs, add, div, exp, ln, mul, neg, pow, sqrt, sub};
