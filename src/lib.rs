//! # dimad
//!
//! Compile-time dimensional analysis for physical quantities, with
//! first-order uncertainty propagation and a reverse-mode automatic
//! differentiation graph that keeps every gradient dimensionally typed.
//!
//! ## Features
//!
//! - [`Quantity<D, V>`](Quantity) tags a float with a seven-exponent SI
//!   dimension at the type level. Adding a length to a time, or taking the
//!   sine of a length, does not compile.
//! - Zero-sized unit tags fold their scale into the payload at construction
//!   (`1.5 * Kilometer` stores `1500.0`), so arithmetic never converts.
//! - [`UncertainQuantity`] carries a standard uncertainty through every
//!   operation.
//! - [`Variable`] and [`derivatives`] build an expression graph over
//!   quantities and return gradients typed as `Y / X`.
//!
//! ```
//! use dimad::prelude::*;
//!
//! let distance = 100.0 * Meter;
//! let time = 9.58 * Second;
//! let speed: Velocity = distance / time;
//! assert_eq!(format!("{:.2}", speed), "10.44 m·s⁻¹");
//! ```
//!
//! Dimension checks happen in the type system. Value-level failures, such
//! as dividing by a zero-valued quantity, panic in operators the way integer
//! division does, and are reported as [`QuantityError`] by the `try_`
//! variants.
//!
//! ## Cargo features
//!
//! - `serde`: `Serialize`/`Deserialize` for quantities and dimension vectors.

#![warn(
    clippy::perf,
    clippy::correctness,
    clippy::complexity,
    clippy::style,
    clippy::suspicious,
    // clippy::pedantic
)]
#![deny(clippy::undocumented_unsafe_blocks, clippy::cast_possible_truncation)]
#![allow(clippy::float_cmp)]

pub mod autodiff;
pub mod constants;
pub mod dimension;
mod error;
pub mod math;
pub mod prefix;
pub mod quantity;
pub mod scale;
pub mod uncertain;
pub mod unit;

pub use autodiff::{Differentiable, Expr, IntoExpr, Variable, Wrt, derivatives, gradient};
pub use dimension::{Dim, Dimension, DimensionVector};
pub use error::{QuantityError, Result};
pub use quantity::Quantity;
pub use uncertain::UncertainQuantity;
pub use unit::Unit;

/// Everything needed for everyday use: the core types, the unit tags and
/// the named quantity aliases.
pub mod prelude {
    pub use crate::{
        autodiff::{Expr, IntoExpr, Variable, derivatives, gradient},
        dimension::{Dimension, DimensionVector},
        error::QuantityError,
        quantity::{
            Acceleration, Angle, Area, Charge, Current, Energy, Force, Frequency, Length,
            LuminousIntensity, Mass, Momentum, Power, Pressure, Quantity, Resistance, Scalar,
            Substance, Temperature, Time, Velocity, Voltage, Volume,
        },
        uncertain::UncertainQuantity,
        unit::*,
    };
}
