//! Reverse-mode automatic differentiation over dimensioned quantities.
//!
//! Build an expression from [`Variable`]s with ordinary operators, then ask
//! for [`derivatives`]. Gradients come back typed: the derivative of an
//! energy with respect to a length is a force.
//!
//! ```
//! use dimad::prelude::*;
//!
//! let m = Variable::new(2.0 * Kilogram);
//! let v = Variable::new(3.0 * (Meter / Second));
//! let kinetic = Variable::from(0.5 * (&m * (&v * &v)));
//!
//! let (dk_dm, dk_dv) = derivatives(&kinetic, (&m, &v));
//! let dk_dv: Momentum = dk_dv;
//! assert_eq!(dk_dv.value(), 6.0);
//! assert_eq!(dk_dm.value(), 4.5);
//! ```
//!
//! The graph is single-threaded: nodes are shared through `Rc` and cache
//! their values in `Cell`s.

mod derivatives;
mod expr;
mod node;
mod variable;

pub use derivatives::{Bindings, Wrt, derivatives, gradient};
pub use expr::{Differentiable, Expr, IntoExpr};
pub use variable::Variable;
