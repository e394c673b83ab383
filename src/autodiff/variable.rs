use std::{
    cmp::Ordering,
    fmt,
    ops::{AddAssign, Deref, DivAssign, MulAssign, SubAssign},
};

use tracing::debug;

use super::{
    expr::{Differentiable, Expr, IntoExpr},
    node::{BinaryOp, Node},
};
use crate::{
    dimension::{Dimension, Dimensionless},
    error::{Result, raise},
    quantity::Quantity,
};

/// A reassignable handle onto one graph node.
///
/// [`Variable::new`] makes an independent leaf: the thing you differentiate
/// with respect to, and the only kind of node whose value can be changed in
/// place with [`Variable::update`]. Converting an [`Expr`] makes a dependent
/// variable that wraps the expression. Cloning shares the node.
///
/// Assignment and compound assignment rebuild: `x -= dt * &v` points `x` at
/// a new node for `x - dt·v`, while anything built from the old `x` keeps
/// the old node.
///
/// ```
/// use dimad::prelude::*;
///
/// let x = Variable::new(4.0 * Meter);
/// let area = Variable::from(&x * &x);
/// let dadx = derivatives(&area, &x);
/// assert_eq!(dadx, 8.0 * Meter);
/// ```
pub struct Variable<Q: Differentiable> {
    expr: Expr<Q>,
}

impl<Q: Differentiable> Variable<Q> {
    /// An independent leaf holding `q`.
    pub fn new(q: Q) -> Self {
        Self {
            expr: Expr::from_node(Node::independent(q.base())),
        }
    }

    pub fn expr(&self) -> &Expr<Q> {
        &self.expr
    }

    pub fn is_independent(&self) -> bool {
        self.expr.node.is_independent()
    }

    /// Points this variable at a dependent node wrapping `rhs`.
    pub fn assign<R: IntoExpr<Quantity = Q>>(&mut self, rhs: R) {
        self.expr = Expr::from_node(Node::dependent(rhs.into_expr().node));
    }

    /// Replaces this variable with a fresh independent leaf holding `q`.
    /// Expressions built from the old node are unaffected.
    pub fn set(&mut self, q: Q) {
        *self = Self::new(q);
    }

    /// Changes the value of an independent leaf in place, so every expression
    /// built on it sees `q` after its next [`Expr::evaluate`].
    ///
    /// Fails with [`QuantityError::NotIndependent`] on a dependent variable;
    /// use [`Variable::assign`] for those.
    ///
    /// [`QuantityError::NotIndependent`]: crate::QuantityError::NotIndependent
    pub fn update(&self, q: Q) -> Result<()> {
        self.expr.node.set(q.base()).inspect_err(|_| {
            debug!("rejected in-place update of a dependent variable");
        })
    }

    fn rebuild(&mut self, expr: Expr<Q>) {
        self.expr = Expr::from_node(Node::dependent(expr.node));
    }
}

impl<Q: Differentiable> Deref for Variable<Q> {
    type Target = Expr<Q>;

    fn deref(&self) -> &Expr<Q> {
        &self.expr
    }
}

impl<Q: Differentiable> Clone for Variable<Q> {
    fn clone(&self) -> Self {
        Self {
            expr: self.expr.clone(),
        }
    }
}

impl<Q: Differentiable> fmt::Debug for Variable<Q>
where
    Q::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("value", &self.expr.node.val())
            .field("dim", &format_args!("{}", <Q::Dim as Dimension>::VECTOR))
            .field("independent", &self.is_independent())
            .finish()
    }
}

impl<Q: Differentiable + fmt::Display> fmt::Display for Variable<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.expr, f)
    }
}

impl<Q: Differentiable> From<Expr<Q>> for Variable<Q> {
    fn from(expr: Expr<Q>) -> Self {
        Self {
            expr: Expr::from_node(Node::dependent(expr.node)),
        }
    }
}

impl<D: Dimension, V: num_traits::Float + 'static> From<&Variable<Quantity<D, V>>> for Quantity<D, V> {
    fn from(var: &Variable<Quantity<D, V>>) -> Self {
        var.value()
    }
}

impl<D: Dimension, V: num_traits::Float + 'static> From<Variable<Quantity<D, V>>> for Quantity<D, V> {
    fn from(var: Variable<Quantity<D, V>>) -> Self {
        var.value()
    }
}

impl<Q: Differentiable> IntoExpr for Variable<Q> {
    type Quantity = Q;

    #[inline]
    fn into_expr(self) -> Expr<Q> {
        self.expr
    }
}

impl<Q: Differentiable> IntoExpr for &Variable<Q> {
    type Quantity = Q;

    #[inline]
    fn into_expr(self) -> Expr<Q> {
        self.expr.clone()
    }
}

impl<Q: Differentiable + PartialEq> PartialEq for Variable<Q> {
    /// Compares cached values.
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl<Q: Differentiable + PartialOrd> PartialOrd for Variable<Q> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value().partial_cmp(&other.value())
    }
}

impl<Q: Differentiable + PartialEq> PartialEq<Q> for Variable<Q> {
    fn eq(&self, other: &Q) -> bool {
        self.value() == *other
    }
}

impl<Q: Differentiable + PartialOrd> PartialOrd<Q> for Variable<Q> {
    fn partial_cmp(&self, other: &Q) -> Option<Ordering> {
        self.value().partial_cmp(other)
    }
}

impl<Q, R> AddAssign<R> for Variable<Q>
where
    Q: Differentiable,
    R: IntoExpr<Quantity = Q>,
{
    fn add_assign(&mut self, rhs: R) {
        let sum = self.expr.binary(BinaryOp::Add, &rhs.into_expr());
        self.rebuild(sum);
    }
}

impl<Q, R> SubAssign<R> for Variable<Q>
where
    Q: Differentiable,
    R: IntoExpr<Quantity = Q>,
{
    fn sub_assign(&mut self, rhs: R) {
        let diff = self.expr.binary(BinaryOp::Sub, &rhs.into_expr());
        self.rebuild(diff);
    }
}

impl<Q, R> MulAssign<R> for Variable<Q>
where
    Q: Differentiable,
    R: IntoExpr,
    R::Quantity: Differentiable<Dim = Dimensionless, Value = Q::Value>,
{
    fn mul_assign(&mut self, rhs: R) {
        let product = self.expr.binary(BinaryOp::Mul, &rhs.into_expr());
        self.rebuild(product);
    }
}

impl<Q, R> DivAssign<R> for Variable<Q>
where
    Q: Differentiable,
    R: IntoExpr,
    R::Quantity: Differentiable<Dim = Dimensionless, Value = Q::Value>,
{
    /// # Panics
    ///
    /// Panics if the divisor is currently zero.
    #[track_caller]
    fn div_assign(&mut self, rhs: R) {
        match self.expr.quotient(&rhs.into_expr()) {
            Ok(quotient) => self.rebuild(quotient),
            Err(e) => raise(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::QuantityError,
        quantity::{Length, Scalar},
        unit::{Meter, Second},
    };

    #[test]
    fn independent_and_dependent() {
        let x = Variable::new(2.0 * Meter);
        assert!(x.is_independent());
        let y = Variable::from(&x + 1.0 * Meter);
        assert!(!y.is_independent());
        assert_eq!(Length::from(&y), 3.0 * Meter);

        assert!(x.update(5.0 * Meter).is_ok());
        assert_eq!(y.value(), 3.0 * Meter);
        assert_eq!(y.evaluate(), Ok(6.0 * Meter));
        assert_eq!(y.update(1.0 * Meter), Err(QuantityError::NotIndependent));
    }

    #[test]
    fn clones_share_the_node() {
        let x = Variable::new(1.0 * Second);
        let alias = x.clone();
        alias.update(4.0 * Second).unwrap();
        assert_eq!(x.value(), 4.0 * Second);
    }

    #[test]
    fn assignment_rebuilds() {
        let x = Variable::new(2.0 * Meter);
        let mut y = Variable::new(0.0 * Meter);
        let before = y.clone();
        y.assign(&x * 3.0);
        assert_eq!(y, 6.0 * Meter);
        assert_eq!(before, 0.0 * Meter);

        y.set(1.0 * Meter);
        assert!(y.is_independent());
        assert!(y < x);
    }

    #[test]
    fn compound_assignment() {
        let dx = Variable::new(0.5 * Meter);
        let mut x = Variable::new(1.0 * Meter);
        x += &dx;
        x += 1.0 * Meter;
        x -= dx.clone();
        assert_eq!(x, 2.0 * Meter);
        x *= 3.0;
        x /= Variable::new(Scalar::scalar(2.0));
        assert_eq!(x, 3.0 * Meter);
        assert!(!x.is_independent());
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn compound_division_by_zero_panics() {
        let mut x = Variable::new(1.0 * Meter);
        x /= 0.0;
    }
}
