//! Typed handles onto the expression graph.
//!
//! An [`Expr<Q>`] is a shared pointer to a graph node whose value is a
//! quantity of type `Q`. Operators never mutate their operands: `&a * &b`
//! allocates a new node that holds both operands, and the result type carries
//! the product dimension, so the graph is checked dimensionally at compile
//! time just like plain [`Quantity`] arithmetic.
//!
//! Every node evaluates eagerly when it is built. After an independent leaf
//! is changed in place, call [`Expr::evaluate`] on the root to refresh the
//! cached values before asking for derivatives.

use std::{
    fmt,
    marker::PhantomData,
    ops::{Add, Div, Mul, Neg, Sub},
    rc::Rc,
};

use num_traits::Float;
use typenum::{Integer, N1, NonZero, P2, P3};

use super::{
    derivatives::{self, Wrt},
    node::{self, BinaryOp, Node, TernaryOp, UnaryOp},
    variable::Variable,
};
use crate::{
    dimension::{
        DimDiv, DimMul, DimPow, DimRoot, Dimension, Dimensionless, Inverse, PowerOf, Product,
        Quotient, RootOf,
    },
    error::{Result, raise},
    quantity::Quantity,
};

/// A value the graph can carry: a dimension tag plus a float payload in base
/// SI units.
pub trait Differentiable: Copy + 'static {
    type Dim: Dimension;
    type Value: Float + 'static;

    fn from_base(value: Self::Value) -> Self;
    fn base(&self) -> Self::Value;
}

impl<D: Dimension, V: Float + 'static> Differentiable for Quantity<D, V> {
    type Dim = D;
    type Value = V;

    #[inline]
    fn from_base(value: V) -> Self {
        Quantity::from_base(value)
    }

    #[inline]
    fn base(&self) -> V {
        self.value()
    }
}

/// Anything that can stand as an operand in a graph expression.
pub trait IntoExpr {
    type Quantity: Differentiable;

    fn into_expr(self) -> Expr<Self::Quantity>;
}

type DimOf<R> = <<R as IntoExpr>::Quantity as Differentiable>::Dim;

pub struct Expr<Q: Differentiable> {
    pub(crate) node: Rc<Node<Q::Value>>,
    _quantity: PhantomData<Q>,
}

#[track_caller]
fn built<T>(built: Result<T>) -> T {
    match built {
        Ok(t) => t,
        Err(e) => raise(e),
    }
}

impl<Q: Differentiable> Expr<Q> {
    pub(crate) fn from_node(node: Rc<Node<Q::Value>>) -> Self {
        Self {
            node,
            _quantity: PhantomData,
        }
    }

    /// A leaf that never changes and never receives a gradient.
    pub fn constant(q: Q) -> Self {
        Self::from_node(Node::constant(q.base()))
    }

    /// The value cached by the last evaluation.
    #[inline]
    pub fn value(&self) -> Q {
        Q::from_base(self.node.val())
    }

    /// Forward pass: re-evaluates every node below this one from the current
    /// leaf values and returns the refreshed value.
    pub fn evaluate(&self) -> Result<Q> {
        node::update(&self.node).map(Q::from_base)
    }

    pub fn is_constant(&self) -> bool {
        self.node.is_constant()
    }

    /// Gradients of this expression with respect to `wrt`. See
    /// [`derivatives`](super::derivatives()).
    pub fn derivatives<W: Wrt<Q>>(&self, wrt: W) -> W::Gradients {
        derivatives::run(&self.node, wrt)
    }

    #[track_caller]
    fn unary<P>(&self, op: UnaryOp) -> Expr<P>
    where
        P: Differentiable<Value = Q::Value>,
    {
        Expr::from_node(built(Node::unary(op, Rc::clone(&self.node))))
    }

    fn try_unary<P>(&self, op: UnaryOp) -> Result<Expr<P>>
    where
        P: Differentiable<Value = Q::Value>,
    {
        Node::unary(op, Rc::clone(&self.node)).map(Expr::from_node)
    }

    #[track_caller]
    pub(crate) fn binary<R, P>(&self, op: BinaryOp, rhs: &Expr<R>) -> Expr<P>
    where
        R: Differentiable<Value = Q::Value>,
        P: Differentiable<Value = Q::Value>,
    {
        Expr::from_node(built(Node::binary(
            op,
            Rc::clone(&self.node),
            Rc::clone(&rhs.node),
        )))
    }

    /// `self · (1 / rhs)`, with the divisor checked for zero.
    pub(crate) fn quotient<R, P>(&self, rhs: &Expr<R>) -> Result<Expr<P>>
    where
        R: Differentiable<Value = Q::Value>,
        P: Differentiable<Value = Q::Value>,
    {
        let inv = Node::unary(UnaryOp::Invert, Rc::clone(&rhs.node))?;
        Node::binary(BinaryOp::Mul, Rc::clone(&self.node), inv).map(Expr::from_node)
    }

    /// Divides by `rhs`, failing instead of panicking on a zero divisor.
    pub fn try_div<R>(&self, rhs: R) -> Result<Expr<Quantity<Quotient<Q::Dim, DimOf<R>>, Q::Value>>>
    where
        R: IntoExpr,
        R::Quantity: Differentiable<Value = Q::Value>,
        Q::Dim: DimDiv<DimOf<R>>,
    {
        self.quotient(&rhs.into_expr())
    }

    /// `1 / self`.
    ///
    /// # Panics
    ///
    /// Panics if the current value is zero; see [`Expr::try_recip`].
    #[track_caller]
    pub fn recip(&self) -> Expr<Quantity<Inverse<Q::Dim>, Q::Value>>
    where
        Q::Dim: DimPow<N1>,
    {
        self.unary(UnaryOp::Invert)
    }

    pub fn try_recip(&self) -> Result<Expr<Quantity<Inverse<Q::Dim>, Q::Value>>>
    where
        Q::Dim: DimPow<N1>,
    {
        self.try_unary(UnaryOp::Invert)
    }

    pub fn abs(&self) -> Self {
        self.unary(UnaryOp::Abs)
    }

    #[track_caller]
    pub fn pow<E: Integer>(&self) -> Expr<Quantity<PowerOf<Q::Dim, E>, Q::Value>>
    where
        Q::Dim: DimPow<E>,
    {
        self.unary(UnaryOp::Powi(E::I32))
    }

    /// Real `E`-th root.
    ///
    /// # Panics
    ///
    /// Panics on an even root of a negative value.
    #[track_caller]
    pub fn root<E: Integer + NonZero>(&self) -> Expr<Quantity<RootOf<Q::Dim, E>, Q::Value>>
    where
        Q::Dim: DimRoot<E>,
    {
        self.unary(UnaryOp::Root(E::I32))
    }

    #[track_caller]
    pub fn sqrt(&self) -> Expr<Quantity<RootOf<Q::Dim, P2>, Q::Value>>
    where
        Q::Dim: DimRoot<P2>,
    {
        self.unary(UnaryOp::Sqrt)
    }

    pub fn cbrt(&self) -> Expr<Quantity<RootOf<Q::Dim, P3>, Q::Value>>
    where
        Q::Dim: DimRoot<P3>,
    {
        self.unary(UnaryOp::Root(3))
    }

    /// Fused `self · b + c` as a single node.
    pub fn mul_add<B, C>(&self, b: B, c: C) -> Expr<Quantity<Product<Q::Dim, DimOf<B>>, Q::Value>>
    where
        B: IntoExpr,
        B::Quantity: Differentiable<Value = Q::Value>,
        Q::Dim: DimMul<DimOf<B>>,
        C: IntoExpr<Quantity = Quantity<Product<Q::Dim, DimOf<B>>, Q::Value>>,
    {
        let (b, c) = (b.into_expr(), c.into_expr());
        Expr::from_node(Node::ternary(
            TernaryOp::MulAdd,
            [Rc::clone(&self.node), b.node, c.node],
        ))
    }
}

macro_rules! scalar_fns {
    ($($(#[$meta:meta])* $name:ident => $op:ident;)*) => {
        /// Transcendental functions, defined on dimensionless expressions only.
        ///
        /// ```compile_fail
        /// use dimad::prelude::*;
        /// let x = Variable::new(2.0 * Meter);
        /// let _ = x.sin();
        /// ```
        impl<V: Float + 'static> Expr<Quantity<Dimensionless, V>> {
            $(
                $(#[$meta])*
                #[track_caller]
                pub fn $name(&self) -> Self {
                    self.unary(UnaryOp::$op)
                }
            )*
        }
    };
}

scalar_fns! {
    sin => Sin;
    cos => Cos;
    tan => Tan;
    /// # Panics
    ///
    /// Panics outside `[-1, 1]`.
    asin => Asin;
    /// # Panics
    ///
    /// Panics outside `[-1, 1]`.
    acos => Acos;
    atan => Atan;
    sinh => Sinh;
    cosh => Cosh;
    tanh => Tanh;
    exp => Exp;
    /// Natural logarithm.
    ///
    /// # Panics
    ///
    /// Panics on a non-positive value; see [`Expr::try_ln`].
    ln => Ln;
}

impl<V: Float + 'static> Expr<Quantity<Dimensionless, V>> {
    pub fn try_ln(&self) -> Result<Self> {
        self.try_unary(UnaryOp::Ln)
    }

    /// `self^exponent` with both operands in the graph.
    #[track_caller]
    pub fn powf<R>(&self, exponent: R) -> Self
    where
        R: IntoExpr<Quantity = Quantity<Dimensionless, V>>,
    {
        self.binary(BinaryOp::Powf, &exponent.into_expr())
    }
}

impl<Q: Differentiable> Clone for Expr<Q> {
    fn clone(&self) -> Self {
        Self::from_node(Rc::clone(&self.node))
    }
}

impl<Q: Differentiable> fmt::Debug for Expr<Q>
where
    Q::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expr")
            .field("value", &self.node.val())
            .field("dim", &format_args!("{}", <Q::Dim as Dimension>::VECTOR))
            .finish()
    }
}

impl<Q: Differentiable + fmt::Display> fmt::Display for Expr<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value(), f)
    }
}

impl<Q: Differentiable> IntoExpr for Expr<Q> {
    type Quantity = Q;

    #[inline]
    fn into_expr(self) -> Self {
        self
    }
}

impl<Q: Differentiable> IntoExpr for &Expr<Q> {
    type Quantity = Q;

    #[inline]
    fn into_expr(self) -> Expr<Q> {
        self.clone()
    }
}

impl<D: Dimension, V: Float + 'static> IntoExpr for Quantity<D, V> {
    type Quantity = Self;

    fn into_expr(self) -> Expr<Self> {
        Expr::constant(self)
    }
}

impl IntoExpr for f64 {
    type Quantity = Quantity<Dimensionless, f64>;

    fn into_expr(self) -> Expr<Self::Quantity> {
        Expr::constant(Quantity::from_base(self))
    }
}

impl IntoExpr for f32 {
    type Quantity = Quantity<Dimensionless, f32>;

    fn into_expr(self) -> Expr<Self::Quantity> {
        Expr::constant(Quantity::from_base(self))
    }
}

/// Graph operators with an expression or a variable on the left.
macro_rules! graph_ops {
    ($([$($lt:lifetime)?] $lhs:ty;)*) => {$(
        impl<$($lt,)? Q, R> Add<R> for $lhs
        where
            Q: Differentiable,
            R: IntoExpr<Quantity = Q>,
        {
            type Output = Expr<Q>;

            fn add(self, rhs: R) -> Expr<Q> {
                self.into_expr().binary(BinaryOp::Add, &rhs.into_expr())
            }
        }

        impl<$($lt,)? Q, R> Sub<R> for $lhs
        where
            Q: Differentiable,
            R: IntoExpr<Quantity = Q>,
        {
            type Output = Expr<Q>;

            fn sub(self, rhs: R) -> Expr<Q> {
                self.into_expr().binary(BinaryOp::Sub, &rhs.into_expr())
            }
        }

        impl<$($lt,)? Q, R> Mul<R> for $lhs
        where
            Q: Differentiable,
            R: IntoExpr,
            R::Quantity: Differentiable<Value = Q::Value>,
            Q::Dim: DimMul<DimOf<R>>,
        {
            type Output = Expr<Quantity<Product<Q::Dim, DimOf<R>>, Q::Value>>;

            fn mul(self, rhs: R) -> Self::Output {
                self.into_expr().binary(BinaryOp::Mul, &rhs.into_expr())
            }
        }

        impl<$($lt,)? Q, R> Div<R> for $lhs
        where
            Q: Differentiable,
            R: IntoExpr,
            R::Quantity: Differentiable<Value = Q::Value>,
            Q::Dim: DimDiv<DimOf<R>>,
        {
            type Output = Expr<Quantity<Quotient<Q::Dim, DimOf<R>>, Q::Value>>;

            /// # Panics
            ///
            /// Panics if the divisor is currently zero; see [`Expr::try_div`].
            #[track_caller]
            fn div(self, rhs: R) -> Self::Output {
                built(self.into_expr().quotient(&rhs.into_expr()))
            }
        }

        impl<$($lt,)? Q: Differentiable> Neg for $lhs {
            type Output = Expr<Q>;

            fn neg(self) -> Expr<Q> {
                self.into_expr().unary(UnaryOp::Neg)
            }
        }
    )*};
}

graph_ops! {
    [] Expr<Q>;
    ['a] &'a Expr<Q>;
    [] Variable<Q>;
    ['a] &'a Variable<Q>;
}

/// Graph operators with a plain quantity on the left. The quantity enters the
/// graph as a constant.
macro_rules! quantity_lhs_ops {
    ($([$($lt:lifetime)?] $rhs:ty;)*) => {$(
        impl<$($lt,)? D, V, Q> Add<$rhs> for Quantity<D, V>
        where
            D: Dimension,
            V: Float + 'static,
            Q: Differentiable<Dim = D, Value = V>,
        {
            type Output = Expr<Q>;

            fn add(self, rhs: $rhs) -> Expr<Q> {
                Expr::constant(Q::from_base(self.value())).binary(BinaryOp::Add, &rhs.into_expr())
            }
        }

        impl<$($lt,)? D, V, Q> Sub<$rhs> for Quantity<D, V>
        where
            D: Dimension,
            V: Float + 'static,
            Q: Differentiable<Dim = D, Value = V>,
        {
            type Output = Expr<Q>;

            fn sub(self, rhs: $rhs) -> Expr<Q> {
                Expr::constant(Q::from_base(self.value())).binary(BinaryOp::Sub, &rhs.into_expr())
            }
        }

        impl<$($lt,)? D, V, Q> Mul<$rhs> for Quantity<D, V>
        where
            D: DimMul<Q::Dim>,
            V: Float + 'static,
            Q: Differentiable<Value = V>,
        {
            type Output = Expr<Quantity<Product<D, Q::Dim>, V>>;

            fn mul(self, rhs: $rhs) -> Self::Output {
                Expr::constant(self).binary(BinaryOp::Mul, &rhs.into_expr())
            }
        }

        impl<$($lt,)? D, V, Q> Div<$rhs> for Quantity<D, V>
        where
            D: DimDiv<Q::Dim>,
            V: Float + 'static,
            Q: Differentiable<Value = V>,
        {
            type Output = Expr<Quantity<Quotient<D, Q::Dim>, V>>;

            #[track_caller]
            fn div(self, rhs: $rhs) -> Self::Output {
                built(Expr::constant(self).quotient(&rhs.into_expr()))
            }
        }
    )*};
}

quantity_lhs_ops! {
    [] Expr<Q>;
    ['a] &'a Expr<Q>;
    [] Variable<Q>;
    ['a] &'a Variable<Q>;
}

/// `2.0 * x` and `1.0 / x` with a bare float on the left.
macro_rules! scalar_lhs_ops {
    ($t:ty; $([$($lt:lifetime)?] $rhs:ty;)*) => {$(
        impl<$($lt,)? Q> Mul<$rhs> for $t
        where
            Q: Differentiable<Value = $t>,
        {
            type Output = Expr<Q>;

            fn mul(self, rhs: $rhs) -> Expr<Q> {
                self.into_expr().binary(BinaryOp::Mul, &rhs.into_expr())
            }
        }

        impl<$($lt,)? Q> Div<$rhs> for $t
        where
            Q: Differentiable<Value = $t>,
            Q::Dim: DimPow<N1>,
        {
            type Output = Expr<Quantity<Inverse<Q::Dim>, $t>>;

            #[track_caller]
            fn div(self, rhs: $rhs) -> Self::Output {
                built(self.into_expr().quotient(&rhs.into_expr()))
            }
        }
    )*};
}

scalar_lhs_ops! {
    f64;
    [] Expr<Q>;
    ['a] &'a Expr<Q>;
    [] Variable<Q>;
    ['a] &'a Variable<Q>;
}

scalar_lhs_ops! {
    f32;
    [] Expr<Q>;
    ['a] &'a Expr<Q>;
    [] Variable<Q>;
    ['a] &'a Variable<Q>;
}
