use std::{cell::Cell, rc::Rc};

use num_traits::Float;
use tracing::{trace, trace_span};

use super::{
    expr::Differentiable,
    node::{self, Node, Slot},
    variable::Variable,
};
use crate::{
    dimension::{DimDiv, Quotient},
    quantity::Quantity,
};

/// Gradient accumulators bound for one reverse pass. Dropping it unbinds
/// every slot, so no later pass can write into a stale accumulator, even if
/// the pass unwinds.
pub struct Bindings<V: Float> {
    bound: Vec<(Rc<Node<V>>, Slot<V>)>,
}

impl<V: Float> Bindings<V> {
    fn new() -> Self {
        Self { bound: Vec::new() }
    }

    pub(crate) fn bind(&mut self, node: &Rc<Node<V>>) {
        let slot = Rc::new(Cell::new(V::zero()));
        if !node.bind(&slot) {
            trace!("node takes no gradient slot; its gradient reads as zero");
        }
        self.bound.push((Rc::clone(node), slot));
    }

    pub(crate) fn get(&self, index: usize) -> V {
        self.bound.get(index).map_or_else(V::zero, |(_, slot)| slot.get())
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

impl<V: Float> Drop for Bindings<V> {
    fn drop(&mut self) {
        for (node, slot) in &self.bound {
            node.unbind(slot);
        }
    }
}

/// The variables to differentiate with respect to: one `&Variable`, a tuple
/// of up to eight, or a slice of same-typed ones.
pub trait Wrt<Y: Differentiable> {
    /// One gradient per variable, each typed `Y / X`.
    type Gradients;

    #[doc(hidden)]
    fn bind(&self, bindings: &mut Bindings<Y::Value>);

    #[doc(hidden)]
    fn collect(&self, bindings: &Bindings<Y::Value>) -> Self::Gradients;
}

pub(crate) fn run<Y, W>(root: &Rc<Node<Y::Value>>, wrt: W) -> W::Gradients
where
    Y: Differentiable,
    W: Wrt<Y>,
{
    let mut bindings = Bindings::new();
    wrt.bind(&mut bindings);
    let _span = trace_span!("derivatives", wrt = bindings.len()).entered();
    node::propagate(root, num_traits::one());
    wrt.collect(&bindings)
}

/// Gradients of `y` with respect to each variable in `wrt`, in order.
///
/// The reverse pass reads the values cached by the last forward pass; it does
/// not evaluate `y` itself. After changing a leaf with [`Variable::update`],
/// call [`Expr::evaluate`](super::Expr::evaluate) on `y` first.
///
/// A variable reachable along several paths receives the sum over all paths.
/// A variable listed twice receives the full gradient in both entries.
///
/// ```
/// use dimad::prelude::*;
///
/// let t = Variable::new(2.0 * Second);
/// let v = Variable::new(3.0 * (Meter / Second));
/// let d = Variable::from(&v * &t);
///
/// let (dd_dt, dd_dv) = derivatives(&d, (&t, &v));
/// assert_eq!(dd_dt, 3.0 * (Meter / Second));
/// assert_eq!(dd_dv, 2.0 * Second);
/// ```
pub fn derivatives<Y, W>(y: &Variable<Y>, wrt: W) -> W::Gradients
where
    Y: Differentiable,
    W: Wrt<Y>,
{
    y.expr().derivatives(wrt)
}

/// [`derivatives`] for any number of variables of one type.
pub fn gradient<Y, X>(y: &Variable<Y>, wrt: &[&Variable<X>]) -> Vec<Quantity<Quotient<Y::Dim, X::Dim>, Y::Value>>
where
    Y: Differentiable,
    X: Differentiable<Value = Y::Value>,
    Y::Dim: DimDiv<X::Dim>,
{
    y.expr().derivatives(wrt)
}

impl<Y, X> Wrt<Y> for &Variable<X>
where
    Y: Differentiable,
    X: Differentiable<Value = Y::Value>,
    Y::Dim: DimDiv<X::Dim>,
{
    type Gradients = Quantity<Quotient<Y::Dim, X::Dim>, Y::Value>;

    fn bind(&self, bindings: &mut Bindings<Y::Value>) {
        bindings.bind(&self.node);
    }

    fn collect(&self, bindings: &Bindings<Y::Value>) -> Self::Gradients {
        Quantity::from_base(bindings.get(0))
    }
}

impl<Y, X> Wrt<Y> for &[&Variable<X>]
where
    Y: Differentiable,
    X: Differentiable<Value = Y::Value>,
    Y::Dim: DimDiv<X::Dim>,
{
    type Gradients = Vec<Quantity<Quotient<Y::Dim, X::Dim>, Y::Value>>;

    fn bind(&self, bindings: &mut Bindings<Y::Value>) {
        for x in self.iter() {
            bindings.bind(&x.node);
        }
    }

    fn collect(&self, bindings: &Bindings<Y::Value>) -> Self::Gradients {
        (0..self.len())
            .map(|i| Quantity::from_base(bindings.get(i)))
            .collect()
    }
}

macro_rules! wrt_tuple {
    ($($x:ident $i:tt),+) => {
        impl<Y, $($x),+> Wrt<Y> for ($(&Variable<$x>,)+)
        where
            Y: Differentiable,
            $(
                $x: Differentiable<Value = Y::Value>,
                Y::Dim: DimDiv<<$x as Differentiable>::Dim>,
            )+
        {
            type Gradients = ($(Quantity<Quotient<Y::Dim, <$x as Differentiable>::Dim>, Y::Value>,)+);

            fn bind(&self, bindings: &mut Bindings<Y::Value>) {
                $(bindings.bind(&self.$i.node);)+
            }

            fn collect(&self, bindings: &Bindings<Y::Value>) -> Self::Gradients {
                ($(Quantity::from_base(bindings.get($i)),)+)
            }
        }
    };
}

wrt_tuple!(X0 0);
wrt_tuple!(X0 0, X1 1);
wrt_tuple!(X0 0, X1 1, X2 2);
wrt_tuple!(X0 0, X1 1, X2 2, X3 3);
wrt_tuple!(X0 0, X1 1, X2 2, X3 3, X4 4);
wrt_tuple!(X0 0, X1 1, X2 2, X3 3, X4 4, X5 5);
wrt_tuple!(X0 0, X1 1, X2 2, X3 3, X4 4, X5 5, X6 6);
wrt_tuple!(X0 0, X1 1, X2 2, X3 3, X4 4, X5 5, X6 6, X7 7);
