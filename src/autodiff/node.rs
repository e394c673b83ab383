//! Untyped expression graph over a float payload.
//!
//! Nodes are shared through [`Rc`]: a sub-expression reused by several
//! parents lives as long as its longest holder. Each node caches `val`, the
//! result of the last forward pass that reached it. Both passes walk the
//! graph in topological order, so a node shared along many paths is
//! recomputed once per forward pass and receives the sum of its parents'
//! adjoints once per reverse pass.

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet},
    rc::{Rc, Weak},
};

use num_traits::Float;
use tracing::trace;

use crate::{
    error::{QuantityError, Result},
    math::real_root,
    quantity::cast,
};

/// External gradient accumulator. Nodes only hold it weakly.
pub(crate) type Slot<V> = Rc<Cell<V>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Neg,
    Invert,
    Abs,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Sqrt,
    Powi(i32),
    Root(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Powf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TernaryOp {
    /// `a · b + c`
    MulAdd,
}

fn shown<V: Float>(x: V) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

fn invalid(op: &'static str, why: String) -> QuantityError {
    QuantityError::InvalidOp { op, why }
}

impl UnaryOp {
    fn name(self) -> &'static str {
        match self {
            Self::Neg => "negate",
            Self::Invert => "invert",
            Self::Abs => "abs",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Sqrt => "sqrt",
            Self::Powi(_) => "powi",
            Self::Root(_) => "root",
        }
    }

    fn apply<V: Float>(self, x: V) -> Result<V> {
        let op = self.name();
        Ok(match self {
            Self::Neg => -x,
            Self::Invert => {
                if x.is_zero() {
                    return Err(QuantityError::DivisionByZero { op });
                }
                x.recip()
            }
            Self::Abs => x.abs(),
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Asin | Self::Acos if x.abs() > V::one() => {
                return Err(invalid(op, format!("argument {} is outside [-1, 1]", shown(x))));
            }
            Self::Asin => x.asin(),
            Self::Acos => x.acos(),
            Self::Atan => x.atan(),
            Self::Sinh => x.sinh(),
            Self::Cosh => x.cosh(),
            Self::Tanh => x.tanh(),
            Self::Exp => x.exp(),
            Self::Ln => {
                if x <= V::zero() {
                    return Err(invalid(op, format!("argument {} is not positive", shown(x))));
                }
                x.ln()
            }
            Self::Sqrt => {
                if x < V::zero() {
                    return Err(invalid(op, format!("argument {} is negative", shown(x))));
                }
                x.sqrt()
            }
            Self::Powi(n) => {
                if n < 0 && x.is_zero() {
                    return Err(QuantityError::DivisionByZero { op });
                }
                x.powi(n)
            }
            Self::Root(n) => {
                if n % 2 == 0 && x < V::zero() {
                    return Err(invalid(op, format!("even root (n = {n}) of {}", shown(x))));
                }
                real_root(x, n)
            }
        })
    }

    /// `d op(x) / dx`.
    fn derivative<V: Float>(self, x: V) -> V {
        let one = V::one();
        match self {
            Self::Neg => -one,
            Self::Invert => -(x * x).recip(),
            Self::Abs if x.is_zero() => V::zero(),
            Self::Abs => x.signum(),
            Self::Sin => x.cos(),
            Self::Cos => -x.sin(),
            Self::Tan => x.cos().powi(-2),
            Self::Asin => (one - x * x).sqrt().recip(),
            Self::Acos => -(one - x * x).sqrt().recip(),
            Self::Atan => (one + x * x).recip(),
            Self::Sinh => x.cosh(),
            Self::Cosh => x.sinh(),
            Self::Tanh => one - x.tanh().powi(2),
            Self::Exp => x.exp(),
            Self::Ln => x.recip(),
            Self::Sqrt => (cast::<V>(2.0) * x.sqrt()).recip(),
            Self::Powi(0) => V::zero(),
            Self::Powi(n) => cast::<V>(f64::from(n)) * x.powi(n - 1),
            Self::Root(n) => real_root(x, n) / (cast::<V>(f64::from(n)) * x),
        }
    }
}

impl BinaryOp {
    fn apply<V: Float>(self, l: V, r: V) -> Result<V> {
        Ok(match self {
            Self::Add => l + r,
            Self::Sub => l - r,
            Self::Mul => l * r,
            Self::Powf => {
                if l < V::zero() {
                    return Err(invalid("powf", format!("negative base {}", shown(l))));
                }
                l.powf(r)
            }
        })
    }

    /// Partials with respect to the left and right operand.
    fn partials<V: Float>(self, l: V, r: V) -> (V, V) {
        match self {
            Self::Add => (V::one(), V::one()),
            Self::Sub => (V::one(), -V::one()),
            Self::Mul => (r, l),
            Self::Powf => {
                let dl = if r.is_zero() { V::zero() } else { r * l.powf(r - V::one()) };
                let dr = if l > V::zero() { l.powf(r) * l.ln() } else { V::zero() };
                (dl, dr)
            }
        }
    }
}

impl TernaryOp {
    fn apply<V: Float>(self, [a, b, c]: [V; 3]) -> V {
        match self {
            Self::MulAdd => a * b + c,
        }
    }

    fn partials<V: Float>(self, [a, b, _]: [V; 3]) -> [V; 3] {
        match self {
            Self::MulAdd => [b, a, V::one()],
        }
    }
}

pub(crate) enum Kind<V> {
    Constant,
    Independent {
        slots: RefCell<Vec<Weak<Cell<V>>>>,
    },
    Dependent {
        inner: Rc<Node<V>>,
        slots: RefCell<Vec<Weak<Cell<V>>>>,
    },
    Unary {
        op: UnaryOp,
        arg: Rc<Node<V>>,
    },
    Binary {
        op: BinaryOp,
        args: [Rc<Node<V>>; 2],
    },
    Ternary {
        op: TernaryOp,
        args: [Rc<Node<V>>; 3],
    },
}

impl<V> Kind<V> {
    /// Leaves `Constant` behind and pushes the operands onto `out`.
    fn take_operands(&mut self, out: &mut Vec<Rc<Node<V>>>) {
        match std::mem::replace(self, Kind::Constant) {
            Kind::Constant | Kind::Independent { .. } => {}
            Kind::Dependent { inner, .. } => out.push(inner),
            Kind::Unary { arg, .. } => out.push(arg),
            Kind::Binary { args, .. } => out.extend(args),
            Kind::Ternary { args, .. } => out.extend(args),
        }
    }
}

pub(crate) struct Node<V> {
    val: Cell<V>,
    kind: Kind<V>,
}

impl<V> Drop for Node<V> {
    /// Releases operands from an explicit stack, so dropping a long chain
    /// uses constant stack depth.
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.kind.take_operands(&mut stack);
        while let Some(node) = stack.pop() {
            if let Ok(mut node) = Rc::try_unwrap(node) {
                node.kind.take_operands(&mut stack);
            }
        }
    }
}

impl<V: Float> Node<V> {
    fn with(val: V, kind: Kind<V>) -> Rc<Self> {
        Rc::new(Self {
            val: Cell::new(val),
            kind,
        })
    }

    pub(crate) fn constant(val: V) -> Rc<Self> {
        Self::with(val, Kind::Constant)
    }

    pub(crate) fn independent(val: V) -> Rc<Self> {
        Self::with(
            val,
            Kind::Independent {
                slots: RefCell::default(),
            },
        )
    }

    pub(crate) fn dependent(inner: Rc<Self>) -> Rc<Self> {
        Self::with(
            inner.val(),
            Kind::Dependent {
                inner,
                slots: RefCell::default(),
            },
        )
    }

    /// Builds an operation node, evaluating it from the operand's cached value.
    pub(crate) fn unary(op: UnaryOp, arg: Rc<Self>) -> Result<Rc<Self>> {
        let val = op.apply(arg.val())?;
        Ok(Self::with(val, Kind::Unary { op, arg }))
    }

    pub(crate) fn binary(op: BinaryOp, lhs: Rc<Self>, rhs: Rc<Self>) -> Result<Rc<Self>> {
        let val = op.apply(lhs.val(), rhs.val())?;
        Ok(Self::with(val, Kind::Binary { op, args: [lhs, rhs] }))
    }

    pub(crate) fn ternary(op: TernaryOp, args: [Rc<Self>; 3]) -> Rc<Self> {
        let val = op.apply([args[0].val(), args[1].val(), args[2].val()]);
        Self::with(val, Kind::Ternary { op, args })
    }

    /// The value cached by the last forward pass.
    #[inline]
    pub(crate) fn val(&self) -> V {
        self.val.get()
    }

    pub(crate) fn is_independent(&self) -> bool {
        matches!(self.kind, Kind::Independent { .. })
    }

    pub(crate) fn is_constant(&self) -> bool {
        matches!(self.kind, Kind::Constant)
    }

    /// Overwrites the value of an independent leaf.
    pub(crate) fn set(&self, val: V) -> Result<()> {
        match self.kind {
            Kind::Independent { .. } => {
                self.val.set(val);
                Ok(())
            }
            _ => Err(QuantityError::NotIndependent),
        }
    }

    fn children(&self) -> &[Rc<Self>] {
        match &self.kind {
            Kind::Constant | Kind::Independent { .. } => &[],
            Kind::Dependent { inner, .. } => std::slice::from_ref(inner),
            Kind::Unary { arg, .. } => std::slice::from_ref(arg),
            Kind::Binary { args, .. } => args,
            Kind::Ternary { args, .. } => args,
        }
    }

    fn slots(&self) -> Option<&RefCell<Vec<Weak<Cell<V>>>>> {
        match &self.kind {
            Kind::Independent { slots } | Kind::Dependent { slots, .. } => Some(slots),
            _ => None,
        }
    }

    /// Attaches a gradient accumulator. Only variable nodes accept one;
    /// returns whether the slot was bound.
    pub(crate) fn bind(&self, slot: &Slot<V>) -> bool {
        match self.slots() {
            Some(slots) => {
                slots.borrow_mut().push(Rc::downgrade(slot));
                true
            }
            None => false,
        }
    }

    /// Detaches `slot`, along with any accumulator that no longer exists.
    pub(crate) fn unbind(&self, slot: &Slot<V>) {
        if let Some(slots) = self.slots() {
            slots
                .borrow_mut()
                .retain(|w| w.strong_count() > 0 && !std::ptr::eq(w.as_ptr(), Rc::as_ptr(slot)));
        }
    }

    fn accumulate(&self, seed: V) {
        let Some(slots) = self.slots() else {
            return;
        };
        for weak in slots.borrow().iter() {
            match weak.upgrade() {
                Some(acc) => acc.set(acc.get() + seed),
                None => trace!("skipping gradient slot whose accumulator was dropped"),
            }
        }
    }

    /// Recomputes this node from its own operands' cached values.
    fn recompute(&self) -> Result<V> {
        match &self.kind {
            Kind::Constant | Kind::Independent { .. } => Ok(self.val()),
            Kind::Dependent { inner, .. } => Ok(inner.val()),
            Kind::Unary { op, arg } => op.apply(arg.val()),
            Kind::Binary { op, args: [l, r] } => op.apply(l.val(), r.val()),
            Kind::Ternary { op, args: [a, b, c] } => Ok(op.apply([a.val(), b.val(), c.val()])),
        }
    }
}

/// Post-order over the sub-graph of `root`: operands before the nodes that
/// use them, each node exactly once.
fn topological<V: Float>(root: &Rc<Node<V>>) -> Vec<Rc<Node<V>>> {
    let mut order = Vec::new();
    let mut seen: HashSet<*const Node<V>> = HashSet::new();
    let mut stack = vec![(Rc::clone(root), false)];
    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            order.push(node);
            continue;
        }
        if !seen.insert(Rc::as_ptr(&node)) {
            continue;
        }
        let children: Vec<_> = node.children().iter().map(Rc::clone).collect();
        stack.push((node, true));
        for child in children.into_iter().rev() {
            if !seen.contains(&Rc::as_ptr(&child)) {
                stack.push((child, false));
            }
        }
    }
    order
}

/// Forward pass: refreshes every cached value below `root`, operands first.
/// Idempotent.
pub(crate) fn update<V: Float>(root: &Rc<Node<V>>) -> Result<V> {
    for node in topological(root) {
        let val = node.recompute()?;
        node.val.set(val);
    }
    Ok(root.val())
}

fn add_adjoint<V: Float>(adjoint: &mut HashMap<*const Node<V>, V>, node: &Rc<Node<V>>, g: V) {
    let entry = adjoint.entry(Rc::as_ptr(node)).or_insert_with(V::zero);
    *entry = *entry + g;
}

/// Reverse pass: distributes `seed` from `root` down to every bound
/// accumulator using the chain rule on cached values. Contributions from
/// different paths are summed.
pub(crate) fn propagate<V: Float>(root: &Rc<Node<V>>, seed: V) {
    let order = topological(root);
    let mut adjoint: HashMap<*const Node<V>, V> = HashMap::with_capacity(order.len());
    adjoint.insert(Rc::as_ptr(root), seed);

    for node in order.iter().rev() {
        let Some(g) = adjoint.remove(&Rc::as_ptr(node)) else {
            continue;
        };
        node.accumulate(g);
        match &node.kind {
            Kind::Constant | Kind::Independent { .. } => {}
            Kind::Dependent { inner, .. } => add_adjoint(&mut adjoint, inner, g),
            Kind::Unary { op, arg } => add_adjoint(&mut adjoint, arg, g * op.derivative(arg.val())),
            Kind::Binary { op, args: [l, r] } => {
                let (dl, dr) = op.partials(l.val(), r.val());
                add_adjoint(&mut adjoint, l, g * dl);
                add_adjoint(&mut adjoint, r, g * dr);
            }
            Kind::Ternary { op, args } => {
                let d = op.partials([args[0].val(), args[1].val(), args[2].val()]);
                for (arg, d) in args.iter().zip(d) {
                    add_adjoint(&mut adjoint, arg, g * d);
                }
            }
        }
    }
}
