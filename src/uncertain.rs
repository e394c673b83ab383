//! [`UncertainQuantity`]: a value with a standard uncertainty, both in base
//! SI units, propagated by first-order error propagation.
//!
//! - sums and differences: uncertainties add in quadrature;
//! - products and quotients: relative uncertainties add in quadrature;
//! - `x^p`: `|p · x^(p-1)| · u`;
//! - other functions: `|f'(x)| · u`.
//!
//! Inputs are treated as uncorrelated; `a - a` does not cancel.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    marker::PhantomData,
    ops::{Add, Div, Mul, Neg, Sub},
};

use num_traits::Float;
use typenum::{Integer, NonZero, P2, P3};

use crate::{
    dimension::{
        DimDiv, DimMul, DimPow, DimRoot, Dimension, Dimensionless, Inverse, PowerOf, Product, Quotient,
        RootOf,
    },
    error::{QuantityError, Result, raise},
    math::real_root,
    prefix,
    quantity::{Quantity, cast},
    unit::Unit,
};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(serialize = "V: serde::Serialize", deserialize = "V: serde::Deserialize<'de>"))
)]
pub struct UncertainQuantity<D, V = f64> {
    value: V,
    uncertainty: V,
    #[cfg_attr(feature = "serde", serde(skip))]
    _dim: PhantomData<D>,
}

impl<D, V: Float> UncertainQuantity<D, V> {
    /// Wraps a value and uncertainty already in base SI units. The
    /// uncertainty is stored as a magnitude.
    #[inline]
    pub fn from_base(value: V, uncertainty: V) -> Self {
        Self {
            value,
            uncertainty: uncertainty.abs(),
            _dim: PhantomData,
        }
    }
}

impl<D: Dimension, V: Float> UncertainQuantity<D, V> {
    /// Creates `value ± uncertainty`, both expressed in unit `U`.
    ///
    /// ```
    /// use dimad::prelude::*;
    /// let l = UncertainQuantity::new::<Millimeter>(12.0, 0.5);
    /// assert_eq!(l.value(), 0.012);
    /// assert_eq!(l.uncertainty(), 0.0005);
    /// ```
    #[inline]
    pub fn new<U: Unit<Dim = D>>(value: V, uncertainty: V) -> Self {
        let m = cast::<V>(U::MULTIPLIER);
        Self::from_base(value * m, uncertainty * m)
    }

    #[inline]
    pub fn value(&self) -> V {
        self.value
    }

    #[inline]
    pub fn uncertainty(&self) -> V {
        self.uncertainty
    }

    /// `uncertainty / |value|`.
    pub fn relative_uncertainty(&self) -> Result<V> {
        if self.value.is_zero() {
            return Err(QuantityError::DivisionByZero { op: "relative uncertainty" });
        }
        Ok(self.uncertainty / self.value.abs())
    }

    #[inline]
    pub fn quantity(&self) -> Quantity<D, V> {
        Quantity::from_base(self.value)
    }

    #[inline]
    pub fn uncertainty_quantity(&self) -> Quantity<D, V> {
        Quantity::from_base(self.uncertainty)
    }

    pub fn value_in<U: Unit<Dim = D>>(&self) -> (V, V) {
        let m = cast::<V>(U::MULTIPLIER);
        (self.value / m, self.uncertainty / m)
    }

    /// Divides by `rhs`, failing on a zero-valued divisor.
    pub fn try_div<Dr: Dimension>(
        self,
        rhs: UncertainQuantity<Dr, V>,
    ) -> Result<UncertainQuantity<Quotient<D, Dr>, V>>
    where
        D: DimDiv<Dr>,
    {
        let (a, b) = (self.value, rhs.value);
        if b.is_zero() {
            return Err(QuantityError::DivisionByZero { op: "divide" });
        }
        let u = (self.uncertainty / b).hypot(a * rhs.uncertainty / (b * b));
        Ok(UncertainQuantity::from_base(a / b, u))
    }

    /// `x^E`, with uncertainty `|E · x^(E-1)| · u`.
    ///
    /// # Panics
    ///
    /// Panics on a negative power of zero; see [`UncertainQuantity::try_pow`].
    #[track_caller]
    pub fn pow<E: Integer>(self) -> UncertainQuantity<PowerOf<D, E>, V>
    where
        D: DimPow<E>,
    {
        match self.try_pow::<E>() {
            Ok(q) => q,
            Err(e) => raise(e),
        }
    }

    /// `x^E`, failing on a negative power of zero.
    pub fn try_pow<E: Integer>(self) -> Result<UncertainQuantity<PowerOf<D, E>, V>>
    where
        D: DimPow<E>,
    {
        let p = E::I32;
        if p < 0 && self.value.is_zero() {
            return Err(QuantityError::DivisionByZero { op: "pow" });
        }
        let slope = match p {
            0 => V::zero(),
            _ => cast::<V>(f64::from(p)) * self.value.powi(p - 1),
        };
        Ok(UncertainQuantity::from_base(self.value.powi(p), slope.abs() * self.uncertainty))
    }

    /// Real `E`-th root, with uncertainty `|x^(1/E) / (E · x)| · u`.
    ///
    /// # Panics
    ///
    /// Panics where [`UncertainQuantity::try_root`] fails.
    #[track_caller]
    pub fn root<E: Integer + NonZero>(self) -> UncertainQuantity<RootOf<D, E>, V>
    where
        D: DimRoot<E>,
    {
        match self.try_root::<E>() {
            Ok(q) => q,
            Err(e) => raise(e),
        }
    }

    /// Real `E`-th root. Fails on an even root of a negative value, and at
    /// zero, where the slope of the root is unbounded.
    pub fn try_root<E: Integer + NonZero>(self) -> Result<UncertainQuantity<RootOf<D, E>, V>>
    where
        D: DimRoot<E>,
    {
        let n = E::I32;
        if n % 2 == 0 && self.value < V::zero() {
            return Err(QuantityError::InvalidOp {
                op: "root",
                why: format!("even root (n = {n}) of a negative value"),
            });
        }
        if self.value.is_zero() {
            return Err(QuantityError::InvalidOp {
                op: "root",
                why: "uncertainty is unbounded at zero".to_owned(),
            });
        }
        let y = real_root(self.value, n);
        let slope = y / (cast::<V>(f64::from(n)) * self.value);
        Ok(UncertainQuantity::from_base(y, slope.abs() * self.uncertainty))
    }

    #[track_caller]
    pub fn sqrt(self) -> UncertainQuantity<RootOf<D, P2>, V>
    where
        D: DimRoot<P2>,
    {
        self.root::<P2>()
    }

    #[track_caller]
    pub fn cbrt(self) -> UncertainQuantity<RootOf<D, P3>, V>
    where
        D: DimRoot<P3>,
    {
        self.root::<P3>()
    }
}

impl<D: Dimension, V: Float> Quantity<D, V> {
    /// Attaches an uncertainty of the same dimension.
    #[inline]
    pub fn with_uncertainty(self, uncertainty: Quantity<D, V>) -> UncertainQuantity<D, V> {
        UncertainQuantity::from_base(self.value(), uncertainty.value())
    }
}

impl<D: Dimension, V: Float> From<Quantity<D, V>> for UncertainQuantity<D, V> {
    /// An exact value.
    fn from(q: Quantity<D, V>) -> Self {
        Self::from_base(q.value(), V::zero())
    }
}

macro_rules! propagated_fns {
    ($($name:ident => |$x:ident| $slope:expr;)*) => {
        impl<V: Float> UncertainQuantity<Dimensionless, V> {
            $(
                pub fn $name(self) -> Self {
                    let $x = self.value;
                    let slope: V = $slope;
                    Self::from_base($x.$name(), slope.abs() * self.uncertainty)
                }
            )*
        }
    };
}

propagated_fns! {
    sin => |x| x.cos();
    cos => |x| x.sin();
    tan => |x| x.cos().powi(-2);
    exp => |x| x.exp();
    ln => |x| x.recip();
    sinh => |x| x.cosh();
    cosh => |x| x.sinh();
    tanh => |x| V::one() - x.tanh().powi(2);
    asin => |x| (V::one() - x * x).sqrt().recip();
    acos => |x| (V::one() - x * x).sqrt().recip();
    atan => |x| (V::one() + x * x).recip();
    log10 => |x| (x * cast::<V>(std::f64::consts::LN_10)).recip();
}

impl<D, V: Clone> Clone for UncertainQuantity<D, V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            uncertainty: self.uncertainty.clone(),
            _dim: PhantomData,
        }
    }
}

impl<D, V: Copy> Copy for UncertainQuantity<D, V> {}

impl<D, V: PartialEq> PartialEq for UncertainQuantity<D, V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.uncertainty == other.uncertainty
    }
}

impl<D, V: PartialOrd> PartialOrd for UncertainQuantity<D, V> {
    /// Orders by value, then by uncertainty, so the ordering agrees with `==`.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.value.partial_cmp(&other.value)? {
            Ordering::Equal => self.uncertainty.partial_cmp(&other.uncertainty),
            ord => Some(ord),
        }
    }
}

impl<D: Dimension, V: Debug> Debug for UncertainQuantity<D, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UncertainQuantity")
            .field("value", &self.value)
            .field("uncertainty", &self.uncertainty)
            .field("dim", &format_args!("{}", D::VECTOR))
            .finish()
    }
}

impl<D: Dimension, V: Float + Display> Display for UncertainQuantity<D, V> {
    /// `<value> ± <uncertainty> <prefix><unit>`, prefixed by the value's
    /// magnitude.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = prefix::render(D::VECTOR, self.value.to_f64().unwrap_or(f64::NAN));
        let factor = cast::<V>(r.factor);
        let (v, u) = (self.value * factor, self.uncertainty * factor);
        match f.precision() {
            Some(p) => write!(f, "{v:.p$} ± {u:.p$}")?,
            None => write!(f, "{v} ± {u}")?,
        }
        let unit = r.unit();
        if !unit.is_empty() {
            write!(f, " {unit}")?;
        }
        Ok(())
    }
}

impl<D, V: Float> Neg for UncertainQuantity<D, V> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_base(-self.value, self.uncertainty)
    }
}

impl<D, V: Float> Add for UncertainQuantity<D, V> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_base(self.value + rhs.value, self.uncertainty.hypot(rhs.uncertainty))
    }
}

impl<D, V: Float> Sub for UncertainQuantity<D, V> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_base(self.value - rhs.value, self.uncertainty.hypot(rhs.uncertainty))
    }
}

impl<D: Dimension, V: Float> Add<Quantity<D, V>> for UncertainQuantity<D, V> {
    type Output = Self;

    fn add(self, rhs: Quantity<D, V>) -> Self {
        Self::from_base(self.value + rhs.value(), self.uncertainty)
    }
}

impl<D: Dimension, V: Float> Sub<Quantity<D, V>> for UncertainQuantity<D, V> {
    type Output = Self;

    fn sub(self, rhs: Quantity<D, V>) -> Self {
        Self::from_base(self.value - rhs.value(), self.uncertainty)
    }
}

impl<Dl, Dr, V> Mul<UncertainQuantity<Dr, V>> for UncertainQuantity<Dl, V>
where
    Dl: DimMul<Dr>,
    Dr: Dimension,
    V: Float,
{
    type Output = UncertainQuantity<Product<Dl, Dr>, V>;

    /// Relative uncertainties in quadrature, written as
    /// `sqrt((b·ua)² + (a·ub)²)` so zero factors stay finite.
    fn mul(self, rhs: UncertainQuantity<Dr, V>) -> Self::Output {
        let (a, b) = (self.value, rhs.value);
        let u = (b * self.uncertainty).hypot(a * rhs.uncertainty);
        UncertainQuantity::from_base(a * b, u)
    }
}

impl<Dl, Dr, V> Mul<Quantity<Dr, V>> for UncertainQuantity<Dl, V>
where
    Dl: DimMul<Dr>,
    Dr: Dimension,
    V: Float,
{
    type Output = UncertainQuantity<Product<Dl, Dr>, V>;

    fn mul(self, rhs: Quantity<Dr, V>) -> Self::Output {
        let b = rhs.value();
        UncertainQuantity::from_base(self.value * b, self.uncertainty * b.abs())
    }
}

impl<Dl, Dr, V> Div<UncertainQuantity<Dr, V>> for UncertainQuantity<Dl, V>
where
    Dl: DimDiv<Dr>,
    Dr: Dimension,
    V: Float,
{
    type Output = UncertainQuantity<Quotient<Dl, Dr>, V>;

    /// # Panics
    ///
    /// Panics on a zero-valued divisor; see [`UncertainQuantity::try_div`].
    #[track_caller]
    fn div(self, rhs: UncertainQuantity<Dr, V>) -> Self::Output {
        match self.try_div(rhs) {
            Ok(q) => q,
            Err(e) => raise(e),
        }
    }
}

impl<Dl, Dr, V> Div<Quantity<Dr, V>> for UncertainQuantity<Dl, V>
where
    Dl: DimDiv<Dr>,
    Dr: Dimension,
    V: Float,
{
    type Output = UncertainQuantity<Quotient<Dl, Dr>, V>;

    #[track_caller]
    fn div(self, rhs: Quantity<Dr, V>) -> Self::Output {
        match self.try_div(UncertainQuantity::from(rhs)) {
            Ok(q) => q,
            Err(e) => raise(e),
        }
    }
}

macro_rules! scalar_ops {
    ($($t:ty),*) => {$(
        impl<D> Mul<$t> for UncertainQuantity<D, $t> {
            type Output = Self;

            fn mul(self, rhs: $t) -> Self {
                Self::from_base(self.value * rhs, self.uncertainty * rhs)
            }
        }

        impl<D> Mul<UncertainQuantity<D, $t>> for $t {
            type Output = UncertainQuantity<D, $t>;

            fn mul(self, rhs: UncertainQuantity<D, $t>) -> Self::Output {
                rhs * self
            }
        }

        impl<D> Div<$t> for UncertainQuantity<D, $t> {
            type Output = Self;

            #[track_caller]
            fn div(self, rhs: $t) -> Self {
                if rhs == 0.0 {
                    raise(QuantityError::DivisionByZero { op: "divide" });
                }
                Self::from_base(self.value / rhs, self.uncertainty / rhs)
            }
        }

        impl<D: DimPow<typenum::N1>> Div<UncertainQuantity<D, $t>> for $t {
            type Output = UncertainQuantity<Inverse<D>, $t>;

            /// `s / x`, with uncertainty `|s| · u / x²`.
            #[track_caller]
            fn div(self, rhs: UncertainQuantity<D, $t>) -> Self::Output {
                let x = rhs.value;
                if x == 0.0 {
                    raise(QuantityError::DivisionByZero { op: "divide" });
                }
                UncertainQuantity::from_base(self / x, self * rhs.uncertainty / (x * x))
            }
        }
    )*};
}

scalar_ops!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dimension as dim,
        unit::{Meter, Second, Unitless},
    };
    use typenum::{N1, Z0};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn sum_in_quadrature() {
        let a = UncertainQuantity::new::<Meter>(5.0, 0.1);
        let b = UncertainQuantity::new::<Meter>(3.0, 0.2);
        let s = a + b;
        assert_eq!(s.value(), 8.0);
        assert!(close(s.uncertainty(), (0.1f64 * 0.1 + 0.2 * 0.2).sqrt()));
        let d = a - b;
        assert_eq!(d.value(), 2.0);
        assert_eq!(d.uncertainty(), s.uncertainty());
    }

    #[test]
    fn product_uses_relative_quadrature() {
        let a = UncertainQuantity::new::<Meter>(4.0, 0.2);
        let t = UncertainQuantity::new::<Second>(2.0, 0.1);
        let v: UncertainQuantity<dim::Velocity> = a / t;
        assert_eq!(v.value(), 2.0);
        let rel = (0.05f64.powi(2) + 0.05f64.powi(2)).sqrt();
        assert!(close(v.relative_uncertainty().unwrap(), rel));

        let area = a * a;
        assert_eq!(area.value(), 16.0);
        assert!(close(area.relative_uncertainty().unwrap(), rel));

        let zero = UncertainQuantity::new::<Meter>(0.0, 0.1);
        assert!(close((zero * a).uncertainty(), 0.4));
    }

    #[test]
    fn exact_operands_scale_uncertainty() {
        let a = UncertainQuantity::new::<Meter>(2.0, 0.1);
        assert!(close((a * (3.0 * Second)).uncertainty(), 0.3));
        assert!(close((a * -3.0).uncertainty(), 0.3));
        assert!(close((a / (2.0 * Second)).uncertainty(), 0.05));
        assert_eq!((a + 1.0 * Meter).uncertainty(), 0.1);
        assert_eq!((-a).uncertainty(), 0.1);
    }

    #[test]
    fn powers_and_roots() {
        let a = UncertainQuantity::new::<Meter>(2.0, 0.1);
        let cube = a.pow::<P3>();
        assert_eq!(cube.value(), 8.0);
        assert!(close(cube.uncertainty(), 3.0 * 4.0 * 0.1));

        let area = UncertainQuantity::<dim::Area>::from_base(16.0, 0.8);
        let side = area.sqrt();
        assert_eq!(side.value(), 4.0);
        assert!(close(side.uncertainty(), 0.8 / 8.0));
    }

    #[test]
    fn singular_powers_and_roots_fail() {
        let zero = UncertainQuantity::new::<Meter>(0.0, 0.1);
        assert_eq!(zero.try_pow::<N1>(), Err(QuantityError::DivisionByZero { op: "pow" }));
        assert!(std::panic::catch_unwind(|| zero.pow::<N1>()).is_err());
        let one = zero.pow::<Z0>();
        assert_eq!((one.value(), one.uncertainty()), (1.0, 0.0));

        let flat = UncertainQuantity::<dim::Area>::from_base(0.0, 0.01);
        assert!(matches!(flat.try_root::<P2>(), Err(QuantityError::InvalidOp { op: "root", .. })));
        assert!(std::panic::catch_unwind(|| flat.sqrt()).is_err());
        let negative = UncertainQuantity::<dim::Area>::from_base(-4.0, 0.01);
        assert!(negative.try_root::<P2>().is_err());
        let cube = UncertainQuantity::<dim::Volume>::from_base(-8.0, 0.12);
        let side = cube.cbrt();
        assert_eq!(side.value(), -2.0);
        assert!(close(side.uncertainty(), 0.01));
    }

    #[test]
    fn reciprocal_of_uncertain() {
        let t = UncertainQuantity::new::<Second>(4.0, 0.2);
        let f: UncertainQuantity<dim::Frequency> = 1.0 / t;
        assert_eq!(f.value(), 0.25);
        assert!(close(f.uncertainty(), 0.0125));
        let zero = UncertainQuantity::new::<Second>(0.0, 0.2);
        assert!(std::panic::catch_unwind(|| 1.0 / zero).is_err());
    }

    #[test]
    fn ordering_follows_value() {
        let a = UncertainQuantity::new::<Meter>(1.0, 0.5);
        let b = UncertainQuantity::new::<Meter>(2.0, 0.1);
        let c = UncertainQuantity::new::<Meter>(1.0, 0.2);
        assert!(a < b);
        assert!(b > c);
        assert!(c < a);
        assert!(a >= a);
        assert_eq!(a.partial_cmp(&c), Some(Ordering::Greater));
    }

    #[test]
    fn derivative_weighted_functions() {
        let x = UncertainQuantity::new::<Unitless>(0.5, 0.01);
        assert!(close(x.sin().uncertainty(), 0.5f64.cos() * 0.01));
        assert!(close(x.cos().uncertainty(), 0.5f64.sin() * 0.01));
        assert!(close(x.exp().uncertainty(), 0.5f64.exp() * 0.01));
        assert!(close(x.ln().uncertainty(), 0.02));
        assert!(close(x.asin().uncertainty(), 0.01 / 0.75f64.sqrt()));
        assert!(close(x.acos().uncertainty(), 0.01 / 0.75f64.sqrt()));
        assert!(close(x.log10().uncertainty(), 0.02 / std::f64::consts::LN_10));
        assert_eq!(x.asin().value(), 0.5f64.asin());
    }

    #[test]
    fn division_by_zero() {
        let a = UncertainQuantity::new::<Meter>(2.0, 0.1);
        let z = UncertainQuantity::new::<Meter>(0.0, 0.1);
        assert_eq!(a.try_div(z), Err(QuantityError::DivisionByZero { op: "divide" }));
        assert!(z.relative_uncertainty().is_err());
        let r = std::panic::catch_unwind(|| a / z);
        assert!(r.is_err());
    }

    #[test]
    fn display() {
        let a = UncertainQuantity::new::<Meter>(1500.0, 20.0);
        assert_eq!(a.to_string(), "1.5 ± 0.02 km");
        assert_eq!(format!("{:.1}", UncertainQuantity::new::<Second>(2.0, 0.31)), "2.0 ± 0.3 s");
    }
}
