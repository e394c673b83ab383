//! [`Quantity`]: one floating-point payload tagged with a type-level
//! dimension.
//!
//! The payload is always stored in the SI base unit of its dimension, so
//! arithmetic never converts scales at runtime. Dimension mismatches do not
//! compile:
//!
//! ```compile_fail
//! use dimad::prelude::*;
//! let _ = 2.0 * Meter + 3.0 * Second;
//! ```

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    iter::Sum,
    marker::PhantomData,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use num_traits::Float;

use crate::{
    dimension::{self as dim, DimDiv, DimMul, DimPow, Dimension, Inverse, Product, Quotient},
    error::{QuantityError, Result, raise},
    prefix,
    unit::Unit,
};

/// A physical quantity of dimension `D` with a payload of type `V`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        transparent,
        bound(serialize = "V: serde::Serialize", deserialize = "V: serde::Deserialize<'de>")
    )
)]
pub struct Quantity<D, V = f64> {
    value: V,
    #[cfg_attr(feature = "serde", serde(skip))]
    _dim: PhantomData<D>,
}

/// Converts an `f64` constant into the payload type.
#[inline]
pub(crate) fn cast<V: Float>(x: f64) -> V {
    V::from(x).unwrap_or_else(V::nan)
}

impl<D, V> Quantity<D, V> {
    /// Wraps a payload that is already in base SI units.
    #[inline]
    pub const fn from_base(value: V) -> Self {
        Self {
            value,
            _dim: PhantomData,
        }
    }
}

impl<D: Dimension, V: Float> Quantity<D, V> {
    /// Creates a quantity from a value expressed in unit `U`.
    ///
    /// ```
    /// use dimad::prelude::*;
    /// let t = Quantity::new::<Millisecond>(250.0);
    /// assert_eq!(t.value(), 0.25);
    /// ```
    #[inline]
    pub fn new<U: Unit<Dim = D>>(value: V) -> Self {
        Self::from_base(value * cast(U::MULTIPLIER))
    }

    #[inline]
    pub fn zero() -> Self {
        Self::from_base(V::zero())
    }

    /// The payload in base SI units.
    #[inline]
    pub fn value(&self) -> V {
        self.value
    }

    /// The payload expressed in another unit of the same dimension.
    #[inline]
    pub fn value_in<U: Unit<Dim = D>>(&self) -> V {
        self.value / cast(U::MULTIPLIER)
    }

    #[inline]
    pub fn dimension() -> dim::DimensionVector {
        D::VECTOR
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }

    /// Divides by `rhs`, failing on a zero-valued divisor.
    pub fn try_div<Dr>(self, rhs: Quantity<Dr, V>) -> Result<Quantity<Quotient<D, Dr>, V>>
    where
        D: DimDiv<Dr>,
        Dr: Dimension,
    {
        if rhs.value.is_zero() {
            return Err(QuantityError::DivisionByZero { op: "divide" });
        }
        Ok(Quantity::from_base(self.value / rhs.value))
    }

    /// `1 / self`, failing on zero.
    pub fn try_recip(self) -> Result<Quantity<Inverse<D>, V>>
    where
        D: DimPow<typenum::N1>,
    {
        if self.value.is_zero() {
            return Err(QuantityError::DivisionByZero { op: "invert" });
        }
        Ok(Quantity::from_base(self.value.recip()))
    }

    /// `1 / self`.
    ///
    /// # Panics
    ///
    /// Panics if `self` is zero.
    #[track_caller]
    pub fn recip(self) -> Quantity<Inverse<D>, V>
    where
        D: DimPow<typenum::N1>,
    {
        match self.try_recip() {
            Ok(q) => q,
            Err(e) => raise(e),
        }
    }

    /// Formats the value in unit `U`, e.g. `"1.5 km"`.
    pub fn display_in<U: Unit<Dim = D>>(&self) -> String
    where
        V: Display,
    {
        let symbol = U::symbol();
        if symbol.is_empty() {
            format!("{}", self.value_in::<U>())
        } else {
            format!("{} {symbol}", self.value_in::<U>())
        }
    }
}

impl<V: Float> Quantity<dim::Dimensionless, V> {
    /// A dimensionless quantity.
    #[inline]
    pub fn scalar(value: V) -> Self {
        Self::from_base(value)
    }
}

impl<D, V: Clone> Clone for Quantity<D, V> {
    fn clone(&self) -> Self {
        Self::from_base(self.value.clone())
    }
}

impl<D, V: Copy> Copy for Quantity<D, V> {}

impl<D, V: Default> Default for Quantity<D, V> {
    fn default() -> Self {
        Self::from_base(V::default())
    }
}

impl<D: Dimension, V: Debug> Debug for Quantity<D, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Quantity")
            .field("value", &self.value)
            .field("dim", &format_args!("{}", D::VECTOR))
            .finish()
    }
}

impl<D: Dimension, V: Float + Display> Display for Quantity<D, V> {
    /// Writes `<value> <prefix><unit>` with the power-of-1000 prefix nearest
    /// the magnitude. Honours the formatter precision.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = prefix::render(D::VECTOR, self.value.to_f64().unwrap_or(f64::NAN));
        let shown = self.value * cast(r.factor);
        match f.precision() {
            Some(p) => write!(f, "{shown:.p$}")?,
            None => write!(f, "{shown}")?,
        }
        let unit = r.unit();
        if !unit.is_empty() {
            write!(f, " {unit}")?;
        }
        Ok(())
    }
}

impl<D, V: PartialEq> PartialEq for Quantity<D, V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<D, V: PartialOrd> PartialOrd for Quantity<D, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<D, V: Float> Add for Quantity<D, V> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_base(self.value + rhs.value)
    }
}

impl<D, V: Float> Sub for Quantity<D, V> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_base(self.value - rhs.value)
    }
}

impl<D, V: Float> Neg for Quantity<D, V> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::from_base(-self.value)
    }
}

impl<D, V: Float> AddAssign for Quantity<D, V> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.value = self.value + rhs.value;
    }
}

impl<D, V: Float> SubAssign for Quantity<D, V> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.value = self.value - rhs.value;
    }
}

impl<D, V: Float> Sum for Quantity<D, V> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::from_base(V::zero()), |acc, q| acc + q)
    }
}

impl<Dl, Dr, V> Mul<Quantity<Dr, V>> for Quantity<Dl, V>
where
    Dl: DimMul<Dr>,
    Dr: Dimension,
    V: Float,
{
    type Output = Quantity<Product<Dl, Dr>, V>;

    #[inline]
    fn mul(self, rhs: Quantity<Dr, V>) -> Self::Output {
        Quantity::from_base(self.value * rhs.value)
    }
}

impl<Dl, Dr, V> Div<Quantity<Dr, V>> for Quantity<Dl, V>
where
    Dl: DimDiv<Dr>,
    Dr: Dimension,
    V: Float,
{
    type Output = Quantity<Quotient<Dl, Dr>, V>;

    /// # Panics
    ///
    /// Panics if `rhs` is zero; see [`Quantity::try_div`].
    #[track_caller]
    fn div(self, rhs: Quantity<Dr, V>) -> Self::Output {
        match self.try_div(rhs) {
            Ok(q) => q,
            Err(e) => raise(e),
        }
    }
}

impl<D, V: Float> MulAssign<V> for Quantity<D, V> {
    #[inline]
    fn mul_assign(&mut self, rhs: V) {
        self.value = self.value * rhs;
    }
}

impl<D, V: Float> DivAssign<V> for Quantity<D, V> {
    #[track_caller]
    fn div_assign(&mut self, rhs: V) {
        if rhs.is_zero() {
            raise(QuantityError::DivisionByZero { op: "divide" });
        }
        self.value = self.value / rhs;
    }
}

macro_rules! scalar_ops {
    ($($t:ty),*) => {$(
        impl<D> Mul<$t> for Quantity<D, $t> {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: $t) -> Self {
                Self::from_base(self.value * rhs)
            }
        }

        impl<D> Mul<Quantity<D, $t>> for $t {
            type Output = Quantity<D, $t>;

            #[inline]
            fn mul(self, rhs: Quantity<D, $t>) -> Self::Output {
                Quantity::from_base(self * rhs.value)
            }
        }

        impl<D> Div<$t> for Quantity<D, $t> {
            type Output = Self;

            #[track_caller]
            fn div(self, rhs: $t) -> Self {
                if rhs == 0.0 {
                    raise(QuantityError::DivisionByZero { op: "divide" });
                }
                Self::from_base(self.value / rhs)
            }
        }

        impl<D: DimPow<typenum::N1>> Div<Quantity<D, $t>> for $t {
            type Output = Quantity<Inverse<D>, $t>;

            #[track_caller]
            fn div(self, rhs: Quantity<D, $t>) -> Self::Output {
                if rhs.value == 0.0 {
                    raise(QuantityError::DivisionByZero { op: "divide" });
                }
                Quantity::from_base(self / rhs.value)
            }
        }
    )*};
}

scalar_ops!(f32, f64);

pub type Scalar = Quantity<dim::Dimensionless>;
pub type Length = Quantity<dim::Length>;
pub type Time = Quantity<dim::Time>;
pub type Mass = Quantity<dim::Mass>;
pub type Temperature = Quantity<dim::Temperature>;
pub type Current = Quantity<dim::Current>;
pub type Substance = Quantity<dim::Substance>;
pub type LuminousIntensity = Quantity<dim::LuminousIntensity>;
pub type Area = Quantity<dim::Area>;
pub type Volume = Quantity<dim::Volume>;
pub type Frequency = Quantity<dim::Frequency>;
pub type Velocity = Quantity<dim::Velocity>;
pub type Acceleration = Quantity<dim::Acceleration>;
pub type Momentum = Quantity<dim::Momentum>;
pub type Force = Quantity<dim::Force>;
pub type Energy = Quantity<dim::Energy>;
pub type Power = Quantity<dim::Power>;
pub type Pressure = Quantity<dim::Pressure>;
pub type Charge = Quantity<dim::Charge>;
pub type Voltage = Quantity<dim::Voltage>;
pub type Resistance = Quantity<dim::Resistance>;
pub type Angle = Quantity<dim::Angle>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{Gram, Kilogram, Kilometer, Meter, Millimeter, Newton, Second};

    #[test]
    fn construction_folds_scale() {
        let a = Quantity::new::<Millimeter>(5.0);
        let b = Quantity::new::<Meter>(0.005);
        assert_eq!(a, b);
        assert_eq!(Quantity::new::<Gram>(1500.0).value(), 1.5);
        assert_eq!(Quantity::new::<Kilometer>(2.5).value_in::<Meter>(), 2500.0);
    }

    #[test]
    fn arithmetic_tracks_dimension() {
        let d: Length = 100.0 * Meter;
        let t: Time = 9.58 * Second;
        let v: Velocity = d / t;
        assert!((v.value() - 100.0 / 9.58).abs() < 1e-12);

        let m: Mass = 2.0 * Kilogram;
        let a: Acceleration = Quantity::from_base(9.81);
        let f: Force = m * a;
        assert_eq!(f, 19.62 * Newton);
        assert_eq!(Force::dimension(), dim::Force::VECTOR);
    }

    #[test]
    fn scalar_ops() {
        let d = 3.0 * Meter;
        assert_eq!((d * 2.0).value(), 6.0);
        assert_eq!((2.0 * d).value(), 6.0);
        assert_eq!((d / 2.0).value(), 1.5);
        let f: Frequency = 1.0 / (0.5 * Second);
        assert_eq!(f.value(), 2.0);

        let mut acc = d;
        acc += 1.0 * Meter;
        acc -= 0.5 * Meter;
        acc *= 2.0;
        acc /= 7.0;
        assert_eq!(acc.value(), 1.0);
    }

    #[test]
    fn comparison_and_sum() {
        let a = 1.0 * Meter;
        let b = 900.0 * Millimeter;
        assert!(a > b);
        assert!(-a < b);
        let total: Length = [a, b, a].into_iter().sum();
        assert!((total.value() - 2.9).abs() < 1e-12);
    }

    #[test]
    fn checked_division() {
        let d = 5.0 * Meter;
        let zero = 0.0 * Meter;
        assert_eq!(d.try_div(zero), Err(QuantityError::DivisionByZero { op: "divide" }));
        assert_eq!(d.try_div(2.0 * Meter).map(|q| q.value()), Ok(2.5));
        assert!(zero.try_recip().is_err());
        assert_eq!((4.0 * Second).recip().value(), 0.25);
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn zero_divisor_panics() {
        let _ = (5.0 * Meter) / (0.0 * Meter);
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn zero_scalar_divisor_panics() {
        let _ = (5.0 * Meter) / 0.0;
    }

    #[test]
    fn display_picks_prefix() {
        assert_eq!((1500.0 * Meter).to_string(), "1.5 km");
        assert_eq!((0.25 * Second).to_string(), "250 ms");
        assert_eq!((2.0 * Kilogram).to_string(), "2 kg");
        assert_eq!(Quantity::new::<Gram>(5.0).to_string(), "5 g");
        assert_eq!((0.0 * Meter).to_string(), "0 m");
        assert_eq!(format!("{:.2}", 1234.5 * Newton), "1.23 kN");
        assert_eq!((3.0 * (Meter / Second)).to_string(), "3 m·s⁻¹");
        assert_eq!(Scalar::scalar(0.5).to_string(), "0.5");
        assert_eq!((36.0 * Kilometer).display_in::<Kilometer>(), "36 km");
    }
}
