//! Named functions over quantities.
//!
//! Transcendental functions only accept dimensionless quantities; roots and
//! powers move the dimension through [`DimRoot`] and [`DimPow`]. Calling
//! `sin` on a length is a type error:
//!
//! ```compile_fail
//! use dimad::prelude::*;
//! let _ = dimad::math::sin(2.0 * Meter);
//! ```

use num_traits::Float;
use typenum::{Integer, NonZero, P2, P3};

use crate::{
    dimension::{DimPow, DimRoot, Dimension, Dimensionless, PowerOf, RootOf},
    error::{QuantityError, Result, raise},
    quantity::{Quantity, cast},
};

type Scalar<V> = Quantity<Dimensionless, V>;

/// Real `n`-th root, keeping the sign for odd `n`.
pub(crate) fn real_root<V: Float>(x: V, n: i32) -> V {
    match n {
        1 => x,
        2 => x.sqrt(),
        3 => x.cbrt(),
        _ => {
            let inv = V::one() / cast::<V>(f64::from(n));
            if x < V::zero() && n % 2 != 0 {
                -(-x).powf(inv)
            } else {
                x.powf(inv)
            }
        }
    }
}

macro_rules! scalar_fns {
    ($($(#[$meta:meta])* $name:ident => $f:ident;)*) => {
        impl<V: Float> Quantity<Dimensionless, V> {
            $(
                $(#[$meta])*
                #[inline]
                pub fn $name(self) -> Self {
                    Quantity::from_base(self.value().$f())
                }
            )*
        }

        $(
            $(#[$meta])*
            #[inline]
            pub fn $name<V: Float>(x: Scalar<V>) -> Scalar<V> {
                x.$name()
            }
        )*
    };
}

scalar_fns! {
    sin => sin;
    cos => cos;
    tan => tan;
    asin => asin;
    acos => acos;
    atan => atan;
    sinh => sinh;
    cosh => cosh;
    tanh => tanh;
    exp => exp;
    /// Natural logarithm.
    ln => ln;
    log10 => log10;
}

impl<V: Float> Quantity<Dimensionless, V> {
    #[inline]
    pub fn powf(self, exponent: Self) -> Self {
        Quantity::from_base(self.value().powf(exponent.value()))
    }
}

#[inline]
pub fn powf<V: Float>(x: Scalar<V>, exponent: Scalar<V>) -> Scalar<V> {
    x.powf(exponent)
}

impl<D: Dimension, V: Float> Quantity<D, V> {
    /// Raises to the type-level integer power `E`.
    ///
    /// ```
    /// use dimad::prelude::*;
    /// use typenum::P3;
    /// let side = 2.0 * Meter;
    /// let v: Volume = side.pow::<P3>();
    /// assert_eq!(v.value(), 8.0);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics on a negative power of zero; see [`Quantity::try_pow`].
    #[track_caller]
    pub fn pow<E: Integer>(self) -> Quantity<PowerOf<D, E>, V>
    where
        D: DimPow<E>,
    {
        match self.try_pow::<E>() {
            Ok(q) => q,
            Err(e) => raise(e),
        }
    }

    /// `self^E`, failing on a negative power of zero.
    pub fn try_pow<E: Integer>(self) -> Result<Quantity<PowerOf<D, E>, V>>
    where
        D: DimPow<E>,
    {
        if E::I32 < 0 && self.value().is_zero() {
            return Err(QuantityError::DivisionByZero { op: "pow" });
        }
        Ok(Quantity::from_base(self.value().powi(E::I32)))
    }

    /// The real `E`-th root. Only compiles when every exponent of `D` is a
    /// multiple of `E`.
    ///
    /// # Panics
    ///
    /// Panics on an even root of a negative value; see [`Quantity::try_root`].
    #[track_caller]
    pub fn root<E: Integer + NonZero>(self) -> Quantity<RootOf<D, E>, V>
    where
        D: DimRoot<E>,
    {
        match self.try_root::<E>() {
            Ok(q) => q,
            Err(e) => raise(e),
        }
    }

    /// The real `E`-th root, rejecting even roots of negative values.
    pub fn try_root<E: Integer + NonZero>(self) -> Result<Quantity<RootOf<D, E>, V>>
    where
        D: DimRoot<E>,
    {
        if E::I32 % 2 == 0 && self.value() < V::zero() {
            return Err(QuantityError::InvalidOp {
                op: "root",
                why: format!("even root (n = {}) of a negative value", E::I32),
            });
        }
        Ok(Quantity::from_base(real_root(self.value(), E::I32)))
    }

    #[track_caller]
    pub fn sqrt(self) -> Quantity<RootOf<D, P2>, V>
    where
        D: DimRoot<P2>,
    {
        self.root::<P2>()
    }

    #[inline]
    pub fn cbrt(self) -> Quantity<RootOf<D, P3>, V>
    where
        D: DimRoot<P3>,
    {
        self.root::<P3>()
    }

    #[inline]
    pub fn abs(self) -> Self {
        Quantity::from_base(self.value().abs())
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Quantity::from_base(self.value().min(other.value()))
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        Quantity::from_base(self.value().max(other.value()))
    }

    /// `sqrt(self² + other²)` without intermediate overflow.
    #[inline]
    pub fn hypot(self, other: Self) -> Self {
        Quantity::from_base(self.value().hypot(other.value()))
    }

    /// Four-quadrant angle of the point `(other, self)`.
    #[inline]
    pub fn atan2(self, other: Self) -> Scalar<V> {
        Quantity::from_base(self.value().atan2(other.value()))
    }
}

#[track_caller]
pub fn pow<E: Integer, D: DimPow<E>, V: Float>(x: Quantity<D, V>) -> Quantity<PowerOf<D, E>, V> {
    x.pow::<E>()
}

#[track_caller]
pub fn root<E: Integer + NonZero, D: DimRoot<E>, V: Float>(
    x: Quantity<D, V>,
) -> Quantity<RootOf<D, E>, V> {
    x.root::<E>()
}

#[track_caller]
pub fn sqrt<D: DimRoot<P2>, V: Float>(x: Quantity<D, V>) -> Quantity<RootOf<D, P2>, V> {
    x.sqrt()
}

#[inline]
pub fn cbrt<D: DimRoot<P3>, V: Float>(x: Quantity<D, V>) -> Quantity<RootOf<D, P3>, V> {
    x.cbrt()
}

#[cfg(test)]
mod tests {
    use typenum::{N1, N2, P4};

    use super::*;
    use crate::{
        dimension as dim,
        unit::{Meter, Radian, Second, Unitless},
    };

    #[test]
    fn transcendental_on_scalars() {
        let half_pi = Quantity::new::<Radian>(std::f64::consts::FRAC_PI_2);
        assert!((sin(half_pi).value() - 1.0).abs() < 1e-15);
        assert!(half_pi.cos().value().abs() < 1e-15);
        assert!((Quantity::new::<Unitless>(1.0).exp().ln().value() - 1.0).abs() < 1e-15);
        assert!((log10(Scalar::scalar(1000.0)).value() - 3.0).abs() < 1e-12);
        assert_eq!(powf(Scalar::scalar(2.0), Scalar::scalar(10.0)).value(), 1024.0);
    }

    #[test]
    fn roots_and_powers_move_dimension() {
        let area: Quantity<dim::Area> = (3.0 * Meter) * (3.0 * Meter);
        let side: Quantity<dim::Length> = area.sqrt();
        assert_eq!(side.value(), 3.0);

        let per_area: Quantity<PowerOf<dim::Length, N2>> = pow::<N2, _, _>(2.0 * Meter);
        assert_eq!(per_area.value(), 0.25);

        let hyper = (2.0 * Meter).pow::<P4>();
        assert!((hyper.root::<P4>().value() - 2.0).abs() < 1e-12);

        let volume = (27.0 * Meter).pow::<typenum::P1>() * area;
        assert!((cbrt(volume).value() - (243.0f64).cbrt()).abs() < 1e-12);
    }

    #[test]
    fn odd_roots_keep_sign() {
        let v = Quantity::<dim::Volume>::from_base(-8.0);
        assert_eq!(v.root::<P3>().value(), -2.0);
        assert!(Quantity::<dim::Area>::from_base(-4.0).try_root::<P2>().is_err());
        assert_eq!(Quantity::<dim::Area>::from_base(0.0).sqrt().value(), 0.0);
    }

    #[test]
    fn negative_power_of_zero_is_an_error() {
        let zero = 0.0 * Meter;
        assert_eq!(
            zero.try_pow::<N1>().map(|q| q.value()),
            Err(QuantityError::DivisionByZero { op: "pow" })
        );
        assert_eq!(zero.pow::<typenum::Z0>().value(), 1.0);
        assert_eq!((4.0 * Meter).try_pow::<N2>().map(|q| q.value()), Ok(0.0625));
        assert!(std::panic::catch_unwind(|| zero.pow::<N2>()).is_err());
    }

    #[test]
    #[should_panic(expected = "even root")]
    fn even_root_of_negative_panics() {
        let _ = Quantity::<dim::Area>::from_base(-4.0).sqrt();
    }

    #[test]
    fn same_dimension_helpers() {
        let (a, b) = (3.0 * Meter, 4.0 * Meter);
        assert_eq!(a.hypot(b).value(), 5.0);
        assert_eq!(a.min(b), a);
        assert_eq!((-a).abs(), a);
        let t = 1.0 * Second;
        assert!((t.atan2(t).value() - std::f64::consts::FRAC_PI_4).abs() < 1e-15);
    }
}
