//! Unit tags: a dimension paired with a compile-time scale.
//!
//! Units are zero-sized values. Multiplying a number by one folds the
//! unit's multiplier into the payload and yields a [`Quantity`] in base SI
//! units:
//!
//! ```
//! use dimad::prelude::*;
//!
//! let d = 1.5 * Kilometer;
//! assert_eq!(d.value(), 1500.0);
//!
//! let v = 36.0 * (Kilometer / Hour);
//! assert!((v.value() - 10.0).abs() < 1e-12);
//! ```

use std::{
    borrow::Cow,
    marker::PhantomData,
    ops::{Div, Mul},
};

use crate::{
    dimension::{self as dim, DimDiv, DimMul, Dimension, Product, Quotient},
    prefix,
    quantity::Quantity,
    scale::{Centi, Kilo, Mega, Micro, Milli, Nano, One, Ratio, Scale, ScaleDiv, ScaleMul},
};

/// A physical unit: a dimension plus a rational scale relative to the SI
/// base unit of that dimension.
pub trait Unit: 'static {
    type Dim: Dimension;
    type Scale: Scale;

    /// Factor converting a value in this unit to the base unit.
    const MULTIPLIER: f64 = <Self::Scale as Scale>::MULTIPLIER;

    fn symbol() -> Cow<'static, str>;
}

/// Defines a named unit tag.
macro_rules! unit {
    ($(#[$meta:meta])* $name:ident, $dim:ty, $scale:ty, $symbol:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Unit for $name {
            type Dim = $dim;
            type Scale = $scale;

            fn symbol() -> Cow<'static, str> {
                Cow::Borrowed($symbol)
            }
        }

        unit_ops!([] $name);
    };
}

/// Literal construction (`2.0 * Meter`) and unit composition
/// (`Meter / Second`) for a unit type. Literals build `f64` quantities;
/// other payloads go through [`Quantity::new`].
macro_rules! unit_ops {
    ([$($gen:tt)*] $ty:ty $(where $($bound:tt)*)?) => {
        impl<$($gen)*> Mul<$ty> for f64 $(where $($bound)*)? {
            type Output = Quantity<<$ty as Unit>::Dim, f64>;

            #[inline]
            fn mul(self, _: $ty) -> Self::Output {
                Quantity::new::<$ty>(self)
            }
        }

        impl<$($gen)* Rhs: Unit> Mul<Rhs> for $ty $(where $($bound)*)? {
            type Output = UnitMul<$ty, Rhs>;

            #[inline]
            fn mul(self, _: Rhs) -> Self::Output {
                UnitMul(PhantomData)
            }
        }

        impl<$($gen)* Rhs: Unit> Div<Rhs> for $ty $(where $($bound)*)? {
            type Output = UnitDiv<$ty, Rhs>;

            #[inline]
            fn div(self, _: Rhs) -> Self::Output {
                UnitDiv(PhantomData)
            }
        }
    };
}

/// A unit `U` scaled by the prefix `P`, e.g. `Prefixed<Milli, Second>`.
pub struct Prefixed<P, U>(PhantomData<(P, U)>);

/// The product of two units, e.g. `Newton * Meter`.
pub struct UnitMul<A, B>(PhantomData<(A, B)>);

/// The quotient of two units, e.g. `Kilometer / Hour`.
pub struct UnitDiv<A, B>(PhantomData<(A, B)>);

macro_rules! marker_impls {
    ($name:ident) => {
        impl<A, B> $name<A, B> {
            pub const fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<A, B> Clone for $name<A, B> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<A, B> Copy for $name<A, B> {}

        impl<A, B> Default for $name<A, B> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<A, B> std::fmt::Debug for $name<A, B> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(stringify!($name))
            }
        }
    };
}

marker_impls!(Prefixed);
marker_impls!(UnitMul);
marker_impls!(UnitDiv);

impl<P: Scale, U: Unit> Unit for Prefixed<P, U> {
    type Dim = U::Dim;
    type Scale = ScaleMul<P, U::Scale>;

    fn symbol() -> Cow<'static, str> {
        match prefix::symbol_for(P::MULTIPLIER) {
            Some(p) => Cow::Owned(format!("{p}{}", U::symbol())),
            None => Cow::Owned(format!("{}·{}", P::MULTIPLIER, U::symbol())),
        }
    }
}

impl<A: Unit, B: Unit> Unit for UnitMul<A, B>
where
    A::Dim: DimMul<B::Dim>,
{
    type Dim = Product<A::Dim, B::Dim>;
    type Scale = ScaleMul<A::Scale, B::Scale>;

    fn symbol() -> Cow<'static, str> {
        Cow::Owned(format!("{}·{}", A::symbol(), B::symbol()))
    }
}

impl<A: Unit, B: Unit> Unit for UnitDiv<A, B>
where
    A::Dim: DimDiv<B::Dim>,
{
    type Dim = Quotient<A::Dim, B::Dim>;
    type Scale = ScaleDiv<A::Scale, B::Scale>;

    fn symbol() -> Cow<'static, str> {
        Cow::Owned(format!("{}/{}", A::symbol(), B::symbol()))
    }
}

unit_ops!([P: Scale, U: Unit,] Prefixed<P, U>);
unit_ops!([A: Unit, B: Unit,] UnitMul<A, B> where A::Dim: DimMul<B::Dim>);
unit_ops!([A: Unit, B: Unit,] UnitDiv<A, B> where A::Dim: DimDiv<B::Dim>);

unit!(
    /// Pure number.
    Unitless, dim::Dimensionless, One, ""
);
unit!(Radian, dim::Angle, One, "rad");

unit!(Meter, dim::Length, One, "m");
unit!(Second, dim::Time, One, "s");
unit!(Kilogram, dim::Mass, One, "kg");
unit!(Kelvin, dim::Temperature, One, "K");
unit!(Ampere, dim::Current, One, "A");
unit!(Mole, dim::Substance, One, "mol");
unit!(Candela, dim::LuminousIntensity, One, "cd");

unit!(Hertz, dim::Frequency, One, "Hz");
unit!(Newton, dim::Force, One, "N");
unit!(Joule, dim::Energy, One, "J");
unit!(Watt, dim::Power, One, "W");
unit!(Pascal, dim::Pressure, One, "Pa");
unit!(Coulomb, dim::Charge, One, "C");
unit!(Volt, dim::Voltage, One, "V");
unit!(Ohm, dim::Resistance, One, "Ω");

unit!(Kilometer, dim::Length, ScaleMul<Kilo, One>, "km");
unit!(Centimeter, dim::Length, ScaleMul<Centi, One>, "cm");
unit!(Millimeter, dim::Length, ScaleMul<Milli, One>, "mm");
unit!(Micrometer, dim::Length, ScaleMul<Micro, One>, "µm");
unit!(Nanometer, dim::Length, ScaleMul<Nano, One>, "nm");

unit!(Millisecond, dim::Time, ScaleMul<Milli, One>, "ms");
unit!(Microsecond, dim::Time, ScaleMul<Micro, One>, "µs");
unit!(Nanosecond, dim::Time, ScaleMul<Nano, One>, "ns");
unit!(Minute, dim::Time, Ratio<60, 1>, "min");
unit!(Hour, dim::Time, Ratio<3_600, 1>, "h");
unit!(Day, dim::Time, Ratio<86_400, 1>, "d");

unit!(
    /// One thousandth of the base unit of mass.
    Gram, dim::Mass, Milli, "g"
);
unit!(Milligram, dim::Mass, ScaleMul<Milli, Milli>, "mg");
unit!(Microgram, dim::Mass, ScaleMul<Micro, Milli>, "µg");
unit!(Tonne, dim::Mass, Kilo, "t");

unit!(Liter, dim::Volume, Milli, "L");
unit!(Milliliter, dim::Volume, ScaleMul<Milli, Milli>, "mL");

unit!(Kilojoule, dim::Energy, Kilo, "kJ");
unit!(Kilowatt, dim::Power, Kilo, "kW");
unit!(Kilonewton, dim::Force, Kilo, "kN");
unit!(Megapascal, dim::Pressure, Mega, "MPa");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipliers() {
        assert_eq!(Kilometer::MULTIPLIER, 1e3);
        assert_eq!(Milligram::MULTIPLIER, 1e-6);
        assert_eq!(<Prefixed<Milli, Second>>::MULTIPLIER, 1e-3);
        assert_eq!(<UnitDiv<Kilometer, Hour>>::MULTIPLIER, 1000.0 / 3600.0);
        assert_eq!(<<UnitMul<Newton, Meter> as Unit>::Scale as Scale>::NUM, 1);
    }

    #[test]
    fn composite_dimensions() {
        assert_eq!(
            <<UnitMul<Newton, Meter> as Unit>::Dim as Dimension>::VECTOR,
            <<Joule as Unit>::Dim as Dimension>::VECTOR
        );
        assert_eq!(
            <<UnitDiv<Meter, Second> as Unit>::Dim as Dimension>::VECTOR,
            <dim::Velocity as Dimension>::VECTOR
        );
    }

    #[test]
    fn symbols() {
        assert_eq!(Kilometer::symbol(), "km");
        assert_eq!(<Prefixed<Micro, Meter>>::symbol(), "µm");
        assert_eq!(<UnitDiv<Kilometer, Hour>>::symbol(), "km/h");
        assert_eq!(<Prefixed<Ratio<3, 1>, Meter>>::symbol(), "3·m");
    }

    #[test]
    fn literal_construction() {
        assert_eq!((250.0 * Millisecond).value(), 0.25);
        assert_eq!((2.0 * Prefixed::<Kilo, Newton>::new()).value(), 2000.0);
        let speed = 72.0 * (Kilometer / Hour);
        assert!((speed.value() - 20.0).abs() < 1e-12);
        let torque = Quantity::new::<UnitMul<Newton, Meter>>(3.0f32);
        assert_eq!(torque.value(), 3.0f32);
        assert_eq!((6.0 * Joule).to_string(), "6 J");
    }
}
