//! Physical constants (CODATA 2018) as typed quantities in base SI units.

use typenum::{N1, N2, P1, P2, P3, Z0};

use crate::{
    dimension::{self as dim, Dim},
    quantity::Quantity,
};

pub const SPEED_OF_LIGHT: Quantity<dim::Velocity> = Quantity::from_base(299_792_458.0);

pub const STANDARD_GRAVITY: Quantity<dim::Acceleration> = Quantity::from_base(9.806_65);

/// m³·kg⁻¹·s⁻²
pub const GRAVITATIONAL_CONSTANT: Quantity<Dim<P3, N2, N1, Z0, Z0, Z0, Z0>> =
    Quantity::from_base(6.674_30e-11);

/// J·s
pub const PLANCK: Quantity<Dim<P2, N1, P1, Z0, Z0, Z0, Z0>> = Quantity::from_base(6.626_070_15e-34);

/// J·K⁻¹
pub const BOLTZMANN: Quantity<Dim<P2, N2, P1, N1, Z0, Z0, Z0>> = Quantity::from_base(1.380_649e-23);

pub const AVOGADRO: Quantity<Dim<Z0, Z0, Z0, Z0, Z0, N1, Z0>> = Quantity::from_base(6.022_140_76e23);

pub const ELEMENTARY_CHARGE: Quantity<dim::Charge> = Quantity::from_base(1.602_176_634e-19);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        quantity::{Energy, Mass},
        unit::{Kelvin, Kilogram, Meter, Second},
    };

    #[test]
    fn constants_compose_dimensionally() {
        let m: Mass = 1.0 * Kilogram;
        let rest: Energy = m * (SPEED_OF_LIGHT * SPEED_OF_LIGHT);
        assert_eq!(rest.value(), 299_792_458.0f64.powi(2));

        let thermal: Energy = BOLTZMANN * (300.0 * Kelvin);
        assert!((thermal.value() - 4.141_947e-21).abs() < 1e-26);

        let r = 6.371e6 * Meter;
        let earth = 5.972e24 * Kilogram;
        let g: Quantity<dim::Acceleration> = GRAVITATIONAL_CONSTANT * earth / (r * r);
        assert!((g.value() - STANDARD_GRAVITY.value()).abs() < 0.05);

        let t = 1.0 * Second;
        let _: Quantity<dim::Length> = SPEED_OF_LIGHT * t;
    }
}
