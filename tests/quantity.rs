use dimad::{
    dimension::{self as dim, Dimension, DimensionVector},
    math,
    prelude::*,
    scale::{Kilo, Micro},
};
use typenum::{P2, P3, P4};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * (1.0 + b.abs())
}

#[test]
fn products_and_quotients_close_over_dimensions() {
    let a = 12.0 * Newton;
    let b = 0.25 * Meter;

    let work: Energy = a * b;
    assert_eq!(Energy::dimension(), dim::Force::VECTOR.mul(&dim::Length::VECTOR));
    assert_eq!(work.value(), 3.0);

    let back: Force = work / b;
    assert!(close(back.value(), a.value()));

    let p: Pressure = a / (b * b);
    assert_eq!(Pressure::dimension(), DimensionVector::new(-1, -2, 1, 0, 0, 0, 0));
    assert_eq!(p.value(), 192.0);

    let ratio: Scalar = (3.0 * Kilometer) / (1500.0 * Meter);
    assert_eq!(ratio.value(), 2.0);
}

#[test]
fn roots_undo_powers() {
    let a = 1.7 * Meter;
    assert!(close(a.pow::<P2>().root::<P2>().value(), 1.7));
    assert!(close(a.pow::<P3>().root::<P3>().value(), 1.7));
    assert!(close(math::root::<P4, _, _>(a.pow::<P4>()).value(), 1.7));

    let v: Velocity = 3.0 * (Meter / Second);
    let kinetic: Quantity<dim::PowerOf<dim::Velocity, P2>> = v.pow::<P2>();
    assert_eq!(kinetic.sqrt(), v);
}

#[test]
fn conversions_between_units() {
    let speed = 72.0 * (Kilometer / Hour);
    assert!(close(speed.value(), 20.0));
    assert!(close(speed.value_in::<UnitDiv<Kilometer, Hour>>(), 72.0));

    let t = Quantity::new::<Minute>(1.5);
    assert_eq!(t.value_in::<Second>(), 90.0);
    assert_eq!(t, 90.0 * Second);

    let m = 2.5 * Prefixed::<Kilo, Gram>::new();
    assert_eq!(m, 2.5 * Kilogram);
    let w = 3.0 * Prefixed::<Micro, Meter>::new();
    assert!(close(w.value(), 3e-6));

    assert!(close((2.0 * Liter).value(), 2e-3));
    assert_eq!((1.0 * (Newton * Meter)).value(), (1.0 * Joule).value());
}

#[test]
fn transcendental_functions_on_scalars() {
    let theta = Quantity::new::<Radian>(std::f64::consts::FRAC_PI_6);
    assert!(close(math::sin(theta).value(), 0.5));
    assert!(close(theta.tan().atan().value(), theta.value()));

    let ratio = (2.0 * Meter) / (2.0 * Meter);
    assert!(close(ratio.exp().ln().value(), 1.0));
}

#[test]
fn zero_divisor_is_an_error() {
    let five = 5.0 * Meter;
    let zero = 0.0 * Meter;
    assert_eq!(five.try_div(zero), Err(QuantityError::DivisionByZero { op: "divide" }));

    let caught = std::panic::catch_unwind(|| five / zero);
    assert!(caught.is_err());
    let caught = std::panic::catch_unwind(|| 1.0 / zero);
    assert!(caught.is_err());
    let caught = std::panic::catch_unwind(|| five / 0.0);
    assert!(caught.is_err());
}

#[test]
#[should_panic(expected = "division by zero")]
fn zero_valued_divisor_panics() {
    let _ = (5.0 * Meter) / (0.0 * Meter);
}

#[test]
fn printing_picks_the_nearest_prefix() {
    assert_eq!((2.5e-6 * Second).to_string(), "2.5 µs");
    assert_eq!((4.2e6 * Watt).to_string(), "4.2 MW");
    assert_eq!(format!("{:.1}", 1234.5 * Pascal), "1.2 kPa");
    assert_eq!((0.0025 * Kilogram).to_string(), "2.5 g");
    assert_eq!((1500.0 * Kilogram).to_string(), "1.5 Mg");
    assert_eq!((12.0 * Volt).to_string(), "12 V");
    assert_eq!((1e-30 * Meter).to_string(), "0.000000000000000000000000000001 m");
    assert_eq!(format!("{}", dim::Acceleration::VECTOR), "m·s⁻²");
}

#[test]
fn ordering_and_sums() {
    let mut lengths = vec![3.0 * Meter, 1.0 * Kilometer, 20.0 * Centimeter];
    lengths.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(lengths[0], 0.2 * Meter);
    assert_eq!(lengths[2], 1000.0 * Meter);
    let total: Length = lengths.into_iter().sum();
    assert!(close(total.value(), 1003.2));
}

#[test]
fn single_precision_payloads() {
    let d = Quantity::new::<Meter>(3.0f32);
    let t = Quantity::new::<Second>(2.0f32);
    let v: Quantity<dim::Velocity, f32> = d / t;
    assert_eq!(v.value(), 1.5f32);
}
