use dimad::{dimension as dim, prelude::*};
use typenum::P2;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * (1.0 + b.abs())
}

#[test]
fn sum_combines_in_quadrature() {
    let a = UncertainQuantity::new::<Meter>(5.0, 0.1);
    let b = UncertainQuantity::new::<Meter>(3.0, 0.2);
    let sum = a + b;
    assert_eq!(sum.value(), 8.0);
    assert!(close(sum.uncertainty(), 0.223_606_797_749_979));
}

#[test]
fn measured_velocity() {
    let distance = UncertainQuantity::new::<Kilometer>(1.2, 0.01);
    let time = UncertainQuantity::new::<Minute>(2.0, 0.05);
    let v: UncertainQuantity<dim::Velocity> = distance / time;
    assert!(close(v.value(), 10.0));

    let rel = ((0.01f64 / 1.2).powi(2) + (0.05f64 / 2.0).powi(2)).sqrt();
    assert!(close(v.relative_uncertainty().unwrap(), rel));
    let (shown, spread) = v.value_in::<UnitDiv<Kilometer, Hour>>();
    assert!(close(shown, 36.0));
    assert!(close(spread, 36.0 * rel));
}

#[test]
fn exact_and_uncertain_mix() {
    let side = UncertainQuantity::new::<Meter>(2.0, 0.02);
    let area = side.pow::<P2>();
    assert_eq!(area.value(), 4.0);
    assert!(close(area.uncertainty(), 0.08));
    assert!(close(area.sqrt().uncertainty(), 0.02));

    let density = (3.0 * Kilogram).with_uncertainty(0.0 * Kilogram) / (area * (0.5 * Meter));
    assert!(close(density.value(), 1.5));
    assert!(close(density.relative_uncertainty().unwrap(), 0.02));

    let exact: UncertainQuantity<dim::Length> = (1.0 * Meter).into();
    assert_eq!(exact.uncertainty(), 0.0);
    assert_eq!((side + 1.0 * Meter).uncertainty(), side.uncertainty());
}

#[test]
fn transcendental_uncertainty() {
    let x = UncertainQuantity::new::<Radian>(0.0, 0.01);
    assert_eq!(x.sin().value(), 0.0);
    assert!(close(x.sin().uncertainty(), 0.01));
    assert!(close(x.cos().uncertainty(), 0.0));
    assert!(close(x.exp().uncertainty(), 0.01));
}

#[test]
fn zero_divisor() {
    let a = UncertainQuantity::new::<Meter>(1.0, 0.1);
    let z = UncertainQuantity::new::<Second>(0.0, 0.1);
    assert_eq!(
        a.try_div(z).map(|q| q.value()),
        Err(QuantityError::DivisionByZero { op: "divide" })
    );
    assert!(std::panic::catch_unwind(|| a / z).is_err());
    assert!(std::panic::catch_unwind(|| a / 0.0).is_err());
}

#[test]
fn printing() {
    let r = UncertainQuantity::new::<Ohm>(4700.0, 50.0);
    assert_eq!(r.to_string(), "4.7 ± 0.05 kΩ");
    let m = UncertainQuantity::new::<Gram>(2.5, 0.1);
    assert_eq!(format!("{:.2}", m), "2.50 ± 0.10 g");
}
