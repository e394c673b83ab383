//! Property tests for the quantity algebra and the derivative graph.

use dimad::{dimension as dim, prelude::*};
use proptest::prelude::*;
use typenum::{P2, P3};

fn magnitude() -> impl Strategy<Value = f64> {
    prop_oneof![1e-3..1e3f64, -1e3..-1e-3f64]
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// (a·b)/b gives back a, in a's dimension
    #[test]
    fn product_then_quotient_is_identity(a in magnitude(), b in magnitude()) {
        let force = a * Newton;
        let time = b * Second;
        let impulse: Quantity<dim::Momentum> = force * time;
        let back: Force = impulse / time;
        prop_assert!(close(back.value(), a, 1e-12));
    }

    /// Taking the n-th root of an n-th power recovers |x|
    #[test]
    fn root_undoes_power(x in 1e-3..1e3f64) {
        let side = x * Meter;
        prop_assert!(close(side.pow::<P2>().root::<P2>().value(), x, 1e-12));
        prop_assert!(close(side.pow::<P3>().root::<P3>().value(), x, 1e-12));
        prop_assert!(close((-side).pow::<P3>().cbrt().value(), -x, 1e-12));
    }

    /// Unit conversion is a scaling and nothing else
    #[test]
    fn conversion_round_trips(x in magnitude()) {
        let speed = x * (Kilometer / Hour);
        prop_assert!(close(speed.value_in::<UnitDiv<Kilometer, Hour>>(), x, 1e-12));
        prop_assert!(close(speed.value() * 3.6, x, 1e-12));
    }

    /// Uncertain sums commute and their spread never shrinks below either term
    #[test]
    fn uncertain_addition_commutes(
        a in magnitude(),
        ua in 0.0..10.0f64,
        b in magnitude(),
        ub in 0.0..10.0f64,
    ) {
        let x = UncertainQuantity::new::<Meter>(a, ua);
        let y = UncertainQuantity::new::<Meter>(b, ub);
        let (xy, yx) = (x + y, y + x);
        prop_assert_eq!(xy.value(), yx.value());
        prop_assert_eq!(xy.uncertainty(), yx.uncertainty());
        prop_assert!(xy.uncertainty() >= ua.max(ub));
        prop_assert!(xy.uncertainty() <= ua + ub + 1e-12);
    }

    /// d(x·y)/dx = y and d(x·y)/dy = x, with dimensions to match
    #[test]
    fn product_rule_holds(a in magnitude(), b in magnitude()) {
        let x = Variable::new(a * Meter);
        let y = Variable::new(b * Second);
        let xy = Variable::from(&x * &y);
        let (dx, dy): (Time, Length) = derivatives(&xy, (&x, &y));
        prop_assert_eq!(dx.value(), b);
        prop_assert_eq!(dy.value(), a);
    }

    /// Moving a leaf and re-evaluating matches building the graph afresh
    #[test]
    fn evaluate_after_update_matches_rebuild(a in 0.1..10.0f64, b in 0.1..10.0f64) {
        let x = Variable::new(a * Meter);
        let f = Variable::from((&x * &x + 2.0 * &x * (1.0 * Meter)).sqrt());
        x.update(b * Meter).unwrap();
        f.evaluate().unwrap();

        let fresh = Variable::new(b * Meter);
        let g = Variable::from((&fresh * &fresh + 2.0 * &fresh * (1.0 * Meter)).sqrt());
        prop_assert!(close(f.value().value(), g.value().value(), 1e-12));
        let df: Scalar = derivatives(&f, &x);
        let dg: Scalar = derivatives(&g, &fresh);
        prop_assert!(close(df.value(), dg.value(), 1e-12));
    }
}
