//! Compile-time rational multipliers relative to the SI base unit.
//!
//! A scale is a reduced fraction `NUM / DEN`. Prefixes are plain [`Ratio`]
//! aliases and compose by rational multiplication ([`ScaleMul`]) or
//! division ([`ScaleDiv`]), reduced at compile time.

use std::marker::PhantomData;

const fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Reduces `num / den` and moves the sign into the numerator.
///
/// # Panics
///
/// Panics (at compile time when used in a const) if `den == 0` or the
/// reduced fraction overflows `i64`.
#[allow(clippy::cast_possible_truncation)]
pub const fn reduce(num: i128, den: i128) -> (i64, i64) {
    assert!(den != 0, "scale denominator must be non-zero");
    let g = gcd(num, den);
    let (mut n, mut d) = (num / g, den / g);
    if d < 0 {
        n = -n;
        d = -d;
    }
    assert!(
        n >= i64::MIN as i128 && n <= i64::MAX as i128 && d <= i64::MAX as i128,
        "scale overflows i64"
    );
    (n as i64, d as i64)
}

/// A compile-time rational multiplier.
pub trait Scale: 'static {
    /// Reduced numerator, carrying the sign.
    const NUM: i64;
    /// Reduced denominator, always positive.
    const DEN: i64;
    /// The scale as a floating-point multiplier.
    const MULTIPLIER: f64 = Self::NUM as f64 / Self::DEN as f64;
}

/// The scale `N / D`.
pub struct Ratio<const N: i64, const D: i64>;

impl<const N: i64, const D: i64> Scale for Ratio<N, D> {
    const NUM: i64 = reduce(N as i128, D as i128).0;
    const DEN: i64 = reduce(N as i128, D as i128).1;
}

/// The product of two scales.
pub struct ScaleMul<A, B>(PhantomData<(A, B)>);

impl<A: Scale, B: Scale> Scale for ScaleMul<A, B> {
    const NUM: i64 = reduce(A::NUM as i128 * B::NUM as i128, A::DEN as i128 * B::DEN as i128).0;
    const DEN: i64 = reduce(A::NUM as i128 * B::NUM as i128, A::DEN as i128 * B::DEN as i128).1;
}

/// The quotient of two scales.
pub struct ScaleDiv<A, B>(PhantomData<(A, B)>);

impl<A: Scale, B: Scale> Scale for ScaleDiv<A, B> {
    const NUM: i64 = reduce(A::NUM as i128 * B::DEN as i128, A::DEN as i128 * B::NUM as i128).0;
    const DEN: i64 = reduce(A::NUM as i128 * B::DEN as i128, A::DEN as i128 * B::NUM as i128).1;
}

/// `true` if two scales reduce to the same fraction.
pub const fn same_scale<A: Scale, B: Scale>() -> bool {
    A::NUM == B::NUM && A::DEN == B::DEN
}

pub type One = Ratio<1, 1>;

pub type Atto = Ratio<1, 1_000_000_000_000_000_000>;
pub type Femto = Ratio<1, 1_000_000_000_000_000>;
pub type Pico = Ratio<1, 1_000_000_000_000>;
pub type Nano = Ratio<1, 1_000_000_000>;
pub type Micro = Ratio<1, 1_000_000>;
pub type Milli = Ratio<1, 1_000>;
pub type Centi = Ratio<1, 100>;
pub type Deci = Ratio<1, 10>;
pub type Deca = Ratio<10, 1>;
pub type Hecto = Ratio<100, 1>;
pub type Kilo = Ratio<1_000, 1>;
pub type Mega = Ratio<1_000_000, 1>;
pub type Giga = Ratio<1_000_000_000, 1>;
pub type Tera = Ratio<1_000_000_000_000, 1>;
pub type Peta = Ratio<1_000_000_000_000_000, 1>;
pub type Exa = Ratio<1_000_000_000_000_000_000, 1>;
