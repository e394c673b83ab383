//! Physical dimensions as type-level exponent vectors.
//!
//! A dimension is seven signed exponents over the SI base quantities, in the
//! order length, time, mass, temperature, current, substance and luminous
//! intensity. [`Dim`] carries them as [`typenum`] integers so that the
//! composition rules below are solved by the type checker:
//!
//! - [`DimMul`]: exponents add.
//! - [`DimDiv`]: exponents subtract.
//! - [`DimPow`]: exponents are multiplied by an integer.
//! - [`DimRoot`]: exponents are divided by an integer, which only type-checks
//!   when every exponent divides evenly.
//!
//! [`DimensionVector`] is the runtime mirror, used for printing and for
//! comparing dimensions in tests.

use std::{fmt::Display, marker::PhantomData, ops::{Add, Mul, Sub}};

use typenum::{Diff, Integer, N1, N2, N3, NonZero, P1, P2, P3, PartialDiv, PartialQuot, Prod, Sum, Z0};

/// Runtime view of a dimension: seven exponents.
///
/// Two vectors are equal iff all seven exponents match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DimensionVector {
    pub length: i8,
    pub time: i8,
    pub mass: i8,
    pub temperature: i8,
    pub current: i8,
    pub substance: i8,
    pub luminous: i8,
}

impl DimensionVector {
    pub const SCALAR: Self = Self::new(0, 0, 0, 0, 0, 0, 0);

    pub const fn new(
        length: i8,
        time: i8,
        mass: i8,
        temperature: i8,
        current: i8,
        substance: i8,
        luminous: i8,
    ) -> Self {
        Self {
            length,
            time,
            mass,
            temperature,
            current,
            substance,
            luminous,
        }
    }

    #[inline]
    pub const fn exponents(&self) -> [i8; 7] {
        [
            self.length,
            self.time,
            self.mass,
            self.temperature,
            self.current,
            self.substance,
            self.luminous,
        ]
    }

    const fn from_exponents(e: [i8; 7]) -> Self {
        Self::new(e[0], e[1], e[2], e[3], e[4], e[5], e[6])
    }

    /// `true` for the all-zero vector.
    #[inline]
    pub const fn is_scalar(&self) -> bool {
        let e = self.exponents();
        let mut i = 0;
        while i < 7 {
            if e[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    pub const fn mul(&self, other: &Self) -> Self {
        let (a, b) = (self.exponents(), other.exponents());
        let mut out = [0; 7];
        let mut i = 0;
        while i < 7 {
            out[i] = a[i] + b[i];
            i += 1;
        }
        Self::from_exponents(out)
    }

    pub const fn div(&self, other: &Self) -> Self {
        let (a, b) = (self.exponents(), other.exponents());
        let mut out = [0; 7];
        let mut i = 0;
        while i < 7 {
            out[i] = a[i] - b[i];
            i += 1;
        }
        Self::from_exponents(out)
    }

    pub const fn pow(&self, n: i8) -> Self {
        let a = self.exponents();
        let mut out = [0; 7];
        let mut i = 0;
        while i < 7 {
            out[i] = a[i] * n;
            i += 1;
        }
        Self::from_exponents(out)
    }

    /// Divides every exponent by `n`, or `None` if one of them does not
    /// divide evenly (or `n == 0`).
    pub const fn root(&self, n: i8) -> Option<Self> {
        if n == 0 {
            return None;
        }
        let a = self.exponents();
        let mut out = [0; 7];
        let mut i = 0;
        while i < 7 {
            if a[i] % n != 0 {
                return None;
            }
            out[i] = a[i] / n;
            i += 1;
        }
        Some(Self::from_exponents(out))
    }
}

const BASE_SYMBOLS: [&str; 7] = ["m", "s", "kg", "K", "A", "mol", "cd"];

// Conventional SI ordering for printing: kg, m, s, A, K, mol, cd.
const DISPLAY_ORDER: [usize; 7] = [2, 0, 1, 4, 3, 5, 6];

fn superscript(n: i8) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    let mut out = String::new();
    if n < 0 {
        out.push('⁻');
    }
    for c in n.unsigned_abs().to_string().bytes() {
        out.push(DIGITS[usize::from(c - b'0')]);
    }
    out
}

impl Display for DimensionVector {
    /// Renders the exponents over the SI base symbols, e.g. `kg·m·s⁻²`.
    /// The scalar dimension renders as the empty string.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let exponents = self.exponents();
        let mut first = true;
        for idx in DISPLAY_ORDER {
            let (symbol, exp) = (BASE_SYMBOLS[idx], exponents[idx]);
            if exp == 0 {
                continue;
            }
            if !first {
                write!(f, "·")?;
            }
            first = false;
            if exp == 1 {
                write!(f, "{symbol}")?;
            } else {
                write!(f, "{symbol}{}", superscript(exp))?;
            }
        }
        Ok(())
    }
}

/// A type-level dimension.
///
/// Only [`Dim`] implements this; the associated integers are its exponents.
pub trait Dimension: 'static {
    type L: Integer;
    type T: Integer;
    type M: Integer;
    type Th: Integer;
    type I: Integer;
    type N: Integer;
    type J: Integer;

    const VECTOR: DimensionVector = DimensionVector::new(
        <Self::L as Integer>::I8,
        <Self::T as Integer>::I8,
        <Self::M as Integer>::I8,
        <Self::Th as Integer>::I8,
        <Self::I as Integer>::I8,
        <Self::N as Integer>::I8,
        <Self::J as Integer>::I8,
    );
}

/// Type-level dimension vector. Never instantiated.
pub struct Dim<L, T, M, Th, I, N, J>(PhantomData<(L, T, M, Th, I, N, J)>);

impl<L, T, M, Th, I, N, J> Dimension for Dim<L, T, M, Th, I, N, J>
where
    L: Integer,
    T: Integer,
    M: Integer,
    Th: Integer,
    I: Integer,
    N: Integer,
    J: Integer,
{
    type L = L;
    type T = T;
    type M = M;
    type Th = Th;
    type I = I;
    type N = N;
    type J = J;
}

/// Product of two dimensions: exponents add.
pub trait DimMul<Rhs: Dimension>: Dimension {
    type Output: Dimension;
}

/// Quotient of two dimensions: exponents subtract.
pub trait DimDiv<Rhs: Dimension>: Dimension {
    type Output: Dimension;
}

/// Integer power of a dimension: exponents are multiplied by `E`.
pub trait DimPow<E: Integer>: Dimension {
    type Output: Dimension;
}

/// Integer root of a dimension: exponents are divided by `E`.
///
/// Implemented only when every exponent is a multiple of `E`, so the square
/// root of a length does not compile:
///
/// ```compile_fail
/// use dimad::prelude::*;
/// let side = Quantity::new::<Meter>(2.0);
/// let _ = side.sqrt();
/// ```
pub trait DimRoot<E: Integer + NonZero>: Dimension {
    type Output: Dimension;
}

impl<Ll, Tl, Ml, Kl, Il, Nl, Jl, Lr, Tr, Mr, Kr, Ir, Nr, Jr> DimMul<Dim<Lr, Tr, Mr, Kr, Ir, Nr, Jr>>
    for Dim<Ll, Tl, Ml, Kl, Il, Nl, Jl>
where
    Ll: Integer + Add<Lr>,
    Tl: Integer + Add<Tr>,
    Ml: Integer + Add<Mr>,
    Kl: Integer + Add<Kr>,
    Il: Integer + Add<Ir>,
    Nl: Integer + Add<Nr>,
    Jl: Integer + Add<Jr>,
    Lr: Integer,
    Tr: Integer,
    Mr: Integer,
    Kr: Integer,
    Ir: Integer,
    Nr: Integer,
    Jr: Integer,
    Sum<Ll, Lr>: Integer,
    Sum<Tl, Tr>: Integer,
    Sum<Ml, Mr>: Integer,
    Sum<Kl, Kr>: Integer,
    Sum<Il, Ir>: Integer,
    Sum<Nl, Nr>: Integer,
    Sum<Jl, Jr>: Integer,
{
    type Output = Dim<
        Sum<Ll, Lr>,
        Sum<Tl, Tr>,
        Sum<Ml, Mr>,
        Sum<Kl, Kr>,
        Sum<Il, Ir>,
        Sum<Nl, Nr>,
        Sum<Jl, Jr>,
    >;
}

impl<Ll, Tl, Ml, Kl, Il, Nl, Jl, Lr, Tr, Mr, Kr, Ir, Nr, Jr> DimDiv<Dim<Lr, Tr, Mr, Kr, Ir, Nr, Jr>>
    for Dim<Ll, Tl, Ml, Kl, Il, Nl, Jl>
where
    Ll: Integer + Sub<Lr>,
    Tl: Integer + Sub<Tr>,
    Ml: Integer + Sub<Mr>,
    Kl: Integer + Sub<Kr>,
    Il: Integer + Sub<Ir>,
    Nl: Integer + Sub<Nr>,
    Jl: Integer + Sub<Jr>,
    Lr: Integer,
    Tr: Integer,
    Mr: Integer,
    Kr: Integer,
    Ir: Integer,
    Nr: Integer,
    Jr: Integer,
    Diff<Ll, Lr>: Integer,
    Diff<Tl, Tr>: Integer,
    Diff<Ml, Mr>: Integer,
    Diff<Kl, Kr>: Integer,
    Diff<Il, Ir>: Integer,
    Diff<Nl, Nr>: Integer,
    Diff<Jl, Jr>: Integer,
{
    type Output = Dim<
        Diff<Ll, Lr>,
        Diff<Tl, Tr>,
        Diff<Ml, Mr>,
        Diff<Kl, Kr>,
        Diff<Il, Ir>,
        Diff<Nl, Nr>,
        Diff<Jl, Jr>,
    >;
}

impl<L, T, M, K, I, N, J, E> DimPow<E> for Dim<L, T, M, K, I, N, J>
where
    E: Integer,
    L: Integer + Mul<E>,
    T: Integer + Mul<E>,
    M: Integer + Mul<E>,
    K: Integer + Mul<E>,
    I: Integer + Mul<E>,
    N: Integer + Mul<E>,
    J: Integer + Mul<E>,
    Prod<L, E>: Integer,
    Prod<T, E>: Integer,
    Prod<M, E>: Integer,
    Prod<K, E>: Integer,
    Prod<I, E>: Integer,
    Prod<N, E>: Integer,
    Prod<J, E>: Integer,
{
    type Output = Dim<
        Prod<L, E>,
        Prod<T, E>,
        Prod<M, E>,
        Prod<K, E>,
        Prod<I, E>,
        Prod<N, E>,
        Prod<J, E>,
    >;
}

impl<L, T, M, K, I, N, J, E> DimRoot<E> for Dim<L, T, M, K, I, N, J>
where
    E: Integer + NonZero,
    L: Integer + PartialDiv<E>,
    T: Integer + PartialDiv<E>,
    M: Integer + PartialDiv<E>,
    K: Integer + PartialDiv<E>,
    I: Integer + PartialDiv<E>,
    N: Integer + PartialDiv<E>,
    J: Integer + PartialDiv<E>,
    PartialQuot<L, E>: Integer,
    PartialQuot<T, E>: Integer,
    PartialQuot<M, E>: Integer,
    PartialQuot<K, E>: Integer,
    PartialQuot<I, E>: Integer,
    PartialQuot<N, E>: Integer,
    PartialQuot<J, E>: Integer,
{
    type Output = Dim<
        PartialQuot<L, E>,
        PartialQuot<T, E>,
        PartialQuot<M, E>,
        PartialQuot<K, E>,
        PartialQuot<I, E>,
        PartialQuot<N, E>,
        PartialQuot<J, E>,
    >;
}

pub type Product<A, B> = <A as DimMul<B>>::Output;
pub type Quotient<A, B> = <A as DimDiv<B>>::Output;
pub type PowerOf<A, E> = <A as DimPow<E>>::Output;
pub type RootOf<A, E> = <A as DimRoot<E>>::Output;
pub type Inverse<A> = <A as DimPow<N1>>::Output;

// Named dimensions, in (L, T, M, Θ, I, N, J) order.
pub type Dimensionless = Dim<Z0, Z0, Z0, Z0, Z0, Z0, Z0>;
pub type Length = Dim<P1, Z0, Z0, Z0, Z0, Z0, Z0>;
pub type Time = Dim<Z0, P1, Z0, Z0, Z0, Z0, Z0>;
pub type Mass = Dim<Z0, Z0, P1, Z0, Z0, Z0, Z0>;
pub type Temperature = Dim<Z0, Z0, Z0, P1, Z0, Z0, Z0>;
pub type Current = Dim<Z0, Z0, Z0, Z0, P1, Z0, Z0>;
pub type Substance = Dim<Z0, Z0, Z0, Z0, Z0, P1, Z0>;
pub type LuminousIntensity = Dim<Z0, Z0, Z0, Z0, Z0, Z0, P1>;

pub type Area = Dim<P2, Z0, Z0, Z0, Z0, Z0, Z0>;
pub type Volume = Dim<P3, Z0, Z0, Z0, Z0, Z0, Z0>;
pub type Frequency = Dim<Z0, N1, Z0, Z0, Z0, Z0, Z0>;
pub type Velocity = Dim<P1, N1, Z0, Z0, Z0, Z0, Z0>;
pub type Acceleration = Dim<P1, N2, Z0, Z0, Z0, Z0, Z0>;
pub type Momentum = Dim<P1, N1, P1, Z0, Z0, Z0, Z0>;
pub type Force = Dim<P1, N2, P1, Z0, Z0, Z0, Z0>;
pub type Energy = Dim<P2, N2, P1, Z0, Z0, Z0, Z0>;
pub type Power = Dim<P2, N3, P1, Z0, Z0, Z0, Z0>;
pub type Pressure = Dim<N1, N2, P1, Z0, Z0, Z0, Z0>;
pub type Charge = Dim<Z0, P1, Z0, Z0, P1, Z0, Z0>;
pub type Voltage = Dim<P2, N3, P1, Z0, N1, Z0, Z0>;
pub type Resistance = Dim<P2, N3, P1, Z0, N2, Z0, Z0>;
/// Plane angle; SI treats the radian as dimensionless.
pub type Angle = Dimensionless;
