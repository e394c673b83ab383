//! SI prefix lookup for printing quantities.
//!
//! The tables are immutable statics; nothing here is ever mutated.

use std::borrow::Cow;

use crate::dimension::DimensionVector;

/// A decimal SI prefix: `10^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    pub symbol: &'static str,
    pub exponent: i32,
}

impl Prefix {
    #[inline]
    pub fn multiplier(&self) -> f64 {
        10f64.powi(self.exponent)
    }
}

const fn prefix(symbol: &'static str, exponent: i32) -> Prefix {
    Prefix { symbol, exponent }
}

/// Power-of-1000 brackets used when printing, ascending.
pub static BRACKETS: [Prefix; 17] = [
    prefix("y", -24),
    prefix("z", -21),
    prefix("a", -18),
    prefix("f", -15),
    prefix("p", -12),
    prefix("n", -9),
    prefix("µ", -6),
    prefix("m", -3),
    prefix("", 0),
    prefix("k", 3),
    prefix("M", 6),
    prefix("G", 9),
    prefix("T", 12),
    prefix("P", 15),
    prefix("E", 18),
    prefix("Z", 21),
    prefix("Y", 24),
];

// Prefixes that are not powers of 1000. Only used to name prefixed units.
static DECIMAL: [Prefix; 4] = [
    prefix("c", -2),
    prefix("d", -1),
    prefix("da", 1),
    prefix("h", 2),
];

/// The largest bracket whose multiplier does not exceed `magnitude`.
///
/// `None` for zero, non-finite magnitudes, and magnitudes below the
/// smallest bracket.
pub fn bracket(magnitude: f64) -> Option<&'static Prefix> {
    let magnitude = magnitude.abs();
    if !magnitude.is_normal() {
        return None;
    }
    BRACKETS.iter().rev().find(|p| p.multiplier() <= magnitude)
}

/// The prefix symbol for an exact decimal multiplier, e.g. `1e-3 -> "m"`.
pub fn symbol_for(multiplier: f64) -> Option<&'static str> {
    BRACKETS
        .iter()
        .chain(DECIMAL.iter())
        .find(|p| {
            let m = p.multiplier();
            ((multiplier - m) / m).abs() < 1e-9
        })
        .map(|p| p.symbol)
}

static NAMED: [(DimensionVector, &str); 15] = [
    (DimensionVector::new(1, 0, 0, 0, 0, 0, 0), "m"),
    (DimensionVector::new(0, 1, 0, 0, 0, 0, 0), "s"),
    (DimensionVector::new(0, 0, 1, 0, 0, 0, 0), "g"),
    (DimensionVector::new(0, 0, 0, 1, 0, 0, 0), "K"),
    (DimensionVector::new(0, 0, 0, 0, 1, 0, 0), "A"),
    (DimensionVector::new(0, 0, 0, 0, 0, 1, 0), "mol"),
    (DimensionVector::new(0, 0, 0, 0, 0, 0, 1), "cd"),
    (DimensionVector::new(0, -1, 0, 0, 0, 0, 0), "Hz"),
    (DimensionVector::new(1, -2, 1, 0, 0, 0, 0), "N"),
    (DimensionVector::new(2, -2, 1, 0, 0, 0, 0), "J"),
    (DimensionVector::new(2, -3, 1, 0, 0, 0, 0), "W"),
    (DimensionVector::new(-1, -2, 1, 0, 0, 0, 0), "Pa"),
    (DimensionVector::new(0, 1, 0, 0, 1, 0, 0), "C"),
    (DimensionVector::new(2, -3, 1, 0, -1, 0, 0), "V"),
    (DimensionVector::new(2, -3, 1, 0, -2, 0, 0), "Ω"),
];

/// How a base-unit value is written out.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Rendering {
    /// Multiply the base-unit value by this before printing.
    pub factor: f64,
    pub prefix: &'static str,
    pub symbol: Cow<'static, str>,
}

/// Picks the prefix and unit symbol for a value of dimension `dim`.
///
/// Mass is printed in grams so that prefixes compose (`5 mg`, not `5 µkg`).
/// Dimensions without a named unit use the composed base symbols and are
/// never prefixed, as are dimensionless values.
pub(crate) fn render(dim: DimensionVector, base_value: f64) -> Rendering {
    let named = NAMED.iter().find(|(d, _)| *d == dim).map(|(_, s)| *s);
    let Some(symbol) = named else {
        return Rendering {
            factor: 1.0,
            prefix: "",
            symbol: Cow::Owned(dim.to_string()),
        };
    };
    let base_factor = if symbol == "g" { 1e3 } else { 1.0 };
    let value = base_value * base_factor;
    let (factor, prefix) = match bracket(value) {
        Some(p) if p.exponent > 0 => (base_factor / 10f64.powi(p.exponent), p.symbol),
        Some(p) => (base_factor * 10f64.powi(-p.exponent), p.symbol),
        None => (base_factor, ""),
    };
    Rendering {
        factor,
        prefix,
        symbol: Cow::Borrowed(symbol),
    }
}

impl Rendering {
    pub(crate) fn unit(&self) -> String {
        format!("{}{}", self.prefix, self.symbol)
    }
}
