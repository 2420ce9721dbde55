//! # Directed rounding
//!
//! Conversion of rational values into floating point values that err in a chosen direction. These
//! conversions are what make it possible to hand a certified rational bound to the floating point
//! search without losing validity.
use num::ToPrimitive;

use crate::data::number_types::rational::Rational;

/// Direction in which a conversion to floating point may err.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RoundingMode {
    /// Result is never larger than the exact value.
    Downward,
    /// Result is never smaller than the exact value.
    Upward,
    /// Closest representable value, no guarantee about the direction.
    Nearest,
}

/// Smallest floating point value strictly larger than `value`.
///
/// Infinity and NaN are returned unchanged.
#[must_use]
pub fn next_up(value: f64) -> f64 {
    if value.is_nan() || value == f64::INFINITY {
        return value;
    }
    if value == 0_f64 {
        // Covers negative zero as well
        return f64::from_bits(1);
    }

    let bits = value.to_bits();
    if value > 0_f64 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Largest floating point value strictly smaller than `value`.
#[must_use]
pub fn next_down(value: f64) -> f64 {
    -next_up(-value)
}

impl Rational {
    /// Convert into a floating point value.
    ///
    /// For the directed modes, the result is guaranteed to lie on the requested side of the exact
    /// value. Values beyond the representable range become an infinity of the same sign, unless
    /// that infinity is on the wrong side: then the largest finite value of that sign is returned.
    #[must_use]
    pub fn to_f64(&self, mode: RoundingMode) -> f64 {
        if let Some(maximum) = Rational::from_f64(f64::MAX) {
            if self > &maximum {
                return if mode == RoundingMode::Downward { f64::MAX } else { f64::INFINITY };
            }
            if self < &-maximum {
                return if mode == RoundingMode::Upward { f64::MIN } else { f64::NEG_INFINITY };
            }
        }

        let mut approximation = self.0.to_f64().unwrap_or(0_f64);
        match mode {
            RoundingMode::Nearest => {},
            RoundingMode::Downward => {
                while Rational::from_f64(approximation).is_none_or(|exact| &exact > self) {
                    approximation = next_down(approximation);
                }
            },
            RoundingMode::Upward => {
                while Rational::from_f64(approximation).is_none_or(|exact| &exact < self) {
                    approximation = next_up(approximation);
                }
            },
        }

        approximation
    }

    /// Whether this value can be stored as a floating point number without rounding error.
    #[must_use]
    pub fn is_representable(&self) -> bool {
        let nearest = self.to_f64(RoundingMode::Nearest);
        nearest.is_finite() && Rational::from_f64(nearest).is_some_and(|exact| &exact == self)
    }
}
