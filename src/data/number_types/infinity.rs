//! # Infinity sentinels
//!
//! Rational numbers have no infinity. Like the exact LP solver, this crate reserves two fixed
//! large rationals that stand for plus and minus infinity wherever a side or bound may be missing.
use crate::data::number_types::rational::Rational;
use crate::data::number_types::rounding::RoundingMode;

/// Decimal exponent of the value treated as infinite.
const INFINITY_EXPONENT: u32 = 150;

/// The pair of rationals representing plus and minus infinity.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InfinitySentinels {
    positive: Rational,
    negative: Rational,
}

impl InfinitySentinels {
    /// Sentinels at plus and minus `value`.
    ///
    /// # Arguments
    ///
    /// * `value`: Strictly positive magnitude.
    #[must_use]
    pub fn new(value: Rational) -> Self {
        debug_assert!(value.is_positive());

        Self { negative: -&value, positive: value }
    }

    /// The value representing plus infinity.
    #[must_use]
    pub fn positive(&self) -> &Rational {
        &self.positive
    }

    /// The value representing minus infinity.
    #[must_use]
    pub fn negative(&self) -> &Rational {
        &self.negative
    }

    /// Whether a value is the plus infinity sentinel.
    #[must_use]
    pub fn is_positive_infinity(&self, value: &Rational) -> bool {
        value == &self.positive
    }

    /// Whether a value is the minus infinity sentinel.
    #[must_use]
    pub fn is_negative_infinity(&self, value: &Rational) -> bool {
        value == &self.negative
    }

    /// Whether a value is either sentinel.
    #[must_use]
    pub fn is_infinite(&self, value: &Rational) -> bool {
        self.is_positive_infinity(value) || self.is_negative_infinity(value)
    }

    /// Replace values at or beyond the sentinels by the sentinels themselves.
    ///
    /// Applied to all input data, such that the comparisons above can be exact equality tests.
    #[must_use]
    pub fn normalize(&self, value: Rational) -> Rational {
        if value >= self.positive {
            self.positive.clone()
        } else if value <= self.negative {
            self.negative.clone()
        } else {
            value
        }
    }

    /// Finite values as `Some`, sentinels as `None`.
    #[must_use]
    pub fn finite<'a>(&self, value: &'a Rational) -> Option<&'a Rational> {
        if self.is_infinite(value) {
            None
        } else {
            Some(value)
        }
    }

    /// Convert a possibly infinite value to floating point, mapping the sentinels to the floating
    /// point infinities.
    #[must_use]
    pub fn to_f64(&self, value: &Rational, mode: RoundingMode) -> f64 {
        if self.is_positive_infinity(value) {
            f64::INFINITY
        } else if self.is_negative_infinity(value) {
            f64::NEG_INFINITY
        } else {
            value.to_f64(mode)
        }
    }

    /// Convert a floating point value, mapping infinite and out of range values to the sentinels.
    #[must_use]
    pub fn from_f64(&self, value: f64) -> Rational {
        match Rational::from_f64(value) {
            Some(exact) => self.normalize(exact),
            None if value > 0_f64 => self.positive.clone(),
            None => self.negative.clone(),
        }
    }
}

impl Default for InfinitySentinels {
    fn default() -> Self {
        Self::new(Rational::power_of_ten(INFINITY_EXPONENT))
    }
}

#[cfg(test)]
mod test {
    use crate::data::number_types::infinity::InfinitySentinels;
    use crate::data::number_types::rounding::RoundingMode;
    use crate::RQ;

    #[test]
    fn sentinels() {
        let infinity = InfinitySentinels::default();
        assert!(infinity.is_positive_infinity(&infinity.from_f64(f64::INFINITY)));
        assert!(infinity.is_negative_infinity(&infinity.from_f64(-1e200)));
        assert!(!infinity.is_infinite(&RQ!(1e100)));
        assert_eq!(infinity.finite(&RQ!(3)), Some(&RQ!(3)));
        assert_eq!(infinity.finite(infinity.positive()), None);
        assert_eq!(infinity.to_f64(infinity.negative(), RoundingMode::Upward), f64::NEG_INFINITY);
    }
}
