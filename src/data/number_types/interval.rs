//! # Interval arithmetic
//!
//! Closed floating point intervals that are guaranteed to contain the exact result of the
//! operations that produced them. Every operation is evaluated with the default rounding mode and
//! the resulting end points are then moved outward by one unit in the last place, which always
//! encloses the exactly rounded result.
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::data::number_types::rational::Rational;
use crate::data::number_types::rounding::{next_down, next_up, RoundingMode};

/// A closed interval `[lower, upper]`, possibly with infinite end points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    lower: f64,
    upper: f64,
}

impl Interval {
    /// Create a new interval.
    ///
    /// # Arguments
    ///
    /// * `lower`: Lower end point, not NaN.
    /// * `upper`: Upper end point, not NaN and at least `lower`.
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        debug_assert!(!lower.is_nan() && !upper.is_nan());
        debug_assert!(lower <= upper);

        Self { lower, upper }
    }

    /// The degenerate interval containing only `value`.
    #[must_use]
    pub fn point(value: f64) -> Self {
        Self::new(value, value)
    }

    /// Smallest interval with floating point end points that contains a rational value.
    #[must_use]
    pub fn from_rational(value: &Rational) -> Self {
        Self::new(value.to_f64(RoundingMode::Downward), value.to_f64(RoundingMode::Upward))
    }

    /// Lower end point.
    #[must_use]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper end point.
    #[must_use]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Widen a pair of nearest rounded end points outward.
    fn widened(lower: f64, upper: f64) -> Self {
        Self::new(round_down(lower), round_up(upper))
    }
}

/// Step below a nearest rounded lower end point.
///
/// Minus infinity is kept. A lower end point of plus infinity can only be the result of an
/// overflow, the exact value is then at least the largest finite value.
fn round_down(value: f64) -> f64 {
    match value {
        f64::NEG_INFINITY => value,
        f64::INFINITY => f64::MAX,
        _ => next_down(value),
    }
}

/// Step above a nearest rounded upper end point, the mirror image of `round_down`.
fn round_up(value: f64) -> f64 {
    match value {
        f64::INFINITY => value,
        f64::NEG_INFINITY => f64::MIN,
        _ => next_up(value),
    }
}

/// Product of two end points where `0 * ±inf` is taken to be zero, as an infinite end point only
/// stands for an unbounded side.
fn end_point_product(left: f64, right: f64) -> f64 {
    if left == 0_f64 || right == 0_f64 {
        0_f64
    } else {
        left * right
    }
}

impl Add for Interval {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        debug_assert!(!(self.lower == f64::NEG_INFINITY && rhs.lower == f64::INFINITY));

        Self::widened(self.lower + rhs.lower, self.upper + rhs.upper)
    }
}

impl Neg for Interval {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.upper, -self.lower)
    }
}

impl Sub for Interval {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

impl Mul for Interval {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let products = [
            end_point_product(self.lower, rhs.lower),
            end_point_product(self.lower, rhs.upper),
            end_point_product(self.upper, rhs.lower),
            end_point_product(self.upper, rhs.upper),
        ];
        let lower = products.iter().copied().fold(f64::INFINITY, f64::min);
        let upper = products.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self::widened(lower, upper)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}
