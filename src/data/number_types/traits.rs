//! # Traits
//!
//! The simplex algorithm is defined over an ordered field. It is run both in exact arithmetic, to
//! obtain authoritative results, and in floating point arithmetic, to cheaply compute a starting
//! basis for the exact run. The contract of the sign tests below is exact for the rationals, but
//! only holds up to a tolerance for the floats.
use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use num_traits::{One, Zero};

use crate::data::number_types::rational::Rational;
use crate::data::number_types::rounding::RoundingMode;

/// Absolute tolerance below which a floating point value is treated as zero.
pub const FLOAT_ZERO_TOLERANCE: f64 = 1e-9;

/// Basic field operations with Self and with references to Self, and a notion of sign.
pub trait Field:
    PartialEq +
    PartialOrd +
    Zero +
    One +
    Neg<Output=Self> +

    Add<Self, Output=Self> +
    for<'r> Add<&'r Self, Output=Self> +
    AddAssign<Self> +
    for<'r> AddAssign<&'r Self> +

    Sub<Self, Output=Self> +
    for<'r> Sub<&'r Self, Output=Self> +
    SubAssign<Self> +
    for<'r> SubAssign<&'r Self> +

    Mul<Self, Output=Self> +
    for<'r> Mul<&'r Self, Output=Self> +

    Div<Self, Output=Self> +
    for<'r> Div<&'r Self, Output=Self> +

    Clone +
    Debug +
    Display +
{
    /// Whether the value should be treated as larger than zero.
    fn is_significantly_positive(&self) -> bool;

    /// Whether the value should be treated as smaller than zero.
    fn is_significantly_negative(&self) -> bool;

    /// Whether the value should be treated as zero.
    fn is_significantly_zero(&self) -> bool {
        !self.is_significantly_positive() && !self.is_significantly_negative()
    }

    /// Absolute value, used to compare pivot candidates.
    fn magnitude(&self) -> Self;

    /// Closest value of this type to an exact value.
    fn from_rational(value: &Rational) -> Self;
}

impl Field for Rational {
    fn is_significantly_positive(&self) -> bool {
        self.is_positive()
    }

    fn is_significantly_negative(&self) -> bool {
        self.is_negative()
    }

    fn magnitude(&self) -> Self {
        self.abs()
    }

    fn from_rational(value: &Rational) -> Self {
        value.clone()
    }
}

impl Field for f64 {
    fn is_significantly_positive(&self) -> bool {
        *self > FLOAT_ZERO_TOLERANCE
    }

    fn is_significantly_negative(&self) -> bool {
        *self < -FLOAT_ZERO_TOLERANCE
    }

    fn magnitude(&self) -> Self {
        self.abs()
    }

    fn from_rational(value: &Rational) -> Self {
        value.to_f64(RoundingMode::Nearest)
    }
}
