//! # Rational numbers
//!
//! Arbitrary precision rational numbers, the number type that all certified computations are done
//! in. This wraps the `num::BigRational` type following the newtype pattern, such that the
//! conversions to floating point with a chosen rounding direction can be defined on it.
use std::str::FromStr;

use num::{BigInt, BigRational, One, Signed};

mod macros;
mod wrapping;
#[cfg(test)]
mod test;

/// An arbitrary precision rational number, always stored as a reduced fraction.
#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default)]
pub struct Rational(pub(super) BigRational);

impl Rational {
    /// Create a new instance by converting the two provided numbers into arbitrary size ints.
    ///
    /// # Panics
    ///
    /// When the denominator is zero.
    #[must_use]
    pub fn new(numer: i64, denom: i64) -> Self {
        Self(BigRational::new(numer.into(), denom.into()))
    }

    /// Create an integer valued rational.
    #[must_use]
    pub fn from_integer(value: BigInt) -> Self {
        Self(BigRational::from_integer(value))
    }

    /// The exact value of a floating point number.
    ///
    /// # Return value
    ///
    /// `None` if the value is not finite.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        BigRational::from_float(value).map(Self)
    }

    /// Ten to the power `exponent`.
    #[must_use]
    pub fn power_of_ten(exponent: u32) -> Self {
        Self::from_integer(num::pow(BigInt::from(10), exponent as usize))
    }

    /// Numerator of the reduced fraction, carries the sign.
    #[must_use]
    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    /// Denominator of the reduced fraction, always positive.
    #[must_use]
    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    /// Whether the reduced fraction has denominator one.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.0.denom().is_one()
    }

    /// Largest integer not larger than this value.
    #[must_use]
    pub fn floor(&self) -> Self {
        Self(self.0.floor())
    }

    /// Smallest integer not smaller than this value.
    #[must_use]
    pub fn ceil(&self) -> Self {
        Self(self.0.ceil())
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Whether the value is strictly larger than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    /// Whether the value is strictly smaller than zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }
}

impl FromStr for Rational {
    type Err = num::rational::ParseRatioError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        BigRational::from_str(input).map(Self)
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Self(BigRational::from_integer(value.into()))
    }
}

impl From<BigRational> for Rational {
    fn from(value: BigRational) -> Self {
        Self(value)
    }
}

impl From<&Rational> for Rational {
    fn from(value: &Rational) -> Self {
        value.clone()
    }
}
