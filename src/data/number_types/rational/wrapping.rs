//! # Wrapping existing methods
//!
//! Standard operations on the rational type, simply wrapping the operations already defined on the
//! inner type for all combinations of owned and borrowed operands.
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num::{BigRational, One, Zero};

use crate::data::number_types::rational::Rational;

macro_rules! wrap_binary_operation {
    ($trait_name:ident, $method:ident, $assign_trait:ident, $assign_method:ident) => {
        impl $trait_name for Rational {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self($trait_name::$method(self.0, rhs.0))
            }
        }

        impl $trait_name<&Rational> for Rational {
            type Output = Self;

            fn $method(self, rhs: &Self) -> Self::Output {
                Self($trait_name::$method(self.0, &rhs.0))
            }
        }

        impl $trait_name<Rational> for &Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Self::Output {
                Rational($trait_name::$method(&self.0, rhs.0))
            }
        }

        impl $trait_name for &Rational {
            type Output = Rational;

            fn $method(self, rhs: Self) -> Self::Output {
                Rational($trait_name::$method(&self.0, &rhs.0))
            }
        }

        impl $assign_trait for Rational {
            fn $assign_method(&mut self, rhs: Self) {
                $assign_trait::$assign_method(&mut self.0, rhs.0)
            }
        }

        impl $assign_trait<&Rational> for Rational {
            fn $assign_method(&mut self, rhs: &Self) {
                $assign_trait::$assign_method(&mut self.0, &rhs.0)
            }
        }
    }
}

wrap_binary_operation!(Add, add, AddAssign, add_assign);
wrap_binary_operation!(Sub, sub, SubAssign, sub_assign);
wrap_binary_operation!(Mul, mul, MulAssign, mul_assign);
wrap_binary_operation!(Div, div, DivAssign, div_assign);

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0.neg())
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Self::Output {
        Rational(Neg::neg(&self.0))
    }
}

impl Sum for Rational {
    fn sum<I: Iterator<Item=Self>>(iter: I) -> Self {
        Self(iter.map(|item| item.0).sum())
    }
}

impl<'a> Sum<&'a Rational> for Rational {
    fn sum<I: Iterator<Item=&'a Rational>>(iter: I) -> Self {
        iter.fold(Self::zero(), |total, item| total + item)
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self(BigRational::zero())
    }

    fn set_zero(&mut self) {
        self.0.set_zero()
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Rational {
    fn one() -> Self {
        Self(BigRational::one())
    }

    fn set_one(&mut self) {
        self.0.set_one()
    }

    fn is_one(&self) -> bool {
        self.0.is_one()
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
