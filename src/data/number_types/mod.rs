//! # Number types
//!
//! Exact rational numbers, the conversions from them into floating point numbers with a chosen
//! rounding direction, and floating point intervals for bounds that don't need rational arithmetic.
//!
//! The simplex implementation is generic over the `Field` trait, such that the same code can solve
//! a problem approximately with floats and exactly with rationals.
pub mod infinity;
pub mod interval;
pub mod rational;
pub mod rounding;
pub mod traits;
