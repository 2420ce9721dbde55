//! # Algorithms
//!
//! The bounded simplex method that backs both the exact and the approximate LP interface, and the
//! sparse LU decomposition used to project dual solutions.
pub mod lower_upper;
pub mod simplex;
