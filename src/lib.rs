//! # Safe dual bounds for mixed integer programs
//!
//! A branch-and-bound search over a mixed integer program usually bounds its nodes with a floating
//! point LP solver. Those bounds can be wrong by rounding errors, and so can every conclusion that
//! is drawn from them. This crate keeps an exact rational copy of the relaxation next to the
//! floating point one and turns the approximate dual solutions of the search into bounds that are
//! mathematically valid.
//!
//! The entry point is the `ExactLpHandler`, which the search drives through the `SearchTree`
//! trait.
#![warn(missing_docs)]

pub mod algorithm;
pub mod certify;
pub mod data;
pub mod error;
pub mod handler;
pub mod integrality;
pub mod interior_point;
pub mod lp_interface;
pub mod search;
pub mod settings;
pub mod statistics;

#[cfg(test)]
mod tests;
