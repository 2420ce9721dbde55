//! # Representing linear programs
//!
//! The exact relaxation of a mixed integer program, the administration that keeps its local bounds
//! in sync with the search and the solutions that flow in and out.
pub mod bound_changes;
pub mod elements;
pub mod exact_problem;
pub mod pseudo_objective;
pub mod solution;
