//! # Certifying dual bounds
//!
//! Methods that turn the approximate dual information of the floating point relaxation into a
//! bound on the exact relaxation that is mathematically valid. All of them work with the extended
//! dual, in which every finite side and bound has its own nonnegative dual variable.
use crate::data::linear_program::exact_problem::{ExactProblem, NodeBounds};
use crate::data::linear_program::solution::LpRelaxation;
use crate::data::number_types::rational::Rational;
use crate::lp_interface::ExactLp;

pub mod extended_dual;
pub mod neumaier_shcherbina;
pub mod project_and_shift;

/// A certified statement about the relaxation at a node.
#[derive(Clone, Debug, PartialEq)]
pub enum DualBound {
    /// A lower bound in exact arithmetic, for the internal minimization objective without the
    /// offset.
    Exact(Rational),
    /// A lower bound that was rounded safely, for the internal minimization objective without the
    /// offset.
    Safe(f64),
    /// The relaxation has no feasible point.
    Infeasible,
}

/// Bound from the final basis of the floating point relaxation, evaluated exactly.
///
/// The basis determines a dual solution; its Lagrangian bound is computed with the exact data.
///
/// # Return value
///
/// `None` if there is no basis, it has the wrong shape or it is singular, or if a reduced cost
/// points at an infinite bound.
pub fn verify_basis(
    exact_lp: &mut ExactLp,
    problem: &ExactProblem,
    bounds: &NodeBounds,
    relaxation: &LpRelaxation,
) -> Option<Rational> {
    let basis = relaxation.basis.as_ref()?;
    exact_lp.basis_dual_bound(problem, bounds, basis)
}
