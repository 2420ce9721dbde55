//! # Neumaier-Shcherbina
//!
//! Any vector of row duals `y` gives the bound
//!
//! ```text
//! y^T b(y) + min { (c - A^T y)^T x : lb <= x <= ub }
//! ```
//!
//! where `b(y)` selects the side of each row matching the sign of its dual. The minimization is
//! separable and trivial. The bound is only finite if every variable with a nonzero reduced cost
//! has a finite bound in the right direction.
//!
//! Two variants are provided: one evaluated in interval arithmetic on the approximate duals, and
//! one that repairs the approximate duals exactly.
use log::{debug, log_enabled, Level};

use crate::certify::extended_dual::{DualBlock, ExtendedDual};
use crate::data::linear_program::exact_problem::{ExactProblem, NodeBounds};
use crate::data::linear_program::solution::LpRelaxation;
use crate::data::number_types::interval::Interval;
use crate::data::number_types::rational::Rational;
use crate::data::number_types::rounding::RoundingMode;

/// Safe floating point bound from the approximate row duals, using interval arithmetic.
///
/// # Arguments
///
/// * `problem`: Exact problem.
/// * `bounds`: Variable bounds at the node.
/// * `relaxation`: Approximate solution with row duals for every row.
/// * `zero_tolerance`: Row duals of at most this magnitude are taken to be zero.
///
/// # Return value
///
/// A lower bound on the relaxation at the node, or `None` if it is minus infinity.
#[must_use]
pub fn interval_bound(
    problem: &ExactProblem,
    bounds: &NodeBounds,
    relaxation: &LpRelaxation,
    zero_tolerance: f64,
) -> Option<f64> {
    let infinity = problem.infinity();

    let mut total = Interval::point(0_f64);
    let mut duals = vec![0_f64; problem.nr_rows()];
    for (i, &dual) in relaxation.row_duals.iter().enumerate() {
        if !dual.is_finite() || dual.abs() <= zero_tolerance {
            continue;
        }
        let row = problem.row(i);
        let side = if dual > 0_f64 { &row.lhs } else { &row.rhs };
        // A dual on an infinite side contributes minus infinity, it is better dropped
        if infinity.is_infinite(side) {
            continue;
        }

        duals[i] = dual;
        total = total + Interval::point(dual) * Interval::from_rational(side);
    }

    let mut reduced_costs = (0..problem.nr_variables())
        .map(|j| Interval::from_rational(problem.objective(j)))
        .collect::<Vec<_>>();
    let matrix = problem.matrix();
    for (i, &dual) in duals.iter().enumerate() {
        if dual == 0_f64 {
            continue;
        }
        for (j, value) in matrix.row(i) {
            reduced_costs[j] = reduced_costs[j] - Interval::point(dual) * Interval::from_rational(value);
        }
    }

    for (j, reduced_cost) in reduced_costs.into_iter().enumerate() {
        if reduced_cost == Interval::point(0_f64) {
            continue;
        }
        let domain = Interval::new(
            infinity.to_f64(bounds.lower(j), RoundingMode::Downward),
            infinity.to_f64(bounds.upper(j), RoundingMode::Upward),
        );
        let contribution = reduced_cost * domain;
        if contribution.lower() == f64::NEG_INFINITY {
            return None;
        }
        total = total + contribution;
    }

    let bound = total.lower();
    if bound.is_finite() {
        Some(bound)
    } else {
        None
    }
}

/// Make the approximate dual solution exactly feasible by absorbing the violation of each
/// equality constraint into the bound duals of its variable.
///
/// # Arguments
///
/// * `extended`: Layout of the extended dual.
/// * `problem`: Exact problem.
/// * `y`: Nonnegative extended dual vector, updated in place.
pub fn repair(extended: &ExtendedDual, problem: &ExactProblem, y: &mut [Rational]) {
    for (j, violation) in extended.residual(problem, y).into_iter().enumerate() {
        if violation.is_positive() {
            y[extended.index(DualBlock::VariableLower, j)] += violation;
        } else if violation.is_negative() {
            y[extended.index(DualBlock::VariableUpper, j)] -= violation;
        }
    }
}

/// Exact bound from the approximate dual solution, repaired with the variable bounds.
///
/// # Arguments
///
/// * `extended`: Layout of the extended dual.
/// * `problem`: Exact problem.
/// * `costs`: Costs of the extended dual at the node.
/// * `relaxation`: Approximate solution with row duals and reduced costs.
/// * `reduce_complementary`: Whether to cancel dual values on both sides of a row or variable.
///
/// # Return value
///
/// A lower bound on the relaxation at the node, or `None` if the repair needs an infinite bound.
#[must_use]
pub fn exact_bound(
    extended: &ExtendedDual,
    problem: &ExactProblem,
    costs: &[Option<Rational>],
    relaxation: &LpRelaxation,
    reduce_complementary: bool,
) -> Option<Rational> {
    let mut y = extended.from_relaxation(relaxation, costs);
    if log_enabled!(Level::Debug) {
        let before = y.clone();
        repair(extended, problem, &mut y);
        debug!("repair changed {} of {} dual components", nr_repaired(&before, &y), y.len());
    } else {
        repair(extended, problem, &mut y);
    }
    if reduce_complementary {
        extended.reduce_complementary(&mut y);
    }
    debug_assert!(extended.is_feasible(problem, &y));

    extended.objective(&y, costs)
}

/// Number of components that the repair changed.
fn nr_repaired(before: &[Rational], after: &[Rational]) -> usize {
    before.iter().zip(after).filter(|(old, new)| old != new).count()
}
