//! # Column selection
//!
//! Which components of the extended dual the interior point should be strictly positive on. The
//! more components are selected, the smaller the shift toward the interior point has to be, but
//! the harder it is to find a point that is positive on all of them.
use crate::certify::extended_dual::{DualBlock, ExtendedDual};
use crate::data::linear_program::exact_problem::ExactProblem;
use crate::data::linear_program::solution::{ExactSolution, LpRelaxation};
use crate::data::number_types::rational::Rational;
use crate::data::number_types::rounding::RoundingMode;
use crate::error::ExactLpError;
use crate::settings::ColumnSelection;

/// Relative tolerance for a constraint to count as active in a floating point solution.
const ACTIVITY_TOLERANCE: f64 = 1e-6;

/// Select the components.
///
/// # Arguments
///
/// * `selection`: Policy.
/// * `extended`: Layout of the extended dual.
/// * `problem`: Exact problem.
/// * `costs`: Costs of the extended dual, only components with a cost are ever selected.
/// * `root_solution`: Exact optimum of the root relaxation, needed for `ActiveAtRootExactLp`.
/// * `root_relaxation`: Floating point optimum of the root relaxation, needed for
/// `ActiveAtRootApproximateLp`.
///
/// # Return value
///
/// The selected components in increasing order, or `None` if the policy needs a solution that
/// is not available.
///
/// # Errors
///
/// If the policy is not available.
pub fn select(
    selection: ColumnSelection,
    extended: &ExtendedDual,
    problem: &ExactProblem,
    costs: &[Option<Rational>],
    root_solution: Option<&ExactSolution>,
    root_relaxation: Option<&LpRelaxation>,
) -> Result<Option<Vec<usize>>, ExactLpError> {
    let finite = (0..extended.len()).filter(|&k| costs[k].is_some());

    let selected = match selection {
        ColumnSelection::AllFiniteCost => finite.collect(),
        ColumnSelection::ActiveAtRootExactLp => {
            let Some(solution) = root_solution else {
                return Ok(None);
            };
            let activities = problem.matrix().multiply(&solution.values);
            finite
                .filter(|&k| {
                    let (block, i) = extended.block(k);
                    let value = match block {
                        DualBlock::RowLhs | DualBlock::RowRhs => &activities[i],
                        DualBlock::VariableLower | DualBlock::VariableUpper => &solution.values[i],
                    };
                    costs[k].as_ref().is_some_and(|cost| value == &side(block, cost))
                })
                .collect()
        },
        ColumnSelection::ActiveAtRootApproximateLp => {
            let Some(relaxation) = root_relaxation.filter(|relaxation| {
                relaxation.primal.len() == problem.nr_variables()
            }) else {
                return Ok(None);
            };
            let activities = (0..problem.nr_rows())
                .map(|i| problem.matrix().row(i)
                    .map(|(j, value)| value.to_f64(RoundingMode::Nearest) * relaxation.primal[j])
                    .sum::<f64>())
                .collect::<Vec<_>>();
            finite
                .filter(|&k| {
                    let (block, i) = extended.block(k);
                    let value = match block {
                        DualBlock::RowLhs | DualBlock::RowRhs => activities[i],
                        DualBlock::VariableLower | DualBlock::VariableUpper => relaxation.primal[i],
                    };
                    costs[k].as_ref().is_some_and(|cost| {
                        let side = side(block, cost).to_f64(RoundingMode::Nearest);
                        (value - side).abs() <= ACTIVITY_TOLERANCE * side.abs().max(1_f64)
                    })
                })
                .collect()
        },
        ColumnSelection::ActiveAtCurrentNode => {
            return Err(ExactLpError::UnsupportedColumnSelection(selection));
        },
    };

    Ok(Some(selected))
}

/// The side or bound that a component is the dual of, from its cost.
fn side(block: DualBlock, cost: &Rational) -> Rational {
    match block {
        DualBlock::RowLhs | DualBlock::VariableLower => cost.clone(),
        DualBlock::RowRhs | DualBlock::VariableUpper => -cost,
    }
}
