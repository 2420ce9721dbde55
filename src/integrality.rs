//! # Integrality
//!
//! Decide what an exact optimum of the node relaxation means for the search: the node is cut off,
//! a solution was found, or the node is split on a fractional integer variable.
use log::debug;

use crate::data::linear_program::exact_problem::ExactProblem;
use crate::data::linear_program::solution::ExactSolution;
use crate::data::number_types::rational::Rational;
use crate::data::number_types::rounding::RoundingMode;
use crate::error::ExactLpError;
use crate::search::{HandlerResult, SearchTree};
use crate::statistics::Statistics;

/// Process an exact optimum of the relaxation at the current node.
///
/// # Arguments
///
/// * `problem`: Exact problem, provides the variable types.
/// * `solution`: Optimal solution of the exact relaxation at the node.
/// * `tree`: Search to report the result to.
/// * `statistics`: Counters to update.
///
/// # Return value
///
/// `Infeasible` if the node can be cut off, `Branched` after splitting the node,
/// `SolutionFound` or `Feasible` when the solution is integral depending on whether it was
/// accepted by the search.
///
/// # Errors
///
/// If an integral value can't be represented in floating point.
pub fn check<T: SearchTree>(
    problem: &ExactProblem,
    solution: &ExactSolution,
    tree: &mut T,
    statistics: &mut Statistics,
) -> Result<HandlerResult, ExactLpError> {
    let bound = problem.safe_search_bound(&solution.objective);
    if bound > tree.node_lower_bound() {
        tree.update_node_lower_bound(bound);
    }
    if tree.node_lower_bound().max(bound) >= tree.cutoff_bound() {
        debug!("node cut off at exact objective {}", solution.objective);
        statistics.cutoffs += 1;
        return Ok(HandlerResult::Infeasible);
    }

    if let Some(variable) = first_fractional(problem, &solution.values) {
        let value = &solution.values[variable];
        let (down, up) = (value.floor(), value.ceil());
        for side in [&down, &up] {
            if !side.is_representable() {
                return Err(unrepresentable(variable, side));
            }
        }
        let down_upper = down.to_f64(RoundingMode::Downward);
        let up_lower = up.to_f64(RoundingMode::Upward);
        debug!("branching on variable {variable} with value {value}");
        tree.branch(variable, down_upper, up_lower);
        statistics.branchings += 1;
        return Ok(HandlerResult::Branched);
    }

    let approximate = approximate_values(problem, &solution.values)?;
    if tree.store_solution(&approximate, &solution.values) {
        statistics.stored_solutions += 1;
        Ok(HandlerResult::SolutionFound)
    } else {
        Ok(HandlerResult::Feasible)
    }
}

/// Smallest index of an integral variable with a fractional value.
#[must_use]
pub fn first_fractional(problem: &ExactProblem, values: &[Rational]) -> Option<usize> {
    debug_assert_eq!(values.len(), problem.nr_variables());

    (0..problem.nr_variables())
        .find(|&j| problem.variable_type(j).is_integral() && !values[j].is_integer())
}

/// Floating point copy of an integral solution.
///
/// Values of integral variables need to be exactly representable, values of continuous ones only
/// in range.
fn approximate_values(problem: &ExactProblem, values: &[Rational]) -> Result<Vec<f64>, ExactLpError> {
    values.iter()
        .enumerate()
        .map(|(j, value)| {
            let approximate = value.to_f64(RoundingMode::Nearest);
            let representable = if problem.variable_type(j).is_integral() {
                value.is_representable()
            } else {
                approximate.is_finite()
            };
            if representable { Ok(approximate) } else { Err(unrepresentable(j, value)) }
        })
        .collect()
}

fn unrepresentable(variable: usize, value: &Rational) -> ExactLpError {
    ExactLpError::Unrepresentable { variable, value: value.to_string() }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::solution::ExactSolution;
    use crate::data::number_types::rational::Rational;
    use crate::error::ExactLpError;
    use crate::integrality::{check, first_fractional};
    use crate::search::{HandlerResult, SearchTree};
    use crate::statistics::Statistics;
    use crate::tests::problem_1;
    use crate::RQ;

    #[derive(Default)]
    struct Tree {
        cutoff: Option<f64>,
        lower_bound: Option<f64>,
        branched: Option<(usize, f64, f64)>,
        stored: Vec<Vec<Rational>>,
        accept: bool,
    }

    impl SearchTree for Tree {
        fn depth(&self) -> usize {
            0
        }

        fn cutoff_bound(&self) -> f64 {
            self.cutoff.unwrap_or(f64::INFINITY)
        }

        fn node_lower_bound(&self) -> f64 {
            self.lower_bound.unwrap_or(f64::NEG_INFINITY)
        }

        fn update_node_lower_bound(&mut self, bound: f64) {
            self.lower_bound = Some(bound);
        }

        fn local_bounds(&self, _variable: usize) -> (f64, f64) {
            (0_f64, 1_f64)
        }

        fn branch(&mut self, variable: usize, down_upper: f64, up_lower: f64) {
            self.branched = Some((variable, down_upper, up_lower));
        }

        fn store_solution(&mut self, _approximate: &[f64], exact: &[Rational]) -> bool {
            self.stored.push(exact.to_vec());
            self.accept
        }
    }

    #[test]
    fn fractional() {
        let problem = problem_1::create();
        let mut tree = Tree::default();
        let mut statistics = Statistics::default();
        let solution = ExactSolution { objective: RQ!(-1), values: vec![RQ!(1, 2), RQ!(1, 2)] };

        assert_eq!(first_fractional(&problem, &solution.values), Some(0));
        let result = check(&problem, &solution, &mut tree, &mut statistics);
        assert_eq!(result, Ok(HandlerResult::Branched));
        assert_eq!(tree.branched, Some((0, 0_f64, 1_f64)));
        assert_eq!(tree.lower_bound, Some(-1_f64));
        assert_eq!(statistics.branchings, 1);
    }

    #[test]
    fn integral() {
        let problem = problem_1::create();
        let solution = ExactSolution { objective: RQ!(-1), values: vec![RQ!(0), RQ!(1)] };
        let mut statistics = Statistics::default();

        let mut tree = Tree { accept: true, ..Tree::default() };
        let result = check(&problem, &solution, &mut tree, &mut statistics);
        assert_eq!(result, Ok(HandlerResult::SolutionFound));
        assert_eq!(tree.stored, vec![vec![RQ!(0), RQ!(1)]]);
        assert_eq!(statistics.stored_solutions, 1);

        let mut tree = Tree::default();
        let result = check(&problem, &solution, &mut tree, &mut statistics);
        assert_eq!(result, Ok(HandlerResult::Feasible));
        assert_eq!(statistics.stored_solutions, 1);
    }

    #[test]
    fn cutoff() {
        let problem = problem_1::create();
        let solution = ExactSolution { objective: RQ!(-1), values: vec![RQ!(1, 2), RQ!(1, 2)] };
        let mut statistics = Statistics::default();
        let mut tree = Tree { cutoff: Some(-1_f64), ..Tree::default() };

        let result = check(&problem, &solution, &mut tree, &mut statistics);
        assert_eq!(result, Ok(HandlerResult::Infeasible));
        assert_eq!(tree.branched, None);
        assert_eq!(statistics.cutoffs, 1);
    }

    #[test]
    fn unrepresentable() {
        let problem = problem_1::create();
        // 2^53 + 1 is integral, but has no floating point representation
        let huge = RQ!(9_007_199_254_740_992_f64) + RQ!(1);
        let solution = ExactSolution { objective: RQ!(0), values: vec![huge, RQ!(0)] };
        let mut statistics = Statistics::default();
        let mut tree = Tree::default();

        let result = check(&problem, &solution, &mut tree, &mut statistics);
        assert!(matches!(result, Err(ExactLpError::Unrepresentable { variable: 0, .. })));
        assert!(tree.stored.is_empty());
    }
}
