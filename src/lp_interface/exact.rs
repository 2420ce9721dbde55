//! # Exact LP
//!
//! Lazily constructed exact counterpart of the node relaxation. The matrix, objective and sides
//! are copied once; afterwards only bound changes are pushed.
use log::{debug, info};

use crate::algorithm::simplex::SimplexLp;
use crate::data::linear_program::elements::BoundDirection;
use crate::data::linear_program::exact_problem::{ExactProblem, NodeBounds};
use crate::data::linear_program::solution::ExactSolution;
use crate::data::number_types::infinity::InfinitySentinels;
use crate::data::number_types::rational::Rational;
use crate::error::ExactLpError;
use crate::lp_interface::{Basis, LpInterface, LpStatus, NewColumn, NewRow, SolveLimits};

/// Conclusive outcome of an exact solve.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExactLpOutcome {
    /// Optimal solution at the node.
    Optimal(ExactSolution),
    /// No point satisfies the bounds at the node.
    Infeasible,
    /// The optimal objective value is at least the objective limit.
    ObjectiveLimit,
}

/// The exact LP together with the bounds that were last pushed into it.
#[derive(Clone, Debug)]
pub struct ExactLp {
    lp: Option<SimplexLp<Rational>>,
    lower: Vec<Option<Rational>>,
    upper: Vec<Option<Rational>>,
    objective_limit: Option<Rational>,
    limits: SolveLimits,
    nr_solves: u64,
}

impl ExactLp {
    /// An exact LP that will be constructed on first use.
    ///
    /// # Arguments
    ///
    /// * `limits`: Limits for each solve. Reaching one is an error.
    #[must_use]
    pub fn new(limits: SolveLimits) -> Self {
        Self {
            lp: None,
            lower: Vec::new(),
            upper: Vec::new(),
            objective_limit: None,
            limits,
            nr_solves: 0,
        }
    }

    /// Whether the LP was built already.
    #[must_use]
    pub fn is_constructed(&self) -> bool {
        self.lp.is_some()
    }

    /// Build the LP if that didn't happen yet and bring its bounds up to date.
    ///
    /// # Arguments
    ///
    /// * `problem`: Source of the matrix, objective and sides.
    /// * `bounds`: Variable bounds at the current node.
    fn synchronize(&mut self, problem: &ExactProblem, bounds: &NodeBounds) -> &mut SimplexLp<Rational> {
        let infinity = problem.infinity();
        let n = problem.nr_variables();
        let target_lower = (0..n).map(|j| finite(infinity, bounds.lower(j))).collect::<Vec<_>>();
        let target_upper = (0..n).map(|j| finite(infinity, bounds.upper(j))).collect::<Vec<_>>();

        match &mut self.lp {
            Some(lp) => {
                let changed = (0..n)
                    .filter(|&j| self.lower[j] != target_lower[j] || self.upper[j] != target_upper[j])
                    .collect::<Vec<_>>();
                if !changed.is_empty() {
                    let lower = changed.iter().map(|&j| target_lower[j].clone()).collect::<Vec<_>>();
                    let upper = changed.iter().map(|&j| target_upper[j].clone()).collect::<Vec<_>>();
                    lp.change_bounds(&changed, &lower, &upper);
                    debug!("pushed {} bound changes into the exact LP", changed.len());
                }
            },
            None => {
                let mut lp = SimplexLp::new();
                lp.add_rows((0..problem.nr_rows())
                    .map(|i| {
                        let row = problem.row(i);
                        NewRow {
                            lhs: finite(infinity, &row.lhs),
                            rhs: finite(infinity, &row.rhs),
                            entries: Vec::new(),
                        }
                    })
                    .collect());
                lp.add_columns((0..n)
                    .map(|j| NewColumn {
                        objective: problem.objective(j).clone(),
                        lower: target_lower[j].clone(),
                        upper: target_upper[j].clone(),
                        entries: problem.column(j).to_vec(),
                        name: format!("x{j}"),
                    })
                    .collect());
                lp.set_limits(self.limits);
                info!("constructed the exact LP with {} columns and {} rows", n, problem.nr_rows());
                self.lp = Some(lp);
            },
        }
        self.lower = target_lower;
        self.upper = target_upper;

        let lp = self.lp.get_or_insert_with(SimplexLp::new);
        lp.set_objective_limit(self.objective_limit.clone());
        lp
    }

    /// Push a single bound change, if the LP exists.
    ///
    /// # Arguments
    ///
    /// * `variable`: Column index.
    /// * `direction`: Which bound changes.
    /// * `value`: New value, possibly a sentinel.
    /// * `infinity`: Sentinels of the problem.
    pub fn change_bound(
        &mut self,
        variable: usize,
        direction: BoundDirection,
        value: &Rational,
        infinity: &InfinitySentinels,
    ) {
        let Some(lp) = &mut self.lp else {
            return;
        };
        let value = finite(infinity, value);
        match direction {
            BoundDirection::Lower => self.lower[variable] = value,
            BoundDirection::Upper => self.upper[variable] = value,
        }
        lp.change_bounds(&[variable], &[self.lower[variable].clone()], &[self.upper[variable].clone()]);
    }

    /// Install an objective limit for the following solves. A limit is only ever tightened.
    pub fn tighten_objective_limit(&mut self, limit: Rational) {
        let tighter = self.objective_limit.as_ref().is_none_or(|current| &limit < current);
        if tighter {
            self.objective_limit = Some(limit);
        }
    }

    /// The current objective limit.
    #[must_use]
    pub fn objective_limit(&self) -> Option<&Rational> {
        self.objective_limit.as_ref()
    }

    /// Solve at the current node.
    ///
    /// # Arguments
    ///
    /// * `problem`: Problem the LP is built from.
    /// * `bounds`: Variable bounds at the current node.
    /// * `warm_start`: Basis to start from, typically from the floating point relaxation. A basis
    /// of the wrong shape is ignored.
    ///
    /// # Errors
    ///
    /// If the solve ends in a status from which nothing sound can be concluded.
    pub fn solve(
        &mut self,
        problem: &ExactProblem,
        bounds: &NodeBounds,
        warm_start: Option<&Basis>,
    ) -> Result<ExactLpOutcome, ExactLpError> {
        self.run(problem, bounds, warm_start, true)
    }

    /// Solve at the current node, ignoring the objective limit for this solve only.
    ///
    /// The outcome is never `ObjectiveLimit`.
    ///
    /// # Errors
    ///
    /// If the solve ends in a status from which nothing sound can be concluded.
    pub fn solve_to_optimality(
        &mut self,
        problem: &ExactProblem,
        bounds: &NodeBounds,
    ) -> Result<ExactLpOutcome, ExactLpError> {
        self.run(problem, bounds, None, false)
    }

    fn run(
        &mut self,
        problem: &ExactProblem,
        bounds: &NodeBounds,
        warm_start: Option<&Basis>,
        use_objective_limit: bool,
    ) -> Result<ExactLpOutcome, ExactLpError> {
        self.nr_solves += 1;
        let nr_solves = self.nr_solves;

        let lp = self.synchronize(problem, bounds);
        if !use_objective_limit {
            // Restored by the next synchronization
            lp.set_objective_limit(None);
        }
        if let Some(basis) = warm_start {
            if let Err(error) = lp.set_basis(basis) {
                debug!("not warm starting the exact LP: {error}");
            }
        }

        let status = lp.solve_dual();
        debug!("exact LP solve {nr_solves} ended with {status:?}");

        match status {
            LpStatus::Optimal => {
                let solution = lp.solution().ok_or(ExactLpError::ExactLp { status })?;
                Ok(ExactLpOutcome::Optimal(ExactSolution {
                    objective: solution.objective,
                    values: solution.primal,
                }))
            },
            LpStatus::Infeasible => Ok(ExactLpOutcome::Infeasible),
            LpStatus::ObjectiveLimit if use_objective_limit => Ok(ExactLpOutcome::ObjectiveLimit),
            status => Err(ExactLpError::ExactLp { status }),
        }
    }

    /// Exact dual objective value of a basis at the current node, if that basis is dual feasible
    /// in exact arithmetic.
    ///
    /// # Arguments
    ///
    /// * `basis`: Typically the final basis of the floating point relaxation.
    ///
    /// # Return value
    ///
    /// `None` if the basis has the wrong shape, is singular or isn't dual feasible.
    pub fn basis_dual_bound(
        &mut self,
        problem: &ExactProblem,
        bounds: &NodeBounds,
        basis: &Basis,
    ) -> Option<Rational> {
        let lp = self.synchronize(problem, bounds);
        if let Err(error) = lp.set_basis(basis) {
            debug!("basis can't be verified: {error}");
            return None;
        }

        lp.basis_dual_bound()
    }

    /// Number of conclusive and inconclusive solves.
    #[must_use]
    pub fn nr_solves(&self) -> u64 {
        self.nr_solves
    }

    /// Total number of simplex iterations.
    #[must_use]
    pub fn iteration_count(&self) -> u64 {
        self.lp.as_ref().map_or(0, LpInterface::iteration_count)
    }
}

fn finite(infinity: &InfinitySentinels, value: &Rational) -> Option<Rational> {
    infinity.finite(value).cloned()
}
