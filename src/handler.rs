//! # Exact LP handler
//!
//! The context object that the search talks to. It owns the exact problem, the lazily built exact
//! LP, the interior point and everything that is kept in sync with the search between calls.
//!
//! Every entry point first applies the pending bound changes, such that the exact data reflects
//! the node that is being processed.
use std::time::Instant;

use log::{debug, warn};
use num_traits::Zero;

use crate::certify::{self, DualBound};
use crate::certify::extended_dual::ExtendedDual;
use crate::certify::neumaier_shcherbina;
use crate::certify::project_and_shift;
use crate::data::linear_program::bound_changes::PendingBoundChanges;
use crate::data::linear_program::elements::BoundDirection;
use crate::data::linear_program::exact_problem::{ExactProblem, NodeBounds};
use crate::data::linear_program::pseudo_objective::PseudoObjective;
use crate::data::linear_program::solution::{ExactSolution, LpRelaxation, RelaxationStatus};
use crate::data::number_types::rational::Rational;
use crate::error::ExactLpError;
use crate::integrality;
use crate::interior_point::{self, InteriorPointState};
use crate::lp_interface::{Basis, ExactLp, ExactLpOutcome};
use crate::search::{HandlerResult, SearchTree};
use crate::settings::{ColumnSelection, DualBoundMethod, Settings};
use crate::statistics::Statistics;

/// First reason why a point is not feasible for the exact problem.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Violation {
    /// A value lies outside of the global bounds of its variable.
    Bound {
        #[allow(missing_docs)]
        variable: usize,
    },
    /// An integral variable has a fractional value.
    Integrality {
        #[allow(missing_docs)]
        variable: usize,
    },
    /// A row activity lies outside of its sides.
    Row {
        #[allow(missing_docs)]
        row: usize,
    },
}

/// Exact counterpart of the relaxation of a mixed integer program in a branch-and-bound search.
#[derive(Debug)]
pub struct ExactLpHandler {
    problem: ExactProblem,
    settings: Settings,
    extended: ExtendedDual,
    pending: PendingBoundChanges,
    pseudo_objective: PseudoObjective,
    exact_lp: ExactLp,
    interior_point: InteriorPointState,
    /// Exact optimum of the first relaxation solved at the root.
    root_solution: Option<ExactSolution>,
    /// First optimal floating point relaxation seen at the root.
    root_relaxation: Option<LpRelaxation>,
    statistics: Statistics,
    warned_deep_changes: bool,
}

impl ExactLpHandler {
    /// Create a handler for a problem.
    ///
    /// Nothing is solved or factorized yet, that happens when it is first needed.
    #[must_use]
    pub fn new(problem: ExactProblem, settings: Settings) -> Self {
        let extended = ExtendedDual::new(&problem);
        let pending = PendingBoundChanges::new(problem.nr_variables());
        let pseudo_objective = PseudoObjective::new(&problem);
        debug!(
            "exact problem with {} variables, {} rows and {} variables with an infinite bound",
            problem.nr_variables(), problem.nr_rows(), problem.statistics().nr_infinite_bounds,
        );

        Self {
            exact_lp: ExactLp::new(settings.exact_lp_limits),
            problem,
            settings,
            extended,
            pending,
            pseudo_objective,
            interior_point: InteriorPointState::default(),
            root_solution: None,
            root_relaxation: None,
            statistics: Statistics::default(),
            warned_deep_changes: false,
        }
    }

    /// Record a change of a local bound in the search.
    ///
    /// Only changes at the root are tracked; the exact local bounds can't be restored when the
    /// search backtracks. Deeper down, the bounds of integral variables are read from the search
    /// instead, see `node_bounds`.
    ///
    /// # Arguments
    ///
    /// * `variable`: Index of the variable.
    /// * `value`: New value of the bound, possibly infinite.
    /// * `direction`: Which bound changed.
    /// * `depth`: Depth of the node at which the change happened.
    pub fn notify_bound_changed(&mut self, variable: usize, value: f64, direction: BoundDirection, depth: usize) {
        debug_assert!(variable < self.problem.nr_variables());

        if depth > 0 {
            if self.warned_deep_changes {
                debug!("dropped {direction:?} bound change of variable {variable} at depth {depth}");
            } else {
                warn!("exact local bounds are only tracked at the root, dropping changes below it");
                self.warned_deep_changes = true;
            }
            return;
        }
        if value.is_nan() {
            warn!("ignoring {direction:?} bound of variable {variable} that is not a number");
            return;
        }

        let value = self.problem.infinity().from_f64(value);
        let value = self.problem.rounded_bound(variable, direction, value);
        self.pending.push(variable, direction, value);
    }

    /// Commit all pending bound changes into the exact problem, the pseudo objective and the exact
    /// LP. Does nothing if there are none.
    pub fn apply_pending_bound_changes(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let changes = self.pending.drain();
        let nr_changes = changes.len();
        for (variable, direction, value) in changes {
            let old = self.problem.bounds(variable).local(direction).clone();
            self.problem.set_local_bound(variable, direction, value);
            let bounds = self.problem.bounds(variable);
            let new = bounds.local(direction);
            if &old == new {
                continue;
            }

            self.pseudo_objective.update(&bounds.objective, direction, &old, new, self.problem.infinity());
            self.exact_lp.change_bound(variable, direction, new, self.problem.infinity());
        }
        debug!("applied {nr_changes} exact bound changes");

        debug_assert_eq!(self.pseudo_objective, PseudoObjective::new(&self.problem));
    }

    /// Pseudo objective at the exact local bounds.
    #[must_use]
    pub fn pseudo_objective(&self) -> &PseudoObjective {
        &self.pseudo_objective
    }

    /// Bounds that hold at the current node.
    ///
    /// Below the root, the exact local bounds are stale. Integral variables then get the local
    /// bounds of the search, which are integral and hence exact, intersected with them.
    fn node_bounds<T: SearchTree>(&self, tree: &T) -> NodeBounds {
        let mut bounds = NodeBounds::local(&self.problem);
        if tree.depth() == 0 {
            return bounds;
        }

        let infinity = self.problem.infinity();
        for j in (0..self.problem.nr_variables()).filter(|&j| self.problem.variable_type(j).is_integral()) {
            let (lower, upper) = tree.local_bounds(j);
            let lower = self.problem.rounded_bound(j, BoundDirection::Lower, infinity.from_f64(lower));
            let upper = self.problem.rounded_bound(j, BoundDirection::Upper, infinity.from_f64(upper));
            bounds.intersect(j, lower, upper);
        }

        bounds
    }

    /// Certify a lower bound on the relaxation at the current node.
    ///
    /// # Arguments
    ///
    /// * `tree`: The search, for the depth, the local bounds and the cutoff bound.
    /// * `relaxation`: Outcome of the floating point relaxation at the node.
    ///
    /// # Return value
    ///
    /// A bound on the internal objective without the offset, or `None` if nothing could be
    /// certified.
    ///
    /// # Errors
    ///
    /// If an exact solve was needed and ended inconclusively, if the relaxation has the wrong
    /// dimensions or if an unavailable policy is configured.
    pub fn certify<T: SearchTree>(
        &mut self,
        tree: &T,
        relaxation: &LpRelaxation,
    ) -> Result<Option<DualBound>, ExactLpError> {
        self.apply_pending_bound_changes();
        let bounds = self.node_bounds(tree);
        if let Some(variable) = bounds.empty_domain() {
            debug!("variable {variable} has an empty domain");
            return Ok(Some(DualBound::Infeasible));
        }
        if let Some(row) = self.problem.inconsistent_row() {
            debug!("row {row} has crossing sides");
            return Ok(Some(DualBound::Infeasible));
        }

        match relaxation.status {
            RelaxationStatus::Infeasible => {
                let cutoff = self.problem.from_search_objective(tree.cutoff_bound());
                let outcome = self.solve_exact(tree.depth(), &bounds, cutoff, relaxation.basis.as_ref())?;
                let bound = self.outcome_bound(outcome);
                if bound == Some(DualBound::Infeasible) {
                    self.statistics.infeasible_lp_certifications += 1;
                } else {
                    debug!("floating point infeasibility was not confirmed exactly");
                }
                Ok(bound)
            },
            RelaxationStatus::Unsolved => Ok(self.pseudo_bound()),
            RelaxationStatus::Optimal => {
                relaxation.check_dimensions(self.problem.nr_rows(), self.problem.nr_variables())?;
                if tree.depth() == 0 && self.root_relaxation.is_none() {
                    self.root_relaxation = Some(relaxation.clone());
                }

                let cutoff = self.problem.from_search_objective(tree.cutoff_bound());
                let bound = match self.settings.dual_bound_method {
                    DualBoundMethod::Automatic => self.automatic_bound(tree.depth(), &bounds, cutoff, relaxation)?,
                    method => self.method_bound(method, tree.depth(), &bounds, cutoff, relaxation)?,
                };
                match bound {
                    Some(bound) => {
                        self.statistics.feasible_lp_certifications += 1;
                        Ok(Some(bound))
                    },
                    None => Ok(self.pseudo_bound()),
                }
            },
        }
    }

    /// The bound of the pseudo objective, if it is finite.
    fn pseudo_bound(&self) -> Option<DualBound> {
        self.pseudo_objective.value().cloned().map(DualBound::Exact)
    }

    /// Pick a method per call and fall back to exact Neumaier-Shcherbina.
    fn automatic_bound(
        &mut self,
        depth: usize,
        bounds: &NodeBounds,
        cutoff: Option<Rational>,
        relaxation: &LpRelaxation,
    ) -> Result<Option<DualBound>, ExactLpError> {
        let method = if self.relevant_bounds_finite(bounds) {
            DualBoundMethod::IntervalNeumaierShcherbina
        } else if self.build_interior_point(None)?.data().is_some() {
            DualBoundMethod::ProjectAndShift
        } else {
            DualBoundMethod::VerifyBasis
        };
        debug!("using {method:?} to certify the node");

        match self.method_bound(method, depth, bounds, cutoff.clone(), relaxation)? {
            Some(bound) => Ok(Some(bound)),
            None => self.method_bound(DualBoundMethod::ExactNeumaierShcherbina, depth, bounds, cutoff, relaxation),
        }
    }

    /// Whether every variable that appears in the objective or a row has finite bounds.
    fn relevant_bounds_finite(&self, bounds: &NodeBounds) -> bool {
        let infinity = self.problem.infinity();
        (0..self.problem.nr_variables())
            .filter(|&j| !self.problem.objective(j).is_zero() || !self.problem.column(j).is_empty())
            .all(|j| !infinity.is_infinite(bounds.lower(j)) && !infinity.is_infinite(bounds.upper(j)))
    }

    /// Run a single concrete method, recording it in the statistics.
    fn method_bound(
        &mut self,
        method: DualBoundMethod,
        depth: usize,
        bounds: &NodeBounds,
        cutoff: Option<Rational>,
        relaxation: &LpRelaxation,
    ) -> Result<Option<DualBound>, ExactLpError> {
        if method == DualBoundMethod::ProjectAndShift && self.build_interior_point(None)?.data().is_none() {
            return Ok(None);
        }

        let start = Instant::now();
        let bound = match method {
            DualBoundMethod::Automatic => return self.automatic_bound(depth, bounds, cutoff, relaxation),
            DualBoundMethod::VerifyBasis => {
                certify::verify_basis(&mut self.exact_lp, &self.problem, bounds, relaxation)
                    .map(DualBound::Exact)
            },
            DualBoundMethod::IntervalNeumaierShcherbina => {
                neumaier_shcherbina::interval_bound(
                    &self.problem, bounds, relaxation, self.settings.dual_zero_tolerance,
                ).map(DualBound::Safe)
            },
            DualBoundMethod::ExactNeumaierShcherbina => {
                let costs = self.extended.costs(&self.problem, bounds);
                neumaier_shcherbina::exact_bound(
                    &self.extended, &self.problem, &costs, relaxation, self.settings.reduce_complementary_duals,
                ).map(DualBound::Exact)
            },
            DualBoundMethod::ProjectAndShift => {
                let costs = self.extended.costs(&self.problem, bounds);
                self.interior_point.data()
                    .and_then(|data| project_and_shift::bound(
                        data, &self.extended, &self.problem, &costs, relaxation, &self.settings,
                    ))
                    .map(DualBound::Exact)
            },
            DualBoundMethod::ExactLp => {
                let outcome = self.solve_exact(depth, bounds, cutoff, relaxation.basis.as_ref())?;
                self.outcome_bound(outcome)
            },
        };
        self.statistics.record(method, bound.is_some(), start.elapsed());
        debug!("{method:?} gave {bound:?}");

        Ok(bound)
    }

    /// Solve the exact LP at the node.
    ///
    /// # Arguments
    ///
    /// * `depth`: Depth of the node, the first optimum at the root is kept.
    /// * `bounds`: Bounds at the node.
    /// * `cutoff`: Internal objective value beyond which the solve may stop.
    /// * `warm_start`: Basis to start from.
    fn solve_exact(
        &mut self,
        depth: usize,
        bounds: &NodeBounds,
        cutoff: Option<Rational>,
        warm_start: Option<&Basis>,
    ) -> Result<ExactLpOutcome, ExactLpError> {
        if let Some(limit) = cutoff {
            self.exact_lp.tighten_objective_limit(limit);
        }

        let outcome = self.exact_lp.solve(&self.problem, bounds, warm_start)?;
        self.record_exact_solve(depth, &outcome);

        Ok(outcome)
    }

    /// Count a conclusive exact solve and keep the first optimum at the root.
    fn record_exact_solve(&mut self, depth: usize, outcome: &ExactLpOutcome) {
        self.statistics.exact_lp_solves += 1;
        if depth == 0 && self.root_solution.is_none() {
            if let ExactLpOutcome::Optimal(solution) = outcome {
                self.root_solution = Some(solution.clone());
            }
        }
    }

    fn outcome_bound(&self, outcome: ExactLpOutcome) -> Option<DualBound> {
        match outcome {
            ExactLpOutcome::Optimal(solution) => Some(DualBound::Exact(solution.objective)),
            ExactLpOutcome::Infeasible => Some(DualBound::Infeasible),
            ExactLpOutcome::ObjectiveLimit => self.exact_lp.objective_limit().cloned().map(DualBound::Exact),
        }
    }

    /// Floating point lower bound for the search.
    ///
    /// # Return value
    ///
    /// `None` if the node is infeasible.
    fn search_bound(&self, bound: &DualBound) -> Option<f64> {
        match bound {
            DualBound::Exact(value) => Some(self.problem.safe_search_bound(value)),
            DualBound::Safe(value) => Some(match Rational::from_f64(*value) {
                Some(value) => self.problem.safe_search_bound(&value),
                None => f64::NEG_INFINITY,
            }),
            DualBound::Infeasible => None,
        }
    }

    /// Tighten the lower bound of the node with a certified bound.
    ///
    /// # Return value
    ///
    /// `Infeasible` if the node can be cut off, `ImprovedLowerBound` if the bound of the node was
    /// raised, and `DidNotFind` otherwise.
    ///
    /// # Errors
    ///
    /// See `certify`.
    pub fn separate_lp<T: SearchTree>(
        &mut self,
        tree: &mut T,
        relaxation: &LpRelaxation,
    ) -> Result<HandlerResult, ExactLpError> {
        let Some(bound) = self.certify(tree, relaxation)? else {
            return Ok(HandlerResult::DidNotFind);
        };

        let Some(bound) = self.search_bound(&bound) else {
            self.statistics.cutoffs += 1;
            return Ok(HandlerResult::Infeasible);
        };
        if bound >= tree.cutoff_bound() {
            debug!("certified bound {bound} reaches the cutoff bound");
            self.statistics.cutoffs += 1;
            Ok(HandlerResult::Infeasible)
        } else if bound > tree.node_lower_bound() {
            tree.update_node_lower_bound(bound);
            Ok(HandlerResult::ImprovedLowerBound)
        } else {
            Ok(HandlerResult::DidNotFind)
        }
    }

    /// Decide a node whose floating point relaxation solution is integral, by solving the exact
    /// LP warm started from the floating point basis.
    ///
    /// # Errors
    ///
    /// If the exact solve ends inconclusively, or if an integral value is not representable.
    pub fn enforce_lp<T: SearchTree>(
        &mut self,
        tree: &mut T,
        relaxation: &LpRelaxation,
    ) -> Result<HandlerResult, ExactLpError> {
        self.enforce(tree, relaxation.basis.as_ref())
    }

    /// Decide a node without a solved relaxation.
    ///
    /// The pseudo objective is tried first, it may allow cutting the node off without solving.
    ///
    /// # Errors
    ///
    /// See `enforce_lp`.
    pub fn enforce_pseudo<T: SearchTree>(&mut self, tree: &mut T) -> Result<HandlerResult, ExactLpError> {
        self.apply_pending_bound_changes();
        if let Some(value) = self.pseudo_objective.value() {
            if self.problem.safe_search_bound(value) >= tree.cutoff_bound() {
                debug!("pseudo objective {value} reaches the cutoff bound");
                self.statistics.cutoffs += 1;
                return Ok(HandlerResult::Infeasible);
            }
        }

        self.enforce(tree, None)
    }

    fn enforce<T: SearchTree>(&mut self, tree: &mut T, warm_start: Option<&Basis>) -> Result<HandlerResult, ExactLpError> {
        self.apply_pending_bound_changes();
        let bounds = self.node_bounds(tree);
        if bounds.empty_domain().is_some() || self.problem.inconsistent_row().is_some() {
            self.statistics.cutoffs += 1;
            return Ok(HandlerResult::Infeasible);
        }

        let cutoff = self.problem.from_search_objective(tree.cutoff_bound());
        match self.solve_exact(tree.depth(), &bounds, cutoff, warm_start)? {
            ExactLpOutcome::Optimal(solution) => {
                integrality::check(&self.problem, &solution, tree, &mut self.statistics)
            },
            ExactLpOutcome::Infeasible | ExactLpOutcome::ObjectiveLimit => {
                self.statistics.cutoffs += 1;
                Ok(HandlerResult::Infeasible)
            },
        }
    }

    /// Build the interior point for project-and-shift, if that wasn't attempted yet.
    ///
    /// # Arguments
    ///
    /// * `relaxation`: Floating point optimum at the root, used by some column selection policies
    /// if none was seen by `certify`.
    ///
    /// # Return value
    ///
    /// The state after the attempt; a failure is permanent.
    ///
    /// # Errors
    ///
    /// If a configured policy is not available, or an exact solve ended inconclusively.
    pub fn build_interior_point(
        &mut self,
        relaxation: Option<&LpRelaxation>,
    ) -> Result<&InteriorPointState, ExactLpError> {
        if self.interior_point.is_attempted() {
            return Ok(&self.interior_point);
        }

        let start = Instant::now();
        if self.settings.column_selection == ColumnSelection::ActiveAtRootExactLp
            && self.root_solution.is_none() {
            self.apply_pending_bound_changes();
            let bounds = NodeBounds::global(&self.problem);
            // An objective limit from an earlier cutoff would leave the root without an optimum
            let outcome = self.exact_lp.solve_to_optimality(&self.problem, &bounds)?;
            self.record_exact_solve(0, &outcome);
        }

        let state = interior_point::build(
            &self.settings,
            &self.extended,
            &self.problem,
            self.root_solution.as_ref(),
            self.root_relaxation.as_ref().or(relaxation),
        );
        self.statistics.interior_point_time += start.elapsed();
        self.interior_point = state?;

        Ok(&self.interior_point)
    }

    /// Check a point for exact feasibility in the global problem.
    ///
    /// # Arguments
    ///
    /// * `values`: One value per variable.
    ///
    /// # Return value
    ///
    /// The first violation found, bounds before integrality before rows.
    ///
    /// # Errors
    ///
    /// If the number of values doesn't match the number of variables.
    pub fn check_solution(&self, values: &[Rational]) -> Result<Option<Violation>, ExactLpError> {
        let nr_variables = self.problem.nr_variables();
        if values.len() != nr_variables {
            return Err(ExactLpError::Dimension {
                what: "solution values",
                expected: nr_variables,
                actual: values.len(),
            });
        }

        let outside = (0..nr_variables).find(|&j| {
            let bounds = self.problem.bounds(j);
            values[j] < bounds.global_lower || values[j] > bounds.global_upper
        });
        if let Some(variable) = outside {
            return Ok(Some(Violation::Bound { variable }));
        }
        if let Some(variable) = integrality::first_fractional(&self.problem, values) {
            return Ok(Some(Violation::Integrality { variable }));
        }

        let activities = self.problem.matrix().multiply(values);
        let violated = activities.iter()
            .enumerate()
            .find(|&(i, activity)| {
                let row = self.problem.row(i);
                activity < &row.lhs || activity > &row.rhs
            });

        Ok(violated.map(|(row, _)| Violation::Row { row }))
    }

    /// Map an internal value to the objective of the user, see
    /// `ExactProblem::safe_external_objective`.
    #[must_use]
    pub fn safe_external_objective(&self, value: &Rational, is_lower_bound: bool) -> f64 {
        self.problem.safe_external_objective(value, is_lower_bound)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The exact problem with its local bounds as last synchronized.
    #[must_use]
    pub fn problem(&self) -> &ExactProblem {
        &self.problem
    }

    /// State of the interior point of project-and-shift.
    #[must_use]
    pub fn interior_point(&self) -> &InteriorPointState {
        &self.interior_point
    }
}
