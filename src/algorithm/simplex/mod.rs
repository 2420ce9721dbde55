//! # Bounded revised simplex
//!
//! A revised simplex method for problems of the form
//!
//! ```text
//! min c^T x
//! s.t. lhs <= A x <= rhs
//!      lb <= x <= ub
//! ```
//!
//! where any side or bound may be missing. Each row gets a slack column, such that the constraints
//! read `A x - s = 0` with `lhs <= s <= rhs`. Nonbasic variables sit at one of their bounds, or at
//! zero when they have none.
//!
//! The implementation is generic over the `Field` trait: it runs in floating point to quickly find
//! a good basis and in exact rational arithmetic to get authoritative results, typically starting
//! from that basis. Bland's rule is used for pivoting, which guarantees termination in exact
//! arithmetic.
use std::time::Instant;

use log::trace;

use crate::data::linear_algebra::SparseTuple;
use crate::data::number_types::traits::Field;
use crate::error::ExactLpError;
use crate::lp_interface::{Basis, BasisStatus, LpInterface, LpSolution, LpStatus, NewColumn, NewRow, SolveLimits};

pub use basis_inverse_rows::BasisInverseRows;

mod basis_inverse_rows;
mod dual;
mod primal;

/// A column of the constraint matrix `[A, -I]`, or of an artificial variable.
#[derive(Copy, Clone, Debug)]
pub enum ColumnRef<'a, F> {
    /// Column of a structural variable, by increasing row index.
    Sparse(&'a [SparseTuple<F>]),
    /// A single nonzero value, at the given row.
    Unit(usize, &'a F),
}

impl<F: Field> ColumnRef<'_, F> {
    /// Inner product with a dense vector indexed by row.
    #[must_use]
    pub fn inner_product(&self, dense: &[F]) -> F {
        match self {
            Self::Sparse(tuples) => {
                let mut total = F::zero();
                for (i, value) in tuples.iter() {
                    total += value.clone() * &dense[*i];
                }
                total
            },
            Self::Unit(i, value) => (*value).clone() * &dense[*i],
        }
    }

    /// Call a function on each (row, value) pair.
    pub fn for_each(&self, mut f: impl FnMut(usize, &F)) {
        match self {
            Self::Sparse(tuples) => tuples.iter().for_each(|(i, value)| f(*i, value)),
            Self::Unit(i, value) => f(*i, value),
        }
    }
}

fn dense_inner_product<F: Field>(left: &[F], right: &[F]) -> F {
    let mut total = F::zero();
    for (left_value, right_value) in left.iter().zip(right) {
        if !left_value.is_zero() {
            total += left_value.clone() * right_value;
        }
    }
    total
}

/// Where a variable is in the current basic solution.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum VariableStatus {
    /// Basic at the given row position.
    Basic(usize),
    AtLower,
    AtUpper,
    /// Nonbasic without any finite bound, at zero.
    Free,
}

/// A basis with its inverse and the corresponding basic solution.
#[derive(Clone, Debug)]
struct State<F> {
    basis_inverse: BasisInverseRows<F>,
    /// Variable that is basic at each row position.
    basic_columns: Vec<usize>,
    /// Status of each variable: structural variables, then slacks, then artificials.
    status: Vec<VariableStatus>,
    values: Vec<F>,
    /// Row and coefficient of each artificial variable, only present during phase one.
    artificials: Vec<SparseTuple<F>>,
}

/// Iteration and time budget of a single solve.
struct Budget {
    start: Instant,
    iterations: u64,
    limits: SolveLimits,
}

impl Budget {
    fn new(limits: SolveLimits) -> Self {
        Self { start: Instant::now(), iterations: 0, limits }
    }

    /// Status to terminate with if a limit is reached.
    fn exceeded(&self) -> Option<LpStatus> {
        if self.limits.iterations.is_some_and(|limit| self.iterations >= limit) {
            Some(LpStatus::IterationLimit)
        } else if self.limits.time.is_some_and(|limit| self.start.elapsed() >= limit) {
            Some(LpStatus::TimeLimit)
        } else {
            None
        }
    }
}

/// Linear program solved with the bounded revised simplex method.
#[derive(Clone, Debug)]
pub struct SimplexLp<F> {
    /// Structural columns, each sorted by row index.
    columns: Vec<Vec<SparseTuple<F>>>,
    objective: Vec<F>,
    names: Vec<String>,
    column_lower: Vec<Option<F>>,
    column_upper: Vec<Option<F>>,
    row_lhs: Vec<Option<F>>,
    row_rhs: Vec<Option<F>>,

    objective_limit: Option<F>,
    limits: SolveLimits,

    /// Basis after the last solve, or as loaded.
    state: Option<State<F>>,
    status: LpStatus,
    iteration_count: u64,

    /// Coefficient of the slack columns.
    minus_one: F,
    /// Lower bound of artificial variables.
    zero: F,
}

impl<F: Field> SimplexLp<F> {
    /// Create an empty problem.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            objective: Vec::new(),
            names: Vec::new(),
            column_lower: Vec::new(),
            column_upper: Vec::new(),
            row_lhs: Vec::new(),
            row_rhs: Vec::new(),
            objective_limit: None,
            limits: SolveLimits::default(),
            state: None,
            status: LpStatus::NotSolved,
            iteration_count: 0,
            minus_one: -F::one(),
            zero: F::zero(),
        }
    }

    fn n(&self) -> usize {
        self.columns.len()
    }

    fn m(&self) -> usize {
        self.row_lhs.len()
    }

    fn column<'a>(&'a self, k: usize, artificials: &'a [SparseTuple<F>]) -> ColumnRef<'a, F> {
        let (n, m) = (self.n(), self.m());
        if k < n {
            ColumnRef::Sparse(&self.columns[k])
        } else if k < n + m {
            ColumnRef::Unit(k - n, &self.minus_one)
        } else {
            let (row, sign) = &artificials[k - n - m];
            ColumnRef::Unit(*row, sign)
        }
    }

    fn lower(&self, k: usize) -> Option<&F> {
        let (n, m) = (self.n(), self.m());
        if k < n {
            self.column_lower[k].as_ref()
        } else if k < n + m {
            self.row_lhs[k - n].as_ref()
        } else {
            Some(&self.zero)
        }
    }

    fn upper(&self, k: usize) -> Option<&F> {
        let (n, m) = (self.n(), self.m());
        if k < n {
            self.column_upper[k].as_ref()
        } else if k < n + m {
            self.row_rhs[k - n].as_ref()
        } else {
            None
        }
    }

    fn is_fixed(&self, k: usize) -> bool {
        match (self.lower(k), self.upper(k)) {
            (Some(lower), Some(upper)) => (upper.clone() - lower).is_significantly_zero(),
            _ => false,
        }
    }

    fn name(&self, k: usize) -> String {
        let (n, m) = (self.n(), self.m());
        if k < n {
            self.names[k].clone()
        } else if k < n + m {
            format!("row_{}", k - n)
        } else {
            format!("artificial_{}", k - n - m)
        }
    }

    /// Costs of the structural and slack variables.
    fn phase_two_costs(&self) -> Vec<F> {
        self.objective.iter()
            .cloned()
            .chain((0..self.m()).map(|_| F::zero()))
            .collect()
    }

    /// Nonbasic status and value of a variable, as close to the preferred status as its bounds
    /// allow.
    fn nonbasic_position(&self, k: usize, preferred: VariableStatus) -> (VariableStatus, F) {
        let lower = self.lower(k).map(|value| (VariableStatus::AtLower, value.clone()));
        let upper = self.upper(k).map(|value| (VariableStatus::AtUpper, value.clone()));
        let position = match preferred {
            VariableStatus::AtUpper => upper.or(lower),
            _ => lower.or(upper),
        };

        position.unwrap_or((VariableStatus::Free, F::zero()))
    }

    /// Starting state with all slacks basic, except in rows that are violated at the starting
    /// point; those get an artificial variable.
    fn slack_state(&self) -> State<F> {
        let (n, m) = (self.n(), self.m());

        let mut status = Vec::with_capacity(n + m);
        let mut values = Vec::with_capacity(n + m);
        for j in 0..n {
            let (position, value) = self.nonbasic_position(j, VariableStatus::AtLower);
            status.push(position);
            values.push(value);
        }

        let mut activities = vec![F::zero(); m];
        for (column, value) in self.columns.iter().zip(&values) {
            if value.is_zero() {
                continue;
            }
            for (i, coefficient) in column {
                activities[*i] += coefficient.clone() * value;
            }
        }

        let mut basic_columns = Vec::with_capacity(m);
        let mut diagonal = Vec::with_capacity(m);
        let mut artificials = Vec::new();
        let mut artificial_values = Vec::new();
        for (i, activity) in activities.into_iter().enumerate() {
            let below = self.row_lhs[i].as_ref()
                .filter(|lhs| (activity.clone() - *lhs).is_significantly_negative());
            let above = self.row_rhs[i].as_ref()
                .filter(|rhs| (activity.clone() - *rhs).is_significantly_positive());
            match (below, above) {
                (Some(target), _) | (None, Some(target)) => {
                    let position = if below.is_some() { VariableStatus::AtLower } else { VariableStatus::AtUpper };
                    let difference = target.clone() - activity;
                    let sign = if difference.is_significantly_positive() { F::one() } else { -F::one() };
                    status.push(position);
                    values.push(target.clone());

                    basic_columns.push(n + m + artificials.len());
                    diagonal.push(sign.clone());
                    artificial_values.push(difference * &sign);
                    artificials.push((i, sign));
                },
                (None, None) => {
                    status.push(VariableStatus::Basic(i));
                    values.push(activity);
                    basic_columns.push(n + i);
                    diagonal.push(-F::one());
                },
            }
        }
        for (t, value) in artificial_values.into_iter().enumerate() {
            let row = artificials[t].0;
            status.push(VariableStatus::Basic(row));
            values.push(value);
        }

        State {
            basis_inverse: BasisInverseRows::diagonal(&diagonal),
            basic_columns,
            status,
            values,
            artificials,
        }
    }

    /// Move nonbasic variables to their (possibly changed) bounds and recompute the basic values.
    ///
    /// # Return value
    ///
    /// `false` if the state can't be used.
    fn refresh(&self, state: &mut State<F>) -> bool {
        let total = self.n() + self.m();
        if state.status.len() != total || !state.artificials.is_empty() {
            return false;
        }

        for k in 0..total {
            if !matches!(state.status[k], VariableStatus::Basic(_)) {
                let (position, value) = self.nonbasic_position(k, state.status[k]);
                state.status[k] = position;
                state.values[k] = value;
            }
        }
        self.recompute_basic_values(state);

        true
    }

    /// Solve `B x_B = -N x_N`.
    fn recompute_basic_values(&self, state: &mut State<F>) {
        let mut right_hand_side = vec![F::zero(); self.m()];
        for (k, status) in state.status.iter().enumerate() {
            if matches!(status, VariableStatus::Basic(_)) || state.values[k].is_zero() {
                continue;
            }
            let value = &state.values[k];
            self.column(k, &state.artificials).for_each(|i, coefficient| {
                right_hand_side[i] -= coefficient.clone() * value;
            });
        }
        let basic_values = (0..self.m())
            .map(|r| dense_inner_product(state.basis_inverse.row(r), &right_hand_side))
            .collect::<Vec<_>>();
        for (r, value) in basic_values.into_iter().enumerate() {
            let k = state.basic_columns[r];
            state.values[k] = value;
        }
    }

    fn basic_costs(state: &State<F>, costs: &[F]) -> Vec<F> {
        state.basic_columns.iter().map(|&k| costs[k].clone()).collect()
    }

    /// Reduced cost `c_k - y^T a_k` of a variable.
    fn reduced_cost(&self, k: usize, state: &State<F>, costs: &[F], dual: &[F]) -> F {
        costs[k].clone() - self.column(k, &state.artificials).inner_product(dual)
    }

    /// Bound of variable `k` that a value violates, with the status of a variable sitting at that
    /// bound.
    fn bound_violation(&self, k: usize, value: &F) -> Option<(F, VariableStatus)> {
        if let Some(lower) = self.lower(k) {
            let difference = value.clone() - lower;
            if difference.is_significantly_negative() {
                return Some((lower.clone(), VariableStatus::AtLower));
            }
        }
        if let Some(upper) = self.upper(k) {
            let difference = value.clone() - upper;
            if difference.is_significantly_positive() {
                return Some((upper.clone(), VariableStatus::AtUpper));
            }
        }

        None
    }

    fn is_primal_feasible(&self, state: &State<F>) -> bool {
        state.basic_columns.iter().all(|&k| self.bound_violation(k, &state.values[k]).is_none())
    }

    fn is_dual_feasible(&self, state: &State<F>, costs: &[F]) -> bool {
        let dual = state.basis_inverse.dual(&Self::basic_costs(state, costs));
        (0..state.status.len())
            .filter(|&k| !self.is_fixed(k))
            .all(|k| {
                let reduced_cost = || self.reduced_cost(k, state, costs, &dual);
                match state.status[k] {
                    VariableStatus::Basic(_) => true,
                    VariableStatus::AtLower => !reduced_cost().is_significantly_negative(),
                    VariableStatus::AtUpper => !reduced_cost().is_significantly_positive(),
                    VariableStatus::Free => reduced_cost().is_significantly_zero(),
                }
            })
    }

    /// Replace the basic variable at row position `r` by variable `k`.
    ///
    /// # Arguments
    ///
    /// * `column`: `B^-1 a_k`.
    /// * `leaving_status`: Nonbasic status of the leaving variable.
    fn pivot(
        &self,
        state: &mut State<F>,
        r: usize,
        k: usize,
        column: &[F],
        leaving_status: VariableStatus,
    ) {
        let leaving = state.basic_columns[r];
        trace!("pivot: {} enters, {} leaves at row position {}", self.name(k), self.name(leaving), r);

        state.basis_inverse.change_basis(r, column);
        state.basic_columns[r] = k;
        state.status[k] = VariableStatus::Basic(r);
        state.status[leaving] = leaving_status;
    }

    fn objective_value(&self, state: &State<F>) -> F {
        let mut total = F::zero();
        for (cost, value) in self.objective.iter().zip(&state.values) {
            if !cost.is_zero() {
                total += cost.clone() * value;
            }
        }
        total
    }

    fn limit_reached(&self, state: &State<F>) -> bool {
        self.objective_limit.as_ref().is_some_and(|limit| &self.objective_value(state) >= limit)
    }

    fn has_crossing_bounds(&self) -> bool {
        (0..(self.n() + self.m())).any(|k| match (self.lower(k), self.upper(k)) {
            (Some(lower), Some(upper)) => (upper.clone() - lower).is_significantly_negative(),
            _ => false,
        })
    }

    fn solve(&mut self, prefer_dual: bool) -> LpStatus {
        let mut budget = Budget::new(self.limits);
        let status = self.run(prefer_dual, &mut budget);
        self.iteration_count += budget.iterations;
        self.status = status;
        trace!("simplex terminated with {:?} after {} iterations", status, budget.iterations);

        status
    }

    fn run(&mut self, prefer_dual: bool, budget: &mut Budget) -> LpStatus {
        if self.has_crossing_bounds() {
            return LpStatus::Infeasible;
        }
        let costs = self.phase_two_costs();

        if let Some(mut state) = self.state.take() {
            if self.refresh(&mut state) {
                let primal_feasible = self.is_primal_feasible(&state);
                let dual_feasible = self.is_dual_feasible(&state, &costs);
                let status = match (primal_feasible, dual_feasible) {
                    (true, _) => Some(self.primal(&mut state, &costs, budget)),
                    (false, true) if prefer_dual => Some(self.dual(&mut state, &costs, budget)),
                    _ => None,
                };
                if let Some(status) = status {
                    let status = self.apply_objective_limit(status, &state);
                    self.state = Some(state);
                    return status;
                }
            }
        }

        let mut state = self.slack_state();
        let status = self.phase_one(&mut state, budget);
        if status != LpStatus::Optimal {
            return status;
        }
        let status = self.primal(&mut state, &costs, budget);
        let status = self.apply_objective_limit(status, &state);
        self.state = Some(state);

        status
    }

    fn apply_objective_limit(&self, status: LpStatus, state: &State<F>) -> LpStatus {
        if status == LpStatus::Optimal && self.limit_reached(state) {
            LpStatus::ObjectiveLimit
        } else {
            status
        }
    }

    fn reset(&mut self) {
        self.state = None;
        self.status = LpStatus::NotSolved;
    }

    /// Bring a state in from a user provided basis.
    fn state_from_basis(&self, basis: &Basis) -> Option<State<F>> {
        let (n, m) = (self.n(), self.m());

        let mut status = Vec::with_capacity(n + m);
        let mut basic_columns = Vec::with_capacity(m);
        for (k, basis_status) in basis.columns.iter().chain(&basis.rows).enumerate() {
            let position = match basis_status {
                BasisStatus::Basic => {
                    basic_columns.push(k);
                    VariableStatus::Basic(basic_columns.len() - 1)
                },
                BasisStatus::Lower => VariableStatus::AtLower,
                BasisStatus::Upper => VariableStatus::AtUpper,
                BasisStatus::Zero => VariableStatus::Free,
            };
            status.push(position);
        }
        if basic_columns.len() != m {
            return None;
        }

        let columns = basic_columns.iter().map(|&k| self.column(k, &[])).collect::<Vec<_>>();
        let basis_inverse = BasisInverseRows::invert(&columns)?;

        let mut state = State {
            basis_inverse,
            basic_columns,
            status,
            values: vec![F::zero(); n + m],
            artificials: Vec::new(),
        };
        if self.refresh(&mut state) {
            Some(state)
        } else {
            None
        }
    }
}

impl<F: Field> Default for SimplexLp<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Field> LpInterface<F> for SimplexLp<F> {
    fn add_columns(&mut self, columns: Vec<NewColumn<F>>) {
        for NewColumn { objective, lower, upper, mut entries, name } in columns {
            debug_assert!(entries.iter().all(|&(i, _)| i < self.m()));

            entries.retain(|(_, value)| !value.is_zero());
            entries.sort_by_key(|&(i, _)| i);
            self.columns.push(entries);
            self.objective.push(objective);
            self.names.push(name);
            self.column_lower.push(lower);
            self.column_upper.push(upper);
        }
        self.reset();
    }

    fn add_rows(&mut self, rows: Vec<NewRow<F>>) {
        for NewRow { lhs, rhs, entries } in rows {
            let i = self.m();
            for (j, value) in entries {
                debug_assert!(j < self.n());
                if !value.is_zero() {
                    self.columns[j].push((i, value));
                }
            }
            self.row_lhs.push(lhs);
            self.row_rhs.push(rhs);
        }
        self.reset();
    }

    fn change_bounds(&mut self, indices: &[usize], lower: &[Option<F>], upper: &[Option<F>]) {
        debug_assert_eq!(indices.len(), lower.len());
        debug_assert_eq!(indices.len(), upper.len());

        for ((&j, lower), upper) in indices.iter().zip(lower).zip(upper) {
            self.column_lower[j] = lower.clone();
            self.column_upper[j] = upper.clone();
        }
        self.status = LpStatus::NotSolved;
    }

    fn set_objective_limit(&mut self, limit: Option<F>) {
        self.objective_limit = limit;
    }

    fn set_limits(&mut self, limits: SolveLimits) {
        self.limits = limits;
    }

    fn solve_primal(&mut self) -> LpStatus {
        self.solve(false)
    }

    fn solve_dual(&mut self) -> LpStatus {
        self.solve(true)
    }

    fn status(&self) -> LpStatus {
        self.status
    }

    fn solution(&self) -> Option<LpSolution<F>> {
        if self.status != LpStatus::Optimal {
            return None;
        }
        let state = self.state.as_ref()?;
        let (n, m) = (self.n(), self.m());

        let costs = self.phase_two_costs();
        let dual = state.basis_inverse.dual(&Self::basic_costs(state, &costs));
        let reduced_costs = (0..n)
            .map(|j| self.reduced_cost(j, state, &costs, &dual))
            .collect();

        Some(LpSolution {
            objective: self.objective_value(state),
            primal: state.values[..n].to_vec(),
            row_duals: dual,
            reduced_costs,
            row_activities: state.values[n..(n + m)].to_vec(),
        })
    }

    fn basis(&self) -> Basis {
        let n = self.n();
        match &self.state {
            Some(state) if state.artificials.is_empty() => {
                let statuses = state.status.iter()
                    .map(|status| match status {
                        VariableStatus::Basic(_) => BasisStatus::Basic,
                        VariableStatus::AtLower => BasisStatus::Lower,
                        VariableStatus::AtUpper => BasisStatus::Upper,
                        VariableStatus::Free => BasisStatus::Zero,
                    })
                    .collect::<Vec<_>>();
                Basis {
                    columns: statuses[..n].to_vec(),
                    rows: statuses[n..].to_vec(),
                }
            },
            _ => Basis {
                columns: (0..n)
                    .map(|j| match self.nonbasic_position(j, VariableStatus::AtLower).0 {
                        VariableStatus::AtUpper => BasisStatus::Upper,
                        VariableStatus::Free => BasisStatus::Zero,
                        _ => BasisStatus::Lower,
                    })
                    .collect(),
                rows: vec![BasisStatus::Basic; self.m()],
            },
        }
    }

    fn set_basis(&mut self, basis: &Basis) -> Result<(), ExactLpError> {
        if basis.columns.len() != self.n() {
            return Err(ExactLpError::Dimension {
                what: "basis columns",
                expected: self.n(),
                actual: basis.columns.len(),
            });
        }
        if basis.rows.len() != self.m() {
            return Err(ExactLpError::Dimension {
                what: "basis rows",
                expected: self.m(),
                actual: basis.rows.len(),
            });
        }

        // A basis that can't be factorized is dropped, the next solve then starts from scratch
        self.state = self.state_from_basis(basis);
        self.status = LpStatus::NotSolved;

        Ok(())
    }

    fn basis_dual_bound(&mut self) -> Option<F> {
        let mut state = self.state.take()?;
        let bound = if self.refresh(&mut state) {
            let costs = self.phase_two_costs();
            let dual = state.basis_inverse.dual(&Self::basic_costs(&state, &costs));

            let mut bound = Some(F::zero());
            for k in 0..(self.n() + self.m()) {
                if matches!(state.status[k], VariableStatus::Basic(_)) {
                    continue;
                }
                let reduced_cost = self.reduced_cost(k, &state, &costs, &dual);
                let at = if reduced_cost.is_significantly_positive() {
                    self.lower(k)
                } else if reduced_cost.is_significantly_negative() {
                    self.upper(k)
                } else {
                    continue;
                };
                bound = match (bound, at) {
                    (Some(total), Some(value)) => Some(total + reduced_cost * value),
                    _ => None,
                };
            }
            bound
        } else {
            None
        };
        self.state = Some(state);

        bound
    }

    fn iteration_count(&self) -> u64 {
        self.iteration_count
    }

    fn nr_columns(&self) -> usize {
        self.n()
    }

    fn nr_rows(&self) -> usize {
        self.m()
    }
}
