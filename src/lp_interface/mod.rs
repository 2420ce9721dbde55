//! # LP interface
//!
//! A narrow interface to a linear program solver that is built once and then only receives bound
//! changes. It is implemented by the bounded simplex method of this crate, both in exact and in
//! floating point arithmetic.
use std::time::Duration;

use crate::data::linear_algebra::SparseTuple;
use crate::error::ExactLpError;

pub use exact::{ExactLp, ExactLpOutcome};

mod exact;

/// Status of a linear program after a solve.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LpStatus {
    /// Modified since the last solve, or never solved.
    NotSolved,
    Optimal,
    /// No feasible point exists.
    Infeasible,
    /// A primal ray exists.
    Unbounded,
    /// The objective value is proven to be at least the objective limit.
    ObjectiveLimit,
    IterationLimit,
    TimeLimit,
    /// The solver couldn't come to a conclusion.
    NumericalTrouble,
}

/// Position of a column or a row activity in a basis.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BasisStatus {
    /// Nonbasic at its lower bound.
    Lower,
    /// Nonbasic at its upper bound.
    Upper,
    Basic,
    /// Nonbasic without bounds, at zero.
    Zero,
}

/// Status of every column and row activity.
///
/// A basis is only a combinatorial object: it can be transferred between solvers that work in
/// different arithmetic.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Basis {
    #[allow(missing_docs)]
    pub columns: Vec<BasisStatus>,
    #[allow(missing_docs)]
    pub rows: Vec<BasisStatus>,
}

impl Basis {
    /// Number of basic columns and rows.
    #[must_use]
    pub fn nr_basic(&self) -> usize {
        self.columns.iter()
            .chain(&self.rows)
            .filter(|&&status| status == BasisStatus::Basic)
            .count()
    }
}

/// Limits on the work done in a single solve.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SolveLimits {
    /// Maximum number of pivots.
    pub iterations: Option<u64>,
    /// Maximum wall clock time.
    pub time: Option<Duration>,
}

/// A column to be added, with its entries in existing rows.
#[derive(Clone, Debug, PartialEq)]
pub struct NewColumn<F> {
    /// Cost, for minimization.
    pub objective: F,
    /// `None` if there is no lower bound.
    pub lower: Option<F>,
    /// `None` if there is no upper bound.
    pub upper: Option<F>,
    /// Row index and value, rows must exist already.
    pub entries: Vec<SparseTuple<F>>,
    /// Used in log messages.
    pub name: String,
}

/// A row to be added, with its entries in existing columns.
#[derive(Clone, Debug, PartialEq)]
pub struct NewRow<F> {
    /// `None` if the activity is not bounded from below.
    pub lhs: Option<F>,
    /// `None` if the activity is not bounded from above.
    pub rhs: Option<F>,
    /// Column index and value, columns must exist already.
    pub entries: Vec<SparseTuple<F>>,
}

/// Optimal solution of a linear program.
///
/// Row duals and reduced costs follow the usual convention for minimization: the reduced costs
/// are `c - A^T y`, a positive row dual belongs to the left hand side.
#[derive(Clone, Debug, PartialEq)]
pub struct LpSolution<F> {
    #[allow(missing_docs)]
    pub objective: F,
    /// One value per column.
    pub primal: Vec<F>,
    /// One value per row.
    pub row_duals: Vec<F>,
    /// One value per column.
    pub reduced_costs: Vec<F>,
    /// `A x`, one value per row.
    pub row_activities: Vec<F>,
}

/// A linear program solver that keeps its problem between solves.
///
/// The problem is always a minimization problem of the form `min c^T x` subject to
/// `lhs <= A x <= rhs` and `lower <= x <= upper`, where each side or bound may be absent.
pub trait LpInterface<F> {
    /// Append columns. Invalidates any basis.
    fn add_columns(&mut self, columns: Vec<NewColumn<F>>);
    /// Append rows. Invalidates any basis.
    fn add_rows(&mut self, rows: Vec<NewRow<F>>);
    /// Replace the bounds of some columns. The basis is kept.
    ///
    /// # Arguments
    ///
    /// * `indices`: Columns to change.
    /// * `lower`: New lower bound for each of the columns.
    /// * `upper`: New upper bound for each of the columns.
    fn change_bounds(&mut self, indices: &[usize], lower: &[Option<F>], upper: &[Option<F>]);
    /// Stop as soon as the objective value is proven to be at least this value.
    fn set_objective_limit(&mut self, limit: Option<F>);
    /// Limits applying to every following solve.
    fn set_limits(&mut self, limits: SolveLimits);

    /// Solve, preferring the primal simplex method.
    fn solve_primal(&mut self) -> LpStatus;
    /// Solve, preferring the dual simplex method when the starting basis is dual feasible.
    fn solve_dual(&mut self) -> LpStatus;
    /// Status of the last solve.
    fn status(&self) -> LpStatus;
    /// Solution of the last solve, if it was optimal.
    fn solution(&self) -> Option<LpSolution<F>>;

    /// Current basis, or a slack basis if there is none.
    fn basis(&self) -> Basis;
    /// Load a basis to start the next solve from.
    ///
    /// # Errors
    ///
    /// If the basis doesn't have the dimensions of the problem.
    fn set_basis(&mut self, basis: &Basis) -> Result<(), ExactLpError>;
    /// Lower bound on the objective value from the current basis, if its dual solution is
    /// feasible. Uses the current bounds.
    fn basis_dual_bound(&mut self) -> Option<F>;

    /// Total number of pivots over all solves.
    fn iteration_count(&self) -> u64;
    #[allow(missing_docs)]
    fn nr_columns(&self) -> usize;
    #[allow(missing_docs)]
    fn nr_rows(&self) -> usize;

    /// Whether the last solve ended with an optimal solution.
    fn is_optimal(&self) -> bool {
        self.status() == LpStatus::Optimal
    }
    /// Whether the last solve proved infeasibility.
    fn is_primal_infeasible(&self) -> bool {
        self.status() == LpStatus::Infeasible
    }
    /// Whether the last solve found a primal ray.
    fn exists_primal_ray(&self) -> bool {
        self.status() == LpStatus::Unbounded
    }
    /// Whether the last solve stopped at the objective limit.
    fn is_objective_limit_exceeded(&self) -> bool {
        self.status() == LpStatus::ObjectiveLimit
    }
    /// Whether the last solve stopped at the iteration limit.
    fn is_iteration_limit_exceeded(&self) -> bool {
        self.status() == LpStatus::IterationLimit
    }
    /// Whether the last solve stopped at the time limit.
    fn is_time_limit_exceeded(&self) -> bool {
        self.status() == LpStatus::TimeLimit
    }
}
