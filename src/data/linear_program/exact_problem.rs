//! # Exact problem
//!
//! Rational representation of the linear relaxation of a mixed integer program. It is kept next to
//! the floating point relaxation that the search works with and is the reference for everything
//! that is certified.
//!
//! The objective is always stored for minimization. Missing sides and bounds are represented by
//! the infinity sentinels.
use std::cmp::{max, min};

use num_traits::{One, Zero};

use crate::data::linear_algebra::matrix::RationalMatrix;
use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_program::elements::{BoundDirection, ObjectiveSense, VariableType};
use crate::data::number_types::infinity::InfinitySentinels;
use crate::data::number_types::rational::Rational;
use crate::data::number_types::rounding::RoundingMode;
use crate::error::ExactLpError;

/// Decimal exponent from which a finite bound is counted as large.
const LARGE_BOUND_EXPONENT: u32 = 6;

/// A variable as provided when creating a problem.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Variable {
    /// Whether the variable is integral.
    pub variable_type: VariableType,
    /// Objective coefficient in the sense of the problem.
    pub objective: Rational,
    /// Lower bound, possibly the minus infinity sentinel.
    pub lower: Rational,
    /// Upper bound, possibly the plus infinity sentinel.
    pub upper: Rational,
}

/// Sides of a constraint `lhs <= a x <= rhs`, the coefficients live in the shared matrix.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExactRow {
    /// Left hand side, possibly the minus infinity sentinel.
    pub lhs: Rational,
    /// Right hand side, possibly the plus infinity sentinel.
    pub rhs: Rational,
}

/// Objective coefficient and bounds of a single variable.
///
/// The global bounds hold in the entire search tree, the local bounds at the node that was last
/// synchronized. `global_lower <= local_lower` and `local_upper <= global_upper` always hold.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExactBounds {
    /// Objective coefficient, for minimization.
    pub objective: Rational,
    #[allow(missing_docs)]
    pub global_lower: Rational,
    #[allow(missing_docs)]
    pub global_upper: Rational,
    #[allow(missing_docs)]
    pub local_lower: Rational,
    #[allow(missing_docs)]
    pub local_upper: Rational,
}

impl ExactBounds {
    /// Local bound in a direction.
    #[must_use]
    pub fn local(&self, direction: BoundDirection) -> &Rational {
        match direction {
            BoundDirection::Lower => &self.local_lower,
            BoundDirection::Upper => &self.local_upper,
        }
    }
}

/// Properties of the problem that influence which dual bounding method works well.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProblemStatistics {
    /// Variables with at least one infinite bound.
    pub nr_infinite_bounds: usize,
    /// Integer variables with at least one infinite bound.
    pub nr_integer_infinite_bounds: usize,
    /// Variables with a finite bound of absolute value at least `10^6`.
    pub nr_large_bounds: usize,
    /// Matrix entries that are integral, explicit zeros excluded.
    pub nr_integral_nonzeros: usize,
    /// Rows with two finite, different sides.
    pub nr_ranged_rows: usize,
    /// Smallest absolute value of a nonzero matrix entry or finite side.
    pub min_abs_value: Option<Rational>,
    /// Largest absolute value of a nonzero matrix entry or finite side.
    pub max_abs_value: Option<Rational>,
}

impl ProblemStatistics {
    /// Ratio between the largest and smallest absolute value.
    #[must_use]
    pub fn ratio(&self) -> Option<Rational> {
        match (&self.min_abs_value, &self.max_abs_value) {
            (Some(smallest), Some(largest)) => Some(largest / smallest),
            _ => None,
        }
    }

    fn collect(
        variables: &[Variable],
        rows: &[ExactRow],
        matrix: &RationalMatrix,
        infinity: &InfinitySentinels,
    ) -> Self {
        let large = Rational::power_of_ten(LARGE_BOUND_EXPONENT);
        let mut statistics = Self::default();

        for variable in variables {
            let has_infinite = infinity.is_infinite(&variable.lower)
                || infinity.is_infinite(&variable.upper);
            if has_infinite {
                statistics.nr_infinite_bounds += 1;
                if variable.variable_type.is_integral() {
                    statistics.nr_integer_infinite_bounds += 1;
                }
            }
            let has_large = [&variable.lower, &variable.upper].into_iter()
                .filter_map(|bound| infinity.finite(bound))
                .any(|bound| bound.abs() >= large);
            if has_large {
                statistics.nr_large_bounds += 1;
            }
        }

        let mut observe = |value: &Rational| {
            let absolute = value.abs();
            statistics.min_abs_value = Some(match statistics.min_abs_value.take() {
                Some(current) => min(current, absolute.clone()),
                None => absolute.clone(),
            });
            statistics.max_abs_value = Some(match statistics.max_abs_value.take() {
                Some(current) => max(current, absolute),
                None => absolute,
            });
        };
        for value in matrix.values().filter(|value| !value.is_zero()) {
            observe(value);
        }
        for row in rows {
            for side in [&row.lhs, &row.rhs] {
                if let Some(side) = infinity.finite(side).filter(|side| !side.is_zero()) {
                    observe(side);
                }
            }
        }

        statistics.nr_integral_nonzeros = matrix.values()
            .filter(|value| !value.is_zero() && value.is_integer())
            .count();
        statistics.nr_ranged_rows = rows.iter()
            .filter(|row| !infinity.is_infinite(&row.lhs) && !infinity.is_infinite(&row.rhs))
            .filter(|row| row.lhs != row.rhs)
            .count();

        statistics
    }
}

/// Exact linear relaxation of a mixed integer program.
#[derive(Clone, Debug)]
pub struct ExactProblem {
    sense: ObjectiveSense,
    /// Constant added to the objective, for minimization.
    objective_offset: Rational,
    variable_types: Vec<VariableType>,
    bounds: Vec<ExactBounds>,
    rows: Vec<ExactRow>,
    matrix: RationalMatrix,
    /// Column-major copy of the matrix without explicit zeros.
    columns: Vec<Vec<SparseTuple<Rational>>>,
    infinity: InfinitySentinels,
    statistics: ProblemStatistics,
}

impl ExactProblem {
    /// Create a new problem.
    ///
    /// Values at or beyond the infinity sentinels are replaced by the sentinels, the bounds of
    /// integral variables are rounded inward and a maximization objective is negated.
    ///
    /// # Arguments
    ///
    /// * `sense`: Direction of optimization of the objective given in the variables.
    /// * `objective_offset`: Constant term of the objective.
    /// * `variables`: One per column of the matrix.
    /// * `rows`: One per row of the matrix.
    /// * `matrix`: Constraint coefficients.
    /// * `infinity`: Values representing infinity.
    ///
    /// # Errors
    ///
    /// If the number of variables or rows doesn't match the matrix.
    pub fn new(
        sense: ObjectiveSense,
        objective_offset: Rational,
        variables: Vec<Variable>,
        rows: Vec<ExactRow>,
        matrix: RationalMatrix,
        infinity: InfinitySentinels,
    ) -> Result<Self, ExactLpError> {
        if variables.len() != matrix.nr_columns() {
            return Err(ExactLpError::Dimension {
                what: "variables",
                expected: matrix.nr_columns(),
                actual: variables.len(),
            });
        }
        if rows.len() != matrix.nr_rows() {
            return Err(ExactLpError::Dimension {
                what: "rows",
                expected: matrix.nr_rows(),
                actual: rows.len(),
            });
        }

        let rows = rows.into_iter()
            .map(|ExactRow { lhs, rhs }| ExactRow {
                lhs: infinity.normalize(lhs),
                rhs: infinity.normalize(rhs),
            })
            .collect::<Vec<_>>();
        let variables = variables.into_iter()
            .map(|variable| Self::normalize_variable(variable, &infinity))
            .collect::<Vec<_>>();
        let statistics = ProblemStatistics::collect(&variables, &rows, &matrix, &infinity);

        let negate = sense == ObjectiveSense::Maximize;
        let variable_types = variables.iter().map(|variable| variable.variable_type).collect();
        let bounds = variables.into_iter()
            .map(|Variable { objective, lower, upper, .. }| ExactBounds {
                objective: if negate { -objective } else { objective },
                local_lower: lower.clone(),
                local_upper: upper.clone(),
                global_lower: lower,
                global_upper: upper,
            })
            .collect();
        let objective_offset = if negate { -objective_offset } else { objective_offset };
        let columns = matrix.columns();

        Ok(Self {
            sense,
            objective_offset,
            variable_types,
            bounds,
            rows,
            matrix,
            columns,
            infinity,
            statistics,
        })
    }

    fn normalize_variable(variable: Variable, infinity: &InfinitySentinels) -> Variable {
        let Variable { variable_type, objective, lower, upper } = variable;
        let (mut lower, mut upper) = (infinity.normalize(lower), infinity.normalize(upper));
        if variable_type == VariableType::Binary {
            lower = max(lower, Rational::zero());
            upper = min(upper, Rational::one());
        }
        let lower = round_bound(variable_type, BoundDirection::Lower, lower, infinity);
        let upper = round_bound(variable_type, BoundDirection::Upper, upper, infinity);

        Variable { variable_type, objective, lower, upper }
    }

    /// Round a new bound for a variable in the feasible direction if the variable is integral.
    #[must_use]
    pub fn rounded_bound(&self, variable: usize, direction: BoundDirection, value: Rational) -> Rational {
        let value = self.infinity.normalize(value);
        round_bound(self.variable_types[variable], direction, value, &self.infinity)
    }

    /// Replace a local bound.
    ///
    /// The value is clipped to the global bounds.
    pub(crate) fn set_local_bound(&mut self, variable: usize, direction: BoundDirection, value: Rational) {
        let bounds = &mut self.bounds[variable];
        match direction {
            BoundDirection::Lower => bounds.local_lower = max(value, bounds.global_lower.clone()),
            BoundDirection::Upper => bounds.local_upper = min(value, bounds.global_upper.clone()),
        }
    }

    /// Exact objective value `c^T x` of a point, without the offset.
    #[must_use]
    pub fn objective_value(&self, values: &[Rational]) -> Rational {
        debug_assert_eq!(values.len(), self.nr_variables());

        self.bounds.iter()
            .zip(values)
            .filter(|(bounds, _)| !bounds.objective.is_zero())
            .map(|(bounds, value)| &bounds.objective * value)
            .sum()
    }

    /// Map a value of the internal minimization objective to the objective of the user.
    ///
    /// # Arguments
    ///
    /// * `value`: Internal objective value, without the offset.
    /// * `is_lower_bound`: Whether `value` bounds the internal objective from below, such that the
    /// rounding can be done in the direction that keeps the bound valid.
    ///
    /// # Return value
    ///
    /// A value bounding the user's objective from below for a minimization problem and from above
    /// for a maximization problem if `is_lower_bound` is set; the other way around otherwise.
    #[must_use]
    pub fn safe_external_objective(&self, value: &Rational, is_lower_bound: bool) -> f64 {
        let internal = value + &self.objective_offset;
        let (external, mode) = match (self.sense, is_lower_bound) {
            (ObjectiveSense::Minimize, true) => (internal, RoundingMode::Downward),
            (ObjectiveSense::Minimize, false) => (internal, RoundingMode::Upward),
            (ObjectiveSense::Maximize, true) => (-internal, RoundingMode::Upward),
            (ObjectiveSense::Maximize, false) => (-internal, RoundingMode::Downward),
        };

        external.to_f64(mode)
    }

    /// Floating point value, for the search, of a lower bound on the internal objective.
    ///
    /// The search works with the minimization form, offset included.
    #[must_use]
    pub fn safe_search_bound(&self, value: &Rational) -> f64 {
        (value + &self.objective_offset).to_f64(RoundingMode::Downward)
    }

    /// Internal objective value, without the offset, that corresponds to a value of the search.
    ///
    /// # Return value
    ///
    /// `None` if the value is not finite.
    #[must_use]
    pub fn from_search_objective(&self, value: f64) -> Option<Rational> {
        Rational::from_f64(value).map(|value| value - &self.objective_offset)
    }

    /// Index of a row with `lhs > rhs`, if there is one.
    #[must_use]
    pub fn inconsistent_row(&self) -> Option<usize> {
        self.rows.iter().position(|row| row.lhs > row.rhs)
    }

    /// Number of variables.
    #[must_use]
    pub fn nr_variables(&self) -> usize {
        self.bounds.len()
    }

    /// Number of rows.
    #[must_use]
    pub fn nr_rows(&self) -> usize {
        self.rows.len()
    }

    /// Constraint matrix.
    #[must_use]
    pub fn matrix(&self) -> &RationalMatrix {
        &self.matrix
    }

    /// Nonzero coefficients of a variable, by increasing row index.
    #[must_use]
    pub fn column(&self, variable: usize) -> &[SparseTuple<Rational>] {
        &self.columns[variable]
    }

    /// Sides of a row.
    #[must_use]
    pub fn row(&self, row: usize) -> &ExactRow {
        &self.rows[row]
    }

    /// Objective coefficient and bounds of a variable.
    #[must_use]
    pub fn bounds(&self, variable: usize) -> &ExactBounds {
        &self.bounds[variable]
    }

    /// Objective coefficient of a variable, for minimization.
    #[must_use]
    pub fn objective(&self, variable: usize) -> &Rational {
        &self.bounds[variable].objective
    }

    /// Type of a variable.
    #[must_use]
    pub fn variable_type(&self, variable: usize) -> VariableType {
        self.variable_types[variable]
    }

    /// Values representing infinity.
    #[must_use]
    pub fn infinity(&self) -> &InfinitySentinels {
        &self.infinity
    }

    /// Direction of optimization the problem was created with.
    #[must_use]
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    /// Constant term of the internal minimization objective.
    #[must_use]
    pub fn objective_offset(&self) -> &Rational {
        &self.objective_offset
    }

    /// Properties computed when the problem was created.
    #[must_use]
    pub fn statistics(&self) -> &ProblemStatistics {
        &self.statistics
    }
}

/// Round a bound of an integral variable inward, sentinels are kept.
fn round_bound(
    variable_type: VariableType,
    direction: BoundDirection,
    value: Rational,
    infinity: &InfinitySentinels,
) -> Rational {
    if !variable_type.is_integral() || infinity.is_infinite(&value) {
        return value;
    }

    match direction {
        BoundDirection::Lower => value.ceil(),
        BoundDirection::Upper => value.floor(),
    }
}

/// Variable bounds that hold at the current node.
///
/// These are never looser than the exact local bounds, such that any bound derived from them is
/// valid for the node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodeBounds {
    lower: Vec<Rational>,
    upper: Vec<Rational>,
}

impl NodeBounds {
    /// The exact local bounds.
    #[must_use]
    pub fn local(problem: &ExactProblem) -> Self {
        Self {
            lower: problem.bounds.iter().map(|bounds| bounds.local_lower.clone()).collect(),
            upper: problem.bounds.iter().map(|bounds| bounds.local_upper.clone()).collect(),
        }
    }

    /// The global bounds, valid in the entire tree.
    #[must_use]
    pub fn global(problem: &ExactProblem) -> Self {
        Self {
            lower: problem.bounds.iter().map(|bounds| bounds.global_lower.clone()).collect(),
            upper: problem.bounds.iter().map(|bounds| bounds.global_upper.clone()).collect(),
        }
    }

    /// Intersect with bounds that are known to hold at the node.
    ///
    /// # Arguments
    ///
    /// * `variable`: Index of the variable.
    /// * `lower`: Valid lower bound, possibly a sentinel.
    /// * `upper`: Valid upper bound, possibly a sentinel.
    pub fn intersect(&mut self, variable: usize, lower: Rational, upper: Rational) {
        if lower > self.lower[variable] {
            self.lower[variable] = lower;
        }
        if upper < self.upper[variable] {
            self.upper[variable] = upper;
        }
    }

    /// Lower bound of a variable.
    #[must_use]
    pub fn lower(&self, variable: usize) -> &Rational {
        &self.lower[variable]
    }

    /// Upper bound of a variable.
    #[must_use]
    pub fn upper(&self, variable: usize) -> &Rational {
        &self.upper[variable]
    }

    /// Index of a variable with crossing bounds, if there is one.
    #[must_use]
    pub fn empty_domain(&self) -> Option<usize> {
        self.lower.iter().zip(&self.upper).position(|(lower, upper)| lower > upper)
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Whether there are no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_algebra::matrix::RationalMatrix;
    use crate::data::linear_program::elements::{BoundDirection, ObjectiveSense, VariableType};
    use crate::data::linear_program::exact_problem::{ExactProblem, ExactRow, NodeBounds, Variable};
    use crate::data::number_types::infinity::InfinitySentinels;
    use crate::RQ;

    fn problem(sense: ObjectiveSense) -> ExactProblem {
        let infinity = InfinitySentinels::default();
        let matrix = RationalMatrix::from_rows(2, vec![
            vec![(0, RQ!(1, 3)), (1, RQ!(2))],
        ]).unwrap();
        ExactProblem::new(
            sense,
            RQ!(1),
            vec![
                Variable {
                    variable_type: VariableType::Binary,
                    objective: RQ!(-1),
                    lower: RQ!(-5),
                    upper: RQ!(5),
                },
                Variable {
                    variable_type: VariableType::Integer,
                    objective: RQ!(2),
                    lower: RQ!(1, 2),
                    upper: infinity.positive().clone(),
                },
            ],
            vec![ExactRow { lhs: RQ!(-1e200), rhs: RQ!(10_000_000) }],
            matrix,
            infinity,
        ).unwrap()
    }

    #[test]
    fn normalization() {
        let problem = problem(ObjectiveSense::Minimize);
        assert_eq!(problem.bounds(0).global_lower, RQ!(0));
        assert_eq!(problem.bounds(0).global_upper, RQ!(1));
        assert_eq!(problem.bounds(1).global_lower, RQ!(1));
        assert!(problem.infinity().is_positive_infinity(&problem.bounds(1).local_upper));
        assert!(problem.infinity().is_negative_infinity(&problem.row(0).lhs));
        assert_eq!(problem.inconsistent_row(), None);
    }

    #[test]
    fn statistics() {
        let problem = problem(ObjectiveSense::Minimize);
        let statistics = problem.statistics();
        assert_eq!(statistics.nr_infinite_bounds, 1);
        assert_eq!(statistics.nr_integer_infinite_bounds, 1);
        assert_eq!(statistics.nr_large_bounds, 0);
        assert_eq!(statistics.nr_integral_nonzeros, 1);
        assert_eq!(statistics.nr_ranged_rows, 0);
        assert_eq!(statistics.min_abs_value, Some(RQ!(1, 3)));
        assert_eq!(statistics.max_abs_value, Some(RQ!(10_000_000)));
        assert_eq!(statistics.ratio(), Some(RQ!(30_000_000)));
    }

    #[test]
    fn objective_sense() {
        let minimize = problem(ObjectiveSense::Minimize);
        assert_eq!(minimize.objective_value(&[RQ!(1), RQ!(2)]), RQ!(3));
        assert_eq!(minimize.safe_external_objective(&RQ!(3), true), 4_f64);

        let maximize = problem(ObjectiveSense::Maximize);
        assert_eq!(maximize.objective(0), &RQ!(1));
        assert_eq!(maximize.objective_value(&[RQ!(1), RQ!(2)]), RQ!(-3));
        assert_eq!(maximize.safe_external_objective(&RQ!(-3), true), 4_f64);
        let third = maximize.safe_external_objective(&RQ!(1, 3), true);
        assert!(RQ!(third) >= RQ!(2, 3));
    }

    #[test]
    fn rounding_and_clipping() {
        let mut problem = problem(ObjectiveSense::Minimize);
        let rounded = problem.rounded_bound(0, BoundDirection::Lower, RQ!(3, 10));
        assert_eq!(rounded, RQ!(1));
        assert_eq!(problem.rounded_bound(1, BoundDirection::Upper, RQ!(7, 2)), RQ!(3));

        problem.set_local_bound(0, BoundDirection::Upper, RQ!(4));
        assert_eq!(problem.bounds(0).local_upper, RQ!(1));

        let mut node = NodeBounds::local(&problem);
        node.intersect(1, RQ!(2), RQ!(2));
        assert_eq!(node.lower(1), &RQ!(2));
        assert_eq!(node.empty_domain(), None);
        node.intersect(0, RQ!(1), RQ!(0));
        assert_eq!(node.empty_domain(), Some(0));
    }
}
