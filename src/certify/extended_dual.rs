//! # Extended dual
//!
//! The dual of `min c^T x` subject to `lhs <= A x <= rhs` and `lb <= x <= ub` has a nonnegative
//! variable for every finite side and bound:
//!
//! ```text
//! max lhs^T y_lhs - rhs^T y_rhs + lb^T y_lb - ub^T y_ub
//! s.t. A^T y_lhs - A^T y_rhs + y_lb - y_ub = c
//!      y >= 0
//! ```
//!
//! The constraint matrix `D = [A^T, -A^T, I, -I]` has one row per variable. Components whose side
//! or bound is infinite have no cost and must be zero for the dual objective to be a bound.
use enum_map::{Enum, EnumMap};
use num_traits::Zero;

use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_program::exact_problem::{ExactProblem, NodeBounds};
use crate::data::linear_program::solution::LpRelaxation;
use crate::data::number_types::rational::Rational;

/// The four blocks of the extended dual vector.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Enum)]
pub enum DualBlock {
    /// Dual of the left hand sides of the rows.
    RowLhs,
    /// Dual of the right hand sides of the rows.
    RowRhs,
    /// Dual of the lower bounds of the variables.
    VariableLower,
    /// Dual of the upper bounds of the variables.
    VariableUpper,
}

/// Layout and columns of the extended dual of a problem.
#[derive(Clone, Debug)]
pub struct ExtendedDual {
    nr_rows: usize,
    nr_variables: usize,
    offsets: EnumMap<DualBlock, usize>,
    /// Column of `D` of each component, indexed by variable.
    columns: Vec<Vec<SparseTuple<Rational>>>,
}

impl ExtendedDual {
    /// Layout the extended dual of a problem.
    #[must_use]
    pub fn new(problem: &ExactProblem) -> Self {
        let (nr_rows, nr_variables) = (problem.nr_rows(), problem.nr_variables());
        let offsets = EnumMap::from_array([
            0,
            nr_rows,
            2 * nr_rows,
            2 * nr_rows + nr_variables,
        ]);

        let matrix = problem.matrix();
        let rows = (0..nr_rows)
            .map(|i| matrix.row(i)
                .filter(|(_, value)| !value.is_zero())
                .map(|(j, value)| (j, value.clone()))
                .collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let negated_rows = rows.iter()
            .map(|row| row.iter().map(|(j, value)| (*j, -value)).collect())
            .collect::<Vec<_>>();
        let columns = rows.into_iter()
            .chain(negated_rows)
            .chain((0..nr_variables).map(|j| vec![(j, Rational::from(1))]))
            .chain((0..nr_variables).map(|j| vec![(j, Rational::from(-1))]))
            .collect();

        Self { nr_rows, nr_variables, offsets, columns }
    }

    /// Number of components, `2 * (nr_rows + nr_variables)`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether there are no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of rows of `D`, one per variable.
    #[must_use]
    pub fn nr_variables(&self) -> usize {
        self.nr_variables
    }

    /// Index of a component.
    ///
    /// # Arguments
    ///
    /// * `block`: Block the component is in.
    /// * `k`: Row index for the row blocks, variable index for the bound blocks.
    #[must_use]
    pub fn index(&self, block: DualBlock, k: usize) -> usize {
        debug_assert!(k < match block {
            DualBlock::RowLhs | DualBlock::RowRhs => self.nr_rows,
            DualBlock::VariableLower | DualBlock::VariableUpper => self.nr_variables,
        });

        self.offsets[block] + k
    }

    /// Block and index within the block of a component.
    #[must_use]
    pub fn block(&self, index: usize) -> (DualBlock, usize) {
        debug_assert!(index < self.len());

        let block = [DualBlock::VariableUpper, DualBlock::VariableLower, DualBlock::RowRhs, DualBlock::RowLhs]
            .into_iter()
            .find(|&block| self.offsets[block] <= index)
            .unwrap_or(DualBlock::RowLhs);

        (block, index - self.offsets[block])
    }

    /// Index of the component for the opposite side of the same row or variable.
    #[must_use]
    pub fn complement(&self, index: usize) -> usize {
        let (block, k) = self.block(index);
        let opposite = match block {
            DualBlock::RowLhs => DualBlock::RowRhs,
            DualBlock::RowRhs => DualBlock::RowLhs,
            DualBlock::VariableLower => DualBlock::VariableUpper,
            DualBlock::VariableUpper => DualBlock::VariableLower,
        };

        self.index(opposite, k)
    }

    /// Column of `D` for a component.
    #[must_use]
    pub fn column(&self, index: usize) -> &[SparseTuple<Rational>] {
        &self.columns[index]
    }

    /// Objective coefficient of every component at a node, `None` where the side or bound is
    /// infinite.
    #[must_use]
    pub fn costs(&self, problem: &ExactProblem, bounds: &NodeBounds) -> Vec<Option<Rational>> {
        let infinity = problem.infinity();
        let finite = |value: &Rational| infinity.finite(value).cloned();

        let mut costs = Vec::with_capacity(self.len());
        costs.extend((0..self.nr_rows).map(|i| finite(&problem.row(i).lhs)));
        costs.extend((0..self.nr_rows).map(|i| finite(&problem.row(i).rhs).map(|rhs| -rhs)));
        costs.extend((0..self.nr_variables).map(|j| finite(bounds.lower(j))));
        costs.extend((0..self.nr_variables).map(|j| finite(bounds.upper(j)).map(|upper| -upper)));

        costs
    }

    /// Approximate dual solution of the relaxation as an extended dual vector.
    ///
    /// Positive row duals belong to the left hand side, negative ones to the right hand side, and
    /// likewise for the reduced costs and the bounds. Components without cost are set to zero.
    #[must_use]
    pub fn from_relaxation(&self, relaxation: &LpRelaxation, costs: &[Option<Rational>]) -> Vec<Rational> {
        debug_assert_eq!(relaxation.row_duals.len(), self.nr_rows);
        debug_assert_eq!(relaxation.reduced_costs.len(), self.nr_variables);

        let mut y = vec![Rational::zero(); self.len()];
        let pairs = [
            (DualBlock::RowLhs, DualBlock::RowRhs, &relaxation.row_duals),
            (DualBlock::VariableLower, DualBlock::VariableUpper, &relaxation.reduced_costs),
        ];
        for (positive_block, negative_block, values) in pairs {
            for (k, &value) in values.iter().enumerate() {
                let Some(exact) = Rational::from_f64(value) else {
                    continue;
                };
                let index = if exact.is_positive() {
                    self.index(positive_block, k)
                } else if exact.is_negative() {
                    self.index(negative_block, k)
                } else {
                    continue;
                };
                if costs[index].is_some() {
                    y[index] = exact.abs();
                }
            }
        }

        y
    }

    /// Compute `D y`.
    #[must_use]
    pub fn multiply(&self, y: &[Rational]) -> Vec<Rational> {
        debug_assert_eq!(y.len(), self.len());

        let mut result = vec![Rational::zero(); self.nr_variables];
        for (column, value) in self.columns.iter().zip(y) {
            if value.is_zero() {
                continue;
            }
            for (j, coefficient) in column {
                result[*j] += coefficient * value;
            }
        }

        result
    }

    /// Violation of the equality constraints, `c - D y`.
    #[must_use]
    pub fn residual(&self, problem: &ExactProblem, y: &[Rational]) -> Vec<Rational> {
        self.multiply(y)
            .into_iter()
            .enumerate()
            .map(|(j, value)| problem.objective(j) - value)
            .collect()
    }

    /// Whether `D y = c` and `y >= 0` hold exactly.
    #[must_use]
    pub fn is_feasible(&self, problem: &ExactProblem, y: &[Rational]) -> bool {
        !y.iter().any(Rational::is_negative)
            && self.residual(problem, y).iter().all(Rational::is_zero)
    }

    /// Dual objective value of a nonnegative vector.
    ///
    /// # Return value
    ///
    /// `None` if a positive component has no cost: the objective is then unbounded from below.
    #[must_use]
    pub fn objective(&self, y: &[Rational], costs: &[Option<Rational>]) -> Option<Rational> {
        debug_assert_eq!(y.len(), costs.len());

        let mut total = Rational::zero();
        for (value, cost) in y.iter().zip(costs) {
            if value.is_zero() {
                continue;
            }
            total += cost.as_ref()? * value;
        }

        Some(total)
    }

    /// Subtract the common part of the dual values of both sides of each row and variable.
    ///
    /// This leaves `D y` unchanged and doesn't decrease the objective, because the sides of a row
    /// or variable don't cross.
    pub fn reduce_complementary(&self, y: &mut [Rational]) {
        for (first, second) in [
            (DualBlock::RowLhs, DualBlock::RowRhs),
            (DualBlock::VariableLower, DualBlock::VariableUpper),
        ] {
            let count = match first {
                DualBlock::RowLhs => self.nr_rows,
                _ => self.nr_variables,
            };
            for k in 0..count {
                let (i, l) = (self.index(first, k), self.index(second, k));
                if y[i].is_positive() && y[l].is_positive() {
                    let common = (&y[i]).min(&y[l]).clone();
                    y[i] -= &common;
                    y[l] -= &common;
                }
            }
        }
    }
}
