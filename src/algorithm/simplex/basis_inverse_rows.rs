//! # Basis inverse rows
//!
//! Explicit dense row-major representation of the basis inverse B^-1. The inverse of a sparse
//! matrix is not generally sparse, so this is not a scalable algorithm. It is however simple, and
//! exact when used with rational numbers, which is what the problems solved here need.
use std::fmt;

use crate::algorithm::simplex::ColumnRef;
use crate::data::number_types::traits::Field;

/// Explicit row-major dense representation of the basis inverse.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct BasisInverseRows<F> {
    rows: Vec<Vec<F>>,
}

impl<F: Field> BasisInverseRows<F> {
    /// Inverse of a diagonal matrix.
    ///
    /// # Arguments
    ///
    /// * `diagonal`: Nonzero diagonal values of the basis matrix.
    #[must_use]
    pub fn diagonal(diagonal: &[F]) -> Self {
        let m = diagonal.len();
        let rows = diagonal.iter()
            .enumerate()
            .map(|(i, value)| {
                debug_assert!(!value.is_significantly_zero());

                let mut row = vec![F::zero(); m];
                row[i] = F::one() / value;
                row
            })
            .collect();

        Self { rows }
    }

    /// Invert a basis matrix using Gauss-Jordan elimination with partial pivoting.
    ///
    /// # Arguments
    ///
    /// * `columns`: The basis columns, as many as there are rows.
    ///
    /// # Return value
    ///
    /// `None` if the matrix is singular.
    #[must_use]
    pub fn invert(columns: &[ColumnRef<'_, F>]) -> Option<Self> {
        let m = columns.len();

        // Dense copy of the basis matrix, row-major
        let mut matrix = vec![vec![F::zero(); m]; m];
        for (j, column) in columns.iter().enumerate() {
            column.for_each(|i, value| matrix[i][j] = value.clone());
        }
        let mut inverse = (0..m)
            .map(|i| {
                let mut row = vec![F::zero(); m];
                row[i] = F::one();
                row
            })
            .collect::<Vec<_>>();

        for k in 0..m {
            let pivot_row = (k..m)
                .filter(|&i| !matrix[i][k].is_significantly_zero())
                .max_by(|&i, &l| {
                    matrix[i][k].magnitude().partial_cmp(&matrix[l][k].magnitude())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })?;
            matrix.swap(k, pivot_row);
            inverse.swap(k, pivot_row);

            let pivot_value = matrix[k][k].clone();
            for value in &mut matrix[k] {
                *value = value.clone() / &pivot_value;
            }
            for value in &mut inverse[k] {
                *value = value.clone() / &pivot_value;
            }

            for i in (0..m).filter(|&i| i != k) {
                let factor = matrix[i][k].clone();
                if factor.is_zero() {
                    continue;
                }
                for j in 0..m {
                    let subtract = factor.clone() * &matrix[k][j];
                    matrix[i][j] -= subtract;
                    let subtract = factor.clone() * &inverse[k][j];
                    inverse[i][j] -= subtract;
                }
            }
        }

        Some(Self { rows: inverse })
    }

    /// Compute `B^-1 a` for a column `a`.
    #[must_use]
    pub fn left_multiply(&self, column: ColumnRef<'_, F>) -> Vec<F> {
        self.rows.iter().map(|row| column.inner_product(row)).collect()
    }

    /// Compute `c_B^T B^-1`, the dual values of the rows.
    ///
    /// # Arguments
    ///
    /// * `basic_costs`: Cost of the basic variable at each row position.
    #[must_use]
    pub fn dual(&self, basic_costs: &[F]) -> Vec<F> {
        debug_assert_eq!(basic_costs.len(), self.m());

        let mut dual = vec![F::zero(); self.m()];
        for (cost, row) in basic_costs.iter().zip(&self.rows) {
            if cost.is_zero() {
                continue;
            }
            for (total, value) in dual.iter_mut().zip(row) {
                *total += cost.clone() * value;
            }
        }

        dual
    }

    /// Row `i` of the basis inverse.
    #[must_use]
    pub fn row(&self, i: usize) -> &[F] {
        &self.rows[i]
    }

    /// Normalize the pivot row and row reduce the other basis inverse rows.
    ///
    /// # Arguments
    ///
    /// * `pivot_row_index`: Index of the pivot row.
    /// * `column`: Column relative to the current basis to be entered into that basis, that is,
    /// `B^-1 a`.
    pub fn change_basis(&mut self, pivot_row_index: usize, column: &[F]) {
        debug_assert!(pivot_row_index < self.m());
        debug_assert_eq!(column.len(), self.m());
        debug_assert!(!column[pivot_row_index].is_significantly_zero());

        // The order matters: the pivot row is normalized first
        let pivot_value = &column[pivot_row_index];
        for value in &mut self.rows[pivot_row_index] {
            *value = value.clone() / pivot_value;
        }

        let (rows_left, rows_right) = self.rows.split_at_mut(pivot_row_index);
        let (pivot_row, rows_right) = rows_right.split_first_mut()
            .expect("the pivot row index is in range");
        for (edit_row_index, factor) in column.iter().enumerate() {
            if edit_row_index == pivot_row_index || factor.is_zero() {
                continue;
            }
            let edit_row = if edit_row_index < pivot_row_index {
                &mut rows_left[edit_row_index]
            } else {
                &mut rows_right[edit_row_index - (pivot_row_index + 1)]
            };
            for (value, pivot) in edit_row.iter_mut().zip(pivot_row.iter()) {
                *value -= factor.clone() * pivot;
            }
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn m(&self) -> usize {
        self.rows.len()
    }
}

impl<F: Field> fmt::Display for BasisInverseRows<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let texts = row.iter().map(ToString::to_string).collect::<Vec<_>>();
            writeln!(f, "{}", texts.join("\t"))?;
        }

        Ok(())
    }
}
