//! # Rational matrix
//!
//! Sparse row-major storage of the exact constraint matrix. The layout with begin, length, index
//! and value arrays allows rows to be stored out of order and with gaps, which is how the matrix is
//! usually produced by a problem reader.
use std::fmt;

use num_traits::Zero;

use crate::data::linear_algebra::SparseTuple;
use crate::data::number_types::rational::Rational;
use crate::error::ExactLpError;

/// Row-major sparse matrix of rationals.
///
/// Values may contain explicit zeros.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RationalMatrix {
    nr_columns: usize,
    /// Start index of each row in `column_indices` and `values`; one extra entry at the end.
    row_begin: Vec<usize>,
    /// Number of entries in each row.
    row_length: Vec<usize>,
    column_indices: Vec<usize>,
    values: Vec<Rational>,
}

impl RationalMatrix {
    /// Create a new matrix from the raw arrays.
    ///
    /// # Arguments
    ///
    /// * `nr_columns`: Number of columns.
    /// * `row_begin`: Start of each row, of length `nr_rows + 1`.
    /// * `row_length`: Number of entries in each row, of length `nr_rows`.
    /// * `column_indices`: Column of each entry.
    /// * `values`: Value of each entry.
    ///
    /// # Errors
    ///
    /// If the array lengths are inconsistent or an index is out of bounds.
    pub fn new(
        nr_columns: usize,
        row_begin: Vec<usize>,
        row_length: Vec<usize>,
        column_indices: Vec<usize>,
        values: Vec<Rational>,
    ) -> Result<Self, ExactLpError> {
        if row_begin.len() != row_length.len() + 1 {
            return Err(ExactLpError::Dimension {
                what: "row begin array",
                expected: row_length.len() + 1,
                actual: row_begin.len(),
            });
        }
        if column_indices.len() != values.len() {
            return Err(ExactLpError::Dimension {
                what: "matrix values",
                expected: column_indices.len(),
                actual: values.len(),
            });
        }
        for (&begin, &length) in row_begin.iter().zip(&row_length) {
            if begin + length > column_indices.len() {
                return Err(ExactLpError::Dimension {
                    what: "matrix row extent",
                    expected: column_indices.len(),
                    actual: begin + length,
                });
            }
        }
        if let Some(&j) = column_indices.iter().find(|&&j| j >= nr_columns) {
            return Err(ExactLpError::Dimension {
                what: "matrix column index",
                expected: nr_columns,
                actual: j,
            });
        }

        Ok(Self { nr_columns, row_begin, row_length, column_indices, values })
    }

    /// Create a matrix from sparse rows.
    ///
    /// # Arguments
    ///
    /// * `nr_columns`: Number of columns.
    /// * `rows`: Tuples of column index and value for each row.
    ///
    /// # Errors
    ///
    /// If a column index is out of bounds.
    pub fn from_rows(
        nr_columns: usize,
        rows: Vec<Vec<SparseTuple<Rational>>>,
    ) -> Result<Self, ExactLpError> {
        let mut row_begin = Vec::with_capacity(rows.len() + 1);
        let mut row_length = Vec::with_capacity(rows.len());
        let mut column_indices = Vec::new();
        let mut values = Vec::new();

        for row in rows {
            row_begin.push(column_indices.len());
            row_length.push(row.len());
            for (j, value) in row {
                column_indices.push(j);
                values.push(value);
            }
        }
        row_begin.push(column_indices.len());

        Self::new(nr_columns, row_begin, row_length, column_indices, values)
    }

    /// Iterate over the stored entries of row `i`.
    pub fn row(&self, i: usize) -> impl Iterator<Item=(usize, &Rational)> + Clone + '_ {
        debug_assert!(i < self.nr_rows());

        let range = self.row_begin[i]..(self.row_begin[i] + self.row_length[i]);
        self.column_indices[range.clone()].iter().copied().zip(&self.values[range])
    }

    /// Column-major copy without explicit zeros.
    ///
    /// # Return value
    ///
    /// For each column, the row indices and values in increasing row order.
    #[must_use]
    pub fn columns(&self) -> Vec<Vec<SparseTuple<Rational>>> {
        let mut columns = vec![Vec::new(); self.nr_columns];
        for i in 0..self.nr_rows() {
            for (j, value) in self.row(i) {
                if !value.is_zero() {
                    columns[j].push((i, value.clone()));
                }
            }
        }

        columns
    }

    /// Compute the row activities `Ax`.
    #[must_use]
    pub fn multiply(&self, x: &[Rational]) -> Vec<Rational> {
        debug_assert_eq!(x.len(), self.nr_columns);

        (0..self.nr_rows())
            .map(|i| self.row(i)
                .filter(|(_, value)| !value.is_zero())
                .map(|(j, value)| value * &x[j])
                .sum())
            .collect()
    }

    /// Compute `A^T y`.
    #[must_use]
    pub fn transpose_multiply(&self, y: &[Rational]) -> Vec<Rational> {
        debug_assert_eq!(y.len(), self.nr_rows());

        let mut result = vec![Rational::zero(); self.nr_columns];
        for (i, multiplier) in y.iter().enumerate() {
            if multiplier.is_zero() {
                continue;
            }
            for (j, value) in self.row(i) {
                result[j] += value * multiplier;
            }
        }

        result
    }

    /// Number of rows.
    #[must_use]
    pub fn nr_rows(&self) -> usize {
        self.row_length.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn nr_columns(&self) -> usize {
        self.nr_columns
    }

    /// Number of stored entries, explicit zeros included.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.row_length.iter().sum()
    }

    /// All stored values, in storage order.
    pub fn values(&self) -> impl Iterator<Item=&Rational> {
        (0..self.nr_rows()).flat_map(move |i| self.row(i).map(|(_, value)| value))
    }
}

impl fmt::Display for RationalMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.nr_rows() {
            let mut dense = vec![Rational::zero(); self.nr_columns];
            for (j, value) in self.row(i) {
                dense[j] = value.clone();
            }
            let texts = dense.iter().map(ToString::to_string).collect::<Vec<_>>();
            writeln!(f, "{}", texts.join("\t"))?;
        }

        Ok(())
    }
}
