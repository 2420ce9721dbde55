//! # LU decomposition
//!
//! Factorization of a matrix `D` with `m` rows and at least `m` columns of full row rank. Gaussian
//! elimination selects `m` pivot columns using Markowitz's rule, which limits fill-in. Solving
//! `D z = r` then yields the unique solution that is zero outside the pivot columns.
//!
//! The elimination is done in exact arithmetic, so a value is zero if and only if it is exactly
//! zero and rank deficiency is detected reliably.
use std::cmp::Ordering;

use itertools::{EitherOrBoth, Itertools};
use num_traits::Zero;

use crate::data::linear_algebra::SparseTuple;
use crate::data::number_types::rational::Rational;


/// Row operations and upper triangular rows that together represent `P D Q = L U`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LUDecomposition {
    nr_rows: usize,
    nr_columns: usize,
    /// Row, column and value of each pivot, in the order in which they were chosen.
    pivots: Vec<(usize, usize, Rational)>,
    /// Operations `row[target] -= ratio * row[source]`, in the order in which they were applied.
    eliminations: Vec<(usize, usize, Rational)>,
    /// Each row as it was when it was pivoted on, sorted by column.
    upper_rows: Vec<Vec<SparseTuple<Rational>>>,
}

impl LUDecomposition {
    /// Compute the factorization.
    ///
    /// # Arguments
    ///
    /// * `nr_rows`: Number of rows `m` of the matrix.
    /// * `columns`: Column major representation of the matrix, with row indices below `nr_rows`.
    ///
    /// # Return value
    ///
    /// `None` if the matrix doesn't have rank `m`.
    #[must_use]
    pub fn decompose(nr_rows: usize, columns: &[Vec<SparseTuple<Rational>>]) -> Option<Self> {
        let nr_columns = columns.len();
        if nr_columns < nr_rows {
            return None;
        }

        // Columns are visited in increasing order, so the rows come out sorted
        let mut rows = vec![Vec::new(); nr_rows];
        for (j, column) in columns.iter().enumerate() {
            for (i, value) in column {
                debug_assert!(*i < nr_rows);
                if !value.is_zero() {
                    rows[*i].push((j, value.clone()));
                }
            }
        }

        let mut row_active = vec![true; nr_rows];
        let mut column_active = vec![true; nr_columns];
        let mut pivots = Vec::with_capacity(nr_rows);
        let mut eliminations = Vec::new();
        for _ in 0..nr_rows {
            let (pivot_row, pivot_column, pivot_value) = choose_pivot(&rows, &row_active, &column_active)?;
            row_active[pivot_row] = false;
            column_active[pivot_column] = false;

            let current_row = rows[pivot_row].clone();
            for (i, row) in rows.iter_mut().enumerate() {
                if !row_active[i] {
                    continue;
                }
                let Ok(data_index) = row.binary_search_by_key(&pivot_column, |&(j, _)| j) else {
                    continue;
                };
                let ratio = &row[data_index].1 / &pivot_value;
                subtract_multiple_of_row_from_other_row(row, &ratio, &current_row);
                debug_assert!(row.binary_search_by_key(&pivot_column, |&(j, _)| j).is_err());
                eliminations.push((i, pivot_row, ratio));
            }

            pivots.push((pivot_row, pivot_column, pivot_value));
        }

        Some(Self { nr_rows, nr_columns, pivots, eliminations, upper_rows: rows })
    }

    /// Solve `D z = r`.
    ///
    /// # Arguments
    ///
    /// * `right_hand_side`: `r`, one value per row.
    ///
    /// # Return value
    ///
    /// `z`, one value per column, zero outside the pivot columns.
    #[must_use]
    pub fn solve(&self, right_hand_side: &[Rational]) -> Vec<Rational> {
        debug_assert_eq!(right_hand_side.len(), self.nr_rows);

        // Forward: apply the row operations of L^-1
        let mut reduced = right_hand_side.to_vec();
        for (target, source, ratio) in &self.eliminations {
            if !reduced[*source].is_zero() {
                let subtract = ratio * &reduced[*source];
                reduced[*target] -= subtract;
            }
        }

        // Backward: the rows pivoted on last only involve columns pivoted on last
        let mut solution = vec![Rational::zero(); self.nr_columns];
        for (i, j, pivot_value) in self.pivots.iter().rev() {
            let mut total = reduced[*i].clone();
            for (column, value) in &self.upper_rows[*i] {
                if column != j && !solution[*column].is_zero() {
                    total -= value * &solution[*column];
                }
            }
            solution[*j] = total / pivot_value;
        }

        solution
    }

    /// Number of rows `m`.
    #[must_use]
    pub fn nr_rows(&self) -> usize {
        self.nr_rows
    }

    /// Number of columns.
    #[must_use]
    pub fn nr_columns(&self) -> usize {
        self.nr_columns
    }

    /// Number of nonzeros in the upper triangular factor.
    #[must_use]
    pub fn nnz_upper(&self) -> usize {
        self.upper_rows.iter().map(Vec::len).sum()
    }
}

/// Markowitz's pivot rule: minimize `(nnz(row) - 1) * (nnz(column) - 1)` over the nonzeros in the
/// part of the matrix that remains to be decomposed.
///
/// Ties are broken by the lowest row and then the lowest column index.
///
/// TODO(PERFORMANCE): The counts are recomputed for every pivot, maintain them incrementally.
fn choose_pivot(
    rows: &[Vec<SparseTuple<Rational>>],
    row_active: &[bool],
    column_active: &[bool],
) -> Option<(usize, usize, Rational)> {
    let mut column_counts = vec![0_usize; column_active.len()];
    for (_, row) in rows.iter().enumerate().filter(|&(i, _)| row_active[i]) {
        for &(j, _) in row {
            if column_active[j] {
                column_counts[j] += 1;
            }
        }
    }

    rows.iter()
        .enumerate()
        .filter(|&(i, _)| row_active[i])
        .flat_map(|(i, row)| {
            let row_count = row.iter().filter(|&&(j, _)| column_active[j]).count();
            row.iter()
                .filter(|&&(j, _)| column_active[j])
                .map(move |(j, value)| (i, *j, value, row_count))
        })
        .min_by_key(|&(i, j, _, row_count)| ((row_count - 1) * (column_counts[j] - 1), i, j))
        .map(|(i, j, value, _)| (i, j, value.clone()))
}

/// Compute `to_edit - ratio * being_removed` on sorted sparse rows, dropping cancelled values.
fn subtract_multiple_of_row_from_other_row(
    to_edit: &mut Vec<SparseTuple<Rational>>,
    ratio: &Rational,
    being_removed: &[SparseTuple<Rational>],
) {
    debug_assert!(!ratio.is_zero());

    let old_row = std::mem::take(to_edit);
    let new = old_row.into_iter()
        .merge_join_by(being_removed, |left, right| left.0.cmp(&right.0))
        .filter_map(|pair| match pair {
            EitherOrBoth::Left(old) => Some(old),
            EitherOrBoth::Right((k, value)) => Some((*k, -(ratio * value))),
            EitherOrBoth::Both((j, old_value), (_, value)) => {
                let difference = old_value - ratio * value;
                (!difference.is_zero()).then_some((j, difference))
            },
        })
        .collect::<Vec<_>>();

    debug_assert!(new.windows(2).all(|pair| pair[0].0.cmp(&pair[1].0) == Ordering::Less));
    *to_edit = new;
}
