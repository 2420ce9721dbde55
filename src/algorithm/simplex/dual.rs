//! # Dual simplex
//!
//! Bounded dual simplex method, used when a dual feasible basis is available. That is the case
//! after bounds were tightened at an optimal basis, or when a basis found in floating point is
//! loaded into the exact problem.
use crate::algorithm::simplex::{Budget, SimplexLp, State, VariableStatus};
use crate::data::number_types::traits::Field;
use crate::lp_interface::LpStatus;

impl<F: Field> SimplexLp<F> {
    /// Restore primal feasibility while keeping dual feasibility.
    ///
    /// The objective value of the basic solution never decreases, which allows stopping as soon
    /// as it reaches the objective limit.
    ///
    /// # Return value
    ///
    /// `Optimal`, `Infeasible`, `ObjectiveLimit` or the limit that was reached.
    pub(super) fn dual(&self, state: &mut State<F>, costs: &[F], budget: &mut Budget) -> LpStatus {
        loop {
            if self.limit_reached(state) {
                break LpStatus::ObjectiveLimit;
            }
            let Some((r, target, leaving_status)) = self.select_dual_pivot_row(state) else {
                break LpStatus::Optimal;
            };
            if let Some(status) = budget.exceeded() {
                break status;
            }

            let dual = state.basis_inverse.dual(&Self::basic_costs(state, costs));
            let Some(k) = self.select_dual_pivot_column(state, costs, &dual, r, leaving_status) else {
                break LpStatus::Infeasible;
            };

            let column = state.basis_inverse.left_multiply(self.column(k, &state.artificials));
            let leaving = state.basic_columns[r];
            let step = (state.values[leaving].clone() - &target) / &column[r];

            state.values[k] += step.clone();
            for (s, alpha) in column.iter().enumerate() {
                if !alpha.is_zero() {
                    let basic = state.basic_columns[s];
                    state.values[basic] -= step.clone() * alpha;
                }
            }
            state.values[leaving] = target;
            self.pivot(state, r, k, &column, leaving_status);

            budget.iterations += 1;
        }
    }

    /// The infeasible basic variable with the lowest index.
    ///
    /// # Return value
    ///
    /// Row position, the bound the variable should move to and the status it will have there.
    fn select_dual_pivot_row(&self, state: &State<F>) -> Option<(usize, F, VariableStatus)> {
        state.basic_columns.iter()
            .enumerate()
            .filter_map(|(r, &k)| {
                self.bound_violation(k, &state.values[k]).map(|(bound, status)| (k, r, bound, status))
            })
            .min_by_key(|&(k, ..)| k)
            .map(|(_, r, bound, status)| (r, bound, status))
    }

    /// Dual ratio test, ties are broken in favor of the lowest index.
    fn select_dual_pivot_column(
        &self,
        state: &State<F>,
        costs: &[F],
        dual: &[F],
        r: usize,
        leaving_status: VariableStatus,
    ) -> Option<usize> {
        let row = state.basis_inverse.row(r);
        // Whether the leaving variable needs to increase to reach its bound
        let increase_basic = leaving_status == VariableStatus::AtLower;

        let mut best: Option<(F, usize)> = None;
        for k in 0..state.status.len() {
            if matches!(state.status[k], VariableStatus::Basic(_)) || self.is_fixed(k) {
                continue;
            }
            let alpha = self.column(k, &state.artificials).inner_product(row);
            if alpha.is_significantly_zero() {
                continue;
            }

            // The basic variable changes by -alpha times the change of the entering variable
            let eligible = match state.status[k] {
                VariableStatus::AtLower => alpha.is_significantly_negative() == increase_basic,
                VariableStatus::AtUpper => alpha.is_significantly_positive() == increase_basic,
                VariableStatus::Free => true,
                VariableStatus::Basic(_) => false,
            };
            if !eligible {
                continue;
            }

            let ratio = self.reduced_cost(k, state, costs, dual).magnitude() / alpha.magnitude();
            if best.as_ref().is_none_or(|(best_ratio, _)| &ratio < best_ratio) {
                best = Some((ratio, k));
            }
        }

        best.map(|(_, k)| k)
    }
}
