//! # Primal simplex
//!
//! Phase one with artificial variables for the rows that are violated at the starting point, and
//! the bounded primal simplex method that is used in both phases.
use crate::algorithm::simplex::{Budget, SimplexLp, State, VariableStatus};
use crate::data::number_types::traits::Field;
use crate::lp_interface::LpStatus;

/// Outcome of the ratio test.
enum Step<F> {
    /// The entering variable moves to its other bound, the basis stays the same.
    Flip(F),
    /// The basic variable at a row position leaves at one of its bounds.
    Pivot {
        row: usize,
        theta: F,
        leaving_status: VariableStatus,
    },
}

impl<F: Field> SimplexLp<F> {
    /// Find a feasible basis without artificial variables.
    ///
    /// # Return value
    ///
    /// `Optimal` if a feasible basis was found, `Infeasible` if there is none, or the reason the
    /// search was stopped.
    pub(super) fn phase_one(&self, state: &mut State<F>, budget: &mut Budget) -> LpStatus {
        if state.artificials.is_empty() {
            return LpStatus::Optimal;
        }

        let first_artificial = self.n() + self.m();
        let costs = (0..state.status.len())
            .map(|k| if k < first_artificial { F::zero() } else { F::one() })
            .collect::<Vec<_>>();
        match self.primal(state, &costs, budget) {
            LpStatus::Optimal => {},
            // The objective is a sum of nonnegative variables
            LpStatus::Unbounded => return LpStatus::NumericalTrouble,
            other => return other,
        }

        let infeasibility = state.values[first_artificial..].iter()
            .fold(F::zero(), |total, value| total + value);
        if infeasibility.is_significantly_positive() {
            return LpStatus::Infeasible;
        }

        self.remove_artificials(state)
    }

    /// Pivot the remaining artificial variables, all at zero, out of the basis and drop them.
    ///
    /// The slack columns span the row space, so a replacement is always found in exact arithmetic.
    fn remove_artificials(&self, state: &mut State<F>) -> LpStatus {
        let first_artificial = self.n() + self.m();

        for r in 0..self.m() {
            if state.basic_columns[r] < first_artificial {
                continue;
            }

            let row = state.basis_inverse.row(r).to_vec();
            let entering = (0..first_artificial)
                .filter(|&k| !matches!(state.status[k], VariableStatus::Basic(_)))
                .map(|k| (k, self.column(k, &state.artificials).inner_product(&row)))
                .filter(|(_, value)| !value.is_significantly_zero())
                .max_by(|(_, left), (_, right)| {
                    left.magnitude().partial_cmp(&right.magnitude())
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            let Some((k, _)) = entering else {
                return LpStatus::NumericalTrouble;
            };

            let column = state.basis_inverse.left_multiply(self.column(k, &state.artificials));
            self.pivot(state, r, k, &column, VariableStatus::AtLower);
        }

        state.status.truncate(first_artificial);
        state.values.truncate(first_artificial);
        state.artificials.clear();
        self.recompute_basic_values(state);

        LpStatus::Optimal
    }

    /// Minimize the costs starting from a primal feasible basis.
    ///
    /// # Arguments
    ///
    /// * `costs`: Cost of every variable in the state, artificial variables included.
    ///
    /// # Return value
    ///
    /// `Optimal`, `Unbounded` or the limit that was reached.
    pub(super) fn primal(&self, state: &mut State<F>, costs: &[F], budget: &mut Budget) -> LpStatus {
        loop {
            let dual = state.basis_inverse.dual(&Self::basic_costs(state, costs));
            let Some((k, increase)) = self.select_primal_pivot_column(state, costs, &dual) else {
                break LpStatus::Optimal;
            };
            if let Some(status) = budget.exceeded() {
                break status;
            }

            let column = state.basis_inverse.left_multiply(self.column(k, &state.artificials));
            match self.select_primal_pivot_row(state, k, increase, &column) {
                Some(step) => self.primal_step(state, k, increase, &column, step),
                None => break LpStatus::Unbounded,
            }
            budget.iterations += 1;
        }
    }

    /// Bland's rule: the nonbasic variable with the lowest index that improves the objective.
    ///
    /// # Return value
    ///
    /// The variable and whether it should increase.
    fn select_primal_pivot_column(
        &self,
        state: &State<F>,
        costs: &[F],
        dual: &[F],
    ) -> Option<(usize, bool)> {
        (0..state.status.len())
            .filter(|&k| !matches!(state.status[k], VariableStatus::Basic(_)) && !self.is_fixed(k))
            .find_map(|k| {
                let reduced_cost = self.reduced_cost(k, state, costs, dual);
                let can_increase = matches!(state.status[k], VariableStatus::AtLower | VariableStatus::Free);
                let can_decrease = matches!(state.status[k], VariableStatus::AtUpper | VariableStatus::Free);

                if can_increase && reduced_cost.is_significantly_negative() {
                    Some((k, true))
                } else if can_decrease && reduced_cost.is_significantly_positive() {
                    Some((k, false))
                } else {
                    None
                }
            })
    }

    /// Ratio test, ties are broken in favor of the basic variable with the lowest index.
    ///
    /// # Arguments
    ///
    /// * `k`: Entering variable.
    /// * `increase`: Direction in which the entering variable moves.
    /// * `column`: `B^-1 a_k`.
    ///
    /// # Return value
    ///
    /// `None` if the step length is unbounded.
    fn select_primal_pivot_row(
        &self,
        state: &State<F>,
        k: usize,
        increase: bool,
        column: &[F],
    ) -> Option<Step<F>> {
        let mut best: Option<(F, usize, VariableStatus)> = None;
        for (r, alpha) in column.iter().enumerate() {
            if alpha.is_significantly_zero() {
                continue;
            }
            // Rate at which the basic variable decreases per unit step
            let rate = if increase { alpha.clone() } else { -alpha.clone() };
            let basic = state.basic_columns[r];
            let value = &state.values[basic];

            let (mut theta, status) = if rate.is_significantly_positive() {
                match self.lower(basic) {
                    Some(lower) => ((value.clone() - lower) / rate, VariableStatus::AtLower),
                    None => continue,
                }
            } else {
                match self.upper(basic) {
                    Some(upper) => ((upper.clone() - value) / -rate, VariableStatus::AtUpper),
                    None => continue,
                }
            };
            if theta < F::zero() {
                theta = F::zero();
            }

            let better = match &best {
                None => true,
                Some((best_theta, best_row, _)) => theta < *best_theta
                    || (theta == *best_theta && basic < state.basic_columns[*best_row]),
            };
            if better {
                best = Some((theta, r, status));
            }
        }

        let flip_distance = match (self.lower(k), self.upper(k)) {
            (Some(lower), Some(upper)) => Some(upper.clone() - lower),
            _ => None,
        };
        match (flip_distance, best) {
            (Some(distance), Some((theta, _, _))) if distance <= theta => Some(Step::Flip(distance)),
            (Some(distance), None) => Some(Step::Flip(distance)),
            (_, Some((theta, row, leaving_status))) => Some(Step::Pivot { row, theta, leaving_status }),
            (None, None) => None,
        }
    }

    fn primal_step(&self, state: &mut State<F>, k: usize, increase: bool, column: &[F], step: Step<F>) {
        let theta = match &step {
            Step::Flip(distance) => distance.clone(),
            Step::Pivot { theta, .. } => theta.clone(),
        };
        let signed_theta = if increase { theta } else { -theta };

        if !signed_theta.is_zero() {
            state.values[k] += signed_theta.clone();
            for (r, alpha) in column.iter().enumerate() {
                if !alpha.is_zero() {
                    let basic = state.basic_columns[r];
                    state.values[basic] -= signed_theta.clone() * alpha;
                }
            }
        }

        match step {
            Step::Flip(_) => {
                let (status, bound) = if increase {
                    (VariableStatus::AtUpper, self.upper(k))
                } else {
                    (VariableStatus::AtLower, self.lower(k))
                };
                state.status[k] = status;
                if let Some(bound) = bound {
                    state.values[k] = bound.clone();
                }
            },
            Step::Pivot { row, leaving_status, .. } => {
                let leaving = state.basic_columns[row];
                let bound = match leaving_status {
                    VariableStatus::AtLower => self.lower(leaving),
                    _ => self.upper(leaving),
                };
                if let Some(bound) = bound {
                    state.values[leaving] = bound.clone();
                }
                self.pivot(state, row, k, column, leaving_status);
            },
        }
    }
}
