//! # Properties that hold for any input
//!
//! Soundness of the certified bounds under perturbed dual information, and the behavior of the
//! bound synchronization.
use exactlp::certify::DualBound;
use exactlp::data::linear_program::solution::{LpRelaxation, RelaxationStatus};
use exactlp::data::number_types::rational::Rational;

#[allow(missing_docs)]
mod test;

/// Whether a certified bound doesn't exceed a value.
pub fn at_most(bound: &DualBound, value: &Rational) -> bool {
    match bound {
        DualBound::Exact(bound) => bound <= value,
        DualBound::Safe(bound) => Rational::from_f64(*bound).is_some_and(|bound| &bound <= value),
        DualBound::Infeasible => false,
    }
}

/// Optimal relaxations with dual values that are off by varying amounts, some with the wrong sign.
pub fn perturbed(primal: &[f64], nr_rows: usize) -> Vec<LpRelaxation> {
    let nr_variables = primal.len();
    let pattern = [-1.0, 0.0, -0.5, 0.25, -0.3, 1e-12, -2.0, 0.1];

    (0..pattern.len())
        .map(|shift| {
            let value = |k: usize| pattern[(k + shift) % pattern.len()];
            LpRelaxation {
                status: RelaxationStatus::Optimal,
                objective: f64::NAN,
                primal: primal.to_vec(),
                row_duals: (0..nr_rows).map(value).collect(),
                reduced_costs: (0..nr_variables).map(|j| value(j + nr_rows)).collect(),
                basis: None,
            }
        })
        .collect()
}
