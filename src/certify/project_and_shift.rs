//! # Project-and-shift
//!
//! Turn an approximate dual solution into an exactly feasible one in two steps. The projection
//! corrects the violation of `D y = c` using the factorization of the selected columns, which may
//! make some selected components negative. The shift then moves toward the interior point, which
//! is strictly positive on all selected components, until every component is nonnegative.
use log::{debug, warn};
use num_traits::{One, Zero};

use crate::certify::extended_dual::ExtendedDual;
use crate::data::linear_program::exact_problem::ExactProblem;
use crate::data::linear_program::solution::LpRelaxation;
use crate::data::number_types::rational::Rational;
use crate::interior_point::InteriorPointData;
use crate::settings::{Settings, ShiftStrategy};

/// Add the least norm correction `z` with `D_S z = c - D y` to the selected components.
pub fn project(data: &InteriorPointData, extended: &ExtendedDual, problem: &ExactProblem, y: &mut [Rational]) {
    let residual = extended.residual(problem, y);
    if residual.iter().all(Rational::is_zero) {
        return;
    }

    let correction = data.lu().solve(&residual);
    for (&k, value) in data.basis_mapping().iter().zip(correction) {
        if !value.is_zero() {
            y[k] += value;
        }
    }
}

/// Fraction of the way to the interior point that makes every component nonnegative.
///
/// # Arguments
///
/// * `strategy`: Whether to use the common slack or each component's own value.
/// * `data`: The interior point.
/// * `y`: Projected vector, only selected components may be negative.
///
/// # Return value
///
/// A value in `[0, 1)`, zero if `y` is nonnegative already.
#[must_use]
pub fn shift_factor(strategy: ShiftStrategy, data: &InteriorPointData, y: &[Rational]) -> Rational {
    debug_assert!(y.iter().enumerate().all(|(k, value)| !value.is_negative() || data.is_selected(k)));

    let negative = y.iter().enumerate().filter(|(_, value)| value.is_negative());
    match strategy {
        ShiftStrategy::CommonSlack => {
            let Some(max_violation) = negative.map(|(_, value)| -value).max() else {
                return Rational::zero();
            };
            let total = &max_violation + data.common_slack();
            max_violation / total
        },
        ShiftStrategy::PerComponent => negative
            .map(|(k, value)| {
                let interior = &data.interior_point()[k];
                debug_assert!(interior.is_positive());
                -value / (interior - value)
            })
            .max()
            .unwrap_or_else(Rational::zero),
    }
}

/// Replace `y` by `(1 - lambda) y + lambda y_hat`.
pub fn shift(data: &InteriorPointData, lambda: &Rational, y: &mut [Rational]) {
    if lambda.is_zero() {
        return;
    }

    let keep = Rational::one() - lambda;
    for (value, interior) in y.iter_mut().zip(data.interior_point()) {
        if value.is_zero() && interior.is_zero() {
            continue;
        }
        *value = &keep * &*value + lambda * interior;
    }
}

/// Exactly feasible extended dual vector from an approximate dual solution.
///
/// # Arguments
///
/// * `data`: The interior point.
/// * `extended`: Layout of the extended dual.
/// * `problem`: Exact problem.
/// * `costs`: Costs of the extended dual at the node.
/// * `relaxation`: Approximate solution with row duals and reduced costs.
/// * `settings`: Shift strategy, complementary reduction and verification.
///
/// # Return value
///
/// The vector, or `None` if it failed verification.
#[must_use]
pub fn feasible_dual(
    data: &InteriorPointData,
    extended: &ExtendedDual,
    problem: &ExactProblem,
    costs: &[Option<Rational>],
    relaxation: &LpRelaxation,
    settings: &Settings,
) -> Option<Vec<Rational>> {
    let mut y = extended.from_relaxation(relaxation, costs);
    project(data, extended, problem, &mut y);
    let lambda = shift_factor(settings.shift, data, &y);
    debug!("shifting {} of the way to the interior point", lambda);
    shift(data, &lambda, &mut y);
    if settings.reduce_complementary_duals {
        extended.reduce_complementary(&mut y);
    }

    if (settings.verify_dual_feasibility || cfg!(debug_assertions)) && !extended.is_feasible(problem, &y) {
        warn!("project-and-shift produced a dual solution that is not feasible");
        return None;
    }

    Some(y)
}

/// Certified bound by project-and-shift.
///
/// # Return value
///
/// A lower bound on the relaxation at the node, or `None` if a component without cost is positive
/// or verification failed.
#[must_use]
pub fn bound(
    data: &InteriorPointData,
    extended: &ExtendedDual,
    problem: &ExactProblem,
    costs: &[Option<Rational>],
    relaxation: &LpRelaxation,
    settings: &Settings,
) -> Option<Rational> {
    let y = feasible_dual(data, extended, problem, costs, relaxation, settings)?;
    extended.objective(&y, costs)
}

#[cfg(test)]
mod test {
    use crate::certify::extended_dual::ExtendedDual;
    use crate::certify::project_and_shift::{bound, feasible_dual, project, shift, shift_factor};
    use crate::data::linear_program::exact_problem::NodeBounds;
    use crate::data::linear_program::solution::{LpRelaxation, RelaxationStatus};
    use crate::interior_point::{build, InteriorPointData, InteriorPointState};
    use crate::settings::{Settings, ShiftStrategy};
    use crate::tests::problem_1;
    use crate::RQ;

    fn packing_interior_point() -> (ExtendedDual, InteriorPointData) {
        let problem = problem_1::create();
        let extended = ExtendedDual::new(&problem);
        match build(&Settings::default(), &extended, &problem, None, None).unwrap() {
            InteriorPointState::Built(data) => (extended, data),
            state => panic!("{state:?}"),
        }
    }

    #[test]
    fn exact_at_optimum() {
        let problem = problem_1::create();
        let (extended, data) = packing_interior_point();
        let costs = extended.costs(&problem, &NodeBounds::local(&problem));

        for strategy in [ShiftStrategy::CommonSlack, ShiftStrategy::PerComponent] {
            let settings = Settings { shift: strategy, ..Settings::default() };
            let result = bound(&data, &extended, &problem, &costs, &problem_1::relaxation(), &settings);
            assert_eq!(result, Some(RQ!(-1)));
        }
    }

    #[test]
    fn projection_restores_equalities() {
        let problem = problem_1::create();
        let (extended, data) = packing_interior_point();

        let mut y = vec![RQ!(0), RQ!(9, 10), RQ!(0), RQ!(0), RQ!(0), RQ!(0)];
        assert!(!extended.is_feasible(&problem, &y));
        project(&data, &extended, &problem, &mut y);
        assert!(extended.residual(&problem, &y).iter().all(|value| value == &RQ!(0)));
    }

    #[test]
    fn shift_repairs_signs() {
        let (_, data) = packing_interior_point();
        let common_slack = data.common_slack().clone();

        let mut y = vec![RQ!(0); 6];
        y[2] = RQ!(-1, 2);
        for strategy in [ShiftStrategy::CommonSlack, ShiftStrategy::PerComponent] {
            let mut shifted = y.clone();
            let lambda = shift_factor(strategy, &data, &shifted);
            assert!(lambda > RQ!(0) && lambda < RQ!(1));
            shift(&data, &lambda, &mut shifted);
            assert!(shifted.iter().all(|value| value >= &RQ!(0)));
            // The violated component lands exactly on zero with the per component factor
            if strategy == ShiftStrategy::PerComponent {
                assert_eq!(shifted[2], RQ!(0));
            }
        }

        let common = shift_factor(ShiftStrategy::CommonSlack, &data, &y);
        assert_eq!(common, RQ!(1, 2) / (RQ!(1, 2) + common_slack));
        assert_eq!(shift_factor(ShiftStrategy::PerComponent, &data, &vec![RQ!(0); 6]), RQ!(0));
    }

    #[test]
    fn feasible_from_poor_duals() {
        let problem = problem_1::create();
        let (extended, data) = packing_interior_point();
        let costs = extended.costs(&problem, &NodeBounds::local(&problem));
        let relaxation = LpRelaxation {
            status: RelaxationStatus::Optimal,
            objective: -1.0,
            primal: vec![1.0, 0.0],
            row_duals: vec![-0.7],
            reduced_costs: vec![0.2, -0.4],
            basis: None,
        };

        let settings = Settings { verify_dual_feasibility: true, ..Settings::default() };
        let y = feasible_dual(&data, &extended, &problem, &costs, &relaxation, &settings).unwrap();
        assert!(extended.is_feasible(&problem, &y));
        let value = extended.objective(&y, &costs).unwrap();
        // Weak duality
        assert!(value <= RQ!(-1));
    }
}
