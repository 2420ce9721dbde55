//! # Auxiliary problems
//!
//! Linear programs whose optimal solutions contain a point `y` with `D y = c`, `y >= 0` that is
//! strictly positive on a selected set `S` of components of the extended dual.
//!
//! The basic formulation maximizes the smallest selected component, capped at one:
//!
//! ```text
//! max delta
//! s.t. D y = c
//!      y_k - delta >= 0   for k in S
//!      y >= 0, 0 <= delta <= 1
//! ```
//!
//! Only components with a finite cost appear as variables. Each problem is first solved in floating
//! point; its final basis then warm starts the exact solve, which is the one that counts.
use log::debug;
use num_traits::{One, Zero};

use crate::algorithm::simplex::SimplexLp;
use crate::certify::extended_dual::ExtendedDual;
use crate::data::linear_program::exact_problem::ExactProblem;
use crate::data::number_types::rational::Rational;
use crate::data::number_types::traits::Field;
use crate::error::ExactLpError;
use crate::lp_interface::{LpInterface, LpSolution, LpStatus, NewColumn, NewRow, SolveLimits};
use crate::settings::InteriorPointFormulation;

/// Smallest iteration limit of the floating point warm start solve.
const MIN_WARM_START_ITERATIONS: u64 = 1_000;

/// A linear program in the form that the `LpInterface` accepts.
///
/// The rows are added first without entries, the columns then carry all coefficients.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AuxiliaryProblem {
    columns: Vec<NewColumn<Rational>>,
    rows: Vec<NewRow<Rational>>,
}

impl AuxiliaryProblem {
    /// Load the problem into a simplex solver of the given arithmetic.
    fn lp<F: Field>(&self) -> SimplexLp<F> {
        let convert = |value: &Option<Rational>| value.as_ref().map(F::from_rational);

        let mut lp = SimplexLp::new();
        lp.add_rows(self.rows.iter()
            .map(|row| NewRow { lhs: convert(&row.lhs), rhs: convert(&row.rhs), entries: Vec::new() })
            .collect());
        lp.add_columns(self.columns.iter()
            .map(|column| NewColumn {
                objective: F::from_rational(&column.objective),
                lower: convert(&column.lower),
                upper: convert(&column.upper),
                entries: column.entries.iter().map(|(i, value)| (*i, F::from_rational(value))).collect(),
                name: column.name.clone(),
            })
            .collect());

        lp
    }

    /// Solve exactly, warm started from a floating point solve.
    ///
    /// # Arguments
    ///
    /// * `limits`: Limits of the exact solve.
    ///
    /// # Return value
    ///
    /// The optimal solution, or `None` if the problem is infeasible or unbounded.
    ///
    /// # Errors
    ///
    /// If the exact solve reached a limit or got into numerical trouble.
    pub(crate) fn solve(&self, limits: SolveLimits) -> Result<Option<LpSolution<Rational>>, ExactLpError> {
        let mut approximate = self.lp::<f64>();
        let size = (self.rows.len() + self.columns.len()) as u64;
        // The warm start never gets more work than the exact solve is allowed
        let iterations = MIN_WARM_START_ITERATIONS.max(10 * size);
        approximate.set_limits(SolveLimits {
            iterations: Some(limits.iterations.map_or(iterations, |limit| limit.min(iterations))),
            time: limits.time,
        });
        let approximate_status = approximate.solve_primal();
        debug!(
            "floating point auxiliary LP ended with {:?} after {} iterations",
            approximate_status, approximate.iteration_count(),
        );

        let mut exact = self.lp::<Rational>();
        exact.set_limits(limits);
        if approximate_status == LpStatus::Optimal {
            if let Err(error) = exact.set_basis(&approximate.basis()) {
                debug!("not warm starting the exact auxiliary LP: {error}");
            }
        }
        let status = exact.solve_dual();
        debug!("exact auxiliary LP ended with {:?} after {} iterations", status, exact.iteration_count());

        match status {
            LpStatus::Optimal => exact.solution().map(Some).ok_or(ExactLpError::AuxiliaryLp { status }),
            LpStatus::Infeasible | LpStatus::Unbounded => Ok(None),
            status => Err(ExactLpError::AuxiliaryLp { status }),
        }
    }

    #[cfg(test)]
    pub(crate) fn nr_rows(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub(crate) fn nr_columns(&self) -> usize {
        self.columns.len()
    }
}

/// Components with a finite cost, the only ones that may be nonzero.
fn finite_components(costs: &[Option<Rational>]) -> Vec<usize> {
    (0..costs.len()).filter(|&k| costs[k].is_some()).collect()
}

/// Build the basic formulation, in the primal space of the extended dual.
///
/// # Arguments
///
/// * `objective`: Cost of each extended dual component in the auxiliary problem.
/// * `delta`: Bounds of `delta`, its cost is minus one if it is not fixed.
pub(crate) fn primal_form(
    extended: &ExtendedDual,
    problem: &ExactProblem,
    costs: &[Option<Rational>],
    selection: &[usize],
    objective: impl Fn(usize) -> Rational,
    delta: (Rational, Rational),
) -> AuxiliaryProblem {
    let n = extended.nr_variables();

    let mut rows = (0..n)
        .map(|j| NewRow {
            lhs: Some(problem.objective(j).clone()),
            rhs: Some(problem.objective(j).clone()),
            entries: Vec::new(),
        })
        .collect::<Vec<_>>();
    rows.extend(selection.iter().map(|_| NewRow {
        lhs: Some(Rational::zero()),
        rhs: None,
        entries: Vec::new(),
    }));

    let mut columns = finite_components(costs).into_iter()
        .map(|k| {
            let mut entries = extended.column(k).to_vec();
            if let Ok(position) = selection.binary_search(&k) {
                entries.push((n + position, Rational::one()));
            }
            entries.sort_unstable_by_key(|&(i, _)| i);

            NewColumn {
                objective: objective(k),
                lower: Some(Rational::zero()),
                upper: None,
                entries,
                name: format!("y{k}"),
            }
        })
        .collect::<Vec<_>>();

    let (delta_lower, delta_upper) = delta;
    columns.push(NewColumn {
        objective: if delta_lower == delta_upper { Rational::zero() } else { -Rational::one() },
        lower: Some(delta_lower),
        upper: Some(delta_upper),
        entries: (0..selection.len()).map(|position| (n + position, -Rational::one())).collect(),
        name: "delta".to_string(),
    });

    AuxiliaryProblem { columns, rows }
}

/// Build the dual of the basic formulation.
///
/// ```text
/// min c^T x + t
/// s.t. D_k^T x - w_k >= 0   for k in S
///      D_k^T x       >= 0   for finite cost k not in S
///      sum w + t = 1
///      x free, w >= 0, t >= 0
/// ```
///
/// The row duals of the first two groups form `y`, the dual of the last row is `delta`.
pub(crate) fn dual_form(
    extended: &ExtendedDual,
    problem: &ExactProblem,
    costs: &[Option<Rational>],
    selection: &[usize],
) -> AuxiliaryProblem {
    let n = extended.nr_variables();
    let finite = finite_components(costs);
    let normalization = finite.len();

    let mut rows = finite.iter()
        .map(|_| NewRow { lhs: Some(Rational::zero()), rhs: None, entries: Vec::new() })
        .collect::<Vec<_>>();
    rows.push(NewRow { lhs: Some(Rational::one()), rhs: Some(Rational::one()), entries: Vec::new() });

    let mut x_entries = vec![Vec::new(); n];
    for (row, &k) in finite.iter().enumerate() {
        for (j, value) in extended.column(k) {
            x_entries[*j].push((row, value.clone()));
        }
    }
    let mut columns = x_entries.into_iter()
        .enumerate()
        .map(|(j, entries)| NewColumn {
            objective: problem.objective(j).clone(),
            lower: None,
            upper: None,
            entries,
            name: format!("x{j}"),
        })
        .collect::<Vec<_>>();
    columns.extend(selection.iter().filter_map(|k| {
        let row = finite.binary_search(k).ok()?;
        Some(NewColumn {
            objective: Rational::zero(),
            lower: Some(Rational::zero()),
            upper: None,
            entries: vec![(row, -Rational::one()), (normalization, Rational::one())],
            name: format!("w{k}"),
        })
    }));
    columns.push(NewColumn {
        objective: Rational::one(),
        lower: Some(Rational::zero()),
        upper: None,
        entries: vec![(normalization, Rational::one())],
        name: "t".to_string(),
    });

    AuxiliaryProblem { columns, rows }
}

/// Read the extended dual vector and `delta` from a solution of `primal_form`.
fn from_primal_form(costs: &[Option<Rational>], solution: LpSolution<Rational>) -> (Vec<Rational>, Rational) {
    let mut primal = solution.primal;
    let delta = primal.pop().unwrap_or_else(Rational::zero);

    let mut y = vec![Rational::zero(); costs.len()];
    for (k, value) in finite_components(costs).into_iter().zip(primal) {
        y[k] = value;
    }

    (y, delta)
}

/// Read the extended dual vector from a solution of `dual_form`.
fn from_dual_form(costs: &[Option<Rational>], solution: LpSolution<Rational>) -> Vec<Rational> {
    let mut y = vec![Rational::zero(); costs.len()];
    for (k, value) in finite_components(costs).into_iter().zip(solution.row_duals) {
        y[k] = value;
    }

    y
}

/// Compute a point `y` with `D y = c`, `y >= 0` that is as positive as possible on the selection.
///
/// # Arguments
///
/// * `formulation`: Which auxiliary problem to solve.
/// * `extended`: Layout of the extended dual.
/// * `problem`: Exact problem, provides `c`.
/// * `costs`: Costs of the extended dual.
/// * `selection`: Selected components, sorted, all with a finite cost.
/// * `weight`: Weight of the dual objective in the `Optimized` formulation.
/// * `limits`: Limits of each exact solve.
///
/// # Return value
///
/// The point, or `None` if no point with `D y = c`, `y >= 0` exists.
///
/// # Errors
///
/// If an exact solve ran into a limit, or the formulation is not available.
pub(crate) fn interior_point(
    formulation: InteriorPointFormulation,
    extended: &ExtendedDual,
    problem: &ExactProblem,
    costs: &[Option<Rational>],
    selection: &[usize],
    weight: f64,
    limits: SolveLimits,
) -> Result<Option<Vec<Rational>>, ExactLpError> {
    debug_assert!(selection.iter().all(|&k| costs[k].is_some()));

    let unit_delta = || (Rational::zero(), Rational::one());
    let cost = |k: usize| costs[k].clone().unwrap_or_else(Rational::zero);

    match formulation {
        InteriorPointFormulation::Arbitrary => {
            let auxiliary = primal_form(extended, problem, costs, selection, |_| Rational::zero(), unit_delta());
            Ok(auxiliary.solve(limits)?.map(|solution| from_primal_form(costs, solution).0))
        },
        InteriorPointFormulation::ArbitraryDualForm => {
            let auxiliary = dual_form(extended, problem, costs, selection);
            Ok(auxiliary.solve(limits)?.map(|solution| from_dual_form(costs, solution)))
        },
        InteriorPointFormulation::Optimized => {
            let weight = Rational::from_f64(weight).unwrap_or_else(Rational::zero);
            let auxiliary = primal_form(
                extended, problem, costs, selection, |k| -(&weight * cost(k)), unit_delta(),
            );
            Ok(auxiliary.solve(limits)?.map(|solution| from_primal_form(costs, solution).0))
        },
        InteriorPointFormulation::TwoStage => {
            let first = primal_form(extended, problem, costs, selection, |_| Rational::zero(), unit_delta());
            let Some(solution) = first.solve(limits)? else {
                return Ok(None);
            };
            let (y, delta) = from_primal_form(costs, solution);
            if !delta.is_positive() {
                return Ok(Some(y));
            }

            let half = delta / Rational::from(2);
            let second = primal_form(extended, problem, costs, selection, |k| -cost(k), (half.clone(), half));
            // A limit in the second stage is as fatal as in the first
            match second.solve(limits)? {
                Some(solution) => Ok(Some(from_primal_form(costs, solution).0)),
                None => {
                    debug!("second stage of the interior point has no optimum, keeping the first stage");
                    Ok(Some(y))
                },
            }
        },
        InteriorPointFormulation::AnalyticCenter => Err(ExactLpError::UnsupportedInteriorPoint(formulation)),
    }
}

#[cfg(test)]
mod test {
    use crate::certify::extended_dual::ExtendedDual;
    use crate::data::linear_program::exact_problem::NodeBounds;
    use crate::interior_point::auxiliary::{dual_form, interior_point, primal_form};
    use crate::error::ExactLpError;
    use crate::lp_interface::{LpStatus, SolveLimits};
    use crate::settings::InteriorPointFormulation;
    use crate::tests::problem_1;
    use crate::RQ;

    #[test]
    fn shapes() {
        let problem = problem_1::create();
        let extended = ExtendedDual::new(&problem);
        let costs = extended.costs(&problem, &NodeBounds::global(&problem));
        let selection = [1, 3];

        let primal = primal_form(&extended, &problem, &costs, &selection, |_| RQ!(0), (RQ!(0), RQ!(1)));
        // Two equality rows and one row per selected component
        assert_eq!(primal.nr_rows(), 4);
        // Five finite components and delta
        assert_eq!(primal.nr_columns(), 6);

        let dual = dual_form(&extended, &problem, &costs, &selection);
        // One row per finite component and the normalization
        assert_eq!(dual.nr_rows(), 6);
        // Two variables, one per selected component and t
        assert_eq!(dual.nr_columns(), 5);
    }

    #[test]
    fn every_formulation_gives_a_feasible_point() {
        let problem = problem_1::create();
        let extended = ExtendedDual::new(&problem);
        let costs = extended.costs(&problem, &NodeBounds::global(&problem));
        let selection = [1, 2, 3, 4, 5];

        for formulation in [
            InteriorPointFormulation::Arbitrary,
            InteriorPointFormulation::ArbitraryDualForm,
            InteriorPointFormulation::Optimized,
            InteriorPointFormulation::TwoStage,
        ] {
            let y = interior_point(
                formulation, &extended, &problem, &costs, &selection, 0.25, SolveLimits::default(),
            ).unwrap().unwrap();
            assert!(extended.is_feasible(&problem, &y), "{formulation:?}");
            assert!(selection.iter().all(|&k| y[k].is_positive()), "{formulation:?}");
            assert!(extended.objective(&y, &costs).is_some());
        }
    }

    #[test]
    fn limits_are_errors() {
        let problem = problem_1::create();
        let extended = ExtendedDual::new(&problem);
        let costs = extended.costs(&problem, &NodeBounds::global(&problem));
        let limits = SolveLimits { iterations: Some(0), time: None };

        for formulation in [
            InteriorPointFormulation::Arbitrary,
            InteriorPointFormulation::ArbitraryDualForm,
            InteriorPointFormulation::Optimized,
            InteriorPointFormulation::TwoStage,
        ] {
            assert_eq!(
                interior_point(formulation, &extended, &problem, &costs, &[1, 3], 0.5, limits),
                Err(ExactLpError::AuxiliaryLp { status: LpStatus::IterationLimit }),
                "{formulation:?}",
            );
        }
    }

    #[test]
    fn analytic_center_is_not_available() {
        let problem = problem_1::create();
        let extended = ExtendedDual::new(&problem);
        let costs = extended.costs(&problem, &NodeBounds::global(&problem));
        assert!(interior_point(
            InteriorPointFormulation::AnalyticCenter,
            &extended, &problem, &costs, &[1], 0.5, SolveLimits::default(),
        ).is_err());
    }
}
