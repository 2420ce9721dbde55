//! # Certification on small instances
//!
//! Each test drives a single certification step through the public interface and checks the exact
//! outcome.
use exactlp::certify::DualBound;
use exactlp::certify::extended_dual::{DualBlock, ExtendedDual};
use exactlp::certify::neumaier_shcherbina::{exact_bound, interval_bound, repair};
use exactlp::data::linear_algebra::matrix::RationalMatrix;
use exactlp::data::linear_program::elements::{BoundDirection, ObjectiveSense, VariableType};
use exactlp::data::linear_program::exact_problem::{ExactProblem, ExactRow, NodeBounds, Variable};
use exactlp::data::linear_program::solution::{LpRelaxation, RelaxationStatus};
use exactlp::data::number_types::infinity::InfinitySentinels;
use exactlp::error::ExactLpError;
use exactlp::handler::ExactLpHandler;
use exactlp::interior_point::{InteriorPointFailure, InteriorPointState};
use exactlp::lp_interface::{LpStatus, SolveLimits};
use exactlp::RQ;
use exactlp::settings::{DualBoundMethod, InteriorPointFormulation, Settings};

use crate::problems::{all_costs_infinite, packing, single_row};
use crate::search::Search;

fn relaxation(primal: Vec<f64>, row_duals: Vec<f64>, reduced_costs: Vec<f64>) -> LpRelaxation {
    LpRelaxation {
        status: RelaxationStatus::Optimal,
        objective: f64::NAN,
        primal,
        row_duals,
        reduced_costs,
        basis: None,
    }
}

#[test]
fn project_and_shift_is_exact_at_the_optimum() {
    let problem = packing();
    let search = Search::new(&problem);
    let settings = Settings { dual_bound_method: DualBoundMethod::ProjectAndShift, ..Settings::default() };
    let mut handler = ExactLpHandler::new(problem, settings);

    let bound = handler.certify(&search, &relaxation(vec![1.0, 0.0], vec![-1.0], vec![0.0, 0.0]));
    assert_eq!(bound, Ok(Some(DualBound::Exact(RQ!(-1)))));
    assert!(handler.interior_point().data().is_some());
}

#[test]
fn infinite_side_has_no_dual() {
    let problem = single_row(Some(RQ!(0)), Some(RQ!(10)));
    let extended = ExtendedDual::new(&problem);
    let bounds = NodeBounds::local(&problem);
    let costs = extended.costs(&problem, &bounds);
    // A positive dual belongs to the left hand side, which is minus infinity
    let relaxation = relaxation(vec![2.5], vec![0.5], vec![0.0]);

    let lhs = extended.index(DualBlock::RowLhs, 0);
    assert_eq!(costs[lhs], None);
    let y = extended.from_relaxation(&relaxation, &costs);
    assert_eq!(y[lhs], RQ!(0));
    assert!(y.iter().all(|value| value == &RQ!(0)));

    assert_eq!(exact_bound(&extended, &problem, &costs, &relaxation, true), Some(RQ!(-10)));
    let safe = interval_bound(&problem, &bounds, &relaxation, 1e-9).unwrap();
    assert!(safe <= -10_f64 && safe > -10.000_1);

    // Without an upper bound on x, nothing can be certified from these duals
    let problem = single_row(Some(RQ!(0)), None);
    let bounds = NodeBounds::local(&problem);
    let extended = ExtendedDual::new(&problem);
    let costs = extended.costs(&problem, &bounds);
    assert_eq!(exact_bound(&extended, &problem, &costs, &relaxation, true), None);
    assert_eq!(interval_bound(&problem, &bounds, &relaxation, 1e-9), None);
}

#[test]
fn binary_lower_bound_is_rounded_up() {
    let mut handler = ExactLpHandler::new(packing(), Settings::default());
    handler.notify_bound_changed(0, 0.3, BoundDirection::Lower, 0);
    handler.apply_pending_bound_changes();

    assert_eq!(handler.problem().bounds(0).local_lower, RQ!(1));
    assert_ne!(handler.problem().bounds(0).local_lower, RQ!(0.3));
}

#[test]
fn repair_absorbs_the_violation_exactly() {
    // min 501/1000 x, x in [0, 10]: a reduced cost of 1/2 leaves a violation of 1/1000
    let infinity = InfinitySentinels::default();
    let problem = ExactProblem::new(
        ObjectiveSense::Minimize,
        RQ!(0),
        vec![Variable {
            variable_type: VariableType::Continuous,
            objective: RQ!(501, 1000),
            lower: RQ!(0),
            upper: RQ!(10),
        }],
        Vec::new(),
        RationalMatrix::from_rows(1, Vec::new()).unwrap(),
        infinity,
    ).unwrap();
    let extended = ExtendedDual::new(&problem);
    let costs = extended.costs(&problem, &NodeBounds::local(&problem));
    let relaxation = relaxation(vec![0.0], Vec::new(), vec![0.5]);

    let before = extended.from_relaxation(&relaxation, &costs);
    assert_eq!(extended.residual(&problem, &before), vec![RQ!(1, 1000)]);
    let mut after = before.clone();
    repair(&extended, &problem, &mut after);

    let lower = extended.index(DualBlock::VariableLower, 0);
    assert_eq!(&after[lower] - &before[lower], RQ!(1, 1000));
    assert!(extended.is_feasible(&problem, &after));
    assert_eq!(exact_bound(&extended, &problem, &costs, &relaxation, true), Some(RQ!(0)));
}

#[test]
fn interior_point_without_finite_costs() {
    let problem = all_costs_infinite();
    let search = Search::new(&problem);
    let settings = Settings { dual_bound_method: DualBoundMethod::ProjectAndShift, ..Settings::default() };
    let mut handler = ExactLpHandler::new(problem, settings);

    let state = handler.build_interior_point(None).unwrap();
    assert!(matches!(state, InteriorPointState::Failed(InteriorPointFailure::EmptySelection)));
    assert!(state.data().is_none());

    // Project-and-shift is skipped, the pseudo objective remains
    let bound = handler.certify(&search, &relaxation(vec![0.0], vec![0.0], vec![0.0]));
    assert_eq!(bound, Ok(Some(DualBound::Exact(RQ!(0)))));
    assert_eq!(handler.statistics().methods[DualBoundMethod::ProjectAndShift].calls, 0);
}

const NO_ITERATIONS: SolveLimits = SolveLimits { iterations: Some(0), time: None };

#[test]
fn auxiliary_limit_reaches_the_caller() {
    for formulation in [InteriorPointFormulation::Arbitrary, InteriorPointFormulation::TwoStage] {
        let settings = Settings {
            dual_bound_method: DualBoundMethod::ProjectAndShift,
            interior_point: formulation,
            auxiliary_lp_limits: NO_ITERATIONS,
            ..Settings::default()
        };
        let problem = packing();
        let search = Search::new(&problem);
        let mut handler = ExactLpHandler::new(problem, settings);

        assert_eq!(
            handler.build_interior_point(None).err(),
            Some(ExactLpError::AuxiliaryLp { status: LpStatus::IterationLimit }),
        );
        assert!(!handler.interior_point().is_attempted());
        assert_eq!(
            handler.certify(&search, &relaxation(vec![1.0, 0.0], vec![-1.0], vec![0.0, 0.0])),
            Err(ExactLpError::AuxiliaryLp { status: LpStatus::IterationLimit }),
        );
    }
}

#[test]
fn exact_limit_reaches_the_caller() {
    let problem = packing();
    let search = Search::new(&problem);
    let settings = Settings {
        dual_bound_method: DualBoundMethod::ExactLp,
        exact_lp_limits: NO_ITERATIONS,
        ..Settings::default()
    };
    let mut handler = ExactLpHandler::new(problem, settings);

    assert_eq!(
        handler.certify(&search, &relaxation(vec![1.0, 0.0], vec![-1.0], vec![0.0, 0.0])),
        Err(ExactLpError::ExactLp { status: LpStatus::IterationLimit }),
    );
    assert_eq!(handler.statistics().exact_lp_solves, 0);
}

#[test]
fn unbounded_exact_relaxation_is_an_error() {
    // min -x, x >= 0, with a row that doesn't limit x from above
    let infinity = InfinitySentinels::default();
    let problem = ExactProblem::new(
        ObjectiveSense::Minimize,
        RQ!(0),
        vec![Variable {
            variable_type: VariableType::Continuous,
            objective: RQ!(-1),
            lower: RQ!(0),
            upper: infinity.positive().clone(),
        }],
        vec![ExactRow { lhs: infinity.negative().clone(), rhs: RQ!(5) }],
        RationalMatrix::from_rows(1, vec![vec![(0, RQ!(-1))]]).unwrap(),
        infinity,
    ).unwrap();
    let search = Search::new(&problem);
    let mut handler = ExactLpHandler::new(problem, Settings::default());

    // Only the exact LP can confirm a reported infeasibility
    let relaxation = LpRelaxation::without_solution(RelaxationStatus::Infeasible);
    assert_eq!(
        handler.certify(&search, &relaxation),
        Err(ExactLpError::ExactLp { status: LpStatus::Unbounded }),
    );
}
