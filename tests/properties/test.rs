use exactlp::certify::DualBound;
use exactlp::data::linear_program::elements::BoundDirection;
use exactlp::data::linear_program::exact_problem::ExactProblem;
use exactlp::data::linear_program::pseudo_objective::PseudoObjective;
use exactlp::handler::ExactLpHandler;
use exactlp::RQ;
use exactlp::settings::{DualBoundMethod, Settings};

use crate::problems::{knapsack, mixed, packing, single_row};
use crate::properties::{at_most, perturbed};
use crate::search::Search;

const METHODS: [DualBoundMethod; 5] = [
    DualBoundMethod::Automatic,
    DualBoundMethod::VerifyBasis,
    DualBoundMethod::IntervalNeumaierShcherbina,
    DualBoundMethod::ExactNeumaierShcherbina,
    DualBoundMethod::ProjectAndShift,
];

fn with_method(problem: ExactProblem, method: DualBoundMethod) -> ExactLpHandler {
    ExactLpHandler::new(problem, Settings { dual_bound_method: method, ..Settings::default() })
}

fn check_soundness(create: fn() -> ExactProblem, primal: &[f64]) {
    let problem = create();
    let search = Search::new(&problem);
    let nr_rows = problem.nr_rows();

    let relaxations = perturbed(primal, nr_rows);
    let mut handler = with_method(create(), DualBoundMethod::ExactLp);
    let optimum = match handler.certify(&search, &relaxations[0]).unwrap() {
        Some(DualBound::Exact(value)) => value,
        other => panic!("no exact optimum: {other:?}"),
    };

    for method in METHODS {
        for (k, relaxation) in relaxations.iter().enumerate() {
            let mut handler = with_method(create(), method);
            if let Some(bound) = handler.certify(&search, relaxation).unwrap() {
                assert!(at_most(&bound, &optimum), "{method:?}, perturbation {k}: {bound:?} > {optimum}");
            }
        }
    }
}

#[test]
fn bounds_are_sound() {
    check_soundness(packing, &[0.5, 0.5]);
    check_soundness(knapsack, &[1.0, 0.5, 0.5]);
    check_soundness(mixed, &[1.75, 0.0]);
}

#[test]
fn relaxation_bounds_the_integer_optimum() {
    let problem = knapsack();
    let search = Search::new(&problem);
    let mut handler = with_method(problem, DualBoundMethod::ExactLp);

    let bound = handler.certify(&search, &perturbed(&[1.0, 1.0, 0.0], 3)[0]).unwrap().unwrap();
    assert!(at_most(&bound, &RQ!(-9)));
}

#[test]
fn applying_twice_changes_nothing() {
    let changes = [
        (0, 0.2, BoundDirection::Lower),
        (1, 0.9, BoundDirection::Upper),
        (2, 1.0, BoundDirection::Lower),
        (2, 0.5, BoundDirection::Upper),
    ];

    let mut handler = ExactLpHandler::new(knapsack(), Settings::default());
    for (variable, value, direction) in changes {
        handler.notify_bound_changed(variable, value, direction, 0);
        handler.apply_pending_bound_changes();

        let bounds = (0..3).map(|j| handler.problem().bounds(j).clone()).collect::<Vec<_>>();
        let pseudo_objective = handler.pseudo_objective().clone();
        assert_eq!(pseudo_objective, PseudoObjective::new(handler.problem()));

        handler.apply_pending_bound_changes();
        assert_eq!((0..3).map(|j| handler.problem().bounds(j).clone()).collect::<Vec<_>>(), bounds);
        assert_eq!(handler.pseudo_objective(), &pseudo_objective);
    }
}

#[test]
fn tightening_never_lowers_the_pseudo_objective() {
    // Maximization: every internal objective coefficient is negative, only upper bounds count
    let changes = [
        (2, 0.0, BoundDirection::Upper),
        (0, 0.5, BoundDirection::Lower),
        (1, 0.4, BoundDirection::Upper),
        (0, 1.0, BoundDirection::Upper),
    ];
    let mut handler = ExactLpHandler::new(knapsack(), Settings::default());
    let mut previous = handler.pseudo_objective().value().cloned().unwrap();
    assert_eq!(previous, RQ!(-12));

    for (variable, value, direction) in changes {
        handler.notify_bound_changed(variable, value, direction, 0);
        handler.apply_pending_bound_changes();
        let current = handler.pseudo_objective().value().cloned().unwrap();
        assert!(current >= previous, "{current} < {previous}");
        previous = current;
    }
    assert_eq!(previous, RQ!(-5));

    // An infinite best bound gives minus infinity, which any finite value is above
    let mut handler = ExactLpHandler::new(single_row(Some(RQ!(0)), None), Settings::default());
    assert_eq!(handler.pseudo_objective().value(), None);
    assert_eq!(handler.pseudo_objective().nr_infinite_contributions(), 1);
    handler.notify_bound_changed(0, 3.0, BoundDirection::Upper, 0);
    handler.apply_pending_bound_changes();
    assert_eq!(handler.pseudo_objective().value(), Some(&RQ!(-3)));
    handler.notify_bound_changed(0, 2.5, BoundDirection::Upper, 0);
    handler.apply_pending_bound_changes();
    assert_eq!(handler.pseudo_objective().value(), Some(&RQ!(-5, 2)));
}
