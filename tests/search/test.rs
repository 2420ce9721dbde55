use exactlp::handler::ExactLpHandler;
use exactlp::RQ;
use exactlp::settings::{DualBoundMethod, Settings};

use crate::problems::{knapsack, mixed, packing};
use crate::search::Search;

#[test]
fn packing_is_solved_at_the_root() {
    let problem = packing();
    let mut search = Search::new(&problem);
    let mut handler = ExactLpHandler::new(problem, Settings::default());

    search.run(&mut handler).unwrap();
    assert_eq!(search.nr_nodes, 1);
    let incumbent = search.incumbent.unwrap();
    assert_eq!(&incumbent[0] + &incumbent[1], RQ!(1));
    assert_eq!(handler.statistics().branchings, 0);
}

#[test]
fn knapsack_needs_branching() {
    let problem = knapsack();
    let mut search = Search::new(&problem);
    let mut handler = ExactLpHandler::new(problem, Settings::default());

    search.run(&mut handler).unwrap();
    let incumbent = search.incumbent.unwrap();
    assert_eq!(incumbent, vec![RQ!(1), RQ!(1), RQ!(0)]);
    assert_eq!(handler.check_solution(&incumbent), Ok(None));

    let value = handler.problem().objective_value(&incumbent);
    assert_eq!(value, RQ!(-9));
    assert_eq!(handler.safe_external_objective(&value, false), 9_f64);

    let statistics = handler.statistics();
    assert!(statistics.branchings > 0);
    assert!(statistics.stored_solutions > 0);
    assert!(statistics.exact_lp_solves >= statistics.branchings);
}

#[test]
fn mixed_with_offset() {
    let problem = mixed();
    let mut search = Search::new(&problem);
    let settings = Settings { dual_bound_method: DualBoundMethod::ProjectAndShift, ..Settings::default() };
    let mut handler = ExactLpHandler::new(problem, settings);

    search.run(&mut handler).unwrap();
    let incumbent = search.incumbent.unwrap();
    assert_eq!(incumbent, vec![RQ!(2), RQ!(0)]);

    let value = handler.problem().objective_value(&incumbent);
    assert_eq!(handler.safe_external_objective(&value, false), 2.5);
    assert_eq!(handler.statistics().branchings, 1);
}
