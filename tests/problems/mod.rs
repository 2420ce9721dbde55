//! # Small problems with known optima
use exactlp::data::linear_algebra::matrix::RationalMatrix;
use exactlp::data::linear_algebra::SparseTuple;
use exactlp::data::linear_program::elements::{ObjectiveSense, VariableType};
use exactlp::data::linear_program::exact_problem::{ExactProblem, ExactRow, Variable};
use exactlp::data::number_types::infinity::InfinitySentinels;
use exactlp::data::number_types::rational::Rational;
use exactlp::RQ;

fn variable(variable_type: VariableType, objective: Rational, lower: Rational, upper: Rational) -> Variable {
    Variable { variable_type, objective, lower, upper }
}

fn problem(
    sense: ObjectiveSense,
    offset: Rational,
    variables: Vec<Variable>,
    rows: Vec<(Option<Rational>, Option<Rational>, Vec<SparseTuple<Rational>>)>,
) -> ExactProblem {
    let infinity = InfinitySentinels::default();
    let nr_columns = variables.len();
    let (sides, entries): (Vec<_>, Vec<_>) = rows.into_iter()
        .map(|(lhs, rhs, entries)| (ExactRow {
            lhs: lhs.unwrap_or_else(|| infinity.negative().clone()),
            rhs: rhs.unwrap_or_else(|| infinity.positive().clone()),
        }, entries))
        .unzip();
    let matrix = RationalMatrix::from_rows(nr_columns, entries).unwrap();

    ExactProblem::new(sense, offset, variables, sides, matrix, infinity).unwrap()
}

/// `min -x1 - x2` subject to `x1 + x2 <= 1` over binaries.
///
/// The relaxation has value `-1`, so does the integer program.
pub fn packing() -> ExactProblem {
    let binary = || variable(VariableType::Binary, RQ!(-1), RQ!(0), RQ!(1));
    problem(
        ObjectiveSense::Minimize,
        RQ!(0),
        vec![binary(), binary()],
        vec![(None, Some(RQ!(1)), vec![(0, RQ!(1)), (1, RQ!(1))])],
    )
}

/// A multidimensional knapsack, to be maximized.
///
/// ```text
/// max 5 x1 + 4 x2 + 3 x3
/// s.t. 2 x1 + 3 x2 +   x3 <= 5
///      4 x1 +   x2 + 2 x3 <= 11
///      3 x1 + 4 x2 + 2 x3 <= 8
///      x binary
/// ```
///
/// The optimum is `9` at `(1, 1, 0)`, the relaxation is fractional.
pub fn knapsack() -> ExactProblem {
    let binary = |objective| variable(VariableType::Binary, objective, RQ!(0), RQ!(1));
    problem(
        ObjectiveSense::Maximize,
        RQ!(0),
        vec![binary(RQ!(5)), binary(RQ!(4)), binary(RQ!(3))],
        vec![
            (None, Some(RQ!(5)), vec![(0, RQ!(2)), (1, RQ!(3)), (2, RQ!(1))]),
            (None, Some(RQ!(11)), vec![(0, RQ!(4)), (1, RQ!(1)), (2, RQ!(2))]),
            (None, Some(RQ!(8)), vec![(0, RQ!(3)), (1, RQ!(4)), (2, RQ!(2))]),
        ],
    )
}

/// An integer and an unbounded continuous variable, with an objective offset.
///
/// ```text
/// min x + y + 1/2
/// s.t. 2 x + y >= 7/2
///      x integer in [0, 10], y >= 0
/// ```
///
/// The relaxation has value `9/4` at `(7/4, 0)`, the optimum is `5/2` at `(2, 0)`.
pub fn mixed() -> ExactProblem {
    let infinity = InfinitySentinels::default();
    problem(
        ObjectiveSense::Minimize,
        RQ!(1, 2),
        vec![
            variable(VariableType::Integer, RQ!(1), RQ!(0), RQ!(10)),
            variable(VariableType::Continuous, RQ!(1), RQ!(0), infinity.positive().clone()),
        ],
        vec![(Some(RQ!(7, 2)), None, vec![(0, RQ!(2)), (1, RQ!(1))])],
    )
}

/// `min -x` subject to `2 x <= 5`, with the given bounds on the continuous `x`.
pub fn single_row(lower: Option<Rational>, upper: Option<Rational>) -> ExactProblem {
    let infinity = InfinitySentinels::default();
    let lower = lower.unwrap_or_else(|| infinity.negative().clone());
    let upper = upper.unwrap_or_else(|| infinity.positive().clone());
    problem(
        ObjectiveSense::Minimize,
        RQ!(0),
        vec![variable(VariableType::Continuous, RQ!(-1), lower, upper)],
        vec![(None, Some(RQ!(5)), vec![(0, RQ!(2))])],
    )
}

/// A free variable without objective in a row without sides: no dual component has a cost.
pub fn all_costs_infinite() -> ExactProblem {
    let infinity = InfinitySentinels::default();
    problem(
        ObjectiveSense::Minimize,
        RQ!(0),
        vec![variable(
            VariableType::Continuous, RQ!(0), infinity.negative().clone(), infinity.positive().clone(),
        )],
        vec![(None, None, vec![(0, RQ!(1))])],
    )
}
