//! # Fixture problems shared by the unit tests.
//!
//! Each module provides `create()`, the exact problem, and `relaxation()`, the floating point
//! optimum of its root relaxation as a solver would report it. Small one-off problems are built
//! with `continuous`.
use crate::data::linear_algebra::matrix::RationalMatrix;
use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_program::elements::{ObjectiveSense, VariableType};
use crate::data::linear_program::exact_problem::{ExactProblem, ExactRow, Variable};
use crate::data::number_types::infinity::InfinitySentinels;
use crate::data::number_types::rational::Rational;
use crate::RQ;

pub mod problem_2;

/// Continuous variables given by objective and bounds, `None` for an infinite bound.
pub fn continuous(
    variables: Vec<(Rational, Option<Rational>, Option<Rational>)>,
    rows: Vec<(Option<Rational>, Option<Rational>, Vec<SparseTuple<Rational>>)>,
) -> ExactProblem {
    let infinity = InfinitySentinels::default();
    let nr_columns = variables.len();
    let variables = variables.into_iter()
        .map(|(objective, lower, upper)| Variable {
            variable_type: VariableType::Continuous,
            objective,
            lower: lower.unwrap_or_else(|| infinity.negative().clone()),
            upper: upper.unwrap_or_else(|| infinity.positive().clone()),
        })
        .collect();
    let (sides, entries): (Vec<_>, Vec<_>) = rows.into_iter()
        .map(|(lhs, rhs, entries)| (ExactRow {
            lhs: lhs.unwrap_or_else(|| infinity.negative().clone()),
            rhs: rhs.unwrap_or_else(|| infinity.positive().clone()),
        }, entries))
        .unzip();
    let matrix = RationalMatrix::from_rows(nr_columns, entries).unwrap();

    ExactProblem::new(ObjectiveSense::Minimize, RQ!(0), variables, sides, matrix, infinity).unwrap()
}
