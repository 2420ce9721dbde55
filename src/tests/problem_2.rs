//! A single free continuous variable.
//!
//! ```text
//! min -x
//! s.t. 2 x <= 5
//! ```
//!
//! The optimal value is `-5/2`; only the right hand side of the row has a finite dual cost.
use crate::data::linear_algebra::matrix::RationalMatrix;
use crate::data::linear_program::elements::{ObjectiveSense, VariableType};
use crate::data::linear_program::exact_problem::{ExactProblem, ExactRow, Variable};
use crate::data::linear_program::solution::{LpRelaxation, RelaxationStatus};
use crate::data::number_types::infinity::InfinitySentinels;
use crate::lp_interface::{Basis, BasisStatus};
use crate::RQ;

pub fn create() -> ExactProblem {
    let infinity = InfinitySentinels::default();

    ExactProblem::new(
        ObjectiveSense::Minimize,
        RQ!(0),
        vec![Variable {
            variable_type: VariableType::Continuous,
            objective: RQ!(-1),
            lower: infinity.negative().clone(),
            upper: infinity.positive().clone(),
        }],
        vec![ExactRow { lhs: infinity.negative().clone(), rhs: RQ!(5) }],
        RationalMatrix::from_rows(1, vec![vec![(0, RQ!(2))]]).unwrap(),
        infinity,
    ).unwrap()
}

pub fn relaxation() -> LpRelaxation {
    LpRelaxation {
        status: RelaxationStatus::Optimal,
        objective: -2.5,
        primal: vec![2.5],
        row_duals: vec![-0.5],
        reduced_costs: vec![0.0],
        basis: Some(Basis {
            columns: vec![BasisStatus::Basic],
            rows: vec![BasisStatus::Upper],
        }),
    }
}
