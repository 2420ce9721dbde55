//! # Solutions
//!
//! The approximate solution of the floating point relaxation that drives the certification, and
//! the exact solutions that come out of it.
use crate::data::number_types::rational::Rational;
use crate::error::ExactLpError;
use crate::lp_interface::Basis;

/// Outcome of the floating point relaxation solve.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RelaxationStatus {
    /// An optimal primal and dual solution are available.
    Optimal,
    /// The relaxation was reported infeasible, which needs exact confirmation.
    Infeasible,
    /// Anything else, no dual information can be used.
    Unsolved,
}

/// Approximate solution of the linear relaxation at the current node, as computed by the floating
/// point LP solver of the search.
///
/// All values refer to the minimization form of the problem. A positive row dual belongs to the
/// left hand side of a row, a negative one to the right hand side. Reduced costs are
/// `c - A^T y`.
#[derive(Clone, Debug, PartialEq)]
pub struct LpRelaxation {
    /// Status reported by the solver.
    pub status: RelaxationStatus,
    /// Objective value reported by the solver.
    pub objective: f64,
    /// One value per variable.
    pub primal: Vec<f64>,
    /// One value per row.
    pub row_duals: Vec<f64>,
    /// One value per variable.
    pub reduced_costs: Vec<f64>,
    /// Final basis, if the solver exposes it.
    pub basis: Option<Basis>,
}

impl LpRelaxation {
    /// A relaxation without any information, for when only the status is known.
    #[must_use]
    pub fn without_solution(status: RelaxationStatus) -> Self {
        Self {
            status,
            objective: f64::NAN,
            primal: Vec::new(),
            row_duals: Vec::new(),
            reduced_costs: Vec::new(),
            basis: None,
        }
    }

    /// Verify that the solution vectors match the problem dimensions.
    ///
    /// The basis is not checked; a basis of the wrong shape is stale and simply not used.
    ///
    /// # Errors
    ///
    /// If the primal values, duals or reduced costs have the wrong length.
    pub fn check_dimensions(&self, nr_rows: usize, nr_variables: usize) -> Result<(), ExactLpError> {
        for (what, expected, actual) in [
            ("relaxation primal values", nr_variables, self.primal.len()),
            ("relaxation row duals", nr_rows, self.row_duals.len()),
            ("relaxation reduced costs", nr_variables, self.reduced_costs.len()),
        ] {
            if expected != actual {
                return Err(ExactLpError::Dimension { what, expected, actual });
            }
        }

        Ok(())
    }
}

/// An exact solution of the relaxation at a node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExactSolution {
    /// Objective value for minimization, without the offset.
    pub objective: Rational,
    /// One value per variable.
    pub values: Vec<Rational>,
}
