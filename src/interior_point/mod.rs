//! # Interior point
//!
//! A point `y` in the extended dual with `D y = c`, `y >= 0` that is strictly positive on a
//! selected set `S` of components, together with an LU factorization of the columns of `D` in
//! `S`. Project-and-shift uses the factorization to make an approximate dual solution satisfy the
//! equality constraints, and the interior point to then make it nonnegative.
//!
//! The point doesn't depend on the bounds at a node and is built at most once.
use log::{info, warn};

use crate::algorithm::lower_upper::LUDecomposition;
use crate::certify::extended_dual::ExtendedDual;
use crate::data::linear_program::exact_problem::{ExactProblem, NodeBounds};
use crate::data::linear_program::solution::{ExactSolution, LpRelaxation};
use crate::data::number_types::rational::Rational;
use crate::error::ExactLpError;
use crate::settings::{InteriorPointFormulation, Settings};

pub mod column_selection;
mod auxiliary;

/// Why an interior point couldn't be built.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum InteriorPointFailure {
    /// No component was selected.
    EmptySelection,
    /// The column selection needs a root solution that doesn't exist.
    NoRootSolution,
    /// The selected columns of `D` don't have full row rank.
    Factorization,
    /// The auxiliary problem is infeasible or unbounded: the dual has no feasible point.
    AuxiliaryInfeasible,
    /// The best point found is zero on a selected component.
    NoInteriorPoint,
    /// The point found doesn't satisfy `D y = c`, `y >= 0`.
    NotDualFeasible,
}

/// A successfully built interior point.
#[derive(Clone, Debug)]
pub struct InteriorPointData {
    /// The selected components `S`, sorted.
    basis_mapping: Vec<usize>,
    /// Factorization of the columns of `D` at `basis_mapping`.
    lu: LUDecomposition,
    /// One value per component of the extended dual.
    interior_point: Vec<Rational>,
    /// Smallest value of the interior point on `S`, positive.
    common_slack: Rational,
}

impl InteriorPointData {
    /// Selected components, sorted.
    #[must_use]
    pub fn basis_mapping(&self) -> &[usize] {
        &self.basis_mapping
    }

    /// Factorization of the selected columns of `D`.
    #[must_use]
    pub fn lu(&self) -> &LUDecomposition {
        &self.lu
    }

    /// The interior point, one value per extended dual component.
    #[must_use]
    pub fn interior_point(&self) -> &[Rational] {
        &self.interior_point
    }

    /// Smallest value of the interior point on the selected components.
    #[must_use]
    pub fn common_slack(&self) -> &Rational {
        &self.common_slack
    }

    /// Whether a component is selected.
    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.basis_mapping.binary_search(&index).is_ok()
    }
}

/// Lifecycle of the interior point.
#[derive(Clone, Debug, Default)]
pub enum InteriorPointState {
    /// Not attempted yet.
    #[default]
    NotBuilt,
    #[allow(missing_docs)]
    Built(InteriorPointData),
    /// Attempted without success, project-and-shift is not available. Never retried.
    Failed(InteriorPointFailure),
}

impl InteriorPointState {
    /// The interior point, if it was built.
    #[must_use]
    pub fn data(&self) -> Option<&InteriorPointData> {
        match self {
            Self::Built(data) => Some(data),
            Self::NotBuilt | Self::Failed(_) => None,
        }
    }

    /// Whether building was attempted.
    #[must_use]
    pub fn is_attempted(&self) -> bool {
        !matches!(self, Self::NotBuilt)
    }
}

/// Build the interior point.
///
/// # Arguments
///
/// * `settings`: Selects the column selection policy, the formulation and the solve limits.
/// * `extended`: Layout of the extended dual.
/// * `problem`: Exact problem, only its global bounds are used.
/// * `root_solution`: Exact optimum at the root, used by some column selection policies.
/// * `root_relaxation`: Floating point optimum at the root, used by some column selection
/// policies.
///
/// # Return value
///
/// `Built` or `Failed`, never `NotBuilt`.
///
/// # Errors
///
/// If a policy is configured that is not available, or an exact solve of an auxiliary problem
/// reached a limit.
pub fn build(
    settings: &Settings,
    extended: &ExtendedDual,
    problem: &ExactProblem,
    root_solution: Option<&ExactSolution>,
    root_relaxation: Option<&LpRelaxation>,
) -> Result<InteriorPointState, ExactLpError> {
    if settings.interior_point == InteriorPointFormulation::AnalyticCenter {
        return Err(ExactLpError::UnsupportedInteriorPoint(settings.interior_point));
    }

    let costs = extended.costs(problem, &NodeBounds::global(problem));
    let selection = column_selection::select(
        settings.column_selection, extended, problem, &costs, root_solution, root_relaxation,
    )?;
    let result = match selection {
        None => Err(InteriorPointFailure::NoRootSolution),
        Some(selection) if selection.is_empty() => Err(InteriorPointFailure::EmptySelection),
        Some(selection) => construct(settings, extended, problem, &costs, selection)?,
    };

    Ok(match result {
        Ok(data) => {
            info!(
                "built an interior point positive on {} of {} dual components, common slack {}, {} nonzeros in U",
                data.basis_mapping.len(), extended.len(), data.common_slack, data.lu.nnz_upper(),
            );
            InteriorPointState::Built(data)
        },
        Err(reason) => {
            warn!("project-and-shift is not available: {reason:?}");
            InteriorPointState::Failed(reason)
        },
    })
}

/// Factorize, solve the auxiliary problem and verify.
fn construct(
    settings: &Settings,
    extended: &ExtendedDual,
    problem: &ExactProblem,
    costs: &[Option<Rational>],
    basis_mapping: Vec<usize>,
) -> Result<Result<InteriorPointData, InteriorPointFailure>, ExactLpError> {
    let columns = basis_mapping.iter()
        .map(|&k| extended.column(k).to_vec())
        .collect::<Vec<_>>();
    let Some(lu) = LUDecomposition::decompose(extended.nr_variables(), &columns) else {
        return Ok(Err(InteriorPointFailure::Factorization));
    };

    let interior_point = auxiliary::interior_point(
        settings.interior_point,
        extended,
        problem,
        costs,
        &basis_mapping,
        settings.interiorness_weight,
        settings.auxiliary_lp_limits,
    )?;
    let Some(interior_point) = interior_point else {
        return Ok(Err(InteriorPointFailure::AuxiliaryInfeasible));
    };

    let common_slack = basis_mapping.iter()
        .map(|&k| &interior_point[k])
        .min()
        .cloned();
    let Some(common_slack) = common_slack.filter(Rational::is_positive) else {
        return Ok(Err(InteriorPointFailure::NoInteriorPoint));
    };
    if !extended.is_feasible(problem, &interior_point) {
        return Ok(Err(InteriorPointFailure::NotDualFeasible));
    }

    Ok(Ok(InteriorPointData { basis_mapping, lu, interior_point, common_slack }))
}
