//! # Errors
//!
//! Failures that can't be recovered from at the level of this crate. Failures of a single dual
//! bounding method that still allow the search to continue with another method are not reported
//! through this type, see `InteriorPointState::Failed`.
use thiserror::Error;

use crate::lp_interface::LpStatus;
use crate::settings::{ColumnSelection, InteriorPointFormulation};

/// Unrecoverable failure of an exact computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExactLpError {
    /// The exact LP solve ended in a status that can't be used to derive a sound conclusion.
    #[error("exact LP solver terminated with unhandled status {status:?}")]
    ExactLp {
        /// Status reported by the solver.
        status: LpStatus,
    },
    /// The auxiliary LP of the interior point construction ran into a limit or numerical trouble.
    #[error("auxiliary LP solver terminated with unhandled status {status:?}")]
    AuxiliaryLp {
        /// Status reported by the solver.
        status: LpStatus,
    },
    /// An integral exact solution value can't be stored in floating point without loss.
    #[error("value {value} of variable {variable} is not representable as a floating point number")]
    Unrepresentable {
        /// Index of the variable.
        variable: usize,
        /// The exact value, formatted.
        value: String,
    },
    /// A column selection policy was configured that is not available.
    #[error("column selection policy {0:?} is not implemented")]
    UnsupportedColumnSelection(ColumnSelection),
    /// An interior point formulation was configured that is not available.
    #[error("interior point formulation {0:?} is not implemented")]
    UnsupportedInteriorPoint(InteriorPointFormulation),
    /// Input data of inconsistent size.
    #[error("{what}: expected length {expected}, got {actual}")]
    Dimension {
        /// What was being checked.
        what: &'static str,
        /// Length that was expected.
        expected: usize,
        /// Length that was provided.
        actual: usize,
    },
}
