//! # Building blocks to describe linear programs.
use std::ops::Not;

/// Direction of a bound.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BoundDirection {
    /// In the case of a variable, x >= b.
    Lower,
    /// In the case of a variable, x <= b.
    Upper,
}

impl Not for BoundDirection {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Lower => Self::Upper,
            Self::Upper => Self::Lower,
        }
    }
}

/// A variable is either continuous or integer, binary variables are integer variables with bounds
/// within `[0, 1]`.
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VariableType {
    Continuous,
    Integer,
    Binary,
}

impl VariableType {
    /// Whether values of this variable need to be integral in a feasible solution.
    #[must_use]
    pub fn is_integral(self) -> bool {
        match self {
            Self::Continuous => false,
            Self::Integer | Self::Binary => true,
        }
    }
}

/// Direction of optimization as provided by the user.
///
/// Problems are always stored as minimization problems internally.
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum ObjectiveSense {
    #[default]
    Minimize,
    Maximize,
}
