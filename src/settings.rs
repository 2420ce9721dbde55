//! # Settings
//!
//! Configuration of the exact handler. All options have defaults; the option enums can be parsed
//! from the command line of an embedding application when the `clap` feature is enabled.
use enum_map::Enum;

use crate::lp_interface::SolveLimits;

/// How the dual bound at a node is certified.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Enum)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum DualBoundMethod {
    /// Pick a method per call, based on the bounds of the problem and the availability of an
    /// interior point.
    #[default]
    Automatic,
    /// Check the basis of the floating point relaxation for exact dual feasibility.
    VerifyBasis,
    /// Bound the relaxation with the approximate duals in interval arithmetic.
    IntervalNeumaierShcherbina,
    /// Repair the approximate duals in exact arithmetic using the variable bounds.
    ExactNeumaierShcherbina,
    /// Project the approximate duals onto the equality constraints and shift them toward an
    /// interior point.
    ProjectAndShift,
    /// Solve the relaxation exactly.
    ExactLp,
}

/// Dual variables that the interior point of project-and-shift should be strictly positive on.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ColumnSelection {
    /// Every dual variable of which the bound or side is finite.
    #[default]
    AllFiniteCost,
    /// Dual variables of the constraints that are tight at the exact optimum of the root.
    ActiveAtRootExactLp,
    /// Dual variables of the constraints that are tight at the floating point optimum of the root.
    ActiveAtRootApproximateLp,
    /// Dual variables of the constraints that are tight at the current node. Not available.
    ActiveAtCurrentNode,
}

/// Auxiliary problem that is solved to find the interior point of project-and-shift.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum InteriorPointFormulation {
    /// Maximize the smallest selected dual variable.
    #[default]
    Arbitrary,
    /// As `Arbitrary`, solved through its dual.
    ArbitraryDualForm,
    /// Maximize a weighted sum of the smallest selected dual variable and the dual objective.
    Optimized,
    /// Maximize the smallest selected dual variable, then the dual objective while keeping half of
    /// that interiorness.
    TwoStage,
    /// The analytic center of the dual feasible region. Not available.
    AnalyticCenter,
}

/// How the convex combination with the interior point is chosen.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ShiftStrategy {
    /// A single factor from the largest violation and the smallest interior point value.
    CommonSlack,
    /// The smallest factor that repairs every violated component.
    #[default]
    PerComponent,
}

/// Options of the exact handler.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Settings {
    /// Which method certifies dual bounds.
    pub dual_bound_method: DualBoundMethod,
    /// Dual variables the interior point is positive on.
    pub column_selection: ColumnSelection,
    /// How the interior point is computed.
    pub interior_point: InteriorPointFormulation,
    /// How approximate duals are shifted toward the interior point.
    pub shift: ShiftStrategy,
    /// Whether to reduce pairs of dual values of the two sides of a row or bound.
    pub reduce_complementary_duals: bool,
    /// Weight of the dual objective relative to interiorness in the `Optimized` formulation.
    pub interiorness_weight: f64,
    /// Approximate dual values with at most this magnitude are treated as zero by the interval
    /// method.
    pub dual_zero_tolerance: f64,
    /// Limits for every exact solve of the relaxation.
    pub exact_lp_limits: SolveLimits,
    /// Limits for every exact solve of an auxiliary problem.
    pub auxiliary_lp_limits: SolveLimits,
    /// Whether the output of project-and-shift is checked for exact dual feasibility, which is
    /// always done in debug builds.
    pub verify_dual_feasibility: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dual_bound_method: DualBoundMethod::default(),
            column_selection: ColumnSelection::default(),
            interior_point: InteriorPointFormulation::default(),
            shift: ShiftStrategy::default(),
            reduce_complementary_duals: true,
            interiorness_weight: 0.5,
            dual_zero_tolerance: 1e-9,
            exact_lp_limits: SolveLimits::default(),
            auxiliary_lp_limits: SolveLimits::default(),
            verify_dual_feasibility: cfg!(debug_assertions),
        }
    }
}
