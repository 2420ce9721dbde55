//! # Search
//!
//! The contract with the branch-and-bound search that drives the handler. The search owns the
//! tree, the floating point relaxation and the solution pools; the handler only queries and
//! modifies them through this trait.
//!
//! Objective values exchanged with the search are those of the internal minimization form, offset
//! included.
use crate::data::number_types::rational::Rational;

/// Operations of the branch-and-bound search that the handler uses.
pub trait SearchTree {
    /// Depth of the current node, the root has depth zero.
    fn depth(&self) -> usize;
    /// Objective value of the best known solution. Infinite if there is none.
    fn cutoff_bound(&self) -> f64;
    /// Current lower bound of the node.
    fn node_lower_bound(&self) -> f64;
    /// Raise the lower bound of the node; lower values are ignored by the search.
    fn update_node_lower_bound(&mut self, bound: f64);
    /// Floating point local bounds of a variable at the current node.
    fn local_bounds(&self, variable: usize) -> (f64, f64);
    /// Create two children: one with `x <= down_upper` and one with `x >= up_lower`.
    fn branch(&mut self, variable: usize, down_upper: f64, up_lower: f64);
    /// Offer a solution to the solution pools.
    ///
    /// # Arguments
    ///
    /// * `approximate`: Floating point values, for the generic pool.
    /// * `exact`: The same values exactly, for the certified pool.
    ///
    /// # Return value
    ///
    /// Whether the solution was accepted as a new incumbent.
    fn store_solution(&mut self, approximate: &[f64], exact: &[Rational]) -> bool;
}

/// Outcome of a handler call, as reported to the search.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum HandlerResult {
    /// The node can be pruned.
    Infeasible,
    /// The node relaxation solution is integral and feasible, no new incumbent.
    Feasible,
    /// An integral solution was found and stored as the new incumbent.
    SolutionFound,
    /// Two children were created.
    Branched,
    /// The lower bound of the node was raised.
    ImprovedLowerBound,
    /// Nothing useful was found.
    DidNotFind,
    /// The call doesn't apply in the current state.
    DidNotRun,
}
