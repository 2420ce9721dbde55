//! # Pending bound changes
//!
//! Local bound changes raised by the search are collected here and applied in one pass, right
//! before the exact data is needed.
use crate::data::linear_program::elements::BoundDirection;
use crate::data::number_types::rational::Rational;

/// At most one pending value per variable and bound direction.
///
/// A later change of the same bound overwrites the earlier one. Changes are handed out ordered by
/// the moment a variable was first touched since the last drain.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingBoundChanges {
    lower: Vec<Option<Rational>>,
    upper: Vec<Option<Rational>>,
    /// Variables with at least one pending change, each at most once.
    queue: Vec<usize>,
}

impl PendingBoundChanges {
    /// Create an empty buffer for a number of variables.
    #[must_use]
    pub fn new(nr_variables: usize) -> Self {
        Self {
            lower: vec![None; nr_variables],
            upper: vec![None; nr_variables],
            queue: Vec::new(),
        }
    }

    /// Record a new value for a bound, replacing a pending value for the same bound.
    pub fn push(&mut self, variable: usize, direction: BoundDirection, value: Rational) {
        debug_assert!(variable < self.lower.len());

        if self.lower[variable].is_none() && self.upper[variable].is_none() {
            self.queue.push(variable);
        }
        let slot = match direction {
            BoundDirection::Lower => &mut self.lower[variable],
            BoundDirection::Upper => &mut self.upper[variable],
        };
        *slot = Some(value);
    }

    /// Take out all pending changes, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<(usize, BoundDirection, Rational)> {
        let mut changes = Vec::with_capacity(self.queue.len());
        for variable in self.queue.drain(..) {
            if let Some(value) = self.lower[variable].take() {
                changes.push((variable, BoundDirection::Lower, value));
            }
            if let Some(value) = self.upper[variable].take() {
                changes.push((variable, BoundDirection::Upper, value));
            }
        }

        changes
    }

    /// Whether no changes are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of variables with a pending change.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
