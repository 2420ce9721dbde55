//! # Pseudo objective
//!
//! Objective value of the point where every variable sits at the local bound that is best for the
//! objective. It bounds the objective of the node from below without solving anything, and is
//! maintained incrementally as bounds change.
use num_traits::Zero;

use crate::data::linear_program::elements::BoundDirection;
use crate::data::linear_program::exact_problem::ExactProblem;
use crate::data::number_types::infinity::InfinitySentinels;
use crate::data::number_types::rational::Rational;

/// Running sum of `objective * best bound` over all variables with a nonzero objective.
///
/// Infinite best bounds are not added to the sum, they are counted instead. While that count is
/// positive, the pseudo objective is minus infinity.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PseudoObjective {
    finite_part: Rational,
    nr_infinite_contributions: usize,
}

impl PseudoObjective {
    /// Compute from scratch using the local bounds.
    #[must_use]
    pub fn new(problem: &ExactProblem) -> Self {
        let mut pseudo_objective = Self {
            finite_part: Rational::zero(),
            nr_infinite_contributions: 0,
        };

        for j in 0..problem.nr_variables() {
            let bounds = problem.bounds(j);
            if let Some(direction) = best_bound_direction(&bounds.objective) {
                pseudo_objective.add(&bounds.objective, bounds.local(direction), problem.infinity());
            }
        }

        pseudo_objective
    }

    /// Account for a change of the local bound of a variable.
    ///
    /// Only changes of the bound that the variable would take in the pseudo solution have an
    /// effect.
    ///
    /// # Arguments
    ///
    /// * `objective`: Objective coefficient of the variable.
    /// * `direction`: Which bound changed.
    /// * `old`: Previous value of that bound.
    /// * `new`: New value of that bound.
    /// * `infinity`: Values representing infinity.
    pub fn update(
        &mut self,
        objective: &Rational,
        direction: BoundDirection,
        old: &Rational,
        new: &Rational,
        infinity: &InfinitySentinels,
    ) {
        if best_bound_direction(objective) == Some(direction) && old != new {
            self.remove(objective, old, infinity);
            self.add(objective, new, infinity);
        }
    }

    fn add(&mut self, objective: &Rational, bound: &Rational, infinity: &InfinitySentinels) {
        if infinity.is_infinite(bound) {
            self.nr_infinite_contributions += 1;
        } else {
            self.finite_part += objective * bound;
        }
    }

    fn remove(&mut self, objective: &Rational, bound: &Rational, infinity: &InfinitySentinels) {
        if infinity.is_infinite(bound) {
            debug_assert!(self.nr_infinite_contributions > 0);
            self.nr_infinite_contributions -= 1;
        } else {
            self.finite_part -= objective * bound;
        }
    }

    /// The pseudo objective value.
    ///
    /// # Return value
    ///
    /// `None` if it is minus infinity.
    #[must_use]
    pub fn value(&self) -> Option<&Rational> {
        if self.nr_infinite_contributions == 0 {
            Some(&self.finite_part)
        } else {
            None
        }
    }

    /// Number of variables whose best bound is infinite.
    #[must_use]
    pub fn nr_infinite_contributions(&self) -> usize {
        self.nr_infinite_contributions
    }
}

/// Bound at which a variable minimizes its objective contribution, if it contributes.
fn best_bound_direction(objective: &Rational) -> Option<BoundDirection> {
    if objective.is_positive() {
        Some(BoundDirection::Lower)
    } else if objective.is_negative() {
        Some(BoundDirection::Upper)
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::elements::BoundDirection;
    use crate::data::linear_program::pseudo_objective::PseudoObjective;
    use crate::RQ;
    use crate::tests::problem_1;

    #[test]
    fn incremental_equals_from_scratch() {
        let mut problem = problem_1::create();
        let mut pseudo_objective = PseudoObjective::new(&problem);
        // min -x1 - x2 with both variables in [0, 1]
        assert_eq!(pseudo_objective.value(), Some(&RQ!(-2)));

        let old = problem.bounds(0).local_upper.clone();
        problem.set_local_bound(0, BoundDirection::Upper, RQ!(0));
        pseudo_objective.update(
            &problem.bounds(0).objective.clone(),
            BoundDirection::Upper,
            &old,
            &RQ!(0),
            &problem.infinity().clone(),
        );
        assert_eq!(pseudo_objective, PseudoObjective::new(&problem));
        assert_eq!(pseudo_objective.value(), Some(&RQ!(-1)));
    }

    #[test]
    fn lower_bound_changes_are_ignored_for_negative_objective() {
        let problem = problem_1::create();
        let mut pseudo_objective = PseudoObjective::new(&problem);
        pseudo_objective.update(
            problem.objective(0),
            BoundDirection::Lower,
            &RQ!(0),
            &RQ!(1),
            problem.infinity(),
        );
        assert_eq!(pseudo_objective.value(), Some(&RQ!(-2)));
    }

    #[test]
    fn infinite_contributions() {
        let problem = crate::tests::problem_2::create();
        let mut pseudo_objective = PseudoObjective::new(&problem);
        assert_eq!(pseudo_objective.nr_infinite_contributions(), 1);
        assert_eq!(pseudo_objective.value(), None);

        let infinity = problem.infinity();
        pseudo_objective.update(
            problem.objective(0),
            BoundDirection::Upper,
            infinity.positive(),
            &RQ!(3),
            infinity,
        );
        assert_eq!(pseudo_objective.nr_infinite_contributions(), 0);
        assert_eq!(pseudo_objective.value(), Some(&RQ!(-3)));
    }
}
