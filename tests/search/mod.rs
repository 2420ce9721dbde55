//! # A minimal branch-and-bound search
//!
//! Depth first and without a floating point LP solver: every node is decided by the exact LP of
//! the handler, through `enforce_pseudo`.
use exactlp::data::linear_program::exact_problem::ExactProblem;
use exactlp::data::number_types::rational::Rational;
use exactlp::data::number_types::rounding::RoundingMode;
use exactlp::error::ExactLpError;
use exactlp::handler::ExactLpHandler;
use exactlp::search::{HandlerResult, SearchTree};

#[allow(missing_docs)]
mod test;

#[derive(Clone, Debug)]
struct Node {
    depth: usize,
    bounds: Vec<(f64, f64)>,
    lower_bound: f64,
}

/// Search state, objective values are those of the internal minimization form.
pub struct Search {
    objective: Vec<Rational>,
    offset: Rational,
    open: Vec<Node>,
    node: Node,
    cutoff: f64,
    pub incumbent: Option<Vec<Rational>>,
    pub nr_nodes: usize,
}

impl Search {
    pub fn new(problem: &ExactProblem) -> Self {
        let infinity = problem.infinity();
        let bounds = (0..problem.nr_variables())
            .map(|j| {
                let bounds = problem.bounds(j);
                (
                    infinity.to_f64(&bounds.global_lower, RoundingMode::Downward),
                    infinity.to_f64(&bounds.global_upper, RoundingMode::Upward),
                )
            })
            .collect();
        let root = Node { depth: 0, bounds, lower_bound: f64::NEG_INFINITY };

        Self {
            objective: (0..problem.nr_variables()).map(|j| problem.objective(j).clone()).collect(),
            offset: problem.objective_offset().clone(),
            open: vec![root.clone()],
            node: root,
            cutoff: f64::INFINITY,
            incumbent: None,
            nr_nodes: 0,
        }
    }

    /// Process nodes until none are left.
    pub fn run(&mut self, handler: &mut ExactLpHandler) -> Result<(), ExactLpError> {
        while let Some(node) = self.open.pop() {
            if node.lower_bound >= self.cutoff {
                continue;
            }
            self.node = node;
            self.nr_nodes += 1;

            let result = handler.enforce_pseudo(self)?;
            assert!(matches!(
                result,
                HandlerResult::Infeasible | HandlerResult::Feasible
                    | HandlerResult::SolutionFound | HandlerResult::Branched,
            ));
        }

        Ok(())
    }
}

impl SearchTree for Search {
    fn depth(&self) -> usize {
        self.node.depth
    }

    fn cutoff_bound(&self) -> f64 {
        self.cutoff
    }

    fn node_lower_bound(&self) -> f64 {
        self.node.lower_bound
    }

    fn update_node_lower_bound(&mut self, bound: f64) {
        self.node.lower_bound = self.node.lower_bound.max(bound);
    }

    fn local_bounds(&self, variable: usize) -> (f64, f64) {
        self.node.bounds[variable]
    }

    fn branch(&mut self, variable: usize, down_upper: f64, up_lower: f64) {
        let child = Node { depth: self.node.depth + 1, ..self.node.clone() };
        let mut up = child.clone();
        up.bounds[variable].0 = up_lower;
        let mut down = child;
        down.bounds[variable].1 = down_upper;

        self.open.push(up);
        self.open.push(down);
    }

    fn store_solution(&mut self, approximate: &[f64], exact: &[Rational]) -> bool {
        assert_eq!(approximate.len(), exact.len());

        let value = self.objective.iter()
            .zip(exact)
            .map(|(objective, value)| objective * value)
            .sum::<Rational>() + &self.offset;
        let value = value.to_f64(RoundingMode::Upward);
        if value < self.cutoff {
            self.cutoff = value;
            self.incumbent = Some(exact.to_vec());
            true
        } else {
            false
        }
    }
}
