//! Assignment strategy comparison.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::assignment::{
    build_cost_matrix, solve_assignment, AssignmentAlgorithm, LocalSearchConfig,
};
use crate::error::Result;
use crate::evaluator::BoundedEvaluator;
use crate::models::{Assignment, Clique, GridMap, Node};
use crate::router::Router;

/// Costs of one strategy on a fixed clique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentReport {
    /// Strategy used.
    pub algorithm: AssignmentAlgorithm,
    /// Resulting assignment.
    pub assignment: Assignment,
    /// Goal node per agent.
    pub goals: Vec<Node>,
    /// Heuristic (collision-ignorant) cost.
    pub heuristic_cost: u64,
    /// Exact planner cost; `None` when the planner timed out.
    pub exact_cost: Option<u64>,
    /// Time spent in the assignment algorithm, in seconds.
    pub solve_secs: f64,
}

/// Runs each of `algorithms` on `clique` and evaluates the result once.
pub fn compare_assignments(
    map: &GridMap,
    starts: &[Node],
    clique: &Clique,
    router: &dyn Router,
    evaluator: &BoundedEvaluator,
    algorithms: &[AssignmentAlgorithm],
    local_search: &LocalSearchConfig,
) -> Result<Vec<AssignmentReport>> {
    let matrix = build_cost_matrix(map, starts, clique.nodes(), router)?;

    algorithms
        .iter()
        .map(|&algorithm| {
            let started = Instant::now();
            let outcome = solve_assignment(&matrix, algorithm, local_search)?;
            let solve_secs = started.elapsed().as_secs_f64();
            let goals = outcome.assignment.goals_in(clique)?;
            let exact_cost = evaluator.evaluate(map, starts, &goals)?.cost();
            log::info!(
                "{algorithm}: heuristic {:?}, exact {exact_cost:?}",
                outcome.cost
            );
            Ok(AssignmentReport {
                algorithm,
                heuristic_cost: outcome.cost.unwrap_or_default(),
                assignment: outcome.assignment,
                goals,
                exact_cost,
                solve_secs,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::CancelToken;
    use crate::router::GridRouter;

    fn manhattan(_: &GridMap, s: &[Node], g: &[Node], _: &CancelToken) -> Result<u64> {
        Ok(s.iter()
            .zip(g)
            .map(|(a, b)| u64::from(a.x.abs_diff(b.x) + a.y.abs_diff(b.y)))
            .sum())
    }

    #[test]
    fn test_hungarian_vs_random() {
        let map = GridMap::open(5, 5);
        let starts = [Node::new(0, 0), Node::new(4, 4), Node::new(4, 0)];
        let clique = Clique::from_nodes(vec![Node::new(1, 1), Node::new(3, 3), Node::new(3, 1)]);
        let evaluator = BoundedEvaluator::new(manhattan);
        let reports = compare_assignments(
            &map,
            &starts,
            &clique,
            &GridRouter,
            &evaluator,
            &[AssignmentAlgorithm::Hungarian, AssignmentAlgorithm::Random],
            &LocalSearchConfig::default().with_seed(42),
        )
        .unwrap();

        assert_eq!(reports.len(), 2);
        let hungarian = &reports[0];
        assert_eq!(hungarian.algorithm, AssignmentAlgorithm::Hungarian);
        assert_eq!(hungarian.heuristic_cost, 6);
        assert_eq!(hungarian.exact_cost, Some(6));
        assert_eq!(
            hungarian.goals,
            vec![Node::new(1, 1), Node::new(3, 3), Node::new(3, 1)]
        );
        assert!(reports[1].heuristic_cost >= hungarian.heuristic_cost);
    }
}
