//! Clique ranking by exact (or estimated) cost.

use serde::{Deserialize, Serialize};

use crate::assignment::{build_cost_matrix, solve_assignment_optimal};
use crate::error::{RendezvousError, Result};
use crate::evaluator::{BoundedEvaluator, EvaluationOutcome};
use crate::graph::ConnectivityGraph;
use crate::models::{round2, Assignment, Clique, GridMap, Node};
use crate::placement::enumerate_all_cliques;
use crate::router::Router;

/// One ranked clique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedClique {
    /// The goal placement.
    pub clique: Clique,
    /// Optimal assignment on the heuristic matrix.
    pub assignment: Assignment,
    /// Heuristic (collision-ignorant) cost of that assignment.
    pub heuristic_cost: u64,
    /// Ranking cost: exact when the planner finished, else the heuristic.
    pub cost: u64,
    /// Whether `cost` is the heuristic stand-in for a timed-out evaluation.
    pub estimated: bool,
    /// Position between best (1.0) and worst (0.0) clique.
    pub optimality: f64,
}

/// All cliques of one instance, cheapest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliqueRanking {
    entries: Vec<RankedClique>,
}

impl CliqueRanking {
    /// Ranks pre-costed entries (ascending cost, stable) and fills in
    /// their optimality factors.
    pub fn from_entries(mut entries: Vec<RankedClique>) -> Self {
        entries.sort_by_key(|e| e.cost);
        let best = entries.first().map_or(0, |e| e.cost);
        let worst = entries.last().map_or(0, |e| e.cost);
        for e in &mut entries {
            e.optimality = optimality_factor(e.cost, best, worst);
        }
        Self { entries }
    }

    /// Ranked entries.
    pub fn entries(&self) -> &[RankedClique] {
        &self.entries
    }

    /// Number of ranked cliques.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no clique was ranked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cheapest entry.
    pub fn best(&self) -> Option<&RankedClique> {
        self.entries.first()
    }

    /// Most expensive entry.
    pub fn worst(&self) -> Option<&RankedClique> {
        self.entries.last()
    }

    /// Entry for `clique`, if it was ranked.
    pub fn find(&self, clique: &Clique) -> Option<&RankedClique> {
        self.entries.iter().find(|e| &e.clique == clique)
    }

    /// Optimality factor of `clique`, if it was ranked.
    pub fn factor_of(&self, clique: &Clique) -> Option<f64> {
        self.find(clique).map(|e| e.optimality)
    }
}

/// `1 - (cost - best) / (worst - best)`, rounded to two decimals.
///
/// Returns 1.0 when `best == worst`.
pub fn optimality_factor(cost: u64, best: u64, worst: u64) -> f64 {
    if worst == best {
        return 1.0;
    }
    let span = worst as f64 - best as f64;
    round2(1.0 - (cost as f64 - best as f64) / span)
}

/// Enumerates every k-clique, assigns it optimally on the heuristic matrix
/// and evaluates that assignment once with `evaluator`.
///
/// Timed-out evaluations fall back to the heuristic cost and are flagged
/// as estimated. Cliques with a goal unreachable from some start are
/// skipped.
pub fn rank_cliques(
    graph: &ConnectivityGraph,
    map: &GridMap,
    starts: &[Node],
    router: &dyn Router,
    evaluator: &BoundedEvaluator,
) -> Result<CliqueRanking> {
    let cliques = enumerate_all_cliques(graph, starts.len());
    log::info!("ranking {} cliques of size {}", cliques.len(), starts.len());

    let mut entries = Vec::with_capacity(cliques.len());
    for (i, clique) in cliques.into_iter().enumerate() {
        let matrix = match build_cost_matrix(map, starts, clique.nodes(), router) {
            Ok(m) => m,
            Err(RendezvousError::Unreachable { start, goal }) => {
                log::debug!("skipping clique {}: {goal} unreachable from {start}", i + 1);
                continue;
            }
            Err(e) => return Err(e),
        };
        let optimal = solve_assignment_optimal(&matrix)?;
        let heuristic_cost = optimal.cost.unwrap_or_default();
        let goals = optimal.assignment.goals_in(&clique)?;

        let (cost, estimated) = match evaluator.evaluate(map, starts, &goals)? {
            EvaluationOutcome::Completed(c) => (c, false),
            EvaluationOutcome::TimedOut => (heuristic_cost, true),
        };
        log::debug!(
            "clique {}: heuristic {heuristic_cost}, cost {cost}{}",
            i + 1,
            if estimated { " (estimated)" } else { "" }
        );
        entries.push(RankedClique {
            clique,
            assignment: optimal.assignment,
            heuristic_cost,
            cost,
            estimated,
            optimality: 0.0,
        });
    }

    Ok(CliqueRanking::from_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::CancelToken;
    use crate::graph::ConnectionCriterion;
    use crate::router::GridRouter;
    use std::thread;
    use std::time::Duration;

    fn manhattan(_: &GridMap, s: &[Node], g: &[Node], _: &CancelToken) -> Result<u64> {
        Ok(s.iter()
            .zip(g)
            .map(|(a, b)| u64::from(a.x.abs_diff(b.x) + a.y.abs_diff(b.y)))
            .sum())
    }

    #[test]
    fn test_optimality_factor() {
        assert_eq!(optimality_factor(10, 10, 20), 1.0);
        assert_eq!(optimality_factor(20, 10, 20), 0.0);
        assert_eq!(optimality_factor(13, 10, 20), 0.7);
        assert_eq!(optimality_factor(5, 5, 5), 1.0);
        assert_eq!(optimality_factor(11, 10, 13), 0.67);
    }

    #[test]
    fn test_rank_corridor() {
        let map = GridMap::open(4, 1);
        let starts = [Node::new(0, 0), Node::new(1, 0)];
        let g = ConnectivityGraph::build(
            &map,
            ConnectionCriterion::PathLength { threshold: 1.0 },
            &GridRouter,
        )
        .unwrap();
        let evaluator = BoundedEvaluator::new(manhattan);
        let ranking = rank_cliques(&g, &map, &starts, &GridRouter, &evaluator).unwrap();

        assert_eq!(ranking.len(), 3);
        let best = ranking.best().unwrap();
        assert_eq!(best.clique.nodes(), &[Node::new(0, 0), Node::new(1, 0)]);
        assert_eq!(best.cost, 0);
        assert_eq!(best.optimality, 1.0);
        let worst = ranking.worst().unwrap();
        assert_eq!(worst.cost, 4);
        assert_eq!(worst.optimality, 0.0);
        assert!(ranking.entries().windows(2).all(|w| w[0].cost <= w[1].cost));
        assert!(ranking.entries().iter().all(|e| !e.estimated));

        let middle = Clique::from_nodes(vec![Node::new(1, 0), Node::new(2, 0)]);
        assert_eq!(ranking.factor_of(&middle), Some(0.5));
    }

    #[test]
    fn test_timeout_marks_estimated() {
        let map = GridMap::open(3, 1);
        let starts = [Node::new(0, 0), Node::new(2, 0)];
        let g = ConnectivityGraph::build(&map, ConnectionCriterion::None, &GridRouter).unwrap();
        let slow = |_: &GridMap, _: &[Node], _: &[Node], c: &CancelToken| -> Result<u64> {
            while !c.is_cancelled() {
                thread::sleep(Duration::from_millis(5));
            }
            Ok(0)
        };
        let evaluator = BoundedEvaluator::new(slow)
            .with_timeout(Duration::from_millis(20))
            .with_poll_interval(Duration::from_millis(5));
        let ranking = rank_cliques(&g, &map, &starts, &GridRouter, &evaluator).unwrap();
        assert_eq!(ranking.len(), 3);
        for e in ranking.entries() {
            assert!(e.estimated);
            assert_eq!(e.cost, e.heuristic_cost);
        }
    }

    #[test]
    fn test_unreachable_cliques_skipped() {
        let map = GridMap::from_ascii(". . @ .\n").unwrap();
        let starts = [Node::new(0, 0)];
        let g = ConnectivityGraph::build(&map, ConnectionCriterion::None, &GridRouter).unwrap();
        let evaluator = BoundedEvaluator::new(manhattan);
        let ranking = rank_cliques(&g, &map, &starts, &GridRouter, &evaluator).unwrap();
        assert_eq!(ranking.len(), 2);
        assert!(ranking.find(&Clique::from_nodes(vec![Node::new(3, 0)])).is_none());
    }
}
