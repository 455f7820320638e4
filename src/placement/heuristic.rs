//! Placement heuristic for informed clique search.
//!
//! A node's score is the cumulative shortest-path distance from every agent
//! start to that node. A partial clique scores as its worst member, so the
//! informed search prefers placements that keep the farthest agent close.

use std::collections::HashMap;

use crate::models::{GridMap, Node};
use crate::router::Router;

/// Per-node cumulative distance from all agent starts.
#[derive(Debug, Clone, Default)]
pub struct PlacementHeuristic {
    scores: HashMap<Node, u64>,
}

impl PlacementHeuristic {
    /// Scores `nodes` against `starts`.
    ///
    /// Uses one distance table per start (the router is symmetric), so the
    /// cost is k searches rather than one per node. Nodes unreachable from
    /// any start score `u64::MAX`.
    pub fn from_starts(
        map: &GridMap,
        starts: &[Node],
        router: &dyn Router,
        nodes: impl IntoIterator<Item = Node>,
    ) -> Self {
        let tables: Vec<_> = starts.iter().map(|&s| router.distance_table(map, s)).collect();
        let scores = nodes
            .into_iter()
            .map(|node| {
                let total = tables.iter().try_fold(0u64, |acc, t| {
                    t.get(node).map(|d| acc.saturating_add(u64::from(d)))
                });
                (node, total.unwrap_or(u64::MAX))
            })
            .collect();
        Self { scores }
    }

    /// Creates a heuristic from explicit scores.
    pub fn from_scores(scores: HashMap<Node, u64>) -> Self {
        Self { scores }
    }

    /// Score of a single node (`u64::MAX` if unknown).
    #[inline]
    pub fn score(&self, node: &Node) -> u64 {
        self.scores.get(node).copied().unwrap_or(u64::MAX)
    }

    /// Score of a partial clique: the maximum member score.
    pub fn clique_score(&self, nodes: &[Node]) -> u64 {
        nodes.iter().map(|n| self.score(n)).max().unwrap_or(0)
    }
}
