//! Single-agent routing.
//!
//! The engine needs two things from a single-agent planner: a per-goal
//! distance lookup (the "heuristic" table) and the shortest-path length
//! between two cells. [`Router`] is the seam; [`GridRouter`] is the
//! default 4-connected breadth-first implementation.

mod bfs;

pub use bfs::GridRouter;

use std::collections::HashMap;

use crate::models::{GridMap, Node};

/// Exact distances from every reachable cell to one goal.
#[derive(Debug, Clone, Default)]
pub struct DistanceTable {
    goal: Option<Node>,
    distances: HashMap<Node, u32>,
}

impl DistanceTable {
    /// Creates a table for `goal`.
    pub fn new(goal: Node, distances: HashMap<Node, u32>) -> Self {
        Self {
            goal: Some(goal),
            distances,
        }
    }

    /// The goal this table was computed for.
    pub fn goal(&self) -> Option<Node> {
        self.goal
    }

    /// Distance from `from` to the goal, `None` if unreachable.
    #[inline]
    pub fn get(&self, from: Node) -> Option<u32> {
        self.distances.get(&from).copied()
    }

    /// Number of reachable cells (including the goal).
    pub fn reachable(&self) -> usize {
        self.distances.len()
    }

    /// Iterates over `(cell, distance)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (Node, u32)> + '_ {
        self.distances.iter().map(|(n, d)| (*n, *d))
    }
}

/// Single-agent shortest-path provider.
///
/// Implementations must be symmetric on undirected grids
/// (`len(a, b) == len(b, a)`), which the connectivity graph relies on.
pub trait Router: Send + Sync {
    /// Distance table towards `goal` (the per-goal heuristic lookup).
    fn distance_table(&self, map: &GridMap, goal: Node) -> DistanceTable;

    /// Shortest-path length from `start` to `goal`, `None` if unreachable.
    fn shortest_path_length(&self, map: &GridMap, start: Node, goal: Node) -> Option<u32> {
        self.distance_table(map, goal).get(start)
    }
}
