//! Breadth-first grid router.
//!
//! # Algorithm
//! Unit-cost, 4-connected BFS from the goal over free cells. The resulting
//! table is exact, so it doubles as a perfect heuristic and as the
//! shortest-path length oracle.
//!
//! # Complexity
//! O(F) per table over F free cells.

use std::collections::{HashMap, VecDeque};

use super::{DistanceTable, Router};
use crate::models::{GridMap, Node};

/// 4-connected unit-cost router.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridRouter;

impl GridRouter {
    /// Creates a router.
    pub fn new() -> Self {
        Self
    }
}

impl Router for GridRouter {
    fn distance_table(&self, map: &GridMap, goal: Node) -> DistanceTable {
        let mut distances = HashMap::new();
        if !map.is_free(goal) {
            return DistanceTable::new(goal, distances);
        }

        let mut queue = VecDeque::new();
        distances.insert(goal, 0u32);
        queue.push_back((goal, 0u32));

        while let Some((node, dist)) = queue.pop_front() {
            for next in map.neighbors4(node) {
                if distances.contains_key(&next) {
                    continue;
                }
                distances.insert(next, dist + 1);
                queue.push_back((next, dist + 1));
            }
        }

        DistanceTable::new(goal, distances)
    }

    fn shortest_path_length(&self, map: &GridMap, start: Node, goal: Node) -> Option<u32> {
        if start == goal {
            return map.is_free(start).then_some(0);
        }
        self.distance_table(map, goal).get(start)
    }
}
