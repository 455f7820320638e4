//! Leveled backtracking clique search.
//!
//! # Algorithm
//!
//! The search keeps one list of partial cliques per size, `1..=k`:
//!
//! 1. Level 0 holds one singleton per node (ordered by node score when a
//!    heuristic is given).
//! 2. Pop a partial clique from the current level, intersect the neighbour
//!    sets of its members, and push each extension onto the next level.
//! 3. When a level goes from empty to non-empty and a heuristic is given,
//!    re-sort it by partial clique score (max member score).
//! 4. The first clique reaching size k is returned. This is a
//!    first-solution search; ordering only biases which one is found.
//! 5. When a level runs dry without producing children, fall back to the
//!    previous level. Level 0 running dry means no k-clique exists.
//!
//! Partial cliques reachable through different insertion orders are
//! expanded once (tracked by their sorted member list).
//!
//! # Complexity
//! Exponential in k in the worst case; the k-core reduction keeps the
//! candidate set small in practice.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::time::Instant;

use super::PlacementHeuristic;
use crate::error::{RendezvousError, Result};
use crate::graph::ConnectivityGraph;
use crate::models::{Clique, Node};

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Partial cliques popped and expanded.
    pub expanded: usize,
    /// Extensions pushed onto a level.
    pub generated: usize,
    /// Extensions skipped because an equal set was already generated.
    pub duplicates: usize,
    /// Times the search fell back to a shallower level.
    pub backtracks: usize,
}

/// First-solution clique search over a connectivity graph.
#[derive(Debug, Clone)]
pub struct CliqueSearch<'a> {
    graph: &'a ConnectivityGraph,
    size: usize,
    heuristic: Option<&'a PlacementHeuristic>,
}

impl<'a> CliqueSearch<'a> {
    /// Creates an uninformed search for a clique of `size` nodes.
    pub fn new(graph: &'a ConnectivityGraph, size: usize) -> Self {
        Self {
            graph,
            size,
            heuristic: None,
        }
    }

    /// Orders candidates by `heuristic` (informed search).
    pub fn with_heuristic(mut self, heuristic: &'a PlacementHeuristic) -> Self {
        self.heuristic = Some(heuristic);
        self
    }

    /// Runs the search.
    ///
    /// # Errors
    /// [`RendezvousError::InsufficientConnectivity`] when no clique of the
    /// requested size exists; [`RendezvousError::InvalidConfiguration`] for
    /// a size of zero.
    pub fn run(&self) -> Result<Clique> {
        let (found, _) = self.run_with_stats()?;
        found.ok_or(RendezvousError::InsufficientConnectivity {
            required: self.size,
            candidates: self.graph.len(),
        })
    }

    /// Runs the search, returning the clique (if any) and counters.
    pub fn run_with_stats(&self) -> Result<(Option<Clique>, SearchStats)> {
        let k = self.size;
        if k == 0 {
            return Err(RendezvousError::InvalidConfiguration(
                "clique size must be at least 1".into(),
            ));
        }

        let started = Instant::now();
        let mut stats = SearchStats::default();
        let mut levels: Vec<Vec<Vec<Node>>> = vec![Vec::new(); k];
        let mut seen: HashSet<Vec<Node>> = HashSet::new();

        // Reverse canonical order so `pop` yields the first node first.
        levels[0] = self.graph.nodes().map(|n| vec![n]).collect();
        levels[0].reverse();
        self.order_level(&mut levels[0]);

        if k == 1 {
            return Ok((levels[0].pop().map(Clique::from_nodes), stats));
        }

        let mut level = 0usize;
        loop {
            let Some(partial) = levels[level].pop() else {
                if level == 0 {
                    log::debug!("clique search (k={k}) exhausted: {stats:?} in {:?}", started.elapsed());
                    return Ok((None, stats));
                }
                level -= 1;
                stats.backtracks += 1;
                continue;
            };
            stats.expanded += 1;

            let next = level + 1;
            let was_empty = levels[next].is_empty();
            let mut produced = 0usize;
            for candidate in self.common_neighbors(&partial).into_iter().rev() {
                let mut extended = partial.clone();
                extended.push(candidate);
                let mut key = extended.clone();
                key.sort_unstable();
                if !seen.insert(key) {
                    stats.duplicates += 1;
                    continue;
                }
                levels[next].push(extended);
                produced += 1;
            }
            stats.generated += produced;

            if produced == 0 {
                continue;
            }
            if was_empty {
                self.order_level(&mut levels[next]);
            }
            if next == k - 1 {
                let clique = levels[next].pop().map(Clique::from_nodes);
                log::debug!("clique search (k={k}) succeeded: {stats:?} in {:?}", started.elapsed());
                return Ok((clique, stats));
            }
            level = next;
        }
    }

    /// Nodes mutually adjacent to every member of `partial`, in canonical
    /// order.
    fn common_neighbors(&self, partial: &[Node]) -> Vec<Node> {
        let Some((first, rest)) = partial.split_first() else {
            return Vec::new();
        };
        let Some(base) = self.graph.neighbors(first) else {
            return Vec::new();
        };
        base.iter()
            .filter(|n| !partial.contains(n))
            .filter(|n| self.graph.are_adjacent(n, first))
            .filter(|n| {
                rest.iter()
                    .all(|m| self.graph.are_adjacent(m, n) && self.graph.are_adjacent(n, m))
            })
            .copied()
            .collect()
    }

    /// Sorts a level so that `pop` yields the lowest-scoring partial clique.
    fn order_level(&self, entries: &mut [Vec<Node>]) {
        if let Some(h) = self.heuristic {
            // Stable sort keeps the existing order among equal scores.
            entries.sort_by_key(|p| Reverse(h.clique_score(p)));
        }
    }
}
