//! Connectivity graph construction.
//!
//! # Algorithm
//! For every free cell, evaluate the connectivity predicate against every
//! other free cell and record the accepted ones as neighbours. Rows are
//! independent, so they are computed in parallel with rayon when enabled.
//!
//! For [`ConnectionCriterion::PathLength`] one distance table is computed per
//! source cell and reused for the whole row, instead of one search per pair.
//!
//! # Complexity
//! O(F²) predicate evaluations over F free cells; O(F²) for path length
//! (F breadth-first searches of O(F) each).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::line_of_sight::obstacle_weighted_distance;
use crate::error::{RendezvousError, Result};
use crate::models::{GridMap, Node};
use crate::router::Router;

/// Default connection threshold (cells).
pub const DEFAULT_CONNECTION_DISTANCE: f64 = 3.0;

/// Predicate deciding whether two free cells are adjacent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConnectionCriterion {
    /// Every pair of distinct free cells is connected.
    None,
    /// Euclidean distance (rounded to two decimals) ≤ threshold.
    Distance {
        /// Maximum distance.
        threshold: f64,
    },
    /// Router shortest-path length ≤ ⌊threshold⌋.
    PathLength {
        /// Maximum path length (floored).
        threshold: f64,
    },
    /// Legacy: Euclidean distance plus occlusion penalties ≤ threshold.
    DistanceAndObstacles {
        /// Maximum weighted distance.
        threshold: f64,
    },
}

impl Default for ConnectionCriterion {
    fn default() -> Self {
        Self::PathLength {
            threshold: DEFAULT_CONNECTION_DISTANCE,
        }
    }
}

impl ConnectionCriterion {
    /// Resolves a selector name with an explicit threshold.
    pub fn from_selector(name: &str, threshold: f64) -> Result<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(Self::None),
            "DISTANCE" => Ok(Self::Distance { threshold }),
            "PATH_LENGTH" => Ok(Self::PathLength { threshold }),
            "DISTANCE_AND_OBSTACLES" => Ok(Self::DistanceAndObstacles { threshold }),
            other => Err(RendezvousError::InvalidConfiguration(format!(
                "unknown connection criterion '{other}'"
            ))),
        }
    }

    /// Threshold, if the criterion has one.
    pub fn threshold(&self) -> Option<f64> {
        match *self {
            Self::None => None,
            Self::Distance { threshold }
            | Self::PathLength { threshold }
            | Self::DistanceAndObstacles { threshold } => Some(threshold),
        }
    }

    /// Rejects negative or non-finite thresholds.
    pub fn validate(&self) -> Result<()> {
        match self.threshold() {
            Some(t) if !t.is_finite() || t < 0.0 => Err(RendezvousError::InvalidConfiguration(
                format!("connection threshold must be a finite non-negative number, got {t}"),
            )),
            _ => Ok(()),
        }
    }
}

impl FromStr for ConnectionCriterion {
    type Err = RendezvousError;

    /// Parses a selector name using [`DEFAULT_CONNECTION_DISTANCE`].
    fn from_str(s: &str) -> Result<Self> {
        Self::from_selector(s, DEFAULT_CONNECTION_DISTANCE)
    }
}

/// Adjacency structure over free grid cells.
///
/// Invariants: no self-loops; symmetric for every supported predicate.
/// Read-only once built; [`crate::graph::reduce_graph`] returns a new graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectivityGraph {
    adjacency: BTreeMap<Node, BTreeSet<Node>>,
}

impl ConnectivityGraph {
    /// Builds the graph over all free cells of `map`.
    pub fn build(map: &GridMap, criterion: ConnectionCriterion, router: &dyn Router) -> Result<Self> {
        Self::build_with(map, criterion, router, true)
    }

    /// Builds the graph, optionally evaluating rows in parallel.
    pub fn build_with(
        map: &GridMap,
        criterion: ConnectionCriterion,
        router: &dyn Router,
        parallel: bool,
    ) -> Result<Self> {
        criterion.validate()?;
        let started = Instant::now();
        let free = map.free_cells();

        let row = |&source: &Node| (source, connected_row(map, criterion, router, source, &free));
        let adjacency: BTreeMap<Node, BTreeSet<Node>> = if parallel {
            free.par_iter().map(row).collect::<Vec<_>>().into_iter().collect()
        } else {
            free.iter().map(row).collect()
        };

        let graph = Self { adjacency };
        log::debug!(
            "connectivity graph ({criterion:?}): {} nodes, {} edges in {:?}",
            graph.len(),
            graph.edge_count(),
            started.elapsed()
        );
        Ok(graph)
    }

    /// Creates a graph from an adjacency mapping.
    ///
    /// Rejects self-loops, neighbours that are not themselves keys, and
    /// edges listed by only one endpoint.
    pub fn from_adjacency(adjacency: BTreeMap<Node, BTreeSet<Node>>) -> Result<Self> {
        for (node, neighbors) in &adjacency {
            if neighbors.contains(node) {
                return Err(RendezvousError::InvalidConfiguration(format!(
                    "node {node} is connected to itself"
                )));
            }
            if let Some(missing) = neighbors.iter().find(|n| !adjacency.contains_key(n)) {
                return Err(RendezvousError::InvalidConfiguration(format!(
                    "node {node} lists unknown neighbour {missing}"
                )));
            }
            if let Some(one_way) = neighbors
                .iter()
                .find(|&n| !adjacency.get(n).is_some_and(|back| back.contains(node)))
            {
                return Err(RendezvousError::InvalidConfiguration(format!(
                    "edge {node} - {one_way} is listed by {node} only"
                )));
            }
        }
        Ok(Self { adjacency })
    }

    /// Complete graph over the given nodes.
    pub fn complete(nodes: &[Node]) -> Self {
        let all: BTreeSet<Node> = nodes.iter().copied().collect();
        let adjacency = all
            .iter()
            .map(|&n| {
                let mut others = all.clone();
                others.remove(&n);
                (n, others)
            })
            .collect();
        Self { adjacency }
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Whether the graph has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Nodes in canonical order.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.adjacency.keys().copied()
    }

    /// Neighbour set of a node.
    #[inline]
    pub fn neighbors(&self, node: &Node) -> Option<&BTreeSet<Node>> {
        self.adjacency.get(node)
    }

    /// Whether the node is present.
    #[inline]
    pub fn contains(&self, node: &Node) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Degree of a node (0 if absent).
    pub fn degree(&self, node: &Node) -> usize {
        self.adjacency.get(node).map_or(0, BTreeSet::len)
    }

    /// Whether `b` is in `a`'s neighbour set.
    pub fn are_adjacent(&self, a: &Node, b: &Node) -> bool {
        self.adjacency.get(a).is_some_and(|ns| ns.contains(b))
    }

    /// Number of undirected edges (directed entries / 2).
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Whether every pair of `nodes` is mutually adjacent.
    pub fn is_clique(&self, nodes: &[Node]) -> bool {
        nodes.iter().enumerate().all(|(i, a)| {
            nodes[i + 1..]
                .iter()
                .all(|b| a != b && self.are_adjacent(a, b) && self.are_adjacent(b, a))
        })
    }

    /// Whether every edge appears in both directions.
    pub fn is_symmetric(&self) -> bool {
        self.adjacency
            .iter()
            .all(|(a, ns)| ns.iter().all(|b| self.are_adjacent(b, a)))
    }

    /// Whether any node lists itself as a neighbour.
    pub fn has_self_loops(&self) -> bool {
        self.adjacency.iter().any(|(n, ns)| ns.contains(n))
    }

    pub(crate) fn adjacency(&self) -> &BTreeMap<Node, BTreeSet<Node>> {
        &self.adjacency
    }

    pub(crate) fn into_adjacency(self) -> BTreeMap<Node, BTreeSet<Node>> {
        self.adjacency
    }

    pub(crate) fn from_adjacency_unchecked(adjacency: BTreeMap<Node, BTreeSet<Node>>) -> Self {
        Self { adjacency }
    }
}

impl fmt::Display for ConnectivityGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (node, neighbors) in &self.adjacency {
            let list: Vec<String> = neighbors.iter().map(Node::to_string).collect();
            writeln!(f, "{node} is connected to: [{}]", list.join(", "))?;
        }
        Ok(())
    }
}

/// Neighbours of `source` among `free` under `criterion`.
fn connected_row(
    map: &GridMap,
    criterion: ConnectionCriterion,
    router: &dyn Router,
    source: Node,
    free: &[Node],
) -> BTreeSet<Node> {
    let others = free.iter().copied().filter(|&n| n != source);
    match criterion {
        ConnectionCriterion::None => others.collect(),
        ConnectionCriterion::Distance { threshold } => others
            .filter(|n| source.euclidean_distance(n) <= threshold)
            .collect(),
        ConnectionCriterion::PathLength { threshold } => {
            let limit = threshold.floor();
            let table = router.distance_table(map, source);
            others
                .filter(|&n| table.get(n).is_some_and(|d| f64::from(d) <= limit))
                .collect()
        }
        ConnectionCriterion::DistanceAndObstacles { threshold } => others
            .filter(|&n| obstacle_weighted_distance(map, source, n) <= threshold)
            .collect(),
    }
}
