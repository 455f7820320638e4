//! k-core style graph reduction.
//!
//! # Algorithm
//! Repeatedly remove every node whose degree + 1 < k (it cannot belong to
//! a clique of size k), deleting it from its neighbours' sets too, until a
//! full pass removes nothing.
//!
//! A node in a k-clique has at least k-1 neighbours inside that clique, and
//! removals never touch clique members, so every k-clique of the input
//! survives. The fixpoint makes the filter idempotent.

use std::collections::BTreeSet;

use super::ConnectivityGraph;
use crate::models::Node;

/// Returns the maximal induced subgraph where every node has degree ≥ k-1.
pub fn reduce_graph(graph: &ConnectivityGraph, k: usize) -> ConnectivityGraph {
    let mut adjacency = graph.clone().into_adjacency();
    let min_degree = k.saturating_sub(1);
    let mut passes = 0usize;
    let mut removed_total = 0usize;

    loop {
        passes += 1;
        let doomed: BTreeSet<Node> = adjacency
            .iter()
            .filter(|(_, ns)| ns.len() < min_degree)
            .map(|(n, _)| *n)
            .collect();
        if doomed.is_empty() {
            break;
        }

        removed_total += doomed.len();
        for node in &doomed {
            if let Some(neighbors) = adjacency.remove(node) {
                for n in neighbors {
                    if let Some(back) = adjacency.get_mut(&n) {
                        back.remove(node);
                    }
                }
            }
        }
        // Asymmetric input may still reference removed nodes.
        for neighbors in adjacency.values_mut() {
            neighbors.retain(|n| !doomed.contains(n));
        }
    }

    log::debug!(
        "reduced graph for k={k}: removed {removed_total} of {} nodes in {passes} passes",
        graph.len()
    );
    ConnectivityGraph::from_adjacency_unchecked(adjacency)
}
