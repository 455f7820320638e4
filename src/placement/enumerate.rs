//! Exhaustive clique enumeration (analysis only).
//!
//! # Algorithm
//! For every node, form all (k-1)-combinations of its neighbour set, keep
//! combinations that are mutually adjacent, and de-duplicate by the sorted
//! member list.
//!
//! # Complexity
//! O(F · C(d, k-1) · k²) for F nodes of maximum degree d. Intended for small
//! instances used to validate placement heuristics.

use std::collections::BTreeSet;

use crate::graph::ConnectivityGraph;
use crate::models::{Clique, Node};

/// Returns every clique of exactly `k` nodes, in canonical order.
///
/// `k == 0` yields nothing.
pub fn enumerate_all_cliques(graph: &ConnectivityGraph, k: usize) -> Vec<Clique> {
    if k == 0 {
        return Vec::new();
    }
    let mut found: BTreeSet<Clique> = BTreeSet::new();

    for node in graph.nodes() {
        let Some(neighbors) = graph.neighbors(&node) else {
            continue;
        };
        if neighbors.len() + 1 < k {
            continue;
        }
        let pool: Vec<Node> = neighbors.iter().copied().collect();
        for_each_combination(&pool, k - 1, |combo| {
            if combo.iter().all(|m| graph.are_adjacent(m, &node)) && graph.is_clique(combo) {
                let mut members = combo.to_vec();
                members.push(node);
                found.insert(Clique::from_nodes(members));
            }
        });
    }

    log::debug!("enumerated {} cliques of size {k}", found.len());
    found.into_iter().collect()
}

/// Calls `f` with every `r`-combination of `items`, in lexicographic
/// index order.
fn for_each_combination<F: FnMut(&[Node])>(items: &[Node], r: usize, mut f: F) {
    let n = items.len();
    if r > n {
        return;
    }
    let mut idx: Vec<usize> = (0..r).collect();
    let mut combo: Vec<Node> = Vec::with_capacity(r);
    loop {
        combo.clear();
        combo.extend(idx.iter().map(|&i| items[i]));
        f(&combo);

        // Advance the rightmost index that still has room.
        let Some(pos) = (0..r).rev().find(|&i| idx[i] != i + n - r) else {
            return;
        };
        idx[pos] += 1;
        for j in pos + 1..r {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
