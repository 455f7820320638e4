//! Goal-placement clique model.

use serde::{Deserialize, Serialize};

use super::Node;

/// A set of mutually adjacent nodes, kept in canonical (sorted) order.
///
/// Cliques are only produced by the placement searches, which enforce the
/// complete-subgraph invariant by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Clique {
    nodes: Vec<Node>,
}

impl Clique {
    pub(crate) fn from_nodes(mut nodes: Vec<Node>) -> Self {
        nodes.sort_unstable();
        Self { nodes }
    }

    /// Member nodes in canonical order.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Clique size.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the clique is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `node` is a member.
    pub fn contains(&self, node: &Node) -> bool {
        self.nodes.binary_search(node).is_ok()
    }

    /// Consumes the clique, returning its nodes.
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}
