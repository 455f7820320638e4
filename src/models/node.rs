//! Grid node model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A free grid cell identified by its coordinates.
///
/// `x` is the column and `y` the row. Ordering is by `(x, y)`, which is
/// also the canonical order used when sorting cliques.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Node {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl Node {
    /// Creates a node at column `x`, row `y`.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Creates a node from map coordinates (`row`, `col`).
    #[inline]
    pub const fn from_row_col(row: i32, col: i32) -> Self {
        Self { x: col, y: row }
    }

    /// Euclidean distance rounded to two decimals.
    pub fn euclidean_distance(&self, other: &Node) -> f64 {
        let dx = f64::from(other.x - self.x);
        let dy = f64::from(other.y - self.y);
        round2((dx * dx + dy * dy).sqrt())
    }

    /// The four orthogonal neighbours (may lie outside any map).
    pub fn orthogonal(&self) -> [Node; 4] {
        [
            Node::new(self.x + 1, self.y),
            Node::new(self.x - 1, self.y),
            Node::new(self.x, self.y + 1),
            Node::new(self.x, self.y - 1),
        ]
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Node {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Rounds to two decimal places.
#[inline]
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_col_swaps_axes() {
        let n = Node::from_row_col(2, 5);
        assert_eq!(n.x, 5);
        assert_eq!(n.y, 2);
    }

    #[test]
    fn test_euclidean_distance_rounded() {
        let a = Node::new(0, 0);
        let b = Node::new(1, 1);
        assert_eq!(a.euclidean_distance(&b), 1.41);
        assert_eq!(a.euclidean_distance(&Node::new(3, 4)), 5.0);
    }

    #[test]
    fn test_ordering_by_x_then_y() {
        let mut nodes = vec![Node::new(1, 0), Node::new(0, 2), Node::new(0, 1)];
        nodes.sort();
        assert_eq!(nodes, vec![Node::new(0, 1), Node::new(0, 2), Node::new(1, 0)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Node::new(3, 7).to_string(), "(3 7)");
    }
}
