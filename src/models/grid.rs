//! Obstacle grid model.
//!
//! A rectangular occupancy grid where `true` marks an obstacle. Immutable
//! after construction; shared read-only by graph construction, routing and
//! the external evaluator.

use serde::{Deserialize, Serialize};

use super::Node;
use crate::error::{RendezvousError, Result};

/// Rectangular boolean occupancy grid (`true` = obstacle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMap {
    cells: Vec<Vec<bool>>,
    width: usize,
}

impl GridMap {
    /// Creates a grid from rows of obstacle flags.
    ///
    /// All rows must have the same length.
    pub fn from_rows(cells: Vec<Vec<bool>>) -> Result<Self> {
        let width = cells.first().map_or(0, Vec::len);
        if let Some((row, r)) = cells.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(RendezvousError::DimensionMismatch(format!(
                "grid row {row} has {} cells, expected {width}",
                r.len()
            )));
        }
        Ok(Self { cells, width })
    }

    /// Creates an obstacle-free grid.
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            cells: vec![vec![false; width]; height],
            width,
        }
    }

    /// Parses an ASCII grid: `@` is an obstacle, `.` is free, whitespace is
    /// ignored. Blank lines are skipped.
    pub fn from_ascii(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let row = parse_map_line(line, idx + 1)?;
            if !row.is_empty() {
                rows.push(row);
            }
        }
        Self::from_rows(rows)
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Whether the node lies inside the grid.
    #[inline]
    pub fn contains(&self, node: Node) -> bool {
        node.x >= 0
            && node.y >= 0
            && (node.x as usize) < self.width
            && (node.y as usize) < self.cells.len()
    }

    /// Whether the node is an obstacle. Out-of-bounds cells are not obstacles.
    #[inline]
    pub fn is_obstacle(&self, node: Node) -> bool {
        self.contains(node) && self.cells[node.y as usize][node.x as usize]
    }

    /// Whether the node is inside the grid and free.
    #[inline]
    pub fn is_free(&self, node: Node) -> bool {
        self.contains(node) && !self.cells[node.y as usize][node.x as usize]
    }

    /// All free cells in row-major order.
    pub fn free_cells(&self) -> Vec<Node> {
        let mut out = Vec::new();
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, &blocked) in cells.iter().enumerate() {
                if !blocked {
                    out.push(Node::new(col as i32, row as i32));
                }
            }
        }
        out
    }

    /// Number of free cells.
    pub fn free_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&b| !b).count()
    }

    /// Free orthogonal neighbours of a node.
    pub fn neighbors4(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.orthogonal().into_iter().filter(move |n| self.is_free(*n))
    }

    /// Renders the grid with optional agent markers, one row per line.
    pub fn render(&self, markers: &[Node]) -> String {
        let mut out = String::new();
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, &blocked) in cells.iter().enumerate() {
                let here = Node::new(col as i32, row as i32);
                match markers.iter().position(|m| *m == here) {
                    Some(i) => out.push_str(&format!("{i} ")),
                    None if blocked => out.push_str("@ "),
                    None => out.push_str(". "),
                }
            }
            out.push('\n');
        }
        out
    }
}

pub(crate) fn parse_map_line(line: &str, line_no: usize) -> Result<Vec<bool>> {
    let mut row = Vec::new();
    for ch in line.chars() {
        match ch {
            '@' => row.push(true),
            '.' => row.push(false),
            c if c.is_whitespace() => {}
            other => {
                return Err(RendezvousError::parse(
                    line_no,
                    format!("unexpected map character '{other}'"),
                ))
            }
        }
    }
    Ok(row)
}
