//! Meeting problem instance.
//!
//! # Text Format
//!
//! ```text
//! 4 5            <- rows cols
//! . . . . .      <- `rows` map lines (`@` obstacle, `.` free)
//! . @ @ . .
//! . . . . .
//! . . . . .
//! 2              <- number of agents
//! 0 0            <- start (row col) per agent
//! 3 4 1 1        <- a trailing goal (row col) is accepted and ignored
//! ```

use serde::{Deserialize, Serialize};

use super::grid::parse_map_line;
use super::{GridMap, Node};
use crate::error::{RendezvousError, Result};

/// A grid plus the start cell of every agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Obstacle grid.
    pub map: GridMap,
    /// Start cell per agent (index = agent id).
    pub starts: Vec<Node>,
}

impl Instance {
    /// Creates an instance.
    pub fn new(map: GridMap, starts: Vec<Node>) -> Self {
        Self { map, starts }
    }

    /// Number of agents.
    #[inline]
    pub fn agent_count(&self) -> usize {
        self.starts.len()
    }

    /// Parses the instance text format.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

        let (line_no, header) = next_content_line(&mut lines)
            .ok_or_else(|| RendezvousError::parse(1, "missing 'rows cols' header"))?;
        let dims = parse_ints(header, line_no)?;
        let [rows, cols] = dims[..] else {
            return Err(RendezvousError::parse(line_no, "header must be 'rows cols'"));
        };
        let (rows, cols) = (to_usize(rows, line_no)?, to_usize(cols, line_no)?);

        let mut cells = Vec::with_capacity(rows);
        for _ in 0..rows {
            let (line_no, line) = lines
                .next()
                .ok_or_else(|| RendezvousError::parse(line_no, "map ended early"))?;
            let row = parse_map_line(line, line_no)?;
            if row.len() != cols {
                return Err(RendezvousError::parse(
                    line_no,
                    format!("expected {cols} cells, found {}", row.len()),
                ));
            }
            cells.push(row);
        }
        let map = GridMap::from_rows(cells)?;

        let (count_line, count) = next_content_line(&mut lines)
            .ok_or_else(|| RendezvousError::parse(rows + 2, "missing agent count"))?;
        let agents = count
            .trim()
            .parse::<usize>()
            .map_err(|e| RendezvousError::parse(count_line, e.to_string()))?;

        let mut starts = Vec::with_capacity(agents);
        for _ in 0..agents {
            let (line_no, line) = next_content_line(&mut lines)
                .ok_or_else(|| RendezvousError::parse(count_line, "agent list ended early"))?;
            let values = parse_ints(line, line_no)?;
            match values[..] {
                [row, col] | [row, col, _, _] => starts.push(Node::from_row_col(row, col)),
                _ => {
                    return Err(RendezvousError::parse(
                        line_no,
                        "agent line must be 'row col' or 'row col goal_row goal_col'",
                    ))
                }
            }
        }

        Ok(Self { map, starts })
    }
}

fn next_content_line<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Option<(usize, &'a str)> {
    lines.find(|(_, l)| !l.trim().is_empty())
}

fn parse_ints(line: &str, line_no: usize) -> Result<Vec<i32>> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<i32>()
                .map_err(|e| RendezvousError::parse(line_no, format!("'{tok}': {e}")))
        })
        .collect()
}

fn to_usize(value: i32, line_no: usize) -> Result<usize> {
    usize::try_from(value).map_err(|_| RendezvousError::parse(line_no, "negative dimension"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "3 4\n. . . .\n. @ @ .\n. . . .\n2\n0 0\n2 3 1 0\n";

    #[test]
    fn test_parse_sample() {
        let inst = Instance::parse(SAMPLE).unwrap();
        assert_eq!(inst.map.height(), 3);
        assert_eq!(inst.map.width(), 4);
        assert!(inst.map.is_obstacle(Node::new(1, 1)));
        assert_eq!(inst.starts, vec![Node::new(0, 0), Node::new(3, 2)]);
        assert_eq!(inst.agent_count(), 2);
    }

    #[test]
    fn test_parse_short_map() {
        let err = Instance::parse("3 2\n..\n..\n").unwrap_err();
        assert!(matches!(err, RendezvousError::Parse { .. }));
    }

    #[test]
    fn test_parse_wrong_width() {
        let err = Instance::parse("1 3\n..\n1\n0 0\n").unwrap_err();
        assert!(matches!(err, RendezvousError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_bad_agent_line() {
        let err = Instance::parse("1 2\n..\n1\n0\n").unwrap_err();
        assert!(matches!(err, RendezvousError::Parse { line: 4, .. }));
    }
}
