//! Plain-text adjacency format.
//!
//! One line per node: `(x y) > (x y),(x y),...`. A node without neighbours
//! is written as `(x y) >`. Parsing tolerates surrounding whitespace and
//! blank lines. Every edge must be listed by both endpoints.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use super::ConnectivityGraph;
use crate::error::{RendezvousError, Result};
use crate::models::Node;

impl ConnectivityGraph {
    /// Serialises the graph to the text format.
    pub fn to_text(&self) -> String {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_text(&mut out);
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Writes the text format to `writer`.
    pub fn write_text<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (node, neighbors) in self.adjacency() {
            if neighbors.is_empty() {
                writeln!(writer, "{node} >")?;
            } else {
                let list: Vec<String> = neighbors.iter().map(Node::to_string).collect();
                writeln!(writer, "{node} > {}", list.join(","))?;
            }
        }
        Ok(())
    }

    /// Parses the text format.
    ///
    /// # Errors
    /// [`RendezvousError::Parse`] for malformed lines, duplicate nodes,
    /// self-loops, and edges missing from the other endpoint's line.
    pub fn parse(text: &str) -> Result<Self> {
        let mut adjacency: BTreeMap<Node, BTreeSet<Node>> = BTreeMap::new();
        let mut lines: BTreeMap<Node, usize> = BTreeMap::new();

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, rest) = line
                .split_once('>')
                .ok_or_else(|| RendezvousError::parse(line_no, "missing '>' separator"))?;
            let key = parse_node(key, line_no)?;

            let mut neighbors = BTreeSet::new();
            let rest = rest.trim();
            if !rest.is_empty() {
                for raw in rest.split(',') {
                    let n = parse_node(raw, line_no)?;
                    if n == key {
                        return Err(RendezvousError::parse(
                            line_no,
                            format!("node {key} lists itself as a neighbour"),
                        ));
                    }
                    neighbors.insert(n);
                }
            }
            if adjacency.insert(key, neighbors).is_some() {
                return Err(RendezvousError::parse(line_no, format!("duplicate node {key}")));
            }
            lines.insert(key, line_no);
        }

        for (node, neighbors) in &adjacency {
            let one_way = neighbors
                .iter()
                .find(|&&n| !adjacency.get(&n).is_some_and(|back| back.contains(node)));
            if let Some(n) = one_way {
                let line_no = lines.get(node).copied().unwrap_or_default();
                return Err(RendezvousError::parse(
                    line_no,
                    format!("edge {node} > {n} is not listed by {n}"),
                ));
            }
        }

        Ok(Self::from_adjacency_unchecked(adjacency))
    }
}

fn parse_node(raw: &str, line_no: usize) -> Result<Node> {
    let inner = raw
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| RendezvousError::parse(line_no, format!("malformed node '{}'", raw.trim())))?;
    let coords: Vec<i32> = inner
        .split_whitespace()
        .map(|t| {
            t.parse::<i32>()
                .map_err(|e| RendezvousError::parse(line_no, format!("'{t}': {e}")))
        })
        .collect::<Result<_>>()?;
    match coords[..] {
        [x, y] => Ok(Node::new(x, y)),
        _ => Err(RendezvousError::parse(
            line_no,
            format!("node '{}' must have two coordinates", raw.trim()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ConnectionCriterion;
    use crate::models::GridMap;
    use crate::router::GridRouter;

    #[test]
    fn test_exact_shape() {
        let g = ConnectivityGraph::complete(&[Node::new(0, 0), Node::new(1, 0)]);
        assert_eq!(g.to_text(), "(0 0) > (1 0)\n(1 0) > (0 0)\n");
    }

    #[test]
    fn test_isolated_node_line() {
        let g = ConnectivityGraph::complete(&[Node::new(4, 2)]);
        assert_eq!(g.to_text(), "(4 2) >\n");
        assert_eq!(ConnectivityGraph::parse("(4 2) >\n").unwrap(), g);
    }

    #[test]
    fn test_round_trip_built_graph() {
        let map = GridMap::from_ascii(". . @\n. . .\n@ . .\n").unwrap();
        let g = ConnectivityGraph::build(
            &map,
            ConnectionCriterion::PathLength { threshold: 2.0 },
            &GridRouter,
        )
        .unwrap();
        let parsed = ConnectivityGraph::parse(&g.to_text()).unwrap();
        assert_eq!(parsed, g);
    }

    #[test]
    fn test_parse_tolerates_spacing() {
        let g = ConnectivityGraph::parse("  (0 0) >  (1 0) , (0 1)\n\n(1 0) > (0 0)\n(0 1) > (0 0)\n")
            .unwrap();
        assert_eq!(g.degree(&Node::new(0, 0)), 2);
        assert!(g.is_symmetric());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ConnectivityGraph::parse("(0 0) (1 0)"),
            Err(RendezvousError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            ConnectivityGraph::parse("(0 0) > (1)"),
            Err(RendezvousError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            ConnectivityGraph::parse("(0 0) > (1 0)\n(0 0) > (1 0)"),
            Err(RendezvousError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            ConnectivityGraph::parse("(0 0) > (0 0)"),
            Err(RendezvousError::Parse { .. })
        ));
    }

    #[test]
    fn test_one_way_edge_rejected() {
        assert!(matches!(
            ConnectivityGraph::parse("(0 0) > (1 0)\n(1 0) >\n"),
            Err(RendezvousError::Parse { line: 1, .. })
        ));
        // A neighbour with no line of its own is one-way as well.
        assert!(matches!(
            ConnectivityGraph::parse("(0 0) > (1 0)\n"),
            Err(RendezvousError::Parse { line: 1, .. })
        ));
    }
}
