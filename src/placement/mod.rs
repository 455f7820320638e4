//! Goal placement: finding a clique of meeting points.
//!
//! # Variants
//!
//! | Mode | Ordering | Use |
//! |------|----------|-----|
//! | [`PlacementMode::Uninformed`] | canonical node order | baseline |
//! | [`PlacementMode::Informed`] | cumulative distance from starts | production |
//! | [`enumerate_all_cliques`] | n/a | offline analysis |
//!
//! Both search modes stop at the first clique of size k; the informed
//! ordering only biases which one is found.
//!
//! # Reference
//! Bron & Kerbosch (1973), "Algorithm 457: Finding All Cliques of an
//! Undirected Graph" (for the enumeration problem in general).

mod enumerate;
mod heuristic;
mod search;

pub use enumerate::enumerate_all_cliques;
pub use heuristic::PlacementHeuristic;
pub use search::{CliqueSearch, SearchStats};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RendezvousError, Result};
use crate::graph::ConnectivityGraph;
use crate::models::{Clique, GridMap, Node};
use crate::router::Router;

/// Candidate ordering for the clique search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    /// Canonical node order.
    Uninformed,
    /// Ordered by cumulative distance from the agent starts.
    #[default]
    Informed,
}

impl FromStr for PlacementMode {
    type Err = RendezvousError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UNINFORMED_GENERATION" | "UNINFORMED" => Ok(Self::Uninformed),
            "INFORMED_GENERATION" | "INFORMED" => Ok(Self::Informed),
            other => Err(RendezvousError::InvalidConfiguration(format!(
                "unknown goal placement mode '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninformed => "UNINFORMED_GENERATION",
            Self::Informed => "INFORMED_GENERATION",
        })
    }
}

/// Finds a clique with one node per agent start.
///
/// `graph` should already be reduced with [`crate::graph::reduce_graph`];
/// the search is correct without it, only slower.
///
/// # Errors
/// [`RendezvousError::InsufficientConnectivity`] when no clique of
/// `starts.len()` nodes exists.
pub fn search_clique(
    graph: &ConnectivityGraph,
    map: &GridMap,
    starts: &[Node],
    mode: PlacementMode,
    router: &dyn Router,
) -> Result<Clique> {
    let search = CliqueSearch::new(graph, starts.len());
    match mode {
        PlacementMode::Uninformed => search.run(),
        PlacementMode::Informed => {
            let heuristic = PlacementHeuristic::from_starts(map, starts, router, graph.nodes());
            search.with_heuristic(&heuristic).run()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{reduce_graph, ConnectionCriterion};
    use crate::router::GridRouter;

    #[test]
    fn test_mode_selectors() {
        assert_eq!("UNINFORMED_GENERATION".parse::<PlacementMode>().unwrap(), PlacementMode::Uninformed);
        assert_eq!("informed_generation".parse::<PlacementMode>().unwrap(), PlacementMode::Informed);
        assert!(matches!(
            "GREEDY".parse::<PlacementMode>(),
            Err(RendezvousError::InvalidConfiguration(_))
        ));
        assert_eq!(PlacementMode::Informed.to_string(), "INFORMED_GENERATION");
    }

    #[test]
    fn test_scenario_a_open_grid() {
        let map = GridMap::open(5, 5);
        let starts = [Node::new(0, 0), Node::new(4, 0), Node::new(2, 4)];
        let g = ConnectivityGraph::build(&map, ConnectionCriterion::None, &GridRouter).unwrap();
        let reduced = reduce_graph(&g, starts.len());
        assert_eq!(reduced.len(), 25);
        for mode in [PlacementMode::Uninformed, PlacementMode::Informed] {
            let clique = search_clique(&reduced, &map, &starts, mode, &GridRouter).unwrap();
            assert_eq!(clique.len(), 3);
            assert!(g.is_clique(clique.nodes()));
        }
    }

    #[test]
    fn test_informed_lands_near_agents() {
        // Agents huddle in the right half of a corridor.
        let map = GridMap::open(10, 1);
        let starts = [Node::new(7, 0), Node::new(9, 0)];
        let g = ConnectivityGraph::build(
            &map,
            ConnectionCriterion::PathLength { threshold: 1.0 },
            &GridRouter,
        )
        .unwrap();
        let uninformed =
            search_clique(&g, &map, &starts, PlacementMode::Uninformed, &GridRouter).unwrap();
        let informed = search_clique(&g, &map, &starts, PlacementMode::Informed, &GridRouter).unwrap();
        assert_eq!(uninformed.nodes(), &[Node::new(0, 0), Node::new(1, 0)]);
        assert!(informed.nodes().iter().all(|n| (7..=9).contains(&n.x)));
    }

    #[test]
    fn test_too_many_agents() {
        let map = GridMap::from_ascii(". @ .\n").unwrap();
        let starts = [Node::new(0, 0), Node::new(2, 0)];
        let g = ConnectivityGraph::build(
            &map,
            ConnectionCriterion::PathLength { threshold: 3.0 },
            &GridRouter,
        )
        .unwrap();
        let reduced = reduce_graph(&g, 2);
        assert!(reduced.is_empty());
        assert!(matches!(
            search_clique(&reduced, &map, &starts, PlacementMode::Informed, &GridRouter),
            Err(RendezvousError::InsufficientConnectivity { required: 2, .. })
        ));
    }
}
