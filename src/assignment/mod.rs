//! Agent-to-goal assignment.
//!
//! # Algorithms
//!
//! | Algorithm | Optimal | Complexity |
//! |-----------|---------|------------|
//! | [`AssignmentAlgorithm::Hungarian`] | yes (matrix cost) | O(k³) |
//! | [`AssignmentAlgorithm::LocalSearch`] | local optimum | O(T · k² · swaps) |
//! | [`AssignmentAlgorithm::Exhaustive`] | yes (oracle cost) | O(k!) |
//! | [`AssignmentAlgorithm::Random`] | no | O(k) |
//!
//! Local search and exhaustive search only see costs through a
//! [`CostOracle`]; the same code runs against the heuristic
//! [`CostMatrix`] or an external exact planner
//! ([`crate::evaluator::ExternalOracle`]).
//!
//! # Reference
//! - Kuhn (1955), "The Hungarian Method for the Assignment Problem"
//! - Munkres (1957), "Algorithms for the Assignment and Transportation Problems"

mod exhaustive;
mod hungarian;
mod local_search;
mod matrix;
mod random;

pub use exhaustive::{solve_assignment_exhaustive, MAX_EXHAUSTIVE_AGENTS};
pub use hungarian::solve_assignment_optimal;
pub use local_search::{
    climb, climb_with_known, local_search_with_oracle, solve_assignment_local_search,
    LocalSearchConfig,
};
pub use matrix::build_cost_matrix;
pub use random::solve_assignment_random;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RendezvousError, Result};
use crate::models::{Assignment, CostMatrix};

/// Assignment strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentAlgorithm {
    /// Optimal bipartite matching on the cost matrix.
    #[default]
    Hungarian,
    /// Multi-trajectory first-improvement hill climbing.
    LocalSearch,
    /// Every permutation (small k only).
    Exhaustive,
    /// Shuffled permutation (baseline for analysis).
    Random,
}

impl FromStr for AssignmentAlgorithm {
    type Err = RendezvousError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HUNGARIAN" => Ok(Self::Hungarian),
            "LOCAL_SEARCH" => Ok(Self::LocalSearch),
            "EXHAUSTIVE_SEARCH" | "EXHAUSTIVE" => Ok(Self::Exhaustive),
            "RANDOM" => Ok(Self::Random),
            other => Err(RendezvousError::InvalidConfiguration(format!(
                "unknown assignment algorithm '{other}'"
            ))),
        }
    }
}

impl fmt::Display for AssignmentAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hungarian => "HUNGARIAN",
            Self::LocalSearch => "LOCAL_SEARCH",
            Self::Exhaustive => "EXHAUSTIVE_SEARCH",
            Self::Random => "RANDOM",
        })
    }
}

/// Source of permutation costs.
///
/// `permutation[agent] = goal`. `Ok(None)` means the cost is unavailable
/// for this permutation (e.g. an external evaluation timed out and was
/// discarded); searches treat it as worse than any known cost.
pub trait CostOracle: Sync {
    /// Number of agents (= goals).
    fn size(&self) -> usize;

    /// Cost of a complete assignment.
    fn cost(&self, permutation: &[usize]) -> Result<Option<u64>>;
}

impl CostOracle for CostMatrix {
    fn size(&self) -> usize {
        CostMatrix::size(self)
    }

    fn cost(&self, permutation: &[usize]) -> Result<Option<u64>> {
        self.check_permutation(permutation)?;
        Ok(Some(self.permutation_cost(permutation)))
    }
}

/// Per-trajectory counters from local search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrajectoryStats {
    /// Cost of the shuffled starting permutation (`None` if unavailable).
    pub initial_cost: Option<u64>,
    /// Cost of the local optimum reached.
    pub final_cost: Option<u64>,
    /// Improving swaps accepted.
    pub accepted_swaps: usize,
    /// Oracle calls (cache misses).
    pub evaluations: usize,
}

/// Result of an assignment algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    /// Chosen bijection.
    pub assignment: Assignment,
    /// Its cost under the oracle used (`None` if unavailable).
    pub cost: Option<u64>,
    /// Local-search trajectories, empty for other algorithms.
    pub trajectories: Vec<TrajectoryStats>,
    /// Total oracle calls.
    pub evaluations: usize,
}

impl AssignmentOutcome {
    pub(crate) fn single(assignment: Assignment, cost: u64) -> Self {
        Self {
            assignment,
            cost: Some(cost),
            trajectories: Vec::new(),
            evaluations: 1,
        }
    }
}

/// Runs `algorithm` against the heuristic cost matrix.
///
/// `local_search` is only consulted for [`AssignmentAlgorithm::LocalSearch`]
/// and (for its seed) [`AssignmentAlgorithm::Random`].
pub fn solve_assignment(
    matrix: &CostMatrix,
    algorithm: AssignmentAlgorithm,
    local_search: &LocalSearchConfig,
) -> Result<AssignmentOutcome> {
    match algorithm {
        AssignmentAlgorithm::Hungarian => solve_assignment_optimal(matrix),
        AssignmentAlgorithm::LocalSearch => solve_assignment_local_search(matrix, local_search),
        AssignmentAlgorithm::Exhaustive => solve_assignment_exhaustive(matrix),
        AssignmentAlgorithm::Random => solve_assignment_random(matrix, local_search.seed),
    }
}

/// Ordering key: unavailable costs rank last.
#[inline]
pub(crate) fn rank(cost: Option<u64>) -> u64 {
    cost.unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors() {
        for algo in [
            AssignmentAlgorithm::Hungarian,
            AssignmentAlgorithm::LocalSearch,
            AssignmentAlgorithm::Exhaustive,
            AssignmentAlgorithm::Random,
        ] {
            assert_eq!(algo.to_string().parse::<AssignmentAlgorithm>().unwrap(), algo);
        }
        assert!(matches!(
            "SIMPLEX".parse::<AssignmentAlgorithm>(),
            Err(RendezvousError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_matrix_oracle_checks_size() {
        let m = CostMatrix::new(vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(CostOracle::cost(&m, &[1, 0]).unwrap(), Some(5));
        assert!(matches!(
            CostOracle::cost(&m, &[0]),
            Err(RendezvousError::DimensionMismatch(_))
        ));
        assert!(matches!(
            CostOracle::cost(&m, &[5, 0]),
            Err(RendezvousError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_dispatch_agrees_on_optimum() {
        let m = CostMatrix::new(vec![
            vec![9, 2, 7, 8],
            vec![6, 4, 3, 7],
            vec![5, 8, 1, 8],
            vec![7, 6, 9, 4],
        ])
        .unwrap();
        let cfg = LocalSearchConfig::default().with_seed(42);
        let best = solve_assignment(&m, AssignmentAlgorithm::Hungarian, &cfg).unwrap();
        let exhaustive = solve_assignment(&m, AssignmentAlgorithm::Exhaustive, &cfg).unwrap();
        let random = solve_assignment(&m, AssignmentAlgorithm::Random, &cfg).unwrap();
        assert_eq!(best.cost, Some(13));
        assert_eq!(exhaustive.cost, best.cost);
        assert!(random.cost >= best.cost);
    }
}
