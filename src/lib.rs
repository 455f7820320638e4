//! Meeting-point goal placement and assignment for multi-agent path finding.
//!
//! Given an obstacle grid and the start cells of k agents, this crate picks
//! k goal cells that are mutually "close" (a k-clique in a connectivity
//! graph over the free cells) and assigns one goal to each agent so that the
//! summed travel cost is small. Exact multi-agent costs can be obtained from
//! an external planner under a wall-clock budget.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Node`, `GridMap`, `Instance`, `Clique`,
//!   `CostMatrix`, `Assignment`
//! - **`validation`**: Instance integrity checks (bounds, obstacles,
//!   duplicate starts)
//! - **`router`**: Single-agent shortest paths (`Router`, breadth-first
//!   `GridRouter`)
//! - **`graph`**: Connectivity predicates, graph construction, k-core
//!   reduction, text form
//! - **`placement`**: Uninformed and informed k-clique search
//! - **`assignment`**: Hungarian, local search, exhaustive and random
//!   agent-goal assignment
//! - **`evaluator`**: Time-bounded external planner calls, retry and
//!   exact-cost assignment
//! - **`analysis`**: Clique ranking and assignment comparison on small
//!   instances
//! - **`config`** / **`pipeline`**: `PlannerConfig` and the end-to-end
//!   `MeetingPlanner`
//!
//! # Architecture
//!
//! The library never prints. Progress and timings go through the `log`
//! facade; reports are written to a caller-supplied `std::io::Write`.
//! Algorithm selectors are typed enums, resolved once from configuration.
//!
//! # References
//!
//! - Kuhn (1955), "The Hungarian Method for the Assignment Problem"
//! - Jonker & Volgenant (1987), "A Shortest Augmenting Path Algorithm for
//!   Dense and Sparse Linear Assignment Problems"
//! - Stern et al. (2019), "Multi-Agent Pathfinding: Definitions, Variants,
//!   and Benchmarks"

pub mod analysis;
pub mod assignment;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod graph;
pub mod models;
pub mod pipeline;
pub mod placement;
pub mod router;
pub mod validation;

pub use config::{CostModel, PlannerConfig};
pub use error::{RendezvousError, Result};
pub use models::{Assignment, Clique, CostMatrix, GridMap, Instance, Node};
pub use pipeline::{MeetingPlan, MeetingPlanner, StageTimings};
