//! Meeting-problem domain models.
//!
//! Provides the core data types shared by graph construction, goal
//! placement and assignment. All models are immutable once built and safe
//! to share read-only across threads.
//!
//! | Type | Role |
//! |------|------|
//! | `Node` | Free grid cell, `(x, y)` = (column, row) |
//! | `GridMap` | Obstacle grid (`true` = obstacle) |
//! | `Instance` | Grid + agent starts |
//! | `Clique` | Chosen meeting cells (mutually connected) |
//! | `CostMatrix` | Agents × goals path-length estimates |
//! | `Assignment` | Agent → goal permutation |

mod assignment;
mod clique;
mod cost_matrix;
mod grid;
mod instance;
mod node;

pub use assignment::Assignment;
pub use clique::Clique;
pub use cost_matrix::CostMatrix;
pub use grid::GridMap;
pub use instance::Instance;
pub use node::Node;

pub(crate) use node::round2;
