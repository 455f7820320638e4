//! Offline analysis of placement and assignment quality.
//!
//! Not part of the production path: everything here enumerates all
//! cliques or calls the exact planner once per candidate, so it is only
//! practical on small instances.
//!
//! - [`rank_cliques`] / [`optimality_factor`]: how close a search mode's
//!   clique is to the best one
//! - [`compare_assignments`]: heuristic and exact cost per assignment
//!   strategy on a fixed clique
//! - [`write_ranking`] / [`write_comparison`]: text reports to any
//!   [`std::io::Write`] sink

mod compare;
mod ranking;
mod report;

pub use compare::{compare_assignments, AssignmentReport};
pub use ranking::{optimality_factor, rank_cliques, CliqueRanking, RankedClique};
pub use report::{write_comparison, write_ranking};

pub(crate) use report::format_nodes;
