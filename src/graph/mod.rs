//! Connectivity graphs over free grid cells.
//!
//! A connectivity graph links free cells that are "close enough" to act as
//! meeting points for the same group of agents. Goal placement then looks
//! for a clique (all pairs adjacent) of the required size.
//!
//! # Submodules
//!
//! - [`ConnectivityGraph`] construction under a [`ConnectionCriterion`]
//! - [`reduce_graph`]: k-core filter applied before clique search
//! - [`line_of_sight`]: legacy obstacle-weighted distance predicate
//! - text serialisation (`(x y) > (x y),(x y)`), see
//!   [`ConnectivityGraph::to_text`] / [`ConnectivityGraph::parse`]

mod connectivity;
pub mod line_of_sight;
mod reduce;
mod text;

pub use connectivity::{ConnectionCriterion, ConnectivityGraph, DEFAULT_CONNECTION_DISTANCE};
pub use reduce::reduce_graph;
