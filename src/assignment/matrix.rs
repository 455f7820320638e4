//! Cost matrix construction.

use crate::error::{RendezvousError, Result};
use crate::models::{CostMatrix, GridMap, Node};
use crate::router::Router;

/// Builds the agents × goals matrix of shortest-path lengths.
///
/// One distance table is computed per goal and read for every start, so the
/// cost is k router searches.
///
/// # Errors
/// - [`RendezvousError::DimensionMismatch`] if `starts` and `goals` differ in
///   length.
/// - [`RendezvousError::Unreachable`] if some goal cannot be reached from
///   some start.
pub fn build_cost_matrix(
    map: &GridMap,
    starts: &[Node],
    goals: &[Node],
    router: &dyn Router,
) -> Result<CostMatrix> {
    if starts.len() != goals.len() {
        return Err(RendezvousError::DimensionMismatch(format!(
            "{} agents but {} goals",
            starts.len(),
            goals.len()
        )));
    }

    let tables: Vec<_> = goals.iter().map(|&g| router.distance_table(map, g)).collect();
    let rows = starts
        .iter()
        .map(|&start| {
            goals
                .iter()
                .zip(&tables)
                .map(|(&goal, table)| {
                    table
                        .get(start)
                        .map(u64::from)
                        .ok_or(RendezvousError::Unreachable { start, goal })
                })
                .collect::<Result<Vec<u64>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    CostMatrix::new(rows)
}
