//! Optimal assignment (Hungarian algorithm).
//!
//! # Algorithm
//! Dense shortest-augmenting-path formulation with row/column potentials
//! `u`, `v`. Each agent row is inserted in turn; a Dijkstra-like sweep over
//! reduced costs finds the cheapest augmenting path to a free goal column,
//! the potentials are updated by the minimum slack, and the path is
//! flipped.
//!
//! # Complexity
//! O(k³) time, O(k) extra space.

use super::AssignmentOutcome;
use crate::error::{RendezvousError, Result};
use crate::models::{Assignment, CostMatrix};

/// Minimum-cost perfect matching on `matrix`.
///
/// # Errors
/// [`RendezvousError::InvalidConfiguration`] if a cost does not fit the
/// signed working range.
pub fn solve_assignment_optimal(matrix: &CostMatrix) -> Result<AssignmentOutcome> {
    let costs = signed_costs(matrix)?;
    let permutation = hungarian(&costs);
    let cost = matrix.permutation_cost(&permutation);
    log::trace!("hungarian: k={} cost={cost}", matrix.size());
    Ok(AssignmentOutcome::single(
        Assignment::from_permutation_unchecked(permutation),
        cost,
    ))
}

/// Upper bound on individual costs; keeps potential arithmetic clear of
/// overflow for any realistic k.
const MAX_COST: u64 = (i64::MAX / 16) as u64;

fn signed_costs(matrix: &CostMatrix) -> Result<Vec<Vec<i64>>> {
    matrix
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|&c| {
                    if c > MAX_COST {
                        Err(RendezvousError::InvalidConfiguration(format!(
                            "cost {c} exceeds the supported maximum {MAX_COST}"
                        )))
                    } else {
                        Ok(c as i64)
                    }
                })
                .collect()
        })
        .collect()
}

/// Returns `permutation[row] = column`.
fn hungarian(costs: &[Vec<i64>]) -> Vec<usize> {
    let n = costs.len();
    if n == 0 {
        return Vec::new();
    }

    let inf = i64::MAX / 4;
    let mut u = vec![0i64; n + 1];
    let mut v = vec![0i64; n + 1];
    // p[j]: row matched to column j (1-based, 0 = none).
    let mut p = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![inf; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = inf;
            let mut j1 = 0usize;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = costs[i0 - 1][j - 1] - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // Flip the augmenting path.
        while j0 != 0 {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
        }
    }

    let mut permutation = vec![0usize; n];
    for j in 1..=n {
        if p[j] > 0 {
            permutation[p[j] - 1] = j - 1;
        }
    }
    permutation
}
