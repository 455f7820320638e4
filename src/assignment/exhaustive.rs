//! Exhaustive permutation search.
//!
//! Ground-truth oracle for small agent counts. Permutations are visited in
//! lexicographic order and the first minimum wins.

use super::{rank, AssignmentOutcome, CostOracle};
use crate::error::{RendezvousError, Result};
use crate::models::Assignment;

/// Largest agent count accepted (10! ≈ 3.6M permutations).
pub const MAX_EXHAUSTIVE_AGENTS: usize = 10;

/// Evaluates every permutation and returns the cheapest.
///
/// # Errors
/// [`RendezvousError::InvalidConfiguration`] for more than
/// [`MAX_EXHAUSTIVE_AGENTS`] agents; oracle errors are propagated.
pub fn solve_assignment_exhaustive<O: CostOracle + ?Sized>(oracle: &O) -> Result<AssignmentOutcome> {
    let n = oracle.size();
    if n > MAX_EXHAUSTIVE_AGENTS {
        return Err(RendezvousError::InvalidConfiguration(format!(
            "exhaustive assignment supports at most {MAX_EXHAUSTIVE_AGENTS} agents, got {n}"
        )));
    }

    let mut permutation: Vec<usize> = (0..n).collect();
    let mut best = permutation.clone();
    let mut best_cost = oracle.cost(&permutation)?;
    let mut evaluations = 1usize;

    while next_permutation(&mut permutation) {
        let cost = oracle.cost(&permutation)?;
        evaluations += 1;
        if rank(cost) < rank(best_cost) {
            best_cost = cost;
            best.copy_from_slice(&permutation);
        }
    }

    log::debug!("exhaustive assignment: k={n}, {evaluations} permutations, best={best_cost:?}");
    Ok(AssignmentOutcome {
        assignment: Assignment::from_permutation_unchecked(best),
        cost: best_cost,
        trajectories: Vec::new(),
        evaluations,
    })
}

/// Advances to the next lexicographic permutation; `false` after the last.
fn next_permutation(items: &mut [usize]) -> bool {
    let Some(i) = items.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let Some(j) = items.iter().rposition(|&x| x > items[i]) else {
        return false;
    };
    items.swap(i, j);
    items[i + 1..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CostMatrix;

    #[test]
    fn test_visits_all_permutations() {
        let mut p = vec![0, 1, 2, 3];
        let mut count = 1;
        while next_permutation(&mut p) {
            count += 1;
        }
        assert_eq!(count, 24);
        assert_eq!(p, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_finds_minimum() {
        let m = CostMatrix::new(vec![vec![4, 1, 3], vec![2, 0, 5], vec![3, 2, 2]]).unwrap();
        let out = solve_assignment_exhaustive(&m).unwrap();
        assert_eq!(out.cost, Some(5));
        assert_eq!(out.evaluations, 6);
    }

    #[test]
    fn test_largest_entries_do_not_overflow() {
        let limit = u64::MAX / 2;
        let m = CostMatrix::new(vec![vec![limit, limit - 1], vec![limit, limit]]).unwrap();
        let out = solve_assignment_exhaustive(&m).unwrap();
        assert_eq!(out.cost, Some(2 * limit - 1));
        assert_eq!(out.assignment.as_slice(), &[1, 0]);
    }

    #[test]
    fn test_rejects_large_k() {
        let m = CostMatrix::new(vec![vec![0; 11]; 11]).unwrap();
        assert!(matches!(
            solve_assignment_exhaustive(&m),
            Err(RendezvousError::InvalidConfiguration(_))
        ));
    }

    struct PartialOracle;

    impl CostOracle for PartialOracle {
        fn size(&self) -> usize {
            3
        }

        fn cost(&self, permutation: &[usize]) -> Result<Option<u64>> {
            // Only permutations starting with goal 2 are known.
            Ok((permutation[0] == 2).then(|| permutation[1] as u64))
        }
    }

    #[test]
    fn test_unavailable_costs_rank_last() {
        let out = solve_assignment_exhaustive(&PartialOracle).unwrap();
        assert_eq!(out.assignment.as_slice(), &[2, 0, 1]);
        assert_eq!(out.cost, Some(0));
    }
}
