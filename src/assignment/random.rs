//! Random assignment baseline.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::AssignmentOutcome;
use crate::error::Result;
use crate::models::{Assignment, CostMatrix};

/// Shuffled permutation, costed on `matrix`.
///
/// `seed` makes the draw reproducible; `None` seeds from the thread RNG.
pub fn solve_assignment_random(matrix: &CostMatrix, seed: Option<u64>) -> Result<AssignmentOutcome> {
    let mut rng = match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_os_rng(),
    };
    let mut permutation: Vec<usize> = (0..matrix.size()).collect();
    permutation.shuffle(&mut rng);
    let cost = matrix.permutation_cost(&permutation);
    Ok(AssignmentOutcome::single(
        Assignment::from_permutation_unchecked(permutation),
        cost,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_permutation() {
        let m = CostMatrix::new(vec![vec![1, 2, 3]; 3]).unwrap();
        let out = solve_assignment_random(&m, Some(42)).unwrap();
        assert!(Assignment::new(out.assignment.as_slice().to_vec()).is_ok());
        assert_eq!(out.cost, Some(6));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let m = CostMatrix::new((0..6).map(|i| (0..6).map(|j| i * j).collect()).collect()).unwrap();
        let a = solve_assignment_random(&m, Some(7)).unwrap();
        let b = solve_assignment_random(&m, Some(7)).unwrap();
        assert_eq!(a, b);
    }
}
