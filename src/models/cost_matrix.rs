//! Agents × goals cost matrix.
//!
//! `matrix[i][j]` is the collision-ignorant shortest-path length for agent
//! `i` to reach goal `j`. Built by [`crate::assignment::build_cost_matrix`].

use serde::{Deserialize, Serialize};

use crate::error::{RendezvousError, Result};

/// Square matrix of non-negative integer costs.
///
/// Every entry is at most `u64::MAX / n`, so the cost of any permutation
/// fits in a `u64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCostMatrix")]
pub struct CostMatrix {
    rows: Vec<Vec<u64>>,
}

#[derive(Deserialize)]
struct RawCostMatrix {
    rows: Vec<Vec<u64>>,
}

impl TryFrom<RawCostMatrix> for CostMatrix {
    type Error = RendezvousError;

    fn try_from(raw: RawCostMatrix) -> Result<Self> {
        Self::new(raw.rows)
    }
}

impl CostMatrix {
    /// Creates a matrix.
    ///
    /// # Errors
    /// - [`RendezvousError::DimensionMismatch`] for non-square input.
    /// - [`RendezvousError::InvalidConfiguration`] if an entry exceeds
    ///   `u64::MAX / n`.
    pub fn new(rows: Vec<Vec<u64>>) -> Result<Self> {
        let n = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(RendezvousError::DimensionMismatch(format!(
                "cost matrix row {i} has {} goals but there are {n} agents",
                row.len()
            )));
        }
        let limit = u64::MAX / n.max(1) as u64;
        for (i, row) in rows.iter().enumerate() {
            if let Some((j, c)) = row.iter().enumerate().find(|(_, &c)| c > limit) {
                return Err(RendezvousError::InvalidConfiguration(format!(
                    "cost {c} at ({i}, {j}) exceeds {limit}, the largest entry a {n}x{n} matrix can sum"
                )));
            }
        }
        Ok(Self { rows })
    }

    /// Number of agents (= number of goals).
    #[inline]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Whether the matrix has no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cost for agent `agent` to reach goal `goal`.
    #[inline]
    pub fn get(&self, agent: usize, goal: usize) -> u64 {
        self.rows[agent][goal]
    }

    /// Row slices.
    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    /// Sum of costs for a permutation (`permutation[agent] = goal`).
    ///
    /// The permutation must pass [`Self::check_permutation`].
    pub fn permutation_cost(&self, permutation: &[usize]) -> u64 {
        permutation
            .iter()
            .enumerate()
            .map(|(agent, &goal)| self.rows[agent][goal])
            .sum()
    }

    /// Verifies `permutation` has one entry per agent and uses every goal
    /// index exactly once.
    pub fn check_permutation(&self, permutation: &[usize]) -> Result<()> {
        let n = self.size();
        if permutation.len() != n {
            return Err(RendezvousError::DimensionMismatch(format!(
                "permutation covers {} agents, matrix has {n}",
                permutation.len()
            )));
        }
        let mut seen = vec![false; n];
        for &goal in permutation {
            if goal >= n || std::mem::replace(&mut seen[goal], true) {
                return Err(RendezvousError::DimensionMismatch(format!(
                    "{permutation:?} is not a permutation of 0..{n}"
                )));
            }
        }
        Ok(())
    }

    /// Returns a copy with rows and columns reordered.
    ///
    /// Entry `(i, j)` of the result is entry `(row_order[i], col_order[j])`
    /// of `self`.
    pub fn permuted(&self, row_order: &[usize], col_order: &[usize]) -> Self {
        let rows = row_order
            .iter()
            .map(|&r| col_order.iter().map(|&c| self.rows[r][c]).collect())
            .collect();
        Self { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_square_rejected() {
        let err = CostMatrix::new(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(err, RendezvousError::DimensionMismatch(_)));
    }

    #[test]
    fn test_permutation_cost() {
        let m = CostMatrix::new(vec![vec![4, 1], vec![2, 7]]).unwrap();
        assert_eq!(m.permutation_cost(&[0, 1]), 11);
        assert_eq!(m.permutation_cost(&[1, 0]), 3);
    }

    #[test]
    fn test_check_permutation_length() {
        let m = CostMatrix::new(vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert!(m.check_permutation(&[0, 1]).is_ok());
        assert!(matches!(
            m.check_permutation(&[0]),
            Err(RendezvousError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_check_permutation_indices() {
        let m = CostMatrix::new(vec![vec![1, 2], vec![3, 4]]).unwrap();
        for bad in [[5, 0], [0, 0], [1, 1]] {
            assert!(matches!(
                m.check_permutation(&bad),
                Err(RendezvousError::DimensionMismatch(_))
            ));
        }
        assert!(m.check_permutation(&[1, 0]).is_ok());
    }

    #[test]
    fn test_entries_bounded_by_size() {
        let err = CostMatrix::new(vec![vec![u64::MAX, 1], vec![1, u64::MAX]]).unwrap_err();
        assert!(matches!(err, RendezvousError::InvalidConfiguration(_)));

        let limit = u64::MAX / 2;
        let m = CostMatrix::new(vec![vec![limit, 1], vec![1, limit]]).unwrap();
        assert_eq!(m.permutation_cost(&[0, 1]), limit * 2);

        // A single agent may use the whole range.
        assert!(CostMatrix::new(vec![vec![u64::MAX]]).is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let m: CostMatrix = serde_json::from_str(r#"{"rows":[[1,2],[3,4]]}"#).unwrap();
        assert_eq!(m.get(1, 0), 3);
        assert!(serde_json::from_str::<CostMatrix>(r#"{"rows":[[1,2],[3]]}"#).is_err());
        assert!(
            serde_json::from_str::<CostMatrix>(&format!(r#"{{"rows":[[{0},1],[1,{0}]]}}"#, u64::MAX))
                .is_err()
        );
    }

    #[test]
    fn test_permuted() {
        let m = CostMatrix::new(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let p = m.permuted(&[1, 0], &[1, 0]);
        assert_eq!(p.rows(), &[vec![4, 3], vec![2, 1]]);
    }
}
