//! Agent → goal assignment model.

use serde::{Deserialize, Serialize};

use super::{Clique, Node};
use crate::error::{RendezvousError, Result};

/// A bijection from agent index to goal index.
///
/// `goal_of(agent)` indexes into the goal list the assignment was solved
/// against (usually the nodes of a [`Clique`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    permutation: Vec<usize>,
}

impl Assignment {
    /// Creates an assignment, verifying it is a permutation of `0..n`.
    pub fn new(permutation: Vec<usize>) -> Result<Self> {
        let n = permutation.len();
        let mut seen = vec![false; n];
        for &g in &permutation {
            if g >= n || std::mem::replace(&mut seen[g], true) {
                return Err(RendezvousError::DimensionMismatch(format!(
                    "{permutation:?} is not a permutation of 0..{n}"
                )));
            }
        }
        Ok(Self { permutation })
    }

    /// The identity assignment (agent `i` → goal `i`).
    pub fn identity(n: usize) -> Self {
        Self {
            permutation: (0..n).collect(),
        }
    }

    pub(crate) fn from_permutation_unchecked(permutation: Vec<usize>) -> Self {
        Self { permutation }
    }

    /// Goal index for an agent.
    #[inline]
    pub fn goal_of(&self, agent: usize) -> usize {
        self.permutation[agent]
    }

    /// The underlying permutation.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.permutation
    }

    /// Number of agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.permutation.len()
    }

    /// Whether there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.permutation.is_empty()
    }

    /// Resolves the goal node for every agent, in agent order.
    pub fn goals_for(&self, goals: &[Node]) -> Result<Vec<Node>> {
        if goals.len() != self.permutation.len() {
            return Err(RendezvousError::DimensionMismatch(format!(
                "assignment covers {} agents but {} goals were given",
                self.permutation.len(),
                goals.len()
            )));
        }
        Ok(self.permutation.iter().map(|&g| goals[g]).collect())
    }

    /// Resolves goal nodes from a clique.
    pub fn goals_in(&self, clique: &Clique) -> Result<Vec<Node>> {
        self.goals_for(clique.nodes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_repeats() {
        assert!(Assignment::new(vec![0, 0]).is_err());
        assert!(Assignment::new(vec![0, 2]).is_err());
        assert!(Assignment::new(vec![1, 0]).is_ok());
    }

    #[test]
    fn test_goals_for() {
        let a = Assignment::new(vec![2, 0, 1]).unwrap();
        let goals = [Node::new(0, 0), Node::new(1, 0), Node::new(2, 0)];
        assert_eq!(
            a.goals_for(&goals).unwrap(),
            vec![Node::new(2, 0), Node::new(0, 0), Node::new(1, 0)]
        );
    }

    #[test]
    fn test_goals_for_length_mismatch() {
        let a = Assignment::identity(2);
        assert!(matches!(
            a.goals_for(&[Node::new(0, 0)]),
            Err(RendezvousError::DimensionMismatch(_))
        ));
    }
}
