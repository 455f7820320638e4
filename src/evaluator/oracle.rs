//! Exact cost oracle backed by the bounded evaluator.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use super::{BoundedEvaluator, EvaluationOutcome};
use crate::assignment::CostOracle;
use crate::error::{RendezvousError, Result};
use crate::models::{CostMatrix, GridMap, Node};

/// Value given to a permutation whose evaluation timed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutFallback {
    /// Collision-ignorant cost of the same permutation from the heuristic
    /// matrix (a lower bound on the exact cost).
    LowerBound,
    /// No cost; the search treats the permutation as unusable.
    #[default]
    Discard,
    /// Abort with [`RendezvousError::EvaluationTimeout`].
    Fail,
}

/// [`CostOracle`] that asks the external planner for every permutation.
///
/// Every call is a bounded planner run, so searches using this oracle are
/// orders of magnitude slower than on the heuristic matrix.
#[derive(Debug)]
pub struct ExternalOracle<'a> {
    evaluator: &'a BoundedEvaluator,
    map: &'a GridMap,
    starts: &'a [Node],
    goals: &'a [Node],
    lower_bound: &'a CostMatrix,
    fallback: TimeoutFallback,
    timeouts: AtomicUsize,
}

impl<'a> ExternalOracle<'a> {
    /// Creates an oracle over `goals`, with `lower_bound` as the heuristic
    /// matrix for the same starts and goals.
    ///
    /// # Errors
    /// [`RendezvousError::DimensionMismatch`] if starts, goals and matrix
    /// sizes disagree.
    pub fn new(
        evaluator: &'a BoundedEvaluator,
        map: &'a GridMap,
        starts: &'a [Node],
        goals: &'a [Node],
        lower_bound: &'a CostMatrix,
    ) -> Result<Self> {
        if starts.len() != goals.len() || lower_bound.size() != goals.len() {
            return Err(RendezvousError::DimensionMismatch(format!(
                "{} agents, {} goals, {}x{} cost matrix",
                starts.len(),
                goals.len(),
                lower_bound.size(),
                lower_bound.size()
            )));
        }
        Ok(Self {
            evaluator,
            map,
            starts,
            goals,
            lower_bound,
            fallback: TimeoutFallback::default(),
            timeouts: AtomicUsize::new(0),
        })
    }

    /// Sets the timeout fallback.
    pub fn with_fallback(mut self, fallback: TimeoutFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Evaluations that timed out so far.
    pub fn timeouts(&self) -> usize {
        self.timeouts.load(Ordering::Relaxed)
    }

    /// Cost recorded for a permutation already known to time out, without
    /// calling the planner again.
    ///
    /// [`TimeoutFallback::LowerBound`] gives the heuristic cost; `Discard`
    /// and `Fail` give `None`, so the permutation is never accepted.
    pub fn known_timeout_cost(&self, permutation: &[usize]) -> Result<Option<u64>> {
        self.lower_bound.check_permutation(permutation)?;
        Ok(match self.fallback {
            TimeoutFallback::LowerBound => Some(self.lower_bound.permutation_cost(permutation)),
            TimeoutFallback::Discard | TimeoutFallback::Fail => None,
        })
    }
}

impl CostOracle for ExternalOracle<'_> {
    fn size(&self) -> usize {
        self.goals.len()
    }

    fn cost(&self, permutation: &[usize]) -> Result<Option<u64>> {
        self.lower_bound.check_permutation(permutation)?;
        let assigned: Vec<Node> = permutation.iter().map(|&g| self.goals[g]).collect();
        match self.evaluator.evaluate(self.map, self.starts, &assigned)? {
            EvaluationOutcome::Completed(cost) => Ok(Some(cost)),
            EvaluationOutcome::TimedOut => {
                self.timeouts.fetch_add(1, Ordering::Relaxed);
                if self.fallback == TimeoutFallback::Fail {
                    return Err(RendezvousError::EvaluationTimeout(self.evaluator.timeout()));
                }
                self.known_timeout_cost(permutation)
            }
        }
    }
}
