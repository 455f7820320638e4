//! Reshuffle-and-retry until the external planner finishes.
//!
//! Each timed-out permutation is remembered and never tried again; every
//! retry draws a fresh random permutation. The loop stops at the first
//! completed evaluation, when the [`RetryPolicy`] budget runs out, or when
//! every permutation has timed out.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{BoundedEvaluator, EvaluationOutcome};
use crate::error::{RendezvousError, Result};
use crate::models::{Assignment, GridMap, Node};

/// Limits for the retry-until-success loop.
///
/// Both limits are optional. With neither set ([`RetryPolicy::unbounded`])
/// the loop only ends on success or once all k! permutations have timed
/// out, which for realistic k means it may never return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum planner calls.
    pub max_attempts: Option<u32>,
    /// Maximum total wall-clock time, in seconds.
    pub max_elapsed_secs: Option<f64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Some(16),
            max_elapsed_secs: None,
        }
    }
}

impl RetryPolicy {
    /// No attempt or time limit.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            max_elapsed_secs: None,
        }
    }

    /// Caps the number of planner calls.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Caps total wall-clock time.
    pub fn with_max_elapsed_secs(mut self, secs: f64) -> Self {
        self.max_elapsed_secs = Some(secs);
        self
    }

    /// Rejects a zero attempt cap and non-positive time budgets.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == Some(0) {
            return Err(RendezvousError::InvalidConfiguration(
                "retry policy must allow at least one attempt".into(),
            ));
        }
        if let Some(secs) = self.max_elapsed_secs {
            if Duration::try_from_secs_f64(secs).map_or(true, |d| d.is_zero()) {
                return Err(RendezvousError::InvalidConfiguration(format!(
                    "retry time budget must be a positive, representable number of seconds, got {secs}"
                )));
            }
        }
        Ok(())
    }

    /// Whether another attempt may start after `attempts` calls and
    /// `elapsed` time.
    pub fn allows(&self, attempts: u32, elapsed: Duration) -> bool {
        let under_attempts = self.max_attempts.map_or(true, |max| attempts < max);
        let under_time = self
            .max_elapsed_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .map_or(true, |budget| elapsed < budget);
        under_attempts && under_time
    }
}

/// First permutation the planner finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrySuccess {
    /// `permutation[agent] = goal index`.
    pub permutation: Vec<usize>,
    /// Exact cost reported by the planner.
    pub cost: u64,
    /// Planner calls made, including the successful one.
    pub attempts: u32,
    /// Permutations that timed out before the successful one.
    pub timed_out: Vec<Vec<usize>>,
}

/// Evaluates `initial`, reshuffling on every timeout until a call completes.
///
/// # Errors
/// - [`RendezvousError::DimensionMismatch`] if `initial` is not a
///   permutation of the goal indices or agent and goal counts differ.
/// - [`RendezvousError::RetryBudgetExhausted`] when `policy` forbids another
///   attempt or every permutation has timed out.
/// - Planner errors from [`BoundedEvaluator::evaluate`].
pub fn evaluate_until_success<R: Rng>(
    evaluator: &BoundedEvaluator,
    map: &GridMap,
    starts: &[Node],
    goals: &[Node],
    initial: Vec<usize>,
    policy: &RetryPolicy,
    rng: &mut R,
) -> Result<RetrySuccess> {
    policy.validate()?;
    let mut candidate = Assignment::new(initial)?;
    let mut timed_out: HashSet<Assignment> = HashSet::new();
    let total = permutation_count(goals.len());
    let started = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let assigned = candidate.goals_for(goals)?;
        match evaluator.evaluate(map, starts, &assigned)? {
            EvaluationOutcome::Completed(cost) => {
                log::info!("exact baseline found after {attempts} attempt(s): cost {cost}");
                return Ok(RetrySuccess {
                    permutation: candidate.as_slice().to_vec(),
                    cost,
                    attempts,
                    timed_out: timed_out.into_iter().map(|a| a.as_slice().to_vec()).collect(),
                });
            }
            EvaluationOutcome::TimedOut => {
                timed_out.insert(candidate.clone());
                let elapsed = started.elapsed();
                let exhausted = total.is_some_and(|t| timed_out.len() as u64 >= t);
                if exhausted || !policy.allows(attempts, elapsed) {
                    log::warn!("giving up on exact baseline after {attempts} timed-out attempts");
                    return Err(RendezvousError::RetryBudgetExhausted { attempts, elapsed });
                }
                log::warn!("attempt {attempts} timed out; retrying with a fresh assignment");
                candidate = fresh_permutation(goals.len(), &timed_out, rng);
            }
        }
    }
}

/// Draws a random permutation not in `excluded`.
///
/// Callers guarantee at least one permutation remains.
fn fresh_permutation<R: Rng>(n: usize, excluded: &HashSet<Assignment>, rng: &mut R) -> Assignment {
    let mut permutation: Vec<usize> = (0..n).collect();
    loop {
        permutation.shuffle(rng);
        let candidate = Assignment::from_permutation_unchecked(permutation.clone());
        if !excluded.contains(&candidate) {
            return candidate;
        }
    }
}

/// n!, or `None` if it does not fit in a u64.
fn permutation_count(n: usize) -> Option<u64> {
    (1..=n as u64).try_fold(1u64, |acc, i| acc.checked_mul(i))
}
