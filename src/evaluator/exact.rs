//! Assignment local search on exact planner costs.
//!
//! # Algorithm
//! 1. Start from the optimal assignment on the heuristic matrix.
//! 2. Obtain an exact baseline cost with [`evaluate_until_success`]
//!    (reshuffling on timeouts, bounded by the retry policy).
//! 3. Hill-climb from the baseline with an [`ExternalOracle`], using the
//!    same first-improvement swap scan as the heuristic local search.
//!    Permutations that timed out during step 2 are never re-submitted.

use std::collections::HashMap;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::{evaluate_until_success, BoundedEvaluator, EvaluationConfig, ExternalOracle};
use crate::assignment::{climb_with_known, solve_assignment_optimal, AssignmentOutcome};
use crate::error::Result;
use crate::models::{CostMatrix, GridMap, Node};

/// Minimises the exact multi-agent cost over assignments of `goals`.
///
/// `matrix` is the heuristic cost matrix for the same starts and goals. The
/// evaluator's own timeout applies to every call; `config` supplies the
/// retry policy and the timeout fallback.
///
/// # Errors
/// [`crate::RendezvousError::RetryBudgetExhausted`] if no baseline could be
/// evaluated; planner errors; [`crate::RendezvousError::EvaluationTimeout`]
/// with [`super::TimeoutFallback::Fail`].
pub fn solve_assignment_exact(
    evaluator: &BoundedEvaluator,
    map: &GridMap,
    starts: &[Node],
    goals: &[Node],
    matrix: &CostMatrix,
    config: &EvaluationConfig,
    seed: Option<u64>,
) -> Result<AssignmentOutcome> {
    config.validate()?;
    let oracle = ExternalOracle::new(evaluator, map, starts, goals, matrix)?
        .with_fallback(config.on_timeout);

    let initial = solve_assignment_optimal(matrix)?.assignment.as_slice().to_vec();
    let mut rng = match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_os_rng(),
    };
    let baseline =
        evaluate_until_success(evaluator, map, starts, goals, initial, &config.retry, &mut rng)?;

    let known = baseline
        .timed_out
        .iter()
        .map(|p| Ok((p.clone(), oracle.known_timeout_cost(p)?)))
        .collect::<Result<HashMap<_, _>>>()?;
    let (assignment, mut stats) =
        climb_with_known(&oracle, baseline.permutation, Some(baseline.cost), known)?;
    stats.evaluations += baseline.attempts as usize;

    log::info!(
        "exact assignment: baseline {} -> {:?} after {} swaps ({} planner calls, {} timeouts)",
        baseline.cost,
        stats.final_cost,
        stats.accepted_swaps,
        stats.evaluations,
        oracle.timeouts()
    );

    Ok(AssignmentOutcome {
        assignment,
        cost: stats.final_cost,
        trajectories: vec![stats],
        evaluations: stats.evaluations,
    })
}
