//! Multi-trajectory hill climbing over assignments.
//!
//! # Algorithm
//! Each of T trajectories starts from an independently shuffled
//! permutation and repeatedly scans pairs `(i, j)`, `i < j`, in a fixed
//! order. The first swap that strictly lowers the cost is accepted and the
//! scan restarts; a full scan without improvement ends the trajectory.
//! Costs of permutations already seen by the trajectory are cached. The
//! cheapest local optimum over all trajectories is returned.
//!
//! Trajectories share nothing but the read-only oracle and run on rayon
//! when `parallel` is set. With a fixed seed, trajectory `t` uses its own
//! seed derived from `(seed, t)`, so results do not depend on scheduling.
//!
//! # Complexity
//! O(k²) oracle lookups per accepted swap, per trajectory.

use std::collections::HashMap;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{rank, AssignmentOutcome, CostOracle, TrajectoryStats};
use crate::error::{RendezvousError, Result};
use crate::models::{Assignment, CostMatrix};

/// Local search parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSearchConfig {
    /// Independent trajectories (≥ 1).
    pub trajectories: usize,
    /// Base seed; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
    /// Run trajectories on the rayon pool.
    pub parallel: bool,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            trajectories: 10,
            seed: None,
            parallel: true,
        }
    }
}

impl LocalSearchConfig {
    /// Sets the number of trajectories.
    pub fn with_trajectories(mut self, trajectories: usize) -> Self {
        self.trajectories = trajectories;
        self
    }

    /// Fixes the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel trajectories.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Rejects zero trajectories.
    pub fn validate(&self) -> Result<()> {
        if self.trajectories == 0 {
            return Err(RendezvousError::InvalidConfiguration(
                "local search needs at least one trajectory".into(),
            ));
        }
        Ok(())
    }
}

/// Local search on the heuristic cost matrix.
pub fn solve_assignment_local_search(
    matrix: &CostMatrix,
    config: &LocalSearchConfig,
) -> Result<AssignmentOutcome> {
    local_search_with_oracle(matrix, config)
}

/// Local search against any cost oracle.
pub fn local_search_with_oracle<O: CostOracle + ?Sized>(
    oracle: &O,
    config: &LocalSearchConfig,
) -> Result<AssignmentOutcome> {
    config.validate()?;
    let base_seed = config.seed.unwrap_or_else(rand::random::<u64>);

    let run = |t: usize| -> Result<(Assignment, TrajectoryStats)> {
        let mut rng = SmallRng::seed_from_u64(trajectory_seed(base_seed, t));
        let mut start: Vec<usize> = (0..oracle.size()).collect();
        start.shuffle(&mut rng);
        let initial = oracle.cost(&start)?;
        let (assignment, mut stats) = climb(oracle, start, initial)?;
        stats.evaluations += 1;
        Ok((assignment, stats))
    };

    let results: Vec<(Assignment, TrajectoryStats)> = if config.parallel {
        (0..config.trajectories)
            .into_par_iter()
            .map(run)
            .collect::<Result<_>>()?
    } else {
        (0..config.trajectories).map(run).collect::<Result<_>>()?
    };

    // Ties go to the lowest trajectory index.
    let mut best_idx = 0usize;
    for (i, (_, stats)) in results.iter().enumerate() {
        if rank(stats.final_cost) < rank(results[best_idx].1.final_cost) {
            best_idx = i;
        }
    }

    let evaluations = results.iter().map(|(_, s)| s.evaluations).sum();
    let trajectories: Vec<TrajectoryStats> = results.iter().map(|(_, s)| *s).collect();
    let (assignment, best) = results.into_iter().nth(best_idx).ok_or_else(|| {
        RendezvousError::InvalidConfiguration("local search produced no trajectory".into())
    })?;

    log::debug!(
        "local search: k={} trajectories={} best={:?} evaluations={evaluations}",
        oracle.size(),
        trajectories.len(),
        best.final_cost
    );

    Ok(AssignmentOutcome {
        assignment,
        cost: best.final_cost,
        trajectories,
        evaluations,
    })
}

/// First-improvement pairwise-swap descent from `start`.
///
/// `start_cost` is the already-known cost of `start`. The returned stats
/// count oracle calls made by the climb itself.
pub fn climb<O: CostOracle + ?Sized>(
    oracle: &O,
    start: Vec<usize>,
    start_cost: Option<u64>,
) -> Result<(Assignment, TrajectoryStats)> {
    climb_with_known(oracle, start, start_cost, HashMap::new())
}

/// [`climb`] with costs already known for some permutations.
///
/// Permutations in `known` are never passed to the oracle; their recorded
/// cost is used instead (`None` = unavailable, never accepted).
pub fn climb_with_known<O: CostOracle + ?Sized>(
    oracle: &O,
    start: Vec<usize>,
    start_cost: Option<u64>,
    known: HashMap<Vec<usize>, Option<u64>>,
) -> Result<(Assignment, TrajectoryStats)> {
    let n = start.len();
    let mut explored = known;
    explored.insert(start.clone(), start_cost);

    let mut current = start;
    let mut cost = start_cost;
    let mut stats = TrajectoryStats {
        initial_cost: start_cost,
        final_cost: start_cost,
        accepted_swaps: 0,
        evaluations: 0,
    };

    'scan: loop {
        for i in 0..n {
            for j in i + 1..n {
                let mut candidate = current.clone();
                candidate.swap(i, j);
                let candidate_cost = match explored.get(&candidate) {
                    Some(&c) => c,
                    None => {
                        let c = oracle.cost(&candidate)?;
                        stats.evaluations += 1;
                        explored.insert(candidate.clone(), c);
                        c
                    }
                };
                if candidate_cost.is_some() && rank(candidate_cost) < rank(cost) {
                    current = candidate;
                    cost = candidate_cost;
                    stats.accepted_swaps += 1;
                    continue 'scan;
                }
            }
        }
        break;
    }

    stats.final_cost = cost;
    Ok((Assignment::from_permutation_unchecked(current), stats))
}

fn trajectory_seed(base: u64, trajectory: usize) -> u64 {
    splitmix64(base ^ trajectory as u64)
}

/// SplitMix64 mixer for deriving per-trajectory seeds.
#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::solve_assignment_optimal;
    use rand::Rng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn random_matrix(rng: &mut SmallRng, n: usize) -> CostMatrix {
        CostMatrix::new(
            (0..n)
                .map(|_| (0..n).map(|_| rng.random_range(0..100)).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_trajectories_never_worsen() {
        let mut rng = SmallRng::seed_from_u64(42);
        for n in [2, 4, 7, 12] {
            let m = random_matrix(&mut rng, n);
            let cfg = LocalSearchConfig::default().with_trajectories(8).with_seed(42);
            let out = solve_assignment_local_search(&m, &cfg).unwrap();
            assert_eq!(out.trajectories.len(), 8);
            for t in &out.trajectories {
                assert!(t.final_cost <= t.initial_cost);
                assert!(out.cost <= t.final_cost);
            }
            assert_eq!(out.cost, Some(m.permutation_cost(out.assignment.as_slice())));
        }
    }

    #[test]
    fn test_never_beats_optimal() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..10 {
            let m = random_matrix(&mut rng, 6);
            let optimal = solve_assignment_optimal(&m).unwrap().cost;
            let out = solve_assignment_local_search(&m, &LocalSearchConfig::default().with_seed(1))
                .unwrap();
            assert!(out.cost >= optimal);
        }
    }

    #[test]
    fn test_seeded_runs_reproducible() {
        let mut rng = SmallRng::seed_from_u64(42);
        let m = random_matrix(&mut rng, 9);
        let cfg = LocalSearchConfig::default().with_trajectories(6).with_seed(99);
        let parallel = solve_assignment_local_search(&m, &cfg).unwrap();
        let sequential =
            solve_assignment_local_search(&m, &cfg.clone().with_parallel(false)).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_climb_reaches_swap_local_optimum() {
        let m = CostMatrix::new(vec![vec![4, 1, 3], vec![2, 0, 5], vec![3, 2, 2]]).unwrap();
        let start = vec![2, 1, 0];
        let start_cost = m.permutation_cost(&start);
        let (assignment, stats) = climb(&m, start, Some(start_cost)).unwrap();
        let p = assignment.as_slice().to_vec();
        let cost = m.permutation_cost(&p);
        assert_eq!(stats.final_cost, Some(cost));
        for i in 0..3 {
            for j in i + 1..3 {
                let mut q = p.clone();
                q.swap(i, j);
                assert!(m.permutation_cost(&q) >= cost);
            }
        }
    }

    struct CountingOracle {
        inner: CostMatrix,
        calls: AtomicUsize,
    }

    impl CostOracle for CountingOracle {
        fn size(&self) -> usize {
            self.inner.size()
        }

        fn cost(&self, permutation: &[usize]) -> Result<Option<u64>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            CostOracle::cost(&self.inner, permutation)
        }
    }

    #[test]
    fn test_cache_avoids_reevaluation() {
        let mut rng = SmallRng::seed_from_u64(42);
        let oracle = CountingOracle {
            inner: random_matrix(&mut rng, 5),
            calls: AtomicUsize::new(0),
        };
        let cfg = LocalSearchConfig::default().with_trajectories(1).with_seed(3);
        let out = local_search_with_oracle(&oracle, &cfg).unwrap();
        assert_eq!(out.evaluations, oracle.calls.load(Ordering::Relaxed));
        // Each scan evaluates at most C(5, 2) = 10 swaps.
        let scans = out.trajectories[0].accepted_swaps + 1;
        assert!(out.evaluations <= 1 + scans * 10);
    }

    #[test]
    fn test_known_costs_not_reevaluated() {
        let oracle = CountingOracle {
            inner: CostMatrix::new(vec![vec![1, 5], vec![5, 1]]).unwrap(),
            calls: AtomicUsize::new(0),
        };
        let known = HashMap::from([(vec![0, 1], None)]);
        let (assignment, stats) = climb_with_known(&oracle, vec![1, 0], Some(10), known).unwrap();
        assert_eq!(assignment.as_slice(), &[1, 0]);
        assert_eq!(stats.final_cost, Some(10));
        assert_eq!(stats.evaluations, 0);
        assert_eq!(oracle.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_zero_trajectories_rejected() {
        let m = CostMatrix::new(vec![vec![1]]).unwrap();
        let cfg = LocalSearchConfig::default().with_trajectories(0);
        assert!(matches!(
            solve_assignment_local_search(&m, &cfg),
            Err(RendezvousError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_trajectory_seeds_differ() {
        assert_ne!(trajectory_seed(42, 0), trajectory_seed(42, 1));
        assert_eq!(trajectory_seed(42, 3), trajectory_seed(42, 3));
    }
}
