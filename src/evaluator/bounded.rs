//! Deadline-bounded planner calls.
//!
//! # Protocol
//! 1. Spawn a worker thread owning a private copy of the instance and the
//!    sending half of a one-slot channel.
//! 2. Wait on the receiving half in slices of at most one poll interval
//!    until a result arrives or the deadline passes.
//! 3. On deadline, set the worker's cancel flag, drop the receiver and
//!    report [`EvaluationOutcome::TimedOut`]. The worker is detached; a late
//!    result lands in a channel nobody reads.
//!
//! Control returns to the caller within the timeout plus thread-spawn
//! overhead, whether or not the planner honours cancellation.

use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::{CancelToken, EvaluationConfig, EvaluationOutcome, PathPlanner};
use crate::error::{RendezvousError, Result};
use crate::models::{GridMap, Node};

/// Runs a [`PathPlanner`] under a wall-clock budget.
#[derive(Clone)]
pub struct BoundedEvaluator {
    planner: Arc<dyn PathPlanner>,
    timeout: Duration,
    poll_interval: Duration,
}

impl fmt::Debug for BoundedEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedEvaluator")
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl BoundedEvaluator {
    /// Wraps `planner` with a 60 s timeout and 1 s polling.
    pub fn new(planner: impl PathPlanner) -> Self {
        Self::from_arc(Arc::new(planner))
    }

    /// Wraps a shared planner.
    pub fn from_arc(planner: Arc<dyn PathPlanner>) -> Self {
        Self {
            planner,
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
        }
    }

    /// Wraps `planner` using the timing fields of `config`.
    pub fn from_config(planner: impl PathPlanner, config: &EvaluationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(planner)
            .with_timeout(config.timeout())
            .with_poll_interval(config.poll_interval()))
    }

    /// Sets the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the polling interval (clamped to at least 1 ms).
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }

    /// Per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Evaluates `goals` (agent `i` → `goals[i]`) with the default timeout.
    pub fn evaluate(&self, map: &GridMap, starts: &[Node], goals: &[Node]) -> Result<EvaluationOutcome> {
        self.evaluate_with_timeout(map, starts, goals, self.timeout)
    }

    /// Evaluates with an explicit timeout.
    ///
    /// # Errors
    /// - [`RendezvousError::DimensionMismatch`] if `starts` and `goals`
    ///   differ in length.
    /// - Any error returned by the planner within the budget.
    /// - [`RendezvousError::Planner`] if the worker could not be spawned or
    ///   died without reporting.
    pub fn evaluate_with_timeout(
        &self,
        map: &GridMap,
        starts: &[Node],
        goals: &[Node],
        timeout: Duration,
    ) -> Result<EvaluationOutcome> {
        if starts.len() != goals.len() {
            return Err(RendezvousError::DimensionMismatch(format!(
                "{} agents but {} goals",
                starts.len(),
                goals.len()
            )));
        }

        let cancel = CancelToken::new();
        let (tx, rx) = mpsc::sync_channel::<Result<u64>>(1);
        let planner = Arc::clone(&self.planner);
        let worker_cancel = cancel.clone();
        let (map, starts, goals) = (map.clone(), starts.to_vec(), goals.to_vec());

        let started = Instant::now();
        thread::Builder::new()
            .name("rendezvous-evaluator".into())
            .spawn(move || {
                let result = planner.solve_cost(&map, &starts, &goals, &worker_cancel);
                // The receiver is gone once the caller has timed out.
                let _ = tx.send(result);
            })
            .map_err(|e| RendezvousError::Planner(format!("cannot spawn evaluator worker: {e}")))?;

        // An unrepresentable deadline means waiting without limit.
        let deadline = started.checked_add(timeout);
        loop {
            let now = Instant::now();
            let wait = match deadline {
                Some(d) if now >= d => {
                    cancel.cancel();
                    log::warn!("external evaluation timed out after {timeout:?}");
                    return Ok(EvaluationOutcome::TimedOut);
                }
                Some(d) => (d - now).min(self.poll_interval),
                None => self.poll_interval,
            };
            match rx.recv_timeout(wait) {
                Ok(Ok(cost)) => {
                    log::debug!("external evaluation finished in {:?}: cost {cost}", started.elapsed());
                    return Ok(EvaluationOutcome::Completed(cost));
                }
                Ok(Err(e)) => return Err(e),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(RendezvousError::Planner(
                        "evaluator worker exited without reporting a cost".into(),
                    ));
                }
            }
        }
    }
}
