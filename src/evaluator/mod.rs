//! Bounded-time evaluation against an external exact path planner.
//!
//! The exact multi-agent planner is slow and may never finish, so every
//! call runs on its own worker thread with a private result slot. The
//! caller waits at most the configured timeout, polling at a fixed
//! interval, then raises the worker's cancel flag and moves on.
//!
//! # Submodules
//!
//! - [`BoundedEvaluator`]: single-shot evaluation with a deadline
//! - [`evaluate_until_success`]: bounded reshuffle-and-retry loop
//! - [`ExternalOracle`]: evaluator-backed [`crate::assignment::CostOracle`]
//! - [`solve_assignment_exact`]: local search on exact costs

mod bounded;
mod exact;
mod oracle;
mod retry;

pub use bounded::BoundedEvaluator;
pub use exact::solve_assignment_exact;
pub use oracle::{ExternalOracle, TimeoutFallback};
pub use retry::{evaluate_until_success, RetryPolicy, RetrySuccess};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RendezvousError, Result};
use crate::models::{GridMap, Node};

/// Cooperative cancellation flag shared with a planner worker.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// External exact (conflict-aware) multi-agent path planner.
///
/// Returns the total cost of a collision-free plan moving agent `i` from
/// `starts[i]` to `goals[i]`. The result of a cancelled call is discarded.
///
/// # Cancellation
/// Each call runs on its own thread, which is detached when the deadline
/// passes. A planner that never looks at `cancel` keeps that thread (and
/// its CPU and memory) alive until it finishes on its own, so every
/// timed-out call leaks one thread for that long. Exact-cost local search
/// can time out many times per run; implementations should check
/// [`CancelToken::is_cancelled`] periodically, e.g. once per search
/// expansion, and return early once it is set.
pub trait PathPlanner: Send + Sync + 'static {
    /// Solves the instance and returns its cost.
    fn solve_cost(
        &self,
        map: &GridMap,
        starts: &[Node],
        goals: &[Node],
        cancel: &CancelToken,
    ) -> Result<u64>;
}

impl<F> PathPlanner for F
where
    F: Fn(&GridMap, &[Node], &[Node], &CancelToken) -> Result<u64> + Send + Sync + 'static,
{
    fn solve_cost(
        &self,
        map: &GridMap,
        starts: &[Node],
        goals: &[Node],
        cancel: &CancelToken,
    ) -> Result<u64> {
        self(map, starts, goals, cancel)
    }
}

/// Result of one bounded evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationOutcome {
    /// The planner finished within budget.
    Completed(u64),
    /// The deadline passed; the worker was cancelled.
    TimedOut,
}

impl EvaluationOutcome {
    /// The cost, if the planner finished.
    pub fn cost(&self) -> Option<u64> {
        match *self {
            Self::Completed(c) => Some(c),
            Self::TimedOut => None,
        }
    }

    /// Whether the evaluation timed out.
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

/// External evaluation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Wall-clock budget per planner call, in seconds.
    pub timeout_secs: f64,
    /// Polling granularity while waiting, in milliseconds.
    pub poll_interval_ms: u64,
    /// Retry-until-success limits.
    pub retry: RetryPolicy,
    /// What a timed-out call is worth to the exact-cost search.
    pub on_timeout: TimeoutFallback,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60.0,
            poll_interval_ms: 1000,
            retry: RetryPolicy::default(),
            on_timeout: TimeoutFallback::default(),
        }
    }
}

impl EvaluationConfig {
    /// Sets the per-call timeout.
    pub fn with_timeout_secs(mut self, secs: f64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Sets the polling interval.
    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Sets the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the timeout fallback.
    pub fn with_on_timeout(mut self, fallback: TimeoutFallback) -> Self {
        self.on_timeout = fallback;
        self
    }

    /// Per-call timeout.
    ///
    /// Values [`Self::validate`] rejects as unrepresentable saturate to
    /// [`Duration::MAX`].
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs).unwrap_or(Duration::MAX)
    }

    /// Polling interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Rejects non-positive or unrepresentable timeouts and a zero poll
    /// interval.
    pub fn validate(&self) -> Result<()> {
        if Duration::try_from_secs_f64(self.timeout_secs).map_or(true, |d| d.is_zero()) {
            return Err(RendezvousError::InvalidConfiguration(format!(
                "evaluation timeout must be a positive, representable number of seconds, got {}",
                self.timeout_secs
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(RendezvousError::InvalidConfiguration(
                "evaluation poll interval must be at least 1 ms".into(),
            ));
        }
        self.retry.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_shared() {
        let a = CancelToken::new();
        let b = a.clone();
        assert!(!b.is_cancelled());
        a.cancel();
        assert!(b.is_cancelled());
    }

    #[test]
    fn test_outcome_accessors() {
        assert_eq!(EvaluationOutcome::Completed(7).cost(), Some(7));
        assert_eq!(EvaluationOutcome::TimedOut.cost(), None);
        assert!(EvaluationOutcome::TimedOut.is_timed_out());
    }

    #[test]
    fn test_config_validation() {
        assert!(EvaluationConfig::default().validate().is_ok());
        assert!(EvaluationConfig::default().with_timeout_secs(0.0).validate().is_err());
        assert!(EvaluationConfig::default().with_timeout_secs(f64::NAN).validate().is_err());
        assert!(EvaluationConfig::default().with_poll_interval_ms(0).validate().is_err());
        assert_eq!(
            EvaluationConfig::default().with_timeout_secs(1.5).timeout(),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn test_huge_timeout_rejected_without_panic() {
        let cfg = EvaluationConfig::default().with_timeout_secs(1e30);
        assert!(matches!(cfg.validate(), Err(RendezvousError::InvalidConfiguration(_))));
        assert_eq!(cfg.timeout(), Duration::MAX);
        assert!(BoundedEvaluator::from_config(super::bounded::tests::instant_planner, &cfg).is_err());
        assert!(EvaluationConfig::default().with_timeout_secs(-2.0).validate().is_err());
    }
}
