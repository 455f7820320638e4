//! Error types for goal placement and assignment.
//!
//! Fatal conditions (insufficient connectivity, invalid configuration,
//! dimension mismatches) abort the run for the current instance. Evaluation
//! timeouts are normally handled through [`crate::evaluator::EvaluationOutcome`]
//! and only surface here when a caller explicitly refuses a fallback.

use std::time::Duration;

use thiserror::Error;

use crate::models::Node;
use crate::validation::ValidationError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RendezvousError>;

/// Errors produced by the rendezvous engine.
#[derive(Debug, Error)]
pub enum RendezvousError {
    /// No clique of the required size exists in the (reduced) graph.
    #[error(
        "insufficient connectivity: no clique of {required} mutually connected nodes \
         ({candidates} candidate nodes after reduction)"
    )]
    InsufficientConnectivity {
        /// Required clique size (number of agents).
        required: usize,
        /// Nodes left in the reduced graph.
        candidates: usize,
    },

    /// The external evaluator did not finish within its budget.
    #[error("external evaluation timed out after {0:?}")]
    EvaluationTimeout(Duration),

    /// Bounded retry-until-success gave up.
    #[error("retry budget exhausted after {attempts} timed-out attempts ({elapsed:?} elapsed)")]
    RetryBudgetExhausted {
        /// Attempts made, all of which timed out.
        attempts: u32,
        /// Wall-clock time spent.
        elapsed: Duration,
    },

    /// Unknown selector or out-of-range configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Agents, goals and cost matrix dimensions disagree.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The router found no path between an agent start and a goal.
    #[error("goal {goal} is unreachable from start {start}")]
    Unreachable {
        /// Agent start cell.
        start: Node,
        /// Goal cell.
        goal: Node,
    },

    /// The external path planner failed for a reason other than a timeout.
    #[error("path planner failed: {0}")]
    Planner(String),

    /// Malformed graph or instance text.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// The instance failed input validation.
    #[error("invalid instance: {}", join_messages(.0))]
    InvalidInstance(Vec<ValidationError>),
}

impl RendezvousError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_insufficient_connectivity_message() {
        let err = RendezvousError::InsufficientConnectivity {
            required: 4,
            candidates: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("4 mutually connected"));
        assert!(msg.contains("2 candidate"));
    }

    #[test]
    fn test_invalid_instance_joins_messages() {
        let err = RendezvousError::InvalidInstance(vec![
            ValidationError::new(ValidationErrorKind::NoAgents, "no agents"),
            ValidationError::new(ValidationErrorKind::BlockedStart, "start on obstacle"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid instance: no agents; start on obstacle"
        );
    }
}
