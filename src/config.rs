//! Planner configuration.
//!
//! [`PlannerConfig`] gathers every algorithm selector and knob in one
//! validated structure. Selectors are typed enums resolved once at the
//! boundary (via `FromStr` from their historical upper-case names, or via
//! serde), never re-interpreted by string comparison inside the engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assignment::{AssignmentAlgorithm, LocalSearchConfig};
use crate::error::{RendezvousError, Result};
use crate::evaluator::EvaluationConfig;
use crate::graph::ConnectionCriterion;
use crate::placement::PlacementMode;

/// Which costs the assignment stage optimises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostModel {
    /// Collision-ignorant shortest-path sums.
    #[default]
    Heuristic,
    /// Exact costs from the external planner (requires an evaluator).
    External,
}

impl FromStr for CostModel {
    type Err = RendezvousError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HEURISTIC" => Ok(Self::Heuristic),
            "EXTERNAL" | "EXACT" => Ok(Self::External),
            other => Err(RendezvousError::InvalidConfiguration(format!(
                "unknown cost model '{other}'"
            ))),
        }
    }
}

impl fmt::Display for CostModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Heuristic => "HEURISTIC",
            Self::External => "EXTERNAL",
        })
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Connectivity predicate.
    pub connection: ConnectionCriterion,
    /// Clique search ordering.
    pub placement: PlacementMode,
    /// Assignment strategy.
    pub assignment: AssignmentAlgorithm,
    /// Cost source for local search and exhaustive assignment.
    pub cost_model: CostModel,
    /// Local search parameters.
    pub local_search: LocalSearchConfig,
    /// External planner settings.
    pub evaluation: EvaluationConfig,
    /// Build connectivity rows on the rayon pool.
    pub parallel_graph: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionCriterion::default(),
            placement: PlacementMode::default(),
            assignment: AssignmentAlgorithm::default(),
            cost_model: CostModel::default(),
            local_search: LocalSearchConfig::default(),
            evaluation: EvaluationConfig::default(),
            parallel_graph: true,
        }
    }
}

impl PlannerConfig {
    /// Sets the connectivity predicate.
    pub fn with_connection(mut self, connection: ConnectionCriterion) -> Self {
        self.connection = connection;
        self
    }

    /// Sets the clique search mode.
    pub fn with_placement(mut self, placement: PlacementMode) -> Self {
        self.placement = placement;
        self
    }

    /// Sets the assignment strategy.
    pub fn with_assignment(mut self, assignment: AssignmentAlgorithm) -> Self {
        self.assignment = assignment;
        self
    }

    /// Sets the cost model.
    pub fn with_cost_model(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    /// Sets local search parameters.
    pub fn with_local_search(mut self, local_search: LocalSearchConfig) -> Self {
        self.local_search = local_search;
        self
    }

    /// Sets external evaluation settings.
    pub fn with_evaluation(mut self, evaluation: EvaluationConfig) -> Self {
        self.evaluation = evaluation;
        self
    }

    /// Enables or disables parallel graph construction.
    pub fn with_parallel_graph(mut self, parallel: bool) -> Self {
        self.parallel_graph = parallel;
        self
    }

    /// Checks every knob; fails on the first invalid one.
    pub fn validate(&self) -> Result<()> {
        self.connection.validate()?;
        self.local_search.validate()?;
        self.evaluation.validate()?;
        if self.cost_model == CostModel::External
            && matches!(
                self.assignment,
                AssignmentAlgorithm::Hungarian | AssignmentAlgorithm::Random
            )
        {
            return Err(RendezvousError::InvalidConfiguration(format!(
                "{} assignment cannot use the external cost model",
                self.assignment
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{RetryPolicy, TimeoutFallback};

    #[test]
    fn test_default_is_valid() {
        let cfg = PlannerConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.placement, PlacementMode::Informed);
        assert_eq!(cfg.assignment, AssignmentAlgorithm::Hungarian);
        assert_eq!(cfg.cost_model, CostModel::Heuristic);
    }

    #[test]
    fn test_json_round_trip() {
        let cfg = PlannerConfig::default()
            .with_connection(ConnectionCriterion::Distance { threshold: 2.5 })
            .with_placement(PlacementMode::Uninformed)
            .with_assignment(AssignmentAlgorithm::LocalSearch)
            .with_cost_model(CostModel::External)
            .with_local_search(LocalSearchConfig::default().with_trajectories(4).with_seed(9))
            .with_evaluation(
                EvaluationConfig::default()
                    .with_timeout_secs(15.0)
                    .with_retry(RetryPolicy::unbounded())
                    .with_on_timeout(TimeoutFallback::LowerBound),
            );
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PlannerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: PlannerConfig = serde_json::from_str(
            r#"{"connection": {"kind": "path_length", "threshold": 4.0},
                "assignment": "exhaustive",
                "evaluation": {"timeout_secs": 15.0}}"#,
        )
        .unwrap();
        assert_eq!(cfg.connection, ConnectionCriterion::PathLength { threshold: 4.0 });
        assert_eq!(cfg.assignment, AssignmentAlgorithm::Exhaustive);
        assert_eq!(cfg.evaluation.timeout_secs, 15.0);
        assert_eq!(cfg.evaluation.poll_interval_ms, 1000);
        assert_eq!(cfg.local_search, LocalSearchConfig::default());
    }

    #[test]
    fn test_validation_failures() {
        let bad_threshold =
            PlannerConfig::default().with_connection(ConnectionCriterion::Distance { threshold: -1.0 });
        assert!(matches!(
            bad_threshold.validate(),
            Err(RendezvousError::InvalidConfiguration(_))
        ));

        let no_trajectories = PlannerConfig::default()
            .with_local_search(LocalSearchConfig::default().with_trajectories(0));
        assert!(no_trajectories.validate().is_err());

        let zero_timeout = PlannerConfig::default()
            .with_evaluation(EvaluationConfig::default().with_timeout_secs(0.0));
        assert!(zero_timeout.validate().is_err());

        let exact_hungarian = PlannerConfig::default().with_cost_model(CostModel::External);
        assert!(exact_hungarian.validate().is_err());
    }

    #[test]
    fn test_selector_names() {
        let cfg = PlannerConfig::default()
            .with_connection("DISTANCE_AND_OBSTACLES".parse().unwrap())
            .with_placement("UNINFORMED_GENERATION".parse().unwrap())
            .with_assignment("LOCAL_SEARCH".parse().unwrap())
            .with_cost_model("EXTERNAL".parse().unwrap());
        assert!(cfg.validate().is_ok());
        assert!("BOGUS".parse::<CostModel>().is_err());
    }
}
