//! End-to-end meeting planner.
//!
//! # Stages
//!
//! 1. Validate the instance.
//! 2. Build the connectivity graph (or take a pre-built one).
//! 3. Reduce it to nodes that can still belong to a k-clique.
//! 4. Search for a goal clique.
//! 5. Build the cost matrix and assign agents to goals.
//! 6. Optionally evaluate the final plan once with the exact planner.
//!
//! Every stage is timed and logged; the result is returned as a
//! serialisable [`MeetingPlan`]. Nothing is printed.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::analysis::format_nodes;
use crate::assignment::{
    build_cost_matrix, solve_assignment, solve_assignment_exhaustive, AssignmentAlgorithm,
    AssignmentOutcome,
};
use crate::config::{CostModel, PlannerConfig};
use crate::error::{RendezvousError, Result};
use crate::evaluator::{solve_assignment_exact, BoundedEvaluator, ExternalOracle};
use crate::graph::{reduce_graph, ConnectivityGraph};
use crate::models::{Assignment, Clique, CostMatrix, GridMap, Instance, Node};
use crate::placement::search_clique;
use crate::router::{GridRouter, Router};
use crate::validation::validate_instance;

/// Wall-clock time per stage, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimings {
    /// Connectivity graph construction (0 for a pre-built graph).
    pub graph_secs: f64,
    /// k-core reduction.
    pub reduce_secs: f64,
    /// Clique search.
    pub placement_secs: f64,
    /// Cost matrix and assignment.
    pub assignment_secs: f64,
    /// Final exact evaluation.
    pub evaluation_secs: f64,
}

/// Result of one planner run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingPlan {
    /// Goal cell per agent, in agent order.
    pub goals: Vec<Node>,
    /// The goal clique, in canonical order.
    pub clique: Clique,
    /// Agent → clique index mapping.
    pub assignment: Assignment,
    /// Collision-ignorant cost of the assignment.
    pub heuristic_cost: u64,
    /// Exact planner cost, when an evaluator is configured and finished.
    pub exact_cost: Option<u64>,
    /// Nodes left after graph reduction.
    pub reduced_nodes: usize,
    /// Stage timings.
    pub timings: StageTimings,
}

impl MeetingPlan {
    /// Writes a short human-readable summary, including the map with the
    /// goal of agent `i` drawn as `i`.
    pub fn write_report<W: Write>(&self, out: &mut W, map: &GridMap) -> io::Result<()> {
        writeln!(out, "Goal clique: {}", format_nodes(self.clique.nodes()))?;
        writeln!(out, "Goals per agent: {}", format_nodes(&self.goals))?;
        writeln!(out, "Heuristic cost: {}", self.heuristic_cost)?;
        match self.exact_cost {
            Some(c) => writeln!(out, "Exact cost: {c}")?,
            None => writeln!(out, "Exact cost: not found")?,
        }
        let t = &self.timings;
        writeln!(
            out,
            "Times (s): graph {:.2}, reduce {:.2}, placement {:.2}, assignment {:.2}, evaluation {:.2}",
            t.graph_secs, t.reduce_secs, t.placement_secs, t.assignment_secs, t.evaluation_secs
        )?;
        write!(out, "{}", map.render(&self.goals))
    }
}

/// Goal placement and assignment pipeline.
///
/// # Example
///
/// ```
/// use u_rendezvous::{Instance, MeetingPlanner, PlannerConfig};
///
/// let instance = Instance::parse("3 3\n. . .\n. @ .\n. . .\n2\n0 0\n2 2\n").unwrap();
/// let plan = MeetingPlanner::new(PlannerConfig::default())
///     .unwrap()
///     .plan(&instance)
///     .unwrap();
/// assert_eq!(plan.goals.len(), 2);
/// ```
#[derive(Clone)]
pub struct MeetingPlanner {
    config: PlannerConfig,
    router: Arc<dyn Router>,
    evaluator: Option<BoundedEvaluator>,
}

impl std::fmt::Debug for MeetingPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeetingPlanner")
            .field("config", &self.config)
            .field("evaluator", &self.evaluator)
            .finish_non_exhaustive()
    }
}

impl MeetingPlanner {
    /// Creates a planner with the breadth-first [`GridRouter`].
    ///
    /// # Errors
    /// [`RendezvousError::InvalidConfiguration`] if `config` does not
    /// validate.
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            router: Arc::new(GridRouter::new()),
            evaluator: None,
        })
    }

    /// Replaces the single-agent router.
    pub fn with_router(mut self, router: impl Router + 'static) -> Self {
        self.router = Arc::new(router);
        self
    }

    /// Attaches an external exact planner.
    pub fn with_evaluator(mut self, evaluator: BoundedEvaluator) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Builds the connectivity graph for `map` under the configured
    /// predicate.
    pub fn build_graph(&self, map: &GridMap) -> Result<ConnectivityGraph> {
        ConnectivityGraph::build_with(
            map,
            self.config.connection,
            self.router.as_ref(),
            self.config.parallel_graph,
        )
    }

    /// Runs every stage, building the graph from scratch.
    pub fn plan(&self, instance: &Instance) -> Result<MeetingPlan> {
        validate_instance(&instance.map, &instance.starts).map_err(RendezvousError::InvalidInstance)?;
        let started = Instant::now();
        let graph = self.build_graph(&instance.map)?;
        let graph_secs = started.elapsed().as_secs_f64();
        log::info!(
            "connectivity graph: {} nodes, {} edges in {graph_secs:.2}s",
            graph.len(),
            graph.edge_count()
        );
        let mut plan = self.plan_with_graph(instance, &graph)?;
        plan.timings.graph_secs = graph_secs;
        Ok(plan)
    }

    /// Runs every stage after graph construction, using `graph` (e.g. one
    /// parsed from its text form).
    pub fn plan_with_graph(&self, instance: &Instance, graph: &ConnectivityGraph) -> Result<MeetingPlan> {
        let map = &instance.map;
        let starts = instance.starts.as_slice();
        validate_instance(map, starts).map_err(RendezvousError::InvalidInstance)?;
        let mut timings = StageTimings::default();

        let started = Instant::now();
        let reduced = reduce_graph(graph, starts.len());
        timings.reduce_secs = started.elapsed().as_secs_f64();
        log::info!("reduced graph: {} of {} nodes remain", reduced.len(), graph.len());

        let started = Instant::now();
        let clique = search_clique(&reduced, map, starts, self.config.placement, self.router.as_ref())?;
        timings.placement_secs = started.elapsed().as_secs_f64();
        log::info!(
            "{} goal clique {} in {:.2}s",
            self.config.placement,
            format_nodes(clique.nodes()),
            timings.placement_secs
        );

        let started = Instant::now();
        let matrix = build_cost_matrix(map, starts, clique.nodes(), self.router.as_ref())?;
        let outcome = self.assign(map, starts, clique.nodes(), &matrix)?;
        timings.assignment_secs = started.elapsed().as_secs_f64();
        let heuristic_cost = matrix.permutation_cost(outcome.assignment.as_slice());
        log::info!(
            "{} assignment: heuristic cost {heuristic_cost} in {:.2}s",
            self.config.assignment,
            timings.assignment_secs
        );

        let goals = outcome.assignment.goals_in(&clique)?;
        let started = Instant::now();
        let exact_cost = match (self.config.cost_model, &self.evaluator) {
            (CostModel::External, _) => outcome.cost,
            (CostModel::Heuristic, Some(evaluator)) => evaluator.evaluate(map, starts, &goals)?.cost(),
            (CostModel::Heuristic, None) => None,
        };
        timings.evaluation_secs = started.elapsed().as_secs_f64();

        Ok(MeetingPlan {
            goals,
            clique,
            assignment: outcome.assignment,
            heuristic_cost,
            exact_cost,
            reduced_nodes: reduced.len(),
            timings,
        })
    }

    fn assign(
        &self,
        map: &GridMap,
        starts: &[Node],
        goals: &[Node],
        matrix: &CostMatrix,
    ) -> Result<AssignmentOutcome> {
        let algorithm = self.config.assignment;
        if self.config.cost_model == CostModel::Heuristic {
            return solve_assignment(matrix, algorithm, &self.config.local_search);
        }

        let evaluator = self.evaluator.as_ref().ok_or_else(|| {
            RendezvousError::InvalidConfiguration(
                "the external cost model needs an evaluator (see MeetingPlanner::with_evaluator)".into(),
            )
        })?;
        match algorithm {
            AssignmentAlgorithm::LocalSearch => solve_assignment_exact(
                evaluator,
                map,
                starts,
                goals,
                matrix,
                &self.config.evaluation,
                self.config.local_search.seed,
            ),
            AssignmentAlgorithm::Exhaustive => {
                let oracle = ExternalOracle::new(evaluator, map, starts, goals, matrix)?
                    .with_fallback(self.config.evaluation.on_timeout);
                solve_assignment_exhaustive(&oracle)
            }
            AssignmentAlgorithm::Hungarian | AssignmentAlgorithm::Random => {
                Err(RendezvousError::InvalidConfiguration(format!(
                    "{algorithm} assignment cannot use the external cost model"
                )))
            }
        }
    }
}
