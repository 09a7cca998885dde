//! Fluent builder for constructing a [`Controller`].

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tracing::info;

use bmaa_agent::{decompose, Agent, AgentStore, SubGoals};
use bmaa_core::{AgentId, BmaaConfig, NodeId, SimClock, Strategy};
use bmaa_grid::{AStar, GridError, GridGraph, Occupancy, Planner, ProblemSet};

use crate::{Controller, SimError, SimResult};

/// Fluent builder for [`Controller`].
///
/// # Required inputs
///
/// - [`GridGraph`]: the populated grid
/// - parallel start and goal lists, one pair per agent
///
/// # Optional inputs (have defaults)
///
/// | Method                        | Default                        |
/// |-------------------------------|--------------------------------|
/// | `.config(c)`                  | `BmaaConfig::default()`        |
/// | `.strategy(s)`                | `Strategy::Bmaa`               |
/// | `.planner(p)`                 | `AStar` (waypoint strategy)    |
/// | `.movement_cost(d)`           | no sleep                       |
/// | `.count_preprocessing(true)`  | decomposition not charged      |
/// | `.snapshot_interval(n)`       | 0 (no snapshots)               |
///
/// # Example
///
/// ```rust,ignore
/// let problems = ProblemSet::random(&graph, 50, &mut SimRng::new(42))?;
/// let mut ctl = ControllerBuilder::from_problems(graph, &problems)
///     .strategy(Strategy::Waypoint)
///     .build()?;
/// let result = ctl.run_with_time_limit(Duration::from_secs(1), &mut NoopObserver)?;
/// ```
pub struct ControllerBuilder {
    graph:               GridGraph,
    starts:              Vec<NodeId>,
    goals:               Vec<NodeId>,
    config:              BmaaConfig,
    strategy:            Strategy,
    planner:             Box<dyn Planner>,
    movement_cost:       Option<Duration>,
    count_preprocessing: bool,
    snapshot_interval:   u64,
}

impl ControllerBuilder {
    /// Create a builder with all required inputs.
    pub fn new(graph: GridGraph, starts: Vec<NodeId>, goals: Vec<NodeId>) -> Self {
        Self {
            graph,
            starts,
            goals,
            config:              BmaaConfig::default(),
            strategy:            Strategy::default(),
            planner:             Box::new(AStar),
            movement_cost:       None,
            count_preprocessing: false,
            snapshot_interval:   0,
        }
    }

    /// Shorthand for [`new`](Self::new) with a generated problem set.
    pub fn from_problems(graph: GridGraph, problems: &ProblemSet) -> Self {
        Self::new(graph, problems.starts.clone(), problems.goals.clone())
    }

    pub fn config(mut self, config: BmaaConfig) -> Self {
        self.config = config;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Planner for the up-front full paths of [`Strategy::Waypoint`].
    pub fn planner(mut self, planner: impl Planner + 'static) -> Self {
        self.planner = Box::new(planner);
        self
    }

    /// Sleep for `cost` inside every tick.
    pub fn movement_cost(mut self, cost: Duration) -> Self {
        self.movement_cost = Some(cost);
        self
    }

    /// Charge waypoint decomposition time to the run's stopwatch.
    pub fn count_preprocessing(mut self, yes: bool) -> Self {
        self.count_preprocessing = yes;
        self
    }

    /// Report agent state to the observer every `ticks` ticks.
    pub fn snapshot_interval(mut self, ticks: u64) -> Self {
        self.snapshot_interval = ticks;
        self
    }

    /// Validate inputs, decompose paths if needed, place the agents, and
    /// return a ready-to-run [`Controller`].
    pub fn build(self) -> SimResult<Controller> {
        self.config.validate()?;
        let agent_count = self.starts.len();

        // ── Validate problem lists ────────────────────────────────────────
        if self.goals.len() != agent_count {
            return Err(SimError::AgentCountMismatch {
                expected: agent_count,
                got:      self.goals.len(),
                what:     "goals",
            });
        }
        for &node in self.starts.iter().chain(&self.goals) {
            if !self.graph.contains(node) {
                return Err(GridError::NodeNotFound(node).into());
            }
        }
        let mut seen: FxHashMap<NodeId, AgentId> = FxHashMap::default();
        for (i, &start) in self.starts.iter().enumerate() {
            let id = AgentId::from_index(i);
            if let Some(&first) = seen.get(&start) {
                return Err(SimError::DuplicateStart { node: start, first, second: id });
            }
            seen.insert(start, id);
        }

        // ── Sub-goals ─────────────────────────────────────────────────────
        let began = Instant::now();
        let subgoals: Vec<SubGoals> = match self.strategy {
            Strategy::Bmaa => self.goals.iter().map(|&t| SubGoals::direct(t)).collect(),
            Strategy::Waypoint => self.decompose_all()?,
        };
        let preprocessing = began.elapsed();
        if self.strategy == Strategy::Waypoint {
            info!(
                agents = agent_count,
                waypoints = subgoals.iter().map(SubGoals::len).sum::<usize>(),
                elapsed_ms = preprocessing.as_millis() as u64,
                "waypoint decomposition"
            );
        }

        // ── Agents and occupancy ──────────────────────────────────────────
        let agents: Vec<Agent> = self
            .starts
            .iter()
            .zip(&self.goals)
            .zip(subgoals)
            .enumerate()
            .map(|(i, ((&s, &t), sub))| Agent::with_subgoals(AgentId::from_index(i), s, t, sub))
            .collect();
        let agents = AgentStore::from_agents(agents);
        let mut occupancy = Occupancy::new(self.graph.node_count());
        agents.place_all(&mut occupancy)?;

        let mut clock = SimClock::new();
        if self.count_preprocessing {
            clock.charge(preprocessing);
        }

        Ok(Controller {
            config:            self.config,
            strategy:          self.strategy,
            clock,
            graph:             self.graph,
            occupancy,
            agents,
            movement_cost:     self.movement_cost,
            snapshot_interval: self.snapshot_interval,
            preprocessing,
        })
    }

    /// One unbounded full path per agent, sampled into waypoints.
    fn decompose_all(&self) -> SimResult<Vec<SubGoals>> {
        let graph = &self.graph;
        let planner = self.planner.as_ref();
        let closeness = self.config.closeness;
        let one = |(&s, &t): (&NodeId, &NodeId)| -> SimResult<SubGoals> {
            let waypoints = decompose(planner, graph, s, t)?;
            Ok(SubGoals::waypoints(waypoints, t, closeness))
        };

        #[cfg(not(feature = "parallel"))]
        {
            self.starts.iter().zip(&self.goals).map(one).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.starts.par_iter().zip(self.goals.par_iter()).map(one).collect()
        }
    }
}
