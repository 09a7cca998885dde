//! The `Controller` struct and its tick loop.

use std::time::Duration;

use tracing::{debug, info, warn};

use bmaa_agent::AgentStore;
use bmaa_core::{AgentId, BmaaConfig, SimClock, Strategy, Tick};
use bmaa_grid::{GridGraph, Occupancy};

use crate::{RunResult, SimObserver, SimResult, TickSummary};

/// The BMAA* NPC controller.
///
/// `Controller` holds all run state and drives the two-phase tick:
///
/// 1. **Search phase**: every agent whose prefix ran out or whose replan
///    deadline passed runs one bounded search episode.  All episodes see the
///    same occupancy because nobody moves during this phase.
/// 2. **Move phase** (sequential, ascending `AgentId`): each agent with a
///    next node tries to enter it.  A goal-sitter in the way is pushed aside
///    first when pushing is enabled.  If the node is still held the agent
///    waits.  Moves made earlier in the phase are visible to later agents,
///    so outcomes depend on agent order.
///
/// The stopwatch runs only inside ticks.  Create via
/// [`ControllerBuilder`][crate::ControllerBuilder].
pub struct Controller {
    /// Per-run algorithm parameters shared by every agent.
    pub config: BmaaConfig,

    /// How agents chose their sub-goals at build time.
    pub strategy: Strategy,

    /// Tick counter plus the stopwatch that gates the run.
    pub clock: SimClock,

    pub graph: GridGraph,

    /// Node → agent back-references.  Mutated only by agent moves.
    pub occupancy: Occupancy,

    /// Agents in move-resolution order.
    pub agents: AgentStore,

    /// Sleep inside every tick, modelling physical movement time.
    pub(crate) movement_cost: Option<Duration>,

    /// Call `on_snapshot` every this many ticks; 0 disables snapshots.
    pub(crate) snapshot_interval: u64,

    /// Wall-clock time spent on waypoint decomposition at build time.
    pub(crate) preprocessing: Duration,
}

impl Controller {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until every agent is on its goal or the stopwatch reaches
    /// `time_limit`, then evaluate the agents at that limit.
    pub fn run_with_time_limit<O: SimObserver>(
        &mut self,
        time_limit: Duration,
        observer: &mut O,
    ) -> SimResult<RunResult> {
        info!(
            agents = self.agents.len(),
            strategy = %self.strategy,
            limit_ms = time_limit.as_millis() as u64,
            "run start"
        );
        let result = self.run_until(time_limit, observer)?;
        observer.on_run_end(self.clock.tick(), std::slice::from_ref(&result));
        Ok(result)
    }

    /// Run once, pausing at each stop time to evaluate the agents as of that
    /// cutoff.  Stop times are expected in ascending order; one that has
    /// already passed is evaluated without running further ticks.
    pub fn run_with_stop_times<O: SimObserver>(
        &mut self,
        stop_times: &[Duration],
        observer: &mut O,
    ) -> SimResult<Vec<RunResult>> {
        info!(
            agents = self.agents.len(),
            strategy = %self.strategy,
            stops = stop_times.len(),
            "run start"
        );
        let mut results = Vec::with_capacity(stop_times.len());
        for &limit in stop_times {
            results.push(self.run_until(limit, observer)?);
        }
        observer.on_run_end(self.clock.tick(), &results);
        Ok(results)
    }

    /// Run exactly `n` ticks from the current position, ignoring the
    /// stopwatch and goal state.
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.tick(observer)?;
        }
        Ok(())
    }

    /// Evaluate every agent as of `cutoff`.
    pub fn results(&self, cutoff: Duration) -> RunResult {
        RunResult::collect(&self.agents, cutoff)
    }

    /// `true` once every agent stands on its goal.
    pub fn all_at_goal(&self) -> bool {
        self.agents.all_at_goal()
    }

    /// Wall-clock time spent on waypoint decomposition at build time
    /// (whether or not it was charged to the stopwatch).
    pub fn preprocessing_time(&self) -> Duration {
        self.preprocessing
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn run_until<O: SimObserver>(&mut self, limit: Duration, observer: &mut O) -> SimResult<RunResult> {
        while !self.all_at_goal() && self.clock.elapsed() < limit {
            self.tick(observer)?;
        }
        let result = self.results(limit);
        if result.avg_completion_steps.is_none() {
            warn!(limit_ms = limit.as_millis() as u64, tick = %self.clock.tick(), "no agent at goal at stop time");
        }
        info!(
            limit_ms = limit.as_millis() as u64,
            tick = %self.clock.tick(),
            completion_rate = result.completion_rate,
            avg_travel = result.avg_travel_distance,
            "stop time reached"
        );
        Ok(result)
    }

    /// One full controller tick inside the stopwatch.
    pub fn tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TickSummary> {
        let now = self.clock.tick();
        observer.on_tick_start(now);

        self.clock.start_stopwatch()?;
        let mut summary = TickSummary { tick: now, ..TickSummary::default() };
        self.search_phase(&mut summary);
        let moved = self.move_phase(&mut summary);
        if let Some(cost) = self.movement_cost {
            std::thread::sleep(cost);
        }
        self.clock.stop_stopwatch()?;
        moved?;

        summary.at_goal = self.agents.at_goal_count();
        debug!(
            %now,
            searches = summary.searches,
            expanded = summary.expanded,
            moves = summary.moves,
            pushes = summary.pushes,
            blocked = summary.blocked,
            at_goal = summary.at_goal,
            "tick"
        );

        observer.on_tick_end(&summary);
        if self.snapshot_interval > 0 && now.0.is_multiple_of(self.snapshot_interval) {
            observer.on_snapshot(now, &self.graph, &self.agents);
        }
        self.clock.advance();
        Ok(summary)
    }

    fn search_phase(&mut self, summary: &mut TickSummary) {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let graph = &self.graph;
        let occupancy = &self.occupancy;
        let clock = &self.clock;
        let config = &self.config;

        for agent in self.agents.iter_mut() {
            if let Some(episode) = agent.search_phase(graph, occupancy, clock, config) {
                summary.searches += 1;
                summary.expanded += episode.expanded;
            }
        }
    }

    fn move_phase(&mut self, summary: &mut TickSummary) -> SimResult<()> {
        for i in 0..self.agents.len() {
            let id = AgentId::from_index(i);
            let Some(next) = self.agents.get(id).and_then(|a| a.next_node()) else {
                continue;
            };

            if self.config.push {
                if let Some(occupant) = self.occupancy.get(next).filter(|o| o.at_goal) {
                    if let Some(sitter) = self.agents.get_mut(occupant.agent) {
                        if sitter.push(&self.graph, &mut self.occupancy, &self.clock)?.is_some() {
                            summary.pushes += 1;
                        }
                    }
                }
            }

            if self.occupancy.is_occupied(next) {
                summary.blocked += 1;
                continue;
            }
            if let Some(agent) = self.agents.get_mut(id) {
                agent.move_to_next(&self.graph, &mut self.occupancy, &self.clock)?;
                summary.moves += 1;
            }
        }
        Ok(())
    }

    /// The tick the next call to [`tick`](Self::tick) will run.
    pub fn current_tick(&self) -> Tick {
        self.clock.tick()
    }
}
