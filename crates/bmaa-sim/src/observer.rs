//! Controller observer trait for progress reporting and data collection.

use bmaa_agent::AgentStore;
use bmaa_core::Tick;
use bmaa_grid::GridGraph;

use crate::RunResult;

/// What happened during one controller tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub tick: Tick,
    /// Agents that ran a search episode.
    pub searches: usize,
    /// Nodes expanded across all episodes.
    pub expanded: usize,
    /// Successful moves onto a next node (pushes excluded).
    pub moves: usize,
    /// Goal-sitters pushed aside.
    pub pushes: usize,
    /// Agents with a next node that stayed put because it was held.
    pub blocked: usize,
    /// Agents on their goal after the move phase.
    pub at_goal: usize,
}

/// Callbacks invoked by the [`Controller`][crate::Controller] run loops.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, summary: &TickSummary) {
///         if summary.tick.0 % self.interval == 0 {
///             println!("{}: {} agents at goal", summary.tick, summary.at_goal);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before the search phase.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the move phase of each tick.
    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// Called every `snapshot_interval` ticks (see
    /// [`ControllerBuilder::snapshot_interval`][crate::ControllerBuilder::snapshot_interval])
    /// with read-only access to the graph and every agent.
    fn on_snapshot(&mut self, _tick: Tick, _graph: &GridGraph, _agents: &AgentStore) {}

    /// Called once when a run loop returns, with one result per stop time.
    fn on_run_end(&mut self, _final_tick: Tick, _results: &[RunResult]) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
