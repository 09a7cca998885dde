//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use bmaa_agent::AgentStore;
use bmaa_core::Tick;
use bmaa_grid::GridGraph;
use bmaa_sim::{RunResult, SimObserver, TickSummary};

use crate::row::{AgentSnapshotRow, ResultRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes tick summaries, agent snapshots and stop-time
/// results to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After the run returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    label:      String,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`.  `label` tags every result row.
    pub fn new(writer: W, label: impl Into<String>) -> Self {
        Self {
            writer,
            label:      label.into(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, summary: &TickSummary) {
        let row = TickSummaryRow {
            tick:     summary.tick.0,
            searches: summary.searches as u64,
            expanded: summary.expanded as u64,
            moves:    summary.moves as u64,
            pushes:   summary.pushes as u64,
            blocked:  summary.blocked as u64,
            at_goal:  summary.at_goal as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, graph: &GridGraph, agents: &AgentStore) {
        let rows: Vec<AgentSnapshotRow> = agents
            .iter()
            .map(|agent| {
                let pos = graph.pos(agent.current());
                AgentSnapshotRow {
                    agent_id:        agent.id().0,
                    tick:            tick.0,
                    node:            agent.current().0,
                    x:               pos.x,
                    y:               pos.y,
                    at_goal:         agent.at_goal(),
                    travel_distance: agent.metrics().travel_distance,
                }
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_run_end(&mut self, _final_tick: Tick, results: &[RunResult]) {
        let rows: Vec<ResultRow> = results.iter().map(|r| ResultRow::new(self.label.clone(), r)).collect();
        let result = self.writer.write_results(&rows);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
