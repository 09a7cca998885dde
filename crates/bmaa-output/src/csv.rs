//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `results.csv`
//! - `agent_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;
use tracing::debug;

use crate::{AgentSnapshotRow, OutputResult, ResultRow, TickSummaryRow};
use crate::writer::OutputWriter;

pub const RESULTS_FILE:   &str = "results.csv";
pub const SNAPSHOTS_FILE: &str = "agent_snapshots.csv";
pub const SUMMARIES_FILE: &str = "tick_summaries.csv";

/// Writes run output to three CSV files.
pub struct CsvWriter {
    results:    Writer<File>,
    snapshots:  Writer<File>,
    summaries:  Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open (or truncate) the three CSV files in it
    /// and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut results = Writer::from_path(dir.join(RESULTS_FILE))?;
        results.write_record([
            "label",
            "time_limit_ms",
            "agent_count",
            "completion_rate",
            "avg_completion_secs",
            "avg_completion_steps",
            "avg_travel_distance",
        ])?;

        let mut snapshots = Writer::from_path(dir.join(SNAPSHOTS_FILE))?;
        snapshots.write_record(["agent_id", "tick", "node", "x", "y", "at_goal", "travel_distance"])?;

        let mut summaries = Writer::from_path(dir.join(SUMMARIES_FILE))?;
        summaries.write_record(["tick", "searches", "expanded", "moves", "pushes", "blocked", "at_goal"])?;

        debug!(dir = %dir.display(), "csv output opened");
        Ok(Self {
            results,
            snapshots,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.node.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                (row.at_goal as u8).to_string(),
                row.travel_distance.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.searches.to_string(),
            row.expanded.to_string(),
            row.moves.to_string(),
            row.pushes.to_string(),
            row.blocked.to_string(),
            row.at_goal.to_string(),
        ])?;
        Ok(())
    }

    fn write_results(&mut self, rows: &[ResultRow]) -> OutputResult<()> {
        for row in rows {
            self.results.write_record(&[
                row.label.clone(),
                row.time_limit_ms.to_string(),
                row.agent_count.to_string(),
                row.completion_rate.to_string(),
                row.avg_completion_secs.to_string(),
                row.avg_completion_steps.map(|s| s.to_string()).unwrap_or_default(),
                row.avg_travel_distance.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.results.flush()?;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
