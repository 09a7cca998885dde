//! The `OutputWriter` trait implemented by backend writers.

use crate::{AgentSnapshotRow, OutputResult, ResultRow, TickSummaryRow};

/// Sink for everything a run reports.
///
/// All methods are infallible from the observer's perspective; errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of agent snapshots.
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Write one row per stop time.
    fn write_results(&mut self, rows: &[ResultRow]) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent, so safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
