//! Plain data row types written by output backends.

use std::time::Duration;

use bmaa_sim::RunResult;

/// One agent's position and progress at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id:        u32,
    pub tick:            u64,
    pub node:            u32,
    pub x:               i32,
    pub y:               i32,
    pub at_goal:         bool,
    pub travel_distance: f64,
}

/// Counters for one controller tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:     u64,
    pub searches: u64,
    pub expanded: u64,
    pub moves:    u64,
    pub pushes:   u64,
    pub blocked:  u64,
    pub at_goal:  u64,
}

/// Aggregate measures at one stop time, tagged with the run they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Free-form run label, e.g. the strategy name.
    pub label:                String,
    pub time_limit_ms:        u64,
    pub agent_count:          u64,
    pub completion_rate:      f64,
    pub avg_completion_secs:  f64,
    /// Empty in the CSV when no agent finished.
    pub avg_completion_steps: Option<f64>,
    pub avg_travel_distance:  f64,
}

impl ResultRow {
    pub fn new(label: impl Into<String>, result: &RunResult) -> Self {
        Self {
            label:                label.into(),
            time_limit_ms:        millis(result.time_limit),
            agent_count:          result.agent_count as u64,
            completion_rate:      result.completion_rate,
            avg_completion_secs:  result.avg_completion_secs,
            avg_completion_steps: result.avg_completion_steps,
            avg_travel_distance:  result.avg_travel_distance,
        }
    }
}

fn millis(d: Duration) -> u64 {
    d.as_millis().min(u64::MAX as u128) as u64
}
