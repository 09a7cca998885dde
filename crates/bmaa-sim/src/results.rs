//! Aggregate run measures at a wall-clock cutoff.

use std::time::Duration;

use bmaa_agent::AgentStore;

/// Aggregate measures over all agents as of one stop time.
///
/// Agents that were not on their goal at the cutoff count as taking the
/// whole time limit (seconds) and as taking the slowest finisher's step
/// count (steps).  With no finisher at all the step average is undefined.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    pub time_limit:           Duration,
    pub agent_count:          usize,
    pub completion_rate:      f64,
    pub avg_completion_secs:  f64,
    pub avg_completion_steps: Option<f64>,
    pub avg_travel_distance:  f64,
}

impl RunResult {
    /// Evaluate every agent in `agents` as of `cutoff`.
    pub fn collect(agents: &AgentStore, cutoff: Duration) -> Self {
        let n = agents.len();
        if n == 0 {
            return Self {
                time_limit:           cutoff,
                agent_count:          0,
                completion_rate:      0.0,
                avg_completion_secs:  0.0,
                avg_completion_steps: None,
                avg_travel_distance:  0.0,
            };
        }

        let at_goal = agents.iter().filter(|a| a.at_goal_before(cutoff)).count();

        let secs: f64 = agents
            .iter()
            .map(|a| a.completion_time(cutoff).unwrap_or(cutoff).as_secs_f64())
            .sum();

        let steps: Vec<Option<u64>> = agents.iter().map(|a| a.completion_steps(cutoff)).collect();
        let avg_completion_steps = steps.iter().flatten().max().map(|&max| {
            let total: u64 = steps.iter().map(|s| s.unwrap_or(max)).sum();
            total as f64 / n as f64
        });

        let travel: f64 = agents.iter().map(|a| a.travel_distance(cutoff)).sum();

        Self {
            time_limit: cutoff,
            agent_count: n,
            completion_rate: at_goal as f64 / n as f64,
            avg_completion_secs: secs / n as f64,
            avg_completion_steps,
            avg_travel_distance: travel / n as f64,
        }
    }

    /// Number of agents on their goal at the cutoff.
    pub fn agents_at_goal(&self) -> usize {
        (self.completion_rate * self.agent_count as f64).round() as usize
    }

    /// Field-wise mean of repeated runs with the same stop time.  The step
    /// average is taken over the runs that define it.  `None` for an empty
    /// slice.
    pub fn average(results: &[RunResult]) -> Option<RunResult> {
        let first = results.first()?;
        let k = results.len() as f64;
        let mean = |f: fn(&RunResult) -> f64| results.iter().map(f).sum::<f64>() / k;

        let steps: Vec<f64> = results.iter().filter_map(|r| r.avg_completion_steps).collect();
        let avg_completion_steps = if steps.is_empty() {
            None
        } else {
            Some(steps.iter().sum::<f64>() / steps.len() as f64)
        };

        Some(RunResult {
            time_limit:           first.time_limit,
            agent_count:          first.agent_count,
            completion_rate:      mean(|r| r.completion_rate),
            avg_completion_secs:  mean(|r| r.avg_completion_secs),
            avg_completion_steps,
            avg_travel_distance:  mean(|r| r.avg_travel_distance),
        })
    }
}
