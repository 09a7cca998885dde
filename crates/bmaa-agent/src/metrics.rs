//! Per-agent performance counters and cutoff-aware queries.
//!
//! The controller can only poll agents between ticks, but the wall-clock
//! limit can pass in the middle of a move phase.  Each query therefore takes
//! the cutoff and, when the agent's last move happened at or after it, answers
//! from the state *before* that move.

use std::time::Duration;

use bmaa_core::{NodeId, SimClock};

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentMetrics {
    /// Node left by the most recent move.  `None` until the first move.
    pub previous: Option<NodeId>,
    /// Stopwatch reading at the most recent move.
    pub last_move_at: Option<Duration>,
    /// Weight of the edge crossed by the most recent move.
    pub last_edge_weight: f64,
    /// Sum of all crossed edge weights.
    pub travel_distance: f64,
    /// Stopwatch reading at the latest arrival on the goal.
    pub completion_time: Option<Duration>,
    /// Tick count at the latest arrival on the goal (tick index + 1).
    pub completion_steps: Option<u64>,
    /// Moves made, pushes included.
    pub moves: u64,
    /// Times this agent was pushed off its goal.
    pub pushes: u64,
    /// Search episodes run.
    pub searches: u64,
}

impl AgentMetrics {
    /// Fresh counters.  An agent that starts on its goal has already
    /// completed, at time zero and step zero.
    pub fn new(starts_on_goal: bool) -> Self {
        let mut m = Self::default();
        if starts_on_goal {
            m.completion_time = Some(Duration::ZERO);
            m.completion_steps = Some(0);
        }
        m
    }

    /// Record a move `from → to` across an edge of `weight`.
    pub fn record_move(&mut self, from: NodeId, weight: f64, arrived_at_goal: bool, clock: &SimClock) {
        let now = clock.elapsed();
        self.previous = Some(from);
        self.last_move_at = Some(now);
        self.last_edge_weight = weight;
        self.travel_distance += weight;
        self.moves += 1;
        if arrived_at_goal {
            self.completion_time = Some(now);
            self.completion_steps = Some(clock.tick().0 + 1);
        }
    }

    /// `true` if the most recent move counts under `cutoff`.  Agents that
    /// never moved have nothing to discount.
    #[inline]
    pub fn last_move_counts(&self, cutoff: Duration) -> bool {
        self.last_move_at.is_none_or(|t| t < cutoff)
    }

    /// The node the agent stood on as of `cutoff`, given its current node.
    pub fn node_at_cutoff(&self, current: NodeId, cutoff: Duration) -> NodeId {
        match self.previous {
            Some(prev) if !self.last_move_counts(cutoff) => prev,
            _ => current,
        }
    }

    /// Travel distance as of `cutoff`.
    pub fn travel_distance_at(&self, cutoff: Duration) -> f64 {
        if self.last_move_counts(cutoff) {
            self.travel_distance
        } else {
            self.travel_distance - self.last_edge_weight
        }
    }
}
