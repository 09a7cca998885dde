//! Algorithm parameters shared by every agent in a run.

use std::f64::consts::SQRT_2;

use crate::{CoreError, CoreResult};

/// How an agent chooses the sub-goal its bounded search chases.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Plain BMAA*: the bounded search always targets the true goal.
    #[default]
    Bmaa,
    /// Precompute a full path, sample it into waypoints, and chase those as
    /// successive sub-goals.
    Waypoint,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Bmaa     => "bmaa",
            Strategy::Waypoint => "waypoint",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Per-run BMAA* parameters.
///
/// Typically built by the driver from command-line flags or an experiment
/// table and handed to `ControllerBuilder`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BmaaConfig {
    /// Node expansions per search episode before the episode is cut off.
    pub expansions: usize,

    /// Occupied neighbours closer than this (euclidean) are pruned from the
    /// search unless their occupant is resting at its own goal.
    pub vision: f64,

    /// Ticks an agent follows its prefix before it is allowed to replan.
    pub moves: u64,

    /// Allow an agent to push a goal-resting occupant off its next node.
    pub push: bool,

    /// Octile distance at which a non-final waypoint counts as reached.
    /// Only used by [`Strategy::Waypoint`].
    pub closeness: f64,
}

impl BmaaConfig {
    pub const DEFAULT_EXPANSIONS: usize = 32;
    pub const DEFAULT_VISION:     f64   = SQRT_2;
    pub const DEFAULT_MOVES:      u64   = 32;

    /// Reject parameter combinations the search cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.expansions == 0 {
            return Err(CoreError::Config("expansions must be at least 1".into()));
        }
        if !(self.vision >= 0.0) {
            return Err(CoreError::Config(format!("vision must be >= 0, got {}", self.vision)));
        }
        if !(self.closeness >= 0.0) {
            return Err(CoreError::Config(format!(
                "closeness must be >= 0, got {}",
                self.closeness
            )));
        }
        Ok(())
    }
}

impl Default for BmaaConfig {
    fn default() -> Self {
        Self {
            expansions: Self::DEFAULT_EXPANSIONS,
            vision:     Self::DEFAULT_VISION,
            moves:      Self::DEFAULT_MOVES,
            push:       true,
            closeness:  0.0,
        }
    }
}
