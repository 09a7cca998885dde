//! Simulation time model.
//!
//! # Design
//!
//! Two independent clocks gate a run:
//!
//! - a monotonically increasing `Tick` counter, advanced exactly once per
//!   controller tick and used for the per-agent replan deadline and for
//!   completion time measured in steps;
//! - a wall-clock stopwatch that only accumulates while running.  The
//!   controller starts it before a tick and stops it after, so time spent by
//!   the driver between ticks (result collection, output) is not charged to
//!   the algorithm.
//!
//! `SimClock` is owned by the controller and passed by reference into every
//! agent call; there is no global tick counter.

use std::fmt;
use std::time::{Duration, Instant};

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tick counter plus a start/stop wall-clock stopwatch.
///
/// Starting a running stopwatch or stopping a stopped one is a programmer
/// error and is reported as [`CoreError::StopwatchRunning`] /
/// [`CoreError::StopwatchStopped`].
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    current_tick: Tick,
    /// Time accumulated by completed start/stop intervals.
    accumulated: Duration,
    /// `Some` while the stopwatch is running.
    started_at: Option<Instant>,
}

impl SimClock {
    /// A clock at tick 0 with a stopped, zeroed stopwatch.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current tick.
    #[inline]
    pub fn tick(&self) -> Tick {
        self.current_tick
    }

    /// Advance the tick counter by one.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    // ── Stopwatch ─────────────────────────────────────────────────────────

    pub fn start_stopwatch(&mut self) -> CoreResult<()> {
        if self.started_at.is_some() {
            return Err(CoreError::StopwatchRunning);
        }
        self.started_at = Some(Instant::now());
        Ok(())
    }

    pub fn stop_stopwatch(&mut self) -> CoreResult<()> {
        let started = self.started_at.take().ok_or(CoreError::StopwatchStopped)?;
        self.accumulated += started.elapsed();
        Ok(())
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Total wall-clock time charged to the run so far, including the
    /// current interval if the stopwatch is running.
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started) => self.accumulated + started.elapsed(),
            None          => self.accumulated,
        }
    }

    /// [`elapsed`](Self::elapsed) in whole milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Charge time measured outside the stopwatch to the run (e.g. waypoint
    /// preprocessing when it should count against the time limit).
    pub fn charge(&mut self, extra: Duration) {
        self.accumulated += extra;
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} ms)", self.current_tick, self.elapsed_ms())
    }
}
