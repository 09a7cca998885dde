//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! `#[from]` variant so `?` works across crate boundaries.

use thiserror::Error;

/// The top-level error type for `bmaa-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    /// `SimClock::start_stopwatch` called while the stopwatch was running.
    #[error("tried to start the stopwatch while it was already running")]
    StopwatchRunning,

    /// `SimClock::stop_stopwatch` called while the stopwatch was stopped.
    #[error("tried to stop the stopwatch while it was already stopped")]
    StopwatchStopped,
}

/// Shorthand result type for `bmaa-core`.
pub type CoreResult<T> = Result<T, CoreError>;
