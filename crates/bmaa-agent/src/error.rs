//! Agent-subsystem error type.

use thiserror::Error;

use bmaa_core::{AgentId, CoreError};
use bmaa_grid::GridError;

/// Errors produced by `bmaa-agent`.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// `move_to_next` called while the prefix has no next node.
    #[error("agent {0} has no next node on its path prefix")]
    NoNextNode(AgentId),
}

pub type AgentResult<T> = Result<T, AgentError>;
