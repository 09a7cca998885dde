use bmaa_agent::AgentError;
use bmaa_core::{AgentId, CoreError, NodeId};
use bmaa_grid::GridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("agents {first} and {second} both start on {node}")]
    DuplicateStart {
        node:   NodeId,
        first:  AgentId,
        second: AgentId,
    },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
