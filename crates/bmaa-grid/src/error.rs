//! Grid-subsystem error type.

use thiserror::Error;

use bmaa_core::{AgentId, NodeId};

/// Errors produced by `bmaa-grid`.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("no edge between {from} and {to}")]
    NoSuchEdge { from: NodeId, to: NodeId },

    /// An unbounded search exhausted its open list.
    #[error("goal {to} is unreachable from {from}")]
    Unreachable { from: NodeId, to: NodeId },

    /// Occupancy invariant breach: a node may hold at most one agent.
    #[error("{entrant} tried to enter {node}, already held by {occupant}")]
    Occupied { node: NodeId, occupant: AgentId, entrant: AgentId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("parse error at line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("not enough space to place {requested} agents ({available} candidate nodes)")]
    InsufficientSpace { requested: usize, available: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type GridResult<T> = Result<T, GridError>;
