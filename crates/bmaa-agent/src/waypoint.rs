//! Sub-goal sequences and waypoint decomposition.
//!
//! Every agent chases a [`SubGoals`] sequence whose last element is its true
//! goal.  Plain BMAA* agents hold the one-element sequence `[goal]`.
//! Waypoint agents hold a coarse sampling of a precomputed full path,
//! produced by [`decompose`]:
//!
//! ```text
//! full path  p0 p1 p2 p3 p4 p5 p6 p7 p8 p9      (10 nodes, stride ⌈√10⌉ = 4)
//! waypoints           p4          p8 p9
//! ```
//!
//! The start is never a waypoint and the goal always is.

use bmaa_core::NodeId;
use bmaa_grid::{GridGraph, GridResult, Planner};

/// Plan an unbounded path from `start` to `goal` and sample it into
/// waypoints.  Fails with `GridError::Unreachable` if there is no path.
pub fn decompose(
    planner: &dyn Planner,
    graph: &GridGraph,
    start: NodeId,
    goal: NodeId,
) -> GridResult<Vec<NodeId>> {
    let path = planner.plan(graph, start, goal)?;
    Ok(sample_waypoints(&path.nodes))
}

/// Every `⌈√len⌉`-th node of `path` (excluding the start), followed by the
/// final node.  Empty input yields no waypoints.
pub fn sample_waypoints(path: &[NodeId]) -> Vec<NodeId> {
    let Some(&last) = path.last() else {
        return Vec::new();
    };
    let stride = waypoint_stride(path.len());
    let mut waypoints: Vec<NodeId> = (stride..path.len() - 1)
        .step_by(stride)
        .map(|i| path[i])
        .collect();
    waypoints.push(last);
    waypoints
}

/// `⌈√len⌉`, at least 1.
pub fn waypoint_stride(len: usize) -> usize {
    ((len as f64).sqrt().ceil() as usize).max(1)
}

// ── SubGoals ──────────────────────────────────────────────────────────────────

/// Ordered sub-goals ending in the true goal, plus the cursor of the active
/// one.
#[derive(Clone, Debug, PartialEq)]
pub struct SubGoals {
    nodes: Vec<NodeId>,
    index: usize,
    closeness: f64,
}

impl SubGoals {
    /// The single sub-goal `goal`.
    pub fn direct(goal: NodeId) -> Self {
        Self { nodes: vec![goal], index: 0, closeness: 0.0 }
    }

    /// A waypoint sequence.  `goal` is appended if `nodes` does not already
    /// end with it, so an empty list behaves like [`direct`](Self::direct).
    pub fn waypoints(mut nodes: Vec<NodeId>, goal: NodeId, closeness: f64) -> Self {
        if nodes.last() != Some(&goal) {
            nodes.push(goal);
        }
        Self { nodes, index: 0, closeness }
    }

    /// The active sub-goal.
    #[inline]
    pub fn current(&self) -> NodeId {
        self.nodes[self.index]
    }

    /// `true` once the active sub-goal is the true goal.
    #[inline]
    pub fn is_final(&self) -> bool {
        self.index + 1 == self.nodes.len()
    }

    /// Octile distance at which the active sub-goal counts as reached.
    /// Always 0 for the final sub-goal.
    #[inline]
    pub fn closeness(&self) -> f64 {
        if self.is_final() { 0.0 } else { self.closeness }
    }

    /// Move to the next sub-goal.  Returns `false` if already final.
    pub fn advance(&mut self) -> bool {
        if self.is_final() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }
}
