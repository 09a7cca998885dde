//! Per-agent learned heuristic.
//!
//! Values start out as the octile distance to the active sub-goal and are
//! only stored once a completed search episode has revised them, so the
//! cache holds nothing for nodes no episode has closed.  Retargeting to a
//! new sub-goal drops every learned value.

use rustc_hash::FxHashMap;

use bmaa_core::NodeId;
use bmaa_grid::GridGraph;

#[derive(Clone, Debug)]
pub struct HeuristicCache {
    target: NodeId,
    learned: FxHashMap<NodeId, f64>,
}

impl HeuristicCache {
    pub fn new(target: NodeId) -> Self {
        Self { target, learned: FxHashMap::default() }
    }

    /// The sub-goal the values estimate the distance to.
    #[inline]
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Estimated distance from `node` to the target.
    #[inline]
    pub fn h(&self, graph: &GridGraph, node: NodeId) -> f64 {
        match self.learned.get(&node) {
            Some(&h) => h,
            None => graph.octile_distance(node, self.target),
        }
    }

    /// The learned value for `node`, if an episode has revised it.
    pub fn learned(&self, node: NodeId) -> Option<f64> {
        self.learned.get(&node).copied()
    }

    /// Overwrite the value for `node` unconditionally.
    #[inline]
    pub fn learn(&mut self, node: NodeId, h: f64) {
        self.learned.insert(node, h);
    }

    /// Point the cache at a new target and forget everything learned.
    pub fn retarget(&mut self, target: NodeId) {
        self.target = target;
        self.learned.clear();
    }

    pub fn len(&self) -> usize {
        self.learned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.learned.is_empty()
    }
}
