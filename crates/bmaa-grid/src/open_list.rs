//! A* open list with membership test and in-place re-keying.
//!
//! A thin layer over [`priority_queue::PriorityQueue`], which keeps a hashed
//! index from each item to its heap slot.  `PriorityQueue` pops the highest
//! priority first, so priorities are stored as `Reverse<OrderedFloat<f64>>`.
//!
//! | Operation    | Cost      |
//! |--------------|-----------|
//! | `put`        | O(log n)  |
//! | `get`        | O(log n)  |
//! | `update`     | O(log n)  |
//! | `contains`   | O(1)      |
//!
//! Ties between equal priorities are broken arbitrarily.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use priority_queue::PriorityQueue;
use rustc_hash::FxBuildHasher;

use bmaa_core::NodeId;

type Priority = Reverse<OrderedFloat<f64>>;

#[inline]
fn key(priority: f64) -> Priority {
    Reverse(OrderedFloat(priority))
}

pub struct IndexedOpenList {
    queue: PriorityQueue<NodeId, Priority, FxBuildHasher>,
}

// `FxBuildHasher` does not implement `Debug`, so it cannot be derived.
impl std::fmt::Debug for IndexedOpenList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedOpenList")
            .field("queue", &self.queue.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for IndexedOpenList {
    fn default() -> Self {
        Self { queue: PriorityQueue::with_default_hasher() }
    }
}

impl IndexedOpenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self { queue: PriorityQueue::with_capacity_and_default_hasher(cap) }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.queue.get(&node).is_some()
    }

    /// Current priority of `node`, if it is in the list.
    pub fn priority(&self, node: NodeId) -> Option<f64> {
        self.queue.get_priority(&node).map(|p| p.0.0)
    }

    /// Insert `node`.  A node that is already present is re-keyed instead.
    pub fn put(&mut self, node: NodeId, priority: f64) {
        self.queue.push(node, key(priority));
    }

    /// Remove and return the node with minimum priority.
    pub fn get(&mut self) -> Option<NodeId> {
        self.queue.pop().map(|(node, _)| node)
    }

    /// Minimum entry without removing it.
    pub fn peek(&self) -> Option<(NodeId, f64)> {
        self.queue.peek().map(|(&node, p)| (node, p.0.0))
    }

    /// Change the priority of `node`.  No-op if the node is not in the list.
    pub fn update(&mut self, node: NodeId, priority: f64) {
        self.queue.change_priority(&node, key(priority));
    }

    /// Remove `node`, returning its priority.
    pub fn remove(&mut self, node: NodeId) -> Option<f64> {
        self.queue.remove(&node).map(|(_, p)| p.0.0)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
