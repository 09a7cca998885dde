//! Planning trait and the default unbounded A* implementation.
//!
//! # Pluggability
//!
//! The waypoint decomposer calls full-path planning through the [`Planner`]
//! trait, so a different planner (JPS, a precomputed table) can replace
//! [`AStar`] without touching agent code.
//!
//! The bounded per-agent search lives in `bmaa-agent`; it shares the open
//! list and the octile heuristic with this module but not the loop, since
//! it prunes by occupancy and stops on an expansion budget.

use rustc_hash::FxHashMap;

use bmaa_core::NodeId;

use crate::graph::GridGraph;
use crate::open_list::IndexedOpenList;
use crate::{GridError, GridResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// A node sequence from source to destination, both inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<NodeId>,
    /// Sum of edge weights along `nodes`.
    pub cost: f64,
}

impl Path {
    /// Number of nodes (one more than the number of steps).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }
}

// ── Planner trait ─────────────────────────────────────────────────────────────

/// Pluggable full-path planner.
///
/// Implementations must be `Send + Sync` so decomposition can fan out over
/// Rayon workers with the `parallel` feature of `bmaa-sim`.
pub trait Planner: Send + Sync {
    /// Shortest path from `from` to `to`, ignoring all agents.
    ///
    /// `from == to` yields a single-node path.  Fails with
    /// [`GridError::Unreachable`] if the goal cannot be reached.
    fn plan(&self, graph: &GridGraph, from: NodeId, to: NodeId) -> GridResult<Path>;
}

// ── AStar ─────────────────────────────────────────────────────────────────────

/// Unbounded A* with the octile heuristic.
#[derive(Copy, Clone, Debug, Default)]
pub struct AStar;

impl Planner for AStar {
    fn plan(&self, graph: &GridGraph, from: NodeId, to: NodeId) -> GridResult<Path> {
        astar(graph, from, to)
    }
}

fn astar(graph: &GridGraph, from: NodeId, to: NodeId) -> GridResult<Path> {
    for n in [from, to] {
        if !graph.contains(n) {
            return Err(GridError::NodeNotFound(n));
        }
    }
    if from == to {
        return Ok(Path { nodes: vec![from], cost: 0.0 });
    }

    let mut open = IndexedOpenList::new();
    let mut g: FxHashMap<NodeId, f64> = FxHashMap::default();
    let mut parent: FxHashMap<NodeId, NodeId> = FxHashMap::default();
    let mut closed = vec![false; graph.node_count()];

    g.insert(from, 0.0);
    open.put(from, graph.octile_distance(from, to));

    while let Some(n) = open.get() {
        if n == to {
            return Ok(reconstruct(&parent, from, to, g[&to]));
        }
        closed[n.index()] = true;
        let gn = g[&n];

        for e in graph.out_edges(n) {
            if closed[e.to.index()] {
                continue;
            }
            let tentative = gn + e.weight;
            if g.get(&e.to).is_none_or(|&old| tentative < old) {
                g.insert(e.to, tentative);
                parent.insert(e.to, n);
                open.put(e.to, tentative + graph.octile_distance(e.to, to));
            }
        }
    }

    Err(GridError::Unreachable { from, to })
}

fn reconstruct(parent: &FxHashMap<NodeId, NodeId>, from: NodeId, to: NodeId, cost: f64) -> Path {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        match parent.get(&cur) {
            Some(&p) => {
                nodes.push(p);
                cur = p;
            }
            None => break,
        }
    }
    nodes.reverse();
    Path { nodes, cost }
}
