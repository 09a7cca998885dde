//! Start/goal problem sets.
//!
//! A `ProblemSet` is the pair of parallel lists the controller consumes:
//! agent `i` starts on `starts[i]` and heads for `goals[i]`.  Sets come from
//! random sampling over the whole graph, from sampling inside two
//! rectangular regions, or from a MovingAI scenario.
//!
//! Every generated pair is reachable (same connected component), starts are
//! pairwise distinct and goals are pairwise distinct.

use rustc_hash::FxHashSet;
use tracing::debug;

use bmaa_core::{GridPoint, NodeId, SimRng};

use crate::graph::GridGraph;
use crate::scenario::Scenario;
use crate::{GridError, GridResult};

/// Resampling attempts per agent before generation gives up.
const MAX_ATTEMPTS_PER_AGENT: usize = 1_000;

/// Inclusive axis-aligned rectangle of cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub min: GridPoint,
    pub max: GridPoint,
}

impl Region {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { min: GridPoint::new(x1, y1), max: GridPoint::new(x2, y2) }
    }

    #[inline]
    pub fn contains(&self, p: GridPoint) -> bool {
        p.within(self.min, self.max)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProblemSet {
    pub starts: Vec<NodeId>,
    pub goals: Vec<NodeId>,
}

impl ProblemSet {
    pub fn new(starts: Vec<NodeId>, goals: Vec<NodeId>) -> Self {
        Self { starts, goals }
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// `(start, goal)` pairs in agent order.
    pub fn pairs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.starts.iter().copied().zip(self.goals.iter().copied())
    }

    /// `n` random reachable pairs anywhere on the graph.
    ///
    /// Fails with [`GridError::InsufficientSpace`] if `n` exceeds half the
    /// node count.
    pub fn random(graph: &GridGraph, n: usize, rng: &mut SimRng) -> GridResult<Self> {
        if n > graph.node_count() / 2 {
            return Err(GridError::InsufficientSpace {
                requested: n,
                available: graph.node_count(),
            });
        }
        let nodes: Vec<NodeId> = graph.nodes().collect();
        sample(graph, n, &nodes, &nodes, rng)
    }

    /// `n` reachable pairs with starts inside `start_region` and goals inside
    /// `goal_region`.
    pub fn from_regions(
        graph: &GridGraph,
        n: usize,
        start_region: Region,
        goal_region: Region,
        rng: &mut SimRng,
    ) -> GridResult<Self> {
        let in_region = |r: Region| -> Vec<NodeId> {
            graph.nodes().filter(|&v| r.contains(graph.pos(v))).collect()
        };
        let starts = in_region(start_region);
        let goals = in_region(goal_region);
        let available = starts.len().min(goals.len());
        if available < n {
            return Err(GridError::InsufficientSpace { requested: n, available });
        }
        sample(graph, n, &starts, &goals, rng)
    }

    /// Resolve a scenario's coordinates to nodes, taking the first `limit`
    /// entries (all when `None`).  Coordinates that fall on a wall are
    /// snapped to the nearest passable cell.
    pub fn from_scenario(graph: &GridGraph, scenario: &Scenario, limit: Option<usize>) -> GridResult<Self> {
        let take = limit.unwrap_or(scenario.len()).min(scenario.len());
        let mut set = ProblemSet::default();
        for entry in &scenario.entries[..take] {
            let snap = |p: GridPoint| {
                graph.nearest_node(p).ok_or(GridError::InsufficientSpace { requested: take, available: 0 })
            };
            set.starts.push(snap(entry.start)?);
            set.goals.push(snap(entry.goal)?);
        }
        Ok(set)
    }

    /// Check that every goal is reachable from its start.
    pub fn validate(&self, graph: &GridGraph) -> GridResult<()> {
        for (s, g) in self.pairs() {
            for v in [s, g] {
                if !graph.contains(v) {
                    return Err(GridError::NodeNotFound(v));
                }
            }
            if !graph.same_component(s, g) {
                return Err(GridError::Unreachable { from: s, to: g });
            }
        }
        Ok(())
    }

    /// Largest start-to-goal octile distance; 0 for an empty set.
    pub fn longest_distance(&self, graph: &GridGraph) -> f64 {
        self.pairs()
            .map(|(s, g)| graph.octile_distance(s, g))
            .fold(0.0, f64::max)
    }

    /// Mean start-to-goal octile distance; 0 for an empty set.
    pub fn average_distance(&self, graph: &GridGraph) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.pairs().map(|(s, g)| graph.octile_distance(s, g)).sum::<f64>() / self.len() as f64
    }
}

/// Draw `n` pairs: a fresh start, then a fresh goal in the start's
/// component.  A start with no usable goal is redrawn.
fn sample(
    graph: &GridGraph,
    n: usize,
    start_pool: &[NodeId],
    goal_pool: &[NodeId],
    rng: &mut SimRng,
) -> GridResult<ProblemSet> {
    let mut used_starts: FxHashSet<NodeId> = FxHashSet::default();
    let mut used_goals: FxHashSet<NodeId> = FxHashSet::default();
    let mut set = ProblemSet { starts: Vec::with_capacity(n), goals: Vec::with_capacity(n) };
    let exhausted = || GridError::InsufficientSpace {
        requested: n,
        available: start_pool.len().min(goal_pool.len()),
    };

    for _ in 0..n {
        let mut placed = false;
        for _ in 0..MAX_ATTEMPTS_PER_AGENT {
            let &start = rng.choose(start_pool).ok_or_else(exhausted)?;
            if used_starts.contains(&start) {
                continue;
            }
            let &goal = rng.choose(goal_pool).ok_or_else(exhausted)?;
            if used_goals.contains(&goal) || !graph.same_component(start, goal) {
                continue;
            }
            used_starts.insert(start);
            used_goals.insert(goal);
            set.starts.push(start);
            set.goals.push(goal);
            placed = true;
            break;
        }
        if !placed {
            return Err(exhausted());
        }
    }

    debug!(agents = n, "generated problem set");
    Ok(set)
}
