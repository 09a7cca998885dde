//! The BMAA* agent: position, path prefix, movement, and metrics queries.
//!
//! # State machine
//!
//! An agent is either *following* its path prefix (the cursor points at its
//! current node and a next node exists) or it *needs a plan* (the prefix is
//! exhausted, the agent was pushed off it, or the replan deadline passed).
//! `Agent::search_phase` (in [`crate::search`]) runs one bounded episode in
//! the second case and replaces the prefix.
//!
//! # Occupancy
//!
//! The agent never holds a reference to a node or another agent.  Moves go
//! through [`Occupancy::enter`] before [`Occupancy::leave`], so a move onto
//! a held node fails without changing any state.

use std::time::Duration;

use bmaa_core::{AgentId, NodeId, SimClock, Tick};
use bmaa_grid::{Edge, GridGraph, GridResult, Occupancy};

use crate::heuristic::HeuristicCache;
use crate::metrics::AgentMetrics;
use crate::waypoint::SubGoals;
use crate::{AgentError, AgentResult};

#[derive(Clone, Debug)]
pub struct Agent {
    pub(crate) id: AgentId,
    pub(crate) start: NodeId,
    pub(crate) goal: NodeId,
    pub(crate) current: NodeId,

    /// Nodes from the plan origin onward; `prefix[cursor] == current` while
    /// the agent follows it.
    pub(crate) prefix: Vec<NodeId>,
    pub(crate) cursor: usize,

    /// Last tick on which the agent keeps following its prefix without
    /// replanning.
    pub(crate) deadline: Tick,

    pub(crate) subgoals: SubGoals,
    pub(crate) heuristic: HeuristicCache,
    pub(crate) metrics: AgentMetrics,
}

impl Agent {
    /// A plain BMAA* agent chasing `goal` directly.
    pub fn new(id: AgentId, start: NodeId, goal: NodeId) -> Self {
        Self::with_subgoals(id, start, goal, SubGoals::direct(goal))
    }

    /// An agent chasing a precomputed sub-goal sequence ending in `goal`.
    pub fn with_subgoals(id: AgentId, start: NodeId, goal: NodeId, subgoals: SubGoals) -> Self {
        let heuristic = HeuristicCache::new(subgoals.current());
        Self {
            id,
            start,
            goal,
            current: start,
            prefix: vec![start],
            cursor: 0,
            deadline: Tick::ZERO,
            subgoals,
            heuristic,
            metrics: AgentMetrics::new(start == goal),
        }
    }

    /// Register the agent on its start node.
    pub fn place(&self, occupancy: &mut Occupancy) -> GridResult<()> {
        occupancy.enter(self.current, self.id, self.at_goal())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline] pub fn id(&self) -> AgentId { self.id }
    #[inline] pub fn start(&self) -> NodeId { self.start }
    #[inline] pub fn goal(&self) -> NodeId { self.goal }
    #[inline] pub fn current(&self) -> NodeId { self.current }
    #[inline] pub fn cursor(&self) -> usize { self.cursor }
    #[inline] pub fn deadline(&self) -> Tick { self.deadline }

    pub fn prefix(&self) -> &[NodeId] {
        &self.prefix
    }

    pub fn subgoals(&self) -> &SubGoals {
        &self.subgoals
    }

    pub fn heuristic(&self) -> &HeuristicCache {
        &self.heuristic
    }

    pub fn metrics(&self) -> &AgentMetrics {
        &self.metrics
    }

    #[inline]
    pub fn at_goal(&self) -> bool {
        self.current == self.goal
    }

    // ── Plan following ────────────────────────────────────────────────────

    /// `true` while the agent sits on its prefix with a node still ahead.
    #[inline]
    pub fn next_node_defined(&self) -> bool {
        self.prefix.get(self.cursor) == Some(&self.current) && self.cursor + 1 < self.prefix.len()
    }

    /// The node the agent will try to enter next.
    pub fn next_node(&self) -> Option<NodeId> {
        if self.next_node_defined() {
            Some(self.prefix[self.cursor + 1])
        } else {
            None
        }
    }

    /// `true` if the search phase must run a new episode on `tick`.
    #[inline]
    pub fn needs_plan(&self, tick: Tick) -> bool {
        !self.next_node_defined() || tick > self.deadline
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Step onto the next prefix node.
    ///
    /// Fails with `NoNextNode` if the prefix has no next node and with
    /// `GridError::Occupied` if the node is held; the agent is unchanged in
    /// both cases.
    pub fn move_to_next(
        &mut self,
        graph: &GridGraph,
        occupancy: &mut Occupancy,
        clock: &SimClock,
    ) -> AgentResult<NodeId> {
        let next = self.next_node().ok_or(AgentError::NoNextNode(self.id))?;
        let edge = graph.edge(self.current, next)?;
        self.step(edge, occupancy, clock)?;
        self.cursor += 1;
        Ok(next)
    }

    /// Step aside to the first free neighbour in adjacency order, vacating
    /// the current node.  Returns the new node, or `None` if every
    /// neighbour is held.
    ///
    /// The prefix is reset to the new node, so the next search phase
    /// replans from there.
    pub fn push(
        &mut self,
        graph: &GridGraph,
        occupancy: &mut Occupancy,
        clock: &SimClock,
    ) -> AgentResult<Option<NodeId>> {
        let Some(edge) = graph.out_edges(self.current).find(|e| !occupancy.is_occupied(e.to)) else {
            return Ok(None);
        };
        self.step(edge, occupancy, clock)?;
        self.prefix.clear();
        self.prefix.push(edge.to);
        self.cursor = 0;
        self.metrics.pushes += 1;
        Ok(Some(edge.to))
    }

    fn step(&mut self, edge: Edge, occupancy: &mut Occupancy, clock: &SimClock) -> AgentResult<()> {
        let arrives = edge.to == self.goal;
        occupancy.enter(edge.to, self.id, arrives)?;
        occupancy.leave(self.current, self.id);
        self.metrics.record_move(self.current, edge.weight, arrives, clock);
        self.current = edge.to;
        Ok(())
    }

    // ── Metrics as of a cutoff ────────────────────────────────────────────

    /// Whether the agent stood on its goal as of `cutoff`.
    pub fn at_goal_before(&self, cutoff: Duration) -> bool {
        self.metrics.node_at_cutoff(self.current, cutoff) == self.goal
    }

    /// Stopwatch reading at goal arrival, if the agent was on its goal as
    /// of `cutoff`.
    pub fn completion_time(&self, cutoff: Duration) -> Option<Duration> {
        if self.at_goal_before(cutoff) { self.metrics.completion_time } else { None }
    }

    /// Ticks taken to reach the goal, if the agent was on its goal as of
    /// `cutoff`.  0 for an agent that started on its goal.
    pub fn completion_steps(&self, cutoff: Duration) -> Option<u64> {
        if self.at_goal_before(cutoff) { self.metrics.completion_steps } else { None }
    }

    /// Total edge weight travelled as of `cutoff`.
    pub fn travel_distance(&self, cutoff: Duration) -> f64 {
        self.metrics.travel_distance_at(cutoff)
    }
}
