//! Node occupancy arena.
//!
//! One slot per graph node holding the agent currently standing there.
//! Agents refer to nodes by `NodeId` and nodes refer back to agents by
//! `AgentId`; neither side holds a reference to the other.
//!
//! Each slot also records whether its occupant is resting on its own goal.
//! The bounded search and the push rule both need that fact for *other*
//! agents, and keeping it here lets them read it without borrowing the
//! agent store while one agent is mutably borrowed.

use bmaa_core::{AgentId, NodeId};

use crate::{GridError, GridResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Occupant {
    pub agent: AgentId,
    /// The occupant's current node is its own goal.
    pub at_goal: bool,
}

#[derive(Clone, Debug)]
pub struct Occupancy {
    slots: Vec<Option<Occupant>>,
    occupied: usize,
}

impl Occupancy {
    /// An empty arena for a graph of `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self { slots: vec![None; node_count], occupied: 0 }
    }

    #[inline]
    pub fn get(&self, node: NodeId) -> Option<Occupant> {
        self.slots.get(node.index()).copied().flatten()
    }

    #[inline]
    pub fn occupant(&self, node: NodeId) -> Option<AgentId> {
        self.get(node).map(|o| o.agent)
    }

    #[inline]
    pub fn is_occupied(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    /// `true` if `node` is held by an agent resting on its own goal.
    #[inline]
    pub fn occupant_at_goal(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|o| o.at_goal)
    }

    /// Number of occupied nodes.
    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// Place `agent` on `node`.
    ///
    /// Fails with [`GridError::Occupied`] if another agent already holds the
    /// node.  Re-entering one's own node just refreshes the goal flag.
    pub fn enter(&mut self, node: NodeId, agent: AgentId, at_goal: bool) -> GridResult<()> {
        let slot = self
            .slots
            .get_mut(node.index())
            .ok_or(GridError::NodeNotFound(node))?;
        match slot {
            Some(o) if o.agent != agent => Err(GridError::Occupied {
                node,
                occupant: o.agent,
                entrant: agent,
            }),
            Some(o) => {
                o.at_goal = at_goal;
                Ok(())
            }
            None => {
                *slot = Some(Occupant { agent, at_goal });
                self.occupied += 1;
                Ok(())
            }
        }
    }

    /// Clear `node` if `agent` holds it.  Returns whether anything changed.
    pub fn leave(&mut self, node: NodeId, agent: AgentId) -> bool {
        match self.slots.get_mut(node.index()) {
            Some(slot) if slot.is_some_and(|o| o.agent == agent) => {
                *slot = None;
                self.occupied -= 1;
                true
            }
            _ => false,
        }
    }

    /// Iterator over `(node, occupant)` for every occupied node.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Occupant)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|o| (NodeId::from_index(i), o)))
    }
}
