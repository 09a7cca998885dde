//! Agent arena.
//!
//! Agents live in a `Vec` indexed by `AgentId`; the index is also the fixed
//! order the controller resolves moves in.  Cross-agent interaction (a push
//! during another agent's move) is two sequential `get_mut` calls, never
//! two live borrows.

use bmaa_core::{AgentId, NodeId};
use bmaa_grid::{GridResult, Occupancy};

use crate::agent::Agent;

#[derive(Clone, Debug, Default)]
pub struct AgentStore {
    agents: Vec<Agent>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `agents`, which must be indexed by their own ids.
    pub fn from_agents(agents: Vec<Agent>) -> Self {
        debug_assert!(agents.iter().enumerate().all(|(i, a)| a.id().index() == i));
        Self { agents }
    }

    /// Append an agent and return its id.
    pub fn push(&mut self, start: NodeId, goal: NodeId) -> AgentId {
        let id = AgentId::from_index(self.agents.len());
        self.agents.push(Agent::new(id, start, goal));
        id
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id.index())
    }

    /// Iterator over all `AgentId`s in ascending (move) order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.agents.len()).map(AgentId::from_index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Agent> {
        self.agents.iter_mut()
    }

    pub fn as_slice(&self) -> &[Agent] {
        &self.agents
    }

    pub fn all_at_goal(&self) -> bool {
        self.agents.iter().all(Agent::at_goal)
    }

    pub fn at_goal_count(&self) -> usize {
        self.agents.iter().filter(|a| a.at_goal()).count()
    }

    /// Register every agent on its start node.
    pub fn place_all(&self, occupancy: &mut Occupancy) -> GridResult<()> {
        self.agents.iter().try_for_each(|a| a.place(occupancy))
    }
}

impl<'a> IntoIterator for &'a AgentStore {
    type Item = &'a Agent;
    type IntoIter = std::slice::Iter<'a, Agent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}
