//! Bounded incremental A* (the search phase).
//!
//! # One episode
//!
//! 1. Seed the open list with the current node at g = 0.
//! 2. Pop the minimum-f node `n` and close it.  Stop if `n` is the goal or
//!    the expansion count exceeds the budget.
//! 3. If the active sub-goal is a non-final waypoint within `closeness` of
//!    `n`, bank the path to `n`, advance the waypoint, forget the learned
//!    heuristic and restart the frontier from `n`'s neighbours.  The episode
//!    goes on toward the new waypoint.
//! 4. Otherwise relax `n`'s neighbours, skipping any held by another agent
//!    that is not resting on its own goal when it lies closer than `vision`.
//! 5. On stop, the prefix becomes the banked segments plus the path to the
//!    terminal node, and every closed node learns `h = f_best - g(node)`
//!    where `f_best` is the terminal node's f-value.
//!
//! After an episode the agent follows its prefix for `moves` ticks before
//! it may search again (sooner if the prefix runs out).

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use bmaa_core::{BmaaConfig, NodeId, SimClock};
use bmaa_grid::{GridGraph, IndexedOpenList, Occupancy};

use crate::agent::Agent;

/// Outcome of one bounded search episode.
#[derive(Clone, Debug, PartialEq)]
pub struct Episode {
    /// Nodes whose neighbours were relaxed.
    pub expanded: usize,
    /// Node the episode stopped on (end of the new prefix).
    pub terminal: NodeId,
    /// f-value of `terminal` used for heuristic learning.  `None` when the
    /// frontier died right after a waypoint restart.
    pub f_best: Option<f64>,
    /// Length of the new prefix.
    pub prefix_len: usize,
    /// Waypoints passed during the episode.
    pub waypoints_reached: usize,
    /// The terminal node is the agent's goal.
    pub reached_goal: bool,
}

/// Per-episode search bookkeeping.  Cleared wholesale on a waypoint restart.
#[derive(Default)]
struct Frontier {
    open: IndexedOpenList,
    g: FxHashMap<NodeId, f64>,
    parent: FxHashMap<NodeId, NodeId>,
    closed: FxHashSet<NodeId>,
}

impl Frontier {
    fn clear(&mut self) {
        self.open.clear();
        self.g.clear();
        self.parent.clear();
        self.closed.clear();
    }

    /// Append the path from the segment root to `n` onto `out`.
    fn append_path(&self, n: NodeId, out: &mut Vec<NodeId>) {
        let mark = out.len();
        let mut cur = n;
        out.push(cur);
        while let Some(&p) = self.parent.get(&cur) {
            out.push(p);
            cur = p;
        }
        out[mark..].reverse();
    }
}

impl Agent {
    /// Run a search episode if the agent needs a plan on the clock's current
    /// tick, then set the replan deadline.  Returns the episode, or `None`
    /// if the agent kept following its prefix.
    ///
    /// An episode whose frontier died after a waypoint restart leaves the
    /// deadline alone, so the agent searches again on the next tick.
    pub fn search_phase(
        &mut self,
        graph: &GridGraph,
        occupancy: &Occupancy,
        clock: &SimClock,
        config: &BmaaConfig,
    ) -> Option<Episode> {
        let tick = clock.tick();
        if !self.needs_plan(tick) {
            return None;
        }
        let episode = self.search_episode(graph, occupancy, config);
        if episode.f_best.is_some() {
            self.deadline = tick + config.moves;
        }
        self.metrics.searches += 1;
        trace!(
            agent = %self.id,
            %tick,
            expanded = episode.expanded,
            prefix = episode.prefix_len,
            f_best = ?episode.f_best,
            waypoints = episode.waypoints_reached,
            "search episode"
        );
        Some(episode)
    }

    /// One bounded episode from the current node, unconditionally.
    /// Replaces the prefix and resets the cursor.
    pub fn search_episode(
        &mut self,
        graph: &GridGraph,
        occupancy: &Occupancy,
        config: &BmaaConfig,
    ) -> Episode {
        let mut fr = Frontier::default();
        let mut banked: Vec<NodeId> = Vec::new();
        let mut expanded = 0usize;
        let mut waypoints_reached = 0usize;
        // Last node closed in the live segment; `None` right after a restart.
        let mut terminal: Option<NodeId> = None;

        fr.g.insert(self.current, 0.0);
        fr.open.put(self.current, self.heuristic.h(graph, self.current));

        while let Some(n) = fr.open.get() {
            fr.closed.insert(n);
            terminal = Some(n);

            if n == self.goal || expanded > config.expansions {
                break;
            }

            if !self.subgoals.is_final()
                && graph.octile_distance(n, self.subgoals.current()) <= self.subgoals.closeness()
            {
                fr.append_path(n, &mut banked);
                self.subgoals.advance();
                self.heuristic.retarget(self.subgoals.current());
                waypoints_reached += 1;
                terminal = None;

                fr.clear();
                for e in graph.out_edges(n) {
                    if self.avoids(graph, occupancy, config, n, e.to) {
                        continue;
                    }
                    fr.g.insert(e.to, e.weight);
                    fr.open.put(e.to, e.weight + self.heuristic.h(graph, e.to));
                }
                continue;
            }

            let gn = fr.g.get(&n).copied().unwrap_or_default();
            for e in graph.out_edges(n) {
                let m = e.to;
                if fr.closed.contains(&m) || self.avoids(graph, occupancy, config, n, m) {
                    continue;
                }
                let tentative = gn + e.weight;
                if fr.g.get(&m).is_none_or(|&old| tentative < old) {
                    fr.g.insert(m, tentative);
                    fr.parent.insert(m, n);
                    fr.open.put(m, tentative + self.heuristic.h(graph, m));
                }
            }
            expanded += 1;
        }

        let mut f_best = None;
        if let Some(t) = terminal {
            fr.append_path(t, &mut banked);
            let f = fr.g.get(&t).copied().unwrap_or_default() + self.heuristic.h(graph, t);
            for &node in &fr.closed {
                let g = fr.g.get(&node).copied().unwrap_or_default();
                self.heuristic.learn(node, f - g);
            }
            f_best = Some(f);
        }

        let end = banked.last().copied().unwrap_or(self.current);
        self.prefix = banked;
        self.cursor = 0;

        Episode {
            expanded,
            terminal: end,
            f_best,
            prefix_len: self.prefix.len(),
            waypoints_reached,
            reached_goal: end == self.goal,
        }
    }

    /// Soft avoidance: skip `m` when another agent that is not resting on
    /// its own goal holds it and it lies within `vision` of `n`.
    #[inline]
    fn avoids(
        &self,
        graph: &GridGraph,
        occupancy: &Occupancy,
        config: &BmaaConfig,
        n: NodeId,
        m: NodeId,
    ) -> bool {
        match occupancy.get(m) {
            Some(o) => {
                o.agent != self.id && !o.at_goal && graph.euclidean_distance(n, m) < config.vision
            }
            None => false,
        }
    }
}
