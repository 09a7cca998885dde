//! Integration tests for bmaa-sim.

use std::time::Duration;

use bmaa_core::{BmaaConfig, NodeId, Strategy, Tick};
use bmaa_grid::GridGraph;

use crate::{Controller, ControllerBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn line(n: u32) -> GridGraph {
    GridGraph::open_grid(n, 1)
}

fn build(graph: GridGraph, pairs: &[(u32, u32)], config: BmaaConfig) -> Controller {
    let starts = pairs.iter().map(|&(s, _)| NodeId(s)).collect();
    let goals = pairs.iter().map(|&(_, t)| NodeId(t)).collect();
    ControllerBuilder::new(graph, starts, goals).config(config).build().unwrap()
}

/// Occupancy exclusivity and prefix-cursor consistency.
fn assert_invariants(ctl: &Controller) {
    assert_eq!(ctl.occupancy.occupied_count(), ctl.agents.len());
    for agent in &ctl.agents {
        assert_eq!(ctl.occupancy.occupant(agent.current()), Some(agent.id()), "{}", agent.id());
        assert_eq!(ctl.occupancy.occupant_at_goal(agent.current()), agent.at_goal());
        assert_eq!(agent.prefix()[agent.cursor()], agent.current(), "{}", agent.id());
    }
}

// ── ControllerBuilder validation ──────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use bmaa_core::{AgentId, CoreError};
    use bmaa_grid::{GridError, ProblemSet};

    use super::*;
    use crate::SimError;

    #[test]
    fn builds_and_places_agents() {
        let ctl = build(line(5), &[(0, 4), (2, 2)], BmaaConfig::default());
        assert_eq!(ctl.agents.len(), 2);
        assert_eq!(ctl.current_tick(), Tick::ZERO);
        assert!(ctl.occupancy.occupant_at_goal(NodeId(2)));
        assert_invariants(&ctl);
    }

    #[test]
    fn goal_count_mismatch_errors() {
        let r = ControllerBuilder::new(line(5), vec![NodeId(0), NodeId(1)], vec![NodeId(4)]).build();
        assert!(matches!(r, Err(SimError::AgentCountMismatch { expected: 2, got: 1, .. })));
    }

    #[test]
    fn shared_start_errors() {
        let r = ControllerBuilder::new(line(5), vec![NodeId(1), NodeId(1)], vec![NodeId(3), NodeId(4)])
            .build();
        match r {
            Err(SimError::DuplicateStart { node, first, second }) => {
                assert_eq!(node, NodeId(1));
                assert_eq!((first, second), (AgentId(0), AgentId(1)));
            }
            other => panic!("expected DuplicateStart, got {:?}", other.err()),
        }
    }

    #[test]
    fn unknown_node_errors() {
        let r = ControllerBuilder::new(line(3), vec![NodeId(0)], vec![NodeId(9)]).build();
        assert!(matches!(r, Err(SimError::Grid(GridError::NodeNotFound(_)))));
    }

    #[test]
    fn invalid_config_errors() {
        let r = ControllerBuilder::new(line(3), vec![NodeId(0)], vec![NodeId(2)])
            .config(BmaaConfig { expansions: 0, ..Default::default() })
            .build();
        assert!(matches!(r, Err(SimError::Core(CoreError::Config(_)))));
    }

    #[test]
    fn waypoint_strategy_decomposes_paths() {
        let ctl = ControllerBuilder::new(line(9), vec![NodeId(0)], vec![NodeId(8)])
            .strategy(Strategy::Waypoint)
            .build()
            .unwrap();
        let agent = ctl.agents.get(AgentId(0)).unwrap();
        assert_eq!(agent.subgoals().as_slice(), &[NodeId(3), NodeId(6), NodeId(8)]);
        assert_eq!(ctl.strategy, Strategy::Waypoint);
    }

    #[test]
    fn waypoint_strategy_rejects_unreachable_goal() {
        let graph = GridGraph::from_passable(3, 1, |x, _| x != 1);
        let r = ControllerBuilder::new(graph, vec![NodeId(0)], vec![NodeId(1)])
            .strategy(Strategy::Waypoint)
            .build();
        assert!(matches!(r, Err(SimError::Grid(GridError::Unreachable { .. }))));
    }

    #[test]
    fn preprocessing_charged_only_on_request() {
        let problems = ProblemSet::new(vec![NodeId(0)], vec![NodeId(99)]);
        let ctl = ControllerBuilder::from_problems(GridGraph::open_grid(10, 10), &problems)
            .strategy(Strategy::Waypoint)
            .build()
            .unwrap();
        assert_eq!(ctl.clock.elapsed(), Duration::ZERO);

        let ctl = ControllerBuilder::from_problems(GridGraph::open_grid(10, 10), &problems)
            .strategy(Strategy::Waypoint)
            .count_preprocessing(true)
            .build()
            .unwrap();
        assert_eq!(ctl.clock.elapsed(), ctl.preprocessing_time());
    }
}

// ── Run loop ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use std::f64::consts::SQRT_2;

    use bmaa_agent::AgentStore;
    use bmaa_core::{AgentId, SimRng};
    use bmaa_grid::ProblemSet;

    use super::*;
    use crate::{NoopObserver, RunResult, SimObserver, TickSummary};

    #[test]
    fn single_agent_open_grid() {
        let config = BmaaConfig { expansions: 25, ..Default::default() };
        let mut ctl = build(GridGraph::open_grid(5, 5), &[(0, 24)], config);
        ctl.run_ticks(4, &mut NoopObserver).unwrap();

        let a = ctl.agents.get(AgentId(0)).unwrap();
        assert!(a.at_goal());
        assert!((a.travel_distance(Duration::MAX) - 4.0 * SQRT_2).abs() < 1e-9);
        assert_eq!(a.completion_steps(Duration::MAX), Some(4));
        assert_eq!(a.metrics().searches, 1);
        assert_eq!(ctl.current_tick(), Tick(4));
    }

    #[test]
    fn time_limit_run_stops_when_all_at_goal() {
        let config = BmaaConfig { expansions: 25, ..Default::default() };
        let mut ctl = build(GridGraph::open_grid(5, 5), &[(0, 24)], config);
        let r = ctl.run_with_time_limit(Duration::from_secs(10), &mut NoopObserver).unwrap();
        assert_eq!(ctl.current_tick(), Tick(4));
        assert_eq!(r.completion_rate, 1.0);
        assert_eq!(r.avg_completion_steps, Some(4.0));
        assert!((r.avg_travel_distance - 4.0 * SQRT_2).abs() < 1e-9);
        assert!(r.avg_completion_secs < 10.0);
        assert!(!ctl.clock.is_running());
    }

    #[test]
    fn zero_time_limit_runs_nothing() {
        let mut ctl = build(line(5), &[(0, 4), (2, 2)], BmaaConfig::default());
        let r = ctl.run_with_time_limit(Duration::ZERO, &mut NoopObserver).unwrap();
        assert_eq!(ctl.current_tick(), Tick::ZERO);
        assert_eq!(r.completion_rate, 0.5);
        assert_eq!(r.avg_completion_steps, Some(0.0));
        assert_eq!(r.avg_travel_distance, 0.0);
    }

    #[test]
    fn stop_times_collect_one_result_each() {
        let mut ctl = build(line(30), &[(0, 29)], BmaaConfig::default());
        let results = ctl
            .run_with_stop_times(&[Duration::ZERO, Duration::from_secs(10)], &mut NoopObserver)
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].time_limit, Duration::ZERO);
        assert_eq!(results[0].completion_rate, 0.0);
        assert_eq!(results[0].avg_completion_steps, None);
        assert_eq!(results[1].completion_rate, 1.0);
        assert_eq!(results[1].avg_completion_steps, Some(29.0));
        assert_eq!(results[1].avg_travel_distance, 29.0);
    }

    #[test]
    fn random_problems_keep_invariants() {
        for strategy in [Strategy::Bmaa, Strategy::Waypoint] {
            let graph = GridGraph::from_passable(12, 12, |x, y| !(x == 6 && y < 10));
            let problems = ProblemSet::random(&graph, 16, &mut SimRng::new(7)).unwrap();
            let mut ctl = ControllerBuilder::from_problems(graph, &problems)
                .strategy(strategy)
                .config(BmaaConfig { expansions: 16, moves: 4, ..Default::default() })
                .build()
                .unwrap();
            for _ in 0..80 {
                ctl.tick(&mut NoopObserver).unwrap();
                assert_invariants(&ctl);
            }
        }
    }

    #[test]
    fn move_order_decides_same_tick_conflicts() {
        // Vision below 1 disables avoidance so both agents plan straight lines.
        let config = BmaaConfig { vision: 0.5, ..Default::default() };

        // Leader first: it vacates node 1 before the follower tries it.
        let mut ctl = build(line(4), &[(1, 3), (0, 2)], config.clone());
        let s = ctl.tick(&mut NoopObserver).unwrap();
        assert_eq!((s.moves, s.blocked), (2, 0));

        // Follower first: node 1 is still held when it tries.
        let mut ctl = build(line(4), &[(0, 2), (1, 3)], config);
        let s = ctl.tick(&mut NoopObserver).unwrap();
        assert_eq!((s.moves, s.blocked), (1, 1));
        assert_eq!(ctl.agents.get(AgentId(0)).unwrap().current(), NodeId(0));
        assert_invariants(&ctl);
    }

    #[test]
    fn results_treat_unfinished_as_limit() {
        let mut store = AgentStore::new();
        store.push(NodeId(0), NodeId(0));
        store.push(NodeId(1), NodeId(2));
        let r = RunResult::collect(&store, Duration::from_secs(2));
        assert_eq!(r.agent_count, 2);
        assert_eq!(r.completion_rate, 0.5);
        assert_eq!(r.agents_at_goal(), 1);
        assert_eq!(r.avg_completion_secs, 1.0);
        assert_eq!(r.avg_completion_steps, Some(0.0));

        let mut store = AgentStore::new();
        store.push(NodeId(1), NodeId(2));
        let r = RunResult::collect(&store, Duration::from_secs(2));
        assert_eq!(r.avg_completion_secs, 2.0);
        assert_eq!(r.avg_completion_steps, None);

        let r = RunResult::collect(&AgentStore::new(), Duration::from_secs(2));
        assert_eq!(r.agent_count, 0);
        assert_eq!(r.completion_rate, 0.0);
    }

    #[test]
    fn average_over_repeats() {
        let base = RunResult {
            time_limit:           Duration::from_secs(1),
            agent_count:          4,
            completion_rate:      0.5,
            avg_completion_secs:  0.8,
            avg_completion_steps: None,
            avg_travel_distance:  10.0,
        };
        let other = RunResult {
            completion_rate:      1.0,
            avg_completion_secs:  0.4,
            avg_completion_steps: Some(12.0),
            avg_travel_distance:  20.0,
            ..base.clone()
        };
        let avg = RunResult::average(&[base, other]).unwrap();
        assert_eq!(avg.completion_rate, 0.75);
        assert!((avg.avg_completion_secs - 0.6).abs() < 1e-12);
        assert_eq!(avg.avg_completion_steps, Some(12.0));
        assert_eq!(avg.avg_travel_distance, 15.0);
        assert!(RunResult::average(&[]).is_none());
    }

    #[derive(Default)]
    struct Counter {
        starts:    usize,
        ends:      usize,
        snapshots: Vec<Tick>,
        runs:      usize,
        moves:     usize,
    }

    impl SimObserver for Counter {
        fn on_tick_start(&mut self, _t: Tick) { self.starts += 1; }
        fn on_tick_end(&mut self, s: &TickSummary) {
            self.ends += 1;
            self.moves += s.moves;
        }
        fn on_snapshot(&mut self, t: Tick, _g: &GridGraph, _a: &AgentStore) { self.snapshots.push(t); }
        fn on_run_end(&mut self, _t: Tick, results: &[RunResult]) { self.runs += results.len(); }
    }

    #[test]
    fn observer_called_correct_number_of_times() {
        let starts = vec![NodeId(0)];
        let goals = vec![NodeId(9)];
        let mut ctl = ControllerBuilder::new(line(10), starts, goals)
            .snapshot_interval(2)
            .build()
            .unwrap();
        let mut obs = Counter::default();
        ctl.run_ticks(5, &mut obs).unwrap();
        assert_eq!((obs.starts, obs.ends), (5, 5));
        assert_eq!(obs.snapshots, vec![Tick(0), Tick(2), Tick(4)]);
        assert_eq!(obs.moves, 5);

        ctl.run_with_time_limit(Duration::from_secs(10), &mut obs).unwrap();
        assert_eq!(obs.runs, 1);
        assert_eq!(obs.moves, 9);
    }

    #[test]
    fn movement_cost_is_charged() {
        let mut ctl = ControllerBuilder::new(line(3), vec![NodeId(0)], vec![NodeId(2)])
            .movement_cost(Duration::from_millis(5))
            .build()
            .unwrap();
        ctl.run_ticks(2, &mut NoopObserver).unwrap();
        assert!(ctl.clock.elapsed() >= Duration::from_millis(10));
    }
}

// ── Push ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod push_tests {
    use bmaa_core::AgentId;

    use super::*;
    use crate::NoopObserver;

    #[test]
    fn goal_sitter_is_pushed_within_the_tick() {
        // a0 rests on its goal at 1; a1 walks 0 → 2 through it.
        let mut ctl = build(line(3), &[(1, 1), (0, 2)], BmaaConfig::default());
        let s = ctl.tick(&mut NoopObserver).unwrap();
        assert_eq!(s.pushes, 1);
        assert_eq!(s.moves, 1);
        let sitter = ctl.agents.get(AgentId(0)).unwrap();
        let walker = ctl.agents.get(AgentId(1)).unwrap();
        assert_eq!(sitter.current(), NodeId(2));
        assert_eq!(walker.current(), NodeId(1));
        assert_eq!(sitter.metrics().pushes, 1);
        assert_invariants(&ctl);
    }

    #[test]
    fn no_push_when_disabled() {
        let config = BmaaConfig { push: false, ..Default::default() };
        let mut ctl = build(line(3), &[(1, 1), (0, 2)], config);
        let s = ctl.tick(&mut NoopObserver).unwrap();
        assert_eq!((s.pushes, s.moves, s.blocked), (0, 0, 1));
        assert_eq!(ctl.agents.get(AgentId(0)).unwrap().current(), NodeId(1));
        assert_invariants(&ctl);
    }

    #[test]
    fn agent_not_at_goal_is_never_pushed() {
        // Head-on: a0 on 1 wants 0, a1 on 0 wants 2.  Vision 0.5 lets each
        // plan through the other.
        let config = BmaaConfig { vision: 0.5, ..Default::default() };
        let mut ctl = build(line(3), &[(1, 0), (0, 2)], config);
        let s = ctl.tick(&mut NoopObserver).unwrap();
        assert_eq!((s.pushes, s.moves, s.blocked), (0, 0, 2));
        assert_invariants(&ctl);
    }
}

// ── Waypoints ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod waypoint_tests {
    use bmaa_core::AgentId;

    use super::*;
    use crate::NoopObserver;

    #[test]
    fn final_waypoint_needs_exact_arrival() {
        let mut ctl = ControllerBuilder::new(line(9), vec![NodeId(0)], vec![NodeId(8)])
            .strategy(Strategy::Waypoint)
            .config(BmaaConfig { closeness: 1.0, ..Default::default() })
            .build()
            .unwrap();
        for _ in 0..8 {
            let a = ctl.agents.get(AgentId(0)).unwrap();
            assert!(!a.at_goal_before(Duration::MAX));
            ctl.tick(&mut NoopObserver).unwrap();
            assert_invariants(&ctl);
        }
        let a = ctl.agents.get(AgentId(0)).unwrap();
        assert_eq!(a.current(), NodeId(8));
        assert!(a.at_goal_before(Duration::MAX));
        assert_eq!(a.completion_steps(Duration::MAX), Some(8));
        assert!(a.subgoals().is_final());
        assert_eq!(a.subgoals().closeness(), 0.0);
    }
}
