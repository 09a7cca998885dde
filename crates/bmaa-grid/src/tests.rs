//! Unit tests for bmaa-grid.
//!
//! All tests use small hand-written grids so they run without map files.

#[cfg(test)]
mod helpers {
    use crate::{GridGraph, GridMap};

    /// 5×4 map with a wall column at x = 2 except for a gap in the bottom
    /// row, plus one shallow-water cell.
    ///
    /// ```text
    /// ..@..
    /// ..@S.
    /// ..@..
    /// .....
    /// ```
    pub const WALLED: &str = "type octile\nheight 4\nwidth 5\nmap\n..@..\n..@S.\n..@..\n.....\n";

    pub fn walled_graph() -> GridGraph {
        GridMap::parse(WALLED).unwrap().to_graph()
    }

    /// Two 2×2 rooms separated by a full wall column.
    pub fn split_graph() -> GridGraph {
        GridGraph::from_passable(5, 2, |x, _| x != 2)
    }
}

// ── Graph structure ───────────────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use std::f64::consts::SQRT_2;

    use bmaa_core::{GridPoint, NodeId};

    use crate::{GridError, GridGraph, GridGraphBuilder};

    #[test]
    fn empty_build() {
        let g = GridGraphBuilder::new().build();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
        assert!(g.nearest_node(GridPoint::new(0, 0)).is_none());
    }

    #[test]
    fn open_grid_counts() {
        let g = GridGraph::open_grid(3, 3);
        assert_eq!(g.node_count(), 9);
        // 6 horizontal + 6 vertical + 8 diagonal
        assert_eq!(g.edge_count(), 20);
        assert_eq!(g.degree(NodeId(4)), 8); // centre
        assert_eq!(g.degree(NodeId(0)), 3); // corner
        assert_eq!(g.component_count(), 1);
    }

    #[test]
    fn row_major_ids() {
        let g = GridGraph::open_grid(4, 3);
        assert_eq!(g.node_at(GridPoint::new(1, 2)), Some(NodeId(9)));
        assert_eq!(g.pos(NodeId(6)), GridPoint::new(2, 1));
        assert_eq!(g.node_at(GridPoint::new(4, 0)), None);
    }

    #[test]
    fn edge_weights() {
        let g = GridGraph::open_grid(3, 3);
        assert_eq!(g.edge(NodeId(0), NodeId(1)).unwrap().weight, 1.0);
        assert_eq!(g.edge(NodeId(0), NodeId(3)).unwrap().weight, 1.0);
        assert_eq!(g.edge(NodeId(0), NodeId(4)).unwrap().weight, SQRT_2);
        assert_eq!(g.edge(NodeId(2), NodeId(4)).unwrap().weight, SQRT_2);
    }

    #[test]
    fn edges_are_symmetric() {
        let g = super::helpers::walled_graph();
        for a in g.nodes() {
            for e in g.out_edges(a) {
                let back = g.edge(e.to, a).unwrap();
                assert_eq!(back.weight, e.weight);
            }
        }
    }

    #[test]
    fn missing_edge_is_an_error() {
        let g = GridGraph::open_grid(3, 3);
        let r = g.edge(NodeId(0), NodeId(8));
        assert!(matches!(r, Err(GridError::NoSuchEdge { .. })));
    }

    #[test]
    fn line_adjacency_order() {
        let g = GridGraph::open_grid(3, 1);
        let mid: Vec<_> = g.neighbors(NodeId(1)).collect();
        assert_eq!(mid, vec![NodeId(0), NodeId(2)]);
    }

    #[test]
    fn metrics_match_geometry() {
        let g = GridGraph::open_grid(4, 4);
        let a = g.node_at(GridPoint::new(0, 0)).unwrap();
        let b = g.node_at(GridPoint::new(3, 3)).unwrap();
        let c = g.node_at(GridPoint::new(3, 0)).unwrap();
        assert!((g.octile_distance(a, b) - 3.0 * SQRT_2).abs() < 1e-9);
        assert!((g.octile_distance(a, b) - g.euclidean_distance(a, b)).abs() < 1e-9);
        assert!((g.octile_distance(a, c) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn components_split_by_wall() {
        let g = super::helpers::split_graph();
        assert_eq!(g.component_count(), 2);
        let left = g.node_at(GridPoint::new(0, 0)).unwrap();
        let right = g.node_at(GridPoint::new(4, 1)).unwrap();
        let left2 = g.node_at(GridPoint::new(1, 1)).unwrap();
        assert!(!g.same_component(left, right));
        assert!(g.same_component(left, left2));
    }

    #[test]
    fn nearest_node_snaps_off_walls() {
        let g = super::helpers::split_graph();
        let exact = g.nearest_node(GridPoint::new(3, 1)).unwrap();
        assert_eq!(g.pos(exact), GridPoint::new(3, 1));
        // (2, 0) is a wall; both (1, 0) and (3, 0) are one step away.
        let snapped = g.pos(g.nearest_node(GridPoint::new(2, 0)).unwrap());
        assert!(snapped == GridPoint::new(1, 0) || snapped == GridPoint::new(3, 0));
        let far = g.pos(g.nearest_node(GridPoint::new(-10, 0)).unwrap());
        assert_eq!(far, GridPoint::new(0, 0));
    }

    #[test]
    fn duplicate_node_returns_existing_id() {
        let mut b = GridGraphBuilder::new();
        let a = b.add_node(GridPoint::new(2, 2), b'.');
        let again = b.add_node(GridPoint::new(2, 2), b'S');
        assert_eq!(a, again);
        assert_eq!(b.node_count(), 1);
    }
}

// ── Open list ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod open_list {
    use bmaa_core::NodeId;

    use crate::IndexedOpenList;

    #[test]
    fn pops_in_priority_order() {
        let mut open = IndexedOpenList::new();
        for (n, p) in [(1, 5.0), (2, 1.0), (3, 3.0), (4, 4.0), (5, 2.0)] {
            open.put(NodeId(n), p);
        }
        let order: Vec<_> = std::iter::from_fn(|| open.get()).collect();
        assert_eq!(order, vec![NodeId(2), NodeId(5), NodeId(3), NodeId(4), NodeId(1)]);
        assert!(open.is_empty());
    }

    #[test]
    fn contains_tracks_membership() {
        let mut open = IndexedOpenList::new();
        open.put(NodeId(7), 1.0);
        assert!(open.contains(NodeId(7)));
        assert!(!open.contains(NodeId(8)));
        assert_eq!(open.get(), Some(NodeId(7)));
        assert!(!open.contains(NodeId(7)));
        assert_eq!(open.get(), None);
    }

    #[test]
    fn update_decreases_priority() {
        let mut open = IndexedOpenList::new();
        open.put(NodeId(1), 1.0);
        open.put(NodeId(2), 2.0);
        open.put(NodeId(3), 3.0);
        open.update(NodeId(3), 0.5);
        assert_eq!(open.priority(NodeId(3)), Some(0.5));
        assert_eq!(open.len(), 3);
        assert_eq!(open.get(), Some(NodeId(3)));
    }

    #[test]
    fn update_increases_priority() {
        let mut open = IndexedOpenList::new();
        open.put(NodeId(1), 1.0);
        open.put(NodeId(2), 2.0);
        open.update(NodeId(1), 9.0);
        assert_eq!(open.get(), Some(NodeId(2)));
        assert_eq!(open.get(), Some(NodeId(1)));
    }

    #[test]
    fn update_of_absent_node_is_ignored() {
        let mut open = IndexedOpenList::with_capacity(4);
        open.put(NodeId(1), 3.0);
        open.update(NodeId(2), 0.1);
        assert!(!open.contains(NodeId(2)));
        assert_eq!(open.len(), 1);
        assert_eq!(open.priority(NodeId(2)), None);
        open.clear();
        assert!(open.is_empty());
    }

    #[test]
    fn put_existing_rekeys() {
        let mut open = IndexedOpenList::new();
        open.put(NodeId(1), 4.0);
        open.put(NodeId(1), 2.0);
        assert_eq!(open.len(), 1);
        assert_eq!(open.peek(), Some((NodeId(1), 2.0)));
    }

    #[test]
    fn remove_from_middle_keeps_heap_valid() {
        let mut open = IndexedOpenList::new();
        for n in 0..20u32 {
            open.put(NodeId(n), ((n * 7) % 20) as f64);
        }
        assert_eq!(open.remove(NodeId(3)), Some(1.0));
        assert_eq!(open.remove(NodeId(3)), None);
        let mut last = f64::NEG_INFINITY;
        while let Some((_, p)) = open.peek() {
            assert!(p >= last);
            last = p;
            open.get();
        }
    }
}

// ── Unbounded A* ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod astar {
    use std::f64::consts::SQRT_2;

    use bmaa_core::{GridPoint, NodeId};

    use crate::{AStar, GridError, GridGraph, Planner};

    #[test]
    fn trivial_same_node() {
        let g = GridGraph::open_grid(3, 3);
        let p = AStar.plan(&g, NodeId(4), NodeId(4)).unwrap();
        assert!(p.is_trivial());
        assert_eq!(p.nodes, vec![NodeId(4)]);
        assert_eq!(p.cost, 0.0);
    }

    #[test]
    fn diagonal_on_open_grid() {
        let g = GridGraph::open_grid(5, 5);
        let p = AStar.plan(&g, NodeId(0), NodeId(24)).unwrap();
        assert_eq!(p.len(), 5);
        assert!((p.cost - 4.0 * SQRT_2).abs() < 1e-9);
        assert_eq!(p.first(), Some(NodeId(0)));
        assert_eq!(p.last(), Some(NodeId(24)));
    }

    #[test]
    fn path_is_connected_and_cost_matches() {
        let g = super::helpers::walled_graph();
        let from = g.node_at(GridPoint::new(0, 0)).unwrap();
        let to = g.node_at(GridPoint::new(4, 0)).unwrap();
        let p = AStar.plan(&g, from, to).unwrap();
        let mut cost = 0.0;
        for w in p.nodes.windows(2) {
            cost += g.edge(w[0], w[1]).unwrap().weight;
        }
        assert!((cost - p.cost).abs() < 1e-9);
        // Must route through the gap in the bottom row.
        assert!(p.nodes.iter().any(|&n| g.pos(n) == GridPoint::new(2, 3)));
    }

    #[test]
    fn unreachable_goal() {
        let g = super::helpers::split_graph();
        let from = g.node_at(GridPoint::new(0, 0)).unwrap();
        let to = g.node_at(GridPoint::new(4, 0)).unwrap();
        let r = AStar.plan(&g, from, to);
        assert!(matches!(r, Err(GridError::Unreachable { .. })));
    }

    #[test]
    fn unknown_node() {
        let g = GridGraph::open_grid(2, 2);
        let r = AStar.plan(&g, NodeId(0), NodeId(99));
        assert!(matches!(r, Err(GridError::NodeNotFound(_))));
    }
}

// ── Occupancy ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod occupancy {
    use bmaa_core::{AgentId, NodeId};

    use crate::{GridError, Occupancy};

    #[test]
    fn enter_and_leave() {
        let mut occ = Occupancy::new(4);
        occ.enter(NodeId(1), AgentId(0), false).unwrap();
        assert_eq!(occ.occupant(NodeId(1)), Some(AgentId(0)));
        assert!(occ.is_occupied(NodeId(1)));
        assert_eq!(occ.occupied_count(), 1);

        assert!(!occ.leave(NodeId(1), AgentId(5)), "only the occupant can leave");
        assert!(occ.leave(NodeId(1), AgentId(0)));
        assert!(!occ.is_occupied(NodeId(1)));
        assert_eq!(occ.occupied_count(), 0);
    }

    #[test]
    fn double_occupancy_rejected() {
        let mut occ = Occupancy::new(2);
        occ.enter(NodeId(0), AgentId(0), false).unwrap();
        let r = occ.enter(NodeId(0), AgentId(1), false);
        assert!(matches!(
            r,
            Err(GridError::Occupied { occupant: AgentId(0), entrant: AgentId(1), .. })
        ));
        assert_eq!(occ.occupant(NodeId(0)), Some(AgentId(0)));
    }

    #[test]
    fn goal_flag() {
        let mut occ = Occupancy::new(2);
        occ.enter(NodeId(0), AgentId(0), true).unwrap();
        occ.enter(NodeId(1), AgentId(1), false).unwrap();
        assert!(occ.occupant_at_goal(NodeId(0)));
        assert!(!occ.occupant_at_goal(NodeId(1)));
        let held: Vec<_> = occ.iter().map(|(n, o)| (n, o.agent)).collect();
        assert_eq!(held, vec![(NodeId(0), AgentId(0)), (NodeId(1), AgentId(1))]);
    }

    #[test]
    fn out_of_range_node() {
        let mut occ = Occupancy::new(1);
        assert!(occ.enter(NodeId(3), AgentId(0), false).is_err());
        assert!(!occ.is_occupied(NodeId(3)));
    }
}

// ── Map loading ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod map {
    use std::io::Write;

    use bmaa_core::GridPoint;

    use crate::{GridError, GridMap};

    #[test]
    fn parse_header_and_rows() {
        let m = GridMap::parse(super::helpers::WALLED).unwrap();
        assert_eq!((m.width, m.height), (5, 4));
        assert_eq!(m.cell(2, 0), Some(b'@'));
        assert_eq!(m.cell(3, 1), Some(b'S'));
        assert_eq!(m.cell(5, 0), None);
        assert_eq!(m.passable_count(), 17);
    }

    #[test]
    fn shallow_water_is_passable() {
        let g = super::helpers::walled_graph();
        let s = g.node_at(GridPoint::new(3, 1)).unwrap();
        assert_eq!(g.terrain(s), 'S');
        assert!(g.node_at(GridPoint::new(2, 1)).is_none());
        assert_eq!(g.node_count(), 17);
        assert_eq!(g.component_count(), 1);
    }

    #[test]
    fn diagonals_cut_wall_corners() {
        // (1,2) and (2,3) are diagonal across the wall corner at (2,2).
        let g = super::helpers::walled_graph();
        let a = g.node_at(GridPoint::new(1, 2)).unwrap();
        let b = g.node_at(GridPoint::new(2, 3)).unwrap();
        assert!(g.edge(a, b).is_ok());
    }

    #[test]
    fn wrong_row_width() {
        let r = GridMap::parse("type octile\nheight 1\nwidth 3\nmap\n..\n");
        assert!(matches!(r, Err(GridError::Parse { line: 5, .. })));
    }

    #[test]
    fn missing_rows() {
        let r = GridMap::parse("type octile\nheight 2\nwidth 1\nmap\n.\n");
        assert!(matches!(r, Err(GridError::Parse { .. })));
    }

    #[test]
    fn oversized_header_is_rejected() {
        let r = GridMap::parse("type octile\nheight 70000\nwidth 70000\nmap\n");
        assert!(matches!(r, Err(GridError::Parse { line: 0, ref msg }) if msg == "map too large"));
    }

    #[test]
    fn header_wider_than_coordinates_is_rejected() {
        let r = GridMap::parse("type octile\nheight 0\nwidth 3000000000\nmap\n");
        assert!(matches!(r, Err(GridError::Parse { line: 0, .. })));
    }

    #[test]
    fn missing_map_line() {
        let r = GridMap::parse("type octile\nheight 1\nwidth 1\n");
        assert!(r.is_err());
    }

    #[test]
    fn load_from_file() {
        let mut f = tempfile::Builder::new().suffix(".map").tempfile().unwrap();
        f.write_all(super::helpers::WALLED.as_bytes()).unwrap();
        let m = GridMap::load(f.path()).unwrap();
        assert!(m.name.ends_with(".map"));
        assert_eq!(m.to_graph().node_count(), 17);
    }
}

// ── Scenario loading ──────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario {
    use std::io::Cursor;

    use bmaa_core::GridPoint;

    use crate::{GridError, Scenario};

    const SCEN: &str = "version 1\n\
        0\twalled.map\t5\t4\t0\t0\t4\t0\t6.8\n\
        1\twalled.map\t5\t4\t1\t3\t3\t1\t2.82\n\
        1\twalled.map\t5\t4\t2\t0\t4\t3\n";

    #[test]
    fn parses_columns_four_to_seven() {
        let s = Scenario::from_reader(Cursor::new(SCEN)).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.map_name.as_deref(), Some("walled.map"));
        assert_eq!(s.entries[1].start, GridPoint::new(1, 3));
        assert_eq!(s.entries[1].goal, GridPoint::new(3, 1));
        assert_eq!(s.entries[1].bucket, 1);
        assert_eq!(s.entries[0].optimal_length, Some(6.8));
        assert_eq!(s.entries[2].optimal_length, None);
    }

    #[test]
    fn agent_limit_truncates() {
        let s = Scenario::from_reader(Cursor::new(SCEN)).unwrap().with_agent_limit(2);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn bad_number() {
        let text = "version 1\n0\tm.map\t5\t4\tx\t0\t4\t0\t1\n";
        let r = Scenario::from_reader(Cursor::new(text));
        assert!(matches!(r, Err(GridError::Parse { line: 2, .. })));
    }

    #[test]
    fn too_few_columns() {
        let text = "version 1\n0\tm.map\t5\t4\n";
        assert!(Scenario::from_reader(Cursor::new(text)).is_err());
    }
}

// ── Problem sets ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod problem {
    use std::collections::HashSet;
    use std::io::Cursor;

    use bmaa_core::{GridPoint, NodeId, SimRng};

    use crate::{GridError, GridGraph, ProblemSet, Region, Scenario};

    #[test]
    fn random_is_distinct_and_reachable() {
        let g = super::helpers::walled_graph();
        let mut rng = SimRng::new(7);
        let p = ProblemSet::random(&g, 8, &mut rng).unwrap();
        assert_eq!(p.len(), 8);
        assert_eq!(p.starts.iter().collect::<HashSet<_>>().len(), 8);
        assert_eq!(p.goals.iter().collect::<HashSet<_>>().len(), 8);
        p.validate(&g).unwrap();
    }

    #[test]
    fn random_is_reproducible() {
        let g = GridGraph::open_grid(8, 8);
        let a = ProblemSet::random(&g, 10, &mut SimRng::new(3)).unwrap();
        let b = ProblemSet::random(&g, 10, &mut SimRng::new(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn random_respects_components() {
        let g = super::helpers::split_graph();
        let p = ProblemSet::random(&g, 4, &mut SimRng::new(11)).unwrap();
        for (s, t) in p.pairs() {
            assert!(g.same_component(s, t));
        }
    }

    #[test]
    fn too_many_agents() {
        let g = GridGraph::open_grid(3, 3);
        let r = ProblemSet::random(&g, 5, &mut SimRng::new(0));
        assert!(matches!(r, Err(GridError::InsufficientSpace { requested: 5, .. })));
    }

    #[test]
    fn regions_are_inclusive() {
        let g = GridGraph::open_grid(10, 10);
        let start = Region::new(0, 0, 1, 1);
        let goal = Region::new(8, 8, 9, 9);
        let p = ProblemSet::from_regions(&g, 4, start, goal, &mut SimRng::new(5)).unwrap();
        for (s, t) in p.pairs() {
            assert!(start.contains(g.pos(s)));
            assert!(goal.contains(g.pos(t)));
        }
        // All four cells of each 2×2 region are used.
        assert_eq!(p.starts.iter().collect::<HashSet<_>>().len(), 4);
    }

    #[test]
    fn region_too_small() {
        let g = GridGraph::open_grid(10, 10);
        let r = ProblemSet::from_regions(
            &g,
            5,
            Region::new(0, 0, 1, 1),
            Region::new(5, 5, 9, 9),
            &mut SimRng::new(0),
        );
        assert!(matches!(r, Err(GridError::InsufficientSpace { available: 4, .. })));
    }

    #[test]
    fn validate_flags_unreachable_pair() {
        let g = super::helpers::split_graph();
        let a = g.node_at(GridPoint::new(0, 0)).unwrap();
        let b = g.node_at(GridPoint::new(4, 0)).unwrap();
        let p = ProblemSet::new(vec![a], vec![b]);
        assert!(matches!(p.validate(&g), Err(GridError::Unreachable { .. })));
        let q = ProblemSet::new(vec![a], vec![NodeId(999)]);
        assert!(matches!(q.validate(&g), Err(GridError::NodeNotFound(_))));
    }

    #[test]
    fn from_scenario_snaps_walls() {
        let g = super::helpers::walled_graph();
        let text = "version 1\n0\tw.map\t5\t4\t0\t0\t2\t1\t1\n0\tw.map\t5\t4\t4\t3\t0\t3\t4\n";
        let scen = Scenario::from_reader(Cursor::new(text)).unwrap();
        let p = ProblemSet::from_scenario(&g, &scen, None).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(g.pos(p.starts[0]), GridPoint::new(0, 0));
        // (2,1) is a wall; it snaps to an adjacent passable cell.
        assert!(g.pos(p.goals[0]).euclidean_distance(GridPoint::new(2, 1)) <= 1.0);

        let one = ProblemSet::from_scenario(&g, &scen, Some(1)).unwrap();
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn distance_summaries() {
        let g = GridGraph::open_grid(5, 5);
        let p = ProblemSet::new(vec![NodeId(0), NodeId(1)], vec![NodeId(4), NodeId(3)]);
        assert_eq!(p.longest_distance(&g), 4.0);
        assert_eq!(p.average_distance(&g), 3.0);
        assert_eq!(ProblemSet::default().average_distance(&g), 0.0);
    }
}
