//! Grid graph representation and builder.
//!
//! # Data layout
//!
//! Passable cells become nodes; adjacency is stored in **Compressed Sparse
//! Row (CSR)** form.  The neighbours of `NodeId n` occupy
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! with the matching weights in `edge_weight`.  The graph is undirected: the
//! builder always stores both directions with the same weight, so an edge is
//! visible from either endpoint.  Neighbour order is the order edges were
//! added, which makes every scan (search relaxation, push) deterministic.
//!
//! # Side indexes
//!
//! - a coordinate map (`GridPoint -> NodeId`) for map and scenario lookups;
//! - connected-component labels, computed once at build time, so problem
//!   generation can test reachability in O(1);
//! - an R-tree (via `rstar`) for snapping an arbitrary point to the nearest
//!   passable cell.

use std::collections::VecDeque;
use std::f64::consts::SQRT_2;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use bmaa_core::{GridPoint, NodeId};

use crate::{GridError, GridResult};

/// Default terrain label for cells created without a map.
pub const OPEN_TERRAIN: u8 = b'.';

/// Offsets to the already-visited half of the 8-neighbourhood when cells are
/// added in row-major order: west, north, north-west, north-east.
const BACKWARD_NEIGHBOURS: [(i32, i32); 4] = [(-1, 0), (0, -1), (-1, -1), (1, -1)];

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [i64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[i64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[i64; 2]) -> i64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Edge ──────────────────────────────────────────────────────────────────────

/// A directed view of an undirected grid edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    /// 1 for cardinal steps, √2 for diagonal ones on map-built graphs.
    pub weight: f64,
}

// ── GridGraph ─────────────────────────────────────────────────────────────────

/// Undirected weighted graph over integer grid coordinates.
///
/// Immutable once built; agents and the controller only ever borrow it.
/// Construct with [`GridGraphBuilder`], [`GridGraph::open_grid`], or
/// [`GridGraph::from_passable`].
#[derive(Clone)]
pub struct GridGraph {
    /// Cell coordinate of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GridPoint>,

    /// Terrain character of each node (`b'.'`, `b'S'`, …).
    pub node_terrain: Vec<u8>,

    /// CSR row pointer, length `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Destination node of each directed half-edge.
    pub edge_to: Vec<NodeId>,

    /// Weight of each directed half-edge.
    pub edge_weight: Vec<f64>,

    coords: FxHashMap<GridPoint, NodeId>,
    component: Vec<u32>,
    component_count: usize,
    spatial_idx: RTree<NodeEntry>,
}

impl GridGraph {
    /// A `width × height` grid with every cell passable and full
    /// 8-connectivity.  Node ids are assigned in row-major order, so
    /// `(x, y)` is node `y * width + x`.
    pub fn open_grid(width: u32, height: u32) -> Self {
        Self::from_passable(width, height, |_, _| true)
    }

    /// Build an 8-connected grid from a passability predicate.  Cardinal
    /// edges weigh 1, diagonal edges √2; a diagonal is added whenever both
    /// endpoints are passable.
    pub fn from_passable(width: u32, height: u32, passable: impl Fn(i32, i32) -> bool) -> Self {
        let cells = width as usize * height as usize;
        let mut b = GridGraphBuilder::with_capacity(cells, cells.saturating_mul(8));
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                if passable(x, y) {
                    b.add_node(GridPoint::new(x, y), OPEN_TERRAIN);
                }
            }
        }
        b.connect_octile();
        b.build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_to.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// All node ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_count()).map(NodeId::from_index)
    }

    // ── Node attributes ───────────────────────────────────────────────────

    #[inline]
    pub fn pos(&self, node: NodeId) -> GridPoint {
        self.node_pos[node.index()]
    }

    #[inline]
    pub fn terrain(&self, node: NodeId) -> char {
        self.node_terrain[node.index()] as char
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// The node at `point`, or `None` for a wall or out-of-bounds cell.
    pub fn node_at(&self, point: GridPoint) -> Option<NodeId> {
        self.coords.get(&point).copied()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Neighbours of `node` in adjacency order.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edge_range(node).map(|i| self.edge_to[i])
    }

    /// Outgoing half-edges of `node` in adjacency order.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = Edge> + '_ {
        self.edge_range(node).map(move |i| Edge {
            from:   node,
            to:     self.edge_to[i],
            weight: self.edge_weight[i],
        })
    }

    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.edge_range(node).len()
    }

    /// The edge between `a` and `b`, if the cells are adjacent.
    pub fn edge(&self, a: NodeId, b: NodeId) -> GridResult<Edge> {
        if !self.contains(a) {
            return Err(GridError::NodeNotFound(a));
        }
        self.out_edges(a)
            .find(|e| e.to == b)
            .ok_or(GridError::NoSuchEdge { from: a, to: b })
    }

    #[inline]
    fn edge_range(&self, node: NodeId) -> std::ops::Range<usize> {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        start..end
    }

    // ── Metrics ───────────────────────────────────────────────────────────

    #[inline]
    pub fn octile_distance(&self, a: NodeId, b: NodeId) -> f64 {
        self.pos(a).octile_distance(self.pos(b))
    }

    #[inline]
    pub fn euclidean_distance(&self, a: NodeId, b: NodeId) -> f64 {
        self.pos(a).euclidean_distance(self.pos(b))
    }

    // ── Reachability ──────────────────────────────────────────────────────

    /// Connected-component label of `node`.
    #[inline]
    pub fn component(&self, node: NodeId) -> u32 {
        self.component[node.index()]
    }

    pub fn component_count(&self) -> usize {
        self.component_count
    }

    /// `true` if a path between `a` and `b` exists.
    #[inline]
    pub fn same_component(&self, a: NodeId, b: NodeId) -> bool {
        self.component(a) == self.component(b)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The passable node nearest to `point` (euclidean).  Exact hits return
    /// the cell itself.  `None` only for an empty graph.
    pub fn nearest_node(&self, point: GridPoint) -> Option<NodeId> {
        if let Some(id) = self.node_at(point) {
            return Some(id);
        }
        self.spatial_idx
            .nearest_neighbor(&[point.x as i64, point.y as i64])
            .map(|e| e.id)
    }
}

impl std::fmt::Debug for GridGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridGraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .field("components", &self.component_count)
            .finish()
    }
}

// ── GridGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`GridGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use bmaa_core::GridPoint;
/// use bmaa_grid::GridGraphBuilder;
///
/// let mut b = GridGraphBuilder::new();
/// let a = b.add_node(GridPoint::new(0, 0), b'.');
/// let c = b.add_node(GridPoint::new(1, 1), b'.');
/// b.add_edge(a, c, std::f64::consts::SQRT_2);
/// let g = b.build();
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge_count(), 1);
/// ```
pub struct GridGraphBuilder {
    nodes:     Vec<GridPoint>,
    terrain:   Vec<u8>,
    coords:    FxHashMap<GridPoint, NodeId>,
    raw_edges: Vec<Edge>,
}

impl GridGraphBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            terrain:   Vec::with_capacity(nodes),
            coords:    FxHashMap::default(),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a cell and return its `NodeId` (sequential from 0).  Adding the
    /// same coordinate twice returns the existing id.
    pub fn add_node(&mut self, pos: GridPoint, terrain: u8) -> NodeId {
        if let Some(&id) = self.coords.get(&pos) {
            return id;
        }
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(pos);
        self.terrain.push(terrain);
        self.coords.insert(pos, id);
        id
    }

    /// Add an undirected edge: both directions with the same weight.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64) {
        debug_assert_ne!(a, b, "self-loops are not supported");
        self.raw_edges.push(Edge { from: a, to: b, weight });
        self.raw_edges.push(Edge { from: b, to: a, weight });
    }

    /// Connect every added cell to its 8-neighbourhood: weight 1 for
    /// cardinal neighbours, √2 for diagonal ones.
    pub fn connect_octile(&mut self) {
        for i in 0..self.nodes.len() {
            let p = self.nodes[i];
            for (dx, dy) in BACKWARD_NEIGHBOURS {
                let q = GridPoint::new(p.x + dx, p.y + dy);
                if let Some(&other) = self.coords.get(&q) {
                    let weight = if dx != 0 && dy != 0 { SQRT_2 } else { 1.0 };
                    self.add_edge(NodeId::from_index(i), other, weight);
                }
            }
        }
    }

    pub fn node_id(&self, pos: GridPoint) -> Option<NodeId> {
        self.coords.get(&pos).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() / 2 }

    /// Consume the builder and produce a [`GridGraph`].
    pub fn build(self) -> GridGraph {
        let node_count = self.nodes.len();

        // Stable sort keeps per-node insertion order as adjacency order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_to:     Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_weight: Vec<f64>    = raw.iter().map(|e| e.weight).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let (component, component_count) = label_components(&node_out_start, &edge_to);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry {
                point: [p.x as i64, p.y as i64],
                id: NodeId::from_index(i),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        GridGraph {
            node_pos: self.nodes,
            node_terrain: self.terrain,
            node_out_start,
            edge_to,
            edge_weight,
            coords: self.coords,
            component,
            component_count,
            spatial_idx,
        }
    }
}

impl Default for GridGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Breadth-first component labelling over the CSR arrays.
fn label_components(node_out_start: &[u32], edge_to: &[NodeId]) -> (Vec<u32>, usize) {
    let n = node_out_start.len() - 1;
    let mut label = vec![u32::MAX; n];
    let mut next = 0u32;
    let mut queue = VecDeque::new();

    for root in 0..n {
        if label[root] != u32::MAX {
            continue;
        }
        label[root] = next;
        queue.push_back(root);
        while let Some(v) = queue.pop_front() {
            let (s, e) = (node_out_start[v] as usize, node_out_start[v + 1] as usize);
            for &w in &edge_to[s..e] {
                if label[w.index()] == u32::MAX {
                    label[w.index()] = next;
                    queue.push_back(w.index());
                }
            }
        }
        next += 1;
    }
    (label, next as usize)
}
