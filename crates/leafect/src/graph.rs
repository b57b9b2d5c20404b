//! Embedded graphs (adjacency lists) with induced subgraphs, components and BFS.
//!
//! Purpose
//! - Nodes carry an optional 2D position; edges are undirected, without self-loops or
//!   parallel copies. Adjacency lists keep edge insertion order, which fixes the arc
//!   enumeration order used by contour ordering.
//! - `DirectedView` doubles every edge into two arcs and answers shortest-path queries with
//!   a single arc removed (the "cut").

use std::collections::VecDeque;

use nalgebra::Vector2;

use crate::contour::ContourTopology;
use crate::error::{EctError, GraphError};

pub type NodeId = usize;

/// Undirected graph whose nodes may carry positions.
#[derive(Clone, Debug, Default)]
pub struct EmbeddedGraph {
    positions: Vec<Option<Vector2<f64>>>,
    adj: Vec<Vec<NodeId>>,
    edges: Vec<(NodeId, NodeId)>,
}

impl EmbeddedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// One positioned node per point, no edges.
    pub fn from_points(points: &[Vector2<f64>]) -> Self {
        let mut g = Self::new();
        for &p in points {
            g.add_node(Some(p));
        }
        g
    }

    /// Path graph `i -- i+1` over `points`; closed topology also links the last point to the first.
    pub fn path(points: &[Vector2<f64>], topology: ContourTopology) -> Self {
        let mut g = Self::from_points(points);
        let n = points.len();
        for i in 1..n {
            g.push_edge_unchecked(i - 1, i);
        }
        if topology == ContourTopology::Closed && n >= 3 {
            g.push_edge_unchecked(n - 1, 0);
        }
        g
    }

    pub fn add_node(&mut self, pos: Option<Vector2<f64>>) -> NodeId {
        self.positions.push(pos);
        self.adj.push(Vec::new());
        self.positions.len() - 1
    }

    /// Insert the undirected edge `{a, b}`.
    ///
    /// Returns `Ok(false)` for self-loops and edges already present.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool, GraphError> {
        self.check_node(a)?;
        self.check_node(b)?;
        if a == b || self.adj[a].contains(&b) {
            return Ok(false);
        }
        self.push_edge_unchecked(a, b);
        Ok(true)
    }

    fn push_edge_unchecked(&mut self, a: NodeId, b: NodeId) {
        self.adj[a].push(b);
        self.adj[b].push(a);
        self.edges.push((a, b));
    }

    fn check_node(&self, node: NodeId) -> Result<(), GraphError> {
        if node < self.positions.len() {
            Ok(())
        } else {
            Err(GraphError::NodeNotFound {
                node,
                len: self.positions.len(),
            })
        }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.adj[node]
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.adj[node].len()
    }

    pub fn position(&self, node: NodeId) -> Option<Vector2<f64>> {
        self.positions.get(node).copied().flatten()
    }

    pub fn set_position(&mut self, node: NodeId, pos: Vector2<f64>) -> Result<(), GraphError> {
        self.check_node(node)?;
        self.positions[node] = Some(pos);
        Ok(())
    }

    /// All node positions, failing on the first node without one.
    pub fn positions(&self) -> Result<Vec<Vector2<f64>>, EctError> {
        self.positions
            .iter()
            .enumerate()
            .map(|(node, p)| (*p).ok_or(EctError::MissingPosition { node }))
            .collect()
    }

    /// |V| − |E|.
    #[inline]
    pub fn euler_characteristic(&self) -> i64 {
        self.node_count() as i64 - self.edge_count() as i64
    }

    /// Vertex-induced subgraph on the nodes with `keep[node] == true`.
    ///
    /// Returns the subgraph (nodes renumbered in ascending original order) and the original
    /// id of every new node.
    pub fn induced_subgraph(&self, keep: &[bool]) -> (EmbeddedGraph, Vec<NodeId>) {
        debug_assert_eq!(keep.len(), self.node_count());
        let mut new_id = vec![usize::MAX; self.node_count()];
        let mut origin = Vec::new();
        let mut sub = EmbeddedGraph::new();
        for (node, &k) in keep.iter().enumerate() {
            if k {
                new_id[node] = sub.add_node(self.positions[node]);
                origin.push(node);
            }
        }
        for &(a, b) in &self.edges {
            if keep[a] && keep[b] {
                sub.push_edge_unchecked(new_id[a], new_id[b]);
            }
        }
        (sub, origin)
    }

    /// Connected components, each sorted ascending, ordered by smallest member.
    pub fn connected_components(&self) -> Vec<Vec<NodeId>> {
        let n = self.node_count();
        let mut seen = vec![false; n];
        let mut out = Vec::new();
        let mut queue = VecDeque::new();
        for start in 0..n {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            queue.push_back(start);
            let mut comp = Vec::new();
            while let Some(u) = queue.pop_front() {
                comp.push(u);
                for &v in &self.adj[u] {
                    if !seen[v] {
                        seen[v] = true;
                        queue.push_back(v);
                    }
                }
            }
            comp.sort_unstable();
            out.push(comp);
        }
        out
    }

    /// Directed view with both orientations of every edge.
    pub fn to_directed(&self) -> DirectedView<'_> {
        DirectedView::new(self)
    }
}

/// Both orientations of every edge, enumerated by source node, then adjacency order.
#[derive(Clone, Debug)]
pub struct DirectedView<'a> {
    graph: &'a EmbeddedGraph,
    arcs: Vec<(NodeId, NodeId)>,
    /// Arc ids leaving each node: `first_arc[u]..first_arc[u + 1]`.
    first_arc: Vec<usize>,
}

impl<'a> DirectedView<'a> {
    fn new(graph: &'a EmbeddedGraph) -> Self {
        let mut arcs = Vec::with_capacity(2 * graph.edge_count());
        let mut first_arc = Vec::with_capacity(graph.node_count() + 1);
        for (u, nbrs) in graph.adj.iter().enumerate() {
            first_arc.push(arcs.len());
            arcs.extend(nbrs.iter().map(|&v| (u, v)));
        }
        first_arc.push(arcs.len());
        Self {
            graph,
            arcs,
            first_arc,
        }
    }

    pub fn graph(&self) -> &'a EmbeddedGraph {
        self.graph
    }

    #[inline]
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn arc(&self, id: usize) -> Result<(NodeId, NodeId), GraphError> {
        self.arcs.get(id).copied().ok_or(GraphError::ArcOutOfRange {
            arc: id,
            len: self.arcs.len(),
        })
    }

    /// Breadth-first shortest path `source → target`, never using arc `skip`.
    ///
    /// `Ok(None)` means the target is unreachable; errors mean the query itself is invalid.
    pub fn shortest_path(
        &self,
        source: NodeId,
        target: NodeId,
        skip: Option<usize>,
    ) -> Result<Option<Vec<NodeId>>, GraphError> {
        self.graph.check_node(source)?;
        self.graph.check_node(target)?;
        if let Some(arc) = skip {
            self.arc(arc)?;
        }
        if source == target {
            return Ok(Some(vec![source]));
        }
        let n = self.graph.node_count();
        let mut parent: Vec<Option<NodeId>> = vec![None; n];
        let mut seen = vec![false; n];
        let mut queue = VecDeque::new();
        seen[source] = true;
        queue.push_back(source);
        while let Some(u) = queue.pop_front() {
            for id in self.first_arc[u]..self.first_arc[u + 1] {
                if Some(id) == skip {
                    continue;
                }
                let v = self.arcs[id].1;
                if seen[v] {
                    continue;
                }
                seen[v] = true;
                parent[v] = Some(u);
                if v == target {
                    return Ok(Some(unwind(&parent, source, target)));
                }
                queue.push_back(v);
            }
        }
        Ok(None)
    }

    /// Remove arc `cut` and walk from its tail back to its head.
    pub fn walk_around_cut(&self, cut: usize) -> Result<Option<Vec<NodeId>>, GraphError> {
        let (a, b) = self.arc(cut)?;
        self.shortest_path(a, b, Some(cut))
    }
}

fn unwind(parent: &[Option<NodeId>], source: NodeId, target: NodeId) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut cur = target;
    while cur != source {
        match parent[cur] {
            Some(p) => {
                path.push(p);
                cur = p;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vector2<f64>> {
        vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn add_edge_rejects_loops_and_duplicates() {
        let mut g = EmbeddedGraph::from_points(&square());
        assert_eq!(g.add_edge(0, 1), Ok(true));
        assert_eq!(g.add_edge(1, 0), Ok(false));
        assert_eq!(g.add_edge(2, 2), Ok(false));
        assert_eq!(g.edge_count(), 1);
        assert!(matches!(
            g.add_edge(0, 9),
            Err(GraphError::NodeNotFound { node: 9, len: 4 })
        ));
    }

    #[test]
    fn cycle_has_zero_characteristic() {
        let g = EmbeddedGraph::path(&square(), ContourTopology::Closed);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.euler_characteristic(), 0);
        let p = EmbeddedGraph::path(&square(), ContourTopology::Open);
        assert_eq!(p.euler_characteristic(), 1);
    }

    #[test]
    fn induced_subgraph_keeps_inner_edges_only() {
        let g = EmbeddedGraph::path(&square(), ContourTopology::Closed);
        let (sub, origin) = g.induced_subgraph(&[true, false, true, true]);
        assert_eq!(origin, vec![0, 2, 3]);
        // Edges 2-3 and 3-0 survive.
        assert_eq!(sub.edge_count(), 2);
        assert_eq!(sub.euler_characteristic(), 1);
        assert_eq!(sub.position(1), Some(Vector2::new(1.0, 1.0)));
    }

    #[test]
    fn components_sorted_by_smallest_member() {
        let mut g = EmbeddedGraph::new();
        for _ in 0..6 {
            g.add_node(None);
        }
        g.add_edge(5, 1).unwrap();
        g.add_edge(0, 4).unwrap();
        g.add_edge(4, 2).unwrap();
        let comps = g.connected_components();
        assert_eq!(comps, vec![vec![0, 2, 4], vec![1, 5], vec![3]]);
    }

    #[test]
    fn missing_position_reported() {
        let mut g = EmbeddedGraph::from_points(&square());
        g.add_node(None);
        assert_eq!(g.positions(), Err(EctError::MissingPosition { node: 4 }));
    }

    #[test]
    fn arcs_follow_node_then_adjacency_order() {
        let g = EmbeddedGraph::path(&square(), ContourTopology::Closed);
        let d = g.to_directed();
        assert_eq!(d.arc_count(), 8);
        // Node 0 saw edge 0-1 first, then the closing edge 3-0.
        assert_eq!(d.arc(0), Ok((0, 1)));
        assert_eq!(d.arc(1), Ok((0, 3)));
        assert_eq!(d.arc(2), Ok((1, 0)));
        assert!(d.arc(8).is_err());
    }

    #[test]
    fn walk_around_cut_goes_the_long_way() {
        let g = EmbeddedGraph::path(&square(), ContourTopology::Closed);
        let d = g.to_directed();
        let path = d.walk_around_cut(0).unwrap().unwrap();
        assert_eq!(path, vec![0, 3, 2, 1]);
    }

    #[test]
    fn cut_bridge_has_no_path() {
        let g = EmbeddedGraph::path(&square(), ContourTopology::Open);
        let d = g.to_directed();
        assert_eq!(d.walk_around_cut(0), Ok(None));
    }
}
