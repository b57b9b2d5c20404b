//! Contour recovery from unordered outline samples.
//!
//! Model
//! - Build the 2-NN graph and keep its largest connected component (the outline; smaller
//!   components are treated as noise).
//! - Double every edge into two arcs, enumerated in a fixed order. Cutting arc `l` and
//!   walking the shortest path from its tail back to its head linearizes a loop into the
//!   outline, or follows an open outline from one end of its gap to the other.
//! - Accept the first walk longer than `min_coverage` × the number of distinct points.
//!   Otherwise move the cut `retry_step` arcs further and try again, until the arcs run out.
//!
//! Cost
//! - Each attempt is one BFS, so the loop is O(arcs² / retry_step) in the worst case.
//!
//! Failure semantics
//! - "No path" after a cut is expected (the cut was a bridge) and just moves on.
//! - Running out of arcs yields `ContourError::CoverageTooLow` (skip the item).
//! - Any other path-search failure is `ContourError::UnexpectedGraph` (stop the batch).

use tracing::{debug, info};

use crate::contour::{Contour, ContourTopology};
use crate::error::ContourError;
use crate::graph::{DirectedView, EmbeddedGraph, NodeId};
use crate::neighbors::{nearest_neighbor_graph, NeighborCfg, NeighborGraph};

use nalgebra::Vector2;

/// Which part of the neighbor graph the walk may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentSelection {
    /// Connected component with the most nodes (ties: the one with the smallest node).
    Largest,
    /// The whole graph.
    All,
}

/// Contour-ordering configuration. The defaults are tuned for leaf outline scans.
#[derive(Clone, Copy, Debug)]
pub struct OrderCfg {
    pub neighbors: NeighborCfg,
    pub component: ComponentSelection,
    /// Arcs skipped between consecutive cut attempts.
    pub retry_step: usize,
    /// A walk is accepted once it covers more than this fraction of the distinct points.
    pub min_coverage: f64,
}

impl Default for OrderCfg {
    fn default() -> Self {
        Self {
            neighbors: NeighborCfg::default(),
            component: ComponentSelection::Largest,
            retry_step: 10,
            min_coverage: 0.5,
        }
    }
}

/// An accepted walk and how it was found.
#[derive(Clone, Debug)]
pub struct OrderedContour {
    pub contour: Contour,
    /// Cut attempts made, including the accepted one.
    pub attempts: usize,
    /// Position `l` of the accepted cut in the arc enumeration.
    pub cut_index: usize,
    /// Input indices of the cut arc's endpoints.
    pub cut: (usize, usize),
}

/// Recover an ordered closed contour from an unordered point cloud.
pub fn order_contour(
    points: &[Vector2<f64>],
    cfg: &OrderCfg,
) -> Result<OrderedContour, ContourError> {
    let nn = nearest_neighbor_graph(points, cfg.neighbors)?;
    order_neighbor_graph(&nn, cfg)
}

/// Ordering loop on a prebuilt neighbor graph.
pub fn order_neighbor_graph(
    nn: &NeighborGraph,
    cfg: &OrderCfg,
) -> Result<OrderedContour, ContourError> {
    let (walk_graph, origin) = select_component(&nn.graph, cfg.component);
    let arcs = walk_graph.to_directed();
    let required = (cfg.min_coverage * nn.len() as f64).floor() as usize;
    let step = cfg.retry_step.max(1);
    debug!(
        points = nn.len(),
        component = walk_graph.node_count(),
        arcs = arcs.arc_count(),
        required,
        "ordering contour"
    );

    let mut attempts = 0;
    let mut best_len = 0;
    let mut l = 0;
    while l < arcs.arc_count() {
        attempts += 1;
        match attempt_walk(&arcs, l)? {
            Walk::NoPath => {
                debug!(cut = l, "no path around cut");
            }
            Walk::Path(path) if path.len() > required => {
                let cut = arcs.arc(l)?;
                info!(
                    cut = l,
                    attempts,
                    len = path.len(),
                    "accepted contour walk"
                );
                return Ok(OrderedContour {
                    contour: relabel(nn, &origin, &path),
                    attempts,
                    cut_index: l,
                    cut: (nn.source[origin[cut.0]], nn.source[origin[cut.1]]),
                });
            }
            Walk::Path(path) => {
                debug!(cut = l, len = path.len(), required, "walk too short");
                best_len = best_len.max(path.len());
            }
        }
        l += step;
    }
    Err(ContourError::CoverageTooLow {
        attempts,
        best_len,
        required,
    })
}

enum Walk {
    NoPath,
    Path(Vec<NodeId>),
}

fn attempt_walk(arcs: &DirectedView<'_>, l: usize) -> Result<Walk, ContourError> {
    Ok(match arcs.walk_around_cut(l)? {
        Some(path) => Walk::Path(path),
        None => Walk::NoPath,
    })
}

/// Subgraph the walk runs on, plus the neighbor-graph id of each of its nodes.
fn select_component(
    graph: &EmbeddedGraph,
    selection: ComponentSelection,
) -> (EmbeddedGraph, Vec<NodeId>) {
    match selection {
        ComponentSelection::All => (graph.clone(), (0..graph.node_count()).collect()),
        ComponentSelection::Largest => {
            let comps = graph.connected_components();
            let mut best: &[NodeId] = &[];
            for c in &comps {
                if c.len() > best.len() {
                    best = c;
                }
            }
            let mut keep = vec![false; graph.node_count()];
            for &v in best {
                keep[v] = true;
            }
            graph.induced_subgraph(&keep)
        }
    }
}

/// Contour in walk order, carrying positions and input indices.
fn relabel(nn: &NeighborGraph, origin: &[NodeId], path: &[NodeId]) -> Contour {
    let mut points = Vec::with_capacity(path.len());
    let mut source = Vec::with_capacity(path.len());
    for &v in path {
        let node = origin[v];
        if let Some(p) = nn.graph.position(node) {
            points.push(p);
            source.push(nn.source[node]);
        }
    }
    Contour::with_source(points, source, ContourTopology::Closed)
}

/// Number of arcs the cut loop enumerates for this graph.
pub fn arc_budget(nn: &NeighborGraph, cfg: &OrderCfg) -> usize {
    select_component(&nn.graph, cfg.component)
        .0
        .to_directed()
        .arc_count()
}

#[cfg(test)]
mod tests;
