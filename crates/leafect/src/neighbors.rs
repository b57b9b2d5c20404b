//! k-nearest-neighbor graphs over unordered point clouds.
//!
//! Each point is linked to its `k` closest other points (default 2), which approximates
//! the 1-manifold an outline sample lies on. Noise, holes and ties show up as extra
//! components or higher-degree nodes; contour ordering deals with those.
//!
//! Notes
//! - Exact duplicate coordinates are merged first (first occurrence wins) unless
//!   `NeighborCfg::merge_duplicates` is off; every node remembers its input index.
//! - Distance ties are broken by the lower point index.
//! - Brute force, O(N²) distances. Outline samples are small enough for this.

use nalgebra::Vector2;

use crate::error::ContourError;
use crate::graph::{EmbeddedGraph, NodeId};

/// Neighbor-graph configuration.
#[derive(Clone, Copy, Debug)]
pub struct NeighborCfg {
    pub k: usize,
    pub merge_duplicates: bool,
}

impl Default for NeighborCfg {
    fn default() -> Self {
        Self {
            k: 2,
            merge_duplicates: true,
        }
    }
}

/// Neighbor graph plus the input index behind each node.
#[derive(Clone, Debug)]
pub struct NeighborGraph {
    pub graph: EmbeddedGraph,
    pub source: Vec<usize>,
}

impl NeighborGraph {
    /// Number of distinct points (graph nodes).
    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

/// Build the k-NN graph of `points`.
pub fn nearest_neighbor_graph(
    points: &[Vector2<f64>],
    cfg: NeighborCfg,
) -> Result<NeighborGraph, ContourError> {
    if let Some(index) = points
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite()))
    {
        return Err(ContourError::NonFinitePoint { index });
    }
    let source = if cfg.merge_duplicates {
        distinct_indices(points)
    } else {
        (0..points.len()).collect()
    };
    let needed = cfg.k + 1;
    if source.len() < needed {
        return Err(ContourError::TooFewPoints {
            distinct: source.len(),
            needed,
        });
    }
    let pts: Vec<Vector2<f64>> = source.iter().map(|&i| points[i]).collect();
    let nearest: Vec<Vec<NodeId>> = (0..pts.len())
        .map(|i| k_nearest(&pts, i, cfg.k))
        .collect();

    let mut graph = EmbeddedGraph::from_points(&pts);
    // Rank-major insertion: every first neighbor, then every second one, ...
    for rank in 0..cfg.k {
        for (i, nbrs) in nearest.iter().enumerate() {
            graph.add_edge(i, nbrs[rank])?;
        }
    }
    Ok(NeighborGraph { graph, source })
}

/// Indices of the first occurrence of each distinct coordinate, in input order.
///
/// `-0.0` and `0.0` are the same coordinate.
fn distinct_indices(points: &[Vector2<f64>]) -> Vec<usize> {
    // Adding 0.0 maps -0.0 to 0.0 and leaves every other value unchanged.
    let key = |i: usize| (points[i].x + 0.0, points[i].y + 0.0);
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        let (ka, kb) = (key(a), key(b));
        ka.0.total_cmp(&kb.0)
            .then(ka.1.total_cmp(&kb.1))
            .then(a.cmp(&b))
    });
    let mut keep = vec![false; points.len()];
    let mut prev: Option<(f64, f64)> = None;
    for i in order {
        let k = key(i);
        if prev != Some(k) {
            keep[i] = true;
            prev = Some(k);
        }
    }
    (0..points.len()).filter(|&i| keep[i]).collect()
}

/// The `k` points closest to `pts[i]` (excluding `i`), nearest first.
fn k_nearest(pts: &[Vector2<f64>], i: usize, k: usize) -> Vec<NodeId> {
    let p = pts[i];
    let mut cand: Vec<(f64, usize)> = pts
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .map(|(j, q)| ((q - p).norm_squared(), j))
        .collect();
    let by_dist = |a: &(f64, usize), b: &(f64, usize)| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1));
    if k < cand.len() {
        cand.select_nth_unstable_by(k, by_dist);
        cand.truncate(k);
    }
    cand.sort_by(by_dist);
    cand.into_iter().map(|(_, j)| j).collect()
}
