//! Ordered boundary contours (open paths or closed loops).

use nalgebra::Vector2;

use crate::graph::EmbeddedGraph;

/// Whether the last contour point links back to the first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContourTopology {
    Open,
    Closed,
}

/// Ordered point sequence; point `i` is adjacent to `i + 1` (and the last to the first when
/// closed). `source[i]` is the index of the input point that became contour point `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    points: Vec<Vector2<f64>>,
    source: Vec<usize>,
    topology: ContourTopology,
}

impl Contour {
    /// Contour over `points` in the given order; sources are `0..n`.
    pub fn new(points: Vec<Vector2<f64>>, topology: ContourTopology) -> Self {
        let source = (0..points.len()).collect();
        Self {
            points,
            source,
            topology,
        }
    }

    pub fn with_source(
        points: Vec<Vector2<f64>>,
        source: Vec<usize>,
        topology: ContourTopology,
    ) -> Self {
        debug_assert_eq!(points.len(), source.len());
        Self {
            points,
            source,
            topology,
        }
    }

    /// Recognize a sequence that already closes on itself (first point repeated at the end).
    ///
    /// The duplicate endpoint is dropped and the closure moves into the topology.
    pub fn from_repeated_endpoint(mut points: Vec<Vector2<f64>>) -> Option<Self> {
        if points.len() < 2 || points.first() != points.last() {
            return None;
        }
        points.pop();
        Some(Self::new(points, ContourTopology::Closed))
    }

    pub fn points(&self) -> &[Vector2<f64>] {
        &self.points
    }

    pub fn source(&self) -> &[usize] {
        &self.source
    }

    pub fn topology(&self) -> ContourTopology {
        self.topology
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index that wraps around to 0, or 0 when there is no wraparound.
    ///
    /// Fewer than three points cannot form a simple loop, so they count as open.
    pub fn connecting_index(&self) -> usize {
        match self.topology {
            ContourTopology::Closed if self.points.len() >= 3 => self.points.len() - 1,
            _ => 0,
        }
    }

    /// The path or cycle graph this contour implies.
    pub fn to_graph(&self) -> EmbeddedGraph {
        EmbeddedGraph::path(&self.points, self.topology)
    }

    pub fn into_points(self) -> Vec<Vector2<f64>> {
        self.points
    }
}
