//! Euler characteristic curves of general embedded graphs.
//!
//! For each direction every node is projected, a threshold ladder is laid between the
//! lowest and highest node, and at each threshold the vertex-induced subgraph below it is
//! built explicitly. Its characteristic is |V| − |E| (graphs carry no 2-cells).
//!
//! This is the reference path; `contour_ect` computes the same numbers for path and cycle
//! graphs without building subgraphs.

use nalgebra::DMatrix;

use crate::error::EctError;
use crate::graph::EmbeddedGraph;
use crate::projection::{extent, thresholds, HeightTable};

/// Euler curves, one row per direction and one column per threshold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EulerCurve {
    values: DMatrix<i64>,
}

impl EulerCurve {
    pub fn directions(&self) -> usize {
        self.values.nrows()
    }

    pub fn resolution(&self) -> usize {
        self.values.ncols()
    }

    pub fn get(&self, direction: usize, threshold: usize) -> i64 {
        self.values[(direction, threshold)]
    }

    pub fn row(&self, direction: usize) -> Vec<i64> {
        self.values.row(direction).iter().copied().collect()
    }

    /// Direction-major flattening (all thresholds of direction 0 first).
    pub fn flatten(&self) -> Vec<i64> {
        (0..self.directions()).flat_map(|i| self.row(i)).collect()
    }

    pub fn as_matrix(&self) -> &DMatrix<i64> {
        &self.values
    }
}

/// Euler curve of `graph` along each of `angles` at `resolution` thresholds.
pub fn euler_curve(
    graph: &EmbeddedGraph,
    angles: &[f64],
    resolution: usize,
) -> Result<EulerCurve, EctError> {
    if resolution == 0 {
        return Err(EctError::ZeroResolution);
    }
    let table = HeightTable::for_graph(graph, angles)?;
    if graph.node_count() == 0 {
        return Err(EctError::EmptyShape);
    }
    let mut values = DMatrix::zeros(angles.len(), resolution);
    for i in 0..angles.len() {
        let h = table.row(i);
        let (lo, hi) = extent(&h).ok_or(EctError::EmptyShape)?;
        for (j, lim) in thresholds(lo, hi, resolution).into_iter().enumerate() {
            let keep: Vec<bool> = h.iter().map(|&x| x <= lim).collect();
            let (below, _) = graph.induced_subgraph(&keep);
            values[(i, j)] = below.euler_characteristic();
        }
    }
    Ok(EulerCurve { values })
}
