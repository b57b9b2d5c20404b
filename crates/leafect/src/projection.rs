//! Directional heights, direction sets and threshold ladders.
//!
//! - `height`: dot product of a point with the unit vector `(cos θ, sin θ)`.
//! - `directions`: `n` angles uniformly spaced on `[0, 2π)`; never contains `2π`.
//! - `thresholds`: `T` ascending cut levels between the min and max height; the lowest is
//!   strictly above the min (when min < max) and the highest is exactly the max.
//! - `HeightTable`: heights of every graph node, one row per direction.

use std::f64::consts::TAU;

use nalgebra::{DMatrix, Vector2};

use crate::error::EctError;
use crate::graph::EmbeddedGraph;

/// Unit direction vector for angle `theta` (radians).
#[inline]
pub fn direction(theta: f64) -> Vector2<f64> {
    Vector2::new(theta.cos(), theta.sin())
}

/// Height of `p` along the direction `theta`.
#[inline]
pub fn height(p: Vector2<f64>, theta: f64) -> f64 {
    direction(theta).dot(&p)
}

/// Heights of all points along `theta`.
pub fn heights(points: &[Vector2<f64>], theta: f64) -> Vec<f64> {
    let v = direction(theta);
    points.iter().map(|p| v.dot(p)).collect()
}

/// `n` angles `2πk/n` for `k = 0..n`.
pub fn directions(n: usize) -> Vec<f64> {
    (0..n).map(|k| TAU * (k as f64) / (n as f64)).collect()
}

/// Threshold ladder for heights spanning `[lo, hi]` at resolution `t`.
///
/// Entry `j` is `lo + (j+1)·(hi-lo)/t`, so the ladder ascends, skips `lo` and ends at `hi`.
pub fn thresholds(lo: f64, hi: f64, t: usize) -> Vec<f64> {
    let step = (hi - lo) / (t as f64);
    (0..t)
        .map(|j| {
            if j + 1 == t {
                hi
            } else {
                lo + ((j + 1) as f64) * step
            }
        })
        .collect()
}

/// Fails on the first point with a NaN or infinite coordinate.
pub(crate) fn check_finite(points: &[Vector2<f64>]) -> Result<(), EctError> {
    match points
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite()))
    {
        Some(node) => Err(EctError::NonFinitePosition { node }),
        None => Ok(()),
    }
}

/// Min and max of a non-empty height slice.
pub(crate) fn extent(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &h| (lo.min(h), hi.max(h))),
    )
}

/// Per-node heights for a set of directions (rows: directions, columns: nodes).
#[derive(Clone, Debug)]
pub struct HeightTable {
    pub angles: Vec<f64>,
    pub values: DMatrix<f64>,
}

impl HeightTable {
    /// Project every node of `graph` along every angle.
    ///
    /// Fails if any node lacks a position or has a non-finite one.
    pub fn for_graph(graph: &EmbeddedGraph, angles: &[f64]) -> Result<Self, EctError> {
        let positions = graph.positions()?;
        check_finite(&positions)?;
        let mut values = DMatrix::zeros(angles.len(), positions.len());
        for (i, &theta) in angles.iter().enumerate() {
            let v = direction(theta);
            for (node, p) in positions.iter().enumerate() {
                values[(i, node)] = v.dot(p);
            }
        }
        Ok(Self {
            angles: angles.to_vec(),
            values,
        })
    }

    /// Heights of all nodes along direction `i`.
    pub fn row(&self, i: usize) -> Vec<f64> {
        self.values.row(i).iter().copied().collect()
    }
}
