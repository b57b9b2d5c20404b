//! Multi-configuration ECT matrices.
//!
//! One Euler curve per (direction count `n`, resolution `T`) pair, stored in a
//! `(|angle_counts|, |resolutions|, max n · max T)` array. Cells past `n·T` in a slot stay
//! unset (`None`), so "never computed" can't be confused with any characteristic value.

use crate::contour::Contour;
use crate::contour_ect::contour_euler_curve;
use crate::error::EctError;
use crate::euler::euler_curve;
use crate::graph::EmbeddedGraph;
use crate::projection::directions;

/// Shape data plus the computer to use on it.
#[derive(Clone, Copy, Debug)]
pub enum EctInput<'a> {
    /// Ordered contour; fast break counting.
    Contour(&'a Contour),
    /// General embedded graph; explicit threshold subgraphs.
    Graph(&'a EmbeddedGraph),
}

/// Padded ECT array with optional cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EctMatrix {
    angle_counts: Vec<usize>,
    resolutions: Vec<usize>,
    slots: usize,
    cells: Vec<Option<i64>>,
}

impl EctMatrix {
    /// All-unset matrix for the given configuration lists.
    pub fn unset(angle_counts: &[usize], resolutions: &[usize]) -> Result<Self, EctError> {
        if angle_counts.is_empty() || resolutions.is_empty() {
            return Err(EctError::EmptyConfig);
        }
        if angle_counts.contains(&0) {
            return Err(EctError::ZeroDirections);
        }
        if resolutions.contains(&0) {
            return Err(EctError::ZeroResolution);
        }
        let max_n = angle_counts.iter().copied().max().unwrap_or(0);
        let max_t = resolutions.iter().copied().max().unwrap_or(0);
        let slots = max_n * max_t;
        Ok(Self {
            angle_counts: angle_counts.to_vec(),
            resolutions: resolutions.to_vec(),
            slots,
            cells: vec![None; angle_counts.len() * resolutions.len() * slots],
        })
    }

    /// Rebuild from stored cells (row-major over the three axes).
    pub fn from_cells(
        angle_counts: &[usize],
        resolutions: &[usize],
        cells: Vec<Option<i64>>,
    ) -> Result<Self, EctError> {
        let mut m = Self::unset(angle_counts, resolutions)?;
        if cells.len() != m.cells.len() {
            return Err(EctError::ShapeMismatch {
                expected: m.cells.len(),
                got: cells.len(),
            });
        }
        m.cells = cells;
        Ok(m)
    }

    pub fn angle_counts(&self) -> &[usize] {
        &self.angle_counts
    }

    pub fn resolutions(&self) -> &[usize] {
        &self.resolutions
    }

    /// `(|angle_counts|, |resolutions|, slots)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.angle_counts.len(), self.resolutions.len(), self.slots)
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Option<i64>] {
        &self.cells
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        (i * self.resolutions.len() + j) * self.slots
    }

    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<i64> {
        self.cells[self.offset(i, j) + k]
    }

    /// Full slot row for configuration `(i, j)`, padding included.
    pub fn slot(&self, i: usize, j: usize) -> &[Option<i64>] {
        let start = self.offset(i, j);
        &self.cells[start..start + self.slots]
    }

    /// The computed prefix of slot `(i, j)`, or `None` if it was never written.
    pub fn curve(&self, i: usize, j: usize) -> Option<Vec<i64>> {
        let len = self.angle_counts[i] * self.resolutions[j];
        self.slot(i, j)[..len].iter().copied().collect()
    }

    fn write(&mut self, i: usize, j: usize, values: &[i64]) {
        let start = self.offset(i, j);
        for (cell, &v) in self.cells[start..start + values.len()].iter_mut().zip(values) {
            *cell = Some(v);
        }
    }

    /// Dense `f64` view with NaN in unset cells.
    pub fn to_nan_padded(&self) -> Vec<f64> {
        self.cells
            .iter()
            .map(|c| c.map_or(f64::NAN, |v| v as f64))
            .collect()
    }
}

/// Compute the ECT of `input` for every (direction count, resolution) pair.
pub fn ect_matrix(
    input: EctInput<'_>,
    angle_counts: &[usize],
    resolutions: &[usize],
) -> Result<EctMatrix, EctError> {
    let mut m = EctMatrix::unset(angle_counts, resolutions)?;
    for (i, &n) in angle_counts.iter().enumerate() {
        let thetas = directions(n);
        for (j, &t) in resolutions.iter().enumerate() {
            let curve = match input {
                EctInput::Contour(c) => contour_euler_curve(c, &thetas, t)?,
                EctInput::Graph(g) => euler_curve(g, &thetas, t)?.flatten(),
            };
            debug_assert_eq!(curve.len(), n * t);
            m.write(i, j, &curve);
        }
    }
    Ok(m)
}
