//! Euler curves of ordered contours by break counting.
//!
//! A contour's edges are implicit (`i -- i+1`, plus `N-1 -- 0` when closed), so the subgraph
//! below a threshold is a set of index runs. Its characteristic is the number of runs, minus
//! one when a run touching index 0 joins a run ending at the connecting index. One linear
//! pass per threshold, no subgraph construction.

use crate::contour::Contour;
use crate::error::EctError;
use crate::projection::{check_finite, extent, heights, thresholds};

/// Euler characteristic of the sorted index subset `indices` of a path or cycle.
///
/// Counts runs of consecutive indices. If `connecting_index > 0`, that index is adjacent to 0,
/// so a subset starting at 0 and ending at it loses one component (or closes the loop).
/// An empty subset has characteristic 0.
pub fn count_breaks(indices: &[usize], connecting_index: usize) -> i64 {
    let (Some(&first), Some(&last)) = (indices.first(), indices.last()) else {
        return 0;
    };
    let breaks = indices.windows(2).filter(|w| w[0] + 1 != w[1]).count() as i64;
    let mut chi = breaks + 1;
    if connecting_index > 0 && last == connecting_index && first == 0 {
        chi -= 1;
    }
    chi
}

/// Flattened Euler curve of `contour`: `angles.len() * resolution` values, direction-major.
pub fn contour_euler_curve(
    contour: &Contour,
    angles: &[f64],
    resolution: usize,
) -> Result<Vec<i64>, EctError> {
    if resolution == 0 {
        return Err(EctError::ZeroResolution);
    }
    if contour.is_empty() {
        return Err(EctError::EmptyShape);
    }
    check_finite(contour.points())?;
    let connecting = contour.connecting_index();
    let mut out = Vec::with_capacity(angles.len() * resolution);
    let mut below: Vec<usize> = Vec::with_capacity(contour.len());
    for &theta in angles {
        let h = heights(contour.points(), theta);
        let (lo, hi) = extent(&h).ok_or(EctError::EmptyShape)?;
        for lim in thresholds(lo, hi, resolution) {
            below.clear();
            below.extend(
                h.iter()
                    .enumerate()
                    .filter(|&(_, &x)| x <= lim)
                    .map(|(i, _)| i),
            );
            out.push(count_breaks(&below, connecting));
        }
    }
    Ok(out)
}
