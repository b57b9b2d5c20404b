//! Euler Characteristic Transform for 2D outlines, plus contour recovery.
//!
//! Pipeline
//! - Unordered point cloud → `order::order_contour` (2-NN graph, cut-and-walk) → `Contour`.
//! - `Contour` or `EmbeddedGraph` → `matrix::ect_matrix` over several (directions, resolution)
//!   configurations → padded `EctMatrix`.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; the `prelude` is the
//!   convenience surface for the CLI, benches and tests.

pub mod contour_ect;
pub mod euler;
pub mod graph;
pub mod matrix;
pub mod neighbors;
pub mod order;
pub mod projection;
pub mod sample;

mod contour;
mod error;

pub use contour::{Contour, ContourTopology};
pub use error::{ContourError, EctError, GraphError};

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::contour_ect::{contour_euler_curve, count_breaks};
    pub use crate::euler::{euler_curve, EulerCurve};
    pub use crate::graph::{EmbeddedGraph, NodeId};
    pub use crate::matrix::{ect_matrix, EctInput, EctMatrix};
    pub use crate::neighbors::{nearest_neighbor_graph, NeighborCfg, NeighborGraph};
    pub use crate::order::{order_contour, ComponentSelection, OrderCfg, OrderedContour};
    pub use crate::projection::{directions, height, thresholds};
    pub use crate::sample::{sample_outline, OutlineCfg, ReplayToken};
    pub use crate::{Contour, ContourError, ContourTopology, EctError, GraphError};
    pub use nalgebra::Vector2 as Vec2;
}
