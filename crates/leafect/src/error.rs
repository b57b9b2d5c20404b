//! Error types for the transform, the graph layer and contour recovery.

use std::fmt;

use crate::graph::NodeId;

/// Errors surfaced while computing Euler curves and ECT matrices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EctError {
    /// A graph node has no position, so it cannot be projected.
    MissingPosition { node: NodeId },
    /// A point or node position has a NaN or infinite coordinate.
    NonFinitePosition { node: NodeId },
    /// No points or nodes to project.
    EmptyShape,
    /// Resolution `T` must be at least 1.
    ZeroResolution,
    /// Direction count `n` must be at least 1.
    ZeroDirections,
    /// An ECT matrix needs at least one direction count and one resolution.
    EmptyConfig,
    /// Stored cells do not fit the declared configuration.
    ShapeMismatch { expected: usize, got: usize },
}

impl fmt::Display for EctError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EctError::MissingPosition { node } => {
                write!(f, "graph node {node} has no position attribute")
            }
            EctError::NonFinitePosition { node } => {
                write!(f, "point {node} has a non-finite coordinate")
            }
            EctError::EmptyShape => write!(f, "shape has no points"),
            EctError::ZeroResolution => write!(f, "resolution must be positive"),
            EctError::ZeroDirections => write!(f, "direction count must be positive"),
            EctError::EmptyConfig => {
                write!(f, "need at least one direction count and one resolution")
            }
            EctError::ShapeMismatch { expected, got } => {
                write!(f, "expected {expected} cells, got {got}")
            }
        }
    }
}

impl std::error::Error for EctError {}

/// Errors from graph queries that indicate a caller bug rather than a shape property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphError {
    NodeNotFound { node: NodeId, len: usize },
    ArcOutOfRange { arc: usize, len: usize },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::NodeNotFound { node, len } => {
                write!(f, "node {node} not in graph with {len} nodes")
            }
            GraphError::ArcOutOfRange { arc, len } => {
                write!(f, "arc {arc} out of range ({len} arcs)")
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Errors from nearest-neighbor graph construction and contour ordering.
#[derive(Clone, Debug, PartialEq)]
pub enum ContourError {
    /// Not enough distinct points to connect each one to `k` neighbors.
    TooFewPoints { distinct: usize, needed: usize },
    /// A point has a non-finite coordinate.
    NonFinitePoint { index: usize },
    /// Every walk tried was too short to count as the outline.
    CoverageTooLow {
        attempts: usize,
        best_len: usize,
        required: usize,
    },
    /// Path search failed for a reason other than "no path"; the input breaks the
    /// near-path/cycle assumption and the whole batch should stop.
    UnexpectedGraph(GraphError),
}

impl ContourError {
    /// True when a batch driver may skip the item and continue.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ContourError::UnexpectedGraph(_))
    }
}

impl fmt::Display for ContourError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContourError::TooFewPoints { distinct, needed } => write!(
                f,
                "point cloud has {distinct} distinct points, need at least {needed}"
            ),
            ContourError::NonFinitePoint { index } => {
                write!(f, "point {index} has a non-finite coordinate")
            }
            ContourError::CoverageTooLow {
                attempts,
                best_len,
                required,
            } => write!(
                f,
                "no walk covers enough of the outline after {attempts} attempts \
                 (best {best_len}, need more than {required})"
            ),
            ContourError::UnexpectedGraph(err) => write!(f, "unexpected graph failure: {err}"),
        }
    }
}

impl std::error::Error for ContourError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContourError::UnexpectedGraph(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GraphError> for ContourError {
    fn from(err: GraphError) -> Self {
        ContourError::UnexpectedGraph(err)
    }
}
