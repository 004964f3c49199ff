//! Error and diagnostic types for coverage map computation

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors that can occur while configuring or computing a coverage map
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoverageError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Boundary geometry is malformed and cannot be repaired
    #[error("invalid boundary: {0}")]
    InvalidBoundary(String),
    /// A coordinate lies outside the domain of the projection
    #[error("coordinate ({longitude}, {latitude}) is outside the projection domain")]
    ProjectionDomain {
        /// Longitude of the rejected coordinate, in degrees
        longitude: f64,
        /// Latitude of the rejected coordinate, in degrees
        latitude: f64,
    },
    /// Input records could not be parsed
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Reading an input file failed
    #[error("failed to read {path}: {message}")]
    Io {
        /// Path that was being read
        path: String,
        /// Underlying I/O error message
        message: String,
    },
}

/// Result type alias for coverage operations
pub type Result<T> = std::result::Result<T, CoverageError>;

/// The kind of degeneracy found in the seed set
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// The seed has exactly the same position as an earlier seed
    Coincident {
        /// Index of the earlier seed that keeps the cell
        first: usize,
    },
    /// The triangulation rejected the seed's coordinates
    Unplaced,
    /// Every seed lies on one line, so no triangles exist
    Collinear,
    /// The seed was placed but its cell collapsed inside the bounds
    EmptyCell,
}

/// Non-fatal conditions collected while computing a map
///
/// Diagnostics never abort the pipeline. They are logged as they are found
/// and kept on the [`CoverageMap`](crate::CoverageMap) for inspection.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// An input point was excluded from the seed set
    PointDropped {
        /// Index of the record in the caller's input slice
        source_index: usize,
        /// Why the point was rejected
        error: CoverageError,
    },
    /// No valid points remained; the map only carries the boundary
    EmptyInput,
    /// Degenerate seed geometry; the affected cell may be empty
    DegenerateGeometry {
        /// Affected seed, or `None` when the whole seed set is affected
        seed_index: Option<usize>,
        /// What went wrong
        kind: Degeneracy,
    },
    /// The seed's cell does not intersect the clip region at all
    ClipMismatch {
        /// Affected seed
        seed_index: usize,
    },
}

impl Diagnostic {
    /// Log this diagnostic at warning level
    pub(crate) fn log(&self) {
        match self {
            Diagnostic::PointDropped { source_index, error } => {
                log::warn!("dropping input point {}: {}", source_index, error)
            }
            Diagnostic::EmptyInput => log::warn!("no valid points; rendering boundary only"),
            Diagnostic::DegenerateGeometry { seed_index: Some(i), kind } => {
                log::warn!("degenerate geometry at seed {}: {:?}", i, kind)
            }
            Diagnostic::DegenerateGeometry { seed_index: None, kind } => {
                log::warn!("degenerate seed set: {:?}", kind)
            }
            Diagnostic::ClipMismatch { seed_index } => {
                log::warn!("cell {} lies entirely outside the clip region", seed_index)
            }
        }
    }
}
