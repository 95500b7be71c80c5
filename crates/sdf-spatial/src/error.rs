//! Error types for spatial structures.

use thiserror::Error;

/// Errors that can occur when constructing spatial structures.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The grid cell size must be positive and finite.
    #[error("Invalid grid cell size: {0} (must be positive and finite)")]
    InvalidCellSize(f64),
}
