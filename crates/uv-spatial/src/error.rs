//! Error types for spatial operations.

/// Errors that can occur during spatial operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SpatialError {
    /// The voxel cell size must be positive.
    #[error("voxel cell size must be positive, got {0}")]
    InvalidCellSize(f64),
}
