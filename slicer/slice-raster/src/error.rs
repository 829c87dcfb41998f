//! Error types for the raster stage.

use thiserror::Error;

/// Result type for raster operations.
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors raised while turning layer sections into exposure images.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The target image has a zero-pixel axis.
    #[error("raster target needs a non-zero resolution, got {width}x{height}")]
    ZeroResolution {
        /// Requested pixel columns.
        width: u32,
        /// Requested pixel rows.
        height: u32,
    },

    /// A workspace grid extent is zero or negative.
    #[error("raster target needs positive grid extents, got {x} by {y}")]
    InvalidGrid {
        /// Grid width in scene units.
        x: f64,
        /// Grid depth in scene units.
        y: f64,
    },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}
