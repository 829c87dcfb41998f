//! Profile validation errors.

use thiserror::Error;

/// Errors raised by [`PrinterProfile::validate`].
///
/// [`PrinterProfile::validate`]: crate::PrinterProfile::validate
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Layer height is zero or negative.
    #[error("layer height must be positive, got {0} mm")]
    InvalidLayerHeight(f64),

    /// One of the resolution axes is zero.
    #[error("resolution must be non-zero on both axes, got {x}x{y}")]
    ZeroResolution {
        /// Horizontal pixel count.
        x: u32,
        /// Vertical pixel count.
        y: u32,
    },

    /// A workspace dimension is zero or negative.
    #[error("workspace dimensions must be positive, got {x}x{y}x{z} mm")]
    InvalidWorkspace {
        /// Plate width in mm.
        x: f64,
        /// Plate depth in mm.
        y: f64,
        /// Vertical travel in mm.
        z: f64,
    },
}
