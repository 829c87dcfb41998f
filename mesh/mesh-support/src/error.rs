//! Error types for support geometry generation.

use thiserror::Error;

/// Result type for support geometry operations.
pub type SupportResult<T> = Result<T, SupportError>;

/// Errors that can occur while building support geometry.
#[derive(Debug, Error)]
pub enum SupportError {
    /// Path has too few points to sweep a body along.
    #[error("support path needs at least {min} points, got {actual}")]
    TooFewPoints {
        /// Minimum required points.
        min: usize,
        /// Actual point count.
        actual: usize,
    },

    /// A preset dimension is invalid (zero or negative).
    #[error("invalid {name} radius: {value}")]
    InvalidRadius {
        /// Which dimension was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Segment count is too low to produce a surface.
    #[error("needs at least {min} segments, got {actual}")]
    TooFewSegments {
        /// Minimum required segments.
        min: usize,
        /// Actual segment count.
        actual: usize,
    },
}
