//! Strut dimensions in scene units.

use crate::error::{SupportError, SupportResult};

/// 1 scene unit = 10 mm.
const MM_TO_UNITS: f64 = 0.1;

/// Radii and heights for one support strut, in scene units.
///
/// Printer presets state these in millimetres; [`SupportDims::from_millimetres`]
/// applies the unit conversion once so the builder works in scene space
/// throughout.
///
/// # Example
///
/// ```
/// use mesh_support::SupportDims;
///
/// let dims = SupportDims::from_millimetres(0.4, 0.6, 1.0, 3.0, 3.0);
/// assert!((dims.body() - 0.1).abs() < 1e-12);
/// assert!((dims.platform_height() - 0.3).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportDims {
    head: f64,
    connection_sphere: f64,
    body: f64,
    platform_width: f64,
    platform_height: f64,
}

impl SupportDims {
    /// Create dimensions already expressed in scene units.
    #[must_use]
    pub const fn new(
        head: f64,
        connection_sphere: f64,
        body: f64,
        platform_width: f64,
        platform_height: f64,
    ) -> Self {
        Self {
            head,
            connection_sphere,
            body,
            platform_width,
            platform_height,
        }
    }

    /// Create dimensions from preset millimetre values.
    #[must_use]
    pub fn from_millimetres(
        head: f64,
        connection_sphere: f64,
        body: f64,
        platform_width: f64,
        platform_height: f64,
    ) -> Self {
        Self {
            head: head * MM_TO_UNITS,
            connection_sphere: connection_sphere * MM_TO_UNITS,
            body: body * MM_TO_UNITS,
            platform_width: platform_width * MM_TO_UNITS,
            platform_height: platform_height * MM_TO_UNITS,
        }
    }

    /// Radius of the tapered tip where the strut meets the model.
    #[inline]
    #[must_use]
    pub const fn head(&self) -> f64 {
        self.head
    }

    /// Radius of the spheres placed at the touchpoint and the anchor.
    #[inline]
    #[must_use]
    pub const fn connection_sphere(&self) -> f64 {
        self.connection_sphere
    }

    /// Radius of the swept body tube.
    #[inline]
    #[must_use]
    pub const fn body(&self) -> f64 {
        self.body
    }

    /// Radius of the platform foot at the build plate.
    #[inline]
    #[must_use]
    pub const fn platform_width(&self) -> f64 {
        self.platform_width
    }

    /// Height of the platform foot above the build plate.
    #[inline]
    #[must_use]
    pub const fn platform_height(&self) -> f64 {
        self.platform_height
    }

    /// Check that every radius is positive.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::InvalidRadius`] naming the first dimension
    /// that is zero or negative.
    pub fn validate(&self) -> SupportResult<()> {
        let radii = [
            ("head", self.head),
            ("connection sphere", self.connection_sphere),
            ("body", self.body),
            ("platform width", self.platform_width),
        ];
        for (name, value) in radii {
            if value <= 0.0 {
                return Err(SupportError::InvalidRadius { name, value });
            }
        }
        Ok(())
    }
}

impl Default for SupportDims {
    /// Medium strut dimensions for a desktop resin printer.
    fn default() -> Self {
        Self::from_millimetres(0.4, 0.6, 1.0, 3.0, 3.0)
    }
}
