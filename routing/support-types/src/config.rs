//! Scan and route configuration.

/// Parameters for the voxel free-space scan.
///
/// All distances are scene units (1 unit = 10 mm).
///
/// # Example
///
/// ```
/// use support_types::ScanConfig;
///
/// let config = ScanConfig::default()
///     .with_cell_size(0.08)
///     .with_min_spacing(0.4);
/// assert!((config.cell_size() - 0.08).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanConfig {
    cell_size: f64,
    probe_cells: u32,
    down_normal_threshold: f64,
    min_spacing: f64,
}

impl ScanConfig {
    /// Voxel cell size in scene units.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Downward probe budget, in cells.
    ///
    /// A surface sample becomes a touchpoint when this many cells below
    /// it hold no material before the platform is reached.
    #[inline]
    #[must_use]
    pub const fn probe_cells(&self) -> u32 {
        self.probe_cells
    }

    /// Upper bound on a face normal's Z component for the face to count
    /// as downward-facing.
    #[inline]
    #[must_use]
    pub const fn down_normal_threshold(&self) -> f64 {
        self.down_normal_threshold
    }

    /// Minimum horizontal spacing between accepted touchpoints.
    #[inline]
    #[must_use]
    pub const fn min_spacing(&self) -> f64 {
        self.min_spacing
    }

    /// Set the voxel cell size.
    #[must_use]
    pub const fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the downward probe budget.
    #[must_use]
    pub const fn with_probe_cells(mut self, probe_cells: u32) -> Self {
        self.probe_cells = probe_cells;
        self
    }

    /// Set the downward-facing normal threshold.
    #[must_use]
    pub const fn with_down_normal_threshold(mut self, threshold: f64) -> Self {
        self.down_normal_threshold = threshold;
        self
    }

    /// Set the touchpoint spacing.
    #[must_use]
    pub const fn with_min_spacing(mut self, min_spacing: f64) -> Self {
        self.min_spacing = min_spacing;
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            // 1 mm cells.
            cell_size: 0.1,
            // Material further than 8 cells below a point does not count
            // as holding it up.
            probe_cells: 8,
            down_normal_threshold: -0.5,
            // 3 mm between touchpoints.
            min_spacing: 0.3,
        }
    }
}

/// Bounds and clearances for support routing.
///
/// # Example
///
/// ```
/// use support_types::RouteConfig;
///
/// let config = RouteConfig::default().with_max_retries(12);
/// assert_eq!(config.max_retries(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteConfig {
    max_retries: u32,
    max_ring: u32,
    clearance_cells: u32,
    min_anchor_clearance: f64,
}

impl RouteConfig {
    /// Hard cap on candidate evaluations per touchpoint.
    #[inline]
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Largest lateral offset ring, in multiples of the scan cell size.
    #[inline]
    #[must_use]
    pub const fn max_ring(&self) -> u32 {
        self.max_ring
    }

    /// Lateral clearance around a corridor, in cells.
    #[inline]
    #[must_use]
    pub const fn clearance_cells(&self) -> u32 {
        self.clearance_cells
    }

    /// Minimum ray distance before a surface hit may anchor, in scene
    /// units. Keeps rays leaving a surface from anchoring on it.
    #[inline]
    #[must_use]
    pub const fn min_anchor_clearance(&self) -> f64 {
        self.min_anchor_clearance
    }

    /// Set the candidate evaluation cap.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the largest offset ring.
    #[must_use]
    pub const fn with_max_ring(mut self, max_ring: u32) -> Self {
        self.max_ring = max_ring;
        self
    }

    /// Set the corridor clearance in cells.
    #[must_use]
    pub const fn with_clearance_cells(mut self, clearance_cells: u32) -> Self {
        self.clearance_cells = clearance_cells;
        self
    }

    /// Set the minimum anchor distance.
    #[must_use]
    pub const fn with_min_anchor_clearance(mut self, clearance: f64) -> Self {
        self.min_anchor_clearance = clearance;
        self
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            max_retries: 24,
            max_ring: 3,
            clearance_cells: 1,
            // Half a millimetre.
            min_anchor_clearance: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let scan = ScanConfig::default();
        assert!(scan.cell_size() > 0.0);
        assert!(scan.probe_cells() > 0);
        assert!(scan.down_normal_threshold() < 0.0);

        let route = RouteConfig::default();
        assert!(route.max_retries() > 0);
        assert!(route.min_anchor_clearance() > 0.0);
    }

    #[test]
    fn builders_replace_single_fields() {
        let scan = ScanConfig::default().with_probe_cells(10);
        assert_eq!(scan.probe_cells(), 10);
        // Untouched fields keep their defaults.
        assert!((scan.cell_size() - 0.1).abs() < 1e-12);

        let route = RouteConfig::default()
            .with_max_ring(5)
            .with_clearance_cells(2);
        assert_eq!(route.max_ring(), 5);
        assert_eq!(route.clearance_cells(), 2);
    }
}
