//! Voxel free-space analysis for support generation.
//!
//! This crate finds the surface points of a printed scene that would cure
//! over thin air: it discretizes every mesh into a shared occupancy grid
//! (via [`uv_spatial::voxelize_surface`]), samples downward-facing
//! triangles, and probes straight down from each sample. A sample with no
//! material within the probe budget, or with a clear drop to the build
//! platform, becomes a [`support_types::Touchpoint`] for the router to
//! connect.
//!
//! # Quick Start
//!
//! ```
//! use mesh_transform::Transform3D;
//! use mesh_types::{unit_cube, Vector3};
//! use support_scan::{find_touchpoints, ScanMesh};
//! use support_types::ScanConfig;
//!
//! let cube = unit_cube();
//! let entries = [ScanMesh {
//!     id: 0,
//!     mesh: &cube,
//!     transform: Transform3D::from_translation(Vector3::new(0.0, 0.0, 2.0)),
//! }];
//!
//! let touchpoints = find_touchpoints(&entries, &ScanConfig::default());
//! assert!(!touchpoints.is_empty());
//! assert!(touchpoints.iter().all(|tp| !tp.is_routed()));
//! ```
//!
//! # Guarantees
//!
//! - A mesh resting flush on the platform produces no touchpoints.
//! - Touchpoints respect the configured minimum horizontal spacing, and
//!   the lowest sample of a cluster wins.
//! - Output order is deterministic for a given scene and configuration.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod scan;

pub use scan::{find_touchpoints, scan_scene, SceneScan, ScanMesh};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use mesh_transform::Transform3D;
    use mesh_types::{unit_cube, Vector3};
    use support_types::ScanConfig;

    /// A gap wider than the probe budget reads as unsupported; one inside
    /// the budget reads as held up by the mesh below.
    #[test]
    fn probe_budget_bounds_the_drop() {
        let cube = unit_cube();
        let lower = ScanMesh {
            id: 0,
            mesh: &cube,
            transform: Transform3D::identity(),
        };
        let upper = ScanMesh {
            id: 1,
            mesh: &cube,
            // 3.5 cells of air between the lower cube's top and this one.
            transform: Transform3D::from_translation(Vector3::new(0.0, 0.0, 1.35)),
        };
        let entries = [lower, upper];

        // Default budget (8 cells) sees the lower cube through the gap.
        let found = find_touchpoints(&entries, &ScanConfig::default());
        assert!(found.is_empty());

        // A 2-cell budget runs out inside the gap.
        let short_probe = ScanConfig::default().with_probe_cells(2);
        let found = find_touchpoints(&entries, &short_probe);
        assert!(!found.is_empty());
        for tp in &found {
            assert_eq!(tp.mesh, 1);
            assert!((tp.position.z - 1.35).abs() < 1e-9);
        }
    }

    /// Two overlapping columns of touchpoint candidates at different
    /// heights collapse onto the lower one.
    #[test]
    fn lowest_candidate_wins_across_meshes() {
        let cube = unit_cube();
        let place = |dx: f64, dz: f64| {
            Transform3D::from_uniform_scale(0.1)
                .then(&Transform3D::from_translation(Vector3::new(dx, 0.0, dz)))
        };
        let low = ScanMesh {
            id: 7,
            mesh: &cube,
            transform: place(0.0, 1.0),
        };
        let high = ScanMesh {
            id: 8,
            mesh: &cube,
            transform: place(0.02, 2.0),
        };

        let found = find_touchpoints(&[low, high], &ScanConfig::default());
        assert!(!found.is_empty());
        for tp in &found {
            assert_eq!(tp.mesh, 7);
            assert!((tp.position.z - 1.0).abs() < 1e-9);
        }
    }
}
