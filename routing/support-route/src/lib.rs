//! Collision-aware descent routing for support generation.
//!
//! Each touchpoint found by the free-space scan needs a path down to
//! something that can hold it: the build platform, or another surface
//! of the scene. This crate searches for that path with the collision
//! index ([`mesh_collide::SceneIndex`]) for anchoring and the scan's
//! occupancy grid for corridor clearance:
//!
//! 1. Drop a vertical ray from just below the touchpoint. A surface hit
//!    anchors the support there; a clear drop anchors it on the platform.
//! 2. Walk the candidate corridor through the occupancy grid, requiring
//!    a clearance ring of free cells around it (contact cells at both
//!    ends exempt).
//! 3. If blocked, retry with laterally offset descents on a growing ring
//!    schedule, cheapest candidate first, up to a retry budget.
//!
//! Routing failures are per-touchpoint and non-fatal: the touchpoint is
//! simply left unrouted and later skipped by the mesh builder.
//!
//! # Quick Start
//!
//! ```
//! use mesh_collide::{SceneEntry, SceneIndex};
//! use mesh_transform::Transform3D;
//! use mesh_types::{unit_cube, Vector3};
//! use support_route::route_touchpoints;
//! use support_scan::{scan_scene, ScanMesh};
//! use support_types::{RouteConfig, ScanConfig};
//!
//! let cube = unit_cube();
//! let lifted = Transform3D::from_translation(Vector3::new(0.0, 0.0, 2.0));
//!
//! let mut scan = scan_scene(
//!     &[ScanMesh { id: 0, mesh: &cube, transform: lifted }],
//!     &ScanConfig::default(),
//! );
//! let scene = SceneIndex::build(&[SceneEntry { id: 0, mesh: &cube, transform: lifted }]);
//!
//! let routed = route_touchpoints(
//!     &mut scan.touchpoints,
//!     &scene,
//!     &scan.occupancy,
//!     &RouteConfig::default(),
//! );
//! assert_eq!(routed, scan.touchpoints.len());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod route;

pub use route::{route_touchpoint, route_touchpoints};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use mesh_collide::{SceneEntry, SceneIndex};
    use mesh_transform::Transform3D;
    use mesh_types::{unit_cube, Vector3};
    use support_scan::{scan_scene, ScanMesh};
    use support_types::{PathAnchor, RouteConfig, ScanConfig};

    /// Scan and route a floating cube end to end: every touchpoint gets
    /// a platform-anchored path that starts under its surface point.
    #[test]
    fn scan_then_route_floating_cube() {
        let cube = unit_cube();
        let lifted = Transform3D::from_translation(Vector3::new(0.0, 0.0, 2.0));
        let scan_config = ScanConfig::default();

        let mut scan = scan_scene(
            &[ScanMesh {
                id: 0,
                mesh: &cube,
                transform: lifted,
            }],
            &scan_config,
        );
        assert!(!scan.touchpoints.is_empty());

        let scene = SceneIndex::build(&[SceneEntry {
            id: 0,
            mesh: &cube,
            transform: lifted,
        }]);
        let routed = route_touchpoints(
            &mut scan.touchpoints,
            &scene,
            &scan.occupancy,
            &RouteConfig::default(),
        );
        assert_eq!(routed, scan.touchpoints.len());

        for tp in &scan.touchpoints {
            let path = tp.path.as_ref().unwrap();
            assert_eq!(path.anchor(), PathAnchor::Platform);

            let start = path.start().unwrap();
            let end = path.end().unwrap();
            // Seat directly below the touchpoint, anchor on the plate.
            assert!((start.x - tp.position.x).abs() < 1e-9);
            assert!((start.y - tp.position.y).abs() < 1e-9);
            assert!(start.z < tp.position.z);
            assert!(end.z.abs() < 1e-12);
        }
    }
}
