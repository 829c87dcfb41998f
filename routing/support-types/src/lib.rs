//! Core types for the support-generation domain.
//!
//! Support generation runs in three stages, and this crate defines the
//! data passed between them:
//!
//! - **Scanning** finds [`Touchpoint`]s: surface points with no material
//!   beneath them, discovered on a voxel occupancy grid built with
//!   [`ScanConfig`] parameters.
//! - **Routing** attaches a [`SupportPath`] to each touchpoint: an ordered
//!   run of points from the touchpoint down to a [`PathAnchor`], searched
//!   under [`RouteConfig`] bounds.
//! - **Building** (mesh-support) turns a routed path into printable
//!   geometry.
//!
//! # Example
//!
//! ```
//! use support_types::{PathAnchor, SupportPath, Touchpoint};
//! use nalgebra::Point3;
//!
//! let mut tp = Touchpoint::new(Point3::new(1.0, 1.0, 2.0), 0);
//! assert!(!tp.is_routed());
//!
//! tp.path = Some(SupportPath::new(
//!     vec![Point3::new(1.0, 1.0, 1.9), Point3::new(1.0, 1.0, 0.0)],
//!     PathAnchor::Platform,
//! ));
//! assert!(tp.is_routed());
//! ```
//!
//! # Units
//!
//! All coordinates and distances are scene units (1 unit = 10 mm), with
//! the build platform at Z = 0.
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all types

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod path;
mod touchpoint;

pub use config::{RouteConfig, ScanConfig};
pub use path::{PathAnchor, SupportPath};
pub use touchpoint::Touchpoint;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn full_touchpoint_lifecycle() {
        let mut tp = Touchpoint::new(Point3::new(0.5, 0.5, 1.0), 3);
        assert_eq!(tp.mesh, 3);
        assert!(!tp.is_routed());

        let path = SupportPath::new(
            vec![
                Point3::new(0.5, 0.5, 0.95),
                Point3::new(0.6, 0.5, 0.5),
                Point3::new(0.6, 0.5, 0.0),
            ],
            PathAnchor::Platform,
        );
        assert!(path.length() > 0.95);
        assert!(path.horizontal_offset() > 0.0);

        tp.path = Some(path);
        assert!(tp.is_routed());
    }

    #[test]
    fn configs_compose_with_builders() {
        let scan = ScanConfig::default()
            .with_cell_size(0.05)
            .with_probe_cells(32);
        let route = RouteConfig::default().with_max_retries(8);
        assert!((scan.cell_size() - 0.05).abs() < 1e-12);
        assert_eq!(scan.probe_cells(), 32);
        assert_eq!(route.max_retries(), 8);
    }
}
