//! Geometry-to-manufacturing pipeline for masked-LCD resin printers.
//!
//! This umbrella crate re-exports the whole pipeline: spatial analysis,
//! mesh handling, collision-aware support routing, procedural support
//! construction, and the slicing engine that turns a scene into
//! per-layer exposure masks plus a print script.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use uvforge::prelude::*;
//! use uvforge::profile::{PrintSettings, Resolution, Workspace};
//!
//! # fn main() -> Result<(), uvforge::engine::SliceError> {
//! let profile = PrinterProfile {
//!     resolution: Resolution { x: 32, y: 32 },
//!     workspace: Workspace {
//!         size_x: 160.0,
//!         size_y: 160.0,
//!         height: 160.0,
//!     },
//!     print_settings: PrintSettings {
//!         layer_height: 5.0,
//!         ..PrintSettings::default()
//!     },
//!     ..PrinterProfile::default()
//! };
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let mut engine = SliceEngine::new(profile, storage.clone(), |_| {}).with_workers(2);
//!
//! // Float a model above the plate, prop it up, then slice.
//! let lifted = Transform3D::from_translation(uvforge::types::Vector3::new(0.0, 0.0, 2.0));
//! engine
//!     .registry_mut()
//!     .insert(SceneMesh::with_transform(unit_cube(), lifted));
//! let report = engine.generate_supports(&ScanConfig::default(), &RouteConfig::default());
//! assert!(report.found > 0);
//!
//! let summary = engine.run("demo")?;
//! assert_eq!(summary.outcome, RunOutcome::Completed);
//! assert_eq!(storage.image_count(), summary.layer_count as usize);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! ## Foundation
//! - [`spatial`] - Voxel grid, DDA raycast, surface voxelization
//! - [`types`] - Core geometry: `IndexedMesh`, `Vertex`, `Triangle`, `Aabb`
//! - [`transform`] - World placement via homogeneous transforms
//!
//! ## Support Generation
//! - [`collide`] - Triangle BVH and the scene collision index
//! - [`routing`] - Touchpoints, support paths, scan and route configs
//! - [`scan`] - Voxel free-space analysis for unsupported surfaces
//! - [`route`] - Collision-aware descent routing
//! - [`support`] - Spline-swept support strut construction
//!
//! ## Slicing
//! - [`profile`] - Printer profile, support preset, G-code templates
//! - [`raster`] - Cross-sections and scanline rasterization to PNG
//! - [`script`] - Print script assembly
//! - [`engine`] - Scene registry, worker pool, storage, orchestration

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

/// Voxel grid, DDA raycast, surface voxelization.
pub use uv_spatial as spatial;

/// Core geometry: `IndexedMesh`, `Vertex`, `Triangle`, `Aabb`.
pub use mesh_types as types;

/// World placement via homogeneous transforms.
pub use mesh_transform as transform;

/// Triangle BVH and the scene collision index.
pub use mesh_collide as collide;

/// Spline-swept support strut construction.
pub use mesh_support as support;

/// Touchpoints, support paths, scan and route configuration records.
pub use support_types as routing;

/// Voxel free-space analysis for unsupported surfaces.
pub use support_scan as scan;

/// Collision-aware descent routing.
pub use support_route as route;

/// Printer profile, support preset, G-code templates.
pub use slice_profile as profile;

/// Cross-sections and scanline rasterization to PNG.
pub use slice_raster as raster;

/// Print script assembly.
pub use slice_script as script;

/// Scene registry, worker pool, storage and run orchestration.
pub use slice_engine as engine;

/// Common imports for driving the pipeline.
///
/// # Usage
///
/// ```
/// use uvforge::prelude::*;
/// ```
pub mod prelude {
    pub use mesh_collide::SceneIndex;
    pub use mesh_support::{build_support, SupportDims};
    pub use mesh_transform::Transform3D;
    pub use mesh_types::{unit_cube, Aabb, IndexedMesh, MeshBounds, MeshTopology, Triangle, Vertex};
    pub use slice_engine::{
        DirectoryStorage, MemoryStorage, MeshRegistry, RunOutcome, SceneMesh, SliceEngine,
        SliceStorage,
    };
    pub use slice_profile::{PrinterProfile, SupportPreset};
    pub use support_route::route_touchpoints;
    pub use support_scan::{find_touchpoints, scan_scene, ScanMesh};
    pub use support_types::{PathAnchor, RouteConfig, ScanConfig, SupportPath, Touchpoint};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prelude_names_resolve() {
        use prelude::*;

        let mesh = IndexedMesh::new();
        assert_eq!(mesh.vertex_count(), 0);
        assert!(ScanConfig::default().cell_size() > 0.0);
        let _ = Transform3D::identity();
    }

    #[test]
    fn module_reexports_resolve() {
        let _ = types::IndexedMesh::new();
        let _ = spatial::VoxelGrid::<bool>::new(0.1);
        let _ = profile::PrinterProfile::default();
        let _ = routing::RouteConfig::default();
        assert!(engine::MeshRegistry::new().is_empty());
    }
}
