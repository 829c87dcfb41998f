//! Spatial occupancy structures for UVForge.
//!
//! This crate provides the voxel-level machinery behind support-point
//! discovery and route validation:
//!
//! - [`VoxelCoord`] - Integer voxel coordinates
//! - [`GridBounds`] - Axis-aligned bounds in grid space
//! - [`VoxelGrid`] - Sparse 3D voxel lattice keyed by coordinate
//! - [`Ray`] and [`raycast`] - DDA ray traversal through the lattice
//! - [`voxelize_surface`] - Occupancy voxelization of a triangle soup
//!
//! # Coordinate Systems
//!
//! World coordinates are continuous `f64` scene units; grid coordinates are
//! discrete `i32` cells. The grid handles conversion between the two, with
//! its origin anchored to a world-space point so that results do not depend
//! on object ordering.
//!
//! Right-handed axes: X width, Y depth, Z height (build platform at Z = 0).
//!
//! # Example
//!
//! ```
//! use uv_spatial::{VoxelGrid, VoxelCoord};
//! use nalgebra::Point3;
//!
//! let mut grid: VoxelGrid<bool> = VoxelGrid::new(0.1);
//! grid.set(VoxelCoord::new(5, 5, 5), true);
//!
//! let coord = grid.world_to_grid(Point3::new(0.55, 0.55, 0.55));
//! assert_eq!(coord, VoxelCoord::new(5, 5, 5));
//! assert_eq!(grid.get(coord), Some(&true));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod grid;
mod raycast;
mod voxel;
mod voxelize;

pub use error::SpatialError;
pub use grid::{GridBounds, GridBoundsIter, VoxelGrid};
pub use raycast::{line_of_sight, raycast, Ray, RaycastHit, VoxelTraversal};
pub use voxel::VoxelCoord;
pub use voxelize::voxelize_surface;
