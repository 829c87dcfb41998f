//! Collision queries for UVForge.
//!
//! This crate accelerates ray/mesh intersection with a bounding volume
//! hierarchy and wraps it in a scene-level index:
//!
//! - [`Bvh`] - BVH over a triangle soup with ordered ray queries
//! - [`SceneIndex`] - merged-scene index with per-mesh transform
//!   snapshots and staleness detection
//! - [`RayHit`] - one intersection, carrying distance, point, triangle,
//!   and owning mesh
//!
//! Support routing casts rays through the [`SceneIndex`] to find anchor
//! surfaces below touchpoints; pick queries use the same index.
//!
//! # Determinism
//!
//! Query results are sorted by ascending distance with ties broken by
//! triangle index, so repeated queries against an unchanged index return
//! identical hit lists.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bvh;
mod intersect;
mod scene;

pub use bvh::{Bvh, BvhStats};
pub use intersect::{ray_aabb_entry, ray_triangle_intersection};
pub use scene::{RayHit, SceneEntry, SceneIndex};

// The shared ray type used across the routing stack.
pub use uv_spatial::Ray;
