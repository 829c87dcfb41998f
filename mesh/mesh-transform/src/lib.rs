//! Placement transforms for UVForge.
//!
//! Scene objects carry a [`Transform3D`] world placement: a 4x4 homogeneous
//! matrix composed from translation, rotation, and scale. The collision
//! index compares transform snapshots to detect staleness, and the slicing
//! snapshot bakes transforms into world-space triangles.
//!
//! # Example
//!
//! ```
//! use mesh_transform::Transform3D;
//! use nalgebra::{Point3, Vector3};
//!
//! let t = Transform3D::from_translation(Vector3::new(0.0, 0.0, 5.0));
//! let p = t.transform_point(&Point3::origin());
//! assert!((p.z - 5.0).abs() < 1e-12);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod transform;

pub use transform::Transform3D;
