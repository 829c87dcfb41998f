//! Printable support strut geometry.
//!
//! Turns a routed support path into a single composite mesh: a contact
//! sphere biting into the model, a tapered head, a spline-swept body tube
//! and, for plate-anchored supports, a widened platform foot.
//!
//! # Pieces
//!
//! - **Contact and anchor spheres**: oversized UV spheres at both ends
//! - **Head taper**: a cone from the body radius down to the tip radius
//! - **Body tube**: Catmull-Rom spline through the path points, swept with
//!   parallel-transport frames so the tube never twists
//! - **Platform foot**: a tapered cylinder rising from the build plate
//!
//! All dimensions come from a [`SupportDims`], converted once from preset
//! millimetre values into scene units.
//!
//! # Quick Start
//!
//! ```
//! use mesh_support::{build_support, SupportDims};
//! use mesh_types::MeshTopology;
//! use nalgebra::Point3;
//! use support_types::{PathAnchor, SupportPath};
//!
//! // A straight drop from a touchpoint at Z = 2 onto the plate.
//! let path = SupportPath::new(
//!     vec![Point3::new(0.5, 0.5, 1.9), Point3::new(0.5, 0.5, 0.0)],
//!     PathAnchor::Platform,
//! );
//! let dims = SupportDims::from_millimetres(0.4, 0.6, 1.0, 3.0, 3.0);
//!
//! let strut = build_support(&path, Point3::new(0.5, 0.5, 2.0), &dims).unwrap();
//! assert!(strut.face_count() > 1000);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod builder;
mod error;
mod params;
mod primitives;
mod spline;
mod sweep;

pub use builder::build_support;
pub use error::{SupportError, SupportResult};
pub use params::SupportDims;
pub use primitives::{cylinder_between, uv_sphere};
pub use spline::catmull_rom_samples;
pub use sweep::sweep_tube;
