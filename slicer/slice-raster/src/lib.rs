//! Layer rasterization for the slicing pipeline.
//!
//! Slicing a scene at one layer height happens in two steps:
//!
//! 1. [`section_at_height`] intersects mesh triangles with the horizontal
//!    slicing plane, producing segments oriented counter-clockwise around
//!    solid material.
//! 2. [`RasterTarget::rasterize`] scanline-fills the non-zero winding
//!    region of those segments into a monochrome exposure image, which
//!    [`encode_png`] turns into the bytes stored per layer.
//!
//! The world-to-pixel mapping is linear: scene origin `(0, 0)` lands on
//! pixel `(0, 0)` and the workspace grid extent lands on the far image
//! corner. Solid pixels expose at full intensity, everything else stays
//! black.
//!
//! # Quick Start
//!
//! ```
//! use mesh_types::unit_cube;
//! use slice_raster::{section_at_height, RasterTarget};
//!
//! # fn main() -> Result<(), slice_raster::RasterError> {
//! let mut cube = unit_cube();
//! cube.scale_uniform(8.0);
//!
//! let segments = section_at_height(&cube, 4.0);
//! let target = RasterTarget::new(64, 64, 16.0, 16.0)?;
//! let image = target.rasterize(&segments);
//!
//! assert_eq!(image.get_pixel(16, 16)[0], 255);
//! assert_eq!(image.get_pixel(48, 48)[0], 0);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod raster;
mod section;

pub use error::{RasterError, RasterResult};
pub use raster::{encode_png, RasterTarget};
pub use section::{section_at_height, SectionSegment};
