//! Non-zero winding scanline fill of oriented section segments.

// Pixel arithmetic moves between f64 coordinates and integer indices
// throughout.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use crate::error::{RasterError, RasterResult};
use crate::section::SectionSegment;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder, Luma};
use std::ops::Range;

/// Exposure value for solid pixels.
const SOLID: Luma<u8> = Luma([255]);

/// A raster plane mapping the workspace grid onto printer pixels.
///
/// World XY in scene units maps linearly onto the image: `(0, 0)` lands on
/// pixel `(0, 0)` and the grid extent lands on the far corner. A pixel is
/// exposed when its centre lies inside the non-zero winding region of the
/// layer sections.
#[derive(Debug, Clone)]
pub struct RasterTarget {
    width: u32,
    height: u32,
    grid_x: f64,
    grid_y: f64,
}

impl RasterTarget {
    /// Create a target for a printer resolution over a workspace grid
    /// given in scene units.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::ZeroResolution`] or
    /// [`RasterError::InvalidGrid`] for an empty target.
    pub fn new(width: u32, height: u32, grid_x: f64, grid_y: f64) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::ZeroResolution { width, height });
        }
        if grid_x <= 0.0 || grid_y <= 0.0 {
            return Err(RasterError::InvalidGrid {
                x: grid_x,
                y: grid_y,
            });
        }
        Ok(Self {
            width,
            height,
            grid_x,
            grid_y,
        })
    }

    /// Image width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Fill the union of all cross-sections into a monochrome image.
    ///
    /// Winding numbers add across segments, so overlapping solids merge
    /// and clockwise cavity contours cancel back to empty. Geometry
    /// outside the grid is clipped.
    #[must_use]
    pub fn rasterize(&self, segments: &[SectionSegment]) -> GrayImage {
        let mut image = GrayImage::new(self.width, self.height);
        let edges = self.scan_edges(segments);

        // Bucket edges by the scanlines they straddle.
        let mut rows: Vec<Vec<usize>> = vec![Vec::new(); self.height as usize];
        for (index, edge) in edges.iter().enumerate() {
            let lo = edge.y0.min(edge.y1);
            let hi = edge.y0.max(edge.y1);
            for row in covered(lo, hi, self.height) {
                rows[row as usize].push(index);
            }
        }

        let mut crossings: Vec<(f64, i32)> = Vec::new();
        for (row, bucket) in rows.iter().enumerate() {
            let sample_y = row as f64 + 0.5;
            crossings.clear();
            crossings.extend(bucket.iter().map(|&index| {
                let edge = &edges[index];
                (edge.crossing_x(sample_y), edge.winding)
            }));
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            let mut opened = 0.0;
            for &(x, step) in &crossings {
                if winding == 0 {
                    opened = x;
                }
                winding += step;
                if winding == 0 {
                    for col in covered(opened, x, self.width) {
                        image.put_pixel(col, row as u32, SOLID);
                    }
                }
            }
        }
        image
    }

    /// Project segments into pixel space, dropping the horizontal ones
    /// that never cross a scanline centre.
    fn scan_edges(&self, segments: &[SectionSegment]) -> Vec<ScanEdge> {
        let scale_x = f64::from(self.width) / self.grid_x;
        let scale_y = f64::from(self.height) / self.grid_y;
        segments
            .iter()
            .filter_map(|segment| {
                let y0 = segment.start.y * scale_y;
                let y1 = segment.end.y * scale_y;
                if (y1 - y0).abs() < f64::EPSILON {
                    return None;
                }
                Some(ScanEdge {
                    x0: segment.start.x * scale_x,
                    y0,
                    x1: segment.end.x * scale_x,
                    y1,
                    winding: if y1 > y0 { 1 } else { -1 },
                })
            })
            .collect()
    }
}

/// One section segment in pixel space with its winding step.
#[derive(Debug)]
struct ScanEdge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    winding: i32,
}

impl ScanEdge {
    /// X position where the edge crosses the scanline at `y`.
    fn crossing_x(&self, y: f64) -> f64 {
        let t = (y - self.y0) / (self.y1 - self.y0);
        self.x0 + (self.x1 - self.x0) * t
    }
}

/// Pixels along one axis whose centre lies in `[from, to)`, clamped to
/// the image.
fn covered(from: f64, to: f64, limit: u32) -> Range<u32> {
    let first = ((from - 0.5).ceil().max(0.0) as u32).min(limit);
    let last = ((to - 0.5).ceil().max(0.0) as u32).min(limit);
    first..last
}

/// Encode a rasterized layer as PNG bytes.
///
/// # Errors
///
/// Returns [`RasterError::Encode`] when the underlying encoder fails.
pub fn encode_png(image: &GrayImage) -> RasterResult<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::L8,
    )?;
    Ok(bytes)
}
