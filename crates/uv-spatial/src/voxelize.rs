//! Occupancy voxelization of triangle surfaces.

use nalgebra::Point3;

use crate::error::SpatialError;
use crate::grid::VoxelGrid;

/// Voxelize a triangle soup into a surface occupancy grid.
///
/// Every cell touched by a triangle surface is marked `true`. The grid
/// origin is anchored to the minimum corner of the combined bounding
/// volume, so the same geometry always lands in the same cells no matter
/// how the triangle list is ordered.
///
/// Triangles are covered by sampling a barycentric lattice whose spacing
/// is at most half a cell, which guarantees no cell crossed by the surface
/// is skipped. Degenerate triangles reduce to line or point samples and
/// need no special handling.
///
/// An empty triangle list yields an empty grid.
///
/// # Errors
///
/// Returns [`SpatialError::InvalidCellSize`] when `cell_size <= 0`.
///
/// # Example
///
/// ```
/// use uv_spatial::voxelize_surface;
/// use nalgebra::Point3;
///
/// let floor = [[
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ]];
/// let grid = voxelize_surface(&floor, 0.25).unwrap();
/// assert!(!grid.is_empty());
/// assert!(grid.contains_at_world(Point3::new(0.1, 0.1, 0.0)));
/// ```
pub fn voxelize_surface(
    triangles: &[[Point3<f64>; 3]],
    cell_size: f64,
) -> Result<VoxelGrid<bool>, SpatialError> {
    if cell_size <= 0.0 || !cell_size.is_finite() {
        return Err(SpatialError::InvalidCellSize(cell_size));
    }

    let Some(origin) = min_corner(triangles) else {
        return Ok(VoxelGrid::new(cell_size));
    };

    let mut grid = VoxelGrid::with_origin(cell_size, origin);
    let max_spacing = cell_size * 0.5;

    for tri in triangles {
        sample_triangle(&mut grid, tri, max_spacing);
    }

    Ok(grid)
}

fn min_corner(triangles: &[[Point3<f64>; 3]]) -> Option<Point3<f64>> {
    let mut min: Option<Point3<f64>> = None;
    for tri in triangles {
        for p in tri {
            min = Some(match min {
                None => *p,
                Some(m) => Point3::new(m.x.min(p.x), m.y.min(p.y), m.z.min(p.z)),
            });
        }
    }
    min
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sample_triangle(grid: &mut VoxelGrid<bool>, tri: &[Point3<f64>; 3], max_spacing: f64) {
    let [a, b, c] = *tri;
    let e1 = b - a;
    let e2 = c - a;
    let longest_edge = e1.norm().max(e2.norm()).max((c - b).norm());

    // Lattice fine enough that adjacent samples are under half a cell
    // apart along every edge.
    let n = (longest_edge / max_spacing).ceil().max(1.0) as u32;
    let inv_n = 1.0 / f64::from(n);

    for i in 0..=n {
        for j in 0..=(n - i) {
            let u = f64::from(i) * inv_n;
            let v = f64::from(j) * inv_n;
            let p = a + e1 * u + e2 * v;
            grid.set_at_world(p, true);
        }
    }
}
