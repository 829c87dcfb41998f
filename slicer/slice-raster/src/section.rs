//! Horizontal plane sections of a triangle mesh.
//!
//! A slicing plane at height `z` cuts every triangle that straddles it in
//! a line segment. Segments are oriented so that walking `start` to `end`
//! keeps solid material on the left: contours around solids run
//! counter-clockwise viewed from above, contours around cavities run
//! clockwise. The raster stage relies on this to fill with the non-zero
//! winding rule.

use mesh_types::{IndexedMesh, Triangle};
use nalgebra::{Point2, Point3, Vector3};

/// Edges closer to parallel than this to the slicing plane produce no
/// crossing.
const PARALLEL_EPS: f64 = 1e-10;

/// One oriented crossing segment in the slicing plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSegment {
    /// Segment start in the plane, scene units.
    pub start: Point2<f64>,
    /// Segment end in the plane, scene units.
    pub end: Point2<f64>,
}

/// Intersect a mesh with the horizontal plane at `z`.
///
/// Each triangle straddling the plane contributes one oriented segment.
/// Triangles lying in the plane, sitting entirely on one side of it, or
/// too degenerate to orient contribute nothing.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use slice_raster::section_at_height;
///
/// // Four walls, two triangles each.
/// let segments = section_at_height(&unit_cube(), 0.5);
/// assert_eq!(segments.len(), 8);
/// ```
#[must_use]
pub fn section_at_height(mesh: &IndexedMesh, z: f64) -> Vec<SectionSegment> {
    mesh.triangles()
        .filter_map(|tri| triangle_section(&tri, z))
        .collect()
}

/// The oriented crossing of one triangle, or `None` when it misses the
/// plane.
fn triangle_section(tri: &Triangle, z: f64) -> Option<SectionSegment> {
    let verts = tri.vertices();
    let edges = [
        (verts[0], verts[1]),
        (verts[1], verts[2]),
        (verts[2], verts[0]),
    ];

    let mut hits = Vec::with_capacity(2);
    for (a, b) in edges {
        if let Some(point) = edge_crossing(a, b, z) {
            hits.push(point);
        }
    }
    if hits.len() != 2 {
        return None;
    }

    // The section runs along the plane normal crossed with the face
    // normal, which is what makes solid contours counter-clockwise.
    let along = Vector3::z().cross(&tri.normal()?);
    let mut start = hits[0];
    let mut end = hits[1];
    if (end - start).dot(&along) < 0.0 {
        std::mem::swap(&mut start, &mut end);
    }
    Some(SectionSegment {
        start: Point2::new(start.x, start.y),
        end: Point2::new(end.x, end.y),
    })
}

/// Where the edge `a -> b` crosses the plane at `z`, if it does.
fn edge_crossing(a: Point3<f64>, b: Point3<f64>, z: f64) -> Option<Point3<f64>> {
    let d_a = a.z - z;
    let d_b = b.z - z;

    // Both endpoints strictly on the same side.
    if d_a * d_b > 0.0 {
        return None;
    }
    // The edge runs along the plane.
    if (d_a - d_b).abs() < PARALLEL_EPS {
        return None;
    }

    let t = d_a / (d_a - d_b);
    Some(a + (b - a) * t)
}
