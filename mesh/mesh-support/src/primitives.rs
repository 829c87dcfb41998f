//! Sphere and cylinder primitives for strut ends.

// Allow numeric casts inherent to geometry (vertex indices, segment counts)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use mesh_types::{IndexedMesh, Vertex};
use nalgebra::{Point3, Vector3};

use std::f64::consts::PI;

/// Generates a UV sphere around a centre point.
///
/// `segments` runs around the equator, `rings` from pole to pole. Counts
/// below 3 segments or 2 rings are raised to those minimums. Vertex
/// normals point radially outward.
///
/// # Examples
///
/// ```
/// use mesh_support::uv_sphere;
/// use mesh_types::MeshTopology;
/// use nalgebra::Point3;
///
/// let sphere = uv_sphere(Point3::origin(), 0.5, 9, 9);
/// assert_eq!(sphere.vertex_count(), 2 + 8 * 9);
/// ```
#[must_use]
pub fn uv_sphere(centre: Point3<f64>, radius: f64, segments: usize, rings: usize) -> IndexedMesh {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let mut mesh = IndexedMesh::with_capacity((rings - 1) * segments + 2, rings * segments * 2);

    mesh.vertices.push(Vertex::with_normal(
        centre + Vector3::z() * radius,
        Vector3::z(),
    ));
    for ring in 1..rings {
        let polar = PI * (ring as f64) / (rings as f64);
        for s in 0..segments {
            let azimuth = 2.0 * PI * (s as f64) / (segments as f64);
            let radial = Vector3::new(
                polar.sin() * azimuth.cos(),
                polar.sin() * azimuth.sin(),
                polar.cos(),
            );
            mesh.vertices
                .push(Vertex::with_normal(centre + radial * radius, radial));
        }
    }
    let bottom = mesh.vertices.len() as u32;
    mesh.vertices.push(Vertex::with_normal(
        centre - Vector3::z() * radius,
        -Vector3::z(),
    ));

    let ring_base = |ring: usize| (1 + (ring - 1) * segments) as u32;

    for s in 0..segments {
        let next = (s + 1) % segments;
        mesh.faces
            .push([0, ring_base(1) + s as u32, ring_base(1) + next as u32]);
        let last = ring_base(rings - 1);
        mesh.faces
            .push([bottom, last + next as u32, last + s as u32]);
    }

    for ring in 1..rings - 1 {
        let upper = ring_base(ring);
        let lower = ring_base(ring + 1);
        for s in 0..segments {
            let next = (s + 1) % segments;
            let a = upper + s as u32;
            let b = upper + next as u32;
            let c = lower + s as u32;
            let d = lower + next as u32;
            mesh.faces.push([a, c, d]);
            mesh.faces.push([a, d, b]);
        }
    }

    mesh
}

/// Generates a tapered cylinder between two points.
///
/// The radius interpolates from `start_radius` at `start` to `end_radius`
/// at `end`. Both ends are capped. Returns `None` when the two points
/// coincide.
///
/// # Examples
///
/// ```
/// use mesh_support::cylinder_between;
/// use mesh_types::MeshTopology;
/// use nalgebra::Point3;
///
/// let head = cylinder_between(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 1.0),
///     0.1,
///     0.04,
///     6,
/// )
/// .unwrap();
/// assert_eq!(head.face_count(), 24);
/// ```
#[must_use]
pub fn cylinder_between(
    start: Point3<f64>,
    end: Point3<f64>,
    start_radius: f64,
    end_radius: f64,
    segments: usize,
) -> Option<IndexedMesh> {
    let segments = segments.max(3);
    let axis = end - start;
    let length = axis.norm();
    if length < f64::EPSILON {
        return None;
    }
    let axis = axis / length;
    let (u, v) = radial_basis(&axis);
    // Cone surfaces lean their normals along the axis by the taper rate.
    let taper = (end_radius - start_radius) / length;

    let mut mesh = IndexedMesh::with_capacity(segments * 2 + 2, segments * 4);

    for s in 0..segments {
        let angle = 2.0 * PI * (s as f64) / (segments as f64);
        let radial = u * angle.cos() + v * angle.sin();
        let normal = (radial - axis * taper).normalize();
        mesh.vertices
            .push(Vertex::with_normal(start + radial * start_radius, normal));
        mesh.vertices
            .push(Vertex::with_normal(end + radial * end_radius, normal));
    }

    let start_centre = mesh.vertices.len() as u32;
    let end_centre = start_centre + 1;
    mesh.vertices.push(Vertex::with_normal(start, -axis));
    mesh.vertices.push(Vertex::with_normal(end, axis));

    for s in 0..segments {
        let next = (s + 1) % segments;
        let a = (s * 2) as u32;
        let b = (next * 2) as u32;
        let c = a + 1;
        let d = b + 1;
        mesh.faces.push([a, b, d]);
        mesh.faces.push([a, d, c]);
        mesh.faces.push([start_centre, b, a]);
        mesh.faces.push([end_centre, c, d]);
    }

    Some(mesh)
}

/// An orthonormal pair perpendicular to the axis, seeded from the world
/// axis the input is least aligned with.
pub(crate) fn radial_basis(axis: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let reference = if axis.x.abs() <= axis.y.abs() && axis.x.abs() <= axis.z.abs() {
        Vector3::x()
    } else if axis.y.abs() <= axis.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let u = axis.cross(&reference).normalize();
    let v = axis.cross(&u);
    (u, v)
}
