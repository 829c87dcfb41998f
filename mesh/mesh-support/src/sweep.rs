//! Parallel-transport tube sweep along a sampled curve.

// Allow numeric casts inherent to geometry (vertex indices, segment counts)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use crate::error::{SupportError, SupportResult};
use crate::primitives::radial_basis;
use mesh_types::{IndexedMesh, Vertex};
use nalgebra::{Point3, Rotation3, Unit, Vector3};

/// Samples closer than this are treated as the same point.
const MIN_SEGMENT: f64 = 1e-9;

/// Sweeps a closed tube of constant radius along a sampled curve.
///
/// Cross-section rings are oriented with parallel-transport frames, so the
/// tube does not twist around its own axis between samples. Both ends are
/// capped with a centre-vertex fan. Consecutive samples closer than a
/// nanometre are dropped before sweeping.
///
/// # Errors
///
/// Returns [`SupportError::TooFewPoints`] when fewer than two distinct
/// samples remain, [`SupportError::InvalidRadius`] for a non-positive
/// radius and [`SupportError::TooFewSegments`] for fewer than three sides.
///
/// # Examples
///
/// ```
/// use mesh_support::sweep_tube;
/// use mesh_types::MeshTopology;
/// use nalgebra::Point3;
///
/// let curve = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 0.5),
///     Point3::new(0.2, 0.0, 1.0),
/// ];
/// let tube = sweep_tube(&curve, 0.1, 6).unwrap();
/// assert_eq!(tube.vertex_count(), 3 * 6 + 2);
/// ```
pub fn sweep_tube(
    samples: &[Point3<f64>],
    radius: f64,
    sides: usize,
) -> SupportResult<IndexedMesh> {
    if radius <= 0.0 {
        return Err(SupportError::InvalidRadius {
            name: "tube",
            value: radius,
        });
    }
    if sides < 3 {
        return Err(SupportError::TooFewSegments {
            min: 3,
            actual: sides,
        });
    }

    let path = dedup_samples(samples);
    if path.len() < 2 {
        return Err(SupportError::TooFewPoints {
            min: 2,
            actual: path.len(),
        });
    }

    let frames = transport_frames(&path);

    let mut mesh = IndexedMesh::with_capacity(path.len() * sides + 2, path.len() * sides * 2);

    for (point, frame) in path.iter().zip(&frames) {
        for s in 0..sides {
            let angle = 2.0 * std::f64::consts::PI * (s as f64) / (sides as f64);
            let radial = frame.normal * angle.cos() + frame.binormal * angle.sin();
            mesh.vertices
                .push(Vertex::with_normal(point + radial * radius, radial));
        }
    }

    for ring in 0..path.len() - 1 {
        let base = (ring * sides) as u32;
        let next_base = ((ring + 1) * sides) as u32;
        for s in 0..sides {
            let next = (s + 1) % sides;
            let a = base + s as u32;
            let b = base + next as u32;
            let c = next_base + s as u32;
            let d = next_base + next as u32;
            mesh.faces.push([a, b, d]);
            mesh.faces.push([a, d, c]);
        }
    }

    close_ends(&mut mesh, &path, &frames, sides);
    Ok(mesh)
}

/// A cross-section orientation at one curve sample.
#[derive(Debug, Clone, Copy)]
struct Frame {
    tangent: Vector3<f64>,
    normal: Vector3<f64>,
    binormal: Vector3<f64>,
}

/// Per-sample frames with twist-free orientation.
///
/// The first frame picks an arbitrary perpendicular; each later frame
/// rotates the previous one by the rotation carrying the old tangent onto
/// the new, so the normal never spins about the curve.
fn transport_frames(path: &[Point3<f64>]) -> Vec<Frame> {
    let tangents = path_tangents(path);

    let mut frames = Vec::with_capacity(path.len());
    let first_tangent = tangents[0];
    let (mut normal, _) = radial_basis(&first_tangent);
    frames.push(Frame {
        tangent: first_tangent,
        normal,
        binormal: first_tangent.cross(&normal),
    });

    for window in tangents.windows(2) {
        let (prev, curr) = (window[0], window[1]);
        let axis = prev.cross(&curr);
        let dot = prev.dot(&curr).clamp(-1.0, 1.0);
        if axis.norm() > MIN_SEGMENT {
            normal = Rotation3::from_axis_angle(&Unit::new_normalize(axis), dot.acos()) * normal;
        } else if dot < 0.0 {
            // Straight reversal: flip the frame instead of rotating.
            normal = -normal;
        }
        // Keep the normal exactly perpendicular to the tangent.
        normal = (normal - curr * normal.dot(&curr)).normalize();
        frames.push(Frame {
            tangent: curr,
            normal,
            binormal: curr.cross(&normal),
        });
    }
    frames
}

/// Per-point unit tangents: endpoint chords at the ends, averaged chords
/// inside.
fn path_tangents(path: &[Point3<f64>]) -> Vec<Vector3<f64>> {
    let last = path.len() - 1;
    (0..path.len())
        .map(|i| {
            if i == 0 {
                (path[1] - path[0]).normalize()
            } else if i == last {
                (path[last] - path[last - 1]).normalize()
            } else {
                let incoming = (path[i] - path[i - 1]).normalize();
                let outgoing = (path[i + 1] - path[i]).normalize();
                let sum = incoming + outgoing;
                if sum.norm() > MIN_SEGMENT {
                    sum.normalize()
                } else {
                    incoming
                }
            }
        })
        .collect()
}

/// Fan caps over the first and last ring.
fn close_ends(mesh: &mut IndexedMesh, path: &[Point3<f64>], frames: &[Frame], sides: usize) {
    let last_ring = ((path.len() - 1) * sides) as u32;
    let start_centre = mesh.vertices.len() as u32;
    let end_centre = start_centre + 1;

    mesh.vertices
        .push(Vertex::with_normal(path[0], -frames[0].tangent));
    mesh.vertices.push(Vertex::with_normal(
        path[path.len() - 1],
        frames[frames.len() - 1].tangent,
    ));

    for s in 0..sides {
        let next = ((s + 1) % sides) as u32;
        let s = s as u32;
        mesh.faces.push([start_centre, next, s]);
        mesh.faces
            .push([end_centre, last_ring + s, last_ring + next]);
    }
}

/// Drop consecutive samples closer than [`MIN_SEGMENT`].
fn dedup_samples(samples: &[Point3<f64>]) -> Vec<Point3<f64>> {
    let mut path: Vec<Point3<f64>> = Vec::with_capacity(samples.len());
    for &sample in samples {
        if path
            .last()
            .map_or(true, |prev| (sample - prev).norm() > MIN_SEGMENT)
        {
            path.push(sample);
        }
    }
    path
}
