//! Homogeneous 3D transform.

use mesh_types::IndexedMesh;
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 3D affine transform stored as a 4x4 homogeneous matrix.
///
/// Points transform with `w = 1` (translation applies); vectors transform
/// with `w = 0` (translation ignored). Composition is right-to-left:
/// `a.then(&b)` applies `a` first, then `b`.
///
/// # Example
///
/// ```
/// use mesh_transform::Transform3D;
/// use nalgebra::{Point3, Vector3};
///
/// let place = Transform3D::from_uniform_scale(2.0)
///     .then(&Transform3D::from_translation(Vector3::new(1.0, 0.0, 0.0)));
/// let p = place.transform_point(&Point3::new(1.0, 0.0, 0.0));
/// assert!((p.x - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform3D {
    matrix: Matrix4<f64>,
}

impl Transform3D {
    /// The identity transform.
    #[inline]
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Wrap an existing homogeneous matrix.
    #[inline]
    #[must_use]
    pub const fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// A pure translation.
    #[inline]
    #[must_use]
    pub fn from_translation(offset: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&offset),
        }
    }

    /// A uniform scale about the origin.
    #[inline]
    #[must_use]
    pub fn from_uniform_scale(factor: f64) -> Self {
        Self {
            matrix: Matrix4::new_scaling(factor),
        }
    }

    /// A per-axis scale about the origin.
    #[inline]
    #[must_use]
    pub fn from_scale(factors: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&factors),
        }
    }

    /// A rotation of `angle` radians about `axis` (Rodrigues' formula).
    ///
    /// A near-zero axis yields the identity.
    #[must_use]
    pub fn from_rotation(axis: Vector3<f64>, angle: f64) -> Self {
        let len = axis.norm();
        if len < f64::EPSILON {
            return Self::identity();
        }
        let scaled = axis * (angle / len);
        Self {
            matrix: Matrix4::from_scaled_axis(scaled),
        }
    }

    /// The underlying homogeneous matrix.
    #[inline]
    #[must_use]
    pub const fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Compose: apply `self` first, then `next`.
    #[inline]
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        Self {
            matrix: next.matrix * self.matrix,
        }
    }

    /// Transform a point (`w = 1`, translation applies).
    #[inline]
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let h = self.matrix * Vector4::new(point.x, point.y, point.z, 1.0);
        Point3::new(h.x, h.y, h.z)
    }

    /// Transform a direction vector (`w = 0`, translation ignored).
    #[inline]
    #[must_use]
    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        let h = self.matrix * Vector4::new(vector.x, vector.y, vector.z, 0.0);
        Vector3::new(h.x, h.y, h.z)
    }

    /// The inverse transform, or `None` for a singular matrix.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }

    /// Apply this transform to every vertex of a mesh, returning the
    /// world-space copy.
    ///
    /// Normals are transformed as directions and re-normalized, which is
    /// exact for rigid transforms and uniform scales.
    #[must_use]
    pub fn apply_to_mesh(&self, mesh: &IndexedMesh) -> IndexedMesh {
        let mut out = mesh.clone();
        for v in &mut out.vertices {
            v.position = self.transform_point(&v.position);
            let n = self.transform_vector(&v.normal);
            let len = n.norm();
            v.normal = if len > f64::EPSILON { n / len } else { n };
        }
        out
    }
}

impl Default for Transform3D {
    #[inline]
    fn default() -> Self {
        Self::identity()
    }
}
