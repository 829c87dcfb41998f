//! Triangle type for geometric calculations.

use crate::Aabb;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle with concrete vertex positions.
///
/// This is the unit of work for voxelization, ray intersection, and layer
/// cross-sectioning. It stores actual positions rather than indices.
///
/// Winding is **counter-clockwise (CCW) when viewed from the front**
/// (normal points toward the viewer).
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// assert!((tri.area() - 0.5).abs() < 1e-10);
/// let normal = tri.normal().unwrap();
/// assert!((normal.z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// The three vertices in winding order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Compute the (unnormalized) face normal via cross product.
    ///
    /// The direction follows the right-hand rule with CCW winding.
    /// The magnitude equals twice the triangle's area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2)
    }

    /// Compute the unit face normal.
    ///
    /// Returns `None` for degenerate triangles (zero area).
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let degenerate = Triangle::new(
    ///     Point3::origin(),
    ///     Point3::origin(),
    ///     Point3::new(1.0, 0.0, 0.0),
    /// );
    /// assert!(degenerate.normal().is_none());
    /// ```
    #[inline]
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let n = self.normal_unnormalized();
        let len = n.norm();
        if len < f64::EPSILON {
            None
        } else {
            Some(n / len)
        }
    }

    /// Triangle area.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Whether the triangle has (near) zero area.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.area() < 1e-12
    }

    /// Centroid (average of the three vertices).
    #[inline]
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::new(
            (self.v0.x + self.v1.x + self.v2.x) / 3.0,
            (self.v0.y + self.v1.y + self.v2.y) / 3.0,
            (self.v0.z + self.v1.z + self.v2.z) / 3.0,
        )
    }

    /// Bounding box of the triangle.
    #[inline]
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        let mut aabb = Aabb::new(self.v0, self.v1);
        aabb.expand_to_include(&self.v2);
        aabb
    }

    /// Lowest Z coordinate among the vertices.
    #[inline]
    #[must_use]
    pub fn min_z(&self) -> f64 {
        self.v0.z.min(self.v1.z).min(self.v2.z)
    }

    /// Highest Z coordinate among the vertices.
    #[inline]
    #[must_use]
    pub fn max_z(&self) -> f64 {
        self.v0.z.max(self.v1.z).max(self.v2.z)
    }

    /// Point at barycentric coordinates `(u, v)` with `w = 1 - u - v`.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let tri = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(3.0, 0.0, 0.0),
    ///     Point3::new(0.0, 3.0, 0.0),
    /// );
    /// let p = tri.point_at(1.0 / 3.0, 1.0 / 3.0);
    /// assert!((p.x - 1.0).abs() < 1e-10);
    /// ```
    #[inline]
    #[must_use]
    pub fn point_at(&self, u: f64, v: f64) -> Point3<f64> {
        let w = 1.0 - u - v;
        Point3::new(
            self.v0.x * w + self.v1.x * u + self.v2.x * v,
            self.v0.y * w + self.v1.y * u + self.v2.y * v,
            self.v0.z * w + self.v1.z * u + self.v2.z * v,
        )
    }
}
