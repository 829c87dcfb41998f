//! Vertex type.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mesh vertex: a position with an outward normal.
///
/// The normal defaults to zero and is filled in either by the primitive
/// generators or by [`IndexedMesh::compute_vertex_normals`].
///
/// [`IndexedMesh::compute_vertex_normals`]: crate::IndexedMesh::compute_vertex_normals
///
/// # Example
///
/// ```
/// use mesh_types::{Vertex, Point3, Vector3};
///
/// let v = Vertex::with_normal(Point3::new(1.0, 2.0, 3.0), Vector3::z());
/// assert_eq!(v.position.x, 1.0);
/// assert_eq!(v.normal.z, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// Position in scene units.
    pub position: Point3<f64>,
    /// Outward unit normal. Zero when not yet computed.
    pub normal: Vector3<f64>,
}

impl Vertex {
    /// Create a vertex at a position with a zero normal.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Vertex, Point3};
    ///
    /// let v = Vertex::new(Point3::new(0.0, 1.0, 2.0));
    /// assert_eq!(v.normal.norm(), 0.0);
    /// ```
    #[inline]
    #[must_use]
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: Vector3::zeros(),
        }
    }

    /// Create a vertex from raw coordinates.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::Vertex;
    ///
    /// let v = Vertex::from_coords(1.0, 2.0, 3.0);
    /// assert_eq!(v.position.y, 2.0);
    /// ```
    #[inline]
    #[must_use]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Create a vertex with an explicit normal.
    #[inline]
    #[must_use]
    pub const fn with_normal(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }
}

impl From<Point3<f64>> for Vertex {
    #[inline]
    fn from(position: Point3<f64>) -> Self {
        Self::new(position)
    }
}
