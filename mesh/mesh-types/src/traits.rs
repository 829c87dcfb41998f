//! Traits shared by mesh-like types.

use crate::Aabb;

/// Basic topology counts for a triangle mesh.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, MeshTopology};
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// assert!(!cube.is_empty());
/// ```
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of triangle faces.
    fn face_count(&self) -> usize;

    /// Whether the mesh has no faces.
    fn is_empty(&self) -> bool {
        self.face_count() == 0
    }
}

/// Spatial extent of a mesh.
pub trait MeshBounds {
    /// Bounding box over all vertices, or `None` for an empty mesh.
    fn bounds(&self) -> Option<Aabb>;

    /// Extent along Z, or 0.0 for an empty mesh.
    fn height(&self) -> f64 {
        self.bounds().map_or(0.0, |b| b.size().z)
    }
}
