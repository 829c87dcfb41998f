//! Indexed triangle mesh.

use crate::{Aabb, MeshBounds, MeshTopology, Triangle, Vertex};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Vertices and faces are stored separately, with faces referencing
/// vertices by index. This is the geometry currency of the pipeline: scene
/// models, generated supports, and the merged slicing snapshot are all
/// `IndexedMesh` values.
///
/// # Winding Order
///
/// Faces use **counter-clockwise (CCW) winding** when viewed from outside,
/// so normals point outward by the right-hand rule.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex, MeshTopology};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    /// Each face is `[v0, v1, v2]` with counter-clockwise winding.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// The triangle for a face index, or `None` when out of range.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::unit_cube;
    ///
    /// let cube = unit_cube();
    /// assert!(cube.triangle(0).is_some());
    /// assert!(cube.triangle(100).is_none());
    /// ```
    #[must_use]
    pub fn triangle(&self, face: usize) -> Option<Triangle> {
        let [i0, i1, i2] = *self.faces.get(face)?;
        let v0 = self.vertices.get(i0 as usize)?;
        let v1 = self.vertices.get(i1 as usize)?;
        let v2 = self.vertices.get(i2 as usize)?;
        Some(Triangle::new(v0.position, v1.position, v2.position))
    }

    /// Iterate over all faces as concrete triangles.
    ///
    /// Faces with out-of-range indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).filter_map(|f| self.triangle(f))
    }

    /// Append another mesh, offsetting its face indices.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{unit_cube, MeshTopology};
    ///
    /// let mut merged = unit_cube();
    /// merged.merge(&unit_cube());
    /// assert_eq!(merged.face_count(), 24);
    /// ```
    #[allow(clippy::cast_possible_truncation)]
    pub fn merge(&mut self, other: &Self) {
        // Vertex counts stay far below u32::MAX for printable scenes.
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|[a, b, c]| [a + offset, b + offset, c + offset]),
        );
    }

    /// Translate every vertex by an offset.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for v in &mut self.vertices {
            v.position += offset;
        }
    }

    /// Scale every vertex position uniformly about the origin.
    ///
    /// Normals are directions and are left untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{unit_cube, MeshBounds};
    ///
    /// let mut cube = unit_cube();
    /// cube.scale_uniform(0.1);
    /// let bounds = cube.bounds().unwrap();
    /// assert!((bounds.size().x - 0.1).abs() < 1e-12);
    /// ```
    pub fn scale_uniform(&mut self, factor: f64) {
        for v in &mut self.vertices {
            v.position.coords *= factor;
        }
    }

    /// Drop the mesh so its lowest vertex rests on the Z = 0 plane.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{unit_cube, MeshBounds};
    ///
    /// let mut cube = unit_cube();
    /// cube.translate(nalgebra::Vector3::new(0.0, 0.0, 5.0));
    /// cube.rest_on_platform();
    /// assert!(cube.bounds().unwrap().min.z.abs() < 1e-12);
    /// ```
    pub fn rest_on_platform(&mut self) {
        if let Some(bounds) = self.bounds() {
            self.translate(Vector3::new(0.0, 0.0, -bounds.min.z));
        }
    }

    /// Recompute vertex normals as the area-weighted average of adjacent
    /// face normals.
    pub fn compute_vertex_normals(&mut self) {
        for v in &mut self.vertices {
            v.normal = Vector3::zeros();
        }
        for face in &self.faces {
            let [i0, i1, i2] = *face;
            let (Some(a), Some(b), Some(c)) = (
                self.vertices.get(i0 as usize).map(|v| v.position),
                self.vertices.get(i1 as usize).map(|v| v.position),
                self.vertices.get(i2 as usize).map(|v| v.position),
            ) else {
                continue;
            };
            // Cross product magnitude carries the area weighting.
            let n = (b - a).cross(&(c - a));
            for &i in &[i0, i1, i2] {
                if let Some(v) = self.vertices.get_mut(i as usize) {
                    v.normal += n;
                }
            }
        }
        for v in &mut self.vertices {
            let len = v.normal.norm();
            if len > f64::EPSILON {
                v.normal /= len;
            }
        }
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| v.position))
    }
}

/// An axis-aligned unit cube spanning `[0, 1]` on each axis.
///
/// Faces wind CCW viewed from outside. Used throughout the workspace as a
/// known-good closed mesh for tests.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, MeshBounds, MeshTopology};
///
/// let cube = unit_cube();
/// assert_eq!(cube.face_count(), 12);
/// assert!((cube.height() - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    let coords = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ];
    let vertices = coords
        .iter()
        .map(|&[x, y, z]| Vertex::new(Point3::new(x, y, z)))
        .collect();
    let faces = vec![
        // Bottom (normal -Z)
        [0, 2, 1],
        [0, 3, 2],
        // Top (normal +Z)
        [4, 5, 6],
        [4, 6, 7],
        // Front (normal -Y)
        [0, 1, 5],
        [0, 5, 4],
        // Right (normal +X)
        [1, 2, 6],
        [1, 6, 5],
        // Back (normal +Y)
        [2, 3, 7],
        [2, 7, 6],
        // Left (normal -X)
        [3, 0, 4],
        [3, 4, 7],
    ];
    let mut mesh = IndexedMesh::from_parts(vertices, faces);
    mesh.compute_vertex_normals();
    mesh
}
