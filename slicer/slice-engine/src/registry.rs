//! Scene registry: the meshes a run slices, with cached world extrema.
//!
//! Slot indices double as the mesh ids used by the scan and routing
//! stages, so a [`MeshId`] converts losslessly to and from the `u32`
//! those stages carry.

use mesh_transform::Transform3D;
use mesh_types::IndexedMesh;
use nalgebra::{Point3, Vector3};

/// Handle to a mesh slot in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(u32);

impl MeshId {
    /// The raw slot index, as carried by touchpoints and ray hits.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Rebuild a handle from a raw slot index.
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }
}

/// World-space extrema of a transformed mesh.
///
/// Each bound keeps the full vertex that attained it, not just the
/// coordinate, so callers can reason about where an extreme lives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldExtrema {
    /// Vertex with the smallest world x.
    pub min_x: Point3<f64>,
    /// Vertex with the largest world x.
    pub max_x: Point3<f64>,
    /// Vertex with the smallest world y.
    pub min_y: Point3<f64>,
    /// Vertex with the largest world y.
    pub max_y: Point3<f64>,
    /// Vertex with the smallest world z.
    pub min_z: Point3<f64>,
    /// Vertex with the largest world z.
    pub max_z: Point3<f64>,
    /// Centre of the axis-aligned bounds.
    pub center: Point3<f64>,
    /// Extent of the axis-aligned bounds.
    pub size: Vector3<f64>,
}

impl WorldExtrema {
    fn from_mesh(mesh: &IndexedMesh, transform: Transform3D) -> Option<Self> {
        let mut vertices = mesh
            .vertices
            .iter()
            .map(|vertex| transform.transform_point(&vertex.position));
        let first = vertices.next()?;

        let mut extrema = Self {
            min_x: first,
            max_x: first,
            min_y: first,
            max_y: first,
            min_z: first,
            max_z: first,
            center: first,
            size: Vector3::zeros(),
        };
        for vertex in vertices {
            if vertex.x < extrema.min_x.x {
                extrema.min_x = vertex;
            }
            if vertex.x > extrema.max_x.x {
                extrema.max_x = vertex;
            }
            if vertex.y < extrema.min_y.y {
                extrema.min_y = vertex;
            }
            if vertex.y > extrema.max_y.y {
                extrema.max_y = vertex;
            }
            if vertex.z < extrema.min_z.z {
                extrema.min_z = vertex;
            }
            if vertex.z > extrema.max_z.z {
                extrema.max_z = vertex;
            }
        }

        let min = Point3::new(extrema.min_x.x, extrema.min_y.y, extrema.min_z.z);
        let max = Point3::new(extrema.max_x.x, extrema.max_y.y, extrema.max_z.z);
        extrema.size = max - min;
        extrema.center = min + extrema.size / 2.0;
        Some(extrema)
    }
}

/// A registered mesh with its placement and generated supports.
///
/// Extrema cover the model only. Supports hang below their touchpoints,
/// so they never extend the printable height.
#[derive(Debug, Clone)]
pub struct SceneMesh {
    mesh: IndexedMesh,
    transform: Transform3D,
    supports: Vec<IndexedMesh>,
    extrema: Option<WorldExtrema>,
}

impl SceneMesh {
    /// A mesh placed with the identity transform.
    #[must_use]
    pub fn new(mesh: IndexedMesh) -> Self {
        Self::with_transform(mesh, Transform3D::identity())
    }

    /// A mesh with an explicit placement.
    #[must_use]
    pub fn with_transform(mesh: IndexedMesh, transform: Transform3D) -> Self {
        let extrema = WorldExtrema::from_mesh(&mesh, transform);
        Self {
            mesh,
            transform,
            supports: Vec::new(),
            extrema,
        }
    }

    /// The mesh in its local frame.
    #[must_use]
    pub fn mesh(&self) -> &IndexedMesh {
        &self.mesh
    }

    /// Mutable access to the mesh. Invalidates the cached extrema until
    /// the next [`SceneMesh::update`].
    pub fn mesh_mut(&mut self) -> &mut IndexedMesh {
        self.extrema = None;
        &mut self.mesh
    }

    /// The current placement.
    #[must_use]
    pub fn transform(&self) -> Transform3D {
        self.transform
    }

    /// Move the mesh. Invalidates the cached extrema until the next
    /// [`SceneMesh::update`].
    pub fn set_transform(&mut self, transform: Transform3D) {
        self.transform = transform;
        self.extrema = None;
    }

    /// Recompute the cached world extrema.
    pub fn update(&mut self) {
        self.extrema = WorldExtrema::from_mesh(&self.mesh, self.transform);
    }

    /// The cached world extrema, if current.
    #[must_use]
    pub fn extrema(&self) -> Option<&WorldExtrema> {
        self.extrema.as_ref()
    }

    /// Attach one generated support mesh, already in world space.
    pub fn add_support(&mut self, support: IndexedMesh) {
        self.supports.push(support);
    }

    /// The attached support meshes.
    #[must_use]
    pub fn supports(&self) -> &[IndexedMesh] {
        &self.supports
    }

    /// Drop all attached supports.
    pub fn clear_supports(&mut self) {
        self.supports.clear();
    }
}

/// Slot-addressed collection of scene meshes.
///
/// Removed slots are reused by the next insert, so ids stay dense and
/// small for the lifetime of a scene.
#[derive(Debug, Default)]
pub struct MeshRegistry {
    slots: Vec<Option<SceneMesh>>,
}

impl MeshRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mesh, reusing the first free slot.
    // Slot counts stay far below u32::MAX.
    #[allow(clippy::cast_possible_truncation)]
    pub fn insert(&mut self, mesh: SceneMesh) -> MeshId {
        let slot = self.slots.iter().position(Option::is_none);
        match slot {
            Some(index) => {
                self.slots[index] = Some(mesh);
                MeshId(index as u32)
            }
            None => {
                self.slots.push(Some(mesh));
                MeshId(self.slots.len() as u32 - 1)
            }
        }
    }

    /// Remove and return the mesh in `id`, freeing the slot.
    pub fn remove(&mut self, id: MeshId) -> Option<SceneMesh> {
        self.slots.get_mut(id.0 as usize).and_then(Option::take)
    }

    /// The mesh in `id`, if occupied.
    #[must_use]
    pub fn get(&self, id: MeshId) -> Option<&SceneMesh> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Mutable access to the mesh in `id`, if occupied.
    pub fn get_mut(&mut self, id: MeshId) -> Option<&mut SceneMesh> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Occupied slots in id order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &SceneMesh)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|mesh| (MeshId(index as u32), mesh)))
    }

    /// How many meshes are registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether no meshes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Refresh every cached extrema.
    pub fn update_all(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            slot.update();
        }
    }

    /// Drop every generated support in the scene.
    pub fn clear_all_supports(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            slot.clear_supports();
        }
    }

    /// Merge every model and its supports into one world-space mesh.
    ///
    /// Models are baked through their transforms. Supports are already
    /// world-space and merge as-is.
    #[must_use]
    pub fn world_snapshot(&self) -> IndexedMesh {
        let mut snapshot = IndexedMesh::new();
        for slot in self.slots.iter().flatten() {
            snapshot.merge(&slot.transform.apply_to_mesh(&slot.mesh));
            for support in &slot.supports {
                snapshot.merge(support);
            }
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{unit_cube, MeshTopology};
    use nalgebra::Vector3;

    #[test]
    fn insert_reuses_freed_slots() {
        let mut registry = MeshRegistry::new();
        let a = registry.insert(SceneMesh::new(unit_cube()));
        let b = registry.insert(SceneMesh::new(unit_cube()));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);

        registry.remove(a);
        assert_eq!(registry.len(), 1);

        let c = registry.insert(SceneMesh::new(unit_cube()));
        assert_eq!(c.index(), 0);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn extrema_track_the_transform() {
        let transform = Transform3D::from_translation(Vector3::new(2.0, 3.0, 4.0));
        let scene = SceneMesh::with_transform(unit_cube(), transform);
        let extrema = scene.extrema().unwrap();

        assert_relative_eq!(extrema.min_z.z, 4.0);
        assert_relative_eq!(extrema.max_z.z, 5.0);
        assert_relative_eq!(extrema.center.x, 2.5);
        assert_relative_eq!(extrema.size.y, 1.0);
    }

    #[test]
    fn moving_a_mesh_invalidates_the_cache_until_update() {
        let mut scene = SceneMesh::new(unit_cube());
        assert!(scene.extrema().is_some());

        scene.set_transform(Transform3D::from_translation(Vector3::new(0.0, 0.0, 7.0)));
        assert!(scene.extrema().is_none());

        scene.update();
        assert_relative_eq!(scene.extrema().unwrap().max_z.z, 8.0);
    }

    #[test]
    fn update_all_refreshes_every_slot() {
        let mut registry = MeshRegistry::new();
        let id = registry.insert(SceneMesh::new(unit_cube()));
        registry
            .get_mut(id)
            .unwrap()
            .set_transform(Transform3D::from_uniform_scale(3.0));

        registry.update_all();
        let extrema = registry.get(id).unwrap().extrema().unwrap();
        assert_relative_eq!(extrema.max_x.x, 3.0);
    }

    #[test]
    fn an_empty_mesh_has_no_extrema() {
        let scene = SceneMesh::new(IndexedMesh::new());
        assert!(scene.extrema().is_none());
    }

    #[test]
    fn world_snapshot_bakes_transforms_and_supports() {
        let mut registry = MeshRegistry::new();
        let id = registry.insert(SceneMesh::with_transform(
            unit_cube(),
            Transform3D::from_translation(Vector3::new(10.0, 0.0, 0.0)),
        ));

        let mut strut = unit_cube();
        strut.scale_uniform(0.25);
        registry.get_mut(id).unwrap().add_support(strut);

        let snapshot = registry.world_snapshot();
        assert_eq!(snapshot.face_count(), 2 * unit_cube().face_count());

        let baked_min = snapshot
            .vertices
            .iter()
            .map(|v| v.position.x)
            .fold(f64::INFINITY, f64::min);
        assert_relative_eq!(baked_min, 0.0);
        let baked_max = snapshot
            .vertices
            .iter()
            .map(|v| v.position.x)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(baked_max, 11.0);
    }

    #[test]
    fn clearing_supports_leaves_the_model() {
        let mut scene = SceneMesh::new(unit_cube());
        scene.add_support(unit_cube());
        assert_eq!(scene.supports().len(), 1);

        scene.clear_supports();
        assert!(scene.supports().is_empty());
        assert_eq!(scene.mesh().face_count(), unit_cube().face_count());
    }
}
