//! Scene-level collision index with staleness tracking.

use crate::bvh::Bvh;
use mesh_types::{Aabb, IndexedMesh, Point3, Triangle};
use mesh_transform::Transform3D;
use tracing::debug;
use uv_spatial::Ray;

/// One mesh participating in the scene index.
///
/// The `id` ties hits and snapshots back to the caller's registry slot.
#[derive(Debug, Clone, Copy)]
pub struct SceneEntry<'a> {
    /// Caller-side identifier for the mesh.
    pub id: u32,
    /// Mesh geometry in local coordinates.
    pub mesh: &'a IndexedMesh,
    /// World placement of the mesh.
    pub transform: Transform3D,
}

/// A single ray intersection against the merged scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Parametric distance along the ray (non-negative).
    pub t: f64,
    /// World-space intersection point.
    pub point: Point3<f64>,
    /// Index of the triangle in the merged soup.
    pub triangle: u32,
    /// `id` of the mesh owning the triangle.
    pub mesh: u32,
}

/// A collision index over the merged, world-transformed scene.
///
/// The index is global: it bakes every entry's transform into world-space
/// triangles at build time and records the transform per mesh. Moving any
/// mesh afterwards makes the whole index stale ([`SceneIndex::is_stale`]),
/// at which point callers rebuild rather than patch.
///
/// # Example
///
/// ```
/// use mesh_collide::{SceneEntry, SceneIndex, Ray};
/// use mesh_transform::Transform3D;
/// use mesh_types::unit_cube;
/// use nalgebra::{Point3, Vector3};
///
/// let cube = unit_cube();
/// let entries = [SceneEntry { id: 0, mesh: &cube, transform: Transform3D::identity() }];
/// let index = SceneIndex::build(&entries);
///
/// let ray = Ray::new(Point3::new(0.25, 0.75, -1.0), Vector3::z());
/// let hits = index.query(&ray);
/// assert_eq!(hits.len(), 2);
/// assert!(hits[0].t < hits[1].t);
/// ```
#[derive(Debug)]
pub struct SceneIndex {
    triangles: Vec<Triangle>,
    owners: Vec<u32>,
    snapshots: Vec<(u32, Transform3D)>,
    bvh: Bvh,
}

impl SceneIndex {
    /// Build the index over a set of scene entries.
    ///
    /// Degenerate triangles are dropped during merging; an empty entry
    /// set produces an index that answers every query with no hits.
    #[must_use]
    pub fn build(entries: &[SceneEntry<'_>]) -> Self {
        let mut triangles = Vec::new();
        let mut owners = Vec::new();
        let mut snapshots = Vec::with_capacity(entries.len());

        for entry in entries {
            snapshots.push((entry.id, entry.transform));
            for tri in entry.mesh.triangles() {
                let world = Triangle::new(
                    entry.transform.transform_point(&tri.v0),
                    entry.transform.transform_point(&tri.v1),
                    entry.transform.transform_point(&tri.v2),
                );
                if world.is_degenerate() {
                    continue;
                }
                triangles.push(world);
                owners.push(entry.id);
            }
        }

        let bvh = Bvh::build(&triangles);
        let stats = bvh.stats();
        debug!(
            meshes = entries.len(),
            triangles = triangles.len(),
            nodes = stats.nodes,
            depth = stats.max_depth,
            "built scene collision index"
        );

        Self {
            triangles,
            owners,
            snapshots,
            bvh,
        }
    }

    /// Whether any entry differs from the state recorded at build time.
    ///
    /// Stale means: a different number of meshes, an unknown id, or a
    /// transform that no longer equals its snapshot.
    #[must_use]
    pub fn is_stale(&self, entries: &[SceneEntry<'_>]) -> bool {
        if entries.len() != self.snapshots.len() {
            return true;
        }
        for entry in entries {
            let Some((_, recorded)) = self.snapshots.iter().find(|(id, _)| *id == entry.id) else {
                return true;
            };
            if *recorded != entry.transform {
                return true;
            }
        }
        false
    }

    /// All intersections along a ray, nearest first.
    ///
    /// Hits behind the origin are never returned. Ties in distance order
    /// by merged triangle index; callers may rely on that for
    /// determinism, not for meaning.
    #[must_use]
    pub fn query(&self, ray: &Ray) -> Vec<RayHit> {
        self.bvh
            .ray_hits(&self.triangles, &ray.origin, &ray.direction)
            .into_iter()
            .map(|(triangle, t)| RayHit {
                t,
                point: ray.point_at(t),
                triangle,
                mesh: self.owners.get(triangle as usize).copied().unwrap_or(0),
            })
            .collect()
    }

    /// The nearest hit at parametric distance `min_t` or beyond.
    ///
    /// Routing uses a small positive `min_t` so a ray leaving a surface
    /// does not immediately anchor on its own starting triangle.
    #[must_use]
    pub fn first_hit_beyond(&self, ray: &Ray, min_t: f64) -> Option<RayHit> {
        self.query(ray).into_iter().find(|hit| hit.t >= min_t)
    }

    /// The merged world-space triangle soup.
    #[must_use]
    pub fn world_triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// A merged triangle by index.
    #[must_use]
    pub fn triangle(&self, index: u32) -> Option<&Triangle> {
        self.triangles.get(index as usize)
    }

    /// Number of merged world-space triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Bounding box over the merged scene, or `None` when empty.
    #[must_use]
    pub fn world_bounds(&self) -> Option<Aabb> {
        let mut tris = self.triangles.iter();
        let first = tris.next()?.aabb();
        Some(tris.fold(first, |acc, t| acc.union(&t.aabb())))
    }
}
