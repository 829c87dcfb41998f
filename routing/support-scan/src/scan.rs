//! Free-space scanning over a voxelized scene.

use mesh_transform::Transform3D;
use mesh_types::{IndexedMesh, MeshBounds, Point3, Triangle};
use support_types::{ScanConfig, Touchpoint};
use tracing::{debug, info, warn};
use uv_spatial::{voxelize_surface, VoxelGrid};

/// Meshes whose bounding volume falls below this are skipped.
const VOLUME_EPSILON: f64 = 1e-12;

/// Cap on per-edge subdivision when spreading samples over a triangle.
const MAX_SUBDIVISIONS: u32 = 16;

/// A mesh instance submitted to the scanner.
///
/// The scanner works on world-space geometry, so each mesh comes with
/// the transform that places it in the scene.
#[derive(Debug, Clone, Copy)]
pub struct ScanMesh<'a> {
    /// Identifier reported back on every touchpoint found on this mesh.
    pub id: u32,
    /// Mesh geometry in local coordinates.
    pub mesh: &'a IndexedMesh,
    /// Placement of the mesh in the scene.
    pub transform: Transform3D,
}

/// Everything the scanner learned about a scene.
///
/// The occupancy grid is returned alongside the touchpoints so the
/// router can validate support corridors against the same
/// discretization the probes ran on.
#[derive(Debug)]
pub struct SceneScan {
    /// Unsupported surface points, lowest first.
    pub touchpoints: Vec<Touchpoint>,
    /// Surface occupancy grid the probes ran against.
    pub occupancy: VoxelGrid<bool>,
}

/// Scan a scene for surface points that need support.
///
/// The scene's triangles are discretized into a voxel occupancy grid.
/// Downward-facing triangles are then sampled, and each sample is probed
/// straight down through the grid: when no occupied cell turns up within
/// the probe budget, or the probe reaches the build platform first, the
/// sample becomes a [`Touchpoint`]. Samples within one cell of the
/// platform rest on it and are never touchpoints.
///
/// Results are deduplicated on the configured horizontal spacing, keeping
/// the lowest sample of every cluster, and are deterministic for a given
/// scene and configuration.
///
/// Empty meshes and meshes with a zero-volume bounding box are skipped
/// with a logged warning. An empty scene yields an empty scan.
pub fn scan_scene(entries: &[ScanMesh<'_>], config: &ScanConfig) -> SceneScan {
    let world = collect_world_triangles(entries);
    if world.is_empty() {
        return SceneScan {
            touchpoints: Vec::new(),
            occupancy: VoxelGrid::new(config.cell_size()),
        };
    }

    let soup: Vec<[Point3<f64>; 3]> = world
        .iter()
        .map(|(_, tri)| [tri.v0, tri.v1, tri.v2])
        .collect();
    let grid = match voxelize_surface(&soup, config.cell_size()) {
        Ok(grid) => grid,
        Err(err) => {
            warn!(error = %err, "free-space scan aborted");
            return SceneScan {
                touchpoints: Vec::new(),
                occupancy: VoxelGrid::new(config.cell_size()),
            };
        }
    };

    let mut candidates: Vec<(Point3<f64>, u32)> = Vec::new();
    for (mesh_id, tri) in &world {
        let Some(normal) = tri.normal() else { continue };
        if normal.z > config.down_normal_threshold() {
            continue;
        }
        for point in sample_points(tri, config.cell_size()) {
            if needs_support(&grid, point, config) {
                candidates.push((point, *mesh_id));
            }
        }
    }

    let candidate_count = candidates.len();
    let accepted = dedup_lowest(candidates, config.min_spacing());
    info!(
        touchpoints = accepted.len(),
        candidates = candidate_count,
        triangles = world.len(),
        cells = grid.len(),
        "free-space scan complete"
    );

    SceneScan {
        touchpoints: accepted
            .into_iter()
            .map(|(point, mesh_id)| Touchpoint::new(point, mesh_id))
            .collect(),
        occupancy: grid,
    }
}

/// Scan a scene and keep only the touchpoints.
///
/// Convenience wrapper around [`scan_scene`] for callers that do not
/// need the occupancy grid.
///
/// # Example
///
/// ```
/// use mesh_transform::Transform3D;
/// use mesh_types::{unit_cube, Vector3};
/// use support_scan::{find_touchpoints, ScanMesh};
/// use support_types::ScanConfig;
///
/// let cube = unit_cube();
/// let config = ScanConfig::default();
///
/// // Resting on the platform: nothing to support.
/// let resting = [ScanMesh { id: 0, mesh: &cube, transform: Transform3D::identity() }];
/// assert!(find_touchpoints(&resting, &config).is_empty());
///
/// // Floating two units up: the bottom face needs support.
/// let lifted = Transform3D::from_translation(Vector3::new(0.0, 0.0, 2.0));
/// let floating = [ScanMesh { id: 0, mesh: &cube, transform: lifted }];
/// assert!(!find_touchpoints(&floating, &config).is_empty());
/// ```
#[must_use]
pub fn find_touchpoints(entries: &[ScanMesh<'_>], config: &ScanConfig) -> Vec<Touchpoint> {
    scan_scene(entries, config).touchpoints
}

/// Gather world-space triangles from all scannable meshes.
fn collect_world_triangles(entries: &[ScanMesh<'_>]) -> Vec<(u32, Triangle)> {
    let mut world = Vec::new();
    for entry in entries {
        let Some(bounds) = entry.mesh.bounds() else {
            warn!(mesh = entry.id, "skipping empty mesh");
            continue;
        };
        let size = bounds.size();
        if size.x * size.y * size.z < VOLUME_EPSILON {
            warn!(mesh = entry.id, "skipping zero-volume mesh");
            continue;
        }
        let before = world.len();
        for tri in entry.mesh.triangles() {
            let moved = Triangle::new(
                entry.transform.transform_point(&tri.v0),
                entry.transform.transform_point(&tri.v1),
                entry.transform.transform_point(&tri.v2),
            );
            if moved.is_degenerate() {
                continue;
            }
            world.push((entry.id, moved));
        }
        debug!(
            mesh = entry.id,
            triangles = world.len() - before,
            "gathered mesh surface"
        );
    }
    world
}

/// Spread samples over a triangle, one per sub-triangle centroid.
///
/// Triangles no larger than a cell get a single centroid sample. Larger
/// ones are split so neighbouring samples sit at most one cell apart, up
/// to [`MAX_SUBDIVISIONS`] per edge.
fn sample_points(tri: &Triangle, cell_size: f64) -> Vec<Point3<f64>> {
    let longest = longest_edge(tri);
    if longest <= cell_size {
        return vec![tri.centroid()];
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = ((longest / cell_size).ceil() as u32).min(MAX_SUBDIVISIONS);
    let step = 1.0 / f64::from(n);
    let mut points = Vec::new();
    for i in 0..n {
        for j in 0..(n - i) {
            points.push(tri.point_at(
                (f64::from(i) + 1.0 / 3.0) * step,
                (f64::from(j) + 1.0 / 3.0) * step,
            ));
            // Each lattice cell off the diagonal also holds an inverted
            // sub-triangle.
            if i + j + 2 <= n {
                points.push(tri.point_at(
                    (f64::from(i) + 2.0 / 3.0) * step,
                    (f64::from(j) + 2.0 / 3.0) * step,
                ));
            }
        }
    }
    points
}

/// Longest edge length of a triangle.
fn longest_edge(tri: &Triangle) -> f64 {
    let a = (tri.v1 - tri.v0).norm();
    let b = (tri.v2 - tri.v1).norm();
    let c = (tri.v0 - tri.v2).norm();
    a.max(b).max(c)
}

/// Probe straight down from a sample and decide whether it needs support.
///
/// The probe starts one cell below the sample's own cell so the sampled
/// surface does not read as material holding itself up.
fn needs_support(grid: &VoxelGrid<bool>, point: Point3<f64>, config: &ScanConfig) -> bool {
    // Points this close to the platform rest on it.
    if point.z <= config.cell_size() {
        return false;
    }

    let mut cell = grid.world_to_grid(point).offset(0, 0, -1);
    for _ in 0..config.probe_cells() {
        if grid.grid_to_world_center(cell).z < 0.0 {
            // Clear drop all the way to the platform.
            return true;
        }
        if grid.contains(cell) {
            return false;
        }
        cell = cell.offset(0, 0, -1);
    }
    // Nothing within reach.
    true
}

/// Keep the lowest sample out of every cluster closer than `spacing`.
fn dedup_lowest(
    mut candidates: Vec<(Point3<f64>, u32)>,
    spacing: f64,
) -> Vec<(Point3<f64>, u32)> {
    candidates.sort_by(|a, b| {
        (a.0.z, a.0.x, a.0.y)
            .partial_cmp(&(b.0.z, b.0.x, b.0.y))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let spacing_sq = spacing * spacing;
    let mut accepted: Vec<(Point3<f64>, u32)> = Vec::new();
    for (point, mesh_id) in candidates {
        let crowded = accepted.iter().any(|(kept, _)| {
            let dx = kept.x - point.x;
            let dy = kept.y - point.y;
            dx * dx + dy * dy < spacing_sq
        });
        if !crowded {
            accepted.push((point, mesh_id));
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{unit_cube, Vector3};

    fn entry(id: u32, mesh: &IndexedMesh, transform: Transform3D) -> ScanMesh<'_> {
        ScanMesh {
            id,
            mesh,
            transform,
        }
    }

    #[test]
    fn resting_cube_has_no_touchpoints() {
        let cube = unit_cube();
        let entries = [entry(0, &cube, Transform3D::identity())];
        let found = find_touchpoints(&entries, &ScanConfig::default());
        assert!(found.is_empty());
    }

    #[test]
    fn scan_scene_keeps_the_occupancy_grid() {
        let cube = unit_cube();
        let entries = [entry(0, &cube, Transform3D::identity())];
        let scan = scan_scene(&entries, &ScanConfig::default());
        // The grid is populated even though nothing needs support.
        assert!(scan.touchpoints.is_empty());
        assert!(!scan.occupancy.is_empty());
        assert!(scan
            .occupancy
            .contains_at_world(Point3::new(0.5, 0.5, 0.0)));
    }

    #[test]
    fn floating_cube_gets_bottom_touchpoints() {
        let cube = unit_cube();
        let lifted = Transform3D::from_translation(Vector3::new(0.0, 0.0, 2.0));
        let entries = [entry(3, &cube, lifted)];

        let found = find_touchpoints(&entries, &ScanConfig::default());
        assert!(!found.is_empty());
        for tp in &found {
            assert_eq!(tp.mesh, 3);
            assert!(!tp.is_routed());
            // Only the bottom face at z = 2 faces down.
            assert!((tp.position.z - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn touchpoints_respect_min_spacing() {
        let cube = unit_cube();
        let lifted = Transform3D::from_translation(Vector3::new(0.0, 0.0, 2.0));
        let entries = [entry(0, &cube, lifted)];
        let config = ScanConfig::default();

        let found = find_touchpoints(&entries, &config);
        for (i, a) in found.iter().enumerate() {
            for b in &found[i + 1..] {
                let dx = a.position.x - b.position.x;
                let dy = a.position.y - b.position.y;
                let dist = (dx * dx + dy * dy).sqrt();
                assert!(dist >= config.min_spacing() - 1e-9);
            }
        }
    }

    #[test]
    fn empty_scene_yields_no_touchpoints() {
        let found = find_touchpoints(&[], &ScanConfig::default());
        assert!(found.is_empty());
    }

    #[test]
    fn empty_mesh_is_skipped() {
        let empty = IndexedMesh::new();
        let entries = [entry(0, &empty, Transform3D::identity())];
        let found = find_touchpoints(&entries, &ScanConfig::default());
        assert!(found.is_empty());
    }

    #[test]
    fn zero_volume_mesh_is_skipped() {
        // A single down-facing triangle floating at z = 1. Without the
        // volume guard it would produce touchpoints.
        let sheet = IndexedMesh::from_parts(
            vec![
                mesh_types::Vertex::from_coords(0.0, 0.0, 1.0),
                mesh_types::Vertex::from_coords(0.0, 1.0, 1.0),
                mesh_types::Vertex::from_coords(1.0, 0.0, 1.0),
            ],
            vec![[0, 1, 2]],
        );

        let entries = [entry(0, &sheet, Transform3D::identity())];
        let found = find_touchpoints(&entries, &ScanConfig::default());
        assert!(found.is_empty());
    }

    #[test]
    fn sample_points_cover_large_triangles() {
        let small = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.05, 0.0, 0.0),
            Point3::new(0.0, 0.05, 0.0),
        );
        assert_eq!(sample_points(&small, 0.1).len(), 1);

        let large = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let samples = sample_points(&large, 0.1);
        assert!(samples.len() > 10);
        // Every sample stays inside the triangle.
        for p in &samples {
            assert!(p.x >= 0.0 && p.y >= 0.0);
            assert!(p.x + p.y <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn dedup_keeps_lowest_of_cluster() {
        let candidates = vec![
            (Point3::new(0.0, 0.0, 2.0), 0),
            (Point3::new(0.05, 0.0, 1.0), 1),
            (Point3::new(1.0, 0.0, 3.0), 2),
        ];
        let kept = dedup_lowest(candidates, 0.3);
        assert_eq!(kept.len(), 2);
        // The z = 1 sample wins its cluster; the far sample survives.
        assert_eq!(kept[0].1, 1);
        assert_eq!(kept[1].1, 2);
    }
}
