//! Descent routing from touchpoints to anchors.

use std::cmp::Ordering;
use std::f64::consts::FRAC_PI_4;

use mesh_collide::{Ray, SceneIndex};
use nalgebra::{Point3, Vector3};
use support_types::{PathAnchor, RouteConfig, SupportPath, Touchpoint};
use tracing::{debug, info};
use uv_spatial::VoxelGrid;

/// Route every unrouted touchpoint, attaching paths in place.
///
/// Touchpoints that already carry a path are left untouched, so the
/// function can be re-run after adding new touchpoints. Returns the
/// number of paths attached in this call; touchpoints that cannot be
/// routed stay unrouted and are logged at debug level.
pub fn route_touchpoints(
    touchpoints: &mut [Touchpoint],
    scene: &SceneIndex,
    occupancy: &VoxelGrid<bool>,
    config: &RouteConfig,
) -> usize {
    let mut routed = 0;
    for tp in touchpoints.iter_mut() {
        if tp.is_routed() {
            continue;
        }
        if let Some(path) = route_touchpoint(tp.position, scene, occupancy, config) {
            tp.path = Some(path);
            routed += 1;
        } else {
            debug!(
                mesh = tp.mesh,
                x = tp.position.x,
                y = tp.position.y,
                z = tp.position.z,
                "no collision-free route for touchpoint"
            );
        }
    }
    info!(
        routed,
        touchpoints = touchpoints.len(),
        "support routing complete"
    );
    routed
}

/// Find a collision-free descent from one touchpoint.
///
/// The path starts at a seat point one occupancy cell below the
/// touchpoint and ends at a [`PathAnchor`]: the first surface hit by a
/// vertical ray through the collision index, or the platform at
/// `(x, y, 0)` when the drop is clear. The corridor between consecutive
/// path points must pass the occupancy-grid clearance check.
///
/// When the straight drop is blocked, laterally offset descents are
/// tried on a ring schedule (eight compass directions per ring, ring
/// radius growing by one cell), each one a two-segment path that slants
/// to the offset column and then drops. Candidates are evaluated in
/// order of ascending total length, ties broken by smaller horizontal
/// offset, and evaluation stops after `max_retries` candidates.
///
/// Returns `None` when every candidate is blocked or the touchpoint sits
/// too close to the platform to seat a support.
#[must_use]
pub fn route_touchpoint(
    position: Point3<f64>,
    scene: &SceneIndex,
    occupancy: &VoxelGrid<bool>,
    config: &RouteConfig,
) -> Option<SupportPath> {
    let cell = occupancy.cell_size();
    let seat = Point3::new(position.x, position.y, position.z - cell);
    if seat.z <= 0.0 {
        // No room for a support head below the surface.
        return None;
    }

    let mut evaluated = 0u32;

    // The straight drop is always tried first.
    let direct = descend(seat, None, scene, config);
    evaluated += 1;
    if corridor_is_clear(&direct, occupancy, config) {
        return Some(direct);
    }

    let mut candidates = Vec::new();
    for ring in 1..=config.max_ring() {
        let radius = f64::from(ring) * cell;
        for dir in 0..8u32 {
            let angle = f64::from(dir) * FRAC_PI_4;
            let elbow = Point3::new(
                seat.x + radius * angle.cos(),
                seat.y + radius * angle.sin(),
                // Slant down at 45 degrees so the strut stays printable.
                seat.z - radius,
            );
            if elbow.z <= 0.0 {
                continue;
            }
            candidates.push(descend(elbow, Some(seat), scene, config));
        }
    }
    candidates.sort_by(|a, b| {
        (a.length(), a.horizontal_offset())
            .partial_cmp(&(b.length(), b.horizontal_offset()))
            .unwrap_or(Ordering::Equal)
    });

    for path in candidates {
        if evaluated >= config.max_retries() {
            break;
        }
        evaluated += 1;
        if corridor_is_clear(&path, occupancy, config) {
            return Some(path);
        }
    }
    None
}

/// Drop a vertical ray from `from` and build the candidate path.
///
/// A surface hit above the platform anchors there; anything else anchors
/// on the platform directly below. `seat` is prepended for two-segment
/// offset candidates.
fn descend(
    from: Point3<f64>,
    seat: Option<Point3<f64>>,
    scene: &SceneIndex,
    config: &RouteConfig,
) -> SupportPath {
    let ray = Ray::new(from, Vector3::new(0.0, 0.0, -1.0));
    let (anchor_point, anchor) = match scene.first_hit_beyond(&ray, config.min_anchor_clearance()) {
        Some(hit) if hit.point.z > 0.0 => (hit.point, PathAnchor::Surface),
        _ => (Point3::new(from.x, from.y, 0.0), PathAnchor::Platform),
    };

    let mut points = Vec::with_capacity(3);
    if let Some(seat) = seat {
        points.push(seat);
    }
    points.push(from);
    points.push(anchor_point);
    SupportPath::new(points, anchor)
}

/// Whether every segment of a candidate path clears the occupancy grid.
fn corridor_is_clear(
    path: &SupportPath,
    occupancy: &VoxelGrid<bool>,
    config: &RouteConfig,
) -> bool {
    path.points()
        .windows(2)
        .all(|pair| segment_is_clear(pair[0], pair[1], occupancy, config))
}

/// Walk a segment through the grid, checking a lateral clearance ring
/// around every traversed cell.
///
/// Cells within the clearance distance of either endpoint are exempt:
/// both ends of a support touch material by construction.
fn segment_is_clear(
    from: Point3<f64>,
    to: Point3<f64>,
    occupancy: &VoxelGrid<bool>,
    config: &RouteConfig,
) -> bool {
    let delta = to - from;
    let length = delta.norm();
    if length < f64::EPSILON {
        return true;
    }

    let ray = Ray::new(from, delta / length);
    let start = occupancy.world_to_grid(from);
    let end = occupancy.world_to_grid(to);
    let exempt = config.clearance_cells();
    #[allow(clippy::cast_possible_wrap)]
    let ring = config.clearance_cells() as i32;

    for (coord, t) in ray.traverse_grid(occupancy) {
        if t >= length {
            break;
        }
        if coord.chebyshev_distance(start) <= exempt || coord.chebyshev_distance(end) <= exempt {
            continue;
        }
        for dx in -ring..=ring {
            for dy in -ring..=ring {
                if occupancy.contains(coord.offset(dx, dy, 0)) {
                    return false;
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_collide::SceneEntry;
    use mesh_transform::Transform3D;
    use mesh_types::unit_cube;
    use support_types::ScanConfig;
    use uv_spatial::voxelize_surface;

    const CELL: f64 = 0.1;

    fn occupancy_for(scene: &SceneIndex) -> VoxelGrid<bool> {
        let soup: Vec<[Point3<f64>; 3]> = scene
            .world_triangles()
            .iter()
            .map(|tri| [tri.v0, tri.v1, tri.v2])
            .collect();
        voxelize_surface(&soup, CELL).unwrap()
    }

    fn floating_cube_scene() -> (SceneIndex, VoxelGrid<bool>) {
        let cube = unit_cube();
        let entries = [SceneEntry {
            id: 0,
            mesh: &cube,
            transform: Transform3D::from_translation(Vector3::new(0.0, 0.0, 2.0)),
        }];
        let scene = SceneIndex::build(&entries);
        let occupancy = occupancy_for(&scene);
        (scene, occupancy)
    }

    #[test]
    fn open_air_drops_to_platform() {
        let (scene, occupancy) = floating_cube_scene();
        let config = RouteConfig::default();

        let path = route_touchpoint(Point3::new(0.5, 0.5, 2.0), &scene, &occupancy, &config)
            .expect("open column routes");

        assert_eq!(path.anchor(), PathAnchor::Platform);
        assert_eq!(path.points().len(), 2);
        let start = path.start().unwrap();
        let end = path.end().unwrap();
        // Seat sits one cell under the touchpoint; the anchor is directly
        // below it on the platform.
        assert!((start.z - (2.0 - CELL)).abs() < 1e-9);
        assert!((end.z).abs() < 1e-12);
        assert!((end.x - 0.5).abs() < 1e-9);
        assert!(path.horizontal_offset() < 1e-9);
    }

    #[test]
    fn surface_below_becomes_the_anchor() {
        let cube = unit_cube();
        let lower = SceneEntry {
            id: 0,
            mesh: &cube,
            transform: Transform3D::identity(),
        };
        let upper = SceneEntry {
            id: 1,
            mesh: &cube,
            transform: Transform3D::from_translation(Vector3::new(0.0, 0.0, 2.0)),
        };
        let scene = SceneIndex::build(&[lower, upper]);
        let occupancy = occupancy_for(&scene);
        let config = RouteConfig::default();

        let path = route_touchpoint(Point3::new(0.25, 0.75, 2.0), &scene, &occupancy, &config)
            .expect("drop onto the lower cube routes");

        assert_eq!(path.anchor(), PathAnchor::Surface);
        let end = path.end().unwrap();
        assert!((end.z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn wall_beside_the_column_forces_an_offset_route() {
        let cube = unit_cube();
        let overhang = SceneEntry {
            id: 0,
            mesh: &cube,
            transform: Transform3D::from_translation(Vector3::new(0.0, 0.0, 2.0)),
        };
        // A tall thin wall one cell to the +X side of the drop column.
        let wall = SceneEntry {
            id: 1,
            mesh: &cube,
            transform: Transform3D::from_scale(Vector3::new(0.1, 1.0, 3.0))
                .then(&Transform3D::from_translation(Vector3::new(1.05, 0.0, 0.0))),
        };
        let scene = SceneIndex::build(&[overhang, wall]);
        let occupancy = occupancy_for(&scene);
        let config = RouteConfig::default();

        let path = route_touchpoint(Point3::new(0.95, 0.5, 2.0), &scene, &occupancy, &config)
            .expect("an offset candidate clears the wall");

        // The straight drop hugs the wall, so the route leans away.
        assert_eq!(path.points().len(), 3);
        assert!(path.horizontal_offset() > 0.05);
        assert_eq!(path.anchor(), PathAnchor::Platform);
        assert!(path.end().unwrap().x < 0.95);
    }

    #[test]
    fn boxed_in_touchpoint_fails_to_route() {
        let cube = unit_cube();
        let overhang = SceneEntry {
            id: 0,
            mesh: &cube,
            transform: Transform3D::from_translation(Vector3::new(0.0, 0.0, 2.0)),
        };
        // Four walls forming a shaft around the (0.5, 0.5) column, too
        // tight for any ring candidate to escape.
        let wall_x = |x: f64| {
            Transform3D::from_scale(Vector3::new(0.1, 1.0, 3.0))
                .then(&Transform3D::from_translation(Vector3::new(x, 0.0, 0.0)))
        };
        let wall_y = |y: f64| {
            Transform3D::from_scale(Vector3::new(1.0, 0.1, 3.0))
                .then(&Transform3D::from_translation(Vector3::new(0.0, y, 0.0)))
        };
        let walls = [
            wall_x(0.28),
            wall_x(0.62),
            wall_y(0.28),
            wall_y(0.62),
        ];
        let mut entries = vec![overhang];
        for (i, t) in walls.iter().enumerate() {
            entries.push(SceneEntry {
                id: u32::try_from(i).unwrap() + 1,
                mesh: &cube,
                transform: *t,
            });
        }
        let scene = SceneIndex::build(&entries);
        let occupancy = occupancy_for(&scene);

        let routed = route_touchpoint(
            Point3::new(0.5, 0.5, 2.0),
            &scene,
            &occupancy,
            &RouteConfig::default(),
        );
        assert!(routed.is_none());
    }

    #[test]
    fn touchpoint_on_the_platform_is_rejected() {
        let (scene, occupancy) = floating_cube_scene();
        let routed = route_touchpoint(
            Point3::new(0.5, 0.5, 0.05),
            &scene,
            &occupancy,
            &RouteConfig::default(),
        );
        assert!(routed.is_none());
    }

    #[test]
    fn route_touchpoints_fills_unrouted_entries_only() {
        let (scene, occupancy) = floating_cube_scene();
        let config = RouteConfig::default();

        let preset = SupportPath::new(
            vec![Point3::new(0.2, 0.2, 1.9), Point3::new(0.2, 0.2, 0.0)],
            PathAnchor::Platform,
        );
        let mut touchpoints = vec![
            Touchpoint::new(Point3::new(0.25, 0.25, 2.0), 0),
            Touchpoint::new(Point3::new(0.75, 0.75, 2.0), 0),
            // Already routed: must be left alone.
            Touchpoint {
                position: Point3::new(0.2, 0.2, 2.0),
                mesh: 0,
                path: Some(preset.clone()),
            },
            // Unroutable: sits on the platform.
            Touchpoint::new(Point3::new(0.5, 0.5, 0.01), 0),
        ];

        let routed = route_touchpoints(&mut touchpoints, &scene, &occupancy, &config);
        assert_eq!(routed, 2);
        assert!(touchpoints[0].is_routed());
        assert!(touchpoints[1].is_routed());
        assert_eq!(touchpoints[2].path.as_ref(), Some(&preset));
        assert!(!touchpoints[3].is_routed());
    }

    #[test]
    fn scan_cell_size_matches_router_expectations() {
        // The router derives its seat drop and ring radii from the grid
        // cell size, which comes from the scan configuration.
        let scan = ScanConfig::default();
        assert!((scan.cell_size() - CELL).abs() < 1e-12);
    }
}
