//! Ray traversal through voxel grids.
//!
//! Uses the Amanatides & Woo DDA algorithm: at each step the ray advances
//! to the nearest cell boundary among the three axes, so every cell the
//! ray passes through is visited exactly once in order.
//!
//! Support probing walks rays straight down from candidate points, and
//! route validation walks rays along candidate support corridors.

use nalgebra::{Point3, Vector3};

use crate::grid::VoxelGrid;
use crate::voxel::VoxelCoord;

/// A ray with an origin and a (not necessarily normalized) direction.
///
/// # Example
///
/// ```
/// use uv_spatial::Ray;
/// use nalgebra::{Point3, Vector3};
///
/// let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, -1.0));
/// assert_eq!(ray.point_at(2.0).z, -2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin.
    pub origin: Point3<f64>,
    /// Ray direction; must be non-zero.
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    #[must_use]
    pub const fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    /// The point at parametric distance `t` along the ray.
    #[inline]
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }

    /// The unit-length direction.
    #[inline]
    #[must_use]
    pub fn direction_normalized(&self) -> Vector3<f64> {
        self.direction.normalize()
    }

    /// Traverse the cells of `grid` along this ray.
    #[must_use]
    pub fn traverse_grid<T>(&self, grid: &VoxelGrid<T>) -> VoxelTraversal {
        self.traverse(grid.cell_size(), grid.origin())
    }

    /// Traverse a conceptual grid with the given cell size and origin.
    #[must_use]
    pub fn traverse(&self, cell_size: f64, grid_origin: &Point3<f64>) -> VoxelTraversal {
        VoxelTraversal::new(*self, cell_size, grid_origin)
    }
}

/// Iterator over `(VoxelCoord, f64)` pairs along a ray.
///
/// The `f64` is the parametric distance at which the ray enters the cell;
/// the starting cell is yielded with distance `0.0`.
#[derive(Debug, Clone)]
pub struct VoxelTraversal {
    /// Cell the traversal will yield next after the pending start.
    cell: VoxelCoord,
    /// Per-axis step direction (-1, 0, or 1).
    step: [i32; 3],
    /// Parametric distance to the next boundary crossing per axis.
    next_crossing: [f64; 3],
    /// Parametric distance between successive crossings per axis.
    crossing_step: [f64; 3],
    /// Starting cell, yielded once before stepping begins.
    pending_start: Option<VoxelCoord>,
}

impl VoxelTraversal {
    #[allow(clippy::cast_possible_truncation)]
    fn new(ray: Ray, cell_size: f64, grid_origin: &Point3<f64>) -> Self {
        let cell_size = cell_size.abs().max(f64::EPSILON);
        let rel = ray.origin - grid_origin;

        let cell = VoxelCoord::new(
            (rel.x / cell_size).floor() as i32,
            (rel.y / cell_size).floor() as i32,
            (rel.z / cell_size).floor() as i32,
        );

        let dir = [ray.direction.x, ray.direction.y, ray.direction.z];
        let pos = [rel.x, rel.y, rel.z];
        let idx = cell.as_array();

        let mut step = [0i32; 3];
        let mut next_crossing = [f64::INFINITY; 3];
        let mut crossing_step = [f64::INFINITY; 3];

        for axis in 0..3 {
            if dir[axis].abs() > f64::EPSILON {
                step[axis] = if dir[axis] > 0.0 { 1 } else { -1 };
                crossing_step[axis] = (cell_size / dir[axis]).abs();
                let boundary = if dir[axis] > 0.0 {
                    (f64::from(idx[axis]) + 1.0) * cell_size
                } else {
                    f64::from(idx[axis]) * cell_size
                };
                next_crossing[axis] = (boundary - pos[axis]) / dir[axis];
            }
        }

        Self {
            cell,
            step,
            next_crossing,
            crossing_step,
            pending_start: Some(cell),
        }
    }
}

impl Iterator for VoxelTraversal {
    type Item = (VoxelCoord, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(start) = self.pending_start.take() {
            return Some((start, 0.0));
        }

        // Step across the nearest boundary.
        let axis = if self.next_crossing[0] < self.next_crossing[1] {
            if self.next_crossing[0] < self.next_crossing[2] {
                0
            } else {
                2
            }
        } else if self.next_crossing[1] < self.next_crossing[2] {
            1
        } else {
            2
        };

        let t = self.next_crossing[axis];
        match axis {
            0 => self.cell.x = self.cell.x.wrapping_add(self.step[0]),
            1 => self.cell.y = self.cell.y.wrapping_add(self.step[1]),
            _ => self.cell.z = self.cell.z.wrapping_add(self.step[2]),
        }
        self.next_crossing[axis] += self.crossing_step[axis];

        Some((self.cell, t))
    }
}

/// A cell hit found by [`raycast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// The cell that satisfied the predicate.
    pub coord: VoxelCoord,
    /// Parametric distance at which the ray entered the cell.
    pub t: f64,
    /// World-space entry point.
    pub point: Point3<f64>,
}

/// Cast a ray through a grid, returning the first cell for which
/// `is_blocking` returns true within `max_distance`.
///
/// Distances are measured in multiples of the ray direction length, so
/// pass a normalized direction for world-unit distances.
///
/// # Example
///
/// ```
/// use uv_spatial::{raycast, Ray, VoxelGrid, VoxelCoord};
/// use nalgebra::{Point3, Vector3};
///
/// let mut grid: VoxelGrid<bool> = VoxelGrid::new(1.0);
/// grid.set(VoxelCoord::new(3, 0, 0), true);
///
/// let ray = Ray::new(Point3::new(0.5, 0.5, 0.5), Vector3::x());
/// let hit = raycast(&ray, &grid, 10.0, |v| *v).unwrap();
/// assert_eq!(hit.coord, VoxelCoord::new(3, 0, 0));
/// ```
pub fn raycast<T, F>(
    ray: &Ray,
    grid: &VoxelGrid<T>,
    max_distance: f64,
    is_blocking: F,
) -> Option<RaycastHit>
where
    F: Fn(&T) -> bool,
{
    for (coord, t) in ray.traverse_grid(grid) {
        if t > max_distance {
            return None;
        }
        if let Some(value) = grid.get(coord) {
            if is_blocking(value) {
                return Some(RaycastHit {
                    coord,
                    t,
                    point: ray.point_at(t),
                });
            }
        }
    }
    None
}

/// Whether the straight segment between two points crosses no blocking
/// cell.
///
/// The cells containing the endpoints themselves are not tested, so a
/// segment may start or end inside solid material and still have line of
/// sight through the space between.
pub fn line_of_sight<T, F>(
    from: &Point3<f64>,
    to: &Point3<f64>,
    grid: &VoxelGrid<T>,
    is_blocking: F,
) -> bool
where
    F: Fn(&T) -> bool,
{
    let delta = to - from;
    let length = delta.norm();
    if length < f64::EPSILON {
        return true;
    }
    let ray = Ray::new(*from, delta / length);
    let start_cell = grid.world_to_grid(*from);
    let end_cell = grid.world_to_grid(*to);

    for (coord, t) in ray.traverse_grid(grid) {
        if t >= length {
            return true;
        }
        if coord == start_cell || coord == end_cell {
            continue;
        }
        if grid.get(coord).is_some_and(&is_blocking) {
            return false;
        }
    }
    true
}
