//! Sparse voxel grid and grid-space bounds.

use std::collections::HashMap;

use nalgebra::Point3;

use crate::error::SpatialError;
use crate::voxel::VoxelCoord;

/// Axis-aligned inclusive bounds in grid space.
///
/// # Example
///
/// ```
/// use uv_spatial::{GridBounds, VoxelCoord};
///
/// let bounds = GridBounds::new(VoxelCoord::new(0, 0, 0), VoxelCoord::new(2, 2, 2));
/// assert_eq!(bounds.size(), (3, 3, 3));
/// assert!(bounds.contains(VoxelCoord::new(1, 2, 0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    /// Minimum corner (inclusive).
    pub min: VoxelCoord,
    /// Maximum corner (inclusive).
    pub max: VoxelCoord,
}

impl GridBounds {
    /// Create bounds from two corners, sorting components.
    #[must_use]
    pub fn new(a: VoxelCoord, b: VoxelCoord) -> Self {
        Self {
            min: VoxelCoord::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: VoxelCoord::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Bounds covering a single cell.
    #[inline]
    #[must_use]
    pub const fn from_cell(coord: VoxelCoord) -> Self {
        Self {
            min: coord,
            max: coord,
        }
    }

    /// Cell count along each axis.
    // Sorted corners make the differences non-negative.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn size(&self) -> (u32, u32, u32) {
        (
            (self.max.x - self.min.x) as u32 + 1,
            (self.max.y - self.min.y) as u32 + 1,
            (self.max.z - self.min.z) as u32 + 1,
        )
    }

    /// Total number of cells inside the bounds.
    #[must_use]
    pub fn volume(&self) -> u64 {
        let (sx, sy, sz) = self.size();
        u64::from(sx) * u64::from(sy) * u64::from(sz)
    }

    /// Whether a coordinate lies inside the bounds (inclusive).
    #[inline]
    #[must_use]
    pub const fn contains(&self, coord: VoxelCoord) -> bool {
        coord.x >= self.min.x
            && coord.x <= self.max.x
            && coord.y >= self.min.y
            && coord.y <= self.max.y
            && coord.z >= self.min.z
            && coord.z <= self.max.z
    }

    /// Grow the bounds to include a coordinate.
    pub fn expand_to_include(&mut self, coord: VoxelCoord) {
        self.min.x = self.min.x.min(coord.x);
        self.min.y = self.min.y.min(coord.y);
        self.min.z = self.min.z.min(coord.z);
        self.max.x = self.max.x.max(coord.x);
        self.max.y = self.max.y.max(coord.y);
        self.max.z = self.max.z.max(coord.z);
    }

    /// Iterate every coordinate inside the bounds in x-fastest order.
    #[must_use]
    pub const fn iter(&self) -> GridBoundsIter {
        GridBoundsIter {
            bounds: *self,
            next: Some(self.min),
        }
    }
}

/// Iterator over the coordinates of a [`GridBounds`].
#[derive(Debug, Clone)]
pub struct GridBoundsIter {
    bounds: GridBounds,
    next: Option<VoxelCoord>,
}

impl Iterator for GridBoundsIter {
    type Item = VoxelCoord;

    fn next(&mut self) -> Option<VoxelCoord> {
        let current = self.next?;
        let b = &self.bounds;
        let mut n = current;
        n.x += 1;
        if n.x > b.max.x {
            n.x = b.min.x;
            n.y += 1;
            if n.y > b.max.y {
                n.y = b.min.y;
                n.z += 1;
            }
        }
        self.next = if n.z > b.max.z { None } else { Some(n) };
        Some(current)
    }
}

/// A sparse 3D voxel grid.
///
/// Cells are stored in a hash map keyed by [`VoxelCoord`], so memory scales
/// with occupied cells rather than the bounding volume. World coordinates
/// convert through a fixed cell size and a world-space origin; anchoring the
/// origin to the scene bounds minimum keeps cell assignment independent of
/// the order meshes were added in.
///
/// # Example
///
/// ```
/// use uv_spatial::{VoxelGrid, VoxelCoord};
/// use nalgebra::Point3;
///
/// let mut grid: VoxelGrid<bool> = VoxelGrid::with_origin(0.5, Point3::new(-1.0, -1.0, 0.0));
/// grid.set_at_world(Point3::new(-0.75, -0.75, 0.25), true);
/// assert_eq!(grid.get(VoxelCoord::new(0, 0, 0)), Some(&true));
/// ```
#[derive(Debug, Clone)]
pub struct VoxelGrid<T> {
    /// Size of each cell in world units.
    cell_size: f64,
    /// Inverse cell size, cached for conversion.
    inv_cell_size: f64,
    /// World-space position of grid coordinate (0, 0, 0).
    origin: Point3<f64>,
    /// Sparse cell storage.
    data: HashMap<VoxelCoord, T>,
}

impl<T> VoxelGrid<T> {
    /// Create an empty grid with the given cell size and origin at the
    /// world origin.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        Self::with_origin(cell_size, Point3::origin())
    }

    /// Create an empty grid with the given cell size and world-space
    /// origin.
    ///
    /// Non-positive cell sizes are clamped to a small epsilon; use
    /// [`VoxelGrid::try_new`] to reject them instead.
    #[must_use]
    pub fn with_origin(cell_size: f64, origin: Point3<f64>) -> Self {
        let cell_size = cell_size.abs().max(f64::EPSILON);
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            origin,
            data: HashMap::new(),
        }
    }

    /// Create a grid, rejecting a non-positive cell size.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidCellSize`] when `cell_size <= 0`.
    pub fn try_new(cell_size: f64, origin: Point3<f64>) -> Result<Self, SpatialError> {
        if cell_size <= 0.0 || !cell_size.is_finite() {
            return Err(SpatialError::InvalidCellSize(cell_size));
        }
        Ok(Self::with_origin(cell_size, origin))
    }

    /// Cell size in world units.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// World-space origin of cell `(0, 0, 0)`.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> &Point3<f64> {
        &self.origin
    }

    /// Number of occupied cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no cells are occupied.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Convert a world point to the containing cell coordinate.
    ///
    /// Points exactly on a cell boundary belong to the higher cell
    /// (floor semantics).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn world_to_grid(&self, point: Point3<f64>) -> VoxelCoord {
        let rel = point - self.origin;
        // Floor keeps negative coordinates in the cell below zero.
        VoxelCoord::new(
            (rel.x * self.inv_cell_size).floor() as i32,
            (rel.y * self.inv_cell_size).floor() as i32,
            (rel.z * self.inv_cell_size).floor() as i32,
        )
    }

    /// World-space center of a cell.
    #[must_use]
    pub fn grid_to_world_center(&self, coord: VoxelCoord) -> Point3<f64> {
        let half = self.cell_size * 0.5;
        self.origin + coord.to_vector() * self.cell_size + nalgebra::Vector3::new(half, half, half)
    }

    /// World-space minimum corner of a cell.
    #[must_use]
    pub fn grid_to_world_min(&self, coord: VoxelCoord) -> Point3<f64> {
        self.origin + coord.to_vector() * self.cell_size
    }

    /// Value stored at a coordinate.
    #[inline]
    #[must_use]
    pub fn get(&self, coord: VoxelCoord) -> Option<&T> {
        self.data.get(&coord)
    }

    /// Mutable value stored at a coordinate.
    #[inline]
    pub fn get_mut(&mut self, coord: VoxelCoord) -> Option<&mut T> {
        self.data.get_mut(&coord)
    }

    /// Value at the cell containing a world point.
    #[inline]
    #[must_use]
    pub fn get_at_world(&self, point: Point3<f64>) -> Option<&T> {
        self.get(self.world_to_grid(point))
    }

    /// Store a value, returning the previous one if any.
    #[inline]
    pub fn set(&mut self, coord: VoxelCoord, value: T) -> Option<T> {
        self.data.insert(coord, value)
    }

    /// Store a value at the cell containing a world point.
    #[inline]
    pub fn set_at_world(&mut self, point: Point3<f64>, value: T) -> Option<T> {
        self.set(self.world_to_grid(point), value)
    }

    /// Remove a cell, returning its value if present.
    #[inline]
    pub fn remove(&mut self, coord: VoxelCoord) -> Option<T> {
        self.data.remove(&coord)
    }

    /// Whether a cell is occupied.
    #[inline]
    #[must_use]
    pub fn contains(&self, coord: VoxelCoord) -> bool {
        self.data.contains_key(&coord)
    }

    /// Whether the cell containing a world point is occupied.
    #[inline]
    #[must_use]
    pub fn contains_at_world(&self, point: Point3<f64>) -> bool {
        self.contains(self.world_to_grid(point))
    }

    /// Remove all cells, keeping the cell size and origin.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Iterate over occupied cells.
    pub fn iter(&self) -> impl Iterator<Item = (&VoxelCoord, &T)> {
        self.data.iter()
    }

    /// Iterate over occupied coordinates.
    pub fn coords(&self) -> impl Iterator<Item = &VoxelCoord> {
        self.data.keys()
    }

    /// Iterate over stored values.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.values()
    }

    /// Grid-space bounds over occupied cells, or `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<GridBounds> {
        let mut coords = self.data.keys();
        let first = *coords.next()?;
        let mut bounds = GridBounds::from_cell(first);
        for &c in coords {
            bounds.expand_to_include(c);
        }
        Some(bounds)
    }
}
