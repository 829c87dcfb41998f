//! Integer voxel coordinates.

use nalgebra::Vector3;
use std::ops::{Add, Sub};

/// A discrete voxel coordinate in grid space.
///
/// Coordinates are signed so that grids can extend in any direction from
/// their world-space origin.
///
/// # Example
///
/// ```
/// use uv_spatial::VoxelCoord;
///
/// let a = VoxelCoord::new(1, 2, 3);
/// let b = a + VoxelCoord::new(0, 0, -1);
/// assert_eq!(b, VoxelCoord::new(1, 2, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelCoord {
    /// X index.
    pub x: i32,
    /// Y index.
    pub y: i32,
    /// Z index.
    pub z: i32,
}

impl VoxelCoord {
    /// Create a new coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The grid origin `(0, 0, 0)`.
    #[inline]
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0, 0, 0)
    }

    /// The coordinate as an `[x, y, z]` array.
    #[inline]
    #[must_use]
    pub const fn as_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    /// The coordinate as an `f64` vector.
    #[inline]
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
    }

    /// The coordinate shifted by per-axis offsets.
    ///
    /// # Example
    ///
    /// ```
    /// use uv_spatial::VoxelCoord;
    ///
    /// let below = VoxelCoord::new(4, 4, 4).offset(0, 0, -1);
    /// assert_eq!(below.z, 3);
    /// ```
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The six face-adjacent neighbors.
    #[must_use]
    pub const fn face_neighbors(self) -> [Self; 6] {
        [
            self.offset(1, 0, 0),
            self.offset(-1, 0, 0),
            self.offset(0, 1, 0),
            self.offset(0, -1, 0),
            self.offset(0, 0, 1),
            self.offset(0, 0, -1),
        ]
    }

    /// Chebyshev (chessboard) distance to another coordinate.
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let dz = self.z.abs_diff(other.z);
        dx.max(dy).max(dz)
    }
}

impl Add for VoxelCoord {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for VoxelCoord {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_and_arithmetic_agree() {
        let c = VoxelCoord::new(1, 2, 3);
        assert_eq!(c.offset(0, 0, -2), c + VoxelCoord::new(0, 0, -2));
        assert_eq!(c - VoxelCoord::new(1, 2, 3), VoxelCoord::origin());
    }

    #[test]
    fn face_neighbors_are_distance_one() {
        let c = VoxelCoord::new(5, 5, 5);
        for n in c.face_neighbors() {
            assert_eq!(c.chebyshev_distance(n), 1);
        }
    }

    #[test]
    fn chebyshev_takes_max_axis() {
        let a = VoxelCoord::new(0, 0, 0);
        let b = VoxelCoord::new(2, -5, 1);
        assert_eq!(a.chebyshev_distance(b), 5);
    }

    #[test]
    fn to_vector_converts_components() {
        let v = VoxelCoord::new(-1, 0, 2).to_vector();
        assert_eq!(v, Vector3::new(-1.0, 0.0, 2.0));
    }
}
