//! Ray/primitive intersection tests.

use mesh_types::{Aabb, Triangle};
use nalgebra::{Point3, Vector3};

/// Numerical tolerance for the determinant and barycentric range checks.
const INTERSECT_EPSILON: f64 = 1e-10;

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the parametric distance `t` along the ray, or `None` when the
/// ray misses, runs parallel to the triangle plane, or would hit behind
/// the origin. Both triangle faces are hit (no backface culling): support
/// rays pass through open geometry and must see the far side.
///
/// # Example
///
/// ```
/// use mesh_collide::ray_triangle_intersection;
/// use mesh_types::{Triangle, Point3};
/// use nalgebra::Vector3;
///
/// let tri = Triangle::new(
///     Point3::new(-1.0, -1.0, 2.0),
///     Point3::new(1.0, -1.0, 2.0),
///     Point3::new(0.0, 1.0, 2.0),
/// );
/// let t = ray_triangle_intersection(&tri, &Point3::origin(), &Vector3::z()).unwrap();
/// assert!((t - 2.0).abs() < 1e-10);
/// ```
#[must_use]
pub fn ray_triangle_intersection(
    triangle: &Triangle,
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
) -> Option<f64> {
    let edge1 = triangle.v1 - triangle.v0;
    let edge2 = triangle.v2 - triangle.v0;

    let p = direction.cross(&edge2);
    let det = edge1.dot(&p);
    if det.abs() < INTERSECT_EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = origin - triangle.v0;
    let u = s.dot(&p) * inv_det;
    if !(-INTERSECT_EPSILON..=1.0 + INTERSECT_EPSILON).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = direction.dot(&q) * inv_det;
    if v < -INTERSECT_EPSILON || u + v > 1.0 + INTERSECT_EPSILON {
        return None;
    }

    let t = edge2.dot(&q) * inv_det;
    if t < 0.0 {
        return None;
    }
    Some(t)
}

/// Slab test: the entry distance of a ray into a box.
///
/// Returns `None` when the ray misses the box or the box lies entirely
/// behind the origin. An origin inside the box yields `Some(0.0)`.
#[must_use]
pub fn ray_aabb_entry(aabb: &Aabb, origin: &Point3<f64>, direction: &Vector3<f64>) -> Option<f64> {
    let mut t_enter = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        let lo = aabb.min[axis];
        let hi = aabb.max[axis];
        if d.abs() < f64::EPSILON {
            if o < lo || o > hi {
                return None;
            }
        } else {
            let inv = 1.0 / d;
            let (t0, t1) = if inv >= 0.0 {
                ((lo - o) * inv, (hi - o) * inv)
            } else {
                ((hi - o) * inv, (lo - o) * inv)
            };
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }
    }

    if t_exit < 0.0 {
        return None;
    }
    Some(t_enter.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn z_facing_triangle(z: f64) -> Triangle {
        Triangle::new(
            Point3::new(-1.0, -1.0, z),
            Point3::new(1.0, -1.0, z),
            Point3::new(0.0, 1.0, z),
        )
    }

    #[test]
    fn hit_from_either_side() {
        let tri = z_facing_triangle(1.0);
        let from_below = ray_triangle_intersection(&tri, &Point3::origin(), &Vector3::z());
        let from_above =
            ray_triangle_intersection(&tri, &Point3::new(0.0, 0.0, 2.0), &-Vector3::z());
        assert_relative_eq!(from_below.unwrap(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(from_above.unwrap(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn miss_outside_triangle() {
        let tri = z_facing_triangle(1.0);
        let origin = Point3::new(5.0, 5.0, 0.0);
        assert!(ray_triangle_intersection(&tri, &origin, &Vector3::z()).is_none());
    }

    #[test]
    fn behind_origin_is_rejected() {
        let tri = z_facing_triangle(-1.0);
        assert!(ray_triangle_intersection(&tri, &Point3::origin(), &Vector3::z()).is_none());
    }

    #[test]
    fn parallel_ray_is_rejected() {
        let tri = z_facing_triangle(1.0);
        assert!(ray_triangle_intersection(&tri, &Point3::origin(), &Vector3::x()).is_none());
    }

    #[test]
    fn aabb_entry_from_outside_and_inside() {
        let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let outside = ray_aabb_entry(&aabb, &Point3::new(-1.0, 0.5, 0.5), &Vector3::x());
        assert_relative_eq!(outside.unwrap(), 1.0, epsilon = 1e-12);
        let inside = ray_aabb_entry(&aabb, &Point3::new(0.5, 0.5, 0.5), &Vector3::x());
        assert_relative_eq!(inside.unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn aabb_behind_origin_is_rejected() {
        let aabb = Aabb::new(Point3::new(-3.0, 0.0, 0.0), Point3::new(-2.0, 1.0, 1.0));
        assert!(ray_aabb_entry(&aabb, &Point3::origin(), &Vector3::x()).is_none());
    }
}
