//! Routed support paths.

use nalgebra::Point3;

/// What a support path terminates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathAnchor {
    /// The build platform plane at Z = 0.
    Platform,
    /// Another mesh surface below the touchpoint.
    Surface,
}

/// An ordered run of points from a touchpoint down to its anchor.
///
/// The first point sits just below the touchpoint; the last point is the
/// anchor. Points descend monotonically in Z for every route the router
/// produces, but the type does not enforce that: the builder treats the
/// points as given.
///
/// # Example
///
/// ```
/// use support_types::{PathAnchor, SupportPath};
/// use nalgebra::Point3;
///
/// let path = SupportPath::new(
///     vec![Point3::new(0.0, 0.0, 2.0), Point3::new(0.0, 0.0, 0.0)],
///     PathAnchor::Platform,
/// );
/// assert_eq!(path.points().len(), 2);
/// assert!((path.length() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportPath {
    points: Vec<Point3<f64>>,
    anchor: PathAnchor,
}

impl SupportPath {
    /// Create a path from ordered points and an anchor kind.
    #[must_use]
    pub const fn new(points: Vec<Point3<f64>>, anchor: PathAnchor) -> Self {
        Self { points, anchor }
    }

    /// The ordered points, touchpoint end first.
    #[inline]
    #[must_use]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// What the path terminates on.
    #[inline]
    #[must_use]
    pub const fn anchor(&self) -> PathAnchor {
        self.anchor
    }

    /// The touchpoint-end point, if any.
    #[inline]
    #[must_use]
    pub fn start(&self) -> Option<&Point3<f64>> {
        self.points.first()
    }

    /// The anchor-end point, if any.
    #[inline]
    #[must_use]
    pub fn end(&self) -> Option<&Point3<f64>> {
        self.points.last()
    }

    /// Total polyline length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).norm())
            .sum()
    }

    /// Horizontal (XY) distance between the two ends.
    ///
    /// Routing prefers candidates with smaller offsets when lengths tie,
    /// keeping supports close to the silhouette of the part they hold.
    #[must_use]
    pub fn horizontal_offset(&self) -> f64 {
        match (self.start(), self.end()) {
            (Some(a), Some(b)) => {
                let dx = b.x - a.x;
                let dy = b.y - a.y;
                dx.hypot(dy)
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn length_sums_segments() {
        let path = SupportPath::new(
            vec![
                Point3::new(0.0, 0.0, 3.0),
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(1.0, 0.0, 1.0),
            ],
            PathAnchor::Surface,
        );
        assert_relative_eq!(path.length(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn horizontal_offset_ignores_z() {
        let path = SupportPath::new(
            vec![Point3::new(0.0, 0.0, 5.0), Point3::new(3.0, 4.0, 0.0)],
            PathAnchor::Platform,
        );
        assert_relative_eq!(path.horizontal_offset(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_path_has_zero_metrics() {
        let path = SupportPath::new(Vec::new(), PathAnchor::Platform);
        assert_relative_eq!(path.length(), 0.0);
        assert_relative_eq!(path.horizontal_offset(), 0.0);
        assert!(path.start().is_none());
    }

    #[test]
    fn anchor_kind_round_trips() {
        let path = SupportPath::new(vec![Point3::origin()], PathAnchor::Surface);
        assert_eq!(path.anchor(), PathAnchor::Surface);
    }
}
