//! Touchpoints: surface points in need of support.

use crate::path::SupportPath;
use nalgebra::Point3;

/// A surface point lacking material beneath it.
///
/// Produced by the free-space scan and consumed by the router, which
/// fills in `path` when a collision-free route exists. Touchpoints whose
/// routing fails keep `path = None` and are skipped by the builder.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Touchpoint {
    /// World-space position on the mesh surface.
    pub position: Point3<f64>,
    /// Registry id of the mesh the point sits on.
    pub mesh: u32,
    /// The routed path, when routing succeeded.
    pub path: Option<SupportPath>,
}

impl Touchpoint {
    /// Create an unrouted touchpoint.
    #[must_use]
    pub const fn new(position: Point3<f64>, mesh: u32) -> Self {
        Self {
            position,
            mesh,
            path: None,
        }
    }

    /// Whether a route has been attached.
    #[inline]
    #[must_use]
    pub const fn is_routed(&self) -> bool {
        self.path.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathAnchor;

    #[test]
    fn new_touchpoint_is_unrouted() {
        let tp = Touchpoint::new(Point3::origin(), 0);
        assert!(!tp.is_routed());
        assert!(tp.path.is_none());
    }

    #[test]
    fn attaching_a_path_marks_routed() {
        let mut tp = Touchpoint::new(Point3::new(0.0, 0.0, 1.0), 1);
        tp.path = Some(SupportPath::new(
            vec![Point3::new(0.0, 0.0, 0.9), Point3::origin()],
            PathAnchor::Platform,
        ));
        assert!(tp.is_routed());
    }
}
