//! Composite support strut assembly.

use crate::error::{SupportError, SupportResult};
use crate::params::SupportDims;
use crate::primitives::{cylinder_between, uv_sphere};
use crate::spline::catmull_rom_samples;
use crate::sweep::sweep_tube;
use mesh_types::IndexedMesh;
use nalgebra::{Point3, Vector3};
use support_types::{PathAnchor, SupportPath};

/// Contact spheres are oversized so they bite into the surface they meet.
const CONTACT_OVERSIZE: f64 = 1.025;

/// Longitude and latitude resolution of the contact and anchor spheres.
const SPHERE_SEGMENTS: usize = 9;
const SPHERE_RINGS: usize = 9;

/// Sample count for the swept body spline.
const BODY_STEPS: usize = 100;

/// Radial sides of the body tube, the head taper and the platform foot.
const RADIAL_SEGMENTS: usize = 6;

/// The platform foot narrows to this fraction of its plate radius.
const FOOT_TAPER: f64 = 0.75;

/// Builds the printable geometry for one routed support.
///
/// The strut is assembled from five pieces, all merged into a single mesh:
///
/// 1. a contact sphere at the touchpoint, radius
///    `connection_sphere × 1.025`;
/// 2. a tapered head cylinder from the first path point up to the
///    touchpoint, radius `body` at the path and `head` at the tip;
/// 3. the body, a Catmull-Rom spline through the path points swept as a
///    six-sided tube of radius `body`;
/// 4. an anchor sphere at the last path point, same radius as the contact
///    sphere;
/// 5. when the path anchors on the build plate, a foot cylinder rising
///    `platform_height` from the anchor, radius `platform_width` at the
///    plate narrowing to three quarters of that.
///
/// The input path is never modified. The strut's bounding box, inflated by
/// the largest primitive radius, contains every path point.
///
/// # Errors
///
/// Returns [`SupportError::InvalidRadius`] for a non-positive preset
/// radius and [`SupportError::TooFewPoints`] for a path with fewer than
/// two distinct points.
///
/// # Examples
///
/// ```
/// use mesh_support::{build_support, SupportDims};
/// use mesh_types::MeshTopology;
/// use nalgebra::Point3;
/// use support_types::{PathAnchor, SupportPath};
///
/// let path = SupportPath::new(
///     vec![Point3::new(0.5, 0.5, 1.9), Point3::new(0.5, 0.5, 0.0)],
///     PathAnchor::Platform,
/// );
/// let touchpoint = Point3::new(0.5, 0.5, 2.0);
///
/// let strut = build_support(&path, touchpoint, &SupportDims::default()).unwrap();
/// assert!(strut.face_count() > 0);
/// ```
pub fn build_support(
    path: &SupportPath,
    touchpoint: Point3<f64>,
    dims: &SupportDims,
) -> SupportResult<IndexedMesh> {
    dims.validate()?;
    let points = path.points();
    if points.len() < 2 {
        return Err(SupportError::TooFewPoints {
            min: 2,
            actual: points.len(),
        });
    }

    let contact_radius = dims.connection_sphere() * CONTACT_OVERSIZE;
    let mut strut = IndexedMesh::new();

    strut.merge(&uv_sphere(
        touchpoint,
        contact_radius,
        SPHERE_SEGMENTS,
        SPHERE_RINGS,
    ));

    // The seat point sits just below the surface hit, so the head taper
    // spans the last stretch up to the touchpoint.
    if let Some(head) = cylinder_between(
        points[0],
        touchpoint,
        dims.body(),
        dims.head(),
        RADIAL_SEGMENTS,
    ) {
        strut.merge(&head);
    }

    let spine = catmull_rom_samples(points, BODY_STEPS)?;
    strut.merge(&sweep_tube(&spine, dims.body(), RADIAL_SEGMENTS)?);

    let anchor_point = points[points.len() - 1];
    strut.merge(&uv_sphere(
        anchor_point,
        contact_radius,
        SPHERE_SEGMENTS,
        SPHERE_RINGS,
    ));

    if path.anchor() == PathAnchor::Platform && dims.platform_height() > f64::EPSILON {
        let top = anchor_point + Vector3::z() * dims.platform_height();
        if let Some(foot) = cylinder_between(
            anchor_point,
            top,
            dims.platform_width(),
            dims.platform_width() * FOOT_TAPER,
            RADIAL_SEGMENTS,
        ) {
            strut.merge(&foot);
        }
    }

    Ok(strut)
}
