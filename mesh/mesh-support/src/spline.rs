//! Catmull-Rom interpolation through routed path points.

// Allow numeric casts inherent to sampling (segment indices, step counts)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use crate::error::{SupportError, SupportResult};
use nalgebra::{Point3, Vector3};

/// Samples a Catmull-Rom spline through the given points.
///
/// Produces `steps + 1` samples including both endpoints. The curve passes
/// through every input point: interior tangents average the two adjacent
/// chords, end tangents extrapolate the first and last segment. A two-point
/// input degenerates to the straight segment between them.
///
/// # Errors
///
/// Returns [`SupportError::TooFewPoints`] for fewer than two points and
/// [`SupportError::TooFewSegments`] for zero steps.
///
/// # Examples
///
/// ```
/// use mesh_support::catmull_rom_samples;
/// use nalgebra::Point3;
///
/// let path = vec![
///     Point3::new(0.0, 0.0, 2.0),
///     Point3::new(0.0, 0.0, 0.0),
/// ];
/// let samples = catmull_rom_samples(&path, 4).unwrap();
/// assert_eq!(samples.len(), 5);
/// assert!((samples[2].z - 1.0).abs() < 1e-12);
/// ```
pub fn catmull_rom_samples(
    points: &[Point3<f64>],
    steps: usize,
) -> SupportResult<Vec<Point3<f64>>> {
    if points.len() < 2 {
        return Err(SupportError::TooFewPoints {
            min: 2,
            actual: points.len(),
        });
    }
    if steps < 1 {
        return Err(SupportError::TooFewSegments {
            min: 1,
            actual: steps,
        });
    }

    let segments = points.len() - 1;
    let tangents = chord_tangents(points);

    let mut samples = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let u = (i as f64) / (steps as f64) * (segments as f64);
        let seg = (u.floor() as usize).min(segments - 1);
        let t = u - seg as f64;
        samples.push(hermite(
            &points[seg],
            &tangents[seg],
            &points[seg + 1],
            &tangents[seg + 1],
            t,
        ));
    }
    Ok(samples)
}

/// Per-point tangents from neighbouring chords.
///
/// Endpoints extrapolate their single adjacent segment, which matches a
/// Catmull-Rom curve with mirrored phantom points beyond each end.
fn chord_tangents(points: &[Point3<f64>]) -> Vec<Vector3<f64>> {
    let last = points.len() - 1;
    (0..points.len())
        .map(|i| {
            if i == 0 {
                points[1] - points[0]
            } else if i == last {
                points[last] - points[last - 1]
            } else {
                (points[i + 1] - points[i - 1]) * 0.5
            }
        })
        .collect()
}

/// Cubic Hermite interpolation between two points with given tangents.
fn hermite(
    p0: &Point3<f64>,
    m0: &Vector3<f64>,
    p1: &Point3<f64>,
    m1: &Vector3<f64>,
    t: f64,
) -> Point3<f64> {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    Point3::from(p0.coords * h00 + m0 * h10 + p1.coords * h01 + m1 * h11)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sample_count_is_steps_plus_one() {
        let path = vec![Point3::new(0.0, 0.0, 1.0), Point3::new(0.0, 0.0, 0.0)];
        let samples = catmull_rom_samples(&path, 100).unwrap();
        assert_eq!(samples.len(), 101);
    }

    #[test]
    fn two_point_path_samples_linearly() {
        let path = vec![Point3::new(0.0, 0.0, 3.0), Point3::new(0.0, 0.0, 0.0)];
        let samples = catmull_rom_samples(&path, 3).unwrap();
        for (i, sample) in samples.iter().enumerate() {
            assert_relative_eq!(sample.z, 3.0 - i as f64, epsilon = 1e-12);
            assert_relative_eq!(sample.x, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn curve_passes_through_control_points() {
        let path = vec![
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(0.3, 0.1, 1.0),
            Point3::new(0.3, 0.1, 0.0),
        ];
        let samples = catmull_rom_samples(&path, 100).unwrap();
        // Two segments: the middle control point lands on sample 50.
        assert_relative_eq!(samples[0], path[0], epsilon = 1e-12);
        assert_relative_eq!(samples[50], path[1], epsilon = 1e-12);
        assert_relative_eq!(samples[100], path[2], epsilon = 1e-12);
    }

    #[test]
    fn collinear_path_stays_on_its_line() {
        let path = vec![
            Point3::new(0.5, 0.5, 2.0),
            Point3::new(0.5, 0.5, 1.0),
            Point3::new(0.5, 0.5, 0.0),
        ];
        for sample in catmull_rom_samples(&path, 64).unwrap() {
            assert_relative_eq!(sample.x, 0.5, epsilon = 1e-12);
            assert_relative_eq!(sample.y, 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn single_point_is_rejected() {
        let err = catmull_rom_samples(&[Point3::origin()], 10).unwrap_err();
        assert!(matches!(
            err,
            SupportError::TooFewPoints { min: 2, actual: 1 }
        ));
    }

    #[test]
    fn zero_steps_is_rejected() {
        let path = vec![Point3::new(0.0, 0.0, 1.0), Point3::new(0.0, 0.0, 0.0)];
        assert!(catmull_rom_samples(&path, 0).is_err());
    }
}
