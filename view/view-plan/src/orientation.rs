//! Orientation selection and camera basis construction.

use nalgebra::{Point3, Rotation3, Vector3};
use view_types::CameraPose;

use crate::error::{PlanError, PlanResult};
use crate::histogram::{BinPeak, SphericalHistogram, spherical_to_direction};

/// `|up . forward|` at or above which the reference up is replaced.
const PARALLEL_THRESHOLD: f64 = 0.99;

/// Builds the world-to-camera rotation for a camera looking along
/// `forward`.
///
/// The reference up is `(0, 0, -1)`. When `forward` is within about 8 degrees
/// of vertical, a horizontal fallback `(cos phi, sin phi, 0)` with
/// `phi = acos(forward.z)` is used instead. The result has rows right, up,
/// forward and is a proper rotation for any unit `forward`.
///
/// # Example
///
/// ```
/// use view_plan::camera_basis;
/// use nalgebra::Vector3;
///
/// let r = camera_basis(&Vector3::new(0.0, 0.0, -1.0));
/// assert!((r.matrix().determinant() - 1.0).abs() < 1e-12);
/// assert_eq!(r.matrix().row(2).transpose(), Vector3::new(0.0, 0.0, -1.0));
/// ```
#[must_use]
pub fn camera_basis(forward: &Vector3<f64>) -> Rotation3<f64> {
    let mut up = Vector3::new(0.0, 0.0, -1.0);
    if up.dot(forward).abs() >= PARALLEL_THRESHOLD {
        let phi = forward.z.clamp(-1.0, 1.0).acos();
        up = Vector3::new(phi.cos(), phi.sin(), 0.0);
    }

    let right = up.cross(forward).normalize();
    let up = forward.cross(&right).normalize();
    let matrix = nalgebra::Matrix3::from_rows(&[right.transpose(), up.transpose(), forward.transpose()]);
    Rotation3::from_matrix_unchecked(matrix)
}

/// Rotation for histogram bin `(theta, phi)`.
#[must_use]
pub fn bin_rotation(theta: f64, phi: f64) -> Rotation3<f64> {
    camera_basis(&spherical_to_direction(theta, phi))
}

/// The orientation chosen at one waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationChoice {
    /// Winning histogram bin.
    pub peak: BinPeak,
    /// Resulting camera pose.
    pub pose: CameraPose,
}

/// Picks the best-scoring orientation at `position`.
///
/// # Errors
///
/// Returns [`PlanError::DegenerateOrientation`] if no bin has a strictly
/// positive score.
pub fn select_orientation(
    histogram: &SphericalHistogram,
    position: Point3<f64>,
    focal_length: f64,
    waypoint: usize,
) -> PlanResult<OrientationChoice> {
    let peak = histogram
        .argmax()
        .filter(|p| p.score > 0.0)
        .ok_or(PlanError::DegenerateOrientation { waypoint })?;

    let forward = histogram.direction(peak.azimuth, peak.elevation);
    let pose = CameraPose::new(position, camera_basis(&forward), focal_length);
    Ok(OrientationChoice { peak, pose })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_oblique_basis() {
        let forward = Vector3::new(1.0, 0.0, -1.0).normalize();
        let r = camera_basis(&forward);
        let pose = CameraPose::new(Point3::origin(), r, 100.0);
        assert!(pose.is_orthonormal(1e-12));
        assert_relative_eq!(pose.forward(), forward, epsilon = 1e-12);
        // Image up points toward the ground
        assert!(pose.up().z < 0.0);
    }

    #[test]
    fn test_vertical_uses_fallback() {
        for forward in [Vector3::z(), -Vector3::z()] {
            let pose = CameraPose::new(Point3::origin(), camera_basis(&forward), 100.0);
            assert!(pose.is_orthonormal(1e-12));
            assert_relative_eq!(pose.forward(), forward, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_horizontal_basis() {
        let r = camera_basis(&Vector3::x());
        let pose = CameraPose::new(Point3::origin(), r, 100.0);
        assert!(pose.is_orthonormal(1e-12));
        assert_relative_eq!(pose.up(), -Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_select_orientation() {
        let mut h = SphericalHistogram::new(8, 5);
        h.set(2, 4, 3.0);
        let choice = select_orientation(&h, Point3::new(0.0, 0.0, 30.0), 400.0, 0).unwrap();
        assert_eq!((choice.peak.azimuth, choice.peak.elevation), (2, 4));
        assert_relative_eq!(choice.pose.forward(), -Vector3::z(), epsilon = 1e-12);
        assert_eq!(choice.pose.position, Point3::new(0.0, 0.0, 30.0));
    }

    #[test]
    fn test_all_zero_is_degenerate() {
        let h = SphericalHistogram::new(8, 5);
        let err = select_orientation(&h, Point3::origin(), 400.0, 3).unwrap_err();
        assert_eq!(err, PlanError::DegenerateOrientation { waypoint: 3 });
    }
}
