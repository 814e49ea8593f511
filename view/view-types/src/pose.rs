//! Camera poses produced by the planner.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

/// A planned camera: position, orientation and focal length.
///
/// The rotation maps world vectors into the camera frame. Its rows are the
/// camera's right, up and forward axes expressed in world coordinates, and the
/// extrinsic translation is `-R * position`.
///
/// # Example
///
/// ```
/// use view_types::CameraPose;
/// use nalgebra::{Point3, Vector3};
///
/// let pose = CameraPose::nadir(Point3::new(1.0, 2.0, 10.0), 400.0);
///
/// // A point straight below the camera lies on the optical axis.
/// let p = pose.world_to_camera(&Point3::new(1.0, 2.0, 0.0));
/// assert!((p - Vector3::new(0.0, 0.0, 10.0)).norm() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraPose {
    /// Camera center in world coordinates.
    pub position: Point3<f64>,
    /// World-to-camera rotation (rows: right, up, forward).
    pub rotation: Rotation3<f64>,
    /// Focal length in pixels.
    pub focal_length: f64,
}

impl CameraPose {
    /// Creates a pose from its parts.
    #[must_use]
    pub const fn new(position: Point3<f64>, rotation: Rotation3<f64>, focal_length: f64) -> Self {
        Self {
            position,
            rotation,
            focal_length,
        }
    }

    /// Creates a camera looking straight down with its up axis flipped.
    ///
    /// The rotation rows are `(1, 0, 0)`, `(0, -1, 0)` and `(0, 0, -1)`.
    #[must_use]
    pub fn nadir(position: Point3<f64>, focal_length: f64) -> Self {
        let rotation = Rotation3::from_matrix_unchecked(Matrix3::new(
            1.0, 0.0, 0.0, //
            0.0, -1.0, 0.0, //
            0.0, 0.0, -1.0,
        ));
        Self::new(position, rotation, focal_length)
    }

    /// Creates a pose from world-space right, up and forward axes.
    ///
    /// The axes are expected to form a right-handed orthonormal basis.
    #[must_use]
    pub fn from_axes(
        position: Point3<f64>,
        right: &Vector3<f64>,
        up: &Vector3<f64>,
        forward: &Vector3<f64>,
        focal_length: f64,
    ) -> Self {
        let matrix = Matrix3::from_rows(&[right.transpose(), up.transpose(), forward.transpose()]);
        Self::new(
            position,
            Rotation3::from_matrix_unchecked(matrix),
            focal_length,
        )
    }

    /// Camera right axis in world coordinates.
    #[must_use]
    pub fn right(&self) -> Vector3<f64> {
        self.rotation.matrix().row(0).transpose()
    }

    /// Camera up axis in world coordinates.
    #[must_use]
    pub fn up(&self) -> Vector3<f64> {
        self.rotation.matrix().row(1).transpose()
    }

    /// Viewing direction in world coordinates.
    #[must_use]
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation.matrix().row(2).transpose()
    }

    /// Extrinsic translation `-R * position`.
    #[must_use]
    pub fn translation(&self) -> Vector3<f64> {
        -(self.rotation * self.position.coords)
    }

    /// Transforms a world point into the camera frame.
    #[must_use]
    pub fn world_to_camera(&self, point: &Point3<f64>) -> Vector3<f64> {
        self.rotation * (point - self.position)
    }

    /// Returns `true` if the rotation axes are unit length and mutually
    /// orthogonal within `tolerance`, and the basis is right-handed.
    #[must_use]
    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        let m = self.rotation.matrix();
        let gram = m * m.transpose();
        let off_identity = (gram - Matrix3::identity()).abs().max();
        off_identity <= tolerance
            && (m.determinant() - 1.0).abs() <= tolerance
            && m.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nadir_axes() {
        let pose = CameraPose::nadir(Point3::new(0.0, 0.0, 5.0), 300.0);
        assert_eq!(pose.right(), Vector3::x());
        assert_eq!(pose.up(), -Vector3::y());
        assert_eq!(pose.forward(), -Vector3::z());
        assert!(pose.is_orthonormal(1e-12));
    }

    #[test]
    fn test_translation() {
        let pose = CameraPose::nadir(Point3::new(1.0, 2.0, 3.0), 300.0);
        // R * p = (1, -2, -3), so t = (-1, 2, 3)
        assert_relative_eq!(pose.translation(), Vector3::new(-1.0, 2.0, 3.0));
        // Extrinsics map the camera center to the origin
        let center = pose.rotation * pose.position.coords + pose.translation();
        assert_relative_eq!(center.norm(), 0.0);
    }

    #[test]
    fn test_from_axes_roundtrip() {
        let right = Vector3::new(0.0, 1.0, 0.0);
        let up = Vector3::new(0.0, 0.0, 1.0);
        let forward = right.cross(&up);
        let pose = CameraPose::from_axes(Point3::origin(), &right, &up, &forward, 100.0);

        assert_eq!(pose.right(), right);
        assert_eq!(pose.up(), up);
        assert_eq!(pose.forward(), forward);
        assert!(pose.is_orthonormal(1e-12));
    }

    #[test]
    fn test_left_handed_is_rejected() {
        let pose = CameraPose::from_axes(
            Point3::origin(),
            &Vector3::x(),
            &Vector3::y(),
            &(-Vector3::z()),
            100.0,
        );
        assert!(!pose.is_orthonormal(1e-6));
    }
}
