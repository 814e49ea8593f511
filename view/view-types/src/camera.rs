//! Pinhole camera intrinsics.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use nalgebra::Vector3;

use crate::error::{ViewTypesError, ViewTypesResult};

/// Ideal pinhole camera intrinsics.
///
/// The principal point sits at the image center and both axes share one focal
/// length, so a camera-frame point `[X, Y, Z]` projects to
///
/// ```text
/// u = f * X/Z + width/2
/// v = f * Y/Z + height/2
/// ```
///
/// # Example
///
/// ```
/// use view_types::CameraIntrinsics;
/// use nalgebra::Vector3;
///
/// let intrinsics = CameraIntrinsics::new(400.0, 600, 400);
/// let pixel = intrinsics.project(&Vector3::new(0.0, 0.0, 10.0)).unwrap();
/// assert_eq!(pixel, [300.0, 200.0]);
/// assert!(intrinsics.in_frame(&pixel));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraIntrinsics {
    /// Focal length in pixels.
    pub focal_length: f64,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        Self::new(400.0, 600, 400)
    }
}

impl CameraIntrinsics {
    /// Creates intrinsics for the given focal length and image size.
    #[must_use]
    pub const fn new(focal_length: f64, width: u32, height: u32) -> Self {
        Self {
            focal_length,
            width,
            height,
        }
    }

    /// Checks that the intrinsics describe a usable camera.
    ///
    /// # Errors
    ///
    /// Returns [`ViewTypesError::InvalidIntrinsics`] for a non-positive or
    /// non-finite focal length, or an empty image.
    pub fn validate(&self) -> ViewTypesResult<()> {
        if !self.focal_length.is_finite() || self.focal_length <= 0.0 {
            return Err(ViewTypesError::invalid_intrinsics(format!(
                "focal length must be positive, got {}",
                self.focal_length
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ViewTypesError::invalid_intrinsics(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Returns the horizontal field of view in radians.
    #[must_use]
    pub fn fov_x(&self) -> f64 {
        2.0 * (f64::from(self.width) / (2.0 * self.focal_length)).atan()
    }

    /// Returns the vertical field of view in radians.
    #[must_use]
    pub fn fov_y(&self) -> f64 {
        2.0 * (f64::from(self.height) / (2.0 * self.focal_length)).atan()
    }

    /// Projects a camera-frame point to pixel coordinates.
    ///
    /// Returns `None` if the point is on or behind the image plane (Z <= 0).
    #[must_use]
    pub fn project(&self, point: &Vector3<f64>) -> Option<[f64; 2]> {
        if point.z <= 0.0 {
            return None;
        }
        Some([
            self.focal_length * point.x / point.z + f64::from(self.width) / 2.0,
            self.focal_length * point.y / point.z + f64::from(self.height) / 2.0,
        ])
    }

    /// Returns `true` if a pixel lies inside `[0, width) x [0, height)`.
    #[must_use]
    pub fn in_frame(&self, pixel: &[f64; 2]) -> bool {
        pixel[0] >= 0.0
            && pixel[0] < f64::from(self.width)
            && pixel[1] >= 0.0
            && pixel[1] < f64::from(self.height)
    }

    /// Returns `true` if a camera-frame direction falls inside the view frustum.
    ///
    /// The direction need not be normalized. Frustum edges count as inside.
    #[must_use]
    pub fn sees_direction(&self, direction: &Vector3<f64>) -> bool {
        if direction.z <= f64::EPSILON {
            return false;
        }
        let half_w = f64::from(self.width) / 2.0;
        let half_h = f64::from(self.height) / 2.0;
        let u = self.focal_length * direction.x / direction.z;
        let v = self.focal_length * direction.y / direction.z;
        u.abs() <= half_w && v.abs() <= half_h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_project_center() {
        let intrinsics = CameraIntrinsics::new(500.0, 640, 480);
        let pixel = intrinsics.project(&Vector3::new(0.0, 0.0, 5.0));
        assert_eq!(pixel, Some([320.0, 240.0]));
    }

    #[test]
    fn test_project_behind_camera() {
        let intrinsics = CameraIntrinsics::default();
        assert!(intrinsics.project(&Vector3::new(0.0, 0.0, -1.0)).is_none());
        assert!(intrinsics.project(&Vector3::new(1.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_in_frame_bounds() {
        let intrinsics = CameraIntrinsics::new(100.0, 10, 10);
        assert!(intrinsics.in_frame(&[0.0, 0.0]));
        assert!(intrinsics.in_frame(&[9.9, 9.9]));
        assert!(!intrinsics.in_frame(&[10.0, 5.0]));
        assert!(!intrinsics.in_frame(&[-0.1, 5.0]));
    }

    #[test]
    fn test_sees_direction() {
        // 90 degree horizontal field of view
        let intrinsics = CameraIntrinsics::new(300.0, 600, 400);
        assert_relative_eq!(intrinsics.fov_x(), std::f64::consts::FRAC_PI_2, epsilon = 1e-12);

        assert!(intrinsics.sees_direction(&Vector3::new(0.0, 0.0, 1.0)));
        assert!(intrinsics.sees_direction(&Vector3::new(0.99, 0.0, 1.0)));
        assert!(!intrinsics.sees_direction(&Vector3::new(1.1, 0.0, 1.0)));
        assert!(!intrinsics.sees_direction(&Vector3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_validate() {
        assert!(CameraIntrinsics::default().validate().is_ok());
        assert!(CameraIntrinsics::new(0.0, 10, 10).validate().is_err());
        assert!(CameraIntrinsics::new(f64::NAN, 10, 10).validate().is_err());
        assert!(CameraIntrinsics::new(100.0, 0, 10).validate().is_err());
    }
}
