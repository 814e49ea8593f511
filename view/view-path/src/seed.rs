//! Seed path generation.

use nalgebra::Point3;
use tracing::info;
use view_types::CameraPose;

use crate::bspline::CubicBSpline;
use crate::error::{PathError, PathResult};

/// Resamples a cubic B-spline through `waypoints` into `view_count`
/// nadir-facing camera poses.
///
/// Samples are taken at `t = i / view_count` for `i in 0..view_count`, so the
/// first pose sits on the first waypoint. Every pose looks straight down with
/// the given focal length.
///
/// # Errors
///
/// Returns [`PathError::InvalidViewCount`] if `view_count` is zero and
/// [`PathError::InsufficientWaypoints`] with fewer than four waypoints.
///
/// # Example
///
/// ```
/// use view_path::generate_seed_path;
/// use nalgebra::Point3;
///
/// let waypoints: Vec<_> = (0..6).map(|i| Point3::new(f64::from(i), 0.0, 20.0)).collect();
/// let poses = generate_seed_path(&waypoints, 10, 400.0).unwrap();
///
/// assert_eq!(poses.len(), 10);
/// assert_eq!(poses[0].position, waypoints[0]);
/// assert!(poses.iter().all(|p| p.forward().z == -1.0));
/// ```
pub fn generate_seed_path(
    waypoints: &[Point3<f64>],
    view_count: usize,
    focal_length: f64,
) -> PathResult<Vec<CameraPose>> {
    if view_count == 0 {
        return Err(PathError::InvalidViewCount);
    }
    let spline = CubicBSpline::clamped(waypoints.to_vec())?;

    let n = view_count as f64;
    let poses: Vec<CameraPose> = (0..view_count)
        .map(|i| CameraPose::nadir(spline.point_at(i as f64 / n), focal_length))
        .collect();

    info!(
        waypoints = waypoints.len(),
        views = poses.len(),
        "Generated seed path"
    );
    Ok(poses)
}
