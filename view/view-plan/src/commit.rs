//! Committing observations of a chosen camera into the view histories.

use nalgebra::Vector3;
use tracing::debug;
use view_spatial::ProxyGeometry;
use view_types::{CameraIntrinsics, CameraPose, SamplePointCloud};

use crate::error::PlanResult;
use crate::recon::ReconstructabilityModel;
use crate::runner::ParallelRunner;

/// Records which sample points a committed camera observes.
///
/// A point is observed if it lies in front of the camera, projects inside the
/// image and is not occluded by the proxy geometry. Each observed point gets
/// the view direction appended to its history and its reconstructability
/// raised by the direction's pairwise gain against the existing history.
///
/// Visibility and gains are computed in one parallel batch against the
/// unmodified histories; the histories are then updated in point order after
/// the runner's barrier. Returns the number of observed points.
///
/// # Errors
///
/// Propagates runner failures, and [`crate::PlanError::Types`] if a history
/// is already full.
pub fn commit_observations<R: ParallelRunner>(
    runner: &R,
    proxy: &ProxyGeometry,
    cloud: &mut SamplePointCloud,
    pose: &CameraPose,
    intrinsics: &CameraIntrinsics,
    model: &ReconstructabilityModel,
    occlusion_epsilon: f64,
) -> PlanResult<usize> {
    let observations = {
        let samples = cloud.samples();
        runner.map(samples.len(), |i| -> Option<(Vector3<f64>, f64)> {
            let sample = &samples[i];
            let p = sample.point.position;
            let pixel = intrinsics.project(&pose.world_to_camera(&p))?;
            if !intrinsics.in_frame(&pixel) {
                return None;
            }
            if proxy.is_occluded(&pose.position, &p, occlusion_epsilon) {
                return None;
            }
            let delta = p - pose.position;
            let distance = delta.norm();
            let view = delta / distance;
            let gain = model.gain(&view, distance, sample.point.normal.as_ref(), &sample.history);
            Some((view, gain))
        })?
    };
    runner.barrier()?;

    let mut observed = 0;
    for (index, observation) in observations.into_iter().enumerate() {
        if let Some((view, gain)) = observation {
            cloud.record(index, view, gain)?;
            observed += 1;
        }
    }

    debug!(observed, total = cloud.len(), "Committed observations");
    Ok(observed)
}
