//! Reconstructability histogram evaluation.

use nalgebra::{Point3, Rotation3, Vector3};
use tracing::debug;
use view_spatial::{DirectionSet, ProxyGeometry};
use view_types::{CameraIntrinsics, SamplePointCloud};

use crate::config::PlannerConfig;
use crate::error::{PlanError, PlanResult};
use crate::histogram::SphericalHistogram;
use crate::orientation::bin_rotation;
use crate::recon::ReconstructabilityModel;
use crate::runner::ParallelRunner;

/// Per-direction aggregates of point contributions for one camera position.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionBuckets {
    scores: Vec<f64>,
    counts: Vec<usize>,
}

impl DirectionBuckets {
    fn new(len: usize) -> Self {
        Self {
            scores: vec![0.0; len],
            counts: vec![0; len],
        }
    }

    /// Summed contribution per direction.
    #[must_use]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Number of points per direction.
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Total number of points that passed the sweep.
    #[must_use]
    pub fn swept_points(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Indices of directions that received at least one point, ascending.
    pub fn occupied(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(k, _)| k)
    }
}

/// Histogram and sweep statistics for one camera position.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Orientation scores.
    pub histogram: SphericalHistogram,
    /// Points that passed the distance, hemisphere and occlusion tests.
    pub swept_points: usize,
}

/// Scores candidate orientations for a camera position against the current
/// view histories.
///
/// The candidate direction set and the camera rotation of every histogram bin
/// are computed once at construction and reused for every waypoint.
#[derive(Debug)]
pub struct HistogramEvaluator {
    directions: DirectionSet,
    bin_rotations: Vec<Rotation3<f64>>,
    azimuth_bins: usize,
    elevation_bins: usize,
    intrinsics: CameraIntrinsics,
    max_distance: f64,
    occlusion_epsilon: f64,
    non_max_suppression: bool,
    model: ReconstructabilityModel,
}

impl HistogramEvaluator {
    /// Prepares an evaluator for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidConfig`] for an invalid configuration.
    pub fn new(config: &PlannerConfig) -> PlanResult<Self> {
        config.validate()?;
        let directions = DirectionSet::downward_hemisphere(config.direction_count)?;

        let template = SphericalHistogram::new(config.azimuth_bins, config.elevation_bins);
        let bin_rotations = (0..template.len())
            .map(|index| {
                let (i, j) = template.coords(index);
                bin_rotation(template.theta(i), template.phi(j))
            })
            .collect();

        Ok(Self {
            directions,
            bin_rotations,
            azimuth_bins: config.azimuth_bins,
            elevation_bins: config.elevation_bins,
            intrinsics: config.intrinsics,
            max_distance: config.max_distance,
            occlusion_epsilon: config.occlusion_epsilon,
            non_max_suppression: config.non_max_suppression,
            model: ReconstructabilityModel::from_config(config),
        })
    }

    /// Candidate direction set.
    #[must_use]
    pub fn directions(&self) -> &DirectionSet {
        &self.directions
    }

    /// Reconstructability model in use.
    #[must_use]
    pub fn model(&self) -> &ReconstructabilityModel {
        &self.model
    }

    /// Sweeps every sample point and buckets its contribution by the
    /// candidate direction nearest to its view direction.
    ///
    /// A point takes part if it lies within the maximum distance, on or below
    /// the camera's horizon, and in unoccluded line of sight. Buckets are
    /// filled in ascending point order.
    ///
    /// # Errors
    ///
    /// Propagates runner failures.
    pub fn sweep<R: ParallelRunner>(
        &self,
        runner: &R,
        proxy: &ProxyGeometry,
        cloud: &SamplePointCloud,
        position: &Point3<f64>,
    ) -> PlanResult<DirectionBuckets> {
        let samples = cloud.samples();
        let tagged = runner.map(samples.len(), |i| {
            let sample = &samples[i];
            let p = sample.point.position;
            let delta = p - position;
            let distance = delta.norm();
            if distance <= f64::EPSILON || distance > self.max_distance || delta.z > 0.0 {
                return None;
            }
            if proxy.is_occluded(position, &p, self.occlusion_epsilon) {
                return None;
            }
            let view = delta / distance;
            let contribution =
                self.model
                    .contribution(&view, distance, sample.point.normal.as_ref(), &sample.history);
            Some((self.directions.nearest(&view), contribution))
        })?;

        let mut buckets = DirectionBuckets::new(self.directions.len());
        for (k, contribution) in tagged.into_iter().flatten() {
            buckets.scores[k] += contribution;
            buckets.counts[k] += 1;
        }
        Ok(buckets)
    }

    /// Projects direction buckets onto the orientation histogram.
    ///
    /// A bucket adds its score to every bin whose camera frustum contains the
    /// bucket's direction.
    ///
    /// # Errors
    ///
    /// Propagates runner failures.
    pub fn project<R: ParallelRunner>(
        &self,
        runner: &R,
        buckets: &DirectionBuckets,
    ) -> PlanResult<SphericalHistogram> {
        let active: Vec<(Vector3<f64>, f64)> = buckets
            .occupied()
            .map(|k| (self.directions.direction(k), buckets.scores[k]))
            .collect();

        let scores = runner.map(self.bin_rotations.len(), |b| {
            let rotation = &self.bin_rotations[b];
            let mut score = 0.0_f64;
            for &(direction, bucket_score) in &active {
                if self.intrinsics.sees_direction(&(rotation * direction)) {
                    score += bucket_score;
                }
            }
            score
        })?;

        let histogram = SphericalHistogram::from_scores(self.azimuth_bins, self.elevation_bins, scores)
            .ok_or_else(|| PlanError::accelerator_failure("histogram batch returned the wrong number of bins"))?;

        Ok(if self.non_max_suppression {
            histogram.non_max_suppressed()
        } else {
            histogram
        })
    }

    /// Builds the orientation histogram for a camera at `position`.
    ///
    /// # Errors
    ///
    /// Propagates runner failures.
    pub fn evaluate<R: ParallelRunner>(
        &self,
        runner: &R,
        proxy: &ProxyGeometry,
        cloud: &SamplePointCloud,
        position: &Point3<f64>,
    ) -> PlanResult<Evaluation> {
        let buckets = self.sweep(runner, proxy, cloud, position)?;
        let swept_points = buckets.swept_points();
        let histogram = self.project(runner, &buckets)?;
        debug!(
            x = position.x,
            y = position.y,
            z = position.z,
            swept_points,
            occupied_directions = buckets.occupied().count(),
            "Evaluated orientation histogram"
        );
        Ok(Evaluation {
            histogram,
            swept_points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{RayonRunner, SequentialRunner};
    use approx::assert_relative_eq;
    use view_types::{ProxyMesh, SamplePoint};

    fn config() -> PlannerConfig {
        PlannerConfig::preview().histogram_bins(16, 8).direction_count(256)
    }

    fn flat_scene(n: usize) -> (ProxyGeometry, SamplePointCloud) {
        let proxy = ProxyGeometry::new(ProxyMesh::square([-10.0, -10.0], [10.0, 10.0], 0.0)).unwrap();
        let mut points = Vec::new();
        for i in 0..n {
            for j in 0..n {
                let x = -9.0 + 18.0 * i as f64 / (n - 1) as f64;
                let y = -9.0 + 18.0 * j as f64 / (n - 1) as f64;
                points.push(SamplePoint::with_normal(Point3::new(x, y, 0.0), Vector3::z()));
            }
        }
        (proxy, SamplePointCloud::new(points, 4))
    }

    #[test]
    fn test_sweep_counts_visible_points() {
        let evaluator = HistogramEvaluator::new(&config()).unwrap();
        let (proxy, cloud) = flat_scene(5);
        let buckets = evaluator
            .sweep(&SequentialRunner, &proxy, &cloud, &Point3::new(0.0, 0.0, 20.0))
            .unwrap();
        assert_eq!(buckets.swept_points(), 25);
        assert!(buckets.scores().iter().all(|&s| s >= 0.0));
    }

    #[test]
    fn test_sweep_skips_far_and_upper_points() {
        let evaluator = HistogramEvaluator::new(&config().max_distance(15.0)).unwrap();
        let (proxy, cloud) = flat_scene(5);
        // Camera below the plane: every point is above its horizon
        let below = evaluator
            .sweep(&SequentialRunner, &proxy, &cloud, &Point3::new(0.0, 0.0, -5.0))
            .unwrap();
        assert_eq!(below.swept_points(), 0);

        // Only points within 15 units of a camera 10 units up
        let above = evaluator
            .sweep(&SequentialRunner, &proxy, &cloud, &Point3::new(0.0, 0.0, 10.0))
            .unwrap();
        let expected = cloud
            .iter()
            .filter(|s| (s.point.position - Point3::new(0.0, 0.0, 10.0)).norm() <= 15.0)
            .count();
        assert_eq!(above.swept_points(), expected);
        assert!(expected > 0 && expected < 25);
    }

    #[test]
    fn test_sweep_respects_occlusion() {
        let evaluator = HistogramEvaluator::new(&config()).unwrap();
        // Points under a roof at z = 5
        let proxy = ProxyGeometry::new(ProxyMesh::square([-20.0, -20.0], [20.0, 20.0], 5.0)).unwrap();
        let cloud = SamplePointCloud::new(vec![SamplePoint::new(Point3::origin())], 1);
        let buckets = evaluator
            .sweep(&SequentialRunner, &proxy, &cloud, &Point3::new(0.0, 0.0, 20.0))
            .unwrap();
        assert_eq!(buckets.swept_points(), 0);
    }

    #[test]
    fn test_histogram_prefers_looking_down() {
        let evaluator = HistogramEvaluator::new(&config()).unwrap();
        let (proxy, cloud) = flat_scene(7);
        let eval = evaluator
            .evaluate(&SequentialRunner, &proxy, &cloud, &Point3::new(0.0, 0.0, 20.0))
            .unwrap();
        let peak = eval.histogram.argmax().unwrap();
        assert!(peak.score > 0.0);
        // The horizon row sees nothing of the plane
        for i in 0..eval.histogram.azimuth_bins() {
            assert_relative_eq!(eval.histogram.get(i, 0), 0.0);
        }
        assert!(eval.histogram.direction(peak.azimuth, peak.elevation).z < -0.75);
    }

    #[test]
    fn test_runners_agree() {
        let evaluator = HistogramEvaluator::new(&config()).unwrap();
        let (proxy, cloud) = flat_scene(6);
        let position = Point3::new(3.0, -2.0, 12.0);
        let rayon = RayonRunner::new(Some(3)).unwrap();

        let a = evaluator.evaluate(&SequentialRunner, &proxy, &cloud, &position).unwrap();
        let b = evaluator.evaluate(&rayon, &proxy, &cloud, &position).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_visible_points_gives_zero_histogram() {
        let evaluator = HistogramEvaluator::new(&config()).unwrap();
        let (proxy, cloud) = flat_scene(3);
        let eval = evaluator
            .evaluate(&SequentialRunner, &proxy, &cloud, &Point3::new(500.0, 0.0, 20.0))
            .unwrap();
        assert_eq!(eval.swept_points, 0);
        assert!(eval.histogram.scores().iter().all(|&s| s == 0.0));
    }
}
