//! Trajectory assembly.

use nalgebra::Point3;
use tracing::{debug, info, warn};
use view_path::{extract_waypoints, generate_seed_path};
use view_spatial::ProxyGeometry;
use view_types::{CameraPose, GuidanceVolume, ProxyMesh, SamplePoint, SamplePointCloud};

use crate::commit::commit_observations;
use crate::config::PlannerConfig;
use crate::error::{PlanError, PlanResult};
use crate::evaluator::HistogramEvaluator;
use crate::observer::PlanObserver;
use crate::orientation::select_orientation;
use crate::runner::ParallelRunner;

/// Where camera positions come from.
#[derive(Debug, Clone)]
pub enum WaypointSource<'a> {
    /// Extract waypoints from a guidance volume and resample a seed spline
    /// through them into `view_count` positions.
    Guidance(&'a GuidanceVolume),
    /// Use these positions as they are.
    Fixed(Vec<Point3<f64>>),
}

/// What happened at one waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointStats {
    /// Waypoint index.
    pub waypoint: usize,
    /// Azimuth bin of the chosen orientation.
    pub azimuth_bin: usize,
    /// Elevation bin of the chosen orientation.
    pub elevation_bin: usize,
    /// Histogram score of the chosen orientation.
    pub score: f64,
    /// Points that took part in the histogram sweep.
    pub swept_points: usize,
    /// Points observed by the committed camera.
    pub observed_points: usize,
}

/// Coverage of the sample cloud after planning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageSummary {
    /// Number of sample points.
    pub total_points: usize,
    /// Points seen by at least one camera.
    pub observed_points: usize,
    /// Points seen by at least two cameras.
    pub multi_view_points: usize,
    /// Average number of views per point.
    pub mean_views: f64,
    /// Average accumulated reconstructability per point.
    pub mean_reconstructability: f64,
}

impl CoverageSummary {
    /// Summarizes the histories of `cloud`.
    #[must_use]
    pub fn from_cloud(cloud: &SamplePointCloud) -> Self {
        let total_points = cloud.len();
        let n = total_points.max(1) as f64;
        let (views, recon) = cloud.iter().fold((0usize, 0.0), |(v, r), s| {
            (v + s.history.len(), r + s.history.reconstructability())
        });
        Self {
            total_points,
            observed_points: cloud.count_observed(1),
            multi_view_points: cloud.count_observed(2),
            mean_views: views as f64 / n,
            mean_reconstructability: recon / n,
        }
    }

    /// Fraction of points seen at least once.
    #[must_use]
    pub fn observed_fraction(&self) -> f64 {
        if self.total_points == 0 {
            0.0
        } else {
            self.observed_points as f64 / self.total_points as f64
        }
    }
}

/// Result of a planning run.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// One pose per waypoint, in waypoint order.
    pub poses: Vec<CameraPose>,
    /// Sample cloud with the final view histories.
    pub cloud: SamplePointCloud,
    /// Per-waypoint statistics.
    pub waypoints: Vec<WaypointStats>,
    /// Coverage summary.
    pub coverage: CoverageSummary,
}

/// Greedy per-waypoint orientation planner.
///
/// Holds the immutable inputs of a run (configuration, proxy geometry with
/// its intersection index, sample points, precomputed evaluator state) and
/// the parallel runner. Each call to [`Planner::plan`] starts from empty
/// view histories.
///
/// # Example
///
/// ```
/// use view_plan::{Planner, PlannerConfig, SequentialRunner, WaypointSource};
/// use view_types::{ProxyMesh, SamplePoint};
/// use nalgebra::{Point3, Vector3};
///
/// let mesh = ProxyMesh::square([-10.0, -10.0], [10.0, 10.0], 0.0);
/// let points: Vec<_> = (0..25)
///     .map(|i| {
///         let (x, y) = (f64::from(i % 5) * 4.0 - 8.0, f64::from(i / 5) * 4.0 - 8.0);
///         SamplePoint::with_normal(Point3::new(x, y, 0.0), Vector3::z())
///     })
///     .collect();
///
/// let config = PlannerConfig::preview().histogram_bins(16, 8).direction_count(128);
/// let planner = Planner::new(config, mesh, points, SequentialRunner).unwrap();
///
/// let source = WaypointSource::Fixed(vec![Point3::new(0.0, 0.0, 20.0), Point3::new(5.0, 0.0, 20.0)]);
/// let outcome = planner.plan(&source, ()).unwrap();
///
/// assert_eq!(outcome.poses.len(), 2);
/// assert!(outcome.coverage.observed_points > 0);
/// ```
#[derive(Debug)]
pub struct Planner<R: ParallelRunner> {
    config: PlannerConfig,
    proxy: ProxyGeometry,
    points: Vec<SamplePoint>,
    evaluator: HistogramEvaluator,
    runner: R,
}

impl<R: ParallelRunner> Planner<R> {
    /// Validates the configuration and builds the spatial structures.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidConfig`] for a bad configuration and
    /// [`PlanError::Spatial`] for a malformed proxy mesh.
    pub fn new(
        config: PlannerConfig,
        mesh: ProxyMesh,
        points: Vec<SamplePoint>,
        runner: R,
    ) -> PlanResult<Self> {
        let evaluator = HistogramEvaluator::new(&config)?;
        let proxy = ProxyGeometry::new(mesh)?;
        if points.is_empty() {
            warn!("Sample cloud is empty; every waypoint will be degenerate");
        }
        Ok(Self {
            config,
            proxy,
            points,
            evaluator,
            runner,
        })
    }

    /// Planner configuration.
    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Proxy geometry used for occlusion tests.
    #[must_use]
    pub fn proxy(&self) -> &ProxyGeometry {
        &self.proxy
    }

    /// Builds the orientation-naive seed poses for `source`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InsufficientWaypoints`] if the guidance volume
    /// yields fewer than four waypoints, and [`PlanError::InvalidConfig`] for
    /// an empty fixed trajectory.
    pub fn seed_poses(&self, source: &WaypointSource<'_>) -> PlanResult<Vec<CameraPose>> {
        let focal_length = self.config.intrinsics.focal_length;
        match source {
            WaypointSource::Guidance(volume) => {
                let waypoints = extract_waypoints(volume);
                Ok(generate_seed_path(&waypoints, self.config.view_count, focal_length)?)
            }
            WaypointSource::Fixed(positions) => {
                if positions.is_empty() {
                    return Err(PlanError::invalid_config("fixed trajectory has no positions"));
                }
                Ok(positions
                    .iter()
                    .map(|&p| CameraPose::nadir(p, focal_length))
                    .collect())
            }
        }
    }

    /// Plans one camera orientation per waypoint.
    ///
    /// Waypoints are processed strictly in order: each one's histogram sees
    /// the observations committed by every earlier waypoint.
    ///
    /// # Errors
    ///
    /// Any failure aborts the run: seed generation errors,
    /// [`PlanError::DegenerateOrientation`] when nothing is visible from a
    /// waypoint, and runner failures.
    pub fn plan<O: PlanObserver>(
        &self,
        source: &WaypointSource<'_>,
        mut observer: O,
    ) -> PlanResult<PlanOutcome> {
        let seed = self.seed_poses(source)?;
        observer.seed_path(&seed);

        info!(
            runner = self.runner.name(),
            points = self.points.len(),
            views = seed.len(),
            "Planning view orientations"
        );

        let mut cloud = SamplePointCloud::new(self.points.clone(), seed.len());
        let mut poses = Vec::with_capacity(seed.len());
        let mut stats = Vec::with_capacity(seed.len());
        let focal_length = self.config.intrinsics.focal_length;

        for (waypoint, seed_pose) in seed.iter().enumerate() {
            let position = seed_pose.position;
            let evaluation = self
                .evaluator
                .evaluate(&self.runner, &self.proxy, &cloud, &position)?;
            observer.histogram(waypoint, &evaluation.histogram);

            let choice = select_orientation(&evaluation.histogram, position, focal_length, waypoint)?;
            let observed_points = commit_observations(
                &self.runner,
                &self.proxy,
                &mut cloud,
                &choice.pose,
                &self.config.intrinsics,
                self.evaluator.model(),
                self.config.occlusion_epsilon,
            )?;
            observer.pose_committed(waypoint, &choice.pose, observed_points);

            debug!(
                waypoint,
                azimuth = choice.peak.azimuth,
                elevation = choice.peak.elevation,
                score = choice.peak.score,
                observed_points,
                "Committed waypoint"
            );

            stats.push(WaypointStats {
                waypoint,
                azimuth_bin: choice.peak.azimuth,
                elevation_bin: choice.peak.elevation,
                score: choice.peak.score,
                swept_points: evaluation.swept_points,
                observed_points,
            });
            poses.push(choice.pose);
        }

        let coverage = CoverageSummary::from_cloud(&cloud);
        info!(
            poses = poses.len(),
            observed = coverage.observed_points,
            multi_view = coverage.multi_view_points,
            mean_views = coverage.mean_views,
            "Planning complete"
        );

        Ok(PlanOutcome {
            poses,
            cloud,
            waypoints: stats,
            coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::SequentialRunner;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn planner() -> Planner<SequentialRunner> {
        let mesh = ProxyMesh::square([-10.0, -10.0], [10.0, 10.0], 0.0);
        let points = (0..16)
            .map(|i| {
                let x = f64::from(i % 4) * 5.0 - 7.5;
                let y = f64::from(i / 4) * 5.0 - 7.5;
                SamplePoint::with_normal(Point3::new(x, y, 0.0), Vector3::z())
            })
            .collect();
        let config = PlannerConfig::preview()
            .view_count(5)
            .histogram_bins(16, 8)
            .direction_count(128);
        Planner::new(config, mesh, points, SequentialRunner).unwrap()
    }

    #[test]
    fn test_empty_fixed_trajectory() {
        let err = planner().plan(&WaypointSource::Fixed(Vec::new()), ()).unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfig(_)));
    }

    #[test]
    fn test_thin_volume_has_too_few_waypoints() {
        let volume = GuidanceVolume::axis_aligned([3, 3, 2], Point3::origin(), 1.0).unwrap();
        let err = planner().plan(&WaypointSource::Guidance(&volume), ()).unwrap_err();
        assert_eq!(
            err,
            PlanError::InsufficientWaypoints {
                required: 4,
                actual: 1
            }
        );
    }

    #[test]
    fn test_invisible_waypoint_is_degenerate() {
        let source = WaypointSource::Fixed(vec![Point3::new(0.0, 0.0, 20.0), Point3::new(900.0, 0.0, 20.0)]);
        let err = planner().plan(&source, ()).unwrap_err();
        assert_eq!(err, PlanError::DegenerateOrientation { waypoint: 1 });
    }

    #[test]
    fn test_stats_and_coverage() {
        let source = WaypointSource::Fixed(vec![Point3::new(0.0, 0.0, 25.0), Point3::new(4.0, 4.0, 25.0)]);
        let outcome = planner().plan(&source, ()).unwrap();

        assert_eq!(outcome.waypoints.len(), 2);
        for (i, stats) in outcome.waypoints.iter().enumerate() {
            assert_eq!(stats.waypoint, i);
            assert!(stats.score > 0.0);
            assert_eq!(stats.swept_points, 16);
        }
        let coverage = outcome.coverage;
        assert_eq!(coverage.total_points, 16);
        let observed: usize = outcome.waypoints.iter().map(|s| s.observed_points).sum();
        assert_relative_eq!(coverage.mean_views, observed as f64 / 16.0);
        assert!(coverage.observed_fraction() > 0.0);
    }

    #[test]
    fn test_coverage_of_empty_cloud() {
        let summary = CoverageSummary::from_cloud(&SamplePointCloud::default());
        assert_eq!(summary.total_points, 0);
        assert_relative_eq!(summary.observed_fraction(), 0.0);
    }
}
