//! Reconstructability-driven camera orientation planning.
//!
//! Given a coarse proxy surface, a sparse cloud of surface samples and a seed
//! trajectory, this crate chooses a camera orientation for every waypoint so
//! that the committed views maximize the expected reconstruction quality of
//! the surface.
//!
//! # Pipeline
//!
//! For each waypoint, in order:
//!
//! 1. [`HistogramEvaluator`] sweeps the sample points visible from the
//!    waypoint, scores each one with the [`ReconstructabilityModel`] against
//!    its view history, and projects the scores onto a
//!    [`SphericalHistogram`] of candidate orientations.
//! 2. [`select_orientation`] picks the best bin and builds the camera basis
//!    with [`camera_basis`].
//! 3. [`commit_observations`] records the chosen camera in the histories of
//!    the points it sees, so later waypoints favor new viewpoints.
//!
//! [`Planner`] drives the loop; [`ParallelRunner`] supplies the data
//! parallelism, with [`SequentialRunner`] and [`RayonRunner`] producing
//! identical plans.
//!
//! # Example
//!
//! ```
//! use view_plan::{Planner, PlannerConfig, RayonRunner, WaypointSource};
//! use view_types::{GuidanceVolume, ProxyMesh, SamplePoint};
//! use nalgebra::{Point3, Vector3};
//!
//! let mesh = ProxyMesh::square([-20.0, -20.0], [20.0, 20.0], 0.0);
//! let points: Vec<_> = (0..36)
//!     .map(|i| {
//!         let (x, y) = (f64::from(i % 6) * 7.0 - 17.5, f64::from(i / 6) * 7.0 - 17.5);
//!         SamplePoint::with_normal(Point3::new(x, y, 0.0), Vector3::z())
//!     })
//!     .collect();
//!
//! let mut volume = GuidanceVolume::axis_aligned([9, 9, 8], Point3::new(-20.0, -20.0, 0.0), 5.0).unwrap();
//! for x in 0..9 {
//!     for y in 0..9 {
//!         volume.push_sample(x, y, 5, 1.0).unwrap();
//!     }
//! }
//!
//! let config = PlannerConfig::preview().view_count(3);
//! let planner = Planner::new(config, mesh, points, RayonRunner::new(Some(2)).unwrap()).unwrap();
//! let outcome = planner.plan(&WaypointSource::Guidance(&volume), ()).unwrap();
//!
//! assert_eq!(outcome.poses.len(), 3);
//! assert!(outcome.poses.iter().all(|p| p.is_orthonormal(1e-9)));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::too_many_arguments
)]

mod commit;
mod config;
mod error;
mod evaluator;
mod histogram;
mod observer;
mod orientation;
mod planner;
mod recon;
mod runner;

pub use commit::commit_observations;
pub use config::{PlannerConfig, ReconstructabilityParams};
pub use error::{PlanError, PlanResult};
pub use evaluator::{DirectionBuckets, Evaluation, HistogramEvaluator};
pub use histogram::{BinPeak, SphericalHistogram, spherical_to_direction};
pub use observer::PlanObserver;
pub use orientation::{OrientationChoice, bin_rotation, camera_basis, select_orientation};
pub use planner::{CoverageSummary, PlanOutcome, Planner, WaypointSource, WaypointStats};
pub use recon::ReconstructabilityModel;
pub use runner::{ParallelRunner, RayonRunner, SequentialRunner};
