//! Seed trajectories for view planning.
//!
//! This crate turns a guidance volume into an initial, orientation-naive
//! camera path:
//!
//! 1. [`extract_waypoints`] walks the volume's ground plane in serpentine
//!    order and picks the best-scoring height in each column.
//! 2. [`generate_seed_path`] fits a clamped cubic [`CubicBSpline`] through the
//!    waypoints and resamples it into nadir-facing [`view_types::CameraPose`]s.
//!
//! # Example
//!
//! ```
//! use view_path::{extract_waypoints, generate_seed_path};
//! use view_types::GuidanceVolume;
//! use nalgebra::Point3;
//!
//! let mut volume = GuidanceVolume::axis_aligned([8, 8, 6], Point3::origin(), 2.0).unwrap();
//! for x in 0..8 {
//!     for y in 0..8 {
//!         volume.push_sample(x, y, 3, 1.0).unwrap();
//!     }
//! }
//!
//! let waypoints = extract_waypoints(&volume);
//! assert!(waypoints.iter().all(|w| w.z == 6.0));
//!
//! let poses = generate_seed_path(&waypoints, 20, 400.0).unwrap();
//! assert_eq!(poses.len(), 20);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]

mod bspline;
mod error;
mod seed;
mod waypoints;

pub use bspline::{CubicBSpline, MIN_CONTROL_POINTS};
pub use error::{PathError, PathResult};
pub use seed::generate_seed_path;
pub use waypoints::{best_slice, extract_waypoints, serpentine_columns};
