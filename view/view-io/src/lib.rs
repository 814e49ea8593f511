//! File formats for the view planner.
//!
//! - [`load_proxy_mesh`] and [`load_sample_points`] read PLY files (ASCII or
//!   binary) via `ply-rs`.
//! - [`load_guidance_volume`] reads the plain-text guidance volume format.
//! - [`save_trajectory`] and [`load_trajectory`] write and read planned
//!   camera poses, one per line; [`load_positions`] reads fixed waypoints.
//! - [`HistogramDump`] is a [`view_plan::PlanObserver`] that writes
//!   orientation histograms as images.
//!
//! # Example
//!
//! ```no_run
//! use view_io::{load_proxy_mesh, load_sample_points, save_trajectory};
//!
//! let mesh = load_proxy_mesh("proxy.ply").unwrap();
//! let points = load_sample_points("samples.ply").unwrap();
//! println!("{} triangles, {} samples", mesh.face_count(), points.len());
//! # let poses: Vec<view_types::CameraPose> = Vec::new();
//! save_trajectory(&poses, "trajectory.txt").unwrap();
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod dump;
mod error;
mod ply;
mod text;
mod trajectory;
mod volume;

pub use dump::{HistogramDump, histogram_image};
pub use error::{LoadError, LoadResult};
pub use ply::{load_proxy_mesh, load_sample_points};
pub use trajectory::{
    load_positions, load_trajectory, read_positions, read_trajectory, save_trajectory,
    write_trajectory,
};
pub use volume::{VOLUME_MAGIC, VOLUME_VERSION, load_guidance_volume, read_guidance_volume};
