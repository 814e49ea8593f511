//! Core data types for reconstructability-driven view planning.
//!
//! This crate provides the shared vocabulary of the view-planning workspace:
//!
//! - [`GuidanceVolume`] - Sparse voxel grid of position-quality samples
//! - [`ProxyMesh`] - Coarse triangle mesh used for occlusion tests
//! - [`SamplePoint`] / [`SamplePointCloud`] - Surface samples and their view histories
//! - [`ViewHistory`] - Bounded record of committed view directions per sample
//! - [`CameraIntrinsics`] - Ideal pinhole camera model
//! - [`CameraPose`] - Position, orientation and focal length of one planned view
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - CLI tools
//! - Offline planners
//! - Simulation harnesses
//!
//! # Coordinate System
//!
//! Right-handed, consistent with mesh-types:
//! - X: width (left/right)
//! - Y: depth (front/back)
//! - Z: height (up/down)
//!
//! Camera rotations map world vectors into the camera frame. Their rows are
//! the camera's right, up and forward axes, so a camera looking straight down
//! has a forward row of `(0, 0, -1)`.
//!
//! # Example
//!
//! ```
//! use view_types::{CameraPose, SamplePoint, SamplePointCloud};
//! use nalgebra::{Point3, Vector3};
//!
//! let pose = CameraPose::nadir(Point3::new(0.0, 0.0, 30.0), 400.0);
//! assert!(pose.is_orthonormal(1e-9));
//! assert_eq!(pose.forward(), Vector3::new(0.0, 0.0, -1.0));
//!
//! let cloud = SamplePointCloud::new(vec![SamplePoint::new(Point3::origin())], 4);
//! assert_eq!(cloud.len(), 1);
//! assert!(cloud.history(0).is_some_and(|h| h.is_empty()));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]

mod camera;
mod cloud;
mod error;
mod history;
mod mesh;
mod pose;
mod volume;

pub use camera::CameraIntrinsics;
pub use cloud::{SamplePoint, SamplePointCloud, SurfaceSample};
pub use error::{ViewTypesError, ViewTypesResult};
pub use history::ViewHistory;
pub use mesh::ProxyMesh;
pub use pose::CameraPose;
pub use volume::GuidanceVolume;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Rotation3, Vector3};
