//! Spatial queries for view planning.
//!
//! This crate provides the geometric acceleration structures the planner
//! queries in its inner loops:
//!
//! - [`ProxyGeometry`] - Proxy mesh with a bounding volume hierarchy for
//!   line-of-sight (occlusion) tests
//! - [`DirectionSet`] - Fixed set of candidate view directions on the
//!   downward hemisphere with a k-d tree for nearest-direction lookup
//!
//! Both structures are built once and are immutable afterwards, so they can be
//! shared freely across worker threads.
//!
//! # Example
//!
//! ```
//! use view_spatial::{DirectionSet, ProxyGeometry};
//! use view_types::ProxyMesh;
//! use nalgebra::{Point3, Vector3};
//!
//! let proxy = ProxyGeometry::new(ProxyMesh::square([-1.0, -1.0], [1.0, 1.0], 0.0)).unwrap();
//!
//! // The square blocks the segment through it, but not one ending on it.
//! let eye = Point3::new(0.0, 0.0, 5.0);
//! assert!(proxy.is_occluded(&eye, &Point3::new(0.0, 0.0, -1.0), 1e-3));
//! assert!(!proxy.is_occluded(&eye, &Point3::new(0.0, 0.0, 0.0), 1e-3));
//!
//! let directions = DirectionSet::downward_hemisphere(512).unwrap();
//! let nearest = directions.nearest(&Vector3::new(0.0, 0.0, -1.0));
//! assert!(directions.direction(nearest).z < -0.99);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]

mod bvh;
mod directions;
mod error;
mod proxy;

pub use bvh::{Aabb, Bvh};
pub use directions::DirectionSet;
pub use error::{SpatialError, SpatialResult};
pub use proxy::ProxyGeometry;
