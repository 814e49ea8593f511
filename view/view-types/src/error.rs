//! Error types for view-planning data types.

use thiserror::Error;

/// Result type alias for view-types operations.
pub type ViewTypesResult<T> = Result<T, ViewTypesError>;

/// Errors that can occur while building or mutating view-planning data.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ViewTypesError {
    /// A view history was asked to store more directions than its capacity.
    #[error("view history is full (capacity {capacity})")]
    HistoryFull {
        /// Maximum number of directions the history can hold.
        capacity: usize,
    },

    /// The guidance volume dimensions are invalid.
    #[error("invalid volume dimensions: {width}x{height}x{depth}")]
    InvalidDimensions {
        /// Number of voxels along X.
        width: usize,
        /// Number of voxels along Y.
        height: usize,
        /// Number of voxels along Z.
        depth: usize,
    },

    /// A voxel index lies outside the guidance volume.
    #[error("voxel ({x}, {y}, {z}) is outside the volume")]
    VoxelOutOfBounds {
        /// X index.
        x: usize,
        /// Y index.
        y: usize,
        /// Z index.
        z: usize,
    },

    /// A mesh face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    InvalidFaceIndex {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Camera intrinsics are not usable for projection.
    #[error("invalid camera intrinsics: {0}")]
    InvalidIntrinsics(String),
}

impl ViewTypesError {
    /// Create an invalid intrinsics error.
    #[must_use]
    pub fn invalid_intrinsics(details: impl Into<String>) -> Self {
        Self::InvalidIntrinsics(details.into())
    }
}
