//! Error types for spatial structures.

use thiserror::Error;
use view_types::ViewTypesError;

/// Result type alias for spatial operations.
pub type SpatialResult<T> = Result<T, SpatialError>;

/// Errors raised while building spatial structures.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SpatialError {
    /// A direction set was requested with zero directions.
    #[error("direction set must contain at least one direction")]
    EmptyDirectionSet,

    /// The proxy mesh is malformed.
    #[error("invalid proxy mesh: {0}")]
    Mesh(#[from] ViewTypesError),
}
