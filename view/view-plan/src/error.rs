//! Error types for view planning.

use thiserror::Error;
use view_path::PathError;
use view_spatial::SpatialError;
use view_types::ViewTypesError;

/// Result type alias for planning operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors that abort a planning run.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum PlanError {
    /// Planner configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Too few waypoints to fit the seed spline.
    #[error("insufficient waypoints: need at least {required}, got {actual}")]
    InsufficientWaypoints {
        /// Minimum required waypoints.
        required: usize,
        /// Waypoints available.
        actual: usize,
    },

    /// Every orientation candidate at a waypoint scored zero.
    #[error("no orientation with positive score at waypoint {waypoint}")]
    DegenerateOrientation {
        /// Index of the waypoint.
        waypoint: usize,
    },

    /// The parallel execution substrate failed.
    #[error("parallel execution failed: {0}")]
    AcceleratorFailure(String),

    /// A spatial structure could not be built.
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    /// A data type invariant was violated.
    #[error(transparent)]
    Types(#[from] ViewTypesError),
}

impl PlanError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig(details.into())
    }

    /// Create an accelerator failure error.
    #[must_use]
    pub fn accelerator_failure(details: impl Into<String>) -> Self {
        Self::AcceleratorFailure(details.into())
    }

    /// Returns `true` if the run stopped on an unscorable waypoint.
    #[must_use]
    pub fn is_degenerate_orientation(&self) -> bool {
        matches!(self, Self::DegenerateOrientation { .. })
    }
}

impl From<PathError> for PlanError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::InsufficientWaypoints { required, actual } => {
                Self::InsufficientWaypoints { required, actual }
            }
            PathError::InvalidViewCount => Self::invalid_config("view count must be at least 1"),
            other => Self::invalid_config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanError::DegenerateOrientation { waypoint: 7 };
        assert!(err.to_string().contains("waypoint 7"));
        assert!(err.is_degenerate_orientation());

        let err = PlanError::accelerator_failure("worker panicked");
        assert!(err.to_string().contains("worker panicked"));
    }

    #[test]
    fn test_from_path_error() {
        let err: PlanError = PathError::insufficient_waypoints(4, 1).into();
        assert_eq!(
            err,
            PlanError::InsufficientWaypoints {
                required: 4,
                actual: 1
            }
        );

        let err: PlanError = PathError::InvalidViewCount.into();
        assert!(matches!(err, PlanError::InvalidConfig(_)));
    }
}
