//! Error types for path generation.

use thiserror::Error;

/// Result type alias for path operations.
pub type PathResult<T> = Result<T, PathError>;

/// Errors that can occur while generating a seed path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PathError {
    /// Too few waypoints to fit a cubic spline.
    #[error("insufficient waypoints: need at least {required}, got {actual}")]
    InsufficientWaypoints {
        /// Minimum required waypoints.
        required: usize,
        /// Waypoints provided.
        actual: usize,
    },

    /// The requested number of views is zero.
    #[error("view count must be at least 1")]
    InvalidViewCount,
}

impl PathError {
    /// Create an insufficient waypoints error.
    #[must_use]
    pub fn insufficient_waypoints(required: usize, actual: usize) -> Self {
        Self::InsufficientWaypoints { required, actual }
    }

    /// Returns `true` if this is an insufficient waypoints error.
    #[must_use]
    pub fn is_insufficient_waypoints(&self) -> bool {
        matches!(self, Self::InsufficientWaypoints { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = PathError::insufficient_waypoints(4, 2);
        assert_eq!(err.to_string(), "insufficient waypoints: need at least 4, got 2");
        assert!(err.is_insufficient_waypoints());
        assert!(!PathError::InvalidViewCount.is_insufficient_waypoints());
    }
}
