//! Per-sample view history.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use nalgebra::Vector3;

use crate::error::{ViewTypesError, ViewTypesResult};

/// Bounded, insertion-ordered record of the view directions that observed one
/// surface sample.
///
/// Each direction points from a committed camera toward the sample. The
/// history also tracks the sample's accumulated reconstructability, the sum of
/// pair qualities over every pair of committed views, which the planner grows
/// incrementally as views are appended.
///
/// # Example
///
/// ```
/// use view_types::ViewHistory;
/// use nalgebra::Vector3;
///
/// let mut history = ViewHistory::with_capacity(2);
/// history.push(Vector3::new(0.0, 0.0, -1.0)).unwrap();
/// history.push(Vector3::new(0.0, 0.6, -0.8)).unwrap();
/// assert!(history.is_full());
/// assert!(history.push(Vector3::x()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ViewHistory {
    directions: Vec<Vector3<f64>>,
    capacity: usize,
    reconstructability: f64,
}

impl ViewHistory {
    /// Creates an empty history able to hold `capacity` directions.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            directions: Vec::with_capacity(capacity),
            capacity,
            reconstructability: 0.0,
        }
    }

    /// Appends a view direction, normalizing it.
    ///
    /// # Errors
    ///
    /// Returns [`ViewTypesError::HistoryFull`] if the history already holds
    /// `capacity` directions.
    pub fn push(&mut self, direction: Vector3<f64>) -> ViewTypesResult<()> {
        if self.is_full() {
            return Err(ViewTypesError::HistoryFull {
                capacity: self.capacity,
            });
        }
        let norm = direction.norm();
        let unit = if norm > f64::EPSILON {
            direction / norm
        } else {
            direction
        };
        self.directions.push(unit);
        Ok(())
    }

    /// Adds a reconstructability gain earned by the latest view.
    pub fn add_reconstructability(&mut self, gain: f64) {
        self.reconstructability += gain;
    }

    /// Accumulated reconstructability of the sample.
    #[must_use]
    pub fn reconstructability(&self) -> f64 {
        self.reconstructability
    }

    /// Committed view directions, oldest first.
    #[must_use]
    pub fn directions(&self) -> &[Vector3<f64>] {
        &self.directions
    }

    /// Number of committed views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    /// Returns `true` if no view has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Maximum number of views.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if no more views can be appended.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.directions.len() >= self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_push_normalizes() {
        let mut history = ViewHistory::with_capacity(3);
        history.push(Vector3::new(0.0, 3.0, -4.0)).unwrap();
        assert_eq!(history.len(), 1);
        assert_relative_eq!(history.directions()[0].norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(history.directions()[0].y, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_capacity_enforced() {
        let mut history = ViewHistory::with_capacity(1);
        assert!(history.push(-Vector3::z()).is_ok());
        let err = history.push(-Vector3::z()).unwrap_err();
        assert_eq!(err, ViewTypesError::HistoryFull { capacity: 1 });
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_zero_capacity() {
        let mut history = ViewHistory::with_capacity(0);
        assert!(history.is_full());
        assert!(history.push(Vector3::x()).is_err());
    }

    #[test]
    fn test_reconstructability_accumulates() {
        let mut history = ViewHistory::with_capacity(2);
        history.add_reconstructability(0.25);
        history.add_reconstructability(0.5);
        assert_relative_eq!(history.reconstructability(), 0.75);
    }
}
