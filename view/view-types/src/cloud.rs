//! Surface sample points and their view histories.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use nalgebra::{Point3, Vector3};

use crate::error::ViewTypesResult;
use crate::history::ViewHistory;

/// A sample on the target surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplePoint {
    /// Position in world coordinates.
    pub position: Point3<f64>,
    /// Outward unit normal, if known.
    pub normal: Option<Vector3<f64>>,
}

impl SamplePoint {
    /// Creates a sample without a normal.
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: None,
        }
    }

    /// Creates a sample with a normal.
    ///
    /// The normal is normalized; a zero-length normal is dropped.
    #[must_use]
    pub fn with_normal(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            position,
            normal: normal.try_normalize(f64::EPSILON),
        }
    }
}

/// A sample point together with its view history.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceSample {
    /// The surface sample.
    pub point: SamplePoint,
    /// Views committed so far.
    pub history: ViewHistory,
}

/// Fixed-size collection of surface samples with per-sample view histories.
///
/// The number and order of samples never change after construction. Only
/// histories are mutated, through [`SamplePointCloud::record`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplePointCloud {
    samples: Vec<SurfaceSample>,
}

impl SamplePointCloud {
    /// Wraps `points` with empty histories of the given capacity.
    #[must_use]
    pub fn new(points: Vec<SamplePoint>, capacity: usize) -> Self {
        let samples = points
            .into_iter()
            .map(|point| SurfaceSample {
                point,
                history: ViewHistory::with_capacity(capacity),
            })
            .collect();
        Self { samples }
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if the cloud has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the sample at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SurfaceSample> {
        self.samples.get(index)
    }

    /// Returns the history of the sample at `index`.
    #[must_use]
    pub fn history(&self, index: usize) -> Option<&ViewHistory> {
        self.samples.get(index).map(|s| &s.history)
    }

    /// All samples in index order.
    #[must_use]
    pub fn samples(&self) -> &[SurfaceSample] {
        &self.samples
    }

    /// Iterates over samples in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, SurfaceSample> {
        self.samples.iter()
    }

    /// Appends an observed view direction to a sample's history and adds the
    /// reconstructability gain it earned.
    ///
    /// Out-of-range indices are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ViewTypesError::HistoryFull`] if the history is at
    /// capacity. The gain is not applied in that case.
    pub fn record(&mut self, index: usize, direction: Vector3<f64>, gain: f64) -> ViewTypesResult<()> {
        if let Some(sample) = self.samples.get_mut(index) {
            sample.history.push(direction)?;
            sample.history.add_reconstructability(gain);
        }
        Ok(())
    }

    /// Number of samples with at least `min_views` committed views.
    #[must_use]
    pub fn count_observed(&self, min_views: usize) -> usize {
        self.samples
            .iter()
            .filter(|s| s.history.len() >= min_views.max(1))
            .count()
    }
}

impl<'a> IntoIterator for &'a SamplePointCloud {
    type Item = &'a SurfaceSample;
    type IntoIter = std::slice::Iter<'a, SurfaceSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
