//! Candidate view directions.

use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Vector3;
use tracing::debug;

use crate::error::{SpatialError, SpatialResult};

/// Fixed set of unit directions on the downward hemisphere (`z <= 0`),
/// indexed for nearest-direction lookup.
///
/// Directions follow a Fibonacci lattice, which spreads them almost uniformly
/// by area. The set is immutable once built.
pub struct DirectionSet {
    directions: Vec<Vector3<f64>>,
    tree: KdTree<f64, 3>,
}

impl std::fmt::Debug for DirectionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectionSet")
            .field("len", &self.directions.len())
            .finish_non_exhaustive()
    }
}

impl DirectionSet {
    /// Builds `count` directions covering the downward hemisphere.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::EmptyDirectionSet`] if `count` is zero.
    pub fn downward_hemisphere(count: usize) -> SpatialResult<Self> {
        if count == 0 {
            return Err(SpatialError::EmptyDirectionSet);
        }

        let golden_ratio = (1.0 + 5.0_f64.sqrt()) / 2.0;
        let n = count as f64;
        let directions: Vec<Vector3<f64>> = (0..count)
            .map(|i| {
                let i = i as f64;
                // Equal-area bands in z; every direction has a distinct z
                let z = -(i + 0.5) / n;
                let r = (1.0 - z * z).max(0.0).sqrt();
                let theta = 2.0 * std::f64::consts::PI * i / golden_ratio;
                Vector3::new(r * theta.cos(), r * theta.sin(), z)
            })
            .collect();

        let mut tree: KdTree<f64, 3> = KdTree::new();
        for (i, d) in directions.iter().enumerate() {
            tree.add(&[d.x, d.y, d.z], i as u64);
        }

        debug!(count, "Built candidate direction set");
        Ok(Self { directions, tree })
    }

    /// Index of the direction closest to `direction`.
    ///
    /// `direction` should be unit length; upward directions map to the
    /// nearest direction on the rim.
    #[must_use]
    pub fn nearest(&self, direction: &Vector3<f64>) -> usize {
        let nearest = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[direction.x, direction.y, direction.z]);
        #[allow(clippy::cast_possible_truncation)]
        let index = nearest.item as usize;
        index
    }

    /// Direction at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn direction(&self, index: usize) -> Vector3<f64> {
        self.directions[index]
    }

    /// All directions in index order.
    #[must_use]
    pub fn directions(&self) -> &[Vector3<f64>] {
        &self.directions
    }

    /// Number of directions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    /// Always `false`; construction rejects empty sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}
