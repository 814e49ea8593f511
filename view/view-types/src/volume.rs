//! Sparse guidance volume.

use hashbrown::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use nalgebra::{Affine3, Matrix4, Point3, Vector3};

use crate::error::{ViewTypesError, ViewTypesResult};

/// Voxel grid of position-quality samples.
///
/// Each voxel `(x, y, z)` holds zero or more `f32` samples scoring how good a
/// camera position inside it is. Storage is sparse: only voxels that received
/// samples are allocated. Voxel indices map to world coordinates through a
/// fixed affine transform.
///
/// # Example
///
/// ```
/// use view_types::GuidanceVolume;
/// use nalgebra::Point3;
///
/// let mut volume = GuidanceVolume::axis_aligned([4, 4, 4], Point3::new(-2.0, -2.0, 0.0), 0.5).unwrap();
/// volume.push_sample(1, 2, 3, 0.8).unwrap();
///
/// assert_eq!(volume.samples(1, 2, 3), &[0.8]);
/// assert!(volume.samples(0, 0, 0).is_empty());
/// assert_eq!(volume.index_to_world(1, 2, 3), Point3::new(-1.5, -1.0, 1.5));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GuidanceVolume {
    dims: [usize; 3],
    transform: Affine3<f64>,
    cells: HashMap<usize, Vec<f32>>,
}

impl GuidanceVolume {
    /// Creates an empty volume with the given dimensions and index-to-world
    /// transform.
    ///
    /// # Errors
    ///
    /// Returns [`ViewTypesError::InvalidDimensions`] if any dimension is zero
    /// or the voxel count overflows `usize`.
    pub fn new(dims: [usize; 3], transform: Affine3<f64>) -> ViewTypesResult<Self> {
        let [width, height, depth] = dims;
        let overflows = width
            .checked_mul(height)
            .and_then(|wh| wh.checked_mul(depth))
            .is_none();
        if width == 0 || height == 0 || depth == 0 || overflows {
            return Err(ViewTypesError::InvalidDimensions {
                width,
                height,
                depth,
            });
        }
        Ok(Self {
            dims,
            transform,
            cells: HashMap::new(),
        })
    }

    /// Creates an empty volume whose voxel `(x, y, z)` sits at
    /// `origin + voxel_size * (x, y, z)`.
    ///
    /// # Errors
    ///
    /// Same as [`GuidanceVolume::new`].
    pub fn axis_aligned(dims: [usize; 3], origin: Point3<f64>, voxel_size: f64) -> ViewTypesResult<Self> {
        let mut matrix = Matrix4::new_scaling(voxel_size);
        matrix[(3, 3)] = 1.0;
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&origin.coords);
        Self::new(dims, Affine3::from_matrix_unchecked(matrix))
    }

    /// Adds a quality sample to voxel `(x, y, z)`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewTypesError::VoxelOutOfBounds`] if the index lies outside
    /// the grid.
    pub fn push_sample(&mut self, x: usize, y: usize, z: usize, value: f32) -> ViewTypesResult<()> {
        let index = self
            .linear_index(x, y, z)
            .ok_or(ViewTypesError::VoxelOutOfBounds { x, y, z })?;
        self.cells.entry(index).or_default().push(value);
        Ok(())
    }

    /// Samples stored at voxel `(x, y, z)`; empty for absent or out-of-range
    /// voxels.
    #[must_use]
    pub fn samples(&self, x: usize, y: usize, z: usize) -> &[f32] {
        self.linear_index(x, y, z)
            .and_then(|i| self.cells.get(&i))
            .map_or(&[], Vec::as_slice)
    }

    /// Maximum sample at voxel `(x, y, z)`, or `None` if it holds no data.
    #[must_use]
    pub fn max_sample(&self, x: usize, y: usize, z: usize) -> Option<f32> {
        self.samples(x, y, z).iter().copied().reduce(f32::max)
    }

    /// World position of voxel `(x, y, z)`.
    #[must_use]
    pub fn index_to_world(&self, x: usize, y: usize, z: usize) -> Point3<f64> {
        self.transform * Point3::new(x as f64, y as f64, z as f64)
    }

    /// Grid dimensions `[width, height, depth]`.
    #[must_use]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Number of voxels along X.
    #[must_use]
    pub fn width(&self) -> usize {
        self.dims[0]
    }

    /// Number of voxels along Y.
    #[must_use]
    pub fn height(&self) -> usize {
        self.dims[1]
    }

    /// Number of voxels along Z.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.dims[2]
    }

    /// Index-to-world transform.
    #[must_use]
    pub fn transform(&self) -> &Affine3<f64> {
        &self.transform
    }

    /// Number of voxels holding at least one sample.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.len()
    }

    /// World-space edge vectors of one voxel along X, Y and Z.
    #[must_use]
    pub fn voxel_axes(&self) -> [Vector3<f64>; 3] {
        [
            self.transform * Vector3::x(),
            self.transform * Vector3::y(),
            self.transform * Vector3::z(),
        ]
    }

    fn linear_index(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        let [width, height, depth] = self.dims;
        (x < width && y < height && z < depth).then(|| (z * height + y) * width + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_dimension_rejected() {
        let err = GuidanceVolume::axis_aligned([4, 0, 4], Point3::origin(), 1.0).unwrap_err();
        assert_eq!(
            err,
            ViewTypesError::InvalidDimensions {
                width: 4,
                height: 0,
                depth: 4
            }
        );
    }

    #[test]
    fn test_sparse_samples() {
        let mut volume = GuidanceVolume::axis_aligned([3, 3, 3], Point3::origin(), 1.0).unwrap();
        volume.push_sample(2, 2, 2, 0.1).unwrap();
        volume.push_sample(2, 2, 2, 0.7).unwrap();
        volume.push_sample(2, 2, 2, 0.3).unwrap();

        assert_eq!(volume.samples(2, 2, 2).len(), 3);
        assert_eq!(volume.max_sample(2, 2, 2), Some(0.7));
        assert_eq!(volume.max_sample(0, 0, 0), None);
        assert_eq!(volume.occupied_count(), 1);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut volume = GuidanceVolume::axis_aligned([2, 2, 2], Point3::origin(), 1.0).unwrap();
        assert!(volume.push_sample(2, 0, 0, 1.0).is_err());
        assert!(volume.samples(5, 5, 5).is_empty());
    }

    #[test]
    fn test_axis_aligned_transform() {
        let volume = GuidanceVolume::axis_aligned([10, 10, 10], Point3::new(1.0, 2.0, 3.0), 2.5).unwrap();
        assert_relative_eq!(volume.index_to_world(0, 0, 0), Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(volume.index_to_world(2, 1, 4), Point3::new(6.0, 4.5, 13.0));
        assert_relative_eq!(volume.voxel_axes()[2], Vector3::new(0.0, 0.0, 2.5));
    }
}
