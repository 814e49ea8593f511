//! Azimuth/elevation score histogram over camera orientations.

use std::f64::consts::{FRAC_PI_2, TAU};

use nalgebra::Vector3;

/// Dense grid of orientation scores.
///
/// Azimuth bin `i` covers `theta = 2 pi i / azimuth_bins`. Elevation bin `j`
/// covers `phi = pi/2 + (pi/2) j / (elevation_bins - 1)`, measured from the
/// zenith, so row 0 looks at the horizon and the last row looks straight
/// down. Scores are stored row-major with elevation outer; the flat index
/// `j * azimuth_bins + i` is also the raster order used for tie-breaking.
///
/// # Example
///
/// ```
/// use view_plan::SphericalHistogram;
///
/// let mut histogram = SphericalHistogram::new(8, 5);
/// histogram.set(3, 4, 2.0);
/// histogram.set(5, 1, 2.0);
///
/// // Ties resolve to the first bin in raster order.
/// let best = histogram.argmax().unwrap();
/// assert_eq!((best.azimuth, best.elevation), (5, 1));
/// assert!((histogram.direction(3, 4).z + 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SphericalHistogram {
    azimuth_bins: usize,
    elevation_bins: usize,
    scores: Vec<f64>,
}

/// Location and score of a histogram bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinPeak {
    /// Azimuth bin index.
    pub azimuth: usize,
    /// Elevation bin index.
    pub elevation: usize,
    /// Bin score.
    pub score: f64,
}

impl SphericalHistogram {
    /// Creates an all-zero histogram.
    #[must_use]
    pub fn new(azimuth_bins: usize, elevation_bins: usize) -> Self {
        Self {
            azimuth_bins,
            elevation_bins,
            scores: vec![0.0; azimuth_bins * elevation_bins],
        }
    }

    /// Wraps precomputed scores in flat raster order.
    ///
    /// Returns `None` if `scores` has the wrong length.
    #[must_use]
    pub fn from_scores(azimuth_bins: usize, elevation_bins: usize, scores: Vec<f64>) -> Option<Self> {
        (scores.len() == azimuth_bins * elevation_bins).then_some(Self {
            azimuth_bins,
            elevation_bins,
            scores,
        })
    }

    /// Number of azimuth bins.
    #[must_use]
    pub fn azimuth_bins(&self) -> usize {
        self.azimuth_bins
    }

    /// Number of elevation bins.
    #[must_use]
    pub fn elevation_bins(&self) -> usize {
        self.elevation_bins
    }

    /// Total number of bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Returns `true` if the histogram has no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Scores in flat raster order.
    #[must_use]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Flat index of bin `(azimuth, elevation)`.
    #[must_use]
    pub fn index(&self, azimuth: usize, elevation: usize) -> usize {
        elevation * self.azimuth_bins + azimuth
    }

    /// Bin coordinates of a flat index.
    #[must_use]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.azimuth_bins, index / self.azimuth_bins)
    }

    /// Score of bin `(azimuth, elevation)`.
    #[must_use]
    pub fn get(&self, azimuth: usize, elevation: usize) -> f64 {
        self.scores[self.index(azimuth, elevation)]
    }

    /// Overwrites the score of bin `(azimuth, elevation)`.
    pub fn set(&mut self, azimuth: usize, elevation: usize, score: f64) {
        let index = self.index(azimuth, elevation);
        self.scores[index] = score;
    }

    /// Azimuth angle of bin column `azimuth`.
    #[must_use]
    pub fn theta(&self, azimuth: usize) -> f64 {
        TAU * azimuth as f64 / self.azimuth_bins as f64
    }

    /// Polar angle from the zenith of bin row `elevation`.
    #[must_use]
    pub fn phi(&self, elevation: usize) -> f64 {
        let steps = self.elevation_bins.saturating_sub(1).max(1) as f64;
        FRAC_PI_2 + FRAC_PI_2 * elevation as f64 / steps
    }

    /// Unit viewing direction of bin `(azimuth, elevation)`.
    #[must_use]
    pub fn direction(&self, azimuth: usize, elevation: usize) -> Vector3<f64> {
        spherical_to_direction(self.theta(azimuth), self.phi(elevation))
    }

    /// Bin with the strictly greatest score; the first in raster order wins
    /// ties.
    #[must_use]
    pub fn argmax(&self) -> Option<BinPeak> {
        let mut best: Option<(usize, f64)> = None;
        for (index, &score) in self.scores.iter().enumerate() {
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((index, score));
            }
        }
        best.map(|(index, score)| {
            let (azimuth, elevation) = self.coords(index);
            BinPeak {
                azimuth,
                elevation,
                score,
            }
        })
    }

    /// Sum of all bin scores.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.scores.iter().sum()
    }

    /// Returns a copy where each bin is clamped to the maximum of its eight
    /// neighbours.
    ///
    /// Azimuth wraps around; elevation clamps at the first and last rows, so
    /// edge rows only see neighbours that exist. An isolated spike is lowered
    /// to its strongest neighbour while plateaus keep their value.
    #[must_use]
    pub fn non_max_suppressed(&self) -> Self {
        let a = self.azimuth_bins;
        let e = self.elevation_bins;
        let mut scores = Vec::with_capacity(self.scores.len());

        for j in 0..e {
            for i in 0..a {
                let mut neighbour_max = f64::NEG_INFINITY;
                for dj in [-1isize, 0, 1] {
                    let Some(nj) = j.checked_add_signed(dj).filter(|&nj| nj < e) else {
                        continue;
                    };
                    for di in [a - 1, 0, 1] {
                        let ni = (i + di) % a;
                        if (ni, nj) != (i, j) {
                            neighbour_max = neighbour_max.max(self.get(ni, nj));
                        }
                    }
                }
                let value = self.get(i, j);
                scores.push(if neighbour_max.is_finite() {
                    value.min(neighbour_max)
                } else {
                    value
                });
            }
        }

        Self {
            azimuth_bins: a,
            elevation_bins: e,
            scores,
        }
    }
}

/// Converts azimuth `theta` and polar angle `phi` (from +Z) to a unit vector.
#[must_use]
pub fn spherical_to_direction(theta: f64, phi: f64) -> Vector3<f64> {
    Vector3::new(theta.cos() * phi.sin(), theta.sin() * phi.sin(), phi.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_bin_angles() {
        let h = SphericalHistogram::new(256, 90);
        assert_eq!(h.len(), 256 * 90);
        assert_relative_eq!(h.theta(64), FRAC_PI_2);
        assert_relative_eq!(h.phi(0), FRAC_PI_2);
        assert_relative_eq!(h.phi(89), PI);
        assert_relative_eq!(h.direction(0, 89), -Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(h.direction(0, 0), Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn test_index_roundtrip() {
        let h = SphericalHistogram::new(7, 4);
        for j in 0..4 {
            for i in 0..7 {
                assert_eq!(h.coords(h.index(i, j)), (i, j));
            }
        }
        assert_eq!(h.index(2, 3), 23);
    }

    #[test]
    fn test_argmax_first_wins() {
        let mut h = SphericalHistogram::new(4, 3);
        h.set(1, 2, 5.0);
        h.set(3, 0, 5.0);
        let peak = h.argmax().unwrap();
        assert_eq!((peak.azimuth, peak.elevation), (3, 0));
        assert_relative_eq!(peak.score, 5.0);
    }

    #[test]
    fn test_argmax_all_zero() {
        let h = SphericalHistogram::new(4, 3);
        let peak = h.argmax().unwrap();
        assert_eq!((peak.azimuth, peak.elevation), (0, 0));
        assert_relative_eq!(peak.score, 0.0);
        assert!(SphericalHistogram::new(0, 0).argmax().is_none());
    }

    #[test]
    fn test_from_scores_checks_length() {
        assert!(SphericalHistogram::from_scores(2, 2, vec![0.0; 4]).is_some());
        assert!(SphericalHistogram::from_scores(2, 2, vec![0.0; 3]).is_none());
    }

    #[test]
    fn test_nms_flattens_spike() {
        let mut h = SphericalHistogram::new(6, 4);
        h.set(2, 1, 10.0);
        h.set(3, 1, 4.0);
        let s = h.non_max_suppressed();
        assert_relative_eq!(s.get(2, 1), 4.0);
        assert_relative_eq!(s.get(3, 1), 4.0);
        assert_relative_eq!(s.get(0, 3), 0.0);
    }

    #[test]
    fn test_nms_wraps_azimuth() {
        let mut h = SphericalHistogram::new(5, 3);
        for j in 0..3 {
            h.set(0, j, 3.0);
            h.set(4, j, 3.0);
        }
        let s = h.non_max_suppressed();
        // Columns 0 and 4 are neighbours across the seam
        for j in 0..3 {
            assert_relative_eq!(s.get(0, j), 3.0);
            assert_relative_eq!(s.get(4, j), 3.0);
        }
        assert_relative_eq!(s.get(2, 1), 0.0);
    }

    #[test]
    fn test_nms_keeps_original() {
        let mut h = SphericalHistogram::new(3, 3);
        h.set(1, 1, 1.0);
        let _ = h.non_max_suppressed();
        assert_relative_eq!(h.get(1, 1), 1.0);
    }
}
