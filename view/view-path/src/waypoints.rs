//! Waypoint extraction from a guidance volume.

use nalgebra::Point3;
use tracing::debug;
use view_types::GuidanceVolume;

/// Spacing between traversal rows, in voxels.
const ROW_PITCH: usize = 3;

/// Visits ground-plane columns of a `width x height` grid in serpentine order.
///
/// Rows `y = 1, 4, 7, ...` are walked while `y < height - 1`, skipping a
/// one-cell border. Columns run `1 ..= width - 2`, ascending on even rows and
/// descending on odd rows. Between consecutive rows the two intermediate cells
/// at the turning column are visited so the path steps along the edge.
///
/// Returns an empty sequence if `width` or `height` is below 3.
///
/// # Example
///
/// ```
/// use view_path::serpentine_columns;
///
/// let columns = serpentine_columns(5, 6);
/// assert_eq!(
///     columns,
///     vec![(1, 1), (2, 1), (3, 1), (3, 2), (3, 3), (3, 4), (2, 4), (1, 4)]
/// );
/// ```
#[must_use]
pub fn serpentine_columns(width: usize, height: usize) -> Vec<(usize, usize)> {
    if width < 3 || height < 3 {
        return Vec::new();
    }

    let last_x = width - 2;
    let last_row = height - 1;
    let mut columns = Vec::new();

    for (row, y) in (1..last_row).step_by(ROW_PITCH).enumerate() {
        let ascending = row % 2 == 0;
        if ascending {
            columns.extend((1..=last_x).map(|x| (x, y)));
        } else {
            columns.extend((1..=last_x).rev().map(|x| (x, y)));
        }

        if y + ROW_PITCH < last_row {
            let x_end = if ascending { last_x } else { 1 };
            columns.extend((1..ROW_PITCH).map(|dy| (x_end, y + dy)));
        }
    }

    columns
}

/// Returns the z slice with the highest score in column `(x, y)`.
///
/// A slice's score is the maximum of its finite samples; slices without
/// finite samples are skipped. The strictly greatest score wins, so ties resolve to the lowest
/// slice. A column without any samples resolves to the top slice.
#[must_use]
pub fn best_slice(volume: &GuidanceVolume, x: usize, y: usize) -> usize {
    let mut best: Option<(usize, f32)> = None;
    for z in 0..volume.depth() {
        let Some(score) = volume
            .samples(x, y, z)
            .iter()
            .copied()
            .filter(|s| s.is_finite())
            .reduce(f32::max)
        else {
            continue;
        };
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((z, score));
        }
    }
    best.map_or(volume.depth().saturating_sub(1), |(z, _)| z)
}

/// Extracts one waypoint per visited column of `volume`.
///
/// Columns are visited in [`serpentine_columns`] order; each waypoint is the
/// world position of the column's [`best_slice`].
#[must_use]
pub fn extract_waypoints(volume: &GuidanceVolume) -> Vec<Point3<f64>> {
    if volume.depth() == 0 {
        return Vec::new();
    }

    let waypoints: Vec<Point3<f64>> = serpentine_columns(volume.width(), volume.height())
        .into_iter()
        .map(|(x, y)| volume.index_to_world(x, y, best_slice(volume, x, y)))
        .collect();

    debug!(
        width = volume.width(),
        height = volume.height(),
        depth = volume.depth(),
        waypoints = waypoints.len(),
        "Extracted waypoints"
    );
    waypoints
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_thin_grids_are_empty() {
        assert!(serpentine_columns(2, 10).is_empty());
        assert!(serpentine_columns(10, 2).is_empty());
        assert_eq!(serpentine_columns(3, 3), vec![(1, 1)]);
    }

    #[test]
    fn test_serpentine_alternates() {
        let columns = serpentine_columns(6, 9);
        // Rows 1, 4 and 7; two connectors between each pair of rows
        assert_eq!(columns.len(), 3 * 4 + 2 * 2);
        assert_eq!(&columns[..4], &[(1, 1), (2, 1), (3, 1), (4, 1)]);
        assert_eq!(&columns[4..6], &[(4, 2), (4, 3)]);
        assert_eq!(&columns[6..10], &[(4, 4), (3, 4), (2, 4), (1, 4)]);
        assert_eq!(&columns[10..12], &[(1, 5), (1, 6)]);
        assert_eq!(&columns[12..], &[(1, 7), (2, 7), (3, 7), (4, 7)]);
    }

    #[test]
    fn test_consecutive_columns_are_adjacent() {
        let columns = serpentine_columns(12, 20);
        for pair in columns.windows(2) {
            let dx = pair[0].0.abs_diff(pair[1].0);
            let dy = pair[0].1.abs_diff(pair[1].1);
            assert_eq!(dx + dy, 1, "{pair:?}");
        }
    }

    #[test]
    fn test_best_slice() {
        let mut volume = GuidanceVolume::axis_aligned([3, 3, 5], Point3::origin(), 1.0).unwrap();
        // Empty column resolves to the top slice
        assert_eq!(best_slice(&volume, 1, 1), 4);

        volume.push_sample(1, 1, 0, 0.2).unwrap();
        volume.push_sample(1, 1, 2, 0.1).unwrap();
        volume.push_sample(1, 1, 2, 0.9).unwrap();
        volume.push_sample(1, 1, 3, 0.9).unwrap();
        // Max of samples per slice; ties go to the lower slice
        assert_eq!(best_slice(&volume, 1, 1), 2);
    }

    #[test]
    fn test_best_slice_ignores_non_finite() {
        let mut volume = GuidanceVolume::axis_aligned([3, 3, 4], Point3::origin(), 1.0).unwrap();
        volume.push_sample(1, 1, 0, f32::NAN).unwrap();
        volume.push_sample(1, 1, 1, f32::INFINITY).unwrap();
        volume.push_sample(1, 1, 1, 0.5).unwrap();
        volume.push_sample(1, 1, 2, 5.0).unwrap();
        assert_eq!(best_slice(&volume, 1, 1), 2);

        // Only non-finite samples count as an empty column
        let mut nan_only = GuidanceVolume::axis_aligned([3, 3, 4], Point3::origin(), 1.0).unwrap();
        nan_only.push_sample(1, 1, 0, f32::NAN).unwrap();
        assert_eq!(best_slice(&nan_only, 1, 1), 3);
    }

    #[test]
    fn test_extract_waypoints() {
        let mut volume =
            GuidanceVolume::axis_aligned([5, 5, 4], Point3::new(-10.0, -10.0, 0.0), 5.0).unwrap();
        volume.push_sample(2, 1, 1, 1.0).unwrap();

        let waypoints = extract_waypoints(&volume);
        assert_eq!(waypoints.len(), 3);
        assert_relative_eq!(waypoints[0], Point3::new(-5.0, -5.0, 15.0));
        assert_relative_eq!(waypoints[1], Point3::new(0.0, -5.0, 5.0));
        assert_relative_eq!(waypoints[2], Point3::new(5.0, -5.0, 15.0));
    }
}
