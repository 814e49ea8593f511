//! Clamped cubic B-spline.

use nalgebra::Point3;

use crate::error::{PathError, PathResult};

/// Spline degree.
const DEGREE: usize = 3;

/// Minimum control points for a cubic spline.
pub const MIN_CONTROL_POINTS: usize = DEGREE + 1;

/// Cubic B-spline with a clamped knot vector and uniformly spaced interior
/// knots, parameterized over `[0, 1]`.
///
/// The clamped knots make the curve start exactly at the first control point
/// and end exactly at the last. Every point of the curve lies in the convex
/// hull of the control points.
///
/// # Example
///
/// ```
/// use view_path::CubicBSpline;
/// use nalgebra::Point3;
///
/// let spline = CubicBSpline::clamped(vec![
///     Point3::new(0.0, 0.0, 10.0),
///     Point3::new(1.0, 2.0, 10.0),
///     Point3::new(3.0, 2.0, 10.0),
///     Point3::new(4.0, 0.0, 10.0),
/// ])
/// .unwrap();
///
/// assert_eq!(spline.point_at(0.0), Point3::new(0.0, 0.0, 10.0));
/// assert_eq!(spline.point_at(1.0), Point3::new(4.0, 0.0, 10.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CubicBSpline {
    control_points: Vec<Point3<f64>>,
    knots: Vec<f64>,
}

impl CubicBSpline {
    /// Fits a clamped cubic spline to `control_points`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InsufficientWaypoints`] with fewer than four
    /// control points.
    pub fn clamped(control_points: Vec<Point3<f64>>) -> PathResult<Self> {
        let n = control_points.len();
        if n < MIN_CONTROL_POINTS {
            return Err(PathError::insufficient_waypoints(MIN_CONTROL_POINTS, n));
        }

        let interior = n - MIN_CONTROL_POINTS;
        let spacing = (interior + 1) as f64;
        let knots = std::iter::repeat_n(0.0, DEGREE + 1)
            .chain((1..=interior).map(|i| i as f64 / spacing))
            .chain(std::iter::repeat_n(1.0, DEGREE + 1))
            .collect();

        Ok(Self {
            control_points,
            knots,
        })
    }

    /// Control points.
    #[must_use]
    pub fn control_points(&self) -> &[Point3<f64>] {
        &self.control_points
    }

    /// Knot vector (`control_points + 4` entries).
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Evaluates the curve at `t`, clamped to `[0, 1]`.
    ///
    /// Uses de Boor's algorithm on the four control points influencing the
    /// knot span containing `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        let t = t.clamp(0.0, 1.0);
        let k = self.span(t);

        let mut d: [Point3<f64>; DEGREE + 1] =
            std::array::from_fn(|j| self.control_points[j + k - DEGREE]);

        for r in 1..=DEGREE {
            for j in (r..=DEGREE).rev() {
                let lo = self.knots[j + k - DEGREE];
                let hi = self.knots[j + 1 + k - r];
                let alpha = (t - lo) / (hi - lo);
                d[j] = d[j - 1] + (d[j] - d[j - 1]) * alpha;
            }
        }

        d[DEGREE]
    }

    /// Index `k` of the knot span `[knots[k], knots[k + 1])` holding `t`,
    /// restricted to spans of non-zero length.
    fn span(&self, t: f64) -> usize {
        let last = self.control_points.len() - 1;
        let upper = self.knots.partition_point(|&u| u <= t);
        upper.saturating_sub(1).clamp(DEGREE, last)
    }
}
