//! Pairwise reconstructability model.

use nalgebra::Vector3;
use view_types::ViewHistory;

use crate::config::{PlannerConfig, ReconstructabilityParams};

/// Scores how much a new view of a surface point adds to its reconstruction.
///
/// For a candidate view direction `v` (camera to point, unit length) at
/// distance `d` and a prior direction `h`, the pair quality is
///
/// ```text
/// q(v, h) = w1(alpha) * w2(d) * w3(alpha) * wn(v, h)
/// alpha   = acos(v . h)
/// w1      = 1 / (1 + exp(-k1 (alpha - alpha_min)))
/// w3      = 1 - 1 / (1 + exp(-k3 (alpha - alpha_max)))
/// w2      = min(1, d_ideal / d)
/// wn      = max(0, min(-v . n, -h . n))      (1 without a normal)
/// ```
///
/// # Example
///
/// ```
/// use view_plan::{PlannerConfig, ReconstructabilityModel};
/// use view_types::ViewHistory;
/// use nalgebra::Vector3;
///
/// let model = ReconstructabilityModel::from_config(&PlannerConfig::default());
/// let down = Vector3::new(0.0, 0.0, -1.0);
/// let up = Some(Vector3::new(0.0, 0.0, 1.0));
///
/// // An unobserved point earns the first-view reward.
/// let empty = ViewHistory::with_capacity(4);
/// assert!((model.contribution(&down, 10.0, up.as_ref(), &empty) - 1.0).abs() < 1e-12);
///
/// // Repeating the same view adds almost nothing.
/// let mut seen = ViewHistory::with_capacity(4);
/// seen.push(down).unwrap();
/// assert!(model.contribution(&down, 10.0, up.as_ref(), &seen) < 1e-2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructabilityModel {
    params: ReconstructabilityParams,
    ideal_distance: f64,
    first_view_reward: f64,
}

impl ReconstructabilityModel {
    /// Creates a model from explicit parameters.
    #[must_use]
    pub const fn new(
        params: ReconstructabilityParams,
        ideal_distance: f64,
        first_view_reward: f64,
    ) -> Self {
        Self {
            params,
            ideal_distance,
            first_view_reward,
        }
    }

    /// Creates the model described by a planner configuration.
    #[must_use]
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(
            config.reconstructability,
            config.resolved_ideal_distance(),
            config.first_view_reward,
        )
    }

    /// Distance falloff `min(1, d_ideal / d)`.
    #[must_use]
    pub fn distance_weight(&self, distance: f64) -> f64 {
        if distance <= self.ideal_distance {
            1.0
        } else {
            self.ideal_distance / distance
        }
    }

    /// Small-parallax weight `w1`.
    #[must_use]
    pub fn parallax_weight(&self, alpha: f64) -> f64 {
        let p = &self.params;
        1.0 / (1.0 + (-p.parallax_slope * (alpha - p.parallax_min_angle)).exp())
    }

    /// Wide-baseline weight `w3`.
    #[must_use]
    pub fn baseline_weight(&self, alpha: f64) -> f64 {
        let p = &self.params;
        1.0 - 1.0 / (1.0 + (-p.baseline_slope * (alpha - p.parallax_max_angle)).exp())
    }

    /// Quality of observing a point from `view` at `distance` given a prior
    /// view along `prior`.
    #[must_use]
    pub fn pair_quality(
        &self,
        view: &Vector3<f64>,
        prior: &Vector3<f64>,
        distance: f64,
        normal: Option<&Vector3<f64>>,
    ) -> f64 {
        let alpha = view.dot(prior).clamp(-1.0, 1.0).acos();
        let wn = normal.map_or(1.0, |n| (-view.dot(n)).min(-prior.dot(n)).max(0.0));
        if wn == 0.0 {
            return 0.0;
        }
        self.parallax_weight(alpha) * self.distance_weight(distance) * self.baseline_weight(alpha) * wn
    }

    /// Sum of pair qualities of `view` against every direction in `history`.
    ///
    /// This is the reconstructability a point gains when the view is
    /// committed.
    #[must_use]
    pub fn gain(
        &self,
        view: &Vector3<f64>,
        distance: f64,
        normal: Option<&Vector3<f64>>,
        history: &ViewHistory,
    ) -> f64 {
        history
            .directions()
            .iter()
            .map(|prior| self.pair_quality(view, prior, distance, normal))
            .sum()
    }

    /// Score of a candidate view for a point with the given history.
    ///
    /// An unobserved point scores the first-view reward scaled by distance and
    /// incidence. An observed point scores its [`gain`](Self::gain) damped by
    /// the reconstructability it already has.
    #[must_use]
    pub fn contribution(
        &self,
        view: &Vector3<f64>,
        distance: f64,
        normal: Option<&Vector3<f64>>,
        history: &ViewHistory,
    ) -> f64 {
        if history.is_empty() {
            let facing = normal.map_or(1.0, |n| (-view.dot(n)).max(0.0));
            return self.first_view_reward * self.distance_weight(distance) * facing;
        }
        self.gain(view, distance, normal, history) / (1.0 + history.reconstructability())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn model() -> ReconstructabilityModel {
        ReconstructabilityModel::from_config(&PlannerConfig::default())
    }

    fn tilted(angle: f64) -> Vector3<f64> {
        Vector3::new(angle.sin(), 0.0, -angle.cos())
    }

    #[test]
    fn test_weights_at_midpoints() {
        let m = model();
        assert_relative_eq!(m.parallax_weight(PI / 16.0), 0.5);
        assert_relative_eq!(m.baseline_weight(PI / 4.0), 0.5);
        assert!(m.parallax_weight(0.0) < 0.01);
        assert!(m.baseline_weight(PI / 2.0) < 0.01);
    }

    #[test]
    fn test_distance_weight() {
        let m = model();
        assert_relative_eq!(m.distance_weight(10.0), 1.0);
        assert_relative_eq!(m.distance_weight(40.0), 1.0);
        assert_relative_eq!(m.distance_weight(80.0), 0.5);
    }

    #[test]
    fn test_pair_quality_peaks_between_extremes() {
        let m = model();
        let h = tilted(0.0);
        let q_small = m.pair_quality(&tilted(0.05), &h, 10.0, None);
        let q_mid = m.pair_quality(&tilted(PI / 6.0), &h, 10.0, None);
        let q_wide = m.pair_quality(&tilted(PI / 2.0), &h, 10.0, None);
        assert!(q_mid > q_small);
        assert!(q_mid > q_wide);
    }

    #[test]
    fn test_backfacing_pair_scores_zero() {
        let m = model();
        let n = Vector3::z();
        // Prior view looks at the point from below the surface
        let q = m.pair_quality(&tilted(PI / 6.0), &Vector3::z(), 10.0, Some(&n));
        assert_relative_eq!(q, 0.0);
    }

    #[test]
    fn test_first_view_contribution() {
        let m = model();
        let empty = ViewHistory::with_capacity(3);
        let n = Vector3::z();
        let c = m.contribution(&tilted(PI / 3.0), 80.0, Some(&n), &empty);
        // reward 1 * distance 0.5 * cos(60 deg)
        assert_relative_eq!(c, 0.25, epsilon = 1e-12);

        let c = m.contribution(&tilted(PI / 3.0), 80.0, None, &empty);
        assert_relative_eq!(c, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_contribution_diminishes_with_reconstructability() {
        let m = model();
        let mut history = ViewHistory::with_capacity(3);
        history.push(tilted(0.0)).unwrap();
        let view = tilted(PI / 6.0);

        let fresh = m.contribution(&view, 10.0, None, &history);
        assert_relative_eq!(fresh, m.gain(&view, 10.0, None, &history));

        history.add_reconstructability(1.0);
        let damped = m.contribution(&view, 10.0, None, &history);
        assert_relative_eq!(damped, fresh / 2.0);
    }
}
