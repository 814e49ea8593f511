//! Planner configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use view_types::CameraIntrinsics;

use crate::error::{PlanError, PlanResult};

/// Shape of the pairwise reconstructability model.
///
/// The parallax weight rises sharply past `parallax_min_angle` and the
/// baseline weight falls past `parallax_max_angle`; the slopes control how
/// sharp each transition is. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReconstructabilityParams {
    /// Slope of the small-parallax penalty.
    pub parallax_slope: f64,
    /// Parallax angle at which the small-parallax weight is one half.
    pub parallax_min_angle: f64,
    /// Slope of the wide-baseline penalty.
    pub baseline_slope: f64,
    /// Parallax angle at which the wide-baseline weight is one half.
    pub parallax_max_angle: f64,
}

impl Default for ReconstructabilityParams {
    fn default() -> Self {
        Self {
            parallax_slope: 32.0,
            parallax_min_angle: std::f64::consts::PI / 16.0,
            baseline_slope: 8.0,
            parallax_max_angle: std::f64::consts::FRAC_PI_4,
        }
    }
}

/// Parameters for a planning run.
///
/// # Example
///
/// ```
/// use view_plan::PlannerConfig;
///
/// let config = PlannerConfig::default();
/// assert_eq!(config.view_count, 400);
/// assert!((config.resolved_ideal_distance() - 40.0).abs() < 1e-10);
///
/// let quick = PlannerConfig::preview().view_count(12).non_max_suppression(true);
/// assert_eq!(quick.view_count, 12);
/// assert!(quick.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlannerConfig {
    /// Number of camera views to plan (seed path length).
    pub view_count: usize,

    /// Maximum camera-to-point distance at which a point counts as visible.
    pub max_distance: f64,

    /// Camera model used for both histogram projection and commits.
    pub intrinsics: CameraIntrinsics,

    /// Histogram bins around the azimuth.
    pub azimuth_bins: usize,

    /// Histogram bins from horizon to nadir.
    pub elevation_bins: usize,

    /// Candidate view directions swept per waypoint.
    pub direction_count: usize,

    /// Pairwise reconstructability model.
    pub reconstructability: ReconstructabilityParams,

    /// Score granted to a point's first observation.
    pub first_view_reward: f64,

    /// Distance below which no distance falloff applies.
    /// `None` uses half of `max_distance`.
    pub ideal_distance: Option<f64>,

    /// Slack for occlusion tests, so the surface a point lies on does not
    /// hide it.
    pub occlusion_epsilon: f64,

    /// Clamp each histogram bin to its neighbourhood maximum before picking
    /// the best orientation.
    pub non_max_suppression: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            view_count: 400,
            max_distance: 80.0,
            intrinsics: CameraIntrinsics::default(),
            azimuth_bins: 256,
            elevation_bins: 90,
            direction_count: 2048,
            reconstructability: ReconstructabilityParams::default(),
            first_view_reward: 1.0,
            ideal_distance: None,
            occlusion_epsilon: 1e-3,
            non_max_suppression: false,
        }
    }
}

impl PlannerConfig {
    /// Coarse settings for quick previews and tests.
    ///
    /// Uses a 64 x 24 histogram and 512 candidate directions.
    #[must_use]
    pub fn preview() -> Self {
        Self {
            view_count: 40,
            azimuth_bins: 64,
            elevation_bins: 24,
            direction_count: 512,
            ..Self::default()
        }
    }

    /// Set the number of views.
    #[must_use]
    pub const fn view_count(mut self, count: usize) -> Self {
        self.view_count = count;
        self
    }

    /// Set the maximum visibility distance.
    #[must_use]
    pub const fn max_distance(mut self, distance: f64) -> Self {
        self.max_distance = distance;
        self
    }

    /// Set the camera intrinsics.
    #[must_use]
    pub const fn intrinsics(mut self, intrinsics: CameraIntrinsics) -> Self {
        self.intrinsics = intrinsics;
        self
    }

    /// Set the histogram resolution.
    #[must_use]
    pub const fn histogram_bins(mut self, azimuth: usize, elevation: usize) -> Self {
        self.azimuth_bins = azimuth;
        self.elevation_bins = elevation;
        self
    }

    /// Set the number of candidate directions.
    #[must_use]
    pub const fn direction_count(mut self, count: usize) -> Self {
        self.direction_count = count;
        self
    }

    /// Set the first-view reward.
    #[must_use]
    pub const fn first_view_reward(mut self, reward: f64) -> Self {
        self.first_view_reward = reward;
        self
    }

    /// Set an explicit ideal distance.
    #[must_use]
    pub const fn ideal_distance(mut self, distance: f64) -> Self {
        self.ideal_distance = Some(distance);
        self
    }

    /// Enable or disable histogram non-maximum suppression.
    #[must_use]
    pub const fn non_max_suppression(mut self, enabled: bool) -> Self {
        self.non_max_suppression = enabled;
        self
    }

    /// Effective ideal distance.
    #[must_use]
    pub fn resolved_ideal_distance(&self) -> f64 {
        self.ideal_distance.unwrap_or(self.max_distance / 2.0)
    }

    /// Checks that every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> PlanResult<()> {
        if self.view_count == 0 {
            return Err(PlanError::invalid_config("view count must be at least 1"));
        }
        if !self.max_distance.is_finite() || self.max_distance <= 0.0 {
            return Err(PlanError::invalid_config(format!(
                "max distance must be positive, got {}",
                self.max_distance
            )));
        }
        self.intrinsics
            .validate()
            .map_err(|e| PlanError::invalid_config(e.to_string()))?;
        if self.azimuth_bins == 0 {
            return Err(PlanError::invalid_config("azimuth bins must be at least 1"));
        }
        if self.elevation_bins < 2 {
            return Err(PlanError::invalid_config(format!(
                "elevation bins must be at least 2, got {}",
                self.elevation_bins
            )));
        }
        if self.direction_count == 0 {
            return Err(PlanError::invalid_config("direction count must be at least 1"));
        }
        let ideal = self.resolved_ideal_distance();
        if !ideal.is_finite() || ideal <= 0.0 {
            return Err(PlanError::invalid_config(format!(
                "ideal distance must be positive, got {ideal}"
            )));
        }
        if !self.first_view_reward.is_finite() || self.first_view_reward < 0.0 {
            return Err(PlanError::invalid_config(format!(
                "first view reward must be non-negative, got {}",
                self.first_view_reward
            )));
        }
        if !self.occlusion_epsilon.is_finite() || self.occlusion_epsilon < 0.0 {
            return Err(PlanError::invalid_config(format!(
                "occlusion epsilon must be non-negative, got {}",
                self.occlusion_epsilon
            )));
        }
        Ok(())
    }
}
