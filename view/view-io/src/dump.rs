//! Histogram image dumps for inspecting a planning run.

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};
use tracing::{debug, warn};
use view_plan::{PlanObserver, SphericalHistogram};

use crate::error::LoadResult;

/// Writes every `every`-th waypoint histogram as a grayscale PNG.
///
/// Columns are azimuth bins and rows are elevation bins, top row straight
/// down. Each image is scaled so its highest score is white. Write failures
/// are logged and never interrupt planning.
#[derive(Debug, Clone)]
pub struct HistogramDump {
    dir: PathBuf,
    every: usize,
    written: usize,
    failed: usize,
}

impl HistogramDump {
    /// Dumps into `dir`, created on first write. An interval of 0 is treated as 1.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, every: usize) -> Self {
        Self {
            dir: dir.into(),
            every: every.max(1),
            written: 0,
            failed: 0,
        }
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of images written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Number of images that failed to write.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.failed
    }

    /// File name used for a waypoint's histogram.
    #[must_use]
    pub fn file_name(waypoint: usize) -> String {
        format!("histogram_{waypoint:05}.png")
    }

    /// Writes one histogram image and returns its path.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LoadError::Io`] if the directory cannot be created and
    /// [`crate::LoadError::Image`] if encoding or saving fails.
    pub fn write(&self, waypoint: usize, histogram: &SphericalHistogram) -> LoadResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(Self::file_name(waypoint));
        histogram_image(histogram).save(&path)?;
        Ok(path)
    }
}

impl PlanObserver for HistogramDump {
    fn histogram(&mut self, waypoint: usize, histogram: &SphericalHistogram) {
        if waypoint % self.every != 0 {
            return;
        }
        match self.write(waypoint, histogram) {
            Ok(path) => {
                self.written += 1;
                debug!(waypoint, path = %path.display(), "dumped histogram");
            }
            Err(error) => {
                self.failed += 1;
                warn!(waypoint, dir = %self.dir.display(), %error, "histogram dump failed");
            }
        }
    }
}

/// Render a histogram as an 8-bit image normalized to its maximum score.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn histogram_image(histogram: &SphericalHistogram) -> GrayImage {
    let width = histogram.azimuth_bins();
    let height = histogram.elevation_bins();
    let max = histogram.scores().iter().copied().fold(0.0_f64, f64::max);
    let scale = if max > 0.0 { 255.0 / max } else { 0.0 };

    let mut image = GrayImage::new(width as u32, height as u32);
    for elevation in 0..height {
        for azimuth in 0..width {
            let value = (histogram.get(azimuth, elevation) * scale).round().clamp(0.0, 255.0);
            image.put_pixel(azimuth as u32, elevation as u32, Luma([value as u8]));
        }
    }
    image
}
