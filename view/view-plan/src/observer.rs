//! Hooks for inspecting a planning run as it progresses.

use view_types::CameraPose;

use crate::histogram::SphericalHistogram;

/// Receives intermediate results from [`crate::Planner::plan`].
///
/// Every method has a no-op default, so implementors only override what they
/// need. Observers cannot fail the run.
pub trait PlanObserver {
    /// Called once with the seed poses before orientation planning starts.
    fn seed_path(&mut self, poses: &[CameraPose]) {
        let _ = poses;
    }

    /// Called with the orientation histogram of each waypoint, before
    /// selection.
    fn histogram(&mut self, waypoint: usize, histogram: &SphericalHistogram) {
        let _ = (waypoint, histogram);
    }

    /// Called after a waypoint's pose has been committed.
    fn pose_committed(&mut self, waypoint: usize, pose: &CameraPose, observed_points: usize) {
        let _ = (waypoint, pose, observed_points);
    }
}

impl PlanObserver for () {}

impl<T: PlanObserver + ?Sized> PlanObserver for &mut T {
    fn seed_path(&mut self, poses: &[CameraPose]) {
        (**self).seed_path(poses);
    }

    fn histogram(&mut self, waypoint: usize, histogram: &SphericalHistogram) {
        (**self).histogram(waypoint, histogram);
    }

    fn pose_committed(&mut self, waypoint: usize, pose: &CameraPose, observed_points: usize) {
        (**self).pose_committed(waypoint, pose, observed_points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        histograms: usize,
    }

    impl PlanObserver for Counter {
        fn histogram(&mut self, _waypoint: usize, _histogram: &SphericalHistogram) {
            self.histograms += 1;
        }
    }

    #[test]
    fn test_defaults_are_noops() {
        ().seed_path(&[]);
        ().histogram(0, &SphericalHistogram::new(2, 2));
    }

    fn notify_twice<O: PlanObserver>(mut observer: O) {
        observer.histogram(0, &SphericalHistogram::new(2, 2));
        observer.histogram(1, &SphericalHistogram::new(2, 2));
    }

    #[test]
    fn test_forwarding_through_reference() {
        let mut counter = Counter::default();
        notify_twice(&mut counter);
        assert_eq!(counter.histograms, 2);
    }
}
