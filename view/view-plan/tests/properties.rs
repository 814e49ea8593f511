//! Property-based tests for camera bases, histograms and plans.

#![allow(clippy::unwrap_used, clippy::cast_precision_loss)]

use nalgebra::{Point3, Vector3};
use proptest::prelude::*;
use view_plan::{
    Planner, PlannerConfig, RayonRunner, SequentialRunner, SphericalHistogram, WaypointSource,
    camera_basis, select_orientation,
};
use view_types::{CameraPose, ProxyMesh, SamplePoint};

fn unit_direction() -> impl Strategy<Value = Vector3<f64>> {
    (0.0..std::f64::consts::TAU, -1.0f64..=1.0).prop_map(|(theta, z)| {
        let r = (1.0 - z * z).max(0.0).sqrt();
        Vector3::new(r * theta.cos(), r * theta.sin(), z)
    })
}

/// Directions within one degree of straight up or straight down.
fn near_vertical() -> impl Strategy<Value = Vector3<f64>> {
    (0.0..std::f64::consts::TAU, 0.0..1.0f64.to_radians(), any::<bool>()).prop_map(
        |(theta, tilt, down)| {
            let z = if down { -tilt.cos() } else { tilt.cos() };
            Vector3::new(tilt.sin() * theta.cos(), tilt.sin() * theta.sin(), z)
        },
    )
}

fn scene_planner_config() -> PlannerConfig {
    PlannerConfig::preview().histogram_bins(24, 10).direction_count(200)
}

fn scene() -> (ProxyMesh, Vec<SamplePoint>) {
    let mesh = ProxyMesh::square([-15.0, -15.0], [15.0, 15.0], 0.0);
    let points = (0..49)
        .map(|i| {
            let x = (i % 7) as f64 * 4.5 - 13.5;
            let y = (i / 7) as f64 * 4.5 - 13.5;
            SamplePoint::with_normal(Point3::new(x, y, 0.0), Vector3::z())
        })
        .collect();
    (mesh, points)
}

fn positions() -> impl Strategy<Value = Vec<Point3<f64>>> {
    prop::collection::vec(
        (-12.0..12.0f64, -12.0..12.0f64, 15.0..40.0f64).prop_map(|(x, y, z)| Point3::new(x, y, z)),
        1..5,
    )
}

proptest! {
    #[test]
    fn basis_is_proper_rotation(forward in unit_direction()) {
        let pose = CameraPose::new(Point3::origin(), camera_basis(&forward), 400.0);
        prop_assert!(pose.is_orthonormal(1e-9));
        prop_assert!((pose.forward() - forward).norm() < 1e-9);
    }

    #[test]
    fn near_vertical_basis_is_finite(forward in near_vertical()) {
        let rotation = camera_basis(&forward);
        prop_assert!(rotation.matrix().iter().all(|v| v.is_finite()));
        let pose = CameraPose::new(Point3::origin(), rotation, 400.0);
        prop_assert!(pose.is_orthonormal(1e-9));
    }

    #[test]
    fn selected_pose_looks_along_peak_bin(
        azimuth in 0usize..32,
        elevation in 0usize..12,
        score in 0.001f64..100.0,
    ) {
        let mut histogram = SphericalHistogram::new(32, 12);
        histogram.set(azimuth, elevation, score);
        let choice = select_orientation(&histogram, Point3::new(1.0, 2.0, 3.0), 300.0, 0).unwrap();

        prop_assert_eq!((choice.peak.azimuth, choice.peak.elevation), (azimuth, elevation));
        let expected = histogram.direction(azimuth, elevation);
        prop_assert!((choice.pose.forward() - expected).norm() < 1e-9);
        prop_assert!(choice.pose.is_orthonormal(1e-9));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn runners_produce_identical_plans(positions in positions()) {
        let (mesh, points) = scene();
        let sequential = Planner::new(scene_planner_config(), mesh.clone(), points.clone(), SequentialRunner).unwrap();
        let parallel =
            Planner::new(scene_planner_config(), mesh, points, RayonRunner::new(Some(3)).unwrap()).unwrap();

        let source = WaypointSource::Fixed(positions);
        let a = sequential.plan(&source, ()).unwrap();
        let b = parallel.plan(&source, ()).unwrap();
        prop_assert_eq!(&a.poses, &b.poses);
        prop_assert_eq!(&a.cloud, &b.cloud);
    }

    #[test]
    fn histories_never_exceed_view_count(positions in positions()) {
        let (mesh, points) = scene();
        let planner = Planner::new(scene_planner_config(), mesh, points, SequentialRunner).unwrap();
        let n = positions.len();
        let outcome = planner.plan(&WaypointSource::Fixed(positions), ()).unwrap();

        prop_assert_eq!(outcome.poses.len(), n);
        for sample in &outcome.cloud {
            prop_assert!(sample.history.len() <= n);
            for d in sample.history.directions() {
                prop_assert!((d.norm() - 1.0).abs() < 1e-12);
            }
        }
        for pose in &outcome.poses {
            prop_assert!(pose.is_orthonormal(1e-5));
        }
    }
}
