//! Plans camera orientations along a trajectory over a proxy surface.
//!
//! ```text
//! view-plan --mesh proxy.ply --points samples.ply --volume guidance.txt \
//!     --views 400 --output trajectory.txt
//! ```
//!
//! Waypoints come either from a guidance volume (`--volume`) or from a file of
//! fixed positions (`--trajectory`). Set `RUST_LOG` for finer log control.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;
use view_io::HistogramDump;
use view_plan::{
    ParallelRunner, PlanOutcome, Planner, PlannerConfig, RayonRunner, SequentialRunner,
    WaypointSource,
};
use view_types::{CameraIntrinsics, GuidanceVolume, Point3, ProxyMesh, SamplePoint};

/// Reconstructability-driven view planning
#[derive(Parser, Debug)]
#[command(name = "view-plan")]
#[command(about = "Plan camera orientations that maximize reconstruction quality", long_about = None)]
#[command(version)]
#[command(group(ArgGroup::new("waypoints").required(true).args(["volume", "trajectory"])))]
struct Cli {
    /// Proxy mesh used for occlusion tests (PLY)
    #[arg(long)]
    mesh: PathBuf,

    /// Surface sample points, with optional normals (PLY)
    #[arg(long)]
    points: PathBuf,

    /// Guidance volume to extract waypoints from
    #[arg(long)]
    volume: Option<PathBuf>,

    /// Fixed waypoint positions, `x y z` per line or a saved trajectory
    #[arg(long)]
    trajectory: Option<PathBuf>,

    /// Where to write the planned trajectory
    #[arg(long, short)]
    output: PathBuf,

    /// Number of views to plan along a guidance-volume path
    #[arg(long)]
    views: Option<usize>,

    /// Maximum camera-to-point distance considered visible
    #[arg(long)]
    max_distance: Option<f64>,

    /// Focal length in pixels
    #[arg(long)]
    focal_length: Option<f64>,

    /// Image width in pixels
    #[arg(long)]
    image_width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    image_height: Option<u32>,

    /// Worker threads (defaults to the number of cores)
    #[arg(long, conflicts_with = "sequential")]
    threads: Option<usize>,

    /// Run on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Apply non-maximum suppression to orientation histograms
    #[arg(long)]
    nms: bool,

    /// Directory for histogram images
    #[arg(long)]
    dump_dir: Option<PathBuf>,

    /// Dump every n-th waypoint's histogram
    #[arg(long, default_value_t = 1, requires = "dump_dir")]
    dump_every: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> PlannerConfig {
        let defaults = PlannerConfig::default();
        let intrinsics = CameraIntrinsics::new(
            self.focal_length.unwrap_or(defaults.intrinsics.focal_length),
            self.image_width.unwrap_or(defaults.intrinsics.width),
            self.image_height.unwrap_or(defaults.intrinsics.height),
        );
        let view_count = self.views.unwrap_or(defaults.view_count);
        let max_distance = self.max_distance.unwrap_or(defaults.max_distance);
        defaults
            .view_count(view_count)
            .max_distance(max_distance)
            .intrinsics(intrinsics)
            .non_max_suppression(self.nms)
    }
}

/// Waypoint input, loaded before planning starts.
enum Waypoints {
    Volume(GuidanceVolume),
    Fixed(Vec<Point3<f64>>),
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn plan_with<R: ParallelRunner>(
    cli: &Cli,
    config: PlannerConfig,
    mesh: ProxyMesh,
    points: Vec<SamplePoint>,
    waypoints: &Waypoints,
    runner: R,
) -> Result<PlanOutcome> {
    info!(runner = runner.name(), "planning");
    let planner = Planner::new(config, mesh, points, runner).context("failed to set up planner")?;
    let source = match waypoints {
        Waypoints::Volume(volume) => WaypointSource::Guidance(volume),
        Waypoints::Fixed(positions) => WaypointSource::Fixed(positions.clone()),
    };

    let outcome = match &cli.dump_dir {
        Some(dir) => {
            let mut dump = HistogramDump::new(dir, cli.dump_every);
            let outcome = planner.plan(&source, &mut dump);
            info!(written = dump.written(), failed = dump.failed(), dir = %dir.display(), "histogram dumps");
            outcome
        }
        None => planner.plan(&source, ()),
    };
    outcome.context("planning failed")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config();
    let mesh = view_io::load_proxy_mesh(&cli.mesh)
        .with_context(|| format!("failed to load proxy mesh {}", cli.mesh.display()))?;
    let points = view_io::load_sample_points(&cli.points)
        .with_context(|| format!("failed to load sample points {}", cli.points.display()))?;

    let waypoints = match (&cli.volume, &cli.trajectory) {
        (Some(path), _) => Waypoints::Volume(
            view_io::load_guidance_volume(path)
                .with_context(|| format!("failed to load guidance volume {}", path.display()))?,
        ),
        (None, Some(path)) => Waypoints::Fixed(
            view_io::load_positions(path)
                .with_context(|| format!("failed to load waypoints {}", path.display()))?,
        ),
        (None, None) => anyhow::bail!("either --volume or --trajectory is required"),
    };

    info!(
        triangles = mesh.face_count(),
        points = points.len(),
        views = config.view_count,
        "inputs loaded"
    );

    let outcome = if cli.sequential {
        plan_with(&cli, config, mesh, points, &waypoints, SequentialRunner)?
    } else {
        let runner = RayonRunner::new(cli.threads).context("failed to start thread pool")?;
        plan_with(&cli, config, mesh, points, &waypoints, runner)?
    };

    view_io::save_trajectory(&outcome.poses, &cli.output)
        .with_context(|| format!("failed to write trajectory {}", cli.output.display()))?;

    let coverage = &outcome.coverage;
    info!(
        poses = outcome.poses.len(),
        observed = coverage.observed_points,
        total = coverage.total_points,
        multi_view = coverage.multi_view_points,
        mean_views = coverage.mean_views,
        mean_reconstructability = coverage.mean_reconstructability,
        output = %cli.output.display(),
        "plan complete"
    );
    Ok(())
}
