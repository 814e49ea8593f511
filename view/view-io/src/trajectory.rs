//! Plain-text camera trajectories.
//!
//! One camera per line, `#` comments ignored:
//!
//! ```text
//! x y z r00 r01 r02 r10 r11 r12 r20 r21 r22 focal
//! ```
//!
//! The rotation rows are the camera's right, up and forward axes in world
//! coordinates.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Matrix3, Point3, Rotation3};
use tracing::{debug, info};
use view_types::CameraPose;

use crate::error::{LoadError, LoadResult};
use crate::text::content_lines;

/// Values per line of a full trajectory file.
const POSE_COLUMNS: usize = 13;

/// Orthonormality tolerance for loaded rotations.
const ROTATION_TOLERANCE: f64 = 1e-6;

/// Save camera poses to a trajectory file.
///
/// Values are written with round-trip precision, so [`load_trajectory`]
/// returns exactly the poses saved.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_trajectory<P: AsRef<Path>>(poses: &[CameraPose], path: P) -> LoadResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_trajectory(poses, &mut writer)?;
    writer.flush()?;
    info!(path = %path.display(), poses = poses.len(), "saved trajectory");
    Ok(())
}

/// Write camera poses in trajectory format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_trajectory<W: Write>(poses: &[CameraPose], writer: &mut W) -> LoadResult<()> {
    writeln!(writer, "# x y z r00 r01 r02 r10 r11 r12 r20 r21 r22 focal")?;
    for pose in poses {
        let p = pose.position;
        write!(writer, "{} {} {}", p.x, p.y, p.z)?;
        let m = pose.rotation.matrix();
        for row in 0..3 {
            for col in 0..3 {
                write!(writer, " {}", m[(row, col)])?;
            }
        }
        writeln!(writer, " {}", pose.focal_length)?;
    }
    Ok(())
}

/// Load camera poses from a trajectory file.
///
/// # Errors
///
/// Returns an error if the file is missing, a line does not hold exactly 13
/// numbers, or a rotation is not orthonormal.
pub fn load_trajectory<P: AsRef<Path>>(path: P) -> LoadResult<Vec<CameraPose>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LoadError::open(path, e))?;
    let poses = read_trajectory(BufReader::new(file))?;
    debug!(path = %path.display(), poses = poses.len(), "loaded trajectory");
    Ok(poses)
}

/// Read camera poses from any buffered reader.
///
/// # Errors
///
/// Same as [`load_trajectory`], minus the missing-file case.
pub fn read_trajectory<R: BufRead>(reader: R) -> LoadResult<Vec<CameraPose>> {
    content_lines(reader)?
        .iter()
        .map(|line| {
            let v: Vec<f64> = line.parse_all_finite()?;
            if v.len() != POSE_COLUMNS {
                return Err(LoadError::at_line(
                    line.number,
                    format!("expected {POSE_COLUMNS} values, got {}", v.len()),
                ));
            }
            let rotation = Rotation3::from_matrix_unchecked(Matrix3::new(
                v[3], v[4], v[5], v[6], v[7], v[8], v[9], v[10], v[11],
            ));
            let pose = CameraPose::new(Point3::new(v[0], v[1], v[2]), rotation, v[12]);
            if !pose.is_orthonormal(ROTATION_TOLERANCE) {
                return Err(LoadError::at_line(line.number, "rotation is not orthonormal"));
            }
            Ok(pose)
        })
        .collect()
}

/// Load waypoint positions for fixed-trajectory planning.
///
/// Accepts either bare `x y z` lines or full trajectory lines, of which only
/// the position is kept.
///
/// # Errors
///
/// Returns an error if the file is missing or a line holds neither 3 nor 13
/// numbers.
pub fn load_positions<P: AsRef<Path>>(path: P) -> LoadResult<Vec<Point3<f64>>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LoadError::open(path, e))?;
    let positions = read_positions(BufReader::new(file))?;
    debug!(path = %path.display(), positions = positions.len(), "loaded fixed positions");
    Ok(positions)
}

/// Read waypoint positions from any buffered reader.
///
/// # Errors
///
/// Same as [`load_positions`], minus the missing-file case.
pub fn read_positions<R: BufRead>(reader: R) -> LoadResult<Vec<Point3<f64>>> {
    content_lines(reader)?
        .iter()
        .map(|line| {
            let v: Vec<f64> = line.parse_all_finite()?;
            match v.len() {
                3 | POSE_COLUMNS => Ok(Point3::new(v[0], v[1], v[2])),
                n => Err(LoadError::at_line(
                    line.number,
                    format!("expected 3 or {POSE_COLUMNS} values, got {n}"),
                )),
            }
        })
        .collect()
}
