//! Plain-text guidance volume reader.
//!
//! ```text
//! guidance_volume 1
//! dims <width> <height> <depth>
//! origin <x> <y> <z>
//! voxel_size <s>
//! <i> <j> <k> <sample> [<sample> ...]
//! ```
//!
//! Header keys may appear in any order after the magic line. `#` starts a
//! comment. A voxel may be listed on several lines; its samples accumulate.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::Point3;
use tracing::debug;
use view_types::GuidanceVolume;

use crate::error::{LoadError, LoadResult};
use crate::text::{Line, content_lines};

/// Magic keyword on the first content line.
pub const VOLUME_MAGIC: &str = "guidance_volume";

/// The only format version understood.
pub const VOLUME_VERSION: u32 = 1;

/// Load a guidance volume from a text file.
///
/// # Errors
///
/// Returns [`LoadError::FileNotFound`] for a missing file and
/// [`LoadError::InvalidContent`] for a malformed header, unparsable numbers
/// or voxel indices outside the declared grid.
pub fn load_guidance_volume<P: AsRef<Path>>(path: P) -> LoadResult<GuidanceVolume> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LoadError::open(path, e))?;
    let volume = read_guidance_volume(BufReader::new(file))?;
    debug!(
        path = %path.display(),
        dims = ?volume.dims(),
        occupied = volume.occupied_count(),
        "loaded guidance volume"
    );
    Ok(volume)
}

/// Read a guidance volume from any buffered reader.
///
/// # Errors
///
/// Same as [`load_guidance_volume`], minus the missing-file case.
pub fn read_guidance_volume<R: BufRead>(reader: R) -> LoadResult<GuidanceVolume> {
    let lines = content_lines(reader)?;
    let mut lines = lines.iter().peekable();

    let magic = lines
        .next()
        .ok_or_else(|| LoadError::invalid_content("empty guidance volume file"))?;
    let mut tokens = magic.tokens();
    if tokens.next() != Some(VOLUME_MAGIC) {
        return Err(LoadError::at_line(magic.number, format!("expected '{VOLUME_MAGIC}'")));
    }
    let version: u32 = match tokens.next() {
        Some(token) => magic.parse(token)?,
        None => return Err(LoadError::at_line(magic.number, "missing format version")),
    };
    if version != VOLUME_VERSION {
        return Err(LoadError::at_line(
            magic.number,
            format!("unsupported version {version}"),
        ));
    }

    let mut dims: Option<[usize; 3]> = None;
    let mut origin: Option<Point3<f64>> = None;
    let mut voxel_size = None;
    while let Some(line) = lines.peek() {
        let Some(key) = line.tokens().next() else {
            break;
        };
        let values: Vec<&str> = line.tokens().skip(1).collect();
        match key {
            "dims" => {
                let [w, h, d] = expect_three(line, &values)?;
                dims = Some([line.parse(w)?, line.parse(h)?, line.parse(d)?]);
            }
            "origin" => {
                let [x, y, z] = expect_three(line, &values)?;
                origin = Some(Point3::new(
                    line.parse_finite(x)?,
                    line.parse_finite(y)?,
                    line.parse_finite(z)?,
                ));
            }
            "voxel_size" => match values.as_slice() {
                [s] => voxel_size = Some(positive_size(line, line.parse(s)?)?),
                _ => return Err(LoadError::at_line(line.number, "expected one value")),
            },
            _ => break,
        }
        lines.next();
    }

    let dims = dims.ok_or_else(|| LoadError::invalid_content("missing 'dims'"))?;
    let origin = origin.unwrap_or_else(Point3::origin);
    let voxel_size = voxel_size.ok_or_else(|| LoadError::invalid_content("missing 'voxel_size'"))?;
    let mut volume = GuidanceVolume::axis_aligned(dims, origin, voxel_size)
        .map_err(|e| LoadError::invalid_content(e.to_string()))?;

    for line in lines {
        let mut tokens = line.tokens();
        let mut index = || -> LoadResult<usize> {
            let token = tokens
                .next()
                .ok_or_else(|| LoadError::at_line(line.number, "expected voxel index"))?;
            line.parse(token)
        };
        let (i, j, k) = (index()?, index()?, index()?);

        let mut count = 0;
        for token in tokens {
            let sample: f32 = line.parse_finite(token)?;
            volume
                .push_sample(i, j, k, sample)
                .map_err(|e| LoadError::at_line(line.number, e))?;
            count += 1;
        }
        if count == 0 {
            return Err(LoadError::at_line(line.number, "voxel has no samples"));
        }
    }

    Ok(volume)
}

fn expect_three<'a>(line: &Line, values: &[&'a str]) -> LoadResult<[&'a str; 3]> {
    match values {
        &[a, b, c] => Ok([a, b, c]),
        _ => Err(LoadError::at_line(line.number, "expected three values")),
    }
}

fn positive_size(line: &Line, size: f64) -> LoadResult<f64> {
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(LoadError::at_line(line.number, format!("voxel size must be positive, got {size}")))
    }
}
