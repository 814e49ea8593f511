//! PLY (Polygon File Format) loaders for the proxy mesh and sample points.
//!
//! Both ASCII and binary encodings are accepted; `ply-rs` handles the
//! encoding and we only pick properties out of the parsed elements.
//!
//! # Supported Properties
//!
//! - Vertex positions (`x`, `y`, `z`) as `float` or `double`: required
//! - Vertex normals (`nx`, `ny`, `nz`): optional, sample points only
//! - Face vertex indices (`vertex_indices` or `vertex_index`): any integer
//!   list type; polygons are fan-triangulated

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::{Point3, Vector3};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Ply, Property};
use tracing::{debug, warn};
use view_types::{ProxyMesh, SamplePoint};

use crate::error::{LoadError, LoadResult};

/// Load a proxy mesh from a PLY file.
///
/// Faces with more than three vertices are split into a triangle fan around
/// their first vertex. Faces with fewer than three vertices are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a vertex lacks a coordinate,
/// or a face references a vertex that does not exist.
///
/// # Example
///
/// ```no_run
/// use view_io::load_proxy_mesh;
///
/// let mesh = load_proxy_mesh("proxy.ply").unwrap();
/// println!("Loaded {} triangles", mesh.face_count());
/// ```
pub fn load_proxy_mesh<P: AsRef<Path>>(path: P) -> LoadResult<ProxyMesh> {
    let path = path.as_ref();
    let ply = read_ply(path)?;
    let vertices = read_positions(&ply)?;

    let mut faces = Vec::new();
    let mut skipped = 0_usize;
    if let Some(face_elements) = ply.payload.get("face") {
        faces.reserve(face_elements.len());
        for (face, element) in face_elements.iter().enumerate() {
            let indices = index_list(element)
                .ok_or_else(|| LoadError::invalid_content(format!("face {face}: missing vertex index list")))?;
            let indices = indices
                .into_iter()
                .map(u32::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| LoadError::invalid_content(format!("face {face}: negative vertex index")))?;
            if indices.len() < 3 {
                skipped += 1;
                continue;
            }
            for i in 1..indices.len() - 1 {
                faces.push([indices[0], indices[i], indices[i + 1]]);
            }
        }
    }
    if skipped > 0 {
        warn!(path = %path.display(), skipped, "skipped degenerate faces");
    }

    debug!(
        path = %path.display(),
        vertices = vertices.len(),
        triangles = faces.len(),
        "loaded proxy mesh"
    );
    ProxyMesh::new(vertices, faces).map_err(|e| LoadError::invalid_content(e.to_string()))
}

/// Load surface sample points from the vertices of a PLY file.
///
/// Normals are read when all of `nx`, `ny` and `nz` are present; other
/// elements (faces, edges) are ignored.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a vertex lacks a
/// coordinate.
pub fn load_sample_points<P: AsRef<Path>>(path: P) -> LoadResult<Vec<SamplePoint>> {
    let path = path.as_ref();
    let ply = read_ply(path)?;
    let positions = read_positions(&ply)?;

    let elements = ply.payload.get("vertex").map_or(&[][..], Vec::as_slice);
    let points: Vec<SamplePoint> = positions
        .into_iter()
        .zip(elements)
        .map(|(position, element)| {
            match (
                scalar(element, "nx"),
                scalar(element, "ny"),
                scalar(element, "nz"),
            ) {
                (Some(x), Some(y), Some(z)) => SamplePoint::with_normal(position, Vector3::new(x, y, z)),
                _ => SamplePoint::new(position),
            }
        })
        .collect();

    let with_normals = points.iter().filter(|p| p.normal.is_some()).count();
    debug!(path = %path.display(), points = points.len(), with_normals, "loaded sample points");
    Ok(points)
}

/// Parse a whole PLY file.
fn read_ply(path: &Path) -> LoadResult<Ply<DefaultElement>> {
    let file = File::open(path).map_err(|e| LoadError::open(path, e))?;
    parse_ply(&mut BufReader::new(file))
}

fn parse_ply<R: BufRead>(reader: &mut R) -> LoadResult<Ply<DefaultElement>> {
    let parser = Parser::<DefaultElement>::new();
    let header = parser
        .read_header(reader)
        .map_err(|e| LoadError::invalid_content(format!("failed to parse PLY header: {e}")))?;
    let payload = parser
        .read_payload(reader, &header)
        .map_err(|e| LoadError::invalid_content(format!("failed to read PLY payload: {e}")))?;

    let mut ply = Ply::<DefaultElement>::new();
    ply.header = header;
    ply.payload = payload;
    Ok(ply)
}

/// Vertex positions, in file order.
fn read_positions(ply: &Ply<DefaultElement>) -> LoadResult<Vec<Point3<f64>>> {
    let Some(elements) = ply.payload.get("vertex") else {
        return Ok(Vec::new());
    };
    elements
        .iter()
        .enumerate()
        .map(|(i, element)| -> LoadResult<Point3<f64>> {
            let coord = |key: &str| {
                scalar(element, key)
                    .ok_or_else(|| LoadError::invalid_content(format!("vertex {i}: missing property '{key}'")))
            };
            Ok(Point3::new(coord("x")?, coord("y")?, coord("z")?))
        })
        .collect()
}

/// Extract a floating-point property from a PLY element.
fn scalar(element: &DefaultElement, key: &str) -> Option<f64> {
    match element.get(key)? {
        Property::Float(v) => Some(f64::from(*v)),
        Property::Double(v) => Some(*v),
        _ => None,
    }
}

/// Extract the vertex index list from a face element.
fn index_list(element: &DefaultElement) -> Option<Vec<i64>> {
    for key in ["vertex_indices", "vertex_index"] {
        let Some(prop) = element.get(key) else {
            continue;
        };
        let indices = match prop {
            Property::ListInt(v) => v.iter().map(|&i| i64::from(i)).collect(),
            Property::ListUInt(v) => v.iter().map(|&i| i64::from(i)).collect(),
            Property::ListShort(v) => v.iter().map(|&i| i64::from(i)).collect(),
            Property::ListUShort(v) => v.iter().map(|&i| i64::from(i)).collect(),
            Property::ListChar(v) => v.iter().map(|&i| i64::from(i)).collect(),
            Property::ListUChar(v) => v.iter().map(|&i| i64::from(i)).collect(),
            _ => continue,
        };
        return Some(indices);
    }
    None
}
