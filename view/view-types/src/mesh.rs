//! Proxy triangle mesh.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use nalgebra::Point3;

use crate::error::{ViewTypesError, ViewTypesResult};

/// Coarse indexed triangle mesh of the target surface.
///
/// Used only for occlusion tests; it does not need to be watertight.
///
/// # Example
///
/// ```
/// use view_types::ProxyMesh;
/// use nalgebra::Point3;
///
/// let mesh = ProxyMesh::new(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// )
/// .unwrap();
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProxyMesh {
    vertices: Vec<Point3<f64>>,
    faces: Vec<[u32; 3]>,
}

impl ProxyMesh {
    /// Creates a mesh, checking that every face index is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ViewTypesError::InvalidFaceIndex`] for the first face that
    /// references a missing vertex.
    pub fn new(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> ViewTypesResult<Self> {
        let vertex_count = vertices.len();
        for (face, indices) in faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(ViewTypesError::InvalidFaceIndex {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(Self { vertices, faces })
    }

    /// Creates an axis-aligned square in the plane `z = height`, split into
    /// two triangles with upward winding.
    #[must_use]
    pub fn square(min: [f64; 2], max: [f64; 2], height: f64) -> Self {
        Self {
            vertices: vec![
                Point3::new(min[0], min[1], height),
                Point3::new(max[0], min[1], height),
                Point3::new(max[0], max[1], height),
                Point3::new(min[0], max[1], height),
            ],
            faces: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    /// Mesh vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Triangle vertex indices.
    #[must_use]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Number of triangles.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Corner positions of triangle `face`.
    #[must_use]
    pub fn triangle(&self, face: usize) -> Option<[Point3<f64>; 3]> {
        let [a, b, c] = *self.faces.get(face)?;
        Some([
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range_face() {
        let err = ProxyMesh::new(vec![Point3::origin(); 3], vec![[0, 1, 2], [0, 1, 3]]).unwrap_err();
        assert_eq!(
            err,
            ViewTypesError::InvalidFaceIndex {
                face: 1,
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn test_square() {
        let mesh = ProxyMesh::square([-1.0, -1.0], [1.0, 1.0], 2.0);
        assert_eq!(mesh.face_count(), 2);
        let [a, b, c] = mesh.triangle(0).unwrap();
        let normal = (b - a).cross(&(c - a));
        assert!(normal.z > 0.0);
        assert!(mesh.vertices().iter().all(|v| v.z == 2.0));
        assert!(mesh.triangle(2).is_none());
    }

    #[test]
    fn test_empty() {
        let mesh = ProxyMesh::new(Vec::new(), Vec::new()).unwrap();
        assert!(mesh.is_empty());
    }
}
