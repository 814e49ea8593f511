//! Proxy geometry for line-of-sight tests.

use nalgebra::Point3;
use tracing::debug;
use view_types::ProxyMesh;

use crate::bvh::Bvh;
use crate::error::SpatialResult;

/// Distance below which a ray hit is treated as the ray's own origin.
const SELF_HIT_EPSILON: f64 = 1e-9;

/// A proxy mesh together with its intersection index.
///
/// Built once per run and shared read-only by every occlusion query.
#[derive(Debug)]
pub struct ProxyGeometry {
    mesh: ProxyMesh,
    bvh: Bvh,
}

impl ProxyGeometry {
    /// Builds the intersection index for `mesh`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SpatialError::Mesh`] if a face references a missing
    /// vertex.
    pub fn new(mesh: ProxyMesh) -> SpatialResult<Self> {
        // Deserialized meshes skip the constructor checks
        let mesh = ProxyMesh::new(mesh.vertices().to_vec(), mesh.faces().to_vec())?;
        let bvh = Bvh::build(&mesh);
        debug!(
            vertices = mesh.vertices().len(),
            triangles = bvh.triangle_count(),
            "Built proxy geometry"
        );
        Ok(Self { mesh, bvh })
    }

    /// The underlying mesh.
    #[must_use]
    pub fn mesh(&self) -> &ProxyMesh {
        &self.mesh
    }

    /// Returns `true` if the proxy surface blocks the segment `from -> to`.
    ///
    /// Only hits closer to `from` than `|to - from| - epsilon` count, so the
    /// surface a target point lies on does not occlude it.
    #[must_use]
    pub fn is_occluded(&self, from: &Point3<f64>, to: &Point3<f64>, epsilon: f64) -> bool {
        let delta = to - from;
        let distance = delta.norm();
        if distance <= epsilon {
            return false;
        }
        let direction = delta / distance;
        self.bvh
            .any_hit(&self.mesh, from, &direction, SELF_HIT_EPSILON, distance - epsilon)
    }

    /// Distance from `origin` to the first surface hit along `direction`.
    #[must_use]
    pub fn first_hit(&self, origin: &Point3<f64>, direction: &nalgebra::Vector3<f64>) -> Option<f64> {
        let direction = direction.try_normalize(f64::EPSILON)?;
        self.bvh
            .closest_hit(&self.mesh, origin, &direction, SELF_HIT_EPSILON, f64::INFINITY)
    }
}
