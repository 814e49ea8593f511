//! Bounding volume hierarchy for ray queries against triangle meshes.

use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;
use view_types::ProxyMesh;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// Create an empty (inverted) bounding box.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::MAX, f64::MAX, f64::MAX),
            max: Point3::new(f64::MIN, f64::MIN, f64::MIN),
        }
    }

    /// Bounding box of a triangle.
    #[must_use]
    pub fn from_triangle(tri: &[Point3<f64>; 3]) -> Self {
        let mut bbox = Self::empty();
        for v in tri {
            bbox.expand_point(v);
        }
        bbox
    }

    /// Grow to include another box.
    pub fn expand(&mut self, other: &Self) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Grow to include a point.
    pub fn expand_point(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Index of the longest axis (0=X, 1=Y, 2=Z).
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        let d = self.max - self.min;
        if d.x >= d.y && d.x >= d.z {
            0
        } else if d.y >= d.z {
            1
        } else {
            2
        }
    }

    /// Slab test. Returns the parametric entry and exit distances along the
    /// ray, clamped to start at zero, or `None` on a miss.
    #[must_use]
    pub fn ray_intersect(&self, origin: &Point3<f64>, dir_inv: &Vector3<f64>) -> Option<(f64, f64)> {
        let t1 = (self.min - origin).component_mul(dir_inv);
        let t2 = (self.max - origin).component_mul(dir_inv);

        let t_min = t1.x.min(t2.x).max(t1.y.min(t2.y)).max(t1.z.min(t2.z));
        let t_max = t1.x.max(t2.x).min(t1.y.max(t2.y)).min(t1.z.max(t2.z));

        (t_max >= t_min && t_max >= 0.0).then_some((t_min.max(0.0), t_max))
    }
}

#[derive(Debug)]
enum BvhNode {
    Leaf {
        bbox: Aabb,
        triangles: SmallVec<[u32; 8]>,
    },
    Internal {
        bbox: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    fn bbox(&self) -> &Aabb {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }
}

/// Median-split BVH over the triangles of a [`ProxyMesh`].
///
/// The hierarchy stores triangle indices only; queries take the mesh they
/// were built from.
#[derive(Debug)]
pub struct Bvh {
    root: Option<BvhNode>,
    triangle_count: usize,
}

/// Triangles per leaf.
const MAX_LEAF_SIZE: usize = 8;

impl Bvh {
    /// Builds the hierarchy for `mesh`.
    #[must_use]
    pub fn build(mesh: &ProxyMesh) -> Self {
        let boxes: Vec<Aabb> = (0..mesh.face_count())
            .filter_map(|f| mesh.triangle(f))
            .map(|tri| Aabb::from_triangle(&tri))
            .collect();
        if boxes.is_empty() {
            return Self {
                root: None,
                triangle_count: 0,
            };
        }

        #[allow(clippy::cast_possible_truncation)]
        let indices: Vec<u32> = (0..boxes.len() as u32).collect();
        let root = Self::build_recursive(&boxes, indices);
        Self {
            root: Some(root),
            triangle_count: boxes.len(),
        }
    }

    fn build_recursive(boxes: &[Aabb], mut indices: Vec<u32>) -> BvhNode {
        let mut bbox = Aabb::empty();
        for &i in &indices {
            bbox.expand(&boxes[i as usize]);
        }

        if indices.len() <= MAX_LEAF_SIZE {
            return BvhNode::Leaf {
                bbox,
                triangles: indices.into_iter().collect(),
            };
        }

        let axis = bbox.longest_axis();
        indices.sort_by(|&a, &b| {
            let ca = boxes[a as usize].center()[axis];
            let cb = boxes[b as usize].center()[axis];
            ca.total_cmp(&cb)
        });

        let right_indices = indices.split_off(indices.len() / 2);
        let left = Self::build_recursive(boxes, indices);
        let right = Self::build_recursive(boxes, right_indices);

        BvhNode::Internal {
            bbox,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of triangles indexed.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Returns `true` if any triangle of `mesh` is hit by the ray at a
    /// distance in `(min_t, max_t)`.
    ///
    /// `direction` must be a unit vector so distances are in world units.
    #[must_use]
    pub fn any_hit(
        &self,
        mesh: &ProxyMesh,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        min_t: f64,
        max_t: f64,
    ) -> bool {
        let Some(root) = &self.root else {
            return false;
        };
        let dir_inv = direction.map(|c| 1.0 / c);
        Self::any_hit_recursive(root, mesh, origin, direction, &dir_inv, min_t, max_t)
    }

    /// Distance to the closest hit along the ray, if any lies in
    /// `(min_t, max_t)`.
    #[must_use]
    pub fn closest_hit(
        &self,
        mesh: &ProxyMesh,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        min_t: f64,
        max_t: f64,
    ) -> Option<f64> {
        let root = self.root.as_ref()?;
        let dir_inv = direction.map(|c| 1.0 / c);
        Self::closest_hit_recursive(root, mesh, origin, direction, &dir_inv, min_t, max_t)
    }

    fn any_hit_recursive(
        node: &BvhNode,
        mesh: &ProxyMesh,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        dir_inv: &Vector3<f64>,
        min_t: f64,
        max_t: f64,
    ) -> bool {
        match node.bbox().ray_intersect(origin, dir_inv) {
            Some((t_near, _)) if t_near < max_t => {}
            _ => return false,
        }

        match node {
            BvhNode::Leaf { triangles, .. } => triangles.iter().any(|&f| {
                mesh.triangle(f as usize)
                    .and_then(|tri| ray_triangle_intersect(origin, direction, &tri))
                    .is_some_and(|t| t > min_t && t < max_t)
            }),
            BvhNode::Internal { left, right, .. } => {
                Self::any_hit_recursive(left, mesh, origin, direction, dir_inv, min_t, max_t)
                    || Self::any_hit_recursive(right, mesh, origin, direction, dir_inv, min_t, max_t)
            }
        }
    }

    fn closest_hit_recursive(
        node: &BvhNode,
        mesh: &ProxyMesh,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        dir_inv: &Vector3<f64>,
        min_t: f64,
        max_t: f64,
    ) -> Option<f64> {
        match node.bbox().ray_intersect(origin, dir_inv) {
            Some((t_near, _)) if t_near < max_t => {}
            _ => return None,
        }

        match node {
            BvhNode::Leaf { triangles, .. } => triangles
                .iter()
                .filter_map(|&f| mesh.triangle(f as usize))
                .filter_map(|tri| ray_triangle_intersect(origin, direction, &tri))
                .filter(|&t| t > min_t && t < max_t)
                .reduce(f64::min),
            BvhNode::Internal { left, right, .. } => {
                let hit_left =
                    Self::closest_hit_recursive(left, mesh, origin, direction, dir_inv, min_t, max_t);
                let bound = hit_left.unwrap_or(max_t);
                let hit_right =
                    Self::closest_hit_recursive(right, mesh, origin, direction, dir_inv, min_t, bound);
                hit_right.or(hit_left)
            }
        }
    }
}

/// Moller-Trumbore ray/triangle intersection. Returns the ray parameter of the
/// hit; hits behind the origin are rejected.
fn ray_triangle_intersect(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    tri: &[Point3<f64>; 3],
) -> Option<f64> {
    const PARALLEL_EPSILON: f64 = 1e-12;

    let edge1 = tri[1] - tri[0];
    let edge2 = tri[2] - tri[0];

    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);

    // Ray is parallel to triangle
    if a.abs() < PARALLEL_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - tri[0];
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > 0.0).then_some(t)
}
