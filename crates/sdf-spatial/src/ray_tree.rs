//! Bounding-volume hierarchy for first-hit ray queries.

use nalgebra::{Point3, Vector3};
use sdf_types::{Mesh, Triangle};

/// Numerical tolerance for ray-triangle and AABB tests.
const EPSILON: f64 = 1e-9;

/// The first intersection of a ray with the mesh surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the intersection point.
    pub distance: f64,
    /// Index of the intersected face in the source mesh.
    pub face: usize,
}

/// A bounding-volume hierarchy over a fixed mesh snapshot.
///
/// The tree bundles the triangle geometry, the per-face unit normals, and
/// the acceleration structure behind one interface: consumers that need the
/// hit surface's orientation (the width estimator's angle filter) read it
/// from the same object that produced the hit, so the two can never drift
/// out of sync across a rebuild.
///
/// Degenerate (zero-area) faces are excluded at build time; they can never
/// be hit and have no usable normal.
///
/// # Example
///
/// ```
/// use sdf_spatial::RayTree;
/// use sdf_types::{unit_cube, Point3, Vector3};
///
/// let tree = RayTree::build(&unit_cube()).unwrap();
/// let hit = tree
///     .first_hit(&Point3::new(0.5, 0.5, 2.0), &-Vector3::z())
///     .unwrap();
/// assert!((hit.distance - 1.0).abs() < 1e-10);
/// // The hit face is the cube top, facing +Z
/// assert!((tree.face_normal(hit.face).z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug)]
pub struct RayTree {
    triangles: Vec<Triangle>,
    normals: Vec<Vector3<f64>>,
    faces: Vec<usize>,
    root: Node,
}

impl RayTree {
    /// Build a tree over the given mesh.
    ///
    /// Returns `None` if the mesh contains no non-degenerate faces.
    #[must_use]
    pub fn build(mesh: &Mesh) -> Option<Self> {
        let mut triangles = Vec::with_capacity(mesh.face_count());
        let mut normals = Vec::with_capacity(mesh.face_count());
        let mut faces = Vec::with_capacity(mesh.face_count());

        for (face, tri) in mesh.triangles().enumerate() {
            if let Some(normal) = tri.normal() {
                triangles.push(tri);
                normals.push(normal);
                faces.push(face);
            }
        }

        let mut order: Vec<usize> = (0..triangles.len()).collect();
        let root = Node::build(&triangles, &mut order)?;

        Some(Self {
            triangles,
            normals,
            faces,
            root,
        })
    }

    /// Number of (non-degenerate) faces indexed by the tree.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.triangles.len()
    }

    /// Unit normal of a face returned by [`RayTree::first_hit`].
    ///
    /// # Panics
    ///
    /// Panics if `face` is not an index previously returned in a [`RayHit`].
    #[inline]
    #[must_use]
    pub fn face_normal(&self, face: usize) -> Vector3<f64> {
        // The public face index maps back through the degenerate-face filter.
        let slot = self
            .faces
            .binary_search(&face)
            .unwrap_or_else(|_| panic!("face {face} was not indexed by this tree"));
        self.normals[slot]
    }

    /// Find the first intersection along a ray.
    ///
    /// `direction` does not have to be normalized; the reported distance is
    /// in units of its length. Returns `None` when the ray escapes the mesh.
    #[must_use]
    pub fn first_hit(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Option<RayHit> {
        let dir_inv = Vector3::new(
            safe_invert(direction.x),
            safe_invert(direction.y),
            safe_invert(direction.z),
        );

        self.root
            .first_hit(&self.triangles, origin, direction, &dir_inv, f64::INFINITY)
            .map(|(distance, slot)| RayHit {
                distance,
                face: self.faces[slot],
            })
    }
}

#[inline]
fn safe_invert(component: f64) -> f64 {
    if component.abs() > EPSILON {
        1.0 / component
    } else {
        f64::MAX
    }
}

/// Axis-aligned box stored per node, expanded for numerical robustness.
#[derive(Debug, Clone, Copy)]
struct NodeBounds {
    min: Point3<f64>,
    max: Point3<f64>,
}

impl NodeBounds {
    fn of_triangle(tri: &Triangle) -> Self {
        let mut bounds = Self {
            min: tri.v0,
            max: tri.v0,
        };
        bounds.include(&tri.v1);
        bounds.include(&tri.v2);
        bounds
    }

    fn include(&mut self, p: &Point3<f64>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    fn merge(&mut self, other: &Self) {
        self.include(&other.min);
        self.include(&other.max);
    }

    fn expanded(mut self) -> Self {
        self.min.x -= EPSILON;
        self.min.y -= EPSILON;
        self.min.z -= EPSILON;
        self.max.x += EPSILON;
        self.max.y += EPSILON;
        self.max.z += EPSILON;
        self
    }

    /// Slab test. Returns the entry distance if the ray touches the box.
    fn ray_entry(&self, origin: &Point3<f64>, dir_inv: &Vector3<f64>) -> Option<f64> {
        let t1 = (self.min.x - origin.x) * dir_inv.x;
        let t2 = (self.max.x - origin.x) * dir_inv.x;
        let t3 = (self.min.y - origin.y) * dir_inv.y;
        let t4 = (self.max.y - origin.y) * dir_inv.y;
        let t5 = (self.min.z - origin.z) * dir_inv.z;
        let t6 = (self.max.z - origin.z) * dir_inv.z;

        let t_min = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let t_max = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        if t_max >= t_min && t_max >= 0.0 {
            Some(t_min.max(0.0))
        } else {
            None
        }
    }
}

/// BVH node: median split along the longest axis, one triangle per leaf.
#[derive(Debug)]
enum Node {
    Leaf {
        bounds: NodeBounds,
        slot: usize,
    },
    Branch {
        bounds: NodeBounds,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn build(triangles: &[Triangle], order: &mut [usize]) -> Option<Self> {
        match order.len() {
            0 => None,
            1 => {
                let slot = order[0];
                Some(Self::Leaf {
                    bounds: NodeBounds::of_triangle(&triangles[slot]).expanded(),
                    slot,
                })
            }
            _ => {
                let mut bounds = NodeBounds::of_triangle(&triangles[order[0]]);
                for &slot in order.iter().skip(1) {
                    bounds.merge(&NodeBounds::of_triangle(&triangles[slot]));
                }
                let bounds = bounds.expanded();

                // Split along the longest extent at the centroid median
                let extent = bounds.max - bounds.min;
                let axis = if extent.x >= extent.y && extent.x >= extent.z {
                    0
                } else if extent.y >= extent.z {
                    1
                } else {
                    2
                };

                order.sort_by(|&a, &b| {
                    let ca = triangles[a].centroid()[axis];
                    let cb = triangles[b].centroid()[axis];
                    ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
                });

                let mid = order.len() / 2;
                let (left_order, right_order) = order.split_at_mut(mid);

                match (
                    Self::build(triangles, left_order),
                    Self::build(triangles, right_order),
                ) {
                    (Some(left), Some(right)) => Some(Self::Branch {
                        bounds,
                        left: Box::new(left),
                        right: Box::new(right),
                    }),
                    (Some(node), None) | (None, Some(node)) => Some(node),
                    (None, None) => None,
                }
            }
        }
    }

    const fn bounds(&self) -> &NodeBounds {
        match self {
            Self::Leaf { bounds, .. } | Self::Branch { bounds, .. } => bounds,
        }
    }

    fn first_hit(
        &self,
        triangles: &[Triangle],
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        dir_inv: &Vector3<f64>,
        max_dist: f64,
    ) -> Option<(f64, usize)> {
        let entry = self.bounds().ray_entry(origin, dir_inv)?;
        if entry > max_dist {
            return None;
        }

        match self {
            Self::Leaf { slot, .. } => {
                ray_triangle_intersect(origin, direction, &triangles[*slot])
                    .filter(|&t| t <= max_dist)
                    .map(|t| (t, *slot))
            }
            Self::Branch { left, right, .. } => {
                let hit_left = left.first_hit(triangles, origin, direction, dir_inv, max_dist);
                let max_right = hit_left.map_or(max_dist, |(t, _)| t);
                let hit_right = right.first_hit(triangles, origin, direction, dir_inv, max_right);

                match (hit_left, hit_right) {
                    (Some(l), Some(r)) => Some(if l.0 <= r.0 { l } else { r }),
                    (Some(hit), None) | (None, Some(hit)) => Some(hit),
                    (None, None) => None,
                }
            }
        }
    }
}

/// Möller–Trumbore ray-triangle intersection.
#[allow(clippy::many_single_char_names)]
fn ray_triangle_intersect(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    tri: &Triangle,
) -> Option<f64> {
    let edge1 = tri.v1 - tri.v0;
    let edge2 = tri.v2 - tri.v0;

    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);

    // Ray is parallel to the triangle plane
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - tri.v0;
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

    if t > EPSILON { Some(t) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdf_types::unit_cube;

    #[test]
    fn ray_triangle_hit() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        );

        let t = ray_triangle_intersect(
            &Point3::new(0.5, 0.5, 1.0),
            &Vector3::new(0.0, 0.0, -1.0),
            &tri,
        )
        .unwrap();
        assert!((t - 1.0).abs() < 1e-10, "Expected t=1.0, got {t}");
    }

    #[test]
    fn ray_triangle_miss() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        );

        let result = ray_triangle_intersect(
            &Point3::new(5.0, 5.0, 1.0),
            &Vector3::new(0.0, 0.0, -1.0),
            &tri,
        );
        assert!(result.is_none());
    }

    #[test]
    fn ray_behind_origin_is_not_a_hit() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        );

        // Triangle is behind the ray
        let result = ray_triangle_intersect(
            &Point3::new(0.5, 0.5, 1.0),
            &Vector3::new(0.0, 0.0, 1.0),
            &tri,
        );
        assert!(result.is_none());
    }

    #[test]
    fn empty_mesh_has_no_tree() {
        assert!(RayTree::build(&Mesh::new()).is_none());
    }

    #[test]
    fn degenerate_only_mesh_has_no_tree() {
        let mesh = Mesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0], &[0, 1, 2]);
        assert!(RayTree::build(&mesh).is_none());
    }

    #[test]
    fn first_hit_from_cube_center() {
        let tree = RayTree::build(&unit_cube()).unwrap();
        let center = Point3::new(0.5, 0.5, 0.5);

        for dir in [
            Vector3::x(),
            -Vector3::x(),
            Vector3::y(),
            -Vector3::y(),
            Vector3::z(),
            -Vector3::z(),
        ] {
            let hit = tree.first_hit(&center, &dir).unwrap();
            assert!(
                (hit.distance - 0.5).abs() < 1e-10,
                "direction {dir:?}: distance {}",
                hit.distance
            );
        }
    }

    #[test]
    fn first_hit_returns_nearest_face() {
        let tree = RayTree::build(&unit_cube()).unwrap();
        // From outside, through the whole cube: first hit is the near wall
        let hit = tree
            .first_hit(&Point3::new(-1.0, 0.5, 0.5), &Vector3::x())
            .unwrap();
        assert!((hit.distance - 1.0).abs() < 1e-10);
        // The near wall faces -X
        assert!((tree.face_normal(hit.face).x + 1.0).abs() < 1e-10);
    }

    #[test]
    fn miss_returns_none() {
        let tree = RayTree::build(&unit_cube()).unwrap();
        let hit = tree.first_hit(&Point3::new(5.0, 5.0, 5.0), &Vector3::z());
        assert!(hit.is_none());
    }

    #[test]
    fn degenerate_faces_do_not_shift_indices() {
        // Face 0 is degenerate, face 1 is a real triangle
        let mesh = Mesh::from_raw(
            &[
                0.0, 0.0, 0.0, // 0
                1.0, 0.0, 0.0, // 1
                2.0, 0.0, 0.0, // 2
                0.0, 1.0, 0.0, // 3
            ],
            &[0, 1, 2, 0, 1, 3],
        );
        let tree = RayTree::build(&mesh).unwrap();
        assert_eq!(tree.face_count(), 1);

        let hit = tree
            .first_hit(&Point3::new(0.4, 0.3, 1.0), &-Vector3::z())
            .unwrap();
        // Reported index refers to the source mesh, not the filtered set
        assert_eq!(hit.face, 1);
        assert!((tree.face_normal(1).z - 1.0).abs() < 1e-10);
    }
}
