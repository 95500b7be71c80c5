//! Quadric error metric.
//!
//! The quadric error metric (QEM) measures the squared distance from a point
//! to a set of planes. Each vertex accumulates the planes of its incident
//! faces; the cost of collapsing an edge is the combined quadric evaluated at
//! the merged position, which bounds how far the collapse moves the surface.

use nalgebra::{Matrix3, Point3, Vector3};

/// Quadric error metric for a set of planes.
///
/// Stored in the expanded form `E(p) = pᵀAp + 2bᵀp + c`, where `A = Σ nnᵀ`,
/// `b = Σ d·n`, and `c = Σ d²` over planes `nᵀp + d = 0` with unit normals.
///
/// # Example
///
/// ```
/// use sdf_remesh::Quadric;
/// use nalgebra::{Point3, Vector3};
///
/// // Plane z = 0
/// let q = Quadric::from_plane(&Vector3::z(), 0.0);
///
/// // Points on the plane have zero error; a point at z=2 has error 4
/// assert!(q.evaluate(&Point3::new(3.0, -1.0, 0.0)) < 1e-12);
/// assert!((q.evaluate(&Point3::new(0.0, 0.0, 2.0)) - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Quadric {
    a: Matrix3<f64>,
    b: Vector3<f64>,
    c: f64,
}

impl Quadric {
    /// Create a quadric from a plane with unit normal `n` and offset `d`
    /// (plane equation `n·p + d = 0`).
    #[must_use]
    pub fn from_plane(normal: &Vector3<f64>, d: f64) -> Self {
        Self {
            a: normal * normal.transpose(),
            b: normal * d,
            c: d * d,
        }
    }

    /// Create a quadric from the plane through `point` with unit normal `n`.
    #[must_use]
    pub fn from_point_normal(point: &Point3<f64>, normal: &Vector3<f64>) -> Self {
        Self::from_plane(normal, -normal.dot(&point.coords))
    }

    /// Accumulate another quadric into this one.
    pub fn add(&mut self, other: &Self) {
        self.a += other.a;
        self.b += other.b;
        self.c += other.c;
    }

    /// Evaluate the summed squared plane distances at a point.
    #[must_use]
    pub fn evaluate(&self, point: &Point3<f64>) -> f64 {
        let p = point.coords;
        (self.a * p).dot(&p) + 2.0 * self.b.dot(&p) + self.c
    }

    /// Find the point minimizing the error, or `None` if the planes do not
    /// pin down a unique minimum (near-singular system).
    #[must_use]
    pub fn optimal_point(&self) -> Option<Point3<f64>> {
        if self.a.determinant().abs() < 1e-10 {
            return None;
        }
        self.a.lu().solve(&(-self.b)).map(Point3::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_quadric_has_zero_error() {
        let q = Quadric::default();
        assert!(q.evaluate(&Point3::new(1.0, 2.0, 3.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn plane_distance_is_squared() {
        let q = Quadric::from_plane(&Vector3::z(), 0.0);
        assert!(q.evaluate(&Point3::new(1.0, 2.0, 0.0)).abs() < 1e-12);
        assert!((q.evaluate(&Point3::new(0.0, 0.0, 1.0)) - 1.0).abs() < 1e-12);
        assert!((q.evaluate(&Point3::new(0.0, 0.0, -3.0)) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn offset_plane() {
        let q = Quadric::from_point_normal(&Point3::new(0.0, 0.0, 2.0), &Vector3::z());
        assert!(q.evaluate(&Point3::new(5.0, 5.0, 2.0)).abs() < 1e-12);
        assert!((q.evaluate(&Point3::new(0.0, 0.0, 3.0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn optimal_point_of_three_planes() {
        let mut q = Quadric::from_plane(&Vector3::x(), -1.0);
        q.add(&Quadric::from_plane(&Vector3::y(), -2.0));
        q.add(&Quadric::from_plane(&Vector3::z(), -3.0));

        // Planes x=1, y=2, z=3 intersect at exactly one point
        let p = q.optimal_point().unwrap();
        assert!((p.x - 1.0).abs() < 1e-10);
        assert!((p.y - 2.0).abs() < 1e-10);
        assert!((p.z - 3.0).abs() < 1e-10);
        assert!(q.evaluate(&p).abs() < 1e-10);
    }

    #[test]
    fn coplanar_quadric_has_no_unique_minimum() {
        let mut q = Quadric::from_plane(&Vector3::z(), 0.0);
        q.add(&Quadric::from_plane(&Vector3::z(), 0.0));
        assert!(q.optimal_point().is_none());
    }
}
