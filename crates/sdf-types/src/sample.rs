//! Support anchor candidate type.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A support anchor candidate: a surface position plus the footprint radius
/// appropriate for the local wall thickness.
///
/// The radius doubles as the minimum-separation requirement enforced by the
/// poisson thinning pass: two accepted anchors must be at least the sum of
/// their radii apart.
///
/// # Example
///
/// ```
/// use sdf_types::{PointRadius, Point3};
///
/// let a = PointRadius::new(Point3::origin(), 1.5);
/// let b = PointRadius::new(Point3::new(4.0, 0.0, 0.0), 2.0);
///
/// // 4.0 >= 1.5 + 2.0, so these two anchors do not overlap
/// assert!(!a.overlaps(&b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointRadius {
    /// Surface position of the anchor.
    pub point: Point3<f64>,
    /// Footprint radius (also the local spacing requirement).
    pub radius: f64,
}

impl PointRadius {
    /// Create a new anchor candidate.
    #[inline]
    #[must_use]
    pub const fn new(point: Point3<f64>, radius: f64) -> Self {
        Self { point, radius }
    }

    /// Check whether the footprints of two anchors overlap.
    ///
    /// Overlap means the center distance is smaller than the sum of radii.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        (self.point - other.point).norm() < self.radius + other.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_uses_radius_sum() {
        let a = PointRadius::new(Point3::origin(), 1.0);
        let near = PointRadius::new(Point3::new(1.9, 0.0, 0.0), 1.0);
        let far = PointRadius::new(Point3::new(2.1, 0.0, 0.0), 1.0);
        assert!(a.overlaps(&near));
        assert!(!a.overlaps(&far));
    }

    #[test]
    fn touching_anchors_do_not_overlap() {
        let a = PointRadius::new(Point3::origin(), 1.0);
        let b = PointRadius::new(Point3::new(2.0, 0.0, 0.0), 1.0);
        assert!(!a.overlaps(&b));
    }
}
