//! Sparse hash grid over accepted support anchors.

use std::collections::HashMap;

use nalgebra::Point3;
use sdf_types::PointRadius;

use crate::error::SpatialError;

/// Integer cell coordinate in grid space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellCoord {
    x: i32,
    y: i32,
    z: i32,
}

/// A sparse hash grid over [`PointRadius`] values.
///
/// The grid bridges continuous world space and discrete cells of a fixed
/// size. Only occupied cells are stored, so memory scales with the number of
/// inserted anchors, not the model extent. It is append-only: anchors are
/// inserted as the poisson thinning pass accepts them and never removed.
///
/// Pick a cell size close to the largest radius you expect to insert; the
/// neighborhood scans then stay within a few cells.
///
/// # Example
///
/// ```
/// use sdf_spatial::PointGrid;
/// use sdf_types::{Point3, PointRadius};
///
/// let mut grid = PointGrid::new(2.0);
/// grid.insert(PointRadius::new(Point3::origin(), 1.5));
///
/// // A candidate 2.0 away overlaps (1.5 + 1.0 > 2.0)
/// assert!(grid.collides_with(&Point3::new(2.0, 0.0, 0.0), 1.0));
/// // A candidate 3.0 away does not (1.5 + 1.0 < 3.0)
/// assert!(!grid.collides_with(&Point3::new(3.0, 0.0, 0.0), 1.0));
/// ```
#[derive(Debug, Clone)]
pub struct PointGrid {
    cell_size: f64,
    inv_cell_size: f64,
    max_radius: f64,
    cells: HashMap<CellCoord, Vec<PointRadius>>,
    len: usize,
}

impl PointGrid {
    /// Create an empty grid with the given cell size.
    ///
    /// The cell size is clamped to be positive; use [`PointGrid::try_new`]
    /// for fallible construction.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        let cell_size = cell_size.abs().max(f64::EPSILON);
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            max_radius: 0.0,
            cells: HashMap::new(),
            len: 0,
        }
    }

    /// Create an empty grid, rejecting an invalid cell size.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidCellSize`] if `cell_size` is not
    /// positive and finite.
    pub fn try_new(cell_size: f64) -> Result<Self, SpatialError> {
        if cell_size <= 0.0 || !cell_size.is_finite() {
            return Err(SpatialError::InvalidCellSize(cell_size));
        }
        Ok(Self::new(cell_size))
    }

    /// The grid cell size.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of inserted anchors.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if no anchor has been inserted.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest radius inserted so far.
    #[inline]
    #[must_use]
    pub const fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Insert an anchor.
    pub fn insert(&mut self, anchor: PointRadius) {
        let coord = self.cell_of(&anchor.point);
        self.cells.entry(coord).or_default().push(anchor);
        self.max_radius = self.max_radius.max(anchor.radius);
        self.len += 1;
    }

    /// Collect all anchors whose center lies within `radius` of `center`.
    #[must_use]
    pub fn query_within(&self, center: &Point3<f64>, radius: f64) -> Vec<PointRadius> {
        let mut found = Vec::new();
        self.scan(center, radius, |anchor| {
            if (anchor.point - center).norm() <= radius {
                found.push(*anchor);
            }
            false
        });
        found
    }

    /// Check whether a candidate footprint overlaps any inserted anchor.
    ///
    /// Overlap means some anchor's center distance to `center` is smaller
    /// than `radius` plus that anchor's own radius. This is the acceptance
    /// test of the poisson thinning pass.
    #[must_use]
    pub fn collides_with(&self, center: &Point3<f64>, radius: f64) -> bool {
        let mut hit = false;
        self.scan(center, radius + self.max_radius, |anchor| {
            if (anchor.point - center).norm() < radius + anchor.radius {
                hit = true;
                return true;
            }
            false
        });
        hit
    }

    /// Iterate over all inserted anchors.
    pub fn iter(&self) -> impl Iterator<Item = &PointRadius> {
        self.cells.values().flatten()
    }

    /// Visit every anchor in cells overlapping a sphere around `center`.
    /// The visitor returns `true` to stop early.
    fn scan(&self, center: &Point3<f64>, radius: f64, mut visit: impl FnMut(&PointRadius) -> bool) {
        let min = self.cell_of(&Point3::new(
            center.x - radius,
            center.y - radius,
            center.z - radius,
        ));
        let max = self.cell_of(&Point3::new(
            center.x + radius,
            center.y + radius,
            center.z + radius,
        ));

        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    if let Some(anchors) = self.cells.get(&CellCoord { x, y, z }) {
                        for anchor in anchors {
                            if visit(anchor) {
                                return;
                            }
                        }
                    }
                }
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    // Truncation is intentional - continuous coordinates map onto discrete cells
    fn cell_of(&self, point: &Point3<f64>) -> CellCoord {
        CellCoord {
            x: (point.x * self.inv_cell_size).floor() as i32,
            y: (point.y * self.inv_cell_size).floor() as i32,
            z: (point.z * self.inv_cell_size).floor() as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_empty() {
        let grid = PointGrid::new(1.0);
        assert!(grid.is_empty());
        assert_eq!(grid.len(), 0);
        assert!((grid.max_radius() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn try_new_rejects_bad_cell_size() {
        assert!(matches!(
            PointGrid::try_new(0.0),
            Err(SpatialError::InvalidCellSize(_))
        ));
        assert!(matches!(
            PointGrid::try_new(-1.0),
            Err(SpatialError::InvalidCellSize(_))
        ));
        assert!(matches!(
            PointGrid::try_new(f64::NAN),
            Err(SpatialError::InvalidCellSize(_))
        ));
        assert!(PointGrid::try_new(0.5).is_ok());
    }

    #[test]
    fn insert_and_query() {
        let mut grid = PointGrid::new(1.0);
        grid.insert(PointRadius::new(Point3::origin(), 0.5));
        grid.insert(PointRadius::new(Point3::new(5.0, 0.0, 0.0), 0.5));

        let near = grid.query_within(&Point3::new(0.1, 0.0, 0.0), 1.0);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].point, Point3::origin());

        let all = grid.query_within(&Point3::new(2.5, 0.0, 0.0), 3.0);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn query_crosses_cell_boundaries() {
        let mut grid = PointGrid::new(1.0);
        // On the far side of a cell boundary from the query center
        grid.insert(PointRadius::new(Point3::new(1.2, 0.0, 0.0), 0.1));
        let found = grid.query_within(&Point3::new(0.8, 0.0, 0.0), 0.1);
        assert!(found.is_empty());
        let found = grid.query_within(&Point3::new(0.8, 0.0, 0.0), 0.5);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn query_handles_negative_coordinates() {
        let mut grid = PointGrid::new(1.0);
        grid.insert(PointRadius::new(Point3::new(-0.5, -0.5, -0.5), 0.2));
        let found = grid.query_within(&Point3::new(-0.4, -0.5, -0.5), 0.2);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn collides_uses_radius_sum() {
        let mut grid = PointGrid::new(2.0);
        grid.insert(PointRadius::new(Point3::origin(), 1.5));

        assert!(grid.collides_with(&Point3::new(2.0, 0.0, 0.0), 1.0));
        assert!(!grid.collides_with(&Point3::new(3.0, 0.0, 0.0), 1.0));
    }

    #[test]
    fn collides_sees_large_anchor_from_far_away() {
        // A large anchor must be found even from a query several cells away
        let mut grid = PointGrid::new(0.5);
        grid.insert(PointRadius::new(Point3::origin(), 5.0));
        assert!(grid.collides_with(&Point3::new(4.0, 0.0, 0.0), 0.5));
        assert!(!grid.collides_with(&Point3::new(6.0, 0.0, 0.0), 0.5));
    }

    #[test]
    fn iter_visits_everything() {
        let mut grid = PointGrid::new(1.0);
        for i in 0..10 {
            grid.insert(PointRadius::new(Point3::new(f64::from(i), 0.0, 0.0), 0.1));
        }
        assert_eq!(grid.iter().count(), 10);
        assert_eq!(grid.len(), 10);
    }
}
