//! Greedy poisson thinning of anchor candidates.

use sdf_spatial::PointGrid;
use sdf_types::PointRadius;
use tracing::debug;

/// Thin candidates so no two surviving anchors' footprints overlap.
///
/// Candidates are sorted **descending by radius** before the greedy pass, so
/// larger (more important) anchors win conflicts; candidates of equal radius
/// keep their input order. Each candidate is tested against the grid: if any
/// already-accepted anchor lies closer than the sum of their radii, the
/// candidate is rejected and removed, otherwise it is inserted into the grid
/// before the next candidate is tested.
///
/// Survivors remain in `samples` (still in descending-radius order) and in
/// the grid, so successive calls against the same grid thin later batches
/// against earlier ones.
///
/// The separation invariant afterwards: every pair of surviving anchors is
/// at least the sum of their radii apart.
///
/// # Example
///
/// ```
/// use sdf_spatial::PointGrid;
/// use sdf_support::thin_points;
/// use sdf_types::{Point3, PointRadius};
///
/// let mut grid = PointGrid::new(2.0);
/// let mut samples = vec![
///     PointRadius::new(Point3::new(0.0, 0.0, 0.0), 1.0),
///     PointRadius::new(Point3::new(1.0, 0.0, 0.0), 2.0), // overlaps, but larger
/// ];
/// thin_points(&mut samples, &mut grid);
///
/// // The larger anchor won the conflict
/// assert_eq!(samples.len(), 1);
/// assert!((samples[0].radius - 2.0).abs() < 1e-12);
/// ```
pub fn thin_points(samples: &mut Vec<PointRadius>, grid: &mut PointGrid) {
    let candidates = samples.len();

    samples.sort_by(|a, b| {
        b.radius
            .partial_cmp(&a.radius)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    samples.retain(|sample| {
        if grid.collides_with(&sample.point, sample.radius) {
            false
        } else {
            grid.insert(*sample);
            true
        }
    });

    debug!(
        candidates,
        accepted = samples.len(),
        "Poisson thinning complete"
    );
}
