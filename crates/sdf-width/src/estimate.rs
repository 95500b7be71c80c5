//! Width estimation by filtered multi-ray casting.

use nalgebra::{Point3, Rotation3, Unit, Vector3};
use rayon::prelude::*;
use sdf_spatial::RayTree;
use tracing::{debug, info};

use crate::directions::{cone_directions, WeightedDirection};

/// Configuration for the ray-casting width estimator.
///
/// Both filters are optional: a non-positive `allowed_deviation` disables
/// deviation filtering and a non-positive `allowed_angle` disables angle
/// filtering, so a fully transparent configuration needs no extra flags.
///
/// # Example
///
/// ```
/// use sdf_width::RaysConfig;
///
/// let config = RaysConfig::default();
/// assert!(config.is_deviation_filtering());
/// assert!(!config.is_angle_filtering());
///
/// let transparent = RaysConfig::default()
///     .without_deviation_filtering()
///     .without_angle_filtering();
/// assert!(!transparent.is_deviation_filtering());
/// ```
#[derive(Debug, Clone)]
pub struct RaysConfig {
    /// Hits farther than this many weighted standard deviations from the
    /// weighted mean distance are discarded. Non-positive disables the
    /// filter. Values close to 1 are fragile: with few surviving rays the
    /// mean and deviation are estimated from the very samples being judged.
    pub allowed_deviation: f64,

    /// Maximal angle (radians) between the cast direction and the hit
    /// triangle's normal, measured from opposition: a hit survives when the
    /// angle is at least `PI - allowed_angle`. Non-positive disables the
    /// filter.
    pub allowed_angle: f64,

    /// The reusable direction bundle. Cast directions are this set rotated
    /// so its +Z pole points along the inverse surface normal.
    pub directions: Vec<WeightedDirection>,

    /// Ray origins are nudged this far along each cast direction so a ray
    /// cannot re-hit the triangle it starts on.
    pub safe_offset: f64,

    /// Vertices whose normal has a Z component above this are top-facing
    /// and skipped by [`estimate_widths`]. Must not exceed the sampling
    /// stage's own top-surface threshold.
    pub normal_z_max: f64,
}

impl Default for RaysConfig {
    fn default() -> Self {
        Self {
            allowed_deviation: 1.5,
            allowed_angle: -1.0,
            directions: cone_directions(120.0, 60),
            safe_offset: 1e-3,
            normal_z_max: 0.3,
        }
    }
}

impl RaysConfig {
    /// Whether deviation filtering is active.
    #[inline]
    #[must_use]
    pub fn is_deviation_filtering(&self) -> bool {
        self.allowed_deviation > 0.0
    }

    /// Whether angle filtering is active.
    #[inline]
    #[must_use]
    pub fn is_angle_filtering(&self) -> bool {
        self.allowed_angle > 0.0
    }

    /// Disable deviation filtering.
    #[must_use]
    pub const fn without_deviation_filtering(mut self) -> Self {
        self.allowed_deviation = -1.0;
        self
    }

    /// Disable angle filtering.
    #[must_use]
    pub const fn without_angle_filtering(mut self) -> Self {
        self.allowed_angle = -1.0;
        self
    }

    /// Enable angle filtering with the given allowance in radians.
    #[must_use]
    pub const fn with_angle_filtering(mut self, allowed_angle: f64) -> Self {
        self.allowed_angle = allowed_angle;
        self
    }
}

/// Estimate the local material width at a surface point.
///
/// The direction bundle is rotated so its pole points along `-normal`, each
/// ray is cast from the surface point nudged `safe_offset` along its own
/// direction (which removes self-intersection with the source triangle),
/// hits are filtered per the configuration, and the surviving distances are
/// averaged by ray weight.
///
/// Returns `None` when the width is undetermined: the normal is unusable,
/// no ray hits anything, or filtering removes every hit. A missing ray hit
/// is a normal outcome on open or thin geometry, not an error.
#[must_use]
pub fn estimate_width(
    point: &Point3<f64>,
    normal: &Vector3<f64>,
    tree: &RayTree,
    config: &RaysConfig,
) -> Option<f64> {
    if normal.norm_squared() < f64::EPSILON {
        return None;
    }

    let rotation = rotation_to_inverse_normal(normal);

    let mut hits: Vec<(f64, f64)> = Vec::with_capacity(config.directions.len());
    for weighted in &config.directions {
        let direction = rotation * weighted.direction;
        // Nudge the origin along the cast direction, past the triangle the
        // point sits on; the surface plane is then strictly behind the ray.
        let origin = point + direction * config.safe_offset;
        let Some(hit) = tree.first_hit(&origin, &direction) else {
            continue;
        };

        if config.is_angle_filtering() {
            let cos = direction.dot(&tree.face_normal(hit.face)).clamp(-1.0, 1.0);
            if cos.acos() < std::f64::consts::PI - config.allowed_angle {
                continue;
            }
        }

        hits.push((hit.distance, weighted.weight));
    }

    if config.is_deviation_filtering() && hits.len() >= 2 {
        let (mean, deviation) = weighted_mean_deviation(&hits);
        let allowed = config.allowed_deviation * deviation;
        hits.retain(|&(distance, _)| (distance - mean).abs() <= allowed);
    }

    let total_weight: f64 = hits.iter().map(|&(_, w)| w).sum();
    if total_weight <= 0.0 {
        return None;
    }

    Some(hits.iter().map(|&(d, w)| d * w).sum::<f64>() / total_weight)
}

/// Estimate widths for every (point, normal) pair in parallel.
///
/// Output order matches input order and output length equals input length.
/// Top-facing inputs (normal Z above `config.normal_z_max`) are skipped
/// without casting and reported as `None`; supports never attach there, so
/// their width is irrelevant.
///
/// Each evaluation is pure and shares only the read-only tree and
/// configuration, so the fan-out needs no locking.
///
/// # Panics
///
/// Panics if `points` and `normals` differ in length.
#[must_use]
pub fn estimate_widths(
    points: &[Point3<f64>],
    normals: &[Vector3<f64>],
    tree: &RayTree,
    config: &RaysConfig,
) -> Vec<Option<f64>> {
    assert_eq!(
        points.len(),
        normals.len(),
        "one normal per point is required"
    );

    info!(
        points = points.len(),
        rays = config.directions.len(),
        "Estimating widths"
    );

    let widths: Vec<Option<f64>> = points
        .par_iter()
        .zip(normals.par_iter())
        .map(|(point, normal)| {
            if normal.z > config.normal_z_max {
                return None;
            }
            estimate_width(point, normal, tree, config)
        })
        .collect();

    let determined = widths.iter().filter(|w| w.is_some()).count();
    debug!(
        determined,
        undetermined = widths.len() - determined,
        "Width estimation complete"
    );

    widths
}

/// Rotation carrying the bundle pole (+Z) onto the inverse of `normal`.
fn rotation_to_inverse_normal(normal: &Vector3<f64>) -> Rotation3<f64> {
    let down = -normal.normalize();
    Rotation3::rotation_between(&Vector3::z(), &down).unwrap_or_else(|| {
        // Antiparallel case (normal == +Z): any half-turn about a horizontal
        // axis maps +Z onto -Z
        Rotation3::from_axis_angle(&Unit::new_normalize(Vector3::x()), std::f64::consts::PI)
    })
}

/// Weighted mean and weighted (population) standard deviation of distances.
fn weighted_mean_deviation(hits: &[(f64, f64)]) -> (f64, f64) {
    let total_weight: f64 = hits.iter().map(|&(_, w)| w).sum();
    if total_weight <= 0.0 {
        return (0.0, 0.0);
    }

    let mean = hits.iter().map(|&(d, w)| d * w).sum::<f64>() / total_weight;
    let variance = hits
        .iter()
        .map(|&(d, w)| w * (d - mean) * (d - mean))
        .sum::<f64>()
        / total_weight;

    (mean, variance.sqrt())
}
