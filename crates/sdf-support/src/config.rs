//! Pipeline configuration.

use sdf_remesh::NormalizeParams;
use sdf_types::NormalStrategy;
use sdf_width::RaysConfig;

use crate::error::ConfigError;

/// Configuration of the sampling stages (generator and tiny-part rescue).
///
/// Width maps linearly onto anchor radius: a vertex at `min_width` gets
/// `min_radius`, one at `max_width` gets `max_radius`, clamped at both ends.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// Lower end of the supported width range.
    pub min_width: f64,
    /// Upper end of the supported width range.
    pub max_width: f64,

    /// Anchor radius assigned at `min_width`.
    pub min_radius: f64,
    /// Anchor radius assigned at `max_width`.
    pub max_radius: f64,

    /// Triangles and vertices whose normal has a Z component above this are
    /// top-facing and receive no anchors. Keep it above zero so vertical
    /// walls stay supported.
    pub normal_z_max: f64,

    /// Oversampling factor: expected samples per unit area are
    /// `multiplicator / radius^2`, giving the poisson thinning pass enough
    /// candidates to cover the surface despite random placement. Useful
    /// range is roughly 2 to 12.
    pub multiplicator: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            min_width: 0.1,
            max_width: 10.0,
            min_radius: 1.5,
            max_radius: 10.0,
            normal_z_max: 0.3,
            multiplicator: 6.0,
        }
    }
}

/// Full pipeline configuration.
///
/// Use [`Config::new`] to construct a validated instance; the pipeline
/// assumes the cross-field invariants hold and never re-checks them.
/// `Config::default()` is known-consistent.
///
/// # Example
///
/// ```
/// use sdf_support::{Config, ConfigError, SampleConfig};
/// use sdf_width::RaysConfig;
///
/// // Estimation must cover at least the surface that sampling covers
/// let rays = RaysConfig {
///     normal_z_max: 0.9,
///     ..RaysConfig::default()
/// };
/// let result = Config::new(
///     rays,
///     SampleConfig::default(),
///     sdf_remesh::NormalizeParams::default(),
///     sdf_types::NormalStrategy::default(),
/// );
/// assert!(matches!(result, Err(ConfigError::NormalThreshold { .. })));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Width estimator configuration.
    pub rays: RaysConfig,
    /// Sampling configuration.
    pub sample: SampleConfig,
    /// Edge-length normalization thresholds.
    pub normalize: NormalizeParams,
    /// Vertex-normal estimation strategy.
    pub normal_strategy: NormalStrategy,
}

impl Config {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a range is empty or inverted, the
    /// multiplicator or safety offset is not positive, the direction set is
    /// empty, or the two top-surface thresholds are ordered the wrong way
    /// (`rays.normal_z_max > sample.normal_z_max` would let the generator
    /// place anchors on vertices the estimator never measured).
    pub fn new(
        rays: RaysConfig,
        sample: SampleConfig,
        normalize: NormalizeParams,
        normal_strategy: NormalStrategy,
    ) -> Result<Self, ConfigError> {
        if !(sample.min_width.is_finite() && sample.min_width > 0.0)
            || sample.min_width >= sample.max_width
        {
            return Err(ConfigError::WidthRange {
                min: sample.min_width,
                max: sample.max_width,
            });
        }
        if !(sample.min_radius.is_finite() && sample.min_radius > 0.0)
            || sample.min_radius >= sample.max_radius
        {
            return Err(ConfigError::RadiusRange {
                min: sample.min_radius,
                max: sample.max_radius,
            });
        }
        if !(sample.multiplicator.is_finite() && sample.multiplicator > 0.0) {
            return Err(ConfigError::InvalidMultiplicator(sample.multiplicator));
        }
        if !(rays.safe_offset.is_finite() && rays.safe_offset > 0.0) {
            return Err(ConfigError::InvalidSafeOffset(rays.safe_offset));
        }
        if rays.directions.is_empty() {
            return Err(ConfigError::EmptyDirections);
        }
        if rays.normal_z_max > sample.normal_z_max {
            return Err(ConfigError::NormalThreshold {
                rays: rays.normal_z_max,
                sample: sample.normal_z_max,
            });
        }

        Ok(Self {
            rays,
            sample,
            normalize,
            normal_strategy,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rays: RaysConfig::default(),
            sample: SampleConfig::default(),
            normalize: NormalizeParams::default(),
            normal_strategy: NormalStrategy::default(),
        }
    }
}
