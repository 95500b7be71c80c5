//! Error types for support point generation.

use thiserror::Error;

/// Errors raised when a configuration is internally inconsistent.
///
/// Every variant is detected at configuration construction time; the
/// pipeline stages assume a validated configuration and never re-check.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The supported width range is empty or inverted.
    #[error("min_width {min} must be positive and smaller than max_width {max}")]
    WidthRange {
        /// The offending minimum width.
        min: f64,
        /// The offending maximum width.
        max: f64,
    },

    /// The anchor radius range is empty or inverted.
    #[error("min_radius {min} must be positive and smaller than max_radius {max}")]
    RadiusRange {
        /// The offending minimum radius.
        min: f64,
        /// The offending maximum radius.
        max: f64,
    },

    /// The oversampling multiplicator must be positive.
    #[error("Invalid sampling multiplicator: {0} (must be positive and finite)")]
    InvalidMultiplicator(f64),

    /// The ray-safety offset must be positive.
    #[error("Invalid ray safety offset: {0} (must be positive and finite)")]
    InvalidSafeOffset(f64),

    /// The ray direction set is empty, so no width could ever be measured.
    #[error("The ray direction set is empty")]
    EmptyDirections,

    /// Width estimation must not skip surface that sampling still covers.
    #[error(
        "rays.normal_z_max ({rays}) must not exceed sample.normal_z_max ({sample}): \
         sampling would place anchors on vertices that never got a width"
    )]
    NormalThreshold {
        /// Top-surface threshold of the ray stage.
        rays: f64,
        /// Top-surface threshold of the sampling stage.
        sample: f64,
    },
}

/// Errors raised by the support point pipeline.
#[derive(Debug, Error)]
pub enum SupportError {
    /// The configuration is inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Mesh normalization failed.
    #[error(transparent)]
    Remesh(#[from] sdf_remesh::RemeshError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ConfigError::WidthRange { min: 5.0, max: 1.0 };
        let display = format!("{err}");
        assert!(display.contains('5'));
        assert!(display.contains('1'));

        let err = ConfigError::NormalThreshold {
            rays: 0.5,
            sample: 0.3,
        };
        assert!(format!("{err}").contains("0.5"));
    }

    #[test]
    fn remesh_error_converts() {
        let remesh = sdf_remesh::RemeshError::InvalidMaxLength(-1.0);
        let err: SupportError = remesh.into();
        assert!(matches!(err, SupportError::Remesh(_)));
    }
}
