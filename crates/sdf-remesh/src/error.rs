//! Error types for mesh normalization.

use thiserror::Error;

/// Errors that can occur during edge-length normalization.
#[derive(Debug, Error)]
pub enum RemeshError {
    /// The maximum edge length must be positive and finite.
    #[error("Invalid maximum edge length: {0} (must be positive and finite)")]
    InvalidMaxLength(f64),

    /// The minimum edge length must be positive and finite.
    #[error("Invalid minimum edge length: {0} (must be positive and finite)")]
    InvalidMinLength(f64),

    /// The collapse error budget must be positive and finite.
    #[error("Invalid collapse error budget: {0} (must be positive and finite)")]
    InvalidMaxError(f64),

    /// The edge-length band is empty or inverted.
    #[error("Minimum edge length {min} must be smaller than maximum edge length {max}")]
    LengthOrdering {
        /// The offending minimum length.
        min: f64,
        /// The offending maximum length.
        max: f64,
    },
}

/// Result type for normalization operations.
pub type RemeshResult<T> = std::result::Result<T, RemeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RemeshError::LengthOrdering { min: 2.0, max: 1.0 };
        let display = format!("{err}");
        assert!(display.contains('2'));
        assert!(display.contains('1'));

        let err = RemeshError::InvalidMaxLength(0.0);
        assert!(format!("{err}").contains("positive"));
    }
}
