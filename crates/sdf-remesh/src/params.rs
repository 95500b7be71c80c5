//! Normalization parameters.

use crate::error::{RemeshError, RemeshResult};

/// Validated parameters for [`normalize_mesh`](crate::normalize_mesh).
///
/// Construction fails fast on an inconsistent parameter set, so every
/// downstream stage may assume `0 < min_length < max_length` and a positive
/// error budget.
///
/// # Example
///
/// ```
/// use sdf_remesh::{NormalizeParams, RemeshError};
///
/// let params = NormalizeParams::new(0.5, 1.0, 0.5)?;
/// assert!((params.max_length - 1.0).abs() < 1e-12);
///
/// // Inverted band is rejected
/// let bad = NormalizeParams::new(1.0, 0.5, 0.5);
/// assert!(matches!(bad, Err(RemeshError::LengthOrdering { .. })));
/// # Ok::<(), RemeshError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NormalizeParams {
    /// Edges shorter than this are collapse candidates.
    pub min_length: f64,
    /// Edges longer than this are split.
    pub max_length: f64,
    /// Maximum quadric error a collapse may introduce.
    pub max_error: f64,
}

impl NormalizeParams {
    /// Create a validated parameter set.
    ///
    /// # Errors
    ///
    /// Returns an error if any length is not positive and finite, or if
    /// `min_length >= max_length`.
    pub fn new(min_length: f64, max_length: f64, max_error: f64) -> RemeshResult<Self> {
        if !(min_length.is_finite() && min_length > 0.0) {
            return Err(RemeshError::InvalidMinLength(min_length));
        }
        if !(max_length.is_finite() && max_length > 0.0) {
            return Err(RemeshError::InvalidMaxLength(max_length));
        }
        if !(max_error.is_finite() && max_error > 0.0) {
            return Err(RemeshError::InvalidMaxError(max_error));
        }
        if min_length >= max_length {
            return Err(RemeshError::LengthOrdering {
                min: min_length,
                max: max_length,
            });
        }
        Ok(Self {
            min_length,
            max_length,
            max_error,
        })
    }
}

impl Default for NormalizeParams {
    /// Millimeter-scale defaults: edges bounded into `[0.5, 1.0]` with a
    /// 0.5 collapse error budget.
    fn default() -> Self {
        Self {
            min_length: 0.5,
            max_length: 1.0,
            max_error: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_params() {
        let params = NormalizeParams::new(0.5, 1.0, 0.5).unwrap();
        assert!((params.min_length - 0.5).abs() < f64::EPSILON);
        assert!((params.max_length - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_nonpositive_lengths() {
        assert!(matches!(
            NormalizeParams::new(0.0, 1.0, 0.5),
            Err(RemeshError::InvalidMinLength(_))
        ));
        assert!(matches!(
            NormalizeParams::new(0.5, f64::NAN, 0.5),
            Err(RemeshError::InvalidMaxLength(_))
        ));
        assert!(matches!(
            NormalizeParams::new(0.5, 1.0, -1.0),
            Err(RemeshError::InvalidMaxError(_))
        ));
    }

    #[test]
    fn rejects_inverted_band() {
        assert!(matches!(
            NormalizeParams::new(1.0, 1.0, 0.5),
            Err(RemeshError::LengthOrdering { .. })
        ));
        assert!(matches!(
            NormalizeParams::new(2.0, 1.0, 0.5),
            Err(RemeshError::LengthOrdering { .. })
        ));
    }

    #[test]
    fn default_is_valid() {
        let d = NormalizeParams::default();
        assert!(NormalizeParams::new(d.min_length, d.max_length, d.max_error).is_ok());
    }
}
