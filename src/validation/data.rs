//! Scalar precondition checks shared across the pipeline

use crate::validation::error::{BearingError, BearingResult};

/// Reject NaN and infinities
pub fn require_finite(parameter: &'static str, value: f64) -> BearingResult<f64> {
    if !value.is_finite() {
        return Err(BearingError::InvalidParameter {
            parameter,
            value,
            reason: "must be finite",
        });
    }
    Ok(value)
}

/// Reject anything that is not a finite, strictly positive number
pub fn require_positive(parameter: &'static str, value: f64) -> BearingResult<f64> {
    require_finite(parameter, value)?;
    if value <= 0.0 {
        return Err(BearingError::InvalidParameter {
            parameter,
            value,
            reason: "must be positive",
        });
    }
    Ok(value)
}

/// Reject anything below `minimum`
pub fn require_at_least(
    parameter: &'static str,
    value: f64,
    minimum: f64,
    reason: &'static str,
) -> BearingResult<f64> {
    require_finite(parameter, value)?;
    if value < minimum {
        return Err(BearingError::InvalidParameter { parameter, value, reason });
    }
    Ok(value)
}

/// Reject a waveform whose length disagrees with its reference
pub fn require_len(context: &'static str, expected: usize, actual: usize) -> BearingResult<()> {
    if expected != actual {
        return Err(BearingError::LengthMismatch { context, expected, actual });
    }
    Ok(())
}
