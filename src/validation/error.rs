//! Error taxonomy for the bearing estimation pipeline
//!
//! Only precondition violations surface as errors. Arcsine domain excursions
//! and out-of-range lag lookups are clamped where they occur.

use thiserror::Error;

use crate::core::types::ArrayParameters;
use crate::utils::config::ConfigError;

pub type BearingResult<T> = Result<T, BearingError>;

#[derive(Debug, Error)]
pub enum BearingError {
    #[error("invalid parameter '{parameter}' = {value}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("{context}: expected {expected} samples, got {actual}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("declared receiver spacing {declared_m} m disagrees with receiver positions {measured_m} m apart")]
    SpacingMismatch { declared_m: f64, measured_m: f64 },

    #[error("lookup table built for {lut:?} cannot resolve a capture made with {capture:?}")]
    ParameterMismatch {
        lut: ArrayParameters,
        capture: ArrayParameters,
    },

    #[error("correlation center index {center} outside waveform of {len} samples")]
    CenterOutOfRange { center: usize, len: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
