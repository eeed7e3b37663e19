use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::core::constants::{
    DEFAULT_CAPTURE_FACTOR, DEFAULT_SAMPLE_RATE_HZ, MIN_CAPTURE_FACTOR, SPEED_OF_SOUND_AIR,
};
use crate::core::types::AngleUnit;
use crate::processing::pulse::{PulseKind, PulseShape};

/// Scalar inputs of the capture and estimation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Propagation speed (m/s)
    pub wave_speed_mps: f64,
    /// Capture sample rate (Hz)
    pub sample_rate_hz: f64,
    /// Capture window length as a multiple of the maximum inter-receiver delay
    pub capture_factor: f64,
    /// Source pulse shape
    pub pulse: PulseShape,
    /// Unit of reported bearing angles
    pub angle_unit: AngleUnit,
    /// Correlation window center; `None` uses the waveform midpoint
    pub center_index: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            wave_speed_mps: SPEED_OF_SOUND_AIR,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            capture_factor: DEFAULT_CAPTURE_FACTOR,
            pulse: PulseShape::default(),
            angle_unit: AngleUnit::Degrees,
            center_index: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("failed to access config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outcome of validating a configuration
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether the configuration can be used
    pub is_valid: bool,
    /// Hard errors
    pub errors: Vec<ConfigError>,
    /// Usable but suspicious settings
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn push_error(&mut self, parameter: &str, value: impl ToString, reason: &str) {
        self.errors.push(ConfigError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        });
        self.is_valid = false;
    }

    /// First hard error, if any
    pub fn into_result(self) -> Result<Vec<String>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.warnings),
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wave_speed(mut self, wave_speed_mps: f64) -> Self {
        self.wave_speed_mps = wave_speed_mps;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate_hz: f64) -> Self {
        self.sample_rate_hz = sample_rate_hz;
        self
    }

    pub fn with_capture_factor(mut self, capture_factor: f64) -> Self {
        self.capture_factor = capture_factor;
        self
    }

    pub fn with_pulse(mut self, pulse: PulseShape) -> Self {
        self.pulse = pulse;
        self
    }

    pub fn with_angle_unit(mut self, angle_unit: AngleUnit) -> Self {
        self.angle_unit = angle_unit;
        self
    }

    pub fn with_center_index(mut self, center_index: usize) -> Self {
        self.center_index = Some(center_index);
        self
    }

    /// Check every scalar against its precondition
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult {
            is_valid: true,
            ..Default::default()
        };

        if !(self.wave_speed_mps.is_finite() && self.wave_speed_mps > 0.0) {
            result.push_error("wave_speed_mps", self.wave_speed_mps, "must be a positive finite speed");
        }
        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            result.push_error("sample_rate_hz", self.sample_rate_hz, "must be a positive finite rate");
        }
        if !(self.capture_factor.is_finite() && self.capture_factor >= MIN_CAPTURE_FACTOR) {
            result.push_error(
                "capture_factor",
                self.capture_factor,
                "must be at least 4 so the pulse and both delayed copies fit the window",
            );
        }
        if !(self.pulse.half_width_s.is_finite() && self.pulse.half_width_s > 0.0) {
            result.push_error("pulse.half_width_s", self.pulse.half_width_s, "must be positive");
        }
        if !(self.pulse.window_cycles.is_finite() && self.pulse.window_cycles > 0.0) {
            result.push_error("pulse.window_cycles", self.pulse.window_cycles, "must be positive");
        }
        if let PulseKind::SineBurst { frequency_hz } = self.pulse.kind {
            if !(frequency_hz.is_finite() && frequency_hz > 0.0) {
                result.push_error("pulse.frequency_hz", frequency_hz, "must be positive");
            } else if self.sample_rate_hz.is_finite() && frequency_hz >= self.sample_rate_hz / 2.0 {
                result
                    .warnings
                    .push(format!("pulse frequency {} Hz is at or above Nyquist", frequency_hz));
            }
        }

        result
    }

    /// Validate, then check that a pulse plus the largest possible delay fits
    /// in half of the capture window for an array of the given spacing.
    pub fn validate_for_spacing(&self, spacing_m: f64) -> ValidationResult {
        let mut result = self.validate();
        if !(spacing_m.is_finite() && spacing_m > 0.0) {
            result.push_error("spacing_m", spacing_m, "must be positive");
            return result;
        }
        if !result.is_valid {
            return result;
        }

        let max_delay_s = spacing_m / self.wave_speed_mps;
        let half_window_s = 0.5 * self.capture_factor * max_delay_s;
        let needed_s = self.pulse.half_span_s() + max_delay_s;
        if needed_s > half_window_s {
            result.warnings.push(format!(
                "pulse half-span plus max delay ({:.6} s) exceeds half the capture window ({:.6} s); waveforms will be truncated",
                needed_s, half_window_s
            ));
        }
        result
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(content)?;
        config.validate().into_result()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path_str,
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = self.to_json_string()?;
        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path_str,
            source,
        })
    }
}
