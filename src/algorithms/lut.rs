//! Lag-to-bearing lookup table
//!
//! For a fixed `(fs, d, c)`, every feasible lag `k` in `[-K, K]` maps to a
//! delay `k / fs` and a far-field plane-wave angle
//! `asin(clamp(c * (k / fs) / d, -1, 1))`. Entries are stored in ascending lag
//! order so that `index = k + K`.

use serde::{Deserialize, Serialize};

use crate::core::types::{AngleUnit, ArrayParameters};
use crate::validation::error::{BearingError, BearingResult};

/// One row of the table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LutEntry {
    pub lag: i64,
    pub delay_s: f64,
    pub angle: f64,
}

/// Deserializing rebuilds the rows from `parameters` and `unit`; stored rows
/// that disagree with the rebuilt table are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TdoaLutRaw")]
pub struct TdoaLut {
    parameters: ArrayParameters,
    unit: AngleUnit,
    max_lag: i64,
    entries: Vec<LutEntry>,
}

impl TdoaLut {
    pub fn build(parameters: ArrayParameters, unit: AngleUnit) -> Self {
        let max_lag = parameters.max_lag();
        let fs = parameters.sample_rate_hz();
        let c = parameters.wave_speed_mps();
        let d = parameters.spacing_m();

        let entries: Vec<LutEntry> = (-max_lag..=max_lag)
            .map(|lag| {
                let delay_s = lag as f64 / fs;
                let angle = unit.from_radians(far_field_angle_rad(delay_s, c, d));
                LutEntry { lag, delay_s, angle }
            })
            .collect();

        tracing::debug!(
            max_lag,
            entries = entries.len(),
            sample_rate_hz = fs,
            spacing_m = d,
            wave_speed_mps = c,
            "built lag lookup table"
        );

        Self { parameters, unit, max_lag, entries }
    }

    pub fn parameters(&self) -> &ArrayParameters {
        &self.parameters
    }

    pub fn unit(&self) -> AngleUnit {
        self.unit
    }

    /// `K = floor((d / c) * fs)`
    pub fn max_lag(&self) -> i64 {
        self.max_lag
    }

    pub fn entries(&self) -> &[LutEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clamp `lag` into `[-K, K]`
    pub fn clamp_lag(&self, lag: i64) -> i64 {
        lag.clamp(-self.max_lag, self.max_lag)
    }

    /// Table row for `lag`, clamped into range first
    pub fn entry(&self, lag: i64) -> &LutEntry {
        let clamped = self.clamp_lag(lag);
        if clamped != lag {
            tracing::warn!(lag, clamped, max_lag = self.max_lag, "lag outside lookup table; clamped");
        }
        &self.entries[(clamped + self.max_lag) as usize]
    }

    /// `(delay_s, angle)` for `lag`, clamped into range first
    pub fn lookup(&self, lag: i64) -> (f64, f64) {
        let entry = self.entry(lag);
        (entry.delay_s, entry.angle)
    }

    /// Fail unless this table was built for `parameters`
    pub fn ensure_matches(&self, parameters: &ArrayParameters) -> BearingResult<()> {
        if self.parameters != *parameters {
            return Err(BearingError::ParameterMismatch {
                lut: self.parameters,
                capture: *parameters,
            });
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct TdoaLutRaw {
    parameters: ArrayParameters,
    #[serde(default)]
    unit: AngleUnit,
    max_lag: Option<i64>,
    entries: Option<Vec<LutEntry>>,
}

impl TryFrom<TdoaLutRaw> for TdoaLut {
    type Error = BearingError;

    fn try_from(raw: TdoaLutRaw) -> BearingResult<Self> {
        let lut = Self::build(raw.parameters, raw.unit);
        if let Some(max_lag) = raw.max_lag {
            if max_lag != lut.max_lag {
                return Err(BearingError::InvalidParameter {
                    parameter: "max_lag",
                    value: max_lag as f64,
                    reason: "does not match floor((d / c) * fs) for the table parameters",
                });
            }
        }
        if let Some(entries) = raw.entries {
            if entries != lut.entries {
                return Err(BearingError::InvalidParameter {
                    parameter: "entries",
                    value: entries.len() as f64,
                    reason: "do not match the rows rebuilt from the table parameters",
                });
            }
        }
        Ok(lut)
    }
}

/// Plane-wave arrival angle (radians) for an inter-receiver delay.
///
/// The arcsine argument is clamped to `[-1, 1]`, saturating at a quarter turn.
pub fn far_field_angle_rad(delay_s: f64, wave_speed_mps: f64, spacing_m: f64) -> f64 {
    let sin_arg = (wave_speed_mps * delay_s / spacing_m).clamp(-1.0, 1.0);
    sin_arg.asin()
}
