//! Core data types for the bearing estimation pipeline

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::core::constants::MAX_LAG_SAMPLES;
use crate::validation::data::{require_finite, require_positive};
use crate::validation::error::{BearingError, BearingResult};

/// Planar position in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    coords: Vector2<f64>,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { coords: Vector2::new(x, y) }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn x(&self) -> f64 {
        self.coords.x
    }

    pub fn y(&self) -> f64 {
        self.coords.y
    }

    pub fn as_vector(&self) -> &Vector2<f64> {
        &self.coords
    }

    /// Euclidean distance to another position (m)
    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.coords - other.coords).norm()
    }
}

impl From<Vector2<f64>> for Position {
    fn from(coords: Vector2<f64>) -> Self {
        Self { coords }
    }
}

/// Unit in which bearing angles are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    /// Convert an angle expressed in radians into this unit
    pub fn from_radians(self, radians: f64) -> f64 {
        match self {
            AngleUnit::Degrees => radians.to_degrees(),
            AngleUnit::Radians => radians,
        }
    }

    /// Magnitude of a quarter turn in this unit
    pub fn right_angle(self) -> f64 {
        self.from_radians(std::f64::consts::FRAC_PI_2)
    }
}

/// The `(fs, d, c)` triple that fixes the lag search bound and the lag-to-angle mapping.
///
/// A capture and a lookup table only agree on what a lag means when they were
/// built from equal parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ArrayParametersRaw")]
pub struct ArrayParameters {
    sample_rate_hz: f64,
    spacing_m: f64,
    wave_speed_mps: f64,
}

impl ArrayParameters {
    pub fn new(sample_rate_hz: f64, spacing_m: f64, wave_speed_mps: f64) -> BearingResult<Self> {
        require_positive("sample_rate_hz", sample_rate_hz)?;
        require_positive("spacing_m", spacing_m)?;
        require_positive("wave_speed_mps", wave_speed_mps)?;
        max_lag_samples(spacing_m / wave_speed_mps, sample_rate_hz)?;
        Ok(Self { sample_rate_hz, spacing_m, wave_speed_mps })
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    pub fn spacing_m(&self) -> f64 {
        self.spacing_m
    }

    pub fn wave_speed_mps(&self) -> f64 {
        self.wave_speed_mps
    }

    /// Largest physically possible inter-receiver delay, `d / c` (s)
    pub fn max_delay_s(&self) -> f64 {
        self.spacing_m / self.wave_speed_mps
    }

    /// Largest feasible lag magnitude in samples, `floor((d / c) * fs)`.
    ///
    /// Bounded by [`MAX_LAG_SAMPLES`], which `new` checks.
    pub fn max_lag(&self) -> i64 {
        (self.max_delay_s() * self.sample_rate_hz).floor() as i64
    }

    /// Exact bit patterns of the triple, usable as a hash key
    pub fn key_bits(&self) -> (u64, u64, u64) {
        (
            self.sample_rate_hz.to_bits(),
            self.spacing_m.to_bits(),
            self.wave_speed_mps.to_bits(),
        )
    }
}

#[derive(Deserialize)]
struct ArrayParametersRaw {
    sample_rate_hz: f64,
    spacing_m: f64,
    wave_speed_mps: f64,
}

impl TryFrom<ArrayParametersRaw> for ArrayParameters {
    type Error = BearingError;

    fn try_from(raw: ArrayParametersRaw) -> BearingResult<Self> {
        Self::new(raw.sample_rate_hz, raw.spacing_m, raw.wave_speed_mps)
    }
}

/// `floor(max_delay_s * sample_rate_hz)`, shared by the lag search and the lookup table
/// so both derive the same bound from the same arithmetic.
///
/// Fails unless the product is finite, non-negative and at most [`MAX_LAG_SAMPLES`].
pub fn max_lag_samples(max_delay_s: f64, sample_rate_hz: f64) -> BearingResult<i64> {
    let lag = max_delay_s * sample_rate_hz;
    if !(lag.is_finite() && (0.0..=MAX_LAG_SAMPLES as f64).contains(&lag)) {
        return Err(BearingError::InvalidParameter {
            parameter: "max_delay_s",
            value: max_delay_s,
            reason: "max_delay_s * sample_rate_hz must be a finite lag between 0 and i32::MAX samples",
        });
    }
    Ok(lag.floor() as i64)
}

/// Uniformly spaced sample times `t[i] = i / fs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimeAxisRaw")]
pub struct TimeAxis {
    sample_rate_hz: f64,
    times: Vec<f64>,
}

impl TimeAxis {
    /// Axis covering the half-open span `[0, duration_s)`
    pub fn new(duration_s: f64, sample_rate_hz: f64) -> BearingResult<Self> {
        require_finite("duration_s", duration_s)?;
        require_positive("sample_rate_hz", sample_rate_hz)?;

        let len = if duration_s > 0.0 {
            (duration_s * sample_rate_hz).ceil() as usize
        } else {
            0
        };
        Self::with_len(len, sample_rate_hz)
    }

    /// Axis of exactly `len` samples starting at zero
    pub fn with_len(len: usize, sample_rate_hz: f64) -> BearingResult<Self> {
        require_positive("sample_rate_hz", sample_rate_hz)?;

        let dt = 1.0 / sample_rate_hz;
        let times = (0..len).map(|i| i as f64 * dt).collect();
        Ok(Self { sample_rate_hz, times })
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    /// Sample interval `1 / fs` (s)
    pub fn dt(&self) -> f64 {
        1.0 / self.sample_rate_hz
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn first(&self) -> Option<f64> {
        self.times.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Time halfway between the first and last samples
    pub fn midpoint(&self) -> f64 {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => 0.5 * (first + last),
            _ => 0.0,
        }
    }
}

#[derive(Deserialize)]
struct TimeAxisRaw {
    sample_rate_hz: f64,
    times: Vec<f64>,
}

impl TryFrom<TimeAxisRaw> for TimeAxis {
    type Error = BearingError;

    /// Only axes that `with_len` would have produced are accepted
    fn try_from(raw: TimeAxisRaw) -> BearingResult<Self> {
        let axis = Self::with_len(raw.times.len(), raw.sample_rate_hz)?;
        if axis.times != raw.times {
            return Err(BearingError::InvalidParameter {
                parameter: "times",
                value: raw.times.len() as f64,
                reason: "sample times must be i / sample_rate_hz",
            });
        }
        Ok(axis)
    }
}

/// Real-valued samples aligned one-to-one with a [`TimeAxis`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Waveform {
    samples: Vec<f64>,
}

impl Waveform {
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    pub fn zeros(len: usize) -> Self {
        Self { samples: vec![0.0; len] }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Index of the sample with the largest magnitude
    pub fn peak_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &v) in self.samples.iter().enumerate() {
            match best {
                Some((_, b)) if v.abs() <= b => {}
                _ => best = Some((i, v.abs())),
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn energy(&self) -> f64 {
        self.samples.iter().map(|v| v * v).sum()
    }
}

impl From<Vec<f64>> for Waveform {
    fn from(samples: Vec<f64>) -> Self {
        Self::new(samples)
    }
}
