//! Straight-line propagation from a source to each receiver

use crate::core::types::Position;
use crate::validation::data::require_positive;
use crate::validation::error::BearingResult;

/// Constant-speed, straight-line propagation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationModel {
    wave_speed_mps: f64,
}

impl PropagationModel {
    pub fn new(wave_speed_mps: f64) -> BearingResult<Self> {
        require_positive("wave_speed_mps", wave_speed_mps)?;
        Ok(Self { wave_speed_mps })
    }

    pub fn wave_speed_mps(&self) -> f64 {
        self.wave_speed_mps
    }

    /// Source-to-receiver distances (m), one per receiver
    pub fn distances(&self, source: &Position, receivers: &[Position]) -> Vec<f64> {
        receivers.iter().map(|r| source.distance_to(r)).collect()
    }

    /// Time of flight to each receiver (s); never negative
    pub fn times_of_flight(&self, source: &Position, receivers: &[Position]) -> Vec<f64> {
        receivers
            .iter()
            .map(|r| source.distance_to(r) / self.wave_speed_mps)
            .collect()
    }
}
