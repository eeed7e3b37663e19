//! Discrete-time capture of a single pulse at both receivers
//!
//! The capture window spans `[0, capture_factor * d / c)`. The pulse is centered
//! on the window midpoint and each receiver sees it delayed by its time of flight
//! relative to receiver 0. No attenuation is applied.

use serde::Serialize;

use crate::algorithms::propagation::PropagationModel;
use crate::core::constants::MIN_CAPTURE_FACTOR;
use crate::core::geometry::ArrayGeometry;
use crate::core::types::{ArrayParameters, TimeAxis, Waveform};
use crate::processing::delay::fractional_delay;
use crate::processing::pulse::PulseShape;
use crate::utils::config::SimulationConfig;
use crate::validation::data::{require_at_least, require_positive};
use crate::validation::error::BearingResult;

/// Everything produced by one simulated capture.
///
/// Read-only once simulated: the parameters a lookup table is checked against
/// cannot drift from the waveforms they describe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureResult {
    time_axis: TimeAxis,
    /// Emitted pulse, in source time
    source: Waveform,
    /// Absolute time of flight to each receiver (s)
    arrival_times_s: [f64; 2],
    rx0: Waveform,
    rx1: Waveform,
    /// Source-to-receiver distances (m); diagnostic only
    distances_m: [f64; 2],
    /// `(fs, d, c)` the capture was built with
    parameters: ArrayParameters,
}

impl CaptureResult {
    pub fn time_axis(&self) -> &TimeAxis {
        &self.time_axis
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.parameters.sample_rate_hz()
    }

    /// Largest possible inter-receiver delay `d / c` (s)
    pub fn max_delay_s(&self) -> f64 {
        self.parameters.max_delay_s()
    }

    pub fn source(&self) -> &Waveform {
        &self.source
    }

    pub fn arrival_times_s(&self) -> [f64; 2] {
        self.arrival_times_s
    }

    pub fn rx0(&self) -> &Waveform {
        &self.rx0
    }

    pub fn rx1(&self) -> &Waveform {
        &self.rx1
    }

    pub fn distances_m(&self) -> [f64; 2] {
        self.distances_m
    }

    pub fn parameters(&self) -> &ArrayParameters {
        &self.parameters
    }

    /// Arrival times re-referenced so receiver 0 arrives at zero
    pub fn relative_delays_s(&self) -> [f64; 2] {
        [0.0, self.arrival_times_s[1] - self.arrival_times_s[0]]
    }

    /// `tau1 - tau0`: positive when the source is nearer receiver 0
    pub fn true_tdoa_s(&self) -> f64 {
        self.arrival_times_s[1] - self.arrival_times_s[0]
    }

    /// Length of the capture window (s)
    pub fn duration_s(&self) -> f64 {
        self.time_axis.len() as f64 * self.time_axis.dt()
    }
}

/// Builds synchronized receiver waveforms from a geometry
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSimulator {
    wave_speed_mps: f64,
    sample_rate_hz: f64,
    capture_factor: f64,
    pulse: PulseShape,
}

impl CaptureSimulator {
    pub fn new(
        wave_speed_mps: f64,
        sample_rate_hz: f64,
        capture_factor: f64,
        pulse: PulseShape,
    ) -> BearingResult<Self> {
        require_positive("wave_speed_mps", wave_speed_mps)?;
        require_positive("sample_rate_hz", sample_rate_hz)?;
        require_at_least(
            "capture_factor",
            capture_factor,
            MIN_CAPTURE_FACTOR,
            "must be at least 4 so the pulse and both delayed copies fit the window",
        )?;
        require_positive("half_width_s", pulse.half_width_s)?;
        require_positive("window_cycles", pulse.window_cycles)?;

        Ok(Self {
            wave_speed_mps,
            sample_rate_hz,
            capture_factor,
            pulse,
        })
    }

    pub fn from_config(config: &SimulationConfig) -> BearingResult<Self> {
        config.validate().into_result()?;
        Self::new(
            config.wave_speed_mps,
            config.sample_rate_hz,
            config.capture_factor,
            config.pulse,
        )
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    pub fn wave_speed_mps(&self) -> f64 {
        self.wave_speed_mps
    }

    pub fn pulse(&self) -> &PulseShape {
        &self.pulse
    }

    /// `(fs, d, c)` for an array of the given spacing
    pub fn parameters_for(&self, spacing_m: f64) -> BearingResult<ArrayParameters> {
        ArrayParameters::new(self.sample_rate_hz, spacing_m, self.wave_speed_mps)
    }

    pub fn simulate(&self, geometry: &ArrayGeometry) -> BearingResult<CaptureResult> {
        let parameters = self.parameters_for(geometry.spacing_m())?;
        let max_delay_s = parameters.max_delay_s();

        let time_axis = TimeAxis::new(self.capture_factor * max_delay_s, self.sample_rate_hz)?;
        let center_s = time_axis.midpoint();
        if self.pulse.half_span_s() + max_delay_s > center_s {
            tracing::warn!(
                half_span_s = self.pulse.half_span_s(),
                max_delay_s,
                center_s,
                "pulse does not fit the capture window; receiver waveforms will be truncated"
            );
        }

        let source = self.pulse.synthesize(&time_axis, center_s)?;

        let model = PropagationModel::new(self.wave_speed_mps)?;
        let target = geometry.target();
        let receivers = geometry.receivers();
        let taus = model.times_of_flight(&target, receivers);
        let dists = model.distances(&target, receivers);
        let arrival_times_s = [taus[0], taus[1]];
        let distances_m = [dists[0], dists[1]];

        let rx0 = fractional_delay(&source, &time_axis, 0.0)?;
        let rx1 = fractional_delay(&source, &time_axis, arrival_times_s[1] - arrival_times_s[0])?;

        tracing::debug!(
            samples = time_axis.len(),
            max_delay_s,
            tau0_s = arrival_times_s[0],
            tau1_s = arrival_times_s[1],
            "simulated capture"
        );

        Ok(CaptureResult {
            time_axis,
            source,
            arrival_times_s,
            rx0,
            rx1,
            distances_m,
            parameters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Position;

    fn simulator() -> CaptureSimulator {
        CaptureSimulator::from_config(&SimulationConfig::default()).unwrap()
    }

    #[test]
    fn test_capture_shape() {
        let capture = simulator().simulate(&ArrayGeometry::default()).unwrap();
        let n = capture.time_axis().len();

        // ceil(4 * 0.18 / 343 * 192000) = ceil(403.03)
        assert_eq!(n, 404);
        assert_eq!(capture.source().len(), n);
        assert_eq!(capture.rx0().len(), n);
        assert_eq!(capture.rx1().len(), n);
        assert!((capture.max_delay_s() - 0.18 / 343.0).abs() < 1e-18);
        assert_eq!(capture.relative_delays_s()[0], 0.0);
    }

    #[test]
    fn test_receiver_zero_matches_source() {
        let capture = simulator().simulate(&ArrayGeometry::default()).unwrap();
        assert_eq!(capture.rx0(), capture.source());
    }

    #[test]
    fn test_arrival_times_and_distances() {
        let capture = simulator().simulate(&ArrayGeometry::default()).unwrap();
        let d0 = (0.79f64.powi(2) + 0.25f64.powi(2)).sqrt();
        let d1 = (0.61f64.powi(2) + 0.25f64.powi(2)).sqrt();
        assert!((capture.distances_m()[0] - d0).abs() < 1e-12);
        assert!((capture.distances_m()[1] - d1).abs() < 1e-12);
        assert!((capture.arrival_times_s()[0] - d0 / 343.0).abs() < 1e-15);
        // target sits on the rx1 side, so rx1 hears it first
        assert!(capture.true_tdoa_s() < 0.0);
    }

    #[test]
    fn test_window_containment() {
        let simulator = simulator();
        for target in [Position::new(0.70, 0.25), Position::new(50.0, 0.0), Position::new(-50.0, 0.0)] {
            let geometry = ArrayGeometry::symmetric(0.18, target).unwrap();
            let capture = simulator.simulate(&geometry).unwrap();
            for waveform in [capture.source(), capture.rx0(), capture.rx1()] {
                let s = waveform.samples();
                assert!(s[0].abs() < 1e-12);
                assert!(s[s.len() - 1].abs() < 1e-12);
                assert!(waveform.energy() > 0.0);
            }
        }
    }

    #[test]
    fn test_symmetric_target_gives_identical_receivers() {
        let geometry = ArrayGeometry::symmetric(0.18, Position::new(0.0, 1.5)).unwrap();
        let capture = simulator().simulate(&geometry).unwrap();
        assert_eq!(capture.true_tdoa_s(), 0.0);
        assert_eq!(capture.rx0(), capture.rx1());
    }

    #[test]
    fn test_rates_follow_parameters() {
        let geometry = ArrayGeometry::symmetric(0.25, Position::new(1.0, 1.0)).unwrap();
        let capture = simulator().simulate(&geometry).unwrap();
        let expected = ArrayParameters::new(192_000.0, 0.25, 343.0).unwrap();

        assert_eq!(capture.parameters(), &expected);
        assert_eq!(capture.sample_rate_hz(), expected.sample_rate_hz());
        assert_eq!(capture.max_delay_s(), expected.max_delay_s());
        assert_eq!(capture.time_axis().sample_rate_hz(), expected.sample_rate_hz());
    }

    #[test]
    fn test_rejects_small_capture_factor() {
        assert!(CaptureSimulator::new(343.0, 192_000.0, 3.0, PulseShape::default()).is_err());
        assert!(CaptureSimulator::new(343.0, 0.0, 4.0, PulseShape::default()).is_err());
        assert!(CaptureSimulator::new(0.0, 192_000.0, 4.0, PulseShape::default()).is_err());
    }

    #[test]
    fn test_deterministic() {
        let simulator = simulator();
        let a = simulator.simulate(&ArrayGeometry::default()).unwrap();
        let b = simulator.simulate(&ArrayGeometry::default()).unwrap();
        assert_eq!(a, b);
    }
}
