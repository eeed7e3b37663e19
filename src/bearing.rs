//! End-to-end bearing estimation
//!
//! Geometry goes in, a simulated capture and a resolved `(delay, angle)` come out.
//! The lookup table used to resolve a lag must have been built for the same
//! `(fs, d, c)` as the capture; [`resolve`] refuses to mix them.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::algorithms::lut::TdoaLut;
use crate::algorithms::tdoa::{LagSearchResult, TdoaEstimator};
use crate::core::geometry::ArrayGeometry;
use crate::core::types::AngleUnit;
use crate::processing::cache::LutCache;
use crate::processing::capture::{CaptureResult, CaptureSimulator};
use crate::utils::config::SimulationConfig;
use crate::validation::error::BearingResult;

/// Resolved bearing for one capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BearingEstimate {
    /// Lag after clamping into the table range (samples)
    pub lag: i64,
    /// Inter-receiver delay for `lag` (s); positive when rx1 leads
    pub delay_s: f64,
    /// Far-field angle from broadside, positive toward receiver 1
    pub angle: f64,
    pub unit: AngleUnit,
    pub search: LagSearchResult,
}

/// Turn a lag search into a bearing using a table built for the capture's array
pub fn resolve(capture: &CaptureResult, search: LagSearchResult, lut: &TdoaLut) -> BearingResult<BearingEstimate> {
    lut.ensure_matches(capture.parameters())?;

    let entry = *lut.entry(search.lag);
    Ok(BearingEstimate {
        lag: entry.lag,
        delay_s: entry.delay_s,
        angle: entry.angle,
        unit: lut.unit(),
        search,
    })
}

/// Simulator, estimator and table cache configured from one [`SimulationConfig`]
#[derive(Debug)]
pub struct BearingPipeline {
    config: SimulationConfig,
    simulator: CaptureSimulator,
    estimator: TdoaEstimator,
    cache: LutCache,
}

impl BearingPipeline {
    pub fn new(config: SimulationConfig) -> BearingResult<Self> {
        let simulator = CaptureSimulator::from_config(&config)?;
        let estimator = match config.center_index {
            Some(center) => TdoaEstimator::with_center_index(center),
            None => TdoaEstimator::new(),
        };

        Ok(Self {
            config,
            simulator,
            estimator,
            cache: LutCache::new(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn simulator(&self) -> &CaptureSimulator {
        &self.simulator
    }

    pub fn cache(&self) -> &LutCache {
        &self.cache
    }

    /// Lookup table for the capture's array, shared across calls
    pub fn lut_for(&mut self, capture: &CaptureResult) -> Arc<TdoaLut> {
        self.cache.get_or_build(capture.parameters(), self.config.angle_unit)
    }

    /// Estimate the bearing of an existing capture
    pub fn estimate(&mut self, capture: &CaptureResult) -> BearingResult<BearingEstimate> {
        let search = self.estimator.estimate(
            capture.rx0(),
            capture.rx1(),
            capture.sample_rate_hz(),
            capture.max_delay_s(),
        )?;
        let lut = self.lut_for(capture);
        let estimate = resolve(capture, search, &lut)?;

        tracing::debug!(
            lag = estimate.lag,
            delay_s = estimate.delay_s,
            angle = estimate.angle,
            unit = ?estimate.unit,
            "resolved bearing"
        );
        Ok(estimate)
    }

    /// Simulate a capture for `geometry` and estimate its bearing
    pub fn run(&mut self, geometry: &ArrayGeometry) -> BearingResult<(CaptureResult, BearingEstimate)> {
        let validation = self.config.validate_for_spacing(geometry.spacing_m());
        for warning in &validation.warnings {
            tracing::warn!("{}", warning);
        }

        let capture = self.simulator.simulate(geometry)?;
        let estimate = self.estimate(&capture)?;
        Ok((capture, estimate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ArrayParameters, Position};
    use crate::processing::pulse::PulseShape;
    use crate::validation::error::BearingError;

    const FS: f64 = 192_000.0;

    fn pipeline() -> BearingPipeline {
        BearingPipeline::new(SimulationConfig::default()).unwrap()
    }

    #[test]
    fn test_reference_scenario() {
        let geometry = ArrayGeometry::default();
        let (capture, estimate) = pipeline().run(&geometry).unwrap();

        assert_eq!(estimate.search.max_lag(), 100);
        assert_eq!(estimate.search.lags.len(), 201);

        // Δτ = (|target - rx1| - |target - rx0|) / c is negative here;
        // a positive lag means rx1 leads, so lag / fs tracks -Δτ
        let target = geometry.target();
        let [rx0, rx1] = *geometry.receivers();
        let true_tdoa = (target.distance_to(&rx1) - target.distance_to(&rx0)) / 343.0;
        assert!((capture.true_tdoa_s() - true_tdoa).abs() < 1e-15);
        assert!((estimate.search.lag as f64 / FS + true_tdoa).abs() <= 1.0 / FS);
        assert_eq!(estimate.lag, 95);
        assert!((estimate.delay_s - 95.0 / FS).abs() < 1e-15);

        let true_bearing = geometry.true_bearing_rad().to_degrees();
        assert!(estimate.angle > 0.0);
        assert!((estimate.angle - true_bearing).abs() < 1.5);
    }

    #[test]
    fn test_symmetric_target_is_broadside() {
        let geometry = ArrayGeometry::symmetric(0.18, Position::new(0.0, 2.0)).unwrap();
        let (_, estimate) = pipeline().run(&geometry).unwrap();
        assert_eq!(estimate.lag, 0);
        assert_eq!(estimate.delay_s, 0.0);
        assert!(estimate.angle.abs() < 1e-12);
    }

    #[test]
    fn test_bearing_sweep_within_one_sample() {
        let mut pipeline = pipeline();
        for degrees in [-60.0f64, -30.0, -10.0, 15.0, 45.0, 60.0] {
            let theta = degrees.to_radians();
            let target = Position::new(5.0 * theta.sin(), 5.0 * theta.cos());
            let geometry = ArrayGeometry::symmetric(0.18, target).unwrap();
            let (capture, estimate) = pipeline.run(&geometry).unwrap();

            assert!(
                (estimate.delay_s + capture.true_tdoa_s()).abs() <= 1.0 / FS,
                "{}°: lag {} vs true tdoa {}",
                degrees,
                estimate.lag,
                capture.true_tdoa_s()
            );
            assert!((estimate.angle - degrees).abs() < 1.5, "{}° estimated as {}", degrees, estimate.angle);
        }

        // all runs share one table
        let (hits, misses, _) = pipeline.cache().get_statistics();
        assert_eq!(misses, 1);
        assert_eq!(hits, 5);
    }

    #[test]
    fn test_sinc_pulse_scenario() {
        let config = SimulationConfig::new().with_pulse(PulseShape::sinc(30e-6, 6.0));
        let geometry = ArrayGeometry::default();
        let (capture, estimate) = BearingPipeline::new(config).unwrap().run(&geometry).unwrap();
        assert!((estimate.delay_s + capture.true_tdoa_s()).abs() <= 1.0 / FS);
    }

    #[test]
    fn test_radians_output() {
        let config = SimulationConfig::new().with_angle_unit(AngleUnit::Radians);
        let (_, estimate) = BearingPipeline::new(config).unwrap().run(&ArrayGeometry::default()).unwrap();
        assert_eq!(estimate.unit, AngleUnit::Radians);
        assert!(estimate.angle > 1.0 && estimate.angle < std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_mismatched_table_rejected() {
        let mut pipeline = pipeline();
        let (capture, estimate) = pipeline.run(&ArrayGeometry::default()).unwrap();

        let wrong = ArrayParameters::new(96_000.0, 0.18, 343.0).unwrap();
        let lut = TdoaLut::build(wrong, AngleUnit::Degrees);
        assert!(matches!(
            resolve(&capture, estimate.search, &lut),
            Err(BearingError::ParameterMismatch { .. })
        ));
    }

    #[test]
    fn test_out_of_range_lag_is_clamped() {
        let mut pipeline = pipeline();
        let (capture, estimate) = pipeline.run(&ArrayGeometry::default()).unwrap();
        let lut = pipeline.lut_for(&capture);

        let mut search = estimate.search.clone();
        search.lag = lut.max_lag() + 5;
        let clamped = resolve(&capture, search, &lut).unwrap();
        assert_eq!(clamped.lag, lut.max_lag());
        assert_eq!((clamped.delay_s, clamped.angle), lut.lookup(lut.max_lag()));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig::new().with_capture_factor(1.0);
        assert!(matches!(BearingPipeline::new(config), Err(BearingError::Config(_))));
    }

    #[test]
    fn test_deterministic() {
        let geometry = ArrayGeometry::default();
        let a = pipeline().run(&geometry).unwrap();
        let b = pipeline().run(&geometry).unwrap();
        assert_eq!(a, b);
    }
}
