//! Time difference of arrival by bounded cross-correlation search
//!
//! No real inter-receiver delay can exceed `d / c`, so only the integer lags
//! `[-K, K]` with `K = floor(tmax * fs)` are searched. Each lag is scored by the
//! dot product of `rx0[n]` and `rx1[n - k]` over the samples of a window
//! `[center - K, center + K]` (clipped to the waveform) for which both indices
//! are valid. A positive lag therefore means `rx1` leads `rx0`.

use serde::{Deserialize, Serialize};

use crate::core::types::{max_lag_samples, Waveform};
use crate::validation::data::{require_len, require_positive};
use crate::validation::error::{BearingError, BearingResult};

/// Outcome of one lag search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagSearchResult {
    /// Lag with the largest correlation (samples)
    pub lag: i64,
    /// Every searched lag, ascending
    pub lags: Vec<i64>,
    /// Correlation at each entry of `lags`; zero where the overlap was empty
    pub correlation: Vec<f64>,
}

impl LagSearchResult {
    /// Largest searched lag magnitude
    pub fn max_lag(&self) -> i64 {
        self.lags.last().copied().unwrap_or(0)
    }

    /// Correlation value at the selected lag
    pub fn peak_correlation(&self) -> f64 {
        let index = (self.lag - self.lags.first().copied().unwrap_or(0)) as usize;
        self.correlation.get(index).copied().unwrap_or(0.0)
    }

    /// Selected lag converted to seconds
    pub fn delay_s(&self, sample_rate_hz: f64) -> f64 {
        self.lag as f64 / sample_rate_hz
    }
}

/// Exhaustive bounded lag search
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TdoaEstimator {
    center_index: Option<usize>,
}

impl TdoaEstimator {
    /// Estimator centered on the waveform midpoint
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimator whose correlation window is centered on `center_index`
    pub fn with_center_index(center_index: usize) -> Self {
        Self { center_index: Some(center_index) }
    }

    pub fn center_index(&self) -> Option<usize> {
        self.center_index
    }

    /// Find the lag that best aligns `rx1` to `rx0`.
    ///
    /// Lags whose overlap is empty score zero and are only selected when no lag
    /// has any overlap at all. Ties go to the most negative lag.
    pub fn estimate(
        &self,
        rx0: &Waveform,
        rx1: &Waveform,
        sample_rate_hz: f64,
        max_delay_s: f64,
    ) -> BearingResult<LagSearchResult> {
        require_len("rx1", rx0.len(), rx1.len())?;
        require_positive("sample_rate_hz", sample_rate_hz)?;
        let max_lag = max_lag_samples(max_delay_s, sample_rate_hz)?;

        let x = rx0.samples();
        let y = rx1.samples();
        let n = x.len() as i64;
        let center = match self.center_index {
            Some(center) if n > 0 && center >= x.len() => {
                return Err(BearingError::CenterOutOfRange { center, len: x.len() });
            }
            Some(center) => center as i64,
            None => n / 2,
        };

        let window_start = center.saturating_sub(max_lag).max(0);
        let window_end = center.saturating_add(max_lag).min(n - 1);

        let lags: Vec<i64> = (-max_lag..=max_lag).collect();
        let mut correlation = vec![0.0; lags.len()];
        let mut best: Option<(usize, f64)> = None;

        for (i, &k) in lags.iter().enumerate() {
            let a0 = window_start.max(k);
            let a1 = window_end.min(n - 1 + k);
            if a1 < a0 {
                continue;
            }

            let (a0, a1) = (a0 as usize, a1 as usize);
            let (b0, b1) = ((a0 as i64 - k) as usize, (a1 as i64 - k) as usize);
            let r: f64 = x[a0..=a1]
                .iter()
                .zip(&y[b0..=b1])
                .map(|(p, q)| p * q)
                .sum();
            correlation[i] = r;

            match best {
                Some((_, best_r)) if r <= best_r => {}
                _ => best = Some((i, r)),
            }
        }

        let lag = match best {
            Some((i, _)) => lags[i],
            None => -max_lag,
        };

        tracing::debug!(
            lag,
            max_lag,
            center,
            samples = n,
            peak = best.map(|(_, r)| r).unwrap_or(0.0),
            "lag search complete"
        );

        Ok(LagSearchResult { lag, lags, correlation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TimeAxis;
    use crate::processing::delay::fractional_delay;
    use crate::processing::pulse::PulseShape;

    const FS: f64 = 192_000.0;

    fn pulse_waveform(len: usize) -> (TimeAxis, Waveform) {
        let axis = TimeAxis::with_len(len, FS).unwrap();
        let pulse = PulseShape::default().synthesize(&axis, axis.midpoint()).unwrap();
        (axis, pulse)
    }

    #[test]
    fn test_zero_lag_reflexivity() {
        let (_, pulse) = pulse_waveform(404);
        let result = TdoaEstimator::new().estimate(&pulse, &pulse, FS, 0.18 / 343.0).unwrap();
        assert_eq!(result.lag, 0);
        assert_eq!(result.lags.len(), 201);
        assert_eq!(result.correlation.len(), 201);
        assert!((result.peak_correlation() - pulse.energy()).abs() < 1e-9);
    }

    #[test]
    fn test_recovers_integer_delay() {
        let (axis, pulse) = pulse_waveform(404);
        for shift in [-40i64, -7, 0, 13, 60] {
            let rx1 = fractional_delay(&pulse, &axis, -(shift as f64) / FS).unwrap();
            let result = TdoaEstimator::new().estimate(&pulse, &rx1, FS, 0.18 / 343.0).unwrap();
            assert_eq!(result.lag, shift);
        }
    }

    #[test]
    fn test_recovers_fractional_delay_to_nearest_sample() {
        let (axis, pulse) = pulse_waveform(404);
        // rx1 leads by 30.3 samples
        let rx1 = fractional_delay(&pulse, &axis, -30.3 / FS).unwrap();
        let result = TdoaEstimator::new().estimate(&pulse, &rx1, FS, 0.18 / 343.0).unwrap();
        assert_eq!(result.lag, 30);
        assert!((result.delay_s(FS) - 30.0 / FS).abs() < 1e-15);
    }

    #[test]
    fn test_lags_are_bounded() {
        let (_, pulse) = pulse_waveform(404);
        let result = TdoaEstimator::new().estimate(&pulse, &pulse, FS, 0.18 / 343.0).unwrap();
        assert_eq!(result.lags.first(), Some(&-100));
        assert_eq!(result.max_lag(), 100);
        assert!(result.lags.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn test_tie_goes_to_lowest_lag() {
        let silent = Waveform::zeros(64);
        let result = TdoaEstimator::new().estimate(&silent, &silent, 1000.0, 0.005).unwrap();
        assert_eq!(result.lag, -5);
        assert!(result.correlation.iter().all(|&r| r == 0.0));
    }

    #[test]
    fn test_empty_overlap_not_selected() {
        // Every overlapping lag scores negative; lags without overlap must not win
        let rx0 = Waveform::new(vec![1.0, 1.0, 1.0]);
        let rx1 = Waveform::new(vec![-1.0, -1.0, -1.0]);
        let result = TdoaEstimator::with_center_index(0).estimate(&rx0, &rx1, 1.0, 5.0).unwrap();

        // window is [0, 2]; lags below -2 have no overlap
        assert_eq!(result.correlation[0], 0.0);
        assert!(result.lag >= -2);
        assert!(result.peak_correlation() < 0.0);
    }

    #[test]
    fn test_empty_waveforms() {
        let empty = Waveform::default();
        let result = TdoaEstimator::new().estimate(&empty, &empty, 1000.0, 0.002).unwrap();
        assert_eq!(result.lag, -2);
        assert_eq!(result.lags, vec![-2, -1, 0, 1, 2]);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = TdoaEstimator::new().estimate(&Waveform::zeros(10), &Waveform::zeros(9), 1000.0, 0.001);
        assert!(matches!(result, Err(BearingError::LengthMismatch { .. })));
    }

    #[test]
    fn test_unrepresentable_max_delay_rejected() {
        let w = Waveform::zeros(8);
        for tmax in [1e300, f64::NAN, f64::INFINITY, -1e-3] {
            let result = TdoaEstimator::new().estimate(&w, &w, FS, tmax);
            assert!(matches!(
                result,
                Err(BearingError::InvalidParameter { parameter: "max_delay_s", .. })
            ));
        }
    }

    #[test]
    fn test_center_out_of_range_rejected() {
        let w = Waveform::zeros(10);
        let result = TdoaEstimator::with_center_index(10).estimate(&w, &w, 1000.0, 0.001);
        assert!(matches!(result, Err(BearingError::CenterOutOfRange { center: 10, len: 10 })));
    }

    #[test]
    fn test_deterministic() {
        let (axis, pulse) = pulse_waveform(404);
        let rx1 = fractional_delay(&pulse, &axis, 12.6 / FS).unwrap();
        let a = TdoaEstimator::new().estimate(&pulse, &rx1, FS, 0.18 / 343.0).unwrap();
        let b = TdoaEstimator::new().estimate(&pulse, &rx1, FS, 0.18 / 343.0).unwrap();
        assert_eq!(a, b);
    }
}
