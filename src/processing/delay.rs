//! Fractional delay by linear-interpolation resampling
//!
//! `y(t) = x(t - delay)`, where `x` between samples is the straight line through
//! its two neighbours. Query times that fall outside the original axis read as
//! zero: no wraparound and no extrapolation.

use crate::core::types::{TimeAxis, Waveform};
use crate::validation::data::{require_finite, require_len};
use crate::validation::error::BearingResult;

/// Fractional positions closer than this to a sample index are snapped onto it,
/// so integer-sample delays reproduce the input exactly.
const GRID_SNAP: f64 = 1e-9;

/// Delay `signal` (sampled on `axis`) by `delay_s` seconds.
///
/// Negative delays advance the signal.
pub fn fractional_delay(signal: &Waveform, axis: &TimeAxis, delay_s: f64) -> BearingResult<Waveform> {
    require_len("signal", axis.len(), signal.len())?;
    require_finite("delay_s", delay_s)?;

    let x = signal.samples();
    let n = x.len();
    let start = match axis.first() {
        Some(start) => start,
        None => return Ok(Waveform::default()),
    };
    let dt = axis.dt();
    let last_index = (n - 1) as f64;

    let samples = axis
        .times()
        .iter()
        .map(|&t| {
            let mut pos = (t - delay_s - start) / dt;
            let nearest = pos.round();
            if (pos - nearest).abs() < GRID_SNAP {
                pos = nearest;
            }
            if pos < 0.0 || pos > last_index {
                return 0.0;
            }

            let lower = pos.floor() as usize;
            if lower + 1 >= n {
                return x[n - 1];
            }
            let frac = pos - lower as f64;
            if frac == 0.0 {
                x[lower]
            } else {
                x[lower] + frac * (x[lower + 1] - x[lower])
            }
        })
        .collect();

    tracing::trace!(samples = n, delay_s, delay_samples = delay_s / dt, "applied fractional delay");
    Ok(Waveform::new(samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::error::BearingError;

    fn ramp(len: usize) -> (TimeAxis, Waveform) {
        let axis = TimeAxis::with_len(len, 1000.0).unwrap();
        let waveform = Waveform::new((0..len).map(|i| i as f64).collect());
        (axis, waveform)
    }

    #[test]
    fn test_zero_delay_is_identity() {
        let (axis, ramp) = ramp(16);
        let delayed = fractional_delay(&ramp, &axis, 0.0).unwrap();
        assert_eq!(delayed, ramp);
    }

    #[test]
    fn test_integer_delay_shifts_and_zero_fills() {
        let (axis, ramp) = ramp(8);
        // 2 ms at 1 kHz is two samples
        let delayed = fractional_delay(&ramp, &axis, 0.002).unwrap();
        assert_eq!(delayed.samples(), &[0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_negative_delay_advances() {
        let (axis, ramp) = ramp(6);
        let advanced = fractional_delay(&ramp, &axis, -0.002).unwrap();
        assert_eq!(advanced.samples(), &[2.0, 3.0, 4.0, 5.0, 0.0, 0.0]);
    }

    #[test]
    fn test_half_sample_delay_interpolates() {
        let (axis, ramp) = ramp(6);
        let delayed = fractional_delay(&ramp, &axis, 0.0005).unwrap();
        let expected = [0.0, 0.5, 1.5, 2.5, 3.5, 4.5];
        for (got, want) in delayed.samples().iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{} != {}", got, want);
        }
    }

    #[test]
    fn test_delay_beyond_axis_is_silent() {
        let (axis, ramp) = ramp(4);
        let delayed = fractional_delay(&ramp, &axis, 1.0).unwrap();
        assert!(delayed.samples().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_length_mismatch() {
        let (axis, _) = ramp(4);
        let short = Waveform::zeros(3);
        assert!(matches!(
            fractional_delay(&short, &axis, 0.0),
            Err(BearingError::LengthMismatch { expected: 4, actual: 3, .. })
        ));
    }

    #[test]
    fn test_empty_signal() {
        let axis = TimeAxis::with_len(0, 1000.0).unwrap();
        let delayed = fractional_delay(&Waveform::default(), &axis, 0.001).unwrap();
        assert!(delayed.is_empty());
    }
}
