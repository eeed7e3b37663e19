//! Finite-duration source pulses
//!
//! Every pulse is a carrier multiplied by a raised-cosine (Hann) envelope
//! `0.5 * (1 + cos(pi * x / cycles))` for `|x| <= cycles` and zero elsewhere,
//! where `x = (t - t0) / half_width_s`. The envelope reaches zero at the
//! window edges, so the pulse has finite support and no amplitude step.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::core::types::{TimeAxis, Waveform};
use crate::validation::data::{require_finite, require_positive};
use crate::validation::error::BearingResult;

/// Carrier under the Hann envelope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PulseKind {
    /// `sin(2 pi f (t - t0))`
    SineBurst { frequency_hz: f64 },
    /// Normalized sinc `sin(pi x) / (pi x)` in units of the half-width
    Sinc,
}

/// Pulse parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseShape {
    pub kind: PulseKind,
    /// Envelope time unit (s)
    pub half_width_s: f64,
    /// Envelope span in units of `half_width_s` on each side of the center
    pub window_cycles: f64,
}

impl Default for PulseShape {
    fn default() -> Self {
        Self::sine_burst(6000.0, 100e-6, 4.0)
    }
}

impl PulseShape {
    pub fn sine_burst(frequency_hz: f64, half_width_s: f64, window_cycles: f64) -> Self {
        Self {
            kind: PulseKind::SineBurst { frequency_hz },
            half_width_s,
            window_cycles,
        }
    }

    pub fn sinc(half_width_s: f64, window_cycles: f64) -> Self {
        Self {
            kind: PulseKind::Sinc,
            half_width_s,
            window_cycles,
        }
    }

    /// Distance from the center to the edge of the envelope (s)
    pub fn half_span_s(&self) -> f64 {
        self.window_cycles * self.half_width_s
    }

    /// Render the pulse centered at `center_s` on every sample of `axis`
    pub fn synthesize(&self, axis: &TimeAxis, center_s: f64) -> BearingResult<Waveform> {
        require_positive("half_width_s", self.half_width_s)?;
        require_positive("window_cycles", self.window_cycles)?;
        require_finite("center_s", center_s)?;
        if let PulseKind::SineBurst { frequency_hz } = self.kind {
            require_finite("frequency_hz", frequency_hz)?;
        }

        let samples = axis
            .times()
            .iter()
            .map(|&t| {
                let offset = t - center_s;
                let x = offset / self.half_width_s;
                let envelope = hann_envelope(x, self.window_cycles);
                if envelope == 0.0 {
                    return 0.0;
                }
                let carrier = match self.kind {
                    PulseKind::SineBurst { frequency_hz } => (2.0 * PI * frequency_hz * offset).sin(),
                    PulseKind::Sinc => normalized_sinc(x),
                };
                carrier * envelope
            })
            .collect();

        tracing::trace!(
            samples = axis.len(),
            center_s,
            half_span_s = self.half_span_s(),
            "synthesized pulse"
        );
        Ok(Waveform::new(samples))
    }
}

/// Raised-cosine window over `|x| <= cycles`
pub fn hann_envelope(x: f64, cycles: f64) -> f64 {
    if x.abs() > cycles {
        return 0.0;
    }
    0.5 * (1.0 + (PI * x / cycles).cos())
}

fn normalized_sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}
