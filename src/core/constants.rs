//! Physical constants and default system parameters

/// Speed of sound in air at roughly 20 °C (m/s)
pub const SPEED_OF_SOUND_AIR: f64 = 343.0;

/// Default capture sample rate (Hz)
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 192_000.0;

/// Default capture window length in units of the maximum inter-receiver delay
pub const DEFAULT_CAPTURE_FACTOR: f64 = 4.0;

/// Smallest capture factor that still leaves room for a pulse and both delayed copies
pub const MIN_CAPTURE_FACTOR: f64 = 4.0;

/// Default receiver spacing used by the symmetric array (m)
pub const DEFAULT_RECEIVER_SPACING_M: f64 = 0.18;

/// Allowed disagreement between a declared spacing and the receiver positions (m)
pub const SPACING_TOLERANCE_M: f64 = 1e-6;

/// Largest lag magnitude (samples) the search and lookup table will accept
pub const MAX_LAG_SAMPLES: i64 = i32::MAX as i64;
