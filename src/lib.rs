//! Two-receiver acoustic bearing estimation
//!
//! Simulates a pulse arriving at a pair of receivers, recovers the time
//! difference of arrival with a bounded cross-correlation search and maps the
//! resulting lag to a far-field bearing through a precomputed lookup table.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod bearing;

// Re-export commonly used types
pub use crate::core::{AngleUnit, ArrayGeometry, ArrayParameters, Position, TimeAxis, Waveform, SPEED_OF_SOUND_AIR};
pub use algorithms::{LagSearchResult, TdoaEstimator, TdoaLut};
pub use processing::{CaptureResult, CaptureSimulator, LutCache, PulseShape};
pub use bearing::{resolve, BearingEstimate, BearingPipeline};
pub use utils::SimulationConfig;
pub use validation::{BearingError, BearingResult};
