//! Signal synthesis and capture simulation

pub mod pulse;
pub mod delay;
pub mod capture;
pub mod cache;

pub use pulse::{PulseKind, PulseShape};
pub use delay::fractional_delay;
pub use capture::{CaptureResult, CaptureSimulator};
pub use cache::LutCache;
