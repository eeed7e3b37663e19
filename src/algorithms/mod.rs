//! Propagation, lag search and lag-to-bearing resolution

pub mod propagation;
pub mod tdoa;
pub mod lut;

pub use propagation::PropagationModel;
pub use tdoa::{LagSearchResult, TdoaEstimator};
pub use lut::{far_field_angle_rad, LutEntry, TdoaLut};
