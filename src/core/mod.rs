//! Core types and constants for the bearing estimation pipeline

pub mod types;
pub mod constants;
pub mod geometry;

pub use types::*;
pub use constants::*;
pub use geometry::ArrayGeometry;
