//! Parameter validation and error reporting

pub mod data;
pub mod error;

pub use error::{BearingError, BearingResult};
