//! Core types and errors for the airwatch air-quality pipeline.

pub mod error;
pub mod measurement;

pub use error::{Error, Result};
pub use measurement::*;
