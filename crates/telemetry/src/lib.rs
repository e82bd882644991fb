//! Structured logging setup for the airwatch pipeline.

pub mod tracing_setup;

pub use tracing_setup::*;
