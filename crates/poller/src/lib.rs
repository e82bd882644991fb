//! Batch fetching across cities and the periodic poll loop.

pub mod batch;
pub mod scheduler;

pub use batch::run_batch;
pub use scheduler::{Poller, PollerConfig};
