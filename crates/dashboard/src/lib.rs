//! HTML dashboard over the measurement store.
//!
//! Strictly read-only: the dashboard never writes to the store.

pub mod chart;
pub mod html;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
