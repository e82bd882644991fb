//! Shared dashboard state.

use std::sync::Arc;

use aq_store::MeasurementReader;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-only view of the measurement store.
    pub store: Arc<dyn MeasurementReader>,
}

impl AppState {
    pub fn new(store: Arc<dyn MeasurementReader>) -> Self {
        Self { store }
    }
}
