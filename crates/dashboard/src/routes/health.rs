//! Liveness endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::routes::PageError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Number of cities currently stored.
    pub cities: usize,
}

/// GET /health
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, PageError> {
    let cities = state.store.cities()?.len();
    Ok(Json(HealthResponse {
        status: "ok",
        cities,
    }))
}
