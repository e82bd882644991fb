//! Dashboard routes.

pub mod health;
pub mod pages;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::html;
use crate::state::AppState;

/// Creates the dashboard router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(pages::index_handler))
        .route("/city/:city", get(pages::city_handler))
        .route("/health", get(health::health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Error type for page handlers; store failures surface as a 500 page.
pub struct PageError(aq_core::Error);

impl From<aq_core::Error> for PageError {
    fn from(e: aq_core::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Dashboard request failed");
        let body = html::page(
            "Air Quality Dashboard",
            "<h1>Air Quality Dashboard</h1><p class=\"warning\">Something went wrong reading the store.</p>",
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}
