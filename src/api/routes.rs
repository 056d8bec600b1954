//! API route configuration.

use crate::api::handlers::{create_url_handler, health_handler, redirect_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Short URL routes.
///
/// # Endpoints
///
/// - `POST /urls`               - Create a short URL
/// - `GET  /urls/{code}/stats`  - Click statistics for a short URL
/// - `GET  /{code}`             - Redirect to the original URL
pub fn url_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", post(create_url_handler))
        .route("/urls/{code}/stats", get(stats_handler))
        .route("/{code}", get(redirect_handler))
}

/// Operational routes, never rate limited.
///
/// - `GET /health` - Store reachability
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
