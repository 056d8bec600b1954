//! Handler for short URL statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the click count and expiry for a short code.
///
/// # Endpoint
///
/// `GET /urls/{code}/stats`
///
/// # Response
///
/// ```json
/// {
///   "short_code": "2zX1bQ9JtK0aQeBv3sN5mYqWcRd",
///   "original_url": "https://example.com/long/path",
///   "clicks": 3,
///   "expires_at": "2026-10-26T12:30:00+00:00"
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let record = state.url_service.get_stats(&code).await?;

    Ok(Json(StatsResponse::from(record)))
}
