//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL and counts the click.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look up the record (unknown or expired codes are 404)
/// 2. Atomically increment its click counter in the store
/// 3. Return 302 Found with `Location` set to the stored URL, byte-for-byte
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 503 Service Unavailable if the store cannot be reached.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.url_service.follow(&code).await?;

    let location = HeaderValue::from_bytes(original_url.as_bytes()).map_err(|e| {
        AppError::internal(
            "Stored URL is not a valid Location header",
            json!({ "short_code": code, "reason": e.to_string() }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
