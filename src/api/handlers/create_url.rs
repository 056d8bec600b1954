//! Handler for the create endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use validator::Validate;

use crate::api::dto::create_url::{CreateUrlRequest, CreateUrlResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /urls`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/long/path", "expires_in_days": 30 }
/// ```
///
/// `expires_in_days` is optional and defaults to 7.
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "short_code": "2zX1bQ9JtK0aQeBv3sN5mYqWcRd", "expires_in_days": 30 }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `url` is missing or invalid, if
/// `expires_in_days` is out of range, or if the body is not JSON.
/// Returns 503 Service Unavailable if the store cannot be reached.
pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let CreateUrlRequest {
        url,
        expires_in_days,
    } = payload;

    let created = state
        .url_service
        .create_short_url(url.unwrap_or_default(), expires_in_days)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUrlResponse {
            short_code: created.record.short_code,
            expires_in_days: created.expiry.as_days(),
        }),
    ))
}
