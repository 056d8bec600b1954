//! DTOs for the create endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    /// The destination URL, stored exactly as sent.
    ///
    /// Format and length are checked by the service.
    #[validate(required(message = "url is required"))]
    pub url: Option<String>,

    /// Days until the short URL expires (default 7, see `ExpiryWindow`).
    pub expires_in_days: Option<i64>,
}

/// Response for a created short URL.
#[derive(Debug, Serialize)]
pub struct CreateUrlResponse {
    pub short_code: String,
    pub expires_in_days: i64,
}
