//! Short URL record and expiry window.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use crate::error::AppError;

/// Expiry window applied when a create request does not specify one.
pub const DEFAULT_EXPIRES_IN_DAYS: i64 = 7;

/// Longest expiry window a caller may request (roughly ten years).
pub const MAX_EXPIRES_IN_DAYS: i64 = 3650;

/// Longest destination URL accepted, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// A short code mapped to its destination.
///
/// `short_code` and `original_url` never change after creation. `clicks`
/// only moves through the store's atomic increment, and `expires_at` is
/// enforced by the store itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrl {
    pub short_code: String,
    pub original_url: String,
    pub clicks: u64,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShortUrl {
    /// Creates a fresh record with a zero click counter.
    pub fn new(
        short_code: String,
        original_url: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            short_code,
            original_url,
            clicks: 0,
            expires_at,
        }
    }

    /// Returns true if the record is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    /// Returns true if the record has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// A validated number of days until a short URL expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryWindow(i64);

impl ExpiryWindow {
    /// Validates a day count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] unless `1 <= days <= MAX_EXPIRES_IN_DAYS`.
    pub fn days(days: i64) -> Result<Self, AppError> {
        if !(1..=MAX_EXPIRES_IN_DAYS).contains(&days) {
            return Err(AppError::bad_request(
                format!("expires_in_days must be between 1 and {MAX_EXPIRES_IN_DAYS}"),
                json!({ "expires_in_days": days }),
            ));
        }
        Ok(Self(days))
    }

    /// Number of days in the window.
    pub fn as_days(&self) -> i64 {
        self.0
    }

    /// Absolute expiry timestamp counted from `now`.
    pub fn expires_at_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::days(self.0)
    }
}

impl Default for ExpiryWindow {
    fn default() -> Self {
        Self(DEFAULT_EXPIRES_IN_DAYS)
    }
}
