//! Short URL creation, redirect resolution and statistics.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::entities::{ExpiryWindow, ShortUrl};
use crate::domain::repositories::UrlStore;
use crate::error::AppError;
use crate::utils::code_generator::generate_code;
use crate::utils::url_validator::validate_destination;

/// Consecutive code collisions tolerated before giving up.
const MAX_CODE_ATTEMPTS: usize = 5;

/// Result of a successful create.
#[derive(Debug, Clone)]
pub struct CreatedShortUrl {
    pub record: ShortUrl,
    pub expiry: ExpiryWindow,
}

/// Service behind the create, redirect and stats operations.
///
/// Holds no state of its own beyond the injected store handle.
pub struct UrlService<S: UrlStore + ?Sized = dyn UrlStore> {
    store: Arc<S>,
}

impl<S: UrlStore + ?Sized> UrlService<S> {
    /// Creates a new service over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the underlying store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Creates a short URL that expires after `expires_in_days` (default 7).
    ///
    /// The destination is stored exactly as given. Each generated code is
    /// written with a conditional put; a taken code triggers regeneration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL or expiry window is invalid.
    /// Returns [`AppError::StorageUnavailable`] if the store fails.
    /// Returns [`AppError::Internal`] if no free code is found.
    pub async fn create_short_url(
        &self,
        original_url: String,
        expires_in_days: Option<i64>,
    ) -> Result<CreatedShortUrl, AppError> {
        validate_destination(&original_url)
            .map_err(|e| AppError::bad_request(e.to_string(), json!({ "field": "url" })))?;

        let expiry = match expires_in_days {
            Some(days) => ExpiryWindow::days(days)?,
            None => ExpiryWindow::default(),
        };
        let expires_at = expiry.expires_at_from(Utc::now());

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate_code().map_err(|e| {
                AppError::internal(
                    "Failed to generate short code",
                    json!({ "reason": e.to_string() }),
                )
            })?;

            let record = ShortUrl::new(code, original_url.clone(), Some(expires_at));

            if self.store.put_if_absent(record.clone()).await? {
                info!(
                    short_code = %record.short_code,
                    expires_in_days = expiry.as_days(),
                    "Created short URL"
                );
                return Ok(CreatedShortUrl { record, expiry });
            }

            warn!(
                short_code = %record.short_code,
                attempt,
                "Short code collision, regenerating"
            );
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Resolves a code to its destination and counts the click.
    ///
    /// The increment is a single server-side atomic operation. Its result is
    /// only logged: if it fails the redirect still goes ahead.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown or expired codes.
    /// Returns [`AppError::StorageUnavailable`] if the lookup fails.
    pub async fn follow(&self, code: &str) -> Result<String, AppError> {
        let record = self.find(code).await?;

        match self.store.increment_clicks(code, 1).await {
            Ok(Some(clicks)) => info!(short_code = %code, clicks, "Redirecting"),
            Ok(None) => warn!(short_code = %code, "Record vanished before click was counted"),
            Err(e) => error!(short_code = %code, error = %e, "Failed to count click"),
        }

        Ok(record.original_url)
    }

    /// Returns the current record for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown or expired codes.
    /// Returns [`AppError::StorageUnavailable`] if the lookup fails.
    pub async fn get_stats(&self, code: &str) -> Result<ShortUrl, AppError> {
        self.find(code).await
    }

    /// Removes expired records from stores without native expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] if the store fails.
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        Ok(self.store.purge_expired().await?)
    }

    async fn find(&self, code: &str) -> Result<ShortUrl, AppError> {
        self.store
            .get(code)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    format!("URL not found: {code}"),
                    json!({ "short_code": code }),
                )
            })
    }
}
