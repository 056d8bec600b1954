//! The key-value contract every short URL backend implements.

use async_trait::async_trait;

use crate::domain::entities::ShortUrl;

/// Failures reported by a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or rejected the command.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be decoded.
    #[error("corrupt record {code}: {reason}")]
    Corrupt { code: String, reason: String },

    /// The requested increment does not fit the backend's signed counter.
    #[error("increment out of range: {by}")]
    IncrementOutOfRange { by: u64 },
}

/// Key-value storage for [`ShortUrl`] records keyed by short code.
///
/// Implementations own durability, concurrency control and expiry. Records
/// whose `expires_at` has passed must behave as absent for every operation.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisUrlStore`] - Redis hashes with native `EXPIREAT`
/// - [`crate::infrastructure::store::PgUrlStore`] - PostgreSQL table plus expiry sweeper
/// - [`crate::infrastructure::store::MemoryUrlStore`] - In-process map for development and tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Writes `record` only if no live record with the same code exists.
    ///
    /// Returns `Ok(false)` when the code is already taken.
    async fn put_if_absent(&self, record: ShortUrl) -> Result<bool, StoreError>;

    /// Fetches a live record by code.
    async fn get(&self, code: &str) -> Result<Option<ShortUrl>, StoreError>;

    /// Atomically adds `by` to the click counter on the server side.
    ///
    /// Returns the post-increment count, or `Ok(None)` if no live record
    /// exists. Never creates a record.
    async fn increment_clicks(&self, code: &str, by: u64) -> Result<Option<u64>, StoreError>;

    /// Deletes records past their expiry and returns how many were removed.
    ///
    /// Stores with native key expiry return `Ok(0)`.
    async fn purge_expired(&self) -> Result<u64, StoreError>;

    /// Checks whether the backend is reachable.
    async fn health_check(&self) -> bool;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    /// Whether the backend removes expired records by itself.
    ///
    /// When false, the server runs the expiry sweeper against this store.
    fn expires_natively(&self) -> bool;
}
