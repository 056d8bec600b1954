//! Short URL store implementations.
//!
//! - [`RedisUrlStore`] - Redis hashes with native expiry (production default)
//! - [`PgUrlStore`] - PostgreSQL table, expired rows purged by [`run_expiry_sweeper`]
//! - [`MemoryUrlStore`] - In-process map for development and tests

mod expiry_sweeper;
mod memory_store;
mod pg_store;
mod redis_store;

pub use expiry_sweeper::run_expiry_sweeper;
pub use memory_store::MemoryUrlStore;
pub use pg_store::PgUrlStore;
pub use redis_store::RedisUrlStore;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::warn;

use crate::config::{Config, StoreBackend};
use crate::domain::repositories::{StoreError, UrlStore};

/// Converts an increment to the signed counter type Redis and PostgreSQL use.
fn signed_increment(by: u64) -> Result<i64, StoreError> {
    i64::try_from(by).map_err(|_| StoreError::IncrementOutOfRange { by })
}

/// Connection attempts made at startup before giving up.
const CONNECT_ATTEMPTS: usize = 5;

/// Builds the store selected by `config`.
///
/// Network backends are retried with jittered exponential backoff, since
/// the store may still be starting when the service boots.
///
/// # Errors
///
/// Returns an error if the backend is misconfigured or stays unreachable.
pub async fn connect(config: &Config) -> Result<Arc<dyn UrlStore>> {
    let strategy = || {
        ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(CONNECT_ATTEMPTS - 1)
    };

    let store: Arc<dyn UrlStore> = match config.store_backend {
        StoreBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL must be set for the redis backend")?;

            let store = Retry::spawn(strategy(), move || async move {
                RedisUrlStore::connect(url, &config.redis_key_prefix)
                    .await
                    .inspect_err(|e| warn!("Redis not ready: {}", e))
            })
            .await
            .context("Failed to connect to Redis")?;

            Arc::new(store)
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set for the postgres backend")?;

            let store = Retry::spawn(strategy(), move || async move {
                PgUrlStore::connect(url, config)
                    .await
                    .inspect_err(|e| warn!("Database not ready: {}", e))
            })
            .await
            .context("Failed to connect to database")?;

            Arc::new(store)
        }
        StoreBackend::Memory => Arc::new(MemoryUrlStore::new()),
    };

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_increment() {
        assert_eq!(signed_increment(1).unwrap(), 1);
        assert_eq!(signed_increment(i64::MAX as u64).unwrap(), i64::MAX);
        assert!(matches!(
            signed_increment(u64::MAX),
            Err(StoreError::IncrementOutOfRange { by: u64::MAX })
        ));
    }
}
