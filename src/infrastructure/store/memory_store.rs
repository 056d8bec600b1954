//! In-process store for development and tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::ShortUrl;
use crate::domain::repositories::{StoreError, UrlStore};

/// A [`UrlStore`] backed by a `HashMap` behind an async `RwLock`.
///
/// Increments run under the write lock, so concurrent redirects never lose
/// updates. Expired entries are treated as absent on every read and are
/// removed by [`UrlStore::purge_expired`]. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryUrlStore {
    records: RwLock<HashMap<String, ShortUrl>>,
}

impl MemoryUrlStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using in-memory URL store");
        Self::default()
    }

    /// Number of entries currently held, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl UrlStore for MemoryUrlStore {
    async fn put_if_absent(&self, record: ShortUrl) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;

        if let Some(existing) = records.get(&record.short_code)
            && !existing.is_expired()
        {
            return Ok(false);
        }

        records.insert(record.short_code.clone(), record);
        Ok(true)
    }

    async fn get(&self, code: &str) -> Result<Option<ShortUrl>, StoreError> {
        let records = self.records.read().await;

        Ok(records.get(code).filter(|r| !r.is_expired()).cloned())
    }

    async fn increment_clicks(&self, code: &str, by: u64) -> Result<Option<u64>, StoreError> {
        let mut records = self.records.write().await;

        match records.get_mut(code) {
            Some(record) if !record.is_expired() => {
                record.clicks = record.clicks.saturating_add(by);
                Ok(Some(record.clicks))
            }
            _ => Ok(None),
        }
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let now = Utc::now();
        let mut records = self.records.write().await;

        let before = records.len();
        records.retain(|_, r| !r.is_expired_at(now));

        Ok((before - records.len()) as u64)
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }

    fn expires_natively(&self) -> bool {
        false
    }
}
