//! Redis-backed short URL store.
//!
//! Each record is a hash at `{prefix}{short_code}` with the fields
//! `original_url`, `clicks` and `expires_at` (unix seconds, empty when the
//! record never expires). Expiry is delegated to Redis via `EXPIREAT`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::domain::entities::ShortUrl;
use crate::domain::repositories::{StoreError, UrlStore};

use super::signed_increment;

const FIELD_ORIGINAL_URL: &str = "original_url";
const FIELD_CLICKS: &str = "clicks";
const FIELD_EXPIRES_AT: &str = "expires_at";

/// Creates the hash only if the key is absent, then arms its expiry.
///
/// KEYS[1] = record key; ARGV = original_url, expires_at (unix seconds or "").
const CREATE_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return 0
end
redis.call('HSET', KEYS[1], 'original_url', ARGV[1], 'clicks', 0, 'expires_at', ARGV[2])
if ARGV[2] ~= '' then
    redis.call('EXPIREAT', KEYS[1], ARGV[2])
end
return 1
"#;

/// Increments the click counter only if the record still exists.
///
/// KEYS[1] = record key; ARGV[1] = increment. Returns nil when absent.
const INCREMENT_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return false
end
return redis.call('HINCRBY', KEYS[1], 'clicks', ARGV[1])
"#;

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Redis implementation of [`UrlStore`].
///
/// Uses `ConnectionManager` for automatic reconnection. Creation and
/// increment run as Lua scripts so each is a single atomic server-side step.
pub struct RedisUrlStore {
    client: ConnectionManager,
    key_prefix: String,
    create_script: Script,
    increment_script: Script,
}

impl RedisUrlStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, key_prefix: &str) -> Result<Self, StoreError> {
        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Unavailable(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: key_prefix.to_string(),
            create_script: Script::new(CREATE_SCRIPT),
            increment_script: Script::new(INCREMENT_SCRIPT),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, short_code: &str) -> String {
        format!("{}{}", self.key_prefix, short_code)
    }
}

/// Encodes an optional expiry as the `expires_at` hash field.
fn encode_expires_at(expires_at: Option<DateTime<Utc>>) -> String {
    expires_at
        .map(|t| t.timestamp().to_string())
        .unwrap_or_default()
}

/// Decodes a hash returned by `HGETALL` into a record.
///
/// Returns `Ok(None)` for an empty hash (missing key).
fn decode_record(
    short_code: &str,
    fields: &HashMap<String, String>,
) -> Result<Option<ShortUrl>, StoreError> {
    if fields.is_empty() {
        return Ok(None);
    }

    let corrupt = |reason: String| StoreError::Corrupt {
        code: short_code.to_string(),
        reason,
    };

    let original_url = fields
        .get(FIELD_ORIGINAL_URL)
        .ok_or_else(|| corrupt(format!("missing {FIELD_ORIGINAL_URL}")))?
        .clone();

    let clicks = match fields.get(FIELD_CLICKS) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| corrupt(format!("bad {FIELD_CLICKS} '{raw}': {e}")))?,
        None => 0,
    };

    let expires_at = match fields.get(FIELD_EXPIRES_AT).map(String::as_str) {
        None | Some("") => None,
        Some(raw) => {
            let seconds = raw
                .parse::<i64>()
                .map_err(|e| corrupt(format!("bad {FIELD_EXPIRES_AT} '{raw}': {e}")))?;
            let timestamp = DateTime::from_timestamp(seconds, 0)
                .ok_or_else(|| corrupt(format!("{FIELD_EXPIRES_AT} out of range: {seconds}")))?;
            Some(timestamp)
        }
    };

    Ok(Some(ShortUrl {
        short_code: short_code.to_string(),
        original_url,
        clicks,
        expires_at,
    }))
}

#[async_trait]
impl UrlStore for RedisUrlStore {
    async fn put_if_absent(&self, record: ShortUrl) -> Result<bool, StoreError> {
        let key = self.build_key(&record.short_code);
        let mut conn = self.client.clone();

        let created: i64 = self
            .create_script
            .key(&key)
            .arg(&record.original_url)
            .arg(encode_expires_at(record.expires_at))
            .invoke_async(&mut conn)
            .await?;

        debug!("Redis create {}: {}", key, created == 1);
        Ok(created == 1)
    }

    async fn get(&self, code: &str) -> Result<Option<ShortUrl>, StoreError> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();

        let fields: HashMap<String, String> = conn.hgetall(&key).await?;
        let record = decode_record(code, &fields)?;

        // EXPIREAT removes the key, but a record that expired this very
        // second may still be visible until Redis reclaims it.
        Ok(record.filter(|r| !r.is_expired()))
    }

    async fn increment_clicks(&self, code: &str, by: u64) -> Result<Option<u64>, StoreError> {
        let by = signed_increment(by)?;
        let key = self.build_key(code);
        let mut conn = self.client.clone();

        let clicks: Option<i64> = self
            .increment_script
            .key(&key)
            .arg(by)
            .invoke_async(&mut conn)
            .await?;

        clicks
            .map(|n| {
                u64::try_from(n).map_err(|_| StoreError::Corrupt {
                    code: code.to_string(),
                    reason: format!("negative {FIELD_CLICKS}: {n}"),
                })
            })
            .transpose()
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        Ok(0)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }

    fn expires_natively(&self) -> bool {
        true
    }
}
