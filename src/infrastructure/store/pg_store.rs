//! PostgreSQL implementation of the short URL store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::domain::entities::ShortUrl;
use crate::domain::repositories::{StoreError, UrlStore};

use super::signed_increment;

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Row shape of the `short_urls` table.
#[derive(Debug, sqlx::FromRow)]
struct ShortUrlRow {
    short_code: String,
    original_url: String,
    clicks: i64,
    expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<ShortUrlRow> for ShortUrl {
    type Error = StoreError;

    fn try_from(row: ShortUrlRow) -> Result<Self, Self::Error> {
        let clicks = u64::try_from(row.clicks).map_err(|_| StoreError::Corrupt {
            code: row.short_code.clone(),
            reason: format!("negative clicks: {}", row.clicks),
        })?;

        Ok(ShortUrl {
            short_code: row.short_code,
            original_url: row.original_url,
            clicks,
            expires_at: row.expires_at,
        })
    }
}

/// PostgreSQL repository for short URL records.
///
/// The table has no native TTL: reads and increments skip rows past
/// `expires_at`, and [`UrlStore::purge_expired`] deletes them. The server
/// runs that purge periodically through the expiry sweeper.
pub struct PgUrlStore {
    pool: PgPool,
}

impl PgUrlStore {
    /// Creates a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool using the configured limits and applies migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the connection or a migration fails.
    pub async fn connect(database_url: &str, config: &Config) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
            .idle_timeout(Duration::from_secs(config.db_idle_timeout))
            .max_lifetime(Duration::from_secs(config.db_max_lifetime))
            .connect(database_url)
            .await?;
        info!("Connected to database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Migration failed: {}", e)))?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UrlStore for PgUrlStore {
    async fn put_if_absent(&self, record: ShortUrl) -> Result<bool, StoreError> {
        // An expired row still holding the code is replaced rather than
        // blocking the insert until the next sweep.
        let result = sqlx::query(
            r#"
            INSERT INTO short_urls (short_code, original_url, clicks, expires_at)
            VALUES ($1, $2, 0, $3)
            ON CONFLICT (short_code) DO UPDATE
                SET original_url = EXCLUDED.original_url,
                    clicks = 0,
                    expires_at = EXCLUDED.expires_at,
                    created_at = NOW()
                WHERE short_urls.expires_at IS NOT NULL AND short_urls.expires_at <= NOW()
            "#,
        )
        .bind(&record.short_code)
        .bind(&record.original_url)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn get(&self, code: &str) -> Result<Option<ShortUrl>, StoreError> {
        let row: Option<ShortUrlRow> = sqlx::query_as(
            r#"
            SELECT short_code, original_url, clicks, expires_at
            FROM short_urls
            WHERE short_code = $1
              AND (expires_at IS NULL OR expires_at > NOW())
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ShortUrl::try_from).transpose()
    }

    async fn increment_clicks(&self, code: &str, by: u64) -> Result<Option<u64>, StoreError> {
        let by = signed_increment(by)?;

        let clicks: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE short_urls
            SET clicks = clicks + $2
            WHERE short_code = $1
              AND (expires_at IS NULL OR expires_at > NOW())
            RETURNING clicks
            "#,
        )
        .bind(code)
        .bind(by)
        .fetch_optional(&self.pool)
        .await?;

        clicks
            .map(|n| {
                u64::try_from(n).map_err(|_| StoreError::Corrupt {
                    code: code.to_string(),
                    reason: format!("negative clicks: {n}"),
                })
            })
            .transpose()
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "DELETE FROM short_urls WHERE expires_at IS NOT NULL AND expires_at <= NOW()",
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }

    fn expires_natively(&self) -> bool {
        false
    }
}
