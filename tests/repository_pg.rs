use chrono::{Duration, Utc};
use snaplink::domain::entities::ShortUrl;
use snaplink::domain::repositories::UrlStore;
use snaplink::infrastructure::store::PgUrlStore;
use sqlx::PgPool;
use std::sync::Arc;

fn record(code: &str, url: &str, expires_in: Duration) -> ShortUrl {
    ShortUrl::new(code.to_string(), url.to_string(), Some(Utc::now() + expires_in))
}

async fn insert_expired(pool: &PgPool, code: &str, clicks: i64) {
    sqlx::query(
        "INSERT INTO short_urls (short_code, original_url, clicks, expires_at) \
         VALUES ($1, 'https://old.example.com', $2, NOW() - INTERVAL '1 hour')",
    )
    .bind(code)
    .bind(clicks)
    .execute(pool)
    .await
    .unwrap();
}

async fn row_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM short_urls")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test]
async fn test_put_and_get(pool: PgPool) {
    let store = PgUrlStore::new(pool);

    let created = store
        .put_if_absent(record("abc123", "https://example.com/a?b=c", Duration::days(7)))
        .await
        .unwrap();
    assert!(created);

    let found = store.get("abc123").await.unwrap().unwrap();
    assert_eq!(found.original_url, "https://example.com/a?b=c");
    assert_eq!(found.clicks, 0);
    assert!(found.expires_at.is_some());
}

#[sqlx::test]
async fn test_put_if_absent_rejects_live_duplicate(pool: PgPool) {
    let store = PgUrlStore::new(pool);

    assert!(
        store
            .put_if_absent(record("dup", "https://first.example.com", Duration::days(1)))
            .await
            .unwrap()
    );
    assert!(
        !store
            .put_if_absent(record("dup", "https://second.example.com", Duration::days(1)))
            .await
            .unwrap()
    );

    let found = store.get("dup").await.unwrap().unwrap();
    assert_eq!(found.original_url, "https://first.example.com");
}

#[sqlx::test]
async fn test_put_if_absent_replaces_expired_row(pool: PgPool) {
    insert_expired(&pool, "reuse", 9).await;
    let store = PgUrlStore::new(pool.clone());

    assert!(
        store
            .put_if_absent(record("reuse", "https://new.example.com", Duration::days(1)))
            .await
            .unwrap()
    );

    let found = store.get("reuse").await.unwrap().unwrap();
    assert_eq!(found.original_url, "https://new.example.com");
    assert_eq!(found.clicks, 0);
    assert_eq!(row_count(&pool).await, 1);
}

#[sqlx::test]
async fn test_expired_row_is_invisible(pool: PgPool) {
    insert_expired(&pool, "old", 0).await;
    let store = PgUrlStore::new(pool);

    assert!(store.get("old").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_increment_returns_new_count(pool: PgPool) {
    let store = PgUrlStore::new(pool);
    store
        .put_if_absent(record("abc", "https://example.com", Duration::days(1)))
        .await
        .unwrap();

    assert_eq!(store.increment_clicks("abc", 1).await.unwrap(), Some(1));
    assert_eq!(store.increment_clicks("abc", 2).await.unwrap(), Some(3));
}

#[sqlx::test]
async fn test_increment_missing_code_never_creates(pool: PgPool) {
    let store = PgUrlStore::new(pool.clone());

    assert_eq!(store.increment_clicks("ghost", 1).await.unwrap(), None);
    assert_eq!(row_count(&pool).await, 0);
}

#[sqlx::test]
async fn test_increment_expired_code_is_noop(pool: PgPool) {
    insert_expired(&pool, "old", 4).await;
    let store = PgUrlStore::new(pool.clone());

    assert_eq!(store.increment_clicks("old", 1).await.unwrap(), None);

    let clicks: i64 = sqlx::query_scalar("SELECT clicks FROM short_urls WHERE short_code = 'old'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(clicks, 4);
}

#[sqlx::test]
async fn test_concurrent_increments_are_not_lost(pool: PgPool) {
    let store = Arc::new(PgUrlStore::new(pool));
    store
        .put_if_absent(record("hot", "https://example.com", Duration::days(1)))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..50 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.increment_clicks("hot", 1).await.unwrap()
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_some());
    }

    assert_eq!(store.get("hot").await.unwrap().unwrap().clicks, 50);
}

#[sqlx::test]
async fn test_purge_expired_counts_removed_rows(pool: PgPool) {
    insert_expired(&pool, "old1", 0).await;
    insert_expired(&pool, "old2", 3).await;
    let store = PgUrlStore::new(pool.clone());
    store
        .put_if_absent(record("live", "https://example.com", Duration::days(1)))
        .await
        .unwrap();
    store
        .put_if_absent(ShortUrl::new(
            "forever".to_string(),
            "https://example.com".to_string(),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(store.purge_expired().await.unwrap(), 2);
    assert_eq!(store.purge_expired().await.unwrap(), 0);
    assert_eq!(row_count(&pool).await, 2);
}

#[sqlx::test]
async fn test_health_check(pool: PgPool) {
    let store = PgUrlStore::new(pool);

    assert!(store.health_check().await);
    assert_eq!(store.backend(), "postgres");
    assert!(!store.expires_natively());
}
