#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use serde_json::{Value, json};
use snaplink::domain::entities::ShortUrl;
use snaplink::domain::repositories::{StoreError, UrlStore};
use snaplink::infrastructure::store::MemoryUrlStore;
use snaplink::routes::{RouterOptions, router};
use snaplink::state::AppState;
use std::sync::Arc;

pub fn create_test_state() -> (AppState, Arc<MemoryUrlStore>) {
    let store = Arc::new(MemoryUrlStore::new());
    let state = AppState::new(store.clone());

    (state, store)
}

pub fn create_test_app() -> (Router, Arc<MemoryUrlStore>) {
    let (state, store) = create_test_state();

    (router(state, &RouterOptions::default()), store)
}

pub fn create_test_server() -> (TestServer, Arc<MemoryUrlStore>) {
    let (app, store) = create_test_app();

    (TestServer::new(app).unwrap(), store)
}

/// Creates a short URL through the API and returns its code.
pub async fn create_short_url(server: &TestServer, url: &str) -> String {
    let response = server.post("/urls").json(&json!({ "url": url })).await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body = response.json::<Value>();
    body["short_code"].as_str().unwrap().to_string()
}

/// A store whose backend is down.
pub struct UnavailableStore;

#[async_trait]
impl UrlStore for UnavailableStore {
    async fn put_if_absent(&self, _record: ShortUrl) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn get(&self, _code: &str) -> Result<Option<ShortUrl>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn increment_clicks(&self, _code: &str, _by: u64) -> Result<Option<u64>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn backend(&self) -> &'static str {
        "unavailable"
    }

    fn expires_natively(&self) -> bool {
        false
    }
}

pub fn create_unavailable_server() -> TestServer {
    let state = AppState::new(Arc::new(UnavailableStore));

    TestServer::new(router(state, &RouterOptions::default())).unwrap()
}
