//! # Snaplink
//!
//! A small URL shortening service built with Axum, backed by Redis,
//! PostgreSQL, or an in-process map.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - The short URL record and the store contract
//! - **Application Layer** ([`application`]) - Create, redirect and stats logic
//! - **Infrastructure Layer** ([`infrastructure`]) - Store implementations and expiry sweeper
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Time-sortable 27-character short codes
//! - Per-link expiry (default 7 days), native in Redis, swept in PostgreSQL
//! - Atomic click counting on every redirect
//! - Optional per-IP rate limiting and structured request logging
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379"
//! cargo run
//!
//! curl -X POST localhost:3000/urls -H 'content-type: application/json' \
//!      -d '{"url": "https://example.com/long/path"}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{CreatedShortUrl, UrlService};
    pub use crate::domain::entities::{ExpiryWindow, ShortUrl};
    pub use crate::domain::repositories::{StoreError, UrlStore};
    pub use crate::error::AppError;
    pub use crate::infrastructure::store::MemoryUrlStore;
    pub use crate::routes::{RouterOptions, app_router, router};
    pub use crate::state::AppState;
}
