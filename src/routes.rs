//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /urls`              - Create a short URL
//! - `GET  /urls/{code}/stats` - Click statistics
//! - `GET  /{code}`            - Short link redirect
//! - `GET  /health`            - Store health check
//!
//! # Middleware
//!
//! - **Request id** - `x-request-id` generated when absent and echoed back
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Optional per-IP token bucket (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{rate_limit, tracing};
use crate::config::Config;
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// HTTP-facing settings taken from [`Config`].
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    /// Read the client IP from proxy headers instead of the peer address.
    pub behind_proxy: bool,
    /// Sustained requests per second per IP; `0` disables rate limiting.
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            behind_proxy: false,
            rate_limit_per_second: 0,
            rate_limit_burst: 100,
        }
    }
}

impl From<&Config> for RouterOptions {
    fn from(config: &Config) -> Self {
        Self {
            behind_proxy: config.behind_proxy,
            rate_limit_per_second: config.rate_limit_per_second,
            rate_limit_burst: config.rate_limit_burst,
        }
    }
}

/// Builds the router with all routes and middleware, without path normalization.
///
/// Rate limiting by peer address needs the server to provide
/// `ConnectInfo<SocketAddr>`; see [`crate::server::run`].
pub fn router(state: AppState, options: &RouterOptions) -> Router {
    let urls = api::routes::url_routes();

    let urls = if options.behind_proxy {
        match rate_limit::proxied_layer(options.rate_limit_per_second, options.rate_limit_burst) {
            Some(limiter) => urls.layer(limiter),
            None => urls,
        }
    } else {
        match rate_limit::layer(options.rate_limit_per_second, options.rate_limit_burst) {
            Some(limiter) => urls.layer(limiter),
            None => urls,
        }
    };

    Router::new()
        .merge(api::routes::health_routes())
        .merge(urls)
        .with_state(state)
        .layer(tracing::layer())
        .layer(tracing::propagate_request_id_layer())
        .layer(tracing::set_request_id_layer())
}

/// Constructs the application router with trailing slashes trimmed.
pub fn app_router(state: AppState, options: &RouterOptions) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, options))
}
