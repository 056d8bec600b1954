//! HTTP server initialization and runtime setup.
//!
//! Handles store connection, expiry sweeper spawning, and Axum server lifecycle.

use crate::config::Config;
use crate::infrastructure::store::{self, run_expiry_sweeper};
use crate::routes::{RouterOptions, app_router};
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::watch;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The configured short URL store (with startup retries)
/// - Background expiry sweeper, for stores without native expiry
/// - Axum HTTP server with graceful shutdown on Ctrl-C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - The store cannot be reached
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = store::connect(&config).await?;
    tracing::info!(backend = store.backend(), "Store ready");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper = if store.expires_natively() {
        None
    } else {
        Some(tokio::spawn(run_expiry_sweeper(
            store.clone(),
            Duration::from_secs(config.expiry_sweep_interval_seconds),
            shutdown_rx,
        )))
    };

    let state = AppState::new(store);
    let app = app_router(state, &RouterOptions::from(&config));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped, shutting down background tasks");
    let _ = shutdown_tx.send(true);
    if let Some(handle) = sweeper
        && let Err(e) = handle.await
    {
        tracing::warn!("Expiry sweeper ended abnormally: {}", e);
    }

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
