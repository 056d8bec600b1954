//! CLI administration tool for snaplink.
//!
//! Talks to the configured store directly, without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a short URL (default 7 days)
//! cargo run --bin admin -- create https://example.com/long/path --days 30
//!
//! # Show click statistics
//! cargo run --bin admin -- stats <CODE>
//!
//! # Check store connection
//! cargo run --bin admin -- check
//!
//! # Delete expired records (PostgreSQL)
//! cargo run --bin admin -- purge-expired
//! ```
//!
//! # Environment Variables
//!
//! The same as the server: `STORE_BACKEND`, `REDIS_URL`, `DATABASE_URL`, ...
//! See the `config` module.

use snaplink::application::services::UrlService;
use snaplink::config::{self, Config, mask_connection_string};
use snaplink::infrastructure::store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;

/// CLI tool for managing snaplink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a short URL
    Create {
        /// Destination URL (absolute http or https)
        url: String,

        /// Days until the short URL expires
        #[arg(short, long)]
        days: Option<i64>,
    },

    /// Show statistics for a short code
    Stats {
        /// Short code
        code: String,
    },

    /// Check store connection
    Check,

    /// Delete expired records from stores without native expiry
    PurgeExpired,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env().context("Invalid configuration")?;

    match cli.command {
        Commands::Create { url, days } => {
            create_url(&connect_service(&config).await?, url, days).await?
        }
        Commands::Stats { code } => show_stats(&connect_service(&config).await?, &code).await?,
        Commands::Check => handle_check(&config).await?,
        Commands::PurgeExpired => purge_expired(&connect_service(&config).await?).await?,
    }

    Ok(())
}

/// Connects the configured store and wraps it in a [`UrlService`].
async fn connect_service(config: &Config) -> Result<UrlService> {
    let store = store::connect(config)
        .await
        .context("Failed to connect to store")?;

    Ok(UrlService::new(store))
}

/// Creates a short URL and prints its code.
async fn create_url(service: &UrlService, url: String, days: Option<i64>) -> Result<()> {
    println!("{}", "🔗 Create Short URL".bright_blue().bold());
    println!();

    let created = service
        .create_short_url(url, days)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create short URL: {}", e))?;

    println!("  URL:     {}", created.record.original_url.cyan());
    println!(
        "  Code:    {}",
        created.record.short_code.bright_yellow().bold()
    );
    println!(
        "  Expires: {} ({} days)",
        created
            .record
            .expires_at
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "never".to_string())
            .bright_black(),
        created.expiry.as_days()
    );
    println!();
    println!("{}", "✅ Short URL created".green().bold());
    println!();

    Ok(())
}

/// Prints the stored record for `code`.
///
/// # Output Format
///
/// ```text
/// 📊 Statistics
///
///   Code:    2HpPZbY9xWm8kQvN3aTcR7sLdE1
///   URL:     https://example.com/long/path
///   Clicks:  3
///   Expires: 2026-01-08 12:00 UTC
/// ```
async fn show_stats(service: &UrlService, code: &str) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let record = service
        .get_stats(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("  Code:    {}", record.short_code.bright_yellow());
    println!("  URL:     {}", record.original_url.cyan());
    println!(
        "  Clicks:  {}",
        record.clicks.to_string().bright_white().bold()
    );
    println!(
        "  Expires: {}",
        record
            .expires_at
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "never".to_string())
            .bright_black()
    );
    println!();

    Ok(())
}

/// Runs the expiry purge once.
async fn purge_expired(service: &UrlService) -> Result<()> {
    println!("{}", "🧹 Purge Expired".bright_blue().bold());
    println!();

    if service.store().expires_natively() {
        println!(
            "  {} expires records natively, nothing to do",
            service.store().backend().cyan()
        );
        println!();
        return Ok(());
    }

    let removed = service
        .purge_expired()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge expired records: {}", e))?;

    println!(
        "  Removed: {}",
        removed.to_string().bright_white().bold()
    );
    println!();
    println!("{}", "✅ Done".green().bold());
    println!();

    Ok(())
}

/// Connects to the configured store and reports its health.
async fn handle_check(config: &Config) -> Result<()> {
    println!("{}", "🔍 Checking store connection...".bright_blue());
    println!("  Backend: {}", config.store_backend.to_string().cyan());

    if let Some(url) = config.redis_url.as_deref() {
        println!("  Redis:    {}", mask_connection_string(url).bright_black());
    }
    if let Some(url) = config.database_url.as_deref() {
        println!("  Database: {}", mask_connection_string(url).bright_black());
    }
    println!();

    let store = match store::connect(config).await {
        Ok(store) => store,
        Err(e) => {
            println!("{}", "❌ Connection failed".red().bold());
            return Err(e);
        }
    };

    if store.health_check().await {
        println!("{}", "✅ Store is reachable".green().bold());
        Ok(())
    } else {
        println!("{}", "❌ Store did not respond".red().bold());
        anyhow::bail!("{} health check failed", store.backend())
    }
}
