//! chatqd - queued chat message daemon.
//!
//! Stores chat messages in SQLite and exposes enqueue / list / unqueue
//! operations over a small JSON HTTP API.

mod config;
mod db;
mod http;

use crate::config::Config;
use crate::db::Database;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        address = %config.listen.address,
        database = %config.database_path(),
        "Starting chatqd"
    );

    // Initialize database
    let db = Database::new(config.database_path()).await?;

    // Migrations are best-effort: a failure leaves the schema as-is and is
    // logged rather than aborting startup.
    if let Err(e) = db.migrate().await {
        warn!(error = %e, "Failed to apply migrations; continuing with existing schema");
    }

    // Serve until the process is terminated
    http::serve(config.listen.address, db, &config.cors).await?;

    Ok(())
}
