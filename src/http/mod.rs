//! HTTP service shell.
//!
//! Binds the message store operations to their routes, applies the CORS
//! layer, and owns the listen half of the daemon lifecycle.

pub mod cors;
pub mod error;
mod health;
mod messages;

use crate::config::CorsConfig;
use crate::db::Database;
use axum::Router;
use std::net::SocketAddr;

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared database handle; cloning is pool-handle cheap.
    pub db: Database,
}

/// Build the complete application router.
pub fn router(db: Database, cors: &CorsConfig) -> Router {
    Router::new()
        .merge(health::router())
        .merge(messages::router())
        .layer(cors::cors_layer(cors))
        .with_state(AppState { db })
}

/// Bind the listener and serve requests until the process exits.
pub async fn serve(addr: SocketAddr, db: Database, cors: &CorsConfig) -> std::io::Result<()> {
    let app = router(db, cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "HTTP server listening");

    axum::serve(listener, app).await
}
