//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, service wiring and the Axum server
//! lifecycle.

use crate::application::services::{EditGrantService, UrlService};
use crate::config::Config;
use crate::infrastructure::persistence::{SqliteUrlRepository, database};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Builds the application state on top of an open pool.
pub fn build_state(config: &Config, pool: Arc<sqlx::SqlitePool>) -> AppState {
    let repository = Arc::new(SqliteUrlRepository::with_codec(
        pool.clone(),
        config.id_codec,
        config.id_max_attempts,
    ));
    let grants = EditGrantService::new(
        config.session_secret.clone(),
        config.edit_token_ttl_seconds,
    );
    let url_service = Arc::new(UrlService::new(
        repository,
        grants,
        config.duplicate_policy,
    ));

    AppState::new(url_service, config.base_url.clone())
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite connection pool
/// - Apply migrations
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = database::connect(&config).await?;
    tracing::info!("Connected to database");

    database::migrate(&pool).await?;
    tracing::info!("Migrations applied");

    let state = build_state(&config, Arc::new(pool));
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
