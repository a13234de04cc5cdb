mod config;
mod db;
mod errors;
mod models;
mod routes;
mod state;
mod store;

use anyhow::{Context, Result};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::init::init_database;
use crate::db::retry::RetryPolicy;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::mysql::MySqlStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting records API v{} (debug: {})",
        env!("CARGO_PKG_VERSION"),
        config.debug
    );
    info!(
        "Database target: {}@{}:{}/{}",
        config.database.user, config.database.host, config.database.port, config.database.name
    );

    let store = Arc::new(MySqlStore::new(&config.database));

    // Failure leaves the service up; requests report store errors themselves.
    let policy = RetryPolicy::default();
    info!(
        "Connecting with up to {} attempts ({:?} max wait)",
        policy.max_attempts,
        policy.worst_case_wait()
    );
    init_database(store.as_ref(), &policy).await;

    let state = AppState {
        store,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
