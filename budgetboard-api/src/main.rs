//! # Budgetboard API Server
//!
//! REST backend for boards of finance, budget and activity records.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://... JWT_SECRET=... cargo run -p budgetboard-api
//! ```

use budgetboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use budgetboard_shared::db::{
    migrations::{ensure_database_exists, get_migration_status, run_migrations},
    pool::{close_pool, create_pool, DatabaseConfig},
    postgres::PgStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "budgetboard_api=debug,budgetboard_shared=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Budgetboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    ensure_database_exists(&config.database.url).await?;
    let pool = create_pool(DatabaseConfig::new(
        config.database.url.clone(),
        config.database.max_connections,
    ))
    .await?;

    run_migrations(&pool).await?;
    let status = get_migration_status(&pool).await?;
    tracing::info!(
        applied = status.applied_migrations,
        available = status.available_migrations,
        latest_version = ?status.latest_version,
        "Database schema ready"
    );

    let bind_address = config.bind_address();
    let state = AppState::new(Arc::new(PgStore::new(pool.clone())), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(&pool).await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
