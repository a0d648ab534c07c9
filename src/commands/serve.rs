//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{pubsub, Cache, Database, Migrator, PubSubRouter};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    // Initialize database and apply pending migrations
    let database = Database::connect(&config).await?;
    let applied = Migrator::new(&config.migrations_dir)
        .up(database.connection())
        .await?;
    if applied > 0 {
        tracing::info!(applied, "Applied pending migrations");
    }
    let database = Arc::new(database);

    // Initialize Redis cache
    let mut cache = Cache::new(&config)?;
    cache.connect().await?;
    let cache = Arc::new(cache);

    // Start the pub/sub listener when any handlers are registered
    let router = pubsub_router();
    if !router.is_empty() {
        let _listener = pubsub::spawn_listener(cache.client().clone(), router);
        tracing::info!("Pub/sub listener started");
    }

    // Build application state and router
    let state = AppState::new(database, cache);
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

/// Channel handlers for this deployment. Extend by registering handlers or
/// merging routers from other modules.
fn pubsub_router() -> PubSubRouter {
    let mut router = PubSubRouter::new();
    router.register("users.events", |payload| async move {
        tracing::info!(payload = %payload, "User event received");
    });
    router
}
