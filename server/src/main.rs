use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use todo_core::{StorageConfig, SystemClock, TodoService};
use todo_server::{create_router, AppState, ServerArgs};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todo_server=debug,todo_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = ServerArgs::parse();
    let storage = args.storage_config();
    let clock = Arc::new(SystemClock);

    let repo = storage
        .open(clock.clone())
        .context("Failed to create storage")?;
    match &storage {
        StorageConfig::Memory => tracing::info!("Using in-memory storage"),
        StorageConfig::JsonFile { path } => {
            tracing::info!("Using JSON file storage: {}", path.display())
        }
    }

    let state = AppState::new(TodoService::with_clock(repo, clock));
    let app = create_router(state);

    let addr = args.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server starting on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

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
