//! Flock API server entry point.

use flock_core::db::GraphStore;
use flock_server::config::{self, Config};
use flock_server::routes::{router, AppState};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    if let Some(remote) = config.remote_store.clone() {
        tracing::info!(address = %remote.address, "using remote graph store");
        let store =
            GraphStore::connect_http(&remote.address, &remote.username, &remote.password).await?;
        serve(store, &config).await
    } else {
        tracing::info!(path = %config.data_path.display(), "using embedded graph store");
        let store = GraphStore::open(config.data_path.clone()).await?;
        serve(store, &config).await
    }
}

async fn serve<C>(store: GraphStore<C>, config: &Config) -> anyhow::Result<()>
where
    C: surrealdb::Connection,
{
    let state = AppState::new(Arc::new(store));
    let app = router(state, config::cors_layer(&config.cors_origins));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("flock api listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("flock api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
