//! Seed tool: bulk-create sample posts for random existing users.
//!
//! Runs against the local embedded store, so stop the API server first.
//! Usage: `seed [count]` (default 25).

use chrono::Utc;
use flock_core::db::GraphStore;
use flock_core::services::FeedAssembler;
use flock_server::config::Config;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let count: usize = std::env::args()
        .nth(1)
        .and_then(|value| value.parse().ok())
        .unwrap_or(25);

    let config = Config::from_env()?;
    let store = Arc::new(GraphStore::open(config.data_path.clone()).await?);
    let feed = FeedAssembler::new(store.clone());

    let users = store.random_users(count).await?;
    for user in &users {
        let content = format!("This is a sample post by {}.", user.name);
        feed.create_post(&user.id, &content, Utc::now()).await?;
    }

    tracing::info!("created {} posts for random users", users.len());
    Ok(())
}
