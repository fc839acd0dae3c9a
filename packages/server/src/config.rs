//! Server Configuration
//!
//! Everything comes from environment variables with local-development
//! defaults:
//!
//! - `FLOCK_HOST` / `FLOCK_PORT` - bind address (default `0.0.0.0:8000`)
//! - `FLOCK_DATA_DIR` - embedded store path (default `./data/flock.db`)
//! - `FLOCK_CORS_ORIGINS` - comma-separated allowed origins
//! - `FLOCK_STORE_URL` (+ `FLOCK_STORE_USER`, `FLOCK_STORE_PASS`) - when
//!   set, connect to a remote SurrealDB server instead of the embedded one

use anyhow::Context;
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

/// Credentials for a remote SurrealDB server.
#[derive(Debug, Clone)]
pub struct RemoteStoreConfig {
    pub address: String,
    pub username: String,
    pub password: String,
}

/// Runtime configuration for the API server and the seed tool.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub data_path: PathBuf,
    pub cors_origins: Vec<String>,
    pub remote_store: Option<RemoteStoreConfig>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("FLOCK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("FLOCK_PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(8000);
        let bind_addr = format!("{host}:{port}")
            .parse()
            .with_context(|| format!("invalid bind address {host}:{port}"))?;

        let data_path = std::env::var("FLOCK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/flock.db"));

        let cors_origins = std::env::var("FLOCK_CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let remote_store = std::env::var("FLOCK_STORE_URL").ok().map(|address| {
            RemoteStoreConfig {
                address,
                username: std::env::var("FLOCK_STORE_USER").unwrap_or_else(|_| "root".to_string()),
                password: std::env::var("FLOCK_STORE_PASS").unwrap_or_else(|_| "root".to_string()),
            }
        });

        Ok(Self {
            bind_addr,
            data_path,
            cors_origins,
            remote_store,
        })
    }
}

/// Build the CORS middleware from the configured origins.
///
/// A literal `*` opens the API to any origin; otherwise only origins that
/// parse as header values are allowed, and invalid entries are logged and
/// skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "skipping unparsable CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(parsed)
}
