//! Router and Handlers
//!
//! One submodule per resource, mirroring the engine's service split. The
//! router is generic over the store connection so the same handlers serve
//! the embedded engine in production and the in-memory engine in tests.

pub mod feed;
pub mod onboarding;
pub mod profile;
pub mod social;

use axum::routing::{delete, get, post};
use axum::{Json, Router};
use flock_core::db::GraphStore;
use flock_core::services::{FeedAssembler, SocialGraph, UserDirectory};
use serde_json::json;
use std::sync::Arc;
use surrealdb::engine::local::Db;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared handler state: the three engine services over one store handle.
pub struct AppState<C = Db>
where
    C: surrealdb::Connection,
{
    pub directory: UserDirectory<C>,
    pub social: SocialGraph<C>,
    pub feed: FeedAssembler<C>,
}

// Manual Clone implementation because C doesn't need to be Clone
impl<C> Clone for AppState<C>
where
    C: surrealdb::Connection,
{
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
            social: self.social.clone(),
            feed: self.feed.clone(),
        }
    }
}

impl<C> AppState<C>
where
    C: surrealdb::Connection,
{
    /// Wire every service to one shared store handle.
    pub fn new(store: Arc<GraphStore<C>>) -> Self {
        Self {
            directory: UserDirectory::new(store.clone()),
            social: SocialGraph::new(store.clone()),
            feed: FeedAssembler::new(store),
        }
    }
}

/// Build the full API router with tracing and CORS middleware applied.
pub fn router<C>(state: AppState<C>, cors: CorsLayer) -> Router
where
    C: surrealdb::Connection,
{
    Router::new()
        .route("/api/health", get(health))
        .route("/api/onboarding", post(onboarding::complete_onboarding::<C>))
        .route(
            "/api/profile/by-username/:username",
            get(profile::profile_by_username::<C>),
        )
        .route(
            "/api/profile/:user_id",
            get(profile::profile_by_id::<C>).patch(profile::update_profile::<C>),
        )
        .route("/api/social/follow/:target_id", post(social::follow_user::<C>))
        .route(
            "/api/social/unfollow/:target_id",
            delete(social::unfollow_user::<C>),
        )
        .route("/api/social/following", get(social::my_following::<C>))
        .route("/api/social/following/:user_id", get(social::following_for::<C>))
        .route("/api/social/followers", get(social::my_followers::<C>))
        .route("/api/social/followers/:user_id", get(social::followers_for::<C>))
        .route("/api/social/mutual/:other_id", get(social::mutual_connections::<C>))
        .route("/api/social/users", get(social::list_users::<C>))
        .route("/api/social/users/search", get(social::search_users::<C>))
        .route("/api/social/suggestions", get(social::suggestions::<C>))
        .route("/api/social/popular", get(social::popular_users::<C>))
        .route("/api/feed", get(feed::get_feed::<C>))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Liveness probe for monitors and load balancers.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "flock-api" }))
}
