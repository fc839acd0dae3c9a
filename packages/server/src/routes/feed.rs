//! Feed route
//!
//! Returns the caller's home feed: posts from followed users, newest
//! first. An empty feed is a normal 200, not an error.

use crate::auth::Caller;
use crate::error::ApiError;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use flock_core::models::FeedPost;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub posts: Vec<FeedPost>,
}

pub async fn get_feed<C>(
    State(state): State<AppState<C>>,
    caller: Caller,
) -> Result<Json<FeedResponse>, ApiError>
where
    C: surrealdb::Connection,
{
    let posts = state.feed.feed_for(&caller.id).await?;
    Ok(Json(FeedResponse { posts }))
}
