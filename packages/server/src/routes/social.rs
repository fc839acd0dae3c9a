//! Social graph routes
//!
//! Follow/unfollow plus the read surface: connections, mutuals, the
//! explore listing, search, suggestions, and popularity.

use crate::auth::Caller;
use crate::error::ApiError;
use crate::routes::profile::ProfileResponse;
use crate::routes::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use flock_core::services::{DEFAULT_POPULAR_LIMIT, DEFAULT_SUGGESTION_LIMIT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    fn ok(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
        })
    }
}

pub async fn follow_user<C>(
    State(state): State<AppState<C>>,
    caller: Caller,
    Path(target_id): Path<String>,
) -> Result<Json<ActionResponse>, ApiError>
where
    C: surrealdb::Connection,
{
    state.social.follow(&caller.id, &target_id).await?;
    Ok(ActionResponse::ok("User followed successfully"))
}

pub async fn unfollow_user<C>(
    State(state): State<AppState<C>>,
    caller: Caller,
    Path(target_id): Path<String>,
) -> Result<Json<ActionResponse>, ApiError>
where
    C: surrealdb::Connection,
{
    state.social.unfollow(&caller.id, &target_id).await?;
    Ok(ActionResponse::ok("User unfollowed successfully"))
}

pub async fn my_following<C>(
    State(state): State<AppState<C>>,
    caller: Caller,
) -> Result<Json<Vec<ProfileResponse>>, ApiError>
where
    C: surrealdb::Connection,
{
    following_for(State(state), Path(caller.id)).await
}

pub async fn following_for<C>(
    State(state): State<AppState<C>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError>
where
    C: surrealdb::Connection,
{
    let users = state.social.following(&user_id).await?;
    Ok(Json(users.into_iter().map(ProfileResponse::bare).collect()))
}

pub async fn my_followers<C>(
    State(state): State<AppState<C>>,
    caller: Caller,
) -> Result<Json<Vec<ProfileResponse>>, ApiError>
where
    C: surrealdb::Connection,
{
    followers_for(State(state), Path(caller.id)).await
}

pub async fn followers_for<C>(
    State(state): State<AppState<C>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError>
where
    C: surrealdb::Connection,
{
    let users = state.social.followers(&user_id).await?;
    Ok(Json(users.into_iter().map(ProfileResponse::bare).collect()))
}

pub async fn mutual_connections<C>(
    State(state): State<AppState<C>>,
    caller: Caller,
    Path(other_id): Path<String>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError>
where
    C: surrealdb::Connection,
{
    let users = state.social.mutual_connections(&caller.id, &other_id).await?;
    Ok(Json(users.into_iter().map(ProfileResponse::bare).collect()))
}

pub async fn list_users<C>(
    State(state): State<AppState<C>>,
    caller: Caller,
) -> Result<Json<Vec<ProfileResponse>>, ApiError>
where
    C: surrealdb::Connection,
{
    let users = state.social.all_users_except(&caller.id).await?;
    Ok(Json(users.into_iter().map(ProfileResponse::bare).collect()))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

pub async fn search_users<C>(
    State(state): State<AppState<C>>,
    caller: Caller,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError>
where
    C: surrealdb::Connection,
{
    // Blank terms return nothing; the engine also refuses to query on them
    let term = params.q.trim();
    if term.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let hits = state.social.search_users(term, &caller.id, None).await?;
    Ok(Json(
        hits.into_iter()
            .map(|hit| ProfileResponse::ranked(hit.user, hit.followers_count))
            .collect(),
    ))
}

pub async fn suggestions<C>(
    State(state): State<AppState<C>>,
    caller: Caller,
) -> Result<Json<Vec<ProfileResponse>>, ApiError>
where
    C: surrealdb::Connection,
{
    let suggested = state
        .social
        .suggestions(&caller.id, DEFAULT_SUGGESTION_LIMIT)
        .await?;
    Ok(Json(
        suggested
            .into_iter()
            .map(|s| ProfileResponse::ranked(s.user, s.followers_count))
            .collect(),
    ))
}

pub async fn popular_users<C>(
    State(state): State<AppState<C>>,
    _caller: Caller,
) -> Result<Json<Vec<ProfileResponse>>, ApiError>
where
    C: surrealdb::Connection,
{
    let popular = state.social.popular_users(DEFAULT_POPULAR_LIMIT).await?;
    Ok(Json(
        popular
            .into_iter()
            .map(|p| ProfileResponse::ranked(p.user, p.followers_count))
            .collect(),
    ))
}
