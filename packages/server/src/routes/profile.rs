//! Profile routes
//!
//! Lookup by id or username, and self-service profile updates. Profile
//! responses include live follow counts; a failed count query degrades to
//! zeros rather than failing the profile.

use crate::auth::Caller;
use crate::error::ApiError;
use crate::routes::AppState;
use axum::extract::{Path, State};
use axum::Json;
use flock_core::models::{FollowCounts, ProfileInput, UserProfile};
use serde::{Deserialize, Serialize};

/// Profile payload: the stored fields plus follow totals.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub avatar: String,
    pub followers_count: u64,
    pub following_count: u64,
}

impl ProfileResponse {
    pub fn new(profile: UserProfile, counts: FollowCounts) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            username: profile.username,
            email: profile.email,
            bio: profile.bio,
            avatar: profile.avatar,
            followers_count: counts.followers,
            following_count: counts.following,
        }
    }

    /// A profile without counts (list endpoints, update responses).
    pub fn bare(profile: UserProfile) -> Self {
        Self::new(profile, FollowCounts::default())
    }

    /// A profile carrying a precomputed follower total.
    pub fn ranked(profile: UserProfile, followers_count: u64) -> Self {
        Self::new(
            profile,
            FollowCounts {
                followers: followers_count,
                following: 0,
            },
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub bio: String,
    pub avatar: String,
}

/// Fetch follow counts, degrading to zeros when the count query fails.
async fn counts_or_zero<C>(state: &AppState<C>, user_id: &str) -> FollowCounts
where
    C: surrealdb::Connection,
{
    match state.social.follow_counts(user_id).await {
        Ok(counts) => counts,
        Err(err) => {
            tracing::warn!(user_id = %user_id, error = %err, "follow counts unavailable");
            FollowCounts::default()
        }
    }
}

pub async fn profile_by_id<C>(
    State(state): State<AppState<C>>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError>
where
    C: surrealdb::Connection,
{
    let profile = state
        .directory
        .user_by_id(&user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    let counts = counts_or_zero(&state, &profile.id).await;
    Ok(Json(ProfileResponse::new(profile, counts)))
}

pub async fn profile_by_username<C>(
    State(state): State<AppState<C>>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError>
where
    C: surrealdb::Connection,
{
    let profile = state
        .directory
        .user_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    let counts = counts_or_zero(&state, &profile.id).await;
    Ok(Json(ProfileResponse::new(profile, counts)))
}

pub async fn update_profile<C>(
    State(state): State<AppState<C>>,
    caller: Caller,
    Path(user_id): Path<String>,
    Json(request): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileResponse>, ApiError>
where
    C: surrealdb::Connection,
{
    if caller.id != user_id {
        return Err(ApiError::forbidden("Cannot edit another user's profile"));
    }

    let input = ProfileInput {
        name: request.name,
        username: request.username,
        bio: request.bio,
        avatar: request.avatar,
    }
    .validated()?;

    let current = state
        .directory
        .user_by_id(&user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    // Only re-check availability when the username actually changes
    if !input.username.eq_ignore_ascii_case(&current.username)
        && !state
            .directory
            .is_username_available_excluding(&input.username, &user_id)
            .await?
    {
        return Err(ApiError::conflict("Username is already taken"));
    }

    let updated = state.directory.update_user(&user_id, input).await?;
    Ok(Json(ProfileResponse::bare(updated)))
}
