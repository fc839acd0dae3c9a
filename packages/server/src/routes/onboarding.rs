//! Onboarding route
//!
//! Creates the caller's profile: validate the fields, check username
//! availability, insert. The uniqueness index in the store covers the
//! window between the check and the insert.

use crate::auth::Caller;
use crate::error::ApiError;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use flock_core::models::{ProfileInput, UserProfile};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub bio: String,
    pub avatar: String,
}

#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub success: bool,
    pub message: String,
}

pub async fn complete_onboarding<C>(
    State(state): State<AppState<C>>,
    caller: Caller,
    Json(request): Json<OnboardingRequest>,
) -> Result<Json<OnboardingResponse>, ApiError>
where
    C: surrealdb::Connection,
{
    let input = ProfileInput {
        name: request.name,
        username: request.username,
        bio: request.bio,
        avatar: request.avatar,
    }
    .validated()?;

    if !state.directory.is_username_available(&input.username).await? {
        return Err(ApiError::conflict("Username is already taken"));
    }

    let profile = UserProfile::from_input(caller.id, caller.email.unwrap_or_default(), input);
    state.directory.create_user(profile).await?;

    Ok(Json(OnboardingResponse {
        success: true,
        message: "Onboarding completed successfully".to_string(),
    }))
}
