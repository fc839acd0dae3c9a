//! User Directory - identity and uniqueness operations
//!
//! Lookup is exact: `user_by_username` matches the username as stored,
//! case-sensitively. Only the availability checks normalize case, which is
//! what makes usernames case-insensitively unique without changing how they
//! display.
//!
//! Creation and update expect the caller to have validated fields
//! ([`crate::models::ProfileInput::validated`]) and checked availability
//! first; the store's uniqueness index covers the window between the check
//! and the write.

use crate::db::GraphStore;
use crate::models::{ProfileInput, UserProfile};
use crate::services::error::ServiceError;
use std::sync::Arc;
use surrealdb::engine::local::Db;

/// Directory of user records keyed by identity-provider id.
pub struct UserDirectory<C = Db>
where
    C: surrealdb::Connection,
{
    store: Arc<GraphStore<C>>,
}

// Manual Clone implementation because C doesn't need to be Clone
impl<C> Clone for UserDirectory<C>
where
    C: surrealdb::Connection,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<C> UserDirectory<C>
where
    C: surrealdb::Connection,
{
    /// Create a new UserDirectory over a shared store handle.
    pub fn new(store: Arc<GraphStore<C>>) -> Self {
        Self { store }
    }

    /// Insert a new user record with all profile fields.
    ///
    /// The caller verifies username availability beforehand; a concurrent
    /// duplicate still surfaces as [`ServiceError::UsernameTaken`] through
    /// the store's uniqueness index.
    pub async fn create_user(&self, profile: UserProfile) -> Result<UserProfile, ServiceError> {
        self.store.create_user(&profile).await?;
        tracing::info!(user_id = %profile.id, username = %profile.username, "user created");
        Ok(profile)
    }

    /// Fetch a profile by identity-provider id. Absence is `Ok(None)`.
    pub async fn user_by_id(&self, id: &str) -> Result<Option<UserProfile>, ServiceError> {
        Ok(self.store.user_by_id(id).await?)
    }

    /// Fetch a profile by exact username (case-sensitive as stored).
    pub async fn user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserProfile>, ServiceError> {
        Ok(self.store.user_by_username(username).await?)
    }

    /// True iff no user holds this username, compared case-insensitively.
    pub async fn is_username_available(&self, username: &str) -> Result<bool, ServiceError> {
        let matches = self.store.count_username_matches(username, None).await?;
        Ok(matches == 0)
    }

    /// Same check, but a match belonging to `excluded_id` does not count.
    /// Lets a user keep their own username through a profile update.
    pub async fn is_username_available_excluding(
        &self,
        username: &str,
        excluded_id: &str,
    ) -> Result<bool, ServiceError> {
        let matches = self
            .store
            .count_username_matches(username, Some(excluded_id))
            .await?;
        Ok(matches == 0)
    }

    /// Overwrite name, username, bio, and avatar on the matching user.
    ///
    /// Returns [`ServiceError::UserNotFound`] when no user has the id.
    /// Username uniqueness must be checked by the caller with
    /// [`Self::is_username_available_excluding`]; this operation does not
    /// re-check beyond the store index.
    pub async fn update_user(
        &self,
        id: &str,
        input: ProfileInput,
    ) -> Result<UserProfile, ServiceError> {
        let updated = self.store.update_user(id, &input).await?;
        updated.ok_or_else(|| ServiceError::user_not_found(id))
    }
}
