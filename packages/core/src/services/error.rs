//! Service Layer Error Types
//!
//! Error kinds surfaced by the graph services. The transport layer maps
//! them onto protocol responses: `UserNotFound` becomes 404,
//! `UsernameTaken` 409, `SelfFollow` and `Validation` 400, and `Store`
//! failures 500. No error here is fatal to the process; a failed request
//! never corrupts shared state.

use crate::db::StoreError;
use crate::models::ValidationError;
use thiserror::Error;

/// Graph service operation errors
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No user exists with the given id
    #[error("User not found: {id}")]
    UserNotFound { id: String },

    /// The username is already taken by another user
    #[error("Username is already taken: {username}")]
    UsernameTaken { username: String },

    /// A user attempted to follow themselves
    #[error("Cannot follow yourself")]
    SelfFollow,

    /// Profile field constraints violated
    #[error("Profile validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The underlying graph store failed
    #[error("Graph store operation failed: {0}")]
    Store(#[source] StoreError),
}

impl ServiceError {
    /// Create a user not found error
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::UserNotFound { id: id.into() }
    }

    /// Create a username taken error
    pub fn username_taken(username: impl Into<String>) -> Self {
        Self::UsernameTaken {
            username: username.into(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        // The uniqueness index closes the availability-check race; surface
        // it as the same conflict the check would have reported.
        match err {
            StoreError::UsernameTaken { username } => Self::UsernameTaken { username },
            other => Self::Store(other),
        }
    }
}
