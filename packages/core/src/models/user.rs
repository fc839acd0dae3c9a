//! User Profile Models
//!
//! The `UserProfile` struct is the single source of truth for profile fields.
//! The identity provider owns the `id` (and authentication); everything else
//! is owned by the user record in the graph store.
//!
//! `ProfileInput` carries the four caller-editable fields and enforces the
//! field constraints shared by onboarding and profile updates:
//!
//! - name: 1-50 characters after trimming
//! - username: 3-20 characters, letters/digits/underscore only
//! - bio: at most 160 characters, empty by default
//! - avatar: one of the ten known avatar identifiers

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

/// The fixed set of selectable avatar identifiers.
pub const AVATAR_IDS: [&str; 10] = [
    "avatar_1", "avatar_2", "avatar_3", "avatar_4", "avatar_5", "avatar_6", "avatar_7",
    "avatar_8", "avatar_9", "avatar_10",
];

/// Avatar assigned when a record predates avatar selection.
pub(crate) const DEFAULT_AVATAR: &str = "avatar_1";

const NAME_MAX: usize = 50;
const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 20;
const BIO_MAX: usize = 160;

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("username pattern is valid"))
}

/// Validation errors for profile fields
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name must be at least 1 character")]
    EmptyName,

    #[error("Name must be at most {NAME_MAX} characters")]
    NameTooLong,

    #[error("Username must be at least {USERNAME_MIN} characters")]
    UsernameTooShort,

    #[error("Username must be at most {USERNAME_MAX} characters")]
    UsernameTooLong,

    #[error("Username can only contain letters, numbers, and underscores")]
    UsernameCharset,

    #[error("Bio must be at most {BIO_MAX} characters")]
    BioTooLong,

    #[error("Avatar must be one of the known avatar identifiers")]
    UnknownAvatar,
}

/// Profile fields for a user node.
///
/// `id` is the opaque identifier assigned by the identity provider and never
/// changes; the remaining fields are mutable through profile updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity-provider id, also the record key in the store
    pub id: String,

    /// Display name (1-50 characters, trimmed)
    pub name: String,

    /// Unique handle (3-20 characters, case-insensitively unique)
    pub username: String,

    /// Email as reported by the identity provider, may be empty
    #[serde(default)]
    pub email: String,

    /// Short self-description (at most 160 characters)
    #[serde(default)]
    pub bio: String,

    /// One of [`AVATAR_IDS`]
    pub avatar: String,
}

impl UserProfile {
    /// Build a profile for onboarding from a validated input.
    pub fn from_input(id: impl Into<String>, email: impl Into<String>, input: ProfileInput) -> Self {
        Self {
            id: id.into(),
            name: input.name,
            username: input.username,
            email: email.into(),
            bio: input.bio,
            avatar: input.avatar,
        }
    }
}

/// Caller-editable profile fields, shared by onboarding and profile updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub bio: String,
    pub avatar: String,
}

impl ProfileInput {
    /// Check every field constraint and return the normalized input.
    ///
    /// The name is trimmed before its length check, matching what gets
    /// stored. All other fields pass through unchanged.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(ValidationError::NameTooLong);
        }
        self.name = trimmed.to_string();

        let username_len = self.username.chars().count();
        if username_len < USERNAME_MIN {
            return Err(ValidationError::UsernameTooShort);
        }
        if username_len > USERNAME_MAX {
            return Err(ValidationError::UsernameTooLong);
        }
        if !username_pattern().is_match(&self.username) {
            return Err(ValidationError::UsernameCharset);
        }

        if self.bio.chars().count() > BIO_MAX {
            return Err(ValidationError::BioTooLong);
        }

        if !AVATAR_IDS.contains(&self.avatar.as_str()) {
            return Err(ValidationError::UnknownAvatar);
        }

        Ok(self)
    }
}

/// Follower and following totals for one user.
///
/// The two counts are computed independently, never as a joint traversal,
/// so a user with many followers and many followees does not produce a
/// cross-product in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FollowCounts {
    pub followers: u64,
    pub following: u64,
}

/// A user paired with their follower count, as returned by search and
/// popularity queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedUser {
    pub user: UserProfile,
    pub followers_count: u64,
}

/// A follow suggestion.
///
/// `mutual_count` is the number of distinct users the requester follows that
/// lead to this candidate; it is the ranking key. `followers_count` is
/// attached for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedUser {
    pub user: UserProfile,
    pub mutual_count: u64,
    pub followers_count: u64,
}
