//! Data Models
//!
//! This module contains the core data structures used throughout Flock:
//!
//! - `UserProfile` - profile fields for a user node
//! - `ProfileInput` - validated name/username/bio/avatar payload
//! - `FollowCounts`, `RankedUser`, `SuggestedUser` - graph query results
//! - `FeedPost`, `PostAuthor` - feed assembly results
//!
//! Field constraints (name length, username charset, bio length, avatar set)
//! live here so that the transport layer and the engine validate through a
//! single implementation.

mod post;
mod user;

pub use post::{FeedPost, PostAuthor};
pub(crate) use user::DEFAULT_AVATAR;
pub use user::{
    FollowCounts, ProfileInput, RankedUser, SuggestedUser, UserProfile, ValidationError,
    AVATAR_IDS,
};
