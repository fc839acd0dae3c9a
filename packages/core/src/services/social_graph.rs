//! Social Graph - follow edges and ranking algorithms
//!
//! Relationship operations over `follows` edges: follow/unfollow,
//! enumeration, mutual-connection intersection, friend-of-friend
//! suggestions, substring search, and popularity ranking.
//!
//! The store returns flat typed rows in a single round trip per operation;
//! the ranking itself (distinct-intermediary counting, ordering, tie
//! breaks) happens here. Tie breaks are deterministic: suggestion
//! candidates with equal intermediary counts and popular users with equal
//! follower totals order by user id ascending.

use crate::db::GraphStore;
use crate::models::{FollowCounts, RankedUser, SuggestedUser, UserProfile};
use crate::services::error::ServiceError;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use surrealdb::engine::local::Db;

/// Default number of follow suggestions returned.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Default number of popular users returned.
pub const DEFAULT_POPULAR_LIMIT: usize = 10;

/// Relationship operations over the follow graph.
pub struct SocialGraph<C = Db>
where
    C: surrealdb::Connection,
{
    store: Arc<GraphStore<C>>,
}

// Manual Clone implementation because C doesn't need to be Clone
impl<C> Clone for SocialGraph<C>
where
    C: surrealdb::Connection,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<C> SocialGraph<C>
where
    C: surrealdb::Connection,
{
    /// Create a new SocialGraph over a shared store handle.
    pub fn new(store: Arc<GraphStore<C>>) -> Self {
        Self { store }
    }

    /// Idempotently ensure exactly one `follows` edge source -> target.
    ///
    /// Following yourself is rejected here, not just at the transport, so
    /// the no-self-loop invariant holds regardless of caller. Following a
    /// user that does not exist is [`ServiceError::UserNotFound`] rather
    /// than a silent no-op.
    pub async fn follow(&self, source_id: &str, target_id: &str) -> Result<(), ServiceError> {
        if source_id == target_id {
            return Err(ServiceError::SelfFollow);
        }

        let outcome = self.store.ensure_follow(source_id, target_id).await?;
        if !outcome.source_found {
            return Err(ServiceError::user_not_found(source_id));
        }
        if !outcome.target_found {
            return Err(ServiceError::user_not_found(target_id));
        }

        if outcome.created {
            tracing::debug!(source = %source_id, target = %target_id, "follow edge created");
        }
        Ok(())
    }

    /// Remove the edge source -> target if present; a no-op otherwise.
    pub async fn unfollow(&self, source_id: &str, target_id: &str) -> Result<(), ServiceError> {
        self.store.delete_follow(source_id, target_id).await?;
        Ok(())
    }

    /// Users following `user_id`, unordered.
    pub async fn followers(&self, user_id: &str) -> Result<Vec<UserProfile>, ServiceError> {
        Ok(self.store.followers_of(user_id).await?)
    }

    /// Users that `user_id` follows, unordered.
    pub async fn following(&self, user_id: &str) -> Result<Vec<UserProfile>, ServiceError> {
        Ok(self.store.following_of(user_id).await?)
    }

    /// Follower and following totals, computed as independent counts.
    pub async fn follow_counts(&self, user_id: &str) -> Result<FollowCounts, ServiceError> {
        let (followers, following) = self.store.follow_counts(user_id).await?;
        Ok(FollowCounts {
            followers,
            following,
        })
    }

    /// Users followed by both `a` and `b`. Commutative in its arguments.
    pub async fn mutual_connections(
        &self,
        a: &str,
        b: &str,
    ) -> Result<Vec<UserProfile>, ServiceError> {
        Ok(self.store.mutual_following(a, b).await?)
    }

    /// Friend-of-friend follow suggestions.
    ///
    /// Candidates are users followed by someone `user_id` follows, excluding
    /// `user_id` and anyone already followed. The rank key is the number of
    /// distinct direct followees leading to the candidate, descending; the
    /// candidate's own follower count is attached for display but does not
    /// rank.
    pub async fn suggestions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<SuggestedUser>, ServiceError> {
        let rows = self.store.suggestion_rows(user_id).await?;

        // Count distinct intermediaries per candidate. Edges are unique per
        // ordered pair, but the set guards against double counting anyway.
        let mut intermediaries: HashMap<&str, HashSet<&str>> = HashMap::new();
        for hop in &rows.hops {
            intermediaries
                .entry(hop.candidate_id.as_str())
                .or_default()
                .insert(hop.source_id.as_str());
        }

        let follower_totals: HashMap<&str, u64> = rows
            .follower_counts
            .iter()
            .map(|count| (count.user_id.as_str(), count.total))
            .collect();

        let mut ranked: Vec<SuggestedUser> = rows
            .candidates
            .iter()
            .map(|profile| SuggestedUser {
                mutual_count: intermediaries
                    .get(profile.id.as_str())
                    .map(|sources| sources.len() as u64)
                    .unwrap_or(0),
                followers_count: follower_totals.get(profile.id.as_str()).copied().unwrap_or(0),
                user: profile.clone(),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.mutual_count
                .cmp(&a.mutual_count)
                .then_with(|| a.user.id.cmp(&b.user.id))
        });
        ranked.truncate(limit);
        Ok(ranked)
    }

    /// Case-insensitive substring search against name or username, excluding
    /// the given user. Each result carries its follower count.
    ///
    /// An empty or whitespace-only term short-circuits to an empty result
    /// without touching the store.
    pub async fn search_users(
        &self,
        term: &str,
        excluding_user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<RankedUser>, ServiceError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self.store.search_rows(term, excluding_user_id, limit).await?;
        Ok(Self::attach_follower_counts(rows.profiles, &rows.follower_counts))
    }

    /// Users ranked by follower count, descending. Users without a single
    /// follower do not appear. Ties order by user id ascending.
    pub async fn popular_users(&self, limit: usize) -> Result<Vec<RankedUser>, ServiceError> {
        let rows = self.store.popular_rows(limit).await?;
        let mut ranked = Self::attach_follower_counts(rows.profiles, &rows.follower_counts);

        // Everyone here has at least one follower; order by total, then id.
        ranked.sort_by(|a, b| {
            b.followers_count
                .cmp(&a.followers_count)
                .then_with(|| a.user.id.cmp(&b.user.id))
        });
        Ok(ranked)
    }

    /// All users except the given id, ordered by username ascending.
    pub async fn all_users_except(&self, user_id: &str) -> Result<Vec<UserProfile>, ServiceError> {
        Ok(self.store.users_except(user_id).await?)
    }

    fn attach_follower_counts(
        profiles: Vec<UserProfile>,
        counts: &[crate::db::FollowerCount],
    ) -> Vec<RankedUser> {
        let totals: HashMap<&str, u64> = counts
            .iter()
            .map(|count| (count.user_id.as_str(), count.total))
            .collect();

        profiles
            .into_iter()
            .map(|user| {
                let followers_count = totals.get(user.id.as_str()).copied().unwrap_or(0);
                RankedUser {
                    user,
                    followers_count,
                }
            })
            .collect()
    }
}
