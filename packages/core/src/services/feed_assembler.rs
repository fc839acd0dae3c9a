//! Feed Assembler - composing posts with follow relationships
//!
//! A feed is the union of posts authored by a user's followees, newest
//! first. Rows with a missing or empty post id or content are dropped
//! rather than failing the feed; malformed records in the store must not
//! take the whole timeline down. An empty feed is a normal outcome.

use crate::db::GraphStore;
use crate::models::{FeedPost, PostAuthor};
use crate::services::error::ServiceError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use surrealdb::engine::local::Db;
use uuid::Uuid;

/// Builds per-user feeds and creates posts.
pub struct FeedAssembler<C = Db>
where
    C: surrealdb::Connection,
{
    store: Arc<GraphStore<C>>,
}

// Manual Clone implementation because C doesn't need to be Clone
impl<C> Clone for FeedAssembler<C>
where
    C: surrealdb::Connection,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<C> FeedAssembler<C>
where
    C: surrealdb::Connection,
{
    /// Create a new FeedAssembler over a shared store handle.
    pub fn new(store: Arc<GraphStore<C>>) -> Self {
        Self { store }
    }

    /// All posts authored by anyone `user_id` follows, each paired with a
    /// compact author summary, ordered by creation time descending.
    pub async fn feed_for(&self, user_id: &str) -> Result<Vec<FeedPost>, ServiceError> {
        let rows = self.store.feed_rows(user_id).await?;

        let mut posts: Vec<FeedPost> = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.post_id.filter(|id| !id.is_empty())?;
                let content = row.content.filter(|content| !content.is_empty())?;
                let created_at = row
                    .created_at
                    .as_deref()
                    .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                    .map(|parsed| parsed.with_timezone(&Utc))
                    .unwrap_or_else(Utc::now);

                Some(FeedPost {
                    id,
                    content,
                    created_at,
                    author: PostAuthor {
                        id: row.author_id,
                        name: row.author_name,
                        username: row.author_username,
                    },
                })
            })
            .collect();

        // Newest first; equal timestamps order by post id for stable output.
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(posts)
    }

    /// Create a post authored by `author_id` and return its generated id.
    ///
    /// Returns [`ServiceError::UserNotFound`] when the author does not
    /// exist; nothing is written in that case.
    pub async fn create_post(
        &self,
        author_id: &str,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<String, ServiceError> {
        let post_id = Uuid::new_v4().to_string();
        let author_found = self
            .store
            .create_post(author_id, &post_id, content, created_at)
            .await?;

        if !author_found {
            return Err(ServiceError::user_not_found(author_id));
        }

        tracing::debug!(author = %author_id, post = %post_id, "post created");
        Ok(post_id)
    }
}
