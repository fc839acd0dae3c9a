//! Feed Post Models
//!
//! Posts are immutable once created. A feed entry pairs the post content
//! with a compact author summary so the transport layer never has to join
//! author data itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Compact author summary attached to each feed post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAuthor {
    pub id: String,
    pub name: String,
    pub username: String,
}

/// One entry in a user's feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPost {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: PostAuthor,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn feed_posts_serialize_with_camel_case_timestamps() {
        let post = FeedPost {
            id: "p1".to_string(),
            content: "hello".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            author: PostAuthor {
                id: "u1".to_string(),
                name: "Ann".to_string(),
                username: "ann".to_string(),
            },
        };

        let value = serde_json::to_value(&post).unwrap();
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["author"]["username"], "ann");
    }
}
