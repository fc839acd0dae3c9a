//! Integration tests for FeedAssembler
//!
//! Feed ordering, empty feeds, and the malformed-record filter against a
//! real in-memory SurrealDB instance.

use crate::db::GraphStore;
use crate::models::UserProfile;
use crate::services::{FeedAssembler, ServiceError, SocialGraph, UserDirectory};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use surrealdb::engine::local::Db;

struct Fixture {
    store: Arc<GraphStore<Db>>,
    directory: UserDirectory<Db>,
    graph: SocialGraph<Db>,
    feed: FeedAssembler<Db>,
}

async fn fixture() -> Fixture {
    let store = Arc::new(GraphStore::open_in_memory().await.unwrap());
    Fixture {
        directory: UserDirectory::new(store.clone()),
        graph: SocialGraph::new(store.clone()),
        feed: FeedAssembler::new(store.clone()),
        store,
    }
}

fn profile(id: &str, name: &str, username: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        name: name.to_string(),
        username: username.to_string(),
        email: format!("{id}@example.com"),
        bio: String::new(),
        avatar: "avatar_1".to_string(),
    }
}

#[tokio::test]
async fn feed_orders_posts_newest_first_across_authors() {
    let fx = fixture().await;
    for user in [
        profile("a", "Ann", "ann"),
        profile("b", "Ben", "ben"),
        profile("c", "Cam", "cam"),
    ] {
        fx.directory.create_user(user).await.unwrap();
    }
    fx.graph.follow("a", "b").await.unwrap();
    fx.graph.follow("a", "c").await.unwrap();

    let t1 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let t3 = Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();

    fx.feed.create_post("b", "first", t1).await.unwrap();
    fx.feed.create_post("c", "second", t2).await.unwrap();
    fx.feed.create_post("b", "third", t3).await.unwrap();

    let posts = fx.feed.feed_for("a").await.unwrap();
    let contents: Vec<&str> = posts.iter().map(|p| p.content.as_str()).collect();
    assert_eq!(contents, vec!["third", "second", "first"]);

    assert_eq!(posts[0].author.id, "b");
    assert_eq!(posts[0].author.username, "ben");
    assert_eq!(posts[0].created_at, t3);
}

#[tokio::test]
async fn feed_is_empty_without_followees_or_posts() {
    let fx = fixture().await;
    fx.directory
        .create_user(profile("a", "Ann", "ann"))
        .await
        .unwrap();
    fx.directory
        .create_user(profile("b", "Ben", "ben"))
        .await
        .unwrap();

    // Follows no one
    assert!(fx.feed.feed_for("a").await.unwrap().is_empty());

    // Follows someone without posts
    fx.graph.follow("a", "b").await.unwrap();
    assert!(fx.feed.feed_for("a").await.unwrap().is_empty());
}

#[tokio::test]
async fn feed_only_contains_followee_posts() {
    let fx = fixture().await;
    for user in [
        profile("a", "Ann", "ann"),
        profile("b", "Ben", "ben"),
        profile("c", "Cam", "cam"),
    ] {
        fx.directory.create_user(user).await.unwrap();
    }
    fx.graph.follow("a", "b").await.unwrap();

    let t = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    fx.feed.create_post("b", "from ben", t).await.unwrap();
    fx.feed.create_post("c", "from cam", t).await.unwrap();
    fx.feed.create_post("a", "from ann herself", t).await.unwrap();

    let posts = fx.feed.feed_for("a").await.unwrap();
    let contents: Vec<&str> = posts.iter().map(|p| p.content.as_str()).collect();
    assert_eq!(contents, vec!["from ben"]);
}

#[tokio::test]
async fn posts_without_content_are_dropped_from_the_feed() {
    let fx = fixture().await;
    fx.directory
        .create_user(profile("a", "Ann", "ann"))
        .await
        .unwrap();
    fx.directory
        .create_user(profile("b", "Ben", "ben"))
        .await
        .unwrap();
    fx.graph.follow("a", "b").await.unwrap();

    let t = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    fx.feed.create_post("b", "kept", t).await.unwrap();
    // Write a malformed record straight through the store
    fx.store
        .create_post("b", "broken-post", "", t)
        .await
        .unwrap();

    let posts = fx.feed.feed_for("a").await.unwrap();
    let contents: Vec<&str> = posts.iter().map(|p| p.content.as_str()).collect();
    assert_eq!(contents, vec!["kept"]);
}

#[tokio::test]
async fn posting_as_an_unknown_author_is_not_found() {
    let fx = fixture().await;

    let err = fx
        .feed
        .create_post("ghost", "boo", Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::UserNotFound { .. }));
}
