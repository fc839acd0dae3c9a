//! HTTP-level tests: drive the router with in-process requests against an
//! in-memory store and assert on status codes and JSON bodies.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use flock_core::db::GraphStore;
use flock_server::auth::USER_ID_HEADER;
use flock_server::config::cors_layer;
use flock_server::routes::{router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn test_app() -> Router {
    let store = Arc::new(GraphStore::open_in_memory().await.unwrap());
    router(AppState::new(store), cors_layer(&[]))
}

fn request(method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_ID_HEADER, user);
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn onboarding_body(name: &str, username: &str) -> Value {
    json!({ "name": name, "username": username, "avatar": "avatar_1" })
}

async fn onboard(app: &Router, user_id: &str, name: &str, username: &str) {
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/onboarding",
            Some(user_id),
            Some(onboarding_body(name, username)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = test_app().await;
    let response = app
        .oneshot(request(Method::GET, "/api/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn onboarding_requires_an_identity() {
    let app = test_app().await;
    let response = app
        .oneshot(request(
            Method::POST,
            "/api/onboarding",
            None,
            Some(onboarding_body("Ann", "ann")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn onboarding_rejects_invalid_fields() {
    let app = test_app().await;
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/onboarding",
            Some("u1"),
            Some(json!({ "name": "Ann", "username": "ann", "avatar": "avatar_42" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/onboarding",
            Some("u1"),
            Some(json!({ "name": "Ann", "username": "a!", "avatar": "avatar_1" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn onboarding_then_profile_roundtrip() {
    let app = test_app().await;
    onboard(&app, "u1", "Ann", "ann").await;

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/profile/u1", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "ann");
    assert_eq!(body["followers_count"], 0);

    let response = app
        .oneshot(request(
            Method::GET,
            "/api/profile/by-username/ann",
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "u1");
}

#[tokio::test]
async fn duplicate_usernames_conflict() {
    let app = test_app().await;
    onboard(&app, "u1", "Ann", "ann").await;

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/onboarding",
            Some("u2"),
            Some(onboarding_body("Annette", "ANN")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_profiles_are_not_found() {
    let app = test_app().await;
    let response = app
        .oneshot(request(Method::GET, "/api/profile/ghost", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_updates_are_self_only() {
    let app = test_app().await;
    onboard(&app, "u1", "Ann", "ann").await;
    onboard(&app, "u2", "Ben", "ben").await;

    let update = json!({ "name": "Ann B", "username": "ann", "avatar": "avatar_2" });
    let response = app
        .clone()
        .oneshot(request(
            Method::PATCH,
            "/api/profile/u1",
            Some("u2"),
            Some(update.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request(
            Method::PATCH,
            "/api/profile/u1",
            Some("u1"),
            Some(update),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["avatar"], "avatar_2");

    // Taking another user's name still conflicts
    let response = app
        .oneshot(request(
            Method::PATCH,
            "/api/profile/u1",
            Some("u1"),
            Some(json!({ "name": "Ann", "username": "BEN", "avatar": "avatar_1" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn follow_maps_engine_outcomes_to_statuses() {
    let app = test_app().await;
    onboard(&app, "u1", "Ann", "ann").await;
    onboard(&app, "u2", "Ben", "ben").await;

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/social/follow/u1",
            Some("u1"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/social/follow/ghost",
            Some("u1"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/social/follow/u2",
            Some("u1"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request(Method::GET, "/api/social/following", Some("u1"), None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "u2");
}

#[tokio::test]
async fn blank_search_terms_return_an_empty_list() {
    let app = test_app().await;
    onboard(&app, "u1", "Ann", "ann").await;

    let response = app
        .oneshot(request(
            Method::GET,
            "/api/social/users/search?q=%20%20",
            Some("u1"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn the_feed_starts_empty() {
    let app = test_app().await;
    onboard(&app, "u1", "Ann", "ann").await;

    let response = app
        .oneshot(request(Method::GET, "/api/feed", Some("u1"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "posts": [] }));
}
