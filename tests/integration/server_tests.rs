//! HTTP surface tests driven through the router with `oneshot`

use crate::common::{mount_page, mount_robots, write_config, LOCATION_PAGE};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use monagent::bot::DEFAULT_REPLY;
use monagent::server::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::MockServer;

fn app(dir: &TempDir) -> Router {
    router(Arc::new(AppState::new(dir.path(), "site")))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_home_reports_running() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("running"));
}

#[tokio::test]
async fn test_chat_requires_message() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, body) = send(&app, post_json("/chat", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing 'message' field");

    let no_content_type = Request::builder()
        .method("POST")
        .uri("/chat")
        .body(Body::from("hello"))
        .unwrap();
    let (status, _) = send(&app, no_content_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_without_data_uses_default_reply() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, body) = send(&app, post_json("/chat", json!({ "message": "address?" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], DEFAULT_REPLY);
}

#[tokio::test]
async fn test_scrape_denied_is_forbidden() {
    let server = MockServer::start().await;
    mount_robots(&server, 200, "User-agent: *\nDisallow: /").await;

    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "site", &format!("{}/scottsdale", server.uri()));
    let app = app(&dir);

    let (status, body) = send(&app, post_json("/scrape", json!({}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], "denied");
}

#[tokio::test]
async fn test_scrape_server_error_is_reported() {
    let server = MockServer::start().await;
    mount_robots(&server, 200, "User-agent: *\nAllow: /").await;
    mount_page(&server, "/scottsdale", 502, "bad gateway").await;

    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "site", &format!("{}/scottsdale", server.uri()));
    let app = app(&dir);

    let (status, body) = send(&app, post_json("/scrape", json!({ "config": "site" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("502"));
}

#[tokio::test]
async fn test_scrape_unknown_config_is_error() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, body) = send(&app, post_json("/scrape", json!({ "config": "missing" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_scrape_then_chat_uses_fresh_rows() {
    let server = MockServer::start().await;
    mount_robots(&server, 200, "User-agent: *\nAllow: /").await;
    mount_page(&server, "/scottsdale", 200, LOCATION_PAGE).await;

    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "site", &format!("{}/scottsdale", server.uri()));
    let app = app(&dir);

    // No body at all runs the default configuration
    let request = Request::builder()
        .method("POST")
        .uri("/scrape")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["config"], "site");
    assert_eq!(body["rows"], 8);
    assert_eq!(body["sample"].as_array().unwrap().len(), 3);

    let (status, body) = send(&app, post_json("/chat", json!({ "message": "phone" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "You can call us at (480) 555-0100.");
}
