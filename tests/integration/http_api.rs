//! Integration tests for the JSON HTTP surface.
//!
//! Drives the axum router in-process with `tower::ServiceExt::oneshot` and
//! checks status codes, payload shapes and owner scoping.
//!
//! Verification command: `cargo test --test http_api`

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use taskboard::{Board, BoardConfig, FileStore, MemoryStore, PositionPolicy};
use taskboard_server::api::{OWNER_HEADER, router};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn memory_app() -> Router {
    router(Arc::new(Board::new(MemoryStore::new())))
}

/// Sends one request and returns the status and decoded JSON body
/// (`Value::Null` when the body is empty).
async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    owner: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(owner) = owner {
        builder = builder.header(OWNER_HEADER, owner);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, owner: &str, title: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/tasks",
        Some(owner),
        Some(json!({ "title": title })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

fn id_of(view: &Value) -> String {
    view["id"].as_str().unwrap().to_string()
}

fn titles(views: &Value) -> Vec<&str> {
    views
        .as_array()
        .unwrap()
        .iter()
        .map(|view| view["title"].as_str().unwrap())
        .collect()
}

// ===========================================================================
// Health and authentication
// ===========================================================================

#[tokio::test]
async fn health_is_open() {
    let app = memory_app();
    let (status, _) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn api_requires_owner_header() {
    let app = memory_app();
    let (status, body) = send(&app, Method::GET, "/api/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains(OWNER_HEADER));

    let (status, _) = send(&app, Method::GET, "/api/tasks", Some("   "), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ===========================================================================
// Create and read
// ===========================================================================

#[tokio::test]
async fn create_returns_camel_case_view() {
    let app = memory_app();
    let (status, view) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some("alice"),
        Some(json!({
            "title": "  Design  ",
            "description": "wireframes",
            "dueDate": "2026-12-01",
            "priority": "HIGH"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["title"], "Design");
    assert_eq!(view["description"], "wireframes");
    assert_eq!(view["status"], "TODO");
    assert_eq!(view["priority"], "HIGH");
    assert_eq!(view["position"], 0);
    assert_eq!(view["dueDate"], "2026-12-01");
    assert!(view["createdAt"].is_string());
    assert!(view["updatedAt"].is_string());
    assert!(view.get("owner").is_none());
}

#[tokio::test]
async fn create_rejects_blank_title() {
    let app = memory_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some("alice"),
        Some(json!({ "title": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = memory_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/tasks")
        .header(OWNER_HEADER, "alice")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_and_list_by_status() {
    let app = memory_app();
    for title in ["Design", "Build", "Ship"] {
        create(&app, "alice", title).await;
    }

    let (status, all) = send(&app, Method::GET, "/api/tasks", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&all), ["Design", "Build", "Ship"]);

    let (status, todo) = send(&app, Method::GET, "/api/tasks/status/todo", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&todo), ["Design", "Build", "Ship"]);

    let (status, done) = send(&app, Method::GET, "/api/tasks/status/DONE", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(done.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_status_in_path_is_bad_request() {
    let app = memory_app();
    let (status, _) = send(&app, Method::GET, "/api/tasks/status/DOING", Some("alice"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ===========================================================================
// Move
// ===========================================================================

#[tokio::test]
async fn move_scenario_over_http() {
    let app = memory_app();
    let _design = create(&app, "u", "Design").await;
    let build = create(&app, "u", "Build").await;
    create(&app, "u", "Ship").await;

    let uri = format!("/api/tasks/{}/move", id_of(&build));
    let (status, moved) = send(
        &app,
        Method::PATCH,
        &uri,
        Some("u"),
        Some(json!({ "status": "IN_PROGRESS" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["status"], "IN_PROGRESS");
    assert_eq!(moved["position"], 0);

    let (_, todo) = send(&app, Method::GET, "/api/tasks/status/TODO", Some("u"), None).await;
    assert_eq!(titles(&todo), ["Design", "Ship"]);
    assert_eq!(todo[1]["position"], 1);
}

#[tokio::test]
async fn move_clamps_requested_position() {
    let app = memory_app();
    let a = create(&app, "alice", "A").await;
    create(&app, "alice", "B").await;
    create(&app, "alice", "C").await;

    let uri = format!("/api/tasks/{}/move", id_of(&a));
    let (status, moved) = send(
        &app,
        Method::PATCH,
        &uri,
        Some("alice"),
        Some(json!({ "status": "TODO", "newPosition": 99 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["position"], 2);
}

#[tokio::test]
async fn move_without_status_is_bad_request() {
    let app = memory_app();
    let a = create(&app, "alice", "A").await;
    let uri = format!("/api/tasks/{}/move", id_of(&a));
    let (status, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some("alice"),
        Some(json!({ "newPosition": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn move_with_unknown_status_value_is_bad_request() {
    let app = memory_app();
    let a = create(&app, "alice", "A").await;
    let uri = format!("/api/tasks/{}/move", id_of(&a));
    let (status, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some("alice"),
        Some(json!({ "status": "ARCHIVED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn strict_policy_rejects_out_of_range_move() {
    let board = Board::with_config(
        MemoryStore::new(),
        BoardConfig::default().with_position_policy(PositionPolicy::Strict),
    );
    let app = router(Arc::new(board));
    let a = create(&app, "alice", "A").await;

    let uri = format!("/api/tasks/{}/move", id_of(&a));
    let (status, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some("alice"),
        Some(json!({ "status": "DONE", "newPosition": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, todo) = send(&app, Method::GET, "/api/tasks/status/TODO", Some("alice"), None).await;
    assert_eq!(titles(&todo), ["A"]);
}

// ===========================================================================
// Update and delete
// ===========================================================================

#[tokio::test]
async fn update_changes_fields_and_status() {
    let app = memory_app();
    let a = create(&app, "alice", "A").await;
    let uri = format!("/api/tasks/{}", id_of(&a));

    let (status, view) = send(
        &app,
        Method::PUT,
        &uri,
        Some("alice"),
        Some(json!({ "title": "A2", "priority": "LOW", "status": "DONE" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["title"], "A2");
    assert_eq!(view["priority"], "LOW");
    assert_eq!(view["status"], "DONE");
    assert_eq!(view["position"], 0);
}

#[tokio::test]
async fn delete_returns_no_content_and_compacts() {
    let app = memory_app();
    create(&app, "alice", "T1").await;
    let t2 = create(&app, "alice", "T2").await;
    create(&app, "alice", "T3").await;

    let uri = format!("/api/tasks/{}", id_of(&t2));
    let (status, body) = send(&app, Method::DELETE, &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, todo) = send(&app, Method::GET, "/api/tasks/status/TODO", Some("alice"), None).await;
    assert_eq!(titles(&todo), ["T1", "T3"]);
    assert_eq!(todo[1]["position"], 1);

    let (status, _) = send(&app, Method::DELETE, &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ===========================================================================
// Not found and owner scoping
// ===========================================================================

#[tokio::test]
async fn unparseable_id_is_not_found() {
    let app = memory_app();
    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/tasks/42/move",
        Some("alice"),
        Some(json!({ "status": "DONE" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, Method::DELETE, "/api/tasks/not-a-uuid", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn other_owners_tasks_are_not_found() {
    let app = memory_app();
    let a = create(&app, "alice", "A").await;
    let uri = format!("/api/tasks/{}", id_of(&a));

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some("bob"),
        Some(json!({ "title": "hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, bob_tasks) = send(&app, Method::GET, "/api/tasks", Some("bob"), None).await;
    assert!(bob_tasks.as_array().unwrap().is_empty());

    let (_, alice_tasks) = send(&app, Method::GET, "/api/tasks", Some("alice"), None).await;
    assert_eq!(titles(&alice_tasks), ["A"]);
}

// ===========================================================================
// File-backed store
// ===========================================================================

#[tokio::test]
async fn file_backed_router_persists_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    {
        let app = router(Arc::new(Board::new(FileStore::open(dir.path()).unwrap())));
        create(&app, "alice", "durable").await;
    }

    let app = router(Arc::new(Board::new(FileStore::open(dir.path()).unwrap())));
    let (status, tasks) = send(&app, Method::GET, "/api/tasks", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&tasks), ["durable"]);
}
