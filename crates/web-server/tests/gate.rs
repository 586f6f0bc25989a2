//! Router tests for the session/role gate.
//!
//! The state is backed by a lazily-connected pool that points nowhere, so
//! only routes that are decided before any query runs are exercised here.
//! Requests go through `tower::ServiceExt::oneshot` without a network server.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use configuration::{Config, DatabaseSettings};
use core_types::Role;
use database::DbRepository;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;
use web_server::session::SessionUser;
use web_server::{build_router, AppState};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn test_state() -> Arc<AppState> {
    let settings = DatabaseSettings {
        url: Some("postgres://nobody@127.0.0.1:1/unreachable".to_string()),
        ..DatabaseSettings::default()
    };
    let pool = database::connect_lazy(&settings).expect("lazy pool");
    Arc::new(AppState::new(DbRepository::new(pool), Config::default()))
}

fn login_as(state: &AppState, role: Role) -> (Uuid, String) {
    let id = state.sessions.create(SessionUser {
        user_id: 7,
        display_name: "Test User".to_string(),
        role,
    });
    (id, format!("{}={}", state.cookie_name(), id))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap_or(json!(null));
    (status, location, json)
}

fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(path: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_is_public() {
    let app = build_router(test_state());
    let response = app.oneshot(get("/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn anonymous_visitors_are_sent_to_login() {
    let app = build_router(test_state());
    for path in ["/dashboard", "/elements", "/my-experiments", "/reports", "/my_students"] {
        let (status, location, _) = send(&app, get(path, None)).await;
        assert_eq!(status, StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location.as_deref(), Some("/login"), "{path}");
    }
}

#[tokio::test]
async fn unknown_session_ids_are_anonymous() {
    let state = test_state();
    let app = build_router(state.clone());
    let cookie = format!("{}={}", state.cookie_name(), Uuid::new_v4());
    let (status, location, _) = send(&app, get("/dashboard", Some(&cookie))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/login"));
}

#[tokio::test]
async fn students_are_redirected_from_teacher_routes() {
    let state = test_state();
    let app = build_router(state.clone());
    let (_, cookie) = login_as(&state, Role::Student);

    let (status, location, _) = send(&app, get("/reports", Some(&cookie))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/login"));

    let delete = Request::builder()
        .method("POST")
        .uri("/reactions/1/delete")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let (status, location, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/login"));

    let (status, _, _) = send(
        &app,
        post_json("/api/reaction-experiment", Some(&cookie), json!({ "element1_id": 1, "element2_id": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn teachers_reach_the_report_menu() {
    let state = test_state();
    let app = build_router(state.clone());
    let (_, cookie) = login_as(&state, Role::Teacher);

    let (status, _, body) = send(&app, get("/reports", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    let reports = body["reports"].as_array().unwrap();
    assert!(reports.iter().any(|r| r == "/reports/teacher_statistics"));
    assert_eq!(body["teacher"], "Test User");
}

#[tokio::test]
async fn same_element_reaction_is_a_bad_request() {
    let state = test_state();
    let app = build_router(state.clone());
    let (_, cookie) = login_as(&state, Role::Teacher);

    let (status, _, body) = send(
        &app,
        post_json(
            "/api/reaction-experiment",
            Some(&cookie),
            json!({ "element1_id": 3, "element2_id": 3 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn check_reaction_requires_two_symbols() {
    let state = test_state();
    let app = build_router(state.clone());
    let (_, cookie) = login_as(&state, Role::Student);

    let (status, _, body) = send(
        &app,
        post_json("/api/check-reaction", Some(&cookie), json!({ "element1": "H", "element2": " " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _, body) = send(
        &app,
        post_json("/api/check-reaction", Some(&cookie), json!({ "element1": "na", "element2": "NA" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn logout_clears_the_session() {
    let state = test_state();
    let app = build_router(state.clone());
    let (id, cookie) = login_as(&state, Role::Teacher);

    let (status, location, _) = send(&app, get("/logout", Some(&cookie))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));
    assert!(state.sessions.get(&id).is_none());

    let (status, location, _) = send(&app, get("/reports", Some(&cookie))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/login"));
}
