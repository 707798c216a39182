use std::sync::Arc;

use axum::body::Body;
use http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use studio_admin::test_util::{create_test_state, seed_user};
use studio_admin::{app, AppState};
use studio_common::Role;
use tower::ServiceExt;

async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    if body.is_some() {
        builder = builder.header("Content-Type", "application/json");
    }

    let request = builder
        .body(match body {
            Some(b) => Body::from(b.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn admin_setup() -> (Arc<AppState>, axum::Router, String) {
    let state = create_test_state();
    let (_, token) = seed_user(&state, "Admin User", "admin@studio.com", "admin123", Role::Admin).await;
    let router = app(state.clone());
    (state, router, token)
}

#[tokio::test]
async fn test_health_reports_backend() {
    let state = create_test_state();
    let (status, body) = send(&app(state), Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "local");
}

#[tokio::test]
async fn test_login_returns_token_and_profile() {
    let (_, app, _) = admin_setup().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "admin@studio.com", "password": "admin123"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["initials"], "AU");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let (_, app, _) = admin_setup().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "admin@studio.com", "password": "nope"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["type"], "invalid_credentials");
}

#[tokio::test]
async fn test_admin_api_requires_auth() {
    let state = create_test_state();
    let app = app(state);

    for uri in ["/admin/api/users", "/admin/api/events", "/admin/api/stats"] {
        let (status, _) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let (status, _) = send(&app, Method::GET, "/admin/api/users", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_lifecycle_through_api() {
    let (_, app, token) = admin_setup().await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/admin/api/users",
        Some(&token),
        Some(json!({"name": "Ana", "email": "ana@x.com", "password": "p1", "role": "user", "status": "active"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (_, listed) = send(&app, Method::GET, "/admin/api/users", Some(&token), None).await;
    assert_eq!(listed["total"], 2);
    let ana: Vec<&Value> = listed["users"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|u| u["email"] == "ana@x.com")
        .collect();
    assert_eq!(ana.len(), 1);
    assert_eq!(ana[0]["role"], "user");

    let uri = format!("/admin/api/users/{}", id);
    let (status, updated) = send(&app, Method::PATCH, &uri, Some(&token), Some(json!({"role": "moderator"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], "moderator");
    assert_eq!(updated["email"], "ana@x.com");

    let (status, deleted) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["deleted"], true);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_admin_cannot_manage_users() {
    let (state, app, _) = admin_setup().await;
    let (_, token) = seed_user(&state, "Mod", "mod@studio.com", "mod123", Role::Moderator).await;

    let (status, _) = send(&app, Method::GET, "/admin/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/admin/api/users",
        Some(&token),
        Some(json!({"name": "Eve", "email": "eve@x.com", "password": "e"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["type"], "forbidden");
    assert_eq!(state.directory.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_unknown_user_is_404() {
    let (_, app, token) = admin_setup().await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/admin/api/users/does-not-exist",
        Some(&token),
        Some(json!({"status": "inactive"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found");
}

#[tokio::test]
async fn test_create_user_validation() {
    let (_, app, token) = admin_setup().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/admin/api/users",
        Some(&token),
        Some(json!({"name": "", "email": "x@x.com", "password": "p"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_input");
}

#[tokio::test]
async fn test_calendar_and_stats() {
    let (_, app, token) = admin_setup().await;

    let (status, event) = send(
        &app,
        Method::POST,
        "/admin/api/events",
        Some(&token),
        Some(json!({
            "title": "Gravação Estúdio",
            "description": "Podcast corporativo",
            "date": "2099-01-17",
            "time": "09:00",
            "type": "project",
            "priority": "medium"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event["type"], "project");

    let (_, by_date) = send(&app, Method::GET, "/admin/api/events?date=2099-01-17", Some(&token), None).await;
    assert_eq!(by_date["total"], 1);

    let (_, other_day) = send(&app, Method::GET, "/admin/api/events?date=2099-01-18", Some(&token), None).await;
    assert_eq!(other_day["total"], 0);

    let (_, upcoming) = send(&app, Method::GET, "/admin/api/events/upcoming", Some(&token), None).await;
    assert_eq!(upcoming["events"][0]["title"], "Gravação Estúdio");

    let (status, stats) = send(&app, Method::GET, "/admin/api/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_users"], 1);
    assert_eq!(stats["admins"], 1);
    assert_eq!(stats["project_events"], 1);
}

async fn send_raw(app: &axum::Router, method: Method, uri: &str, token: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_malformed_body_is_json_400() {
    let (state, app, token) = admin_setup().await;

    let (status, body) = send_raw(&app, Method::POST, "/admin/api/users", &token, "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "bad_request");
    assert!(body["error"]["message"].as_str().is_some_and(|m| !m.is_empty()));

    let (status, body) = send_raw(&app, Method::POST, "/auth/login", &token, "[]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "bad_request");

    assert_eq!(state.directory.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_role_is_bad_request() {
    let (state, app, token) = admin_setup().await;
    let (user, _) = seed_user(&state, "Ana", "ana@x.com", "p1", Role::User).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/admin/api/users/{}", user.id),
        Some(&token),
        Some(json!({"role": "owner"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "bad_request");
    assert_eq!(state.directory.get(&user.id).await.unwrap().role, Role::User);
}

#[tokio::test]
async fn test_bad_date_query_is_json_400() {
    let (_, app, token) = admin_setup().await;

    let (status, body) = send(&app, Method::GET, "/admin/api/events?date=tomorrow", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "bad_request");

    let (status, body) = send(&app, Method::GET, "/admin/api/events/upcoming?limit=-1", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "bad_request");
}

#[tokio::test]
async fn test_session_user_reaches_request_logger() {
    let (state, app, token) = admin_setup().await;
    let admin = state.directory.list().await.unwrap().remove(0);

    let request = Request::builder()
        .uri("/admin/api/stats")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let session = response.extensions().get::<studio_admin::SessionUser>().unwrap();
    assert_eq!(session.id, admin.id);
}
