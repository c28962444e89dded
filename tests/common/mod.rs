// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use runza_api::config::Config;
use runza_api::db::Database;
use runza_api::middleware::auth::{create_jwt, TokenType};
use runza_api::models::{NewUser, User};
use runza_api::routes::create_router;
use runza_api::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app on a fresh in-memory database with the exercise
/// catalog seeded. Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default()).await
}

#[allow(dead_code)]
pub async fn create_test_app_with_config(config: Config) -> (Router, Arc<AppState>) {
    let db = Database::in_memory()
        .await
        .expect("Failed to open in-memory database");
    let state = seeded_state(config, db).await;
    (create_router(state.clone()), state)
}

/// Like [`create_test_app`], backed by a database file that other
/// connections can reach (see [`deactivate_user`]).
#[allow(dead_code)]
pub async fn create_test_app_on_file() -> (tempfile::TempDir, Router, Arc<AppState>) {
    let (dir, db) = file_database().await;
    let state = seeded_state(Config::test_default(), db).await;
    (dir, create_router(state.clone()), state)
}

async fn seeded_state(config: Config, db: Database) -> Arc<AppState> {
    let state = Arc::new(AppState::new(config, db).expect("Failed to build state"));
    state
        .pose_service
        .seed_default_catalog()
        .await
        .expect("Failed to seed catalog");
    state
}

fn database_url(dir: &tempfile::TempDir) -> String {
    format!("sqlite://{}", dir.path().join("runza.db").display())
}

/// Disable an account through a separate connection to the database file.
#[allow(dead_code)]
pub async fn deactivate_user(dir: &tempfile::TempDir, user_id: i64) {
    let pool = sqlx::SqlitePool::connect(&database_url(dir))
        .await
        .expect("Failed to open second connection");
    sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
        .bind(user_id)
        .execute(&pool)
        .await
        .expect("Failed to deactivate user");
    pool.close().await;
}

/// Serve `router` on an ephemeral local port and return its base URL.
#[allow(dead_code)]
pub async fn spawn_stub_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Stub server has no address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{}", addr)
}

/// Open a database file in a fresh temp directory with a full connection
/// pool. Keep the returned directory alive for the duration of the test.
#[allow(dead_code)]
pub async fn file_database() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db = Database::connect(&database_url(&dir))
        .await
        .expect("Failed to open file database");
    (dir, db)
}

/// Insert a user directly, bypassing the API.
#[allow(dead_code)]
pub async fn insert_user(db: &Database, email: &str, full_name: &str) -> User {
    db.create_user(&NewUser {
        email: email.to_string(),
        hashed_password: "unused".to_string(),
        full_name: full_name.to_string(),
        birth_date: None,
        avatar_url: None,
        is_verified: false,
    })
    .await
    .expect("Failed to create test user")
}

/// Create a signed access token for `user_id`.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: i64, signing_key: &[u8]) -> String {
    create_jwt(user_id, TokenType::Access, 3600, signing_key).expect("Failed to create JWT")
}

/// Build a JSON request, optionally authenticated with a bearer token.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build a bodyless request, optionally authenticated with a bearer token.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send one request and return status and JSON body (`Null` when empty).
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Register a user through the API and return `(user_id, access_token)`.
#[allow(dead_code)]
pub async fn register_user(app: &Router, email: &str, full_name: &str) -> (i64, String) {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            serde_json::json!({
                "email": email,
                "password": "password123",
                "full_name": full_name,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

    let user_id = body["user"]["id"].as_i64().unwrap();
    let token = body["tokens"]["access_token"].as_str().unwrap().to_string();
    (user_id, token)
}
