// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Account deletion removes every record owned by the user.

use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{empty_request, json_request, register_user, send};

#[tokio::test]
async fn test_delete_user_removes_all_records() {
    let (app, state) = common::create_test_app().await;
    let (ana_id, ana) = register_user(&app, "ana@example.com", "Ana Delete").await;
    let (bruno_id, bruno) = register_user(&app, "bruno@example.com", "Bruno Stays").await;

    // 1. Activities and ledger rows
    send(
        &app,
        json_request(
            "POST",
            "/api/v1/activities/exercise",
            Some(&ana),
            json!({"name": "Run", "category": "cardio", "duration_seconds": 1200, "points": 40}),
        ),
    )
    .await;

    // 2. Contact and a conversation
    send(
        &app,
        json_request(
            "POST",
            "/api/v1/chat/contacts",
            Some(&ana),
            json!({"email": "bruno@example.com"}),
        ),
    )
    .await;
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/v1/chat/conversations/{bruno_id}/messages"),
            Some(&ana),
            json!({"content": "Bye!"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // 3. Delete
    let (status, _) = send(&app, empty_request("DELETE", "/api/v1/auth/me", Some(&ana))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // 4. Verify
    assert!(state.db.get_user(ana_id).await.unwrap().is_none());
    assert!(state.db.recent_activities(ana_id, 50).await.unwrap().is_empty());
    assert!(state
        .db
        .daily_progress(ana_id, chrono::Utc::now(), 30)
        .await
        .unwrap()
        .is_empty());
    assert!(state
        .db
        .find_direct_conversation(bruno_id, ana_id)
        .await
        .unwrap()
        .is_none());

    // The remaining user no longer sees the deleted contact
    let (status, contacts) =
        send(&app, empty_request("GET", "/api/v1/chat/contacts", Some(&bruno))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(contacts.as_array().unwrap().is_empty());

    // Deleting the same account twice fails
    let token = common::create_test_jwt(ana_id, &state.config.jwt_signing_key);
    let (status, _) = send(&app, empty_request("DELETE", "/api/v1/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
