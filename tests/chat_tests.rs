// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Contacts and direct messaging tests.

use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{empty_request, json_request, register_user, send};

#[tokio::test]
async fn test_search_flags_existing_contacts() {
    let (app, _) = common::create_test_app().await;
    let (_, ana) = register_user(&app, "ana@example.com", "Ana Runner").await;
    register_user(&app, "bruno@example.com", "Bruno Lifter").await;
    register_user(&app, "carla@example.com", "Carla Runner").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/chat/contacts",
            Some(&ana),
            json!({"email": "carla@example.com"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Carla Runner");
    assert_eq!(body["email"], "carla@example.com");
    assert_eq!(body["is_online"], false);
    assert_eq!(body["unread_count"], 0);
    assert!(body["conversation_id"].is_null());
    assert!(body["last_message"].is_null());

    let (status, hits) = send(
        &app,
        empty_request("GET", "/api/v1/chat/search?q=runner", Some(&ana)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let hits = hits.as_array().unwrap();
    // The searcher is never part of the results
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["email"], "carla@example.com");
    assert_eq!(hits[0]["is_contact"], true);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let (app, _) = common::create_test_app().await;
    let (_, ana) = register_user(&app, "ana@example.com", "Ana").await;
    register_user(&app, "bruno@example.com", "Bruno").await;

    let (status, hits) =
        send(&app, empty_request("GET", "/api/v1/chat/search?q=%25", Some(&ana))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(hits.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_contact_unknown_or_self() {
    let (app, _) = common::create_test_app().await;
    let (_, ana) = register_user(&app, "ana@example.com", "Ana").await;

    for email in ["nobody@example.com", "ana@example.com"] {
        let (status, body) = send(
            &app,
            json_request("POST", "/api/v1/chat/contacts", Some(&ana), json!({"email": email})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{email}");
        assert_eq!(body["error"], "not_found");
    }
}

#[tokio::test]
async fn test_conversation_flow_and_unread_counts() {
    let (app, _) = common::create_test_app().await;
    let (ana_id, ana) = register_user(&app, "ana@example.com", "Ana").await;
    let (bruno_id, bruno) = register_user(&app, "bruno@example.com", "Bruno").await;

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

    for content in ["Hi Bruno", "  Run tomorrow?  "] {
        let (status, message) = send(
            &app,
            json_request(
                "POST",
                &format!("/api/v1/chat/conversations/{bruno_id}/messages"),
                Some(&ana),
                json!({"content": content}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(message["is_me"], true);
        assert_eq!(message["sender_id"], ana_id);
    }

    // Contacts are symmetric: Bruno sees Ana with two unread messages
    let (status, contacts) =
        send(&app, empty_request("GET", "/api/v1/chat/contacts", Some(&bruno))).await;
    assert_eq!(status, StatusCode::OK);
    let contacts = contacts.as_array().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["id"], ana_id);
    assert_eq!(contacts[0]["unread_count"], 2);
    assert_eq!(contacts[0]["last_message"], "Run tomorrow?");

    let (status, messages) = send(
        &app,
        empty_request(
            "GET",
            &format!("/api/v1/chat/conversations/{ana_id}"),
            Some(&bruno),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["content"], "Hi Bruno");
    assert_eq!(messages[1]["content"], "Run tomorrow?");
    assert_eq!(messages[0]["is_me"], false);

    // Reading the conversation clears the unread count
    let (_, contacts) =
        send(&app, empty_request("GET", "/api/v1/chat/contacts", Some(&bruno))).await;
    assert_eq!(contacts[0]["unread_count"], 0);

    // Paging backwards from the newest message
    let newest = messages[1]["id"].as_i64().unwrap();
    let (_, older) = send(
        &app,
        empty_request(
            "GET",
            &format!("/api/v1/chat/conversations/{ana_id}?before_id={newest}"),
            Some(&bruno),
        ),
    )
    .await;
    let older = older.as_array().unwrap();
    assert_eq!(older.len(), 1);
    assert_eq!(older[0]["content"], "Hi Bruno");
}

#[tokio::test]
async fn test_message_validation() {
    let (app, _) = common::create_test_app().await;
    let (_, ana) = register_user(&app, "ana@example.com", "Ana").await;
    let (bruno_id, _) = register_user(&app, "bruno@example.com", "Bruno").await;
    let uri = format!("/api/v1/chat/conversations/{bruno_id}/messages");

    let (status, _) = send(
        &app,
        json_request("POST", &uri, Some(&ana), json!({"content": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request("POST", &uri, Some(&ana), json!({"content": "x".repeat(2001)})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/chat/conversations/9999/messages",
            Some(&ana),
            json!({"content": "hello?"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_presence_toggles() {
    let (app, state) = common::create_test_app().await;
    let (ana_id, ana) = register_user(&app, "ana@example.com", "Ana").await;

    let (status, body) =
        send(&app, empty_request("POST", "/api/v1/chat/online", Some(&ana))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
    assert!(state.db.get_user(ana_id).await.unwrap().unwrap().is_online);

    let (_, body) = send(&app, empty_request("POST", "/api/v1/chat/offline", Some(&ana))).await;
    assert_eq!(body["status"], "offline");

    let user = state.db.get_user(ana_id).await.unwrap().unwrap();
    assert!(!user.is_online);
    assert!(user.last_seen.is_some());
}
