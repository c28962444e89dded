// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Activity logging tests: points accrual, streaks, stats and history.

use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{empty_request, json_request, register_user, send};

#[tokio::test]
async fn test_each_activity_kind_awards_points() {
    let (app, _) = common::create_test_app().await;
    let (_, token) = register_user(&app, "pts@example.com", "Points User").await;

    let cases = [
        (
            "/api/v1/activities/exercise",
            json!({
                "name": "Squats",
                "category": "strength",
                "duration_seconds": 300,
                "points": 30
            }),
            30,
        ),
        (
            "/api/v1/activities/meal",
            json!({"name": "Salad", "category": "lunch", "calories": 420, "protein": 20.5}),
            10,
        ),
        ("/api/v1/activities/water", json!({"glasses": 3}), 15),
        ("/api/v1/activities/mood", json!({"mood": "happy", "points": 5}), 5),
        ("/api/v1/activities/sleep", json!({"hours": 8.0}), 20),
        (
            "/api/v1/activities/wellness",
            json!({"name": "Meditation", "duration_minutes": 10, "points": 15}),
            15,
        ),
    ];

    let mut expected_total = 0;
    for (uri, payload, points) in cases {
        let (status, body) = send(&app, json_request("POST", uri, Some(&token), payload)).await;
        assert_eq!(status, StatusCode::OK, "{uri}: {body}");
        expected_total += points;
        assert_eq!(body["points_earned"], points, "{uri}");
        assert_eq!(body["total_points"], expected_total, "{uri}");
        assert!(body["message"].as_str().unwrap().contains(&format!("+{points}")));
    }

    let (status, stats) =
        send(&app, empty_request("GET", "/api/v1/activities/stats", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_points"], expected_total);
    assert_eq!(stats["points_this_week"], expected_total);
    assert_eq!(stats["points_this_month"], expected_total);
    assert_eq!(stats["total_exercises"], 1);
    assert_eq!(stats["total_meals_logged"], 1);
    assert_eq!(stats["total_water_glasses"], 3);
    assert_eq!(stats["total_wellness_activities"], 1);
    assert_eq!(stats["favorite_exercise_category"], "strength");
    assert_eq!(stats["current_streak"], 1);
    assert_eq!(stats["longest_streak"], 1);
    assert_eq!(stats["consistency_score"], 3.3);
}

#[tokio::test]
async fn test_water_defaults_to_one_glass() {
    let (app, _) = common::create_test_app().await;
    let (_, token) = register_user(&app, "w@example.com", "Water User").await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/v1/activities/water", Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points_earned"], 5);
}

#[tokio::test]
async fn test_sleep_points_depend_on_duration() {
    let (app, _) = common::create_test_app().await;
    let (_, token) = register_user(&app, "s@example.com", "Sleep User").await;

    for (hours, points) in [(6.5, 10), (4.0, 5), (9.5, 10)] {
        let (_, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/activities/sleep",
                Some(&token),
                json!({"hours": hours}),
            ),
        )
        .await;
        assert_eq!(body["points_earned"], points, "{hours}h");
    }
}

#[tokio::test]
async fn test_out_of_range_input_is_rejected() {
    let (app, _) = common::create_test_app().await;
    let (_, token) = register_user(&app, "bad@example.com", "Bad Input").await;

    let cases = [
        ("/api/v1/activities/water", json!({"glasses": 0})),
        ("/api/v1/activities/water", json!({"glasses": 21})),
        ("/api/v1/activities/sleep", json!({"hours": 25.0})),
        (
            "/api/v1/activities/exercise",
            json!({"name": "Run", "category": "cardio", "duration_seconds": 60, "points": 5000}),
        ),
        (
            "/api/v1/activities/exercise",
            json!({"name": "", "category": "cardio", "duration_seconds": 60, "points": 5}),
        ),
        (
            "/api/v1/activities/exercise",
            json!({"name": "Run", "category": "cardio", "duration_seconds": 86_401, "points": 5}),
        ),
        (
            "/api/v1/activities/wellness",
            json!({"name": "Yoga", "duration_minutes": i64::MAX, "points": 5}),
        ),
        (
            "/api/v1/activities/wellness",
            json!({"name": "Yoga", "duration_minutes": 1441, "points": 5}),
        ),
    ];

    for (uri, payload) in cases {
        let (status, _) = send(&app, json_request("POST", uri, Some(&token), payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
    }

    let (_, stats) =
        send(&app, empty_request("GET", "/api/v1/activities/stats", Some(&token))).await;
    assert_eq!(stats["total_points"], 0);
}

#[tokio::test]
async fn test_level_rises_with_points() {
    let (app, _) = common::create_test_app().await;
    let (_, token) = register_user(&app, "lvl@example.com", "Leveller").await;

    for _ in 0..3 {
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/activities/exercise",
                Some(&token),
                json!({
                    "name": "Marathon",
                    "category": "cardio",
                    "duration_seconds": 10800,
                    "points": 200
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, me) = send(&app, empty_request("GET", "/api/v1/auth/me", Some(&token))).await;
    assert_eq!(me["total_points"], 600);
    assert_eq!(me["level"], 2);
}

#[tokio::test]
async fn test_progress_and_recent_history() {
    let (app, _) = common::create_test_app().await;
    let (_, token) = register_user(&app, "hist@example.com", "History User").await;

    send(
        &app,
        json_request("POST", "/api/v1/activities/water", Some(&token), json!({"glasses": 2})),
    )
    .await;
    send(
        &app,
        json_request(
            "POST",
            "/api/v1/activities/meal",
            Some(&token),
            json!({"name": "Oats", "category": "breakfast", "calories": 300}),
        ),
    )
    .await;

    let (status, progress) = send(
        &app,
        empty_request("GET", "/api/v1/activities/progress?days=7", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["days"], 7);
    let days = progress["progress"].as_array().unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["total_points"], 20);
    assert_eq!(days[0]["nutrition_points"], 10);
    assert_eq!(days[0]["wellness_points"], 10);
    assert_eq!(days[0]["water_glasses"], 2);
    assert_eq!(days[0]["total_calories"], 300);

    let (status, recent) = send(
        &app,
        empty_request("GET", "/api/v1/activities/recent?limit=1", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let activities = recent["activities"].as_array().unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0]["type"], "meal");
    assert_eq!(activities[0]["name"], "Oats");
    assert_eq!(activities[0]["points"], 10);

    let (status, _) = send(
        &app,
        empty_request("GET", "/api/v1/activities/progress?days=91", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_activity_routes_require_auth() {
    let (app, _) = common::create_test_app().await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/v1/activities/water", None, json!({"glasses": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = send(&app, empty_request("GET", "/api/v1/activities/stats", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
