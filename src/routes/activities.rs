// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Activity logging and statistics routes (authenticated).

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Activity, ActivityType, DailyStats, MoodLevel, NewActivity, UserStats};
use crate::services::activity::{
    exercise_activity, meal_activity, mood_activity, sleep_activity, water_activity,
    wellness_activity, ExerciseLog, MealLog, WellnessLog,
};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Activity routes. The auth middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/activities/exercise", post(log_exercise))
        .route("/activities/meal", post(log_meal))
        .route("/activities/water", post(log_water))
        .route("/activities/mood", post(log_mood))
        .route("/activities/sleep", post(log_sleep))
        .route("/activities/wellness", post(log_wellness))
        .route("/activities/stats", get(get_stats))
        .route("/activities/progress", get(get_progress))
        .route("/activities/recent", get(get_recent))
}

// ─── Request / Response Types ────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ExerciseRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(range(min = 0, max = 86_400))]
    pub duration_seconds: i64,
    #[validate(length(max = 20))]
    pub difficulty: Option<String>,
    #[validate(range(min = 0, max = 1000))]
    pub points: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MealRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(range(min = 0, max = 20_000))]
    pub calories: i64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub protein: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub carbs: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub fat: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct WaterRequest {
    #[serde(default = "one_glass")]
    #[validate(range(min = 1, max = 20))]
    pub glasses: i64,
}

fn one_glass() -> i64 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MoodRequest {
    pub mood: MoodLevel,
    #[serde(default)]
    #[validate(range(min = 0, max = 1000))]
    pub points: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SleepRequest {
    #[validate(range(min = 0.0, max = 24.0))]
    pub hours: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct WellnessRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = 1440))]
    pub duration_minutes: Option<i64>,
    #[validate(range(min = 0, max = 1000))]
    pub points: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PointsResponse {
    pub points_earned: i64,
    pub total_points: i64,
    pub message: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProgressParams {
    #[serde(default = "default_days")]
    #[validate(range(min = 1, max = 90))]
    pub days: u64,
}

fn default_days() -> u64 {
    7
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DayProgress {
    pub date: String,
    pub total_points: i64,
    pub exercise_points: i64,
    pub nutrition_points: i64,
    pub wellness_points: i64,
    pub exercises_completed: i64,
    pub meals_logged: i64,
    pub water_glasses: i64,
    pub total_calories: i64,
    pub mood: Option<String>,
    pub sleep_hours: Option<f64>,
    pub wellness_activities: i64,
}

impl From<DailyStats> for DayProgress {
    fn from(day: DailyStats) -> Self {
        Self {
            date: day.date,
            total_points: day.total_points,
            exercise_points: day.exercise_points,
            nutrition_points: day.nutrition_points,
            wellness_points: day.wellness_points,
            exercises_completed: day.exercises_completed,
            meals_logged: day.meals_logged,
            water_glasses: day.water_glasses,
            total_calories: day.total_calories,
            mood: day.mood,
            sleep_hours: day.sleep_hours,
            wellness_activities: day.wellness_activities,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressResponse {
    pub days: u64,
    pub progress: Vec<DayProgress>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentParams {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 50))]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentActivity {
    pub id: i64,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub name: String,
    pub points: i64,
    pub created_at: String,
}

impl From<Activity> for RecentActivity {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id,
            activity_type: activity.activity_type.to_string(),
            name: activity.name,
            points: activity.points_earned,
            created_at: activity.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentResponse {
    pub activities: Vec<RecentActivity>,
}

// ─── Logging Handlers ────────────────────────────────────────

async fn record(
    state: &AppState,
    user: &AuthUser,
    activity: NewActivity,
) -> Result<Json<PointsResponse>> {
    let label = match activity.activity_type {
        ActivityType::Exercise => "Exercise logged",
        ActivityType::Meal => "Meal logged",
        ActivityType::Water => "Water logged",
        ActivityType::Mood => "Mood logged",
        ActivityType::Sleep => "Sleep logged",
        ActivityType::Wellness => "Wellness activity logged",
    };

    let recorded = state.activity_service.log(user.user_id, activity).await?;
    Ok(Json(PointsResponse {
        points_earned: recorded.points_earned,
        total_points: recorded.total_points,
        message: format!("{}: +{} points", label, recorded.points_earned),
    }))
}

/// Log a completed exercise.
#[utoipa::path(
    post,
    path = "/api/v1/activities/exercise",
    tag = "activities",
    security(("bearer" = [])),
    request_body = ExerciseRequest,
    responses((status = 200, description = "Points awarded", body = PointsResponse))
)]
pub async fn log_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ExerciseRequest>,
) -> Result<Json<PointsResponse>> {
    req.validate()?;
    let activity = exercise_activity(ExerciseLog {
        name: req.name,
        category: req.category,
        duration_seconds: req.duration_seconds,
        difficulty: req.difficulty,
        points: req.points,
    });
    record(&state, &user, activity).await
}

/// Log a meal (fixed points).
#[utoipa::path(
    post,
    path = "/api/v1/activities/meal",
    tag = "activities",
    security(("bearer" = [])),
    request_body = MealRequest,
    responses((status = 200, description = "Points awarded", body = PointsResponse))
)]
pub async fn log_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<MealRequest>,
) -> Result<Json<PointsResponse>> {
    req.validate()?;
    let activity = meal_activity(MealLog {
        name: req.name,
        category: req.category,
        calories: req.calories,
        protein: req.protein,
        carbs: req.carbs,
        fat: req.fat,
    });
    record(&state, &user, activity).await
}

/// Log glasses of water.
#[utoipa::path(
    post,
    path = "/api/v1/activities/water",
    tag = "activities",
    security(("bearer" = [])),
    request_body = WaterRequest,
    responses((status = 200, description = "Points awarded", body = PointsResponse))
)]
pub async fn log_water(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<WaterRequest>,
) -> Result<Json<PointsResponse>> {
    req.validate()?;
    record(&state, &user, water_activity(req.glasses)).await
}

/// Log the current mood.
#[utoipa::path(
    post,
    path = "/api/v1/activities/mood",
    tag = "activities",
    security(("bearer" = [])),
    request_body = MoodRequest,
    responses((status = 200, description = "Points awarded", body = PointsResponse))
)]
pub async fn log_mood(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<MoodRequest>,
) -> Result<Json<PointsResponse>> {
    req.validate()?;
    record(&state, &user, mood_activity(req.mood, req.points)).await
}

/// Log last night's sleep.
#[utoipa::path(
    post,
    path = "/api/v1/activities/sleep",
    tag = "activities",
    security(("bearer" = [])),
    request_body = SleepRequest,
    responses((status = 200, description = "Points awarded", body = PointsResponse))
)]
pub async fn log_sleep(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SleepRequest>,
) -> Result<Json<PointsResponse>> {
    req.validate()?;
    record(&state, &user, sleep_activity(req.hours)).await
}

/// Log a wellness activity (meditation, stretching, ...).
#[utoipa::path(
    post,
    path = "/api/v1/activities/wellness",
    tag = "activities",
    security(("bearer" = [])),
    request_body = WellnessRequest,
    responses((status = 200, description = "Points awarded", body = PointsResponse))
)]
pub async fn log_wellness(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<WellnessRequest>,
) -> Result<Json<PointsResponse>> {
    req.validate()?;
    let activity = wellness_activity(WellnessLog {
        name: req.name,
        description: req.description,
        duration_minutes: req.duration_minutes,
        points: req.points,
    })?;
    record(&state, &user, activity).await
}

// ─── Query Handlers ──────────────────────────────────────────

/// Dashboard statistics.
#[utoipa::path(
    get,
    path = "/api/v1/activities/stats",
    tag = "activities",
    security(("bearer" = [])),
    responses((status = 200, description = "User statistics", body = UserStats))
)]
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserStats>> {
    Ok(Json(state.activity_service.stats(user.user_id).await?))
}

/// Daily ledger for the last `days` days.
#[utoipa::path(
    get,
    path = "/api/v1/activities/progress",
    tag = "activities",
    security(("bearer" = [])),
    params(ProgressParams),
    responses((status = 200, description = "Daily progress, oldest first", body = ProgressResponse))
)]
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ProgressParams>,
) -> Result<Json<ProgressResponse>> {
    params.validate()?;
    let progress = state
        .activity_service
        .progress(user.user_id, params.days)
        .await?
        .into_iter()
        .map(DayProgress::from)
        .collect();

    Ok(Json(ProgressResponse {
        days: params.days,
        progress,
    }))
}

/// Most recent activities, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/activities/recent",
    tag = "activities",
    security(("bearer" = [])),
    params(RecentParams),
    responses((status = 200, description = "Recent activities", body = RecentResponse))
)]
pub async fn get_recent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<RecentParams>,
) -> Result<Json<RecentResponse>> {
    params.validate()?;
    let activities = state
        .activity_service
        .recent(user.user_id, params.limit)
        .await?
        .into_iter()
        .map(RecentActivity::from)
        .collect();

    Ok(Json(RecentResponse { activities }))
}
