// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Pose analysis routes (public).

use crate::error::Result;
use crate::models::exercise::ExerciseDetection;
use crate::models::pose::{Landmark, PoseAnalysis};
use crate::services::pose::PoseInput;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pose/analyze", post(analyze_pose))
        .route("/pose/health", get(pose_health))
        .route("/pose/exercises", get(list_exercises))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AnalyzeRequest {
    /// Landmarks detected on the device
    #[validate(length(max = 33))]
    pub landmarks: Option<Vec<Landmark>>,
    /// Camera frame, raw base64 or a `data:` URI
    pub image_base64: Option<String>,
    /// Restrict matching to one catalog exercise
    #[validate(length(min = 1, max = 100))]
    pub exercise: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub message: String,
    pub landmarks: Option<Vec<Landmark>>,
    pub analysis: PoseAnalysis,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PoseHealthResponse {
    pub status: String,
    pub landmark_detection_available: bool,
    pub exercises_loaded: usize,
    pub exercises: Vec<String>,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExerciseListResponse {
    pub success: bool,
    pub count: usize,
    pub exercises: Vec<ExerciseDetection>,
}

/// Analyse a pose from device landmarks (or an image, answered in demo mode).
#[utoipa::path(
    post,
    path = "/api/v1/pose/analyze",
    tag = "pose",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis result", body = AnalyzeResponse),
        (status = 400, description = "Neither landmarks nor image supplied"),
        (status = 404, description = "Unknown exercise")
    )
)]
pub async fn analyze_pose(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>> {
    req.validate()?;
    let outcome = state
        .pose_service
        .analyze(PoseInput {
            landmarks: req.landmarks,
            image_base64: req.image_base64,
            exercise: req.exercise,
        })
        .await?;

    Ok(Json(AnalyzeResponse {
        success: outcome.success,
        message: outcome.message,
        landmarks: outcome.landmarks,
        analysis: outcome.analysis,
    }))
}

/// Analyzer status and loaded catalog.
#[utoipa::path(
    get,
    path = "/api/v1/pose/health",
    tag = "pose",
    responses((status = 200, description = "Analyzer status", body = PoseHealthResponse))
)]
pub async fn pose_health(State(state): State<Arc<AppState>>) -> Result<Json<PoseHealthResponse>> {
    let exercises: Vec<String> = state
        .pose_service
        .exercises()
        .await?
        .into_iter()
        .map(|exercise| exercise.display_name)
        .collect();

    Ok(Json(PoseHealthResponse {
        status: "healthy".to_string(),
        landmark_detection_available: false,
        exercises_loaded: exercises.len(),
        exercises,
        message: "Send device-detected landmarks to /pose/analyze".to_string(),
    }))
}

/// Active exercises in the catalog.
#[utoipa::path(
    get,
    path = "/api/v1/pose/exercises",
    tag = "pose",
    responses((status = 200, description = "Exercise catalog", body = ExerciseListResponse))
)]
pub async fn list_exercises(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ExerciseListResponse>> {
    let exercises = state.pose_service.exercises().await?;
    Ok(Json(ExerciseListResponse {
        success: true,
        count: exercises.len(),
        exercises,
    }))
}
