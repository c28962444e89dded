// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! HTTP route handlers.

pub mod activities;
pub mod auth;
pub mod chat;
pub mod pose;

use crate::middleware::auth::require_auth;
use crate::AppState;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_redoc::{Redoc, Servable as _};
use utoipa_scalar::{Scalar, Servable as _};

#[derive(Serialize, ToSchema)]
pub struct RootResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub environment: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub api: String,
    pub version: String,
    pub environment: String,
    pub debug: bool,
}

/// Service banner.
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "API is running", body = RootResponse))
)]
async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    Json(RootResponse {
        status: "healthy".to_string(),
        message: "RunZa API is running".to_string(),
        version: state.config.version.clone(),
        environment: state.config.environment.clone(),
    })
}

/// Health check for monitoring; reports 503 when the database is unreachable.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            api: state.config.project_name.clone(),
            version: state.config.version.clone(),
            environment: state.config.environment.clone(),
            debug: state.config.debug,
        }),
    )
}

/// Registers the bearer scheme referenced by `security(("bearer" = []))`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                Http::builder()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RunZa API",
        description = "Fitness tracking with points, chat and pose analysis"
    ),
    paths(
        root,
        health_check,
        auth::register,
        auth::login,
        auth::google_login,
        auth::refresh,
        auth::logout,
        auth::get_me,
        auth::update_me,
        auth::delete_me,
        activities::log_exercise,
        activities::log_meal,
        activities::log_water,
        activities::log_mood,
        activities::log_sleep,
        activities::log_wellness,
        activities::get_stats,
        activities::get_progress,
        activities::get_recent,
        chat::search_users,
        chat::list_contacts,
        chat::add_contact,
        chat::get_conversation,
        chat::send_message,
        chat::go_online,
        chat::go_offline,
        pose::analyze_pose,
        pose::pose_health,
        pose::list_exercises,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Service status"),
        (name = "auth", description = "Accounts and sessions"),
        (name = "activities", description = "Activity logging and points"),
        (name = "chat", description = "Contacts and direct messages"),
        (name = "pose", description = "Exercise pose analysis"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the CORS layer for the configured browser origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.allowed_origins());

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/openapi.json", get(openapi_json))
        .merge(auth::routes())
        .merge(pose::routes());

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(activities::routes())
        .merge(chat::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api = public_routes.merge(protected_routes);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest(&state.config.api_prefix, api)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
