// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Registration, sign-in and profile routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::{AuthUser, AUTH_COOKIE};
use crate::models::{ProfileUpdate, User};
use crate::services::TokenPair;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Public sign-in routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/google", post(google_login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// Routes for the signed-in user. Auth middleware is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/me", get(get_me).patch(update_me).delete(delete_me))
}

// ─── Request / Response Types ────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 100))]
    pub password: String,
    #[validate(custom(function = "validate_full_name"))]
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
}

/// Names are stored trimmed, so the length bounds apply after trimming.
fn validate_full_name(name: &str) -> std::result::Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if (2..=255).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::new("length").with_message("must be 2 to 255 characters".into()))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GoogleLoginRequest {
    /// Google OAuth access token obtained by the client
    #[validate(length(min = 1))]
    pub token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "validate_full_name"))]
    pub full_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[validate(range(exclusive_min = 0.0, exclusive_max = 500.0))]
    pub weight_kg: Option<f64>,
    #[validate(range(exclusive_min = 0.0, exclusive_max = 300.0))]
    pub height_cm: Option<f64>,
    #[validate(length(max = 500))]
    pub avatar_url: Option<String>,
}

/// Public view of a user.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub birth_date: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub total_points: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub level: i64,
    pub created_at: String,
    pub last_login: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            birth_date: user.birth_date,
            weight_kg: user.weight_kg,
            height_cm: user.height_cm,
            avatar_url: user.avatar_url,
            is_active: user.is_active,
            is_verified: user.is_verified,
            total_points: user.total_points,
            current_streak: user.current_streak,
            longest_streak: user.longest_streak,
            level: user.level,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserResponse,
    pub tokens: TokenPair,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ─── Session Cookie ──────────────────────────────────────────

/// Attach the access token as an HttpOnly cookie for browser clients.
fn with_session_cookie(jar: CookieJar, state: &AppState, tokens: &TokenPair) -> CookieJar {
    let cookie = Cookie::build((AUTH_COOKIE, tokens.access_token.clone()))
        .path("/")
        .http_only(true)
        .secure(state.config.is_production())
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(
            state.config.access_token_ttl_minutes.max(1),
        ));
    jar.add(cookie)
}

fn auth_response(message: &str, user: User, tokens: TokenPair) -> AuthResponse {
    AuthResponse {
        message: message.to_string(),
        user: user.into(),
        tokens,
    }
}

// ─── Handlers ────────────────────────────────────────────────

/// Create an account with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Email already registered"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    req.validate()?;

    let (user, tokens) = state
        .auth_service
        .register(
            &req.email,
            &req.password,
            &req.full_name,
            req.birth_date.map(|date| date.to_string()),
        )
        .await?;

    let jar = with_session_cookie(jar, &state, &tokens);
    Ok((
        StatusCode::CREATED,
        jar,
        Json(auth_response("Account created", user, tokens)),
    ))
}

/// Sign in with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid credentials or disabled account")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    req.validate()?;

    let (user, tokens) = state.auth_service.login(&req.email, &req.password).await?;

    let jar = with_session_cookie(jar, &state, &tokens);
    Ok((jar, Json(auth_response("Signed in", user, tokens))))
}

/// Sign in with a Google access token, creating the account on first use.
#[utoipa::path(
    post,
    path = "/api/v1/auth/google",
    tag = "auth",
    request_body = GoogleLoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Google account has no email"),
        (status = 401, description = "Google rejected the token"),
        (status = 503, description = "Google unreachable")
    )
)]
pub async fn google_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<GoogleLoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    req.validate()?;

    let profile = state.google_client.fetch_profile(&req.token).await?;
    let (user, tokens) = state.auth_service.google_login(profile).await?;

    let jar = with_session_cookie(jar, &state, &tokens);
    Ok((jar, Json(auth_response("Signed in with Google", user, tokens))))
}

/// Exchange a refresh token for a new token pair.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenPair),
        (status = 401, description = "Invalid refresh token")
    )
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<RefreshRequest>,
) -> Result<(CookieJar, Json<TokenPair>)> {
    req.validate()?;

    let tokens = state.auth_service.refresh(&req.refresh_token).await?;
    let jar = with_session_cookie(jar, &state, &tokens);
    Ok((jar, Json(tokens)))
}

/// Clear the session cookie. Bearer-token clients simply discard their tokens.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses((status = 200, description = "Signed out", body = MessageResponse))
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    (
        jar,
        Json(MessageResponse {
            message: "Signed out".to_string(),
        }),
    )
}

/// Current user profile.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let user = state.auth_service.current_user(user.user_id).await?;
    Ok(Json(user.into()))
}

/// Update profile fields; omitted fields are left unchanged.
#[utoipa::path(
    patch,
    path = "/api/v1/auth/me",
    tag = "auth",
    security(("bearer" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>> {
    req.validate()?;

    let update = ProfileUpdate {
        full_name: req.full_name.map(|name| name.trim().to_string()),
        birth_date: req.birth_date.map(|date| date.to_string()),
        weight_kg: req.weight_kg,
        height_cm: req.height_cm,
        avatar_url: req.avatar_url,
    };

    let updated = state
        .db
        .update_profile(user.user_id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Delete the account and all of its data.
#[utoipa::path(
    delete,
    path = "/api/v1/auth/me",
    tag = "auth",
    security(("bearer" = [])),
    responses((status = 204, description = "Account deleted"))
)]
pub async fn delete_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar)> {
    tracing::info!(user_id = user.user_id, "User-initiated account deletion");

    if !state.db.delete_user(user.user_id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    Ok((StatusCode::NO_CONTENT, jar))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let valid = RegisterRequest {
            email: "a@example.com".to_string(),
            password: "password123".to_string(),
            full_name: "Ana".to_string(),
            birth_date: None,
        };
        assert!(valid.validate().is_ok());

        let short_password = RegisterRequest {
            password: "short".to_string(),
            ..valid
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_blank_full_name_rejected() {
        let padded = RegisterRequest {
            email: "a@example.com".to_string(),
            password: "password123".to_string(),
            full_name: "   ".to_string(),
            birth_date: None,
        };
        assert!(padded.validate().is_err());

        let one_letter = RegisterRequest {
            full_name: "  A  ".to_string(),
            ..padded
        };
        assert!(one_letter.validate().is_err());

        let update = UpdateProfileRequest {
            full_name: Some("  ".to_string()),
            birth_date: None,
            weight_kg: None,
            height_cm: None,
            avatar_url: None,
        };
        assert!(update.validate().is_err());

        let update = UpdateProfileRequest {
            full_name: Some("  Ana  ".to_string()),
            ..update
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_profile_update_bounds() {
        let request = UpdateProfileRequest {
            full_name: None,
            birth_date: None,
            weight_kg: Some(0.0),
            height_cm: None,
            avatar_url: None,
        };
        assert!(request.validate().is_err());

        let request = UpdateProfileRequest {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            ..request
        };
        assert!(request.validate().is_ok());
    }
}
