// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! JWT authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cookie that may carry the access token for browser clients.
pub const AUTH_COOKIE: &str = "runza_token";

/// Kind of session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Middleware that requires a valid access token for an active user.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Header first, then cookie
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());

    let token = match bearer {
        Some(token) => token,
        None => match jar.get(AUTH_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => return Err(AppError::Unauthorized),
        },
    };

    let user_id = decode_jwt(&token, &state.config.jwt_signing_key, TokenType::Access)?;

    match state.db.get_user(user_id).await? {
        Some(user) if user.is_active => {}
        _ => return Err(AppError::InvalidToken),
    }

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

/// Create a signed token of the given type valid for `ttl_seconds`.
pub fn create_jwt(
    user_id: i64,
    token_type: TokenType,
    ttl_seconds: u64,
    signing_key: &[u8],
) -> anyhow::Result<String> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now as usize,
        exp: (now + ttl_seconds) as usize,
        token_type,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Validate a token and return its user id.
///
/// Fails unless the signature, expiry and token type all check out.
pub fn decode_jwt(token: &str, signing_key: &[u8], expected: TokenType) -> Result<i64, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data =
        decode::<Claims>(token, &key, &validation).map_err(|_| AppError::InvalidToken)?;

    if token_data.claims.token_type != expected {
        return Err(AppError::InvalidToken);
    }

    token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::InvalidToken)
}
