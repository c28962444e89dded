// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Account service: password hashing, session tokens and sign-in flows.

use crate::config::Config;
use crate::db::Database;
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, decode_jwt, TokenType};
use crate::models::{NewUser, User};
use crate::services::google::GoogleProfile;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use ring::rand::{SecureRandom, SystemRandom};
use serde::Serialize;

/// Length of the throwaway password given to Google-only accounts.
const GENERATED_PASSWORD_LEN: usize = 32;
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Access/refresh token pair issued at sign-in.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `bearer`
    pub token_type: String,
}

/// Hash a password with Argon2id and a random salt (PHC string format).
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    SystemRandom::new()
        .fill(&mut salt_bytes)
        .map_err(|_| anyhow::anyhow!("system RNG unavailable"))?;

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| anyhow::anyhow!("invalid salt: {}", e))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?;

    Ok(hash.to_string())
}

/// Check a password against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Random alphanumeric password of the given length.
pub fn generate_password(len: usize) -> Result<String> {
    let rng = SystemRandom::new();
    let mut password = String::with_capacity(len);
    let mut buf = [0u8; 64];

    // Rejection sampling keeps the distribution uniform over the alphabet
    let limit = (u8::MAX as usize + 1) / ALPHANUMERIC.len() * ALPHANUMERIC.len();
    while password.len() < len {
        rng.fill(&mut buf)
            .map_err(|_| anyhow::anyhow!("system RNG unavailable"))?;
        for &byte in buf.iter() {
            if (byte as usize) < limit && password.len() < len {
                password.push(ALPHANUMERIC[byte as usize % ALPHANUMERIC.len()] as char);
            }
        }
    }

    Ok(password)
}

/// Sign-in and token operations.
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    signing_key: Vec<u8>,
    access_ttl_seconds: u64,
    refresh_ttl_seconds: u64,
}

impl AuthService {
    pub fn new(db: Database, config: &Config) -> Self {
        Self {
            db,
            signing_key: config.jwt_signing_key.clone(),
            access_ttl_seconds: (config.access_token_ttl_minutes.max(1) * 60) as u64,
            refresh_ttl_seconds: (config.refresh_token_ttl_days.max(1) * 24 * 60 * 60) as u64,
        }
    }

    /// Issue a fresh access/refresh pair for `user_id`.
    pub fn issue_tokens(&self, user_id: i64) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: create_jwt(
                user_id,
                TokenType::Access,
                self.access_ttl_seconds,
                &self.signing_key,
            )?,
            refresh_token: create_jwt(
                user_id,
                TokenType::Refresh,
                self.refresh_ttl_seconds,
                &self.signing_key,
            )?,
            token_type: "bearer".to_string(),
        })
    }

    /// Create an email/password account.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        birth_date: Option<String>,
    ) -> Result<(User, TokenPair)> {
        if self.db.email_exists(email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let new_user = NewUser {
            email: email.to_string(),
            hashed_password: hash_password(password)?,
            full_name: full_name.trim().to_string(),
            birth_date,
            avatar_url: None,
            is_verified: false,
        };

        let user = self.db.create_user(&new_user).await?;
        let tokens = self.issue_tokens(user.id)?;
        Ok((user, tokens))
    }

    /// Email/password sign-in.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair)> {
        let invalid = || AppError::InvalidCredentials("Invalid credentials".to_string());

        let user = self.db.get_user_by_email(email).await?.ok_or_else(invalid)?;
        if !verify_password(password, &user.hashed_password) {
            tracing::debug!(user_id = user.id, "Password mismatch");
            return Err(invalid());
        }
        if !user.is_active {
            return Err(AppError::InvalidCredentials("Account is disabled".to_string()));
        }

        self.db.touch_last_login(user.id).await?;
        let user = self.db.get_user(user.id).await?.unwrap_or(user);
        let tokens = self.issue_tokens(user.id)?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok((user, tokens))
    }

    /// Sign in with a verified Google profile, creating the account on first use.
    pub async fn google_login(&self, profile: GoogleProfile) -> Result<(User, TokenPair)> {
        let email = profile
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("Google account has no email".to_string()))?;

        let user = match self.db.get_user_by_email(&email).await? {
            Some(user) => user,
            None => {
                let full_name = profile
                    .name
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| email.split('@').next().unwrap_or("RunZa user").to_string());

                let new_user = NewUser {
                    email: email.clone(),
                    hashed_password: hash_password(&generate_password(GENERATED_PASSWORD_LEN)?)?,
                    full_name,
                    birth_date: None,
                    avatar_url: profile.picture,
                    is_verified: true,
                };
                tracing::info!("Creating account from Google profile");
                self.db.create_user(&new_user).await?
            }
        };

        if !user.is_active {
            return Err(AppError::InvalidCredentials("Account is disabled".to_string()));
        }

        self.db.touch_last_login(user.id).await?;
        let tokens = self.issue_tokens(user.id)?;
        Ok((user, tokens))
    }

    /// Exchange a refresh token for a new token pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let user_id = decode_jwt(refresh_token, &self.signing_key, TokenType::Refresh)?;

        match self.db.get_user(user_id).await? {
            Some(user) if user.is_active => self.issue_tokens(user.id),
            _ => Err(AppError::InvalidToken),
        }
    }

    pub async fn current_user(&self, user_id: i64) -> Result<User> {
        self.db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
