// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::str::FromStr;

/// Default Google endpoint used to resolve OAuth access tokens to a profile.
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/userinfo/v2/me";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- General ---
    /// Deployment environment ("development", "production", ...)
    pub environment: String,
    pub project_name: String,
    pub version: String,
    pub debug: bool,
    /// Prefix for all versioned API routes
    pub api_prefix: String,

    // --- Server ---
    pub host: String,
    pub port: u16,

    // --- Database ---
    pub database_url: String,

    // --- JWT ---
    /// HMAC key for signing session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,

    // --- CORS ---
    /// Comma separated list of allowed browser origins
    pub allowed_origins: String,

    // --- Google sign-in ---
    pub google_userinfo_url: String,

    // --- Exercise catalog ---
    /// Drop and re-insert the built-in catalog at startup
    pub reseed_exercises: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "RunZa API".to_string()),
            version: env::var("VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            debug: parse_var("DEBUG", true)?,
            api_prefix: env::var("API_V1_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),

            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 8000)?,

            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,

            jwt_signing_key: env::var("SECRET_KEY")
                .map_err(|_| ConfigError::Missing("SECRET_KEY"))?
                .into_bytes(),
            access_token_ttl_minutes: parse_var("ACCESS_TOKEN_EXPIRE_MINUTES", 30)?,
            refresh_token_ttl_days: parse_var("REFRESH_TOKEN_EXPIRE_DAYS", 7)?,

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:8081,http://localhost:19006".to_string()),

            google_userinfo_url: env::var("GOOGLE_USERINFO_URL")
                .unwrap_or_else(|_| GOOGLE_USERINFO_URL.to_string()),

            reseed_exercises: parse_var("RESEED_EXERCISES", false)?,
        })
    }

    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            environment: "test".to_string(),
            project_name: "RunZa API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            debug: false,
            api_prefix: "/api/v1".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            database_url: "sqlite::memory:".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            access_token_ttl_minutes: 30,
            refresh_token_ttl_days: 7,
            allowed_origins: "http://localhost:8081,http://localhost:19006".to_string(),
            google_userinfo_url: "http://127.0.0.1:9/userinfo".to_string(),
            reseed_exercises: false,
        }
    }

    /// Allowed CORS origins, trimmed, with empty entries dropped.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Socket address string the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read an optional variable, falling back to `default` when unset.
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
