// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Google sign-in: resolve an OAuth access token to a user profile.

use crate::config::Config;
use crate::error::AppError;
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Profile fields returned by the userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    #[serde(default)]
    pub verified_email: bool,
}

/// Google userinfo API client.
#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    userinfo_url: String,
}

impl GoogleClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("failed building Google HTTP client")?;

        Ok(Self {
            http,
            userinfo_url: config.google_userinfo_url.clone(),
        })
    }

    /// Fetch the profile behind `access_token`.
    ///
    /// A rejected token maps to `UpstreamAuth`, an unreachable endpoint to
    /// `UpstreamUnavailable`.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, AppError> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("Google userinfo: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Google rejected access token");
            return Err(AppError::UpstreamAuth("Invalid Google token".to_string()));
        }

        response
            .json::<GoogleProfile>()
            .await
            .map_err(|e| AppError::UpstreamAuth(format!("Malformed Google profile: {}", e)))
    }
}
