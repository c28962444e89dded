// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! RunZa: backend API for a gamified fitness platform
//!
//! Users log exercise, meals, water, mood, sleep and wellness activities and
//! earn points, levels and streaks. The crate also provides direct messaging
//! between users and pose analysis against an exercise catalog.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::{ActivityService, AuthService, ChatService, GoogleClient, PoseService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub auth_service: AuthService,
    pub activity_service: ActivityService,
    pub chat_service: ChatService,
    pub pose_service: PoseService,
    pub google_client: GoogleClient,
}

impl AppState {
    /// Wire every service to one database handle.
    pub fn new(config: Config, db: Database) -> anyhow::Result<Self> {
        let google_client = GoogleClient::new(&config)?;
        Ok(Self {
            auth_service: AuthService::new(db.clone(), &config),
            activity_service: ActivityService::new(db.clone()),
            chat_service: ChatService::new(db.clone()),
            pose_service: PoseService::new(db.clone()),
            google_client,
            config,
            db,
        })
    }
}
