// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Database layer (SQLite via sqlx).
//!
//! `Database` is a cheap-to-clone handle over a connection pool. Typed
//! operations are grouped by entity in the submodules.

pub mod activities;
pub mod chat;
pub mod exercises;
pub mod users;

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 8;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared column list for `users` selects.
pub(crate) const USER_COLUMNS: &str = "id, email, hashed_password, full_name, birth_date, \
     weight_kg, height_cm, avatar_url, is_active, is_verified, total_points, level, \
     current_streak, longest_streak, total_exercises, total_meals_logged, \
     total_water_glasses, total_wellness_activities, is_online, last_seen, last_activity, \
     created_at, updated_at, last_login";

/// SQLite database client.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database at `url` and apply pending migrations.
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;

        tracing::info!(url = %redact_url(url), "Connected to database");
        Ok(db)
    }

    /// Private in-memory database, used by tests.
    ///
    /// A single long-lived connection keeps the memory database alive.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))
    }

    /// Cheap connectivity probe.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Strip query parameters (which may carry credentials) before logging a URL.
fn redact_url(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
