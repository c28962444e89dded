// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! User account operations.

use super::{Database, USER_COLUMNS};
use crate::error::AppError;
use crate::models::{NewUser, ProfileUpdate, User};
use crate::time_utils::now_db_timestamp;

impl Database {
    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by id.
    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    /// Get a user by email (case-insensitive).
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email.trim().to_lowercase())
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email.trim().to_lowercase())
            .fetch_one(self.pool())
            .await?;
        Ok(row.0 > 0)
    }

    /// Insert a new user and return the stored row.
    ///
    /// A duplicate email surfaces as `AppError::Conflict`.
    pub async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError> {
        let now = now_db_timestamp();
        let result = sqlx::query(
            "INSERT INTO users (email, hashed_password, full_name, birth_date, avatar_url, \
             is_verified, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new_user.email.trim().to_lowercase())
        .bind(&new_user.hashed_password)
        .bind(&new_user.full_name)
        .bind(&new_user.birth_date)
        .bind(&new_user.avatar_url)
        .bind(new_user.is_verified)
        .bind(&now)
        .bind(&now)
        .execute(self.pool())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Email already registered".to_string())
            }
            other => AppError::from(other),
        })?;

        let user_id = result.last_insert_rowid();
        tracing::info!(user_id, "Created user");

        self.get_user(user_id)
            .await?
            .ok_or_else(|| AppError::Database("Inserted user not found".to_string()))
    }

    /// Apply a partial profile update and return the fresh row.
    pub async fn update_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        sqlx::query(
            "UPDATE users SET \
             full_name = COALESCE(?, full_name), \
             birth_date = COALESCE(?, birth_date), \
             weight_kg = COALESCE(?, weight_kg), \
             height_cm = COALESCE(?, height_cm), \
             avatar_url = COALESCE(?, avatar_url), \
             updated_at = ? \
             WHERE id = ?",
        )
        .bind(&update.full_name)
        .bind(&update.birth_date)
        .bind(update.weight_kg)
        .bind(update.height_cm)
        .bind(&update.avatar_url)
        .bind(now_db_timestamp())
        .bind(user_id)
        .execute(self.pool())
        .await?;

        self.get_user(user_id).await
    }

    /// Record a successful login.
    pub async fn touch_last_login(&self, user_id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(now_db_timestamp())
            .bind(user_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Mark a user online or offline. `last_seen` is refreshed either way.
    pub async fn set_presence(&self, user_id: i64, online: bool) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET is_online = ?, last_seen = ? WHERE id = ?")
            .bind(online)
            .bind(now_db_timestamp())
            .bind(user_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    // ─── User Data Deletion ──────────────────────────────────────

    /// Delete a user and, through cascading foreign keys, all owned data.
    ///
    /// Returns `false` when no such user existed.
    pub async fn delete_user(&self, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(self.pool())
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(user_id, "User data deletion complete");
        }
        Ok(deleted)
    }
}
