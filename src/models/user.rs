// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// Points needed to advance one level.
pub const POINTS_PER_LEVEL: i64 = 500;

/// User account row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    /// Login email, always stored lowercase
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub full_name: String,
    /// Birth date (ISO 8601)
    pub birth_date: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,

    // ─── Points ledger totals ────────────────────────────────────
    pub total_points: i64,
    pub level: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub total_exercises: i64,
    pub total_meals_logged: i64,
    pub total_water_glasses: i64,
    pub total_wellness_activities: i64,

    // ─── Presence ────────────────────────────────────────────────
    pub is_online: bool,
    pub last_seen: Option<String>,
    pub last_activity: Option<String>,

    pub created_at: String,
    pub updated_at: String,
    pub last_login: Option<String>,
}

/// Fields required to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub full_name: String,
    pub birth_date: Option<String>,
    pub avatar_url: Option<String>,
    pub is_verified: bool,
}

/// Partial profile update; `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub birth_date: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub avatar_url: Option<String>,
}

/// Level reached with the given lifetime points.
pub fn level_for_points(total_points: i64) -> i64 {
    total_points.max(0) / POINTS_PER_LEVEL + 1
}
