// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Logged activities and the points each kind earns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Flat points for logging a meal.
pub const MEAL_POINTS: i64 = 10;
/// Points per glass of water.
pub const WATER_POINTS_PER_GLASS: i64 = 5;

/// Kind of logged activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ActivityType {
    Exercise,
    Meal,
    Water,
    Mood,
    Sleep,
    Wellness,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Exercise => "exercise",
            ActivityType::Meal => "meal",
            ActivityType::Water => "water",
            ActivityType::Mood => "mood",
            ActivityType::Sleep => "sleep",
            ActivityType::Wellness => "wellness",
        }
    }

    /// Daily points bucket this activity contributes to.
    pub fn point_category(&self) -> PointCategory {
        match self {
            ActivityType::Exercise => PointCategory::Exercise,
            ActivityType::Meal => PointCategory::Nutrition,
            ActivityType::Water
            | ActivityType::Mood
            | ActivityType::Sleep
            | ActivityType::Wellness => PointCategory::Wellness,
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-day points buckets in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointCategory {
    Exercise,
    Nutrition,
    Wellness,
}

/// Self-reported mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MoodLevel {
    Amazing,
    Happy,
    Good,
    Neutral,
    Tired,
    Stressed,
    Sad,
}

impl MoodLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLevel::Amazing => "amazing",
            MoodLevel::Happy => "happy",
            MoodLevel::Good => "good",
            MoodLevel::Neutral => "neutral",
            MoodLevel::Tired => "tired",
            MoodLevel::Stressed => "stressed",
            MoodLevel::Sad => "sad",
        }
    }
}

/// Stored activity row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Activity {
    pub id: i64,
    pub user_id: i64,
    pub activity_type: ActivityType,
    pub name: String,
    pub description: Option<String>,
    pub points_earned: i64,
    pub duration_seconds: Option<i64>,
    pub calories: Option<i64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub water_glasses: Option<i64>,
    pub mood_level: Option<String>,
    pub sleep_hours: Option<f64>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub created_at: String,
}

/// Activity to be recorded, with its effect on the day's counters.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub activity_type: ActivityType,
    pub name: String,
    pub description: Option<String>,
    pub points: i64,
    pub duration_seconds: Option<i64>,
    pub calories: Option<i64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub water_glasses: Option<i64>,
    pub mood_level: Option<String>,
    pub sleep_hours: Option<f64>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

impl NewActivity {
    /// Bare activity of the given type; callers fill in the specifics.
    pub fn new(activity_type: ActivityType, name: impl Into<String>, points: i64) -> Self {
        Self {
            activity_type,
            name: name.into(),
            description: None,
            points,
            duration_seconds: None,
            calories: None,
            protein: None,
            carbs: None,
            fat: None,
            water_glasses: None,
            mood_level: None,
            sleep_hours: None,
            category: None,
            difficulty: None,
        }
    }
}

/// Outcome of recording one activity.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedActivity {
    pub activity_id: i64,
    pub points_earned: i64,
    /// User's lifetime points after this activity
    pub total_points: i64,
    pub level: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
}

/// Per-user, per-day ledger row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyStats {
    pub id: i64,
    pub user_id: i64,
    /// Calendar day (`YYYY-MM-DD`)
    pub date: String,
    pub total_points: i64,
    pub exercise_points: i64,
    pub nutrition_points: i64,
    pub wellness_points: i64,
    pub exercises_completed: i64,
    pub meals_logged: i64,
    pub water_glasses: i64,
    pub total_calories: i64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub mood: Option<String>,
    pub sleep_hours: Option<f64>,
    pub wellness_activities: i64,
    pub streak_maintained: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Points for a night of sleep: best in the 7-9h window.
pub fn sleep_points(hours: f64) -> i64 {
    if (7.0..=9.0).contains(&hours) {
        20
    } else if (6.0..7.0).contains(&hours) || (hours > 9.0 && hours <= 10.0) {
        10
    } else {
        5
    }
}

/// Points for the given number of glasses of water.
pub fn water_points(glasses: i64) -> i64 {
    WATER_POINTS_PER_GLASS * glasses
}
