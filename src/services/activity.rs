// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Activity logging service.
//!
//! Turns each kind of log into a [`NewActivity`] with its points, records it
//! in the ledger and answers the dashboard queries.

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::activity::{sleep_points, water_points, MEAL_POINTS};
use crate::models::{
    Activity, ActivityType, DailyStats, MoodLevel, NewActivity, RecordedActivity, UserStats,
};
use chrono::Utc;

/// Exercise as reported by the client.
#[derive(Debug, Clone)]
pub struct ExerciseLog {
    pub name: String,
    pub category: String,
    pub duration_seconds: i64,
    pub difficulty: Option<String>,
    pub points: i64,
}

/// Meal with its macronutrients.
#[derive(Debug, Clone)]
pub struct MealLog {
    pub name: String,
    pub category: String,
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone)]
pub struct WellnessLog {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i64>,
    pub points: i64,
}

pub fn exercise_activity(log: ExerciseLog) -> NewActivity {
    let mut activity = NewActivity::new(ActivityType::Exercise, log.name, log.points);
    activity.category = Some(log.category);
    activity.duration_seconds = Some(log.duration_seconds);
    activity.difficulty = log.difficulty;
    activity
}

pub fn meal_activity(log: MealLog) -> NewActivity {
    let mut activity = NewActivity::new(ActivityType::Meal, log.name, MEAL_POINTS);
    activity.category = Some(log.category);
    activity.calories = Some(log.calories);
    activity.protein = Some(log.protein);
    activity.carbs = Some(log.carbs);
    activity.fat = Some(log.fat);
    activity
}

pub fn water_activity(glasses: i64) -> NewActivity {
    let name = if glasses == 1 {
        "1 glass of water".to_string()
    } else {
        format!("{} glasses of water", glasses)
    };
    let mut activity = NewActivity::new(ActivityType::Water, name, water_points(glasses));
    activity.water_glasses = Some(glasses);
    activity
}

pub fn mood_activity(mood: MoodLevel, points: i64) -> NewActivity {
    let name = format!("Mood: {}", mood.as_str());
    let mut activity = NewActivity::new(ActivityType::Mood, name, points);
    activity.mood_level = Some(mood.as_str().to_string());
    activity
}

pub fn sleep_activity(hours: f64) -> NewActivity {
    let mut activity =
        NewActivity::new(ActivityType::Sleep, format!("Slept {}h", hours), sleep_points(hours));
    activity.sleep_hours = Some(hours);
    activity
}

pub fn wellness_activity(log: WellnessLog) -> Result<NewActivity> {
    let duration_seconds = match log.duration_minutes {
        Some(minutes) => Some(
            minutes
                .checked_mul(60)
                .ok_or_else(|| AppError::BadRequest("Duration is too long".to_string()))?,
        ),
        None => None,
    };
    let mut activity = NewActivity::new(ActivityType::Wellness, log.name, log.points);
    activity.description = log.description;
    activity.duration_seconds = duration_seconds;
    Ok(activity)
}

/// Activity ledger operations for authenticated users.
#[derive(Clone)]
pub struct ActivityService {
    db: Database,
}

impl ActivityService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record an activity and return the updated totals.
    pub async fn log(&self, user_id: i64, activity: NewActivity) -> Result<RecordedActivity> {
        self.db.record_activity(user_id, &activity).await
    }

    /// Dashboard statistics as of now.
    pub async fn stats(&self, user_id: i64) -> Result<UserStats> {
        let user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let window = self.db.ledger_window(user_id, Utc::now()).await?;
        let derived = window.derive();
        let favorite_exercise_category = self.db.favorite_exercise_category(user_id).await?;

        Ok(UserStats {
            total_points: user.total_points,
            current_streak: user.current_streak,
            longest_streak: user.longest_streak,
            level: user.level,
            total_exercises: user.total_exercises,
            total_meals_logged: user.total_meals_logged,
            total_water_glasses: user.total_water_glasses,
            total_wellness_activities: user.total_wellness_activities,
            points_this_week: window.points_this_week,
            points_this_month: window.points_this_month,
            average_daily_points: derived.average_daily_points,
            favorite_exercise_category,
            consistency_score: derived.consistency_score,
        })
    }

    /// Ledger rows for the last `days` days, oldest first.
    pub async fn progress(&self, user_id: i64, days: u64) -> Result<Vec<DailyStats>> {
        self.db.daily_progress(user_id, Utc::now(), days).await
    }

    pub async fn recent(&self, user_id: i64, limit: i64) -> Result<Vec<Activity>> {
        self.db.recent_activities(user_id, limit).await
    }
}
