// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Activity log and daily points ledger.

use super::Database;
use crate::error::AppError;
use crate::models::activity::{ActivityType, PointCategory};
use crate::models::stats::{MONTH_WINDOW_DAYS, WEEK_WINDOW_DAYS};
use crate::models::user::level_for_points;
use crate::models::{Activity, DailyStats, LedgerWindow, NewActivity, RecordedActivity, Streak};
use crate::time_utils::{day_key, day_key_before, format_db_timestamp};
use chrono::{DateTime, Utc};

const ACTIVITY_COLUMNS: &str = "id, user_id, activity_type, name, description, points_earned, \
     duration_seconds, calories, protein, carbs, fat, water_glasses, mood_level, sleep_hours, \
     category, difficulty, created_at";

const DAILY_STATS_COLUMNS: &str = "id, user_id, date, total_points, exercise_points, \
     nutrition_points, wellness_points, exercises_completed, meals_logged, water_glasses, \
     total_calories, total_protein, total_carbs, total_fat, mood, sleep_hours, \
     wellness_activities, streak_maintained, created_at, updated_at";

/// Counter deltas one activity applies to its day row and to the user.
#[derive(Debug, Default, PartialEq)]
struct LedgerDelta {
    exercise_points: i64,
    nutrition_points: i64,
    wellness_points: i64,
    exercises: i64,
    meals: i64,
    water_glasses: i64,
    wellness_activities: i64,
    calories: i64,
    protein: f64,
    carbs: f64,
    fat: f64,
}

impl LedgerDelta {
    fn for_activity(activity: &NewActivity) -> Self {
        let mut delta = Self::default();
        match activity.activity_type.point_category() {
            PointCategory::Exercise => delta.exercise_points = activity.points,
            PointCategory::Nutrition => delta.nutrition_points = activity.points,
            PointCategory::Wellness => delta.wellness_points = activity.points,
        }
        match activity.activity_type {
            ActivityType::Exercise => delta.exercises = 1,
            ActivityType::Meal => {
                delta.meals = 1;
                delta.calories = activity.calories.unwrap_or(0);
                delta.protein = activity.protein.unwrap_or(0.0);
                delta.carbs = activity.carbs.unwrap_or(0.0);
                delta.fat = activity.fat.unwrap_or(0.0);
            }
            ActivityType::Water => delta.water_glasses = activity.water_glasses.unwrap_or(0),
            ActivityType::Wellness => delta.wellness_activities = 1,
            ActivityType::Mood | ActivityType::Sleep => {}
        }
        delta
    }
}

impl Database {
    // ─── Atomic Activity Recording ───────────────────────────────

    /// Record an activity now. See [`Database::record_activity_at`].
    pub async fn record_activity(
        &self,
        user_id: i64,
        activity: &NewActivity,
    ) -> Result<RecordedActivity, AppError> {
        self.record_activity_at(user_id, activity, Utc::now()).await
    }

    /// Atomically store an activity and apply it to the ledger.
    ///
    /// In one transaction: insert the activity row, upsert the day's
    /// `daily_stats` row and add the points to it, advance the streak on the
    /// first activity of the day, and update the user's totals and level.
    pub async fn record_activity_at(
        &self,
        user_id: i64,
        activity: &NewActivity,
        now: DateTime<Utc>,
    ) -> Result<RecordedActivity, AppError> {
        let timestamp = format_db_timestamp(now);
        let today = now.date_naive();
        let date = day_key(today);
        let yesterday = day_key_before(today, 1);
        let delta = LedgerDelta::for_activity(activity);

        let mut tx = self.pool().begin().await?;

        // 1. Activity row. Writing first takes the database write lock.
        let activity_id = sqlx::query(
            "INSERT INTO activities (user_id, activity_type, name, description, points_earned, \
             duration_seconds, calories, protein, carbs, fat, water_glasses, mood_level, \
             sleep_hours, category, difficulty, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(activity.activity_type)
        .bind(&activity.name)
        .bind(&activity.description)
        .bind(activity.points)
        .bind(activity.duration_seconds)
        .bind(activity.calories)
        .bind(activity.protein)
        .bind(activity.carbs)
        .bind(activity.fat)
        .bind(activity.water_glasses)
        .bind(&activity.mood_level)
        .bind(activity.sleep_hours)
        .bind(&activity.category)
        .bind(&activity.difficulty)
        .bind(&timestamp)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound("User not found".to_string())
            }
            other => AppError::from(other),
        })?
        .last_insert_rowid();

        // 2. Current user totals
        let (total_points, current_streak, longest_streak): (i64, i64, i64) = sqlx::query_as(
            "SELECT total_points, current_streak, longest_streak FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        // 3. Day row
        sqlx::query(
            "INSERT INTO daily_stats (user_id, date, created_at, updated_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT (user_id, date) DO NOTHING",
        )
        .bind(user_id)
        .bind(&date)
        .bind(&timestamp)
        .bind(&timestamp)
        .execute(&mut *tx)
        .await?;

        let (streak_maintained,): (bool,) = sqlx::query_as(
            "SELECT streak_maintained FROM daily_stats WHERE user_id = ? AND date = ?",
        )
        .bind(user_id)
        .bind(&date)
        .fetch_one(&mut *tx)
        .await?;

        // 4. Streak, once per calendar day
        let mut streak = Streak {
            current: current_streak,
            longest: longest_streak,
        };
        if !streak_maintained {
            let yesterday_points: Option<(i64,)> = sqlx::query_as(
                "SELECT total_points FROM daily_stats WHERE user_id = ? AND date = ?",
            )
            .bind(user_id)
            .bind(&yesterday)
            .fetch_optional(&mut *tx)
            .await?;
            let active_yesterday = yesterday_points.is_some_and(|(points,)| points > 0);
            streak = streak.advance(active_yesterday);
        }

        sqlx::query(
            "UPDATE daily_stats SET \
             total_points = total_points + ?, \
             exercise_points = exercise_points + ?, \
             nutrition_points = nutrition_points + ?, \
             wellness_points = wellness_points + ?, \
             exercises_completed = exercises_completed + ?, \
             meals_logged = meals_logged + ?, \
             water_glasses = water_glasses + ?, \
             total_calories = total_calories + ?, \
             total_protein = total_protein + ?, \
             total_carbs = total_carbs + ?, \
             total_fat = total_fat + ?, \
             mood = COALESCE(?, mood), \
             sleep_hours = COALESCE(?, sleep_hours), \
             wellness_activities = wellness_activities + ?, \
             streak_maintained = 1, \
             updated_at = ? \
             WHERE user_id = ? AND date = ?",
        )
        .bind(activity.points)
        .bind(delta.exercise_points)
        .bind(delta.nutrition_points)
        .bind(delta.wellness_points)
        .bind(delta.exercises)
        .bind(delta.meals)
        .bind(delta.water_glasses)
        .bind(delta.calories)
        .bind(delta.protein)
        .bind(delta.carbs)
        .bind(delta.fat)
        .bind(&activity.mood_level)
        .bind(activity.sleep_hours)
        .bind(delta.wellness_activities)
        .bind(&timestamp)
        .bind(user_id)
        .bind(&date)
        .execute(&mut *tx)
        .await?;

        // 5. User totals
        let new_total = total_points + activity.points;
        let level = level_for_points(new_total);

        sqlx::query(
            "UPDATE users SET \
             total_points = ?, \
             level = ?, \
             current_streak = ?, \
             longest_streak = ?, \
             total_exercises = total_exercises + ?, \
             total_meals_logged = total_meals_logged + ?, \
             total_water_glasses = total_water_glasses + ?, \
             total_wellness_activities = total_wellness_activities + ?, \
             last_activity = ?, \
             updated_at = ? \
             WHERE id = ?",
        )
        .bind(new_total)
        .bind(level)
        .bind(streak.current)
        .bind(streak.longest)
        .bind(delta.exercises)
        .bind(delta.meals)
        .bind(delta.water_glasses)
        .bind(delta.wellness_activities)
        .bind(&timestamp)
        .bind(&timestamp)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            user_id,
            activity_id,
            activity_type = %activity.activity_type,
            points = activity.points,
            total_points = new_total,
            "Activity recorded"
        );

        Ok(RecordedActivity {
            activity_id,
            points_earned: activity.points,
            total_points: new_total,
            level,
            current_streak: streak.current,
            longest_streak: streak.longest,
        })
    }

    // ─── Ledger Queries ──────────────────────────────────────────

    /// Points over the week and month windows ending on `now`'s date.
    pub async fn ledger_window(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<LedgerWindow, AppError> {
        let today = now.date_naive();
        let week_start = day_key_before(today, WEEK_WINDOW_DAYS - 1);
        let month_start = day_key_before(today, MONTH_WINDOW_DAYS - 1);

        let (points_this_week, points_this_month, active_days_this_month): (i64, i64, i64) =
            sqlx::query_as(
                "SELECT \
                 COALESCE(SUM(CASE WHEN date >= ? THEN total_points ELSE 0 END), 0), \
                 COALESCE(SUM(total_points), 0), \
                 COUNT(CASE WHEN total_points > 0 THEN 1 END) \
                 FROM daily_stats WHERE user_id = ? AND date >= ? AND date <= ?",
            )
            .bind(&week_start)
            .bind(user_id)
            .bind(&month_start)
            .bind(day_key(today))
            .fetch_one(self.pool())
            .await?;

        Ok(LedgerWindow {
            points_this_week,
            points_this_month,
            active_days_this_month,
        })
    }

    /// Most frequently logged exercise category; ties go to the first name.
    pub async fn favorite_exercise_category(
        &self,
        user_id: i64,
    ) -> Result<Option<String>, AppError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT category FROM activities \
             WHERE user_id = ? AND activity_type = 'exercise' AND category IS NOT NULL \
             GROUP BY category ORDER BY COUNT(*) DESC, category ASC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(|(category,)| category))
    }

    /// Day rows for the last `days` days (including today), oldest first.
    pub async fn daily_progress(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
        days: u64,
    ) -> Result<Vec<DailyStats>, AppError> {
        let today = now.date_naive();
        let sql = format!(
            "SELECT {} FROM daily_stats WHERE user_id = ? AND date >= ? AND date <= ? \
             ORDER BY date ASC",
            DAILY_STATS_COLUMNS
        );
        let rows = sqlx::query_as::<_, DailyStats>(&sql)
            .bind(user_id)
            .bind(day_key_before(today, days.saturating_sub(1)))
            .bind(day_key(today))
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }

    /// Most recent activities, newest first.
    pub async fn recent_activities(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<Activity>, AppError> {
        let sql = format!(
            "SELECT {} FROM activities WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
            ACTIVITY_COLUMNS
        );
        let rows = sqlx::query_as::<_, Activity>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users::tests::new_user;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    fn exercise(points: i64, category: &str) -> NewActivity {
        let mut activity = NewActivity::new(ActivityType::Exercise, "Drill", points);
        activity.category = Some(category.to_string());
        activity.duration_seconds = Some(600);
        activity
    }

    async fn setup() -> (Database, i64) {
        let db = Database::in_memory().await.unwrap();
        let user = db.create_user(&new_user("ledger@example.com")).await.unwrap();
        (db, user.id)
    }

    #[test]
    fn test_meal_delta() {
        let mut meal = NewActivity::new(ActivityType::Meal, "Lunch", 10);
        meal.calories = Some(650);
        meal.protein = Some(30.0);

        let delta = LedgerDelta::for_activity(&meal);
        assert_eq!(delta.nutrition_points, 10);
        assert_eq!(delta.meals, 1);
        assert_eq!(delta.calories, 650);
        assert_eq!(delta.protein, 30.0);
        assert_eq!(delta.exercise_points, 0);
    }

    #[tokio::test]
    async fn test_record_updates_day_and_user() {
        let (db, user_id) = setup().await;

        let recorded = db
            .record_activity_at(user_id, &exercise(300, "cardio"), at(10, 8))
            .await
            .unwrap();
        assert_eq!(recorded.total_points, 300);
        assert_eq!(recorded.level, 1);

        let mut water = NewActivity::new(ActivityType::Water, "Water", 40);
        water.water_glasses = Some(8);
        let recorded = db.record_activity_at(user_id, &water, at(10, 9)).await.unwrap();
        assert_eq!(recorded.total_points, 340);

        let days = db.daily_progress(user_id, at(10, 23), 1).await.unwrap();
        assert_eq!(days.len(), 1);
        let day = &days[0];
        assert_eq!(day.total_points, 340);
        assert_eq!(day.exercise_points, 300);
        assert_eq!(day.wellness_points, 40);
        assert_eq!(day.water_glasses, 8);
        assert_eq!(day.exercises_completed, 1);
        assert!(day.streak_maintained);

        let user = db.get_user(user_id).await.unwrap().unwrap();
        assert_eq!(user.total_exercises, 1);
        assert_eq!(user.total_water_glasses, 8);
        assert!(user.last_activity.is_some());
    }

    #[tokio::test]
    async fn test_level_crosses_threshold() {
        let (db, user_id) = setup().await;
        db.record_activity_at(user_id, &exercise(450, "strength"), at(10, 8))
            .await
            .unwrap();
        let recorded = db
            .record_activity_at(user_id, &exercise(100, "strength"), at(10, 9))
            .await
            .unwrap();
        assert_eq!(recorded.total_points, 550);
        assert_eq!(recorded.level, 2);
    }

    #[tokio::test]
    async fn test_streak_advances_once_per_day() {
        let (db, user_id) = setup().await;

        let first = db
            .record_activity_at(user_id, &exercise(10, "cardio"), at(10, 8))
            .await
            .unwrap();
        assert_eq!(first.current_streak, 1);

        let same_day = db
            .record_activity_at(user_id, &exercise(10, "cardio"), at(10, 20))
            .await
            .unwrap();
        assert_eq!(same_day.current_streak, 1);

        let next_day = db
            .record_activity_at(user_id, &exercise(10, "cardio"), at(11, 7))
            .await
            .unwrap();
        assert_eq!(next_day.current_streak, 2);
        assert_eq!(next_day.longest_streak, 2);

        // Skipping a day resets the current streak
        let after_gap = db
            .record_activity_at(user_id, &exercise(10, "cardio"), at(13, 7))
            .await
            .unwrap();
        assert_eq!(after_gap.current_streak, 1);
        assert_eq!(after_gap.longest_streak, 2);
    }

    #[tokio::test]
    async fn test_unknown_user_rolls_back() {
        let db = Database::in_memory().await.unwrap();
        let err = db
            .record_activity_at(999, &exercise(10, "cardio"), at(10, 8))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_ledger_window_and_favorite() {
        let (db, user_id) = setup().await;
        db.record_activity_at(user_id, &exercise(50, "strength"), at(1, 8))
            .await
            .unwrap();
        db.record_activity_at(user_id, &exercise(20, "cardio"), at(9, 8))
            .await
            .unwrap();
        db.record_activity_at(user_id, &exercise(30, "cardio"), at(10, 8))
            .await
            .unwrap();

        let window = db.ledger_window(user_id, at(10, 12)).await.unwrap();
        assert_eq!(window.points_this_week, 50);
        assert_eq!(window.points_this_month, 100);
        assert_eq!(window.active_days_this_month, 3);

        let favorite = db.favorite_exercise_category(user_id).await.unwrap();
        assert_eq!(favorite.as_deref(), Some("cardio"));
    }

    #[tokio::test]
    async fn test_recent_activities_newest_first() {
        let (db, user_id) = setup().await;
        db.record_activity_at(user_id, &exercise(1, "a"), at(10, 8))
            .await
            .unwrap();
        db.record_activity_at(user_id, &exercise(2, "b"), at(10, 9))
            .await
            .unwrap();

        let recent = db.recent_activities(user_id, 1).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].points_earned, 2);
        assert_eq!(recent[0].activity_type, ActivityType::Exercise);
    }
}
