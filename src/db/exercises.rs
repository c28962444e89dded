// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Exercise catalog storage.

use super::Database;
use crate::error::AppError;
use crate::models::exercise::{AngleRule, ExerciseTip, NewExercise, ScoringRule};
use crate::models::{ExerciseDefinition, ExerciseDetection};

const EXERCISE_COLUMNS: &str =
    "id, name, display_name, description, category, sport, difficulty, is_active, icon, color";

impl Database {
    // ─── Catalog Operations ──────────────────────────────────────

    pub async fn count_exercises(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM exercise_detections")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    /// Active catalog entries ordered by name.
    pub async fn list_active_exercises(&self) -> Result<Vec<ExerciseDetection>, AppError> {
        let sql = format!(
            "SELECT {} FROM exercise_detections WHERE is_active = 1 ORDER BY name",
            EXERCISE_COLUMNS
        );
        let rows = sqlx::query_as::<_, ExerciseDetection>(&sql)
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }

    /// Active exercises with their angle rules, scoring bands and tips.
    pub async fn load_active_definitions(&self) -> Result<Vec<ExerciseDefinition>, AppError> {
        let exercises = self.list_active_exercises().await?;
        let mut definitions = Vec::with_capacity(exercises.len());

        for exercise in exercises {
            let angle_rules = sqlx::query_as::<_, AngleRule>(
                "SELECT angle_name, min_angle, max_angle, phase, weight, is_required \
                 FROM exercise_angle_rules WHERE exercise_id = ? ORDER BY id",
            )
            .bind(exercise.id)
            .fetch_all(self.pool())
            .await?;

            let scoring_rules = sqlx::query_as::<_, ScoringRule>(
                "SELECT angle_name, excellent_min, excellent_max, good_min, good_max, \
                 acceptable_min, acceptable_max \
                 FROM exercise_scoring_rules WHERE exercise_id = ? ORDER BY id",
            )
            .bind(exercise.id)
            .fetch_all(self.pool())
            .await?;

            let tips = sqlx::query_as::<_, ExerciseTip>(
                "SELECT score_min, score_max, tip_text, priority \
                 FROM exercise_tips WHERE exercise_id = ? ORDER BY priority, id",
            )
            .bind(exercise.id)
            .fetch_all(self.pool())
            .await?;

            definitions.push(ExerciseDefinition {
                exercise,
                angle_rules,
                scoring_rules,
                tips,
            });
        }

        Ok(definitions)
    }

    /// Insert a catalog entry and all of its rules atomically.
    pub async fn insert_exercise(&self, new: &NewExercise) -> Result<i64, AppError> {
        let mut tx = self.pool().begin().await?;

        let exercise_id = sqlx::query(
            "INSERT INTO exercise_detections \
             (name, display_name, description, category, sport, difficulty, icon, color) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.name)
        .bind(new.display_name)
        .bind(new.description)
        .bind(new.category)
        .bind(new.sport)
        .bind(new.difficulty)
        .bind(new.icon)
        .bind(new.color)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(format!("Exercise '{}' already exists", new.name))
            }
            other => AppError::from(other),
        })?
        .last_insert_rowid();

        for rule in &new.angle_rules {
            sqlx::query(
                "INSERT INTO exercise_angle_rules \
                 (exercise_id, angle_name, min_angle, max_angle, phase, weight, is_required) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(exercise_id)
            .bind(&rule.angle_name)
            .bind(rule.min_angle)
            .bind(rule.max_angle)
            .bind(&rule.phase)
            .bind(rule.weight)
            .bind(rule.is_required)
            .execute(&mut *tx)
            .await?;
        }

        for rule in &new.scoring_rules {
            sqlx::query(
                "INSERT INTO exercise_scoring_rules \
                 (exercise_id, angle_name, excellent_min, excellent_max, good_min, good_max, \
                 acceptable_min, acceptable_max) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(exercise_id)
            .bind(&rule.angle_name)
            .bind(rule.excellent_min)
            .bind(rule.excellent_max)
            .bind(rule.good_min)
            .bind(rule.good_max)
            .bind(rule.acceptable_min)
            .bind(rule.acceptable_max)
            .execute(&mut *tx)
            .await?;
        }

        for tip in &new.tips {
            sqlx::query(
                "INSERT INTO exercise_tips (exercise_id, score_min, score_max, tip_text, priority) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(exercise_id)
            .bind(tip.score_min)
            .bind(tip.score_max)
            .bind(&tip.tip_text)
            .bind(tip.priority)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(exercise_id, name = new.name, "Inserted catalog exercise");
        Ok(exercise_id)
    }

    /// Remove every catalog entry; rules and tips cascade.
    pub async fn clear_exercises(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM exercise_detections")
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }
}
