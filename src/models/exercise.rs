// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Exercise catalog used to recognise and score poses.
//!
//! Each exercise carries angle rules (which joint angles identify it), scoring
//! bands (how well a key angle is executed) and tips keyed by score range.

use serde::{Deserialize, Serialize};

/// Catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct ExerciseDetection {
    #[serde(skip_serializing)]
    pub id: i64,
    /// Stable identifier (e.g. `squats`)
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub category: String,
    pub sport: String,
    pub difficulty: String,
    #[serde(skip_serializing)]
    pub is_active: bool,
    pub icon: String,
    pub color: String,
}

/// Joint angle window that identifies an exercise phase.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AngleRule {
    pub angle_name: String,
    pub min_angle: f64,
    pub max_angle: f64,
    /// Movement phase the window describes (`up`, `down`, `any`)
    pub phase: String,
    pub weight: f64,
    pub is_required: bool,
}

impl AngleRule {
    pub fn matches(&self, angle: f64) -> bool {
        angle >= self.min_angle && angle <= self.max_angle
    }
}

/// Quality bands for one angle.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScoringRule {
    pub angle_name: String,
    pub excellent_min: f64,
    pub excellent_max: f64,
    pub good_min: f64,
    pub good_max: f64,
    pub acceptable_min: f64,
    pub acceptable_max: f64,
}

impl ScoringRule {
    /// Form score for a measured angle.
    pub fn score(&self, angle: f64) -> i64 {
        let within = |min: f64, max: f64| angle >= min && angle <= max;
        if within(self.excellent_min, self.excellent_max) {
            100
        } else if within(self.good_min, self.good_max) {
            80
        } else if within(self.acceptable_min, self.acceptable_max) {
            60
        } else {
            30
        }
    }
}

/// Coaching tip shown for scores in `[score_min, score_max]`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExerciseTip {
    pub score_min: i64,
    pub score_max: i64,
    pub tip_text: String,
    pub priority: i64,
}

impl ExerciseTip {
    pub fn applies_to(&self, score: i64) -> bool {
        score >= self.score_min && score <= self.score_max
    }
}

/// An exercise with all of its rules loaded.
#[derive(Debug, Clone)]
pub struct ExerciseDefinition {
    pub exercise: ExerciseDetection,
    pub angle_rules: Vec<AngleRule>,
    pub scoring_rules: Vec<ScoringRule>,
    pub tips: Vec<ExerciseTip>,
}

/// Catalog entry to insert, with its rules.
#[derive(Debug, Clone)]
pub struct NewExercise {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub sport: &'static str,
    pub difficulty: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub angle_rules: Vec<AngleRule>,
    pub scoring_rules: Vec<ScoringRule>,
    pub tips: Vec<ExerciseTip>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squat_scoring() -> ScoringRule {
        ScoringRule {
            angle_name: "left_knee".to_string(),
            excellent_min: 70.0,
            excellent_max: 90.0,
            good_min: 90.0,
            good_max: 105.0,
            acceptable_min: 105.0,
            acceptable_max: 120.0,
        }
    }

    #[test]
    fn test_scoring_bands() {
        let rule = squat_scoring();
        assert_eq!(rule.score(80.0), 100);
        assert_eq!(rule.score(90.0), 100);
        assert_eq!(rule.score(100.0), 80);
        assert_eq!(rule.score(110.0), 60);
        assert_eq!(rule.score(150.0), 30);
        assert_eq!(rule.score(40.0), 30);
    }

    #[test]
    fn test_tip_ranges_are_inclusive() {
        let tip = ExerciseTip {
            score_min: 70,
            score_max: 89,
            tip_text: "Go a little lower".to_string(),
            priority: 1,
        };
        assert!(tip.applies_to(70));
        assert!(tip.applies_to(89));
        assert!(!tip.applies_to(90));
    }
}
