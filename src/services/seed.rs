// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Default exercise catalog (football conditioning drills).

use crate::db::Database;
use crate::error::Result;
use crate::models::exercise::{AngleRule, ExerciseTip, NewExercise, ScoringRule};

fn angle(name: &str, min: f64, max: f64, phase: &str, weight: f64, required: bool) -> AngleRule {
    AngleRule {
        angle_name: name.to_string(),
        min_angle: min,
        max_angle: max,
        phase: phase.to_string(),
        weight,
        is_required: required,
    }
}

/// Scoring bands as `(excellent, good, acceptable)` ranges.
fn scoring(name: &str, bands: [(f64, f64); 3]) -> ScoringRule {
    let [excellent, good, acceptable] = bands;
    ScoringRule {
        angle_name: name.to_string(),
        excellent_min: excellent.0,
        excellent_max: excellent.1,
        good_min: good.0,
        good_max: good.1,
        acceptable_min: acceptable.0,
        acceptable_max: acceptable.1,
    }
}

fn tip(score_min: i64, score_max: i64, text: &str, priority: i64) -> ExerciseTip {
    ExerciseTip {
        score_min,
        score_max,
        tip_text: text.to_string(),
        priority,
    }
}

/// The built-in catalog.
pub fn default_catalog() -> Vec<NewExercise> {
    vec![
        NewExercise {
            name: "high_knees",
            display_name: "High Knees",
            description: "Running in place with high knees. Builds coordination and power.",
            category: "plyometrics",
            sport: "football",
            difficulty: "medium",
            icon: "walk",
            color: "#10B981",
            angle_rules: vec![
                angle("left_hip_knee", 30.0, 90.0, "up", 1.0, true),
                angle("right_hip_knee", 30.0, 90.0, "up", 1.0, true),
                angle("left_knee", 60.0, 120.0, "up", 0.8, false),
                angle("right_knee", 60.0, 120.0, "up", 0.8, false),
            ],
            scoring_rules: vec![scoring(
                "left_hip_knee",
                [(30.0, 50.0), (50.0, 70.0), (70.0, 90.0)],
            )],
            tips: vec![
                tip(90, 100, "Excellent knee height! Keep the pace.", 1),
                tip(70, 89, "Good form. Try to bring your knees up a little more.", 1),
                tip(50, 69, "Lift your knees higher, up to hip level.", 1),
                tip(
                    0,
                    49,
                    "Your knees need to come up much higher. Practice the movement slowly.",
                    1,
                ),
                tip(0, 100, "Keep your core engaged and your back straight.", 2),
                tip(0, 100, "Swing your arms in time with your legs.", 3),
            ],
        },
        NewExercise {
            name: "jumping_jacks",
            display_name: "Jumping Jacks",
            description: "Cardio drill that improves coordination and endurance.",
            category: "cardio",
            sport: "football",
            difficulty: "easy",
            icon: "body",
            color: "#F59E0B",
            angle_rules: vec![
                angle("left_arm", 150.0, 180.0, "up", 1.0, true),
                angle("right_arm", 150.0, 180.0, "up", 1.0, true),
                angle("legs_spread", 30.0, 60.0, "up", 0.8, false),
            ],
            scoring_rules: vec![scoring(
                "left_arm",
                [(165.0, 180.0), (150.0, 165.0), (130.0, 150.0)],
            )],
            tips: vec![
                tip(90, 100, "Perfect extension! Arms and legs well coordinated.", 1),
                tip(70, 89, "Good form. Extend your arms fully overhead.", 1),
                tip(50, 69, "Extend your arms more and spread your legs wider.", 1),
                tip(0, 49, "Your arms should reach all the way up over your head.", 1),
                tip(0, 100, "Keep a steady rhythm throughout the exercise.", 2),
                tip(0, 100, "Land softly to protect your knees.", 3),
            ],
        },
        NewExercise {
            name: "squats",
            display_name: "Squats",
            description: "Core leg and glute strength exercise. Key for power on the pitch.",
            category: "strength",
            sport: "football",
            difficulty: "medium",
            icon: "fitness",
            color: "#6366F1",
            angle_rules: vec![
                angle("left_knee", 70.0, 120.0, "down", 1.0, true),
                angle("right_knee", 70.0, 120.0, "down", 1.0, true),
                angle("left_hip", 70.0, 120.0, "down", 0.9, true),
                angle("right_hip", 70.0, 120.0, "down", 0.9, true),
            ],
            scoring_rules: vec![scoring(
                "left_knee",
                [(70.0, 90.0), (90.0, 105.0), (105.0, 120.0)],
            )],
            tips: vec![
                tip(90, 100, "Excellent depth! Perfect squat.", 1),
                tip(70, 89, "Good form. Try to go a little lower.", 1),
                tip(50, 69, "Go lower to engage your glutes better.", 1),
                tip(0, 49, "Squat deeper. Your thighs should be parallel to the floor.", 1),
                tip(0, 100, "Keep your back straight and your chest up.", 2),
                tip(0, 100, "Keep your knees behind your toes.", 3),
                tip(0, 100, "Drive up through your heels.", 4),
            ],
        },
    ]
}

/// Insert the default catalog when no exercises exist yet.
///
/// Returns the number of exercises inserted (zero when already seeded).
pub async fn seed_catalog(db: &Database) -> Result<usize> {
    if db.count_exercises().await? > 0 {
        tracing::debug!("Exercise catalog already seeded");
        return Ok(0);
    }

    let catalog = default_catalog();
    for exercise in &catalog {
        db.insert_exercise(exercise).await?;
    }

    tracing::info!(count = catalog.len(), "Seeded exercise catalog");
    Ok(catalog.len())
}

/// Replace whatever catalog exists with the built-in one.
pub async fn reseed_catalog(db: &Database) -> Result<usize> {
    let removed = db.clear_exercises().await?;
    tracing::info!(removed, "Cleared exercise catalog");
    seed_catalog(db).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_bands_are_ordered() {
        for exercise in default_catalog() {
            for rule in &exercise.angle_rules {
                assert!(rule.min_angle < rule.max_angle, "{}", exercise.name);
            }
            assert!(!exercise.tips.is_empty());
        }
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        assert_eq!(seed_catalog(&db).await.unwrap(), 3);
        assert_eq!(seed_catalog(&db).await.unwrap(), 0);
        assert_eq!(db.count_exercises().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_reseed_replaces_catalog() {
        let db = Database::in_memory().await.unwrap();
        seed_catalog(&db).await.unwrap();
        assert_eq!(reseed_catalog(&db).await.unwrap(), 3);
        assert_eq!(db.count_exercises().await.unwrap(), 3);
    }
}
