// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Pose analysis from body landmarks.
//!
//! Clients run the landmark detector on-device and submit the 33 body
//! landmarks. Joint angles are computed from them, matched against the
//! exercise catalog and, failing that, classified with fixed heuristics.

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::exercise::ExerciseDefinition;
use crate::models::pose::AnalysisSource;
use crate::models::stats::round1;
use crate::models::{ExerciseDetection, Landmark, PoseAnalysis};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Joint angles as (name, first landmark, vertex landmark, last landmark).
const JOINTS: &[(&str, &str, &str, &str)] = &[
    ("left_arm", "LEFT_SHOULDER", "LEFT_ELBOW", "LEFT_WRIST"),
    ("right_arm", "RIGHT_SHOULDER", "RIGHT_ELBOW", "RIGHT_WRIST"),
    ("left_leg", "LEFT_HIP", "LEFT_KNEE", "LEFT_ANKLE"),
    ("right_leg", "RIGHT_HIP", "RIGHT_KNEE", "RIGHT_ANKLE"),
    ("left_knee", "LEFT_HIP", "LEFT_KNEE", "LEFT_ANKLE"),
    ("right_knee", "RIGHT_HIP", "RIGHT_KNEE", "RIGHT_ANKLE"),
    ("left_hip", "LEFT_SHOULDER", "LEFT_HIP", "LEFT_KNEE"),
    ("right_hip", "RIGHT_SHOULDER", "RIGHT_HIP", "RIGHT_KNEE"),
    ("left_hip_knee", "LEFT_SHOULDER", "LEFT_HIP", "LEFT_KNEE"),
    ("right_hip_knee", "RIGHT_SHOULDER", "RIGHT_HIP", "RIGHT_KNEE"),
];

/// Angle assumed for a limb whose landmarks are missing (fully extended).
const STRAIGHT: f64 = 180.0;

/// A 2-D point in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<&Landmark> for Point {
    fn from(landmark: &Landmark) -> Self {
        Self {
            x: landmark.x,
            y: landmark.y,
        }
    }
}

/// Angle at `b` formed by `a`-`b`-`c`, in degrees within [0, 180], one decimal.
pub fn angle_between(a: Point, b: Point, c: Point) -> f64 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut degrees = radians.to_degrees().abs();
    if degrees > 180.0 {
        degrees = 360.0 - degrees;
    }
    round1(degrees)
}

/// Landmarks indexed by canonical name.
fn index_landmarks(landmarks: &[Landmark]) -> HashMap<&str, Point> {
    landmarks
        .iter()
        .filter_map(|landmark| landmark.canonical_name().map(|name| (name, landmark.into())))
        .collect()
}

/// Every joint angle computable from the supplied landmarks.
pub fn joint_angles(landmarks: &[Landmark]) -> BTreeMap<String, f64> {
    let points = index_landmarks(landmarks);
    let mut angles = BTreeMap::new();

    for (name, a, b, c) in JOINTS {
        if let (Some(&a), Some(&b), Some(&c)) = (points.get(a), points.get(b), points.get(c)) {
            angles.insert(name.to_string(), angle_between(a, b, c));
        }
    }

    if let (Some(&la), Some(&lh), Some(&rh), Some(&ra)) = (
        points.get("LEFT_ANKLE"),
        points.get("LEFT_HIP"),
        points.get("RIGHT_HIP"),
        points.get("RIGHT_ANKLE"),
    ) {
        let mid_hip = Point {
            x: (lh.x + rh.x) / 2.0,
            y: (lh.y + rh.y) / 2.0,
        };
        angles.insert("legs_spread".to_string(), angle_between(la, mid_hip, ra));
    }

    angles
}

/// Fixed-threshold classification used when no catalog exercise matches.
pub fn heuristic_analysis(landmarks: &[Landmark], angles: BTreeMap<String, f64>) -> PoseAnalysis {
    let angle = |name: &str| angles.get(name).copied().unwrap_or(STRAIGHT);
    let (left_leg, right_leg) = (angle("left_leg"), angle("right_leg"));
    let (left_arm, right_arm) = (angle("left_arm"), angle("right_arm"));

    let (exercise, posture, score, tip) = if left_leg < 120.0 && right_leg < 120.0 {
        let (score, tip) = if left_leg < 90.0 && right_leg < 90.0 {
            (100, "Excellent depth!")
        } else if left_leg < 110.0 && right_leg < 110.0 {
            (80, "Good form, try to go a little lower")
        } else {
            (60, "Go lower for better activation")
        };
        ("squat", "squat_down", score, tip)
    } else if left_arm < 100.0 && right_arm < 100.0 {
        ("pushup", "pushup_down", 85, "Keep your core tight")
    } else if arms_raised(&index_landmarks(landmarks)) {
        ("arms_up", "standing_arms_up", 90, "Arms nice and high!")
    } else {
        ("standing", "neutral", 50, "Neutral position detected")
    };

    let mut analysis = PoseAnalysis::new(angles);
    analysis.exercise_detected = Some(exercise.to_string());
    analysis.posture = posture.to_string();
    analysis.form_score = score;
    analysis.tips.push(tip.to_string());
    analysis
}

/// Both wrists above their shoulders (image y grows downward).
fn arms_raised(points: &HashMap<&str, Point>) -> bool {
    match (
        points.get("LEFT_WRIST"),
        points.get("RIGHT_WRIST"),
        points.get("LEFT_SHOULDER"),
        points.get("RIGHT_SHOULDER"),
    ) {
        (Some(lw), Some(rw), Some(ls), Some(rs)) => lw.y < ls.y && rw.y < rs.y,
        _ => false,
    }
}

/// How well one catalog exercise fits the measured angles.
#[derive(Debug, Clone)]
pub struct CatalogMatch<'a> {
    pub definition: &'a ExerciseDefinition,
    /// Weighted fraction of angle rules satisfied, in [0, 1]
    pub confidence: f64,
    pub phase: String,
}

/// Match one exercise. `None` unless every required rule passes.
pub fn match_exercise<'a>(
    definition: &'a ExerciseDefinition,
    angles: &BTreeMap<String, f64>,
) -> Option<CatalogMatch<'a>> {
    if definition.angle_rules.is_empty() {
        return None;
    }

    let mut total_weight = 0.0;
    let mut matched_weight = 0.0;
    let mut phase = None;

    for rule in &definition.angle_rules {
        total_weight += rule.weight;
        let passed = angles
            .get(&rule.angle_name)
            .is_some_and(|&angle| rule.matches(angle));

        if passed {
            matched_weight += rule.weight;
            phase.get_or_insert_with(|| rule.phase.clone());
        } else if rule.is_required {
            return None;
        }
    }

    let confidence = if total_weight > 0.0 {
        matched_weight / total_weight
    } else {
        0.0
    };

    Some(CatalogMatch {
        definition,
        confidence,
        phase: phase.unwrap_or_else(|| "any".to_string()),
    })
}

/// Best catalog match: highest confidence, ties broken by exercise name.
pub fn best_match<'a, I>(definitions: I, angles: &BTreeMap<String, f64>) -> Option<CatalogMatch<'a>>
where
    I: IntoIterator<Item = &'a ExerciseDefinition>,
{
    definitions
        .into_iter()
        .filter_map(|definition| match_exercise(definition, angles))
        .min_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| a.definition.exercise.name.cmp(&b.definition.exercise.name))
        })
}

/// Build the analysis for a catalog match.
pub fn catalog_analysis(found: &CatalogMatch<'_>, angles: BTreeMap<String, f64>) -> PoseAnalysis {
    let definition = found.definition;

    let score = definition
        .scoring_rules
        .iter()
        .find_map(|rule| angles.get(&rule.angle_name).map(|&angle| rule.score(angle)))
        .unwrap_or_else(|| (found.confidence * 100.0).round() as i64);

    let mut tips: Vec<_> = definition
        .tips
        .iter()
        .filter(|tip| tip.applies_to(score))
        .collect();
    tips.sort_by_key(|tip| tip.priority);

    let mut analysis = PoseAnalysis::new(angles);
    analysis.posture = format!("{}_{}", definition.exercise.name, found.phase);
    analysis.exercise_detected = Some(definition.exercise.name.clone());
    analysis.form_score = score;
    analysis.tips = tips.into_iter().map(|tip| tip.tip_text.clone()).collect();
    analysis.source = AnalysisSource::Catalog;
    analysis
}

/// Placeholder analysis returned when only an image was supplied.
pub fn demo_analysis() -> PoseAnalysis {
    let angles = [
        ("left_arm", 90.0),
        ("right_arm", 90.0),
        ("left_leg", 170.0),
        ("right_leg", 170.0),
    ]
    .into_iter()
    .map(|(name, angle)| (name.to_string(), angle))
    .collect();

    let mut analysis = PoseAnalysis::new(angles);
    analysis.posture = "demo_mode".to_string();
    analysis.exercise_detected = Some("demo".to_string());
    analysis.form_score = 85;
    analysis.tips = vec![
        "Demo mode active".to_string(),
        "Real analysis requires on-device landmark detection".to_string(),
        "Keep good posture during the exercise".to_string(),
    ];
    analysis.source = AnalysisSource::Demo;
    analysis
}

fn not_detected_analysis() -> PoseAnalysis {
    let mut analysis = PoseAnalysis::new(BTreeMap::new());
    analysis.posture = "not_detected".to_string();
    analysis.tips = vec!["Make sure your whole body is visible to the camera".to_string()];
    analysis
}

/// Decode a base64 image payload, optionally wrapped in a `data:` URI.
pub fn decode_image(payload: &str) -> Result<Vec<u8>> {
    let encoded = match payload.split_once(',') {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => payload,
    };

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| AppError::BadRequest(format!("Invalid base64 image: {}", e)))?;

    if bytes.is_empty() {
        return Err(AppError::BadRequest("Image is empty".to_string()));
    }
    Ok(bytes)
}

/// What the client sent for analysis.
#[derive(Debug, Clone, Default)]
pub struct PoseInput {
    pub landmarks: Option<Vec<Landmark>>,
    pub image_base64: Option<String>,
    /// Restrict catalog matching to this exercise
    pub exercise: Option<String>,
}

/// Outcome of an analysis request.
#[derive(Debug, Clone)]
pub struct PoseOutcome {
    pub success: bool,
    pub message: String,
    pub landmarks: Option<Vec<Landmark>>,
    pub analysis: PoseAnalysis,
}

/// Pose analysis backed by the exercise catalog.
///
/// The catalog is loaded from the database on first use and kept in memory
/// until [`PoseService::invalidate`] is called. The `loaded` lock guards every
/// change to the cached map: readers hold it shared while copying entries out,
/// and loads and invalidations hold it exclusively.
pub struct PoseService {
    db: Database,
    catalog: DashMap<String, Arc<ExerciseDefinition>>,
    loaded: RwLock<bool>,
}

impl PoseService {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            catalog: DashMap::new(),
            loaded: RwLock::new(false),
        }
    }

    /// Active catalog entries with their rules, ordered by name.
    pub async fn definitions(&self) -> Result<Vec<Arc<ExerciseDefinition>>> {
        {
            let loaded = self.loaded.read().await;
            if *loaded {
                return Ok(self.snapshot());
            }
        }

        let mut loaded = self.loaded.write().await;
        // Another request may have loaded it while we waited
        if !*loaded {
            let definitions = self.db.load_active_definitions().await?;
            self.catalog.clear();
            for definition in definitions {
                self.catalog
                    .insert(definition.exercise.name.clone(), Arc::new(definition));
            }
            *loaded = true;
            tracing::debug!(count = self.catalog.len(), "Exercise catalog cached");
        }
        let _loaded = loaded.downgrade();
        Ok(self.snapshot())
    }

    fn snapshot(&self) -> Vec<Arc<ExerciseDefinition>> {
        let mut definitions: Vec<_> = self
            .catalog
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        definitions.sort_by(|a, b| a.exercise.name.cmp(&b.exercise.name));
        definitions
    }

    /// Drop the cached catalog so the next request reloads it.
    pub async fn invalidate(&self) {
        let mut loaded = self.loaded.write().await;
        *loaded = false;
        self.catalog.clear();
    }

    /// Active catalog entries for listing.
    pub async fn exercises(&self) -> Result<Vec<ExerciseDetection>> {
        Ok(self
            .definitions()
            .await?
            .iter()
            .map(|definition| definition.exercise.clone())
            .collect())
    }

    /// Seed the default catalog when empty, then refresh the cache.
    pub async fn seed_default_catalog(&self) -> Result<usize> {
        let inserted = super::seed::seed_catalog(&self.db).await?;
        self.invalidate().await;
        Ok(inserted)
    }

    /// Replace the catalog with the built-in one, then refresh the cache.
    pub async fn reseed_default_catalog(&self) -> Result<usize> {
        let inserted = super::seed::reseed_catalog(&self.db).await?;
        self.invalidate().await;
        Ok(inserted)
    }

    /// Analyse one pose.
    pub async fn analyze(&self, input: PoseInput) -> Result<PoseOutcome> {
        let landmarks = match (input.landmarks, input.image_base64) {
            (Some(landmarks), _) => landmarks,
            (None, Some(image)) => {
                let bytes = decode_image(&image)?;
                tracing::debug!(bytes = bytes.len(), "Image received without landmarks");
                return Ok(PoseOutcome {
                    success: false,
                    message: "Landmark detection is not available on this server; \
                              send landmarks detected on the device"
                        .to_string(),
                    landmarks: None,
                    analysis: demo_analysis(),
                });
            }
            (None, None) => {
                return Err(AppError::BadRequest(
                    "Either landmarks or image_base64 is required".to_string(),
                ))
            }
        };

        let definitions = self.definitions().await?;
        let candidates: Vec<&ExerciseDefinition> = match input.exercise.as_deref() {
            Some(name) => {
                let definition = definitions
                    .iter()
                    .find(|definition| definition.exercise.name == name)
                    .ok_or_else(|| AppError::NotFound(format!("Exercise '{}' not found", name)))?;
                vec![definition.as_ref()]
            }
            None => definitions.iter().map(|definition| definition.as_ref()).collect(),
        };

        if landmarks.is_empty() {
            return Ok(PoseOutcome {
                success: true,
                message: "No pose detected".to_string(),
                landmarks: None,
                analysis: not_detected_analysis(),
            });
        }

        let angles = joint_angles(&landmarks);
        let analysis = match best_match(candidates, &angles) {
            Some(found) => catalog_analysis(&found, angles),
            None => heuristic_analysis(&landmarks, angles),
        };

        tracing::debug!(
            posture = %analysis.posture,
            score = analysis.form_score,
            source = ?analysis.source,
            "Pose analysed"
        );

        Ok(PoseOutcome {
            success: true,
            message: "Pose analysed".to_string(),
            landmarks: Some(landmarks),
            analysis,
        })
    }
}
