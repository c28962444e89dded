// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Body landmarks and pose analysis results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Landmark names in the 33-point body model, indexed by landmark id.
pub const LANDMARK_NAMES: [&str; 33] = [
    "NOSE",
    "LEFT_EYE_INNER",
    "LEFT_EYE",
    "LEFT_EYE_OUTER",
    "RIGHT_EYE_INNER",
    "RIGHT_EYE",
    "RIGHT_EYE_OUTER",
    "LEFT_EAR",
    "RIGHT_EAR",
    "MOUTH_LEFT",
    "MOUTH_RIGHT",
    "LEFT_SHOULDER",
    "RIGHT_SHOULDER",
    "LEFT_ELBOW",
    "RIGHT_ELBOW",
    "LEFT_WRIST",
    "RIGHT_WRIST",
    "LEFT_PINKY",
    "RIGHT_PINKY",
    "LEFT_INDEX",
    "RIGHT_INDEX",
    "LEFT_THUMB",
    "RIGHT_THUMB",
    "LEFT_HIP",
    "RIGHT_HIP",
    "LEFT_KNEE",
    "RIGHT_KNEE",
    "LEFT_ANKLE",
    "RIGHT_ANKLE",
    "LEFT_HEEL",
    "RIGHT_HEEL",
    "LEFT_FOOT_INDEX",
    "RIGHT_FOOT_INDEX",
];

/// One detected body landmark in normalized image coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Landmark {
    pub id: usize,
    /// Landmark name; derived from `id` when omitted
    #[serde(default)]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default = "default_visibility")]
    pub visibility: f64,
}

fn default_visibility() -> f64 {
    1.0
}

impl Landmark {
    /// Canonical name, preferring the id mapping over a client-supplied name.
    pub fn canonical_name(&self) -> Option<&str> {
        LANDMARK_NAMES
            .get(self.id)
            .copied()
            .or(self.name.as_deref())
    }
}

/// Where the verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    /// Matched against the exercise catalog
    Catalog,
    /// Fixed posture heuristics
    Heuristic,
    /// Placeholder returned when no landmarks were supplied
    Demo,
}

/// Result of analysing one pose.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PoseAnalysis {
    pub posture: String,
    pub exercise_detected: Option<String>,
    pub form_score: i64,
    pub tips: Vec<String>,
    /// Joint angles in degrees, keyed by angle name
    pub angles: BTreeMap<String, f64>,
    pub source: AnalysisSource,
}

impl PoseAnalysis {
    pub fn new(angles: BTreeMap<String, f64>) -> Self {
        Self {
            posture: "unknown".to_string(),
            exercise_detected: None,
            form_score: 0,
            tips: Vec::new(),
            angles,
            source: AnalysisSource::Heuristic,
        }
    }
}
