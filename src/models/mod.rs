// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Data models for the application.

pub mod activity;
pub mod chat;
pub mod exercise;
pub mod pose;
pub mod stats;
pub mod user;

pub use activity::{
    Activity, ActivityType, DailyStats, MoodLevel, NewActivity, PointCategory, RecordedActivity,
};
pub use exercise::{ExerciseDefinition, ExerciseDetection};
pub use pose::{Landmark, PoseAnalysis};
pub use stats::{LedgerWindow, Streak, UserStats};
pub use user::{NewUser, ProfileUpdate, User};
