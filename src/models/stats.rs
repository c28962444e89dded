// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Streak bookkeeping and derived user statistics.
//!
//! The ledger keeps one `daily_stats` row per user and day. Everything here is
//! pure so it can be exercised without a database.

use serde::Serialize;

/// Number of trailing days (including today) counted as "this week".
pub const WEEK_WINDOW_DAYS: u64 = 7;
/// Number of trailing days (including today) counted as "this month".
pub const MONTH_WINDOW_DAYS: u64 = 30;

/// Streak counters stored on the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Streak {
    pub current: i64,
    pub longest: i64,
}

impl Streak {
    /// Advance the streak for the first activity of a new day.
    ///
    /// `active_yesterday` is whether the previous calendar day earned points.
    pub fn advance(self, active_yesterday: bool) -> Self {
        let current = if active_yesterday { self.current + 1 } else { 1 };
        Self {
            current,
            longest: self.longest.max(current),
        }
    }
}

/// Aggregates pulled from the ledger for the stats endpoint.
#[derive(Debug, Clone, Default)]
pub struct LedgerWindow {
    pub points_this_week: i64,
    pub points_this_month: i64,
    /// Days in the month window with at least one point
    pub active_days_this_month: i64,
}

/// Derived figures shown on the dashboard.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DerivedStats {
    pub average_daily_points: f64,
    pub consistency_score: f64,
}

impl LedgerWindow {
    pub fn derive(&self) -> DerivedStats {
        let days = MONTH_WINDOW_DAYS as f64;
        let active = self.active_days_this_month.clamp(0, MONTH_WINDOW_DAYS as i64) as f64;
        DerivedStats {
            average_daily_points: round1(self.points_this_month as f64 / days),
            consistency_score: round1(active / days * 100.0),
        }
    }
}

/// Dashboard statistics for one user.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct UserStats {
    pub total_points: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub level: i64,
    pub total_exercises: i64,
    pub total_meals_logged: i64,
    pub total_water_glasses: i64,
    pub total_wellness_activities: i64,
    pub points_this_week: i64,
    pub points_this_month: i64,
    pub average_daily_points: f64,
    pub favorite_exercise_category: Option<String>,
    pub consistency_score: f64,
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_starts_at_one() {
        let streak = Streak { current: 0, longest: 0 }.advance(false);
        assert_eq!(streak, Streak { current: 1, longest: 1 });
    }

    #[test]
    fn test_streak_continues_after_active_day() {
        let streak = Streak { current: 4, longest: 4 }.advance(true);
        assert_eq!(streak, Streak { current: 5, longest: 5 });
    }

    #[test]
    fn test_streak_reset_keeps_longest() {
        let streak = Streak { current: 6, longest: 9 }.advance(false);
        assert_eq!(streak, Streak { current: 1, longest: 9 });
    }

    #[test]
    fn test_derived_stats() {
        let window = LedgerWindow {
            points_this_week: 120,
            points_this_month: 455,
            active_days_this_month: 7,
        };
        let derived = window.derive();
        assert_eq!(derived.average_daily_points, 15.2);
        assert_eq!(derived.consistency_score, 23.3);
    }

    #[test]
    fn test_derived_stats_empty() {
        let derived = LedgerWindow::default().derive();
        assert_eq!(derived.average_daily_points, 0.0);
        assert_eq!(derived.consistency_score, 0.0);
    }
}
