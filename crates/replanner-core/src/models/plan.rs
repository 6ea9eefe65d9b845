// ABOUTME: Versioned health plan models: Plan, PlanDraft, DailyPlan, Meal, Activity
// ABOUTME: Plans are immutable once persisted; every change is a new version
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of meal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Breakfast meal
    Breakfast,
    /// Lunch meal
    Lunch,
    /// Dinner meal
    Dinner,
    /// Snack between meals
    Snack,
}

impl MealType {
    /// Parse a meal type, case-insensitively. Returns `None` for anything else.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            "snack" => Some(Self::Snack),
            _ => None,
        }
    }

    /// Display name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single meal within a day's plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    /// Breakfast, lunch, dinner, or snack
    pub meal_type: MealType,
    /// Brief, specific meal idea
    pub suggestion: String,
    /// Estimated calories for this meal (kcal, > 0)
    pub estimated_kcal: u32,
}

/// The primary physical activity for a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// e.g. Cardio, Strength Training, Yoga
    pub activity_type: String,
    /// Suggested duration in minutes
    pub duration_minutes: u32,
    /// What the session should focus on
    pub description: String,
}

/// Meals and activity for one day of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPlan {
    /// 1-based position within the plan
    pub day_index: u32,
    /// Ordered, non-empty list of meals
    pub meals: Vec<Meal>,
    /// Primary activity
    pub activity: Activity,
}

impl DailyPlan {
    /// Total planned intake for the day
    #[must_use]
    pub fn planned_kcal(&self) -> u32 {
        self.meals
            .iter()
            .fold(0_u32, |total, meal| total.saturating_add(meal.estimated_kcal))
    }
}

/// A validated plan waiting to be persisted.
///
/// The generator owns `user_id` and `version`; the repository stamps
/// `created_at` when it writes the draft and returns the resulting [`Plan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDraft {
    /// Owner of the plan
    pub user_id: String,
    /// Version this draft will occupy (prior version + 1)
    pub version: u32,
    /// Short motivational title
    pub title: String,
    /// Number of days covered
    pub duration_days: u32,
    /// Why this plan was generated
    pub reasoning: String,
    /// One entry per day, ordered by `day_index`
    pub daily_plans: Vec<DailyPlan>,
}

impl PlanDraft {
    /// Turn the draft into a persisted plan with the given creation time
    #[must_use]
    pub fn into_plan(self, created_at: DateTime<Utc>) -> Plan {
        Plan {
            user_id: self.user_id,
            version: self.version,
            title: self.title,
            duration_days: self.duration_days,
            reasoning: self.reasoning,
            daily_plans: self.daily_plans,
            created_at,
        }
    }
}

/// A persisted, immutable plan version.
///
/// Exactly one plan exists per (`user_id`, `version`); the active plan for a
/// user is the one with the highest version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Owner of the plan
    pub user_id: String,
    /// Monotonically increasing version, starting at 1
    pub version: u32,
    /// Short motivational title
    pub title: String,
    /// Number of days covered
    pub duration_days: u32,
    /// Why this plan was generated
    pub reasoning: String,
    /// One entry per day, ordered by `day_index`
    pub daily_plans: Vec<DailyPlan>,
    /// When the plan was persisted
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Version the next plan for this user must take
    #[must_use]
    pub const fn next_version(&self) -> u32 {
        self.version.saturating_add(1)
    }

    /// Average planned intake per day
    #[must_use]
    pub fn average_planned_kcal(&self) -> Option<f64> {
        if self.daily_plans.is_empty() {
            return None;
        }
        let total: f64 = self
            .daily_plans
            .iter()
            .map(|d| f64::from(d.planned_kcal()))
            .sum();
        Some(total / self.daily_plans.len() as f64)
    }
}
