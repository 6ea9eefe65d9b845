// ABOUTME: Untrusted plan candidate shape emitted by the planning capability
// ABOUTME: validate() turns a candidate into a PlanDraft or names the violated constraint
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Plan Candidates
//!
//! A [`PlanCandidate`] mirrors the persisted plan shape minus `user_id`,
//! `version` and `created_at`. Numeric fields are signed or floating point:
//! out-of-range values still deserialize and are then rejected by
//! [`PlanCandidate::validate`] with a message naming the constraint.

use replanner_core::models::{Activity, DailyPlan, Meal, MealType, PlanDraft};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A structural or value constraint a candidate violated
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanValidationError {
    /// The output was not a JSON object of the expected shape
    #[error("output is not a valid plan object: {reason}")]
    Unparseable {
        /// Parser message
        reason: String,
    },

    /// Title missing or blank
    #[error("title must be a non-empty string")]
    EmptyTitle,

    /// `duration_days` below 1
    #[error("duration_days must be at least 1, got {duration_days}")]
    InvalidDuration {
        /// Value supplied
        duration_days: i64,
    },

    /// Number of daily plans differs from `duration_days`
    #[error("daily_plans must contain exactly {expected} entries (one per day), got {actual}")]
    DayCountMismatch {
        /// `duration_days`
        expected: i64,
        /// Entries supplied
        actual: usize,
    },

    /// Day numbers are not 1..N in order
    #[error("daily_plans[{position}].day must be {expected} (days run 1..N in order), got {found}")]
    NonContiguousDays {
        /// Zero-based position in `daily_plans`
        position: usize,
        /// Day number required at that position
        expected: usize,
        /// Day number supplied
        found: i64,
    },

    /// A day has no meals
    #[error("day {day} must contain at least one meal")]
    NoMeals {
        /// Offending day
        day: i64,
    },

    /// Meal type outside Breakfast/Lunch/Dinner/Snack
    #[error("day {day} has meal_type {value:?}; allowed values are Breakfast, Lunch, Dinner, Snack")]
    InvalidMealType {
        /// Offending day
        day: i64,
        /// Value supplied
        value: String,
    },

    /// A meal's calories are missing, zero or negative
    #[error("day {day} {meal_type} estimated_kcal must be a positive number, got {value}")]
    InvalidKcal {
        /// Offending day
        day: i64,
        /// Meal the value belongs to
        meal_type: MealType,
        /// Value supplied
        value: f64,
    },

    /// Activity duration negative or not a number
    #[error("day {day} activity duration_minutes must be zero or more, got {value}")]
    InvalidActivityDuration {
        /// Offending day
        day: i64,
        /// Value supplied
        value: f64,
    },
}

/// One meal as proposed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealCandidate {
    /// Expected to be Breakfast, Lunch, Dinner or Snack
    pub meal_type: String,
    /// Meal idea
    #[serde(default, alias = "recipe_suggestion")]
    pub suggestion: String,
    /// Estimated calories
    pub estimated_kcal: f64,
}

/// Activity as proposed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCandidate {
    /// e.g. Cardio
    #[serde(default)]
    pub activity_type: String,
    /// Minutes
    pub duration_minutes: f64,
    /// Focus of the session
    #[serde(default)]
    pub description: String,
}

/// One day as proposed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlanCandidate {
    /// 1-based day number
    #[serde(alias = "day_index")]
    pub day: i64,
    /// Meals for the day
    #[serde(default)]
    pub meals: Vec<MealCandidate>,
    /// Primary activity
    pub activity: ActivityCandidate,
}

/// Plan as proposed by the planning capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanCandidate {
    /// Short motivational title
    #[serde(default, alias = "plan_title")]
    pub title: String,
    /// Number of days covered
    pub duration_days: i64,
    /// Why the plan looks the way it does
    #[serde(default, alias = "agent_reasoning")]
    pub reasoning: String,
    /// One entry per day
    #[serde(default)]
    pub daily_plans: Vec<DailyPlanCandidate>,
}

impl PlanCandidate {
    /// Parse raw model output.
    ///
    /// Accepts a bare JSON object or one wrapped in surrounding prose or a
    /// code fence.
    ///
    /// # Errors
    ///
    /// Returns [`PlanValidationError::Unparseable`] if no plan object can be
    /// extracted.
    pub fn parse(raw: &str) -> Result<Self, PlanValidationError> {
        let json = extract_json_object(raw).ok_or_else(|| PlanValidationError::Unparseable {
            reason: "no JSON object found in output".to_owned(),
        })?;
        serde_json::from_str(json).map_err(|e| PlanValidationError::Unparseable {
            reason: e.to_string(),
        })
    }

    /// Check every structural and value constraint and build a draft.
    ///
    /// The first violation found is returned.
    ///
    /// # Errors
    ///
    /// Returns the [`PlanValidationError`] describing the violated constraint.
    pub fn validate(
        self,
        user_id: &str,
        version: u32,
    ) -> Result<PlanDraft, PlanValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(PlanValidationError::EmptyTitle);
        }

        let duration_days = u32::try_from(self.duration_days)
            .ok()
            .filter(|d| *d >= 1)
            .ok_or(PlanValidationError::InvalidDuration {
                duration_days: self.duration_days,
            })?;

        if self.daily_plans.len() != duration_days as usize {
            return Err(PlanValidationError::DayCountMismatch {
                expected: self.duration_days,
                actual: self.daily_plans.len(),
            });
        }

        let daily_plans = self
            .daily_plans
            .into_iter()
            .enumerate()
            .map(|(position, day)| validate_day(position, day))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PlanDraft {
            user_id: user_id.to_owned(),
            version,
            title: title.to_owned(),
            duration_days,
            reasoning: self.reasoning.trim().to_owned(),
            daily_plans,
        })
    }
}

fn validate_day(
    position: usize,
    day: DailyPlanCandidate,
) -> Result<DailyPlan, PlanValidationError> {
    let expected = position + 1;
    let day_index = u32::try_from(day.day)
        .ok()
        .filter(|d| *d as usize == expected)
        .ok_or(PlanValidationError::NonContiguousDays {
            position,
            expected,
            found: day.day,
        })?;

    if day.meals.is_empty() {
        return Err(PlanValidationError::NoMeals { day: day.day });
    }

    let meals = day
        .meals
        .into_iter()
        .map(|meal| validate_meal(day.day, meal))
        .collect::<Result<Vec<_>, _>>()?;

    let minutes = day.activity.duration_minutes;
    if !minutes.is_finite() || minutes < 0.0 || minutes > f64::from(u32::MAX) {
        return Err(PlanValidationError::InvalidActivityDuration {
            day: day.day,
            value: minutes,
        });
    }

    Ok(DailyPlan {
        day_index,
        meals,
        activity: Activity {
            activity_type: day.activity.activity_type.trim().to_owned(),
            duration_minutes: minutes.round() as u32,
            description: day.activity.description.trim().to_owned(),
        },
    })
}

fn validate_meal(day: i64, meal: MealCandidate) -> Result<Meal, PlanValidationError> {
    let meal_type =
        MealType::parse(&meal.meal_type).ok_or_else(|| PlanValidationError::InvalidMealType {
            day,
            value: meal.meal_type.clone(),
        })?;

    // Must still be positive after rounding to whole kcal
    let kcal = meal.estimated_kcal;
    if !kcal.is_finite() || kcal.round() < 1.0 || kcal > f64::from(u32::MAX) {
        return Err(PlanValidationError::InvalidKcal {
            day,
            meal_type,
            value: kcal,
        });
    }

    Ok(Meal {
        meal_type,
        suggestion: meal.suggestion.trim().to_owned(),
        estimated_kcal: kcal.round() as u32,
    })
}

/// Extract the outermost JSON object from model output that may include extra text
fn extract_json_object(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if serde_json::from_str::<Value>(trimmed).is_ok_and(|v| v.is_object()) {
        return Some(trimmed);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    let candidate = &trimmed[start..=end];
    serde_json::from_str::<Value>(candidate)
        .is_ok_and(|v| v.is_object())
        .then_some(candidate)
}
