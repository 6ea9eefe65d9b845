// ABOUTME: User profile model used to derive a personalised daily calorie target
// ABOUTME: Sex, age, height, weight, activity level, free-text goal, optional explicit target
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Biological sex for BMR calculations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male (+5 Mifflin-St Jeor constant)
    Male,
    /// Female (-161 Mifflin-St Jeor constant)
    Female,
}

impl Sex {
    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Self::Male),
            "female" | "f" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Habitual activity level for TDEE calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Exercise 1-3 days/week
    LightlyActive,
    /// Exercise 3-5 days/week
    #[default]
    ModeratelyActive,
    /// Exercise 6-7 days/week
    VeryActive,
}

impl ActivityLevel {
    /// TDEE multiplier (`McArdle` et al., 2010)
    #[must_use]
    pub const fn factor(&self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::LightlyActive => 1.375,
            Self::ModeratelyActive => 1.55,
            Self::VeryActive => 1.725,
        }
    }

    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::LightlyActive => "lightly_active",
            Self::ModeratelyActive => "moderately_active",
            Self::VeryActive => "very_active",
        }
    }

    /// Parse from string, accepting spaces, dashes or underscores.
    /// Unrecognized values fall back to moderately active.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "sedentary" => Self::Sedentary,
            "lightly_active" | "light" => Self::LightlyActive,
            "very_active" | "very" => Self::VeryActive,
            _ => Self::ModeratelyActive,
        }
    }
}

/// Profile the calorie target is derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Owner of the profile
    pub user_id: String,
    /// Biological sex
    pub sex: Sex,
    /// Age in whole years
    pub age_years: u32,
    /// Height in centimetres
    pub height_cm: f64,
    /// Reference body weight in kilograms
    pub weight_kg: f64,
    /// Habitual activity level
    #[serde(default)]
    pub activity_level: ActivityLevel,
    /// Free-text goal handed to the plan generator
    #[serde(default)]
    pub goal: String,
    /// Explicit target that overrides the derived one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_calorie_target: Option<f64>,
}
