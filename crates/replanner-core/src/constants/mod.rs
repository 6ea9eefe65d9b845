// ABOUTME: Application-wide constants for replanning decisions and calorie targets
// ABOUTME: Thresholds used by the decision router and nutrition target calculation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Thresholds that trigger a replan
pub mod thresholds {
    /// Calorie ratio (consumed / target) above which the plan is regenerated.
    /// Strictly greater than: a ratio of exactly 1.2 keeps the current plan.
    pub const HIGH_CALORIE_RATIO: f64 = 1.2;

    /// Daily step count below which the plan is regenerated.
    /// Strictly less than: exactly 5000 steps keeps the current plan.
    pub const MIN_DAILY_STEPS: u32 = 5_000;
}

/// Nutrition constants used to derive a daily calorie target
pub mod nutrition {
    /// Target used when a user has no profile on record (kcal/day)
    pub const DEFAULT_TARGET_CALORIES: f64 = 2_000.0;

    /// Daily deficit applied to TDEE for weight-loss goals (kcal/day)
    pub const WEIGHT_LOSS_DEFICIT_KCAL: f64 = 500.0;

    /// Mifflin-St Jeor weight coefficient
    pub const MSJ_WEIGHT_COEF: f64 = 10.0;

    /// Mifflin-St Jeor height coefficient
    pub const MSJ_HEIGHT_COEF: f64 = 6.25;

    /// Mifflin-St Jeor age coefficient
    pub const MSJ_AGE_COEF: f64 = -5.0;

    /// Mifflin-St Jeor male constant
    pub const MSJ_MALE_CONSTANT: f64 = 5.0;

    /// Mifflin-St Jeor female constant
    pub const MSJ_FEMALE_CONSTANT: f64 = -161.0;
}

/// Plan generation limits
pub mod generation {
    /// Number of additional attempts after a candidate fails schema validation
    pub const VALIDATION_RETRIES: u32 = 1;

    /// Default timeout for a single call to the generation capability (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 90;
}
