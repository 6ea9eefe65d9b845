// ABOUTME: Daily calorie target derived from a user profile via Mifflin-St Jeor BMR and TDEE
// ABOUTME: Explicit profile targets win; otherwise target = TDEE minus the weight-loss deficit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use replanner_core::constants::nutrition::{
    MSJ_AGE_COEF, MSJ_FEMALE_CONSTANT, MSJ_HEIGHT_COEF, MSJ_MALE_CONSTANT, MSJ_WEIGHT_COEF,
    WEIGHT_LOSS_DEFICIT_KCAL,
};
use replanner_core::errors::{AppError, AppResult};
use replanner_core::models::{Sex, UserProfile};

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor (1990)
///
/// Formula:
/// - Men: BMR = 10 x weight(kg) + 6.25 x height(cm) - 5 x age(y) + 5
/// - Women: BMR = 10 x weight(kg) + 6.25 x height(cm) - 5 x age(y) - 161
///
/// # Errors
///
/// Returns an `EVALUATION_ERROR` if weight, height, or age is not positive.
pub fn mifflin_st_jeor_bmr(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    sex: Sex,
) -> AppResult<f64> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(AppError::evaluation("Weight must be positive"));
    }
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(AppError::evaluation("Height must be positive"));
    }
    if age_years == 0 {
        return Err(AppError::evaluation("Age must be positive"));
    }

    let sex_constant = match sex {
        Sex::Male => MSJ_MALE_CONSTANT,
        Sex::Female => MSJ_FEMALE_CONSTANT,
    };

    Ok(MSJ_WEIGHT_COEF * weight_kg
        + MSJ_HEIGHT_COEF * height_cm
        + MSJ_AGE_COEF * f64::from(age_years)
        + sex_constant)
}

/// Daily calorie target for a profile.
///
/// Uses the profile's explicit target if set. Otherwise derives
/// `round(BMR x activity factor - deficit)`, preferring the weight logged
/// for the day over the profile's reference weight.
///
/// # Errors
///
/// Returns an `EVALUATION_ERROR` if the profile's body measurements are invalid.
pub fn daily_calorie_target(
    profile: &UserProfile,
    logged_weight_kg: Option<f64>,
) -> AppResult<f64> {
    if let Some(target) = profile.daily_calorie_target {
        return Ok(target);
    }

    let weight_kg = logged_weight_kg
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(profile.weight_kg);
    let bmr = mifflin_st_jeor_bmr(weight_kg, profile.height_cm, profile.age_years, profile.sex)?;
    let tdee = bmr * profile.activity_level.factor();

    Ok((tdee - WEIGHT_LOSS_DEFICIT_KCAL).round())
}
