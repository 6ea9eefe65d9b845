// ABOUTME: Compliance evaluation comparing a day's logged intake and activity to the target
// ABOUTME: Produces ComplianceMetrics; guards against non-positive or non-finite targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use replanner_core::errors::{AppError, AppResult};
use replanner_core::models::{HealthRecord, Plan};
use serde::{Deserialize, Serialize};

/// Derived adherence quantities for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplianceMetrics {
    /// `calories_consumed / target_calories`; `None` when there is no active plan
    pub calorie_ratio: Option<f64>,
    /// Steps logged for the day
    pub steps: u32,
    /// Calories logged for the day
    pub calories_consumed: f64,
    /// Target the ratio was computed against
    pub target_calories: f64,
}

/// Compute compliance metrics for a day.
///
/// Without an active plan there is nothing to adhere to, so `calorie_ratio`
/// is left unset; the router gives plan absence priority over metrics anyway.
///
/// # Errors
///
/// Returns an `EVALUATION_ERROR` if `target_calories` is not a positive,
/// finite number. The target is checked whether or not a plan exists.
pub fn evaluate(
    active_plan: Option<&Plan>,
    record: &HealthRecord,
    target_calories: f64,
) -> AppResult<ComplianceMetrics> {
    if !target_calories.is_finite() || target_calories <= 0.0 {
        return Err(AppError::evaluation(format!(
            "Target calories must be positive, got {target_calories}"
        )));
    }

    let calorie_ratio = active_plan.map(|_| record.calories_consumed / target_calories);

    Ok(ComplianceMetrics {
        calorie_ratio,
        steps: record.steps,
        calories_consumed: record.calories_consumed,
        target_calories,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::{NaiveDate, Utc};
    use replanner_core::errors::ErrorCode;
    use replanner_core::models::PlanDraft;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn plan() -> Plan {
        PlanDraft {
            user_id: "user-1".to_owned(),
            version: 1,
            title: "Steady Start".to_owned(),
            duration_days: 1,
            reasoning: "initial".to_owned(),
            daily_plans: Vec::new(),
        }
        .into_plan(Utc::now())
    }

    #[test]
    fn test_ratio_is_consumed_over_target() {
        let record = HealthRecord::new("user-1", day(), 2500.0, 8000);
        let metrics = evaluate(Some(&plan()), &record, 2000.0).unwrap();

        assert_eq!(metrics.calorie_ratio, Some(1.25));
        assert_eq!(metrics.steps, 8000);
    }

    #[test]
    fn test_no_plan_leaves_ratio_unset() {
        let record = HealthRecord::new("user-1", day(), 2500.0, 8000);
        let metrics = evaluate(None, &record, 2000.0).unwrap();

        assert_eq!(metrics.calorie_ratio, None);
        assert!((metrics.target_calories - 2000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_positive_target_is_rejected() {
        let record = HealthRecord::empty("user-1", day());
        for target in [0.0, -100.0, f64::NAN, f64::INFINITY] {
            let err = evaluate(Some(&plan()), &record, target).unwrap_err();
            assert_eq!(err.code, ErrorCode::EvaluationFailed);

            let err = evaluate(None, &record, target).unwrap_err();
            assert_eq!(err.code, ErrorCode::EvaluationFailed);
        }
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let plan = plan();
        let record = HealthRecord::new("user-1", day(), 1900.0, 6000);
        let first = evaluate(Some(&plan), &record, 2000.0).unwrap();
        let second = evaluate(Some(&plan), &record, 2000.0).unwrap();
        assert_eq!(first, second);
    }
}
