// ABOUTME: Tests for parsing and validating untrusted plan candidates
// ABOUTME: Each structural constraint is checked with a candidate that violates only it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use pierre_replanner::models::{MealType, PlanDraft};
use pierre_replanner::planning::{PlanCandidate, PlanValidationError};
use serde_json::{json, Value};

fn validate(value: &Value) -> Result<PlanDraft, PlanValidationError> {
    PlanCandidate::parse(&value.to_string())?.validate("u1", 4)
}

#[test]
fn test_valid_candidate_becomes_draft() {
    let draft = validate(&common::candidate_json(7)).unwrap();

    assert_eq!(draft.user_id, "u1");
    assert_eq!(draft.version, 4);
    assert_eq!(draft.duration_days, 7);
    assert_eq!(draft.daily_plans.len(), 7);
    assert_eq!(draft.title, "Week 1: Move More");
    let indices: Vec<u32> = draft.daily_plans.iter().map(|d| d.day_index).collect();
    assert_eq!(indices, (1..=7).collect::<Vec<_>>());
    assert_eq!(draft.daily_plans[0].meals[1].meal_type, MealType::Lunch);
    assert_eq!(draft.daily_plans[0].planned_kcal(), 1_650);
}

#[test]
fn test_parse_accepts_fenced_output_and_legacy_field_names() {
    let raw = r#"Here is your plan:
```json
{"plan_title": "Reset", "duration_days": 1, "agent_reasoning": "Low steps",
 "daily_plans": [{"day": 1,
   "meals": [{"meal_type": "snack", "recipe_suggestion": "Apple", "estimated_kcal": 95.4}],
   "activity": {"activity_type": "Walk", "duration_minutes": 20, "description": "Outdoors"}}]}
```"#;

    let draft = PlanCandidate::parse(raw).unwrap().validate("u1", 1).unwrap();
    assert_eq!(draft.title, "Reset");
    assert_eq!(draft.reasoning, "Low steps");
    let meal = &draft.daily_plans[0].meals[0];
    assert_eq!(meal.meal_type, MealType::Snack);
    assert_eq!(meal.suggestion, "Apple");
    assert_eq!(meal.estimated_kcal, 95);
}

#[test]
fn test_unparseable_output() {
    let err = PlanCandidate::parse("I cannot help with that.").unwrap_err();
    assert!(matches!(err, PlanValidationError::Unparseable { .. }));

    let err = PlanCandidate::parse(r#"{"title": "x"}"#).unwrap_err();
    assert!(matches!(err, PlanValidationError::Unparseable { .. }));
}

#[test]
fn test_zero_duration_rejected() {
    let mut value = common::candidate_json(1);
    value["duration_days"] = json!(0);
    value["daily_plans"] = json!([]);
    assert_eq!(
        validate(&value).unwrap_err(),
        PlanValidationError::InvalidDuration { duration_days: 0 }
    );
}

#[test]
fn test_day_count_must_match_duration() {
    let err = PlanCandidate::parse(&common::mismatched_candidate())
        .unwrap()
        .validate("u1", 1)
        .unwrap_err();
    assert_eq!(
        err,
        PlanValidationError::DayCountMismatch {
            expected: 5,
            actual: 3
        }
    );
    assert!(err.to_string().contains("exactly 5 entries"));
}

#[test]
fn test_days_must_be_contiguous_from_one() {
    let mut value = common::candidate_json(3);
    value["daily_plans"][1]["day"] = json!(3);
    assert_eq!(
        validate(&value).unwrap_err(),
        PlanValidationError::NonContiguousDays {
            position: 1,
            expected: 2,
            found: 3
        }
    );

    let mut value = common::candidate_json(2);
    value["daily_plans"][0]["day"] = json!(0);
    assert!(matches!(
        validate(&value).unwrap_err(),
        PlanValidationError::NonContiguousDays { position: 0, .. }
    ));
}

#[test]
fn test_each_day_needs_a_meal() {
    let mut value = common::candidate_json(2);
    value["daily_plans"][1]["meals"] = json!([]);
    assert_eq!(
        validate(&value).unwrap_err(),
        PlanValidationError::NoMeals { day: 2 }
    );
}

#[test]
fn test_meal_type_must_be_known() {
    let mut value = common::candidate_json(1);
    value["daily_plans"][0]["meals"][0]["meal_type"] = json!("Brunch");
    let err = validate(&value).unwrap_err();
    assert!(matches!(err, PlanValidationError::InvalidMealType { day: 1, ref value } if value == "Brunch"));
}

#[test]
fn test_kcal_must_be_positive() {
    for kcal in [json!(0), json!(-250), json!(0.2)] {
        let mut value = common::candidate_json(1);
        value["daily_plans"][0]["meals"][2]["estimated_kcal"] = kcal;
        assert!(matches!(
            validate(&value).unwrap_err(),
            PlanValidationError::InvalidKcal {
                day: 1,
                meal_type: MealType::Dinner,
                ..
            }
        ));
    }
}

#[test]
fn test_activity_duration_must_not_be_negative() {
    let mut value = common::candidate_json(1);
    value["daily_plans"][0]["activity"]["duration_minutes"] = json!(-10);
    assert!(matches!(
        validate(&value).unwrap_err(),
        PlanValidationError::InvalidActivityDuration { day: 1, .. }
    ));

    // Rest days are allowed
    value["daily_plans"][0]["activity"]["duration_minutes"] = json!(0);
    let draft = validate(&value).unwrap();
    assert_eq!(draft.daily_plans[0].activity.duration_minutes, 0);
}

#[test]
fn test_title_must_not_be_blank() {
    let mut value = common::candidate_json(1);
    value["title"] = json!("   ");
    assert_eq!(validate(&value).unwrap_err(), PlanValidationError::EmptyTitle);
}
