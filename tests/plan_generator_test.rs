// ABOUTME: Tests for PlanGenerator retry, timeout, and version assignment behavior
// ABOUTME: Uses scripted planning capabilities; no network access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::time::Duration;

use chrono::Utc;
use common::{Scripted, ScriptedCapability};
use pierre_replanner::constants::generation::DEFAULT_TIMEOUT_SECS;
use pierre_replanner::errors::{AppError, ErrorCode};
use pierre_replanner::intelligence::{evaluate, Decision};
use pierre_replanner::models::HealthRecord;
use pierre_replanner::planning::{PlanGenerator, PlanningContext};

fn context(prior_version: Option<u32>, decision: Decision) -> PlanningContext {
    let record = HealthRecord::new("u1", common::test_date(), 1_800.0, 3_000);
    let prior_plan =
        prior_version.map(|v| common::plan_draft("u1", v, 3).into_plan(Utc::now()));
    let metrics = evaluate(prior_plan.as_ref(), &record, 2_000.0).unwrap();
    PlanningContext {
        user_id: "u1".to_owned(),
        date: common::test_date(),
        profile: None,
        prior_plan,
        record,
        metrics,
        decision,
        report: "Activity Alert".to_owned(),
    }
}

#[tokio::test]
async fn test_first_plan_is_version_one() {
    common::init_test_logging();
    let capability = ScriptedCapability::always_valid();
    let generator = common::generator_for(capability.clone());

    let draft = generator
        .generate(&context(None, Decision::CreateNewPlan))
        .await
        .unwrap();

    assert_eq!(draft.version, 1);
    assert_eq!(draft.user_id, "u1");
    assert_eq!(capability.calls(), 1);
    assert_eq!(capability.corrections(), vec![None]);
}

#[tokio::test]
async fn test_version_follows_prior_plan() {
    common::init_test_logging();
    let generator = common::generator_for(ScriptedCapability::always_valid());

    let draft = generator
        .generate(&context(Some(3), Decision::ReplanHighCalories))
        .await
        .unwrap();
    assert_eq!(draft.version, 4);
}

#[tokio::test]
async fn test_single_retry_carries_violated_constraint() {
    common::init_test_logging();
    let capability =
        ScriptedCapability::outputs(&[common::mismatched_candidate(), common::valid_candidate(3)]);
    let generator = common::generator_for(capability.clone());

    let draft = generator
        .generate(&context(Some(1), Decision::ReplanLowActivity))
        .await
        .unwrap();

    assert_eq!(draft.duration_days, 3);
    assert_eq!(capability.calls(), 2);
    let corrections = capability.corrections();
    assert_eq!(corrections[0], None);
    let correction = corrections[1].as_deref().unwrap();
    assert!(correction.contains("daily_plans must contain exactly 5 entries"));
}

#[tokio::test]
async fn test_unparseable_output_is_retried() {
    common::init_test_logging();
    let capability = ScriptedCapability::outputs(&[
        "Sure! Here's a plan: eat well.".to_owned(),
        common::valid_candidate(7),
    ]);
    let generator = common::generator_for(capability.clone());

    let draft = generator
        .generate(&context(None, Decision::CreateNewPlan))
        .await
        .unwrap();
    assert_eq!(draft.duration_days, 7);
    assert_eq!(capability.calls(), 2);
}

#[tokio::test]
async fn test_second_validation_failure_is_fatal() {
    common::init_test_logging();
    let capability = ScriptedCapability::outputs(&[
        common::mismatched_candidate(),
        common::mismatched_candidate(),
        common::valid_candidate(7),
    ]);
    let generator = common::generator_for(capability.clone());

    let err = generator
        .generate(&context(Some(1), Decision::ReplanLowActivity))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::GenerationFailed);
    assert_eq!(err.context.details["attempts"], 2);
    assert!(err.message.contains("after 2 attempts"));
    // No third call, even though the script has a valid answer queued
    assert_eq!(capability.calls(), 2);
}

#[tokio::test]
async fn test_capability_error_is_fatal_without_retry() {
    common::init_test_logging();
    let capability = ScriptedCapability::new(vec![Scripted::Fail(AppError::new(
        ErrorCode::ExternalRateLimited,
        "OpenAI: rate limit reached",
    ))]);
    let generator = common::generator_for(capability.clone());

    let err = generator
        .generate(&context(None, Decision::CreateNewPlan))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::GenerationFailed);
    assert_eq!(err.context.details["cause"], "EXTERNAL_RATE_LIMITED");
    assert_eq!(capability.calls(), 1);
}

#[tokio::test]
async fn test_timeout_is_fatal_without_retry() {
    common::init_test_logging();
    let capability = ScriptedCapability::new(vec![Scripted::Hang]);
    let generator = PlanGenerator::new(capability.clone(), Duration::from_millis(50));
    assert_eq!(generator.timeout(), Duration::from_millis(50));

    let err = generator
        .generate(&context(Some(2), Decision::ReplanHighCalories))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::GenerationFailed);
    assert_eq!(err.context.details["cause"], "TIMEOUT");
    assert_eq!(capability.calls(), 1);
}

#[test]
fn test_default_timeout() {
    let generator = PlanGenerator::with_default_timeout(ScriptedCapability::always_valid());
    assert_eq!(generator.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
}
