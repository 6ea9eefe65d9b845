// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging, fixtures, scripted planning capabilities, and failing storage fakes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
//! Shared test utilities for `pierre_replanner`

use std::collections::VecDeque;
use std::env;
use std::future::pending;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use pierre_replanner::database::{HealthRecordSource, InMemoryPlanRepository, PlanRepository};
use pierre_replanner::errors::{AppError, AppResult, StorageError};
use pierre_replanner::models::{
    Activity, DailyPlan, HealthRecord, Meal, MealType, Plan, PlanDraft,
};
use pierre_replanner::planning::{PlanGenerator, PlanningCapability, PlanningContext};
use serde_json::{json, Value};
use tokio::sync::Notify;
use tokio::time::sleep;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn test_date() -> NaiveDate {
    date(2025, 3, 14)
}

// ============================================================================
// Plan fixtures
// ============================================================================

pub fn daily_plan(day_index: u32) -> DailyPlan {
    DailyPlan {
        day_index,
        meals: vec![
            Meal {
                meal_type: MealType::Breakfast,
                suggestion: "Oats with berries".to_owned(),
                estimated_kcal: 450,
            },
            Meal {
                meal_type: MealType::Dinner,
                suggestion: "Salmon, rice and greens".to_owned(),
                estimated_kcal: 700,
            },
        ],
        activity: Activity {
            activity_type: "Cardio".to_owned(),
            duration_minutes: 30,
            description: "Brisk walk".to_owned(),
        },
    }
}

pub fn plan_draft(user_id: &str, version: u32, days: u32) -> PlanDraft {
    PlanDraft {
        user_id: user_id.to_owned(),
        version,
        title: format!("Plan v{version}"),
        duration_days: days,
        reasoning: "Steady start".to_owned(),
        daily_plans: (1..=days).map(daily_plan).collect(),
    }
}

/// Persist versions 1..=`up_to` for the user
pub async fn seed_versions(repo: &dyn PlanRepository, user_id: &str, up_to: u32) -> Plan {
    let mut last = None;
    for version in 1..=up_to {
        last = Some(repo.save(plan_draft(user_id, version, 3)).await.unwrap());
    }
    last.expect("up_to must be at least 1")
}

/// Candidate JSON in the shape the planning capability emits
pub fn candidate_json(days: u32) -> Value {
    let daily_plans: Vec<Value> = (1..=days)
        .map(|day| {
            json!({
                "day": day,
                "meals": [
                    { "meal_type": "Breakfast", "suggestion": "Greek yogurt with walnuts", "estimated_kcal": 400 },
                    { "meal_type": "Lunch", "suggestion": "Chicken and quinoa bowl", "estimated_kcal": 650 },
                    { "meal_type": "Dinner", "suggestion": "Lentil stew", "estimated_kcal": 600 }
                ],
                "activity": { "activity_type": "Walking", "duration_minutes": 40, "description": "Easy pace" }
            })
        })
        .collect();

    json!({
        "title": "Week 1: Move More",
        "duration_days": days,
        "reasoning": "Shift focus toward daily movement.",
        "daily_plans": daily_plans
    })
}

pub fn valid_candidate(days: u32) -> String {
    candidate_json(days).to_string()
}

/// Candidate whose day count does not match `duration_days`
pub fn mismatched_candidate() -> String {
    let mut value = candidate_json(3);
    value["duration_days"] = json!(5);
    value.to_string()
}

// ============================================================================
// Planning capabilities
// ============================================================================

/// One scripted capability response
pub enum Scripted {
    Output(String),
    Fail(AppError),
    Hang,
}

/// Capability that replays scripted responses and records corrections
#[derive(Default)]
pub struct ScriptedCapability {
    script: Mutex<VecDeque<Scripted>>,
    calls: AtomicU32,
    corrections: Mutex<Vec<Option<String>>>,
}

impl ScriptedCapability {
    pub fn new(script: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        })
    }

    pub fn outputs(outputs: &[String]) -> Arc<Self> {
        Self::new(outputs.iter().cloned().map(Scripted::Output).collect())
    }

    pub fn always_valid() -> Arc<Self> {
        Self::outputs(&[valid_candidate(7)])
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn corrections(&self) -> Vec<Option<String>> {
        self.corrections.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlanningCapability for ScriptedCapability {
    async fn propose(
        &self,
        _context: &PlanningContext,
        correction: Option<&str>,
    ) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.corrections
            .lock()
            .unwrap()
            .push(correction.map(str::to_owned));

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Output(raw)) => Ok(raw),
            Some(Scripted::Fail(error)) => Err(error),
            Some(Scripted::Hang) => {
                sleep(Duration::from_secs(3600)).await;
                Err(AppError::internal("unreachable"))
            }
            // Script exhausted: keep answering with a valid week
            None => Ok(valid_candidate(7)),
        }
    }
}

/// Capability that blocks until released, for concurrency tests
pub struct GatedCapability {
    pub entered: Notify,
    pub release: Notify,
}

impl GatedCapability {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            release: Notify::new(),
        })
    }
}

#[async_trait]
impl PlanningCapability for GatedCapability {
    async fn propose(
        &self,
        _context: &PlanningContext,
        _correction: Option<&str>,
    ) -> AppResult<String> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(valid_candidate(7))
    }
}

pub fn generator_for(capability: Arc<dyn PlanningCapability>) -> PlanGenerator {
    PlanGenerator::new(capability, Duration::from_secs(5))
}

// ============================================================================
// Failing storage fakes
// ============================================================================

/// Plan repository whose reads or writes fail
pub struct FailingPlans {
    pub fail_reads: bool,
    pub saves: AtomicU32,
}

impl FailingPlans {
    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            fail_reads: true,
            saves: AtomicU32::new(0),
        })
    }

    pub fn read_only() -> Arc<Self> {
        Arc::new(Self {
            fail_reads: false,
            saves: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl PlanRepository for FailingPlans {
    async fn get_active_plan(&self, _user_id: &str) -> Result<Option<Plan>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::connection("plan store unreachable"));
        }
        Ok(None)
    }

    async fn save(&self, _draft: PlanDraft) -> Result<Plan, StorageError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::query("disk full"))
    }

    async fn get_history(&self, _user_id: &str) -> Result<Vec<Plan>, StorageError> {
        Ok(Vec::new())
    }
}

/// Plan repository that commits a save and then never returns.
///
/// Lets a test cancel a run after its commit point.
pub struct StallAfterSave {
    pub inner: InMemoryPlanRepository,
    pub saved: Notify,
}

impl StallAfterSave {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryPlanRepository::new(),
            saved: Notify::new(),
        })
    }
}

#[async_trait]
impl PlanRepository for StallAfterSave {
    async fn get_active_plan(&self, user_id: &str) -> Result<Option<Plan>, StorageError> {
        self.inner.get_active_plan(user_id).await
    }

    async fn save(&self, draft: PlanDraft) -> Result<Plan, StorageError> {
        self.inner.save(draft).await?;
        self.saved.notify_one();
        pending().await
    }

    async fn get_history(&self, user_id: &str) -> Result<Vec<Plan>, StorageError> {
        self.inner.get_history(user_id).await
    }
}

/// Health-record source that is always unreachable
pub struct UnreachableRecords;

#[async_trait]
impl HealthRecordSource for UnreachableRecords {
    async fn get_record(
        &self,
        _user_id: &str,
        _date: NaiveDate,
    ) -> Result<Option<HealthRecord>, StorageError> {
        Err(StorageError::connection("wearable sync offline"))
    }
}

pub fn now_date() -> NaiveDate {
    Utc::now().date_naive()
}
