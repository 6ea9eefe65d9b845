// ABOUTME: ReplanningWorkflow orchestrating fetch, evaluate, decide, and generate-and-persist
// ABOUTME: One sequential run per call; at most one in-flight run per user
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Replanning Workflow
//!
//! A run executes strictly in order:
//!
//! 1. fetch the active plan, the day's health record and the profile
//! 2. derive the calorie target and evaluate compliance
//! 3. route to a [`Decision`]
//! 4. for a plan-changing decision, generate and persist the next version;
//!    otherwise return the active plan untouched
//!
//! Persistence is the commit point. Nothing is written unless generation
//! produced a validated draft, and a plan that was saved stays active even if
//! the caller drops the run afterwards.

mod registry;

pub use registry::{RunGuard, RunRegistry};

use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use replanner_core::models::{HealthRecord, Plan, UserProfile};
use replanner_intelligence::{
    daily_calorie_target, evaluate, ComplianceMetrics, Decision, DecisionRouter,
};
use serde::Serialize;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::config::WorkflowConfig;
use crate::database::{HealthRecordSource, PlanRepository, ProfileSource};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::logging::AppLogger;
use crate::planning::{PlanGenerator, PlanningContext};

/// Outcome of one workflow run, handed to the UI boundary
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    /// Identifier of this run
    pub run_id: Uuid,
    /// User the run was for
    pub user_id: String,
    /// Day that was evaluated
    pub date: NaiveDate,
    /// What the router decided
    pub decision: Decision,
    /// Active plan after the run
    pub plan: Plan,
    /// Whether a new plan version was persisted
    pub changed: bool,
    /// Metrics the decision was based on
    pub metrics: ComplianceMetrics,
    /// Human-readable progress report
    pub report: String,
}

/// Orchestrates a replanning run over injected collaborators
pub struct ReplanningWorkflow {
    plans: Arc<dyn PlanRepository>,
    records: Arc<dyn HealthRecordSource>,
    profiles: Option<Arc<dyn ProfileSource>>,
    generator: PlanGenerator,
    config: WorkflowConfig,
    registry: RunRegistry,
}

impl ReplanningWorkflow {
    /// Create a workflow with default settings and no profile source
    #[must_use]
    pub fn new(
        plans: Arc<dyn PlanRepository>,
        records: Arc<dyn HealthRecordSource>,
        generator: PlanGenerator,
    ) -> Self {
        let config = WorkflowConfig {
            generation_timeout: generator.timeout(),
            ..WorkflowConfig::default()
        };
        Self {
            plans,
            records,
            profiles: None,
            generator,
            config,
            registry: RunRegistry::new(),
        }
    }

    /// Derive calorie targets from user profiles
    #[must_use]
    pub fn with_profiles(mut self, profiles: Arc<dyn ProfileSource>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    /// Use the given thresholds, default target and timeout settings.
    ///
    /// The generation timeout replaces the one the generator was built with.
    #[must_use]
    pub fn with_config(mut self, config: WorkflowConfig) -> Self {
        self.generator = self.generator.with_timeout(config.generation_timeout);
        self.config = config;
        self
    }

    /// Share a run registry with other workflow instances
    #[must_use]
    pub fn with_registry(mut self, registry: RunRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Settings in use
    #[must_use]
    pub const fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Registry tracking in-flight runs
    #[must_use]
    pub const fn registry(&self) -> &RunRegistry {
        &self.registry
    }

    /// Run the workflow for the user against today's (UTC) record
    ///
    /// # Errors
    ///
    /// See [`Self::run_for_date`].
    pub async fn run(&self, user_id: &str) -> AppResult<WorkflowResult> {
        self.run_for_date(user_id, Utc::now().date_naive()).await
    }

    /// Run the workflow for the user against the record for `date`.
    ///
    /// Surrounding whitespace in `user_id` is ignored, so `" u1"` and `"u1"`
    /// name the same user.
    ///
    /// # Errors
    ///
    /// Returns `RUN_IN_PROGRESS` if the user already has a run in flight,
    /// `INVALID_INPUT` for a blank user id, and otherwise the kind of the
    /// step that failed: `DATA_FETCH_ERROR`, `EVALUATION_ERROR`,
    /// `GENERATION_ERROR` or `PERSISTENCE_ERROR`. Every error carries the
    /// run id.
    pub async fn run_for_date(&self, user_id: &str, date: NaiveDate) -> AppResult<WorkflowResult> {
        let run_id = Uuid::new_v4();
        // Registry keys and storage lookups use the trimmed id
        let user_id = user_id.trim();
        let span = info_span!("replanning_run", run.id = %run_id, user.id = %user_id, %date);

        async move {
            if user_id.is_empty() {
                return Err(AppError::invalid_input("User id must not be empty").with_run_id(run_id));
            }
            let _guard = self.registry.try_acquire(user_id, run_id)?;
            let started = Instant::now();

            match self.execute(run_id, user_id, date).await {
                Ok(result) => {
                    AppLogger::log_workflow_run(
                        run_id,
                        user_id,
                        result.decision.as_str(),
                        result.changed,
                        started.elapsed(),
                    );
                    Ok(result)
                }
                Err(error) => {
                    let error = error.with_run_id(run_id).with_user_id(user_id);
                    AppLogger::log_workflow_failure(
                        run_id,
                        user_id,
                        error.code.as_str(),
                        &error.message,
                    );
                    Err(error)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        run_id: Uuid,
        user_id: &str,
        date: NaiveDate,
    ) -> AppResult<WorkflowResult> {
        // Fetch
        let active_plan = self
            .plans
            .get_active_plan(user_id)
            .await
            .map_err(|e| e.into_app_error(ErrorCode::DataFetchFailed))?;
        let record = self
            .records
            .get_record(user_id, date)
            .await
            .map_err(|e| e.into_app_error(ErrorCode::DataFetchFailed))?
            .unwrap_or_else(|| {
                debug!("No health record logged; treating the day as zero intake and zero steps");
                HealthRecord::empty(user_id, date)
            });
        let profile = self.fetch_profile(user_id).await?;

        // Evaluate
        let target_calories = match &profile {
            Some(profile) => daily_calorie_target(profile, record.weight_kg)?,
            None => self.config.default_target_kcal,
        };
        let metrics = evaluate(active_plan.as_ref(), &record, target_calories)?;

        // Decide
        let mut router = DecisionRouter::new(self.config.thresholds);
        router.observe(active_plan.is_some(), metrics)?;
        let decision = router.decide()?;
        let report = decision.report(&metrics, router.thresholds());
        info!(decision = %decision, %report, "Compliance evaluated");

        let (plan, changed) = if decision.changes_plan() {
            let context = PlanningContext {
                user_id: user_id.to_owned(),
                date,
                profile,
                prior_plan: active_plan,
                record,
                metrics,
                decision,
                report: report.clone(),
            };
            let draft = self.generator.generate(&context).await?;
            let saved = self
                .plans
                .save(draft)
                .await
                .map_err(|e| e.into_app_error(ErrorCode::PersistenceFailed))?;
            info!(version = saved.version, "New plan version persisted");
            (saved, true)
        } else {
            let plan = active_plan.ok_or_else(|| {
                AppError::internal("Router kept the current plan but no active plan exists")
            })?;
            (plan, false)
        };

        Ok(WorkflowResult {
            run_id,
            user_id: user_id.to_owned(),
            date,
            decision,
            plan,
            changed,
            metrics,
            report,
        })
    }

    async fn fetch_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let Some(profiles) = &self.profiles else {
            return Ok(None);
        };
        profiles
            .get_profile(user_id)
            .await
            .map_err(|e| e.into_app_error(ErrorCode::DataFetchFailed))
    }
}
