// ABOUTME: PlanGenerator: bounded calls to the planning capability with one validation retry
// ABOUTME: Owns version assignment; returns a validated PlanDraft or a GENERATION_ERROR
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;
use std::time::{Duration, Instant};

use replanner_core::constants::generation::{DEFAULT_TIMEOUT_SECS, VALIDATION_RETRIES};
use replanner_core::models::{Plan, PlanDraft};
use serde_json::json;
use tokio::time::timeout;
use tracing::{instrument, warn};

use super::candidate::{PlanCandidate, PlanValidationError};
use super::capability::{PlanningCapability, PlanningContext};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;

/// Generates validated plan drafts.
///
/// Validation failures (including unparseable output) get exactly one retry
/// carrying the violated constraint. Capability errors and timeouts are
/// fatal immediately.
#[derive(Clone)]
pub struct PlanGenerator {
    capability: Arc<dyn PlanningCapability>,
    timeout: Duration,
}

impl PlanGenerator {
    /// Create a generator bounding each capability call by `timeout`
    #[must_use]
    pub fn new(capability: Arc<dyn PlanningCapability>, timeout: Duration) -> Self {
        Self {
            capability,
            timeout,
        }
    }

    /// Create a generator with the default per-call timeout
    #[must_use]
    pub fn with_default_timeout(capability: Arc<dyn PlanningCapability>) -> Self {
        Self::new(capability, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Replace the per-call timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Per-call timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Produce the next plan version for the user in `context`.
    ///
    /// The draft's version is the prior plan's version plus one, or 1 when
    /// there is no prior plan.
    ///
    /// # Errors
    ///
    /// Returns `GENERATION_ERROR` if the capability fails or times out, or if
    /// the candidate still violates a constraint after the retry.
    #[instrument(skip_all, fields(user_id = %context.user_id, decision = %context.decision))]
    pub async fn generate(&self, context: &PlanningContext) -> AppResult<PlanDraft> {
        let version = context.prior_plan.as_ref().map_or(1, Plan::next_version);
        let attempts = 1 + VALIDATION_RETRIES;
        let mut correction: Option<String> = None;
        let mut last_violation: Option<PlanValidationError> = None;

        for attempt in 1..=attempts {
            let started = Instant::now();
            let raw = self.propose(context, correction.as_deref()).await?;
            let outcome =
                PlanCandidate::parse(&raw).and_then(|c| c.validate(&context.user_id, version));
            AppLogger::log_generation_attempt(
                &context.user_id,
                attempt,
                outcome.is_ok(),
                started.elapsed(),
            );

            match outcome {
                Ok(draft) => return Ok(draft),
                Err(violation) => {
                    warn!(attempt, %violation, "Plan candidate rejected");
                    correction = Some(violation.to_string());
                    last_violation = Some(violation);
                }
            }
        }

        let violation = last_violation.map_or_else(String::new, |v| v.to_string());
        Err(AppError::generation(format!(
            "Plan candidate failed validation after {attempts} attempts: {violation}"
        ))
        .with_details(json!({ "attempts": attempts, "violation": violation })))
    }

    async fn propose(
        &self,
        context: &PlanningContext,
        correction: Option<&str>,
    ) -> AppResult<String> {
        match timeout(self.timeout, self.capability.propose(context, correction)).await {
            Ok(Ok(raw)) => Ok(raw),
            Ok(Err(error)) => Err(AppError::generation(format!(
                "Planning capability failed: {}",
                error.message
            ))
            .with_details(json!({ "cause": error.code.as_str() }))
            .with_source(error)),
            Err(_) => Err(AppError::generation(format!(
                "Planning capability did not respond within {}s",
                self.timeout.as_secs_f64()
            ))
            .with_details(json!({ "cause": "TIMEOUT" }))),
        }
    }
}
