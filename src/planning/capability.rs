// ABOUTME: Planning capability contract and its LLM-backed implementation
// ABOUTME: Capabilities return raw text; the generator parses and validates it
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use replanner_core::models::{HealthRecord, Plan, UserProfile};
use replanner_intelligence::{ComplianceMetrics, Decision};
use tracing::{debug, instrument};

use super::prompts::{render_context, render_correction, PLAN_SYSTEM_PROMPT};
use crate::config::LlmConfig;
use crate::errors::AppResult;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

/// Everything the capability knows about the run it is planning for
#[derive(Debug, Clone)]
pub struct PlanningContext {
    /// User the plan is for
    pub user_id: String,
    /// Day the run evaluated
    pub date: NaiveDate,
    /// Profile, if the user has one
    pub profile: Option<UserProfile>,
    /// Active plan being replaced, if any
    pub prior_plan: Option<Plan>,
    /// The evaluated day's record
    pub record: HealthRecord,
    /// Compliance metrics for the day
    pub metrics: ComplianceMetrics,
    /// Why a new plan is needed
    pub decision: Decision,
    /// Human-readable progress report
    pub report: String,
}

/// Produces raw plan candidates. Output is untrusted.
#[async_trait]
pub trait PlanningCapability: Send + Sync {
    /// Propose a plan for `context`.
    ///
    /// `correction` is set on the retry and names the constraint the
    /// previous candidate violated.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing service fails.
    async fn propose(&self, context: &PlanningContext, correction: Option<&str>)
        -> AppResult<String>;
}

/// Planning capability backed by a chat completion provider
pub struct LlmPlanningCapability {
    provider: Arc<dyn LlmProvider>,
    model: Option<String>,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl LlmPlanningCapability {
    /// Create a capability using the provider's default model at temperature 0
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            model: None,
            temperature: 0.0,
            max_tokens: None,
        }
    }

    /// Create a capability with model and sampling settings from configuration
    #[must_use]
    pub fn from_config(provider: Arc<dyn LlmProvider>, config: &LlmConfig) -> Self {
        Self {
            provider,
            model: Some(config.model.clone()),
            temperature: config.temperature,
            max_tokens: Some(config.max_tokens),
        }
    }

    fn build_request(&self, context: &PlanningContext, correction: Option<&str>) -> ChatRequest {
        let mut messages = Vec::with_capacity(3);
        if self.provider.capabilities().supports_system_messages() {
            messages.push(ChatMessage::system(PLAN_SYSTEM_PROMPT));
            messages.push(ChatMessage::user(render_context(context)));
        } else {
            messages.push(ChatMessage::user(format!(
                "{PLAN_SYSTEM_PROMPT}\n\n{}",
                render_context(context)
            )));
        }
        if let Some(violation) = correction {
            messages.push(ChatMessage::user(render_correction(violation)));
        }

        let mut request = ChatRequest::new(messages)
            .with_temperature(self.temperature)
            .with_json_mode();
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }
}

#[async_trait]
impl PlanningCapability for LlmPlanningCapability {
    #[instrument(skip_all, fields(provider = self.provider.name(), user_id = %context.user_id, retry = correction.is_some()))]
    async fn propose(
        &self,
        context: &PlanningContext,
        correction: Option<&str>,
    ) -> AppResult<String> {
        let request = self.build_request(context, correction);
        let response = self.provider.complete(&request).await?;

        debug!(
            model = %response.model,
            finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
            total_tokens = response.usage.as_ref().map_or(0, |u| u.total_tokens),
            "Planning capability responded"
        );

        Ok(response.content)
    }
}
