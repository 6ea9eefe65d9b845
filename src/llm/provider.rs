// ABOUTME: LLM provider selector building the configured backend at startup
// ABOUTME: Maps LlmConfig (openai, groq, local) to an OpenAI-compatible provider instance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Selector
//!
//! Set `REPLANNER_LLM_PROVIDER` to choose the backend:
//! - `openai` (default): requires `OPENAI_API_KEY`
//! - `groq`: requires `GROQ_API_KEY`
//! - `local`/`ollama`/`vllm`/`localai`: `LOCAL_LLM_API_KEY` optional

use std::sync::Arc;

use tracing::info;

use super::openai_compatible::LOCAL_BASE_URL;
use super::{LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use crate::config::{LlmConfig, LlmProviderType};
use crate::errors::AppResult;

/// Build the provider described by `config`
///
/// # Errors
///
/// Returns `CONFIG_MISSING` if a hosted provider has no API key, or an
/// internal error if the HTTP client cannot be created.
pub fn create_provider(config: &LlmConfig) -> AppResult<Arc<dyn LlmProvider>> {
    let provider_config = match config.provider {
        LlmProviderType::OpenAi => {
            OpenAiCompatibleConfig::openai(&config.model, config.require_api_key()?)
        }
        LlmProviderType::Groq => {
            OpenAiCompatibleConfig::groq(&config.model, config.require_api_key()?)
        }
        LlmProviderType::Local => OpenAiCompatibleConfig::local_for_url(
            config.base_url.as_deref().unwrap_or(LOCAL_BASE_URL),
            &config.model,
        )
        .with_api_key(config.api_key.clone()),
    };

    let provider_config = match (&config.base_url, config.provider) {
        (Some(url), LlmProviderType::OpenAi | LlmProviderType::Groq) => {
            provider_config.with_base_url(url.clone())
        }
        _ => provider_config,
    };

    info!(
        "Initializing LLM provider: {} at {} with model {} (set {} to change)",
        provider_config.display_name,
        provider_config.base_url,
        provider_config.default_model,
        LlmProviderType::ENV_VAR
    );

    Ok(Arc::new(OpenAiCompatibleProvider::new(provider_config)?))
}
