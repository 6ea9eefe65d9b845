// ABOUTME: Environment configuration for the replanner: database, LLM, and workflow settings
// ABOUTME: Read once at startup; invalid values fail fast with CONFIG_INVALID
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Environment-based configuration
//!
//! | Variable                              | Default                      |
//! |---------------------------------------|------------------------------|
//! | `REPLANNER_DATABASE_URL`              | `sqlite:./data/replanner.db` |
//! | `REPLANNER_LLM_PROVIDER`              | `openai`                     |
//! | `REPLANNER_LLM_MODEL`                 | per provider                 |
//! | `REPLANNER_LLM_BASE_URL`              | per provider                 |
//! | `REPLANNER_LLM_TEMPERATURE`           | `0.0`                        |
//! | `REPLANNER_LLM_MAX_TOKENS`            | `4096`                       |
//! | `REPLANNER_GENERATION_TIMEOUT_SECS`   | `90`                         |
//! | `REPLANNER_DEFAULT_TARGET_KCAL`       | `2000`                       |
//! | `REPLANNER_CALORIE_RATIO_THRESHOLD`   | `1.2`                        |
//! | `REPLANNER_MIN_DAILY_STEPS`           | `5000`                       |

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use replanner_core::constants::{generation, nutrition, thresholds};
use replanner_intelligence::DecisionThresholds;
use tracing::info;

use super::types::{DatabaseUrl, LlmProviderType};
use crate::errors::{AppError, AppResult};

/// Environment variable for the database location
pub const DATABASE_URL_ENV: &str = "REPLANNER_DATABASE_URL";
/// Environment variable for sampling temperature
pub const TEMPERATURE_ENV: &str = "REPLANNER_LLM_TEMPERATURE";
/// Environment variable for the completion token limit
pub const MAX_TOKENS_ENV: &str = "REPLANNER_LLM_MAX_TOKENS";
/// Environment variable for the generation call timeout
pub const GENERATION_TIMEOUT_ENV: &str = "REPLANNER_GENERATION_TIMEOUT_SECS";
/// Environment variable for the target used when no profile exists
pub const DEFAULT_TARGET_ENV: &str = "REPLANNER_DEFAULT_TARGET_KCAL";
/// Environment variable overriding the calorie ratio threshold
pub const CALORIE_RATIO_ENV: &str = "REPLANNER_CALORIE_RATIO_THRESHOLD";
/// Environment variable overriding the daily step floor
pub const MIN_STEPS_ENV: &str = "REPLANNER_MIN_DAILY_STEPS";

/// Default completion token limit
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// LLM connection settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which backend to talk to
    pub provider: LlmProviderType,
    /// Model identifier
    pub model: String,
    /// Base URL override; `None` uses the provider preset
    pub base_url: Option<String>,
    /// API key, if one was configured
    pub api_key: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion token limit
    pub max_tokens: u32,
}

impl LlmConfig {
    /// Load LLM settings from the environment
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_INVALID` if temperature or token limit cannot be parsed or is out of range.
    pub fn from_env() -> AppResult<Self> {
        let provider = LlmProviderType::from_env();
        let model = non_empty_var(LlmProviderType::MODEL_ENV_VAR)
            .unwrap_or_else(|| provider.default_model().to_owned());

        let temperature: f32 = parse_var(TEMPERATURE_ENV, 0.0)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(AppError::config_invalid(
                TEMPERATURE_ENV,
                format!("{temperature} is outside 0.0..=2.0"),
            ));
        }
        let max_tokens: u32 = parse_var(MAX_TOKENS_ENV, DEFAULT_MAX_TOKENS)?;
        if max_tokens == 0 {
            return Err(AppError::config_invalid(MAX_TOKENS_ENV, "must be positive"));
        }

        Ok(Self {
            provider,
            model,
            base_url: non_empty_var(LlmProviderType::BASE_URL_ENV_VAR),
            api_key: non_empty_var(provider.api_key_env_var()),
            temperature,
            max_tokens,
        })
    }

    /// API key for providers that need one
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_MISSING` if the provider is hosted and no key is set.
    pub fn require_api_key(&self) -> AppResult<&str> {
        match self.api_key.as_deref() {
            Some(key) => Ok(key),
            None => Err(AppError::config_missing(self.provider.api_key_env_var())),
        }
    }
}

/// Workflow tuning
#[derive(Debug, Clone, Copy)]
pub struct WorkflowConfig {
    /// Target used when the user has no profile (kcal/day)
    pub default_target_kcal: f64,
    /// Router thresholds
    pub thresholds: DecisionThresholds,
    /// Bound on a single generation capability call
    pub generation_timeout: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            default_target_kcal: nutrition::DEFAULT_TARGET_CALORIES,
            thresholds: DecisionThresholds::default(),
            generation_timeout: Duration::from_secs(generation::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl WorkflowConfig {
    /// Load workflow settings from the environment
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_INVALID` for unparseable or non-positive values.
    pub fn from_env() -> AppResult<Self> {
        let default_target_kcal: f64 =
            parse_var(DEFAULT_TARGET_ENV, nutrition::DEFAULT_TARGET_CALORIES)?;
        require_positive(DEFAULT_TARGET_ENV, default_target_kcal)?;

        let calorie_ratio: f64 = parse_var(CALORIE_RATIO_ENV, thresholds::HIGH_CALORIE_RATIO)?;
        require_positive(CALORIE_RATIO_ENV, calorie_ratio)?;

        let min_daily_steps: u32 = parse_var(MIN_STEPS_ENV, thresholds::MIN_DAILY_STEPS)?;

        let timeout_secs: u64 = parse_var(GENERATION_TIMEOUT_ENV, generation::DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(AppError::config_invalid(GENERATION_TIMEOUT_ENV, "must be positive"));
        }

        Ok(Self {
            default_target_kcal,
            thresholds: DecisionThresholds {
                calorie_ratio,
                min_daily_steps,
            },
            generation_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Complete replanner configuration
#[derive(Debug, Clone)]
pub struct ReplannerConfig {
    /// Where plans, records, and profiles are stored
    pub database: DatabaseUrl,
    /// Plan generation backend
    pub llm: LlmConfig,
    /// Workflow tuning
    pub workflow: WorkflowConfig,
}

impl ReplannerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a `CONFIG_*` error if any variable is invalid.
    pub fn from_env() -> AppResult<Self> {
        let database = env::var(DATABASE_URL_ENV)
            .map_or_else(|_| DatabaseUrl::default(), |url| DatabaseUrl::parse_url(&url));

        let config = Self {
            database,
            llm: LlmConfig::from_env()?,
            workflow: WorkflowConfig::from_env()?,
        };
        info!("{}", config.summary());
        Ok(config)
    }

    /// Configuration summary for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Replanner configuration: database={}, llm={}/{}, api_key={}, timeout={}s, \
             default_target={} kcal, calorie_ratio>{}, min_steps={}",
            self.database,
            self.llm.provider,
            self.llm.model,
            if self.llm.api_key.is_some() { "set" } else { "unset" },
            self.workflow.generation_timeout.as_secs(),
            self.workflow.default_target_kcal,
            self.workflow.thresholds.calorie_ratio,
            self.workflow.thresholds.min_daily_steps,
        )
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, using `default` when unset
fn parse_var<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    non_empty_var(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e| AppError::config_invalid(key, format!("{raw:?}: {e}")))
    })
}

fn require_positive(key: &str, value: f64) -> AppResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AppError::config_invalid(key, format!("{value} must be positive")))
    }
}
