// ABOUTME: Tests for environment configuration loading and typed config values
// ABOUTME: Environment mutation is serialized with serial_test
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use pierre_replanner::config::environment::{
    CALORIE_RATIO_ENV, DATABASE_URL_ENV, DEFAULT_TARGET_ENV, GENERATION_TIMEOUT_ENV,
    MAX_TOKENS_ENV, MIN_STEPS_ENV, TEMPERATURE_ENV,
};
use pierre_replanner::config::{
    DatabaseUrl, LlmConfig, LlmProviderType, ReplannerConfig, WorkflowConfig,
};
use pierre_replanner::errors::ErrorCode;
use serial_test::serial;

const ALL_VARS: &[&str] = &[
    DATABASE_URL_ENV,
    TEMPERATURE_ENV,
    MAX_TOKENS_ENV,
    GENERATION_TIMEOUT_ENV,
    DEFAULT_TARGET_ENV,
    CALORIE_RATIO_ENV,
    MIN_STEPS_ENV,
    LlmProviderType::ENV_VAR,
    LlmProviderType::MODEL_ENV_VAR,
    LlmProviderType::BASE_URL_ENV_VAR,
    "OPENAI_API_KEY",
    "GROQ_API_KEY",
    "LOCAL_LLM_API_KEY",
];

fn clear_env() {
    for key in ALL_VARS {
        env::remove_var(key);
    }
}

// ============================================================================
// Typed values
// ============================================================================

#[test]
fn test_llm_provider_parsing() {
    assert_eq!(
        LlmProviderType::from_str_or_default("openai"),
        LlmProviderType::OpenAi
    );
    assert_eq!(
        LlmProviderType::from_str_or_default("GROQ"),
        LlmProviderType::Groq
    );
    for local in ["local", "ollama", "vllm", "LocalAI"] {
        assert_eq!(
            LlmProviderType::from_str_or_default(local),
            LlmProviderType::Local
        );
    }
    assert_eq!(
        LlmProviderType::from_str_or_default("anthropic"),
        LlmProviderType::OpenAi
    ); // Default fallback

    assert!(LlmProviderType::Groq.requires_api_key());
    assert!(!LlmProviderType::Local.requires_api_key());
    assert_eq!(LlmProviderType::Local.to_string(), "local");
}

#[test]
fn test_database_url_parsing() {
    assert!(DatabaseUrl::parse_url("sqlite::memory:").is_memory());
    assert!(DatabaseUrl::parse_url(":memory:").is_memory());

    let file = DatabaseUrl::parse_url("sqlite:./data/test.db");
    assert_eq!(
        file,
        DatabaseUrl::SQLite {
            path: PathBuf::from("./data/test.db")
        }
    );
    assert_eq!(file.to_connection_string(), "sqlite:./data/test.db");

    // Bare paths are SQLite files
    assert!(!DatabaseUrl::parse_url("/var/lib/replanner.db").is_memory());
}

// ============================================================================
// Environment loading
// ============================================================================

#[test]
#[serial]
fn test_defaults_when_unset() {
    clear_env();

    let llm = LlmConfig::from_env().unwrap();
    assert_eq!(llm.provider, LlmProviderType::OpenAi);
    assert_eq!(llm.model, "gpt-4o-mini");
    assert!(llm.api_key.is_none());
    assert!(llm.base_url.is_none());
    assert!(llm.temperature.abs() < f32::EPSILON);
    assert_eq!(llm.max_tokens, 4096);

    let workflow = WorkflowConfig::from_env().unwrap();
    assert!((workflow.default_target_kcal - 2_000.0).abs() < f64::EPSILON);
    assert!((workflow.thresholds.calorie_ratio - 1.2).abs() < f64::EPSILON);
    assert_eq!(workflow.thresholds.min_daily_steps, 5_000);
    assert_eq!(workflow.generation_timeout, Duration::from_secs(90));

    let config = ReplannerConfig::from_env().unwrap();
    assert_eq!(config.database, DatabaseUrl::default());
    assert!(config.summary().contains("api_key=unset"));
}

#[test]
#[serial]
fn test_overrides_are_applied() {
    clear_env();
    env::set_var(DATABASE_URL_ENV, "sqlite::memory:");
    env::set_var(LlmProviderType::ENV_VAR, "groq");
    env::set_var(LlmProviderType::MODEL_ENV_VAR, "llama-3.1-8b-instant");
    env::set_var("GROQ_API_KEY", "gsk_test");
    env::set_var(TEMPERATURE_ENV, "0.3");
    env::set_var(MAX_TOKENS_ENV, "2048");
    env::set_var(DEFAULT_TARGET_ENV, "1800");
    env::set_var(CALORIE_RATIO_ENV, "1.15");
    env::set_var(MIN_STEPS_ENV, "7500");
    env::set_var(GENERATION_TIMEOUT_ENV, "30");

    let config = ReplannerConfig::from_env().unwrap();
    clear_env();

    assert!(config.database.is_memory());
    assert_eq!(config.llm.provider, LlmProviderType::Groq);
    assert_eq!(config.llm.model, "llama-3.1-8b-instant");
    assert_eq!(config.llm.require_api_key().unwrap(), "gsk_test");
    assert!((config.llm.temperature - 0.3).abs() < f32::EPSILON);
    assert_eq!(config.llm.max_tokens, 2048);
    assert!((config.workflow.default_target_kcal - 1_800.0).abs() < f64::EPSILON);
    assert!((config.workflow.thresholds.calorie_ratio - 1.15).abs() < f64::EPSILON);
    assert_eq!(config.workflow.thresholds.min_daily_steps, 7_500);
    assert_eq!(config.workflow.generation_timeout, Duration::from_secs(30));

    // Secrets never reach the summary
    let summary = config.summary();
    assert!(summary.contains("api_key=set"));
    assert!(!summary.contains("gsk_test"));
}

#[test]
#[serial]
fn test_missing_api_key_reported_by_variable_name() {
    clear_env();
    let llm = LlmConfig::from_env().unwrap();

    let err = llm.require_api_key().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigMissing);
    assert!(err.message.contains("OPENAI_API_KEY"));
}

#[test]
#[serial]
fn test_blank_values_fall_back_to_defaults() {
    clear_env();
    env::set_var(LlmProviderType::MODEL_ENV_VAR, "   ");
    env::set_var(MIN_STEPS_ENV, "");

    let llm = LlmConfig::from_env().unwrap();
    let workflow = WorkflowConfig::from_env().unwrap();
    clear_env();

    assert_eq!(llm.model, "gpt-4o-mini");
    assert_eq!(workflow.thresholds.min_daily_steps, 5_000);
}

#[test]
#[serial]
fn test_invalid_values_fail_fast() {
    let cases: &[(&str, &str)] = &[
        (TEMPERATURE_ENV, "warm"),
        (TEMPERATURE_ENV, "3.5"),
        (MAX_TOKENS_ENV, "0"),
        (MAX_TOKENS_ENV, "-1"),
        (DEFAULT_TARGET_ENV, "-100"),
        (DEFAULT_TARGET_ENV, "NaN"),
        (CALORIE_RATIO_ENV, "0"),
        (MIN_STEPS_ENV, "lots"),
        (GENERATION_TIMEOUT_ENV, "0"),
    ];

    for (key, value) in cases {
        clear_env();
        env::set_var(key, value);
        let err = ReplannerConfig::from_env().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalid, "{key}={value}");
        assert!(err.message.contains(key), "{}", err.message);
    }
    clear_env();
}
