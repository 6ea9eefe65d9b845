// ABOUTME: Configuration module for the replanner
// ABOUTME: Environment-only configuration for storage, LLM backend, and workflow thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration
//!
//! - **environment**: `ReplannerConfig` and its sections, loaded from environment variables
//! - **types**: strongly typed values (`LlmProviderType`, `DatabaseUrl`)

/// Environment configuration loading
pub mod environment;
/// Strongly typed configuration values
pub mod types;

pub use environment::{LlmConfig, ReplannerConfig, WorkflowConfig};
pub use types::{DatabaseUrl, LlmProviderType};
