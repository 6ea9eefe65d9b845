// ABOUTME: Main library entry point for the Pierre health replanner
// ABOUTME: Wires storage, LLM-backed plan generation, and the replanning workflow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Health Replanner
//!
//! Autonomous replanning of multi-day meal and activity plans. Each run
//! inspects a user's active plan and the day's logged activity, decides
//! whether the plan must change, and if so generates and stores a new,
//! validated plan version.
//!
//! ## Architecture
//!
//! - **`replanner_core`**: error taxonomy, domain models, thresholds
//! - **`replanner_intelligence`**: compliance metrics, decision router, calorie targets
//! - **database**: plan repository, health-record and profile sources (`SQLite` and in-memory)
//! - **llm** / **planning**: chat providers, candidate validation, `PlanGenerator`
//! - **workflow**: `ReplanningWorkflow` and the per-user run registry
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pierre_replanner::database::{InMemoryHealthRecords, InMemoryPlanRepository};
//! use pierre_replanner::llm::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
//! use pierre_replanner::planning::{LlmPlanningCapability, PlanGenerator};
//! use pierre_replanner::workflow::ReplanningWorkflow;
//!
//! #[tokio::main]
//! async fn main() -> pierre_replanner::errors::AppResult<()> {
//!     let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::ollama("qwen2.5:14b-instruct"))?;
//!     let generator = PlanGenerator::with_default_timeout(Arc::new(LlmPlanningCapability::new(
//!         Arc::new(provider),
//!     )));
//!     let workflow = ReplanningWorkflow::new(
//!         Arc::new(InMemoryPlanRepository::new()),
//!         Arc::new(InMemoryHealthRecords::new()),
//!         generator,
//!     );
//!
//!     let result = workflow.run("user-1").await?;
//!     println!("{} -> version {}", result.decision, result.plan.version);
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// Plan, health-record, and profile storage
pub mod database;

/// Unified error handling
pub mod errors;

/// LLM chat providers
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Plan candidate validation and generation
pub mod planning;

/// Deterministic synthetic health records
pub mod synthetic;

/// Replanning workflow orchestration
pub mod workflow;

pub use replanner_core::models;
pub use replanner_intelligence as intelligence;
