// ABOUTME: Replanning intelligence: compliance metrics, decision routing, calorie targets
// ABOUTME: Pure algorithms consumed by the workflow orchestrator in the root crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Replanner Intelligence
//!
//! Everything in this crate is a pure function of its inputs. The workflow
//! fetches data, then hands it to:
//!
//! - [`compliance::evaluate`] to derive [`ComplianceMetrics`] for the day
//! - [`DecisionRouter`] to turn metrics and plan presence into one [`Decision`]
//! - [`nutrition::daily_calorie_target`] to derive the target the metrics compare against

/// Adherence metrics for a single day
pub mod compliance;
/// Replanning decisions and the router state machine
pub mod decision;
/// Daily calorie target calculation
pub mod nutrition;

pub use compliance::{evaluate, ComplianceMetrics};
pub use decision::{decide, Decision, DecisionRouter, DecisionThresholds, RouterState};
pub use nutrition::daily_calorie_target;
