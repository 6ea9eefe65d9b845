// ABOUTME: Core data models for the replanning workflow
// ABOUTME: Re-exports HealthRecord, Plan, DailyPlan, Meal, Activity and UserProfile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `HealthRecord`: one day of logged intake and activity, read-only to the core
//! - `Plan`: an immutable, versioned multi-day meal and activity plan
//! - `PlanDraft`: a validated plan that has not been persisted yet
//! - `UserProfile`: anthropometrics and goal used to derive a calorie target
//!
//! All models serialize with serde so storage backends and the UI boundary
//! share one field-for-field layout.

mod health;
mod plan;
mod profile;

pub use health::HealthRecord;
pub use plan::{Activity, DailyPlan, Meal, MealType, Plan, PlanDraft};
pub use profile::{ActivityLevel, Sex, UserProfile};
