// ABOUTME: Plan generation: candidate schema, validation, prompts, capability, generator
// ABOUTME: Model output is untrusted until PlanCandidate::validate accepts it
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Planning
//!
//! The [`PlanGenerator`] asks a [`PlanningCapability`] for a candidate,
//! parses it into a [`PlanCandidate`] and validates it into a `PlanDraft`.
//! [`LlmPlanningCapability`] is the production capability; tests substitute
//! scripted ones.

mod candidate;
mod capability;
mod generator;
pub mod prompts;

pub use candidate::{
    ActivityCandidate, DailyPlanCandidate, MealCandidate, PlanCandidate, PlanValidationError,
};
pub use capability::{LlmPlanningCapability, PlanningCapability, PlanningContext};
pub use generator::PlanGenerator;
