// ABOUTME: Replanning decision types and the INIT -> EVALUATED -> DECIDED router state machine
// ABOUTME: The transition function is pure, total, and evaluated in strict priority order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Decision routing
//!
//! Rules are evaluated first-match-wins:
//!
//! 1. no active plan -> [`Decision::CreateNewPlan`]
//! 2. calorie ratio strictly above the ratio threshold -> [`Decision::ReplanHighCalories`]
//! 3. steps strictly below the step floor -> [`Decision::ReplanLowActivity`]
//! 4. otherwise -> [`Decision::MaintainCurrentPlan`]
//!
//! A ratio exactly at the threshold, or steps exactly at the floor, keep the plan.

use std::fmt;

use replanner_core::constants::thresholds::{HIGH_CALORIE_RATIO, MIN_DAILY_STEPS};
use replanner_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compliance::ComplianceMetrics;

/// Outcome of one routing pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// The user has no plan yet
    CreateNewPlan,
    /// Intake exceeded the target by more than the allowed ratio
    ReplanHighCalories,
    /// Step count fell below the daily floor
    ReplanLowActivity,
    /// Adherence is adequate; keep the active plan
    MaintainCurrentPlan,
}

impl Decision {
    /// Stable machine-readable name, identical to the serialized form
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateNewPlan => "CREATE_NEW_PLAN",
            Self::ReplanHighCalories => "REPLAN_HIGH_CALORIES",
            Self::ReplanLowActivity => "REPLAN_LOW_ACTIVITY",
            Self::MaintainCurrentPlan => "MAINTAIN_CURRENT_PLAN",
        }
    }

    /// Whether acting on this decision produces a new plan version
    #[must_use]
    pub const fn changes_plan(&self) -> bool {
        !matches!(self, Self::MaintainCurrentPlan)
    }

    /// Human-readable progress report for the decision
    #[must_use]
    pub fn report(&self, metrics: &ComplianceMetrics, thresholds: &DecisionThresholds) -> String {
        match self {
            Self::CreateNewPlan => "No active plan found. Initial plan required.".to_owned(),
            Self::ReplanHighCalories => {
                let overage = (thresholds.calorie_ratio - 1.0) * 100.0;
                format!(
                    "Compliance Alert: Calories consumed ({:.0}) were {overage:.0}%+ over the target ({:.0}). Plan adjustment is needed.",
                    metrics.calories_consumed, metrics.target_calories
                )
            }
            Self::ReplanLowActivity => format!(
                "Activity Alert: Steps ({}) were too low. Focus needs to shift to simple movement goals.",
                metrics.steps
            ),
            Self::MaintainCurrentPlan => {
                "Progress is adequate. Maintaining current plan.".to_owned()
            }
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds the router compares metrics against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionThresholds {
    /// Replan when `calorie_ratio > calorie_ratio`
    pub calorie_ratio: f64,
    /// Replan when `steps < min_daily_steps`
    pub min_daily_steps: u32,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            calorie_ratio: HIGH_CALORIE_RATIO,
            min_daily_steps: MIN_DAILY_STEPS,
        }
    }
}

impl DecisionThresholds {
    /// Pure transition function. Total over its inputs; never fails.
    ///
    /// A missing or NaN ratio never triggers the calorie rule.
    #[must_use]
    pub fn decide(&self, has_active_plan: bool, metrics: &ComplianceMetrics) -> Decision {
        if !has_active_plan {
            return Decision::CreateNewPlan;
        }
        if metrics
            .calorie_ratio
            .is_some_and(|ratio| ratio > self.calorie_ratio)
        {
            return Decision::ReplanHighCalories;
        }
        if metrics.steps < self.min_daily_steps {
            return Decision::ReplanLowActivity;
        }
        Decision::MaintainCurrentPlan
    }
}

/// Decide with the default thresholds
#[must_use]
pub fn decide(has_active_plan: bool, metrics: &ComplianceMetrics) -> Decision {
    DecisionThresholds::default().decide(has_active_plan, metrics)
}

/// Router state for a single run
#[derive(Debug, Clone, PartialEq)]
pub enum RouterState {
    /// Nothing observed yet
    Init,
    /// Metrics and plan presence are known
    Evaluated {
        /// Whether the user had an active plan at fetch time
        has_active_plan: bool,
        /// Metrics computed for the run
        metrics: ComplianceMetrics,
    },
    /// Terminal: a decision was made
    Decided(Decision),
}

impl RouterState {
    const fn name(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::Evaluated { .. } => "EVALUATED",
            Self::Decided(_) => "DECIDED",
        }
    }
}

/// Per-run decision state machine: `INIT -> EVALUATED -> DECIDED`.
///
/// A router is used for exactly one run. Out-of-order transitions are
/// programming errors and surface as `INTERNAL_ERROR`.
#[derive(Debug, Clone)]
pub struct DecisionRouter {
    thresholds: DecisionThresholds,
    state: RouterState,
}

impl Default for DecisionRouter {
    fn default() -> Self {
        Self::new(DecisionThresholds::default())
    }
}

impl DecisionRouter {
    /// Create a router in the `INIT` state
    #[must_use]
    pub const fn new(thresholds: DecisionThresholds) -> Self {
        Self {
            thresholds,
            state: RouterState::Init,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &RouterState {
        &self.state
    }

    /// Thresholds in use
    #[must_use]
    pub const fn thresholds(&self) -> &DecisionThresholds {
        &self.thresholds
    }

    /// The decision, once the router has reached `DECIDED`
    #[must_use]
    pub const fn decision(&self) -> Option<Decision> {
        match self.state {
            RouterState::Decided(decision) => Some(decision),
            _ => None,
        }
    }

    /// `INIT -> EVALUATED`
    ///
    /// # Errors
    ///
    /// Returns an internal error if the router has already left `INIT`.
    pub fn observe(&mut self, has_active_plan: bool, metrics: ComplianceMetrics) -> AppResult<()> {
        if self.state != RouterState::Init {
            return Err(self.invalid_transition("EVALUATED"));
        }
        self.state = RouterState::Evaluated {
            has_active_plan,
            metrics,
        };
        Ok(())
    }

    /// `EVALUATED -> DECIDED`
    ///
    /// # Errors
    ///
    /// Returns an internal error unless the router is in `EVALUATED`.
    pub fn decide(&mut self) -> AppResult<Decision> {
        let RouterState::Evaluated {
            has_active_plan,
            metrics,
        } = self.state
        else {
            return Err(self.invalid_transition("DECIDED"));
        };

        let decision = self.thresholds.decide(has_active_plan, &metrics);
        debug!(
            decision = %decision,
            has_active_plan,
            calorie_ratio = ?metrics.calorie_ratio,
            steps = metrics.steps,
            "Decision routed"
        );
        self.state = RouterState::Decided(decision);
        Ok(decision)
    }

    fn invalid_transition(&self, to: &str) -> AppError {
        AppError::internal(format!(
            "Invalid decision router transition {} -> {to}",
            self.state.name()
        ))
    }
}
