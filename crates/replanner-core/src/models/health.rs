// ABOUTME: Daily health record model (calories consumed, steps, optional weight)
// ABOUTME: Created by external logging; the replanner only reads it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of logged activity for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Owner of the record
    pub user_id: String,
    /// Day the record covers
    pub date: NaiveDate,
    /// Calories consumed over the day (kcal, non-negative)
    pub calories_consumed: f64,
    /// Steps walked over the day
    pub steps: u32,
    /// Body weight logged that day, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
}

impl HealthRecord {
    /// Create a record, clamping negative or non-finite calories to zero
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        date: NaiveDate,
        calories_consumed: f64,
        steps: u32,
    ) -> Self {
        let calories_consumed = if calories_consumed.is_finite() && calories_consumed > 0.0 {
            calories_consumed
        } else {
            0.0
        };
        Self {
            user_id: user_id.into(),
            date,
            calories_consumed,
            steps,
            weight_kg: None,
        }
    }

    /// Attach the weight logged for the day
    #[must_use]
    pub const fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = Some(weight_kg);
        self
    }

    /// Record used when nothing was logged: zero consumption and zero steps
    #[must_use]
    pub fn empty(user_id: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(user_id, date, 0.0, 0)
    }
}
