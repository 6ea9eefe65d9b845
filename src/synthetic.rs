// ABOUTME: Deterministic synthetic health records standing in for wearable data
// ABOUTME: Seeded per user and date so repeated reads of the same day agree
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use replanner_core::models::HealthRecord;
use tracing::debug;

use crate::database::HealthRecordSource;
use crate::errors::StorageError;

const CALORIE_RANGE: (u32, u32) = (2000, 2600);
const STEP_RANGE: (u32, u32) = (6000, 14_000);
const BASE_WEIGHT_KG: f64 = 85.0;
const WEIGHT_JITTER_KG: f64 = 1.0;

/// Health-record source that fabricates a plausible day for any user and date.
///
/// The same `(seed, user_id, date)` always yields the same record.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticHealthRecords {
    seed: u64,
}

impl SyntheticHealthRecords {
    /// Create a source with a base seed mixed into every record
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Generate the record for a user and day
    #[must_use]
    pub fn generate(&self, user_id: &str, date: NaiveDate) -> HealthRecord {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed_for(user_id, date));

        let calories = rng.gen_range(CALORIE_RANGE.0..=CALORIE_RANGE.1);
        let steps = rng.gen_range(STEP_RANGE.0..=STEP_RANGE.1);
        let weight = BASE_WEIGHT_KG + rng.gen_range(-WEIGHT_JITTER_KG..=WEIGHT_JITTER_KG);
        let weight = (weight * 10.0).round() / 10.0;

        HealthRecord::new(user_id, date, f64::from(calories), steps).with_weight(weight)
    }

    // FNV-1a over the user id and date so the seed is stable across processes
    fn seed_for(&self, user_id: &str, date: NaiveDate) -> u64 {
        const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const FNV_PRIME: u64 = 0x0100_0000_01b3;

        let date_key = date.format("%Y-%m-%d").to_string();
        user_id
            .bytes()
            .chain([0])
            .chain(date_key.bytes())
            .fold(FNV_OFFSET ^ self.seed, |hash, byte| {
                (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
            })
    }
}

#[async_trait]
impl HealthRecordSource for SyntheticHealthRecords {
    async fn get_record(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<HealthRecord>, StorageError> {
        let record = self.generate(user_id, date);
        debug!(
            user_id,
            %date,
            calories = record.calories_consumed,
            steps = record.steps,
            "Generated synthetic health record"
        );
        Ok(Some(record))
    }
}
