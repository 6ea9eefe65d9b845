// ABOUTME: In-process implementations of the storage contracts
// ABOUTME: Used for tests, demos, and as the default record source when nothing is persisted
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, SubsecRound, Utc};
use replanner_core::models::{HealthRecord, Plan, PlanDraft, UserProfile};
use tokio::sync::RwLock;

use super::{HealthRecordSource, PlanRepository, ProfileSource};
use crate::errors::StorageError;

/// Plans held in memory, keyed by user and kept in version order
#[derive(Debug, Default)]
pub struct InMemoryPlanRepository {
    plans: RwLock<HashMap<String, Vec<Plan>>>,
}

impl InMemoryPlanRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of versions stored for a user
    pub async fn version_count(&self, user_id: &str) -> usize {
        self.plans.read().await.get(user_id).map_or(0, Vec::len)
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn get_active_plan(&self, user_id: &str) -> Result<Option<Plan>, StorageError> {
        let plans = self.plans.read().await;
        Ok(plans
            .get(user_id)
            .and_then(|versions| versions.iter().max_by_key(|p| p.version))
            .cloned())
    }

    async fn save(&self, draft: PlanDraft) -> Result<Plan, StorageError> {
        let mut plans = self.plans.write().await;
        let versions = plans.entry(draft.user_id.clone()).or_default();

        if versions.iter().any(|p| p.version == draft.version) {
            return Err(StorageError::VersionConflict {
                user_id: draft.user_id,
                version: draft.version,
            });
        }

        let plan = draft.into_plan(Utc::now().trunc_subsecs(3));
        versions.push(plan.clone());
        versions.sort_by_key(|p| p.version);
        Ok(plan)
    }

    async fn get_history(&self, user_id: &str) -> Result<Vec<Plan>, StorageError> {
        Ok(self
            .plans
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Health records held in memory
#[derive(Debug, Default)]
pub struct InMemoryHealthRecords {
    records: RwLock<HashMap<(String, NaiveDate), HealthRecord>>,
}

impl InMemoryHealthRecords {
    /// Create an empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source pre-populated with one record
    #[must_use]
    pub fn with_record(record: HealthRecord) -> Self {
        let mut records = HashMap::new();
        records.insert((record.user_id.clone(), record.date), record);
        Self {
            records: RwLock::new(records),
        }
    }

    /// Add or replace a record
    pub async fn insert(&self, record: HealthRecord) {
        self.records
            .write()
            .await
            .insert((record.user_id.clone(), record.date), record);
    }
}

#[async_trait]
impl HealthRecordSource for InMemoryHealthRecords {
    async fn get_record(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<HealthRecord>, StorageError> {
        Ok(self
            .records
            .read()
            .await
            .get(&(user_id.to_owned(), date))
            .cloned())
    }
}

/// Profiles held in memory
#[derive(Debug, Default)]
pub struct InMemoryProfiles {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryProfiles {
    /// Create an empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a profile
    pub async fn insert(&self, profile: UserProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.user_id.clone(), profile);
    }
}

#[async_trait]
impl ProfileSource for InMemoryProfiles {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StorageError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }
}
