// ABOUTME: Storage contracts for plans, health records, and profiles plus the SQLite backend
// ABOUTME: Workflow collaborators are injected as trait objects so tests can use in-memory fakes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Storage
//!
//! Three contracts are consumed by the replanning workflow:
//!
//! - [`PlanRepository`]: append-only, versioned plans
//! - [`HealthRecordSource`]: read-only daily activity logs
//! - [`ProfileSource`]: read-only user profiles
//!
//! [`Database`] implements all three on `SQLite` via sqlx. The `memory`
//! module provides in-process implementations.

mod health_records;
mod memory;
mod plans;
mod profiles;

pub use memory::{InMemoryHealthRecords, InMemoryPlanRepository, InMemoryProfiles};

use std::fs;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use replanner_core::models::{HealthRecord, Plan, PlanDraft, UserProfile};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Error as SqlxError, SqlitePool};
use tracing::info;

use crate::config::DatabaseUrl;
use crate::errors::StorageError;

// ============================================================================
// Contracts
// ============================================================================

/// Read/write access to versioned plans
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Highest-version plan for the user, if any
    async fn get_active_plan(&self, user_id: &str) -> Result<Option<Plan>, StorageError>;

    /// Persist a new plan version and return it with its creation time.
    ///
    /// Fails with [`StorageError::VersionConflict`] if (`user_id`, `version`)
    /// already exists. Existing versions are never overwritten.
    async fn save(&self, draft: PlanDraft) -> Result<Plan, StorageError>;

    /// All plans for the user, ordered by version ascending
    async fn get_history(&self, user_id: &str) -> Result<Vec<Plan>, StorageError>;
}

/// Read-only access to logged daily activity
#[async_trait]
pub trait HealthRecordSource: Send + Sync {
    /// Record for the user on `date`, if one was logged
    async fn get_record(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<HealthRecord>, StorageError>;
}

/// Read-only access to user profiles
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Profile for the user, if one exists
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StorageError>;
}

// ============================================================================
// SQLite backend
// ============================================================================

/// `SQLite` storage for plans, health records, and profiles
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run migrations
    ///
    /// # Errors
    ///
    /// Returns a connection error if the database cannot be opened or migrated.
    pub async fn new(url: &DatabaseUrl) -> Result<Self, StorageError> {
        let pool = match url {
            // A single, never-recycled connection: each new in-memory connection is a fresh database
            DatabaseUrl::Memory => SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect("sqlite::memory:")
                .await
                .map_err(|e| StorageError::connection(e.to_string()))?,
            DatabaseUrl::SQLite { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| {
                        StorageError::connection(format!("{}: {e}", parent.display()))
                    })?;
                }
                let options = SqliteConnectOptions::from_str(&url.to_connection_string())
                    .map_err(|e| StorageError::connection(e.to_string()))?
                    .create_if_missing(true);
                SqlitePoolOptions::new()
                    .connect_with(options)
                    .await
                    .map_err(|e| StorageError::connection(e.to_string()))?
            }
        };

        let db = Self { pool };
        db.migrate().await?;
        info!(database = %url, "Database ready");
        Ok(db)
    }

    /// Create tables if they do not exist
    ///
    /// # Errors
    ///
    /// Returns a connection error if a statement fails.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        self.migrate_plans().await?;
        self.migrate_health_records().await?;
        self.migrate_profiles().await?;
        Ok(())
    }
}

/// Map a sqlx error to a query error naming the failed operation
fn query_error(operation: &'static str) -> impl FnOnce(SqlxError) -> StorageError {
    move |e| StorageError::query(format!("{operation}: {e}"))
}

/// Whether a sqlx error is a UNIQUE constraint violation
fn is_unique_violation(error: &SqlxError) -> bool {
    matches!(error, SqlxError::Database(db) if db.is_unique_violation())
}

/// Convert a stored integer column to `u32`
fn column_u32(value: i64, column: &str) -> Result<u32, StorageError> {
    u32::try_from(value)
        .map_err(|_| StorageError::serialization(format!("{column} out of range: {value}")))
}
