// ABOUTME: SQLite health-record storage: one immutable row per user and day
// ABOUTME: Implements HealthRecordSource and the log operation used by the CLI
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use replanner_core::models::HealthRecord;
use sqlx::Row;
use tracing::instrument;

use super::{column_u32, is_unique_violation, query_error, Database, HealthRecordSource};
use crate::errors::StorageError;

impl Database {
    pub(super) async fn migrate_health_records(&self) -> Result<(), StorageError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS health_records (
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                calories_consumed REAL NOT NULL CHECK (calories_consumed >= 0),
                steps INTEGER NOT NULL CHECK (steps >= 0),
                weight_kg REAL,
                logged_at TEXT NOT NULL,
                UNIQUE (user_id, date)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::connection(format!("migrate health_records: {e}")))?;

        Ok(())
    }

    /// Log a day of activity. Records are immutable once logged.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AlreadyExists`] if the day was already logged
    /// for this user, or a query error if the insert fails.
    #[instrument(skip(self, record), fields(user_id = %record.user_id, date = %record.date))]
    pub async fn log_record(&self, record: &HealthRecord) -> Result<(), StorageError> {
        let result = sqlx::query(
            r"
            INSERT INTO health_records (user_id, date, calories_consumed, steps, weight_kg, logged_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&record.user_id)
        .bind(record.date)
        .bind(record.calories_consumed)
        .bind(i64::from(record.steps))
        .bind(record.weight_kg)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StorageError::AlreadyExists {
                context: format!("health record for {} on {}", record.user_id, record.date),
            }),
            Err(e) => Err(query_error("log health record")(e)),
        }
    }
}

#[async_trait]
impl HealthRecordSource for Database {
    #[instrument(skip(self))]
    async fn get_record(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<HealthRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT user_id, date, calories_consumed, steps, weight_kg
            FROM health_records
            WHERE user_id = $1 AND date = $2
            ",
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error("get health record"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(HealthRecord {
            user_id: row.get("user_id"),
            date: row.get("date"),
            calories_consumed: row.get("calories_consumed"),
            steps: column_u32(row.get("steps"), "health_records.steps")?,
            weight_kg: row.get("weight_kg"),
        }))
    }
}
