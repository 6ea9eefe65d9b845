// ABOUTME: SQLite implementation of the append-only versioned plan repository
// ABOUTME: Daily plans are stored as a JSON column; (user_id, version) is UNIQUE
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use replanner_core::models::{DailyPlan, Plan, PlanDraft};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::{debug, instrument};

use super::{column_u32, is_unique_violation, query_error, Database, PlanRepository};
use crate::errors::StorageError;

const PLAN_COLUMNS: &str =
    "user_id, version, title, duration_days, reasoning, daily_plans, created_at";

impl Database {
    pub(super) async fn migrate_plans(&self) -> Result<(), StorageError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS plans (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                version INTEGER NOT NULL CHECK (version >= 1),
                title TEXT NOT NULL,
                duration_days INTEGER NOT NULL CHECK (duration_days >= 1),
                reasoning TEXT NOT NULL,
                daily_plans TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (user_id, version)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::connection(format!("migrate plans: {e}")))?;

        Ok(())
    }

    fn row_to_plan(row: &SqliteRow) -> Result<Plan, StorageError> {
        let daily_plans_json: String = row.get("daily_plans");
        let daily_plans: Vec<DailyPlan> = serde_json::from_str(&daily_plans_json)
            .map_err(|e| StorageError::serialization(format!("plans.daily_plans: {e}")))?;

        Ok(Plan {
            user_id: row.get("user_id"),
            version: column_u32(row.get("version"), "plans.version")?,
            title: row.get("title"),
            duration_days: column_u32(row.get("duration_days"), "plans.duration_days")?,
            reasoning: row.get("reasoning"),
            daily_plans,
            created_at: row.get::<DateTime<Utc>, _>("created_at"),
        })
    }
}

#[async_trait]
impl PlanRepository for Database {
    #[instrument(skip(self))]
    async fn get_active_plan(&self, user_id: &str) -> Result<Option<Plan>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE user_id = $1 ORDER BY version DESC LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error("get active plan"))?;

        row.as_ref().map(Self::row_to_plan).transpose()
    }

    #[instrument(skip(self, draft), fields(user_id = %draft.user_id, version = draft.version))]
    async fn save(&self, draft: PlanDraft) -> Result<Plan, StorageError> {
        let daily_plans_json = serde_json::to_string(&draft.daily_plans)
            .map_err(|e| StorageError::serialization(format!("plans.daily_plans: {e}")))?;
        // Millisecond precision survives the TEXT round trip unchanged
        let created_at = Utc::now().trunc_subsecs(3);

        let result = sqlx::query(
            r"
            INSERT INTO plans (user_id, version, title, duration_days, reasoning, daily_plans, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&draft.user_id)
        .bind(i64::from(draft.version))
        .bind(&draft.title)
        .bind(i64::from(draft.duration_days))
        .bind(&draft.reasoning)
        .bind(&daily_plans_json)
        .bind(created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                debug!("Plan version persisted");
                Ok(draft.into_plan(created_at))
            }
            Err(e) if is_unique_violation(&e) => Err(StorageError::VersionConflict {
                user_id: draft.user_id,
                version: draft.version,
            }),
            Err(e) => Err(query_error("save plan")(e)),
        }
    }

    #[instrument(skip(self))]
    async fn get_history(&self, user_id: &str) -> Result<Vec<Plan>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE user_id = $1 ORDER BY version ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(query_error("get plan history"))?;

        rows.iter().map(Self::row_to_plan).collect()
    }
}
