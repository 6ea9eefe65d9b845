// ABOUTME: SQLite user profile storage used to derive daily calorie targets
// ABOUTME: Implements ProfileSource and the upsert operation used by the CLI
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use async_trait::async_trait;
use chrono::Utc;
use replanner_core::models::{ActivityLevel, Sex, UserProfile};
use sqlx::Row;
use tracing::instrument;

use super::{column_u32, query_error, Database, ProfileSource};
use crate::errors::StorageError;

impl Database {
    pub(super) async fn migrate_profiles(&self) -> Result<(), StorageError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_profiles (
                user_id TEXT PRIMARY KEY,
                sex TEXT NOT NULL,
                age_years INTEGER NOT NULL,
                height_cm REAL NOT NULL,
                weight_kg REAL NOT NULL,
                activity_level TEXT NOT NULL,
                goal TEXT NOT NULL DEFAULT '',
                daily_calorie_target REAL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::connection(format!("migrate user_profiles: {e}")))?;

        Ok(())
    }

    /// Create or replace a user's profile
    ///
    /// # Errors
    ///
    /// Returns a query error if the write fails.
    #[instrument(skip(self, profile), fields(user_id = %profile.user_id))]
    pub async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO user_profiles (
                user_id, sex, age_years, height_cm, weight_kg,
                activity_level, goal, daily_calorie_target, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT(user_id) DO UPDATE SET
                sex = excluded.sex,
                age_years = excluded.age_years,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                activity_level = excluded.activity_level,
                goal = excluded.goal,
                daily_calorie_target = excluded.daily_calorie_target,
                updated_at = excluded.updated_at
            ",
        )
        .bind(&profile.user_id)
        .bind(profile.sex.as_str())
        .bind(i64::from(profile.age_years))
        .bind(profile.height_cm)
        .bind(profile.weight_kg)
        .bind(profile.activity_level.as_str())
        .bind(&profile.goal)
        .bind(profile.daily_calorie_target)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(query_error("upsert profile"))?;

        Ok(())
    }
}

#[async_trait]
impl ProfileSource for Database {
    #[instrument(skip(self))]
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT user_id, sex, age_years, height_cm, weight_kg,
                   activity_level, goal, daily_calorie_target
            FROM user_profiles
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error("get profile"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let sex_str: String = row.get("sex");
        let sex = Sex::parse(&sex_str)
            .ok_or_else(|| StorageError::serialization(format!("user_profiles.sex: {sex_str}")))?;
        let activity_level: String = row.get("activity_level");

        Ok(Some(UserProfile {
            user_id: row.get("user_id"),
            sex,
            age_years: column_u32(row.get("age_years"), "user_profiles.age_years")?,
            height_cm: row.get("height_cm"),
            weight_kg: row.get("weight_kg"),
            activity_level: ActivityLevel::parse(&activity_level),
            goal: row.get("goal"),
            daily_calorie_target: row.get("daily_calorie_target"),
        }))
    }
}
