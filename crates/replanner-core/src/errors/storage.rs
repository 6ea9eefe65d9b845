// ABOUTME: Structured error types for plan, profile, and health-record storage
// ABOUTME: Repository implementations return these; the workflow maps them to step error kinds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};

/// Errors produced by storage backends
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A plan with the same (user, version) already exists. Plans are append-only.
    #[error("Plan version {version} already exists for user {user_id}")]
    VersionConflict {
        /// Owner of the conflicting plan
        user_id: String,
        /// Version that was already taken
        version: u32,
    },

    /// An immutable record (e.g. a logged day) already exists
    #[error("Record already exists: {context}")]
    AlreadyExists {
        /// Which record collided
        context: String,
    },

    /// The backing store could not be reached
    #[error("Storage connection failed: {context}")]
    Connection {
        /// What was being attempted
        context: String,
    },

    /// A query failed
    #[error("Storage query failed: {context}")]
    Query {
        /// What was being attempted
        context: String,
    },

    /// A stored row could not be encoded or decoded
    #[error("Stored data is malformed: {context}")]
    Serialization {
        /// Which field or row was malformed
        context: String,
    },
}

impl StorageError {
    /// Create a query error
    #[must_use]
    pub fn query(context: impl Into<String>) -> Self {
        Self::Query {
            context: context.into(),
        }
    }

    /// Create a serialization error
    #[must_use]
    pub fn serialization(context: impl Into<String>) -> Self {
        Self::Serialization {
            context: context.into(),
        }
    }

    /// Create a connection error
    #[must_use]
    pub fn connection(context: impl Into<String>) -> Self {
        Self::Connection {
            context: context.into(),
        }
    }

    /// Whether this is an append-only version conflict
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }

    /// Convert into an `AppError` with the given workflow step kind
    #[must_use]
    pub fn into_app_error(self, code: ErrorCode) -> AppError {
        AppError::new(code, self.to_string()).with_source(self)
    }
}
