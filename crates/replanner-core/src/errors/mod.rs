// ABOUTME: Unified error handling for the replanner with stable error codes
// ABOUTME: Defines ErrorCode, AppError, AppResult and the serialized ErrorResponse
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every failure that leaves the replanner is an [`AppError`]. The attached
//! [`ErrorCode`] is the machine-readable kind (serialized as a stable
//! SCREAMING_SNAKE name) and [`ErrorCode::description`] is the user-facing
//! message shown at the UI boundary.
//!
//! The workflow reports each step's failure with the kind of the step that
//! produced it:
//!
//! | Step                     | Code                |
//! |--------------------------|---------------------|
//! | plan / record lookup     | `DATA_FETCH_ERROR`  |
//! | metric computation       | `EVALUATION_ERROR`  |
//! | LLM-backed generation    | `GENERATION_ERROR`  |
//! | plan write               | `PERSISTENCE_ERROR` |

mod storage;

pub use storage::StorageError;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Standard error codes used throughout the replanner
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Workflow steps
    /// Health-record, profile, or plan lookup failed
    #[serde(rename = "DATA_FETCH_ERROR")]
    DataFetchFailed,
    /// Invalid input to metric computation
    #[serde(rename = "EVALUATION_ERROR")]
    EvaluationFailed,
    /// Plan generation failed validation after retry, timed out, or errored
    #[serde(rename = "GENERATION_ERROR")]
    GenerationFailed,
    /// Plan write conflicted or the store failed
    #[serde(rename = "PERSISTENCE_ERROR")]
    PersistenceFailed,
    /// Another run for the same user is already in flight
    #[serde(rename = "RUN_IN_PROGRESS")]
    RunInProgress,

    // Validation
    /// Caller supplied invalid input
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,

    // External services
    /// An external service returned an error
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError,
    /// An external service could not be reached
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable,
    /// Authentication with an external service failed
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed,
    /// An external service rate limited the request
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited,

    // Configuration
    /// Required configuration is missing
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing,
    /// Configuration value could not be parsed or is out of range
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid,

    // Internal
    /// Data serialization or deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError,
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::DataFetchFailed => "Your plan or activity data could not be loaded",
            Self::EvaluationFailed => "Your progress could not be evaluated",
            Self::GenerationFailed => {
                "A new plan could not be generated. Your current plan is unchanged"
            }
            Self::PersistenceFailed => {
                "The new plan could not be saved. Your current plan is unchanged"
            }
            Self::RunInProgress => "A plan review is already running for this user",
            Self::InvalidInput => "The provided input is invalid",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalServiceUnavailable => "An external service is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with external service failed",
            Self::ExternalRateLimited => "External service rate limit exceeded",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::InternalError => "An internal error occurred",
        }
    }

    /// Stable machine-readable name, identical to the serialized form
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DataFetchFailed => "DATA_FETCH_ERROR",
            Self::EvaluationFailed => "EVALUATION_ERROR",
            Self::GenerationFailed => "GENERATION_ERROR",
            Self::PersistenceFailed => "PERSISTENCE_ERROR",
            Self::RunInProgress => "RUN_IN_PROGRESS",
            Self::InvalidInput => "INVALID_INPUT",
            Self::ExternalServiceError => "EXTERNAL_SERVICE_ERROR",
            Self::ExternalServiceUnavailable => "EXTERNAL_SERVICE_UNAVAILABLE",
            Self::ExternalAuthFailed => "EXTERNAL_AUTH_FAILED",
            Self::ExternalRateLimited => "EXTERNAL_RATE_LIMITED",
            Self::ConfigMissing => "CONFIG_MISSING",
            Self::ConfigInvalid => "CONFIG_INVALID",
            Self::SerializationError => "SERIALIZATION_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether this code belongs to one of the four workflow step kinds
    #[must_use]
    pub const fn is_workflow_step(&self) -> bool {
        matches!(
            self,
            Self::DataFetchFailed
                | Self::EvaluationFailed
                | Self::GenerationFailed
                | Self::PersistenceFailed
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Workflow run the error belongs to
    pub run_id: Option<Uuid>,
    /// User the run was executing for
    pub user_id: Option<String>,
    /// Additional key-value context
    pub details: Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            run_id: None,
            user_id: None,
            details: Value::Null,
        }
    }
}

/// Unified error type for the replanner
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message (diagnostic detail)
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Attach the workflow run id
    #[must_use]
    pub fn with_run_id(mut self, run_id: Uuid) -> Self {
        self.context.run_id = Some(run_id);
        self
    }

    /// Attach the user id
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.context.user_id = Some(user_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// User-facing message for this error
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        self.code.description()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience functions for creating common errors
impl AppError {
    /// Invalid input to metric computation
    #[must_use]
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EvaluationFailed, message)
    }

    /// Plan generation failed
    #[must_use]
    pub fn generation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GenerationFailed, message)
    }

    /// A run for this user is already executing
    #[must_use]
    pub fn run_in_progress(user_id: &str) -> Self {
        Self::new(
            ErrorCode::RunInProgress,
            format!("A replanning run is already in flight for user {user_id}"),
        )
        .with_user_id(user_id)
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required configuration missing
    #[must_use]
    pub fn config_missing(key: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissing,
            format!("Environment variable {key} is not set"),
        )
    }

    /// Configuration value invalid
    #[must_use]
    pub fn config_invalid(key: &str, reason: impl fmt::Display) -> Self {
        Self::new(ErrorCode::ConfigInvalid, format!("Invalid {key}: {reason}"))
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service unavailable
    #[must_use]
    pub fn external_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Serialization failure
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }

    /// Internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(error.to_string()).with_source(error)
    }
}

/// Error payload handed to the UI boundary
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error body
    pub error: ErrorResponseDetails,
}

/// Body of an [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable kind
    pub code: ErrorCode,
    /// User-facing message
    pub message: String,
    /// Diagnostic detail
    pub detail: String,
    /// Workflow run id, if the error came from a run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    /// Extra structured context
    #[serde(skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.user_message().to_owned(),
                detail: error.message,
                run_id: error.context.run_id,
                details: error.context.details,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_error_code_serializes_to_stable_name() {
        for code in [
            ErrorCode::DataFetchFailed,
            ErrorCode::EvaluationFailed,
            ErrorCode::GenerationFailed,
            ErrorCode::PersistenceFailed,
            ErrorCode::RunInProgress,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
            assert!(code.is_workflow_step() || code == ErrorCode::RunInProgress);
        }
    }

    #[test]
    fn test_error_response_carries_kind_and_message() {
        let run_id = Uuid::new_v4();
        let error = AppError::generation("candidate failed validation twice").with_run_id(run_id);
        assert!(error.user_message().contains("current plan is unchanged"));
        let response = ErrorResponse::from(error);

        assert_eq!(response.error.code, ErrorCode::GenerationFailed);
        assert_eq!(response.error.run_id, Some(run_id));
        assert_eq!(response.error.detail, "candidate failed validation twice");

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("GENERATION_ERROR"));
        assert!(!json.contains("\"details\""));
    }
}
