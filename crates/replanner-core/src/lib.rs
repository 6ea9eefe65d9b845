// ABOUTME: Core types and constants for the Pierre health replanner
// ABOUTME: Foundation crate with error handling, plan and health-record models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Replanner Core
//!
//! Foundation crate shared by the intelligence engine and the replanning
//! service. It is designed to change infrequently so the rest of the
//! workspace benefits from incremental compilation.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `StorageError`
//! - **models**: Health records, versioned plans, and user profiles
//! - **constants**: Decision thresholds and calorie defaults

/// Unified error handling system with stable machine-readable error codes
pub mod errors;

/// Decision thresholds and nutrition constants
pub mod constants;

/// Core data models (`HealthRecord`, `Plan`, `UserProfile`, etc.)
pub mod models;
