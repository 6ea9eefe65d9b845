// ABOUTME: Error handling for the replanner service, re-exported from replanner-core
// ABOUTME: AppError, ErrorCode, ErrorResponse, and StorageError shared with the workspace crates
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Unified Error Handling System
//!
//! The error taxonomy lives in `replanner-core` so the intelligence crate can
//! return the same `AppError`. See [`ErrorCode`] for the stable kinds surfaced
//! to callers.

pub use replanner_core::errors::*;
