// ABOUTME: Service-level constants for the replanner binary and library
// ABOUTME: Decision and nutrition constants are re-exported from replanner-core
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

pub use replanner_core::constants::*;

/// Service name used in structured logs
pub const SERVICE_NAME: &str = "pierre-replanner";
