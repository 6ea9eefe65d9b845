// ABOUTME: Per-user run registry allowing at most one in-flight replanning run per user
// ABOUTME: Entries are released by an RAII guard, so cancelled runs free their slot too
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Tracks which users have a run in flight.
///
/// Uses the `DashMap` entry API so the check and the insert are one atomic
/// step per shard.
#[derive(Debug, Clone, Default)]
pub struct RunRegistry {
    active: Arc<DashMap<String, Uuid>>,
}

impl RunRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the user's slot for `run_id`
    ///
    /// # Errors
    ///
    /// Returns `RUN_IN_PROGRESS` if another run for the user holds the slot.
    pub fn try_acquire(&self, user_id: &str, run_id: Uuid) -> AppResult<RunGuard> {
        match self.active.entry(user_id.to_owned()) {
            Entry::Occupied(existing) => {
                debug!(user_id, holder = %existing.get(), "Run rejected: user already has a run in flight");
                Err(AppError::run_in_progress(user_id).with_run_id(run_id))
            }
            Entry::Vacant(slot) => {
                slot.insert(run_id);
                Ok(RunGuard {
                    active: Arc::clone(&self.active),
                    user_id: user_id.to_owned(),
                    run_id,
                })
            }
        }
    }

    /// Whether a run is in flight for the user
    #[must_use]
    pub fn is_running(&self, user_id: &str) -> bool {
        self.active.contains_key(user_id)
    }

    /// Number of users with a run in flight
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.active.len()
    }
}

/// Holds a user's run slot until dropped
#[derive(Debug)]
pub struct RunGuard {
    active: Arc<DashMap<String, Uuid>>,
    user_id: String,
    run_id: Uuid,
}

impl RunGuard {
    /// Run that holds the slot
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        // Only release the slot if it still belongs to this run
        self.active
            .remove_if(&self.user_id, |_, holder| *holder == self.run_id);
    }
}
