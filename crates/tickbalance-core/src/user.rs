//! User model for the tick simulation.
//!
//! A [`User`] is the smallest unit of work: a counter of workload units that
//! its owning server drains by one on every tick.

use serde::{Deserialize, Serialize};

/// A single user occupying one slot on a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Workload units left before this user is done.
    remaining_workload: u64,
}

impl User {
    /// Create a user carrying `workload` units of work.
    pub fn new(workload: u64) -> Self {
        Self {
            remaining_workload: workload,
        }
    }

    /// Consume one unit of workload.
    ///
    /// Saturates at zero: a user that is already exhausted stays at zero
    /// until its server evicts it.
    pub fn consume(&mut self) {
        self.remaining_workload = self.remaining_workload.saturating_sub(1);
    }

    /// Workload units left.
    pub fn remaining_workload(&self) -> u64 {
        self.remaining_workload
    }

    /// Whether the user has no work left and is due for eviction.
    pub fn is_exhausted(&self) -> bool {
        self.remaining_workload == 0
    }
}
