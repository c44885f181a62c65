//! Simulation-wide parameters.
//!
//! The simulation has exactly two knobs, read once from the header of an
//! input file: the workload every new user starts with and the number of
//! users a server can hold. They are carried as an explicit [`SimConfig`]
//! value and copied into every server the manager creates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Initial workload of every user, in ticks.
    pub task_amount: u64,
    /// Maximum number of users per server.
    pub capacity: u32,
}

impl SimConfig {
    /// Build and validate a configuration.
    pub fn new(task_amount: u64, capacity: u32) -> Result<Self, ConfigError> {
        let config = Self {
            task_amount,
            capacity,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration consistency.
    ///
    /// A zero `task_amount` is allowed: such users are counted on the tick
    /// they arrive and evicted right after it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Validation("capacity must be > 0".to_string()));
        }
        Ok(())
    }
}
