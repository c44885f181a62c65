//! Global tick clock.
//!
//! The [`TickClock`] counts how many snapshots the manager has taken. Time
//! only moves when a snapshot is taken, so a run is fully deterministic and
//! independent of host speed.

use serde::{Deserialize, Serialize};

/// Discrete simulation clock, one step per manager snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickClock {
    /// Number of ticks elapsed since the clock was created.
    current: u64,
}

impl TickClock {
    /// Create a new clock at tick zero.
    pub fn new() -> Self {
        Self { current: 0 }
    }

    /// Ticks elapsed so far.
    pub fn now(&self) -> u64 {
        self.current
    }

    /// Advance by one tick and return the number of the tick just completed.
    pub fn advance(&mut self) -> u64 {
        self.current += 1;
        self.current
    }
}
