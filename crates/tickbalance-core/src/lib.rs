//! TickBalance: discrete-time simulator for first-fit user placement.
//!
//! Batches of users arrive over time and are placed on capacity-bounded
//! servers. Every tick each server drains one unit of work from each of its
//! users; finished users leave, empty servers are shut down and their
//! lifetime is added to a cumulative server-tick total.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐     ┌───────────┐     ┌──────────────┐
//! │  Input   │────▶│  Engine   │────▶│   Metrics    │
//! │  File    │     │  (Ticks)  │     │  Collection  │
//! └──────────┘     └─────┬─────┘     └──────────────┘
//!                        │
//!                ┌───────┴───────┐
//!                │    Manager    │
//!                │  (First-fit)  │
//!                └───────┬───────┘
//!                        │
//!          ┌─────────────┼─────────────┐
//!          ▼             ▼             ▼
//!    ┌──────────┐  ┌──────────┐  ┌──────────┐
//!    │ Server 0 │  │ Server 1 │  │ Server N │
//!    │  Users   │  │  Users   │  │  Users   │
//!    └──────────┘  └──────────┘  └──────────┘
//! ```

pub mod clock;
pub mod config;
pub mod engine;
pub mod input;
pub mod manager;
pub mod metrics;
pub mod runner;
pub mod server;
pub mod user;

// Re-export key types for convenience.
pub use clock::TickClock;
pub use config::{ConfigError, SimConfig};
pub use engine::SimulationEngine;
pub use input::{load_input, parse_input, write_input, InputError, SimInput};
pub use manager::{Manager, ManagerPhase, Placement, Snapshot, TickReport};
pub use metrics::{MetricsCollector, SimulationMetrics};
pub use runner::{simulate_files, RunError};
pub use server::Server;
pub use user::User;

use std::io::{self, Write};

/// Run a complete simulation for one input, writing its output lines to `out`.
pub fn run_simulation<W: Write>(
    input: &SimInput,
    out: &mut W,
) -> io::Result<SimulationMetrics> {
    let mut engine = SimulationEngine::new(input.config);
    engine.run(&input.batches, out)
}
