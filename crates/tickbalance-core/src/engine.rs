//! Tick-driven simulation engine.
//!
//! The engine feeds batches to a [`Manager`] and takes one snapshot after
//! each batch is admitted. Once the input is exhausted it drains the manager
//! tick by tick until no server is left, then reports the final (empty)
//! snapshot and the cumulative server-tick total.

use crate::config::SimConfig;
use crate::manager::{Manager, Snapshot};
use crate::metrics::{MetricsCollector, SimulationMetrics};
use std::io::{self, Write};
use tracing::{debug, info};

/// The main simulation engine.
pub struct SimulationEngine {
    /// Server manager.
    manager: Manager,
    /// Metrics collector.
    metrics: MetricsCollector,
    /// Batches admitted so far.
    pub batches_processed: u64,
}

impl SimulationEngine {
    /// Create a new simulation engine from config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            manager: Manager::new(config),
            metrics: MetricsCollector::new(),
            batches_processed: 0,
        }
    }

    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    /// Admit one batch, then take the snapshot that follows it.
    pub fn admit_batch(&mut self, size: u32) -> Snapshot {
        let opened = self.manager.admit_batch(size);
        self.metrics.record_batch();
        self.batches_processed += 1;

        let report = self.manager.tick();
        debug!(
            batch = self.batches_processed,
            size,
            opened,
            snapshot = %report.snapshot,
            "admitted batch"
        );
        self.metrics.record(&report);
        report.snapshot
    }

    /// Stop admitting and tick until every server is gone. Returns the
    /// snapshot of each drain tick, in order.
    pub fn drain(&mut self) -> Vec<Snapshot> {
        let reports = self.manager.run_to_completion();
        reports
            .into_iter()
            .map(|report| {
                self.metrics.record(&report);
                report.snapshot
            })
            .collect()
    }

    /// Run the whole simulation, writing one line per snapshot, then the
    /// final snapshot and the cumulative tick total.
    pub fn run<W: Write>(
        &mut self,
        batches: &[u32],
        out: &mut W,
    ) -> io::Result<SimulationMetrics> {
        for &size in batches {
            let snapshot = self.admit_batch(size);
            writeln!(out, "{}", snapshot)?;
        }
        for snapshot in self.drain() {
            writeln!(out, "{}", snapshot)?;
        }
        writeln!(out, "{}", self.manager.peek_counts())?;
        writeln!(out, "{}", self.manager.cumulative_ticks())?;

        let metrics = self.metrics();
        info!(
            ticks = metrics.total_ticks,
            cumulative_ticks = metrics.cumulative_ticks,
            servers_created = metrics.servers_created,
            "simulation complete"
        );
        Ok(metrics)
    }

    /// Summarise the run so far.
    pub fn metrics(&self) -> SimulationMetrics {
        self.metrics.aggregate(
            self.manager.config(),
            self.manager.cumulative_ticks(),
            self.manager.users_admitted,
            self.manager.servers_created,
        )
    }
}
