//! Metrics collection and aggregation for simulation runs.
//!
//! Records one sample per global tick and summarises a run: how long it took,
//! how much server time it consumed, how many servers it needed and how full
//! they were kept.

use crate::config::SimConfig;
use crate::manager::TickReport;
use serde::{Deserialize, Serialize};

/// Per-tick record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSample {
    pub tick: u64,
    /// Servers active during the tick.
    pub servers: usize,
    /// Users active during the tick.
    pub active_users: usize,
    pub servers_evicted: usize,
    pub users_completed: usize,
}

impl TickSample {
    /// Fraction of the live servers' slots that were occupied (0.0 - 1.0).
    pub fn utilization(&self, capacity: u32) -> f64 {
        if self.servers == 0 || capacity == 0 {
            return 0.0;
        }
        self.active_users as f64 / (self.servers as f64 * capacity as f64)
    }
}

impl From<&TickReport> for TickSample {
    fn from(report: &TickReport) -> Self {
        Self {
            tick: report.tick,
            servers: report.snapshot.servers(),
            active_users: report.snapshot.active_users(),
            servers_evicted: report.servers_evicted,
            users_completed: report.users_completed,
        }
    }
}

/// Aggregated metrics for an entire simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Input the run came from, if any.
    pub source: Option<String>,
    pub task_amount: u64,
    pub capacity: u32,
    /// Global ticks taken.
    pub total_ticks: u64,
    /// Sum of the lifetimes of every server, in ticks.
    pub cumulative_ticks: u64,
    pub batches: u64,
    pub users_admitted: u64,
    pub users_completed: u64,
    pub servers_created: u64,
    pub peak_servers: usize,
    pub peak_active_users: usize,
    /// Mean slot occupancy over ticks with at least one live server.
    pub mean_utilization: f64,
}

/// Collects per-tick samples during a run.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    samples: Vec<TickSample>,
    batches: u64,
}

impl MetricsCollector {
    /// Create a new collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed tick.
    pub fn record(&mut self, report: &TickReport) {
        self.samples.push(TickSample::from(report));
    }

    /// Record an admitted batch.
    pub fn record_batch(&mut self) {
        self.batches += 1;
    }

    pub fn samples(&self) -> &[TickSample] {
        &self.samples
    }

    /// Aggregate the samples into a summary.
    pub fn aggregate(
        &self,
        config: &SimConfig,
        cumulative_ticks: u64,
        users_admitted: u64,
        servers_created: u64,
    ) -> SimulationMetrics {
        let busy: Vec<f64> = self
            .samples
            .iter()
            .filter(|s| s.servers > 0)
            .map(|s| s.utilization(config.capacity))
            .collect();
        let mean_utilization = if busy.is_empty() {
            0.0
        } else {
            busy.iter().sum::<f64>() / busy.len() as f64
        };

        SimulationMetrics {
            source: None,
            task_amount: config.task_amount,
            capacity: config.capacity,
            total_ticks: self.samples.len() as u64,
            cumulative_ticks,
            batches: self.batches,
            users_admitted,
            users_completed: self
                .samples
                .iter()
                .map(|s| s.users_completed as u64)
                .sum(),
            servers_created,
            peak_servers: self.samples.iter().map(|s| s.servers).max().unwrap_or(0),
            peak_active_users: self
                .samples
                .iter()
                .map(|s| s.active_users)
                .max()
                .unwrap_or(0),
            mean_utilization,
        }
    }
}

/// Format metrics as a pretty-printed table string.
pub fn format_table(metrics: &SimulationMetrics) -> String {
    let title = metrics.source.as_deref().unwrap_or("simulation");
    let mut out = String::new();
    out.push_str(&format!("\n{:=<60}\n", format!("  {}  ", title)));
    out.push_str(&format!(
        "  task_amount: {} | capacity: {} | batches: {}\n",
        metrics.task_amount, metrics.capacity, metrics.batches
    ));
    out.push_str(&format!("{:-<60}\n", "  Time  "));
    out.push_str(&format!(
        "  Ticks: {}  Cumulative server ticks: {}\n",
        metrics.total_ticks, metrics.cumulative_ticks
    ));
    out.push_str(&format!("{:-<60}\n", "  Load  "));
    out.push_str(&format!(
        "  Users admitted: {}  completed: {}  peak active: {}\n",
        metrics.users_admitted, metrics.users_completed, metrics.peak_active_users
    ));
    out.push_str(&format!(
        "  Servers created: {}  peak live: {}  mean utilization: {:.1}%\n",
        metrics.servers_created,
        metrics.peak_servers,
        metrics.mean_utilization * 100.0
    ));
    out.push_str(&format!("{:=<60}\n", ""));
    out
}
