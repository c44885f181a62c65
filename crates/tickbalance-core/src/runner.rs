//! File-level drivers behind the `tickbalance` binary.
//!
//! Each input file is simulated on its own. A file that cannot be read or
//! parsed is logged and skipped, and the files after it still run.

use crate::config::SimConfig;
use crate::input::{self, InputError, SimInput};
use crate::metrics::SimulationMetrics;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("Failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),
}

/// Simulate each file in turn, writing every section to `out` after a blank
/// line. Returns the number of files that failed.
pub fn simulate_files<P, W>(paths: &[P], out: &mut W) -> usize
where
    P: AsRef<Path>,
    W: Write,
{
    let mut failures = 0;
    for path in paths {
        let path = path.as_ref();
        if let Err(e) = simulate_file(path, out) {
            error!("Error simulating {}: {}", path.display(), e);
            failures += 1;
        }
    }
    failures
}

/// Simulate one file. The separating blank line is written even if the file
/// then fails to load.
pub fn simulate_file<W: Write>(path: &Path, out: &mut W) -> Result<(), RunError> {
    writeln!(out)?;
    let input = input::load_input(path)?;
    info!(
        path = %path.display(),
        batches = input.batches.len(),
        task_amount = input.config.task_amount,
        capacity = input.config.capacity,
        "simulating"
    );
    crate::run_simulation(&input, out)?;
    out.flush()?;
    Ok(())
}

/// Run one file without per-tick output and return its metrics, tagged with
/// the file name.
pub fn report_file(path: &Path) -> Result<SimulationMetrics, RunError> {
    let input = input::load_input(path)?;
    let mut result = crate::run_simulation(&input, &mut io::sink())?;
    result.source = Some(path.display().to_string());
    Ok(result)
}

/// Write a set of run summaries as pretty-printed JSON.
pub fn write_results(results: &[SimulationMetrics], path: &Path) -> Result<(), RunError> {
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Build a synthetic input with `batches` batch sizes drawn uniformly from
/// `0..=max_batch`. The same seed always yields the same input.
pub fn generate_input(config: SimConfig, batches: u32, max_batch: u32, seed: u64) -> SimInput {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    SimInput {
        config,
        batches: (0..batches).map(|_| rng.gen_range(0..=max_batch)).collect(),
    }
}
