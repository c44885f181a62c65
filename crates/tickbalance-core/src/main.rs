//! TickBalance CLI: simulate first-fit user placement from input files.

use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tickbalance_core::input::{self, InputError};
use tickbalance_core::metrics;
use tickbalance_core::runner::{self, RunError};
use tickbalance_core::SimConfig;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tickbalance",
    about = "Simulate first-fit placement of user batches on capacity-bounded servers",
    version,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Input files, each simulated independently and in order.
    files: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run input files silently and print a metrics summary for each.
    Report {
        /// Input files.
        files: Vec<PathBuf>,
        /// Output results to JSON file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate a synthetic input file.
    GenInput {
        /// Number of batches.
        #[arg(long, default_value = "20")]
        batches: u32,
        /// Largest batch size (batch sizes are uniform in 0..=max).
        #[arg(long, default_value = "5")]
        max_batch: u32,
        /// Workload of every user, in ticks.
        #[arg(long, default_value = "4")]
        task_amount: u64,
        /// Users per server.
        #[arg(long, default_value = "10")]
        capacity: u32,
        /// Random seed.
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Output file path.
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let failures = match cli.command {
        None => runner::simulate_files(&cli.files, &mut io::stdout().lock()),
        Some(Commands::Report { files, output }) => report_files(&files, output.as_deref()),
        Some(Commands::GenInput {
            batches,
            max_batch,
            task_amount,
            capacity,
            seed,
            output,
        }) => match gen_input(batches, max_batch, task_amount, capacity, seed, &output) {
            Ok(()) => 0,
            Err(e) => {
                error!("Error generating input: {}", e);
                1
            }
        },
    };

    if failures > 0 {
        std::process::exit(1);
    }
}

/// Print a metrics table for each file. Returns the number of failures.
fn report_files(files: &[PathBuf], output: Option<&Path>) -> usize {
    let mut failures = 0;
    let mut results = Vec::new();

    for path in files {
        match runner::report_file(path) {
            Ok(result) => {
                println!("{}", metrics::format_table(&result));
                results.push(result);
            }
            Err(e) => {
                error!("Error simulating {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if let Some(output_path) = output {
        match runner::write_results(&results, output_path) {
            Ok(()) => println!("Results written to {}", output_path.display()),
            Err(e) => {
                error!("Error writing output: {}", e);
                failures += 1;
            }
        }
    }
    failures
}

fn gen_input(
    batches: u32,
    max_batch: u32,
    task_amount: u64,
    capacity: u32,
    seed: u64,
    output: &Path,
) -> Result<(), RunError> {
    let config = SimConfig::new(task_amount, capacity).map_err(InputError::from)?;
    let generated = runner::generate_input(config, batches, max_batch, seed);

    input::write_input(&generated, output)?;
    println!(
        "Generated {} batches ({} users) to {}",
        generated.batches.len(),
        generated.total_users(),
        output.display()
    );
    Ok(())
}
