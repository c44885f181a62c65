//! Input file ingestion.
//!
//! An input file holds one non-negative integer per line. The first two
//! values are `task_amount` and `capacity`; every later value is the size of
//! one incoming batch. Blank lines and lines starting with `#` are skipped.
//!
//! `task_amount` is read as a `u64`. `capacity` and batch sizes count users
//! and are read as `u32`; a larger value is an [`InputError::InvalidValue`]
//! on its line.

use crate::config::{ConfigError, SimConfig};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Read, Write};
use std::num::ParseIntError;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read input file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid value {value:?} at line {line}: {source}")]
    InvalidValue {
        line: usize,
        value: String,
        source: ParseIntError,
    },
    #[error("Missing required header value: {0}")]
    MissingHeader(&'static str),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A parsed input: simulation parameters plus the batch sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimInput {
    pub config: SimConfig,
    /// Batch sizes in arrival order.
    pub batches: Vec<u32>,
}

impl SimInput {
    /// Total users across all batches.
    pub fn total_users(&self) -> u64 {
        self.batches.iter().map(|&b| b as u64).sum()
    }
}

/// Load an input file.
pub fn load_input(path: &Path) -> Result<SimInput, InputError> {
    let file = std::fs::File::open(path)?;
    parse_input(BufReader::new(file))
}

/// Parse an input from any reader.
pub fn parse_input<R: Read>(reader: BufReader<R>) -> Result<SimInput, InputError> {
    let mut values = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        values.push((line_num + 1, trimmed.to_string()));
    }

    let mut values = values.into_iter();
    let task_amount = values
        .next()
        .ok_or(InputError::MissingHeader("task_amount"))
        .and_then(parse_value::<u64>)?;
    let capacity = values
        .next()
        .ok_or(InputError::MissingHeader("capacity"))
        .and_then(parse_value::<u32>)?;
    let batches = values.map(parse_value::<u32>).collect::<Result<_, _>>()?;

    Ok(SimInput {
        config: SimConfig::new(task_amount, capacity)?,
        batches,
    })
}

fn parse_value<T>((line, value): (usize, String)) -> Result<T, InputError>
where
    T: FromStr<Err = ParseIntError>,
{
    value
        .parse::<T>()
        .map_err(|source| InputError::InvalidValue {
            line,
            value,
            source,
        })
}

/// Write an input in the one-value-per-line format.
pub fn write_input(input: &SimInput, path: &Path) -> Result<(), InputError> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "{}", input.config.task_amount)?;
    writeln!(file, "{}", input.config.capacity)?;
    for batch in &input.batches {
        writeln!(file, "{}", batch)?;
    }
    Ok(())
}
