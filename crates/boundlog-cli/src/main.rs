//! boundlog CLI
//!
//! Thin wrapper around boundlog-core for inspecting and maintaining
//! bounded log files.
//!
//! ## Usage
//!
//! ```bash
//! # Print the records of a JSON-lines log
//! boundlog show ./app.jsonl
//!
//! # Keep only the last 500 lines
//! boundlog trim ./app.log --max-entries 500
//!
//! # Empty a log
//! boundlog clear ./app.log
//!
//! # Append one record
//! boundlog write ./app.jsonl "disk almost full" --json --level warning --meta host=db1
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use boundlog_core::{
    read_all, BoundedFile, FileLogging, Level, Metadata, RecordFormat, DEFAULT_MAX_ENTRIES,
};
use clap::{Parser, Subcommand};

/// Bounded log file maintenance
#[derive(Parser)]
#[command(name = "boundlog")]
#[command(version)]
#[command(about = "Inspect and maintain size-bounded log files")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every record of a JSON-lines log, oldest first
    Show {
        /// Log file to read
        path: PathBuf,
    },

    /// Trim a log to its most recent lines
    Trim {
        /// Log file to trim
        path: PathBuf,

        /// Number of lines to keep
        #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_ENTRIES)]
        max_entries: usize,
    },

    /// Reset a log to zero length
    Clear {
        /// Log file to clear
        path: PathBuf,
    },

    /// Append a single record
    Write {
        /// Log file to append to (created if missing)
        path: PathBuf,

        /// Message text
        message: String,

        /// Logger label
        #[arg(short, long, default_value = "boundlog")]
        label: String,

        /// Severity: trace, debug, info, notice, warning, error, critical
        #[arg(long, default_value = "info", value_parser = parse_level)]
        level: Level,

        /// Write a JSON-lines record instead of plain text
        #[arg(long)]
        json: bool,

        /// Number of lines to keep
        #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_ENTRIES)]
        max_entries: usize,

        /// Metadata as key=value (repeatable)
        #[arg(short, long = "meta", value_parser = parse_key_value)]
        meta: Vec<(String, String)>,
    },
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Parse a severity name
fn parse_level(s: &str) -> Result<Level, String> {
    s.parse::<Level>().map_err(|e| e.to_string())
}

/// Parse a `key=value` metadata pair
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("Invalid metadata '{}'. Expected key=value", s)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Show { path } => {
            let entries = read_all(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;

            for entry in &entries {
                println!(
                    "{} {} {}: {}",
                    entry.date.to_rfc3339(),
                    entry.level,
                    entry.category,
                    entry.message
                );
            }
            if entries.is_empty() && std::fs::metadata(&path)?.len() > 0 {
                tracing::warn!(
                    path = %path.display(),
                    "No JSON-lines records found; plain-text logs cannot be shown",
                );
            }
            tracing::info!(path = %path.display(), records = entries.len(), "Read log");
        }

        Commands::Trim { path, max_entries } => {
            if !path.exists() {
                anyhow::bail!("No log file at {}", path.display());
            }
            let before = std::fs::metadata(&path)?.len();
            // Opening an existing file trims it to `max_entries`
            let file = BoundedFile::open(&path, max_entries)?;
            file.truncate()?;
            let after = file.len()?;
            println!(
                "{}: {} -> {} bytes{}",
                path.display(),
                before,
                after,
                if after < before { " (trimmed)" } else { "" }
            );
        }

        Commands::Clear { path } => {
            if !path.exists() {
                anyhow::bail!("No log file at {}", path.display());
            }
            let file = BoundedFile::open(&path, DEFAULT_MAX_ENTRIES)?;
            file.clear()?;
            println!("Cleared {}", path.display());
        }

        Commands::Write {
            path,
            message,
            label,
            level,
            json,
            max_entries,
            meta,
        } => {
            let format = if json { RecordFormat::Json } else { RecordFormat::Plain };
            let logging = FileLogging::builder(&path)
                .max_entries(max_entries)
                .format(format)
                .level(Level::Trace)
                .open()?;

            let metadata: Metadata = meta.into_iter().collect();
            let written = logging
                .handler(label)
                .try_log(level, &message, Some(&metadata))
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            tracing::debug!(written, "Appended record");
        }
    }

    Ok(())
}
