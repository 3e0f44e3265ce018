//! Command-line front end for the car record validator.

pub mod config;
pub mod input;
pub mod output;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use dataentry_core::{Clock, FixedClock, RecordValidator, SystemClock, ValidationReport};

use crate::config::{CliConfig, OutputFormat};

/// Validate car data-entry submissions.
#[derive(Debug, Parser)]
#[command(name = "dataentry-validate", version, about)]
pub struct Args {
    /// JSON file holding one submission or an array of them (`-` for stdin).
    pub path: Option<PathBuf>,

    /// Validate as of this date (YYYY-MM-DD) instead of today.
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Output format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Every record was valid.
pub const EXIT_OK: u8 = 0;
/// At least one record failed validation.
pub const EXIT_INVALID: u8 = 1;
/// I/O, JSON or configuration error.
pub const EXIT_ERROR: u8 = 2;

/// Counts from one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub invalid: usize,
}

/// Read the input named by `args` and write results to stdout.
pub fn execute(args: &Args, config: &CliConfig) -> anyhow::Result<RunSummary> {
    let source = input::read_source(args.path.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(args, config, &source, &mut out)
}

/// Validate every submission in `source` and render the reports to `out`.
pub fn run<W: Write>(
    args: &Args,
    config: &CliConfig,
    source: &str,
    out: &mut W,
) -> anyhow::Result<RunSummary> {
    let clock: Box<dyn Clock> = match args.today.or(config.today) {
        Some(date) => {
            tracing::info!(%date, "Validating with fixed date");
            Box::new(FixedClock(date))
        }
        None => Box::new(SystemClock),
    };
    let validator =
        RecordValidator::with_clock(clock).context("validator rule table is misconfigured")?;

    let submissions = input::parse_submissions(source)?;
    let reports = submissions
        .iter()
        .map(|data| validator.validate_submission(data))
        .collect::<Result<Vec<ValidationReport>, _>>()
        .context("validator rule table is misconfigured")?;

    let summary = RunSummary {
        total: reports.len(),
        invalid: reports.iter().filter(|r| !r.is_valid).count(),
    };
    tracing::info!(
        total = summary.total,
        invalid = summary.invalid,
        "Validation finished"
    );

    output::render(args.format.unwrap_or(config.output), &reports, out)?;
    Ok(summary)
}

/// Map a run outcome to the process exit code. Errors are written to `err`
/// so they are visible regardless of the log filter.
pub fn exit_status<W: Write>(result: &anyhow::Result<RunSummary>, err: &mut W) -> u8 {
    match result {
        Ok(summary) if summary.invalid == 0 => EXIT_OK,
        Ok(_) => EXIT_INVALID,
        Err(error) => {
            // stderr may be closed; the exit code still reports the failure.
            let _ = writeln!(err, "error: {error:#}");
            EXIT_ERROR
        }
    }
}
