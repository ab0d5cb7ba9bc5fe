#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod export;

/// Worst-case secrecy analysis for dual-frequency two-ray links.
#[derive(Debug, Parser)]
#[command(name = "tworay", version, about, long_about = None)]
struct Cli {
    /// Increase output verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also write the log to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Dual-frequency power and its envelopes over distance, at a fixed spacing
    Envelope(commands::EnvelopeArgs),

    /// Optimal frequency spacing for a distance range
    Optimal(commands::OptimalArgs),

    /// Eavesdropper's achievable rate over the frequency spacing
    EveRate(commands::EveRateArgs),

    /// Worst-case secrecy rate over the frequency spacing
    Secrecy(commands::SecrecyArgs),

    /// Quick positivity checks against the actual worst-case secrecy rate
    Conditions(commands::ConditionsArgs),
}

/// Options shared by all subcommands that produce data.
#[derive(Debug, Args)]
pub struct Output {
    /// Write the computed series to a tab-separated .dat file
    #[arg(long)]
    export: bool,

    /// Directory for exported files
    #[arg(long, default_value = ".", value_name = "DIR")]
    output_dir: PathBuf,
}

fn init_logging(verbose: u8, log_file: Option<&PathBuf>) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_ref())?;

    match cli.command {
        Command::Envelope(args) => commands::envelope(&args),
        Command::Optimal(args) => commands::optimal(&args),
        Command::EveRate(args) => commands::eve_rate(&args),
        Command::Secrecy(args) => commands::secrecy(&args),
        Command::Conditions(args) => commands::conditions(&args),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
