//! Conformance harness CLI
//!
//! Replays recorded assertion scripts through the reporter.

use anyhow::Context;
use clap::{Parser, Subcommand};
use conformance_harness::reporter::{StdoutConsole, WriterConsole};
use conformance_harness::script::Script;
use conformance_harness::{HarnessConfig, VERSION};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "conformance-harness")]
#[command(author, version, about = "Assertion and reporting harness for conformance suites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an assertion script and report its results
    Run {
        /// The script to replay
        file: PathBuf,
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
        /// Quiet mode (same as `?quiet=1`); console lines go to stderr instead of stdout
        #[arg(short, long)]
        quiet: bool,
        /// Write console lines as they arrive instead of holding them until a failure
        #[arg(long)]
        unbuffered: bool,
        /// Query string to configure the session from, e.g. `?quiet=1`
        #[arg(long, value_name = "QUERY")]
        query: Option<String>,
    },

    /// Check that a script parses and every operand is well-formed
    Check {
        /// The script to check
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    tracing::debug!(version = VERSION, "starting");

    let outcome = match cli.command {
        Commands::Run {
            file,
            json,
            quiet,
            unbuffered,
            query,
        } => run_script(&file, json, quiet, unbuffered, query.as_deref()),
        Commands::Check { file } => check_script(&file),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load(path: &Path) -> anyhow::Result<Script> {
    Script::load(path).with_context(|| format!("failed to load script '{}'", path.display()))
}

fn run_script(
    path: &Path,
    json: bool,
    quiet: bool,
    unbuffered: bool,
    query: Option<&str>,
) -> anyhow::Result<bool> {
    let script = load(path)?;

    let config = query
        .map(HarnessConfig::from_query)
        .unwrap_or_default()
        .with_buffer_console(!unbuffered);
    let config = if quiet { config.with_quiet(true) } else { config };

    // With --json the console must not interleave with the report on stdout.
    let report = if json || config.quiet {
        script.replay(config, WriterConsole::stderr())?
    } else {
        script.replay(config, StdoutConsole)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }

    if !report.finished {
        tracing::warn!(file = %path.display(), "script did not call finish");
    }
    Ok(report.succeeded())
}

fn check_script(path: &Path) -> anyhow::Result<bool> {
    let script = load(path)?;
    script
        .validate()
        .with_context(|| format!("invalid script '{}'", path.display()))?;
    println!("{}: {} steps OK", path.display(), script.steps.len());
    Ok(true)
}
