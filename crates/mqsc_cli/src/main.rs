//! mqsc-gen CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or settings
//! - 3: Environment configuration error
//! - 4: Run finished with skipped fragments or failed writes

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands};
use mqsc_core::EngineError;

const WORKSPACE_CRATES: [&str; 4] = ["mqsc_cli", "mqsc_core", "mqsc_config", "mqsc_templates"];

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CONFIG_ERROR: u8 = 3;
    pub const PARTIAL_FAILURE: u8 = 4;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Generate(args) => commands::generate::execute(args, &cli),
        Commands::Inspect(args) => commands::inspect::execute(args, &cli),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Log to stderr so `--json` output stays parseable.
///
/// `RUST_LOG` is honored as given. Without it, workspace crates log at `info`
/// and everything else at `warn`. `--verbose` and `--quiet` override the
/// workspace level either way.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Some("debug")
    } else if quiet {
        Some("warn")
    } else {
        None
    };

    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).is_ok_and(|v| !v.trim().is_empty());
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    let workspace_level = match (level, from_env) {
        (Some(level), _) => Some(level),
        (None, false) => Some("info"),
        (None, true) => None,
    };
    if let Some(level) = workspace_level {
        for target in WORKSPACE_CRATES {
            if let Ok(directive) = format!("{}={}", target, level).parse() {
                filter = filter.add_directive(directive);
            }
        }
    }

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Map an error to its exit code.
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(engine_error) = e.downcast_ref::<EngineError>() {
        return match engine_error {
            EngineError::ConfigLoad(_) => ExitCodes::CONFIG_ERROR,
            EngineError::UnsafeOutputRoot { .. } | EngineError::ReservedGroupName { .. } => {
                ExitCodes::INVALID_ARGS
            }
            _ => ExitCodes::GENERAL_ERROR,
        };
    }

    if e.downcast_ref::<mqsc_config::ConfigError>().is_some() {
        return ExitCodes::INVALID_ARGS;
    }

    ExitCodes::GENERAL_ERROR
}
