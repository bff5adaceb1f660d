//! Generate command - Rebuild the generated script tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use mqsc_config::{GeneratorSettings, WhitespaceMode};
use mqsc_core::{Engine, RunReport};

use super::Cli;
use crate::ExitCodes;

#[derive(Args)]
pub struct GenerateArgs {
    /// Environment configuration document
    #[arg(long = "env-config", env = "MQ_ENVIRONMENT_CONFIG")]
    env_config: Option<PathBuf>,

    /// Template directory
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Output directory (deleted and rebuilt on every run)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Fragment and output file extension
    #[arg(long)]
    extension: Option<String>,

    /// Process environments in parallel
    #[arg(long)]
    parallel: bool,

    /// Collapse line breaks as well as spaces
    #[arg(long)]
    flatten_lines: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

impl GenerateArgs {
    fn apply(&self, mut settings: GeneratorSettings) -> GeneratorSettings {
        if let Some(path) = &self.env_config {
            settings = settings.environment_config(path);
        }
        if let Some(dir) = &self.source_dir {
            settings = settings.source_dir(dir);
        }
        if let Some(dir) = &self.output_dir {
            settings = settings.output_dir(dir);
        }
        if let Some(extension) = &self.extension {
            settings = settings.extension(extension);
        }
        if self.parallel {
            settings = settings.parallel(true);
        }
        if self.flatten_lines {
            settings = settings.whitespace(WhitespaceMode::Flatten);
        }
        settings
    }
}

pub fn execute(args: &GenerateArgs, cli: &Cli) -> Result<u8> {
    let settings = args
        .apply(cli.base_settings()?)
        .resolve_against(&cli.project_dir);

    info!(
        "Generating MQSC scripts from {:?} into {:?}",
        settings.source_dir, settings.output_dir
    );

    let report = Engine::new(settings)
        .run()
        .context("MQSC generation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !cli.quiet {
        print_summary(&report);
    }

    if report.is_clean() {
        Ok(ExitCodes::SUCCESS)
    } else {
        Ok(ExitCodes::PARTIAL_FAILURE)
    }
}

fn print_summary(report: &RunReport) {
    if report.environments.is_empty() {
        println!("⚠️  No environments declared, nothing generated");
        return;
    }

    println!(
        "✅ Generated {} script(s) for {} environment(s)",
        report.artifacts.len(),
        report.environments.len()
    );
    for artifact in &report.artifacts {
        println!("   {}", artifact.path.display());
    }

    for path in &report.skipped_fragments {
        println!("⚠️  Skipped unreadable fragment {}", path.display());
    }
    for failure in &report.failed_writes {
        println!(
            "❌ {} / {}: {}",
            failure.scope, failure.environment, failure.message
        );
    }
}
