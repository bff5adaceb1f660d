//! CLI command definitions.
//!
//! This module defines the command structure for the mqsc-gen CLI and the
//! settings resolution shared by every subcommand.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use mqsc_config::GeneratorSettings;

pub mod generate;
pub mod inspect;

/// mqsc-gen - environment specific MQSC script generator
#[derive(Parser)]
#[command(name = "mqsc")]
#[command(version, about = "mqsc-gen - environment specific MQSC script generator")]
#[command(long_about = r#"
mqsc-gen turns generic IBM MQ script templates into one script per
deployment environment.

Every *.mqsc file under the template directory is a fragment. Tokens such as
${queue.name} are replaced with the values declared for each environment in
the environment configuration document. For every environment the generator
writes one combined script for all fragments and one per release group
(first-level subdirectory):

  target/generated_mqsc/<env>/all-<env>.mqsc
  target/generated_mqsc/<env>/<group>-<env>.mqsc

COMMANDS:
  generate  → Rebuild the output tree
  inspect   → Show environments and template scopes without writing

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or settings
  3 - Environment configuration error
  4 - Finished with skipped fragments or failed writes
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project directory; relative paths are resolved against it
    #[arg(long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Settings file (defaults to <project-dir>/mqsc.yaml when present)
    #[arg(long, global = true, env = "MQSC_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate environment specific scripts
    Generate(generate::GenerateArgs),

    /// List environments and template scopes
    Inspect(inspect::InspectArgs),
}

impl Cli {
    /// Settings from `--settings` or the project's `mqsc.yaml`.
    pub fn base_settings(&self) -> Result<GeneratorSettings> {
        match &self.settings {
            Some(path) => GeneratorSettings::load(path)
                .with_context(|| format!("Failed to load settings from {:?}", path)),
            None => GeneratorSettings::discover(&self.project_dir)
                .context("Failed to load project settings"),
        }
    }
}
