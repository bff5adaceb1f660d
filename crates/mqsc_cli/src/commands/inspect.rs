//! Inspect command - Show what a run would generate.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use mqsc_core::Engine;

use super::Cli;
use crate::ExitCodes;

#[derive(Args)]
pub struct InspectArgs {
    /// Environment configuration document
    #[arg(long = "env-config", env = "MQ_ENVIRONMENT_CONFIG")]
    env_config: Option<PathBuf>,

    /// Template directory
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn execute(args: &InspectArgs, cli: &Cli) -> Result<u8> {
    let mut settings = cli.base_settings()?;
    if let Some(path) = &args.env_config {
        settings = settings.environment_config(path);
    }
    if let Some(dir) = &args.source_dir {
        settings = settings.source_dir(dir);
    }
    let settings = settings.resolve_against(&cli.project_dir);

    let plan = Engine::new(settings)
        .plan()
        .context("Failed to inspect project")?;

    if args.json {
        let value = json!({
            "environments": plan
                .environments
                .iter()
                .map(|e| json!({ "name": e.name(), "keys": e.len() }))
                .collect::<Vec<_>>(),
            "scopes": plan
                .scopes()
                .map(|s| json!({ "name": s.name(), "fragments": s.len() }))
                .collect::<Vec<_>>(),
            "skipped_fragments": plan.skipped_fragments,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(ExitCodes::SUCCESS);
    }

    println!("🌍 Environments ({}):", plan.environments.len());
    for env in plan.environments.iter() {
        println!("   {} ({} keys)", env.name(), env.len());
    }

    println!("📁 Scopes:");
    for scope in plan.scopes() {
        println!("   {} ({} fragments)", scope.name(), scope.len());
    }

    for path in &plan.skipped_fragments {
        println!("⚠️  Unreadable fragment {}", path.display());
    }

    Ok(ExitCodes::SUCCESS)
}
