use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::{workspace_root, OutputConfig};
use crate::config::Config;
use crate::excludes::resolve_exclude_set;

#[derive(Args)]
pub struct ExcludesArgs {
    /// Workspace to resolve (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,
}

#[derive(Serialize)]
struct ExcludesOutput {
    count: usize,
    patterns: Vec<String>,
    glob: String,
}

pub async fn run(args: ExcludesArgs, output: OutputConfig) -> Result<()> {
    let root = workspace_root(&args.path)?;
    let config = Config::load_or_default(&root).context("Failed to load configuration")?;
    let set = resolve_exclude_set(&root, &config.exclude).await;

    if output.json {
        let json_output = ExcludesOutput {
            count: set.len(),
            patterns: set.patterns().map(str::to_string).collect(),
            glob: set.to_glob(),
        };
        println!("{}", serde_json::to_string_pretty(&json_output)?);
        return Ok(());
    }

    if output.quiet {
        println!("{}", set.to_glob());
        return Ok(());
    }

    if set.is_empty() {
        println!("{} Nothing is excluded in {}", "!".yellow(), root.display());
        return Ok(());
    }

    println!("{} {} exclude patterns for {}\n", "✓".green(), set.len(), root.display());
    for pattern in set.patterns() {
        println!("  {}", pattern.cyan());
    }
    println!("\n{} {}", "Glob:".bold(), set.to_glob().dimmed());

    Ok(())
}
