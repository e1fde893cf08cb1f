use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::{workspace_root, OutputConfig};
use crate::config::Config;

#[derive(Args)]
pub struct InitArgs {
    /// Workspace to initialize (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Overwrite an existing configuration
    #[arg(long)]
    force: bool,
}

#[derive(Serialize)]
struct InitOutput {
    status: String,
    config: String,
}

pub fn run(args: InitArgs, output: OutputConfig) -> Result<()> {
    let root = workspace_root(&args.path)?;
    let data_dir = Config::data_dir(&root);
    let config_path = Config::config_path(&root);

    if config_path.exists() && !args.force {
        if output.json {
            let json_output = InitOutput {
                status: "already_initialized".to_string(),
                config: config_path.display().to_string(),
            };
            println!("{}", serde_json::to_string_pretty(&json_output)?);
            return Ok(());
        }
        bail!(
            "Workspace already initialized in {}. Use --force to overwrite.",
            data_dir.display()
        );
    }

    Config::default()
        .save(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    if output.json {
        let json_output = InitOutput {
            status: "initialized".to_string(),
            config: config_path.display().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&json_output)?);
    } else if !output.quiet {
        println!("{} Workspace initialized in {}", "✓".green(), data_dir.display());
        println!("  Config: {}", config_path.display());
        println!("\nNext steps:");
        println!("  {} to try a query", "goto-anything search <query>".cyan());
        println!("  {} for an interactive palette", "goto-anything palette".cyan());
    }

    Ok(())
}
