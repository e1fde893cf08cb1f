use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::{workspace_root, OutputConfig};
use crate::config::Config;
use crate::query::{classify, PrefixTable};

#[derive(Args)]
pub struct ClassifyArgs {
    /// Query to classify
    query: String,

    /// Workspace whose prefix configuration applies (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,
}

pub fn run(args: ClassifyArgs, output: OutputConfig) -> Result<()> {
    let root = workspace_root(&args.path)?;
    let config = Config::load_or_default(&root).context("Failed to load configuration")?;
    let table = PrefixTable::new(&config.prefixes, &config.commands);
    let request = classify(&args.query, &table);

    if output.json {
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    println!("{} {}", "Kind:".bold(), request.kind.to_string().green());
    if output.quiet {
        return Ok(());
    }
    println!("{} {:?}", "File filter:".bold(), request.file_filter);
    println!("{} {:?}", "Symbol filter:".bold(), request.symbol_filter);
    if request.force_reexecute {
        println!("{}", "Always re-executed".dimmed());
    }
    if let Some(command) = table.entry(request.kind).and_then(|e| e.command.as_deref()) {
        println!("{} {}", "Delegates to:".bold(), command.cyan());
    }

    Ok(())
}
