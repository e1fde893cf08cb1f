mod classify;
mod completions;
mod excludes;
mod init;
mod palette;
mod search;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::excludes::resolve_exclude_pattern;
use crate::host::{OutlineProvider, TerminalWorkbench, WorkspaceIndex};
use crate::search::SearchEngine;

#[derive(Parser)]
#[command(name = "goto-anything")]
#[command(about = "Go to any file, symbol or line from a single prefix-driven query")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Show detailed progress
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration for a workspace
    Init(init::InitArgs),

    /// Run one query against a workspace and print the results
    Search(search::SearchArgs),

    /// Show how a query is interpreted
    Classify(classify::ClassifyArgs),

    /// Print the resolved exclude glob
    Excludes(excludes::ExcludesArgs),

    /// Open an interactive palette reading queries from stdin
    Palette(palette::PaletteArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let output = OutputConfig {
            json: self.json,
            quiet: self.quiet,
            verbose: self.verbose,
        };

        match self.command {
            Commands::Init(args) => init::run(args, output),
            Commands::Search(args) => search::run(args, output).await,
            Commands::Classify(args) => classify::run(args, output),
            Commands::Excludes(args) => excludes::run(args, output).await,
            Commands::Palette(args) => palette::run(args, output).await,
            Commands::Completions(args) => {
                completions::run(args);
                Ok(())
            }
        }
    }
}

/// Output configuration passed to all commands
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    pub verbose: bool,
}

fn workspace_root(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("Invalid path: {}", path.display()))
}

/// `file` as an absolute path, relative paths taken from the workspace root
fn active_file(root: &Path, file: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(file) = file else {
        return Ok(None);
    };
    let joined = if file.is_absolute() {
        file.to_path_buf()
    } else {
        root.join(file)
    };
    let resolved = joined
        .canonicalize()
        .with_context(|| format!("Active file not found: {}", file.display()))?;
    Ok(Some(resolved))
}

/// Everything a query needs, wired to the terminal host
struct Session {
    config: Config,
    engine: Arc<SearchEngine>,
}

async fn open_session(path: &Path, file: Option<&Path>, output: OutputConfig) -> Result<Session> {
    let root = workspace_root(path)?;
    let config = Config::load_or_default(&root).context("Failed to load configuration")?;
    let active = active_file(&root, file)?;

    let exclude_pattern = resolve_exclude_pattern(&root, &config.exclude).await;
    if output.verbose && !output.json {
        eprintln!("Exclude pattern: {exclude_pattern}");
    }

    let index = Arc::new(WorkspaceIndex::new(&root));
    index.spawn_load();

    let symbols = OutlineProvider::new().context("Failed to initialize tree-sitter parsers")?;
    let workbench = TerminalWorkbench::new(root.clone(), active, output.json, output.quiet);

    let engine = Arc::new(SearchEngine::new(
        root,
        &config,
        exclude_pattern,
        index,
        Arc::new(symbols),
        Arc::new(workbench),
    ));

    Ok(Session { config, engine })
}
