use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use super::{open_session, OutputConfig};
use crate::error::SearchError;
use crate::host::print_items;
use crate::query::SearchRequest;
use crate::search::SearchEngine;
use crate::types::ResultItem;

/// Delay between attempts while the workspace is still being indexed
const RETRY_DELAY: Duration = Duration::from_millis(50);
const MAX_ATTEMPTS: usize = 200;

#[derive(Args)]
pub struct SearchArgs {
    /// Query, including any prefix (`@`, `#`, `:`, `?`, ...)
    #[arg(default_value = "")]
    query: String,

    /// Workspace to search (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Treat this file as the active document
    #[arg(long, short = 'f')]
    file: Option<PathBuf>,
}

#[derive(Serialize)]
struct SearchOutput {
    query: String,
    request: SearchRequest,
    count: usize,
    results: Vec<ResultItem>,
}

pub async fn run(args: SearchArgs, output: OutputConfig) -> Result<()> {
    let session = open_session(&args.path, args.file.as_deref(), output).await?;
    let engine = &session.engine;

    let request = engine.classify(&args.query);
    let results = search_when_ready(engine, &args.query).await?;

    if output.json {
        let json_output = SearchOutput {
            query: args.query,
            request,
            count: results.len(),
            results,
        };
        println!("{}", serde_json::to_string_pretty(&json_output)?);
        return Ok(());
    }

    if !output.quiet {
        println!(
            "{} Found {} results for: {} ({})\n",
            "✓".green(),
            results.len(),
            args.query.cyan(),
            request.kind
        );
    }
    print_items(&results, None);

    Ok(())
}

async fn search_when_ready(engine: &SearchEngine, query: &str) -> Result<Vec<ResultItem>> {
    for attempt in 1..=MAX_ATTEMPTS {
        match engine.search(query, None).await {
            Ok(items) => return Ok(items),
            Err(e) if e.is_retryable() => {
                tracing::debug!("Attempt {}: {}", attempt, e);
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(e) => return Err(anyhow!(e).context("Search failed")),
        }
    }
    Err(anyhow!(SearchError::NotReady).context("Workspace index did not finish loading"))
}
