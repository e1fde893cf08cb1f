use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{open_session, OutputConfig};
use crate::host::{print_items, TerminalView};
use crate::palette::{
    self, PaletteEvent, PaletteHandle, PaletteOptions, PaletteOutcome, PaletteState,
};
use crate::types::Location;

#[derive(Args)]
pub struct PaletteArgs {
    /// Workspace to browse (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Treat this file as the active document
    #[arg(long, short = 'f')]
    file: Option<PathBuf>,

    /// Debounce delay in milliseconds (overrides the configuration)
    #[arg(long)]
    delay: Option<u64>,

    /// Do not preview the highlighted result
    #[arg(long)]
    no_preview: bool,
}

/// One line typed at the prompt
#[derive(Debug, PartialEq, Eq)]
enum Input {
    /// New query text
    Query(String),
    /// Accept the highlighted row
    Accept,
    Next,
    Prev,
    /// Accept row `n` (1-based, as printed)
    Pick(usize),
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Input::Accept;
    }
    let Some(command) = line.strip_prefix('\\') else {
        return Input::Query(line.to_string());
    };
    match command.trim() {
        "next" | "n" => Input::Next,
        "prev" | "p" => Input::Prev,
        "quit" | "q" => Input::Quit,
        // `\\foo` types a literal backslash
        other if other.starts_with('\\') => Input::Query(command.to_string()),
        other => match other.parse::<usize>() {
            Ok(n) if n > 0 => Input::Pick(n),
            _ => Input::Unknown(other.to_string()),
        },
    }
}

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum PaletteOutput {
    Navigated {
        #[serde(flatten)]
        location: Location,
    },
    Dismissed,
}

/// Tracks the highlighted row of the list the view last displayed
struct Prompt {
    view: Arc<TerminalView>,
    highlighted: usize,
    output: OutputConfig,
}

impl Prompt {
    fn handle(&mut self, input: Input, handle: &PaletteHandle) {
        match input {
            Input::Query(text) => {
                self.highlighted = 0;
                handle.send(PaletteEvent::InputChanged(text));
            }
            Input::Accept => {
                if let PaletteState::Debouncing(pending) = handle.state() {
                    if !self.output.quiet && !self.output.json {
                        eprintln!(
                            "{} Results for {:?} are still pending; accepting the listed row",
                            "!".yellow(),
                            pending
                        );
                    }
                }
                let item = self.view.items().get(self.highlighted).cloned();
                self.highlighted = 0;
                handle.send(PaletteEvent::Accept(item));
            }
            Input::Pick(n) => {
                let items = self.view.items();
                match items.get(n - 1) {
                    Some(item) => {
                        self.highlighted = 0;
                        handle.send(PaletteEvent::Accept(Some(item.clone())));
                    }
                    None => eprintln!("{} No result #{} ({} shown)", "!".yellow(), n, items.len()),
                }
            }
            Input::Next => self.move_highlight(1, handle),
            Input::Prev => self.move_highlight(-1, handle),
            Input::Quit => {
                handle.send(PaletteEvent::Dismiss);
            }
            Input::Unknown(command) => {
                eprintln!(
                    "{} Unknown command \\{} (try \\next, \\prev, \\<n> or \\quit)",
                    "!".yellow(),
                    command
                );
            }
        }
    }

    fn move_highlight(&mut self, step: isize, handle: &PaletteHandle) {
        let items = self.view.items();
        if items.is_empty() {
            return;
        }
        let last = items.len() - 1;
        self.highlighted = self.highlighted.min(last).saturating_add_signed(step).min(last);
        handle.send(PaletteEvent::ActiveChanged(Some(items[self.highlighted].clone())));
        if !self.output.json && !self.output.quiet {
            print_items(&items, Some(self.highlighted));
        }
    }
}

pub async fn run(args: PaletteArgs, output: OutputConfig) -> Result<()> {
    let session = open_session(&args.path, args.file.as_deref(), output).await?;

    let mut options = PaletteOptions::from(&session.config.palette);
    if let Some(ms) = args.delay {
        options.delay = Duration::from_millis(ms);
    }
    if args.no_preview {
        options.enable_preview = false;
    }

    let view = Arc::new(TerminalView::new(output.json, output.quiet));
    let mut handle = palette::open(session.engine, view.clone(), options);
    let mut prompt = Prompt {
        view,
        highlighted: 0,
        output,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // End of input closes the event channel, which dismisses a palette still open
    let outcome = loop {
        tokio::select! {
            biased;
            outcome = handle.wait() => break outcome,
            line = lines.next_line() => match line {
                Ok(Some(line)) => prompt.handle(parse_input(&line), &handle),
                Ok(None) => break handle.join().await,
                Err(e) => {
                    tracing::warn!("Failed to read input: {}", e);
                    break handle.join().await;
                }
            },
        }
    }
    .context("Palette session failed")?;

    report(outcome, output)
}

fn report(outcome: PaletteOutcome, output: OutputConfig) -> Result<()> {
    if output.json {
        let json_output = match outcome {
            PaletteOutcome::Navigated(location) => PaletteOutput::Navigated { location },
            PaletteOutcome::Dismissed => PaletteOutput::Dismissed,
        };
        println!("{}", serde_json::to_string(&json_output)?);
    } else if output.verbose {
        match outcome {
            PaletteOutcome::Navigated(location) => {
                eprintln!("Navigated to {}", location.file.display());
            }
            PaletteOutcome::Dismissed => eprintln!("Dismissed"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Position, Range};

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("app@"), Input::Query("app@".into()));
        assert_eq!(parse_input(""), Input::Accept);
        assert_eq!(parse_input("\r"), Input::Accept);
        assert_eq!(parse_input("\\next"), Input::Next);
        assert_eq!(parse_input("\\p"), Input::Prev);
        assert_eq!(parse_input("\\3"), Input::Pick(3));
        assert_eq!(parse_input("\\quit"), Input::Quit);
        assert_eq!(parse_input("\\0"), Input::Unknown("0".into()));
        assert_eq!(parse_input("\\frob"), Input::Unknown("frob".into()));
        assert_eq!(parse_input("\\\\x"), Input::Query("\\x".into()));
    }

    #[test]
    fn test_outcome_json() {
        let location = Location::with_range(
            PathBuf::from("/w/a.rs"),
            Range::at(Position::new(4, 2)),
        );
        let json = serde_json::to_value(PaletteOutput::Navigated { location }).unwrap();
        assert_eq!(json["outcome"], "navigated");
        assert_eq!(json["file"], "/w/a.rs");
        assert_eq!(json["range"]["start"]["line"], 4);

        let json = serde_json::to_string(&PaletteOutput::Dismissed).unwrap();
        assert_eq!(json, r#"{"outcome":"dismissed"}"#);
    }
}
