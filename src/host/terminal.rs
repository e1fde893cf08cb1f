use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use colored::Colorize;
use serde::Serialize;

use super::{PaletteView, ShowOptions, Workbench};
use crate::error::SearchError;
use crate::types::{Range, ResultItem};

/// One line of `--json` output
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum TerminalEvent<'a> {
    Show {
        placeholder: &'a str,
    },
    Items {
        count: usize,
        items: &'a [ResultItem],
    },
    Value {
        value: &'a str,
    },
    Hide,
    Document {
        file: &'a Path,
        preview: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        selection: Option<Range>,
    },
    Command {
        name: &'a str,
    },
}

fn emit(event: &TerminalEvent<'_>) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::warn!("Failed to encode output: {}", e),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Print a result list, numbered from 1
pub fn print_items(items: &[ResultItem], highlighted: Option<usize>) {
    if items.is_empty() {
        println!("{} No results", "!".yellow());
        return;
    }
    for (i, item) in items.iter().enumerate() {
        let marker = if highlighted == Some(i) {
            ">".green().bold().to_string()
        } else {
            " ".to_string()
        };
        let description = item
            .description
            .as_ref()
            .map(|d| format!("  {}", d.cyan()))
            .unwrap_or_default();
        println!(
            "{marker}{}. {}{description}",
            (i + 1).to_string().bold(),
            render_label(&item.label)
        );
        if let Some(detail) = &item.detail {
            println!("     {}", detail.dimmed());
        }
    }
}

/// `$(icon) name` with the codicon token dimmed
fn render_label(label: &str) -> String {
    match label.split_once(") ") {
        Some((icon, rest)) if icon.starts_with("$(") => {
            format!("{} {}", format!("{icon})").dimmed(), rest.bold())
        }
        _ => label.to_string(),
    }
}

fn describe(file: &Path, root: &Path, selection: Option<Range>) -> String {
    let shown = file.strip_prefix(root).unwrap_or(file).display().to_string();
    match selection {
        Some(range) => format!(
            "{}:{}:{}",
            shown,
            range.start.line + 1,
            range.start.character + 1
        ),
        None => shown,
    }
}

/// A workbench whose "editor" is standard output
pub struct TerminalWorkbench {
    root: PathBuf,
    active: Mutex<Option<PathBuf>>,
    json: bool,
    quiet: bool,
}

impl TerminalWorkbench {
    pub fn new(root: PathBuf, active: Option<PathBuf>, json: bool, quiet: bool) -> Self {
        Self {
            root,
            active: Mutex::new(active),
            json,
            quiet,
        }
    }
}

#[async_trait]
impl Workbench for TerminalWorkbench {
    fn active_file(&self) -> Option<PathBuf> {
        lock(&self.active).clone()
    }

    async fn show_document(&self, file: &Path, options: ShowOptions) -> Result<(), SearchError> {
        if !options.preview {
            *lock(&self.active) = Some(file.to_path_buf());
        }

        if self.json {
            emit(&TerminalEvent::Document {
                file,
                preview: options.preview,
                selection: options.selection,
            });
        } else if !self.quiet {
            let target = describe(file, &self.root, options.selection);
            if options.preview {
                println!("  {} {}", "preview".dimmed(), target.dimmed());
            } else {
                println!("{} Opened {}", "✓".green(), target.blue());
            }
        }
        Ok(())
    }

    async fn line_text(&self, file: &Path, line: u32) -> Result<Option<String>, SearchError> {
        let content = tokio::fs::read_to_string(file)
            .await
            .map_err(|e| SearchError::provider("document", format!("{}: {e}", file.display())))?;
        Ok(content.lines().nth(line as usize).map(str::to_string))
    }

    fn run_command(&self, name: &str) {
        if self.json {
            emit(&TerminalEvent::Command { name });
        } else if !self.quiet {
            println!("{} Running command {}", "→".cyan(), name.bold());
        }
    }
}

/// The palette widget rendered as printed lists
pub struct TerminalView {
    items: Mutex<Vec<ResultItem>>,
    json: bool,
    quiet: bool,
}

impl TerminalView {
    pub fn new(json: bool, quiet: bool) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            json,
            quiet,
        }
    }

    /// The list currently displayed
    pub fn items(&self) -> Vec<ResultItem> {
        lock(&self.items).clone()
    }
}

impl PaletteView for TerminalView {
    fn show(&self, placeholder: &str) {
        if self.json {
            emit(&TerminalEvent::Show { placeholder });
        } else if !self.quiet {
            println!("{}", placeholder.dimmed());
        }
    }

    fn set_items(&self, items: &[ResultItem]) {
        *lock(&self.items) = items.to_vec();
        if self.json {
            emit(&TerminalEvent::Items {
                count: items.len(),
                items,
            });
        } else if !self.quiet {
            print_items(items, Some(0));
        }
    }

    fn set_busy(&self, busy: bool) {
        if busy {
            tracing::debug!("Searching...");
        }
    }

    fn set_value(&self, value: &str) {
        if self.json {
            emit(&TerminalEvent::Value { value });
        } else if !self.quiet {
            println!("{} {}", "query:".dimmed(), value.cyan());
        }
    }

    fn hide(&self) {
        if self.json {
            emit(&TerminalEvent::Hide);
        } else if !self.quiet {
            println!("{}", "Palette closed".dimmed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    #[test]
    fn test_describe_relative_with_position() {
        let root = Path::new("/w");
        let range = Range::at(Position::new(11, 3));
        assert_eq!(describe(Path::new("/w/src/a.rs"), root, Some(range)), "src/a.rs:12:4");
        assert_eq!(describe(Path::new("/elsewhere/b.rs"), root, None), "/elsewhere/b.rs");
    }

    #[test]
    fn test_render_label_keeps_plain_labels() {
        colored::control::set_override(false);
        assert_eq!(render_label("$(code) app.ts"), "$(code) app.ts");
        assert_eq!(render_label("1?\tType '@'"), "1?\tType '@'");
    }

    #[test]
    fn test_json_events_are_tagged() {
        let items = vec![ResultItem::shortcut("help", "@")];
        let json = serde_json::to_string(&TerminalEvent::Items {
            count: 1,
            items: &items,
        })
        .unwrap();
        assert!(json.starts_with(r#"{"event":"items","count":1"#));
        assert_eq!(
            serde_json::to_string(&TerminalEvent::Hide).unwrap(),
            r#"{"event":"hide"}"#
        );
    }

    #[tokio::test]
    async fn test_workbench_tracks_active_file_and_reads_lines() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.rs");
        std::fs::write(&file, "fn a() {}\nfn b() {}\n").unwrap();

        let workbench = TerminalWorkbench::new(dir.path().to_path_buf(), None, false, true);
        let preview = ShowOptions {
            preserve_focus: true,
            preview: true,
            selection: None,
        };
        workbench.show_document(&file, preview).await.unwrap();
        assert_eq!(workbench.active_file(), None);

        workbench.show_document(&file, ShowOptions::default()).await.unwrap();
        assert_eq!(workbench.active_file(), Some(file.clone()));

        assert_eq!(workbench.line_text(&file, 1).await.unwrap().as_deref(), Some("fn b() {}"));
        assert_eq!(workbench.line_text(&file, 9).await.unwrap(), None);
        assert!(workbench.line_text(&dir.path().join("missing.rs"), 0).await.is_err());
    }

    #[test]
    fn test_view_keeps_displayed_items() {
        let view = TerminalView::new(true, false);
        view.set_items(&[ResultItem::shortcut("one", "@")]);
        assert_eq!(view.items().len(), 1);
    }
}
