//! Search executors, one per request kind, behind a single dispatcher.

pub mod cache;
pub mod files;
pub mod help;
pub mod line;
pub mod symbols;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::SearchError;
use crate::host::{FileIndex, SymbolProvider, Workbench};
use crate::query::{classify, PrefixTable, SearchKind, SearchRequest};
use crate::types::ResultItem;

use cache::SymbolCache;
use symbols::SymbolClasses;
pub use symbols::SymbolKindClass;

/// Classifies queries and runs them against the host capabilities
pub struct SearchEngine {
    workspace_root: PathBuf,
    table: PrefixTable,
    classes: SymbolClasses,
    exclude_pattern: String,
    max_file_results: usize,
    files: Arc<dyn FileIndex>,
    symbols: Mutex<SymbolCache>,
    workbench: Arc<dyn Workbench>,
}

impl SearchEngine {
    pub fn new(
        workspace_root: PathBuf,
        config: &Config,
        exclude_pattern: String,
        files: Arc<dyn FileIndex>,
        symbol_provider: Arc<dyn SymbolProvider>,
        workbench: Arc<dyn Workbench>,
    ) -> Self {
        Self {
            workspace_root,
            table: PrefixTable::new(&config.prefixes, &config.commands),
            classes: SymbolClasses::from_config(&config.symbols),
            exclude_pattern,
            max_file_results: config.palette.max_file_results,
            files,
            symbols: Mutex::new(SymbolCache::new(symbol_provider)),
            workbench,
        }
    }

    pub fn table(&self) -> &PrefixTable {
        &self.table
    }

    pub fn workbench(&self) -> &Arc<dyn Workbench> {
        &self.workbench
    }

    pub fn classify(&self, raw: &str) -> SearchRequest {
        classify(raw, &self.table)
    }

    /// The file that file-scoped searches look into: the highlighted row's
    /// file if it has one, else the host's active document.
    pub fn focus_file(&self, highlighted: Option<&ResultItem>) -> Option<PathBuf> {
        highlighted
            .and_then(ResultItem::target_file)
            .map(Path::to_path_buf)
            .or_else(|| self.workbench.active_file())
    }

    /// Run one request. The result is unfiltered by `symbol_filter`; see [`refine`].
    pub async fn execute(
        &self,
        request: &SearchRequest,
        focus: Option<&Path>,
    ) -> Result<Vec<ResultItem>, SearchError> {
        let result = match request.kind {
            SearchKind::Files => files::execute(self, request, focus).await,
            SearchKind::Functions | SearchKind::Declarations | SearchKind::Literals => {
                match SymbolKindClass::for_search(request.kind) {
                    Some(class) => symbols::execute(self, request, class, focus).await,
                    None => Ok(Vec::new()),
                }
            }
            SearchKind::Line => line::execute(self, request, focus),
            SearchKind::Help => Ok(help::help_items(&self.table)),
            SearchKind::Command | SearchKind::WorkspaceSymbols | SearchKind::RecentFiles => {
                self.pass_through(request.kind);
                Ok(Vec::new())
            }
        };

        match result {
            Err(SearchError::NoActiveFile) => {
                tracing::debug!("No active file for {} search", request.kind);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Classify, execute and refine `raw` in one go. Without an explicit
    /// `focus` the workbench's active file is used.
    pub async fn search(
        &self,
        raw: &str,
        focus: Option<&Path>,
    ) -> Result<Vec<ResultItem>, SearchError> {
        let request = self.classify(raw);
        let focus = focus
            .map(Path::to_path_buf)
            .or_else(|| self.workbench.active_file());
        let items = self.execute(&request, focus.as_deref()).await?;
        Ok(refine(&request, &items))
    }

    /// `file` relative to the workspace root, '/'-separated
    pub fn relative_path(&self, file: &Path) -> String {
        match file.strip_prefix(&self.workspace_root) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => file.display().to_string(),
        }
    }

    fn pass_through(&self, kind: SearchKind) {
        if let Some(command) = self.table.entry(kind).and_then(|e| e.command.as_deref()) {
            tracing::debug!("Delegating {} to {}", kind, command);
            self.workbench.run_command(command);
        }
    }
}

/// Narrow symbol results by the text typed after the prefix
/// (case-insensitive substring of the symbol name). Other kinds pass through.
pub fn refine(request: &SearchRequest, items: &[ResultItem]) -> Vec<ResultItem> {
    let needle = request.symbol_filter.trim().to_lowercase();
    if !request.kind.is_symbol_search() || needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| {
            item.symbol_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
