//! In-memory hosts for unit tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{FileIndex, PaletteView, ShowOptions, SymbolProvider, Workbench};
use crate::error::SearchError;
use crate::types::{DocumentSymbol, ResultItem};

type FindCall = (String, String, Option<usize>);

/// A fixed file list; records every lookup
#[derive(Clone, Default)]
pub struct FakeFiles {
    files: Vec<PathBuf>,
    not_ready: Arc<AtomicUsize>,
    calls: Arc<Mutex<Vec<FindCall>>>,
}

impl FakeFiles {
    pub fn new(files: &[&str]) -> Self {
        Self {
            files: files.iter().map(PathBuf::from).collect(),
            ..Default::default()
        }
    }

    pub fn not_ready() -> Self {
        Self::default().not_ready_for(usize::MAX)
    }

    /// Answer `NotReady` to the next `calls` lookups
    pub fn not_ready_for(self, calls: usize) -> Self {
        self.not_ready.store(calls, Ordering::SeqCst);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<FindCall> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl FileIndex for FakeFiles {
    async fn find_files(
        &self,
        include: &str,
        exclude: &str,
        max_results: Option<usize>,
    ) -> Result<Vec<PathBuf>, SearchError> {
        self.calls
            .lock()
            .unwrap()
            .push((include.to_string(), exclude.to_string(), max_results));

        let remaining = self.not_ready.load(Ordering::SeqCst);
        if remaining > 0 {
            self.not_ready.store(remaining - 1, Ordering::SeqCst);
            return Err(SearchError::NotReady);
        }

        let pattern = glob::Pattern::new(include).map_err(|e| SearchError::provider("file", e))?;
        Ok(self
            .files
            .iter()
            .filter(|f| pattern.matches_path(f))
            .take(max_results.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}

/// Outlines keyed by file; counts provider calls
#[derive(Default)]
pub struct FakeSymbols {
    outlines: HashMap<PathBuf, Vec<DocumentSymbol>>,
    failing: bool,
    calls: AtomicUsize,
}

impl FakeSymbols {
    pub fn with(file: &str, symbols: Vec<DocumentSymbol>) -> Self {
        Self::default().and(file, symbols)
    }

    pub fn and(mut self, file: &str, symbols: Vec<DocumentSymbol>) -> Self {
        self.outlines.insert(PathBuf::from(file), symbols);
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SymbolProvider for FakeSymbols {
    async fn document_symbols(&self, file: &Path) -> Result<Vec<DocumentSymbol>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(SearchError::provider("symbol", "language server crashed"));
        }
        Ok(self.outlines.get(file).cloned().unwrap_or_default())
    }
}

/// Records shown documents and commands; tracks the active file
#[derive(Default)]
pub struct FakeWorkbench {
    active: Mutex<Option<PathBuf>>,
    lines: HashMap<(PathBuf, u32), String>,
    shown: Mutex<Vec<(PathBuf, ShowOptions)>>,
    commands: Mutex<Vec<String>>,
}

impl FakeWorkbench {
    pub fn new(active: Option<PathBuf>) -> Self {
        Self {
            active: Mutex::new(active),
            ..Default::default()
        }
    }

    pub fn with_line(mut self, file: &str, line: u32, text: &str) -> Self {
        self.lines.insert((PathBuf::from(file), line), text.to_string());
        self
    }

    pub fn shown(&self) -> Vec<(PathBuf, ShowOptions)> {
        self.shown.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl Workbench for FakeWorkbench {
    fn active_file(&self) -> Option<PathBuf> {
        self.active.lock().unwrap().clone()
    }

    async fn show_document(&self, file: &Path, options: ShowOptions) -> Result<(), SearchError> {
        self.shown.lock().unwrap().push((file.to_path_buf(), options));
        if !options.preview {
            *self.active.lock().unwrap() = Some(file.to_path_buf());
        }
        Ok(())
    }

    async fn line_text(&self, file: &Path, line: u32) -> Result<Option<String>, SearchError> {
        Ok(self.lines.get(&(file.to_path_buf(), line)).cloned())
    }

    fn run_command(&self, name: &str) {
        self.commands.lock().unwrap().push(name.to_string());
    }
}

/// Records every call made on the palette widget
#[derive(Default)]
pub struct RecordingView {
    placeholder: Mutex<Option<String>>,
    item_sets: Mutex<Vec<Vec<ResultItem>>>,
    values: Mutex<Vec<String>>,
    busy: AtomicBool,
    executions: AtomicUsize,
    hidden: AtomicBool,
}

impl RecordingView {
    pub fn placeholder(&self) -> Option<String> {
        self.placeholder.lock().unwrap().clone()
    }

    /// Every list passed to `set_items`, oldest first
    pub fn item_sets(&self) -> Vec<Vec<ResultItem>> {
        self.item_sets.lock().unwrap().clone()
    }

    pub fn last_items(&self) -> Vec<ResultItem> {
        self.item_sets().pop().unwrap_or_default()
    }

    pub fn values(&self) -> Vec<String> {
        self.values.lock().unwrap().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// How many times the view was marked busy, one per executed query
    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.load(Ordering::SeqCst)
    }
}

impl PaletteView for RecordingView {
    fn show(&self, placeholder: &str) {
        *self.placeholder.lock().unwrap() = Some(placeholder.to_string());
    }

    fn set_items(&self, items: &[ResultItem]) {
        self.item_sets.lock().unwrap().push(items.to_vec());
    }

    fn set_busy(&self, busy: bool) {
        if busy {
            self.executions.fetch_add(1, Ordering::SeqCst);
        }
        self.busy.store(busy, Ordering::SeqCst);
    }

    fn set_value(&self, value: &str) {
        self.values.lock().unwrap().push(value.to_string());
    }

    fn hide(&self) {
        self.hidden.store(true, Ordering::SeqCst);
    }
}
