//! Capabilities the palette consumes from its host editor.
//!
//! The core never touches the filesystem, a renderer or an editor directly;
//! everything goes through these traits. The submodules provide the
//! reference host used by the command-line front end.

pub mod outline;
pub mod terminal;
pub mod workspace;

#[cfg(test)]
pub mod testing;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::SearchError;
use crate::types::{DocumentSymbol, Range, ResultItem};

pub use outline::OutlineProvider;
pub use terminal::{print_items, TerminalView, TerminalWorkbench};
pub use workspace::WorkspaceIndex;

/// Lists workspace files
#[async_trait]
pub trait FileIndex: Send + Sync {
    /// Files matching `include` and not matching `exclude` (a brace glob or
    /// empty), at most `max_results` of them.
    async fn find_files(
        &self,
        include: &str,
        exclude: &str,
        max_results: Option<usize>,
    ) -> Result<Vec<PathBuf>, SearchError>;
}

/// Produces the outline of one document
#[async_trait]
pub trait SymbolProvider: Send + Sync {
    async fn document_symbols(&self, file: &Path) -> Result<Vec<DocumentSymbol>, SearchError>;
}

/// How a document should be shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShowOptions {
    /// Keep keyboard focus in the palette
    pub preserve_focus: bool,
    /// Open in a transient preview editor
    pub preview: bool,
    pub selection: Option<Range>,
}

/// Editor-side operations: documents, the active file and commands
#[async_trait]
pub trait Workbench: Send + Sync {
    fn active_file(&self) -> Option<PathBuf>;

    async fn show_document(&self, file: &Path, options: ShowOptions) -> Result<(), SearchError>;

    /// Text of one zero-based line, `None` past the end of the document
    async fn line_text(&self, file: &Path, line: u32) -> Result<Option<String>, SearchError>;

    /// Fire-and-forget
    fn run_command(&self, name: &str);
}

/// The palette widget itself
pub trait PaletteView: Send + Sync {
    fn show(&self, placeholder: &str);
    fn set_items(&self, items: &[ResultItem]);
    fn set_busy(&self, busy: bool);
    /// Replace the text in the input box
    fn set_value(&self, value: &str);
    fn hide(&self);
}
