use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::SearchError;
use crate::host::SymbolProvider;
use crate::types::DocumentSymbol;

/// The symbol tree last fetched for one file
#[derive(Debug, Clone)]
pub struct SymbolCacheEntry {
    pub file: PathBuf,
    pub symbols: Arc<Vec<DocumentSymbol>>,
}

/// Single-slot memo in front of the symbol provider.
///
/// Holds at most one file's outline; asking for a different file replaces it.
pub struct SymbolCache {
    provider: Arc<dyn SymbolProvider>,
    entry: Option<SymbolCacheEntry>,
}

impl SymbolCache {
    pub fn new(provider: Arc<dyn SymbolProvider>) -> Self {
        Self {
            provider,
            entry: None,
        }
    }

    pub fn cached_file(&self) -> Option<&Path> {
        self.entry.as_ref().map(|e| e.file.as_path())
    }

    /// Symbols for `file`, served from the slot when it holds the same file.
    /// A failed fetch leaves the slot untouched.
    pub async fn get_symbols(&mut self, file: &Path) -> Result<Arc<Vec<DocumentSymbol>>, SearchError> {
        if let Some(entry) = &self.entry {
            if entry.file == file {
                return Ok(Arc::clone(&entry.symbols));
            }
        }

        let symbols = Arc::new(self.provider.document_symbols(file).await?);
        tracing::debug!("Cached {} top-level symbols for {}", symbols.len(), file.display());
        self.entry = Some(SymbolCacheEntry {
            file: file.to_path_buf(),
            symbols: Arc::clone(&symbols),
        });
        Ok(symbols)
    }
}
