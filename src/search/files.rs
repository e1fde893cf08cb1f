use std::path::Path;

use super::SearchEngine;
use crate::error::SearchError;
use crate::query::SearchRequest;
use crate::types::{Location, ResultItem, SymbolKind};

/// Files: the focus file alone for an empty filter, otherwise a bounded
/// substring lookup in the workspace index.
pub(super) async fn execute(
    engine: &SearchEngine,
    request: &SearchRequest,
    focus: Option<&Path>,
) -> Result<Vec<ResultItem>, SearchError> {
    let filter = request.file_filter.trim();
    if filter.is_empty() {
        return Ok(focus.map(|f| file_item(engine, f)).into_iter().collect());
    }

    let include = include_glob(filter);
    let files = engine
        .files
        .find_files(&include, &engine.exclude_pattern, Some(engine.max_file_results))
        .await?;
    tracing::debug!("{} files matched {}", files.len(), include);

    Ok(files.iter().map(|f| file_item(engine, f)).collect())
}

/// `**/*<filter>*` with glob metacharacters in the filter escaped
pub fn include_glob(filter: &str) -> String {
    format!("**/*{}*", glob::Pattern::escape(filter))
}

pub(super) fn file_item(engine: &SearchEngine, file: &Path) -> ResultItem {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    ResultItem {
        label: format!("{} {name}", SymbolKind::File.icon()),
        detail: Some(engine.relative_path(file)),
        target: Some(Location::file(file.to_path_buf())),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_glob_wraps_filter() {
        assert_eq!(include_glob("app"), "**/*app*");
        assert_eq!(include_glob("src/app"), "**/*src/app*");
    }

    #[test]
    fn test_include_glob_escapes_metacharacters() {
        let glob = include_glob("a*b[1]");
        let pattern = glob::Pattern::new(&glob).unwrap();
        assert!(pattern.matches("x/a*b[1].rs"));
        assert!(!pattern.matches("x/aXb1.rs"));
    }
}
