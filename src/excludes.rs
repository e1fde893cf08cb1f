//! Exclude-pattern resolution.
//!
//! Merges the editor's file-exclude and search-exclude maps with the contents
//! of `.ignore`/`.gitignore` at the workspace root into one brace glob
//! (`{p1,p2,...}`) that the file index understands. Computed once per session.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::ExcludeConfig;
use crate::error::SearchError;

/// Ignore files read from the workspace root, in merge order
pub const IGNORE_FILES: [&str; 2] = [".ignore", ".gitignore"];

/// Deduplicated set of exclude globs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeSet {
    patterns: BTreeMap<String, bool>,
}

impl ExcludeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a glob -> enabled map.
    ///
    /// Every key is excluded regardless of its flag unless `honor_disabled`
    /// is set, in which case `false` entries are skipped.
    pub fn merge_config(&mut self, map: &BTreeMap<String, bool>, honor_disabled: bool) {
        for (pattern, enabled) in map {
            if honor_disabled && !enabled {
                continue;
            }
            self.insert(pattern);
        }
    }

    /// Merge the patterns of one ignore file
    pub fn merge_ignore_file(&mut self, content: &str) {
        for pattern in parse_ignore_file(content) {
            self.insert(&pattern);
        }
    }

    fn insert(&mut self, pattern: &str) {
        let pattern = pattern.trim();
        if !pattern.is_empty() {
            self.patterns.insert(pattern.to_string(), true);
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    /// `{p1,p2,...}`, or an empty string when nothing is excluded
    pub fn to_glob(&self) -> String {
        if self.patterns.is_empty() {
            return String::new();
        }
        let joined = self.patterns().collect::<Vec<_>>().join(",");
        format!("{{{joined}}}")
    }
}

/// Turn ignore-file lines into exclude globs.
///
/// Blank lines, `#` comments and `!` negations are dropped (negations are not
/// re-included). A trailing `/` is stripped and every pattern is made to
/// match at any depth by prefixing `**/`.
pub fn parse_ignore_file(content: &str) -> impl Iterator<Item = String> + '_ {
    content.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            return None;
        }
        let pattern = line.trim_end_matches('/').trim_start_matches('/');
        if pattern.is_empty() {
            return None;
        }
        if pattern.starts_with("**/") {
            Some(pattern.to_string())
        } else {
            Some(format!("**/{pattern}"))
        }
    })
}

/// Read one ignore file as UTF-8
pub async fn read_ignore_file(path: &Path) -> Result<String, SearchError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| SearchError::IgnoreFileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    String::from_utf8(bytes).map_err(|e| SearchError::IgnoreFileUnreadable {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

/// Build the exclude set for a workspace. Unreadable ignore files are logged
/// and contribute nothing.
pub async fn resolve_exclude_set(workspace_root: &Path, config: &ExcludeConfig) -> ExcludeSet {
    let mut set = ExcludeSet::new();
    set.merge_config(&config.files, config.honor_disabled);
    set.merge_config(&config.search, config.honor_disabled);

    if config.use_ignore_files {
        for name in IGNORE_FILES {
            let path = workspace_root.join(name);
            match read_ignore_file(&path).await {
                Ok(content) => set.merge_ignore_file(&content),
                Err(SearchError::IgnoreFileUnreadable { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    tracing::debug!("No {} in {}", name, workspace_root.display());
                }
                Err(e) => tracing::warn!("Skipping ignore file: {}", e),
            }
        }
    }

    tracing::debug!("Resolved {} exclude patterns", set.len());
    set
}

/// Resolve the brace glob handed to the file index (empty when none)
pub async fn resolve_exclude_pattern(workspace_root: &Path, config: &ExcludeConfig) -> String {
    resolve_exclude_set(workspace_root, config).await.to_glob()
}
