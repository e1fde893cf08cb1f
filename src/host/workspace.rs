use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use tokio::sync::{Mutex, OnceCell};
use tokio::task::JoinHandle;

use super::FileIndex;
use crate::error::SearchError;

const INCLUDE_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// In-memory list of every file under the workspace root.
///
/// The list is built once by [`WorkspaceIndex::load`]; until then lookups
/// answer [`SearchError::NotReady`]. No ignore rules are applied while
/// walking: the exclude glob passed to each lookup decides what is hidden.
pub struct WorkspaceIndex {
    root: PathBuf,
    files: OnceCell<Vec<String>>,
    exclude_cache: Mutex<Option<(String, Arc<GlobSet>)>>,
}

impl WorkspaceIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: OnceCell::new(),
            exclude_cache: Mutex::new(None),
        }
    }

    /// Walk the workspace if that has not happened yet. Returns the file count.
    pub async fn load(&self) -> Result<usize, SearchError> {
        let files = self
            .files
            .get_or_try_init(|| async {
                let root = self.root.clone();
                let files = tokio::task::spawn_blocking(move || walk_workspace(&root))
                    .await
                    .map_err(|e| SearchError::provider("file", e))?;
                tracing::info!("Indexed {} files under {}", files.len(), self.root.display());
                Ok::<_, SearchError>(files)
            })
            .await?;
        Ok(files.len())
    }

    /// Load in the background
    pub fn spawn_load(self: &Arc<Self>) -> JoinHandle<()> {
        let index = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = index.load().await {
                tracing::warn!("Failed to index {}: {}", index.root.display(), e);
            }
        })
    }

    async fn exclude_set(&self, exclude: &str) -> Result<Arc<GlobSet>, SearchError> {
        let mut cache = self.exclude_cache.lock().await;
        if let Some((pattern, set)) = cache.as_ref() {
            if pattern == exclude {
                return Ok(Arc::clone(set));
            }
        }
        let set = Arc::new(compile_exclude(exclude)?);
        *cache = Some((exclude.to_string(), Arc::clone(&set)));
        Ok(set)
    }
}

#[async_trait]
impl FileIndex for WorkspaceIndex {
    async fn find_files(
        &self,
        include: &str,
        exclude: &str,
        max_results: Option<usize>,
    ) -> Result<Vec<PathBuf>, SearchError> {
        let files = self.files.get().ok_or(SearchError::NotReady)?;
        let include = glob::Pattern::new(include)
            .map_err(|e| SearchError::provider("file", format!("bad include glob {include:?}: {e}")))?;
        let excluded = self.exclude_set(exclude).await?;

        Ok(files
            .iter()
            .filter(|rel| include.matches_with(rel, INCLUDE_OPTIONS))
            .filter(|rel| !is_excluded(&excluded, rel))
            .take(max_results.unwrap_or(usize::MAX))
            .map(|rel| self.root.join(rel))
            .collect())
    }
}

fn walk_workspace(root: &Path) -> Vec<String> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Error walking workspace: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(root) {
            let rel: Vec<_> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect();
            files.push(rel.join("/"));
        }
    }
    files
}

/// A path is excluded when it or any of its ancestor directories matches
fn is_excluded(set: &GlobSet, rel: &str) -> bool {
    if set.is_empty() {
        return false;
    }
    Path::new(rel)
        .ancestors()
        .filter(|p| !p.as_os_str().is_empty())
        .any(|p| set.is_match(p))
}

/// Compile `{a,b,...}` (or a single pattern, or nothing) into a glob set
fn compile_exclude(exclude: &str) -> Result<GlobSet, SearchError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in split_alternatives(exclude) {
        match GlobBuilder::new(pattern).literal_separator(false).build() {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => tracing::warn!("Skipping invalid exclude pattern {:?}: {}", pattern, e),
        }
    }
    builder
        .build()
        .map_err(|e| SearchError::provider("file", format!("bad exclude glob: {e}")))
}

/// The top-level alternatives of a brace list; braces nested inside an
/// alternative stay part of it.
fn split_alternatives(exclude: &str) -> Vec<&str> {
    let exclude = exclude.trim();
    let Some(inner) = exclude.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
        return if exclude.is_empty() { Vec::new() } else { vec![exclude] };
    };

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '{' | '[' => depth += 1,
            '}' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[start..]);
    parts.into_iter().map(str::trim).filter(|p| !p.is_empty()).collect()
}
