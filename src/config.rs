use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::search::SymbolKindClass;
use crate::types::SymbolKind;

/// Main configuration for the palette
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub palette: PaletteConfig,
    pub exclude: ExcludeConfig,
    pub prefixes: PrefixConfig,
    pub symbols: SymbolConfig,
    pub commands: CommandConfig,
}

/// Live-preview and result-list behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Show the highlighted result in a preview editor while browsing
    pub enable_preview: bool,
    /// Debounce delay for both typing and highlight changes
    pub preview_delay_ms: u64,
    /// Upper bound on rows returned by a file lookup
    pub max_file_results: usize,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            enable_preview: true,
            preview_delay_ms: 250,
            max_file_results: 10,
        }
    }
}

/// Sources merged into the workspace exclude glob
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeConfig {
    /// Fold `.ignore` and `.gitignore` from the workspace root into the set
    pub use_ignore_files: bool,
    /// Skip entries whose value is `false`. Off by default: every listed
    /// glob is excluded regardless of its flag.
    pub honor_disabled: bool,
    /// Editor file-exclude map (glob -> enabled)
    pub files: BTreeMap<String, bool>,
    /// Search-exclude map (glob -> enabled)
    pub search: BTreeMap<String, bool>,
}

impl Default for ExcludeConfig {
    fn default() -> Self {
        let files = ["**/.git", "**/.svn", "**/.hg", "**/CVS", "**/.DS_Store"]
            .into_iter()
            .map(|p| (p.to_string(), true))
            .collect();
        let search = ["**/node_modules", "**/bower_components", "**/*.code-search"]
            .into_iter()
            .map(|p| (p.to_string(), true))
            .collect();
        Self {
            use_ignore_files: true,
            honor_disabled: false,
            files,
            search,
        }
    }
}

/// Per-kind prefix overrides. An empty string disables that search kind.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PrefixConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declarations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_symbols: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_files: Option<String>,
}

/// Symbol-kind ids per class, plus name substrings each class skips
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolConfig {
    pub functions: Vec<u8>,
    pub declarations: Vec<u8>,
    pub literals: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions_ignore: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declarations_ignore: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literals_ignore: Option<String>,
}

impl Default for SymbolConfig {
    fn default() -> Self {
        let ids = |class: SymbolKindClass| -> Vec<u8> {
            class.default_kinds().iter().copied().map(SymbolKind::id).collect()
        };
        Self {
            functions: ids(SymbolKindClass::Function),
            declarations: ids(SymbolKindClass::Declaration),
            literals: ids(SymbolKindClass::Literal),
            functions_ignore: Some(" callback".into()),
            declarations_ignore: None,
            literals_ignore: None,
        }
    }
}

/// Host commands the pass-through prefixes trigger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    pub commands: String,
    pub workspace_symbols: String,
    pub recent_files: String,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            commands: "workbench.action.showCommands".into(),
            workspace_symbols: "workbench.action.showAllSymbols".into(),
            recent_files: "workbench.action.quickOpen".into(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the workspace configuration, falling back to defaults when absent
    pub fn load_or_default(workspace_root: &Path) -> Result<Self> {
        let path = Self::config_path(workspace_root);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Get the path to the data directory for a workspace
    pub fn data_dir(workspace_root: &Path) -> PathBuf {
        workspace_root.join(".goto-anything")
    }

    /// Get the config file path for a workspace
    pub fn config_path(workspace_root: &Path) -> PathBuf {
        Self::data_dir(workspace_root).join("config.toml")
    }
}
