use serde::Serialize;

use crate::config::{CommandConfig, PrefixConfig};

/// What a classified query searches for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Files,
    Functions,
    Declarations,
    Literals,
    Line,
    Command,
    WorkspaceSymbols,
    RecentFiles,
    Help,
}

impl SearchKind {
    /// Kinds that search the symbols of the active file
    pub fn is_symbol_search(self) -> bool {
        matches!(
            self,
            SearchKind::Functions | SearchKind::Declarations | SearchKind::Literals
        )
    }

    /// Kinds whose result must be recomputed on every keystroke
    pub fn always_reexecutes(self) -> bool {
        matches!(self, SearchKind::Line)
    }
}

impl std::fmt::Display for SearchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchKind::Files => write!(f, "files"),
            SearchKind::Functions => write!(f, "functions"),
            SearchKind::Declarations => write!(f, "declarations"),
            SearchKind::Literals => write!(f, "literals"),
            SearchKind::Line => write!(f, "line"),
            SearchKind::Command => write!(f, "command"),
            SearchKind::WorkspaceSymbols => write!(f, "workspace_symbols"),
            SearchKind::RecentFiles => write!(f, "recent_files"),
            SearchKind::Help => write!(f, "help"),
        }
    }
}

/// One row of the prefix table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixEntry {
    pub kind: SearchKind,
    pub prefix: String,
    /// Only match when the prefix is the first character of the query
    pub first_char_only: bool,
    /// Host command triggered by pass-through kinds
    pub command: Option<String>,
    /// Help text shown by the `Help` listing
    pub label: String,
}

/// Ordered prefix definitions. Declaration order decides ties.
#[derive(Debug, Clone)]
pub struct PrefixTable {
    entries: Vec<PrefixEntry>,
}

impl Default for PrefixTable {
    fn default() -> Self {
        Self::new(&PrefixConfig::default(), &CommandConfig::default())
    }
}

impl PrefixTable {
    pub fn new(overrides: &PrefixConfig, commands: &CommandConfig) -> Self {
        let pick = |value: &Option<String>, default: &str| {
            value.clone().unwrap_or_else(|| default.to_string())
        };

        let help = pick(&overrides.help, "?");
        let functions = pick(&overrides.functions, "@");
        let declarations = pick(&overrides.declarations, "$");
        let literals = pick(&overrides.literals, "!");
        let line = pick(&overrides.line, ":");
        let command = pick(&overrides.command, ">");
        let workspace_symbols = pick(&overrides.workspace_symbols, "#");
        let recent_files = pick(&overrides.recent_files, "_");

        let entries = vec![
            PrefixEntry {
                label: format!("Type '{help}' to list what can be searched"),
                kind: SearchKind::Help,
                prefix: help,
                first_char_only: true,
                command: None,
            },
            PrefixEntry {
                label: format!(
                    "Type '{functions}' to search for functions/methods within the filtered files"
                ),
                kind: SearchKind::Functions,
                prefix: functions,
                first_char_only: false,
                command: None,
            },
            PrefixEntry {
                label: format!(
                    "Type '{declarations}' to search for declarations within the filtered files"
                ),
                kind: SearchKind::Declarations,
                prefix: declarations,
                first_char_only: false,
                command: None,
            },
            PrefixEntry {
                label: format!("Type '{literals}' to search for literals within the filtered files"),
                kind: SearchKind::Literals,
                prefix: literals,
                first_char_only: false,
                command: None,
            },
            PrefixEntry {
                label: format!("Type '{line}' to go to a line within the filtered files"),
                kind: SearchKind::Line,
                prefix: line,
                first_char_only: false,
                command: None,
            },
            PrefixEntry {
                label: format!("Type '{command}' to open the default Go To Command menu"),
                kind: SearchKind::Command,
                prefix: command,
                first_char_only: true,
                command: Some(commands.commands.clone()),
            },
            PrefixEntry {
                label: format!(
                    "Type '{workspace_symbols}' to open the default Go To Symbol in Workspace"
                ),
                kind: SearchKind::WorkspaceSymbols,
                prefix: workspace_symbols,
                first_char_only: true,
                command: Some(commands.workspace_symbols.clone()),
            },
            PrefixEntry {
                label: format!("Type '{recent_files}' to show recent files"),
                kind: SearchKind::RecentFiles,
                prefix: recent_files,
                first_char_only: true,
                command: Some(commands.recent_files.clone()),
            },
        ];

        Self { entries }
    }

    /// Entries that can match, in declaration order (empty prefixes are disabled)
    pub fn active_entries(&self) -> impl Iterator<Item = &PrefixEntry> {
        self.entries.iter().filter(|e| !e.prefix.is_empty())
    }

    pub fn entry(&self, kind: SearchKind) -> Option<&PrefixEntry> {
        self.active_entries().find(|e| e.kind == kind)
    }

    pub fn prefix(&self, kind: SearchKind) -> &str {
        self.entry(kind).map_or("", |e| e.prefix.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_order() {
        let table = PrefixTable::default();
        let kinds: Vec<SearchKind> = table.active_entries().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SearchKind::Help,
                SearchKind::Functions,
                SearchKind::Declarations,
                SearchKind::Literals,
                SearchKind::Line,
                SearchKind::Command,
                SearchKind::WorkspaceSymbols,
                SearchKind::RecentFiles,
            ]
        );
        assert_eq!(table.prefix(SearchKind::Functions), "@");
        assert_eq!(table.prefix(SearchKind::Line), ":");
    }

    #[test]
    fn test_overrides_and_disabled_entries() {
        let overrides = PrefixConfig {
            functions: Some("%".into()),
            literals: Some(String::new()),
            ..Default::default()
        };
        let table = PrefixTable::new(&overrides, &CommandConfig::default());
        assert_eq!(table.prefix(SearchKind::Functions), "%");
        assert!(table.entry(SearchKind::Literals).is_none());
        assert!(table
            .entry(SearchKind::Functions)
            .unwrap()
            .label
            .contains("'%'"));
    }

    #[test]
    fn test_pass_through_entries_carry_commands() {
        let table = PrefixTable::default();
        let entry = table.entry(SearchKind::Command).unwrap();
        assert!(entry.first_char_only);
        assert_eq!(entry.command.as_deref(), Some("workbench.action.showCommands"));
        assert!(table.entry(SearchKind::Functions).unwrap().command.is_none());
    }
}
