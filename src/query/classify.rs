use serde::Serialize;

use super::prefix::{PrefixTable, SearchKind};

/// A raw palette query resolved into a typed search intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub kind: SearchKind,
    /// Text before the recognized prefix (the whole query for file searches)
    pub file_filter: String,
    /// Text after the recognized prefix
    pub symbol_filter: String,
    /// Recompute even when the previous request had the same kind
    pub force_reexecute: bool,
}

impl SearchRequest {
    fn files(file_filter: &str) -> Self {
        let file_filter = if file_filter.trim().is_empty() {
            String::new()
        } else {
            file_filter.to_string()
        };
        Self {
            kind: SearchKind::Files,
            force_reexecute: file_filter.is_empty(),
            file_filter,
            symbol_filter: String::new(),
        }
    }
}

/// Classify a raw query against the prefix table.
///
/// Entries are tried in declaration order and the first one whose prefix
/// occurs in the query wins, splitting the query at that prefix's first
/// occurrence. First-character-only entries are skipped unless the prefix
/// starts the query. Pure: same input and table, same request.
pub fn classify(raw: &str, table: &PrefixTable) -> SearchRequest {
    if raw.trim().is_empty() {
        return SearchRequest::files("");
    }

    for entry in table.active_entries() {
        let Some(index) = raw.find(entry.prefix.as_str()) else {
            continue;
        };
        if entry.first_char_only && index != 0 {
            continue;
        }
        return SearchRequest {
            kind: entry.kind,
            file_filter: raw[..index].to_string(),
            symbol_filter: raw[index + entry.prefix.len()..].to_string(),
            force_reexecute: entry.kind.always_reexecutes(),
        };
    }

    SearchRequest::files(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CommandConfig, PrefixConfig};

    fn table() -> PrefixTable {
        PrefixTable::default()
    }

    #[test]
    fn test_empty_query_is_unfiltered_file_search() {
        for raw in ["", "   ", "\t"] {
            let request = classify(raw, &table());
            assert_eq!(request.kind, SearchKind::Files);
            assert!(request.file_filter.is_empty());
            assert!(request.force_reexecute);
        }
    }

    #[test]
    fn test_plain_text_is_file_search() {
        let request = classify("src/app", &table());
        assert_eq!(request.kind, SearchKind::Files);
        assert_eq!(request.file_filter, "src/app");
        assert!(request.symbol_filter.is_empty());
        assert!(!request.force_reexecute);
    }

    #[test]
    fn test_function_prefix_splits_query() {
        let request = classify("app@handle", &table());
        assert_eq!(request.kind, SearchKind::Functions);
        assert_eq!(request.file_filter, "app");
        assert_eq!(request.symbol_filter, "handle");
        assert!(!request.force_reexecute);
    }

    #[test]
    fn test_line_prefix_forces_reexecution() {
        let request = classify("foo:12:4", &table());
        assert_eq!(request.kind, SearchKind::Line);
        assert_eq!(request.file_filter, "foo");
        assert_eq!(request.symbol_filter, "12:4");
        assert!(request.force_reexecute);
    }

    #[test]
    fn test_declaration_order_breaks_ties() {
        // '$' appears first in the string, but Functions is declared earlier
        let request = classify("$x@y", &table());
        assert_eq!(request.kind, SearchKind::Functions);
        assert_eq!(request.file_filter, "$x");
        assert_eq!(request.symbol_filter, "y");
    }

    #[test]
    fn test_first_char_only_prefixes() {
        assert_eq!(classify(">", &table()).kind, SearchKind::Command);
        assert_eq!(classify("#Foo", &table()).kind, SearchKind::WorkspaceSymbols);
        assert_eq!(classify("_", &table()).kind, SearchKind::RecentFiles);
        assert_eq!(classify("?", &table()).kind, SearchKind::Help);

        // Not at position 0: skipped, falls through to later entries / files
        let request = classify("my_file", &table());
        assert_eq!(request.kind, SearchKind::Files);
        assert_eq!(request.file_filter, "my_file");
        assert_eq!(classify("a>b", &table()).kind, SearchKind::Files);
        assert_eq!(classify("what?", &table()).kind, SearchKind::Files);
    }

    #[test]
    fn test_skipped_entry_continues_to_next() {
        // '_' is not first, so RecentFiles is skipped, but ':' still matches
        let request = classify("my_file:10", &table());
        assert_eq!(request.kind, SearchKind::Line);
        assert_eq!(request.file_filter, "my_file");
        assert_eq!(request.symbol_filter, "10");
    }

    #[test]
    fn test_help_wins_over_other_prefixes_at_start() {
        let request = classify("?@", &table());
        assert_eq!(request.kind, SearchKind::Help);
        assert_eq!(request.symbol_filter, "@");
    }

    #[test]
    fn test_classification_is_idempotent() {
        for raw in ["", "abc", "a@b", "x:1:2", ">cmd", "?", "lib$Foo", "!str"] {
            assert_eq!(classify(raw, &table()), classify(raw, &table()));
        }
    }

    #[test]
    fn test_multi_character_override() {
        let overrides = PrefixConfig {
            functions: Some("fn:".into()),
            line: Some(String::new()),
            ..Default::default()
        };
        let table = PrefixTable::new(&overrides, &CommandConfig::default());
        let request = classify("lib fn:parse", &table);
        assert_eq!(request.kind, SearchKind::Functions);
        assert_eq!(request.file_filter, "lib ");
        assert_eq!(request.symbol_filter, "parse");

        // Line search disabled: ':' alone is plain file text
        assert_eq!(classify("a:1", &table).kind, SearchKind::Files);
    }
}
