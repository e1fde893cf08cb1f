use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A zero-based line/character position inside a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A half-open span between two positions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// An empty range collapsed onto a single position
    pub fn at(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }
}

/// Where accepting a result navigates to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

impl Location {
    pub fn file(file: PathBuf) -> Self {
        Self { file, range: None }
    }

    pub fn with_range(file: PathBuf, range: Range) -> Self {
        Self {
            file,
            range: Some(range),
        }
    }
}

/// The 26 document symbol kinds reported by symbol providers, in taxonomy order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    File,
    Module,
    Namespace,
    Package,
    Class,
    Method,
    Property,
    Field,
    Constructor,
    Enum,
    Interface,
    Function,
    Variable,
    Constant,
    String,
    Number,
    Boolean,
    Array,
    Object,
    Key,
    Null,
    EnumMember,
    Struct,
    Event,
    Operator,
    TypeParameter,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 26] = [
        SymbolKind::File,
        SymbolKind::Module,
        SymbolKind::Namespace,
        SymbolKind::Package,
        SymbolKind::Class,
        SymbolKind::Method,
        SymbolKind::Property,
        SymbolKind::Field,
        SymbolKind::Constructor,
        SymbolKind::Enum,
        SymbolKind::Interface,
        SymbolKind::Function,
        SymbolKind::Variable,
        SymbolKind::Constant,
        SymbolKind::String,
        SymbolKind::Number,
        SymbolKind::Boolean,
        SymbolKind::Array,
        SymbolKind::Object,
        SymbolKind::Key,
        SymbolKind::Null,
        SymbolKind::EnumMember,
        SymbolKind::Struct,
        SymbolKind::Event,
        SymbolKind::Operator,
        SymbolKind::TypeParameter,
    ];

    /// Numeric id of this kind (0-25)
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    /// Codicon token shown in front of symbol labels
    pub fn icon(self) -> &'static str {
        match self {
            SymbolKind::File => "$(code)",
            SymbolKind::Module => "$(book)",
            SymbolKind::Namespace => "$(three-bars)",
            SymbolKind::Package => "$(package)",
            SymbolKind::Class => "$(verified)",
            SymbolKind::Method => "$(pulse)",
            SymbolKind::Property => "$(plus)",
            SymbolKind::Field => "$(pin)",
            SymbolKind::Constructor => "$(plug)",
            SymbolKind::Enum => "$(organization-filled)",
            SymbolKind::Interface => "$(lock)",
            SymbolKind::Function => "$(mention)",
            SymbolKind::Variable => "$(primitive-dot)",
            SymbolKind::Constant => "$(primitive-square)",
            SymbolKind::String => "$(quote)",
            SymbolKind::Number => "$(list-ordered)",
            SymbolKind::Boolean => "$(law)",
            SymbolKind::Array => "$(kebab-horizontal)",
            SymbolKind::Object => "$(kebab-vertical)",
            SymbolKind::Key => "$(key)",
            SymbolKind::Null => "$(x)",
            SymbolKind::EnumMember => "$(person-filled)",
            SymbolKind::Struct => "$(kebab-vertical)",
            SymbolKind::Event => "$(watch)",
            SymbolKind::Operator => "$(terminal)",
            SymbolKind::TypeParameter => "$(zap)",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SymbolKind::File => "File",
            SymbolKind::Module => "Module",
            SymbolKind::Namespace => "Namespace",
            SymbolKind::Package => "Package",
            SymbolKind::Class => "Class",
            SymbolKind::Method => "Method",
            SymbolKind::Property => "Property",
            SymbolKind::Field => "Field",
            SymbolKind::Constructor => "Constructor",
            SymbolKind::Enum => "Enum",
            SymbolKind::Interface => "Interface",
            SymbolKind::Function => "Function",
            SymbolKind::Variable => "Variable",
            SymbolKind::Constant => "Constant",
            SymbolKind::String => "String",
            SymbolKind::Number => "Number",
            SymbolKind::Boolean => "Boolean",
            SymbolKind::Array => "Array",
            SymbolKind::Object => "Object",
            SymbolKind::Key => "Key",
            SymbolKind::Null => "Null",
            SymbolKind::EnumMember => "EnumMember",
            SymbolKind::Struct => "Struct",
            SymbolKind::Event => "Event",
            SymbolKind::Operator => "Operator",
            SymbolKind::TypeParameter => "TypeParameter",
        };
        f.write_str(name)
    }
}

/// One node of a document outline as returned by a symbol provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub range: Range,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentSymbol>,
}

impl DocumentSymbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, range: Range) -> Self {
        Self {
            name: name.into(),
            kind,
            range,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<DocumentSymbol>) -> Self {
        self.children = children;
        self
    }
}

/// A selectable palette row.
///
/// A row navigates when it has a `target`, rewrites the query when it has a
/// `shortcut`, and is purely informational when it has neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_name: Option<String>,
}

impl ResultItem {
    /// An informational row that rewrites the query to `shortcut` when accepted
    pub fn shortcut(label: impl Into<String>, shortcut: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            shortcut: Some(shortcut.into()),
            ..Default::default()
        }
    }

    pub fn target_file(&self) -> Option<&std::path::Path> {
        self.target.as_ref().map(|t| t.file.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_kind_ids_follow_taxonomy_order() {
        assert_eq!(SymbolKind::File.id(), 0);
        assert_eq!(SymbolKind::Method.id(), 5);
        assert_eq!(SymbolKind::Function.id(), 11);
        assert_eq!(SymbolKind::Null.id(), 20);
        assert_eq!(SymbolKind::TypeParameter.id(), 25);
        for kind in SymbolKind::ALL {
            assert_eq!(SymbolKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(SymbolKind::from_id(26), None);
    }

    #[test]
    fn test_symbol_kind_display() {
        assert_eq!(SymbolKind::EnumMember.to_string(), "EnumMember");
        assert_eq!(SymbolKind::Function.icon(), "$(mention)");
    }

    #[test]
    fn test_result_item_serialization_skips_missing_fields() {
        let item = ResultItem::shortcut("1?\thelp", "@");
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"shortcut\":\"@\""));
        assert!(!json.contains("target"));
        assert!(!json.contains("symbol_name"));
    }
}
