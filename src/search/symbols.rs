use std::path::Path;

use serde::Serialize;

use super::SearchEngine;
use crate::config::SymbolConfig;
use crate::error::SearchError;
use crate::query::{SearchKind, SearchRequest};
use crate::types::{DocumentSymbol, Location, ResultItem, SymbolKind};

/// Fixed partitions of the symbol-kind taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKindClass {
    Function,
    Declaration,
    Literal,
}

impl SymbolKindClass {
    pub const FUNCTION_KINDS: [SymbolKind; 3] = [
        SymbolKind::Method,
        SymbolKind::Constructor,
        SymbolKind::Function,
    ];
    pub const DECLARATION_KINDS: [SymbolKind; 7] = [
        SymbolKind::Class,
        SymbolKind::Property,
        SymbolKind::Field,
        SymbolKind::Enum,
        SymbolKind::Interface,
        SymbolKind::Variable,
        SymbolKind::Constant,
    ];
    pub const LITERAL_KINDS: [SymbolKind; 4] = [
        SymbolKind::String,
        SymbolKind::Number,
        SymbolKind::Boolean,
        SymbolKind::Null,
    ];

    pub fn for_search(kind: SearchKind) -> Option<Self> {
        match kind {
            SearchKind::Functions => Some(Self::Function),
            SearchKind::Declarations => Some(Self::Declaration),
            SearchKind::Literals => Some(Self::Literal),
            _ => None,
        }
    }

    pub fn default_kinds(self) -> &'static [SymbolKind] {
        match self {
            Self::Function => &Self::FUNCTION_KINDS,
            Self::Declaration => &Self::DECLARATION_KINDS,
            Self::Literal => &Self::LITERAL_KINDS,
        }
    }
}

/// Which symbols one class keeps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolFilter {
    kinds: Vec<SymbolKind>,
    ignore: Option<String>,
}

impl SymbolFilter {
    pub fn new(kinds: Vec<SymbolKind>, ignore: Option<String>) -> Self {
        let ignore = ignore.filter(|s| !s.is_empty());
        Self { kinds, ignore }
    }

    fn from_ids(ids: &[u8], ignore: Option<&String>) -> Self {
        let kinds = ids
            .iter()
            .filter_map(|&id| {
                let kind = SymbolKind::from_id(id);
                if kind.is_none() {
                    tracing::warn!("Ignoring unknown symbol kind id {}", id);
                }
                kind
            })
            .collect();
        Self::new(kinds, ignore.cloned())
    }

    pub fn keeps(&self, symbol: &DocumentSymbol) -> bool {
        self.kinds.contains(&symbol.kind)
            && self
                .ignore
                .as_deref()
                .map_or(true, |ignore| !symbol.name.contains(ignore))
    }
}

/// Per-class filters, configured from kind-id lists
#[derive(Debug, Clone)]
pub struct SymbolClasses {
    functions: SymbolFilter,
    declarations: SymbolFilter,
    literals: SymbolFilter,
}

impl Default for SymbolClasses {
    fn default() -> Self {
        Self::from_config(&SymbolConfig::default())
    }
}

impl SymbolClasses {
    pub fn from_config(config: &SymbolConfig) -> Self {
        Self {
            functions: SymbolFilter::from_ids(&config.functions, config.functions_ignore.as_ref()),
            declarations: SymbolFilter::from_ids(
                &config.declarations,
                config.declarations_ignore.as_ref(),
            ),
            literals: SymbolFilter::from_ids(&config.literals, config.literals_ignore.as_ref()),
        }
    }

    pub fn filter(&self, class: SymbolKindClass) -> &SymbolFilter {
        match class {
            SymbolKindClass::Function => &self.functions,
            SymbolKindClass::Declaration => &self.declarations,
            SymbolKindClass::Literal => &self.literals,
        }
    }
}

/// A symbol visited by [`SymbolWalk`], with the name of its parent
#[derive(Debug, Clone, Copy)]
pub struct WalkedSymbol<'a> {
    pub symbol: &'a DocumentSymbol,
    pub container: Option<&'a str>,
}

/// Lazy depth-first pre-order traversal of a symbol forest: each symbol is
/// yielded before its children, siblings in document order.
pub struct SymbolWalk<'a> {
    stack: Vec<WalkedSymbol<'a>>,
}

impl<'a> SymbolWalk<'a> {
    pub fn new(roots: &'a [DocumentSymbol]) -> Self {
        let stack = roots
            .iter()
            .rev()
            .map(|symbol| WalkedSymbol {
                symbol,
                container: None,
            })
            .collect();
        Self { stack }
    }
}

impl<'a> Iterator for SymbolWalk<'a> {
    type Item = WalkedSymbol<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let parent = current.symbol.name.as_str();
        self.stack
            .extend(current.symbol.children.iter().rev().map(|child| WalkedSymbol {
                symbol: child,
                container: Some(parent),
            }));
        Some(current)
    }
}

/// Functions / Declarations / Literals: flatten the focus file's outline and
/// keep the symbols of the requested class, at any depth.
pub(super) async fn execute(
    engine: &SearchEngine,
    request: &SearchRequest,
    class: SymbolKindClass,
    focus: Option<&Path>,
) -> Result<Vec<ResultItem>, SearchError> {
    let file = focus.ok_or(SearchError::NoActiveFile)?;

    let symbols = engine.symbols.lock().await.get_symbols(file).await?;
    let filter = engine.classes.filter(class);
    let query = format!("{}{}", request.file_filter, engine.table.prefix(request.kind));
    let relative = engine.relative_path(file);

    Ok(SymbolWalk::new(&symbols)
        .filter(|walked| filter.keeps(walked.symbol))
        .map(|walked| symbol_item(walked, file, &relative, &query))
        .collect())
}

fn symbol_item(walked: WalkedSymbol<'_>, file: &Path, relative: &str, query: &str) -> ResultItem {
    let symbol = walked.symbol;
    let container = walked
        .container
        .map(|c| format!(" in {c}"))
        .unwrap_or_default();
    ResultItem {
        label: format!("{} {}", symbol.kind.icon(), symbol.name),
        description: Some(format!("{query}{}", symbol.name)),
        detail: Some(format!("{}{container} in {relative}", symbol.kind)),
        target: Some(Location::with_range(file.to_path_buf(), symbol.range)),
        shortcut: None,
        symbol_name: Some(symbol.name.clone()),
    }
}
