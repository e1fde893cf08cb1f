//! Tree-sitter document outlines.
//!
//! Each supported language maps a handful of declaration nodes onto the
//! symbol-kind taxonomy. Nodes that are not declarations are looked through,
//! so a declaration nested anywhere below another one becomes its child.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser as CmarkParser, Tag, TagEnd};
use tree_sitter::{Language, Node};

use super::SymbolProvider;
use crate::error::SearchError;
use crate::types::{DocumentSymbol, Position, Range, SymbolKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    Rust,
    TypeScript,
    Tsx,
    Python,
    Go,
    Java,
    Cpp,
    Markdown,
}

impl SourceLanguage {
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "rs" => Some(Self::Rust),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "py" => Some(Self::Python),
            "go" => Some(Self::Go),
            "java" => Some(Self::Java),
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => Some(Self::Cpp),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }
}

/// Holds one tree-sitter parser per language
pub struct Outliner {
    rust_parser: tree_sitter::Parser,
    typescript_parser: tree_sitter::Parser,
    tsx_parser: tree_sitter::Parser,
    python_parser: tree_sitter::Parser,
    go_parser: tree_sitter::Parser,
    java_parser: tree_sitter::Parser,
    cpp_parser: tree_sitter::Parser,
}

impl Outliner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rust_parser: create_parser(tree_sitter_rust::LANGUAGE.into())?,
            typescript_parser: create_parser(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())?,
            tsx_parser: create_parser(tree_sitter_typescript::LANGUAGE_TSX.into())?,
            python_parser: create_parser(tree_sitter_python::LANGUAGE.into())?,
            go_parser: create_parser(tree_sitter_go::LANGUAGE.into())?,
            java_parser: create_parser(tree_sitter_java::LANGUAGE.into())?,
            cpp_parser: create_parser(tree_sitter_cpp::LANGUAGE.into())?,
        })
    }

    /// Outline of `content`, empty for unknown languages or unparsable input
    pub fn outline(&mut self, path: &Path, content: &str) -> Vec<DocumentSymbol> {
        let Some(language) = SourceLanguage::detect(path) else {
            return Vec::new();
        };

        let parser = match language {
            SourceLanguage::Markdown => return markdown_outline(content),
            SourceLanguage::Rust => &mut self.rust_parser,
            SourceLanguage::TypeScript => &mut self.typescript_parser,
            SourceLanguage::Tsx => &mut self.tsx_parser,
            SourceLanguage::Python => &mut self.python_parser,
            SourceLanguage::Go => &mut self.go_parser,
            SourceLanguage::Java => &mut self.java_parser,
            SourceLanguage::Cpp => &mut self.cpp_parser,
        };

        let Some(tree) = parser.parse(content, None) else {
            tracing::debug!("tree-sitter gave up on {}", path.display());
            return Vec::new();
        };

        let walker = OutlineWalker {
            content,
            lines: LineIndex::new(content),
            language,
        };
        walker.collect(&tree.root_node(), None)
    }
}

/// [`SymbolProvider`] that reads files from disk and outlines them
pub struct OutlineProvider {
    outliner: Arc<Mutex<Outliner>>,
}

impl OutlineProvider {
    pub fn new() -> Result<Self> {
        Ok(Self {
            outliner: Arc::new(Mutex::new(Outliner::new()?)),
        })
    }
}

#[async_trait]
impl SymbolProvider for OutlineProvider {
    async fn document_symbols(&self, file: &Path) -> Result<Vec<DocumentSymbol>, SearchError> {
        let content = tokio::fs::read_to_string(file)
            .await
            .map_err(|e| SearchError::provider("symbol", format!("{}: {e}", file.display())))?;

        let outliner = Arc::clone(&self.outliner);
        let path: PathBuf = file.to_path_buf();
        tokio::task::spawn_blocking(move || -> Result<Vec<DocumentSymbol>, SearchError> {
            let mut outliner = outliner
                .lock()
                .map_err(|_| SearchError::provider("symbol", "outliner lock poisoned"))?;
            Ok(outliner.outline(&path, &content))
        })
        .await
        .map_err(|e| SearchError::provider("symbol", e))?
    }
}

fn create_parser(language: Language) -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&language)?;
    Ok(parser)
}

/// Byte offsets to zero-based line/character positions
struct LineIndex<'a> {
    content: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(content: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { content, starts }
    }

    fn position(&self, byte: usize) -> Position {
        let byte = byte.min(self.content.len());
        let line = self.starts.partition_point(|&start| start <= byte) - 1;
        let start = self.starts[line];
        let character = self
            .content
            .get(start..byte)
            .map_or(0, |text| text.chars().count());
        Position::new(line as u32, character as u32)
    }

    fn range(&self, bytes: std::ops::Range<usize>) -> Range {
        Range::new(self.position(bytes.start), self.position(bytes.end))
    }
}

struct OutlineWalker<'a> {
    content: &'a str,
    lines: LineIndex<'a>,
    language: SourceLanguage,
}

impl OutlineWalker<'_> {
    /// Symbols among the descendants of `node`, looking through non-declarations
    fn collect(&self, node: &Node, container: Option<SymbolKind>) -> Vec<DocumentSymbol> {
        let mut symbols = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match self.declaration(&child, container) {
                Some((kind, name)) => {
                    let children = self.collect(&child, Some(kind));
                    symbols.push(
                        DocumentSymbol::new(name, kind, self.lines.range(child.byte_range()))
                            .with_children(children),
                    );
                }
                None => symbols.extend(self.collect(&child, container)),
            }
        }
        symbols
    }

    fn text(&self, node: Node) -> &str {
        &self.content[node.byte_range()]
    }

    fn field_text(&self, node: &Node, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|n| self.text(n).to_string())
    }

    fn declaration(&self, node: &Node, container: Option<SymbolKind>) -> Option<(SymbolKind, String)> {
        match self.language {
            SourceLanguage::Rust => self.rust_declaration(node, container),
            SourceLanguage::TypeScript | SourceLanguage::Tsx => self.ts_declaration(node, container),
            SourceLanguage::Python => self.python_declaration(node, container),
            SourceLanguage::Go => self.go_declaration(node),
            SourceLanguage::Java => self.java_declaration(node),
            SourceLanguage::Cpp => self.cpp_declaration(node, container),
            SourceLanguage::Markdown => None,
        }
    }

    fn rust_declaration(&self, node: &Node, container: Option<SymbolKind>) -> Option<(SymbolKind, String)> {
        let kind = match node.kind() {
            "function_item" | "function_signature_item" => {
                if matches!(container, Some(SymbolKind::Object | SymbolKind::Interface)) {
                    SymbolKind::Method
                } else {
                    SymbolKind::Function
                }
            }
            "impl_item" => {
                let ty = self.field_text(node, "type")?;
                let name = match self.field_text(node, "trait") {
                    Some(tr) => format!("impl {tr} for {ty}"),
                    None => format!("impl {ty}"),
                };
                return Some((SymbolKind::Object, name));
            }
            "struct_item" | "union_item" => SymbolKind::Struct,
            "enum_item" => SymbolKind::Enum,
            "enum_variant" => SymbolKind::EnumMember,
            "trait_item" => SymbolKind::Interface,
            "mod_item" => SymbolKind::Module,
            "const_item" => SymbolKind::Constant,
            "static_item" => SymbolKind::Variable,
            "field_declaration" => SymbolKind::Field,
            "type_item" | "associated_type" => SymbolKind::TypeParameter,
            "macro_definition" => SymbolKind::Function,
            _ => return None,
        };
        Some((kind, self.field_text(node, "name")?))
    }

    fn ts_declaration(&self, node: &Node, container: Option<SymbolKind>) -> Option<(SymbolKind, String)> {
        let kind = match node.kind() {
            "function_declaration" | "generator_function_declaration" => SymbolKind::Function,
            "class_declaration" | "abstract_class_declaration" => SymbolKind::Class,
            "method_definition" | "method_signature" | "abstract_method_signature" => {
                if self.field_text(node, "name").as_deref() == Some("constructor") {
                    SymbolKind::Constructor
                } else {
                    SymbolKind::Method
                }
            }
            "public_field_definition" | "property_signature" => SymbolKind::Property,
            "interface_declaration" => SymbolKind::Interface,
            "enum_declaration" => SymbolKind::Enum,
            "type_alias_declaration" => SymbolKind::TypeParameter,
            "internal_module" | "module" => SymbolKind::Namespace,
            "variable_declarator" => {
                if container.is_some_and(|k| k != SymbolKind::Namespace) {
                    return None;
                }
                let value = node.child_by_field_name("value").map(|v| v.kind());
                if matches!(value, Some("arrow_function" | "function_expression" | "function")) {
                    SymbolKind::Function
                } else if node
                    .parent()
                    .is_some_and(|p| self.text(p).trim_start().starts_with("const"))
                {
                    SymbolKind::Constant
                } else {
                    SymbolKind::Variable
                }
            }
            _ => return None,
        };
        Some((kind, self.field_text(node, "name")?))
    }

    fn python_declaration(&self, node: &Node, container: Option<SymbolKind>) -> Option<(SymbolKind, String)> {
        match node.kind() {
            "function_definition" => {
                let name = self.field_text(node, "name")?;
                let kind = match container {
                    Some(SymbolKind::Class) if name == "__init__" => SymbolKind::Constructor,
                    Some(SymbolKind::Class) => SymbolKind::Method,
                    _ => SymbolKind::Function,
                };
                Some((kind, name))
            }
            "class_definition" => Some((SymbolKind::Class, self.field_text(node, "name")?)),
            "assignment" if container.is_none() || container == Some(SymbolKind::Class) => {
                let left = node.child_by_field_name("left")?;
                if left.kind() != "identifier" {
                    return None;
                }
                let name = self.text(left).to_string();
                let is_constant = name.chars().any(char::is_alphabetic)
                    && name
                        .chars()
                        .all(|c| c.is_uppercase() || c.is_ascii_digit() || c == '_');
                let kind = if is_constant {
                    SymbolKind::Constant
                } else if container.is_some() {
                    SymbolKind::Property
                } else {
                    SymbolKind::Variable
                };
                Some((kind, name))
            }
            _ => None,
        }
    }

    fn go_declaration(&self, node: &Node) -> Option<(SymbolKind, String)> {
        let kind = match node.kind() {
            "function_declaration" => SymbolKind::Function,
            "method_declaration" => SymbolKind::Method,
            "type_spec" => match node.child_by_field_name("type").map(|t| t.kind()) {
                Some("struct_type") => SymbolKind::Struct,
                Some("interface_type") => SymbolKind::Interface,
                _ => SymbolKind::Class,
            },
            "const_spec" => SymbolKind::Constant,
            "var_spec" => SymbolKind::Variable,
            "field_declaration" => SymbolKind::Field,
            "method_elem" | "method_spec" => SymbolKind::Method,
            _ => return None,
        };
        Some((kind, self.field_text(node, "name")?))
    }

    fn java_declaration(&self, node: &Node) -> Option<(SymbolKind, String)> {
        let kind = match node.kind() {
            "class_declaration" => SymbolKind::Class,
            "interface_declaration" | "annotation_type_declaration" => SymbolKind::Interface,
            "enum_declaration" => SymbolKind::Enum,
            "enum_constant" => SymbolKind::EnumMember,
            "record_declaration" => SymbolKind::Struct,
            "method_declaration" => SymbolKind::Method,
            "constructor_declaration" => SymbolKind::Constructor,
            "field_declaration" | "constant_declaration" => {
                let declarator = node.child_by_field_name("declarator")?;
                let name = self.field_text(&declarator, "name")?;
                let is_constant = node.kind() == "constant_declaration"
                    || self.text(*node).contains("static final");
                let kind = if is_constant {
                    SymbolKind::Constant
                } else {
                    SymbolKind::Field
                };
                return Some((kind, name));
            }
            _ => return None,
        };
        Some((kind, self.field_text(node, "name")?))
    }

    fn cpp_declaration(&self, node: &Node, container: Option<SymbolKind>) -> Option<(SymbolKind, String)> {
        match node.kind() {
            "function_definition" => {
                let name = self.cpp_function_name(node)?;
                let kind = if matches!(container, Some(SymbolKind::Class | SymbolKind::Struct)) {
                    SymbolKind::Method
                } else {
                    SymbolKind::Function
                };
                Some((kind, name))
            }
            "class_specifier" | "struct_specifier" | "enum_specifier" | "union_specifier" => {
                // Only definitions; `struct Foo x;` is a use
                node.child_by_field_name("body")?;
                let kind = match node.kind() {
                    "class_specifier" => SymbolKind::Class,
                    "enum_specifier" => SymbolKind::Enum,
                    _ => SymbolKind::Struct,
                };
                Some((kind, self.field_text(node, "name")?))
            }
            "enumerator" => Some((SymbolKind::EnumMember, self.field_text(node, "name")?)),
            "namespace_definition" => Some((
                SymbolKind::Namespace,
                self.field_text(node, "name")
                    .unwrap_or_else(|| "(anonymous)".to_string()),
            )),
            _ => None,
        }
    }

    /// The name inside a (possibly pointer/reference-wrapped) function declarator
    fn cpp_function_name(&self, node: &Node) -> Option<String> {
        let mut declarator = node.child_by_field_name("declarator")?;
        while declarator.kind() != "function_declarator" {
            declarator = declarator.child_by_field_name("declarator")?;
        }
        let name = declarator.child_by_field_name("declarator")?;
        Some(self.text(name).to_string())
    }
}

/// Markdown headings as `String` symbols, nested by level
fn markdown_outline(content: &str) -> Vec<DocumentSymbol> {
    let lines = LineIndex::new(content);
    let mut headings: Vec<(usize, String, usize)> = Vec::new();
    let mut current: Option<(usize, String, usize)> = None;

    for (event, offset) in CmarkParser::new_ext(content, Options::ENABLE_HEADING_ATTRIBUTES)
        .into_offset_iter()
    {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((heading_level(level), String::new(), offset.start));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, title, _)) = current.as_mut() {
                    title.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(heading) = current.take() {
                    headings.push(heading);
                }
            }
            _ => {}
        }
    }

    // A section runs until the next heading of the same or a higher level
    let mut flat = Vec::with_capacity(headings.len());
    for (i, (level, title, start)) in headings.iter().enumerate() {
        let end = headings[i + 1..]
            .iter()
            .find(|(next_level, _, _)| next_level <= level)
            .map_or(content.len(), |(_, _, next_start)| *next_start);
        let name = title.trim().to_string();
        flat.push((*level, DocumentSymbol::new(name, SymbolKind::String, lines.range(*start..end))));
    }

    nest_by_level(flat)
}

fn nest_by_level(flat: Vec<(usize, DocumentSymbol)>) -> Vec<DocumentSymbol> {
    let mut roots = Vec::new();
    let mut stack: Vec<(usize, DocumentSymbol)> = Vec::new();

    fn attach(stack: &mut Vec<(usize, DocumentSymbol)>, roots: &mut Vec<DocumentSymbol>) {
        if let Some((_, done)) = stack.pop() {
            match stack.last_mut() {
                Some((_, parent)) => parent.children.push(done),
                None => roots.push(done),
            }
        }
    }

    for (level, symbol) in flat {
        while stack.last().is_some_and(|(top, _)| *top >= level) {
            attach(&mut stack, &mut roots);
        }
        stack.push((level, symbol));
    }
    while !stack.is_empty() {
        attach(&mut stack, &mut roots);
    }
    roots
}

fn heading_level(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
