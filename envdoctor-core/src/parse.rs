//! Source parsing with tree-sitter.
//!
//! Every source file is first parsed with the TSX grammar, which accepts
//! ES modules, type annotations and JSX in one dialect. When that tree still
//! contains ERROR or MISSING nodes, the grammar matching the file extension
//! gets a second chance (e.g. `<T>value` casts only parse as TypeScript).
//! A file that is broken under every candidate is a parse failure.

use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

use crate::error::{EnvDoctorError, EnvDoctorResult};

/// Maximum file size to parse (10 MB).
pub const MAX_FILE_SIZE: usize = 10_000_000;

/// Grammar used to parse a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// TypeScript + JSX; the primary dialect for every file
    Tsx,
    /// TypeScript without JSX (allows angle-bracket type assertions)
    TypeScript,
    /// Plain JavaScript with JSX
    JavaScript,
}

impl Dialect {
    /// tree-sitter grammar for this dialect.
    pub fn language(self) -> tree_sitter::Language {
        match self {
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    /// Dialects to try for a file, in order.
    pub fn candidates_for(path: &Path) -> &'static [Dialect] {
        match path.extension().and_then(|e| e.to_str()) {
            Some("tsx") => &[Self::Tsx],
            Some("ts" | "mts" | "cts") => &[Self::Tsx, Self::TypeScript],
            _ => &[Self::Tsx, Self::JavaScript],
        }
    }
}

/// Reusable source parser. One instance is kept for a whole scan.
pub struct SourceParser {
    parser: Parser,
}

impl SourceParser {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Parse `source` into a syntax tree free of error nodes.
    ///
    /// The error reports the first error position of the primary dialect,
    /// since that is the grammar users expect their files to follow.
    pub fn parse(&mut self, path: &Path, source: &str) -> EnvDoctorResult<Tree> {
        if source.len() > MAX_FILE_SIZE {
            return Err(EnvDoctorError::parse(
                path,
                format!("file exceeds {} bytes", MAX_FILE_SIZE),
            ));
        }

        let mut first_failure = None;

        for &dialect in Dialect::candidates_for(path) {
            self.parser
                .set_language(&dialect.language())
                .map_err(|e| EnvDoctorError::internal(format!("grammar {:?}: {}", dialect, e)))?;

            let Some(tree) = self.parser.parse(source, None) else {
                if first_failure.is_none() {
                    first_failure = Some(EnvDoctorError::parse(
                        path,
                        format!("{:?} parser returned no tree", dialect),
                    ));
                }
                continue;
            };

            if !tree.root_node().has_error() {
                return Ok(tree);
            }

            if first_failure.is_none() {
                first_failure = Some(match first_error(tree.root_node()) {
                    Some(node) => {
                        let pos = node.start_position();
                        EnvDoctorError::parse_at(
                            path,
                            format!("syntax error near `{}`", node.kind()),
                            pos.row + 1,
                            pos.column + 1,
                        )
                    }
                    None => EnvDoctorError::parse(path, "syntax error"),
                });
            }
        }

        Err(first_failure.unwrap_or_else(|| EnvDoctorError::parse(path, "no dialect accepted file")))
    }
}

impl Default for SourceParser {
    fn default() -> Self {
        Self::new()
    }
}

/// First ERROR or MISSING node in document order.
fn first_error(root: Node) -> Option<Node> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        // Only descend into subtrees that actually contain errors.
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}
